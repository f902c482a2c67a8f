//! Shared helpers for pay and tax calculations.
//!
//! Currently this is only currency rounding. Amounts flow through the
//! pipeline at full precision and are rounded in one place, when a report
//! is rendered.

use rust_decimal::Decimal;

/// Rounds a monetary amount to two decimal places, half away from zero.
///
/// Apportioning pay across thirty waypoints produces sub-cent amounts; this
/// is the single rounding step that turns them back into currency. A tie at
/// the third decimal rounds away from zero, so `0.005` becomes `0.01` and
/// `-0.005` becomes `-0.01`.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use flightpay_core::calculations::common::round_half_up;
///
/// assert_eq!(round_half_up(dec!(110.4124)), dec!(110.41));
/// assert_eq!(round_half_up(dec!(29.365)), dec!(29.37));
/// assert_eq!(round_half_up(dec!(-1.656186)), dec!(-1.66));
/// ```
pub fn round_half_up(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, rust_decimal::RoundingStrategy::MidpointAwayFromZero)
}

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One income bracket of a jurisdiction's marginal-rate table.
///
/// `rate_percent` is stored as a percentage (6.0 means 6%); the tax engine
/// divides by 100 when applying it. `upper_bound` of `None` means the
/// bracket is open-ended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxBracket {
    pub jurisdiction: String,
    pub lower_bound: Decimal,
    pub upper_bound: Option<Decimal>,
    pub rate_percent: Decimal,
}

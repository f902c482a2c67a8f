//! Plain-text rendering of a batch outcome.
//!
//! All figures are carried unrounded through the pipeline; this module is
//! the only place money is rounded, to two decimals, half away from zero.

use flightpay_core::calculations::common::round_half_up;
use flightpay_core::models::{BatchOutcome, FlightEstimate};
use rust_decimal::Decimal;

fn money(value: Decimal) -> String {
    let rounded = round_half_up(value);
    if rounded.is_sign_negative() {
        format!("-${:.2}", rounded.abs())
    } else {
        format!("${:.2}", rounded)
    }
}

/// Formats an optional amount, using "—" when no baseline was available.
fn opt_money(value: Option<Decimal>) -> String {
    value.map(money).unwrap_or_else(|| "—".to_string())
}

fn push_amount(out: &mut String, label: &str, amount: String) {
    out.push_str(&format!("  {label:<22}{amount:>12}\n"));
}

fn render_estimate(out: &mut String, estimate: &FlightEstimate) {
    let breakdown = &estimate.breakdown;

    out.push_str(&format!(
        "Flight {}  {} -> {}  ({:.1} mi, {:.2} h)\n",
        estimate.flight_id,
        estimate.departure_code,
        estimate.arrival_code,
        estimate.distance_miles,
        round_half_up(estimate.hours),
    ));
    push_amount(out, "Gross pay", money(breakdown.gross_pay));
    push_amount(out, "Tax (per-state)", money(breakdown.total_tax));
    push_amount(out, "Net pay (per-state)", money(breakdown.net_new));
    push_amount(out, "Tax (home-state)", opt_money(breakdown.baseline_tax));
    push_amount(out, "Net pay (home-state)", opt_money(breakdown.net_old));
    push_amount(out, "Delta vs home-state", opt_money(breakdown.delta));
    out.push('\n');
}

/// Renders the operator-facing report for one batch run.
pub fn render(outcome: &BatchOutcome) -> String {
    let mut out = String::new();

    if outcome.estimates.is_empty() && outcome.skipped.is_empty() {
        out.push_str("No flights found to estimate.\n");
        return out;
    }

    for estimate in &outcome.estimates {
        render_estimate(&mut out, estimate);
    }

    if !outcome.skipped.is_empty() {
        out.push_str("Skipped flights:\n");
        for skip in &outcome.skipped {
            out.push_str(&format!("  Flight {}: {}\n", skip.flight_id, skip.reason));
        }
        out.push('\n');
    }

    out.push_str(&format!(
        "Estimated {} flights, skipped {}.\n",
        outcome.estimates.len(),
        outcome.skipped.len()
    ));

    out
}

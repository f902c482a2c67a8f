use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Per-flight pay and tax figures under both policies.
///
/// The baseline fields are `None` when no jurisdiction had been resolved yet
/// in the run, so no home state could be drawn. Values are unrounded;
/// currency rounding happens at presentation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayBreakdown {
    pub gross_pay: Decimal,
    /// Tax apportioned per waypoint (the "new policy").
    pub total_tax: Decimal,
    /// Flat home-state tax over the whole gross (the "old policy").
    pub baseline_tax: Option<Decimal>,
    pub net_new: Decimal,
    pub net_old: Option<Decimal>,
    /// `baseline_tax - total_tax`; positive means the new policy pays out more.
    pub delta: Option<Decimal>,
}

impl PayBreakdown {
    pub fn new(gross_pay: Decimal, total_tax: Decimal, baseline_tax: Option<Decimal>) -> Self {
        Self {
            gross_pay,
            total_tax,
            baseline_tax,
            net_new: gross_pay - total_tax,
            net_old: baseline_tax.map(|tax| gross_pay - tax),
            delta: baseline_tax.map(|tax| tax - total_tax),
        }
    }
}

/// A finished estimate for one flight.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlightEstimate {
    pub flight_id: i64,
    pub departure_code: String,
    pub arrival_code: String,
    pub distance_miles: f64,
    pub hours: Decimal,
    pub breakdown: PayBreakdown,
}

/// A flight dropped from the batch, with the cause for the operator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedFlight {
    pub flight_id: i64,
    pub reason: String,
}

/// Everything one batch run produced.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BatchOutcome {
    pub estimates: Vec<FlightEstimate>,
    pub skipped: Vec<SkippedFlight>,
}

mod airport;
mod coordinate;
mod flight;
mod pay_breakdown;
mod tax_bracket;

pub use airport::Airport;
pub use coordinate::Coordinate;
pub use flight::Flight;
pub use pay_breakdown::{BatchOutcome, FlightEstimate, PayBreakdown, SkippedFlight};
pub use tax_bracket::TaxBracket;

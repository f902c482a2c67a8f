//! CSV loaders for the reference data behind pay estimation: flight
//! schedules, airport locations, and state tax brackets.

pub mod loader;

pub use loader::{
    AirportLoader, AirportRecord, FlightScheduleLoader, FlightScheduleRecord, LoaderError,
    TaxBracketLoader, TaxBracketRecord,
};

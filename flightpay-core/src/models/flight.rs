use serde::{Deserialize, Serialize};

/// One scheduled flight as it arrives from the data store. Timestamps stay
/// as raw feed text here; parsing happens in the schedule module.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flight {
    pub flight_id: i64,
    pub departure_code: String,
    pub arrival_code: String,
    pub departure_time: String,
    pub arrival_time: String,
}

//! Reverse geocoding of flight waypoints to state jurisdictions.

pub mod client;

pub use client::{GeocodeClient, GeocodeConfig, GeocodeError};

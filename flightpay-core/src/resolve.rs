//! Jurisdiction resolution port.

use async_trait::async_trait;

use crate::models::Coordinate;

/// Maps a coordinate to its governing tax jurisdiction, usually a
/// two-letter state code.
///
/// `None` means the position could not be resolved: open water, a foreign
/// country, or a resolver outage. Callers treat an unresolved position as
/// untaxed rather than failing the flight.
#[async_trait]
pub trait JurisdictionResolver: Send + Sync {
    async fn resolve(&self, coordinate: Coordinate) -> Option<String>;
}

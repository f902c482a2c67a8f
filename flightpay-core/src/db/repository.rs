use async_trait::async_trait;
use thiserror::Error;

use crate::models::{Airport, Flight, TaxBracket};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RepositoryError {
    #[error("Record not found")]
    NotFound,

    #[error("Database error: {0}")]
    Database(String),

    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Configuration error: {0}")]
    Configuration(String),
}

#[async_trait]
pub trait FlightRepository: Send + Sync {
    // Flight schedule
    /// Flights in ascending id order, at most `limit` rows.
    async fn flights(&self, limit: u32) -> Result<Vec<Flight>, RepositoryError>;
    async fn insert_flight(&self, flight: &Flight) -> Result<(), RepositoryError>;
    async fn delete_flight(&self, flight_id: i64) -> Result<(), RepositoryError>;

    // Airports
    async fn airport(&self, code: &str) -> Result<Airport, RepositoryError>;
    async fn insert_airport(&self, airport: &Airport) -> Result<(), RepositoryError>;
    async fn delete_airport(&self, code: &str) -> Result<(), RepositoryError>;

    // Tax brackets
    /// Brackets for one jurisdiction, in the order they were stored.
    async fn tax_brackets(&self, jurisdiction: &str) -> Result<Vec<TaxBracket>, RepositoryError>;
    async fn insert_tax_bracket(&self, bracket: &TaxBracket) -> Result<(), RepositoryError>;
    async fn delete_tax_brackets(&self, jurisdiction: &str) -> Result<(), RepositoryError>;
}

pub mod calculations;
pub mod db;
pub mod models;
pub mod resolve;

pub use db::repository::{FlightRepository, RepositoryError};
pub use models::*;
pub use resolve::JurisdictionResolver;

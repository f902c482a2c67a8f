use std::path::PathBuf;

use async_trait::async_trait;
use flightpay_core::db::factory::{DbConfig, RepositoryFactory};
use flightpay_core::db::repository::{FlightRepository, RepositoryError};

use crate::repository::SqliteRepository;

/// Resolves the directory holding `.sql` seed files.
///
/// Checks, in order:
/// 1. The `FLIGHTPAY_DB_SQLITE_SEEDS_DIR` environment variable.
/// 2. A `./seeds` directory under the current working directory.
/// 3. The crate's bundled `seeds/` directory.
fn seeds_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("FLIGHTPAY_DB_SQLITE_SEEDS_DIR") {
        return PathBuf::from(dir);
    }

    let local = PathBuf::from("./seeds");
    if local.is_dir() {
        return local;
    }

    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("seeds")
}

/// Factory for creating SQLite-backed flight repositories.
///
/// Each repository it creates is migrated and seeded before being handed
/// out. Register the factory with a repository registry to make the
/// `sqlite` backend selectable by name:
///
/// ```rust,no_run
/// use flightpay_core::db::{DbConfig, RepositoryRegistry};
/// use flightpay_db_sqlite::SqliteRepositoryFactory;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let mut registry = RepositoryRegistry::new();
///     registry.register(Box::new(SqliteRepositoryFactory));
///
///     let config = DbConfig {
///         backend: "sqlite".to_string(),
///         connection_string: "sqlite:flightpay.db".to_string(),
///     };
///     let repository = registry.create(&config).await?;
///     let flights = repository.flights(100).await?;
///     println!("{} flights pending estimation", flights.len());
///     Ok(())
/// }
/// ```
pub struct SqliteRepositoryFactory;

#[async_trait]
impl RepositoryFactory for SqliteRepositoryFactory {
    fn backend_name(&self) -> &'static str {
        "sqlite"
    }

    async fn create(&self, config: &DbConfig) -> Result<Box<dyn FlightRepository>, RepositoryError> {
        let repository = SqliteRepository::new(&config.connection_string)
            .await
            .map_err(|e| RepositoryError::Connection(e.to_string()))?;

        repository
            .run_migrations()
            .await
            .map_err(|e| RepositoryError::Database(e.to_string()))?;

        repository
            .run_seeds(&seeds_dir())
            .await
            .map_err(|e| RepositoryError::Database(e.to_string()))?;

        Ok(Box::new(repository))
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn backend_name_is_sqlite() {
        assert_eq!(SqliteRepositoryFactory.backend_name(), "sqlite");
    }

    #[tokio::test]
    async fn creates_migrated_and_seeded_repository() {
        let config = DbConfig {
            backend: "sqlite".to_string(),
            connection_string: "sqlite::memory:".to_string(),
        };

        let repository = SqliteRepositoryFactory
            .create(&config)
            .await
            .expect("Factory should create a repository");

        let flights = repository.flights(100).await.expect("Query should succeed");
        assert_eq!(flights, vec![]);

        let atlanta = repository
            .airport("ATL")
            .await
            .expect("Seeded airport should exist");
        assert_eq!(atlanta.code, "ATL");
    }
}

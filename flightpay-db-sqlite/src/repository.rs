//! SQLite implementation of the flight repository.

use std::path::Path;

use anyhow::{Context, Result};
use async_trait::async_trait;
use flightpay_core::db::repository::{FlightRepository, RepositoryError};
use flightpay_core::models::{Airport, Flight, TaxBracket};
use sqlx::Row;
use sqlx::sqlite::{SqlitePool, SqliteRow};
use tracing::info;

use crate::decimal::{decimal_to_f64, read_decimal, read_optional_decimal};

/// SQLite-backed implementation of the `FlightRepository` trait.
pub struct SqliteRepository {
    pool: SqlitePool,
}

impl SqliteRepository {
    /// Creates a new repository connected to the given SQLite database URL.
    pub async fn new(database_url: &str) -> Result<Self> {
        let pool = SqlitePool::connect(database_url)
            .await
            .with_context(|| format!("Failed to connect to database at '{}'", database_url))?;
        Ok(Self { pool })
    }

    /// Creates a new repository from an existing connection pool.
    pub async fn new_with_pool(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Runs all pending migrations from the bundled `migrations/` directory.
    pub async fn run_migrations(&self) -> Result<()> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .context("Failed to run migrations")?;
        Ok(())
    }

    /// Executes every `.sql` file in `seeds_dir` in filename order.
    ///
    /// Seed files are written to be rerunnable, so this can be called on
    /// every startup without duplicating reference data.
    pub async fn run_seeds(&self, seeds_dir: &Path) -> Result<()> {
        let mut entries: Vec<_> = std::fs::read_dir(seeds_dir)
            .with_context(|| format!("Failed to read seeds directory '{}'", seeds_dir.display()))?
            .filter_map(|entry| entry.ok())
            .filter(|entry| {
                entry.path().extension().and_then(|ext| ext.to_str()) == Some("sql")
            })
            .collect();
        entries.sort_by_key(|entry| entry.file_name());

        for entry in &entries {
            let path = entry.path();
            let sql = std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read seed file '{}'", path.display()))?;
            sqlx::raw_sql(&sql)
                .execute(&self.pool)
                .await
                .with_context(|| format!("Failed to execute seed file '{}'", path.display()))?;
        }

        info!(
            seeds = entries.len(),
            dir = %seeds_dir.display(),
            "Seed files applied"
        );
        Ok(())
    }

    /// Returns a reference to the underlying connection pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

fn row_to_flight(row: &SqliteRow) -> Result<Flight, RepositoryError> {
    Ok(Flight {
        flight_id: row
            .try_get("flight_id")
            .map_err(|e| RepositoryError::Database(e.to_string()))?,
        departure_code: row
            .try_get("departure_code")
            .map_err(|e| RepositoryError::Database(e.to_string()))?,
        arrival_code: row
            .try_get("arrival_code")
            .map_err(|e| RepositoryError::Database(e.to_string()))?,
        departure_time: row
            .try_get("departure_time")
            .map_err(|e| RepositoryError::Database(e.to_string()))?,
        arrival_time: row
            .try_get("arrival_time")
            .map_err(|e| RepositoryError::Database(e.to_string()))?,
    })
}

fn row_to_airport(row: &SqliteRow) -> Result<Airport, RepositoryError> {
    Ok(Airport {
        code: row
            .try_get("code")
            .map_err(|e| RepositoryError::Database(e.to_string()))?,
        lat: row
            .try_get("lat")
            .map_err(|e| RepositoryError::Database(e.to_string()))?,
        lon: row
            .try_get("lon")
            .map_err(|e| RepositoryError::Database(e.to_string()))?,
    })
}

fn row_to_tax_bracket(row: &SqliteRow) -> Result<TaxBracket, RepositoryError> {
    Ok(TaxBracket {
        jurisdiction: row
            .try_get("jurisdiction")
            .map_err(|e| RepositoryError::Database(e.to_string()))?,
        lower_bound: read_decimal(row, "lower_bound")?,
        upper_bound: read_optional_decimal(row, "upper_bound")?,
        rate_percent: read_decimal(row, "rate_percent")?,
    })
}

#[async_trait]
impl FlightRepository for SqliteRepository {
    async fn flights(&self, limit: u32) -> Result<Vec<Flight>, RepositoryError> {
        let rows = sqlx::query(
            "SELECT flight_id, departure_code, arrival_code, departure_time, arrival_time
             FROM flights ORDER BY flight_id LIMIT ?",
        )
        .bind(limit as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| RepositoryError::Database(e.to_string()))?;

        rows.iter().map(row_to_flight).collect()
    }

    async fn insert_flight(&self, flight: &Flight) -> Result<(), RepositoryError> {
        sqlx::query(
            "INSERT INTO flights (flight_id, departure_code, arrival_code, departure_time, arrival_time)
             VALUES (?, ?, ?, ?, ?)",
        )
        .bind(flight.flight_id)
        .bind(&flight.departure_code)
        .bind(&flight.arrival_code)
        .bind(&flight.departure_time)
        .bind(&flight.arrival_time)
        .execute(&self.pool)
        .await
        .map_err(|e| RepositoryError::Database(e.to_string()))?;

        Ok(())
    }

    async fn delete_flight(&self, flight_id: i64) -> Result<(), RepositoryError> {
        sqlx::query("DELETE FROM flights WHERE flight_id = ?")
            .bind(flight_id)
            .execute(&self.pool)
            .await
            .map_err(|e| RepositoryError::Database(e.to_string()))?;

        Ok(())
    }

    async fn airport(&self, code: &str) -> Result<Airport, RepositoryError> {
        let row = sqlx::query("SELECT code, lat, lon FROM airports WHERE code = ?")
            .bind(code)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| RepositoryError::Database(e.to_string()))?
            .ok_or(RepositoryError::NotFound)?;

        row_to_airport(&row)
    }

    async fn insert_airport(&self, airport: &Airport) -> Result<(), RepositoryError> {
        sqlx::query("INSERT INTO airports (code, lat, lon) VALUES (?, ?, ?)")
            .bind(&airport.code)
            .bind(airport.lat)
            .bind(airport.lon)
            .execute(&self.pool)
            .await
            .map_err(|e| RepositoryError::Database(e.to_string()))?;

        Ok(())
    }

    async fn delete_airport(&self, code: &str) -> Result<(), RepositoryError> {
        sqlx::query("DELETE FROM airports WHERE code = ?")
            .bind(code)
            .execute(&self.pool)
            .await
            .map_err(|e| RepositoryError::Database(e.to_string()))?;

        Ok(())
    }

    async fn tax_brackets(&self, jurisdiction: &str) -> Result<Vec<TaxBracket>, RepositoryError> {
        let rows = sqlx::query(
            "SELECT jurisdiction, lower_bound, upper_bound, rate_percent
             FROM tax_brackets WHERE jurisdiction = ? ORDER BY id",
        )
        .bind(jurisdiction)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| RepositoryError::Database(e.to_string()))?;

        rows.iter().map(row_to_tax_bracket).collect()
    }

    async fn insert_tax_bracket(&self, bracket: &TaxBracket) -> Result<(), RepositoryError> {
        sqlx::query(
            "INSERT INTO tax_brackets (jurisdiction, lower_bound, upper_bound, rate_percent)
             VALUES (?, ?, ?, ?)",
        )
        .bind(&bracket.jurisdiction)
        .bind(decimal_to_f64(bracket.lower_bound))
        .bind(bracket.upper_bound.map(decimal_to_f64))
        .bind(decimal_to_f64(bracket.rate_percent))
        .execute(&self.pool)
        .await
        .map_err(|e| RepositoryError::Database(e.to_string()))?;

        Ok(())
    }

    async fn delete_tax_brackets(&self, jurisdiction: &str) -> Result<(), RepositoryError> {
        sqlx::query("DELETE FROM tax_brackets WHERE jurisdiction = ?")
            .bind(jurisdiction)
            .execute(&self.pool)
            .await
            .map_err(|e| RepositoryError::Database(e.to_string()))?;

        Ok(())
    }
}

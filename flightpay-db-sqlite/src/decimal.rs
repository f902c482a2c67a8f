//! Decimal handling for SQLite's numeric affinity.
//!
//! Money columns are declared REAL, but SQLite stores a whole-dollar value
//! like `7000` as an INTEGER, so a reader pinned to one type fails on half
//! the rows. The helpers here accept either storage class and hand back
//! exact `Decimal` values.

use flightpay_core::RepositoryError;
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, TypeInfo, ValueRef};

/// Reads a money column as a `Decimal`, accepting INTEGER, REAL, or NULL
/// storage. NULL reads as zero; use [`read_optional_decimal`] where NULL
/// carries meaning.
pub fn read_decimal(row: &SqliteRow, column: &str) -> Result<Decimal, RepositoryError> {
    let raw = row
        .try_get_raw(column)
        .map_err(|e| RepositoryError::Database(format!("No column '{}' in row: {}", column, e)))?;

    match raw.type_info().name() {
        "INTEGER" => {
            let whole: i64 = row.try_get(column).map_err(|e| {
                RepositoryError::Database(format!("Reading '{}' as INTEGER: {}", column, e))
            })?;
            Ok(Decimal::from(whole))
        }
        "REAL" => {
            let approx: f64 = row.try_get(column).map_err(|e| {
                RepositoryError::Database(format!("Reading '{}' as REAL: {}", column, e))
            })?;
            Decimal::try_from(approx).map_err(|e| {
                RepositoryError::Database(format!(
                    "Value {} in '{}' does not fit a Decimal: {}",
                    approx, column, e
                ))
            })
        }
        "NULL" => Ok(Decimal::ZERO),
        other => Err(RepositoryError::Database(format!(
            "Column '{}' holds {} where a numeric value was expected",
            column, other
        ))),
    }
}

/// Reads a nullable money column, mapping SQL NULL to `None`.
pub fn read_optional_decimal(
    row: &SqliteRow,
    column: &str,
) -> Result<Option<Decimal>, RepositoryError> {
    let raw = row
        .try_get_raw(column)
        .map_err(|e| RepositoryError::Database(format!("No column '{}' in row: {}", column, e)))?;

    if raw.is_null() {
        return Ok(None);
    }

    read_decimal(row, column).map(Some)
}

/// Converts a `Decimal` to the `f64` form SQLite binds expect.
pub fn decimal_to_f64(d: Decimal) -> f64 {
    d.to_f64().unwrap_or(0.0)
}

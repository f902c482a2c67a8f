use std::io::Read;

use flightpay_core::{Airport, Flight, FlightRepository, RepositoryError, TaxBracket};
use rust_decimal::Decimal;
use serde::Deserialize;
use thiserror::Error;

/// Errors that can occur when loading reference data.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LoaderError {
    #[error("CSV parse error: {0}")]
    CsvParse(String),

    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),
}

impl From<csv::Error> for LoaderError {
    fn from(err: csv::Error) -> Self {
        LoaderError::CsvParse(err.to_string())
    }
}

fn deserialize_optional_decimal<'de, D>(deserializer: D) -> Result<Option<Decimal>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s: Option<String> = Option::deserialize(deserializer)?;
    match s {
        Some(s) if s.trim().is_empty() => Ok(None),
        Some(s) => s
            .trim()
            .parse::<Decimal>()
            .map(Some)
            .map_err(serde::de::Error::custom),
        None => Ok(None),
    }
}

/// A single record from a state tax brackets CSV file.
///
/// Columns:
/// - `jurisdiction`: Two-letter state code the bracket belongs to
/// - `lower_bound`: Taxable income where the bracket starts
/// - `upper_bound`: Taxable income where the bracket ends (empty for the
///   top, open-ended bracket)
/// - `rate_percent`: Marginal rate as a percentage (e.g., 6.0 for 6%)
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct TaxBracketRecord {
    pub jurisdiction: String,
    pub lower_bound: Decimal,
    #[serde(deserialize_with = "deserialize_optional_decimal")]
    pub upper_bound: Option<Decimal>,
    pub rate_percent: Decimal,
}

/// A single record from an airports CSV file.
///
/// Columns: `code` (IATA code), `lat`, `lon` (decimal degrees).
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct AirportRecord {
    pub code: String,
    pub lat: f64,
    pub lon: f64,
}

/// A single record from a flight schedule CSV file.
///
/// The timestamp columns use the scheduling system's display format,
/// e.g. `09:30 AM - Mon Mar-03-2014`, and are stored verbatim.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct FlightScheduleRecord {
    pub flight_id: i64,
    pub departure_code: String,
    pub arrival_code: String,
    pub departure_time: String,
    pub arrival_time: String,
}

/// Loader for state tax bracket data from CSV files.
///
/// Reads CSV data and inserts it into the database via the
/// `FlightRepository` trait, allowing it to work with any database
/// backend. Brackets are inserted in file order per jurisdiction, and
/// reads hand them back in that same order, so files must list each
/// state's brackets from lowest to highest lower bound.
pub struct TaxBracketLoader;

impl TaxBracketLoader {
    /// Parse tax bracket records from a CSV reader.
    ///
    /// The reader can be any type that implements `Read`, such as a file
    /// or a string slice.
    pub fn parse<R: Read>(reader: R) -> Result<Vec<TaxBracketRecord>, LoaderError> {
        let mut csv_reader = csv::Reader::from_reader(reader);
        let mut records = Vec::new();

        for result in csv_reader.deserialize() {
            let record: TaxBracketRecord = result?;
            records.push(record);
        }

        Ok(records)
    }

    /// Load tax bracket records into the database.
    ///
    /// For each jurisdiction in the records, existing brackets are
    /// deleted before the new ones are inserted, so running the same
    /// load multiple times produces the same result. Jurisdictions not
    /// mentioned in the file are left untouched.
    pub async fn load<R: FlightRepository>(
        repo: &R,
        records: &[TaxBracketRecord],
    ) -> Result<usize, LoaderError> {
        let mut inserted = 0;

        // Group records by jurisdiction to delete and re-insert per state,
        // keeping file order within each group.
        let mut groups: std::collections::HashMap<String, Vec<&TaxBracketRecord>> =
            std::collections::HashMap::new();
        for record in records {
            groups
                .entry(record.jurisdiction.clone())
                .or_default()
                .push(record);
        }

        for (jurisdiction, group_records) in groups {
            repo.delete_tax_brackets(&jurisdiction).await?;

            for record in group_records {
                let bracket = TaxBracket {
                    jurisdiction: record.jurisdiction.clone(),
                    lower_bound: record.lower_bound,
                    upper_bound: record.upper_bound,
                    rate_percent: record.rate_percent,
                };

                repo.insert_tax_bracket(&bracket).await?;
                inserted += 1;
            }
        }

        Ok(inserted)
    }
}

/// Loader for airport location data from CSV files.
pub struct AirportLoader;

impl AirportLoader {
    /// Parse airport records from a CSV reader.
    pub fn parse<R: Read>(reader: R) -> Result<Vec<AirportRecord>, LoaderError> {
        let mut csv_reader = csv::Reader::from_reader(reader);
        let mut records = Vec::new();

        for result in csv_reader.deserialize() {
            let record: AirportRecord = result?;
            records.push(record);
        }

        Ok(records)
    }

    /// Load airport records, replacing any existing row per code.
    pub async fn load<R: FlightRepository>(
        repo: &R,
        records: &[AirportRecord],
    ) -> Result<usize, LoaderError> {
        let mut inserted = 0;

        for record in records {
            repo.delete_airport(&record.code).await?;
            repo.insert_airport(&Airport {
                code: record.code.clone(),
                lat: record.lat,
                lon: record.lon,
            })
            .await?;
            inserted += 1;
        }

        Ok(inserted)
    }
}

/// Loader for flight schedule data from CSV files.
pub struct FlightScheduleLoader;

impl FlightScheduleLoader {
    /// Parse flight schedule records from a CSV reader.
    pub fn parse<R: Read>(reader: R) -> Result<Vec<FlightScheduleRecord>, LoaderError> {
        let mut csv_reader = csv::Reader::from_reader(reader);
        let mut records = Vec::new();

        for result in csv_reader.deserialize() {
            let record: FlightScheduleRecord = result?;
            records.push(record);
        }

        Ok(records)
    }

    /// Load flight records, replacing any existing row per flight id.
    pub async fn load<R: FlightRepository>(
        repo: &R,
        records: &[FlightScheduleRecord],
    ) -> Result<usize, LoaderError> {
        let mut inserted = 0;

        for record in records {
            repo.delete_flight(record.flight_id).await?;
            repo.insert_flight(&Flight {
                flight_id: record.flight_id,
                departure_code: record.departure_code.clone(),
                arrival_code: record.arrival_code.clone(),
                departure_time: record.departure_time.clone(),
                arrival_time: record.arrival_time.clone(),
            })
            .await?;
            inserted += 1;
        }

        Ok(inserted)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    const BRACKETS_CSV: &str = r#"jurisdiction,lower_bound,upper_bound,rate_percent
GA,0,750,1.0
GA,750,2250,2.0
GA,2250,3750,3.0
GA,3750,5250,4.0
GA,5250,7000,5.0
GA,7000,,6.0
NY,0,8200,4.0
NY,8200,11300,4.5
NY,11300,13350,5.25
NY,13350,20550,5.9
NY,20550,77150,6.45
NY,77150,205850,6.65
NY,205850,1029250,6.85
NY,1029250,,8.82
"#;

    #[test]
    fn test_parse_single_bracket() {
        let csv = "jurisdiction,lower_bound,upper_bound,rate_percent\nGA,0,750,1.0";

        let records = TaxBracketLoader::parse(csv.as_bytes()).expect("Failed to parse CSV");

        assert_eq!(records.len(), 1);
        assert_eq!(
            records[0],
            TaxBracketRecord {
                jurisdiction: "GA".to_string(),
                lower_bound: dec!(0),
                upper_bound: Some(dec!(750)),
                rate_percent: dec!(1.0),
            }
        );
    }

    #[test]
    fn test_parse_open_ended_upper_bound() {
        let csv = "jurisdiction,lower_bound,upper_bound,rate_percent\nGA,7000,,6.0";

        let records = TaxBracketLoader::parse(csv.as_bytes()).expect("Failed to parse CSV");

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].upper_bound, None);
        assert_eq!(records[0].lower_bound, dec!(7000));
        assert_eq!(records[0].rate_percent, dec!(6.0));
    }

    #[test]
    fn test_parse_all_jurisdictions() {
        let records = TaxBracketLoader::parse(BRACKETS_CSV.as_bytes()).expect("Failed to parse CSV");

        assert_eq!(records.len(), 14);
        assert_eq!(records.iter().filter(|r| r.jurisdiction == "GA").count(), 6);
        assert_eq!(records.iter().filter(|r| r.jurisdiction == "NY").count(), 8);
    }

    #[test]
    fn test_parse_preserves_file_order() {
        let records = TaxBracketLoader::parse(BRACKETS_CSV.as_bytes()).expect("Failed to parse CSV");

        let georgia_lowers: Vec<_> = records
            .iter()
            .filter(|r| r.jurisdiction == "GA")
            .map(|r| r.lower_bound)
            .collect();

        assert_eq!(
            georgia_lowers,
            vec![dec!(0), dec!(750), dec!(2250), dec!(3750), dec!(5250), dec!(7000)]
        );
    }

    #[test]
    fn test_parse_missing_column() {
        let csv = "jurisdiction,lower_bound\nGA,0";

        let result = TaxBracketLoader::parse(csv.as_bytes());

        let err = result.expect_err("Should fail for missing column");
        let LoaderError::CsvParse(msg) = err else {
            panic!("Expected CsvParse error, got: {:?}", err);
        };
        assert!(
            msg.contains("missing field"),
            "Expected 'missing field' in error, got: {}",
            msg
        );
    }

    #[test]
    fn test_parse_bad_decimal() {
        let csv = "jurisdiction,lower_bound,upper_bound,rate_percent\nGA,abc,750,1.0";

        let result = TaxBracketLoader::parse(csv.as_bytes());

        let err = result.expect_err("Should fail for invalid decimal");
        let LoaderError::CsvParse(msg) = err else {
            panic!("Expected CsvParse error, got: {:?}", err);
        };
        assert!(
            msg.to_lowercase().contains("invalid"),
            "Expected 'invalid' in error, got: {}",
            msg
        );
    }

    #[test]
    fn test_parse_empty_csv() {
        let csv = "jurisdiction,lower_bound,upper_bound,rate_percent\n";

        let records = TaxBracketLoader::parse(csv.as_bytes()).expect("Failed to parse CSV");

        assert!(records.is_empty());
    }

    #[test]
    fn test_parse_airports() {
        let csv = "code,lat,lon\nATL,33.64,-84.43\nJFK,40.64,-73.78";

        let records = AirportLoader::parse(csv.as_bytes()).expect("Failed to parse CSV");

        assert_eq!(records.len(), 2);
        assert_eq!(
            records[0],
            AirportRecord {
                code: "ATL".to_string(),
                lat: 33.64,
                lon: -84.43,
            }
        );
    }

    #[test]
    fn test_parse_airport_bad_coordinate() {
        let csv = "code,lat,lon\nATL,north,-84.43";

        let result = AirportLoader::parse(csv.as_bytes());

        let err = result.expect_err("Should fail for invalid latitude");
        let LoaderError::CsvParse(msg) = err else {
            panic!("Expected CsvParse error, got: {:?}", err);
        };
        assert!(
            msg.to_lowercase().contains("invalid"),
            "Expected 'invalid' in error, got: {}",
            msg
        );
    }

    #[test]
    fn test_parse_flights() {
        let csv = "flight_id,departure_code,arrival_code,departure_time,arrival_time\n\
                   1,ATL,JFK,09:30 AM - Mon Mar-03-2014,11:30 AM - Mon Mar-03-2014";

        let records = FlightScheduleLoader::parse(csv.as_bytes()).expect("Failed to parse CSV");

        assert_eq!(records.len(), 1);
        assert_eq!(
            records[0],
            FlightScheduleRecord {
                flight_id: 1,
                departure_code: "ATL".to_string(),
                arrival_code: "JFK".to_string(),
                departure_time: "09:30 AM - Mon Mar-03-2014".to_string(),
                arrival_time: "11:30 AM - Mon Mar-03-2014".to_string(),
            }
        );
    }

    #[test]
    fn test_parse_flight_missing_column() {
        let csv = "flight_id,departure_code,arrival_code\n1,ATL,JFK";

        let result = FlightScheduleLoader::parse(csv.as_bytes());

        let err = result.expect_err("Should fail for missing column");
        let LoaderError::CsvParse(msg) = err else {
            panic!("Expected CsvParse error, got: {:?}", err);
        };
        assert!(
            msg.contains("missing field"),
            "Expected 'missing field' in error, got: {}",
            msg
        );
    }
}

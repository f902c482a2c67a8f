//! Schedule timestamp parsing and flight-hour pay arithmetic.
//!
//! Feed timestamps look like `09:15 AM - Mon Mar-03-2014`, sometimes with a
//! trailing ` (runway)` marker added by the gate system. The marker carries
//! no timing information and is stripped before parsing.

use chrono::{Duration, NaiveDateTime};
use rust_decimal::Decimal;
use thiserror::Error;

/// Strftime pattern for schedule feed timestamps.
pub const SCHEDULE_TIMESTAMP_FORMAT: &str = "%I:%M %p - %a %b-%d-%Y";

/// Suffix appended by the gate system to runway-recorded times.
const RUNWAY_SUFFIX: &str = " (runway)";

/// Errors raised while turning feed timestamps into flight durations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ScheduleError {
    #[error("Invalid schedule timestamp '{text}'")]
    Parse {
        text: String,
        #[source]
        source: chrono::format::ParseError,
    },

    #[error("Arrival '{arrival}' is earlier than departure '{departure}'")]
    NegativeDuration {
        departure: NaiveDateTime,
        arrival: NaiveDateTime,
    },
}

/// Parses one schedule feed timestamp, tolerating the optional runway marker.
pub fn parse_schedule_timestamp(text: &str) -> Result<NaiveDateTime, ScheduleError> {
    let trimmed = text.trim();
    let trimmed = trimmed.strip_suffix(RUNWAY_SUFFIX).unwrap_or(trimmed);

    NaiveDateTime::parse_from_str(trimmed, SCHEDULE_TIMESTAMP_FORMAT).map_err(|source| {
        ScheduleError::Parse {
            text: text.to_string(),
            source,
        }
    })
}

/// Returns the elapsed time from departure to arrival.
///
/// A zero duration is accepted; an arrival before the departure means the
/// feed row is corrupt and the flight cannot be paid.
pub fn elapsed(
    departure: NaiveDateTime,
    arrival: NaiveDateTime,
) -> Result<Duration, ScheduleError> {
    let duration = arrival - departure;
    if duration < Duration::zero() {
        return Err(ScheduleError::NegativeDuration { departure, arrival });
    }
    Ok(duration)
}

/// Converts a flight duration to fractional hours as an exact decimal.
pub fn duration_hours(duration: Duration) -> Decimal {
    Decimal::from(duration.num_seconds()) / Decimal::from(3600)
}

/// Gross pay for a flight: total hours multiplied by the hourly rate.
pub fn gross_pay(duration: Duration, hourly_rate: Decimal) -> Decimal {
    duration_hours(duration) * hourly_rate
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    // =========================================================================
    // parse_schedule_timestamp tests
    // =========================================================================

    #[test]
    fn parse_accepts_plain_timestamp() {
        let result = parse_schedule_timestamp("09:15 AM - Mon Mar-03-2014").unwrap();

        assert_eq!(result.format("%Y-%m-%d %H:%M").to_string(), "2014-03-03 09:15");
    }

    #[test]
    fn parse_accepts_afternoon_timestamp() {
        let result = parse_schedule_timestamp("11:45 PM - Mon Mar-03-2014").unwrap();

        assert_eq!(result.format("%H:%M").to_string(), "23:45");
    }

    #[test]
    fn parse_strips_runway_marker() {
        let plain = parse_schedule_timestamp("09:15 AM - Mon Mar-03-2014").unwrap();
        let marked = parse_schedule_timestamp("09:15 AM - Mon Mar-03-2014 (runway)").unwrap();

        assert_eq!(marked, plain);
    }

    #[test]
    fn parse_tolerates_surrounding_whitespace() {
        let result = parse_schedule_timestamp("  09:15 AM - Mon Mar-03-2014  ").unwrap();

        assert_eq!(result.format("%H:%M").to_string(), "09:15");
    }

    #[test]
    fn parse_rejects_garbage() {
        let err = parse_schedule_timestamp("not a timestamp").unwrap_err();

        let ScheduleError::Parse { text, .. } = err else {
            panic!("expected a parse error, got {err:?}");
        };
        assert_eq!(text, "not a timestamp");
    }

    #[test]
    fn parse_rejects_twenty_four_hour_clock() {
        let result = parse_schedule_timestamp("21:15 - Mon Mar-03-2014");

        assert!(result.is_err());
    }

    // =========================================================================
    // elapsed tests
    // =========================================================================

    #[test]
    fn elapsed_returns_positive_duration() {
        let departure = parse_schedule_timestamp("09:15 AM - Mon Mar-03-2014").unwrap();
        let arrival = parse_schedule_timestamp("11:45 AM - Mon Mar-03-2014").unwrap();

        let result = elapsed(departure, arrival).unwrap();

        assert_eq!(result, Duration::minutes(150));
    }

    #[test]
    fn elapsed_accepts_zero_duration() {
        let timestamp = parse_schedule_timestamp("09:15 AM - Mon Mar-03-2014").unwrap();

        let result = elapsed(timestamp, timestamp).unwrap();

        assert_eq!(result, Duration::zero());
    }

    #[test]
    fn elapsed_spans_midnight() {
        let departure = parse_schedule_timestamp("11:30 PM - Mon Mar-03-2014").unwrap();
        let arrival = parse_schedule_timestamp("01:30 AM - Tue Mar-04-2014").unwrap();

        let result = elapsed(departure, arrival).unwrap();

        assert_eq!(result, Duration::hours(2));
    }

    #[test]
    fn elapsed_rejects_arrival_before_departure() {
        let departure = parse_schedule_timestamp("09:15 AM - Mon Mar-03-2014").unwrap();
        let arrival = parse_schedule_timestamp("08:00 AM - Mon Mar-03-2014").unwrap();

        let result = elapsed(departure, arrival);

        assert_eq!(
            result,
            Err(ScheduleError::NegativeDuration { departure, arrival })
        );
    }

    // =========================================================================
    // pay arithmetic tests
    // =========================================================================

    #[test]
    fn duration_hours_is_exact_for_half_hours() {
        let result = duration_hours(Duration::minutes(150));

        assert_eq!(result, dec!(2.5));
    }

    #[test]
    fn duration_hours_handles_seconds_precision() {
        let result = duration_hours(Duration::seconds(5400));

        assert_eq!(result, dec!(1.5));
    }

    #[test]
    fn gross_pay_multiplies_hours_by_rate() {
        let result = gross_pay(Duration::minutes(150), dec!(58.73));

        assert_eq!(result, dec!(146.825));
    }

    #[test]
    fn gross_pay_for_zero_duration_is_zero() {
        let result = gross_pay(Duration::zero(), dec!(58.73));

        assert_eq!(result, dec!(0));
    }
}

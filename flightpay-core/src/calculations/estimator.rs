//! Flight-by-flight pay and tax estimation.
//!
//! The estimator walks a batch of flights strictly in order. For each flight
//! it parses the schedule timestamps, samples the route into waypoints,
//! apportions gross pay evenly across them, taxes each slice at its resolved
//! jurisdiction's rate, and then prices the same gross under a randomly drawn
//! home state for comparison. A flight that cannot be priced is skipped with
//! a reason; the batch keeps going.

use std::sync::Arc;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rust_decimal::Decimal;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::calculations::geodesy::{self, GeodesyError};
use crate::calculations::schedule::{self, ScheduleError};
use crate::calculations::tax_engine::TaxEngine;
use crate::db::{FlightRepository, RepositoryError};
use crate::models::{Airport, BatchOutcome, Flight, FlightEstimate, PayBreakdown, SkippedFlight};
use crate::resolve::JurisdictionResolver;

/// Tunable inputs for a batch run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EstimatorConfig {
    /// Pay per flight hour, in dollars.
    pub hourly_rate: Decimal,
    /// Annual income used for bracket selection.
    pub annual_income: Decimal,
    /// Waypoints sampled per route, endpoints included.
    pub waypoint_count: usize,
    /// Maximum flights fetched per batch.
    pub batch_limit: u32,
}

impl Default for EstimatorConfig {
    fn default() -> Self {
        Self {
            hourly_rate: Decimal::new(5873, 2),
            annual_income: Decimal::from(100_000),
            waypoint_count: 30,
            batch_limit: 100,
        }
    }
}

impl EstimatorConfig {
    pub fn validate(&self) -> Result<(), EstimatorConfigError> {
        if self.waypoint_count < 2 {
            return Err(EstimatorConfigError::WaypointCount(self.waypoint_count));
        }
        if self.hourly_rate <= Decimal::ZERO {
            return Err(EstimatorConfigError::HourlyRate(self.hourly_rate));
        }
        if self.annual_income < Decimal::ZERO {
            return Err(EstimatorConfigError::AnnualIncome(self.annual_income));
        }
        if self.batch_limit == 0 {
            return Err(EstimatorConfigError::BatchLimit);
        }
        Ok(())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum EstimatorConfigError {
    #[error("Waypoint count must be at least 2, got {0}")]
    WaypointCount(usize),

    #[error("Hourly rate must be positive, got {0}")]
    HourlyRate(Decimal),

    #[error("Annual income must not be negative, got {0}")]
    AnnualIncome(Decimal),

    #[error("Batch limit must be at least 1")]
    BatchLimit,
}

/// Why a single flight could not be priced.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EstimateError {
    #[error("Configuration error: {0}")]
    Configuration(#[from] EstimatorConfigError),

    #[error("Schedule error: {0}")]
    Schedule(#[from] ScheduleError),

    #[error("Route error: {0}")]
    Geodesy(#[from] GeodesyError),

    #[error("Unknown airport code '{0}'")]
    UnknownAirport(String),

    #[error("No jurisdictions resolved yet")]
    NoJurisdictionsSeen,

    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),
}

/// Strategy for drawing the home state used in the baseline comparison.
///
/// `seen` is the sorted list of jurisdictions resolved so far. Returning
/// `None` means no baseline can be drawn for this flight.
pub trait HomeStatePicker: Send + Sync {
    fn pick(&mut self, seen: &[&str]) -> Option<String>;
}

/// Draws uniformly at random from the jurisdictions seen so far.
pub struct UniformPicker {
    rng: StdRng,
}

impl UniformPicker {
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// A picker with a fixed seed, for reproducible runs.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for UniformPicker {
    fn default() -> Self {
        Self::new()
    }
}

impl HomeStatePicker for UniformPicker {
    fn pick(&mut self, seen: &[&str]) -> Option<String> {
        seen.choose(&mut self.rng).map(|name| name.to_string())
    }
}

/// Orchestrates batch pay estimation over a flight repository and a
/// jurisdiction resolver.
pub struct FlightEstimator {
    repository: Arc<dyn FlightRepository>,
    resolver: Box<dyn JurisdictionResolver>,
    picker: Box<dyn HomeStatePicker>,
    engine: TaxEngine,
    config: EstimatorConfig,
}

impl FlightEstimator {
    pub fn new(
        repository: Arc<dyn FlightRepository>,
        resolver: Box<dyn JurisdictionResolver>,
        config: EstimatorConfig,
    ) -> Result<Self, EstimateError> {
        config.validate()?;
        let engine = TaxEngine::new(repository.clone());
        Ok(Self {
            repository,
            resolver,
            picker: Box::new(UniformPicker::new()),
            engine,
            config,
        })
    }

    /// Replaces the default random home-state picker.
    pub fn with_picker(mut self, picker: Box<dyn HomeStatePicker>) -> Self {
        self.picker = picker;
        self
    }

    /// Fetches the next batch of flights and estimates each one in order.
    pub async fn run(&mut self) -> Result<BatchOutcome, EstimateError> {
        let flights = self.repository.flights(self.config.batch_limit).await?;
        info!(count = flights.len(), "Estimating pay for flight batch");
        Ok(self.estimate_batch(flights).await)
    }

    /// Estimates each flight, collecting failures as skips instead of
    /// aborting the batch.
    pub async fn estimate_batch(&mut self, flights: Vec<Flight>) -> BatchOutcome {
        let mut outcome = BatchOutcome::default();
        for flight in flights {
            let flight_id = flight.flight_id;
            match self.estimate_flight(&flight).await {
                Ok(estimate) => outcome.estimates.push(estimate),
                Err(error) => {
                    warn!(flight_id, %error, "Skipping flight");
                    outcome.skipped.push(SkippedFlight {
                        flight_id,
                        reason: error.to_string(),
                    });
                }
            }
        }
        outcome
    }

    async fn estimate_flight(&mut self, flight: &Flight) -> Result<FlightEstimate, EstimateError> {
        let departure = schedule::parse_schedule_timestamp(&flight.departure_time)?;
        let arrival = schedule::parse_schedule_timestamp(&flight.arrival_time)?;
        let duration = schedule::elapsed(departure, arrival)?;

        let origin = self.airport(&flight.departure_code).await?;
        let destination = self.airport(&flight.arrival_code).await?;

        let distance_miles = geodesy::distance(origin.coordinate(), destination.coordinate());
        let waypoints = geodesy::interpolate(
            origin.coordinate(),
            destination.coordinate(),
            self.config.waypoint_count,
        )?;

        let hours = schedule::duration_hours(duration);
        let gross_pay = schedule::gross_pay(duration, self.config.hourly_rate);
        let per_waypoint = gross_pay / Decimal::from(waypoints.len() as u64);

        let mut total_tax = Decimal::ZERO;
        for waypoint in &waypoints {
            let jurisdiction = self.resolver.resolve(*waypoint).await;
            let rate = self
                .engine
                .rate_for(jurisdiction.as_deref(), self.config.annual_income)
                .await;
            total_tax += per_waypoint * rate;
        }

        // The home-state draw happens after this flight's own waypoints have
        // been resolved, so they are part of the candidate pool.
        let baseline_tax = match self.baseline_tax(gross_pay).await {
            Ok(tax) => Some(tax),
            Err(EstimateError::NoJurisdictionsSeen) => {
                warn!(
                    flight_id = flight.flight_id,
                    "No jurisdictions resolved yet, skipping the home-state baseline"
                );
                None
            }
            Err(other) => return Err(other),
        };

        debug!(
            flight_id = flight.flight_id,
            %gross_pay,
            %total_tax,
            "Estimated flight"
        );

        Ok(FlightEstimate {
            flight_id: flight.flight_id,
            departure_code: flight.departure_code.clone(),
            arrival_code: flight.arrival_code.clone(),
            distance_miles,
            hours,
            breakdown: PayBreakdown::new(gross_pay, total_tax, baseline_tax),
        })
    }

    async fn airport(&self, code: &str) -> Result<Airport, EstimateError> {
        match self.repository.airport(code).await {
            Ok(airport) => Ok(airport),
            Err(RepositoryError::NotFound) => Err(EstimateError::UnknownAirport(code.to_string())),
            Err(other) => Err(EstimateError::Repository(other)),
        }
    }

    async fn baseline_tax(&mut self, gross_pay: Decimal) -> Result<Decimal, EstimateError> {
        let seen = self.engine.cache().jurisdictions();
        let home = self
            .picker
            .pick(&seen)
            .ok_or(EstimateError::NoJurisdictionsSeen)?;

        let rate = self
            .engine
            .rate_for(Some(&home), self.config.annual_income)
            .await;
        Ok(gross_pay * rate)
    }
}

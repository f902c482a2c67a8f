//! Jurisdiction tax-rate resolution backed by a process-lifetime cache.
//!
//! Each jurisdiction is resolved against the bracket store at most once per
//! process. The first resolved rate is reused for every later waypoint that
//! lands in the same jurisdiction, even when the query income differs, so a
//! batch sees one consistent rate per state.

use std::collections::HashMap;
use std::sync::Arc;

use rust_decimal::Decimal;
use tracing::warn;

use crate::db::FlightRepository;
use crate::models::TaxBracket;

/// Process-lifetime cache of resolved jurisdiction rates.
///
/// Writes are first-come: once a jurisdiction has a rate, later inserts for
/// the same key are ignored.
#[derive(Debug, Default)]
pub struct JurisdictionRateCache {
    rates: HashMap<String, Decimal>,
}

impl JurisdictionRateCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, jurisdiction: &str) -> Option<Decimal> {
        self.rates.get(jurisdiction).copied()
    }

    /// Records a resolved rate. The first write for a jurisdiction wins.
    pub fn insert(&mut self, jurisdiction: &str, rate: Decimal) {
        self.rates.entry(jurisdiction.to_string()).or_insert(rate);
    }

    /// Jurisdictions resolved so far, in sorted order.
    pub fn jurisdictions(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.rates.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn is_empty(&self) -> bool {
        self.rates.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rates.len()
    }
}

/// Picks the bracket that applies to `annual_income`.
///
/// A bracket qualifies when its lower bound is strictly below the income;
/// upper bounds are not consulted. Among several qualifying brackets the
/// last one in stored order wins, which for brackets stored in ascending
/// lower-bound order is the marginal bracket. This function is the single
/// owner of that matching policy.
pub fn select_bracket(brackets: &[TaxBracket], annual_income: Decimal) -> Option<&TaxBracket> {
    brackets
        .iter()
        .filter(|bracket| bracket.lower_bound < annual_income)
        .last()
}

/// Resolves effective tax rates per jurisdiction, caching each resolution
/// for the life of the process.
pub struct TaxEngine {
    repository: Arc<dyn FlightRepository>,
    cache: JurisdictionRateCache,
}

impl TaxEngine {
    pub fn new(repository: Arc<dyn FlightRepository>) -> Self {
        Self {
            repository,
            cache: JurisdictionRateCache::new(),
        }
    }

    /// Returns the effective rate (a fraction, not a percentage) for a
    /// jurisdiction at the given annual income.
    ///
    /// An unresolved position yields a zero rate and leaves the cache
    /// untouched. A jurisdiction with no qualifying bracket, or whose
    /// bracket lookup fails, resolves to zero and is cached like any other
    /// result so the store is not retried for it.
    pub async fn rate_for(&mut self, jurisdiction: Option<&str>, annual_income: Decimal) -> Decimal {
        let Some(jurisdiction) = jurisdiction else {
            return Decimal::ZERO;
        };

        if let Some(rate) = self.cache.get(jurisdiction) {
            return rate;
        }

        let brackets = match self.repository.tax_brackets(jurisdiction).await {
            Ok(brackets) => brackets,
            Err(error) => {
                warn!(jurisdiction, %error, "Tax bracket lookup failed, using a zero rate");
                Vec::new()
            }
        };

        let rate = select_bracket(&brackets, annual_income)
            .map(|bracket| bracket.rate_percent / Decimal::from(100))
            .unwrap_or(Decimal::ZERO);

        self.cache.insert(jurisdiction, rate);
        rate
    }

    pub fn cache(&self) -> &JurisdictionRateCache {
        &self.cache
    }
}

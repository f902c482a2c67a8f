//! Pay and tax calculation modules.
//!
//! Each module owns one stage of the estimation pipeline:
//!
//! - [`schedule`] turns feed timestamps into flight hours and gross pay
//! - [`geodesy`] measures and samples the route between airports
//! - [`tax_engine`] resolves per-jurisdiction tax rates with caching
//! - [`estimator`] drives the batch and assembles pay breakdowns

pub mod common;
pub mod estimator;
pub mod geodesy;
pub mod schedule;
pub mod tax_engine;

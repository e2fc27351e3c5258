//! # Portfolio Analytics
//!
//! This crate holds the valuation and performance-aggregation rules of the
//! portfolio tracker. It is the only part of the system with non-trivial
//! arithmetic.
//!
//! ## Architectural Principles
//!
//! - **Pure Logic:** No knowledge of storage, HTTP or quote providers. It depends
//!   only on `core-types`.
//! - **Stateless Calculation:** Every operation takes plain records as input and
//!   returns a new value. Nothing is cached between calls.
//! - **Explicit Zero Conventions:** Divisions whose denominator can legitimately be
//!   zero (portfolio cost, series base value) yield 0%. A zero purchase price is
//!   never legitimate and is reported as `AnalyticsError::DivisionUndefined`.
//!
//! ## Public API
//!
//! - `revalue`: recomputes an asset's derived fields at a new price.
//! - `summarize`: totals and per-type allocation across a set of assets.
//! - `build_performance`: normalized per-asset and portfolio-wide series.
//! - `AnalyticsError`: the specific error types that can be returned from this crate.

// Declare the modules that constitute this crate.
pub mod aggregator;
pub mod error;
pub mod report;
pub mod series;
mod util;
pub mod valuation;

// Re-export the key components to create a clean, public-facing API.
pub use aggregator::summarize;
pub use error::AnalyticsError;
pub use report::{AllocationEntry, AssetPerformance, PerformancePoint, PortfolioPerformance, Summary};
pub use series::build_performance;
pub use valuation::revalue;

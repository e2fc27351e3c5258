//! # Portfolio Engine
//!
//! The orchestration layer between the REST API / CLI and the rest of the
//! workspace. `PortfolioService` owns a `DbRepository` and a `QuoteSource`, both
//! passed in by the caller, and implements every user-facing operation as one
//! explicit transaction:
//!
//! - create, read, partially update and delete assets,
//! - list assets together with the portfolio summary,
//! - best-effort batch price refresh with a per-asset outcome,
//! - performance series over a date range.

pub mod error;
pub mod refresh;
pub mod service;

#[cfg(test)]
mod testing;

pub use error::EngineError;
pub use refresh::{PriceRefreshReport, RefreshOutcome, RefreshStatus};
pub use service::{AssetList, Page, PortfolioService};

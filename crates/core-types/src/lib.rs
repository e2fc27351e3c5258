//! # Core Types
//!
//! The shared vocabulary of the portfolio tracker: the `Asset` holding record,
//! its append-only `PriceSnapshot` history, and the request shapes used to
//! create and partially update holdings.
//!
//! This crate has no knowledge of storage, HTTP or quote providers. Every other
//! crate in the workspace depends on it.

pub mod asset;
pub mod error;
pub mod snapshot;

// Re-export the core types to provide a clean public API.
pub use asset::{Asset, AssetUpdate, NewAsset};
pub use error::CoreError;
pub use snapshot::{NewPriceSnapshot, PriceSnapshot};

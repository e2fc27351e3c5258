//! # Portfolio Database Crate
//!
//! This crate is the asset ledger's storage adapter: it persists holdings and
//! their price history in SQLite.
//!
//! ## Architectural Principles
//!
//! - **Adapter:** Encapsulates all SQL. The rest of the application works with
//!   `core_types::Asset` and `core_types::PriceSnapshot` only.
//! - **Explicit Transactions:** `DbRepository::begin` opens a transaction and every
//!   data access function takes the connection it should run on. Callers decide
//!   the unit of work; there is no ambient session.
//! - **Exact Numbers:** Decimal columns are stored as TEXT so no precision is lost
//!   on the way through the database.
//!
//! ## Public API
//!
//! - `connect` / `connect_in_memory`: establish the connection pool.
//! - `run_migrations`: apply the embedded schema migrations.
//! - `DbRepository`: holds the pool and hands out transactions.
//! - `repository::*`: the asset and price history queries.
//! - `DbError`: the specific error types that can be returned from this crate.

// Declare the modules that constitute this crate.
pub mod connection;
pub mod error;
pub mod repository;
mod rows;

// Re-export the key components to create a clean, public-facing API.
pub use connection::{connect, connect_in_memory, run_migrations};
pub use error::DbError;
pub use repository::DbRepository;
pub use sqlx::{SqliteConnection, SqlitePool};

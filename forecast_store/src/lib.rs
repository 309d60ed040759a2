//! SQLite-backed analytical store for the stock forecast pipeline.
//!
//! The store owns its schema (embedded migrations), the transactional
//! loader for daily price batches, and the per-series forecasting
//! primitive (train + predict). All access goes through [`Store`], which
//! opens a fresh, scoped connection per stage call.

#![deny(missing_docs)]

pub mod db;
pub mod forecast;
pub mod load;
mod models;
pub mod predict;
pub mod schema;
pub mod store;
pub mod train;

pub use store::Store;

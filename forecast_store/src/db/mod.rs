//! Connection and schema-migration utilities.
//!
//! - [`connection::connect_sqlite`] opens a connection with WAL,
//!   foreign_keys=ON, and a 5000ms busy_timeout applied.
//! - [`migrate::run`] applies the crate's embedded Diesel migrations;
//!   calling it on an up-to-date database is a no-op, which is what makes
//!   the loader's provisioning step idempotent.

pub mod connection;
pub mod migrate;

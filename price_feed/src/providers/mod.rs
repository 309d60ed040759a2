//! Provider abstraction for daily time-series sources.
//!
//! This module defines the [`SeriesProvider`] trait, a unified interface for
//! fetching one symbol's raw daily series from any market data vendor.
//! Each concrete implementation (currently Alpha Vantage) handles its own
//! wire format, credentials, and rate limits behind this trait.
//!
//! The trait is async and object-safe, so the pipeline can hold a
//! `dyn SeriesProvider` and tests can substitute a stub:
//!
//! ```rust
//! use async_trait::async_trait;
//! use price_feed::models::series::DailySeries;
//! use price_feed::providers::{ProviderError, SeriesProvider};
//!
//! struct MyProvider;
//!
//! #[async_trait]
//! impl SeriesProvider for MyProvider {
//!     async fn fetch_daily(
//!         &self,
//!         _symbol: &str,
//!     ) -> Result<Option<DailySeries>, ProviderError> {
//!         Ok(None)
//!     }
//! }
//! ```

pub mod alpha_vantage;

use async_trait::async_trait;
use shared_utils::env::MissingEnvVarError;
use snafu::{Backtrace, Snafu};

use crate::models::series::DailySeries;

/// Trait for fetching one symbol's raw daily series from a data vendor.
///
/// The contract is one attempt per call; retry policy, if any, belongs to
/// the caller. `Ok(None)` means the provider answered but had no series for
/// the symbol, which is a normal outcome, not an error.
#[async_trait]
pub trait SeriesProvider {
    /// Fetches the daily series for `symbol`.
    ///
    /// # Returns
    ///
    /// * `Ok(Some(series))` - the provider returned a (possibly partial) series.
    /// * `Ok(None)` - valid response without the time-series payload.
    /// * `Err(error)` - the request or decode failed.
    async fn fetch_daily(&self, symbol: &str) -> Result<Option<DailySeries>, ProviderError>;
}

/// Errors that can occur while constructing a provider instance.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum ProviderInitError {
    /// A required environment variable is not set.
    #[snafu(display("Missing environment variable: {source}"))]
    MissingEnvVar {
        source: MissingEnvVarError,
        backtrace: Backtrace,
    },

    /// The HTTP client could not be built.
    #[snafu(display("Failed to build HTTP client: {source}"))]
    ClientBuild {
        source: reqwest::Error,
        backtrace: Backtrace,
    },
}

/// Errors that can occur inside a [`SeriesProvider`] implementation.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum ProviderError {
    /// An error during the API request (network failure, timeout, bad payload).
    #[snafu(display("API request failed: {source}"))]
    Reqwest {
        source: reqwest::Error,
        backtrace: Backtrace,
    },

    /// The provider's API returned an explicit error message.
    #[snafu(display("API error: {message}"))]
    Api {
        message: String,
        backtrace: Backtrace,
    },
}

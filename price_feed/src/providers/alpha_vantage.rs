//! Alpha Vantage `TIME_SERIES_DAILY` provider.

pub mod provider;
pub mod response;

pub use provider::AlphaVantageProvider;

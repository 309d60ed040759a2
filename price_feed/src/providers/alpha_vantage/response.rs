//! Typed wire model for the Alpha Vantage daily endpoint.
//!
//! The endpoint reports problems in-band: a payload without
//! `"Time Series (Daily)"` but with `"Note"` or `"Information"` is a
//! throttle notice, and `"Error Message"` is a request-level failure. All
//! four fields are decoded explicitly so callers never probe raw JSON keys.

use indexmap::IndexMap;
use serde::Deserialize;

/// One day's OHLCV entry. Alpha Vantage sends every value as a string.
#[derive(Deserialize, Debug)]
pub struct DailyEntry {
    #[serde(rename = "1. open")]
    pub open: String,
    #[serde(rename = "2. high")]
    pub high: String,
    #[serde(rename = "3. low")]
    pub low: String,
    #[serde(rename = "4. close")]
    pub close: String,
    #[serde(rename = "5. volume")]
    pub volume: String,
}

/// Top-level response of `function=TIME_SERIES_DAILY`.
#[derive(Deserialize, Debug)]
pub struct DailyResponse {
    /// Date-keyed series, newest first. Absent on any non-data response.
    #[serde(rename = "Time Series (Daily)")]
    pub time_series: Option<IndexMap<String, DailyEntry>>,

    /// Present when the request itself was rejected (unknown symbol, bad key).
    #[serde(rename = "Error Message")]
    pub error_message: Option<String>,

    /// Throttle notice on the legacy free tier.
    #[serde(rename = "Note")]
    pub note: Option<String>,

    /// Throttle/plan notice on current free keys.
    #[serde(rename = "Information")]
    pub information: Option<String>,
}

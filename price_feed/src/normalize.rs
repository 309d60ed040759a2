//! Normalize stage: flatten raw series into [`PriceRecord`]s, drop
//! unparseable records, and cap the batch size.

use chrono::NaiveDate;
use thiserror::Error;

use crate::models::{
    record::PriceRecord,
    series::{DailySeries, RawQuote},
};

/// Default cap on records handed to the loader per run. Bounds the cost of
/// the downstream forecasting call; configurable via the run config.
pub const DEFAULT_MAX_BATCH: usize = 180;

/// A raw record that could not be coerced into a [`PriceRecord`].
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("bad date `{value}`: {source}")]
    BadDate {
        value: String,
        source: chrono::ParseError,
    },

    #[error("bad {field} value `{value}`: {source}")]
    BadNumber {
        field: &'static str,
        value: String,
        source: std::num::ParseFloatError,
    },
}

/// Flattens raw series into a bounded, loader-ready batch.
///
/// Emits one record per (symbol, date) entry, symbol-major in the order the
/// fetch stage produced, dates in provider order within each symbol. Records
/// that fail to parse are dropped with a warning; empty series are skipped.
/// The result is truncated to the first `max_records` entries.
pub fn normalize(raw: &[DailySeries], max_records: usize) -> Vec<PriceRecord> {
    let mut batch = Vec::new();
    let mut dropped = 0usize;

    for series in raw {
        if series.quotes.is_empty() {
            tracing::warn!(symbol = %series.symbol, "empty daily series, skipping symbol");
            continue;
        }

        for (date, quote) in &series.quotes {
            match parse_record(&series.symbol, date, quote) {
                Ok(record) => batch.push(record),
                Err(error) => {
                    dropped += 1;
                    tracing::warn!(
                        symbol = %series.symbol,
                        %date,
                        %error,
                        "dropping unparseable record"
                    );
                }
            }
        }
    }

    if dropped > 0 {
        tracing::info!(dropped, "records rejected during normalization");
    }

    if batch.len() > max_records {
        tracing::info!(
            kept = max_records,
            truncated = batch.len() - max_records,
            "batch over cap, truncating"
        );
        batch.truncate(max_records);
    }

    batch
}

fn parse_record(symbol: &str, date: &str, quote: &RawQuote) -> Result<PriceRecord, ParseError> {
    let date = NaiveDate::parse_from_str(date, "%Y-%m-%d").map_err(|source| {
        ParseError::BadDate {
            value: date.to_string(),
            source,
        }
    })?;

    Ok(PriceRecord {
        symbol: symbol.to_string(),
        date,
        open: parse_field("open", &quote.open)?,
        high: parse_field("high", &quote.high)?,
        low: parse_field("low", &quote.low)?,
        close: parse_field("close", &quote.close)?,
        volume: parse_field("volume", &quote.volume)?,
    })
}

fn parse_field(field: &'static str, value: &str) -> Result<f64, ParseError> {
    value.parse().map_err(|source| ParseError::BadNumber {
        field,
        value: value.to_string(),
        source,
    })
}

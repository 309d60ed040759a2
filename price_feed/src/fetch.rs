//! Fetch stage: one provider call per configured symbol, with per-symbol
//! failure isolation.

use crate::{models::series::DailySeries, providers::SeriesProvider};

/// Fetches the daily series for every symbol, one attempt each.
///
/// A symbol that errors or comes back empty is logged and dropped; the
/// remaining symbols still go through. The output keeps the order of
/// `symbols`, so downstream stages see a deterministic, symbol-major batch.
pub async fn fetch_all(provider: &dyn SeriesProvider, symbols: &[String]) -> Vec<DailySeries> {
    let mut out = Vec::with_capacity(symbols.len());

    for symbol in symbols {
        match provider.fetch_daily(symbol).await {
            Ok(Some(series)) => {
                tracing::info!(%symbol, days = series.quotes.len(), "fetched daily series");
                out.push(series);
            }
            Ok(None) => {
                tracing::warn!(%symbol, "no daily series for symbol");
            }
            Err(error) => {
                tracing::error!(%symbol, %error, "fetch failed, continuing with remaining symbols");
            }
        }
    }

    out
}

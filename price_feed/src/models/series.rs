//! Raw per-symbol daily series as handed from the fetch stage to the
//! normalize stage.

use indexmap::IndexMap;

/// One day's OHLCV values exactly as the provider sent them.
///
/// Values stay unparsed strings on purpose: coercion (and per-record
/// rejection of garbage) is the normalize stage's job, not the fetcher's.
#[derive(Debug, Clone, PartialEq)]
pub struct RawQuote {
    /// Opening price, provider-native.
    pub open: String,
    /// High price, provider-native.
    pub high: String,
    /// Low price, provider-native.
    pub low: String,
    /// Closing price, provider-native.
    pub close: String,
    /// Volume, provider-native.
    pub volume: String,
}

/// A complete raw daily series for a single symbol.
///
/// `quotes` is keyed by the provider's date string and preserves the
/// provider's ordering, which the normalizer relies on when truncating.
#[derive(Debug, Clone, PartialEq)]
pub struct DailySeries {
    /// The symbol this series describes.
    pub symbol: String,
    /// Date-keyed raw quotes in provider order.
    pub quotes: IndexMap<String, RawQuote>,
}

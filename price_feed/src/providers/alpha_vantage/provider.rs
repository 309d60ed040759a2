use std::time::Duration;

use async_trait::async_trait;
use governor::{DefaultDirectRateLimiter, Quota, RateLimiter};
use nonzero_ext::nonzero;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use shared_utils::env::get_env_var;
use snafu::ResultExt;

use crate::{
    models::series::{DailySeries, RawQuote},
    providers::{
        ApiSnafu, ClientBuildSnafu, MissingEnvVarSnafu, ProviderError, ProviderInitError,
        ReqwestSnafu, SeriesProvider,
        alpha_vantage::response::DailyResponse,
    },
};

const BASE_URL: &str = "https://www.alphavantage.co/query";

/// Environment variable holding the API key.
pub const API_KEY_ENV: &str = "ALPHA_VANTAGE_API_KEY";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Alpha Vantage REST provider for daily series.
pub struct AlphaVantageProvider {
    client: Client,
    api_key: SecretString,
    limiter: DefaultDirectRateLimiter,
}

impl AlphaVantageProvider {
    /// Creates a new Alpha Vantage provider.
    ///
    /// Reads the API key from the `ALPHA_VANTAGE_API_KEY` environment
    /// variable.
    pub fn new() -> Result<Self, ProviderInitError> {
        let api_key =
            SecretString::new(get_env_var(API_KEY_ENV).context(MissingEnvVarSnafu)?.into());
        Self::with_api_key(api_key)
    }

    /// Creates a provider with an explicit key (config files, tests).
    pub fn with_api_key(api_key: SecretString) -> Result<Self, ProviderInitError> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .context(ClientBuildSnafu)?;

        // Free-tier allowance; blocking here beats letting every call come
        // back as a throttle notice.
        let limiter = RateLimiter::direct(Quota::per_minute(nonzero!(5u32)));

        Ok(Self {
            client,
            api_key,
            limiter,
        })
    }
}

#[async_trait]
impl SeriesProvider for AlphaVantageProvider {
    async fn fetch_daily(&self, symbol: &str) -> Result<Option<DailySeries>, ProviderError> {
        self.limiter.until_ready().await;

        let query = [
            ("function", "TIME_SERIES_DAILY"),
            ("symbol", symbol),
            ("apikey", self.api_key.expose_secret()),
        ];

        let response = self
            .client
            .get(BASE_URL)
            .query(&query)
            .send()
            .await
            .context(ReqwestSnafu)?;

        if !response.status().is_success() {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown API error".to_string());
            return ApiSnafu { message }.fail();
        }

        let decoded = response
            .json::<DailyResponse>()
            .await
            .context(ReqwestSnafu)?;

        if let Some(message) = decoded.error_message {
            return ApiSnafu { message }.fail();
        }

        match decoded.time_series {
            Some(entries) if !entries.is_empty() => {
                let quotes = entries
                    .into_iter()
                    .map(|(date, entry)| {
                        (
                            date,
                            RawQuote {
                                open: entry.open,
                                high: entry.high,
                                low: entry.low,
                                close: entry.close,
                                volume: entry.volume,
                            },
                        )
                    })
                    .collect();

                Ok(Some(DailySeries {
                    symbol: symbol.to_string(),
                    quotes,
                }))
            }
            _ => {
                if let Some(notice) = decoded.note.or(decoded.information) {
                    tracing::warn!(symbol, %notice, "provider answered with a notice instead of data");
                }
                Ok(None)
            }
        }
    }
}

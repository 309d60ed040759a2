//! Run configuration: what the scheduler hands the pipeline each period.

use anyhow::Context;
use serde::Deserialize;

/// Per-run configuration. Immutable once a run starts.
///
/// Every field has a default matching the reference deployment, so an
/// empty TOML file (or none at all) is a valid configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PipelineConfig {
    /// Symbols to fetch, in fetch order.
    pub symbols: Vec<String>,

    /// Cap on records handed to the loader per run.
    pub max_batch_size: usize,

    /// Name the trained model is stored (and looked up) under.
    pub model_name: String,

    /// Forecast horizon, in days past the last observation.
    pub horizon_days: u32,

    /// Confidence level for the forecast bounds, in (0, 1).
    pub prediction_interval: f64,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            symbols: vec!["TTWO".to_string(), "GOOGL".to_string()],
            max_batch_size: price_feed::normalize::DEFAULT_MAX_BATCH,
            model_name: "predict_stock_price".to_string(),
            horizon_days: 7,
            prediction_interval: 0.95,
        }
    }
}

impl PipelineConfig {
    /// Reads and validates a TOML configuration file.
    pub fn from_toml_file(path: &str) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("reading config file {path}"))?;
        let config: Self = toml::from_str(&raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Rejects configurations no run could execute sensibly.
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.symbols.is_empty() {
            anyhow::bail!("symbols must not be empty");
        }
        if self.max_batch_size == 0 {
            anyhow::bail!("max_batch_size must be at least 1");
        }
        if self.horizon_days == 0 {
            anyhow::bail!("horizon_days must be at least 1");
        }
        if !(0.0 < self.prediction_interval && self.prediction_interval < 1.0) {
            anyhow::bail!(
                "prediction_interval must be inside (0, 1), got {}",
                self.prediction_interval
            );
        }
        Ok(())
    }
}

//! Pipeline orchestration: extract → transform → load → train → predict.
//!
//! The orchestrator owns sequencing and failure propagation only. Per-symbol
//! and per-record failures are absorbed inside their stages; a transaction,
//! training, or prediction failure halts the run. There is no cross-run
//! retry or checkpointing: the scheduler simply re-invokes the whole
//! pipeline on its next tick.

pub mod config;

use forecast_store::Store;
use forecast_store::load::{LoadError, LoadSummary};
use forecast_store::predict::{PredictError, PredictSummary};
use forecast_store::train::{TrainError, TrainSummary};
use price_feed::{fetch, normalize, providers::SeriesProvider};
use thiserror::Error;

use crate::config::PipelineConfig;

/// A stage failure that halts the run.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// The load transaction (or its provisioning) failed.
    #[error("load stage failed")]
    Load(#[from] LoadError),

    /// Training failed.
    #[error("train stage failed")]
    Train(#[from] TrainError),

    /// Prediction failed.
    #[error("predict stage failed")]
    Predict(#[from] PredictError),
}

/// Per-stage counts for one completed run.
#[derive(Debug, Clone, Copy)]
pub struct RunSummary {
    /// Symbols that yielded a series in the fetch stage.
    pub symbols_fetched: usize,
    /// Records in the batch handed to the loader.
    pub records_normalized: usize,
    /// Loader outcome.
    pub load: LoadSummary,
    /// Trainer outcome.
    pub train: TrainSummary,
    /// Predictor outcome.
    pub predict: PredictSummary,
}

/// Executes one full pipeline run.
///
/// Stages run strictly in order; each stage's output feeds the next. The
/// store is injected rather than wired globally, and every stage that
/// touches it opens and releases its own connection.
pub async fn run_pipeline(
    provider: &dyn SeriesProvider,
    store: &Store,
    config: &PipelineConfig,
) -> Result<RunSummary, PipelineError> {
    tracing::info!(symbols = ?config.symbols, "pipeline run starting");

    let raw = fetch::fetch_all(provider, &config.symbols).await;
    let symbols_fetched = raw.len();

    let batch = normalize::normalize(&raw, config.max_batch_size);
    let records_normalized = batch.len();

    let load = store.load(&batch)?;
    let train = store.train(&config.model_name)?;
    let predict = store.predict(
        &config.model_name,
        config.horizon_days,
        config.prediction_interval,
    )?;

    let summary = RunSummary {
        symbols_fetched,
        records_normalized,
        load,
        train,
        predict,
    };
    tracing::info!(
        symbols_fetched,
        records_normalized,
        rows_loaded = load.rows_loaded,
        rows_skipped = load.rows_skipped,
        series_trained = train.series_trained,
        forecast_rows = predict.forecast_rows,
        "pipeline run complete"
    );
    Ok(summary)
}

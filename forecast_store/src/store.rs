//! The store capability handed to the pipeline stages.
//!
//! Each stage call opens its own connection and releases it on every exit
//! path; nothing is shared or cached across stages.

use diesel::SqliteConnection;
use price_feed::models::record::PriceRecord;

use crate::db::{connection, migrate};
use crate::load::{self, LoadError, LoadSummary};
use crate::predict::{self, PredictError, PredictSummary};
use crate::train::{self, TrainError, TrainSummary};

/// Handle on one SQLite-backed store.
///
/// Cheap to construct; connections are opened per call.
#[derive(Debug, Clone)]
pub struct Store {
    database_url: String,
}

impl Store {
    /// Creates a store handle for the given SQLite URL or path.
    pub fn new(database_url: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
        }
    }

    /// The URL this store was created with.
    pub fn database_url(&self) -> &str {
        &self.database_url
    }

    /// Applies pending migrations. Safe to call repeatedly.
    pub fn provision(&self) -> anyhow::Result<()> {
        migrate::run(&self.database_url)
    }

    fn connect(&self) -> anyhow::Result<SqliteConnection> {
        connection::connect_sqlite(&self.database_url)
    }

    /// Provisions the schema, then loads `batch` in one transaction.
    pub fn load(&self, batch: &[PriceRecord]) -> Result<LoadSummary, LoadError> {
        self.provision().map_err(LoadError::Provision)?;
        let mut conn = self.connect().map_err(LoadError::Provision)?;
        load::load_batch(&mut conn, batch)
    }

    /// Trains per-series models from the view under `model_name`.
    pub fn train(&self, model_name: &str) -> Result<TrainSummary, TrainError> {
        let mut conn = self.connect().map_err(TrainError::Connection)?;
        train::train_model(&mut conn, model_name)
    }

    /// Materializes the forecast horizon and rebuilds the final table.
    pub fn predict(
        &self,
        model_name: &str,
        horizon_days: u32,
        prediction_interval: f64,
    ) -> Result<PredictSummary, PredictError> {
        let mut conn = self.connect().map_err(PredictError::Connection)?;
        predict::predict(&mut conn, model_name, horizon_days, prediction_interval)
    }
}

//! Forecast trainer: fits one linear-trend model per symbol from the
//! training view and persists the parameters under a model name.

use chrono::{NaiveDateTime, Utc};
use diesel::prelude::*;
use diesel::result::Error as DieselError;
use thiserror::Error;

use crate::forecast::{self, TrendFit};
use crate::models::ModelRow;
use crate::schema::{forecast_models, stock_prices_view};

/// Errors surfaced by the trainer. All of them are fatal to the run.
#[derive(Debug, Error)]
pub enum TrainError {
    /// The store connection could not be opened.
    #[error("store connection failed")]
    Connection(#[source] anyhow::Error),

    /// A read or write inside the training transaction failed.
    #[error("training transaction failed")]
    Db(#[from] DieselError),

    /// Every series was skipped; there is nothing to predict from.
    #[error("no series yielded a usable model for `{model_name}`")]
    NoUsableSeries {
        /// The model name the training run was asked to produce.
        model_name: String,
    },
}

/// Outcome of a training run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrainSummary {
    /// Series fitted and persisted.
    pub series_trained: usize,
    /// Series skipped (too short or degenerate), logged per series.
    pub series_skipped: usize,
}

/// Fits and persists per-symbol models from `stock_prices_view`.
///
/// Replaces any previous parameters stored under `model_name` in the same
/// transaction, so training is idempotent. Series that cannot be fitted
/// are skipped with a warning; a run where *no* series fits is an error.
/// Evaluation metrics per fitted series are emitted as log events.
pub fn train_model(conn: &mut SqliteConnection, model_name: &str) -> Result<TrainSummary, TrainError> {
    conn.immediate_transaction::<_, TrainError, _>(|conn| {
        let rows: Vec<(String, NaiveDateTime, f64)> = stock_prices_view::table
            .order((stock_prices_view::symbol.asc(), stock_prices_view::date.asc()))
            .load(conn)?;

        let trained_at = Utc::now().naive_utc();
        let mut fits: Vec<(String, NaiveDateTime, TrendFit)> = Vec::new();
        let mut skipped = 0usize;

        for (symbol, closes, last_date) in group_by_symbol(rows) {
            match forecast::fit_linear_trend(&closes) {
                Ok(fit) => {
                    let metrics = fit.metrics(&closes);
                    tracing::info!(
                        symbol = %symbol,
                        n_obs = fit.n_obs,
                        rmse = metrics.rmse,
                        mape = metrics.mape,
                        "series fitted"
                    );
                    fits.push((symbol, last_date, fit));
                }
                Err(error) => {
                    skipped += 1;
                    tracing::warn!(symbol = %symbol, %error, "skipping series");
                }
            }
        }

        if fits.is_empty() {
            return Err(TrainError::NoUsableSeries {
                model_name: model_name.to_string(),
            });
        }

        // Create-or-replace semantics for the named model.
        diesel::delete(
            forecast_models::table.filter(forecast_models::model_name.eq(model_name)),
        )
        .execute(conn)?;

        for (symbol, last_date, fit) in &fits {
            let row = ModelRow {
                model_name,
                symbol,
                intercept: fit.intercept,
                slope: fit.slope,
                resid_std: fit.resid_std,
                x_mean: fit.x_mean,
                x_sq_sum: fit.x_sq_sum,
                n_obs: fit.n_obs as i32,
                last_date: *last_date,
                trained_at,
            };
            diesel::insert_into(forecast_models::table)
                .values(&row)
                .execute(conn)?;
        }

        Ok(TrainSummary {
            series_trained: fits.len(),
            series_skipped: skipped,
        })
    })
}

/// Folds (symbol, date, close) rows, already sorted symbol-major, into one
/// (symbol, closes, last_date) entry per symbol.
fn group_by_symbol(
    rows: Vec<(String, NaiveDateTime, f64)>,
) -> Vec<(String, Vec<f64>, NaiveDateTime)> {
    let mut grouped: Vec<(String, Vec<f64>, NaiveDateTime)> = Vec::new();

    for (symbol, date, close) in rows {
        match grouped.last_mut() {
            Some((current, closes, last_date)) if *current == symbol => {
                closes.push(close);
                *last_date = date;
            }
            _ => grouped.push((symbol, vec![close], date)),
        }
    }

    grouped
}

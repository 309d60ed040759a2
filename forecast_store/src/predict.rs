//! Forecast predictor: materializes the horizon for a trained model and
//! rebuilds the final actuals-plus-forecast table.

use chrono::{Duration, NaiveDateTime};
use diesel::prelude::*;
use diesel::result::Error as DieselError;
use thiserror::Error;

use crate::forecast::{TrendFit, normal_quantile};
use crate::models::{FinalRow, ForecastRow, ModelParams};
use crate::schema::{
    forecast_models, stock_prices, stock_prices_forecast, stock_prices_with_forecast,
};

/// Errors surfaced by the predictor. All of them are fatal to the run.
#[derive(Debug, Error)]
pub enum PredictError {
    /// The store connection could not be opened.
    #[error("store connection failed")]
    Connection(#[source] anyhow::Error),

    /// A read or write inside the predict transaction failed.
    #[error("predict transaction failed")]
    Db(#[from] DieselError),

    /// No parameters are stored under the requested model name.
    #[error("no trained model named `{model_name}`")]
    MissingModel {
        /// The model name the predict run asked for.
        model_name: String,
    },

    /// The prediction interval is outside (0, 1).
    #[error("prediction interval must be inside (0, 1), got {value}")]
    InvalidInterval {
        /// The rejected interval value.
        value: f64,
    },
}

/// Outcome of a predict run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PredictSummary {
    /// Forecast points materialized into the intermediate table.
    pub forecast_rows: usize,
    /// Rows written to the final actuals-plus-forecast table.
    pub final_rows: usize,
}

/// Generates `horizon_days` forecast points per trained series and rebuilds
/// `stock_prices_with_forecast` as the union of historical actuals and
/// forecast rows, all inside one transaction.
///
/// There is no partial-success semantic: either both tables reflect this
/// run or neither does.
pub fn predict(
    conn: &mut SqliteConnection,
    model_name: &str,
    horizon_days: u32,
    prediction_interval: f64,
) -> Result<PredictSummary, PredictError> {
    if !(0.0 < prediction_interval && prediction_interval < 1.0) {
        return Err(PredictError::InvalidInterval {
            value: prediction_interval,
        });
    }
    let z = normal_quantile(0.5 * (1.0 + prediction_interval));

    conn.immediate_transaction::<_, PredictError, _>(|conn| {
        let models: Vec<ModelParams> = forecast_models::table
            .filter(forecast_models::model_name.eq(model_name))
            .order(forecast_models::symbol.asc())
            .select((
                forecast_models::symbol,
                forecast_models::intercept,
                forecast_models::slope,
                forecast_models::resid_std,
                forecast_models::x_mean,
                forecast_models::x_sq_sum,
                forecast_models::n_obs,
                forecast_models::last_date,
            ))
            .load(conn)?;

        if models.is_empty() {
            return Err(PredictError::MissingModel {
                model_name: model_name.to_string(),
            });
        }

        // Replace this model's previous horizon.
        diesel::delete(
            stock_prices_forecast::table
                .filter(stock_prices_forecast::model_name.eq(model_name)),
        )
        .execute(conn)?;

        let mut forecast_rows = 0usize;
        let mut forecasts: Vec<(String, NaiveDateTime, f64, f64, f64)> = Vec::new();

        for params in &models {
            let fit = TrendFit {
                intercept: params.intercept,
                slope: params.slope,
                resid_std: params.resid_std,
                x_mean: params.x_mean,
                x_sq_sum: params.x_sq_sum,
                n_obs: params.n_obs as usize,
            };

            for step in 1..=horizon_days {
                let date = params.last_date + Duration::days(i64::from(step));
                let point = fit.point(step, z);

                let row = ForecastRow {
                    model_name,
                    symbol: &params.symbol,
                    date,
                    forecast: point.forecast,
                    lower_bound: point.lower_bound,
                    upper_bound: point.upper_bound,
                };
                diesel::insert_into(stock_prices_forecast::table)
                    .values(&row)
                    .execute(conn)?;

                forecast_rows += 1;
                forecasts.push((
                    params.symbol.clone(),
                    date,
                    point.forecast,
                    point.lower_bound,
                    point.upper_bound,
                ));
            }
        }

        // Rebuild the final table: actuals first, then the horizon.
        diesel::delete(stock_prices_with_forecast::table).execute(conn)?;

        let actuals: Vec<(String, NaiveDateTime, f64)> = stock_prices::table
            .select((stock_prices::symbol, stock_prices::date, stock_prices::close))
            .order((stock_prices::symbol.asc(), stock_prices::date.asc()))
            .load(conn)?;

        let mut final_rows = 0usize;
        for (symbol, date, close) in &actuals {
            let row = FinalRow {
                symbol,
                date: *date,
                actual: Some(*close),
                forecast: None,
                lower_bound: None,
                upper_bound: None,
            };
            diesel::insert_into(stock_prices_with_forecast::table)
                .values(&row)
                .execute(conn)?;
            final_rows += 1;
        }

        for (symbol, date, forecast, lower, upper) in &forecasts {
            let row = FinalRow {
                symbol,
                date: *date,
                actual: None,
                forecast: Some(*forecast),
                lower_bound: Some(*lower),
                upper_bound: Some(*upper),
            };
            diesel::insert_into(stock_prices_with_forecast::table)
                .values(&row)
                .execute(conn)?;
            final_rows += 1;
        }

        tracing::info!(
            model_name,
            forecast_rows,
            final_rows,
            "forecast materialized"
        );

        Ok(PredictSummary {
            forecast_rows,
            final_rows,
        })
    })
}

//! Insertable/Queryable row structs used by the loader, trainer, and
//! predictor.

use chrono::{NaiveDateTime, NaiveTime};
use diesel::prelude::*;
use price_feed::models::record::PriceRecord;

use crate::schema::{
    forecast_models, stock_prices, stock_prices_forecast, stock_prices_with_forecast,
};

#[derive(Insertable, Debug)]
#[diesel(table_name = stock_prices)]
pub(crate) struct PriceRow<'a> {
    pub(crate) symbol: &'a str,
    pub(crate) date: NaiveDateTime,
    pub(crate) open: f64,
    pub(crate) high: f64,
    pub(crate) low: f64,
    pub(crate) close: f64,
    pub(crate) volume: f64,
}

impl<'a> From<&'a PriceRecord> for PriceRow<'a> {
    fn from(record: &'a PriceRecord) -> Self {
        Self {
            symbol: &record.symbol,
            // Calendar dates persist as midnight timestamps.
            date: record.date.and_time(NaiveTime::MIN),
            open: record.open,
            high: record.high,
            low: record.low,
            close: record.close,
            volume: record.volume,
        }
    }
}

#[derive(Insertable, Debug)]
#[diesel(table_name = forecast_models)]
pub(crate) struct ModelRow<'a> {
    pub(crate) model_name: &'a str,
    pub(crate) symbol: &'a str,
    pub(crate) intercept: f64,
    pub(crate) slope: f64,
    pub(crate) resid_std: f64,
    pub(crate) x_mean: f64,
    pub(crate) x_sq_sum: f64,
    pub(crate) n_obs: i32,
    pub(crate) last_date: NaiveDateTime,
    pub(crate) trained_at: NaiveDateTime,
}

/// Trained parameters read back for prediction. Field order matches the
/// predictor's explicit select.
#[derive(Queryable, Debug)]
pub(crate) struct ModelParams {
    pub(crate) symbol: String,
    pub(crate) intercept: f64,
    pub(crate) slope: f64,
    pub(crate) resid_std: f64,
    pub(crate) x_mean: f64,
    pub(crate) x_sq_sum: f64,
    pub(crate) n_obs: i32,
    pub(crate) last_date: NaiveDateTime,
}

#[derive(Insertable, Debug)]
#[diesel(table_name = stock_prices_forecast)]
pub(crate) struct ForecastRow<'a> {
    pub(crate) model_name: &'a str,
    pub(crate) symbol: &'a str,
    pub(crate) date: NaiveDateTime,
    pub(crate) forecast: f64,
    pub(crate) lower_bound: f64,
    pub(crate) upper_bound: f64,
}

#[derive(Insertable, Debug)]
#[diesel(table_name = stock_prices_with_forecast)]
pub(crate) struct FinalRow<'a> {
    pub(crate) symbol: &'a str,
    pub(crate) date: NaiveDateTime,
    pub(crate) actual: Option<f64>,
    pub(crate) forecast: Option<f64>,
    pub(crate) lower_bound: Option<f64>,
    pub(crate) upper_bound: Option<f64>,
}

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use diesel::prelude::*;
use forecast_store::Store;
use indexmap::IndexMap;
use price_feed::models::series::{DailySeries, RawQuote};
use price_feed::providers::{ApiSnafu, ProviderError, SeriesProvider};
use stock_pipeline::{PipelineError, config::PipelineConfig, run_pipeline};
use tempfile::TempDir;

/// Serves a short trending series per known symbol; errors on "BAD".
struct StubProvider {
    days: u32,
}

#[async_trait]
impl SeriesProvider for StubProvider {
    async fn fetch_daily(&self, symbol: &str) -> Result<Option<DailySeries>, ProviderError> {
        if symbol == "BAD" {
            return ApiSnafu {
                message: "simulated provider outage".to_string(),
            }
            .fail();
        }

        let base = match symbol {
            "GOOGL" => 100.0,
            "TTWO" => 150.0,
            _ => return Ok(None),
        };

        let mut quotes = IndexMap::new();
        for n in 0..self.days {
            let date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
                + chrono::Duration::days(i64::from(n));
            let close = base + f64::from(n) * 0.5;
            quotes.insert(
                date.format("%Y-%m-%d").to_string(),
                RawQuote {
                    open: format!("{}", close - 1.0),
                    high: format!("{}", close + 2.0),
                    low: format!("{}", close - 2.0),
                    close: format!("{close}"),
                    volume: "1000".to_string(),
                },
            );
        }

        Ok(Some(DailySeries {
            symbol: symbol.to_string(),
            quotes,
        }))
    }
}

fn temp_store() -> (TempDir, Store) {
    let dir = TempDir::new().expect("tempdir");
    let path = dir.path().join("pipeline.db");
    let store = Store::new(path.to_string_lossy().to_string());
    (dir, store)
}

fn midnight(date: NaiveDate) -> NaiveDateTime {
    date.and_time(NaiveTime::MIN)
}

#[tokio::test]
async fn full_run_with_one_failing_symbol() {
    let (_dir, store) = temp_store();
    let config = PipelineConfig {
        symbols: vec!["GOOGL".to_string(), "BAD".to_string(), "TTWO".to_string()],
        ..PipelineConfig::default()
    };

    let summary = run_pipeline(&StubProvider { days: 10 }, &store, &config)
        .await
        .expect("run succeeds despite BAD");

    // BAD is absorbed in the fetch stage; everything else flows through.
    assert_eq!(summary.symbols_fetched, 2);
    assert_eq!(summary.records_normalized, 20);
    assert_eq!(summary.load.rows_loaded, 20);
    assert_eq!(summary.load.rows_skipped, 0);
    assert_eq!(summary.train.series_trained, 2);
    assert_eq!(summary.train.series_skipped, 0);
    assert_eq!(summary.predict.forecast_rows, 14);
    assert_eq!(summary.predict.final_rows, 34);

    // The terminal artifact holds actuals and the horizon, disjoint by date.
    use forecast_store::schema::stock_prices_with_forecast::dsl as spwf;
    let mut conn = forecast_store::db::connection::connect_sqlite(store.database_url())
        .expect("connect");
    let rows: Vec<(String, NaiveDateTime, Option<f64>, Option<f64>)> = spwf::stock_prices_with_forecast
        .select((spwf::symbol, spwf::date, spwf::actual, spwf::forecast))
        .order((spwf::symbol.asc(), spwf::date.asc()))
        .load(&mut conn)
        .expect("final rows");
    assert_eq!(rows.len(), 34);

    let last_observed = midnight(NaiveDate::from_ymd_opt(2024, 1, 10).unwrap());
    for (symbol, date, actual, forecast) in &rows {
        assert!(symbol == "GOOGL" || symbol == "TTWO");
        if *date <= last_observed {
            assert!(actual.is_some() && forecast.is_none());
        } else {
            assert!(actual.is_none() && forecast.is_some());
        }
    }
}

#[tokio::test]
async fn rerunning_the_pipeline_accumulates_no_duplicates() {
    let (_dir, store) = temp_store();
    let config = PipelineConfig {
        symbols: vec!["GOOGL".to_string(), "TTWO".to_string()],
        ..PipelineConfig::default()
    };
    let provider = StubProvider { days: 10 };

    run_pipeline(&provider, &store, &config).await.expect("first run");
    let second = run_pipeline(&provider, &store, &config).await.expect("second run");

    // The provider re-offered the same window; the loader skipped all of it.
    assert_eq!(second.load.rows_loaded, 0);
    assert_eq!(second.load.rows_skipped, 20);

    use forecast_store::schema::stock_prices::dsl as sp;
    let mut conn = forecast_store::db::connection::connect_sqlite(store.database_url())
        .expect("connect");
    let count: i64 = sp::stock_prices.count().get_result(&mut conn).expect("count");
    assert_eq!(count, 20);
}

#[tokio::test]
async fn train_failure_halts_the_run() {
    let (_dir, store) = temp_store();
    // Two observations per series: loadable, but not trainable.
    let config = PipelineConfig {
        symbols: vec!["GOOGL".to_string()],
        ..PipelineConfig::default()
    };

    let result = run_pipeline(&StubProvider { days: 2 }, &store, &config).await;
    assert!(matches!(result, Err(PipelineError::Train(_))));

    // The load stage still committed before the halt; nothing downstream ran.
    use forecast_store::schema::stock_prices::dsl as sp;
    use forecast_store::schema::stock_prices_with_forecast::dsl as spwf;
    let mut conn = forecast_store::db::connection::connect_sqlite(store.database_url())
        .expect("connect");
    let loaded: i64 = sp::stock_prices.count().get_result(&mut conn).expect("count");
    assert_eq!(loaded, 2);
    let finals: i64 = spwf::stock_prices_with_forecast
        .count()
        .get_result(&mut conn)
        .expect("count");
    assert_eq!(finals, 0);
}

#[tokio::test]
async fn all_symbols_failing_leads_to_a_train_error_on_an_empty_store() {
    let (_dir, store) = temp_store();
    let config = PipelineConfig {
        symbols: vec!["BAD".to_string()],
        ..PipelineConfig::default()
    };

    let result = run_pipeline(&StubProvider { days: 10 }, &store, &config).await;
    // Nothing fetched, nothing loaded, and with no accumulated history the
    // training stage is the first to notice.
    assert!(matches!(result, Err(PipelineError::Train(_))));
}

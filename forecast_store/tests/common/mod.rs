#![allow(dead_code)]

use std::path::PathBuf;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use diesel::QueryableByName;
use diesel::prelude::*;
use diesel::sql_types::{Integer, Text};
use forecast_store::db::{connection, migrate};
use price_feed::models::record::PriceRecord;
use tempfile::TempDir;

#[derive(QueryableByName)]
struct JournalMode {
    #[diesel(sql_type = Text)]
    journal_mode: String,
}

#[derive(QueryableByName)]
struct BusyTimeout {
    #[diesel(sql_type = Integer, column_name = "timeout")]
    busy_timeout: i32,
}

pub struct TestDb {
    _dir: TempDir, // keep alive for the life of the test
    pub path: String,
}

pub fn setup_db() -> (TestDb, SqliteConnection) {
    let dir = TempDir::new().expect("tempdir");
    let mut p = PathBuf::from(dir.path());
    p.push("test.db");
    let path = p.to_string_lossy().to_string();

    migrate::run(&path).expect("migrations");
    let conn = connection::connect_sqlite(&path).expect("connect");
    (TestDb { _dir: dir, path }, conn)
}

pub fn assert_sqlite_pragmas(conn: &mut SqliteConnection) {
    use diesel::sql_query;

    let jm: JournalMode = sql_query("PRAGMA journal_mode;").get_result(conn).unwrap();
    assert_eq!(jm.journal_mode.to_lowercase(), "wal");

    let bt: BusyTimeout = sql_query("PRAGMA busy_timeout;").get_result(conn).unwrap();
    assert_eq!(bt.busy_timeout, 5000);
}

pub fn day(n: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 1).unwrap() + chrono::Duration::days(i64::from(n))
}

pub fn midnight(date: NaiveDate) -> NaiveDateTime {
    date.and_time(NaiveTime::MIN)
}

pub fn record(symbol: &str, date: NaiveDate, close: f64) -> PriceRecord {
    PriceRecord {
        symbol: symbol.to_string(),
        date,
        open: close - 1.0,
        high: close + 2.0,
        low: close - 2.0,
        close,
        volume: 1000.0,
    }
}

/// Close for day `n` of a trending series: a rising line plus a small
/// alternating wiggle, so fits always see a non-zero residual.
pub fn close_for(start_close: f64, n: u32) -> f64 {
    let wiggle = if n % 2 == 0 { -0.3 } else { 0.3 };
    start_close + f64::from(n) * 0.5 + wiggle
}

/// A gently trending series for `symbol`, one record per day.
pub fn trending_batch(symbol: &str, days: u32, start_close: f64) -> Vec<PriceRecord> {
    (0..days)
        .map(|n| record(symbol, day(n), close_for(start_close, n)))
        .collect()
}

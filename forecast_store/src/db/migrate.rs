//! Embedded schema migrations.

use anyhow::anyhow;
use diesel::{Connection, SqliteConnection, connection::SimpleConnection};
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};

/// Diesel migrations bundled with this crate.
///
/// Applied by [`run`] to bring the store schema up to date.
pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Runs pending migrations on the SQLite database at the given URL.
///
/// Sets the journal mode to WAL and applies all embedded migrations.
/// Running against an already-migrated database applies nothing.
pub fn run(database_url: &str) -> anyhow::Result<()> {
    let mut conn = SqliteConnection::establish(database_url)?;
    conn.batch_execute("PRAGMA journal_mode=WAL;")?;
    conn.run_pending_migrations(MIGRATIONS)
        .map_err(|e| anyhow!(e))?;

    Ok(())
}

#[cfg(test)]
mod test {
    use diesel::RunQueryDsl;
    use diesel::sql_query;

    use super::*;

    #[test]
    fn migrations_apply_on_temp_file() {
        let temp = tempfile::NamedTempFile::new().unwrap();
        let path = temp.path().to_string_lossy().to_string();

        run(&path).expect("migration run");

        let mut conn = SqliteConnection::establish(&path).unwrap();
        sql_query(
            "INSERT INTO stock_prices (symbol, date, open, high, low, close, volume) \
             VALUES ('GOOGL', '2024-01-02 00:00:00', 100, 105, 99, 104, 1000)",
        )
        .execute(&mut conn)
        .unwrap();
    }

    #[test]
    fn rerunning_migrations_is_a_no_op() {
        let temp = tempfile::NamedTempFile::new().unwrap();
        let path = temp.path().to_string_lossy().to_string();

        run(&path).expect("first run");
        run(&path).expect("second run");
    }
}

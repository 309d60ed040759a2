//! Transactional loader for normalized price batches.
//!
//! The whole batch goes through one `BEGIN IMMEDIATE` transaction. A
//! record-level insert failure (duplicate key, constraint breach) is
//! logged and skipped without touching the rest of the batch; any other
//! error aborts and rolls back everything, because it means the batch's
//! integrity can no longer be trusted.

use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use price_feed::models::record::PriceRecord;
use thiserror::Error;

use crate::models::PriceRow;
use crate::schema::stock_prices;

/// Errors surfaced by the loader.
#[derive(Debug, Error)]
pub enum LoadError {
    /// Migrations or the connection failed before the batch transaction
    /// opened.
    #[error("schema provisioning failed")]
    Provision(#[source] anyhow::Error),

    /// The batch transaction hit a non-record-level error and was rolled
    /// back in full.
    #[error("batch transaction failed and was rolled back")]
    Transaction(#[from] DieselError),
}

/// Outcome of a committed batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LoadSummary {
    /// Records inserted and committed.
    pub rows_loaded: usize,
    /// Records dropped by per-record failures (logged, not fatal).
    pub rows_skipped: usize,
}

/// Inserts `batch` inside a single immediate transaction.
///
/// On success every record is either committed exactly once or counted in
/// `rows_skipped`; on [`LoadError::Transaction`] nothing from this batch is
/// visible.
pub fn load_batch(
    conn: &mut SqliteConnection,
    batch: &[PriceRecord],
) -> Result<LoadSummary, LoadError> {
    let summary = conn.immediate_transaction::<_, DieselError, _>(|conn| {
        let mut summary = LoadSummary::default();

        for record in batch {
            let row = PriceRow::from(record);
            match diesel::insert_into(stock_prices::table)
                .values(&row)
                .execute(conn)
            {
                Ok(_) => summary.rows_loaded += 1,
                Err(error) if is_record_error(&error) => {
                    summary.rows_skipped += 1;
                    tracing::warn!(
                        symbol = %record.symbol,
                        date = %record.date,
                        %error,
                        "skipping record, batch continues"
                    );
                }
                Err(error) => return Err(error),
            }
        }

        Ok(summary)
    })?;

    tracing::info!(
        rows_loaded = summary.rows_loaded,
        rows_skipped = summary.rows_skipped,
        "batch committed"
    );
    Ok(summary)
}

/// Record-level failures: the statement failed on this row's own values,
/// so dropping the row keeps the rest of the batch sound.
fn is_record_error(error: &DieselError) -> bool {
    matches!(
        error,
        DieselError::DatabaseError(
            DatabaseErrorKind::UniqueViolation
                | DatabaseErrorKind::CheckViolation
                | DatabaseErrorKind::NotNullViolation,
            _,
        )
    )
}

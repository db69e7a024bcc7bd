use sqlx::{PgPool, Postgres, Transaction};
use tracing::debug;

use crate::error::{AppError, AppResult};

/// Opens a transaction holding a `FOR UPDATE` lock on one live row.
///
/// The caller issues its write on the returned transaction and commits it.
pub async fn lock_live_row<'a>(
    db: &'a PgPool,
    table: &'static str,
    id: i64,
) -> AppResult<Transaction<'a, Postgres>> {
    let mut tx = db.begin().await?;
    let sql = format!("SELECT id FROM {table} WHERE id = $1 AND deleted_at IS NULL FOR UPDATE");
    let found: Option<(i64,)> = sqlx::query_as(&sql)
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?;
    if found.is_none() {
        debug!(table, id, "no live row to lock");
        return Err(AppError::NotFound);
    }
    Ok(tx)
}

pub async fn soft_delete(db: &PgPool, table: &'static str, id: i64) -> AppResult<()> {
    let mut tx = lock_live_row(db, table, id).await?;
    let sql = format!("UPDATE {table} SET deleted_at = now() WHERE id = $1");
    sqlx::query(&sql).bind(id).execute(&mut *tx).await?;
    tx.commit().await?;
    debug!(table, id, "row soft-deleted");
    Ok(())
}

//! Submission Limiter: a `BEFORE INSERT` trigger capping rows per form table.

use sqlx::SqliteConnection;

use crate::constants::{GUARD_ABORT_MARKER, GUARD_TRIGGER_SUFFIX};
use crate::error::Result;
use crate::security::{quote_ident, TableName};

/// Name of the trigger guarding `table`
pub fn guard_name(table: &TableName) -> String {
    format!("{}{}", table.as_str(), GUARD_TRIGGER_SUFFIX)
}

/// Install (or replace) the row cap on a form table
///
/// Once `max_rows` rows exist every further insert is aborted with
/// [`GUARD_ABORT_MARKER`]. Triggers die with their table, so this has to run
/// again whenever the table is recreated.
pub async fn install_guard(
    conn: &mut SqliteConnection,
    table: &TableName,
    max_rows: u32,
) -> Result<()> {
    let trigger = quote_ident(&guard_name(table));

    let drop = format!("DROP TRIGGER IF EXISTS {}", trigger);
    sqlx::query(&drop).execute(&mut *conn).await?;

    // Trigger bodies cannot take bound parameters; max_rows is an integer.
    let create = format!(
        r#"
        CREATE TRIGGER {trigger}
        BEFORE INSERT ON {table}
        BEGIN
            SELECT CASE
                WHEN (SELECT COUNT(*) FROM {table}) >= {max_rows}
                THEN RAISE(ABORT, '{marker}')
            END;
        END
        "#,
        trigger = trigger,
        table = table.quoted(),
        max_rows = max_rows,
        marker = GUARD_ABORT_MARKER,
    );
    sqlx::query(&create).execute(&mut *conn).await?;

    tracing::debug!("Installed submission guard on {} (max {} rows)", table, max_rows);

    Ok(())
}

/// Whether a database error is the guard rejecting an insert
pub fn is_capacity_error(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db_err) => db_err.message().contains(GUARD_ABORT_MARKER),
        _ => false,
    }
}

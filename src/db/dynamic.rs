//! Dynamic Table Manager.
//!
//! Creates, inspects and drops the per-entity form tables. Table names only
//! reach SQL as a sanitized [`TableName`]; column names only as labels that
//! passed [`column_specs`].

use sqlx::{Row, SqliteConnection};

use crate::constants::IDENTITY_COLUMN;
use crate::error::{AppError, Result};
use crate::models::{column_specs, FieldDescriptor, FormField};
use crate::security::{quote_ident, TableName};

/// Replace any table at `table` with a fresh one shaped by `fields`
///
/// The field set is validated before any statement runs, so a bad definition
/// leaves an existing table untouched.
pub async fn create_table(
    conn: &mut SqliteConnection,
    table: &TableName,
    fields: &[FieldDescriptor],
) -> Result<()> {
    let specs = column_specs(fields)?;

    let mut columns = vec![format!(
        "{} INTEGER PRIMARY KEY AUTOINCREMENT",
        quote_ident(IDENTITY_COLUMN)
    )];
    columns.extend(specs.iter().map(|spec| spec.definition()));

    let create = format!("CREATE TABLE {} ({})", table.quoted(), columns.join(", "));

    drop_table(&mut *conn, table).await?;
    sqlx::query(&create).execute(&mut *conn).await?;

    tracing::debug!("Created form table {} with {} fields", table, specs.len());

    Ok(())
}

/// Whether a form table is currently present
pub async fn table_exists(conn: &mut SqliteConnection, table: &TableName) -> Result<bool> {
    let found: Option<i64> =
        sqlx::query_scalar("SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = ?1")
            .bind(table.as_str())
            .fetch_optional(&mut *conn)
            .await?;

    Ok(found.is_some())
}

/// Reconstruct the form definition from the table's column catalog
///
/// The identity column is skipped. Fails with `NotFound` when the table is
/// absent.
pub async fn introspect(conn: &mut SqliteConnection, table: &TableName) -> Result<Vec<FormField>> {
    let rows = sqlx::query(
        r#"
        SELECT name, type, "notnull", pk
        FROM pragma_table_info(?1)
        ORDER BY cid
        "#,
    )
    .bind(table.as_str())
    .fetch_all(&mut *conn)
    .await?;

    if rows.is_empty() {
        return Err(AppError::NotFound(format!("Form table {} does not exist", table)));
    }

    let mut fields = Vec::with_capacity(rows.len().saturating_sub(1));
    for row in rows {
        let pk: i64 = row.try_get("pk")?;
        if pk != 0 {
            continue;
        }

        let name: String = row.try_get("name")?;
        let declared_type: String = row.try_get("type")?;
        let not_null: i64 = row.try_get("notnull")?;

        let descriptor = FieldDescriptor::from_column(&name, &declared_type, not_null != 0);
        fields.push(FormField { name, descriptor });
    }

    Ok(fields)
}

/// Drop a form table; absent tables are not an error
///
/// Any insert guard on the table goes with it.
pub async fn drop_table(conn: &mut SqliteConnection, table: &TableName) -> Result<()> {
    let drop = format!("DROP TABLE IF EXISTS {}", table.quoted());
    sqlx::query(&drop).execute(&mut *conn).await?;
    Ok(())
}

//! Submission Store: append rows to a form table and read them all back.

use serde::Serialize;
use serde_json::{Map, Number, Value};
use sqlx::sqlite::{SqliteArguments, SqliteRow};
use sqlx::{query::Query, Row, Sqlite, SqliteConnection, TypeInfo, ValueRef};

use crate::constants::{ERR_EMPTY_SUBMISSION, IDENTITY_COLUMN};
use crate::db::{dynamic, guard};
use crate::error::{AppError, Result};
use crate::security::{quote_ident, TableName};

/// Full contents of a form table
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Submissions {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Value>>,
}

impl Submissions {
    /// Rows as `column -> value` objects
    pub fn records(&self) -> Vec<Map<String, Value>> {
        self.rows
            .iter()
            .map(|row| self.columns.iter().cloned().zip(row.iter().cloned()).collect())
            .collect()
    }
}

/// Insert one submission
///
/// Keys must name form columns, required columns must be present and
/// non-null, and values must be scalars. A full table surfaces as
/// `CapacityExceeded { max: max_rows }`.
pub async fn insert(
    conn: &mut SqliteConnection,
    table: &TableName,
    values: &Map<String, Value>,
    max_rows: u32,
) -> Result<()> {
    if values.is_empty() {
        return Err(AppError::Schema(ERR_EMPTY_SUBMISSION.to_string()));
    }

    let fields = dynamic::introspect(&mut *conn, table).await?;

    for key in values.keys() {
        if !fields.iter().any(|field| &field.name == key) {
            return Err(AppError::Schema(format!("Unknown field '{}'", key)));
        }
    }

    for field in fields.iter().filter(|field| field.descriptor.required) {
        match values.get(&field.name) {
            None | Some(Value::Null) => {
                return Err(AppError::Schema(format!(
                    "Field '{}' is required",
                    field.descriptor.label
                )));
            }
            Some(_) => {}
        }
    }

    let columns: Vec<&String> = values.keys().collect();
    let sql = format!(
        "INSERT INTO {} ({}) VALUES ({})",
        table.quoted(),
        columns
            .iter()
            .map(|column| quote_ident(column))
            .collect::<Vec<_>>()
            .join(", "),
        (1..=columns.len())
            .map(|i| format!("?{}", i))
            .collect::<Vec<_>>()
            .join(", ")
    );

    let mut query = sqlx::query(&sql);
    for (column, value) in values {
        query = bind_value(query, column, value)?;
    }

    match query.execute(&mut *conn).await {
        Ok(_) => Ok(()),
        Err(e) if guard::is_capacity_error(&e) => Err(AppError::CapacityExceeded { max: max_rows }),
        Err(e) => Err(e.into()),
    }
}

fn bind_value<'q>(
    query: Query<'q, Sqlite, SqliteArguments<'q>>,
    column: &str,
    value: &Value,
) -> Result<Query<'q, Sqlite, SqliteArguments<'q>>> {
    let query = match value {
        Value::Null => query.bind(None::<String>),
        Value::Bool(b) => query.bind(*b),
        Value::Number(n) => match n.as_i64() {
            Some(i) => query.bind(i),
            None => query.bind(n.as_f64()),
        },
        Value::String(s) => query.bind(s.clone()),
        Value::Array(_) | Value::Object(_) => {
            return Err(AppError::Schema(format!(
                "Field '{}' must be a single value",
                column
            )));
        }
    };
    Ok(query)
}

/// Read every row of a form table in insertion order
///
/// Column names come from the catalog, so an empty table still reports its
/// header.
pub async fn list_all(conn: &mut SqliteConnection, table: &TableName) -> Result<Submissions> {
    let columns: Vec<String> =
        sqlx::query_scalar("SELECT name FROM pragma_table_info(?1) ORDER BY cid")
            .bind(table.as_str())
            .fetch_all(&mut *conn)
            .await?;

    if columns.is_empty() {
        return Err(AppError::NotFound(format!("Form table {} does not exist", table)));
    }

    let sql = format!(
        "SELECT * FROM {} ORDER BY {}",
        table.quoted(),
        quote_ident(IDENTITY_COLUMN)
    );
    let rows = sqlx::query(&sql).fetch_all(&mut *conn).await?;

    let rows = rows
        .iter()
        .map(row_values)
        .collect::<std::result::Result<Vec<_>, sqlx::Error>>()?;

    Ok(Submissions { columns, rows })
}

/// Decode a row by the runtime storage class of each value
fn row_values(row: &SqliteRow) -> std::result::Result<Vec<Value>, sqlx::Error> {
    (0..row.len())
        .map(|i| {
            let raw = row.try_get_raw(i)?;
            if raw.is_null() {
                return Ok(Value::Null);
            }

            let value = match raw.type_info().name() {
                "INTEGER" => Value::from(row.try_get_unchecked::<i64, _>(i)?),
                "REAL" => Number::from_f64(row.try_get_unchecked::<f64, _>(i)?)
                    .map(Value::Number)
                    .unwrap_or(Value::Null),
                "BLOB" => Value::String(String::from_utf8_lossy(
                    &row.try_get_unchecked::<Vec<u8>, _>(i)?,
                )
                .into_owned()),
                _ => Value::String(row.try_get_unchecked::<String, _>(i)?),
            };
            Ok(value)
        })
        .collect()
}

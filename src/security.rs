use std::fmt;

use crate::constants::RESERVED_TABLE_PREFIX;
use crate::error::AppError;

// =============================================================================
// Identifier Safety
// =============================================================================

/// Physical name of a form table.
///
/// Only constructed through [`sanitize`], so every value is known to consist
/// of `[a-z0-9_]` and is safe to splice into DDL as a quoted identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TableName(String);

impl TableName {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The name as a double-quoted SQL identifier
    pub fn quoted(&self) -> String {
        quote_ident(&self.0)
    }
}

impl fmt::Display for TableName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Lower-case a human-entered name and fold each run of whitespace into `_`
///
/// Leading and trailing whitespace is dropped.
pub fn fold_name(name: &str) -> String {
    name.to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("_")
}

/// Check that a folded name can be used as a bare identifier
fn is_safe_identifier(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_')
}

/// Derive a column name from a field label
///
/// # Errors
/// `AppError::Schema` if the folded label contains anything outside `[a-z0-9_]`.
pub fn sanitize_identifier(label: &str) -> Result<String, AppError> {
    let folded = fold_name(label);
    if !is_safe_identifier(&folded) {
        return Err(AppError::Schema(format!(
            "Field label '{}' may only contain letters, digits, spaces and underscores",
            label
        )));
    }
    Ok(folded)
}

/// Derive the physical table name for an entity's form
///
/// `display_name` is folded with [`fold_name`] and `suffix` is appended.
/// Names that would still contain characters outside `[a-z0-9_]` are
/// rejected instead of being passed through to DDL.
///
/// # Example
/// `sanitize("Chess Club", "_recruitments")` gives `chess_club_recruitments`.
pub fn sanitize(display_name: &str, suffix: &str) -> Result<TableName, AppError> {
    let folded = fold_name(display_name);
    if !is_safe_identifier(&folded) {
        return Err(AppError::Schema(format!(
            "Name '{}' may only contain letters, digits and spaces to host a form",
            display_name
        )));
    }

    let name = format!("{}{}", folded, suffix);
    if !is_safe_identifier(&name) || name.starts_with(RESERVED_TABLE_PREFIX) {
        return Err(AppError::Schema(format!(
            "Name '{}' cannot be used to host a form",
            display_name
        )));
    }

    Ok(TableName(name))
}

/// Quote an identifier for SQLite, doubling embedded quotes
pub fn quote_ident(ident: &str) -> String {
    format!("\"{}\"", ident.replace('"', "\"\""))
}

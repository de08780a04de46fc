use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::constants::{ERR_EMPTY_FIELDS, IDENTITY_COLUMN};
use crate::error::{AppError, Result};
use crate::security::sanitize_identifier;

/// Logical type of a form field as chosen by an admin
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", from = "String")]
pub enum LogicalType {
    Text,
    Number,
    Email,
}

impl From<String> for LogicalType {
    /// Unknown type names fall back to text
    fn from(value: String) -> Self {
        match value.to_ascii_lowercase().as_str() {
            "number" => LogicalType::Number,
            "email" => LogicalType::Email,
            _ => LogicalType::Text,
        }
    }
}

impl LogicalType {
    /// Physical column type this field is stored as
    pub fn column_type(self) -> ColumnType {
        match self {
            LogicalType::Number => ColumnType::Real,
            LogicalType::Text | LogicalType::Email => ColumnType::Text,
        }
    }

    /// Declared column type recorded in the table definition
    ///
    /// Email columns carry an `EMAIL` marker ahead of `TEXT`; SQLite still
    /// gives them text affinity.
    pub fn declared_type(self) -> &'static str {
        match self {
            LogicalType::Number => "REAL",
            LogicalType::Text => "TEXT",
            LogicalType::Email => "EMAIL TEXT",
        }
    }
}

/// Storage column type of a form table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnType {
    Real,
    Text,
}

/// One field of an admin-defined form
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDescriptor {
    pub label: String,
    #[serde(rename = "type")]
    pub logical_type: LogicalType,
    #[serde(default)]
    pub required: bool,
}

/// Column produced by a field descriptor
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnSpec {
    pub column_name: String,
    pub logical_type: LogicalType,
    pub nullable: bool,
}

impl ColumnSpec {
    pub fn sql_type(&self) -> ColumnType {
        self.logical_type.column_type()
    }

    /// Column definition for a `CREATE TABLE` statement
    pub fn definition(&self) -> String {
        let mut def = format!(
            "{} {}",
            crate::security::quote_ident(&self.column_name),
            self.logical_type.declared_type()
        );
        if !self.nullable {
            def.push_str(" NOT NULL");
        }
        def
    }
}

impl FieldDescriptor {
    pub fn new(label: impl Into<String>, logical_type: LogicalType, required: bool) -> Self {
        Self {
            label: label.into(),
            logical_type,
            required,
        }
    }

    /// Column name this field is stored under
    pub fn column_name(&self) -> Result<String> {
        sanitize_identifier(&self.label)
    }

    /// Rebuild a descriptor from stored column metadata
    ///
    /// The logical type comes from the declared type written by
    /// [`ColumnSpec::definition`]. Only columns declared some other way fall
    /// back to guessing email from the column name. The label is lossy: it is
    /// recovered by title-casing the underscore-separated parts of the name.
    pub fn from_column(name: &str, declared_type: &str, not_null: bool) -> Self {
        let declared = declared_type.trim().to_ascii_lowercase();
        let logical_type = if declared.contains("real") {
            LogicalType::Number
        } else if declared.starts_with("email") {
            LogicalType::Email
        } else if declared == "text" {
            LogicalType::Text
        } else if name.to_ascii_lowercase().contains("email") {
            LogicalType::Email
        } else {
            LogicalType::Text
        };

        Self {
            label: label_from_column(name),
            logical_type,
            required: not_null,
        }
    }
}

/// `full_name` becomes `Full Name`
fn label_from_column(name: &str) -> String {
    name.split('_')
        .filter(|part| !part.is_empty())
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => {
                    first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase()
                }
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Map an ordered field list to column specifications
///
/// # Errors
/// `AppError::Schema` when the list is empty, a label cannot be turned into a
/// safe column name, or two labels fold to the same column (including the
/// identity column).
pub fn column_specs(fields: &[FieldDescriptor]) -> Result<Vec<ColumnSpec>> {
    if fields.is_empty() {
        return Err(AppError::Schema(ERR_EMPTY_FIELDS.to_string()));
    }

    let mut seen: HashSet<String> = HashSet::from([IDENTITY_COLUMN.to_string()]);
    let mut specs = Vec::with_capacity(fields.len());

    for field in fields {
        let column_name = field.column_name()?;
        if !seen.insert(column_name.clone()) {
            return Err(AppError::Schema(format!(
                "Field '{}' maps to column '{}' which is already in use",
                field.label, column_name
            )));
        }

        specs.push(ColumnSpec {
            column_name,
            logical_type: field.logical_type,
            nullable: !field.required,
        });
    }

    Ok(specs)
}

/// A field of an open form as read back from storage
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FormField {
    /// Column name submissions must use as key
    pub name: String,
    #[serde(flatten)]
    pub descriptor: FieldDescriptor,
}

//! CSV export of collected submissions.

use serde_json::Value;

use crate::models::FormRole;

/// Serialize a header and rows as CSV
///
/// Fields containing a delimiter, quote or line break are quoted with inner
/// quotes doubled. Nulls become empty fields.
pub fn to_delimited_text(columns: &[String], rows: &[Vec<Value>]) -> Vec<u8> {
    let mut csv = String::new();

    write_line(&mut csv, columns.iter().map(|c| escape_csv(c)));
    for row in rows {
        write_line(&mut csv, row.iter().map(field_text));
    }

    csv.into_bytes()
}

fn write_line<I>(out: &mut String, fields: I)
where
    I: Iterator<Item = String>,
{
    let line = fields.collect::<Vec<_>>().join(",");
    out.push_str(&line);
    out.push('\n');
}

fn field_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => escape_csv(s),
        other => escape_csv(&other.to_string()),
    }
}

/// Escape a value for CSV output.
fn escape_csv(value: &str) -> String {
    if value.contains(',') || value.contains('"') || value.contains('\n') || value.contains('\r')
    {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

/// Download name for an entity's exported responses
///
/// Characters that could break a `Content-Disposition` header are replaced.
pub fn attachment_filename(display_name: &str, role: FormRole) -> String {
    let safe: String = display_name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, ' ' | '-' | '_' | '.') {
                c
            } else {
                '_'
            }
        })
        .collect();

    format!("{}{}", safe.trim(), role.export_suffix())
}

//! Literal SQL rendering for the file sink.
//!
//! Values are interpolated, not bound, so every field goes through
//! [`escape_literal`]; the table name must already be a validated identifier.

use crate::domain::model::{BillionaireRecord, ConflictPolicy};

/// Doubles single quotes and drops NUL bytes, which no SQL literal can carry.
pub fn escape_literal(value: &str) -> String {
    value.replace('\0', "").replace('\'', "''")
}

pub fn unescape_literal(value: &str) -> String {
    value.replace("''", "'")
}

pub fn quote_literal(value: &str) -> String {
    format!("'{}'", escape_literal(value))
}

pub fn render_statement(record: &BillionaireRecord, table: &str, policy: ConflictPolicy) -> String {
    let mut sql = format!(
        "INSERT INTO {} (name, image_url, net_worth)\nVALUES ({}, {}, {})",
        table,
        quote_literal(&record.name),
        quote_literal(&record.image_reference),
        quote_literal(&record.net_worth),
    );

    match policy {
        ConflictPolicy::Insert => {}
        ConflictPolicy::DoNothing => sql.push_str("\nON CONFLICT (name) DO NOTHING"),
        ConflictPolicy::DoUpdate => sql.push_str(
            "\nON CONFLICT (name) DO UPDATE\nSET image_url = EXCLUDED.image_url,\n    net_worth = EXCLUDED.net_worth",
        ),
    }
    sql.push(';');
    sql
}

pub fn render_sql(records: &[BillionaireRecord], table: &str, policy: ConflictPolicy) -> String {
    records
        .iter()
        .map(|record| render_statement(record, table, policy))
        .collect::<Vec<_>>()
        .join("\n")
}

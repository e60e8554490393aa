//! Dataset metadata types
//!
//! A Dataset is an imported sheet materialized as a dedicated table plus a
//! metadata row. Imported cells are stored as text; the shape of the backing
//! table is discovered at runtime, never declared at compile time.

use serde::{Deserialize, Serialize};

/// Dataset metadata stored in the `datasets` table
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Dataset {
    /// Unique identifier (UUID)
    pub id: String,
    /// Timestamp when the dataset was imported
    #[serde(rename = "createdAt")]
    pub created_at: String,
    /// Operator-facing display label (the only mutable field)
    pub name: String,
    /// Generated backing table name, never reused or renamed
    #[serde(rename = "tableName")]
    pub table_name: String,
    /// Row count at import time
    #[serde(rename = "totalRows")]
    pub total_rows: i64,
    /// Owning principal
    #[serde(rename = "createdBy")]
    pub created_by: String,
}

/// A live column on a dataset's backing table, excluding system columns
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColumnInfo {
    /// Column name as defined on the table
    pub name: String,
    /// Engine-reported data type (always a text type for imported columns)
    #[serde(rename = "type")]
    pub data_type: String,
}

/// Coerce an uploaded cell value to its stored text form
///
/// Strings are kept unless empty; numbers and booleans are stringified; null,
/// absent, and empty values all become NULL. Compound values are stored as
/// their JSON text.
pub fn cell_text(value: &serde_json::Value) -> Option<String> {
    match value {
        serde_json::Value::Null => None,
        serde_json::Value::String(s) if s.is_empty() => None,
        serde_json::Value::String(s) => Some(s.clone()),
        serde_json::Value::Number(n) => Some(n.to_string()),
        serde_json::Value::Bool(b) => Some(b.to_string()),
        other => Some(other.to_string()),
    }
}

//! Tabular-file ingestion
//!
//! Parsers turning uploaded CSV/XLSX bytes into ordered JSON row objects
//! (header name → string value, in column order). Rows whose disposition
//! column marks them for deletion are dropped here, before the data ever
//! reaches a caller.

use serde_json::{Map, Value};

pub mod csv;
pub mod xlsx;

/// Column naming the per-row disposition
pub const FIELD_DISPOSITION: &str = "字段处理";
/// Disposition value marking a row for deletion
pub const DISPOSITION_DELETE: &str = "删除";

/// True when a parsed row should be dropped from the output
pub(crate) fn is_deleted_row(row: &Map<String, Value>) -> bool {
    row.get(FIELD_DISPOSITION).and_then(Value::as_str) == Some(DISPOSITION_DELETE)
}

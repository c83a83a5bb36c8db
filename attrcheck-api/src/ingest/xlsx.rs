//! Excel ingestion
//!
//! Reads the first worksheet of an uploaded workbook. The first row is the
//! header row; each following row becomes a JSON object with every cell
//! rendered as a string (empty cells render as empty strings), matching the
//! CSV ingestion output shape.

use std::io::Cursor;

use calamine::{Data, Reader, Xlsx};
use serde_json::{Map, Value};

use attrcheck_common::{Error, Result};

use super::is_deleted_row;

/// Parse workbook bytes into row objects, dropping deletion-marked rows
pub fn parse(bytes: &[u8]) -> Result<Vec<Map<String, Value>>> {
    let mut workbook: Xlsx<_> = Xlsx::new(Cursor::new(bytes.to_vec()))
        .map_err(|e| Error::Internal(format!("Failed to open workbook: {}", e)))?;

    let sheet_names = workbook.sheet_names().to_vec();
    let first_sheet = sheet_names
        .first()
        .ok_or_else(|| Error::Internal("Workbook contains no sheets".to_string()))?;

    let range = workbook
        .worksheet_range(first_sheet)
        .map_err(|e| Error::Internal(format!("Failed to read sheet '{}': {}", first_sheet, e)))?;

    let mut row_iter = range.rows();
    let Some(header_row) = row_iter.next() else {
        return Ok(Vec::new());
    };
    let headers: Vec<String> = header_row.iter().map(cell_text).collect();

    let mut rows = Vec::new();
    for data_row in row_iter {
        let mut row = Map::new();
        for (index, header) in headers.iter().enumerate() {
            let value = data_row.get(index).map(cell_text).unwrap_or_default();
            row.insert(header.clone(), Value::String(value));
        }

        if !is_deleted_row(&row) {
            rows.push(row);
        }
    }

    Ok(rows)
}

/// Render a cell as text; non-string cells use their display form
fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        Data::Bool(b) => b.to_string(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_garbage_bytes_rejected() {
        let err = parse(b"this is not a zip archive").unwrap_err();
        assert!(matches!(err, Error::Internal(_)));
    }

    #[test]
    fn test_cell_text_rendering() {
        assert_eq!(cell_text(&Data::Empty), "");
        assert_eq!(cell_text(&Data::String("碳素".to_string())), "碳素");
        assert_eq!(cell_text(&Data::Float(22.0)), "22");
        assert_eq!(cell_text(&Data::Bool(true)), "true");
    }
}

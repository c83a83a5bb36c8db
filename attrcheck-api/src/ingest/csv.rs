//! CSV ingestion
//!
//! Decodes uploaded bytes as UTF-8 (tolerating a BOM, which spreadsheet
//! exports commonly prepend) with a Windows-1252 fallback, then maps each
//! data row to a JSON object keyed by the header row.

use serde_json::{Map, Value};

use attrcheck_common::{Error, Result};

use super::is_deleted_row;

/// Parse CSV bytes into row objects, dropping deletion-marked rows
pub fn parse(bytes: &[u8]) -> Result<Vec<Map<String, Value>>> {
    let content = decode_text(bytes);
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(content.as_bytes());

    let headers = reader
        .headers()
        .map_err(|e| Error::Internal(format!("CSV parse failed: {}", e)))?
        .clone();

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result.map_err(|e| Error::Internal(format!("CSV parse failed: {}", e)))?;

        let mut row = Map::new();
        for (index, header) in headers.iter().enumerate() {
            let value = record.get(index).unwrap_or("");
            row.insert(header.to_string(), Value::String(value.to_string()));
        }

        if !is_deleted_row(&row) {
            rows.push(row);
        }
    }

    Ok(rows)
}

/// Decode bytes as UTF-8, stripping a BOM; non-UTF-8 content falls back to
/// Windows-1252 (common for Excel-exported CSVs)
fn decode_text(bytes: &[u8]) -> String {
    match std::str::from_utf8(bytes) {
        Ok(text) => text.trim_start_matches('\u{feff}').to_string(),
        Err(_) => {
            let (decoded, _, _) = encoding_rs::WINDOWS_1252.decode(bytes);
            decoded.into_owned()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_basic_csv() {
        let csv = "新属性名,原属性值,推荐属性值\n颜色,红色,红色\n材质,碳素,碳纤维\n";
        let rows = parse(csv.as_bytes()).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0]["新属性名"], "颜色");
        assert_eq!(rows[1]["推荐属性值"], "碳纤维");
    }

    #[test]
    fn test_header_order_preserved() {
        let csv = "c,b,a\n1,2,3\n";
        let rows = parse(csv.as_bytes()).unwrap();
        let keys: Vec<&String> = rows[0].keys().collect();
        assert_eq!(keys, ["c", "b", "a"]);
    }

    #[test]
    fn test_deletion_marked_rows_filtered() {
        let csv = "新属性名,字段处理\n颜色,保留\n旧编码,删除\n材质,\n";
        let rows = parse(csv.as_bytes()).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0]["新属性名"], "颜色");
        assert_eq!(rows[1]["新属性名"], "材质");
    }

    #[test]
    fn test_bom_stripped() {
        let csv = "\u{feff}a,b\n1,2\n";
        let rows = parse(csv.as_bytes()).unwrap();
        assert_eq!(rows[0], serde_json::from_value(json!({"a": "1", "b": "2"})).unwrap());
    }

    #[test]
    fn test_short_rows_padded_with_empty_strings() {
        let csv = "a,b,c\n1,2\n";
        let rows = parse(csv.as_bytes()).unwrap();
        assert_eq!(rows[0]["c"], "");
    }

    #[test]
    fn test_windows_1252_fallback() {
        // 0xE9 is 'é' in Windows-1252 and invalid as standalone UTF-8
        let bytes = b"name\ncaf\xe9\n";
        let rows = parse(bytes).unwrap();
        assert_eq!(rows[0]["name"], "café");
    }
}

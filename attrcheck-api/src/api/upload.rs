//! Tabular file upload endpoints
//!
//! Convert uploaded CSV/XLSX tables into the flat-record JSON array the
//! reconciliation endpoint consumes. File type is judged by filename
//! extension, as the upstream workflow names its exports consistently.

use axum::extract::Multipart;
use axum::Json;
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::info;

use attrcheck_common::Error;

use super::error::ApiError;
use crate::ingest;

/// Upload response: one JSON object per surviving row
#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub result: Vec<Map<String, Value>>,
}

/// POST /upload-csv-json/
///
/// Parses an uploaded CSV file into a JSON record array, dropping rows
/// marked for deletion (see `ingest`).
pub async fn upload_csv_json(multipart: Multipart) -> Result<Json<UploadResponse>, ApiError> {
    let upload = read_upload(multipart).await?;
    if !upload.filename.ends_with(".csv") {
        return Err(Error::InvalidInput("Only .csv files are supported".to_string()).into());
    }

    let result = ingest::csv::parse(&upload.bytes)?;
    info!("Parsed CSV upload '{}' ({} rows)", upload.filename, result.len());
    Ok(Json(UploadResponse { result }))
}

/// POST /upload-xlsx-json/
///
/// Parses the first worksheet of an uploaded Excel file into a JSON record
/// array, with the same row filtering as the CSV endpoint.
pub async fn upload_xlsx_json(multipart: Multipart) -> Result<Json<UploadResponse>, ApiError> {
    let upload = read_upload(multipart).await?;
    if !upload.filename.ends_with(".xlsx") && !upload.filename.ends_with(".xls") {
        return Err(Error::InvalidInput("Only .xlsx/.xls files are supported".to_string()).into());
    }

    let result = ingest::xlsx::parse(&upload.bytes)?;
    info!("Parsed XLSX upload '{}' ({} rows)", upload.filename, result.len());
    Ok(Json(UploadResponse { result }))
}

struct Upload {
    filename: String,
    bytes: Vec<u8>,
}

/// Pull the uploaded file out of the multipart body: the `file` field, or
/// failing that the first field carrying a filename
async fn read_upload(mut multipart: Multipart) -> Result<Upload, ApiError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| Error::InvalidInput(format!("Malformed multipart body: {}", e)))?
    {
        let is_file = field.name() == Some("file") || field.file_name().is_some();
        if !is_file {
            continue;
        }

        let filename = field.file_name().unwrap_or("").to_string();
        let bytes = field
            .bytes()
            .await
            .map_err(|e| Error::InvalidInput(format!("Failed to read upload: {}", e)))?
            .to_vec();
        return Ok(Upload { filename, bytes });
    }

    Err(Error::InvalidInput("Missing file field in multipart body".to_string()).into())
}

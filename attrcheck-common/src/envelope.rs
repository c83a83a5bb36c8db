//! Envelope detection and rendering
//!
//! The reconciliation endpoint accepts three wrapper shapes around the
//! check-result array and answers in the matching shape:
//!
//! - a bare JSON array of records → a fenced pretty array under `text`
//! - an object whose `output` field holds a fenced check-result document →
//!   the same document shape back under `output`
//! - an object carrying `检查结果` (and optionally `dsm_code`) directly →
//!   the document shape under `text`
//!
//! Two of the three shapes answer under `text`; this asymmetry is a fixed
//! contract with the upstream workflow. Request bodies may arrive wrapped
//! in a markdown code fence, which is stripped before parsing.

use serde_json::{Map, Value};

use crate::error::{Error, Result};
use crate::record::AttributeRecord;

/// Array of records being reconciled
pub const FIELD_CHECK_RESULTS: &str = "检查结果";
/// Opaque batch identifier, passed through unchanged
pub const FIELD_DSM_CODE: &str = "dsm_code";
/// Wrapper field carrying a fenced JSON document on input and output
pub const FIELD_OUTPUT: &str = "output";
/// Response field used by the bare-array and direct-result shapes
pub const FIELD_TEXT: &str = "text";

/// A recognized request envelope: the extracted record list plus the
/// shape-specific metadata needed to rebuild the matching response.
#[derive(Debug, Clone, PartialEq)]
pub enum Envelope {
    /// Top-level JSON array of records
    Bare(Vec<AttributeRecord>),
    /// Object whose `output` field holds a fenced check-result document
    OutputWrapped {
        dsm_code: Value,
        records: Vec<AttributeRecord>,
    },
    /// Object carrying `检查结果` (and optionally `dsm_code`) directly
    DirectResult {
        dsm_code: Value,
        records: Vec<AttributeRecord>,
    },
}

impl Envelope {
    /// Parse a raw request body into a recognized envelope shape
    pub fn parse(body: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(strip_code_fence(body))
            .map_err(|_| Error::InvalidInput("Invalid JSON format".to_string()))?;

        match value {
            Value::Array(items) => Ok(Envelope::Bare(records_from_items(items)?)),
            Value::Object(object) => Self::parse_object(object),
            _ => Err(Error::InvalidInput(
                "Input should be a JSON array or object".to_string(),
            )),
        }
    }

    fn parse_object(mut object: Map<String, Value>) -> Result<Self> {
        if let Some(output) = object.get(FIELD_OUTPUT) {
            let text = output.as_str().ok_or_else(|| {
                Error::InvalidInput(format!("{} field must be a string", FIELD_OUTPUT))
            })?;
            let inner: Value = serde_json::from_str(strip_code_fence(text)).map_err(|_| {
                Error::InvalidInput(format!("{} field does not contain valid JSON", FIELD_OUTPUT))
            })?;
            let Value::Object(mut document) = inner else {
                return Err(Error::InvalidInput(format!(
                    "{} document must be a JSON object",
                    FIELD_OUTPUT
                )));
            };
            let results = document.remove(FIELD_CHECK_RESULTS).ok_or_else(|| {
                Error::InvalidInput(format!(
                    "{} document is missing {}",
                    FIELD_OUTPUT, FIELD_CHECK_RESULTS
                ))
            })?;
            let dsm_code = document.remove(FIELD_DSM_CODE).unwrap_or(Value::Null);
            Ok(Envelope::OutputWrapped {
                dsm_code,
                records: records_from_value(results)?,
            })
        } else if let Some(results) = object.remove(FIELD_CHECK_RESULTS) {
            let dsm_code = object.remove(FIELD_DSM_CODE).unwrap_or(Value::Null);
            Ok(Envelope::DirectResult {
                dsm_code,
                records: records_from_value(results)?,
            })
        } else {
            Err(Error::InvalidInput(format!(
                "Request object has neither {} nor {}",
                FIELD_OUTPUT, FIELD_CHECK_RESULTS
            )))
        }
    }

    /// Transform the carried records, keeping the envelope shape
    pub fn map_records<F>(self, f: F) -> Self
    where
        F: FnOnce(Vec<AttributeRecord>) -> Vec<AttributeRecord>,
    {
        match self {
            Envelope::Bare(records) => Envelope::Bare(f(records)),
            Envelope::OutputWrapped { dsm_code, records } => Envelope::OutputWrapped {
                dsm_code,
                records: f(records),
            },
            Envelope::DirectResult { dsm_code, records } => Envelope::DirectResult {
                dsm_code,
                records: f(records),
            },
        }
    }

    /// Render the response payload in the shape matching the request
    pub fn into_response_value(self) -> Result<Value> {
        let mut response = Map::new();
        match self {
            Envelope::Bare(records) => {
                let array = Value::Array(records.into_iter().map(Value::from).collect());
                response.insert(FIELD_TEXT.to_string(), Value::String(fenced_json(&array)?));
            }
            Envelope::OutputWrapped { dsm_code, records } => {
                let document = result_document(dsm_code, records);
                response.insert(
                    FIELD_OUTPUT.to_string(),
                    Value::String(fenced_json(&document)?),
                );
            }
            Envelope::DirectResult { dsm_code, records } => {
                let document = result_document(dsm_code, records);
                response.insert(
                    FIELD_TEXT.to_string(),
                    Value::String(fenced_json(&document)?),
                );
            }
        }
        Ok(Value::Object(response))
    }
}

/// Strip an enclosing markdown code fence, if present.
///
/// A trimmed body starting with ```` ```json ```` and ending with ```` ``` ````
/// loses exactly those delimiters; a plain ```` ``` ```` pair is stripped the
/// same way; anything else is returned trimmed but otherwise untouched.
pub fn strip_code_fence(body: &str) -> &str {
    let trimmed = body.trim();
    if let Some(inner) = trimmed
        .strip_prefix("```json")
        .and_then(|s| s.strip_suffix("```"))
    {
        return inner.trim();
    }
    if let Some(inner) = trimmed
        .strip_prefix("```")
        .and_then(|s| s.strip_suffix("```"))
    {
        return inner.trim();
    }
    trimmed
}

fn records_from_value(value: Value) -> Result<Vec<AttributeRecord>> {
    match value {
        Value::Array(items) => records_from_items(items),
        _ => Err(Error::InvalidInput(format!(
            "{} must be a JSON array",
            FIELD_CHECK_RESULTS
        ))),
    }
}

fn records_from_items(items: Vec<Value>) -> Result<Vec<AttributeRecord>> {
    items
        .into_iter()
        .map(|item| match item {
            Value::Object(fields) => Ok(AttributeRecord::from_map(fields)),
            _ => Err(Error::InvalidInput(
                "Check result entries must be JSON objects".to_string(),
            )),
        })
        .collect()
}

/// Build the `{"dsm_code": ..., "检查结果": [...]}` response document
fn result_document(dsm_code: Value, records: Vec<AttributeRecord>) -> Value {
    let mut document = Map::new();
    document.insert(FIELD_DSM_CODE.to_string(), dsm_code);
    document.insert(
        FIELD_CHECK_RESULTS.to_string(),
        Value::Array(records.into_iter().map(Value::from).collect()),
    );
    Value::Object(document)
}

/// Pretty-print a value (2-space indent, literal non-ASCII) inside a
/// ```` ```json ```` fence
fn fenced_json(value: &Value) -> Result<String> {
    let pretty =
        serde_json::to_string_pretty(value).map_err(|e| Error::Internal(e.to_string()))?;
    Ok(format!("```json\n{}\n```", pretty))
}

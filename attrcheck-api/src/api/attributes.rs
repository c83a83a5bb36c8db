//! Attribute reconciliation endpoint

use axum::Json;
use serde_json::Value;
use tracing::debug;

use attrcheck_common::envelope::Envelope;
use attrcheck_common::reconcile::reconcile_records;

use super::error::ApiError;

/// POST /process-attributes/
///
/// Accepts a check-result payload in any of the three recognized envelope
/// shapes (bare array, output wrapper, direct result), runs the
/// reconciliation cascade over its records, and answers in the matching
/// shape. The body is read raw because it may arrive fenced in a markdown
/// code block rather than as plain JSON.
pub async fn process_attributes(body: String) -> Result<Json<Value>, ApiError> {
    let envelope = Envelope::parse(&body)?;
    debug!("Reconciling {} envelope", envelope_kind(&envelope));

    let response = envelope
        .map_records(reconcile_records)
        .into_response_value()?;
    Ok(Json(response))
}

fn envelope_kind(envelope: &Envelope) -> &'static str {
    match envelope {
        Envelope::Bare(_) => "bare-array",
        Envelope::OutputWrapped { .. } => "output-wrapped",
        Envelope::DirectResult { .. } => "direct-result",
    }
}

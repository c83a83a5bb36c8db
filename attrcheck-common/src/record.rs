//! Attribute record model
//!
//! Records arrive as loosely-typed JSON objects whose key set is open-ended:
//! the reconciliation rules read and rewrite a handful of known fields and
//! everything else must round-trip byte-for-byte, in its original key order.
//! `AttributeRecord` wraps an order-preserving JSON object and exposes typed
//! accessors for the known fields.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Optimization-type tag (pending / direct reference / format conversion)
pub const FIELD_OPTIMIZATION_TYPE: &str = "优化类型";
/// Original attribute value
pub const FIELD_ORIGINAL_VALUE: &str = "原属性值";
/// Recommended attribute value
pub const FIELD_RECOMMENDED_VALUE: &str = "推荐属性值";
/// Attribute name (triggers unit handling for string tension)
pub const FIELD_ATTRIBUTE_NAME: &str = "新属性名";
/// Score: 1 = verified match, 0 = needs correction
pub const FIELD_SCORE: &str = "打分";

/// A single attribute-optimization record.
///
/// Known fields are read with empty-string defaults (a missing field behaves
/// like an empty one); unknown fields are preserved verbatim. Setters insert
/// new keys at the end of the record, and rewriting an existing key keeps its
/// position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AttributeRecord {
    fields: Map<String, Value>,
}

impl AttributeRecord {
    /// Wrap an existing JSON object
    pub fn from_map(fields: Map<String, Value>) -> Self {
        Self { fields }
    }

    /// Consume the record, yielding the underlying JSON object
    pub fn into_map(self) -> Map<String, Value> {
        self.fields
    }

    pub fn optimization_type(&self) -> &str {
        self.str_field(FIELD_OPTIMIZATION_TYPE)
    }

    pub fn original_value(&self) -> &str {
        self.str_field(FIELD_ORIGINAL_VALUE)
    }

    pub fn recommended_value(&self) -> &str {
        self.str_field(FIELD_RECOMMENDED_VALUE)
    }

    pub fn attribute_name(&self) -> &str {
        self.str_field(FIELD_ATTRIBUTE_NAME)
    }

    /// Raw score value, if the field is present
    pub fn score(&self) -> Option<&Value> {
        self.fields.get(FIELD_SCORE)
    }

    /// True when the score is numerically 1 (integer or float).
    /// A missing score or a non-number value counts as "not 1".
    pub fn score_is_one(&self) -> bool {
        match self.fields.get(FIELD_SCORE) {
            Some(Value::Number(n)) => n.as_f64() == Some(1.0),
            _ => false,
        }
    }

    pub fn set_optimization_type(&mut self, value: &str) {
        self.fields.insert(
            FIELD_OPTIMIZATION_TYPE.to_string(),
            Value::String(value.to_string()),
        );
    }

    pub fn set_recommended_value(&mut self, value: String) {
        self.fields
            .insert(FIELD_RECOMMENDED_VALUE.to_string(), Value::String(value));
    }

    pub fn set_score(&mut self, score: i64) {
        self.fields.insert(FIELD_SCORE.to_string(), Value::from(score));
    }

    fn str_field(&self, name: &str) -> &str {
        self.fields.get(name).and_then(Value::as_str).unwrap_or("")
    }
}

impl From<AttributeRecord> for Value {
    fn from(record: AttributeRecord) -> Self {
        Value::Object(record.fields)
    }
}

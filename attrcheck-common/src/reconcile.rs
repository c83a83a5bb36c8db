//! Record reconciliation rule cascade
//!
//! Each record runs through an ordered rule table. A rule either finalizes
//! the record (no later rule sees it) or passes it along unchanged. The
//! cascade rewrites at most three fields (优化类型, 推荐属性值, 打分);
//! everything else rides through untouched.

use crate::convert::{kg_to_lb, validate_pound_conversion};
use crate::record::AttributeRecord;

/// Tag: value still needs to be filled in
pub const TYPE_PENDING: &str = "待补充";
/// Tag: recommended value is a direct copy of the original
pub const TYPE_DIRECT_REFERENCE: &str = "直接引用";
/// Tag: recommended value is a reformatting of the original
pub const TYPE_FORMAT_CONVERSION: &str = "格式转换";

/// Attribute whose values are weights subject to kg→lb conversion
pub const STRING_TENSION_ATTRIBUTE: &str = "穿线磅数";

/// Result of applying one rule to a record
enum RuleOutcome {
    /// Rule matched and produced the final record
    Final(AttributeRecord),
    /// Rule did not conclude; hand the record to the next rule
    Pass(AttributeRecord),
}

type Rule = fn(AttributeRecord) -> RuleOutcome;

/// Rule cascade in evaluation order. The first `Final` wins; a record that
/// passes every rule is returned unchanged.
const RULES: &[Rule] = &[
    unit_conversion_rule,
    pending_rule,
    direct_reference_rule,
    format_conversion_rule,
];

/// Reconcile a single record through the rule cascade
pub fn reconcile_record(record: AttributeRecord) -> AttributeRecord {
    let mut record = record;
    for rule in RULES {
        match rule(record) {
            RuleOutcome::Final(done) => return done,
            RuleOutcome::Pass(next) => record = next,
        }
    }
    record
}

/// Reconcile a sequence of records, preserving order and length
pub fn reconcile_records(records: Vec<AttributeRecord>) -> Vec<AttributeRecord> {
    records.into_iter().map(reconcile_record).collect()
}

/// String-tension records get their recommended value checked against the
/// kg→lb conversion of the original. A mismatch forces a format-conversion
/// rewrite carrying the converter's own output; a match falls through to
/// the tag rules with the record unchanged.
fn unit_conversion_rule(record: AttributeRecord) -> RuleOutcome {
    if record.attribute_name() != STRING_TENSION_ATTRIBUTE
        || record.original_value().is_empty()
        || record.recommended_value().is_empty()
    {
        return RuleOutcome::Pass(record);
    }
    if validate_pound_conversion(record.original_value(), record.recommended_value()) {
        return RuleOutcome::Pass(record);
    }

    let converted = kg_to_lb(record.original_value());
    let mut out = record;
    out.set_optimization_type(TYPE_FORMAT_CONVERSION);
    out.set_score(0);
    out.set_recommended_value(converted);
    RuleOutcome::Final(out)
}

/// Pending records are untouched
fn pending_rule(record: AttributeRecord) -> RuleOutcome {
    if record.optimization_type() == TYPE_PENDING {
        RuleOutcome::Final(record)
    } else {
        RuleOutcome::Pass(record)
    }
}

/// Direct-reference records score 1 when the values agree; a disagreement
/// demotes the record to format conversion with score 0
fn direct_reference_rule(record: AttributeRecord) -> RuleOutcome {
    if record.optimization_type() != TYPE_DIRECT_REFERENCE {
        return RuleOutcome::Pass(record);
    }

    let mut out = record;
    if out.original_value() == out.recommended_value() {
        if !out.score_is_one() {
            out.set_score(1);
        }
    } else {
        out.set_optimization_type(TYPE_FORMAT_CONVERSION);
        out.set_score(0);
    }
    RuleOutcome::Final(out)
}

/// Format-conversion records stay as they are while the values differ;
/// once the values agree the record is promoted to direct reference
fn format_conversion_rule(record: AttributeRecord) -> RuleOutcome {
    if record.optimization_type() != TYPE_FORMAT_CONVERSION {
        return RuleOutcome::Pass(record);
    }

    if record.original_value() != record.recommended_value() {
        return RuleOutcome::Final(record);
    }
    let mut out = record;
    out.set_optimization_type(TYPE_DIRECT_REFERENCE);
    out.set_score(1);
    RuleOutcome::Final(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    fn record(value: Value) -> AttributeRecord {
        serde_json::from_value(value).unwrap()
    }

    fn reconciled(value: Value) -> Value {
        Value::from(reconcile_record(record(value)))
    }

    #[test]
    fn test_direct_reference_match_sets_score() {
        let out = reconciled(json!({
            "优化类型": "直接引用",
            "原属性值": "A",
            "推荐属性值": "A",
            "打分": 0
        }));
        assert_eq!(out["优化类型"], "直接引用");
        assert_eq!(out["打分"], 1);
    }

    #[test]
    fn test_direct_reference_match_with_score_already_one() {
        let input = json!({
            "优化类型": "直接引用",
            "原属性值": "A",
            "推荐属性值": "A",
            "打分": 1
        });
        assert_eq!(reconciled(input.clone()), input);
    }

    #[test]
    fn test_direct_reference_mismatch_demotes() {
        let out = reconciled(json!({
            "优化类型": "直接引用",
            "原属性值": "A",
            "推荐属性值": "B"
        }));
        assert_eq!(out["优化类型"], "格式转换");
        assert_eq!(out["打分"], 0);
    }

    #[test]
    fn test_format_conversion_differing_values_unchanged() {
        let input = json!({
            "优化类型": "格式转换",
            "原属性值": "X",
            "推荐属性值": "Y",
            "打分": 0
        });
        assert_eq!(reconciled(input.clone()), input);
    }

    #[test]
    fn test_format_conversion_matching_values_promotes() {
        let out = reconciled(json!({
            "优化类型": "格式转换",
            "原属性值": "X",
            "推荐属性值": "X"
        }));
        assert_eq!(out["优化类型"], "直接引用");
        assert_eq!(out["打分"], 1);
    }

    #[test]
    fn test_pending_passthrough() {
        let input = json!({
            "优化类型": "待补充",
            "原属性值": "A",
            "推荐属性值": "B",
            "打分": 0
        });
        assert_eq!(reconciled(input.clone()), input);
    }

    #[test]
    fn test_unknown_type_passthrough() {
        let input = json!({
            "优化类型": "人工复核",
            "原属性值": "A",
            "推荐属性值": "B"
        });
        assert_eq!(reconciled(input.clone()), input);

        let no_type = json!({"原属性值": "A", "推荐属性值": "B"});
        assert_eq!(reconciled(no_type.clone()), no_type);
    }

    #[test]
    fn test_string_tension_mismatch_rewrites_recommendation() {
        let out = reconciled(json!({
            "新属性名": "穿线磅数",
            "优化类型": "直接引用",
            "原属性值": "17.6-22.3千克",
            "推荐属性值": "40-50磅",
            "打分": 1
        }));
        assert_eq!(out["优化类型"], "格式转换");
        assert_eq!(out["打分"], 0);
        assert_eq!(out["推荐属性值"], "39-49磅");
    }

    #[test]
    fn test_string_tension_valid_conversion_falls_through() {
        // Conversion checks out, so the tag rules still run: the values
        // differ, so direct reference demotes to format conversion
        let out = reconciled(json!({
            "新属性名": "穿线磅数",
            "优化类型": "直接引用",
            "原属性值": "17.6-22.3千克",
            "推荐属性值": "39-49磅"
        }));
        assert_eq!(out["优化类型"], "格式转换");
        assert_eq!(out["打分"], 0);
    }

    #[test]
    fn test_string_tension_empty_value_skips_unit_rule() {
        let input = json!({
            "新属性名": "穿线磅数",
            "优化类型": "待补充",
            "原属性值": "",
            "推荐属性值": "39-49磅"
        });
        assert_eq!(reconciled(input.clone()), input);
    }

    #[test]
    fn test_unit_rewrite_does_not_oscillate() {
        // After the unit rule fires, the recommended value is the
        // converter's own output, which validates against itself: a second
        // pass must not rewrite the record again
        let once = reconcile_record(record(json!({
            "新属性名": "穿线磅数",
            "优化类型": "直接引用",
            "原属性值": "17.6-22.3千克",
            "推荐属性值": "40-50磅"
        })));
        let twice = reconcile_record(once.clone());
        assert_eq!(once, twice);
    }

    #[test]
    fn test_reconcile_is_idempotent_across_tags() {
        let inputs = [
            json!({"优化类型": "待补充", "原属性值": "A", "推荐属性值": "B"}),
            json!({"优化类型": "直接引用", "原属性值": "A", "推荐属性值": "A", "打分": 0}),
            json!({"优化类型": "直接引用", "原属性值": "A", "推荐属性值": "B"}),
            json!({"优化类型": "格式转换", "原属性值": "X", "推荐属性值": "X"}),
            json!({"优化类型": "格式转换", "原属性值": "X", "推荐属性值": "Y"}),
            json!({"优化类型": "其他", "原属性值": "A", "推荐属性值": "B"}),
        ];
        for input in inputs {
            let once = reconcile_record(record(input));
            let twice = reconcile_record(once.clone());
            assert_eq!(once, twice);
        }
    }

    #[test]
    fn test_sequence_preserves_order_and_length() {
        let records = vec![
            record(json!({"优化类型": "待补充", "id": 1})),
            record(json!({"优化类型": "直接引用", "原属性值": "A", "推荐属性值": "A", "id": 2})),
            record(json!({"优化类型": "格式转换", "原属性值": "X", "推荐属性值": "Y", "id": 3})),
        ];
        let out = reconcile_records(records);
        assert_eq!(out.len(), 3);
        let ids: Vec<i64> = out
            .iter()
            .map(|r| Value::from(r.clone())["id"].as_i64().unwrap())
            .collect();
        assert_eq!(ids, [1, 2, 3]);
    }

    #[test]
    fn test_extra_fields_survive_rewrite() {
        let out = reconciled(json!({
            "备注": "keep me",
            "优化类型": "直接引用",
            "原属性值": "A",
            "推荐属性值": "B",
            "来源": {"表": "attrs"}
        }));
        assert_eq!(out["备注"], "keep me");
        assert_eq!(out["来源"]["表"], "attrs");
    }
}

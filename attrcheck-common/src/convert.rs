//! Kilogram→pound text conversion and validation
//!
//! Weight values travel as text with a unit suffix, either a single quantity
//! ("5千克") or a range ("17.6-22.3千克"). Conversion renders integral pound
//! values: the range start is ceiled, the range end is floored, and single
//! values round to nearest with ties to even.
//!
//! Conversion never fails: text that cannot be parsed comes back unchanged.

/// Pounds per kilogram
const KG_TO_LB: f64 = 2.20462262185;

/// Kilogram unit suffix
const KG_MARKER: &str = "千克";
/// Pound unit suffix
const LB_MARKER: &str = "磅";

/// Convert a kilogram quantity or range to pounds.
///
/// "17.6-22.3千克" → "39-49磅", "5千克" → "11磅". Returns the input
/// unchanged when it cannot be parsed as a quantity or a two-bound range.
pub fn kg_to_lb(kg_text: &str) -> String {
    try_kg_to_lb(kg_text).unwrap_or_else(|| kg_text.to_string())
}

fn try_kg_to_lb(kg_text: &str) -> Option<String> {
    if kg_text.contains('-') {
        let parts: Vec<&str> = kg_text.split('-').collect();
        // Exactly two bounds; anything else (including a leading sign) is
        // not a range we can convert
        if parts.len() != 2 {
            return None;
        }
        let start_lb = to_finite_lb(parts[0])?.ceil();
        let end_lb = to_finite_lb(parts[1])?.floor();
        Some(format!("{}-{}{}", start_lb as i64, end_lb as i64, LB_MARKER))
    } else {
        let lb = to_finite_lb(kg_text)?.round_ties_even();
        Some(format!("{}{}", lb as i64, LB_MARKER))
    }
}

fn to_finite_lb(kg_text: &str) -> Option<f64> {
    let kg: f64 = kg_text.replace(KG_MARKER, "").trim().parse().ok()?;
    let lb = kg * KG_TO_LB;
    lb.is_finite().then_some(lb)
}

/// Check a declared pound value against the conversion of the original
/// kilogram text.
///
/// Comparison is textual after stripping the pound suffix and surrounding
/// whitespace from both sides, so "39-49磅" matches "39-49" but not "39-49.0".
pub fn validate_pound_conversion(original_kg: &str, recommended_lb: &str) -> bool {
    let converted = kg_to_lb(original_kg);
    strip_lb_marker(&converted) == strip_lb_marker(recommended_lb)
}

fn strip_lb_marker(text: &str) -> String {
    text.replace(LB_MARKER, "").trim().to_string()
}

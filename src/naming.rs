//! Centralized naming conventions for generated field names and placeholders.
//!
//! Chart specifications refer to data columns by name. Aggregated columns are
//! named after the expression that produced them (`mean(price)`), compound
//! aggregates expose their statistics as nested sub-fields
//! (`quartiles(price).q1`), and multi-series charts fold measures into a pair
//! of `key`/`value` columns.
//!
//! # Categories
//!
//! - **Aggregate expressions**: `<agg>(<field>)`
//! - **Compound sub-fields**: `<expression>.<statistic>`
//! - **Fold columns**: `key`, `value`
//! - **Placeholders**: the data-stream marker substituted by the serializer

use const_format::concatcp;
use regex::Regex;
use std::sync::LazyLock;

// ============================================================================
// Fold Columns
// ============================================================================

/// Column holding the source expression name after a fold transform
pub const FOLD_KEY: &str = "key";

/// Column holding the folded value after a fold transform
pub const FOLD_VALUE: &str = "value";

// ============================================================================
// Placeholders
// ============================================================================

const PLACEHOLDER_MARK: &str = "$";

/// Marker written into `data.values` before a spec is embedded in a code cell.
/// The serializer replaces the quoted marker with a stream expression.
pub const DATA_STREAM_PLACEHOLDER: &str =
    concatcp!(PLACEHOLDER_MARK, "DATA_STREAM", PLACEHOLDER_MARK);

/// The placeholder as it appears in serialized JSON (quoted)
pub const QUOTED_DATA_STREAM_PLACEHOLDER: &str = concatcp!("\"", DATA_STREAM_PLACEHOLDER, "\"");

/// `<agg>(<field>)`, where the field may itself contain parentheses
static AGGREGATE_EXPRESSION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([A-Za-z]+)\((.+)\)$").expect("aggregate expression pattern is valid")
});

// ============================================================================
// Quartile Statistics
// ============================================================================

/// Name of the compound aggregate
pub const QUARTILES: &str = "quartiles";

/// Sub-fields produced by the compound `quartiles` aggregate, in output order
pub const QUARTILE_STATS: [&str; 6] = ["min", "q1", "median", "q3", "max", "mean"];

// ============================================================================
// Constructor Functions
// ============================================================================

/// Name of an aggregated column.
///
/// # Example
/// ```
/// use plotsynth::naming;
/// assert_eq!(naming::aggregate_expression("mean", "price"), "mean(price)");
/// ```
pub fn aggregate_expression(agg: &str, field: &str) -> String {
    format!("{}({})", agg, field)
}

/// Name of a statistic nested under a compound column.
///
/// # Example
/// ```
/// use plotsynth::naming;
/// assert_eq!(naming::sub_field("quartiles(price)", "q1"), "quartiles(price).q1");
/// ```
pub fn sub_field(expression: &str, stat: &str) -> String {
    format!("{}.{}", expression, stat)
}

// ============================================================================
// Parsing Functions
// ============================================================================

/// Split a compound sub-column into `(expression, statistic)`.
///
/// Only a `quartiles(<field>)` prefix followed by one of [`QUARTILE_STATS`]
/// qualifies, so user columns that merely contain a dot are left alone.
///
/// # Example
/// ```
/// use plotsynth::naming;
/// assert_eq!(
///     naming::split_sub_field("quartiles(price).median"),
///     Some(("quartiles(price)", "median"))
/// );
/// assert_eq!(naming::split_sub_field("price.usd"), None);
/// assert_eq!(naming::split_sub_field("price(usd).eur"), None);
/// ```
pub fn split_sub_field(name: &str) -> Option<(&str, &str)> {
    let (expression, stat) = name.rsplit_once('.')?;
    if !QUARTILE_STATS.contains(&stat) {
        return None;
    }
    match split_aggregate_expression(expression) {
        Some((agg, _)) if agg == QUARTILES => Some((expression, stat)),
        _ => None,
    }
}

/// Split an aggregate expression into `(agg, field)`.
///
/// Returns `None` for bare field names.
///
/// # Example
/// ```
/// use plotsynth::naming;
/// assert_eq!(naming::split_aggregate_expression("count(id)"), Some(("count", "id")));
/// assert_eq!(naming::split_aggregate_expression("id"), None);
/// ```
pub fn split_aggregate_expression(expression: &str) -> Option<(&str, &str)> {
    let caps = AGGREGATE_EXPRESSION.captures(expression)?;
    let agg = caps.get(1)?.as_str();
    let field = caps.get(2)?.as_str();
    Some((agg, field))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_placeholder_constants() {
        assert_eq!(DATA_STREAM_PLACEHOLDER, "$DATA_STREAM$");
        assert_eq!(QUOTED_DATA_STREAM_PLACEHOLDER, "\"$DATA_STREAM$\"");
    }

    #[test]
    fn test_aggregate_expression() {
        assert_eq!(aggregate_expression("mean", "a"), "mean(a)");
        assert_eq!(aggregate_expression("quartiles", "b c"), "quartiles(b c)");
    }

    #[test]
    fn test_split_sub_field() {
        assert_eq!(split_sub_field("quartiles(a).q3"), Some(("quartiles(a)", "q3")));
        // Nested parentheses in the field name
        assert_eq!(
            split_sub_field("quartiles(f(x)).max"),
            Some(("quartiles(f(x))", "max"))
        );
        assert_eq!(split_sub_field("mean(a)"), None);
        assert_eq!(split_sub_field("quartiles(a)."), None);
        assert_eq!(split_sub_field("plain.name"), None);
        // User columns shaped like expressions stay flat
        assert_eq!(split_sub_field("price(usd).eur"), None);
        assert_eq!(split_sub_field("mean(a).median"), None);
        assert_eq!(split_sub_field("quartiles(a).total"), None);
    }

    #[test]
    fn test_split_aggregate_expression() {
        assert_eq!(split_aggregate_expression("mean(a)"), Some(("mean", "a")));
        assert_eq!(
            split_aggregate_expression("quartiles(total (usd))"),
            Some(("quartiles", "total (usd)"))
        );
        assert_eq!(split_aggregate_expression("a"), None);
        assert_eq!(split_aggregate_expression("(a)"), None);
        assert_eq!(split_aggregate_expression("1x(a)"), None);
    }
}

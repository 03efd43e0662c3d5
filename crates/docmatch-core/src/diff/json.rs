use std::collections::BTreeMap;

use crate::config::JsonConfig;
use crate::matcher::Matcher;
use crate::value::DocumentValue;

use super::unordered::greedy_pairing;
use super::{DiffKind, DiffValue, Difference};

/// Compares an expected JSON tree against an actual one.
///
/// `path` is the path of the two roots; pass [`super::JSON_ROOT_PATH`] for a
/// whole document. Every mismatch found anywhere below is returned, in
/// discovery order (use [`super::sort_differences`] for report order).
pub fn compare_json(
    expected: &DocumentValue,
    actual: &DocumentValue,
    path: &str,
    config: &JsonConfig,
) -> Vec<Difference> {
    let mut diffs = Vec::new();
    compare_value(expected, actual, path, config, &mut diffs);
    tracing::debug!(path, differences = diffs.len(), "compared JSON trees");
    diffs
}

fn compare_value(
    expected: &DocumentValue,
    actual: &DocumentValue,
    path: &str,
    config: &JsonConfig,
    diffs: &mut Vec<Difference>,
) {
    if config.is_field_ignored(path) {
        return;
    }

    if let DocumentValue::Matcher(matcher) = expected {
        check_matcher(matcher, actual, path, diffs);
        return;
    }

    match (expected.is_null(), actual.is_null()) {
        (true, true) => return,
        (true, false) => {
            diffs.push(Difference::new(
                path,
                DiffKind::Added,
                DiffValue::Absent,
                value(actual),
            ));
            return;
        }
        (false, true) => {
            diffs.push(Difference::new(
                path,
                DiffKind::Removed,
                value(expected),
                DiffValue::Absent,
            ));
            return;
        }
        (false, false) => {}
    }

    match expected {
        DocumentValue::Object(exp) => match actual {
            DocumentValue::Object(act) => compare_objects(exp, act, path, config, diffs),
            DocumentValue::Null
            | DocumentValue::Bool(_)
            | DocumentValue::Integer(_)
            | DocumentValue::UnsignedInteger(_)
            | DocumentValue::Float(_)
            | DocumentValue::String(_)
            | DocumentValue::Array(_)
            | DocumentValue::Matcher(_) => type_mismatch(expected, actual, path, diffs),
        },
        DocumentValue::Array(exp) => match actual {
            DocumentValue::Array(act) => {
                if config.should_ignore_array_order(path) {
                    compare_arrays_unordered(exp, act, path, config, diffs);
                } else {
                    compare_arrays_ordered(exp, act, path, config, diffs);
                }
            }
            DocumentValue::Null
            | DocumentValue::Bool(_)
            | DocumentValue::Integer(_)
            | DocumentValue::UnsignedInteger(_)
            | DocumentValue::Float(_)
            | DocumentValue::String(_)
            | DocumentValue::Object(_)
            | DocumentValue::Matcher(_) => type_mismatch(expected, actual, path, diffs),
        },
        DocumentValue::String(exp) => match actual.as_str() {
            Some(act) => {
                if exp != act {
                    changed(expected, actual, path, diffs);
                }
            }
            None => type_mismatch(expected, actual, path, diffs),
        },
        DocumentValue::Bool(exp) => match actual {
            DocumentValue::Bool(act) => {
                if exp != act {
                    changed(expected, actual, path, diffs);
                }
            }
            DocumentValue::Null
            | DocumentValue::Integer(_)
            | DocumentValue::UnsignedInteger(_)
            | DocumentValue::Float(_)
            | DocumentValue::String(_)
            | DocumentValue::Array(_)
            | DocumentValue::Object(_)
            | DocumentValue::Matcher(_) => type_mismatch(expected, actual, path, diffs),
        },
        DocumentValue::Integer(_) | DocumentValue::UnsignedInteger(_) | DocumentValue::Float(_) => {
            compare_numbers(expected, actual, path, diffs);
        }
        // Both handled above.
        DocumentValue::Null | DocumentValue::Matcher(_) => {}
    }
}

fn check_matcher(
    matcher: &Matcher,
    actual: &DocumentValue,
    path: &str,
    diffs: &mut Vec<Difference>,
) {
    if matcher.is_ignore() || matcher.matches(Some(actual)) {
        return;
    }
    diffs.push(Difference::new(
        path,
        DiffKind::MatcherFailed,
        DiffValue::Description(matcher.describe()),
        value(actual),
    ));
}

fn compare_objects(
    expected: &BTreeMap<String, DocumentValue>,
    actual: &BTreeMap<String, DocumentValue>,
    path: &str,
    config: &JsonConfig,
    diffs: &mut Vec<Difference>,
) {
    for (key, exp_val) in expected {
        let child = format!("{path}.{key}");
        if config.is_field_ignored(&child) {
            continue;
        }
        if exp_val.as_matcher().is_some_and(Matcher::is_ignore) {
            continue;
        }
        match actual.get(key) {
            Some(act_val) => compare_value(exp_val, act_val, &child, config, diffs),
            None => diffs.push(Difference::new(
                child,
                DiffKind::Removed,
                value(exp_val),
                DiffValue::Absent,
            )),
        }
    }

    for (key, act_val) in actual {
        if expected.contains_key(key) {
            continue;
        }
        let child = format!("{path}.{key}");
        if config.is_field_ignored(&child) {
            continue;
        }
        diffs.push(Difference::new(
            child,
            DiffKind::Added,
            DiffValue::Absent,
            value(act_val),
        ));
    }
}

fn compare_arrays_ordered(
    expected: &[DocumentValue],
    actual: &[DocumentValue],
    path: &str,
    config: &JsonConfig,
    diffs: &mut Vec<Difference>,
) {
    for i in 0..expected.len().max(actual.len()) {
        let child = format!("{path}[{i}]");
        match (expected.get(i), actual.get(i)) {
            (Some(exp), Some(act)) => compare_value(exp, act, &child, config, diffs),
            (Some(exp), None) => diffs.push(Difference::new(
                child,
                DiffKind::Removed,
                value(exp),
                DiffValue::Absent,
            )),
            (None, Some(act)) => diffs.push(Difference::new(
                child,
                DiffKind::Added,
                DiffValue::Absent,
                value(act),
            )),
            (None, None) => {}
        }
    }
}

fn compare_arrays_unordered(
    expected: &[DocumentValue],
    actual: &[DocumentValue],
    path: &str,
    config: &JsonConfig,
    diffs: &mut Vec<Difference>,
) {
    if expected.len() != actual.len() {
        diffs.push(Difference::new(
            path,
            DiffKind::Changed,
            DiffValue::Description(format!("array of length {}", expected.len())),
            DiffValue::Description(format!("array of length {}", actual.len())),
        ));
        return;
    }

    let child_path = |i: usize| format!("{path}[{i}]");
    let positions: Vec<usize> = (0..expected.len()).collect();
    let unmatched = greedy_pairing(&positions, actual, |&i, act| {
        let mut trial = Vec::new();
        compare_value(&expected[i], act, &child_path(i), config, &mut trial);
        trial.is_empty()
    });

    for pair in unmatched {
        let exp = &expected[pair.expected];
        diffs.push(Difference::new(
            child_path(pair.expected),
            DiffKind::Changed,
            value(exp),
            pair.actual
                .and_then(|j| actual.get(j))
                .map_or(DiffValue::Absent, value),
        ));
    }
}

fn compare_numbers(
    expected: &DocumentValue,
    actual: &DocumentValue,
    path: &str,
    diffs: &mut Vec<Difference>,
) {
    match (expected.as_f64(), actual.as_f64()) {
        (Some(exp), Some(act)) => {
            if exp != act {
                changed(expected, actual, path, diffs);
            }
        }
        (Some(_) | None, None) | (None, Some(_)) => type_mismatch(expected, actual, path, diffs),
    }
}

fn value(v: &DocumentValue) -> DiffValue {
    DiffValue::Value(v.clone())
}

fn changed(
    expected: &DocumentValue,
    actual: &DocumentValue,
    path: &str,
    diffs: &mut Vec<Difference>,
) {
    diffs.push(Difference::new(
        path,
        DiffKind::Changed,
        value(expected),
        value(actual),
    ));
}

fn type_mismatch(
    expected: &DocumentValue,
    actual: &DocumentValue,
    path: &str,
    diffs: &mut Vec<Difference>,
) {
    diffs.push(Difference::new(
        path,
        DiffKind::TypeMismatch,
        value(expected),
        value(actual),
    ));
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used)]

    use super::*;
    use crate::diff::JSON_ROOT_PATH;

    fn doc(text: &str) -> DocumentValue {
        DocumentValue::from(serde_json::from_str::<serde_json::Value>(text).expect("valid json"))
    }

    fn run(expected: &DocumentValue, actual: &str, config: &JsonConfig) -> Vec<Difference> {
        compare_json(expected, &doc(actual), JSON_ROOT_PATH, config)
    }

    fn summary(diffs: &[Difference]) -> Vec<(&str, DiffKind)> {
        diffs.iter().map(|d| (d.path.as_str(), d.kind)).collect()
    }

    #[test]
    fn identical_documents_have_no_differences() {
        let text = r#"{"a":[1,2,{"b":null}],"c":"x","d":true,"e":1.5}"#;
        assert!(run(&doc(text), text, &JsonConfig::default()).is_empty());
    }

    #[test]
    fn changed_string_reports_both_sides() {
        let diffs = run(
            &doc(r#"{"name":"Alice","age":30}"#),
            r#"{"name":"Bob","age":30}"#,
            &JsonConfig::default(),
        );
        assert_eq!(diffs.len(), 1);
        assert_eq!(diffs[0].path, "$.name");
        assert_eq!(diffs[0].kind, DiffKind::Changed);
        assert_eq!(diffs[0].expected, DiffValue::text("Alice"));
        assert_eq!(diffs[0].actual, DiffValue::text("Bob"));
    }

    #[test]
    fn numbers_compare_across_representations() {
        let diffs = run(&doc(r#"{"n":30}"#), r#"{"n":30.0}"#, &JsonConfig::default());
        assert!(diffs.is_empty());
    }

    #[test]
    fn missing_and_extra_keys() {
        let diffs = run(
            &doc(r#"{"a":1,"b":2}"#),
            r#"{"a":1,"c":3}"#,
            &JsonConfig::default(),
        );
        assert_eq!(
            summary(&diffs),
            vec![("$.b", DiffKind::Removed), ("$.c", DiffKind::Added)]
        );
    }

    #[test]
    fn null_against_value() {
        let diffs = run(&doc(r#"{"a":null,"b":1}"#), r#"{"a":1,"b":null}"#, &JsonConfig::default());
        assert_eq!(
            summary(&diffs),
            vec![("$.a", DiffKind::Added), ("$.b", DiffKind::Removed)]
        );
    }

    #[test]
    fn type_mismatches() {
        let diffs = run(
            &doc(r#"{"a":"1","b":1,"c":[],"d":{},"e":true}"#),
            r#"{"a":1,"b":"1","c":{},"d":[],"e":"true"}"#,
            &JsonConfig::default(),
        );
        assert_eq!(diffs.len(), 5);
        assert!(diffs.iter().all(|d| d.kind == DiffKind::TypeMismatch));
    }

    #[test]
    fn ordered_arrays_report_tail_differences() {
        let diffs = run(&doc("[1,2,3]"), "[1,5]", &JsonConfig::default());
        assert_eq!(
            summary(&diffs),
            vec![("$[1]", DiffKind::Changed), ("$[2]", DiffKind::Removed)]
        );
        let diffs = run(&doc("[1]"), "[1,2]", &JsonConfig::default());
        assert_eq!(summary(&diffs), vec![("$[1]", DiffKind::Added)]);
    }

    #[test]
    fn matcher_failure_reports_description() {
        let mut map = BTreeMap::new();
        map.insert("id".to_owned(), DocumentValue::Matcher(Matcher::AnyInt));
        let diffs = run(&DocumentValue::Object(map), r#"{"id":"abc"}"#, &JsonConfig::default());
        assert_eq!(diffs.len(), 1);
        assert_eq!(diffs[0].kind, DiffKind::MatcherFailed);
        assert_eq!(
            diffs[0].expected,
            DiffValue::Description("{{anyInt}}".to_owned())
        );
    }

    #[test]
    fn ignore_matcher_skips_missing_field() {
        let mut map = BTreeMap::new();
        map.insert("ts".to_owned(), DocumentValue::Matcher(Matcher::Ignore));
        assert!(run(&DocumentValue::Object(map), "{}", &JsonConfig::default()).is_empty());
    }

    #[test]
    fn any_value_still_requires_presence() {
        let mut map = BTreeMap::new();
        map.insert("x".to_owned(), DocumentValue::Matcher(Matcher::AnyValue));
        let diffs = run(&DocumentValue::Object(map), "{}", &JsonConfig::default());
        assert_eq!(summary(&diffs), vec![("$.x", DiffKind::Removed)]);
    }

    #[test]
    fn ignored_fields_are_skipped_on_both_sides() {
        let config = JsonConfig::default().ignore_fields(["updated_at"]);
        let diffs = run(
            &doc(r#"{"a":{"updated_at":1}}"#),
            r#"{"a":{"updated_at":2},"updated_at":3}"#,
            &config,
        );
        assert!(diffs.is_empty());
    }

    #[test]
    fn unordered_length_mismatch_is_one_difference() {
        let config = JsonConfig::default().ignore_array_order();
        let diffs = run(&doc(r#"{"t":[1,2,3]}"#), r#"{"t":[1,2]}"#, &config);
        assert_eq!(diffs.len(), 1);
        assert_eq!(diffs[0].path, "$.t");
        assert_eq!(
            diffs[0].expected,
            DiffValue::Description("array of length 3".to_owned())
        );
    }

    #[test]
    fn unordered_unmatched_pairs_with_leftovers() {
        let config = JsonConfig::default().ignore_array_order_at("$.t");
        let diffs = run(&doc(r#"{"t":["a","b","c"]}"#), r#"{"t":["c","x","a"]}"#, &config);
        assert_eq!(diffs.len(), 1);
        assert_eq!(diffs[0].path, "$.t[1]");
        assert_eq!(diffs[0].kind, DiffKind::Changed);
        assert_eq!(diffs[0].expected, DiffValue::text("b"));
        assert_eq!(diffs[0].actual, DiffValue::text("x"));
    }

    #[test]
    fn unordered_objects_compare_structurally() {
        let config = JsonConfig::default().ignore_array_order();
        let diffs = run(
            &doc(r#"[{"id":1,"v":"a"},{"id":2,"v":"b"}]"#),
            r#"[{"id":2,"v":"b"},{"id":1,"v":"a"}]"#,
            &config,
        );
        assert!(diffs.is_empty());
    }
}

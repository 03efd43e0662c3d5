/// Rewriting expected documents from actual output.
///
/// When an expected file is refreshed, the actual document becomes the new
/// expectation. For JSON, every path that held a matcher in the old expected
/// file (and still exists in the actual document) keeps that matcher, so
/// volatile fields such as ids and timestamps stay templated.
use crate::html::{HtmlNode, render_pretty};
use crate::json::ExpectedJson;
use crate::template::pretty_json_template;
use crate::value::DocumentValue;

/// The new expected-file text for a JSON check: the actual document with the
/// old file's matchers carried over, pretty-printed, with a trailing newline.
pub fn updated_expected_json(expected: &ExpectedJson, actual: &DocumentValue) -> String {
    let merged = carry_matchers(&expected.root, actual);
    tracing::debug!(
        matchers = expected.matcher_positions().len(),
        "rewriting expected JSON"
    );
    let mut text = pretty_json_template(&merged);
    text.push('\n');
    text
}

/// Expected-file text for a JSON document seen for the first time.
pub fn initial_expected_json(actual: &DocumentValue) -> String {
    let mut text = pretty_json_template(actual);
    text.push('\n');
    text
}

/// Expected-file text for an HTML document: the indented rendering of the
/// actual tree with a trailing newline.
pub fn render_expected_html(actual: &HtmlNode) -> String {
    let mut text = render_pretty(actual);
    text.push('\n');
    text
}

/// The actual tree, with each node replaced by the expected matcher found at
/// the same position.
fn carry_matchers(expected: &DocumentValue, actual: &DocumentValue) -> DocumentValue {
    match (expected, actual) {
        (DocumentValue::Matcher(m), _) => DocumentValue::Matcher(m.clone()),
        (DocumentValue::Object(exp), DocumentValue::Object(act)) => DocumentValue::Object(
            act.iter()
                .map(|(key, act_val)| {
                    let merged = match exp.get(key) {
                        Some(exp_val) => carry_matchers(exp_val, act_val),
                        None => act_val.clone(),
                    };
                    (key.clone(), merged)
                })
                .collect(),
        ),
        (DocumentValue::Array(exp), DocumentValue::Array(act)) => DocumentValue::Array(
            act.iter()
                .enumerate()
                .map(|(i, act_val)| match exp.get(i) {
                    Some(exp_val) => carry_matchers(exp_val, act_val),
                    None => act_val.clone(),
                })
                .collect(),
        ),
        (
            DocumentValue::Null
            | DocumentValue::Bool(_)
            | DocumentValue::Integer(_)
            | DocumentValue::UnsignedInteger(_)
            | DocumentValue::Float(_)
            | DocumentValue::String(_)
            | DocumentValue::Array(_)
            | DocumentValue::Object(_),
            _,
        ) => actual.clone(),
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used)]

    use super::*;
    use crate::config::JsonConfig;
    use crate::diff::{JSON_ROOT_PATH, compare_json};
    use crate::html::parse_actual_html;
    use crate::json::{parse_actual_json, parse_expected_json};

    #[test]
    fn matchers_are_carried_over() {
        let expected =
            parse_expected_json(r#"{"id": "{{anyString}}", "name": "Alice", "n": {{anyInt}}}"#)
                .expect("expected");
        let actual = parse_actual_json(br#"{"id": "x-1", "name": "Bob", "n": 7, "new": true}"#)
            .expect("actual");
        let text = updated_expected_json(&expected, &actual);
        assert_eq!(
            text,
            "{\n  \"id\": \"{{anyString}}\",\n  \"n\": \"{{anyInt}}\",\n  \"name\": \"Bob\",\n  \"new\": true\n}\n"
        );
    }

    #[test]
    fn rewritten_file_matches_the_actual_document() {
        let expected = parse_expected_json(
            r#"{"email": "{{regex `^[a-z]+@example\.com$`}}", "tags": [{{oneOf "a" "b"}}, "c"]}"#,
        )
        .expect("expected");
        let actual = parse_actual_json(br#"{"email": "bob@example.com", "tags": ["b", "d"]}"#)
            .expect("actual");
        let text = updated_expected_json(&expected, &actual);

        let reparsed = parse_expected_json(&text).expect("rewritten file parses");
        assert_eq!(reparsed.matcher_positions(), expected.matcher_positions());
        assert!(compare_json(&reparsed.root, &actual, JSON_ROOT_PATH, &JsonConfig::default()).is_empty());
    }

    #[test]
    fn vanished_matcher_positions_are_dropped() {
        let expected = parse_expected_json(r#"{"a": {{anyInt}}, "b": 1}"#).expect("expected");
        let actual = parse_actual_json(br#"{"b": 2}"#).expect("actual");
        assert_eq!(updated_expected_json(&expected, &actual), "{\n  \"b\": 2\n}\n");
    }

    #[test]
    fn matcher_replaces_container() {
        let expected = parse_expected_json(r#"{"meta": "{{ignore}}"}"#).expect("expected");
        let actual = parse_actual_json(br#"{"meta": {"took": 12}}"#).expect("actual");
        assert_eq!(
            updated_expected_json(&expected, &actual),
            "{\n  \"meta\": \"{{ignore}}\"\n}\n"
        );
    }

    #[test]
    fn initial_json_is_pretty_with_newline() {
        let actual = parse_actual_json(br#"{"b":1,"a":[true,null]}"#).expect("actual");
        assert_eq!(
            initial_expected_json(&actual),
            "{\n  \"a\": [\n    true,\n    null\n  ],\n  \"b\": 1\n}\n"
        );
    }

    #[test]
    fn html_is_rendered_with_newline() {
        let text = render_expected_html(&parse_actual_html("<p>Hi</p>"));
        assert!(text.ends_with("</html>\n"), "{text}");
        assert!(text.contains("    <p>Hi</p>\n"), "{text}");
    }
}

/// JSON documents: expected templates and actual payloads.
///
/// Expected text goes through placeholder substitution before `serde_json`
/// sees it, so `{"age": {{anyInt}}}` parses. A string that is exactly one
/// placeholder becomes a [`DocumentValue::Matcher`]; placeholders embedded in
/// longer strings or in object keys are restored to their `{{expr}}` text and
/// compared literally.
use std::collections::BTreeMap;

use crate::diff::JSON_ROOT_PATH;
use crate::error::{DocumentFormat, Error};
use crate::template::{Placeholders, Quoting, substitute};
use crate::value::DocumentValue;

/// A parsed expected JSON document.
#[derive(Debug, Clone)]
pub struct ExpectedJson {
    /// The normalized tree with matchers in place.
    pub root: DocumentValue,
    /// The placeholders found in the source text.
    pub placeholders: Placeholders,
    /// The expected file's text, unmodified.
    pub raw: String,
}

impl ExpectedJson {
    /// Sentinel token → expression for every placeholder in the source.
    pub fn matcher_expressions(&self) -> BTreeMap<String, String> {
        self.placeholders.table()
    }

    /// Path → matcher description for every matcher in the tree.
    pub fn matcher_positions(&self) -> BTreeMap<String, String> {
        let mut positions = BTreeMap::new();
        collect_positions(&self.root, JSON_ROOT_PATH, &mut positions);
        positions
    }
}

fn collect_positions(value: &DocumentValue, path: &str, positions: &mut BTreeMap<String, String>) {
    match value {
        DocumentValue::Matcher(m) => {
            positions.insert(path.to_owned(), m.describe());
        }
        DocumentValue::Array(items) => {
            for (i, item) in items.iter().enumerate() {
                collect_positions(item, &format!("{path}[{i}]"), positions);
            }
        }
        DocumentValue::Object(map) => {
            for (key, item) in map {
                collect_positions(item, &format!("{path}.{key}"), positions);
            }
        }
        DocumentValue::Null
        | DocumentValue::Bool(_)
        | DocumentValue::Integer(_)
        | DocumentValue::UnsignedInteger(_)
        | DocumentValue::Float(_)
        | DocumentValue::String(_) => {}
    }
}

/// Parses an expected JSON document, turning `{{...}}` placeholders into
/// matchers.
///
/// # Errors
///
/// - [`Error::DocumentParse`] if the substituted text is not valid JSON.
/// - [`Error::Matcher`] if a whole-value placeholder holds an invalid
///   expression.
pub fn parse_expected_json(text: &str) -> Result<ExpectedJson, Error> {
    let substitution = substitute(text, Quoting::Json);
    let parsed: serde_json::Value =
        serde_json::from_str(&substitution.text).map_err(json_error)?;
    let placeholders = substitution.placeholders;
    let root = resolve(parsed, &placeholders)?;
    tracing::debug!(
        format = %DocumentFormat::Json,
        placeholders = placeholders.len(),
        "parsed expected document"
    );
    Ok(ExpectedJson {
        root,
        placeholders,
        raw: text.to_owned(),
    })
}

/// Parses an actual JSON payload. `{{...}}` text is kept literally.
///
/// # Errors
///
/// [`Error::DocumentParse`] if the bytes are not valid UTF-8 JSON.
pub fn parse_actual_json(bytes: &[u8]) -> Result<DocumentValue, Error> {
    let parsed: serde_json::Value = serde_json::from_slice(bytes).map_err(json_error)?;
    Ok(DocumentValue::from(parsed))
}

fn json_error(e: serde_json::Error) -> Error {
    Error::DocumentParse {
        format: DocumentFormat::Json,
        detail: e.to_string(),
    }
}

fn resolve(value: serde_json::Value, placeholders: &Placeholders) -> Result<DocumentValue, Error> {
    if placeholders.is_empty() {
        return Ok(DocumentValue::from(value));
    }
    match value {
        serde_json::Value::String(s) => match placeholders.whole(&s) {
            Some(index) => placeholders.resolve(index).map(DocumentValue::Matcher),
            None => Ok(DocumentValue::String(placeholders.restore(&s))),
        },
        serde_json::Value::Array(items) => items
            .into_iter()
            .map(|item| resolve(item, placeholders))
            .collect::<Result<Vec<_>, _>>()
            .map(DocumentValue::Array),
        serde_json::Value::Object(map) => {
            let mut out = BTreeMap::new();
            for (key, item) in map {
                out.insert(placeholders.restore(&key), resolve(item, placeholders)?);
            }
            Ok(DocumentValue::Object(out))
        }
        other @ (serde_json::Value::Null
        | serde_json::Value::Bool(_)
        | serde_json::Value::Number(_)) => Ok(DocumentValue::from(other)),
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used)]
    #![allow(clippy::panic)]

    use super::*;
    use crate::error::MatcherError;
    use crate::matcher::Matcher;

    #[test]
    fn bare_placeholder_in_value_position() {
        let expected = parse_expected_json(r#"{"age": {{anyInt}}, "name": "{{anyString}}"}"#)
            .expect("parse");
        assert_eq!(
            expected.root.get("age"),
            Some(&DocumentValue::Matcher(Matcher::AnyInt))
        );
        assert_eq!(
            expected.root.get("name"),
            Some(&DocumentValue::Matcher(Matcher::AnyString))
        );
    }

    #[test]
    fn regex_source_text_is_not_json_unescaped() {
        let expected = parse_expected_json(r#"{"zip": "{{regex `^\d{5}$`}}"}"#).expect("parse");
        match expected.root.get("zip") {
            Some(DocumentValue::Matcher(Matcher::Regex(r))) => assert_eq!(r.pattern(), r"^\d{5}$"),
            other => panic!("expected a regex matcher, got {other:?}"),
        }
    }

    #[test]
    fn embedded_placeholders_stay_literal() {
        let expected =
            parse_expected_json(r#"{"greeting": "Hello {{anyString}}!", "{{anyString}}": 1}"#)
                .expect("parse");
        assert_eq!(
            expected.root.get("greeting"),
            Some(&DocumentValue::String("Hello {{anyString}}!".to_owned()))
        );
        assert_eq!(
            expected.root.get("{{anyString}}"),
            Some(&DocumentValue::Integer(1))
        );
    }

    #[test]
    fn matchers_inside_arrays() {
        let expected = parse_expected_json(r#"[1, {{anyFloat}}, {"x": "{{ignore}}"}]"#)
            .expect("parse");
        let positions = expected.matcher_positions();
        assert_eq!(positions.get("$[1]").map(String::as_str), Some("{{anyFloat}}"));
        assert_eq!(positions.get("$[2].x").map(String::as_str), Some("{{ignore}}"));
        assert_eq!(expected.matcher_expressions().len(), 2);
    }

    #[test]
    fn invalid_json_is_a_parse_error() {
        let err = parse_expected_json(r#"{"a": }"#).expect_err("invalid JSON");
        assert!(matches!(
            err,
            Error::DocumentParse { format: DocumentFormat::Json, .. }
        ));
        assert!(err.to_string().contains("line 1"), "{err}");
    }

    #[test]
    fn unknown_matcher_names_the_expression() {
        let err = parse_expected_json(r#"{"a": {{anyThing}}}"#).expect_err("unknown matcher");
        match err {
            Error::Matcher { expression, source } => {
                assert_eq!(expression, "anyThing");
                assert!(matches!(source, MatcherError::UnknownMatcher { .. }));
            }
            other => panic!("unexpected error {other}"),
        }
    }

    #[test]
    fn actual_json_keeps_placeholder_text() {
        let actual = parse_actual_json(br#"{"a": "{{anyInt}}"}"#).expect("parse");
        assert_eq!(
            actual.get("a"),
            Some(&DocumentValue::String("{{anyInt}}".to_owned()))
        );
    }

    #[test]
    fn actual_json_rejects_invalid_utf8() {
        let err = parse_actual_json(&[b'"', 0xff, b'"']).expect_err("invalid utf-8");
        assert!(matches!(err, Error::DocumentParse { .. }));
    }
}

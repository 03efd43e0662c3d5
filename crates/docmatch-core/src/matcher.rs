/// Placeholder matchers: the fixed vocabulary of rules that can stand in for a
/// literal value inside an expected document.
///
/// A matcher is written in an expected file as `{{ <expression> }}`. The
/// expression grammar is deliberately small:
///
/// | Expression | Matches |
/// |---|---|
/// | `anyString` | any string |
/// | `anyInt` | any integer (or a float with no fractional part) |
/// | `anyFloat` | any number |
/// | `anyBool` | any boolean |
/// | `anyValue` | anything, including `null` and absence |
/// | `ignore` | anything; the comparator also skips the node entirely |
/// | `` regex `pattern` `` | strings matching the (unanchored) pattern |
/// | `oneOf "a" "b" ...` | strings equal to one of the listed values |
use std::fmt;

use regex::Regex;

use crate::error::MatcherError;
use crate::value::DocumentValue;

/// A comparison rule standing in for a literal expected value.
///
/// Matchers are immutable once constructed. Equality compares the
/// expression a matcher was built from, so two `Regex` matchers with the same
/// pattern text are equal.
#[derive(Debug, Clone)]
pub enum Matcher {
    /// Matches any string.
    AnyString,
    /// Matches integers, and floats equal to their own truncation.
    AnyInt,
    /// Matches any numeric value.
    AnyFloat,
    /// Matches any boolean.
    AnyBool,
    /// Matches anything, including `null` and an absent value.
    AnyValue,
    /// Matches anything and marks the node as skipped by the comparator.
    Ignore,
    /// Matches strings against a compiled pattern.
    Regex(RegexMatcher),
    /// Matches strings equal to one of the listed values (insertion order kept
    /// for display).
    OneOf(Vec<String>),
}

/// A compiled regular expression together with its source text.
#[derive(Debug, Clone)]
pub struct RegexMatcher {
    pattern: String,
    compiled: Regex,
}

impl RegexMatcher {
    /// Compiles `pattern`.
    ///
    /// # Errors
    ///
    /// Returns [`MatcherError::InvalidPattern`] if the pattern does not compile.
    pub fn new(pattern: &str) -> Result<Self, MatcherError> {
        let compiled = Regex::new(pattern).map_err(|source| MatcherError::InvalidPattern {
            pattern: pattern.to_owned(),
            source,
        })?;
        Ok(Self {
            pattern: pattern.to_owned(),
            compiled,
        })
    }

    /// The pattern exactly as written in the template.
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Returns `true` if the pattern matches anywhere in `text`.
    pub fn is_match(&self, text: &str) -> bool {
        self.compiled.is_match(text)
    }
}

impl PartialEq for RegexMatcher {
    fn eq(&self, other: &Self) -> bool {
        self.pattern == other.pattern
    }
}

impl PartialEq for Matcher {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Regex(a), Self::Regex(b)) => a == b,
            (Self::OneOf(a), Self::OneOf(b)) => a == b,
            (a, b) => std::mem::discriminant(a) == std::mem::discriminant(b),
        }
    }
}

impl Matcher {
    /// Builds a [`Matcher::Regex`] from `pattern`.
    ///
    /// # Errors
    ///
    /// Returns [`MatcherError::InvalidPattern`] if the pattern does not compile.
    pub fn regex(pattern: &str) -> Result<Self, MatcherError> {
        RegexMatcher::new(pattern).map(Self::Regex)
    }

    /// Builds a [`Matcher::OneOf`] from the allowed values.
    pub fn one_of<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::OneOf(values.into_iter().map(Into::into).collect())
    }

    /// Returns `true` for [`Matcher::Ignore`].
    pub fn is_ignore(&self) -> bool {
        matches!(self, Self::Ignore)
    }

    /// Tests a document value. `None` stands for an absent value.
    pub fn matches(&self, actual: Option<&DocumentValue>) -> bool {
        match self {
            Self::AnyValue | Self::Ignore => true,
            Self::AnyString => matches!(actual, Some(DocumentValue::String(_))),
            Self::AnyInt => match actual {
                Some(DocumentValue::Integer(_) | DocumentValue::UnsignedInteger(_)) => true,
                Some(DocumentValue::Float(f)) => f.is_finite() && *f == f.trunc(),
                Some(
                    DocumentValue::Null
                    | DocumentValue::Bool(_)
                    | DocumentValue::String(_)
                    | DocumentValue::Array(_)
                    | DocumentValue::Object(_)
                    | DocumentValue::Matcher(_),
                )
                | None => false,
            },
            Self::AnyFloat => actual.is_some_and(DocumentValue::is_number),
            Self::AnyBool => matches!(actual, Some(DocumentValue::Bool(_))),
            Self::Regex(re) => match actual {
                Some(DocumentValue::String(s)) => re.is_match(s),
                Some(_) | None => false,
            },
            Self::OneOf(values) => match actual {
                Some(DocumentValue::String(s)) => values.iter().any(|v| v == s),
                Some(_) | None => false,
            },
        }
    }

    /// Tests a textual value, as found in HTML text nodes and attributes.
    ///
    /// HTML carries no scalar types, so the numeric and boolean matchers check
    /// that the trimmed text parses as such.
    pub fn matches_text(&self, text: &str) -> bool {
        match self {
            Self::AnyString | Self::AnyValue | Self::Ignore => true,
            Self::AnyInt => {
                let t = text.trim();
                t.parse::<i64>().is_ok()
                    || t.parse::<u64>().is_ok()
                    || t.parse::<f64>()
                        .is_ok_and(|f| f.is_finite() && f == f.trunc())
            }
            Self::AnyFloat => text.trim().parse::<f64>().is_ok_and(f64::is_finite),
            Self::AnyBool => matches!(text.trim(), "true" | "false"),
            Self::Regex(re) => re.is_match(text),
            Self::OneOf(values) => values.iter().any(|v| v == text),
        }
    }

    /// The canonical template text for this matcher, e.g. `{{anyString}}`.
    pub fn describe(&self) -> String {
        format!("{{{{{}}}}}", self.expression())
    }

    /// The expression between the braces, e.g. `` regex `^a` ``.
    pub fn expression(&self) -> String {
        match self {
            Self::AnyString => "anyString".to_owned(),
            Self::AnyInt => "anyInt".to_owned(),
            Self::AnyFloat => "anyFloat".to_owned(),
            Self::AnyBool => "anyBool".to_owned(),
            Self::AnyValue => "anyValue".to_owned(),
            Self::Ignore => "ignore".to_owned(),
            Self::Regex(re) => format!("regex `{}`", re.pattern()),
            Self::OneOf(values) => {
                let quoted: Vec<String> = values
                    .iter()
                    .map(|v| serde_json::Value::String(v.clone()).to_string())
                    .collect();
                format!("oneOf {}", quoted.join(" "))
            }
        }
    }

    /// Whether this matcher can be embedded inside a larger literal value.
    ///
    /// Regex matchers must occupy the whole value.
    pub fn embeddable(&self) -> bool {
        !matches!(self, Self::Regex(_))
    }
}

impl fmt::Display for Matcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.describe())
    }
}

// ---------------------------------------------------------------------------
// Expression parsing
// ---------------------------------------------------------------------------

/// Parses the text between `{{` and `}}` into a [`Matcher`].
///
/// # Errors
///
/// - [`MatcherError::UnknownMatcher`]: the expression is not in the vocabulary.
/// - [`MatcherError::InvalidSyntax`]: `regex`/`oneOf` with malformed arguments.
/// - [`MatcherError::InvalidPattern`]: the regex does not compile.
pub fn parse_expression(expr: &str) -> Result<Matcher, MatcherError> {
    let expr = expr.trim();
    match expr {
        "anyString" => return Ok(Matcher::AnyString),
        "anyInt" => return Ok(Matcher::AnyInt),
        "anyFloat" => return Ok(Matcher::AnyFloat),
        "anyBool" => return Ok(Matcher::AnyBool),
        "anyValue" => return Ok(Matcher::AnyValue),
        "ignore" => return Ok(Matcher::Ignore),
        _ => {}
    }

    if let Some(rest) = strip_keyword(expr, "regex") {
        let pattern = backtick_arg(rest)
            .or_else(|| first_quoted_arg(rest))
            .ok_or_else(|| MatcherError::InvalidSyntax {
                matcher: "regex",
                expression: expr.to_owned(),
            })?;
        return Matcher::regex(&pattern);
    }

    if let Some(rest) = strip_keyword(expr, "oneOf") {
        let values = quoted_args(rest);
        if values.is_empty() {
            return Err(MatcherError::InvalidSyntax {
                matcher: "oneOf",
                expression: expr.to_owned(),
            });
        }
        return Ok(Matcher::OneOf(values));
    }

    Err(MatcherError::UnknownMatcher {
        expression: expr.to_owned(),
    })
}

/// Strips `keyword` followed by at least one space or tab.
fn strip_keyword<'a>(expr: &'a str, keyword: &str) -> Option<&'a str> {
    let rest = expr.strip_prefix(keyword)?;
    if rest.starts_with([' ', '\t']) {
        Some(rest.trim_matches([' ', '\t']))
    } else {
        None
    }
}

/// Extracts `content` from `` `content` ``; empty content counts as absent.
fn backtick_arg(s: &str) -> Option<String> {
    let inner = s.strip_prefix('`')?;
    let end = inner.find('`')?;
    let pattern = &inner[..end];
    (!pattern.is_empty()).then(|| pattern.to_owned())
}

fn first_quoted_arg(s: &str) -> Option<String> {
    quoted_args(s).into_iter().next().filter(|v| !v.is_empty())
}

/// Extracts consecutive double-quoted string literals.
///
/// JSON-escaped quotes (`\"`) are accepted in place of bare quotes so the same
/// expression works inside a JSON string literal. Parsing stops at the first
/// token that is not a quoted literal.
fn quoted_args(s: &str) -> Vec<String> {
    let normalized;
    let mut rest = s.trim_matches([' ', '\t']);
    if rest.starts_with("\\\"") {
        normalized = rest.replace("\\\\\"", "\"").replace("\\\"", "\"");
        rest = normalized.as_str();
    }

    let mut values = Vec::new();
    while let Some(after_quote) = rest.strip_prefix('"') {
        let Some((value, consumed)) = read_quoted(after_quote) else {
            break;
        };
        values.push(value);
        rest = after_quote[consumed..].trim_start_matches([' ', '\t']);
    }
    values
}

/// Reads a quoted literal body (opening quote already consumed).
///
/// Returns the unescaped value and the number of bytes consumed, including
/// the closing quote.
fn read_quoted(s: &str) -> Option<(String, usize)> {
    let mut value = String::new();
    let mut chars = s.char_indices();
    while let Some((i, c)) = chars.next() {
        match c {
            '"' => return Some((value, i + 1)),
            '\\' => match chars.next()?.1 {
                'n' => value.push('\n'),
                't' => value.push('\t'),
                'r' => value.push('\r'),
                'b' => value.push('\u{8}'),
                'f' => value.push('\u{c}'),
                'u' => value.push(read_unicode_escape(&mut chars)?),
                escaped => value.push(escaped),
            },
            other => value.push(other),
        }
    }
    None
}

/// Decodes the digits of a `\uXXXX` escape, joining UTF-16 surrogate pairs.
fn read_unicode_escape(chars: &mut std::str::CharIndices<'_>) -> Option<char> {
    let high = read_hex4(chars)?;
    if !(0xD800..0xDC00).contains(&high) {
        return char::from_u32(high);
    }
    if chars.next()?.1 != '\\' || chars.next()?.1 != 'u' {
        return None;
    }
    let low = read_hex4(chars)?;
    if !(0xDC00..0xE000).contains(&low) {
        return None;
    }
    char::from_u32(0x10000 + ((high - 0xD800) << 10) + (low - 0xDC00))
}

fn read_hex4(chars: &mut std::str::CharIndices<'_>) -> Option<u32> {
    (0..4).try_fold(0u32, |acc, _| Some(acc * 16 + chars.next()?.1.to_digit(16)?))
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used)]

    use super::*;

    fn s(v: &str) -> DocumentValue {
        DocumentValue::String(v.to_owned())
    }

    #[test]
    fn keywords_parse() {
        assert_eq!(parse_expression("anyString").expect("parse"), Matcher::AnyString);
        assert_eq!(parse_expression(" anyInt ").expect("parse"), Matcher::AnyInt);
        assert_eq!(parse_expression("anyFloat").expect("parse"), Matcher::AnyFloat);
        assert_eq!(parse_expression("anyBool").expect("parse"), Matcher::AnyBool);
        assert_eq!(parse_expression("anyValue").expect("parse"), Matcher::AnyValue);
        assert_eq!(parse_expression("ignore").expect("parse"), Matcher::Ignore);
    }

    #[test]
    fn unknown_expression_is_rejected() {
        let err = parse_expression("anything").expect_err("unknown");
        assert!(matches!(err, MatcherError::UnknownMatcher { .. }), "{err}");
    }

    #[test]
    fn regex_with_backticks() {
        let m = parse_expression(r"regex `^[a-z]+@example\.com$`").expect("parse");
        assert!(m.matches(Some(&s("alice@example.com"))));
        assert!(!m.matches(Some(&s("BAD"))));
        assert_eq!(m.describe(), r"{{regex `^[a-z]+@example\.com$`}}");
    }

    #[test]
    fn regex_with_braces_in_pattern() {
        let m = parse_expression(r"regex `^\d{3}-\d{4}$`").expect("parse");
        assert!(m.matches(Some(&s("555-1234"))));
    }

    #[test]
    fn regex_with_quoted_pattern() {
        let m = parse_expression(r#"regex "^ab""#).expect("parse");
        assert!(m.matches(Some(&s("abc"))));
    }

    #[test]
    fn regex_is_unanchored_unless_author_anchors() {
        let m = Matcher::regex("b+").expect("compile");
        assert!(m.matches(Some(&s("abbbc"))));
    }

    #[test]
    fn regex_without_argument_is_invalid_syntax() {
        let err = parse_expression("regex nope").expect_err("syntax");
        assert!(matches!(err, MatcherError::InvalidSyntax { matcher: "regex", .. }));
    }

    #[test]
    fn regex_that_does_not_compile_is_invalid_pattern() {
        let err = parse_expression("regex `(`").expect_err("pattern");
        assert!(matches!(err, MatcherError::InvalidPattern { .. }), "{err}");
    }

    #[test]
    fn one_of_parses_quoted_values() {
        let m = parse_expression(r#"oneOf "active" "pending""#).expect("parse");
        assert_eq!(m, Matcher::one_of(["active", "pending"]));
        assert!(m.matches(Some(&s("pending"))));
        assert!(!m.matches(Some(&s("closed"))));
        assert_eq!(m.describe(), r#"{{oneOf "active" "pending"}}"#);
    }

    #[test]
    fn one_of_accepts_json_escaped_quotes() {
        let m = parse_expression(r#"oneOf \"a\" \"b\""#).expect("parse");
        assert_eq!(m, Matcher::one_of(["a", "b"]));
    }

    #[test]
    fn one_of_unescapes_embedded_quotes() {
        let m = parse_expression(r#"oneOf "say \"hi\"" "x""#).expect("parse");
        assert_eq!(m, Matcher::one_of([r#"say "hi""#, "x"]));
    }

    #[test]
    fn one_of_expression_round_trips_control_characters() {
        let m = Matcher::one_of(["tab\there", "bell\u{7}", "quote\"", "snow \u{2603}"]);
        let expression = m.expression();
        assert!(expression.contains(r"\u0007"), "{expression}");
        assert_eq!(parse_expression(&expression).expect("reparse"), m);
    }

    #[test]
    fn one_of_reads_json_unicode_escapes() {
        let m = parse_expression(r#"oneOf "\u0041\u00e9" "\ud83d\ude00""#).expect("parse");
        assert_eq!(m, Matcher::one_of(["A\u{e9}", "\u{1f600}"]));
        assert!(parse_expression(r#"oneOf "\ud83d""#).is_err());
    }

    #[test]
    fn one_of_without_values_is_invalid_syntax() {
        let err = parse_expression("oneOf a b").expect_err("syntax");
        assert!(matches!(err, MatcherError::InvalidSyntax { matcher: "oneOf", .. }));
    }

    #[test]
    fn one_of_does_not_match_numbers() {
        let m = Matcher::one_of(["1"]);
        assert!(!m.matches(Some(&DocumentValue::Integer(1))));
    }

    #[test]
    fn any_int_boundaries() {
        assert!(Matcher::AnyInt.matches(Some(&DocumentValue::Float(4.0))));
        assert!(!Matcher::AnyInt.matches(Some(&DocumentValue::Float(4.5))));
        assert!(!Matcher::AnyInt.matches(Some(&s("4"))));
        assert!(Matcher::AnyInt.matches(Some(&DocumentValue::Integer(-7))));
        assert!(Matcher::AnyInt.matches(Some(&DocumentValue::UnsignedInteger(u64::MAX))));
    }

    #[test]
    fn any_float_accepts_all_numbers() {
        assert!(Matcher::AnyFloat.matches(Some(&DocumentValue::Integer(3))));
        assert!(Matcher::AnyFloat.matches(Some(&DocumentValue::Float(3.25))));
        assert!(!Matcher::AnyFloat.matches(Some(&s("3.25"))));
    }

    #[test]
    fn any_value_and_ignore_match_absence() {
        assert!(Matcher::AnyValue.matches(None));
        assert!(Matcher::Ignore.matches(None));
        assert!(Matcher::AnyValue.matches(Some(&DocumentValue::Null)));
        assert!(!Matcher::AnyString.matches(None));
    }

    #[test]
    fn text_matching_parses_scalars() {
        assert!(Matcher::AnyInt.matches_text(" 42 "));
        assert!(!Matcher::AnyInt.matches_text("4.5"));
        assert!(Matcher::AnyFloat.matches_text("4.5"));
        assert!(!Matcher::AnyFloat.matches_text("four"));
        assert!(Matcher::AnyBool.matches_text("false"));
        assert!(!Matcher::AnyBool.matches_text("yes"));
    }

    #[test]
    fn regex_matchers_compare_by_pattern() {
        let a = Matcher::regex("^a").expect("compile");
        let b = Matcher::regex("^a").expect("compile");
        let c = Matcher::regex("^b").expect("compile");
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn only_regex_is_not_embeddable() {
        assert!(Matcher::AnyInt.embeddable());
        assert!(Matcher::one_of(["x"]).embeddable());
        assert!(!Matcher::regex("x").expect("compile").embeddable());
    }
}

/// Placeholder substitution for expected documents.
///
/// An expected document is not valid JSON or HTML while it still contains
/// `{{ ... }}` expressions in value position. [`substitute`] replaces every
/// expression with a unique sentinel token (`__MATCHER_<n>__`) so the native
/// parser accepts the text, and records the expressions in a
/// [`Placeholders`] table. The normalizers then map sentinels back to
/// matchers (whole values) or to their original text (embedded occurrences).
///
/// Nothing outside this module knows the sentinel spelling.
use std::collections::BTreeMap;

use regex::Regex;

use crate::error::{Error, MatcherError};
use crate::matcher::{Matcher, parse_expression};
use crate::value::DocumentValue;

const SENTINEL_PREFIX: &str = "__MATCHER_";
const SENTINEL_SUFFIX: &str = "__";

/// How a sentinel is spliced into the surrounding text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Quoting {
    /// JSON: quote the sentinel when it appears outside a string literal so
    /// `{"age": {{anyInt}}}` stays parseable.
    Json,
    /// HTML: always the bare sentinel.
    Bare,
}

/// The result of [`substitute`].
#[derive(Debug)]
pub(crate) struct Substitution {
    /// The text with every placeholder replaced.
    pub text: String,
    /// The recorded expressions, indexed by sentinel number.
    pub placeholders: Placeholders,
}

/// Sentinel → expression table built during substitution.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Placeholders {
    expressions: Vec<String>,
}

/// A fragment of a string value split at sentinel boundaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Piece<'a> {
    Literal(&'a str),
    Placeholder(usize),
}

impl Placeholders {
    /// Number of placeholders recorded.
    pub fn len(&self) -> usize {
        self.expressions.len()
    }

    /// Returns `true` if the document held no placeholders.
    pub fn is_empty(&self) -> bool {
        self.expressions.is_empty()
    }

    /// The expression recorded for placeholder `index`.
    pub fn expression(&self, index: usize) -> Option<&str> {
        self.expressions.get(index).map(String::as_str)
    }

    /// Sentinel token → expression, in sentinel order.
    pub fn table(&self) -> BTreeMap<String, String> {
        self.expressions
            .iter()
            .enumerate()
            .map(|(i, expr)| (sentinel(i), expr.clone()))
            .collect()
    }

    fn push(&mut self, expression: &str) -> usize {
        self.expressions.push(expression.to_owned());
        self.expressions.len() - 1
    }

    /// Returns the placeholder index if `text` is exactly one sentinel.
    pub(crate) fn whole(&self, text: &str) -> Option<usize> {
        match self.split(text).as_slice() {
            [Piece::Placeholder(index)] => Some(*index),
            _ => None,
        }
    }

    /// Parses placeholder `index` into a matcher.
    ///
    /// # Errors
    ///
    /// [`Error::UnknownPlaceholder`] for an index with no recorded expression,
    /// [`Error::Matcher`] when the expression is rejected.
    pub(crate) fn resolve(&self, index: usize) -> Result<Matcher, Error> {
        let expression = self
            .expression(index)
            .ok_or_else(|| Error::UnknownPlaceholder(sentinel(index)))?;
        parse_expression(expression).map_err(|source| Error::Matcher {
            expression: expression.to_owned(),
            source,
        })
    }

    /// Splits `text` into literal runs and known sentinels.
    ///
    /// Sentinel-shaped text with an index that was never issued stays literal.
    pub(crate) fn split<'a>(&self, text: &'a str) -> Vec<Piece<'a>> {
        let mut pieces = Vec::new();
        let mut literal_start = 0;
        let mut cursor = 0;
        while let Some(found) = text[cursor..].find(SENTINEL_PREFIX) {
            let start = cursor + found;
            let digits_start = start + SENTINEL_PREFIX.len();
            let digits_len = text[digits_start..]
                .bytes()
                .take_while(u8::is_ascii_digit)
                .count();
            let digits_end = digits_start + digits_len;
            let index = text[digits_start..digits_end]
                .parse::<usize>()
                .ok()
                .filter(|i| *i < self.len());
            match index {
                Some(i) if digits_len > 0 && text[digits_end..].starts_with(SENTINEL_SUFFIX) => {
                    if literal_start < start {
                        pieces.push(Piece::Literal(&text[literal_start..start]));
                    }
                    pieces.push(Piece::Placeholder(i));
                    cursor = digits_end + SENTINEL_SUFFIX.len();
                    literal_start = cursor;
                }
                Some(_) | None => cursor = digits_start,
            }
        }
        if literal_start < text.len() {
            pieces.push(Piece::Literal(&text[literal_start..]));
        }
        pieces
    }

    /// Replaces every sentinel in `text` with its original `{{expr}}` text.
    pub(crate) fn restore(&self, text: &str) -> String {
        let mut out = String::with_capacity(text.len());
        for piece in self.split(text) {
            match piece {
                Piece::Literal(s) => out.push_str(s),
                Piece::Placeholder(i) => {
                    out.push_str("{{");
                    out.push_str(self.expression(i).unwrap_or_default());
                    out.push_str("}}");
                }
            }
        }
        out
    }
}

fn sentinel(index: usize) -> String {
    format!("{SENTINEL_PREFIX}{index}{SENTINEL_SUFFIX}")
}

/// Replaces every `{{ expr }}` in `raw` with a sentinel.
///
/// The closing `}}` is searched for outside backtick-quoted sections so
/// regex patterns may contain braces. An opening `{{` with no closing braces,
/// or with an empty expression, is left untouched.
pub(crate) fn substitute(raw: &str, quoting: Quoting) -> Substitution {
    let mut placeholders = Placeholders::default();
    let mut text = String::with_capacity(raw.len());
    let mut in_string = false;
    let mut rest = raw;

    while !rest.is_empty() {
        if rest.starts_with("{{") {
            if let Some(close) = find_close(&rest[2..]) {
                let expression = rest[2..2 + close].trim();
                if !expression.is_empty() {
                    let index = placeholders.push(expression);
                    if quoting == Quoting::Json && !in_string {
                        text.push('"');
                        text.push_str(&sentinel(index));
                        text.push('"');
                    } else {
                        text.push_str(&sentinel(index));
                    }
                    rest = &rest[2 + close + 2..];
                    continue;
                }
            }
        }

        let mut chars = rest.chars();
        let Some(c) = chars.next() else { break };
        text.push(c);
        if quoting == Quoting::Json {
            match c {
                '"' => in_string = !in_string,
                '\\' if in_string => {
                    if let Some(escaped) = chars.next() {
                        text.push(escaped);
                    }
                }
                _ => {}
            }
        }
        rest = chars.as_str();
    }

    tracing::trace!(count = placeholders.len(), "substituted placeholders");
    Substitution { text, placeholders }
}

/// Byte offset of the first `}}` outside backticks.
fn find_close(s: &str) -> Option<usize> {
    let mut in_backticks = false;
    for (i, c) in s.char_indices() {
        match c {
            '`' => in_backticks = !in_backticks,
            '}' if !in_backticks && s[i..].starts_with("}}") => return Some(i),
            _ => {}
        }
    }
    None
}

// ---------------------------------------------------------------------------
// Writing templates
// ---------------------------------------------------------------------------

/// Pretty-prints a JSON tree as expected-file text: each matcher is written
/// as a `"{{expr}}"` placeholder with the expression copied verbatim, so a
/// regex keeps its backslashes when the file is read back.
pub(crate) fn pretty_json_template(value: &DocumentValue) -> String {
    let mut expressions = Vec::new();
    let tokenized = tokenize_matchers(value, &mut expressions);
    let mut text = serde_json::to_string_pretty(&tokenized)
        .unwrap_or_else(|e| format!("error formatting document: {e}"));
    for (index, expression) in expressions.iter().enumerate() {
        text = text.replacen(&sentinel(index), &format!("{{{{{expression}}}}}"), 1);
    }
    text
}

fn tokenize_matchers(value: &DocumentValue, expressions: &mut Vec<String>) -> DocumentValue {
    match value {
        DocumentValue::Matcher(m) => {
            expressions.push(m.expression());
            DocumentValue::String(sentinel(expressions.len() - 1))
        }
        DocumentValue::Array(items) => DocumentValue::Array(
            items
                .iter()
                .map(|item| tokenize_matchers(item, expressions))
                .collect(),
        ),
        DocumentValue::Object(map) => DocumentValue::Object(
            map.iter()
                .map(|(k, v)| (k.clone(), tokenize_matchers(v, expressions)))
                .collect(),
        ),
        DocumentValue::Null
        | DocumentValue::Bool(_)
        | DocumentValue::Integer(_)
        | DocumentValue::UnsignedInteger(_)
        | DocumentValue::Float(_)
        | DocumentValue::String(_) => value.clone(),
    }
}

// ---------------------------------------------------------------------------
// Embedded matchers
// ---------------------------------------------------------------------------

/// One piece of a [`TemplatePattern`].
#[derive(Debug, Clone, PartialEq)]
pub enum TemplatePart {
    /// Text that must appear verbatim.
    Literal(String),
    /// A matcher embedded among literal text.
    Matcher(Matcher),
}

/// Literal text with embedded matchers, e.g. `btn btn-{{oneOf "a" "b"}}`.
///
/// Compiled into two anchored regexes: an exact one, and one where literal
/// whitespace runs match any whitespace run and outer whitespace is optional.
#[derive(Debug, Clone)]
pub struct TemplatePattern {
    parts: Vec<TemplatePart>,
    exact: Regex,
    collapsed: Regex,
}

impl PartialEq for TemplatePattern {
    fn eq(&self, other: &Self) -> bool {
        self.parts == other.parts
    }
}

impl TemplatePattern {
    /// Compiles the parts into matching regexes.
    ///
    /// # Errors
    ///
    /// Returns [`MatcherError::InvalidPattern`] if the generated regex does not
    /// compile (only possible via an embedded [`Matcher::Regex`]).
    pub fn new(parts: Vec<TemplatePart>) -> Result<Self, MatcherError> {
        let mut exact = String::from("(?s)^");
        let mut collapsed = String::from(r"(?s)^\s*");
        let last = parts.len().saturating_sub(1);
        for (i, part) in parts.iter().enumerate() {
            match part {
                TemplatePart::Literal(text) => {
                    exact.push_str(&regex::escape(text));
                    let mut text = text.as_str();
                    if i == 0 {
                        text = text.trim_start();
                    }
                    if i == last {
                        text = text.trim_end();
                    }
                    push_collapsed_literal(&mut collapsed, text);
                }
                TemplatePart::Matcher(m) => {
                    let sub = embedded_pattern(m);
                    exact.push_str(&sub);
                    collapsed.push_str(&sub);
                }
            }
        }
        exact.push('$');
        collapsed.push_str(r"\s*$");

        let compile = |pattern: &str| {
            Regex::new(pattern).map_err(|source| MatcherError::InvalidPattern {
                pattern: pattern.to_owned(),
                source,
            })
        };
        Ok(Self {
            exact: compile(&exact)?,
            collapsed: compile(&collapsed)?,
            parts,
        })
    }

    /// Tests `text`; with `collapse_whitespace` any literal whitespace run
    /// matches any run of whitespace and surrounding whitespace is ignored.
    pub fn is_match(&self, text: &str, collapse_whitespace: bool) -> bool {
        if collapse_whitespace {
            self.collapsed.is_match(text)
        } else {
            self.exact.is_match(text)
        }
    }

    /// The template text with each matcher shown as `{{expr}}`.
    pub fn describe(&self) -> String {
        self.parts
            .iter()
            .map(|part| match part {
                TemplatePart::Literal(text) => text.clone(),
                TemplatePart::Matcher(m) => m.describe(),
            })
            .collect()
    }
}

fn push_collapsed_literal(out: &mut String, text: &str) {
    let mut run = String::new();
    let mut in_space = false;
    for c in text.chars() {
        if c.is_whitespace() {
            if !in_space {
                out.push_str(&regex::escape(&run));
                run.clear();
                out.push_str(r"\s+");
                in_space = true;
            }
        } else {
            in_space = false;
            run.push(c);
        }
    }
    out.push_str(&regex::escape(&run));
}

fn embedded_pattern(matcher: &Matcher) -> String {
    match matcher {
        Matcher::AnyString | Matcher::AnyValue | Matcher::Ignore => ".*".to_owned(),
        Matcher::AnyInt => r"-?\d+".to_owned(),
        Matcher::AnyFloat => r"-?\d+(?:\.\d+)?(?:[eE][+-]?\d+)?".to_owned(),
        Matcher::AnyBool => "(?:true|false)".to_owned(),
        Matcher::Regex(re) => format!("(?:{})", re.pattern()),
        Matcher::OneOf(values) => {
            let alternatives: Vec<String> = values.iter().map(|v| regex::escape(v)).collect();
            format!("(?:{})", alternatives.join("|"))
        }
    }
}

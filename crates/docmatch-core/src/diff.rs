/// Structural comparison of expected and actual document trees.
///
/// Two comparators share one result type: [`compare_json`] walks
/// [`DocumentValue`] trees and [`compare_html`] walks [`HtmlNode`] trees. Both
/// accumulate every mismatch instead of stopping at the first one, and both
/// resolve order-insensitive collections with the same greedy first-fit
/// pairing (see [`unordered`]).
///
/// Comparison never fails. Malformed input is rejected earlier, by the parsers.
///
/// [`HtmlNode`]: crate::html::HtmlNode
use std::fmt;

use crate::value::DocumentValue;

mod html;
mod json;
pub(crate) mod unordered;

pub use html::compare_html;
pub use json::compare_json;

/// Path of the JSON document root.
pub const JSON_ROOT_PATH: &str = "$";

// ---------------------------------------------------------------------------
// Difference types
// ---------------------------------------------------------------------------

/// The category of a reported discrepancy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiffKind {
    /// Both sides hold a value of the same type, but the values differ.
    Changed,
    /// Present in the actual document but not in the expected one.
    Added,
    /// Present in the expected document but not in the actual one.
    Removed,
    /// The two sides hold values of different types.
    TypeMismatch,
    /// An expected matcher rejected the actual value.
    MatcherFailed,
}

impl DiffKind {
    /// Human-readable label, e.g. `"type mismatch"`.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Changed => "changed",
            Self::Added => "added",
            Self::Removed => "removed",
            Self::TypeMismatch => "type mismatch",
            Self::MatcherFailed => "matcher failed",
        }
    }
}

impl fmt::Display for DiffKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One side of a [`Difference`].
#[derive(Debug, Clone, PartialEq)]
pub enum DiffValue {
    /// Nothing at this path on this side.
    Absent,
    /// A concrete value. HTML text and attribute values appear as strings.
    Value(DocumentValue),
    /// A rendered description: a matcher (`{{anyInt}}`), an HTML node
    /// (`<span>`), or a collection summary (`array of length 3`).
    Description(String),
}

impl DiffValue {
    /// Wraps a string as a [`DiffValue::Value`].
    pub fn text(s: impl Into<String>) -> Self {
        Self::Value(DocumentValue::String(s.into()))
    }

    /// Returns `true` for [`DiffValue::Absent`].
    pub fn is_absent(&self) -> bool {
        matches!(self, Self::Absent)
    }
}

/// A single reported discrepancy between the expected and actual trees.
#[derive(Debug, Clone, PartialEq)]
pub struct Difference {
    /// Where the discrepancy is, e.g. `$.users[0].name` or
    /// `html > body > div @class`.
    pub path: String,
    /// The expected side.
    pub expected: DiffValue,
    /// The actual side.
    pub actual: DiffValue,
    /// What kind of discrepancy this is.
    pub kind: DiffKind,
}

impl Difference {
    pub(crate) fn new(
        path: impl Into<String>,
        kind: DiffKind,
        expected: DiffValue,
        actual: DiffValue,
    ) -> Self {
        Self {
            path: path.into(),
            expected,
            actual,
            kind,
        }
    }
}

/// Sorts differences by path. Stable: differences sharing a path keep their
/// discovery order.
pub fn sort_differences(differences: &mut [Difference]) {
    differences.sort_by(|a, b| a.path.cmp(&b.path));
}

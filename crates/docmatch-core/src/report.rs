/// Human-readable reports for failed comparisons.
///
/// Two renderings are produced for a mismatch:
///
/// - a per-path listing ([`format_differences`]) with the expected and actual
///   value at each reported path;
/// - an inline diff ([`render_json_inline`], [`render_html_inline`]) of the
///   two pretty-printed documents, `- ` for expected-only lines and `+ ` for
///   actual-only lines.
///
/// Whether ANSI colors are used is decided by the caller and passed in as a
/// [`Palette`]; nothing here inspects the terminal.
use crate::diff::{DiffKind, DiffValue, Difference};
use crate::error::DocumentFormat;
use crate::html::{HtmlNode, render_pretty};
use crate::line_diff::{DiffLine, DiffOp, diff_lines};
use crate::value::DocumentValue;

/// Values rendered longer than this are cut with `...`.
const MAX_VALUE_LEN: usize = 80;

const ANSI_RED: &str = "\x1b[31m";
const ANSI_GREEN: &str = "\x1b[32m";
const ANSI_RESET: &str = "\x1b[0m";

// ---------------------------------------------------------------------------
// Palette
// ---------------------------------------------------------------------------

/// Output coloring, decided once by the caller.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Palette {
    /// Whether ANSI colors are emitted.
    pub colors: bool,
}

impl Palette {
    /// A palette that never colors.
    pub const PLAIN: Self = Self { colors: false };

    /// A palette that colors when `colors` is `true`.
    pub fn new(colors: bool) -> Self {
        Self { colors }
    }

    /// Wraps `text` in red (expected-only lines).
    pub fn red(&self, text: &str) -> String {
        self.paint(ANSI_RED, text)
    }

    /// Wraps `text` in green (actual-only lines).
    pub fn green(&self, text: &str) -> String {
        self.paint(ANSI_GREEN, text)
    }

    fn paint(&self, color: &str, text: &str) -> String {
        if self.colors {
            format!("{color}{text}{ANSI_RESET}")
        } else {
            text.to_owned()
        }
    }
}

// ---------------------------------------------------------------------------
// Per-path listing
// ---------------------------------------------------------------------------

/// Formats differences as a per-path listing:
///
/// ```text
/// JSON mismatch at 1 path:
///
///   $.name
///     expected: "Alice"
///     actual:   "Bob"
/// ```
///
/// Returns an empty string when `differences` is empty.
pub fn format_differences(differences: &[Difference], format: DocumentFormat) -> String {
    if differences.is_empty() {
        return String::new();
    }

    let mut out = String::new();
    if differences.len() == 1 {
        out.push_str(&format!("{format} mismatch at 1 path:\n"));
    } else {
        out.push_str(&format!(
            "{format} mismatch at {} paths:\n",
            differences.len()
        ));
    }

    for diff in differences {
        let (expected, actual) = match diff.kind {
            DiffKind::TypeMismatch => (
                with_type(&diff.expected, format),
                with_type(&diff.actual, format),
            ),
            DiffKind::Changed | DiffKind::Added | DiffKind::Removed | DiffKind::MatcherFailed => (
                format_for(&diff.expected, format),
                format_for(&diff.actual, format),
            ),
        };
        out.push('\n');
        out.push_str(&format!("  {}\n", diff.path));
        out.push_str(&format!("    expected: {expected}\n"));
        out.push_str(&format!("    actual:   {actual}\n"));
    }
    out
}

/// Formats one side of a difference.
///
/// Strings are quoted, integral floats are written without a fraction,
/// arrays and objects as compact JSON cut to 80 characters, matchers by their
/// `{{...}}` description and an absent side as `(missing)`.
pub fn format_value(value: &DiffValue) -> String {
    match value {
        DiffValue::Absent => "(missing)".to_owned(),
        DiffValue::Description(text) => text.clone(),
        DiffValue::Value(v) => format_document_value(v),
    }
}

fn format_for(value: &DiffValue, format: DocumentFormat) -> String {
    match (format, value) {
        (DocumentFormat::Html, DiffValue::Value(DocumentValue::String(s))) => {
            truncate(quote(s), MAX_VALUE_LEN)
        }
        (DocumentFormat::Html | DocumentFormat::Json, _) => format_value(value),
    }
}

fn with_type(value: &DiffValue, format: DocumentFormat) -> String {
    match value {
        DiffValue::Value(v) => format!("{} ({})", format_for(value, format), v.type_name()),
        DiffValue::Absent | DiffValue::Description(_) => format_for(value, format),
    }
}

fn format_document_value(value: &DocumentValue) -> String {
    match value {
        DocumentValue::Null => "null".to_owned(),
        DocumentValue::Bool(b) => b.to_string(),
        DocumentValue::Integer(i) => i.to_string(),
        DocumentValue::UnsignedInteger(u) => u.to_string(),
        DocumentValue::Float(f) => {
            if f.is_finite() && f.fract() == 0.0 && f.abs() < 1e15 {
                format!("{}", *f as i64)
            } else {
                f.to_string()
            }
        }
        DocumentValue::String(s) => quote(s),
        DocumentValue::Array(_) | DocumentValue::Object(_) => {
            let compact = serde_json::to_string(value).unwrap_or_else(|_| value.to_string());
            truncate(compact, MAX_VALUE_LEN)
        }
        DocumentValue::Matcher(m) => m.describe(),
    }
}

fn quote(s: &str) -> String {
    serde_json::to_string(s).unwrap_or_else(|_| format!("{s:?}"))
}

fn truncate(s: String, max: usize) -> String {
    if s.chars().count() <= max {
        return s;
    }
    let mut cut: String = s.chars().take(max - 3).collect();
    cut.push_str("...");
    cut
}

// ---------------------------------------------------------------------------
// Inline diffs
// ---------------------------------------------------------------------------

/// Pretty-prints a JSON tree: two-space indentation, sorted keys, matchers
/// as their `{{...}}` description strings.
pub fn pretty_json(value: &DocumentValue) -> String {
    serde_json::to_string_pretty(value)
        .unwrap_or_else(|e| format!("error formatting document: {e}"))
}

/// Line diff of the pretty renderings of two JSON trees.
pub fn render_json_inline(
    expected: &DocumentValue,
    actual: &DocumentValue,
    palette: &Palette,
) -> String {
    render_inline(&pretty_json(expected), &pretty_json(actual), palette)
}

/// Line diff of the pretty renderings of two HTML trees.
pub fn render_html_inline(expected: &HtmlNode, actual: &HtmlNode, palette: &Palette) -> String {
    render_inline(&render_pretty(expected), &render_pretty(actual), palette)
}

fn render_inline(expected: &str, actual: &str, palette: &Palette) -> String {
    let expected: Vec<&str> = expected.lines().collect();
    let actual: Vec<&str> = actual.lines().collect();
    render_diff_lines(&diff_lines(&expected, &actual), palette)
}

/// Renders diff lines, one per output line: equal lines as-is, deletions
/// prefixed `- ` in red, insertions prefixed `+ ` in green.
pub fn render_diff_lines(lines: &[DiffLine], palette: &Palette) -> String {
    let mut out = String::new();
    for line in lines {
        let rendered = match line.op {
            DiffOp::Equal => line.text.clone(),
            DiffOp::Delete => palette.red(&format!("- {}", line.text)),
            DiffOp::Insert => palette.green(&format!("+ {}", line.text)),
        };
        out.push_str(&rendered);
        out.push('\n');
    }
    out
}

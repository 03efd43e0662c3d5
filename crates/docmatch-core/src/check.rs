/// One-call comparison pipelines.
///
/// [`check_json`] and [`check_html`] parse the expected text and the actual
/// bytes, compare the trees, and (on mismatch) render the reports. Callers
/// that need the parsed documents, e.g. to rewrite the expected file, use the
/// parse and compare functions directly.
use crate::config::{HtmlConfig, JsonConfig};
use crate::diff::{Difference, JSON_ROOT_PATH, compare_html, compare_json, sort_differences};
use crate::error::{DocumentFormat, Error};
use crate::html::{parse_actual_html_bytes, parse_expected_html};
use crate::json::{parse_actual_json, parse_expected_json};
use crate::report::{Palette, format_differences, render_html_inline, render_json_inline};

/// The outcome of one comparison.
#[derive(Debug, Clone, PartialEq)]
pub struct CheckReport {
    /// Every difference found, sorted by path.
    pub differences: Vec<Difference>,
    /// Line diff of the two pretty renderings; `None` on a match.
    pub inline_diff: Option<String>,
    /// Per-path listing; empty on a match.
    pub summary: String,
}

impl CheckReport {
    /// Returns `true` if the documents matched.
    pub fn is_match(&self) -> bool {
        self.differences.is_empty()
    }

    fn build(
        mut differences: Vec<Difference>,
        format: DocumentFormat,
        inline: impl FnOnce() -> String,
    ) -> Self {
        sort_differences(&mut differences);
        let (inline_diff, summary) = if differences.is_empty() {
            (None, String::new())
        } else {
            (Some(inline()), format_differences(&differences, format))
        };
        tracing::debug!(%format, differences = differences.len(), "check finished");
        Self {
            differences,
            inline_diff,
            summary,
        }
    }
}

/// Compares an actual JSON payload against expected template text.
///
/// # Errors
///
/// Parse errors from either document and invalid matcher expressions in the
/// expected text.
pub fn check_json(
    expected_text: &str,
    actual_bytes: &[u8],
    config: &JsonConfig,
    palette: &Palette,
) -> Result<CheckReport, Error> {
    let expected = parse_expected_json(expected_text)?;
    let actual = parse_actual_json(actual_bytes)?;
    let differences = compare_json(&expected.root, &actual, JSON_ROOT_PATH, config);
    Ok(CheckReport::build(differences, DocumentFormat::Json, || {
        render_json_inline(&expected.root, &actual, palette)
    }))
}

/// Compares an actual HTML document against expected template text.
///
/// # Errors
///
/// Invalid matcher expressions in the expected text, or actual bytes that
/// are not UTF-8.
pub fn check_html(
    expected_text: &str,
    actual_bytes: &[u8],
    config: &HtmlConfig,
    palette: &Palette,
) -> Result<CheckReport, Error> {
    let expected = parse_expected_html(expected_text)?;
    let actual = parse_actual_html_bytes(actual_bytes)?;
    let differences = compare_html(&expected.root, &actual, config);
    Ok(CheckReport::build(differences, DocumentFormat::Html, || {
        render_html_inline(&expected.root, &actual, palette)
    }))
}

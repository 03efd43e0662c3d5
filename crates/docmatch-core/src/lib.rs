#![deny(clippy::print_stdout, clippy::print_stderr)]

pub mod check;
pub mod config;
pub mod diff;
pub mod error;
pub mod html;
pub mod json;
pub mod line_diff;
pub mod matcher;
pub mod report;
pub mod template;
pub mod update;
pub mod value;

pub use check::{CheckReport, check_html, check_json};
pub use config::{HtmlConfig, JsonConfig};
pub use diff::{
    DiffKind, DiffValue, Difference, JSON_ROOT_PATH, compare_html, compare_json, sort_differences,
};
pub use error::{DocumentFormat, Error, MatcherError};
pub use html::{
    DOCUMENT_TAG, ExpectedHtml, HtmlElement, HtmlNode, HtmlNodeKind, HtmlValue, parse_actual_html,
    parse_actual_html_bytes, parse_expected_html, render_pretty,
};
pub use json::{ExpectedJson, parse_actual_json, parse_expected_json};
pub use line_diff::{DiffLine, DiffOp, diff_lines};
pub use matcher::{Matcher, RegexMatcher, parse_expression};
pub use report::{
    Palette, format_differences, format_value, pretty_json, render_diff_lines, render_html_inline,
    render_json_inline,
};
pub use template::{Placeholders, TemplatePart, TemplatePattern};
pub use update::{initial_expected_json, render_expected_html, updated_expected_json};
pub use value::DocumentValue;

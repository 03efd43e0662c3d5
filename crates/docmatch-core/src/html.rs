/// Normalized HTML trees.
///
/// HTML is parsed with `scraper` (html5ever underneath), which is
/// error-recovering: any input yields a tree, so HTML parsing never fails.
/// The parsed DOM is converted into [`HtmlNode`]s that carry their own paths
/// and whose text and attribute values may hold matchers.
///
/// # Paths
///
/// Element paths join tag names with ` > `. A repeated tag under the same
/// parent gets an index from its second occurrence on:
/// `html > body > ul > li[2]`. Text and comment nodes use their parent's path
/// with a ` (text)` or ` (comment)` suffix; the doctype is `<!DOCTYPE>`.
/// Attributes are reported as `<element path> @<name>`.
use std::collections::BTreeMap;
use std::convert::Infallible;
use std::fmt;

use crate::error::{DocumentFormat, Error};
use crate::matcher::Matcher;
use crate::template::{Placeholders, Quoting, TemplatePattern, substitute};

mod parse;
mod render;

pub use render::render_pretty;

/// Tag of the synthetic element wrapping a whole document.
pub const DOCUMENT_TAG: &str = "#document";

/// Descriptions of text nodes are cut to this many characters.
const MAX_TEXT_DESCRIPTION: usize = 30;

// ---------------------------------------------------------------------------
// Node model
// ---------------------------------------------------------------------------

/// A text or attribute value.
#[derive(Debug, Clone, PartialEq)]
pub enum HtmlValue {
    /// Plain text, compared literally.
    Literal(String),
    /// The whole value is one matcher.
    Matcher(Matcher),
    /// Literal text with embedded matchers.
    Template(TemplatePattern),
}

impl HtmlValue {
    /// The value as it would appear in an expected file.
    pub fn display_text(&self) -> String {
        match self {
            Self::Literal(s) => s.clone(),
            Self::Matcher(m) => m.describe(),
            Self::Template(t) => t.describe(),
        }
    }
}

/// An element with its attributes and children.
#[derive(Debug, Clone, PartialEq)]
pub struct HtmlElement {
    /// Lower-case tag name, or [`DOCUMENT_TAG`] for the document wrapper.
    pub tag: String,
    /// Attributes by name; sorted, which is also the render order.
    pub attributes: BTreeMap<String, HtmlValue>,
    /// Child nodes in document order.
    pub children: Vec<HtmlNode>,
}

/// What a node is.
#[derive(Debug, Clone, PartialEq)]
pub enum HtmlNodeKind {
    /// An element (or the document wrapper).
    Element(HtmlElement),
    /// A text node.
    Text(HtmlValue),
    /// A comment; the text between `<!--` and `-->`.
    Comment(String),
    /// A doctype declaration; the doctype name (`html`).
    Doctype(String),
}

/// A node in a normalized HTML tree.
#[derive(Debug, Clone, PartialEq)]
pub struct HtmlNode {
    /// What the node is.
    pub kind: HtmlNodeKind,
    /// The node's path, computed at parse time.
    pub path: String,
}

impl HtmlNode {
    /// Kind label used in type-mismatch reports.
    pub fn kind_name(&self) -> &'static str {
        match self.kind {
            HtmlNodeKind::Element(_) => "element",
            HtmlNodeKind::Text(_) => "text",
            HtmlNodeKind::Comment(_) => "comment",
            HtmlNodeKind::Doctype(_) => "doctype",
        }
    }

    /// Returns the element data if this is an element.
    pub fn as_element(&self) -> Option<&HtmlElement> {
        match &self.kind {
            HtmlNodeKind::Element(el) => Some(el),
            HtmlNodeKind::Text(_) | HtmlNodeKind::Comment(_) | HtmlNodeKind::Doctype(_) => None,
        }
    }

    /// Returns `true` for text nodes holding only whitespace.
    pub fn is_blank_text(&self) -> bool {
        match &self.kind {
            HtmlNodeKind::Text(HtmlValue::Literal(s)) => s.trim().is_empty(),
            HtmlNodeKind::Text(HtmlValue::Matcher(_) | HtmlValue::Template(_))
            | HtmlNodeKind::Element(_)
            | HtmlNodeKind::Comment(_)
            | HtmlNodeKind::Doctype(_) => false,
        }
    }

    /// Short description for reports: `<div>`, `"text..."`,
    /// `<!-- comment -->`, `<!DOCTYPE>`.
    pub fn describe(&self) -> String {
        match &self.kind {
            HtmlNodeKind::Element(el) => format!("<{}>", el.tag),
            HtmlNodeKind::Text(value) => {
                let text = value.display_text();
                if text.chars().count() > MAX_TEXT_DESCRIPTION {
                    let cut: String = text.chars().take(MAX_TEXT_DESCRIPTION).collect();
                    format!("{cut:?}...")
                } else {
                    format!("{text:?}")
                }
            }
            HtmlNodeKind::Comment(_) => "<!-- comment -->".to_owned(),
            HtmlNodeKind::Doctype(_) => "<!DOCTYPE>".to_owned(),
        }
    }

    /// Matcher locations below this node, keyed by node path (text matchers)
    /// or `path@attribute` (attribute matchers).
    pub fn matcher_positions(&self) -> BTreeMap<String, String> {
        let mut positions = BTreeMap::new();
        collect_positions(self, &mut positions);
        positions
    }
}

fn collect_positions(node: &HtmlNode, positions: &mut BTreeMap<String, String>) {
    match &node.kind {
        HtmlNodeKind::Text(HtmlValue::Matcher(m)) => {
            positions.insert(node.path.clone(), m.describe());
        }
        HtmlNodeKind::Element(el) => {
            for (name, value) in &el.attributes {
                if let HtmlValue::Matcher(m) = value {
                    positions.insert(format!("{}@{name}", node.path), m.describe());
                }
            }
            for child in &el.children {
                collect_positions(child, positions);
            }
        }
        HtmlNodeKind::Text(HtmlValue::Literal(_) | HtmlValue::Template(_))
        | HtmlNodeKind::Comment(_)
        | HtmlNodeKind::Doctype(_) => {}
    }
}

impl fmt::Display for HtmlNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.describe())
    }
}

// ---------------------------------------------------------------------------
// Entry points
// ---------------------------------------------------------------------------

/// A parsed expected HTML document.
#[derive(Debug, Clone)]
pub struct ExpectedHtml {
    /// The normalized tree, rooted at the [`DOCUMENT_TAG`] wrapper.
    pub root: HtmlNode,
    /// The placeholders found in the source text.
    pub placeholders: Placeholders,
    /// The expected file's text, unmodified.
    pub raw: String,
}

impl ExpectedHtml {
    /// Sentinel token → expression for every placeholder in the source.
    pub fn matcher_expressions(&self) -> BTreeMap<String, String> {
        self.placeholders.table()
    }

    /// Path → matcher description for every whole-value matcher.
    pub fn matcher_positions(&self) -> BTreeMap<String, String> {
        self.root.matcher_positions()
    }
}

/// Parses an expected HTML document, turning `{{...}}` placeholders into
/// matchers.
///
/// # Errors
///
/// [`Error::Matcher`] if a whole-value placeholder holds an invalid
/// expression. The HTML itself never fails to parse.
pub fn parse_expected_html(text: &str) -> Result<ExpectedHtml, Error> {
    let substitution = substitute(text, Quoting::Bare);
    let placeholders = substitution.placeholders;
    let root = parse::convert_document(&substitution.text, &|raw: &str| {
        parse::resolve_value(raw, &placeholders)
    })?;
    tracing::debug!(placeholders = placeholders.len(), "parsed expected HTML");
    Ok(ExpectedHtml {
        root,
        placeholders,
        raw: text.to_owned(),
    })
}

/// Parses an actual HTML document. `{{...}}` text is kept literally.
pub fn parse_actual_html(text: &str) -> HtmlNode {
    let Ok(root) = parse::convert_document(text, &|raw: &str| {
        Ok::<_, Infallible>(HtmlValue::Literal(raw.to_owned()))
    });
    root
}

/// Parses actual HTML from raw bytes.
///
/// # Errors
///
/// [`Error::DocumentParse`] if the bytes are not UTF-8.
pub fn parse_actual_html_bytes(bytes: &[u8]) -> Result<HtmlNode, Error> {
    let text = std::str::from_utf8(bytes).map_err(|e| Error::DocumentParse {
        format: DocumentFormat::Html,
        detail: e.to_string(),
    })?;
    Ok(parse_actual_html(text))
}

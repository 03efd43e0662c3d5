use std::collections::{BTreeMap, HashMap};

use scraper::{ElementRef, Html, Node};

use crate::error::Error;
use crate::template::{Piece, Placeholders, TemplatePart, TemplatePattern};

use super::{DOCUMENT_TAG, HtmlElement, HtmlNode, HtmlNodeKind, HtmlValue};

const DOCTYPE_PATH: &str = "<!DOCTYPE>";

/// Turns a raw text or attribute value into an [`HtmlValue`].
type Resolve<'a, E> = &'a dyn Fn(&str) -> Result<HtmlValue, E>;

/// Parses `text` as a full document and converts it, wrapped in a
/// [`DOCUMENT_TAG`] element so a doctype and top-level comments are siblings
/// of `<html>`.
pub(super) fn convert_document<E>(text: &str, resolve: Resolve<'_, E>) -> Result<HtmlNode, E> {
    let document = Html::parse_document(text);
    let mut children = Vec::new();
    let mut counts = HashMap::new();
    for child in document.tree.root().children() {
        convert_child(
            child.value(),
            ElementRef::wrap(child),
            "",
            &mut counts,
            resolve,
            &mut children,
        )?;
    }
    Ok(HtmlNode {
        kind: HtmlNodeKind::Element(HtmlElement {
            tag: DOCUMENT_TAG.to_owned(),
            attributes: BTreeMap::new(),
            children,
        }),
        path: String::new(),
    })
}

fn convert_element<E>(
    element: ElementRef<'_>,
    path: String,
    resolve: Resolve<'_, E>,
) -> Result<HtmlNode, E> {
    let mut attributes = BTreeMap::new();
    for (name, value) in element.value().attrs() {
        attributes.insert(name.to_owned(), resolve(value)?);
    }

    let mut children = Vec::new();
    let mut counts = HashMap::new();
    for child in element.children() {
        convert_child(
            child.value(),
            ElementRef::wrap(child),
            &path,
            &mut counts,
            resolve,
            &mut children,
        )?;
    }

    Ok(HtmlNode {
        kind: HtmlNodeKind::Element(HtmlElement {
            tag: element.value().name().to_owned(),
            attributes,
            children,
        }),
        path,
    })
}

/// Converts one DOM child of the node at `parent`, appending to `out`.
///
/// `counts` tracks how often each tag has been seen under `parent` so repeated
/// tags get `[n]` suffixes.
fn convert_child<E>(
    node: &Node,
    element: Option<ElementRef<'_>>,
    parent: &str,
    counts: &mut HashMap<String, usize>,
    resolve: Resolve<'_, E>,
    out: &mut Vec<HtmlNode>,
) -> Result<(), E> {
    match node {
        Node::Element(el) => {
            let Some(element) = element else {
                return Ok(());
            };
            let tag = el.name();
            let seen = counts.entry(tag.to_owned()).or_insert(0);
            let path = element_path(parent, tag, *seen);
            *seen += 1;
            out.push(convert_element(element, path, resolve)?);
        }
        Node::Text(text) => {
            let text: &str = text;
            out.push(HtmlNode {
                kind: HtmlNodeKind::Text(resolve(text)?),
                path: suffixed(parent, "(text)"),
            });
        }
        Node::Comment(comment) => {
            let comment: &str = comment;
            out.push(HtmlNode {
                kind: HtmlNodeKind::Comment(comment.to_owned()),
                path: suffixed(parent, "(comment)"),
            });
        }
        Node::Doctype(doctype) => out.push(HtmlNode {
            kind: HtmlNodeKind::Doctype(doctype.name().to_owned()),
            path: DOCTYPE_PATH.to_owned(),
        }),
        Node::Document | Node::Fragment | Node::ProcessingInstruction(_) => {}
    }
    Ok(())
}

fn element_path(parent: &str, tag: &str, index: usize) -> String {
    let step = if index == 0 {
        tag.to_owned()
    } else {
        format!("{tag}[{index}]")
    };
    if parent.is_empty() {
        step
    } else {
        format!("{parent} > {step}")
    }
}

fn suffixed(parent: &str, suffix: &str) -> String {
    if parent.is_empty() {
        suffix.to_owned()
    } else {
        format!("{parent} {suffix}")
    }
}

/// Resolves placeholders in an expected text or attribute value.
///
/// - No placeholders: literal.
/// - The trimmed value is exactly one placeholder: that matcher. An invalid
///   expression is an error.
/// - Placeholders among literal text: a [`TemplatePattern`], unless one of
///   them is a regex or fails to parse, in which case the value stays literal
///   with the `{{expr}}` text restored.
pub(super) fn resolve_value(raw: &str, placeholders: &Placeholders) -> Result<HtmlValue, Error> {
    let pieces = placeholders.split(raw);
    if !pieces.iter().any(|p| matches!(p, Piece::Placeholder(_))) {
        return Ok(HtmlValue::Literal(raw.to_owned()));
    }
    if let Some(index) = placeholders.whole(raw.trim()) {
        return placeholders.resolve(index).map(HtmlValue::Matcher);
    }

    let mut parts = Vec::with_capacity(pieces.len());
    for piece in pieces {
        match piece {
            Piece::Literal(text) => parts.push(TemplatePart::Literal(text.to_owned())),
            Piece::Placeholder(index) => match placeholders.resolve(index) {
                Ok(matcher) if matcher.embeddable() => parts.push(TemplatePart::Matcher(matcher)),
                Ok(_) | Err(_) => return Ok(HtmlValue::Literal(placeholders.restore(raw))),
            },
        }
    }
    TemplatePattern::new(parts)
        .map(HtmlValue::Template)
        .map_err(|source| Error::Matcher {
            expression: placeholders.restore(raw),
            source,
        })
}

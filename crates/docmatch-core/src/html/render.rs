use super::{DOCUMENT_TAG, HtmlElement, HtmlNode, HtmlNodeKind, HtmlValue};

/// Elements rendered without children or a closing tag.
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param", "source",
    "track", "wbr",
];

/// Elements whose text content is written without escaping.
const RAW_TEXT_ELEMENTS: &[&str] = &["script", "style"];

/// Renders a tree as indented HTML, one node per line.
///
/// Attributes are written in sorted order, an element whose only child is text
/// is written on one line, and whitespace-only text is dropped. Literal text
/// is escaped; matchers are written as their `{{...}}` text, so rendering an
/// expected tree reproduces a normalized expected file.
pub fn render_pretty(node: &HtmlNode) -> String {
    let mut out = String::new();
    render_node(node, 0, false, &mut out);
    out
}

fn render_node(node: &HtmlNode, depth: usize, raw_text: bool, out: &mut String) {
    let indent = "  ".repeat(depth);
    match &node.kind {
        HtmlNodeKind::Element(el) if el.tag == DOCUMENT_TAG => {
            let mut first = true;
            for child in significant(el) {
                if !first {
                    out.push('\n');
                }
                first = false;
                render_node(child, depth, false, out);
            }
        }
        HtmlNodeKind::Element(el) => render_element(el, &indent, depth, out),
        HtmlNodeKind::Text(value) => {
            out.push_str(&indent);
            push_text(value, raw_text, out);
        }
        HtmlNodeKind::Comment(text) => {
            out.push_str(&indent);
            out.push_str("<!-- ");
            out.push_str(text.trim());
            out.push_str(" -->");
        }
        HtmlNodeKind::Doctype(name) => {
            out.push_str(&indent);
            out.push_str("<!DOCTYPE ");
            out.push_str(name);
            out.push('>');
        }
    }
}

fn render_element(el: &HtmlElement, indent: &str, depth: usize, out: &mut String) {
    out.push_str(indent);
    out.push('<');
    out.push_str(&el.tag);
    for (name, value) in &el.attributes {
        out.push(' ');
        out.push_str(name);
        out.push_str("=\"");
        match value {
            HtmlValue::Literal(s) => push_escaped(s, &['&', '"'], out),
            HtmlValue::Matcher(_) | HtmlValue::Template(_) => out.push_str(&value.display_text()),
        }
        out.push('"');
    }
    out.push('>');

    if is_void_element(&el.tag) {
        return;
    }

    let raw_text = RAW_TEXT_ELEMENTS.iter().any(|t| t.eq_ignore_ascii_case(&el.tag));
    let children: Vec<&HtmlNode> = significant(el).collect();
    match children.as_slice() {
        [] => {}
        [HtmlNode {
            kind: HtmlNodeKind::Text(value),
            ..
        }] => push_text(value, raw_text, out),
        many => {
            for child in many {
                out.push('\n');
                render_node(child, depth + 1, raw_text, out);
            }
            out.push('\n');
            out.push_str(indent);
        }
    }

    out.push_str("</");
    out.push_str(&el.tag);
    out.push('>');
}

fn push_text(value: &HtmlValue, raw_text: bool, out: &mut String) {
    match value {
        HtmlValue::Literal(s) if !raw_text => push_escaped(s.trim(), &['&', '<', '>'], out),
        HtmlValue::Literal(_) | HtmlValue::Matcher(_) | HtmlValue::Template(_) => {
            out.push_str(value.display_text().trim());
        }
    }
}

fn push_escaped(text: &str, special: &[char], out: &mut String) {
    for c in text.chars() {
        match c {
            '&' if special.contains(&c) => out.push_str("&amp;"),
            '<' if special.contains(&c) => out.push_str("&lt;"),
            '>' if special.contains(&c) => out.push_str("&gt;"),
            '"' if special.contains(&c) => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
}

fn significant(el: &HtmlElement) -> impl Iterator<Item = &HtmlNode> {
    el.children.iter().filter(|child| !child.is_blank_text())
}

fn is_void_element(tag: &str) -> bool {
    VOID_ELEMENTS.iter().any(|v| v.eq_ignore_ascii_case(tag))
}

use std::collections::BTreeMap;

use crate::config::HtmlConfig;
use crate::html::{DOCUMENT_TAG, HtmlElement, HtmlNode, HtmlNodeKind, HtmlValue};

use super::unordered::greedy_pairing;
use super::{DiffKind, DiffValue, Difference};

/// Compares an expected HTML tree against an actual one.
///
/// Paths in the result are the nodes' own paths (see [`crate::html`]).
pub fn compare_html(expected: &HtmlNode, actual: &HtmlNode, config: &HtmlConfig) -> Vec<Difference> {
    let mut diffs = Vec::new();
    compare_node(expected, actual, config, &mut diffs);
    tracing::debug!(differences = diffs.len(), "compared HTML trees");
    diffs
}

fn compare_node(
    expected: &HtmlNode,
    actual: &HtmlNode,
    config: &HtmlConfig,
    diffs: &mut Vec<Difference>,
) {
    let path = expected.path.as_str();

    match (&expected.kind, &actual.kind) {
        (HtmlNodeKind::Element(el), _) if config.is_element_ignored(&el.tag) => {}
        (HtmlNodeKind::Text(HtmlValue::Matcher(m)), _) if m.is_ignore() => {}
        (HtmlNodeKind::Text(HtmlValue::Matcher(m)), HtmlNodeKind::Text(act)) => {
            let text = act.display_text();
            let text = if config.preserve_whitespace {
                text
            } else {
                collapse_whitespace(&text)
            };
            if !m.matches_text(&text) {
                diffs.push(Difference::new(
                    path,
                    DiffKind::MatcherFailed,
                    DiffValue::Description(m.describe()),
                    DiffValue::text(text),
                ));
            }
        }
        (HtmlNodeKind::Text(HtmlValue::Template(t)), HtmlNodeKind::Text(act)) => {
            let text = act.display_text();
            if !t.is_match(&text, !config.preserve_whitespace) {
                diffs.push(Difference::new(
                    path,
                    DiffKind::MatcherFailed,
                    DiffValue::Description(t.describe()),
                    DiffValue::text(text),
                ));
            }
        }
        (HtmlNodeKind::Element(exp), HtmlNodeKind::Element(act)) => {
            compare_elements(exp, act, path, config, diffs);
        }
        (HtmlNodeKind::Text(exp), HtmlNodeKind::Text(act)) => {
            let (exp_text, act_text) = (exp.display_text(), act.display_text());
            let (exp_text, act_text) = if config.preserve_whitespace {
                (exp_text, act_text)
            } else {
                (collapse_whitespace(&exp_text), collapse_whitespace(&act_text))
            };
            if exp_text != act_text {
                diffs.push(Difference::new(
                    path,
                    DiffKind::Changed,
                    DiffValue::text(exp_text),
                    DiffValue::text(act_text),
                ));
            }
        }
        (HtmlNodeKind::Comment(exp), HtmlNodeKind::Comment(act)) => {
            if !config.ignore_comments && exp != act {
                diffs.push(Difference::new(
                    path,
                    DiffKind::Changed,
                    DiffValue::text(exp.as_str()),
                    DiffValue::text(act.as_str()),
                ));
            }
        }
        (HtmlNodeKind::Doctype(exp), HtmlNodeKind::Doctype(act)) => {
            if !exp.eq_ignore_ascii_case(act) {
                diffs.push(Difference::new(
                    path,
                    DiffKind::Changed,
                    DiffValue::text(exp.as_str()),
                    DiffValue::text(act.as_str()),
                ));
            }
        }
        (
            HtmlNodeKind::Element(_)
            | HtmlNodeKind::Text(_)
            | HtmlNodeKind::Comment(_)
            | HtmlNodeKind::Doctype(_),
            _,
        ) => diffs.push(Difference::new(
            path,
            DiffKind::TypeMismatch,
            DiffValue::Description(expected.kind_name().to_owned()),
            DiffValue::Description(actual.kind_name().to_owned()),
        )),
    }
}

fn compare_elements(
    expected: &HtmlElement,
    actual: &HtmlElement,
    path: &str,
    config: &HtmlConfig,
    diffs: &mut Vec<Difference>,
) {
    if !expected.tag.eq_ignore_ascii_case(&actual.tag) {
        diffs.push(Difference::new(
            path,
            DiffKind::Changed,
            DiffValue::Description(format!("<{}>", expected.tag)),
            DiffValue::Description(format!("<{}>", actual.tag)),
        ));
        return;
    }

    compare_attributes(&expected.attributes, &actual.attributes, path, config, diffs);

    let exp_children = significant_children(expected, config);
    let act_children = significant_children(actual, config);
    if config.should_ignore_child_order(path) {
        compare_children_unordered(&exp_children, &act_children, path, config, diffs);
    } else {
        compare_children_ordered(&exp_children, &act_children, config, diffs);
    }
}

fn compare_attributes(
    expected: &BTreeMap<String, HtmlValue>,
    actual: &BTreeMap<String, HtmlValue>,
    path: &str,
    config: &HtmlConfig,
    diffs: &mut Vec<Difference>,
) {
    for (name, exp_val) in expected {
        if config.is_attribute_ignored(path, name) {
            continue;
        }
        if matches!(exp_val, HtmlValue::Matcher(m) if m.is_ignore()) {
            continue;
        }
        let attr_path = format!("{path} @{name}");
        let Some(act_val) = actual.get(name) else {
            diffs.push(Difference::new(
                attr_path,
                DiffKind::Removed,
                attribute_value(exp_val),
                DiffValue::Absent,
            ));
            continue;
        };

        let act_text = act_val.display_text();
        let failed = match exp_val {
            HtmlValue::Matcher(m) => (!m.matches_text(&act_text))
                .then(|| (DiffKind::MatcherFailed, DiffValue::Description(m.describe()))),
            HtmlValue::Template(t) => (!t.is_match(&act_text, !config.preserve_whitespace))
                .then(|| (DiffKind::MatcherFailed, DiffValue::Description(t.describe()))),
            HtmlValue::Literal(s) => {
                (*s != act_text).then(|| (DiffKind::Changed, DiffValue::text(s.as_str())))
            }
        };
        if let Some((kind, expected_value)) = failed {
            diffs.push(Difference::new(
                attr_path,
                kind,
                expected_value,
                DiffValue::text(act_text),
            ));
        }
    }

    for (name, act_val) in actual {
        if expected.contains_key(name) || config.is_attribute_ignored(path, name) {
            continue;
        }
        diffs.push(Difference::new(
            format!("{path} @{name}"),
            DiffKind::Added,
            DiffValue::Absent,
            attribute_value(act_val),
        ));
    }
}

fn attribute_value(value: &HtmlValue) -> DiffValue {
    match value {
        HtmlValue::Literal(s) => DiffValue::text(s.as_str()),
        HtmlValue::Matcher(_) | HtmlValue::Template(_) => {
            DiffValue::Description(value.display_text())
        }
    }
}

fn compare_children_ordered(
    expected: &[&HtmlNode],
    actual: &[&HtmlNode],
    config: &HtmlConfig,
    diffs: &mut Vec<Difference>,
) {
    for i in 0..expected.len().max(actual.len()) {
        match (expected.get(i), actual.get(i)) {
            (Some(exp), Some(act)) => compare_node(exp, act, config, diffs),
            (Some(exp), None) => diffs.push(Difference::new(
                exp.path.as_str(),
                DiffKind::Removed,
                DiffValue::Description(exp.describe()),
                DiffValue::Absent,
            )),
            (None, Some(act)) => diffs.push(Difference::new(
                act.path.as_str(),
                DiffKind::Added,
                DiffValue::Absent,
                DiffValue::Description(act.describe()),
            )),
            (None, None) => {}
        }
    }
}

fn compare_children_unordered(
    expected: &[&HtmlNode],
    actual: &[&HtmlNode],
    path: &str,
    config: &HtmlConfig,
    diffs: &mut Vec<Difference>,
) {
    let path = if path.is_empty() { DOCUMENT_TAG } else { path };
    if expected.len() != actual.len() {
        diffs.push(Difference::new(
            path,
            DiffKind::Changed,
            DiffValue::Description(format!("{} children", expected.len())),
            DiffValue::Description(format!("{} children", actual.len())),
        ));
        return;
    }

    let unmatched = greedy_pairing(expected, actual, |exp, act| {
        let mut trial = Vec::new();
        compare_node(exp, act, config, &mut trial);
        trial.is_empty()
    });

    for pair in unmatched {
        let exp = expected[pair.expected];
        diffs.push(Difference::new(
            exp.path.as_str(),
            DiffKind::Changed,
            DiffValue::Description(exp.describe()),
            pair.actual
                .and_then(|j| actual.get(j))
                .map_or(DiffValue::Absent, |act| DiffValue::Description(act.describe())),
        ));
    }
}

/// Children that take part in comparison: ignored elements, ignored comments
/// and (unless whitespace is preserved) whitespace-only text are dropped.
fn significant_children<'a>(element: &'a HtmlElement, config: &HtmlConfig) -> Vec<&'a HtmlNode> {
    element
        .children
        .iter()
        .filter(|child| match &child.kind {
            HtmlNodeKind::Element(el) => !config.is_element_ignored(&el.tag),
            HtmlNodeKind::Comment(_) => !config.ignore_comments,
            HtmlNodeKind::Text(_) => config.preserve_whitespace || !child.is_blank_text(),
            HtmlNodeKind::Doctype(_) => true,
        })
        .collect()
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used)]

    use super::*;
    use crate::html::{parse_actual_html, parse_expected_html};

    fn run(expected: &str, actual: &str, config: &HtmlConfig) -> Vec<Difference> {
        let expected = parse_expected_html(expected).expect("expected parses");
        compare_html(&expected.root, &parse_actual_html(actual), config)
    }

    fn summary(diffs: &[Difference]) -> Vec<(&str, DiffKind)> {
        diffs.iter().map(|d| (d.path.as_str(), d.kind)).collect()
    }

    #[test]
    fn identical_documents_match() {
        let html = "<!DOCTYPE html><html><body><div id=\"x\"><!-- c --><p>Hi</p></div></body></html>";
        assert!(run(html, html, &HtmlConfig::default()).is_empty());
    }

    #[test]
    fn formatting_whitespace_is_insignificant() {
        let diffs = run(
            "<div>\n  <p>Hello   world</p>\n</div>",
            "<div><p>Hello world</p></div>",
            &HtmlConfig::default(),
        );
        assert!(diffs.is_empty());
    }

    #[test]
    fn preserve_whitespace_compares_exactly() {
        let diffs = run(
            "<p>Hello   world</p>",
            "<p>Hello world</p>",
            &HtmlConfig::default().preserve_whitespace(),
        );
        assert_eq!(summary(&diffs), vec![("html > body > p (text)", DiffKind::Changed)]);
    }

    #[test]
    fn missing_child_is_removed() {
        let diffs = run(
            "<ul><li>a</li><li>b</li></ul>",
            "<ul><li>a</li></ul>",
            &HtmlConfig::default(),
        );
        assert_eq!(summary(&diffs), vec![("html > body > ul > li[1]", DiffKind::Removed)]);
        assert_eq!(diffs[0].expected, DiffValue::Description("<li>".to_owned()));
    }

    #[test]
    fn extra_child_is_added() {
        let diffs = run("<ul><li>a</li></ul>", "<ul><li>a</li><li>b</li></ul>", &HtmlConfig::default());
        assert_eq!(summary(&diffs), vec![("html > body > ul > li[1]", DiffKind::Added)]);
    }

    #[test]
    fn tag_mismatch_does_not_descend() {
        let diffs = run(
            "<div><span class=\"a\">x</span></div>",
            "<div><em class=\"b\">y</em></div>",
            &HtmlConfig::default(),
        );
        assert_eq!(diffs.len(), 1);
        assert_eq!(diffs[0].kind, DiffKind::Changed);
        assert_eq!(diffs[0].expected, DiffValue::Description("<span>".to_owned()));
        assert_eq!(diffs[0].actual, DiffValue::Description("<em>".to_owned()));
    }

    #[test]
    fn node_kind_mismatch() {
        let diffs = run("<div><b>x</b></div>", "<div>x</div>", &HtmlConfig::default());
        assert_eq!(diffs.len(), 1);
        assert_eq!(diffs[0].kind, DiffKind::TypeMismatch);
        assert_eq!(diffs[0].expected, DiffValue::Description("element".to_owned()));
        assert_eq!(diffs[0].actual, DiffValue::Description("text".to_owned()));
    }

    #[test]
    fn attribute_differences() {
        let diffs = run(
            "<a href=\"/a\" title=\"t\">x</a>",
            "<a href=\"/b\" rel=\"r\">x</a>",
            &HtmlConfig::default(),
        );
        assert_eq!(
            summary(&diffs),
            vec![
                ("html > body > a @href", DiffKind::Changed),
                ("html > body > a @title", DiffKind::Removed),
                ("html > body > a @rel", DiffKind::Added),
            ]
        );
    }

    #[test]
    fn ignored_attributes() {
        let config = HtmlConfig::default()
            .ignore_attributes(["data-id"])
            .ignore_attribute_at("html > body > a@href");
        let diffs = run(
            "<a href=\"/a\" data-id=\"1\">x</a>",
            "<a href=\"/b\" data-id=\"2\">x</a>",
            &config,
        );
        assert!(diffs.is_empty());
    }

    #[test]
    fn attribute_matchers() {
        let diffs = run(
            "<a href=\"{{regex `^/users/\\d+$`}}\" id=\"{{anyInt}}\" data-x=\"{{ignore}}\">x</a>",
            "<a href=\"/users/abc\" id=\"12\">x</a>",
            &HtmlConfig::default(),
        );
        assert_eq!(
            summary(&diffs),
            vec![("html > body > a @href", DiffKind::MatcherFailed)]
        );
    }

    #[test]
    fn text_matchers() {
        let diffs = run(
            "<p>{{anyInt}}</p><p>Total: {{anyFloat}} EUR</p>",
            "<p>42</p><p>Total:  3.50 EUR</p>",
            &HtmlConfig::default(),
        );
        assert!(diffs.is_empty(), "{diffs:?}");

        let diffs = run("<p>{{anyInt}}</p>", "<p>forty-two</p>", &HtmlConfig::default());
        assert_eq!(summary(&diffs), vec![("html > body > p (text)", DiffKind::MatcherFailed)]);
        assert_eq!(diffs[0].actual, DiffValue::text("forty-two"));
    }

    #[test]
    fn whole_text_matchers_see_collapsed_whitespace() {
        let actual = "<p>\n   a\n</p>";
        for expected in [r#"<p>{{oneOf "a" "b"}}</p>"#, "<p>{{regex `^a$`}}</p>"] {
            let diffs = run(expected, actual, &HtmlConfig::default());
            assert!(diffs.is_empty(), "{expected}: {diffs:?}");

            let diffs = run(expected, actual, &HtmlConfig::default().preserve_whitespace());
            assert_eq!(
                summary(&diffs),
                vec![("html > body > p (text)", DiffKind::MatcherFailed)],
                "{expected}"
            );
        }
    }

    #[test]
    fn comments_are_compared_unless_ignored() {
        let expected = "<div><!-- a --><p>x</p></div>";
        let actual = "<div><!-- b --><p>x</p></div>";
        let diffs = run(expected, actual, &HtmlConfig::default());
        assert_eq!(summary(&diffs), vec![("html > body > div (comment)", DiffKind::Changed)]);

        let diffs = run(expected, "<div><p>x</p></div>", &HtmlConfig::default().ignore_comments());
        assert!(diffs.is_empty());
    }

    #[test]
    fn ignored_elements_are_filtered() {
        let config = HtmlConfig::default().ignore_elements(["script"]);
        let diffs = run(
            "<div><p>x</p></div>",
            "<div><script>track()</script><p>x</p></div>",
            &config,
        );
        assert!(diffs.is_empty());
    }

    #[test]
    fn unordered_children() {
        let config = HtmlConfig::default().ignore_child_order_at("html > body > ul");
        let diffs = run(
            "<ul><li>a</li><li>b</li><li>c</li></ul>",
            "<ul><li>c</li><li>a</li><li>b</li></ul>",
            &config,
        );
        assert!(diffs.is_empty());

        let diffs = run("<ul><li>a</li><li>b</li></ul>", "<ul><li>a</li></ul>", &config);
        assert_eq!(diffs.len(), 1);
        assert_eq!(diffs[0].path, "html > body > ul");
        assert_eq!(diffs[0].expected, DiffValue::Description("2 children".to_owned()));
    }

    #[test]
    fn doctype_names_compare_case_insensitively() {
        let diffs = run(
            "<!DOCTYPE HTML><html><body></body></html>",
            "<!doctype html><html><body></body></html>",
            &HtmlConfig::default(),
        );
        assert!(diffs.is_empty());
    }

    #[test]
    fn missing_doctype_shifts_document_children() {
        let diffs = run(
            "<!DOCTYPE html><html><body></body></html>",
            "<html><body></body></html>",
            &HtmlConfig::default(),
        );
        assert_eq!(
            summary(&diffs),
            vec![("<!DOCTYPE>", DiffKind::TypeMismatch), ("html", DiffKind::Removed)]
        );
    }
}

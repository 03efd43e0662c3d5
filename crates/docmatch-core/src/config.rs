/// Comparison options for JSON and HTML checks.
///
/// Both configs are plain data: built once per check (via the builder methods
/// or deserialized from an options file) and only read by the comparator.
use serde::Deserialize;

// ---------------------------------------------------------------------------
// JsonConfig
// ---------------------------------------------------------------------------

/// Options for [`crate::compare_json`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct JsonConfig {
    /// Compare every array without regard to element order.
    ///
    /// Default: `false`.
    pub ignore_array_order: bool,

    /// Paths whose arrays (and arrays nested below them) are compared without
    /// regard to order, e.g. `$.items`.
    pub ignore_array_order_paths: Vec<String>,

    /// Fields skipped entirely. An entry matches either a full path
    /// (`$.meta.id`) or a bare field name (`id`) at any depth.
    pub ignored_fields: Vec<String>,
}

impl JsonConfig {
    /// Ignores array order everywhere.
    #[must_use]
    pub fn ignore_array_order(mut self) -> Self {
        self.ignore_array_order = true;
        self
    }

    /// Ignores array order at `path` and below.
    #[must_use]
    pub fn ignore_array_order_at(mut self, path: impl Into<String>) -> Self {
        self.ignore_array_order_paths.push(path.into());
        self
    }

    /// Skips the given field names or paths.
    #[must_use]
    pub fn ignore_fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.ignored_fields.extend(fields.into_iter().map(Into::into));
        self
    }

    /// Returns `true` if arrays at `path` are compared order-insensitively.
    pub fn should_ignore_array_order(&self, path: &str) -> bool {
        self.ignore_array_order
            || self.ignore_array_order_paths.iter().any(|p| {
                path == p
                    || path
                        .strip_prefix(p.as_str())
                        .is_some_and(|rest| rest.starts_with(['.', '[']))
            })
    }

    /// Returns `true` if the value at `path` is excluded from comparison.
    pub fn is_field_ignored(&self, path: &str) -> bool {
        let last_segment = path.rsplit('.').next().unwrap_or(path);
        self.ignored_fields
            .iter()
            .any(|f| f == path || f == last_segment)
    }
}

// ---------------------------------------------------------------------------
// HtmlConfig
// ---------------------------------------------------------------------------

/// Options for [`crate::compare_html`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HtmlConfig {
    /// Drop comment nodes before comparing children.
    pub ignore_comments: bool,

    /// Compare text exactly instead of collapsing whitespace runs, and keep
    /// whitespace-only text nodes as significant children.
    pub preserve_whitespace: bool,

    /// Compare all children without regard to order.
    pub ignore_child_order: bool,

    /// Element paths whose children (and descendants' children) are compared
    /// without regard to order, e.g. `html > body > ul`.
    pub ignore_child_order_paths: Vec<String>,

    /// Tag names (case-insensitive) whose elements are skipped entirely.
    pub ignored_elements: Vec<String>,

    /// Attribute names (case-insensitive) skipped on every element.
    pub ignored_attributes: Vec<String>,

    /// Attributes skipped on one element, written `path@attribute`, e.g.
    /// `html > body > div@class`.
    pub ignored_attribute_paths: Vec<String>,
}

impl HtmlConfig {
    /// Drops comments from comparison.
    #[must_use]
    pub fn ignore_comments(mut self) -> Self {
        self.ignore_comments = true;
        self
    }

    /// Disables whitespace normalization.
    #[must_use]
    pub fn preserve_whitespace(mut self) -> Self {
        self.preserve_whitespace = true;
        self
    }

    /// Ignores child order everywhere.
    #[must_use]
    pub fn ignore_child_order(mut self) -> Self {
        self.ignore_child_order = true;
        self
    }

    /// Ignores child order at `path` and below.
    #[must_use]
    pub fn ignore_child_order_at(mut self, path: impl Into<String>) -> Self {
        self.ignore_child_order_paths.push(path.into());
        self
    }

    /// Skips elements with the given tag names.
    #[must_use]
    pub fn ignore_elements<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.ignored_elements.extend(tags.into_iter().map(Into::into));
        self
    }

    /// Skips the given attribute names on every element.
    #[must_use]
    pub fn ignore_attributes<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.ignored_attributes
            .extend(names.into_iter().map(Into::into));
        self
    }

    /// Skips one attribute on one element (`path@attribute`).
    #[must_use]
    pub fn ignore_attribute_at(mut self, path_attr: impl Into<String>) -> Self {
        self.ignored_attribute_paths.push(path_attr.into());
        self
    }

    /// Returns `true` if children of the element at `path` are compared
    /// order-insensitively.
    pub fn should_ignore_child_order(&self, path: &str) -> bool {
        self.ignore_child_order
            || self.ignore_child_order_paths.iter().any(|p| {
                path == p
                    || path
                        .strip_prefix(p.as_str())
                        .is_some_and(|rest| rest.starts_with(" > "))
            })
    }

    /// Returns `true` if elements named `tag` are skipped.
    pub fn is_element_ignored(&self, tag: &str) -> bool {
        self.ignored_elements
            .iter()
            .any(|t| t.eq_ignore_ascii_case(tag))
    }

    /// Returns `true` if attribute `name` on the element at `element_path` is
    /// skipped.
    pub fn is_attribute_ignored(&self, element_path: &str, name: &str) -> bool {
        if self
            .ignored_attributes
            .iter()
            .any(|a| a.eq_ignore_ascii_case(name))
        {
            return true;
        }
        self.ignored_attribute_paths.iter().any(|entry| {
            entry
                .rsplit_once('@')
                .is_some_and(|(path, attr)| path == element_path && attr == name)
        })
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used)]

    use super::*;

    #[test]
    fn field_ignored_by_full_path_or_name() {
        let cfg = JsonConfig::default().ignore_fields(["id", "$.meta.created"]);
        assert!(cfg.is_field_ignored("$.id"));
        assert!(cfg.is_field_ignored("$.user.id"));
        assert!(cfg.is_field_ignored("$.meta.created"));
        assert!(!cfg.is_field_ignored("$.created"));
        assert!(!cfg.is_field_ignored("$.ids"));
    }

    #[test]
    fn array_order_path_covers_descendants_only() {
        let cfg = JsonConfig::default().ignore_array_order_at("$.items");
        assert!(cfg.should_ignore_array_order("$.items"));
        assert!(cfg.should_ignore_array_order("$.items[0].tags"));
        assert!(cfg.should_ignore_array_order("$.items.nested"));
        assert!(!cfg.should_ignore_array_order("$.itemsList"));
        assert!(!cfg.should_ignore_array_order("$.other"));
    }

    #[test]
    fn global_array_order_flag() {
        let cfg = JsonConfig::default().ignore_array_order();
        assert!(cfg.should_ignore_array_order("$.anything"));
    }

    #[test]
    fn child_order_path_covers_descendants_only() {
        let cfg = HtmlConfig::default().ignore_child_order_at("html > body > ul");
        assert!(cfg.should_ignore_child_order("html > body > ul"));
        assert!(cfg.should_ignore_child_order("html > body > ul > li[2]"));
        assert!(!cfg.should_ignore_child_order("html > body > ul[1]"));
    }

    #[test]
    fn element_and_attribute_ignores_are_case_insensitive_by_name() {
        let cfg = HtmlConfig::default()
            .ignore_elements(["SCRIPT"])
            .ignore_attributes(["Data-Id"])
            .ignore_attribute_at("html > body > div@class");
        assert!(cfg.is_element_ignored("script"));
        assert!(cfg.is_attribute_ignored("html > body > p", "data-id"));
        assert!(cfg.is_attribute_ignored("html > body > div", "class"));
        assert!(!cfg.is_attribute_ignored("html > body > span", "class"));
    }

    #[test]
    fn deserializes_partial_options() {
        let cfg: HtmlConfig =
            serde_json::from_str(r#"{"ignore_comments": true, "ignored_elements": ["script"]}"#)
                .expect("deserialize");
        assert!(cfg.ignore_comments);
        assert!(!cfg.preserve_whitespace);
        assert_eq!(cfg.ignored_elements, vec!["script".to_owned()]);
    }

    #[test]
    fn unknown_option_is_rejected() {
        let result = serde_json::from_str::<JsonConfig>(r#"{"ignore_order": true}"#);
        assert!(result.is_err());
    }
}

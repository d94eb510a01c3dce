//! Trait definitions for custom elements.

use std::sync::LazyLock;

use regex::Regex;

/// Attributes as written on an element's opening tag.
///
/// Names are stored lowercase, as an HTML parser would. Values are kept exactly
/// as they appear in the source, without entity decoding.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Attributes {
    entries: Vec<(String, Option<String>)>,
}

static ATTR_RE: LazyLock<Regex> = LazyLock::new(|| {
    // Match: name="value", name='value', name=value or a bare name
    Regex::new(r#"([^\s"'<>/=]+)(?:\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s"'=<>`]+)))?"#)
        .expect("Invalid attribute regex")
});

impl Attributes {
    /// Create an empty attribute set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse the attribute portion of an opening tag.
    ///
    /// When a name repeats, the first occurrence wins.
    pub fn parse(raw: &str) -> Self {
        let mut attrs = Self::new();

        for caps in ATTR_RE.captures_iter(raw) {
            let Some(name) = caps.get(1) else {
                continue;
            };
            let value = caps
                .get(2)
                .or_else(|| caps.get(3))
                .or_else(|| caps.get(4))
                .map(|m| m.as_str().to_string());

            let name = name.as_str().to_ascii_lowercase();
            if !attrs.has(&name) {
                attrs.entries.push((name, value));
            }
        }

        attrs
    }

    /// Add an attribute. A `None` value is a bare flag such as `disabled`.
    pub fn with(mut self, name: &str, value: Option<&str>) -> Self {
        self.entries
            .push((name.to_ascii_lowercase(), value.map(str::to_string)));
        self
    }

    /// Raw value of an attribute. A bare attribute reads as the empty string.
    pub fn get(&self, name: &str) -> Option<&str> {
        let name = name.to_ascii_lowercase();
        self.entries
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, v)| v.as_deref().unwrap_or(""))
    }

    /// Whether the attribute is present, with or without a value.
    pub fn has(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Value of an attribute, or `default` when it is absent or empty.
    pub fn value_or<'a>(&'a self, name: &str, default: &'a str) -> &'a str {
        match self.get(name) {
            Some(v) if !v.is_empty() => v,
            _ => default,
        }
    }

    /// Value of an attribute when present and non-empty.
    pub fn non_empty(&self, name: &str) -> Option<&str> {
        self.get(name).filter(|v| !v.is_empty())
    }

    /// Iterate attributes in source order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&str>)> {
        self.entries.iter().map(|(n, v)| (n.as_str(), v.as_deref()))
    }

    /// Number of attributes.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether there are no attributes.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// A custom element that can be prerendered.
///
/// Rendering is a pure function of the attributes and the content present on the
/// element: the same inputs always produce the same markup, and there is no error
/// path. Unexpected input produces whatever markup the template yields.
pub trait CustomElement: Send + Sync {
    /// Tag name this element is registered under (e.g., "example-button").
    fn tag(&self) -> &'static str;

    /// Produce the element's new inner markup.
    ///
    /// # Arguments
    /// * `attrs` - Attributes written on the opening tag
    /// * `content` - The element's current inner markup
    fn render(&self, attrs: &Attributes, content: &str) -> String;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_quoted_and_bare_attributes() {
        let attrs = Attributes::parse(r#" variant="primary" size='lg' disabled type=submit"#);

        assert_eq!(attrs.len(), 4);
        assert_eq!(attrs.get("variant"), Some("primary"));
        assert_eq!(attrs.get("size"), Some("lg"));
        assert_eq!(attrs.get("disabled"), Some(""));
        assert_eq!(attrs.get("type"), Some("submit"));
    }

    #[test]
    fn parses_hyphenated_names() {
        let attrs = Attributes::parse(r#"logo-src="/logo.png" logo-alt="Library" data-x"#);

        assert_eq!(attrs.get("logo-src"), Some("/logo.png"));
        assert_eq!(attrs.get("logo-alt"), Some("Library"));
        assert!(attrs.has("data-x"));
    }

    #[test]
    fn names_are_case_insensitive() {
        let attrs = Attributes::parse(r#"Variant="secondary""#);

        assert_eq!(attrs.get("variant"), Some("secondary"));
        assert_eq!(attrs.get("VARIANT"), Some("secondary"));
    }

    #[test]
    fn first_duplicate_wins() {
        let attrs = Attributes::parse(r#"variant="a" variant="b""#);

        assert_eq!(attrs.len(), 1);
        assert_eq!(attrs.get("variant"), Some("a"));
    }

    #[test]
    fn value_or_treats_empty_as_absent() {
        let attrs = Attributes::parse(r#"variant="" size"#);

        assert_eq!(attrs.value_or("variant", "custom"), "custom");
        assert_eq!(attrs.value_or("size", "md"), "md");
        assert_eq!(attrs.value_or("type", "button"), "button");
        assert_eq!(attrs.non_empty("variant"), None);
    }

    #[test]
    fn keeps_values_verbatim() {
        let attrs = Attributes::parse(r#"logo-alt="A &amp; B""#);

        assert_eq!(attrs.get("logo-alt"), Some("A &amp; B"));
    }
}

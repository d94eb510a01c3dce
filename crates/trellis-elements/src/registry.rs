//! Element registry for prerendering custom elements in a document.
//!
//! Holds the known elements by tag name and rewrites every occurrence found in an
//! HTML document: the host tag and its attributes stay, the contents are replaced
//! with the element's rendered markup.

use std::collections::HashMap;
use std::fmt;

use crate::button::ExampleButton;
use crate::markup::match_element_at;
use crate::navbar::NavbarComponent;
use crate::template::TemplateElement;
use crate::traits::CustomElement;

/// Rendered contents are expanded again for nested elements up to this depth.
const MAX_DEPTH: usize = 32;

/// Elements whose contents are never scanned for custom elements.
const INERT_ELEMENTS: &[&str] = &["script", "style", "template", "textarea"];

/// A registry of custom elements.
#[derive(Default)]
pub struct ElementRegistry {
    /// Elements by lowercase tag name
    elements: HashMap<String, Box<dyn CustomElement>>,
}

/// Result of expanding a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Expansion {
    /// The rewritten document
    pub html: String,

    /// Number of element occurrences rendered
    pub rendered: usize,
}

impl ElementRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry holding the built-in design-system elements.
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        registry.register(ExampleButton);
        registry.register(NavbarComponent);
        registry.register(TemplateElement);
        registry
    }

    /// Register an element, replacing any element with the same tag.
    pub fn register<E: CustomElement + 'static>(&mut self, element: E) {
        let tag = element.tag().to_ascii_lowercase();
        if self.elements.insert(tag.clone(), Box::new(element)).is_some() {
            tracing::debug!("Replaced element registered for <{}>", tag);
        }
    }

    /// Look up an element by tag name (case-insensitive).
    pub fn get(&self, tag: &str) -> Option<&dyn CustomElement> {
        self.elements
            .get(&tag.to_ascii_lowercase())
            .map(|e| e.as_ref())
    }

    /// Check if an element is registered.
    pub fn contains(&self, tag: &str) -> bool {
        self.elements.contains_key(&tag.to_ascii_lowercase())
    }

    /// Get all registered tag names, sorted.
    pub fn tags(&self) -> Vec<&str> {
        let mut tags: Vec<&str> = self.elements.keys().map(|t| t.as_str()).collect();
        tags.sort_unstable();
        tags
    }

    /// Render every registered element found in `html`.
    ///
    /// Elements without a closing tag are left as they are.
    pub fn expand(&self, html: &str) -> Expansion {
        let mut rendered = 0;
        let html = self.expand_at_depth(html, 0, &mut rendered);

        Expansion { html, rendered }
    }

    fn expand_at_depth(&self, html: &str, depth: usize, rendered: &mut usize) -> String {
        if self.elements.is_empty() {
            return html.to_string();
        }
        if depth > MAX_DEPTH {
            tracing::warn!("Custom elements nested deeper than {}, leaving as is", MAX_DEPTH);
            return html.to_string();
        }

        let lower = html.to_ascii_lowercase();
        let mut out = String::with_capacity(html.len());
        let mut copied = 0;
        let mut pos = 0;

        while let Some(rel) = lower[pos..].find('<') {
            let start = pos + rel;

            // Comments are never upgraded
            if lower[start..].starts_with("<!--") {
                match lower[start + 4..].find("-->") {
                    Some(close) => {
                        pos = start + 4 + close + 3;
                        continue;
                    }
                    None => break,
                }
            }

            let name = tag_name_at(&lower, start + 1);

            // Inert content: script/style text and template contents
            if INERT_ELEMENTS.contains(&name) {
                pos = match match_element_at(html, &lower, start, name) {
                    Some(m) => m.end,
                    None => start + 1,
                };
                continue;
            }

            let Some(element) = self.elements.get(name) else {
                pos = start + 1;
                continue;
            };

            let Some(m) = match_element_at(html, &lower, start, name) else {
                tracing::debug!("No closing tag for <{}> at byte {}", name, start);
                pos = start + 1;
                continue;
            };

            let contents = element.render(&m.attributes, m.content(html));
            let contents = self.expand_at_depth(&contents, depth + 1, rendered);
            *rendered += 1;

            out.push_str(&html[copied..m.content_start]);
            out.push_str(&contents);
            out.push_str(m.close_tag(html));

            copied = m.end;
            pos = m.end;
        }

        out.push_str(&html[copied..]);
        out
    }
}

impl fmt::Debug for ElementRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ElementRegistry")
            .field("tags", &self.tags())
            .finish()
    }
}

/// Read the tag name starting at `from` (just after a `<`).
fn tag_name_at(lower: &str, from: usize) -> &str {
    let rest = &lower[from..];
    let len = rest
        .find(|c: char| !(c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == '.'))
        .unwrap_or(rest.len());
    &rest[..len]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::Attributes;
    use pretty_assertions::assert_eq;

    struct Shout;

    impl CustomElement for Shout {
        fn tag(&self) -> &'static str {
            "x-shout"
        }

        fn render(&self, _attrs: &Attributes, content: &str) -> String {
            content.to_uppercase()
        }
    }

    #[test]
    fn builtin_registers_design_system_elements() {
        let registry = ElementRegistry::builtin();

        assert_eq!(
            registry.tags(),
            vec!["component-name", "example-button", "navbar-component"]
        );
        assert!(registry.contains("Example-Button"));
    }

    #[test]
    fn expands_button_in_place() {
        let registry = ElementRegistry::builtin();

        let result = registry.expand("<main><example-button>Save</example-button></main>");

        assert_eq!(
            result.html,
            r#"<main><example-button><button type="button" class="btn btn-custom">Save</button></example-button></main>"#
        );
        assert_eq!(result.rendered, 1);
    }

    #[test]
    fn keeps_host_attributes() {
        let registry = ElementRegistry::builtin();

        let result = registry.expand(r#"<example-button variant="primary">Go</example-button>"#);

        assert!(result
            .html
            .starts_with(r#"<example-button variant="primary"><button type="button" class="btn btn-primary">"#));
    }

    #[test]
    fn expands_elements_inside_rendered_content() {
        let registry = ElementRegistry::builtin();
        let html = r#"<navbar-component><example-button size="sm">Login</example-button></navbar-component>"#;

        let result = registry.expand(html);

        assert_eq!(result.rendered, 2);
        assert!(result.html.contains("navbar-collapse"));
        assert!(result
            .html
            .contains(r#"<button type="button" class="btn btn-custom btn-sm">Login</button>"#));
    }

    #[test]
    fn leaves_unknown_and_unclosed_tags() {
        let registry = ElementRegistry::builtin();
        let html = "<other-thing>x</other-thing><example-button>never closed";

        let result = registry.expand(html);

        assert_eq!(result.html, html);
        assert_eq!(result.rendered, 0);
    }

    #[test]
    fn expansion_is_deterministic() {
        let registry = ElementRegistry::builtin();
        let html = r#"<component-name example-attr="A">b</component-name>"#;

        assert_eq!(registry.expand(html), registry.expand(html));
    }

    #[test]
    fn custom_elements_can_be_registered() {
        let mut registry = ElementRegistry::new();
        registry.register(Shout);

        let result = registry.expand("<p><x-shout>hey</x-shout> there</p>");

        assert_eq!(result.html, "<p><x-shout>HEY</x-shout> there</p>");
    }

    #[test]
    fn skips_elements_inside_comments() {
        let registry = ElementRegistry::builtin();
        let html = "<!-- <example-button>x</example-button> --><example-button>y</example-button>";

        let result = registry.expand(html);

        assert_eq!(
            result.html,
            r#"<!-- <example-button>x</example-button> --><example-button><button type="button" class="btn btn-custom">y</button></example-button>"#
        );
        assert_eq!(result.rendered, 1);
    }

    #[test]
    fn unterminated_comment_hides_the_rest() {
        let registry = ElementRegistry::builtin();
        let html = "<!-- <example-button>x</example-button>";

        let result = registry.expand(html);

        assert_eq!(result.html, html);
        assert_eq!(result.rendered, 0);
    }

    #[test]
    fn leaves_inert_content_alone() {
        let registry = ElementRegistry::builtin();
        let html = concat!(
            "<script>const b = '<example-button>x</example-button>';</script>",
            "<template><example-button>t</example-button></template>",
            "<textarea><component-name>c</component-name></textarea>",
        );

        let result = registry.expand(html);

        assert_eq!(result.html, html);
        assert_eq!(result.rendered, 0);
    }

    #[test]
    fn empty_registry_is_a_no_op() {
        let registry = ElementRegistry::new();

        let result = registry.expand("<example-button>Save</example-button>");

        assert_eq!(result.rendered, 0);
        assert_eq!(result.html, "<example-button>Save</example-button>");
    }
}

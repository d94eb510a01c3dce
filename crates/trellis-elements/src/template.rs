//! `<component-name>`: the starting point for new components.
//!
//! New components are scaffolded from this element (see [`crate::scaffold`]), so it
//! is kept registered as a working reference of the attribute/content contract.

use crate::markup::text_content;
use crate::traits::{Attributes, CustomElement};

/// Typed configuration read from a `<component-name>` tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateConfig {
    /// Heading text (default "default-value")
    pub example_attr: String,
}

impl Default for TemplateConfig {
    fn default() -> Self {
        Self {
            example_attr: "default-value".to_string(),
        }
    }
}

impl TemplateConfig {
    pub fn from_attributes(attrs: &Attributes) -> Self {
        Self {
            example_attr: attrs.value_or("example-attr", "default-value").to_string(),
        }
    }

    pub fn render(&self, content: &str) -> String {
        format!(
            r#"<div class="your-component-class"><h3>{}</h3><p>{}</p></div>"#,
            self.example_attr, content
        )
    }
}

/// The `<component-name>` element.
#[derive(Debug, Default, Clone, Copy)]
pub struct TemplateElement;

impl TemplateElement {
    pub const DEFAULT_CONTENT: &'static str = "Default content";
}

impl CustomElement for TemplateElement {
    fn tag(&self) -> &'static str {
        "component-name"
    }

    fn render(&self, attrs: &Attributes, content: &str) -> String {
        let text = text_content(content);
        let text = if text.is_empty() {
            Self::DEFAULT_CONTENT
        } else {
            text.as_str()
        };

        TemplateConfig::from_attributes(attrs).render(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn renders_defaults() {
        let html = TemplateElement.render(&Attributes::new(), "");

        assert_eq!(
            html,
            r#"<div class="your-component-class"><h3>default-value</h3><p>Default content</p></div>"#
        );
    }

    #[test]
    fn renders_attribute_and_content() {
        let attrs = Attributes::parse(r#"example-attr="Tokens""#);

        let html = TemplateElement.render(&attrs, " Spacing scale ");

        assert_eq!(
            html,
            r#"<div class="your-component-class"><h3>Tokens</h3><p>Spacing scale</p></div>"#
        );
    }
}

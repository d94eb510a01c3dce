//! `<example-button>`: a design-system button.

use crate::markup::text_content;
use crate::traits::{Attributes, CustomElement};

/// Typed configuration read from an `<example-button>` tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ButtonConfig {
    /// Style variant, rendered as `btn-{variant}` (default "custom")
    pub variant: String,

    /// Optional size, rendered as `btn-{size}`
    pub size: Option<String>,

    /// Whether the button is disabled
    pub disabled: bool,

    /// The button's `type` attribute (default "button")
    pub button_type: String,
}

impl Default for ButtonConfig {
    fn default() -> Self {
        Self {
            variant: "custom".to_string(),
            size: None,
            disabled: false,
            button_type: "button".to_string(),
        }
    }
}

impl ButtonConfig {
    /// Read the configuration from element attributes, applying defaults.
    pub fn from_attributes(attrs: &Attributes) -> Self {
        let defaults = Self::default();

        Self {
            variant: attrs.value_or("variant", &defaults.variant).to_string(),
            size: attrs.non_empty("size").map(str::to_string),
            disabled: attrs.has("disabled"),
            button_type: attrs.value_or("type", &defaults.button_type).to_string(),
        }
    }

    /// Class list for the rendered button.
    pub fn classes(&self) -> String {
        let mut classes = vec!["btn".to_string(), format!("btn-{}", self.variant)];
        if let Some(size) = &self.size {
            classes.push(format!("btn-{}", size));
        }
        classes.join(" ")
    }

    /// Render the button with the given label.
    pub fn render(&self, text: &str) -> String {
        let disabled = if self.disabled { " disabled" } else { "" };

        format!(
            r#"<button type="{}" class="{}"{}>{}</button>"#,
            self.button_type,
            self.classes(),
            disabled,
            text
        )
    }
}

/// The `<example-button>` element.
#[derive(Debug, Default, Clone, Copy)]
pub struct ExampleButton;

impl ExampleButton {
    /// Label used when the element has no text.
    pub const DEFAULT_TEXT: &'static str = "Button";
}

impl CustomElement for ExampleButton {
    fn tag(&self) -> &'static str {
        "example-button"
    }

    fn render(&self, attrs: &Attributes, content: &str) -> String {
        let text = text_content(content);
        let text = if text.is_empty() {
            Self::DEFAULT_TEXT
        } else {
            text.as_str()
        };

        ButtonConfig::from_attributes(attrs).render(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn renders_defaults() {
        let html = ExampleButton.render(&Attributes::new(), "Save");

        assert_eq!(html, r#"<button type="button" class="btn btn-custom">Save</button>"#);
    }

    #[test]
    fn renders_all_attributes() {
        let attrs = Attributes::parse(r#"variant="secondary" size="lg" disabled type="submit""#);

        let html = ExampleButton.render(&attrs, "Cancel");

        assert_eq!(
            html,
            r#"<button type="submit" class="btn btn-secondary btn-lg" disabled>Cancel</button>"#
        );
    }

    #[test]
    fn falls_back_to_default_label() {
        let html = ExampleButton.render(&Attributes::new(), "   ");

        assert!(html.contains(">Button</button>"));
    }

    #[test]
    fn uses_text_content_only() {
        let html = ExampleButton.render(&Attributes::new(), "  <em>Save</em> draft ");

        assert!(html.ends_with(">Save draft</button>"));
    }

    #[test]
    fn empty_attribute_values_use_defaults() {
        let attrs = Attributes::parse(r#"variant="" size="" type="""#);

        assert_eq!(ButtonConfig::from_attributes(&attrs), ButtonConfig::default());
    }

    #[test]
    fn disabled_flag_accepts_any_value() {
        let attrs = Attributes::parse(r#"disabled="false""#);

        assert!(ButtonConfig::from_attributes(&attrs).disabled);
    }

    #[test]
    fn rendering_is_repeatable() {
        let attrs = Attributes::parse(r#"variant="primary" size="sm""#);

        let first = ExampleButton.render(&attrs, "Go");
        let second = ExampleButton.render(&attrs, "Go");

        assert_eq!(first, second);
    }
}

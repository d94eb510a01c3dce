//! `<navbar-component>`: the responsive site navigation bar.
//!
//! The element's content is the pre-built link markup. It is placed, untouched,
//! inside the collapsible container next to the brand link and the toggle button.

use crate::traits::{Attributes, CustomElement};

/// Logo shown when no `logo-src` is given.
pub const DEFAULT_LOGO_SRC: &str = "https://www.lib.uchicago.edu/web-resources/img/color-logo.png";

/// Alt text used when no `logo-alt` is given.
pub const DEFAULT_LOGO_ALT: &str = "UChicago Library";

/// Id of the collapsible region the toggle controls.
const COLLAPSE_ID: &str = "navbarContent";

/// Typed configuration read from a `<navbar-component>` tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavbarConfig {
    pub logo_src: String,
    pub logo_alt: String,
    /// Label next to the logo; omitted when absent
    pub brand_text: Option<String>,
}

impl Default for NavbarConfig {
    fn default() -> Self {
        Self {
            logo_src: DEFAULT_LOGO_SRC.to_string(),
            logo_alt: DEFAULT_LOGO_ALT.to_string(),
            brand_text: None,
        }
    }
}

impl NavbarConfig {
    /// Read the configuration from element attributes, applying defaults.
    pub fn from_attributes(attrs: &Attributes) -> Self {
        Self {
            logo_src: attrs.value_or("logo-src", DEFAULT_LOGO_SRC).to_string(),
            logo_alt: attrs.value_or("logo-alt", DEFAULT_LOGO_ALT).to_string(),
            brand_text: attrs.non_empty("brand-text").map(str::to_string),
        }
    }

    /// Render the navbar around the given link markup.
    pub fn render(&self, links: &str) -> String {
        let brand = match &self.brand_text {
            Some(text) => format!("\n      <span class=\"fw-semibold\">{}</span>", text),
            None => String::new(),
        };

        format!(
            r##"
<nav class="navbar navbar-expand-lg navbar-dark bg-primary" aria-label="Main navigation">
  <div class="container-fluid">
    <a class="navbar-brand d-flex align-items-center" href="/">
      <img src="{logo_src}" alt="{logo_alt}" height="40" class="d-inline-block align-text-top me-2" loading="lazy">{brand}
    </a>
    <button class="navbar-toggler" type="button" data-bs-toggle="collapse" data-bs-target="#{id}" aria-controls="{id}" aria-expanded="false" aria-label="Toggle navigation">
      <span class="navbar-toggler-icon"></span>
    </button>
    <div class="collapse navbar-collapse" id="{id}">
      <div class="navbar-nav ms-auto">
        {links}
      </div>
    </div>
  </div>
</nav>
"##,
            logo_src = self.logo_src,
            logo_alt = self.logo_alt,
            brand = brand,
            id = COLLAPSE_ID,
            links = links,
        )
    }
}

/// The `<navbar-component>` element.
#[derive(Debug, Default, Clone, Copy)]
pub struct NavbarComponent;

impl CustomElement for NavbarComponent {
    fn tag(&self) -> &'static str {
        "navbar-component"
    }

    fn render(&self, attrs: &Attributes, content: &str) -> String {
        NavbarConfig::from_attributes(attrs).render(content.trim())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markup::find_elements;

    const LINKS: &str = r##"
      <a href="#" class="nav-link">Link 1</a>
      <a href="#" class="nav-link">Link 2</a>
    "##;

    #[test]
    fn renders_links_inside_collapsible_container() {
        let html = NavbarComponent.render(&Attributes::new(), LINKS);

        let container = &find_elements(&html, "div")[0];
        let container_html = container.content(&html);

        let collapse = find_elements(container_html, "div")
            .into_iter()
            .find(|m| m.attributes.get("id") == Some(COLLAPSE_ID))
            .expect("collapsible container");
        let inner = collapse.content(container_html);

        assert!(inner.contains(r##"<a href="#" class="nav-link">Link 1</a>"##));
        assert!(inner.contains(r##"<a href="#" class="nav-link">Link 2</a>"##));
        assert_eq!(
            collapse.attributes.get("class"),
            Some("collapse navbar-collapse")
        );
    }

    #[test]
    fn renders_fixed_brand_and_toggle() {
        let html = NavbarComponent.render(&Attributes::new(), LINKS);

        assert!(html.contains(&format!(r#"<img src="{}""#, DEFAULT_LOGO_SRC)));
        assert!(html.contains(r#"alt="UChicago Library""#));
        assert!(html.contains(r#"class="navbar-toggler""#));
        assert!(html.contains(r##"data-bs-target="#navbarContent""##));
        assert!(!html.contains("fw-semibold"));
    }

    #[test]
    fn applies_branding_attributes() {
        let attrs =
            Attributes::parse(r#"logo-src="/img/logo.svg" logo-alt="Logo" brand-text="Library""#);

        let html = NavbarComponent.render(&attrs, "");

        assert!(html.contains(r#"<img src="/img/logo.svg" alt="Logo""#));
        assert!(html.contains(r#"<span class="fw-semibold">Library</span>"#));
    }

    #[test]
    fn empty_brand_text_is_omitted() {
        let attrs = Attributes::parse(r#"brand-text="""#);

        assert_eq!(NavbarConfig::from_attributes(&attrs).brand_text, None);
    }

    #[test]
    fn rendering_is_repeatable() {
        let attrs = Attributes::parse(r#"brand-text="Docs""#);

        assert_eq!(
            NavbarComponent.render(&attrs, LINKS),
            NavbarComponent.render(&attrs, LINKS)
        );
    }
}

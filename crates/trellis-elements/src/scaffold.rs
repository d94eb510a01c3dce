//! Browser-side component scaffolding.
//!
//! Generates the source of a new custom element from the component template, for
//! authors who want a browser-rendered element alongside the prerendered ones.

/// Names the HTML standard reserves even though they contain a hyphen.
const RESERVED_NAMES: &[&str] = &[
    "annotation-xml",
    "color-profile",
    "font-face",
    "font-face-src",
    "font-face-uri",
    "font-face-format",
    "font-face-name",
    "missing-glyph",
];

/// Errors that can occur while scaffolding.
#[derive(Debug, thiserror::Error)]
pub enum ScaffoldError {
    #[error("Invalid custom element name '{0}': use lowercase letters, digits and at least one hyphen, starting with a letter")]
    InvalidTagName(String),

    #[error("'{0}' is a reserved element name")]
    ReservedTagName(String),
}

/// Check whether `tag` is a usable custom element name.
pub fn is_valid_tag_name(tag: &str) -> bool {
    let mut chars = tag.chars();
    let starts_with_letter = chars.next().is_some_and(|c| c.is_ascii_lowercase());

    starts_with_letter
        && tag.contains('-')
        && !tag.ends_with('-')
        && tag
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' || c == '_' || c == '.')
        && !RESERVED_NAMES.contains(&tag)
}

/// Generate the source of a new custom element named `tag`.
pub fn component_script(tag: &str) -> Result<String, ScaffoldError> {
    if RESERVED_NAMES.contains(&tag) {
        return Err(ScaffoldError::ReservedTagName(tag.to_string()));
    }
    if !is_valid_tag_name(tag) {
        return Err(ScaffoldError::InvalidTagName(tag.to_string()));
    }

    let class_name = to_pascal_case(tag);

    Ok(format!(
        r#"/**
 * <{tag_name}> custom element.
 *
 * Include the script on a page, then use the element:
 *   <script src="/components/{tag_name}.js"></script>
 *   <{tag_name} example-attr="Heading">Content</{tag_name}>
 *
 * Attributes:
 *   - example-attr: heading text (default: "default-value")
 */

// Tagged template so editors can highlight the markup
const html = (strings, ...values) => String.raw({{ raw: strings }}, ...values);

class {class_name} extends HTMLElement {{
  connectedCallback() {{
    const exampleAttr = this.getAttribute('example-attr') || 'default-value';
    const content = this.textContent.trim() || 'Default content';

    this.innerHTML = html`
      <div class="your-component-class">
        <h3>${{exampleAttr}}</h3>
        <p>${{content}}</p>
      </div>
    `;
  }}
}}

customElements.define('{tag_name}', {class_name});
"#,
        tag_name = tag,
        class_name = class_name,
    ))
}

/// Convert kebab-case to PascalCase.
fn to_pascal_case(s: &str) -> String {
    s.split(['-', '_', '.'])
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(c) => c.to_uppercase().collect::<String>() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect()
}

//! Template engine for rendering pages and layouts.

use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;

use minijinja::{path_loader, AutoEscape, Environment, Value};
use trellis_pages::{extract_frontmatter, slugify, Frontmatter};

/// Variables available to a template.
pub type Context = BTreeMap<String, Value>;

/// Layouts may wrap other layouts up to this depth.
const MAX_LAYOUT_DEPTH: usize = 10;

/// A layout template loaded from the includes directory.
#[derive(Debug, Clone)]
pub struct Layout {
    /// Name the layout was requested by
    pub name: String,
    /// The layout's own frontmatter
    pub frontmatter: Frontmatter,
    /// Template body
    pub body: String,
}

/// Errors that can occur while rendering templates.
#[derive(Debug, thiserror::Error)]
pub enum TemplateError {
    #[error("Failed to render {name}: {message}")]
    Render { name: String, message: String },

    #[error("Layout not found: {name} (looked in {dir})")]
    LayoutNotFound { name: String, dir: String },

    #[error("Layout chain starting at {name} is deeper than {depth} levels; check for a cycle")]
    LayoutCycle { name: String, depth: usize },

    #[error("Invalid layout {name}: {message}")]
    InvalidLayout { name: String, message: String },
}

/// Template engine using minijinja.
///
/// Template names in `{% include %}`, `{% extends %}` and layouts resolve inside
/// the includes directory.
pub struct TemplateEngine {
    env: Environment<'static>,
    includes_dir: PathBuf,
}

impl TemplateEngine {
    /// Create a template engine reading partials from `includes_dir`.
    pub fn new(includes_dir: impl Into<PathBuf>, path_prefix: &str) -> Self {
        let includes_dir = includes_dir.into();
        let mut env = Environment::new();

        env.set_loader(path_loader(includes_dir.clone()));
        env.set_auto_escape_callback(|_| AutoEscape::Html);

        let prefix = path_prefix.to_string();
        // Marked safe so slashes are not entity-encoded
        env.add_filter("url", move |value: String| {
            Value::from_safe_string(apply_path_prefix(&prefix, &value))
        });
        env.add_filter("slugify", |value: String| slugify(&value));

        Self { env, includes_dir }
    }

    /// Render template source with the given context.
    pub fn render(&self, name: &str, source: &str, ctx: &Context) -> Result<String, TemplateError> {
        self.env
            .render_named_str(name, source, ctx)
            .map_err(|e| TemplateError::Render {
                name: name.to_string(),
                message: format!("{:#}", e),
            })
    }

    /// Load a layout by name from the includes directory.
    ///
    /// A name without an extension also matches `name.njk` and `name.html`.
    pub fn load_layout(&self, name: &str) -> Result<Layout, TemplateError> {
        let candidates = [
            self.includes_dir.join(name),
            self.includes_dir.join(format!("{}.njk", name)),
            self.includes_dir.join(format!("{}.html", name)),
        ];

        let Some(path) = candidates.iter().find(|p| p.is_file()) else {
            return Err(TemplateError::LayoutNotFound {
                name: name.to_string(),
                dir: self.includes_dir.display().to_string(),
            });
        };

        let source = fs::read_to_string(path).map_err(|e| TemplateError::InvalidLayout {
            name: name.to_string(),
            message: e.to_string(),
        })?;

        let (frontmatter, body) =
            extract_frontmatter(&source).map_err(|e| TemplateError::InvalidLayout {
                name: name.to_string(),
                message: e.to_string(),
            })?;

        Ok(Layout {
            name: name.to_string(),
            frontmatter: frontmatter.unwrap_or_default(),
            body: body.to_string(),
        })
    }

    /// Wrap rendered page content in its layout chain.
    ///
    /// Each layout receives the page context plus its own frontmatter (page values
    /// win) and the inner markup as `content`.
    pub fn apply_layouts(
        &self,
        content: String,
        layout: Option<&str>,
        ctx: &Context,
    ) -> Result<String, TemplateError> {
        let Some(first) = layout else {
            return Ok(content);
        };

        let mut content = content;
        let mut next = Some(first.to_string());
        let mut depth = 0;

        while let Some(name) = next.take() {
            depth += 1;
            if depth > MAX_LAYOUT_DEPTH {
                return Err(TemplateError::LayoutCycle {
                    name: first.to_string(),
                    depth: MAX_LAYOUT_DEPTH,
                });
            }

            let layout = self.load_layout(&name)?;
            tracing::debug!("Applying layout {}", layout.name);

            let mut layout_ctx = layout_data(&layout.frontmatter);
            layout_ctx.extend(ctx.iter().map(|(k, v)| (k.clone(), v.clone())));
            layout_ctx.insert("content".to_string(), Value::from_safe_string(content));

            content = self.render(&layout.name, &layout.body, &layout_ctx)?;
            next = layout.frontmatter.layout.clone();
        }

        Ok(content)
    }
}

/// Template variables contributed by a layout's frontmatter.
fn layout_data(frontmatter: &Frontmatter) -> Context {
    let mut data: Context = frontmatter
        .extra
        .iter()
        .map(|(k, v)| (k.clone(), Value::from_serialize(v)))
        .collect();

    if let Some(title) = &frontmatter.title {
        data.insert("title".to_string(), Value::from(title.as_str()));
    }

    data
}

/// Prefix a root-relative URL with the site's path prefix.
///
/// Absolute, protocol-relative and relative URLs are returned unchanged.
pub fn apply_path_prefix(prefix: &str, url: &str) -> String {
    if url.starts_with('/') && !url.starts_with("//") {
        format!("{}{}", prefix.trim_end_matches('/'), url)
    } else {
        url.to_string()
    }
}

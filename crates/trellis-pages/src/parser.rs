//! Page template parsing.

use std::path::Path;

use crate::frontmatter::{extract_frontmatter, Frontmatter, FrontmatterError};

/// Source format of a page template, derived from its extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TemplateFormat {
    /// `.html`
    Html,
    /// `.md`
    Markdown,
    /// `.njk`
    Nunjucks,
}

impl TemplateFormat {
    /// Parse a format from a file extension (without the dot).
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "html" | "htm" => Some(Self::Html),
            "md" | "markdown" => Some(Self::Markdown),
            "njk" => Some(Self::Nunjucks),
            _ => None,
        }
    }

    /// Determine the format of a file path.
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|e| e.to_str())
            .and_then(Self::from_extension)
    }

    /// Canonical extension for this format.
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Html => "html",
            Self::Markdown => "md",
            Self::Nunjucks => "njk",
        }
    }
}

/// A page template split into frontmatter and body.
#[derive(Debug, Clone)]
pub struct PageSource {
    /// Template format
    pub format: TemplateFormat,

    /// Parsed frontmatter (empty when the page has none)
    pub frontmatter: Frontmatter,

    /// Template body without the frontmatter block
    pub body: String,
}

/// Errors that can occur when parsing a page.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("Frontmatter error: {0}")]
    Frontmatter(#[from] FrontmatterError),
}

/// Parse a page template.
pub fn parse_page(source: &str, format: TemplateFormat) -> Result<PageSource, ParseError> {
    let (frontmatter, body) = extract_frontmatter(source)?;

    Ok(PageSource {
        format,
        frontmatter: frontmatter.unwrap_or_default(),
        body: body.to_string(),
    })
}

//! Page source parsing with YAML frontmatter and markdown rendering.
//!
//! This crate splits page templates into their frontmatter and body, identifies
//! the template format from the file extension, and renders markdown bodies to HTML.

pub mod frontmatter;
pub mod markdown;
pub mod parser;

pub use frontmatter::{extract_frontmatter, Frontmatter, FrontmatterError, Permalink};
pub use markdown::{render_markdown, slugify};
pub use parser::{parse_page, PageSource, ParseError, TemplateFormat};

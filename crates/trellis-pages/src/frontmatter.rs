//! Frontmatter extraction and parsing.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};

/// Parsed frontmatter from a page template.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
pub struct Frontmatter {
    /// Page title
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// Layout template name, resolved inside the includes directory
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layout: Option<String>,

    /// Output location override, or `false` to skip writing the page
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub permalink: Option<Permalink>,

    /// Collection tags (a single string or a list)
    #[serde(
        default,
        deserialize_with = "string_or_list",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub tags: Vec<String>,

    /// Any other keys, passed through to templates untouched
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_yaml::Value>,
}

/// A `permalink` frontmatter value.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(untagged)]
pub enum Permalink {
    /// `permalink: false` disables output; `true` keeps the default location
    Enabled(bool),
    /// Explicit output path, e.g. `/about/` or `feed.xml`
    Path(String),
}

impl Frontmatter {
    /// Whether the page should be skipped when writing output.
    pub fn is_output_disabled(&self) -> bool {
        matches!(self.permalink, Some(Permalink::Enabled(false)))
    }

    /// The explicit permalink path, if one was given.
    pub fn permalink_path(&self) -> Option<&str> {
        match &self.permalink {
            Some(Permalink::Path(p)) => Some(p.as_str()),
            _ => None,
        }
    }
}

fn string_or_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Tags {
        One(String),
        Many(Vec<String>),
    }

    Ok(match Tags::deserialize(deserializer)? {
        Tags::One(tag) => vec![tag],
        Tags::Many(tags) => tags,
    })
}

/// Extract frontmatter from a page template.
///
/// Returns the parsed frontmatter and the remaining content after the frontmatter block.
pub fn extract_frontmatter(source: &str) -> Result<(Option<Frontmatter>, &str), FrontmatterError> {
    let trimmed = source.trim_start();

    if !trimmed.starts_with("---") {
        return Ok((None, source));
    }

    // Find the closing ---
    let after_open = &trimmed[3..];
    let Some(close_pos) = after_open.find("\n---") else {
        return Err(FrontmatterError::Unclosed);
    };

    let yaml_content = after_open[..close_pos].trim();
    let remaining = &after_open[close_pos + 4..];

    let frontmatter = if yaml_content.is_empty() {
        Frontmatter::default()
    } else {
        serde_yaml::from_str(yaml_content)
            .map_err(|e| FrontmatterError::InvalidYaml(e.to_string()))?
    };

    Ok((Some(frontmatter), remaining.trim_start()))
}

/// Errors that can occur when parsing frontmatter.
#[derive(Debug, thiserror::Error)]
pub enum FrontmatterError {
    #[error("Unclosed frontmatter block - missing closing ---")]
    Unclosed,

    #[error("Invalid YAML in frontmatter: {0}")]
    InvalidYaml(String),
}

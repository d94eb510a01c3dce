//! Site configuration (trellis.toml).

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use url::Url;

/// Default config file name.
pub const CONFIG_FILE: &str = "trellis.toml";

/// Configuration for building a site.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct SiteConfig {
    #[serde(default)]
    pub dir: DirConfig,
    #[serde(default)]
    pub templates: TemplateSettings,
    #[serde(default)]
    pub site: SiteSettings,
    #[serde(default)]
    pub elements: ElementSettings,
    #[serde(default)]
    pub embed: EmbedSettings,
}

/// Input and output directory mapping.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct DirConfig {
    /// Source directory for page templates
    #[serde(default = "default_input")]
    pub input: PathBuf,
    /// Output directory for the built site
    #[serde(default = "default_output")]
    pub output: PathBuf,
    /// Layouts and partials, relative to the input directory
    #[serde(default = "default_includes")]
    pub includes: PathBuf,
    /// Global data files, relative to the input directory
    #[serde(default = "default_data")]
    pub data: PathBuf,
}

/// Which template files become pages and how they are processed.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct TemplateSettings {
    /// File extensions treated as page templates
    #[serde(default = "default_formats")]
    pub formats: Vec<String>,
    /// Engine used to pre-process `.html` files
    #[serde(default)]
    pub html_engine: TemplateEngineKind,
    /// Engine used to pre-process `.md` files before markdown rendering
    #[serde(default)]
    pub markdown_engine: TemplateEngineKind,
}

/// Template engine selection.
#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TemplateEngineKind {
    /// Render through the Nunjucks-compatible engine
    #[default]
    Njk,
    /// Emit the file body verbatim
    None,
}

/// Site-wide settings.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct SiteSettings {
    /// URL prefix for sub-path deployment
    #[serde(default = "default_path_prefix")]
    pub path_prefix: String,
    /// Extra paths the dev server watches for changes
    #[serde(default = "default_watch_targets")]
    pub watch_targets: Vec<PathBuf>,
}

/// Custom element prerendering.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct ElementSettings {
    #[serde(default = "default_true")]
    pub prerender: bool,
}

/// Placeholder embed inlining.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct EmbedSettings {
    /// Origin the site is served from; embeds are only inlined for http(s) origins
    #[serde(default)]
    pub origin: Option<String>,
    /// Write the browser-side loader to assets/js/component-loader.js
    #[serde(default = "default_true")]
    pub emit_loader: bool,
}

fn default_input() -> PathBuf {
    PathBuf::from("src")
}
fn default_output() -> PathBuf {
    PathBuf::from("dist")
}
fn default_includes() -> PathBuf {
    PathBuf::from("_includes")
}
fn default_data() -> PathBuf {
    PathBuf::from("_data")
}
fn default_formats() -> Vec<String> {
    vec!["html".to_string(), "md".to_string(), "njk".to_string()]
}
fn default_path_prefix() -> String {
    "/".to_string()
}
fn default_watch_targets() -> Vec<PathBuf> {
    vec![PathBuf::from("src/styles/")]
}
fn default_true() -> bool {
    true
}

impl Default for DirConfig {
    fn default() -> Self {
        Self {
            input: default_input(),
            output: default_output(),
            includes: default_includes(),
            data: default_data(),
        }
    }
}

impl Default for TemplateSettings {
    fn default() -> Self {
        Self {
            formats: default_formats(),
            html_engine: TemplateEngineKind::default(),
            markdown_engine: TemplateEngineKind::default(),
        }
    }
}

impl Default for SiteSettings {
    fn default() -> Self {
        Self {
            path_prefix: default_path_prefix(),
            watch_targets: default_watch_targets(),
        }
    }
}

impl Default for ElementSettings {
    fn default() -> Self {
        Self { prerender: true }
    }
}

impl Default for EmbedSettings {
    fn default() -> Self {
        Self {
            origin: None,
            emit_loader: true,
        }
    }
}

/// Errors that can occur loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read {path}: {message}")]
    ReadError { path: String, message: String },

    #[error("Failed to parse {path}: {message}")]
    ParseError { path: String, message: String },

    #[error("Invalid embed origin '{origin}': {message}")]
    InvalidOrigin { origin: String, message: String },
}

impl SiteConfig {
    /// Load configuration from `path` if it exists, defaults otherwise.
    ///
    /// Returns an error if the file exists but is malformed.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::debug!("No {} found, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;

        let config = Self::from_toml(&content).map_err(|e| match e {
            ConfigError::ParseError { message, .. } => ConfigError::ParseError {
                path: path.display().to_string(),
                message,
            },
            other => other,
        })?;

        tracing::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Parse configuration from TOML text.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content).map_err(|e| ConfigError::ParseError {
            path: CONFIG_FILE.to_string(),
            message: e.to_string(),
        })?;

        // Surface a bad origin at load time rather than mid-build
        config.embed_origin()?;

        Ok(config)
    }

    /// Directory holding layouts and partials.
    pub fn includes_dir(&self) -> PathBuf {
        self.dir.input.join(&self.dir.includes)
    }

    /// Directory holding global data files.
    pub fn data_dir(&self) -> PathBuf {
        self.dir.input.join(&self.dir.data)
    }

    /// The path prefix, normalized to start and end with `/`.
    pub fn path_prefix(&self) -> String {
        normalize_prefix(&self.site.path_prefix)
    }

    /// The parsed embed origin, if one is configured.
    pub fn embed_origin(&self) -> Result<Option<Url>, ConfigError> {
        match &self.embed.origin {
            None => Ok(None),
            Some(origin) if origin.trim().is_empty() => Ok(None),
            Some(origin) => Url::parse(origin)
                .map(Some)
                .map_err(|e| ConfigError::InvalidOrigin {
                    origin: origin.clone(),
                    message: e.to_string(),
                }),
        }
    }
}

/// Normalize a path prefix to `/` or `/segment/.../`.
pub fn normalize_prefix(prefix: &str) -> String {
    let trimmed = prefix.trim().trim_matches('/');
    if trimmed.is_empty() {
        "/".to_string()
    } else {
        format!("/{}/", trimmed)
    }
}

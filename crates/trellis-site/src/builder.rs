//! Static site builder.

use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use minijinja::Value;
use rayon::prelude::*;
use serde::Serialize;
use walkdir::{DirEntry, WalkDir};

use trellis_elements::{ElementRegistry, Expansion};
use trellis_pages::{parse_page, render_markdown, Frontmatter, PageSource, TemplateFormat};

use crate::assets::AssetPipeline;
use crate::config::{SiteConfig, TemplateEngineKind};
use crate::data::load_global_data;
use crate::embed::{EmbedInliner, FragmentSource, HttpFragmentSource};
use crate::templates::{apply_path_prefix, Context, TemplateEngine, TemplateError};

/// Result of a build operation.
#[derive(Debug)]
pub struct BuildResult {
    /// Number of pages written
    pub pages: usize,

    /// Number of custom element occurrences prerendered
    pub elements: usize,

    /// Number of embed placeholders replaced with fetched markup
    pub embeds_inlined: usize,

    /// Number of embed placeholders left in place after a failed fetch
    pub embeds_failed: usize,

    /// Total build time in milliseconds
    pub duration_ms: u64,

    /// Output directory
    pub output_dir: PathBuf,
}

/// Errors that can occur during build.
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error("Failed to read input: {0}")]
    ReadError(String),

    #[error("Invalid configuration: {0}")]
    ConfigError(String),

    #[error("Failed to parse page: {path}: {message}")]
    ParseError { path: String, message: String },

    #[error("Failed to load data file: {path}: {message}")]
    DataError { path: String, message: String },

    #[error("Failed to render {path}: {message}")]
    TemplateError { path: String, message: String },

    #[error("Failed to write output: {0}")]
    WriteError(String),
}

/// A page to be built.
#[derive(Debug)]
struct PageInfo {
    /// Source file path
    source_path: PathBuf,

    /// Relative path from the input directory
    relative_path: PathBuf,

    /// Output path, `None` when the page has `permalink: false`
    output_path: Option<PathBuf>,

    /// URL path of the page, without the path prefix
    url: String,

    /// Parsed template
    source: PageSource,
}

/// The `page` variable available to templates.
#[derive(Debug, Serialize)]
struct PageData<'a> {
    url: &'a str,
    input_path: String,
    output_path: String,
    file_slug: String,
}

/// An entry in a collection.
#[derive(Debug, Clone, Serialize)]
struct CollectionItem {
    url: String,
    title: Option<String>,
    input_path: String,
    file_slug: String,
    tags: Vec<String>,
    data: serde_json::Value,
}

/// A rendered page waiting to be written.
struct RenderedPage<'a> {
    page: &'a PageInfo,
    html: String,
    elements: usize,
}

/// Static site builder.
pub struct SiteBuilder {
    config: SiteConfig,
    templates: TemplateEngine,
    elements: ElementRegistry,
    fragments: Arc<dyn FragmentSource>,
    live_reload: Option<String>,
}

impl SiteBuilder {
    /// Create a new site builder with the built-in elements.
    pub fn new(config: SiteConfig) -> Self {
        let templates = TemplateEngine::new(config.includes_dir(), &config.path_prefix());

        Self {
            config,
            templates,
            elements: ElementRegistry::builtin(),
            fragments: Arc::new(HttpFragmentSource::new()),
            live_reload: None,
        }
    }

    /// Use a different set of custom elements.
    pub fn with_elements(mut self, elements: ElementRegistry) -> Self {
        self.elements = elements;
        self
    }

    /// Fetch embed fragments from `source` instead of over HTTP.
    pub fn with_fragment_source(mut self, source: Arc<dyn FragmentSource>) -> Self {
        self.fragments = source;
        self
    }

    /// Inject `<script src="...">` before `</body>` on every page.
    pub fn with_live_reload(mut self, script_src: impl Into<String>) -> Self {
        self.live_reload = Some(script_src.into());
        self
    }

    /// The configuration this builder uses.
    pub fn config(&self) -> &SiteConfig {
        &self.config
    }

    /// Build the site.
    pub async fn build(&self) -> Result<BuildResult, BuildError> {
        let start = Instant::now();

        if !self.config.dir.input.exists() {
            return Err(BuildError::ReadError(format!(
                "Input directory not found: {}",
                self.config.dir.input.display()
            )));
        }

        let inliner = self
            .config
            .embed_origin()
            .map_err(|e| BuildError::ConfigError(e.to_string()))?
            .and_then(|origin| EmbedInliner::new(origin, Arc::clone(&self.fragments)));

        fs::create_dir_all(&self.config.dir.output)
            .map_err(|e| BuildError::WriteError(e.to_string()))?;

        let globals = load_global_data(&self.config.data_dir())?;
        let pages = self.discover_pages()?;
        let collections = build_collections(&pages);

        // Shared template variables: global data, then collections
        let mut shared: Context = globals
            .iter()
            .map(|(k, v)| (k.clone(), Value::from_serialize(v)))
            .collect();
        shared.insert("collections".to_string(), Value::from_serialize(&collections));

        // Render pages in parallel
        let rendered: Vec<Result<RenderedPage, BuildError>> = pages
            .par_iter()
            .filter(|page| page.output_path.is_some())
            .map(|page| self.render_page(page, &shared))
            .collect();

        let prefix = self.config.path_prefix();
        let mut total_pages = 0;
        let mut total_elements = 0;
        let mut embeds_inlined = 0;
        let mut embeds_failed = 0;

        for result in rendered {
            let mut rendered = result?;

            if let Some(inliner) = &inliner {
                let page_path = apply_path_prefix(&prefix, &rendered.page.url);
                let report = inliner.inline(&rendered.html, &page_path).await;
                rendered.html = report.html;
                embeds_inlined += report.inlined;
                embeds_failed += report.failed;
            }

            self.write_page(&rendered)?;
            total_pages += 1;
            total_elements += rendered.elements;
        }

        if self.config.embed.emit_loader {
            AssetPipeline::write_loader(&self.config.dir.output)
                .map_err(|e| BuildError::WriteError(e.to_string()))?;
        }

        let duration = start.elapsed();

        Ok(BuildResult {
            pages: total_pages,
            elements: total_elements,
            embeds_inlined,
            embeds_failed,
            duration_ms: duration.as_millis() as u64,
            output_dir: self.config.dir.output.clone(),
        })
    }

    /// Discover all page templates in the input directory.
    fn discover_pages(&self) -> Result<Vec<PageInfo>, BuildError> {
        let formats = self.enabled_formats();
        let input = &self.config.dir.input;
        let includes = self.config.includes_dir();
        let data = self.config.data_dir();
        let excluded = [normalize(&includes), normalize(&data), normalize(&self.config.dir.output)];

        let mut pages = Vec::new();

        let walker = WalkDir::new(input)
            .follow_links(true)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| !is_ignored_dir(e, &excluded));

        for entry in walker.filter_map(|e| e.ok()) {
            let path = entry.path();

            if !entry.file_type().is_file() {
                continue;
            }

            let Some(format) = TemplateFormat::from_path(path) else {
                continue;
            };
            if !formats.contains(&format) {
                continue;
            }

            let content = fs::read_to_string(path)
                .map_err(|e| BuildError::ReadError(format!("{}: {}", path.display(), e)))?;

            let source = parse_page(&content, format).map_err(|e| BuildError::ParseError {
                path: path.display().to_string(),
                message: e.to_string(),
            })?;

            let relative_path = path.strip_prefix(input).unwrap_or(path).to_path_buf();
            let (output_path, url) = self.resolve_output(&relative_path, &source.frontmatter);

            pages.push(PageInfo {
                source_path: path.to_path_buf(),
                relative_path,
                output_path,
                url,
                source,
            });
        }

        tracing::debug!("Discovered {} pages in {}", pages.len(), input.display());
        Ok(pages)
    }

    /// Template formats enabled in the configuration.
    fn enabled_formats(&self) -> HashSet<TemplateFormat> {
        self.config
            .templates
            .formats
            .iter()
            .filter_map(|f| {
                let format = TemplateFormat::from_extension(f.trim_start_matches('.'));
                if format.is_none() {
                    tracing::warn!("Unsupported template format '{}', ignoring", f);
                }
                format
            })
            .collect()
    }

    /// Calculate the output path and URL for a page.
    fn resolve_output(&self, relative: &Path, frontmatter: &Frontmatter) -> (Option<PathBuf>, String) {
        if frontmatter.is_output_disabled() {
            return (None, String::new());
        }

        let relative_out = match frontmatter.permalink_path() {
            Some(permalink) => {
                let trimmed = permalink.trim().trim_start_matches('/');
                let path = normal_components(Path::new(trimmed));
                if trimmed.is_empty() || trimmed.ends_with('/') {
                    path.join("index.html")
                } else {
                    path
                }
            }
            None => {
                let stem = relative
                    .file_stem()
                    .and_then(|s| s.to_str())
                    .unwrap_or("index");
                let parent = relative.parent().unwrap_or(Path::new(""));

                if stem == "index" {
                    // src/index.njk -> dist/index.html
                    parent.join("index.html")
                } else {
                    // src/buttons.njk -> dist/buttons/index.html
                    parent.join(stem).join("index.html")
                }
            }
        };

        let url = url_for(&relative_out);
        (Some(self.config.dir.output.join(relative_out)), url)
    }

    /// Template variables for a single page.
    fn page_context(&self, page: &PageInfo, shared: &Context) -> Context {
        let mut ctx = shared.clone();

        if let Ok(serde_json::Value::Object(map)) = serde_json::to_value(&page.source.frontmatter) {
            for (k, v) in map {
                ctx.insert(k, Value::from_serialize(&v));
            }
        }

        let page_data = PageData {
            url: &page.url,
            input_path: page.source_path.display().to_string(),
            output_path: page
                .output_path
                .as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_default(),
            file_slug: file_slug(&page.relative_path),
        };
        ctx.insert("page".to_string(), Value::from_serialize(&page_data));

        ctx
    }

    /// Render a single page: template, layouts, then custom elements.
    fn render_page<'a>(&self, page: &'a PageInfo, shared: &Context) -> Result<RenderedPage<'a>, BuildError> {
        let ctx = self.page_context(page, shared);
        let name = page.relative_path.to_string_lossy();
        let body = &page.source.body;
        let settings = &self.config.templates;

        let content = match page.source.format {
            TemplateFormat::Nunjucks => self.templates.render(&name, body, &ctx),
            TemplateFormat::Html => self.preprocess(settings.html_engine, &name, body, &ctx),
            TemplateFormat::Markdown => self
                .preprocess(settings.markdown_engine, &name, body, &ctx)
                .map(|md| render_markdown(&md)),
        }
        .map_err(|e| template_error(page, e))?;

        let html = self
            .templates
            .apply_layouts(content, page.source.frontmatter.layout.as_deref(), &ctx)
            .map_err(|e| template_error(page, e))?;

        let Expansion { html, rendered } = if self.config.elements.prerender {
            self.elements.expand(&html)
        } else {
            Expansion { html, rendered: 0 }
        };

        tracing::debug!(
            "Rendered {} ({} elements)",
            page.source_path.display(),
            rendered
        );

        Ok(RenderedPage {
            page,
            html,
            elements: rendered,
        })
    }

    /// Run a body through the selected engine.
    fn preprocess(
        &self,
        engine: TemplateEngineKind,
        name: &str,
        body: &str,
        ctx: &Context,
    ) -> Result<String, TemplateError> {
        match engine {
            TemplateEngineKind::Njk => self.templates.render(name, body, ctx),
            TemplateEngineKind::None => Ok(body.to_string()),
        }
    }

    /// Write a rendered page to its output path.
    fn write_page(&self, rendered: &RenderedPage) -> Result<(), BuildError> {
        let Some(output_path) = &rendered.page.output_path else {
            return Ok(());
        };

        if let Some(parent) = output_path.parent() {
            fs::create_dir_all(parent).map_err(|e| BuildError::WriteError(e.to_string()))?;
        }

        let html = match &self.live_reload {
            Some(src) => inject_script(&rendered.html, src),
            None => rendered.html.clone(),
        };

        fs::write(output_path, html)
            .map_err(|e| BuildError::WriteError(format!("{}: {}", output_path.display(), e)))
    }
}

/// Build the `all` collection plus one collection per tag, ordered by input path.
fn build_collections(pages: &[PageInfo]) -> BTreeMap<String, Vec<CollectionItem>> {
    let mut collections: BTreeMap<String, Vec<CollectionItem>> = BTreeMap::new();
    collections.insert("all".to_string(), Vec::new());

    let mut written: Vec<&PageInfo> = pages.iter().filter(|p| p.output_path.is_some()).collect();
    written.sort_by_cached_key(|p| p.relative_path.to_string_lossy().into_owned());

    for page in written {
        let fm = &page.source.frontmatter;
        let item = CollectionItem {
            url: page.url.clone(),
            title: fm.title.clone(),
            input_path: page.source_path.display().to_string(),
            file_slug: file_slug(&page.relative_path),
            tags: fm.tags.clone(),
            data: serde_json::to_value(fm).unwrap_or(serde_json::Value::Null),
        };

        for tag in &fm.tags {
            collections.entry(tag.clone()).or_default().push(item.clone());
        }
        collections.entry("all".to_string()).or_default().push(item);
    }

    collections
}

fn template_error(page: &PageInfo, e: TemplateError) -> BuildError {
    BuildError::TemplateError {
        path: page.source_path.display().to_string(),
        message: e.to_string(),
    }
}

/// Skip dot-directories, `node_modules`, and the given (normalized) directories.
fn is_ignored_dir(entry: &DirEntry, excluded: &[PathBuf]) -> bool {
    if !entry.file_type().is_dir() || entry.depth() == 0 {
        return false;
    }

    let name = entry.file_name().to_string_lossy();
    if name.starts_with('.') || name == "node_modules" {
        return true;
    }

    let path = normalize(entry.path());
    excluded.iter().any(|dir| *dir == path)
}

/// Absolute form of `path` for comparisons: `./dist`, `dist` and
/// `src/../dist` all agree.
fn normalize(path: &Path) -> PathBuf {
    fs::canonicalize(path)
        .or_else(|_| std::path::absolute(path))
        .unwrap_or_else(|_| path.to_path_buf())
}

/// Keep only normal path components (drops `..`, `.` and roots).
fn normal_components(path: &Path) -> PathBuf {
    path.components()
        .filter(|c| matches!(c, Component::Normal(_)))
        .collect()
}

/// URL path for an output path relative to the output directory.
fn url_for(relative_out: &Path) -> String {
    let parts: Vec<String> = relative_out
        .components()
        .filter_map(|c| match c {
            Component::Normal(s) => Some(s.to_string_lossy().to_string()),
            _ => None,
        })
        .collect();

    let mut url = format!("/{}", parts.join("/"));
    if url.ends_with("/index.html") {
        url.truncate(url.len() - "index.html".len());
    }
    url
}

/// File name without extension; index files take their directory's name.
fn file_slug(relative: &Path) -> String {
    let stem = relative
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or_default();

    if stem == "index" {
        relative
            .parent()
            .and_then(|p| p.file_name())
            .and_then(|s| s.to_str())
            .unwrap_or_default()
            .to_string()
    } else {
        stem.to_string()
    }
}

/// Insert a script tag before the closing `</body>`, or append it.
fn inject_script(html: &str, src: &str) -> String {
    let tag = format!(r#"<script src="{}"></script>"#, src);

    match html.to_ascii_lowercase().rfind("</body>") {
        Some(pos) => format!("{}{}{}", &html[..pos], tag, &html[pos..]),
        None => format!("{}{}", html, tag),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::embed::FetchOutcome;
    use async_trait::async_trait;
    use pretty_assertions::assert_eq;
    use tempfile::{tempdir, TempDir};
    use url::Url;

    const BASE_LAYOUT: &str = "<!DOCTYPE html>\n<html><head><title>{{ title }} - {{ site.name }}</title></head>\n<body>{{ content | safe }}</body></html>";

    /// Create a site in a temp dir from (path, contents) pairs under `src/`.
    fn site(files: &[(&str, &str)]) -> (TempDir, SiteConfig) {
        let temp = tempdir().unwrap();
        let input = temp.path().join("src");

        for (path, contents) in files {
            let full = input.join(path);
            fs::create_dir_all(full.parent().unwrap()).unwrap();
            fs::write(full, contents).unwrap();
        }
        fs::create_dir_all(&input).unwrap();

        let mut config = SiteConfig::default();
        config.dir.input = input;
        config.dir.output = temp.path().join("dist");
        (temp, config)
    }

    fn read(config: &SiteConfig, path: &str) -> String {
        fs::read_to_string(config.dir.output.join(path)).unwrap()
    }

    struct StaticSource(FetchOutcome);

    #[async_trait]
    impl FragmentSource for StaticSource {
        async fn fetch(&self, _url: &Url) -> FetchOutcome {
            self.0.clone()
        }
    }

    #[tokio::test]
    async fn builds_simple_site() {
        let (_temp, config) = site(&[
            ("_includes/base.njk", BASE_LAYOUT),
            ("_data/site.json", r#"{"name": "Mockups"}"#),
            ("index.njk", "---\ntitle: Home\nlayout: base.njk\n---\n<h1>{{ title }}</h1>"),
        ]);

        let result = SiteBuilder::new(config.clone()).build().await.unwrap();

        assert_eq!(result.pages, 1);
        let html = read(&config, "index.html");
        assert!(html.contains("<title>Home - Mockups</title>"));
        assert!(html.contains("<body><h1>Home</h1></body>"));
    }

    #[tokio::test]
    async fn maps_output_paths() {
        let (_temp, config) = site(&[
            ("index.html", "home"),
            ("buttons.njk", "buttons"),
            ("guides/index.md", "# Guides"),
            ("guides/tokens.md", "# Tokens"),
            ("custom.njk", "---\npermalink: /elsewhere/\n---\ncustom"),
            ("feed.njk", "---\npermalink: feed.xml\n---\n<feed/>"),
            ("draft.njk", "---\npermalink: false\n---\ndraft"),
        ]);

        let result = SiteBuilder::new(config.clone()).build().await.unwrap();

        assert_eq!(result.pages, 6);
        assert_eq!(read(&config, "index.html"), "home");
        assert_eq!(read(&config, "buttons/index.html"), "buttons");
        assert!(read(&config, "guides/index.html").contains("<h1>Guides</h1>"));
        assert!(read(&config, "guides/tokens/index.html").contains("<h1>Tokens</h1>"));
        assert_eq!(read(&config, "elsewhere/index.html"), "custom");
        assert_eq!(read(&config, "feed.xml"), "<feed/>");
        assert!(!config.dir.output.join("draft").exists());
    }

    #[tokio::test]
    async fn ignores_includes_data_and_other_files() {
        let (_temp, config) = site(&[
            ("_includes/partial.njk", "partial"),
            ("_data/site.json", "{}"),
            ("styles/main.scss", "body { color: red; }"),
            ("assets/app.js", "console.log(1)"),
            ("index.njk", "home"),
        ]);

        let result = SiteBuilder::new(config.clone()).build().await.unwrap();

        assert_eq!(result.pages, 1);
        assert!(!config.dir.output.join("_includes").exists());
        assert!(!config.dir.output.join("styles").exists());
        assert!(!config.dir.output.join("assets/app.js").exists());
    }

    #[tokio::test]
    async fn respects_enabled_formats() {
        let (_temp, mut config) = site(&[("index.njk", "home"), ("notes.md", "# Notes")]);
        config.templates.formats = vec!["njk".to_string()];

        let result = SiteBuilder::new(config.clone()).build().await.unwrap();

        assert_eq!(result.pages, 1);
        assert!(!config.dir.output.join("notes").exists());
    }

    #[tokio::test]
    async fn prerenders_custom_elements() {
        let (_temp, config) = site(&[(
            "buttons.html",
            r#"<example-button variant="primary">Save</example-button>"#,
        )]);

        let result = SiteBuilder::new(config.clone()).build().await.unwrap();

        assert_eq!(result.elements, 1);
        assert_eq!(
            read(&config, "buttons/index.html"),
            r#"<example-button variant="primary"><button type="button" class="btn btn-primary">Save</button></example-button>"#
        );
    }

    #[tokio::test]
    async fn prerendering_can_be_disabled() {
        let (_temp, mut config) = site(&[("index.html", "<example-button>Save</example-button>")]);
        config.elements.prerender = false;

        let result = SiteBuilder::new(config.clone()).build().await.unwrap();

        assert_eq!(result.elements, 0);
        assert_eq!(read(&config, "index.html"), "<example-button>Save</example-button>");
    }

    #[tokio::test]
    async fn markdown_runs_through_template_engine() {
        let (_temp, config) = site(&[(
            "guide.md",
            "---\ntitle: Guide\n---\n# {{ title }}\n\n<example-button>Go</example-button>\n",
        )]);

        SiteBuilder::new(config.clone()).build().await.unwrap();

        let html = read(&config, "guide/index.html");
        assert!(html.contains("<h1>Guide</h1>"));
        assert!(html.contains(r#"<button type="button" class="btn btn-custom">Go</button>"#));
    }

    #[tokio::test]
    async fn html_engine_none_keeps_body_verbatim() {
        let (_temp, mut config) = site(&[("index.html", "<p>{{ not_a_variable }}</p>")]);
        config.templates.html_engine = TemplateEngineKind::None;

        SiteBuilder::new(config.clone()).build().await.unwrap();

        assert_eq!(read(&config, "index.html"), "<p>{{ not_a_variable }}</p>");
    }

    #[tokio::test]
    async fn exposes_collections_and_page_data() {
        let (_temp, config) = site(&[
            ("a.njk", "---\ntitle: Alpha\ntags: components\n---\na"),
            ("b.njk", "---\ntitle: Beta\ntags: [components]\n---\nb"),
            (
                "index.njk",
                "{% for item in collections.components %}<a href=\"{{ item.url | url }}\">{{ item.title }}</a>{% endfor %}|{{ collections.all | length }}|{{ page.file_slug }}",
            ),
        ]);

        SiteBuilder::new(config.clone()).build().await.unwrap();

        assert_eq!(
            read(&config, "index.html"),
            r#"<a href="/a/">Alpha</a><a href="/b/">Beta</a>|3|"#
        );
    }

    #[tokio::test]
    async fn all_collection_is_ordered_by_input_path() {
        let (_temp, config) = site(&[
            ("guides/index.md", "---\ntitle: Guides\n---\nx"),
            ("guides.njk", "---\ntitle: Guide list\n---\nx"),
            ("about.html", "---\ntitle: About\n---\nx"),
            (
                "list.njk",
                "---\ntitle: List\npermalink: list.txt\n---\n{% for item in collections.all %}{{ item.title }};{% endfor %}",
            ),
        ]);

        SiteBuilder::new(config.clone()).build().await.unwrap();

        assert_eq!(read(&config, "list.txt"), "About;Guide list;Guides;List;");
    }

    #[tokio::test]
    async fn output_inside_input_is_not_reread() {
        let temp = tempdir().unwrap();
        fs::create_dir_all(temp.path().join("site")).unwrap();
        fs::write(temp.path().join("index.html"), "home").unwrap();

        // The same directory spelled differently from the output path
        let mut config = SiteConfig::default();
        config.dir.input = temp.path().join("site").join("..");
        config.dir.output = temp.path().join("dist");
        let builder = SiteBuilder::new(config.clone());

        let first = builder.build().await.unwrap();
        let second = builder.build().await.unwrap();

        assert_eq!(first.pages, 1);
        assert_eq!(second.pages, 1);
        assert!(!temp.path().join("dist/dist").exists());
    }

    #[tokio::test]
    async fn applies_path_prefix_in_url_filter() {
        let (_temp, mut config) = site(&[("index.njk", r#"<a href="{{ '/buttons/' | url }}">b</a>"#)]);
        config.site.path_prefix = "/mockups".to_string();

        SiteBuilder::new(config.clone()).build().await.unwrap();

        assert_eq!(read(&config, "index.html"), r#"<a href="/mockups/buttons/">b</a>"#);
    }

    #[tokio::test]
    async fn inlines_embeds_when_origin_is_http() {
        let page = r#"<object class="component-embed" data="/fragments/card.html">fallback</object>"#;
        let (_temp, mut config) = site(&[("index.html", page)]);
        config.embed.origin = Some("https://mockups.example".to_string());

        let builder = SiteBuilder::new(config.clone()).with_fragment_source(Arc::new(StaticSource(
            FetchOutcome::Fetched("<p>Card</p>".to_string()),
        )));
        let result = builder.build().await.unwrap();

        assert_eq!(result.embeds_inlined, 1);
        assert_eq!(
            read(&config, "index.html"),
            r#"<div class="inlined-component"><p>Card</p></div>"#
        );
    }

    #[tokio::test]
    async fn failed_embeds_keep_placeholder() {
        let page = r#"<object class="component-embed" data="/fragments/card.html">fallback</object>"#;
        let (_temp, mut config) = site(&[("index.html", page)]);
        config.embed.origin = Some("https://mockups.example".to_string());

        let builder = SiteBuilder::new(config.clone())
            .with_fragment_source(Arc::new(StaticSource(FetchOutcome::Rejected(404))));
        let result = builder.build().await.unwrap();

        assert_eq!(result.embeds_failed, 1);
        assert_eq!(read(&config, "index.html"), page);
    }

    #[tokio::test]
    async fn embeds_untouched_without_origin() {
        let page = r#"<object class="component-embed" data="/fragments/card.html"></object>"#;
        let (_temp, config) = site(&[("index.html", page)]);

        let builder = SiteBuilder::new(config.clone()).with_fragment_source(Arc::new(StaticSource(
            FetchOutcome::Fetched("never".to_string()),
        )));
        let result = builder.build().await.unwrap();

        assert_eq!(result.embeds_inlined, 0);
        assert_eq!(read(&config, "index.html"), page);
    }

    #[tokio::test]
    async fn emits_loader_runtime() {
        let (_temp, config) = site(&[("index.html", "home")]);

        SiteBuilder::new(config.clone()).build().await.unwrap();

        let js = read(&config, "assets/js/component-loader.js");
        assert!(js.contains("component-embed"));
    }

    #[tokio::test]
    async fn injects_live_reload_script() {
        let (_temp, config) = site(&[("index.html", "<html><body><p>x</p></body></html>")]);

        SiteBuilder::new(config.clone())
            .with_live_reload("/__reload.js")
            .build()
            .await
            .unwrap();

        assert_eq!(
            read(&config, "index.html"),
            r#"<html><body><p>x</p><script src="/__reload.js"></script></body></html>"#
        );
    }

    #[tokio::test]
    async fn errors_on_missing_input() {
        let temp = tempdir().unwrap();
        let mut config = SiteConfig::default();
        config.dir.input = temp.path().join("missing");
        config.dir.output = temp.path().join("dist");

        let result = SiteBuilder::new(config).build().await;

        assert!(matches!(result, Err(BuildError::ReadError(_))));
    }

    #[tokio::test]
    async fn errors_on_missing_layout() {
        let (_temp, config) = site(&[("index.njk", "---\nlayout: nope.njk\n---\nx")]);

        let result = SiteBuilder::new(config).build().await;

        assert!(matches!(result, Err(BuildError::TemplateError { .. })));
    }

    #[test]
    fn computes_urls() {
        assert_eq!(url_for(Path::new("index.html")), "/");
        assert_eq!(url_for(Path::new("buttons/index.html")), "/buttons/");
        assert_eq!(url_for(Path::new("feed.xml")), "/feed.xml");
    }

    #[test]
    fn computes_file_slugs() {
        assert_eq!(file_slug(Path::new("buttons.njk")), "buttons");
        assert_eq!(file_slug(Path::new("guides/index.md")), "guides");
        assert_eq!(file_slug(Path::new("index.njk")), "");
    }

    #[test]
    fn normalizes_equivalent_spellings() {
        let cwd = std::env::current_dir().unwrap();

        assert_eq!(normalize(Path::new(".")), normalize(&cwd));
        assert_eq!(
            normalize(Path::new("./not-created-yet")),
            normalize(&cwd.join("not-created-yet"))
        );
    }

    #[test]
    fn permalinks_cannot_escape_output() {
        assert_eq!(
            normal_components(Path::new("../../etc/x/")),
            PathBuf::from("etc/x")
        );
    }
}

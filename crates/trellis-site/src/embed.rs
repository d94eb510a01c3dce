//! Placeholder embed inlining.
//!
//! Pages can reference HTML fragments with placeholder elements such as
//! `<object class="component-embed" data="/components/card.html"></object>`. When
//! the site is served over http(s), each placeholder's fragment is fetched once and
//! the placeholder is replaced by `<div class="inlined-component">` holding the
//! fetched markup. A failed fetch leaves the placeholder untouched, so the browser
//! still renders it through its native embedding.

use std::sync::Arc;

use async_trait::async_trait;
use futures::future::join_all;
use trellis_elements::find_elements;
use url::Url;

/// Class that marks an `<object>` as an inlinable placeholder.
pub const PLACEHOLDER_CLASS: &str = "component-embed";

/// Class of the container that replaces an inlined placeholder.
pub const INLINED_CLASS: &str = "inlined-component";

/// Outcome of fetching one fragment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    /// The fragment's markup
    Fetched(String),
    /// The request never produced a response
    TransportFailed(String),
    /// The server answered with a non-success status
    Rejected(u16),
}

/// Source of HTML fragments.
///
/// Each call is a single attempt. Retries or cancellation belong in a wrapping
/// implementation.
#[async_trait]
pub trait FragmentSource: Send + Sync {
    async fn fetch(&self, url: &Url) -> FetchOutcome;
}

/// Fetches fragments over HTTP.
#[derive(Debug, Clone, Default)]
pub struct HttpFragmentSource {
    client: reqwest::Client,
}

impl HttpFragmentSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a preconfigured client (timeouts, proxies, headers).
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl FragmentSource for HttpFragmentSource {
    async fn fetch(&self, url: &Url) -> FetchOutcome {
        let response = match self.client.get(url.clone()).send().await {
            Ok(response) => response,
            Err(e) => return FetchOutcome::TransportFailed(e.to_string()),
        };

        let status = response.status();
        if !status.is_success() {
            return FetchOutcome::Rejected(status.as_u16());
        }

        match response.text().await {
            Ok(text) => FetchOutcome::Fetched(text),
            Err(e) => FetchOutcome::TransportFailed(e.to_string()),
        }
    }
}

/// A placeholder found in a page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placeholder {
    /// Byte offset of the opening `<object`
    pub start: usize,
    /// Byte offset just past `</object>`
    pub end: usize,
    /// The `data` attribute as written
    pub src: String,
}

/// Find inlinable placeholders: `<object>` elements with the placeholder class and
/// a non-empty `data` attribute.
pub fn find_placeholders(html: &str) -> Vec<Placeholder> {
    find_elements(html, "object")
        .into_iter()
        .filter(|m| {
            m.attributes
                .get("class")
                .is_some_and(|c| c.split_whitespace().any(|c| c == PLACEHOLDER_CLASS))
        })
        .filter_map(|m| {
            let src = m.attributes.non_empty("data")?.to_string();
            Some(Placeholder {
                start: m.start,
                end: m.end,
                src,
            })
        })
        .collect()
}

/// Result of inlining one page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InlineReport {
    /// The rewritten page
    pub html: String,
    /// Placeholders replaced
    pub inlined: usize,
    /// Placeholders left in place after a failed fetch
    pub failed: usize,
}

/// Replaces placeholders with fetched fragments.
pub struct EmbedInliner {
    origin: Url,
    source: Arc<dyn FragmentSource>,
}

impl EmbedInliner {
    /// Create an inliner for a site served from `origin`.
    ///
    /// Returns `None` unless the origin uses an http(s) scheme; other origins
    /// (such as `file:`) cannot fetch, so placeholders are kept as they are.
    pub fn new(origin: Url, source: Arc<dyn FragmentSource>) -> Option<Self> {
        if !should_inline(&origin) {
            tracing::debug!("Origin {} is not http(s); embeds stay as placeholders", origin);
            return None;
        }

        Some(Self { origin, source })
    }

    /// Inline every placeholder on the page at `page_path` (e.g. "/buttons/").
    ///
    /// All fetches for the page run concurrently.
    pub async fn inline(&self, html: &str, page_path: &str) -> InlineReport {
        let placeholders = find_placeholders(html);
        if placeholders.is_empty() {
            return InlineReport {
                html: html.to_string(),
                inlined: 0,
                failed: 0,
            };
        }

        let fetches = placeholders.iter().map(|p| self.fetch_placeholder(p, page_path));
        let outcomes = join_all(fetches).await;

        let mut out = String::with_capacity(html.len());
        let mut copied = 0;
        let mut inlined = 0;
        let mut failed = 0;

        for (placeholder, outcome) in placeholders.iter().zip(outcomes) {
            match outcome {
                FetchOutcome::Fetched(markup) => {
                    out.push_str(&html[copied..placeholder.start]);
                    out.push_str(&format!(r#"<div class="{}">{}</div>"#, INLINED_CLASS, markup));
                    copied = placeholder.end;
                    inlined += 1;
                }
                FetchOutcome::TransportFailed(reason) => {
                    tracing::warn!("Could not inline component {}: {}", placeholder.src, reason);
                    failed += 1;
                }
                FetchOutcome::Rejected(status) => {
                    tracing::warn!(
                        "Could not inline component {}: server responded {}",
                        placeholder.src,
                        status
                    );
                    failed += 1;
                }
            }
        }
        out.push_str(&html[copied..]);

        InlineReport {
            html: out,
            inlined,
            failed,
        }
    }

    async fn fetch_placeholder(&self, placeholder: &Placeholder, page_path: &str) -> FetchOutcome {
        let url = match self.resolve(&placeholder.src, page_path) {
            Ok(url) => url,
            Err(e) => return FetchOutcome::TransportFailed(format!("invalid URL: {}", e)),
        };

        tracing::debug!("Fetching embed {}", url);
        self.source.fetch(&url).await
    }

    /// Resolve a placeholder reference relative to the page it appears on.
    pub fn resolve(&self, src: &str, page_path: &str) -> Result<Url, url::ParseError> {
        self.origin.join(page_path)?.join(src)
    }
}

/// Whether embeds can be fetched from `origin`.
pub fn should_inline(origin: &Url) -> bool {
    origin.scheme().starts_with("http")
}

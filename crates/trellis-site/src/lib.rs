//! Static site builder for trellis design-system mockups.
//!
//! Renders page templates from an input directory into static HTML, prerenders
//! custom elements, and inlines placeholder embeds fetched over the network.

pub mod assets;
pub mod builder;
pub mod config;
pub mod data;
pub mod embed;
pub mod templates;

pub use builder::{BuildError, BuildResult, SiteBuilder};
pub use config::{ConfigError, SiteConfig, TemplateEngineKind};
pub use embed::{EmbedInliner, FetchOutcome, FragmentSource, HttpFragmentSource, InlineReport};

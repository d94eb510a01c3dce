//! Static site build command.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use trellis_site::{SiteBuilder, SiteConfig};

/// Apply command-line overrides on top of the loaded configuration.
fn apply_overrides(
    mut config: SiteConfig,
    output: Option<PathBuf>,
    path_prefix: Option<String>,
) -> SiteConfig {
    if let Some(output) = output {
        config.dir.output = output;
    }
    if let Some(prefix) = path_prefix {
        config.site.path_prefix = prefix;
    }
    config
}

/// Run the build command.
pub async fn run(
    config_path: &Path,
    output: Option<PathBuf>,
    path_prefix: Option<String>,
) -> Result<()> {
    tracing::info!("Building site...");

    let config = SiteConfig::load(config_path)
        .with_context(|| format!("Failed to load {}", config_path.display()))?;
    let config = apply_overrides(config, output, path_prefix);

    let result = SiteBuilder::new(config).build().await?;

    tracing::info!(
        "Built {} pages with {} elements in {}ms",
        result.pages,
        result.elements,
        result.duration_ms
    );

    if result.embeds_inlined > 0 || result.embeds_failed > 0 {
        tracing::info!(
            "Inlined {} embeds ({} left as placeholders)",
            result.embeds_inlined,
            result.embeds_failed
        );
    }

    tracing::info!("Output: {}", result.output_dir.display());

    Ok(())
}

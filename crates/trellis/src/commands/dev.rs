//! Development server command.

use std::path::Path;

use anyhow::{Context, Result};
use trellis_server::{DevServer, DevServerConfig};
use trellis_site::SiteConfig;

/// Run the dev server.
pub async fn run(config_path: &Path, port: u16, open: bool) -> Result<()> {
    tracing::info!("Starting development server on port {}", port);

    let site = SiteConfig::load(config_path)
        .with_context(|| format!("Failed to load {}", config_path.display()))?;

    let config = DevServerConfig {
        site,
        port,
        open,
        ..Default::default()
    };

    DevServer::new(config).start().await?;

    Ok(())
}

//! Scaffold a browser-side custom element.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use trellis_elements::component_script;

/// Write `<dir>/<tag>.js`, returning its path.
pub fn run(tag: &str, dir: &Path, force: bool) -> Result<PathBuf> {
    let script = component_script(tag)?;
    let path = dir.join(format!("{}.js", tag));

    if path.exists() && !force {
        anyhow::bail!(
            "{} already exists. Use --force to overwrite.",
            path.display()
        );
    }

    fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create {}", dir.display()))?;
    fs::write(&path, script).with_context(|| format!("Failed to write {}", path.display()))?;

    tracing::info!("Created {}", path.display());

    Ok(path)
}

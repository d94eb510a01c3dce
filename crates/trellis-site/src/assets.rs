//! Generated browser assets.

use std::fs;
use std::path::{Path, PathBuf};

/// Location of the loader runtime, relative to the output directory.
pub const LOADER_PATH: &str = "assets/js/component-loader.js";

/// Asset pipeline utilities.
pub struct AssetPipeline;

impl AssetPipeline {
    /// The browser-side embed loader.
    ///
    /// Performs the same placeholder inlining as the build, at page load, for
    /// pages that were built without an embed origin.
    pub fn loader_js() -> &'static str {
        LOADER_JS
    }

    /// Write the loader runtime under `output_dir`, returning its path.
    pub fn write_loader(output_dir: &Path) -> std::io::Result<PathBuf> {
        let path = output_dir.join(LOADER_PATH);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, LOADER_JS)?;
        Ok(path)
    }
}

const LOADER_JS: &str = r#"// Inline <object class="component-embed"> placeholders when served over http(s).
// Under file:// the browser blocks fetch, so the <object> renders the fragment itself.
(function () {
  'use strict';

  if (!location.protocol.startsWith('http')) return;

  document.querySelectorAll('object.component-embed').forEach(async (placeholder) => {
    const src = placeholder.getAttribute('data');
    if (!src) return;

    try {
      const response = await fetch(src);
      if (!response.ok) {
        console.warn('Could not inline component', src, response.status);
        return;
      }
      const wrapper = document.createElement('div');
      wrapper.className = 'inlined-component';
      wrapper.innerHTML = await response.text();
      placeholder.replaceWith(wrapper);
    } catch (err) {
      console.warn('Could not inline component', src, err);
    }
  });
})();
"#;

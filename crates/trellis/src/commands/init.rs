//! Initialize a starter site in a project.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

/// Files written by `init`, relative to the project root.
const STARTER_FILES: &[(&str, &str)] = &[
    ("trellis.toml", DEFAULT_CONFIG),
    ("src/_includes/base.njk", DEFAULT_LAYOUT),
    ("src/_data/site.json", DEFAULT_SITE_DATA),
    ("src/index.njk", DEFAULT_INDEX),
    ("src/components.njk", DEFAULT_COMPONENTS),
    ("src/fragments/card.html", DEFAULT_CARD_FRAGMENT),
    ("src/styles/main.css", DEFAULT_STYLES),
];

/// Run the init command.
pub async fn run(yes: bool) -> Result<()> {
    tracing::info!("Initializing trellis...");

    let written = write_starter(Path::new("."), yes)?;

    if written.is_empty() {
        tracing::warn!("All starter files already exist. Use --yes to overwrite.");
        return Ok(());
    }

    tracing::info!("Initialization complete!");
    tracing::info!("Run 'trellis dev' to start the development server.");

    Ok(())
}

/// Write the starter files under `root`, skipping existing ones unless `overwrite`.
fn write_starter(root: &Path, overwrite: bool) -> Result<Vec<PathBuf>> {
    let mut written = Vec::new();

    for (relative, contents) in STARTER_FILES {
        let path = root.join(relative);

        if path.exists() && !overwrite {
            tracing::debug!("Skipping existing {}", relative);
            continue;
        }

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        fs::write(&path, contents).with_context(|| format!("Failed to write {}", relative))?;

        tracing::info!("Created {}", relative);
        written.push(path);
    }

    Ok(written)
}

const DEFAULT_CONFIG: &str = r#"# trellis configuration

[dir]
# Page templates
input = "src"
# Built site
output = "dist"
# Layouts and partials (inside input)
includes = "_includes"
# Global data files (inside input)
data = "_data"

[templates]
formats = ["html", "md", "njk"]
html_engine = "njk"
markdown_engine = "njk"

[site]
# Set when deploying under a sub-path, e.g. "/mockups/"
path_prefix = "/"
# Extra paths that trigger a rebuild in `trellis dev`
watch_targets = ["src/styles/"]

[elements]
# Render custom elements into the built HTML
prerender = true

[embed]
# Set to the deployed http(s) origin to inline embeds at build time
# origin = "https://example.org"
emit_loader = true
"#;

const DEFAULT_LAYOUT: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <meta name="viewport" content="width=device-width, initial-scale=1">
  <title>{{ title }} | {{ site.name }}</title>
  <link rel="stylesheet" href="https://cdn.jsdelivr.net/npm/bootstrap@5.3.3/dist/css/bootstrap.min.css">
</head>
<body>
  <navbar-component brand-text="{{ site.name }}">
    {% for item in collections.all %}
    <a class="nav-link" href="{{ item.url | url }}">{{ item.title }}</a>
    {% endfor %}
  </navbar-component>

  <main class="container py-4">
    {{ content }}
  </main>

  <script src="{{ '/assets/js/component-loader.js' | url }}"></script>
</body>
</html>
"#;

const DEFAULT_SITE_DATA: &str = r#"{
  "name": "Design System Mockups"
}
"#;

const DEFAULT_INDEX: &str = r#"---
title: Home
layout: base.njk
---
<h1>{{ site.name }}</h1>

<p>Mockups for the design system. Each page is a plain template; custom
elements such as <code>example-button</code> are rendered at build time.</p>

<p><a href="{{ '/components/' | url }}">Browse the components</a></p>
"#;

const DEFAULT_COMPONENTS: &str = r#"---
title: Components
layout: base.njk
tags: components
---
<h1>{{ title }}</h1>

<h2>Buttons</h2>
<example-button variant="primary">Save</example-button>
<example-button variant="secondary" size="sm">Cancel</example-button>
<example-button variant="danger" disabled>Delete</example-button>

<h2>Template element</h2>
<component-name example-attr="Heading">Body text</component-name>

<h2>Embedded fragment</h2>
<object class="component-embed" type="text/html" data="{{ '/fragments/card/' | url }}"></object>
"#;

const DEFAULT_CARD_FRAGMENT: &str = r#"<div class="card" style="width: 18rem;">
  <div class="card-body">
    <h5 class="card-title">Card</h5>
    <p class="card-text">Embedded from /fragments/card/.</p>
  </div>
</div>
"#;

const DEFAULT_STYLES: &str = r#"main h2 {
  margin-top: 2rem;
}
"#;

//! Global data files.
//!
//! Every `.json`, `.yaml` and `.yml` file in the data directory becomes a template
//! variable named after its file stem. Files in subdirectories nest under the
//! directory name (`_data/nav/main.json` is `nav.main`).

use std::fs;
use std::path::Path;

use serde_json::{Map, Value};
use walkdir::WalkDir;

use crate::builder::BuildError;

/// Load all global data files under `dir`.
///
/// A missing directory yields no data.
pub fn load_global_data(dir: &Path) -> Result<Map<String, Value>, BuildError> {
    let mut data = Map::new();

    if !dir.exists() {
        return Ok(data);
    }

    let mut entries: Vec<_> = WalkDir::new(dir)
        .follow_links(true)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .collect();
    entries.sort_by(|a, b| a.path().cmp(b.path()));

    for entry in entries {
        let path = entry.path();
        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");

        let value = match ext {
            "json" => {
                let content = read(path)?;
                serde_json::from_str::<Value>(&content).map_err(|e| BuildError::DataError {
                    path: path.display().to_string(),
                    message: e.to_string(),
                })?
            }
            "yaml" | "yml" => {
                let content = read(path)?;
                serde_yaml::from_str::<Value>(&content).map_err(|e| BuildError::DataError {
                    path: path.display().to_string(),
                    message: e.to_string(),
                })?
            }
            _ => {
                tracing::debug!("Skipping non-data file {}", path.display());
                continue;
            }
        };

        let relative = path.strip_prefix(dir).unwrap_or(path);
        let mut keys: Vec<String> = relative
            .parent()
            .into_iter()
            .flat_map(|p| p.components())
            .map(|c| c.as_os_str().to_string_lossy().to_string())
            .collect();
        let stem = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("data")
            .to_string();
        keys.push(stem);

        insert_nested(&mut data, &keys, value);
        tracing::debug!("Loaded data file {}", path.display());
    }

    Ok(data)
}

fn read(path: &Path) -> Result<String, BuildError> {
    fs::read_to_string(path).map_err(|e| BuildError::ReadError(format!("{}: {}", path.display(), e)))
}

/// Insert `value` at the nested key path, creating objects as needed.
fn insert_nested(data: &mut Map<String, Value>, keys: &[String], value: Value) {
    let Some((last, parents)) = keys.split_last() else {
        return;
    };

    let mut current = data;
    for key in parents {
        let entry = current
            .entry(key.clone())
            .or_insert_with(|| Value::Object(Map::new()));
        if !entry.is_object() {
            *entry = Value::Object(Map::new());
        }
        let Value::Object(map) = entry else {
            return;
        };
        current = map;
    }

    current.insert(last.clone(), value);
}

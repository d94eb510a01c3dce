//! File watching for rebuilds.

use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::time::{Duration, Instant};

use notify::{RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc as async_mpsc;

/// Events emitted by the file watcher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WatchEvent {
    /// A page template, layout or partial changed
    TemplateModified(PathBuf),

    /// A global data file changed
    DataModified(PathBuf),

    /// Any other watched file changed (stylesheets, scripts, images)
    AssetModified(PathBuf),

    /// File was created
    Created(PathBuf),

    /// File was deleted
    Deleted(PathBuf),
}

impl WatchEvent {
    pub fn path(&self) -> &Path {
        match self {
            WatchEvent::TemplateModified(p)
            | WatchEvent::DataModified(p)
            | WatchEvent::AssetModified(p)
            | WatchEvent::Created(p)
            | WatchEvent::Deleted(p) => p,
        }
    }
}

/// File watcher for detecting changes.
pub struct FileWatcher {
    _watcher: RecommendedWatcher,
}

impl FileWatcher {
    /// Watch `paths` recursively, ignoring anything under `ignore`.
    ///
    /// Paths that do not exist are skipped. Returns the watcher and a channel
    /// to receive events; events stop when the watcher is dropped.
    pub fn new(
        paths: &[PathBuf],
        ignore: &[PathBuf],
    ) -> Result<(Self, async_mpsc::Receiver<WatchEvent>), std::io::Error> {
        let (sync_tx, sync_rx) = mpsc::channel();
        let (async_tx, async_rx) = async_mpsc::channel(100);

        let mut watcher = notify::recommended_watcher(move |res: Result<notify::Event, _>| {
            if let Ok(event) = res {
                let _ = sync_tx.send(event);
            }
        })
        .map_err(std::io::Error::other)?;

        for path in paths {
            if path.exists() {
                watcher
                    .watch(path, RecursiveMode::Recursive)
                    .map_err(std::io::Error::other)?;
                tracing::debug!("Watching {}", path.display());
            } else {
                tracing::debug!("Not watching {} (does not exist)", path.display());
            }
        }

        let ignore: Vec<PathBuf> = ignore.iter().map(|p| absolute(p)).collect();

        std::thread::spawn(move || {
            let mut last_event_time: Option<Instant> = None;
            let debounce_duration = Duration::from_millis(100);

            while let Ok(event) = sync_rx.recv() {
                let paths: Vec<PathBuf> = event
                    .paths
                    .into_iter()
                    .filter(|p| !ignore.iter().any(|dir| absolute(p).starts_with(dir)))
                    .collect();
                if paths.is_empty() {
                    continue;
                }

                // Editors write several events per save
                let now = Instant::now();
                if last_event_time.is_some_and(|last| now.duration_since(last) < debounce_duration) {
                    continue;
                }
                last_event_time = Some(now);

                for path in paths {
                    if let Some(e) = classify_event(&path, &event.kind) {
                        if async_tx.blocking_send(e).is_err() {
                            return;
                        }
                    }
                }
            }
        });

        Ok((Self { _watcher: watcher }, async_rx))
    }
}

fn absolute(path: &Path) -> PathBuf {
    std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf())
}

/// Classify a notify event into a WatchEvent.
fn classify_event(path: &Path, kind: &notify::EventKind) -> Option<WatchEvent> {
    use notify::EventKind;

    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");

    match kind {
        EventKind::Create(_) => Some(WatchEvent::Created(path.to_path_buf())),
        EventKind::Remove(_) => Some(WatchEvent::Deleted(path.to_path_buf())),
        EventKind::Modify(_) => match ext {
            "html" | "md" | "njk" => Some(WatchEvent::TemplateModified(path.to_path_buf())),
            "json" | "yaml" | "yml" => Some(WatchEvent::DataModified(path.to_path_buf())),
            _ => Some(WatchEvent::AssetModified(path.to_path_buf())),
        },
        _ => None,
    }
}

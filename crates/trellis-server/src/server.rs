//! Development server implementation.

use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::{IntoResponse, Redirect},
    routing::get,
    Router,
};
use tokio::sync::{broadcast::error::RecvError, Mutex};
use tower_http::services::ServeDir;

use trellis_site::{BuildError, SiteBuilder, SiteConfig};

use crate::watcher::{FileWatcher, WatchEvent};
use crate::websocket::{
    reload_client_script, ReloadHub, ReloadMessage, RELOAD_PATH, RELOAD_SCRIPT_PATH,
};

/// Configuration for the development server.
#[derive(Debug, Clone)]
pub struct DevServerConfig {
    /// Site to build and serve
    pub site: SiteConfig,

    /// Port to listen on
    pub port: u16,

    /// Host to bind to
    pub host: String,

    /// Open browser on start
    pub open: bool,
}

impl Default for DevServerConfig {
    fn default() -> Self {
        Self {
            site: SiteConfig::default(),
            port: 8080,
            host: "127.0.0.1".to_string(),
            open: true,
        }
    }
}

/// Errors that can occur with the server.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("Invalid address {0}")]
    InvalidAddress(String),

    #[error("Failed to bind to {0}: {1}")]
    BindError(SocketAddr, String),

    #[error("File watch error: {0}")]
    WatchError(String),

    #[error(transparent)]
    Build(#[from] BuildError),
}

/// Shared server state.
struct ServerState {
    builder: SiteBuilder,
    reload: ReloadHub,
    /// Serializes rebuilds
    building: Mutex<()>,
}

/// Development server.
pub struct DevServer {
    config: DevServerConfig,
}

impl DevServer {
    /// Create a new development server.
    pub fn new(config: DevServerConfig) -> Self {
        Self { config }
    }

    /// Build the site, then serve it and rebuild on every change.
    pub async fn start(self) -> Result<(), ServerError> {
        let addr: SocketAddr = format!("{}:{}", self.config.host, self.config.port)
            .parse()
            .map_err(|_| {
                ServerError::InvalidAddress(format!("{}:{}", self.config.host, self.config.port))
            })?;

        let site = dev_site_config(&self.config.site);
        let output_dir = site.dir.output.clone();
        let prefix = site.path_prefix();
        let mut watch_paths = vec![site.dir.input.clone()];
        watch_paths.extend(site.site.watch_targets.iter().cloned());

        let state = Arc::new(ServerState {
            builder: SiteBuilder::new(site).with_live_reload(RELOAD_SCRIPT_PATH),
            reload: ReloadHub::new(),
            building: Mutex::new(()),
        });

        // The first build must succeed; later failures keep the last good output
        let result = state.builder.build().await?;
        tracing::info!(
            "Built {} pages with {} elements in {}ms",
            result.pages,
            result.elements,
            result.duration_ms
        );

        let (watcher, mut rx) = FileWatcher::new(&watch_paths, &[output_dir.clone()])
            .map_err(|e| ServerError::WatchError(e.to_string()))?;

        let state_clone = Arc::clone(&state);
        tokio::spawn(async move {
            while let Some(event) = rx.recv().await {
                handle_watch_event(&state_clone, event).await;

                // Fold events that arrived during the rebuild into one more pass
                let mut pending = false;
                while rx.try_recv().is_ok() {
                    pending = true;
                }
                if pending {
                    rebuild(&state_clone).await;
                }
            }
            // Keep watcher alive
            drop(watcher);
        });

        let app = router(state, &output_dir, &prefix);

        tracing::info!("Starting dev server at http://{}{}", addr, prefix);

        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .map_err(|e| ServerError::BindError(addr, e.to_string()))?;

        if self.config.open {
            let url = format!("http://{}{}", addr, prefix);
            if let Err(e) = open::that(&url) {
                tracing::debug!("Could not open browser: {}", e);
            }
        }

        axum::serve(listener, app)
            .await
            .map_err(|e| ServerError::BindError(addr, e.to_string()))?;

        Ok(())
    }
}

/// Routes for the dev server: live reload endpoints at the root, the built
/// site under the path prefix.
fn router(state: Arc<ServerState>, output_dir: &Path, prefix: &str) -> Router {
    let app = Router::new()
        .route(RELOAD_PATH, get(ws_handler))
        .route(RELOAD_SCRIPT_PATH, get(reload_script_handler));

    let site = ServeDir::new(output_dir);
    let mount = prefix.trim_end_matches('/');

    let app = if mount.is_empty() {
        app.fallback_service(site)
    } else {
        let target = prefix.to_string();
        app.route(
            "/",
            get(move || {
                let target = target.clone();
                async move { Redirect::temporary(&target) }
            }),
        )
        .nest_service(mount, site)
    };

    app.with_state(state)
}

/// The site configuration used in dev mode.
///
/// Build-time embed inlining is turned off so pages keep their placeholders and
/// the browser loader resolves them against the dev server.
fn dev_site_config(site: &SiteConfig) -> SiteConfig {
    let mut site = site.clone();
    site.embed.origin = None;
    site.embed.emit_loader = true;
    site
}

/// Handle file watch events.
async fn handle_watch_event(state: &ServerState, event: WatchEvent) {
    match &event {
        WatchEvent::TemplateModified(path) => tracing::info!("Template modified: {}", path.display()),
        WatchEvent::DataModified(path) => tracing::info!("Data modified: {}", path.display()),
        WatchEvent::AssetModified(path) => tracing::info!("Asset modified: {}", path.display()),
        WatchEvent::Created(path) => tracing::info!("Created: {}", path.display()),
        WatchEvent::Deleted(path) => tracing::info!("Deleted: {}", path.display()),
    }

    rebuild(state).await;
}

/// Rebuild the site and tell connected browsers about the result.
async fn rebuild(state: &ServerState) -> ReloadMessage {
    let _guard = state.building.lock().await;

    let msg = match state.builder.build().await {
        Ok(result) => {
            tracing::info!("Rebuilt {} pages in {}ms", result.pages, result.duration_ms);
            ReloadMessage::Reload
        }
        Err(e) => {
            tracing::error!("Rebuild failed: {}", e);
            ReloadMessage::BuildFailed {
                message: e.to_string(),
            }
        }
    };

    state.reload.send(msg.clone());
    msg
}

/// Handler for the live reload WebSocket endpoint.
async fn ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<ServerState>>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_ws(socket, state))
}

/// Forward reload messages to one browser.
async fn handle_ws(mut socket: WebSocket, state: Arc<ServerState>) {
    let mut rx = state.reload.subscribe();

    if send_json(&mut socket, &ReloadMessage::Connected).await.is_err() {
        return;
    }

    loop {
        match rx.recv().await {
            Ok(msg) => {
                if send_json(&mut socket, &msg).await.is_err() {
                    break;
                }
            }
            Err(RecvError::Lagged(_)) => continue,
            Err(RecvError::Closed) => break,
        }
    }
}

async fn send_json(socket: &mut WebSocket, msg: &ReloadMessage) -> Result<(), ()> {
    let json = serde_json::to_string(msg).map_err(|_| ())?;
    socket.send(Message::Text(json.into())).await.map_err(|_| ())
}

/// Handler for the live reload client script.
async fn reload_script_handler() -> impl IntoResponse {
    (
        [("content-type", "application/javascript")],
        reload_client_script(),
    )
}

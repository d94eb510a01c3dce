//! WebSocket live reload.

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

/// Path of the live reload WebSocket endpoint.
pub const RELOAD_PATH: &str = "/__reload";

/// Path the client script is served from.
pub const RELOAD_SCRIPT_PATH: &str = "/__reload.js";

/// Messages sent to connected browsers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ReloadMessage {
    /// Connection established
    Connected,

    /// The site was rebuilt; reload the page
    Reload,

    /// A rebuild failed; the previous output is still being served
    BuildFailed {
        /// Error as reported by the builder
        message: String,
    },
}

/// Broadcasts reload messages to every connected browser.
#[derive(Debug, Clone)]
pub struct ReloadHub {
    sender: broadcast::Sender<ReloadMessage>,
}

impl ReloadHub {
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(16);
        Self { sender }
    }

    /// Send a message to all connected clients.
    pub fn send(&self, msg: ReloadMessage) {
        // No receivers just means no browser is open
        let _ = self.sender.send(msg);
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ReloadMessage> {
        self.sender.subscribe()
    }

    /// Number of connected clients.
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for ReloadHub {
    fn default() -> Self {
        Self::new()
    }
}

/// Client-side live reload script.
///
/// The socket URL is derived from the page's own location, so the script works
/// on whatever host and port the server was bound to.
pub fn reload_client_script() -> String {
    format!(
        r#"(function () {{
  'use strict';

  const scheme = location.protocol === 'https:' ? 'wss:' : 'ws:';
  let attempts = 0;

  function connect() {{
    const ws = new WebSocket(scheme + '//' + location.host + '{path}');

    ws.onopen = function () {{
      attempts = 0;
    }};

    ws.onmessage = function (event) {{
      const msg = JSON.parse(event.data);
      switch (msg.type) {{
        case 'reload':
          location.reload();
          break;
        case 'build_failed':
          console.error('[trellis] Build failed:', msg.message);
          break;
        case 'connected':
          console.log('[trellis] Live reload connected');
          break;
      }}
    }};

    ws.onclose = function () {{
      if (attempts < 10) {{
        attempts++;
        setTimeout(connect, 1000 * attempts);
      }}
    }};
  }}

  connect();
}})();
"#,
        path = RELOAD_PATH
    )
}

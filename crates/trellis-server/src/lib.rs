//! Development server with live reload for trellis sites.
//!
//! Builds the site, serves the output directory, and rebuilds whenever the
//! input directory or an extra watch target changes. Connected browsers are
//! told to reload over a WebSocket.

pub mod server;
pub mod watcher;
pub mod websocket;

pub use server::{DevServer, DevServerConfig, ServerError};
pub use watcher::{FileWatcher, WatchEvent};
pub use websocket::{ReloadHub, ReloadMessage};

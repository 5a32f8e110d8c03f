//! Browser viewer for a live stream of log lines delivered over a WebSocket.

pub mod ansi;
pub mod app;
pub mod buffer;
pub mod components;
pub mod config;
pub mod connection;
pub mod error;
pub mod reconnect;
pub mod state;

pub use buffer::{LineBuffer, LogLine};
pub use config::ViewerConfig;
pub use error::{Result, ViewerError};
pub use reconnect::{ConnectionId, ConnectionState, ReconnectPolicy};
pub use state::{ViewerAction, ViewerState};

/// Mounts the viewer onto the document body.
pub fn run_app() {
    yew::Renderer::<app::App>::new().render();
}

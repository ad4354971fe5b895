//! WebSocket Voice Sessions
//!
//! Each connection drives its own voice runtime:
//!
//! - `protocol`: the JSON message format between browser and server.
//! - `session`: connection lifecycle and the event loop bridging socket and runtime.
//! - `synth`: local speech rendered by the browser.

pub mod protocol;
pub mod session;
pub mod synth;

pub use session::ws_handler;

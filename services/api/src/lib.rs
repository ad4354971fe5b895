//! Morbror API Library Crate
//!
//! The web service behind MorbrorAppen: the course catalog over REST and a
//! voice session per WebSocket connection. The binaries are thin wrappers
//! around this library.

pub mod catalog;
pub mod config;
pub mod handlers;
pub mod models;
pub mod router;
pub mod state;
pub mod ws;

//! Shared Application State
//!
//! This module defines the `AppState` struct, which holds the course catalog
//! and the speech services shared by every connection.

use crate::{catalog::Catalog, config::Config};
use morbror_core::speech::{CloudSynthesizer, VoiceProfiles};
use std::sync::Arc;

/// The shared application state, created once at startup and passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<Catalog>,
    pub cloud_speech: Arc<dyn CloudSynthesizer>,
    pub voice_profiles: Arc<VoiceProfiles>,
    pub config: Arc<Config>,
}

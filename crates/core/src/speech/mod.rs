//! Speech Output Resolver
//!
//! Decides how a piece of text becomes audio. With no credential configured
//! the local platform synthesizer is used directly. With a credential the
//! cloud provider gets one attempt; any provider failure falls back to the
//! local synthesizer, and only when both fail does `speak` return an error.

pub mod elevenlabs;
pub mod profile;
pub mod system;

pub use profile::{VoiceConfig, VoiceProfile, VoiceProfiles};

use async_trait::async_trait;
use secrecy::SecretString;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, warn};

/// Locale used by the local fallback synthesizer (Norwegian Bokmål).
pub const LOCALE: &str = "nb-NO";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SpeechError {
    #[error("the speech provider rejected the credential")]
    CredentialInvalid,
    #[error("speech provider unavailable: {0}")]
    ProviderUnavailable(String),
    #[error("no speech synthesizer is available on this platform")]
    SynthesisUnsupported,
    #[error("unknown voice profile '{0}'")]
    UnknownProfile(String),
    #[error("cannot speak empty text")]
    EmptyText,
}

impl SpeechError {
    /// Only a missing synthesizer cannot be recovered from by falling back.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, SpeechError::SynthesisUnsupported)
    }
}

/// A single thing to say. Consumed immediately by the resolver.
#[derive(Debug, Clone)]
pub struct SpeechRequest {
    pub text: String,
    pub profile: VoiceProfile,
    pub credential: Option<SecretString>,
}

/// How a request was rendered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpeechOutcome {
    /// Audio bytes from the cloud provider, ready for playback.
    Cloud(Vec<u8>),
    /// The local synthesizer accepted the text.
    Local,
}

/// A remote voice-synthesis provider.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CloudSynthesizer: Send + Sync {
    async fn synthesize(
        &self,
        text: &str,
        voice: &VoiceConfig,
        credential: &SecretString,
    ) -> Result<Vec<u8>, SpeechError>;
}

/// The platform's own text-to-speech. Submission only; it does not wait for
/// playback to finish.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LocalSynthesizer: Send + Sync {
    async fn speak(&self, text: &str, locale: &str) -> Result<(), SpeechError>;
}

/// Applies the cloud-then-local policy. Cheap to share behind an `Arc`;
/// all fields are read-only after construction.
pub struct SpeechResolver {
    cloud: Arc<dyn CloudSynthesizer>,
    local: Arc<dyn LocalSynthesizer>,
    profiles: Arc<VoiceProfiles>,
    credential: Option<SecretString>,
}

impl SpeechResolver {
    pub fn new(
        cloud: Arc<dyn CloudSynthesizer>,
        local: Arc<dyn LocalSynthesizer>,
        profiles: Arc<VoiceProfiles>,
    ) -> Self {
        Self {
            cloud,
            local,
            profiles,
            credential: None,
        }
    }

    pub fn with_credential(mut self, credential: Option<SecretString>) -> Self {
        self.credential = credential;
        self
    }

    pub fn has_credential(&self) -> bool {
        self.credential.is_some()
    }

    /// Builds a request carrying the configured credential.
    pub fn request(&self, text: impl Into<String>, profile: Option<VoiceProfile>) -> SpeechRequest {
        SpeechRequest {
            text: text.into(),
            profile: profile.unwrap_or_default(),
            credential: self.credential.clone(),
        }
    }

    /// Speaks `text` with `profile` (mascot when `None`).
    pub async fn speak(
        &self,
        text: &str,
        profile: Option<VoiceProfile>,
    ) -> Result<SpeechOutcome, SpeechError> {
        self.resolve(self.request(text, profile)).await
    }

    pub async fn resolve(&self, request: SpeechRequest) -> Result<SpeechOutcome, SpeechError> {
        if request.text.trim().is_empty() {
            return Err(SpeechError::EmptyText);
        }
        let voice = self.profiles.resolve(Some(&request.profile))?;

        let Some(credential) = request.credential.as_ref() else {
            debug!(profile = %request.profile, "No speech credential, using local synthesizer");
            self.local.speak(&request.text, LOCALE).await?;
            return Ok(SpeechOutcome::Local);
        };

        match self.cloud.synthesize(&request.text, voice, credential).await {
            Ok(audio) => {
                debug!(profile = %request.profile, bytes = audio.len(), "Cloud speech rendered");
                Ok(SpeechOutcome::Cloud(audio))
            }
            Err(cloud_err) => {
                warn!(error = %cloud_err, "Cloud speech failed, falling back to local synthesizer");
                self.local.speak(&request.text, LOCALE).await?;
                Ok(SpeechOutcome::Local)
            }
        }
    }
}

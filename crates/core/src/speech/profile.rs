use super::SpeechError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Name of the default voice.
pub const MASCOT: &str = "mascot";

const DEFAULT_MODEL_ID: &str = "eleven_multilingual_v2";

/// A named voice, e.g. `mascot`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VoiceProfile(String);

impl VoiceProfile {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn mascot() -> Self {
        Self(MASCOT.to_string())
    }

    pub fn name(&self) -> &str {
        &self.0
    }
}

impl Default for VoiceProfile {
    fn default() -> Self {
        Self::mascot()
    }
}

impl fmt::Display for VoiceProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Provider-specific configuration behind a profile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VoiceConfig {
    pub voice_id: String,
    pub model_id: String,
}

impl VoiceConfig {
    pub fn new(voice_id: impl Into<String>) -> Self {
        Self {
            voice_id: voice_id.into(),
            model_id: DEFAULT_MODEL_ID.to_string(),
        }
    }
}

/// The process-wide profile table. Built once at startup, read-only after.
#[derive(Debug, Clone)]
pub struct VoiceProfiles {
    profiles: HashMap<String, VoiceConfig>,
}

impl Default for VoiceProfiles {
    fn default() -> Self {
        Self::empty()
            .with_profile(MASCOT, VoiceConfig::new("21m00Tcm4TlvDq8ikWAM"))
            .with_profile("narrator", VoiceConfig::new("pNInz6obpgDQGcFmaJgB"))
    }
}

impl VoiceProfiles {
    pub fn empty() -> Self {
        Self {
            profiles: HashMap::new(),
        }
    }

    pub fn with_profile(mut self, name: impl Into<String>, config: VoiceConfig) -> Self {
        self.profiles.insert(name.into(), config);
        self
    }

    /// Looks up a profile, falling back to the mascot when none is given.
    pub fn resolve(&self, profile: Option<&VoiceProfile>) -> Result<&VoiceConfig, SpeechError> {
        let name = profile.map(VoiceProfile::name).unwrap_or(MASCOT);
        self.profiles
            .get(name)
            .ok_or_else(|| SpeechError::UnknownProfile(name.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_defaults_to_mascot() {
        let profiles = VoiceProfiles::default();
        let mascot = profiles.resolve(None).unwrap();
        assert_eq!(mascot.voice_id, "21m00Tcm4TlvDq8ikWAM");
        assert_eq!(mascot.model_id, "eleven_multilingual_v2");
    }

    #[test]
    fn test_resolve_unknown_profile() {
        let profiles = VoiceProfiles::default();
        let err = profiles
            .resolve(Some(&VoiceProfile::new("pirate")))
            .unwrap_err();
        assert!(matches!(err, SpeechError::UnknownProfile(name) if name == "pirate"));
    }

    #[test]
    fn test_profile_serializes_as_name() {
        let json = serde_json::to_string(&VoiceProfile::mascot()).unwrap();
        assert_eq!(json, "\"mascot\"");
    }
}

//! Local fallback synthesizer backed by the platform's speech tools.

use super::{LocalSynthesizer, SpeechError};
use async_trait::async_trait;
use std::process::Stdio;
use tokio::process::Command;
use tracing::debug;

/// A speech program and how to pass it a language.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Backend {
    pub program: &'static str,
    pub language_flag: &'static str,
}

const DEFAULT_BACKENDS: &[Backend] = &[
    Backend {
        program: "spd-say",
        language_flag: "-l",
    },
    Backend {
        program: "espeak-ng",
        language_flag: "-v",
    },
];

/// Speaks through `spd-say` or `espeak-ng`, whichever can be started.
#[derive(Debug, Clone)]
pub struct SystemSynthesizer {
    backends: &'static [Backend],
}

impl Default for SystemSynthesizer {
    fn default() -> Self {
        Self::new()
    }
}

impl SystemSynthesizer {
    pub fn new() -> Self {
        Self::with_backends(DEFAULT_BACKENDS)
    }

    /// Tries `backends` in order instead of the platform defaults.
    pub fn with_backends(backends: &'static [Backend]) -> Self {
        Self { backends }
    }
}

/// `nb-NO` -> `nb`; the speech tools take the bare language code.
fn language_code(locale: &str) -> &str {
    locale.split(['-', '_']).next().unwrap_or(locale)
}

#[async_trait]
impl LocalSynthesizer for SystemSynthesizer {
    async fn speak(&self, text: &str, locale: &str) -> Result<(), SpeechError> {
        let language = language_code(locale);
        for backend in self.backends {
            let spawned = Command::new(backend.program)
                .arg(backend.language_flag)
                .arg(language)
                .arg(text)
                .stdin(Stdio::null())
                .stdout(Stdio::null())
                .stderr(Stdio::null())
                .spawn();
            if spawned.is_ok() {
                debug!(program = backend.program, language, "Local speech submitted");
                return Ok(());
            }
        }
        Err(SpeechError::SynthesisUnsupported)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_language_code() {
        assert_eq!(language_code("nb-NO"), "nb");
        assert_eq!(language_code("nb_NO"), "nb");
        assert_eq!(language_code("nb"), "nb");
    }

    #[tokio::test]
    async fn test_no_startable_backend_is_unsupported() {
        const MISSING: &[Backend] = &[
            Backend {
                program: "morbror-no-such-speech-program",
                language_flag: "-l",
            },
            Backend {
                program: "morbror-no-such-speech-program-either",
                language_flag: "-v",
            },
        ];
        let synth = SystemSynthesizer::with_backends(MISSING);

        assert!(matches!(
            synth.speak("Hei!", "nb-NO").await,
            Err(SpeechError::SynthesisUnsupported)
        ));
    }

    #[tokio::test]
    async fn test_empty_backend_list_is_unsupported() {
        let synth = SystemSynthesizer::with_backends(&[]);
        assert!(matches!(
            synth.speak("Hei!", "nb-NO").await,
            Err(SpeechError::SynthesisUnsupported)
        ));
    }

    #[test]
    fn test_default_backends() {
        let programs: Vec<_> = SystemSynthesizer::new()
            .backends
            .iter()
            .map(|b| b.program)
            .collect();
        assert_eq!(programs, vec!["spd-say", "espeak-ng"]);
    }
}

//! Recognition Sources
//!
//! The Listening -> Recognized step asks a `RecognitionSource` for the phrase
//! the user said. The prototype source draws a sample phrase at random; a real
//! speech-to-text backend only has to implement the same trait.

use async_trait::async_trait;
use rand::seq::IndexedRandom;
use std::collections::VecDeque;
use std::sync::Mutex;
use thiserror::Error;

/// Phrases the simulated recognizer picks from.
pub const SAMPLE_PHRASES: &[&str] = &[
    "Vis meg Arduino-kurset",
    "Blink med lyset!",
    "Hvordan fungerer en LED?",
    "Fortell meg om elektronikk",
];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecognitionError {
    #[error("nothing was heard")]
    NothingHeard,
    #[error("recognizer failed: {0}")]
    Backend(String),
}

#[async_trait]
pub trait RecognitionSource: Send + Sync {
    async fn recognize(&self) -> Result<String, RecognitionError>;
}

/// Picks uniformly at random from a fixed pool of phrases.
#[derive(Debug, Clone)]
pub struct SamplePhraseRecognizer {
    phrases: Vec<String>,
}

impl Default for SamplePhraseRecognizer {
    fn default() -> Self {
        Self::new(SAMPLE_PHRASES.iter().map(|p| p.to_string()).collect())
    }
}

impl SamplePhraseRecognizer {
    pub fn new(phrases: Vec<String>) -> Self {
        Self { phrases }
    }
}

#[async_trait]
impl RecognitionSource for SamplePhraseRecognizer {
    async fn recognize(&self) -> Result<String, RecognitionError> {
        self.phrases
            .choose(&mut rand::rng())
            .cloned()
            .ok_or(RecognitionError::NothingHeard)
    }
}

/// Returns queued phrases in order. Used for typed input and tests.
#[derive(Debug, Default)]
pub struct ScriptedRecognizer {
    queue: Mutex<VecDeque<String>>,
}

impl ScriptedRecognizer {
    pub fn new<I, S>(phrases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            queue: Mutex::new(phrases.into_iter().map(Into::into).collect()),
        }
    }

    pub fn push(&self, phrase: impl Into<String>) {
        if let Ok(mut queue) = self.queue.lock() {
            queue.push_back(phrase.into());
        }
    }
}

#[async_trait]
impl RecognitionSource for ScriptedRecognizer {
    async fn recognize(&self) -> Result<String, RecognitionError> {
        let mut queue = self
            .queue
            .lock()
            .map_err(|e| RecognitionError::Backend(e.to_string()))?;
        queue.pop_front().ok_or(RecognitionError::NothingHeard)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_sample_recognizer_draws_from_pool() {
        let recognizer = SamplePhraseRecognizer::default();
        for _ in 0..20 {
            let phrase = recognizer.recognize().await.unwrap();
            assert!(SAMPLE_PHRASES.contains(&phrase.as_str()));
        }
    }

    #[tokio::test]
    async fn test_empty_pool_hears_nothing() {
        let recognizer = SamplePhraseRecognizer::new(vec![]);
        assert_eq!(
            recognizer.recognize().await,
            Err(RecognitionError::NothingHeard)
        );
    }

    #[tokio::test]
    async fn test_scripted_recognizer_is_fifo() {
        let recognizer = ScriptedRecognizer::new(["første", "andre"]);
        recognizer.push("tredje");
        assert_eq!(recognizer.recognize().await.unwrap(), "første");
        assert_eq!(recognizer.recognize().await.unwrap(), "andre");
        assert_eq!(recognizer.recognize().await.unwrap(), "tredje");
        assert_eq!(
            recognizer.recognize().await,
            Err(RecognitionError::NothingHeard)
        );
    }
}

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Fixed delays of the simulated voice interaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VoiceTimings {
    /// Activated -> Listening.
    pub listen_delay: Duration,
    /// Listening -> Recognized.
    pub recognize_delay: Duration,
    /// From execution start until the resolved course is shown.
    pub reveal_delay: Duration,
    /// From execution start until the session returns to Idle.
    pub settle_delay: Duration,
}

impl Default for VoiceTimings {
    fn default() -> Self {
        Self {
            listen_delay: Duration::from_millis(2000),
            recognize_delay: Duration::from_millis(2000),
            reveal_delay: Duration::from_millis(2000),
            settle_delay: Duration::from_millis(3000),
        }
    }
}

/// Canned phrases the mascot speaks, in Norwegian Bokmål.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Responses {
    pub greeting: String,
    pub understood: String,
    pub not_understood: String,
    pub opening_course: String,
    pub blink_led: String,
    pub explain_led: String,
    pub speech_failed: String,
}

impl Default for Responses {
    fn default() -> Self {
        Self {
            greeting: "Hei! Hva vil du lære i dag?".into(),
            understood: "Jeg forstod:".into(),
            not_understood: "Beklager, jeg forstod ikke det. Kan du prøve igjen?".into(),
            opening_course: "Jeg åpner Arduino-kurset for deg!".into(),
            blink_led: "Jeg skal vise deg hvordan du kan blinke med en LED!".into(),
            explain_led: "En LED er en lysdiode som lyser når du kobler den til strøm. Du må huske å bruke en motstand!".into(),
            speech_failed: "Kunne ikke spille av lyd. Sjekk at API-nøkkelen er gyldig.".into(),
        }
    }
}

impl Responses {
    /// The acknowledgment spoken back for a recognized command.
    pub fn speak_back(&self, command: &str) -> String {
        format!("{} {}", self.understood, command)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_speak_back_joins_with_space() {
        let responses = Responses::default();
        assert_eq!(
            responses.speak_back("Blink med lyset!"),
            "Jeg forstod: Blink med lyset!"
        );
    }

    #[test]
    fn test_partial_override_keeps_defaults() {
        let responses: Responses =
            serde_json::from_str(r#"{"greeting": "Hallo!"}"#).unwrap();
        assert_eq!(responses.greeting, "Hallo!");
        assert_eq!(responses.understood, "Jeg forstod:");
    }
}

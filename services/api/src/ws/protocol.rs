//! Defines the WebSocket message protocol between the browser client and the API server.

use base64::{Engine, prelude::BASE64_STANDARD};
use morbror_core::{machine::Snapshot, runtime::VoiceEvent};
use serde::{Deserialize, Serialize};

/// Messages sent from the client (browser) to the server.
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    /// The mascot was tapped.
    Activate,
    /// Repeat the recognized command back to the child.
    SpeakBack,
    /// Carry out the recognized command.
    Execute,
    /// Close the recognition modal and abandon the session.
    Dismiss,
    /// Speak the greeting.
    Greet,
    /// The child picked a course on screen.
    SelectCourse { course_id: String },
    /// Back to the course list.
    ClearCourse,
}

/// Messages sent from the server to the client (browser).
#[derive(Serialize, Debug, Clone)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    /// The complete interaction state after a change.
    State { snapshot: Snapshot },
    /// Cloud-rendered audio (base64 encoded MP3).
    AudioChunk { data: String },
    /// Ask the browser to speak `text` with its own speech synthesis.
    SpeakLocally { text: String, locale: String },
    /// A message to show the user.
    Notification { message: String },
    /// The last client message could not be handled.
    Error { message: String },
}

impl From<VoiceEvent> for ServerMessage {
    fn from(event: VoiceEvent) -> Self {
        match event {
            VoiceEvent::State(snapshot) => ServerMessage::State { snapshot },
            VoiceEvent::Audio { data } => ServerMessage::AudioChunk {
                data: BASE64_STANDARD.encode(data),
            },
            VoiceEvent::Notification(message) => ServerMessage::Notification { message },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_client_messages_parse() {
        let msg: ClientMessage = serde_json::from_str(r#"{"type":"activate"}"#).unwrap();
        assert_eq!(msg, ClientMessage::Activate);

        let msg: ClientMessage = serde_json::from_str(r#"{"type":"speak_back"}"#).unwrap();
        assert_eq!(msg, ClientMessage::SpeakBack);

        let msg: ClientMessage =
            serde_json::from_str(r#"{"type":"select_course","course_id":"arduino"}"#).unwrap();
        assert_eq!(
            msg,
            ClientMessage::SelectCourse {
                course_id: "arduino".to_string()
            }
        );
    }

    #[test]
    fn test_unknown_client_message_is_rejected() {
        assert!(serde_json::from_str::<ClientMessage>(r#"{"type":"init"}"#).is_err());
        assert!(serde_json::from_str::<ClientMessage>(r#"{"type":"select_course"}"#).is_err());
    }

    #[test]
    fn test_audio_event_is_base64_encoded() {
        let msg = ServerMessage::from(VoiceEvent::Audio {
            data: b"ID3".to_vec(),
        });
        assert_eq!(
            serde_json::to_value(&msg).unwrap(),
            json!({"type": "audio_chunk", "data": "SUQz"})
        );
    }

    #[test]
    fn test_state_event_carries_snapshot() {
        let msg = ServerMessage::from(VoiceEvent::State(Snapshot::default()));
        let value = serde_json::to_value(&msg).unwrap();
        assert_eq!(value["type"], "state");
        assert_eq!(value["snapshot"]["session"]["phase"], "idle");
        assert!(value["snapshot"]["selected_course"].is_null());
    }

    #[test]
    fn test_speak_locally_shape() {
        let msg = ServerMessage::SpeakLocally {
            text: "Hei!".to_string(),
            locale: "nb-NO".to_string(),
        };
        assert_eq!(
            serde_json::to_value(&msg).unwrap(),
            json!({"type": "speak_locally", "text": "Hei!", "locale": "nb-NO"})
        );
    }
}

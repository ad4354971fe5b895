use super::protocol::ServerMessage;
use async_trait::async_trait;
use morbror_core::speech::{LocalSynthesizer, SpeechError};
use tokio::sync::mpsc;

/// Local speech for web clients: the browser speaks, we only tell it what.
pub struct BrowserSynthesizer {
    outbound: mpsc::Sender<ServerMessage>,
}

impl BrowserSynthesizer {
    pub fn new(outbound: mpsc::Sender<ServerMessage>) -> Self {
        Self { outbound }
    }
}

#[async_trait]
impl LocalSynthesizer for BrowserSynthesizer {
    async fn speak(&self, text: &str, locale: &str) -> Result<(), SpeechError> {
        self.outbound
            .send(ServerMessage::SpeakLocally {
                text: text.to_string(),
                locale: locale.to_string(),
            })
            .await
            .map_err(|_| SpeechError::SynthesisUnsupported)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_speak_forwards_to_browser() {
        let (tx, mut rx) = mpsc::channel(4);
        let synth = BrowserSynthesizer::new(tx);

        synth.speak("Hei!", "nb-NO").await.unwrap();

        match rx.recv().await {
            Some(ServerMessage::SpeakLocally { text, locale }) => {
                assert_eq!(text, "Hei!");
                assert_eq!(locale, "nb-NO");
            }
            other => panic!("unexpected message: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_closed_connection_is_unsupported() {
        let (tx, rx) = mpsc::channel(1);
        drop(rx);
        let synth = BrowserSynthesizer::new(tx);

        assert!(matches!(
            synth.speak("Hei!", "nb-NO").await,
            Err(SpeechError::SynthesisUnsupported)
        ));
    }
}

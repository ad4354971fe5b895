use super::{CloudSynthesizer, SpeechError, VoiceConfig};
use async_trait::async_trait;
use reqwest::StatusCode;
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use std::time::Duration;
use tracing::debug;

pub const DEFAULT_BASE_URL: &str = "https://api.elevenlabs.io";

const XI_API_KEY_HEADER: &str = "xi-api-key";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

#[derive(Serialize)]
struct TextToSpeechBody<'a> {
    text: &'a str,
    model_id: &'a str,
}

/// ElevenLabs text-to-speech over plain HTTPS.
pub struct ElevenLabsClient {
    http: reqwest::Client,
    base_url: String,
}

impl ElevenLabsClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self, SpeechError> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| SpeechError::ProviderUnavailable(e.to_string()))?;
        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    fn endpoint(&self, voice_id: &str) -> String {
        format!("{}/v1/text-to-speech/{}", self.base_url, voice_id)
    }
}

/// Maps a non-success HTTP status to the speech error taxonomy.
fn classify_status(status: StatusCode) -> SpeechError {
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => SpeechError::CredentialInvalid,
        other => SpeechError::ProviderUnavailable(format!("provider returned {}", other)),
    }
}

#[async_trait]
impl CloudSynthesizer for ElevenLabsClient {
    async fn synthesize(
        &self,
        text: &str,
        voice: &VoiceConfig,
        credential: &SecretString,
    ) -> Result<Vec<u8>, SpeechError> {
        let response = self
            .http
            .post(self.endpoint(&voice.voice_id))
            .header(XI_API_KEY_HEADER, credential.expose_secret())
            .header(reqwest::header::ACCEPT, "audio/mpeg")
            .json(&TextToSpeechBody {
                text,
                model_id: &voice.model_id,
            })
            .send()
            .await
            .map_err(|e| SpeechError::ProviderUnavailable(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(classify_status(status));
        }

        let audio = response
            .bytes()
            .await
            .map_err(|e| SpeechError::ProviderUnavailable(e.to_string()))?;
        debug!(voice_id = %voice.voice_id, bytes = audio.len(), "Received audio from ElevenLabs");
        Ok(audio.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_auth_failures() {
        assert_eq!(
            classify_status(StatusCode::UNAUTHORIZED),
            SpeechError::CredentialInvalid
        );
        assert_eq!(
            classify_status(StatusCode::FORBIDDEN),
            SpeechError::CredentialInvalid
        );
    }

    #[test]
    fn test_classify_quota_and_outage() {
        assert!(matches!(
            classify_status(StatusCode::TOO_MANY_REQUESTS),
            SpeechError::ProviderUnavailable(_)
        ));
        assert!(matches!(
            classify_status(StatusCode::SERVICE_UNAVAILABLE),
            SpeechError::ProviderUnavailable(_)
        ));
    }

    #[test]
    fn test_endpoint_trims_trailing_slash() {
        let client = ElevenLabsClient::new("https://example.test/").unwrap();
        assert_eq!(
            client.endpoint("abc"),
            "https://example.test/v1/text-to-speech/abc"
        );
    }

    #[tokio::test]
    async fn test_unreachable_provider_is_unavailable() {
        // Port 9 (discard) on localhost is expected to refuse connections.
        let client = ElevenLabsClient::new("http://127.0.0.1:9").unwrap();
        let err = client
            .synthesize("Hei", &VoiceConfig::new("abc"), &SecretString::from("k".to_string()))
            .await
            .unwrap_err();
        assert!(matches!(err, SpeechError::ProviderUnavailable(_)));
    }
}

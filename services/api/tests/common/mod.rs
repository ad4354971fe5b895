use morbror_api::{
    catalog::Catalog, config::Config, models::CourseDocument, router::create_router,
    state::AppState,
};
use morbror_core::{
    settings::VoiceTimings,
    speech::{VoiceProfiles, elevenlabs::ElevenLabsClient},
};
use serde_json::json;
use std::{net::SocketAddr, path::PathBuf, sync::Arc, time::Duration};

pub fn course(id: &str, title: &str) -> CourseDocument {
    serde_json::from_value(json!({
        "courseId": id,
        "title": title,
        "shortTitle": title,
        "description": "",
        "targetAgeRange": "8-12",
        "difficultyLevel": "beginner",
        "prerequisites": [],
        "estimatedCompletionTime": "1 time",
        "coverImage": "",
        "mascot": "morbror",
        "badge": "",
        "voiceCommandKeywords": [],
        "parentNotes": "",
        "creationDate": "2025-01-01",
        "lastUpdated": "2025-01-01",
        "version": "1.0",
        "active": true,
        "ttsScriptOverrides": {},
        "hardwareRequirements": [],
        "modules": []
    }))
    .unwrap()
}

/// Serves the full router on an ephemeral port. Speech has no credential, so
/// every utterance is handed to the browser.
pub async fn spawn_app(courses: Vec<CourseDocument>) -> SocketAddr {
    let short = Duration::from_millis(20);
    let config = Config {
        bind_address: "127.0.0.1:0".parse().unwrap(),
        courses_path: PathBuf::from("./data"),
        elevenlabs_api_key: None,
        elevenlabs_base_url: "http://127.0.0.1:9".to_string(),
        frontend_origin: "http://localhost:3000".to_string(),
        log_level: tracing::Level::INFO,
        timings: VoiceTimings {
            listen_delay: short,
            recognize_delay: short,
            reveal_delay: short,
            settle_delay: short,
        },
    };
    let state = Arc::new(AppState {
        catalog: Arc::new(Catalog::new(courses)),
        cloud_speech: Arc::new(ElevenLabsClient::new(config.elevenlabs_base_url.clone()).unwrap()),
        voice_profiles: Arc::new(VoiceProfiles::default()),
        config: Arc::new(config),
    });

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, create_router(state)).await.unwrap();
    });
    addr
}

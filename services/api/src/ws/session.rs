//! Manages the WebSocket connection lifecycle for a voice session.

use super::{
    protocol::{ClientMessage, ServerMessage},
    synth::BrowserSynthesizer,
};
use crate::state::AppState;
use anyhow::Result;
use axum::{
    extract::{
        State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::Response,
};
use futures_util::{SinkExt, StreamExt, stream::SplitSink};
use morbror_core::{
    machine::VoiceMachine,
    recognition::SamplePhraseRecognizer,
    runtime::{RuntimeClosed, VoiceHandle, VoiceRuntime},
    speech::SpeechResolver,
};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, error, info, instrument, warn};

const OUTBOUND_BUFFER: usize = 16;

/// Axum handler to upgrade an HTTP connection to a WebSocket.
pub async fn ws_handler(ws: WebSocketUpgrade, State(state): State<Arc<AppState>>) -> Response {
    ws.on_upgrade(|socket| handle_socket(socket, state))
}

/// Runs one voice session for the lifetime of the connection.
#[instrument(name = "ws_session", skip_all, fields(connection_id))]
async fn handle_socket(socket: WebSocket, state: Arc<AppState>) {
    let connection_id: u32 = rand::random();
    tracing::Span::current().record("connection_id", connection_id);
    info!("New WebSocket connection.");

    if let Err(e) = run_voice_session(socket, state).await {
        error!(error = ?e, "Voice session terminated with error.");
    }
    info!("Voice session finished.");
}

/// Builds the runtime for this connection and bridges it to the socket.
async fn run_voice_session(socket: WebSocket, state: Arc<AppState>) -> Result<()> {
    let (mut socket_tx, mut socket_rx) = socket.split();
    let (outbound_tx, mut outbound_rx) = mpsc::channel::<ServerMessage>(OUTBOUND_BUFFER);

    let speech = SpeechResolver::new(
        state.cloud_speech.clone(),
        Arc::new(BrowserSynthesizer::new(outbound_tx)),
        state.voice_profiles.clone(),
    )
    .with_credential(state.config.elevenlabs_api_key.clone());
    info!(cloud_speech = speech.has_credential(), "Starting voice runtime.");
    let machine = VoiceMachine::new(state.catalog.summaries()).with_timings(state.config.timings);
    let (handle, mut events, runtime_task) = VoiceRuntime::start(
        machine,
        Arc::new(speech),
        Arc::new(SamplePhraseRecognizer::default()),
    );

    loop {
        tokio::select! {
            msg_result = socket_rx.next() => {
                match msg_result {
                    Some(Ok(Message::Text(text))) => {
                        match serde_json::from_str::<ClientMessage>(&text) {
                            Ok(msg) => {
                                debug!(?msg, "Client message");
                                if dispatch(&handle, msg).await.is_err() {
                                    warn!("Voice runtime stopped unexpectedly.");
                                    break;
                                }
                            }
                            Err(e) => {
                                warn!(error = %e, "Ignoring malformed client message.");
                                send_msg(&mut socket_tx, ServerMessage::Error {
                                    message: format!("Invalid message: {}", e),
                                }).await?;
                            }
                        }
                    }
                    Some(Ok(Message::Binary(_))) => warn!("Ignoring unexpected binary message."),
                    Some(Ok(Message::Close(_))) | None => {
                        info!("Client closed the connection.");
                        break;
                    }
                    Some(Ok(Message::Ping(_) | Message::Pong(_))) => {}
                    Some(Err(e)) => {
                        error!("Error receiving from client WebSocket: {:?}", e);
                        break;
                    }
                }
            },
            Some(event) = events.recv() => {
                send_msg(&mut socket_tx, ServerMessage::from(event)).await?;
            },
            Some(msg) = outbound_rx.recv() => {
                send_msg(&mut socket_tx, msg).await?;
            },
        }
    }

    // Dropping the last handle stops the runtime and cancels its timers.
    drop(handle);
    drop(events);
    if let Err(e) = runtime_task.await {
        warn!(error = %e, "Voice runtime task did not shut down cleanly.");
    }
    Ok(())
}

async fn dispatch(handle: &VoiceHandle, msg: ClientMessage) -> Result<(), RuntimeClosed> {
    match msg {
        ClientMessage::Activate => handle.activate().await,
        ClientMessage::SpeakBack => handle.speak_back().await,
        ClientMessage::Execute => handle.execute().await,
        ClientMessage::Dismiss => handle.dismiss().await,
        ClientMessage::Greet => handle.greet().await,
        ClientMessage::SelectCourse { course_id } => handle.select_course(course_id).await,
        ClientMessage::ClearCourse => handle.clear_course().await,
    }
}

/// A helper function to serialize and send a `ServerMessage` to the client.
pub(crate) async fn send_msg(
    socket_tx: &mut SplitSink<WebSocket, Message>,
    msg: ServerMessage,
) -> Result<()> {
    let serialized = serde_json::to_string(&msg)?;
    socket_tx.send(Message::Text(serialized.into())).await?;
    Ok(())
}

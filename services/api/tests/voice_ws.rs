mod common;

use futures_util::{SinkExt, StreamExt};
use morbror_core::{recognition::SAMPLE_PHRASES, settings::Responses};
use serde_json::Value;
use std::time::Duration;
use tokio::{net::TcpStream, time::timeout};
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async, tungstenite::Message};

type Socket = WebSocketStream<MaybeTlsStream<TcpStream>>;

async fn connect() -> Socket {
    let addr = common::spawn_app(vec![common::course("arduino-for-barn", "Arduino for barn")]).await;
    let (socket, _) = connect_async(format!("ws://{}/ws", addr)).await.unwrap();
    socket
}

async fn send(socket: &mut Socket, msg: &str) {
    socket.send(Message::Text(msg.into())).await.unwrap();
}

/// Reads server messages until one satisfies `pred`.
async fn next_matching(socket: &mut Socket, pred: impl Fn(&Value) -> bool) -> Value {
    timeout(Duration::from_secs(5), async {
        loop {
            match socket.next().await {
                Some(Ok(Message::Text(text))) => {
                    let value: Value = serde_json::from_str(&text).unwrap();
                    if pred(&value) {
                        return value;
                    }
                }
                Some(Ok(_)) => {}
                other => panic!("socket ended: {:?}", other),
            }
        }
    })
    .await
    .expect("no matching message within timeout")
}

fn is_phase(value: &Value, phase: &str) -> bool {
    value["type"] == "state" && value["snapshot"]["session"]["phase"] == phase
}

#[tokio::test]
async fn test_connection_starts_idle() {
    let mut socket = connect().await;
    let state = next_matching(&mut socket, |v| v["type"] == "state").await;
    assert_eq!(state["snapshot"]["session"]["phase"], "idle");
    assert_eq!(state["snapshot"]["session"]["modal_visible"], false);
}

#[tokio::test]
async fn test_activation_reaches_recognized() {
    let mut socket = connect().await;
    send(&mut socket, r#"{"type":"activate"}"#).await;

    let state = next_matching(&mut socket, |v| is_phase(v, "recognized")).await;
    let command = state["snapshot"]["session"]["recognized_command"]
        .as_str()
        .unwrap();
    assert!(SAMPLE_PHRASES.contains(&command));
    assert_eq!(state["snapshot"]["session"]["modal_visible"], true);

    send(&mut socket, r#"{"type":"dismiss"}"#).await;
    let state = next_matching(&mut socket, |v| is_phase(v, "idle")).await;
    assert!(state["snapshot"]["session"]["recognized_command"].is_null());
}

#[tokio::test]
async fn test_greeting_is_spoken_by_browser_without_credential() {
    let mut socket = connect().await;
    send(&mut socket, r#"{"type":"greet"}"#).await;

    let msg = next_matching(&mut socket, |v| v["type"] == "speak_locally").await;
    assert_eq!(msg["text"], Responses::default().greeting);
    assert_eq!(msg["locale"], "nb-NO");
}

#[tokio::test]
async fn test_select_and_clear_course() {
    let mut socket = connect().await;
    send(
        &mut socket,
        r#"{"type":"select_course","course_id":"arduino-for-barn"}"#,
    )
    .await;
    let state = next_matching(&mut socket, |v| {
        v["type"] == "state" && !v["snapshot"]["selected_course"].is_null()
    })
    .await;
    assert_eq!(state["snapshot"]["selected_course"]["id"], "arduino-for-barn");

    send(&mut socket, r#"{"type":"clear_course"}"#).await;
    let state = next_matching(&mut socket, |v| {
        v["type"] == "state" && v["snapshot"]["selected_course"].is_null()
    })
    .await;
    assert_eq!(state["snapshot"]["session"]["phase"], "idle");
}

#[tokio::test]
async fn test_malformed_message_reports_error() {
    let mut socket = connect().await;
    send(&mut socket, r#"{"type":"fly"}"#).await;

    let msg = next_matching(&mut socket, |v| v["type"] == "error").await;
    assert!(msg["message"].as_str().unwrap().starts_with("Invalid message"));
}

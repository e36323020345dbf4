// WebSocket handler: pushes every applied update to subscribers

use axum::{
    extract::{
        State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::IntoResponse,
};
use bytes::Bytes;
use serde::Serialize;
use tokio::sync::broadcast;
use tokio::time::{Duration, timeout};

use super::AppState;
use crate::fridge_state::{FridgeUpdate, SharedFridgeState};
use crate::models::FridgeSummary;

pub(super) const WS_PING_INTERVAL: Duration = Duration::from_secs(30);
pub(super) const WS_SEND_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum WsMessage<'a> {
    /// First message on connect: every current summary.
    Summaries { summaries: Vec<FridgeSummary> },
    Update(&'a FridgeUpdate),
}

pub(super) async fn ws_updates(
    ws: WebSocketUpgrade,
    State(state): State<AppState>,
) -> impl IntoResponse {
    let tx = state.updates_tx.clone();
    let fridges = state.fridges.clone();
    ws.on_upgrade(move |socket| async move {
        // Subscribe before reading the current state so no update falls in between.
        let mut rx = tx.subscribe();
        if let Err(e) = stream_updates(socket, &mut rx, fridges).await {
            tracing::info!("Updates stream error: {}", e);
        }
    })
}

async fn send_json(socket: &mut WebSocket, message: &WsMessage<'_>) -> anyhow::Result<bool> {
    let json = serde_json::to_string(message)?;
    let r = timeout(WS_SEND_TIMEOUT, socket.send(Message::Text(json.into()))).await;
    Ok(matches!(r, Ok(Ok(()))))
}

async fn stream_updates(
    mut socket: WebSocket,
    rx: &mut broadcast::Receiver<FridgeUpdate>,
    fridges: SharedFridgeState,
) -> anyhow::Result<()> {
    tracing::info!("Client connected to updates stream");

    let summaries = fridges.read().await.summaries().values().cloned().collect();
    if !send_json(&mut socket, &WsMessage::Summaries { summaries }).await? {
        return Ok(());
    }

    let mut ping_interval = tokio::time::interval(WS_PING_INTERVAL);
    ping_interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
    loop {
        tokio::select! {
            result = rx.recv() => {
                match result {
                    Ok(update) => {
                        if !send_json(&mut socket, &WsMessage::Update(&update)).await? {
                            break;
                        }
                    }
                    Err(broadcast::error::RecvError::Lagged(n)) => {
                        tracing::warn!("WebSocket /ws/updates client lagged, skipped {} messages", n);
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
            _ = ping_interval.tick() => {
                let r = timeout(WS_SEND_TIMEOUT, socket.send(Message::Ping(Bytes::new()))).await;
                if r.is_err() || r.unwrap_or(Ok(())).is_err() {
                    break;
                }
            }
        }
    }
    Ok(())
}

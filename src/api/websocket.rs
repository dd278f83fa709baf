//! WebSocket push of portal notifications.
//!
//! `GET /api/ws/notifications` upgrades to a WebSocket that receives every
//! notification `PortalState` broadcasts (request accepted, chat toggled,
//! transfer sent, ...).
//!
//! Connection lifecycle:
//! 1. Server sends `Welcome`
//! 2. Each broadcast notification is forwarded as `Notification`
//! 3. Heartbeat every 30s; the client answers `Pong`. 3 missed = disconnect

use std::sync::Arc;
use std::time::Duration;

use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::State;
use axum::response::IntoResponse;
use axum::Extension;
use futures_util::{Sink, SinkExt, StreamExt};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast::error::RecvError;

use crate::api::types::ApiContext;
use crate::core_state::PortalState;
use crate::models::{Actor, Notification};

/// Heartbeat interval: server sends Heartbeat every 30 seconds.
const HEARTBEAT_INTERVAL: Duration = Duration::from_secs(30);

/// Disconnect after this many unanswered heartbeats.
const MAX_MISSED_HEARTBEATS: u32 = 3;

/// Server → client frames.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum WsOutgoing {
    Welcome { session_id: String, actor_id: String },
    Notification { notification: Notification },
    Heartbeat { server_time: String },
}

/// Client → server frames.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type")]
pub enum WsIncoming {
    Pong {},
}

/// Heartbeat bookkeeping, separate from the socket so it can be tested.
#[derive(Debug, Default)]
pub(crate) struct HeartbeatState {
    missed: u32,
}

impl HeartbeatState {
    fn on_pong(&mut self) {
        self.missed = 0;
    }

    /// Called on each tick. Returns `false` once the client is gone.
    fn on_tick(&mut self) -> bool {
        if self.missed >= MAX_MISSED_HEARTBEATS {
            return false;
        }
        self.missed += 1;
        true
    }
}

/// `GET /api/ws/notifications`
pub async fn ws_upgrade(
    ws: WebSocketUpgrade,
    State(ctx): State<ApiContext>,
    Extension(actor): Extension<Actor>,
) -> impl IntoResponse {
    tracing::info!(actor_id = %actor.id, "Notification stream opened");
    let core = ctx.core.clone();
    ws.on_upgrade(move |socket| handle_ws(socket, core, actor))
}

async fn send_frame<S>(sink: &mut S, frame: &WsOutgoing) -> bool
where
    S: Sink<Message> + Unpin,
{
    let json = match serde_json::to_string(frame) {
        Ok(j) => j,
        Err(_) => return true,
    };
    sink.send(Message::Text(json)).await.is_ok()
}

async fn handle_ws(socket: WebSocket, core: Arc<PortalState>, actor: Actor) {
    let (mut sink, mut stream) = socket.split();
    let mut events = core.subscribe();

    let welcome = WsOutgoing::Welcome {
        session_id: uuid::Uuid::new_v4().to_string(),
        actor_id: actor.id.clone(),
    };
    if !send_frame(&mut sink, &welcome).await {
        return;
    }

    let mut heartbeat_state = HeartbeatState::default();
    let mut heartbeat = tokio::time::interval(HEARTBEAT_INTERVAL);
    heartbeat.tick().await; // Consume initial immediate tick

    loop {
        tokio::select! {
            event = events.recv() => {
                match event {
                    Ok(notification) => {
                        let frame = WsOutgoing::Notification { notification };
                        if !send_frame(&mut sink, &frame).await {
                            break;
                        }
                    }
                    Err(RecvError::Lagged(skipped)) => {
                        tracing::warn!(actor_id = %actor.id, skipped, "Notification stream lagged");
                    }
                    Err(RecvError::Closed) => break,
                }
            }
            msg = stream.next() => {
                match msg {
                    Some(Ok(Message::Text(text))) => {
                        if let Ok(WsIncoming::Pong {}) = serde_json::from_str::<WsIncoming>(&text) {
                            heartbeat_state.on_pong();
                        }
                    }
                    Some(Ok(Message::Close(_))) | None | Some(Err(_)) => break,
                    _ => {}
                }
            }
            _ = heartbeat.tick() => {
                if !heartbeat_state.on_tick() {
                    tracing::info!(
                        actor_id = %actor.id,
                        "{MAX_MISSED_HEARTBEATS} missed heartbeats, disconnecting"
                    );
                    break;
                }
                let frame = WsOutgoing::Heartbeat {
                    server_time: chrono::Utc::now().to_rfc3339(),
                };
                if !send_frame(&mut sink, &frame).await {
                    break;
                }
            }
        }
    }

    let _ = sink.close().await;
    tracing::info!(actor_id = %actor.id, "Notification stream closed");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::router::portal_router;
    use tokio::net::TcpListener;

    #[test]
    fn heartbeat_allows_until_limit() {
        let mut state = HeartbeatState::default();
        for _ in 0..MAX_MISSED_HEARTBEATS {
            assert!(state.on_tick());
        }
        assert!(!state.on_tick());
    }

    #[test]
    fn pong_resets_missed_counter() {
        let mut state = HeartbeatState::default();
        state.on_tick();
        state.on_tick();
        state.on_pong();
        assert_eq!(state.missed, 0);
        assert!(state.on_tick());
    }

    #[test]
    fn outgoing_frames_are_tagged() {
        let json = serde_json::to_value(WsOutgoing::Heartbeat {
            server_time: "2024-02-15T10:00:00Z".into(),
        })
        .unwrap();
        assert_eq!(json["type"], "Heartbeat");
    }

    #[test]
    fn pong_parses() {
        let parsed: WsIncoming = serde_json::from_str(r#"{"type":"Pong"}"#).unwrap();
        assert!(matches!(parsed, WsIncoming::Pong {}));
    }

    #[tokio::test]
    async fn ws_forwards_broadcast_notifications() {
        let core = Arc::new(PortalState::in_memory());
        core.seed(crate::fixtures::sample(&crate::avatar::UiAvatars::default()))
            .unwrap();
        let app = portal_router(core.clone(), Actor::new("dr-james", "Dr. James Martin"));

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let server = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        let url = format!("ws://127.0.0.1:{}/api/ws/notifications", addr.port());
        let (mut ws, _) = tokio_tungstenite::connect_async(&url)
            .await
            .expect("WS connect failed");

        let next_json = |msg: tokio_tungstenite::tungstenite::Message| {
            let text = msg.into_text().expect("not text");
            serde_json::from_str::<serde_json::Value>(&text).unwrap()
        };

        let welcome = tokio::time::timeout(Duration::from_secs(5), ws.next())
            .await
            .expect("timeout waiting for Welcome")
            .expect("stream ended")
            .expect("WS error");
        let welcome = next_json(welcome);
        assert_eq!(welcome["type"], "Welcome");
        assert_eq!(welcome["actor_id"], "dr-james");

        let james = Actor::new("dr-james", "Dr. James Martin");
        core.decline_friend_request("fr-1", &james).unwrap();

        let pushed = tokio::time::timeout(Duration::from_secs(5), ws.next())
            .await
            .expect("timeout waiting for Notification")
            .expect("stream ended")
            .expect("WS error");
        let pushed = next_json(pushed);
        assert_eq!(pushed["type"], "Notification");
        assert_eq!(pushed["notification"]["message"], "Friend request declined");

        let _ = ws.close(None).await;
        server.abort();
    }
}

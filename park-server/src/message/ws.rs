//! WebSocket transport for the push channel
//!
//! Clients connect to `/ws` with an optional bearer credential, either as
//! an `Authorization` header or a `token` query parameter. A validating
//! credential joins the admin audience; anything else (missing, expired,
//! malformed) silently downgrades the connection to guest. 凭证校验失败
//! 不是错误路径，只是降级。

use axum::{
    Router,
    extract::{
        Query, State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    http::HeaderMap,
    response::Response,
    routing::get,
};
use futures::{SinkExt, StreamExt};
use serde::Deserialize;
use tokio::sync::broadcast::error::RecvError;
use uuid::Uuid;

use shared::message::{Audience, BusMessage, EventType, WsFrame};

use crate::auth::JwtService;
use crate::core::ServerState;
use crate::message::{ConnectedClient, MessageBus};

#[derive(Debug, Deserialize)]
pub struct WsParams {
    token: Option<String>,
}

pub fn router() -> Router<ServerState> {
    Router::new().route("/ws", get(ws_handler))
}

async fn ws_handler(
    State(state): State<ServerState>,
    ws: WebSocketUpgrade,
    headers: HeaderMap,
    Query(params): Query<WsParams>,
) -> Response {
    let bearer = headers
        .get(http::header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(JwtService::extract_from_header)
        .map(str::to_string)
        .or(params.token);

    let audience = authenticate(&state.jwt_service, bearer.as_deref());
    ws.on_upgrade(move |socket| handle_socket(socket, state, audience))
}

/// Decide the audience for a new connection. Validation failure is a
/// silent downgrade to guest, never a rejected handshake.
pub fn authenticate(jwt: &JwtService, token: Option<&str>) -> Audience {
    match token {
        Some(token) if jwt.validate_token(token).is_ok() => Audience::Admin,
        _ => Audience::Guest,
    }
}

async fn handle_socket(socket: WebSocket, state: ServerState, audience: Audience) {
    let client_id = Uuid::new_v4().to_string();
    let bus = state.message_bus.clone();
    bus.register(ConnectedClient {
        id: client_id.clone(),
        audience,
    });
    tracing::info!(client = %client_id, audience = ?audience, "Push channel client connected");

    let mut rx = bus.subscribe();
    let shutdown = bus.shutdown_token().clone();
    let (mut sender, mut receiver) = socket.split();

    loop {
        tokio::select! {
            _ = shutdown.cancelled() => break,

            outbound = rx.recv() => {
                match outbound {
                    Ok(msg) => {
                        // audience membership was fixed at handshake time
                        if !msg.audience.includes(audience) {
                            continue;
                        }
                        let Ok(text) = msg.to_frame().to_json() else {
                            continue;
                        };
                        if sender.send(Message::Text(text.into())).await.is_err() {
                            // client gone; at-most-once, no retry
                            break;
                        }
                    }
                    Err(RecvError::Lagged(skipped)) => {
                        tracing::warn!(client = %client_id, skipped, "Push channel client lagged");
                    }
                    Err(RecvError::Closed) => break,
                }
            }

            inbound = receiver.next() => {
                match inbound {
                    Some(Ok(Message::Text(text))) => handle_frame(&bus, audience, text.as_str()),
                    Some(Ok(Message::Close(_))) | None => break,
                    Some(Ok(_)) => {} // ping/pong are handled by axum
                    Some(Err(e)) => {
                        tracing::debug!(client = %client_id, error = %e, "Push channel read error");
                        break;
                    }
                }
            }
        }
    }

    bus.unregister(&client_id);
    tracing::info!(client = %client_id, "Push channel client disconnected");
}

/// Route an inbound client frame. Only `admin:notify` from a privileged
/// connection has an effect: its payload is rebroadcast to the guest
/// audience (never echoed back to admins, including the sender).
fn handle_frame(bus: &MessageBus, audience: Audience, text: &str) {
    let Ok(frame) = WsFrame::from_json(text) else {
        tracing::debug!("Ignoring malformed push channel frame");
        return;
    };

    match EventType::from_event_name(&frame.event) {
        Some(EventType::AdminNotify) if audience == Audience::Admin => {
            tracing::info!("Admin notification received, rebroadcasting to guests");
            bus.publish(BusMessage::notification(
                frame.data.unwrap_or(serde_json::Value::Null),
            ));
        }
        Some(EventType::AdminNotify) => {
            tracing::debug!("Dropping admin:notify from guest connection");
        }
        _ => {}
    }
}

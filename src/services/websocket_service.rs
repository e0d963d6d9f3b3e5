//! WebSocket connection lifecycle: registration, keepalive, frame handling.

use axum::{
    body::Bytes,
    extract::ws::{Message, WebSocket},
};
use futures::{SinkExt, StreamExt};
use tokio::{
    sync::mpsc,
    task::JoinHandle,
    time::{MissedTickBehavior, interval},
};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::{
    dto::ws::InboundEnvelope,
    services::{game_service, session::SessionAuth},
    state::{ClientConnection, SharedState},
};

/// Handle the full lifecycle of one client connection.
///
/// `session_token` is the anti-forgery token captured from the upgrade
/// request; a connection without one can never authenticate a message. Each
/// inbound frame is processed to completion before the next one is read.
pub async fn handle_socket(state: SharedState, socket: WebSocket, session_token: Option<String>) {
    let (mut sender, mut receiver) = socket.split();
    let (outbound_tx, mut outbound_rx) = mpsc::unbounded_channel::<Message>();

    // Dedicated writer task keeps broadcasts flowing even while we await
    // inbound frames.
    let writer_task = tokio::spawn(async move {
        while let Some(message) = outbound_rx.recv().await {
            if sender.send(message).await.is_err() {
                break;
            }
        }
    });

    let id = Uuid::new_v4();
    state.connections().insert(
        id,
        ClientConnection {
            id,
            tx: outbound_tx.clone(),
        },
    );
    info!(%id, "client connected");

    let mut session = SessionAuth::new(session_token);

    let mut keepalive = interval(state.config().keepalive());
    keepalive.set_missed_tick_behavior(MissedTickBehavior::Delay);
    // The first tick completes immediately; consume it so pings start one
    // interval from now.
    keepalive.tick().await;

    loop {
        tokio::select! {
            _ = keepalive.tick() => {
                if outbound_tx.send(Message::Ping(Bytes::new())).is_err() {
                    break;
                }
            }
            inbound = receiver.next() => match inbound {
                Some(Ok(Message::Text(text))) => {
                    if !handle_frame(&state, &mut session, id, text.as_str(), &outbound_tx).await {
                        break;
                    }
                }
                Some(Ok(Message::Ping(payload))) => {
                    let _ = outbound_tx.send(Message::Pong(payload));
                }
                Some(Ok(Message::Close(frame))) => {
                    info!(%id, "client closed");
                    let _ = outbound_tx.send(Message::Close(frame));
                    break;
                }
                Some(Ok(Message::Binary(_))) | Some(Ok(Message::Pong(_))) => {}
                Some(Err(err)) => {
                    warn!(%id, error = %err, "websocket error");
                    break;
                }
                None => break,
            }
        }
    }

    state.connections().remove(&id);
    info!(%id, "client disconnected");

    finalize(writer_task, outbound_tx).await;
}

/// Process one text frame. Returns `false` when the connection should be
/// torn down.
async fn handle_frame(
    state: &SharedState,
    session: &mut SessionAuth,
    id: Uuid,
    text: &str,
    outbound_tx: &mpsc::UnboundedSender<Message>,
) -> bool {
    let envelope = match InboundEnvelope::from_json_str(text) {
        Ok(envelope) => envelope.escaped(),
        Err(err) => {
            // A bad frame must not kill the connection.
            warn!(%id, error = %err, "dropping malformed frame");
            return true;
        }
    };

    if !session.authenticate(&envelope.authenticity_token) {
        // Silent drop: no mutation, no broadcast, no acknowledgement, so a
        // wrong token is indistinguishable from a lost frame.
        warn!(%id, "dropping frame with invalid authenticity token");
        return true;
    }

    debug!(%id, action = envelope.action.kind(), "processing action");
    match game_service::process_action(state, session, envelope.action).await {
        Ok(()) => true,
        Err(err) => {
            // Store loss is fatal to this connection; close rather than
            // leave the client hanging.
            warn!(%id, error = %err, "action failed; closing connection");
            let _ = outbound_tx.send(Message::Close(None));
            false
        }
    }
}

/// Ensure the writer task winds down before the socket handler returns.
async fn finalize(writer_task: JoinHandle<()>, outbound_tx: mpsc::UnboundedSender<Message>) {
    drop(outbound_tx);
    let _ = writer_task.await;
}

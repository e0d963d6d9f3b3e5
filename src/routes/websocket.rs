use axum::{
    Router,
    extract::{Query, State, WebSocketUpgrade},
    response::IntoResponse,
    routing::get,
};
use serde::Deserialize;

use crate::{services::websocket_service, state::SharedState};

/// Upgrade parameters carried on the request.
#[derive(Debug, Deserialize)]
pub struct WsQuery {
    /// Anti-forgery token the front door issued to the page session; bound
    /// to the connection for the authentication gate.
    pub token: Option<String>,
}

/// Upgrade the HTTP connection into a game WebSocket session.
pub async fn ws_handler(
    State(state): State<SharedState>,
    Query(query): Query<WsQuery>,
    ws: WebSocketUpgrade,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| websocket_service::handle_socket(state, socket, query.token))
}

/// Configure the WebSocket endpoint.
pub fn router() -> Router<SharedState> {
    Router::<SharedState>::new().route("/ws", get(ws_handler))
}

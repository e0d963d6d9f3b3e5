//! HTTP surface owned by this core: the WebSocket upgrade endpoint and the
//! health route. Every other request belongs to the embedding front door,
//! which merges its own routes around this router.

use axum::Router;

use crate::state::SharedState;

/// Health check endpoint.
pub mod health;
/// WebSocket upgrade endpoint.
pub mod websocket;

/// Compose the core's route tree, wiring in the shared state.
pub fn router(state: SharedState) -> Router<()> {
    health::router().merge(websocket::router()).with_state(state)
}

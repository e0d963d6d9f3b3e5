use tracing::warn;

use crate::{dto::health::HealthResponse, state::SharedState};

/// Build the health payload, probing the room store and logging failures.
pub async fn health_status(state: &SharedState) -> HealthResponse {
    let connections = state.connections().len();

    match state.require_room_store().await {
        Ok(store) => {
            if let Err(err) = store.health_check().await {
                warn!(error = %err, "room store health check failed");
            }
        }
        Err(_) => warn!("room store unavailable (degraded mode)"),
    }

    if state.is_degraded().await {
        HealthResponse::degraded(connections)
    } else {
        HealthResponse::ok(connections)
    }
}

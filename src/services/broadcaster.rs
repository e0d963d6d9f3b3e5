//! Background task relaying published payloads to every live connection.

use axum::extract::ws::Message;
use tokio::sync::broadcast::error::RecvError;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::state::SharedState;

/// Relay every payload published on the wire hub to every registered
/// connection, irrespective of room membership.
///
/// Spawned once from `main` and owned by the server's lifecycle; it runs
/// until the hub is dropped. Connections whose writer channel is gone are
/// pruned from the registry on the next delivery attempt.
pub async fn run(state: SharedState) {
    let mut rx = state.wire().subscribe();
    info!("broadcast fan-out started");

    loop {
        match rx.recv().await {
            Ok(payload) => {
                let mut stale: Vec<Uuid> = Vec::new();
                for connection in state.connections().iter() {
                    if connection
                        .tx
                        .send(Message::Text(payload.clone().into()))
                        .is_err()
                    {
                        stale.push(connection.id);
                    }
                }
                for id in stale {
                    debug!(%id, "pruning connection with closed writer");
                    state.connections().remove(&id);
                }
            }
            Err(RecvError::Lagged(skipped)) => {
                warn!(skipped, "broadcast fan-out lagged; payloads dropped");
            }
            Err(RecvError::Closed) => break,
        }
    }

    info!("broadcast fan-out stopped");
}

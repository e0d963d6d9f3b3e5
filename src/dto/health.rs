use serde::Serialize;

/// Health payload returned by the `/healthcheck` route.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Health status ("ok" or "degraded").
    pub status: String,
    /// Number of live WebSocket connections.
    pub connections: usize,
}

impl HealthResponse {
    /// Health response for an operational backend.
    pub fn ok(connections: usize) -> Self {
        Self {
            status: "ok".to_string(),
            connections,
        }
    }

    /// Health response for a backend running without a room store.
    pub fn degraded(connections: usize) -> Self {
        Self {
            status: "degraded".to_string(),
            connections,
        }
    }
}

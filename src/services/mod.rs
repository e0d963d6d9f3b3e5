//! Service layer: per-connection session gates, action processing, and the
//! broadcast fan-out.

/// Background fan-out of published payloads to every live connection.
pub mod broadcaster;
/// Action interpretation against room snapshots.
pub mod game_service;
/// Health check service.
pub mod health_service;
/// Per-connection authentication and authorization state.
pub mod session;
/// WebSocket connection lifecycle handling.
pub mod websocket_service;

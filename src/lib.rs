//! Library crate for snatch-back, exposing modules for the binary and
//! integration tests.

/// Runtime configuration.
pub mod config;
/// Persistence boundary and room repository.
pub mod dao;
/// Wire-level message types.
pub mod dto;
/// Service error types.
pub mod error;
/// HTTP and WebSocket routes.
pub mod routes;
/// Session gates, action processing, and the broadcast fan-out.
pub mod services;
/// Shared state and the pure game domain.
pub mod state;

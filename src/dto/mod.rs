//! Wire-level message types.

/// Health endpoint payload.
pub mod health;
/// Field-level validation helpers.
pub mod validation;
/// Inbound WebSocket message types.
pub mod ws;

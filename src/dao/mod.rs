//! Persistence layer: the hash-field room store boundary and the room
//! repository built on top of it.

/// In-process room store implementation.
pub mod memory;
/// Store abstraction at the hash-field boundary.
pub mod room_store;
/// Room field encoding and snapshot persistence.
pub mod rooms;
/// Storage error types shared by all backends.
pub mod storage;

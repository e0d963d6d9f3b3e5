use futures::future::BoxFuture;

use crate::dao::storage::StorageResult;

/// Abstraction over the hash-field store holding room state.
///
/// The durable key-value product behind this trait is an external
/// collaborator; the core only relies on atomic per-field reads/writes plus
/// grouped variants so one action's field group is read and written as a
/// unit.
pub trait RoomStore: Send + Sync {
    /// Whether `field` exists for `room`. A room whose `tiles` field is
    /// absent counts as uninitialized.
    fn field_exists(&self, room: String, field: String) -> BoxFuture<'static, StorageResult<bool>>;

    /// Read one field value.
    fn get_field(
        &self,
        room: String,
        field: String,
    ) -> BoxFuture<'static, StorageResult<Option<String>>>;

    /// Read a group of fields in one atomic step, preserving request order.
    fn get_fields(
        &self,
        room: String,
        fields: Vec<String>,
    ) -> BoxFuture<'static, StorageResult<Vec<Option<String>>>>;

    /// Write a group of fields in one atomic step.
    fn set_fields(
        &self,
        room: String,
        entries: Vec<(String, String)>,
    ) -> BoxFuture<'static, StorageResult<()>>;

    /// Delete every field of `room`. Destructive: wipes the bag, the board,
    /// and all ledgers.
    fn clear_room(&self, room: String) -> BoxFuture<'static, StorageResult<()>>;

    /// Probe backend liveness.
    fn health_check(&self) -> BoxFuture<'static, StorageResult<()>>;
}

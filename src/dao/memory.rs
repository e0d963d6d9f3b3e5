use std::{collections::HashMap, sync::Arc};

use dashmap::DashMap;
use futures::future::BoxFuture;

use crate::dao::{room_store::RoomStore, storage::StorageResult};

/// In-process room store backed by a concurrent map.
///
/// Grouped reads and writes hold the room's map entry for their duration, so
/// one action's field group is observed and updated atomically. This is both
/// the test double and the default backend for single-process deployments.
#[derive(Clone, Default)]
pub struct MemoryRoomStore {
    rooms: Arc<DashMap<String, HashMap<String, String>>>,
}

impl MemoryRoomStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

impl RoomStore for MemoryRoomStore {
    fn field_exists(&self, room: String, field: String) -> BoxFuture<'static, StorageResult<bool>> {
        let store = self.clone();
        Box::pin(async move {
            Ok(store
                .rooms
                .get(&room)
                .is_some_and(|fields| fields.contains_key(&field)))
        })
    }

    fn get_field(
        &self,
        room: String,
        field: String,
    ) -> BoxFuture<'static, StorageResult<Option<String>>> {
        let store = self.clone();
        Box::pin(async move {
            Ok(store
                .rooms
                .get(&room)
                .and_then(|fields| fields.get(&field).cloned()))
        })
    }

    fn get_fields(
        &self,
        room: String,
        fields: Vec<String>,
    ) -> BoxFuture<'static, StorageResult<Vec<Option<String>>>> {
        let store = self.clone();
        Box::pin(async move {
            let entry = store.rooms.get(&room);
            Ok(fields
                .iter()
                .map(|field| {
                    entry
                        .as_ref()
                        .and_then(|values| values.get(field).cloned())
                })
                .collect())
        })
    }

    fn set_fields(
        &self,
        room: String,
        entries: Vec<(String, String)>,
    ) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move {
            let mut fields = store.rooms.entry(room).or_default();
            for (field, value) in entries {
                fields.insert(field, value);
            }
            Ok(())
        })
    }

    fn clear_room(&self, room: String) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move {
            store.rooms.remove(&room);
            Ok(())
        })
    }

    fn health_check(&self) -> BoxFuture<'static, StorageResult<()>> {
        Box::pin(async { Ok(()) })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn fields_are_scoped_per_room() {
        let store = MemoryRoomStore::new();
        store
            .set_fields("r1".into(), vec![("tiles".into(), "[]".into())])
            .await
            .unwrap();

        assert!(
            store
                .field_exists("r1".into(), "tiles".into())
                .await
                .unwrap()
        );
        assert!(
            !store
                .field_exists("r2".into(), "tiles".into())
                .await
                .unwrap()
        );
    }

    #[tokio::test]
    async fn grouped_reads_preserve_request_order() {
        let store = MemoryRoomStore::new();
        store
            .set_fields(
                "r1".into(),
                vec![("a".into(), "1".into()), ("b".into(), "2".into())],
            )
            .await
            .unwrap();

        let values = store
            .get_fields("r1".into(), vec!["b".into(), "missing".into(), "a".into()])
            .await
            .unwrap();
        assert_eq!(values, vec![Some("2".into()), None, Some("1".into())]);
    }

    #[tokio::test]
    async fn clear_room_wipes_every_field() {
        let store = MemoryRoomStore::new();
        store
            .set_fields(
                "r1".into(),
                vec![
                    ("tiles".into(), "[]".into()),
                    ("players".into(), "[]".into()),
                ],
            )
            .await
            .unwrap();

        store.clear_room("r1".into()).await.unwrap();
        assert!(
            !store
                .field_exists("r1".into(), "players".into())
                .await
                .unwrap()
        );
    }
}

use std::sync::Arc;

use indexmap::IndexMap;

use crate::{
    dao::{
        room_store::RoomStore,
        storage::{StorageError, StorageResult},
    },
    state::{
        room::{RoomField, RoomSnapshot},
        tiles,
    },
};

const FIELD_TILES: &str = "tiles";
const FIELD_PLAYERS: &str = "players";
const FIELD_OVERTURNED_LETTERS: &str = "overturned_letters";
const FIELD_OVERTURNED_INDEXES: &str = "overturned_indexes";
const FIELD_TAKEN_INDEXES: &str = "taken_indexes";

/// Store field holding one player's word ledger.
fn words_field(handle: &str) -> String {
    format!("words:{handle}")
}

/// Repository translating between [`RoomSnapshot`] values and the hash-field
/// layout persisted per room key (each field a JSON-encoded string array).
#[derive(Clone)]
pub struct RoomRepository {
    store: Arc<dyn RoomStore>,
}

impl RoomRepository {
    /// Wrap a store handle.
    pub fn new(store: Arc<dyn RoomStore>) -> Self {
        Self { store }
    }

    /// Whether the room has been initialized. The `tiles` field is the
    /// room's existence marker.
    pub async fn room_exists(&self, room: &str) -> StorageResult<bool> {
        self.store
            .field_exists(room.to_string(), FIELD_TILES.to_string())
            .await
    }

    /// (Re-)initialize a room around a freshly shuffled bag.
    ///
    /// Destructive: every existing field is deleted first, wiping the board
    /// and all players' ledgers.
    pub async fn initialize(&self, room: &str) -> StorageResult<RoomSnapshot> {
        self.store.clear_room(room.to_string()).await?;

        let snapshot = RoomSnapshot::new(tiles::shuffled_bag());
        let entries = vec![
            (FIELD_TILES.to_string(), encode(room, FIELD_TILES, &snapshot.tiles)?),
            (FIELD_PLAYERS.to_string(), encode(room, FIELD_PLAYERS, &snapshot.players)?),
            (
                FIELD_OVERTURNED_LETTERS.to_string(),
                encode(room, FIELD_OVERTURNED_LETTERS, &snapshot.overturned_letters)?,
            ),
            (
                FIELD_OVERTURNED_INDEXES.to_string(),
                encode(room, FIELD_OVERTURNED_INDEXES, &snapshot.overturned_indexes)?,
            ),
            (
                FIELD_TAKEN_INDEXES.to_string(),
                encode(room, FIELD_TAKEN_INDEXES, &snapshot.taken_indexes)?,
            ),
        ];
        self.store.set_fields(room.to_string(), entries).await?;
        Ok(snapshot)
    }

    /// Read the full current snapshot of a room.
    pub async fn load(&self, room: &str) -> StorageResult<RoomSnapshot> {
        let base = self
            .store
            .get_fields(
                room.to_string(),
                vec![
                    FIELD_TILES.to_string(),
                    FIELD_PLAYERS.to_string(),
                    FIELD_OVERTURNED_LETTERS.to_string(),
                    FIELD_OVERTURNED_INDEXES.to_string(),
                    FIELD_TAKEN_INDEXES.to_string(),
                ],
            )
            .await?;

        let mut values = base.into_iter();
        let tiles = decode(room, FIELD_TILES, values.next().flatten())?;
        let players = decode(room, FIELD_PLAYERS, values.next().flatten())?;
        let overturned_letters =
            decode(room, FIELD_OVERTURNED_LETTERS, values.next().flatten())?;
        let overturned_indexes =
            decode(room, FIELD_OVERTURNED_INDEXES, values.next().flatten())?;
        let taken_indexes = decode(room, FIELD_TAKEN_INDEXES, values.next().flatten())?;

        let mut words = IndexMap::new();
        if !players.is_empty() {
            let ledger_values = self
                .store
                .get_fields(room.to_string(), players.iter().map(|p| words_field(p)).collect())
                .await?;
            for (player, value) in players.iter().zip(ledger_values) {
                let ledger = decode(room, &words_field(player), value)?;
                words.insert(player.clone(), ledger);
            }
        }

        Ok(RoomSnapshot {
            tiles,
            overturned_letters,
            overturned_indexes,
            taken_indexes,
            players,
            words,
        })
    }

    /// Write the fields an action changed, as one grouped store write.
    pub async fn persist(
        &self,
        room: &str,
        snapshot: &RoomSnapshot,
        dirty: &[RoomField],
    ) -> StorageResult<()> {
        if dirty.is_empty() {
            return Ok(());
        }

        let mut entries = Vec::with_capacity(dirty.len());
        for field in dirty {
            let (name, values) = match field {
                RoomField::Tiles => (FIELD_TILES.to_string(), &snapshot.tiles),
                RoomField::Players => (FIELD_PLAYERS.to_string(), &snapshot.players),
                RoomField::OverturnedLetters => {
                    (FIELD_OVERTURNED_LETTERS.to_string(), &snapshot.overturned_letters)
                }
                RoomField::OverturnedIndexes => {
                    (FIELD_OVERTURNED_INDEXES.to_string(), &snapshot.overturned_indexes)
                }
                RoomField::TakenIndexes => {
                    (FIELD_TAKEN_INDEXES.to_string(), &snapshot.taken_indexes)
                }
                RoomField::Words(handle) => {
                    let ledger = snapshot.words.get(handle).map(Vec::as_slice).unwrap_or(&[]);
                    let encoded = encode(room, &words_field(handle), ledger)?;
                    entries.push((words_field(handle), encoded));
                    continue;
                }
            };
            entries.push((name.clone(), encode(room, &name, values)?));
        }

        self.store.set_fields(room.to_string(), entries).await
    }
}

fn encode(room: &str, field: &str, values: &[String]) -> StorageResult<String> {
    serde_json::to_string(values).map_err(|source| StorageError::Codec {
        room: room.to_string(),
        field: field.to_string(),
        source,
    })
}

fn decode(room: &str, field: &str, value: Option<String>) -> StorageResult<Vec<String>> {
    let Some(raw) = value else {
        return Ok(Vec::new());
    };
    serde_json::from_str(&raw).map_err(|source| StorageError::Codec {
        room: room.to_string(),
        field: field.to_string(),
        source,
    })
}

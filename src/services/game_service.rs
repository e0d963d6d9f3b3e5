//! Interprets one inbound action against the current room snapshot and
//! publishes the resulting broadcast payload.
//!
//! Processing is stateless per message: read the full snapshot, compute one
//! transition (or none), write the touched fields, publish. Two connections
//! acting on the same room concurrently can still interleave their reads and
//! writes; see DESIGN.md for the accepted lost-update window.

use serde_json::{Map, Value, json};
use tracing::{info, warn};

use crate::{
    dao::rooms::RoomRepository,
    dto::ws::GameAction,
    error::ServiceError,
    services::session::SessionAuth,
    state::{
        SharedState,
        room::{RoomSnapshot, Transition},
    },
};

/// Process one authenticated action to completion and publish the outcome.
///
/// The room is created lazily on the first message addressed to it. `join`
/// only needs authentication; `flip` and `word` additionally require the
/// connection's claim to match the action. An unauthorized action mutates
/// nothing but still triggers a broadcast of the unchanged snapshot.
pub async fn process_action(
    state: &SharedState,
    session: &mut SessionAuth,
    action: GameAction,
) -> Result<(), ServiceError> {
    let store = state.require_room_store().await?;
    let repository = RoomRepository::new(store);
    let room = action.room().to_string();

    if !repository.room_exists(&room).await? {
        info!(%room, "initializing room");
        repository.initialize(&room).await?;
    }
    let snapshot = repository.load(&room).await?;

    let authorized = match &action {
        GameAction::Join { .. } => true,
        _ => session.authorize(action.handle(), action.room()),
    };

    let transition = if authorized {
        apply(&snapshot, &action)
    } else {
        // Skipped mutation, but the current snapshot still goes out to
        // everyone.
        warn!(
            action = action.kind(),
            handle = action.handle(),
            %room,
            "unauthorized action; rebroadcasting unchanged snapshot"
        );
        Transition {
            snapshot,
            dirty: Vec::new(),
        }
    };

    repository
        .persist(&room, &transition.snapshot, &transition.dirty)
        .await?;

    if let GameAction::Join { handle, room } = &action {
        session.record_join(handle, room);
    }

    let payload = broadcast_payload(&action, &transition.snapshot);
    state.wire().publish(payload.to_string());
    Ok(())
}

fn apply(snapshot: &RoomSnapshot, action: &GameAction) -> Transition {
    match action {
        GameAction::Join { handle, .. } => snapshot.join(handle),
        GameAction::Flip {
            tile_letter,
            tile_index,
            ..
        } => snapshot.flip(tile_letter, tile_index),
        GameAction::Word { handle, word, .. } => snapshot.claim_word(handle, word),
    }
}

/// Merge the triggering action's fields (minus the anti-forgery token, which
/// is never part of the action value) with the full room snapshot.
fn broadcast_payload(action: &GameAction, snapshot: &RoomSnapshot) -> Value {
    let mut fields = match serde_json::to_value(action) {
        Ok(Value::Object(map)) => map,
        _ => Map::new(),
    };

    fields.insert(
        "overturned_letters".into(),
        json!(snapshot.overturned_letters),
    );
    fields.insert(
        "overturned_indexes".into(),
        json!(snapshot.overturned_indexes),
    );
    fields.insert("players".into(), json!(snapshot.players));
    fields.insert("tiles".into(), json!(snapshot.tiles));
    for (handle, words) in &snapshot.words {
        fields.insert(format!("{handle}_words"), json!(words));
    }

    Value::Object(fields)
}

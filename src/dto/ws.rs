//! Inbound WebSocket message types.
//!
//! Clients send flat JSON objects whose `action` field selects the operation;
//! every value arrives as a string and is HTML-escaped before any further
//! processing, matching the page script's contract.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use validator::{Validate, ValidationErrors};

use crate::dto::validation::{validate_handle, validate_room_key};

/// Failure to turn a raw frame into a validated inbound message.
#[derive(Debug, Error)]
pub enum InboundParseError {
    /// The frame was not parseable as the expected object shape.
    #[error("malformed payload: {0}")]
    Json(#[from] serde_json::Error),
    /// The frame parsed but carried unusable field values.
    #[error("invalid payload: {0}")]
    Validation(#[from] ValidationErrors),
}

/// Envelope shared by every inbound frame: the anti-forgery token plus the
/// action-specific fields.
#[derive(Debug, Clone, Deserialize)]
pub struct InboundEnvelope {
    /// Anti-forgery token issued to the page session at load time.
    pub authenticity_token: String,
    /// The game action and its fields.
    #[serde(flatten)]
    pub action: GameAction,
}

/// One game action as submitted by a client.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(tag = "action", rename_all = "lowercase")]
pub enum GameAction {
    /// Enter a room, creating it on first touch.
    Join {
        /// Player handle.
        handle: String,
        /// Room key.
        room: String,
    },
    /// Reveal a tile. The claimed letter and position are trusted as-is.
    Flip {
        /// Player handle.
        handle: String,
        /// Room key.
        room: String,
        /// Letter the client claims to have revealed.
        tile_letter: String,
        /// Original bag position of the revealed tile.
        tile_index: String,
    },
    /// Claim a word from the board or by stealing an existing one.
    Word {
        /// Player handle.
        handle: String,
        /// Room key.
        room: String,
        /// The submitted word.
        word: String,
    },
}

impl InboundEnvelope {
    /// Parse and validate a raw text frame.
    pub fn from_json_str(raw: &str) -> Result<Self, InboundParseError> {
        let envelope: Self = serde_json::from_str(raw)?;
        envelope.validate()?;
        Ok(envelope)
    }

    /// HTML-escape every string field before further processing.
    pub fn escaped(self) -> Self {
        Self {
            authenticity_token: escape(self.authenticity_token),
            action: self.action.escaped(),
        }
    }
}

impl Validate for InboundEnvelope {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();

        if let Err(err) = validate_handle(self.action.handle()) {
            errors.add("handle", err);
        }
        if let Err(err) = validate_room_key(self.action.room()) {
            errors.add("room", err);
        }

        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }
}

impl GameAction {
    /// Handle the action claims to act as.
    pub fn handle(&self) -> &str {
        match self {
            Self::Join { handle, .. } | Self::Flip { handle, .. } | Self::Word { handle, .. } => {
                handle
            }
        }
    }

    /// Room the action addresses.
    pub fn room(&self) -> &str {
        match self {
            Self::Join { room, .. } | Self::Flip { room, .. } | Self::Word { room, .. } => room,
        }
    }

    /// Stable action name for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Join { .. } => "join",
            Self::Flip { .. } => "flip",
            Self::Word { .. } => "word",
        }
    }

    fn escaped(self) -> Self {
        match self {
            Self::Join { handle, room } => Self::Join {
                handle: escape(handle),
                room: escape(room),
            },
            Self::Flip {
                handle,
                room,
                tile_letter,
                tile_index,
            } => Self::Flip {
                handle: escape(handle),
                room: escape(room),
                tile_letter: escape(tile_letter),
                tile_index: escape(tile_index),
            },
            Self::Word { handle, room, word } => Self::Word {
                handle: escape(handle),
                room: escape(room),
                word: escape(word),
            },
        }
    }
}

fn escape(value: String) -> String {
    html_escape::encode_safe(&value).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_a_join_frame() {
        let envelope = InboundEnvelope::from_json_str(
            r#"{"authenticity_token":"tok","action":"join","handle":"alice","room":"r1"}"#,
        )
        .unwrap();
        assert_eq!(envelope.authenticity_token, "tok");
        assert_eq!(
            envelope.action,
            GameAction::Join {
                handle: "alice".into(),
                room: "r1".into(),
            }
        );
    }

    #[test]
    fn parses_flip_and_word_frames() {
        let flip = InboundEnvelope::from_json_str(
            r#"{"authenticity_token":"tok","action":"flip","handle":"alice","room":"r1","tile_letter":"C","tile_index":"12"}"#,
        )
        .unwrap();
        assert_eq!(flip.action.kind(), "flip");

        let word = InboundEnvelope::from_json_str(
            r#"{"authenticity_token":"tok","action":"word","handle":"alice","room":"r1","word":"CAT"}"#,
        )
        .unwrap();
        assert_eq!(word.action.kind(), "word");
    }

    #[test]
    fn rejects_unknown_actions_and_missing_fields() {
        assert!(
            InboundEnvelope::from_json_str(
                r#"{"authenticity_token":"tok","action":"shout","handle":"a","room":"r"}"#
            )
            .is_err()
        );
        assert!(
            InboundEnvelope::from_json_str(r#"{"authenticity_token":"tok","action":"flip"}"#)
                .is_err()
        );
        assert!(InboundEnvelope::from_json_str("not json").is_err());
    }

    #[test]
    fn rejects_blank_handle_or_room() {
        assert!(
            InboundEnvelope::from_json_str(
                r#"{"authenticity_token":"tok","action":"join","handle":"","room":"r1"}"#
            )
            .is_err()
        );
        assert!(
            InboundEnvelope::from_json_str(
                r#"{"authenticity_token":"tok","action":"join","handle":"alice","room":" "}"#
            )
            .is_err()
        );
    }

    #[test]
    fn empty_word_is_parseable() {
        // A blank word is a legal frame; the matcher rejects it later, and
        // the action still produces a broadcast.
        let envelope = InboundEnvelope::from_json_str(
            r#"{"authenticity_token":"tok","action":"word","handle":"alice","room":"r1","word":""}"#,
        )
        .unwrap();
        assert_eq!(envelope.action.kind(), "word");
    }

    #[test]
    fn escaping_neutralizes_markup_in_every_field() {
        let envelope = InboundEnvelope::from_json_str(
            r#"{"authenticity_token":"tok","action":"join","handle":"<b>alice</b>","room":"r&1"}"#,
        )
        .unwrap()
        .escaped();
        assert_eq!(
            envelope.action.handle(),
            "&lt;b&gt;alice&lt;/b&gt;"
        );
        assert_eq!(envelope.action.room(), "r&amp;1");
    }

    #[test]
    fn action_serializes_with_its_tag() {
        let action = GameAction::Word {
            handle: "alice".into(),
            room: "r1".into(),
            word: "CAT".into(),
        };
        let value = serde_json::to_value(&action).unwrap();
        assert_eq!(value["action"], "word");
        assert_eq!(value["word"], "CAT");
        assert!(value.get("authenticity_token").is_none());
    }
}

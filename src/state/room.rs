//! Immutable room snapshots and the pure transitions the game engine applies
//! to them.
//!
//! Every action reads one full snapshot, computes at most one transition, and
//! the store write is the only mutation point. This keeps the engine
//! unit-testable without a live store and makes concurrent interleavings
//! easier to reason about.

use indexmap::IndexMap;

use crate::state::matcher::{self, Placement};

/// A persisted room field touched by a transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoomField {
    /// The immutable shuffled tile bag.
    Tiles,
    /// The player roster in join order.
    Players,
    /// Letters revealed so far, in reveal order.
    OverturnedLetters,
    /// Original bag positions, parallel to the overturned letters.
    OverturnedIndexes,
    /// Bag positions consumed into claimed words.
    TakenIndexes,
    /// One player's word ledger.
    Words(String),
}

/// Full state of one room as read from the store.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoomSnapshot {
    /// Shuffled 144-tile bag, fixed at room creation.
    pub tiles: Vec<String>,
    /// Letters revealed so far (duplicates allowed).
    pub overturned_letters: Vec<String>,
    /// Original bag positions, parallel in length and order to
    /// `overturned_letters`.
    pub overturned_indexes: Vec<String>,
    /// Bag positions already consumed into some player's claimed word.
    pub taken_indexes: Vec<String>,
    /// Player handles in join order.
    pub players: Vec<String>,
    /// Per-player word ledgers, keyed by handle in join order.
    pub words: IndexMap<String, Vec<String>>,
}

/// Result of applying one action to a snapshot: the next snapshot plus the
/// persisted fields it touched. An empty `dirty` list means the action was a
/// no-op for the store.
#[derive(Debug, Clone)]
pub struct Transition {
    /// The snapshot after the action.
    pub snapshot: RoomSnapshot,
    /// Fields whose persisted value changed.
    pub dirty: Vec<RoomField>,
}

impl Transition {
    fn unchanged(snapshot: RoomSnapshot) -> Self {
        Self {
            snapshot,
            dirty: Vec::new(),
        }
    }
}

impl RoomSnapshot {
    /// Fresh room state around a newly shuffled bag.
    pub fn new(tiles: Vec<String>) -> Self {
        Self {
            tiles,
            ..Self::default()
        }
    }

    /// `(letter, bag position)` pairs revealed and not yet consumed into a
    /// claimed word.
    pub fn available_pairs(&self) -> Vec<(String, String)> {
        self.overturned_letters
            .iter()
            .zip(&self.overturned_indexes)
            .filter(|(_, index)| !self.taken_indexes.contains(index))
            .map(|(letter, index)| (letter.clone(), index.clone()))
            .collect()
    }

    /// Add `handle` to the roster with an empty ledger. Repeated joins for an
    /// existing handle are harmless no-ops.
    pub fn join(&self, handle: &str) -> Transition {
        if self.players.iter().any(|p| p == handle) {
            return Transition::unchanged(self.clone());
        }

        let mut next = self.clone();
        next.players.push(handle.to_string());
        next.words.insert(handle.to_string(), Vec::new());
        Transition {
            snapshot: next,
            dirty: vec![RoomField::Players, RoomField::Words(handle.to_string())],
        }
    }

    /// Record a tile reveal.
    ///
    /// The claimed `(letter, position)` pair is appended unconditionally: the
    /// caller is trusted not to reveal a position twice or to invent letters.
    /// This is a named trust boundary, not an oversight; hardening it would
    /// mean validating the position against `tiles` and the overturn state.
    pub fn flip(&self, letter: &str, index: &str) -> Transition {
        let mut next = self.clone();
        next.overturned_letters.push(letter.to_string());
        next.overturned_indexes.push(index.to_string());
        Transition {
            snapshot: next,
            dirty: vec![RoomField::OverturnedLetters, RoomField::OverturnedIndexes],
        }
    }

    /// Attempt to claim `word` for `handle`, either from the board or by
    /// stealing an existing ledger word. Returns an unchanged transition when
    /// the word cannot be formed anywhere.
    pub fn claim_word(&self, handle: &str, word: &str) -> Transition {
        let available = self.available_pairs();
        let board_letters: Vec<String> =
            available.iter().map(|(letter, _)| letter.clone()).collect();

        match matcher::locate(word, &board_letters, &self.words) {
            None => Transition::unchanged(self.clone()),
            Some(Placement::Board) => self.claim_from_board(handle, word, available),
            Some(Placement::Ledger {
                handle: victim,
                index,
            }) => self.claim_by_stealing(handle, word, &victim, index),
        }
    }

    fn claim_from_board(
        &self,
        handle: &str,
        word: &str,
        mut available: Vec<(String, String)>,
    ) -> Transition {
        let mut next = self.clone();

        // Consume one distinct available occurrence per letter; removing the
        // matched pair guarantees repeated letters never claim the same tile
        // twice.
        for letter in word.chars() {
            let target = letter.to_uppercase().to_string();
            if let Some(pos) = available
                .iter()
                .position(|(candidate, _)| candidate.to_uppercase() == target)
            {
                let (_, index) = available.remove(pos);
                next.taken_indexes.push(index);
            }
        }

        next.words
            .entry(handle.to_string())
            .or_default()
            .push(word.to_string());
        Transition {
            snapshot: next,
            dirty: vec![
                RoomField::TakenIndexes,
                RoomField::Words(handle.to_string()),
            ],
        }
    }

    fn claim_by_stealing(&self, handle: &str, word: &str, victim: &str, index: usize) -> Transition {
        let mut next = self.clone();

        if let Some(ledger) = next.words.get_mut(victim) {
            if index < ledger.len() {
                ledger.remove(index);
            }
        }
        next.words
            .entry(handle.to_string())
            .or_default()
            .push(word.to_string());

        let mut dirty = vec![RoomField::Words(victim.to_string())];
        if victim != handle {
            dirty.push(RoomField::Words(handle.to_string()));
        }
        Transition {
            snapshot: next,
            dirty,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot_with_board(pairs: &[(&str, &str)]) -> RoomSnapshot {
        let mut snapshot = RoomSnapshot::new(vec!["X".into(); 144]);
        for (letter, index) in pairs {
            snapshot = snapshot.flip(letter, index).snapshot;
        }
        snapshot
    }

    #[test]
    fn join_appends_handle_and_empty_ledger_once() {
        let base = RoomSnapshot::default();
        let joined = base.join("alice");
        assert_eq!(joined.snapshot.players, vec!["alice"]);
        assert_eq!(joined.snapshot.words["alice"], Vec::<String>::new());
        assert_eq!(
            joined.dirty,
            vec![RoomField::Players, RoomField::Words("alice".into())]
        );

        let again = joined.snapshot.join("alice");
        assert_eq!(again.snapshot, joined.snapshot);
        assert!(again.dirty.is_empty());
    }

    #[test]
    fn flip_appends_one_parallel_pair_per_action() {
        let snapshot = snapshot_with_board(&[("C", "4"), ("A", "9")]);
        assert_eq!(snapshot.overturned_letters, vec!["C", "A"]);
        assert_eq!(snapshot.overturned_indexes, vec!["4", "9"]);
        assert_eq!(
            snapshot.overturned_letters.len(),
            snapshot.overturned_indexes.len()
        );
    }

    #[test]
    fn flip_trusts_repeated_positions() {
        // The engine does not police client-claimed positions.
        let snapshot = snapshot_with_board(&[("C", "4"), ("C", "4")]);
        assert_eq!(snapshot.overturned_indexes, vec!["4", "4"]);
    }

    #[test]
    fn board_claim_takes_one_distinct_occurrence_per_letter() {
        let base = snapshot_with_board(&[("E", "0"), ("E", "1"), ("L", "2")])
            .join("alice")
            .snapshot;
        let claimed = base.claim_word("alice", "EEL");
        assert_eq!(claimed.snapshot.taken_indexes, vec!["0", "1", "2"]);
        assert_eq!(claimed.snapshot.words["alice"], vec!["EEL"]);
        assert_eq!(
            claimed.dirty,
            vec![RoomField::TakenIndexes, RoomField::Words("alice".into())]
        );
    }

    #[test]
    fn board_claim_fails_without_enough_duplicates() {
        let base = snapshot_with_board(&[("E", "0"), ("L", "1")])
            .join("alice")
            .snapshot;
        let attempt = base.claim_word("alice", "EEL");
        assert!(attempt.dirty.is_empty());
        assert_eq!(attempt.snapshot, base);
    }

    #[test]
    fn taken_letters_are_not_available_for_later_claims() {
        let base = snapshot_with_board(&[("C", "0"), ("A", "1"), ("T", "2")])
            .join("alice")
            .snapshot;
        let first = base.claim_word("alice", "CAT");
        // The same letters cannot back a second board claim.
        let second = first.snapshot.claim_word("alice", "ACT");
        assert!(second.dirty.is_empty());
    }

    #[test]
    fn stealing_removes_the_victims_entry_and_shifts_positions() {
        let mut base = snapshot_with_board(&[("S", "7")]);
        base = base.join("alice").snapshot;
        base = base.join("bob").snapshot;
        base.words
            .get_mut("alice")
            .unwrap()
            .extend(["ON".to_string(), "CAT".to_string(), "TO".to_string()]);

        let stolen = base.claim_word("bob", "CATS");
        assert_eq!(stolen.snapshot.words["alice"], vec!["ON", "TO"]);
        assert_eq!(stolen.snapshot.words["bob"], vec!["CATS"]);
        assert_eq!(
            stolen.dirty,
            vec![
                RoomField::Words("alice".into()),
                RoomField::Words("bob".into())
            ]
        );
        // Board letters used to extend a steal are not marked taken; this
        // mirrors the source system's observed behavior.
        assert!(stolen.snapshot.taken_indexes.is_empty());
    }

    #[test]
    fn self_steal_touches_a_single_ledger() {
        let mut base = snapshot_with_board(&[("S", "7")]).join("alice").snapshot;
        base.words.get_mut("alice").unwrap().push("CAT".to_string());

        let extended = base.claim_word("alice", "CATS");
        assert_eq!(extended.snapshot.words["alice"], vec!["CATS"]);
        assert_eq!(extended.dirty, vec![RoomField::Words("alice".into())]);
    }

    #[test]
    fn unmatched_word_is_a_no_op() {
        let base = snapshot_with_board(&[("A", "0")]).join("alice").snapshot;
        let attempt = base.claim_word("alice", "QUIZ");
        assert!(attempt.dirty.is_empty());
        assert_eq!(attempt.snapshot, base);
    }
}

//! Pure letter-multiset matching over the board and the players' word ledgers.
//!
//! All comparisons are case-insensitive; letters are normalized to uppercase
//! before counting.

use std::collections::HashMap;

use indexmap::IndexMap;

/// Where a submitted word can legally be formed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Placement {
    /// The word can be built entirely from available board letters.
    Board,
    /// The word steals and extends an existing ledger word.
    Ledger {
        /// Handle of the player whose word is stolen (may be the actor).
        handle: String,
        /// Position of the stolen word in that player's ledger.
        index: usize,
    },
}

fn counts<I>(letters: I) -> HashMap<char, usize>
where
    I: IntoIterator<Item = char>,
{
    let mut map = HashMap::new();
    for letter in letters {
        for upper in letter.to_uppercase() {
            *map.entry(upper).or_insert(0) += 1;
        }
    }
    map
}

fn multiset_covers(candidate: &str, available: HashMap<char, usize>) -> bool {
    // An empty candidate is never satisfiable, even though the trivial subset
    // argument would accept it: blank submissions must not claim anything.
    if candidate.is_empty() {
        return false;
    }

    let mut pool = available;
    for letter in candidate.chars() {
        let mut matched = false;
        for upper in letter.to_uppercase() {
            match pool.get_mut(&upper) {
                Some(count) if *count > 0 => {
                    *count -= 1;
                    matched = true;
                }
                _ => {}
            }
        }
        if !matched {
            return false;
        }
    }
    true
}

/// True iff every letter occurrence in `candidate` can be matched to a
/// distinct occurrence among `available` board letters.
pub fn contains_as_multiset(candidate: &str, available: &[String]) -> bool {
    multiset_covers(candidate, counts(available.iter().flat_map(|s| s.chars())))
}

/// True iff `candidate` contains all of `existing`'s letters and is strictly
/// longer. Equal-length rearrangements of an existing word never count as an
/// extension.
pub fn extends(candidate: &str, existing: &str) -> bool {
    candidate.chars().count() > existing.chars().count()
        && multiset_covers(candidate, counts(existing.chars()))
}

/// Find where `word` can legally be formed, if anywhere.
///
/// Search order is fixed: a board-only claim is always tried first. Failing
/// that, players are scanned in join order and each ledger in claim order;
/// the first ledger word that both completes the multiset (together with the
/// board letters) and is strictly extended by `word` wins. A player may steal
/// from their own ledger.
pub fn locate(
    word: &str,
    board_letters: &[String],
    ledgers: &IndexMap<String, Vec<String>>,
) -> Option<Placement> {
    if contains_as_multiset(word, board_letters) {
        return Some(Placement::Board);
    }

    for (handle, words) in ledgers {
        for (index, existing) in words.iter().enumerate() {
            let mut pool = counts(board_letters.iter().flat_map(|s| s.chars()));
            for (letter, count) in counts(existing.chars()) {
                *pool.entry(letter).or_insert(0) += count;
            }
            if multiset_covers(word, pool) && extends(word, existing) {
                return Some(Placement::Ledger {
                    handle: handle.clone(),
                    index,
                });
            }
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board(letters: &[&str]) -> Vec<String> {
        letters.iter().map(|s| s.to_string()).collect()
    }

    fn ledgers(entries: &[(&str, &[&str])]) -> IndexMap<String, Vec<String>> {
        entries
            .iter()
            .map(|(handle, words)| {
                (
                    handle.to_string(),
                    words.iter().map(|w| w.to_string()).collect(),
                )
            })
            .collect()
    }

    #[test]
    fn multiset_containment_requires_distinct_occurrences() {
        assert!(!contains_as_multiset("EEL", &board(&["E", "L"])));
        assert!(contains_as_multiset("EEL", &board(&["E", "E", "L"])));
        assert!(contains_as_multiset("EEL", &board(&["L", "E", "X", "E"])));
    }

    #[test]
    fn multiset_containment_is_case_insensitive() {
        assert!(contains_as_multiset("cat", &board(&["C", "A", "T"])));
        assert!(contains_as_multiset("CAT", &board(&["c", "a", "t"])));
    }

    #[test]
    fn empty_candidate_is_never_satisfiable() {
        assert!(!contains_as_multiset("", &board(&["E", "L"])));
        assert!(!contains_as_multiset("", &board(&[])));
    }

    #[test]
    fn extends_rejects_equal_length_rearrangements() {
        assert!(!extends("TEA", "EAT"));
        assert!(!extends("EAT", "EAT"));
        assert!(!extends("EA", "EAT"));
        assert!(extends("TEAS", "EAT"));
    }

    #[test]
    fn extends_requires_full_letter_coverage() {
        assert!(!extends("TEAS", "CAT"));
        assert!(extends("SCAT", "CAT"));
    }

    #[test]
    fn locate_prefers_the_board_over_any_steal() {
        let ledgers = ledgers(&[("alice", &["TA"])]);
        // "TAG" is formable from the board alone and by stealing "TA"; the
        // board must win.
        let placement = locate("TAG", &board(&["T", "A", "G"]), &ledgers);
        assert_eq!(placement, Some(Placement::Board));
    }

    #[test]
    fn locate_steals_from_the_earliest_player_and_earliest_word() {
        let ledgers = ledgers(&[("alice", &["ON", "TA"]), ("bob", &["TA"])]);
        let placement = locate("TAG", &board(&["G"]), &ledgers);
        assert_eq!(
            placement,
            Some(Placement::Ledger {
                handle: "alice".into(),
                index: 1,
            })
        );
    }

    #[test]
    fn locate_allows_self_extension() {
        let ledgers = ledgers(&[("alice", &["CAT"])]);
        let placement = locate("CATS", &board(&["S"]), &ledgers);
        assert_eq!(
            placement,
            Some(Placement::Ledger {
                handle: "alice".into(),
                index: 0,
            })
        );
    }

    #[test]
    fn locate_rejects_steals_that_do_not_grow_the_word() {
        let ledgers = ledgers(&[("alice", &["EAT"])]);
        assert_eq!(locate("TEA", &board(&[]), &ledgers), None);
    }

    #[test]
    fn locate_returns_none_when_nothing_matches() {
        let ledgers = ledgers(&[("alice", &["ON"])]);
        assert_eq!(locate("QUIZ", &board(&["Q", "U"]), &ledgers), None);
    }
}

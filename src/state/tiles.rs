//! Tile bag generation for new rooms.

use rand::{rng, seq::SliceRandom};

/// Letter frequency table for a full 144-tile bag, `(letter, count)` pairs.
///
/// This distribution is fixed: every room is dealt the same multiset of
/// letters, only the shuffle order differs.
const LETTER_FREQUENCIES: [(char, usize); 26] = [
    ('A', 13),
    ('B', 3),
    ('C', 3),
    ('D', 6),
    ('E', 18),
    ('F', 3),
    ('G', 4),
    ('H', 3),
    ('I', 12),
    ('J', 2),
    ('K', 2),
    ('L', 5),
    ('M', 3),
    ('N', 8),
    ('O', 11),
    ('P', 3),
    ('Q', 2),
    ('R', 9),
    ('S', 6),
    ('T', 9),
    ('U', 6),
    ('V', 3),
    ('W', 3),
    ('X', 2),
    ('Y', 3),
    ('Z', 2),
];

/// Number of tiles in a freshly generated bag.
pub const BAG_SIZE: usize = 144;

/// Produce a uniformly shuffled 144-tile bag.
///
/// Called exactly once per room at creation; the result is persisted verbatim
/// as the room's `tiles` field and never regenerated unless the room is
/// destructively re-initialized.
pub fn shuffled_bag() -> Vec<String> {
    let mut bag: Vec<String> = LETTER_FREQUENCIES
        .iter()
        .flat_map(|&(letter, count)| std::iter::repeat_n(letter.to_string(), count))
        .collect();
    bag.shuffle(&mut rng());
    bag
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn letter_counts(bag: &[String]) -> HashMap<&str, usize> {
        let mut counts = HashMap::new();
        for letter in bag {
            *counts.entry(letter.as_str()).or_insert(0) += 1;
        }
        counts
    }

    #[test]
    fn bag_has_exactly_144_tiles() {
        assert_eq!(shuffled_bag().len(), BAG_SIZE);
    }

    #[test]
    fn bag_preserves_the_fixed_multiset() {
        let bag = shuffled_bag();
        let counts = letter_counts(&bag);
        assert_eq!(counts["E"], 18);
        assert_eq!(counts["A"], 13);
        assert_eq!(counts["I"], 12);
        assert_eq!(counts["O"], 11);
        assert_eq!(counts["Q"], 2);
        assert_eq!(counts["Z"], 2);
        assert_eq!(counts.values().sum::<usize>(), BAG_SIZE);
    }

    #[test]
    fn repeated_shuffles_preserve_the_multiset_and_vary_order() {
        let first = shuffled_bag();
        // 20 draws with an identical order would mean the shuffle is broken.
        let mut any_differs = false;
        for _ in 0..20 {
            let next = shuffled_bag();
            assert_eq!(letter_counts(&next), letter_counts(&first));
            if next != first {
                any_differs = true;
            }
        }
        assert!(any_differs, "every shuffle produced the same order");
    }
}

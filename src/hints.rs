//! Attempt-count driven hint unlocking.
//!
//! One field unlocks per submitted attempt, broad clues first. Once the last
//! attempt is spent the player also gets the first letter and the answer
//! length so a loss still ends with something concrete.

use crate::normalize::{letter_count, normalize};
use crate::puzzle::{HintField, Puzzle};
use serde::{Deserialize, Serialize};

pub const FIRST_LETTER_LABEL: &str = "First letter";
pub const LENGTH_LABEL: &str = "Length";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HintPolicy {
    /// Attempts that must be spent before the first field unlocks.
    pub unlock_offset: usize,
    /// Attempt count at which the give-away fields unlock.
    pub giveaway_after: usize,
}

impl Default for HintPolicy {
    fn default() -> Self {
        Self {
            unlock_offset: 0,
            giveaway_after: crate::MAX_ATTEMPTS,
        }
    }
}

impl HintPolicy {
    /// Number of the puzzle's own hint fields unlocked after `attempt_count` attempts.
    pub fn unlocked_count(&self, puzzle: &Puzzle, attempt_count: usize) -> usize {
        attempt_count
            .saturating_sub(self.unlock_offset)
            .min(puzzle.hint_fields.len())
    }

    /// Fields unlocked after `attempt_count` attempts, in reveal order.
    ///
    /// Monotonic in `attempt_count`: a larger count always yields a list that
    /// starts with the smaller count's list.
    pub fn revealed_fields(&self, puzzle: &Puzzle, attempt_count: usize) -> Vec<HintField> {
        let mut fields: Vec<HintField> = puzzle
            .hint_fields
            .iter()
            .take(self.unlocked_count(puzzle, attempt_count))
            .cloned()
            .collect();
        if attempt_count >= self.giveaway_after {
            fields.extend(giveaway(puzzle));
        }
        fields
    }
}

/// First letter and letter count of the canonical answer.
pub fn giveaway(puzzle: &Puzzle) -> Vec<HintField> {
    let answer = normalize(&puzzle.answer);
    let first = puzzle
        .answer
        .trim()
        .chars()
        .find(|c| c.is_alphanumeric())
        .map(|c| c.to_uppercase().to_string())
        .unwrap_or_default();
    let letters = letter_count(&answer);
    let words = answer.split(' ').filter(|w| !w.is_empty()).count();
    let length = if words > 1 {
        format!("{letters} letters, {words} words")
    } else {
        format!("{letters} letters")
    };
    vec![
        HintField::new(FIRST_LETTER_LABEL, first),
        HintField::new(LENGTH_LABEL, length),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::puzzle::Domain;

    fn capital() -> Puzzle {
        Puzzle::new("c1", Domain::Capital, "Canberra")
            .with_hint("Continent", "Oceania")
            .with_hint("Country", "Australia")
            .with_hint("Population", "~460,000")
    }

    fn labels(fields: &[HintField]) -> Vec<&str> {
        fields.iter().map(|f| f.label.as_str()).collect()
    }

    #[test]
    fn test_nothing_before_first_attempt() {
        assert!(HintPolicy::default().revealed_fields(&capital(), 0).is_empty());
    }

    #[test]
    fn test_one_field_per_attempt() {
        let policy = HintPolicy::default();
        let puzzle = capital();
        assert_eq!(labels(&policy.revealed_fields(&puzzle, 1)), vec!["Continent"]);
        assert_eq!(
            labels(&policy.revealed_fields(&puzzle, 2)),
            vec!["Continent", "Country"]
        );
    }

    #[test]
    fn test_capped_at_field_count() {
        let policy = HintPolicy::default();
        let puzzle = capital();
        assert_eq!(policy.revealed_fields(&puzzle, 5).len(), 3);
    }

    #[test]
    fn test_monotonic() {
        let policy = HintPolicy::default();
        let puzzle = capital();
        for n in 0..crate::MAX_ATTEMPTS {
            let earlier = policy.revealed_fields(&puzzle, n);
            let later = policy.revealed_fields(&puzzle, n + 1);
            assert!(later.len() >= earlier.len());
            assert_eq!(&later[..earlier.len()], &earlier[..]);
        }
    }

    #[test]
    fn test_giveaway_after_last_attempt() {
        let policy = HintPolicy::default();
        let fields = policy.revealed_fields(&capital(), 6);
        assert_eq!(
            labels(&fields),
            vec!["Continent", "Country", "Population", FIRST_LETTER_LABEL, LENGTH_LABEL]
        );
        assert_eq!(fields[3].value, "C");
        assert_eq!(fields[4].value, "8 letters");
    }

    #[test]
    fn test_giveaway_without_hint_fields() {
        let puzzle = Puzzle::new("p1", Domain::Song, "Bohemian Rhapsody");
        let fields = HintPolicy::default().revealed_fields(&puzzle, 6);
        assert_eq!(fields.len(), 2);
        assert_eq!(fields[0].value, "B");
        assert_eq!(fields[1].value, "16 letters, 2 words");
    }

    #[test]
    fn test_giveaway_uses_first_letter_of_accented_answer() {
        let puzzle = Puzzle::new("p2", Domain::Capital, "Érd");
        let fields = giveaway(&puzzle);
        assert_eq!(fields[0].value, "É");
        assert_eq!(fields[1].value, "3 letters");
    }

    #[test]
    fn test_unlock_offset() {
        let policy = HintPolicy {
            unlock_offset: 2,
            ..HintPolicy::default()
        };
        let puzzle = capital();
        assert!(policy.revealed_fields(&puzzle, 2).is_empty());
        assert_eq!(labels(&policy.revealed_fields(&puzzle, 3)), vec!["Continent"]);
    }
}

use serde::{Deserialize, Serialize};
use std::fmt;

/// Per-letter feedback for one guess position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LetterStatus {
    /// Right letter, right position (green).
    Correct,
    /// Letter occurs elsewhere in the target (yellow).
    Present,
    /// Letter not available in the target (gray).
    Absent,
}

impl LetterStatus {
    /// Parse the `G`/`Y`/`X` shorthand used in test fixtures and logs.
    pub fn from_char(c: char) -> Option<Self> {
        match c.to_ascii_uppercase() {
            'G' => Some(Self::Correct),
            'Y' => Some(Self::Present),
            'X' => Some(Self::Absent),
            _ => None,
        }
    }

    pub fn to_char(self) -> char {
        match self {
            Self::Correct => 'G',
            Self::Present => 'Y',
            Self::Absent => 'X',
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LetterResult {
    pub letter: char,
    pub status: LetterStatus,
    pub position: usize,
}

impl fmt::Display for LetterResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.letter, self.status.to_char())
    }
}

/// Compare a guess against the target, both already normalized.
///
/// Exact matches are resolved first and consume their target letter, so a
/// repeated guess letter is only marked present while unconsumed copies of it
/// remain in the target. Guess positions past the end of the target are absent.
pub fn diff(guess: &str, target: &str) -> Vec<LetterResult> {
    let guess_chars: Vec<char> = guess.chars().collect();
    let mut remaining: Vec<Option<char>> = target.chars().map(Some).collect();
    let mut statuses = vec![LetterStatus::Absent; guess_chars.len()];

    // First pass: exact positions
    for (i, &g) in guess_chars.iter().enumerate() {
        if remaining.get(i).copied().flatten() == Some(g) {
            statuses[i] = LetterStatus::Correct;
            remaining[i] = None;
        }
    }

    // Second pass: letters elsewhere in what is left of the target
    for (i, &g) in guess_chars.iter().enumerate() {
        if statuses[i] == LetterStatus::Correct {
            continue;
        }
        if let Some(pos) = remaining.iter().position(|&c| c == Some(g)) {
            statuses[i] = LetterStatus::Present;
            remaining[pos] = None;
        }
    }

    guess_chars
        .into_iter()
        .zip(statuses)
        .enumerate()
        .map(|(position, (letter, status))| LetterResult {
            letter,
            status,
            position,
        })
        .collect()
}

/// Status sequence only, in guess order.
pub fn statuses(results: &[LetterResult]) -> Vec<LetterStatus> {
    results.iter().map(|r| r.status).collect()
}

/// `G`/`Y`/`X` rendering of a diff, e.g. `"XYGXG"`.
pub fn pattern_string(results: &[LetterResult]) -> String {
    results.iter().map(|r| r.status.to_char()).collect()
}

//! Edit-distance closeness for free-text domains (plants, songs, events).
//!
//! `similarity` is the raw symmetric score. `score_guess` layers the domain
//! rules on top: exact name match, word-level partial match against any
//! accepted name, then edit distance against the closest accepted name.

use crate::normalize::tokens;
use serde::{Deserialize, Serialize};

/// Levenshtein distance over chars (insert, delete, substitute, all cost 1).
pub fn edit_distance(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    if a.is_empty() {
        return b.len();
    }
    if b.is_empty() {
        return a.len();
    }

    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr = vec![0; b.len() + 1];
    for (i, &ca) in a.iter().enumerate() {
        curr[0] = i + 1;
        for (j, &cb) in b.iter().enumerate() {
            let substitution = prev[j] + usize::from(ca != cb);
            curr[j + 1] = substitution.min(prev[j + 1] + 1).min(curr[j] + 1);
        }
        std::mem::swap(&mut prev, &mut curr);
    }
    prev[b.len()]
}

/// Closeness in `[0, 1]` of two normalized strings; 1.0 means identical.
pub fn similarity(a: &str, b: &str) -> f64 {
    let longest = a.chars().count().max(b.chars().count());
    if longest == 0 {
        return 1.0;
    }
    let distance = edit_distance(a, b);
    (longest - distance) as f64 / longest as f64
}

/// "How close was that" wording for a similarity score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Warmth {
    Hot,
    Warm,
    Cool,
    Cold,
}

impl Warmth {
    pub fn label(self) -> &'static str {
        match self {
            Self::Hot => "hot",
            Self::Warm => "warm",
            Self::Cool => "cool",
            Self::Cold => "cold",
        }
    }
}

/// Per-domain scoring knobs. Defaults are product tuning, not invariants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimilarityPolicy {
    /// Fixed score for a guess that matches whole words of an accepted name.
    pub partial_match_score: f64,
    pub hot: f64,
    pub warm: f64,
    pub cool: f64,
}

impl Default for SimilarityPolicy {
    fn default() -> Self {
        Self {
            partial_match_score: 0.75,
            hot: 0.8,
            warm: 0.6,
            cool: 0.4,
        }
    }
}

impl SimilarityPolicy {
    pub fn warmth(&self, score: f64) -> Warmth {
        if score >= self.hot {
            Warmth::Hot
        } else if score >= self.warm {
            Warmth::Warm
        } else if score >= self.cool {
            Warmth::Cool
        } else {
            Warmth::Cold
        }
    }
}

/// True when every word of the shorter side is a word of the longer side,
/// e.g. a genus guessed without its species.
fn is_word_level_partial(guess: &str, name: &str) -> bool {
    let guess_tokens = tokens(guess);
    let name_tokens = tokens(name);
    if guess_tokens.is_empty() || name_tokens.is_empty() || guess_tokens == name_tokens {
        return false;
    }
    let (short, long) = if guess_tokens.len() <= name_tokens.len() {
        (&guess_tokens, &name_tokens)
    } else {
        (&name_tokens, &guess_tokens)
    };
    short.iter().all(|t| long.contains(t))
}

/// Score a normalized guess against every accepted normalized name.
///
/// An exact match scores 1.0. A word-level partial match short-circuits to
/// `policy.partial_match_score` so a correct but incomplete name is not
/// punished by raw character distance. Otherwise the best edit-distance
/// score over all names wins.
pub fn score_guess<'a, I>(guess: &str, accepted_names: I, policy: &SimilarityPolicy) -> f64
where
    I: IntoIterator<Item = &'a str>,
{
    let names: Vec<&str> = accepted_names.into_iter().collect();
    if names.iter().any(|name| *name == guess) {
        return 1.0;
    }
    if names.iter().any(|name| is_word_level_partial(guess, name)) {
        return policy.partial_match_score;
    }
    names
        .iter()
        .map(|name| similarity(guess, name))
        .fold(0.0, f64::max)
}

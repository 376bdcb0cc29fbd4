//! Canonical form for free-text answers.
//!
//! Every comparison in the engine runs on normalized text: lowercase, no
//! diacritics, no punctuation, single spaces between words.

use unicode_normalization::UnicodeNormalization;

/// Separators that split words rather than disappear ("Port-au-Prince").
fn is_word_separator(c: char) -> bool {
    matches!(c, '-' | '_' | '/' | '\u{2010}' | '\u{2013}' | '\u{2014}')
}

/// Normalize a guess or answer for comparison.
///
/// `"São Tomé"` and `"sao tome"` compare equal, as do `"N'Djamena"` and
/// `"ndjamena"`, but `"Rome"` and `"Romea"` do not.
pub fn normalize(raw: &str) -> String {
    raw.to_lowercase()
        .replace('ß', "ss")
        .replace('æ', "ae")
        .replace('œ', "oe")
        .replace('ø', "o")
        .replace('ł', "l")
        .replace('đ', "d")
        .nfd()
        .map(|c| if is_word_separator(c) { ' ' } else { c })
        .filter(|c| c.is_alphanumeric() || c.is_whitespace())
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Words of an already normalized string.
pub fn tokens(normalized: &str) -> Vec<&str> {
    normalized.split(' ').filter(|t| !t.is_empty()).collect()
}

/// Number of letters ignoring the spaces between words.
pub fn letter_count(normalized: &str) -> usize {
    normalized.chars().filter(|c| !c.is_whitespace()).count()
}

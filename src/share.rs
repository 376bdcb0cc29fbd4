//! Emoji-grid share text.
//!
//! Players paste this publicly, so the layout is fixed:
//!
//! ```text
//! Capitale #42 3/6
//!
//! ⬛🟨⬛🟨
//! 🟩🟩⬛⬛⬛
//! 🟩🟩🟩🟩🟩
//! https://dailyguess.example/capital
//! ```
//!
//! A loss scores `X/6` and adds a reveal line before the footer. Hard mode
//! appends `*` to the score. Spaces in multi-word guesses get no cell.

use crate::diff::LetterStatus;
use crate::session::{Attempt, PuzzleSession, SessionStatus};

pub const CORRECT_GLYPH: &str = "🟩";
pub const PRESENT_GLYPH: &str = "🟨";
pub const ABSENT_GLYPH: &str = "⬛";

pub fn glyph(status: LetterStatus) -> &'static str {
    match status {
        LetterStatus::Correct => CORRECT_GLYPH,
        LetterStatus::Present => PRESENT_GLYPH,
        LetterStatus::Absent => ABSENT_GLYPH,
    }
}

pub fn row(statuses: &[LetterStatus]) -> String {
    statuses.iter().map(|s| glyph(*s)).collect()
}

/// Glyph row for one attempt, one cell per letter of the guess.
pub fn attempt_row(attempt: &Attempt) -> String {
    attempt
        .guess_normalized
        .chars()
        .zip(&attempt.letter_statuses)
        .filter(|(letter, _)| !letter.is_whitespace())
        .map(|(_, status)| glyph(*status))
        .collect()
}

/// Render the share text. Pure: depends only on the session's attempts,
/// status and domain settings.
pub fn render(session: &PuzzleSession, puzzle_number: u32) -> String {
    let config = session.config();
    let attempts = session.attempts();
    let score = match session.status() {
        SessionStatus::Lost => "X".to_string(),
        SessionStatus::Won | SessionStatus::Playing => attempts.len().to_string(),
    };
    let hard = if session.hard_mode() { "*" } else { "" };

    let mut lines = vec![
        format!(
            "{} #{} {}/{}{}",
            config.share_title, puzzle_number, score, config.max_attempts, hard
        ),
        String::new(),
    ];
    lines.extend(attempts.iter().map(attempt_row));
    if session.status() == SessionStatus::Lost {
        lines.push(format!("The answer was {}", session.puzzle().answer));
    }
    lines.push(config.share_url.clone());
    lines.join("\n")
}

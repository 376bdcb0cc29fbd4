//! Bounded-attempt session state machine.
//!
//! `playing -> won` or `playing -> lost`, nothing else. A session only changes
//! through `submit_guess` (attempts, status) and `request_hint` (hard-mode
//! reveal count). Rejected guesses leave it untouched.

use crate::config::{Comparator, DomainConfig};
use crate::diff::{self, LetterResult, LetterStatus};
use crate::geo::{self, GeoHint};
use crate::hints;
use crate::lexicon::DomainLexicon;
use crate::normalize::normalize;
use crate::puzzle::{HintField, Puzzle};
use crate::similarity::{self, Warmth};
use crate::{debug_log, info_log};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionStatus {
    Playing,
    Won,
    Lost,
}

impl SessionStatus {
    pub fn is_terminal(self) -> bool {
        !matches!(self, Self::Playing)
    }
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Playing => "playing",
            Self::Won => "won",
            Self::Lost => "lost",
        };
        f.write_str(s)
    }
}

/// Validation failures. The session is unchanged whenever one is returned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GuessError {
    #[error("the puzzle is already {0}")]
    SessionOver(SessionStatus),
    #[error("no attempts left")]
    AttemptsExhausted,
    #[error("enter a guess first")]
    Empty,
    #[error("already guessed '{0}'")]
    Duplicate(String),
    #[error("'{0}' is not in the word list")]
    NotInLexicon(String),
}

/// One evaluated guess. Never modified after it is recorded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attempt {
    pub guess_raw: String,
    pub guess_normalized: String,
    pub letter_statuses: Vec<LetterStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub similarity: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub geo_hint: Option<GeoHint>,
    pub is_correct: bool,
}

impl Attempt {
    /// Letters of the normalized guess paired with their statuses.
    pub fn letters(&self) -> Vec<LetterResult> {
        self.guess_normalized
            .chars()
            .zip(&self.letter_statuses)
            .enumerate()
            .map(|(position, (letter, &status))| LetterResult {
                letter,
                status,
                position,
            })
            .collect()
    }
}

/// The persisted part of a session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionState {
    pub puzzle_id: String,
    pub attempts: Vec<Attempt>,
    pub status: SessionStatus,
    pub hard_mode: bool,
    #[serde(default)]
    pub hints_requested: usize,
}

impl SessionState {
    pub fn new(puzzle_id: impl Into<String>, hard_mode: bool) -> Self {
        Self {
            puzzle_id: puzzle_id.into(),
            attempts: Vec::new(),
            status: SessionStatus::Playing,
            hard_mode,
            hints_requested: 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RestoreError {
    #[error("snapshot belongs to puzzle '{found}', expected '{expected}'")]
    WrongPuzzle { expected: String, found: String },
    #[error("snapshot has {0} attempts, more than allowed")]
    TooManyAttempts(usize),
    #[error("snapshot status {0} does not match its attempts")]
    InconsistentStatus(SessionStatus),
}

fn expected_status(attempts: &[Attempt], max_attempts: usize) -> SessionStatus {
    if attempts.last().is_some_and(|a| a.is_correct) {
        SessionStatus::Won
    } else if attempts.len() >= max_attempts {
        SessionStatus::Lost
    } else {
        SessionStatus::Playing
    }
}

#[derive(Debug)]
pub struct PuzzleSession {
    puzzle: Puzzle,
    config: DomainConfig,
    state: SessionState,
}

impl PuzzleSession {
    pub fn new(puzzle: Puzzle, config: DomainConfig, hard_mode: bool) -> Self {
        let state = SessionState::new(puzzle.id.clone(), hard_mode);
        Self {
            puzzle,
            config,
            state,
        }
    }

    /// Rebuild a session from a snapshot, refusing snapshots that break the
    /// session invariants.
    pub fn restore(
        puzzle: Puzzle,
        config: DomainConfig,
        mut state: SessionState,
    ) -> Result<Self, RestoreError> {
        if state.puzzle_id != puzzle.id {
            return Err(RestoreError::WrongPuzzle {
                expected: puzzle.id.clone(),
                found: state.puzzle_id,
            });
        }
        if state.attempts.len() > config.max_attempts {
            return Err(RestoreError::TooManyAttempts(state.attempts.len()));
        }
        // Only the final attempt may be correct
        let earlier = state
            .attempts
            .split_last()
            .map_or(&[][..], |(_, earlier)| earlier);
        if earlier.iter().any(|a| a.is_correct)
            || state.status != expected_status(&state.attempts, config.max_attempts)
        {
            return Err(RestoreError::InconsistentStatus(state.status));
        }
        state.hints_requested = state
            .hints_requested
            .min(config.hints.revealed_fields(&puzzle, state.attempts.len()).len());
        Ok(Self {
            puzzle,
            config,
            state,
        })
    }

    pub fn puzzle(&self) -> &Puzzle {
        &self.puzzle
    }

    pub fn config(&self) -> &DomainConfig {
        &self.config
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn attempts(&self) -> &[Attempt] {
        &self.state.attempts
    }

    pub fn status(&self) -> SessionStatus {
        self.state.status
    }

    pub fn hard_mode(&self) -> bool {
        self.state.hard_mode
    }

    pub fn attempts_left(&self) -> usize {
        self.config.max_attempts.saturating_sub(self.state.attempts.len())
    }

    /// Normalize and check a guess without recording anything.
    pub fn validate_guess(
        &self,
        raw: &str,
        lexicon: &dyn DomainLexicon,
    ) -> Result<String, GuessError> {
        if self.state.status.is_terminal() {
            return Err(GuessError::SessionOver(self.state.status));
        }
        if self.state.attempts.len() >= self.config.max_attempts {
            return Err(GuessError::AttemptsExhausted);
        }
        let normalized = normalize(raw);
        if normalized.is_empty() {
            return Err(GuessError::Empty);
        }
        if self
            .state
            .attempts
            .iter()
            .any(|a| a.guess_normalized == normalized)
        {
            return Err(GuessError::Duplicate(raw.trim().to_string()));
        }
        if !self.puzzle.accepts(&normalized)
            && !lexicon.is_valid_entry(self.puzzle.domain, &normalized)
        {
            return Err(GuessError::NotInLexicon(raw.trim().to_string()));
        }
        Ok(normalized)
    }

    fn evaluate(&self, raw: &str, normalized: String, lexicon: &dyn DomainLexicon) -> Attempt {
        // Aliases count as correct, but colours always come from the canonical answer
        let is_correct = self.puzzle.accepts(&normalized);
        let answer = self.puzzle.normalized_answer();
        let letter_statuses = diff::statuses(&diff::diff(&normalized, &answer));

        let similarity = match self.config.comparator {
            Comparator::FreeText if is_correct => Some(1.0),
            Comparator::FreeText => {
                let names = self.puzzle.accepted_names();
                Some(similarity::score_guess(
                    &normalized,
                    names.iter().map(String::as_str),
                    &self.config.similarity,
                ))
            }
            Comparator::LetterDiff => None,
        };

        let geo_hint = if self.config.geo {
            match (
                lexicon.coordinates(self.puzzle.domain, &normalized),
                self.puzzle.coordinates,
            ) {
                (Some(guess), Some(target)) => Some(geo::hint(guess, target)),
                _ => {
                    debug_log!("no coordinates for '{}', skipping geo hint", normalized);
                    None
                }
            }
        } else {
            None
        };

        Attempt {
            guess_raw: raw.trim().to_string(),
            guess_normalized: normalized,
            letter_statuses,
            similarity,
            geo_hint,
            is_correct,
        }
    }

    /// Evaluate and record a guess, moving to `won`/`lost` when it ends the game.
    pub fn submit_guess(
        &mut self,
        raw: &str,
        lexicon: &dyn DomainLexicon,
    ) -> Result<&Attempt, GuessError> {
        let normalized = self.validate_guess(raw, lexicon)?;
        let attempt = self.evaluate(raw, normalized, lexicon);
        debug_log!(
            "attempt {} on {}: '{}' correct={}",
            self.state.attempts.len() + 1,
            self.puzzle.storage_key(),
            attempt.guess_normalized,
            attempt.is_correct
        );

        self.state.attempts.push(attempt);
        self.state.status = expected_status(&self.state.attempts, self.config.max_attempts);
        if self.state.status.is_terminal() {
            info_log!(
                "{} finished: {} after {} attempts",
                self.puzzle.storage_key(),
                self.state.status,
                self.state.attempts.len()
            );
        }

        match self.state.attempts.last() {
            Some(attempt) => Ok(attempt),
            None => Err(GuessError::AttemptsExhausted),
        }
    }

    /// Everything the current attempt count has unlocked. A lost game
    /// always ends with the give-away, however short the game was.
    pub fn unlocked_hints(&self) -> Vec<HintField> {
        let attempt_count = self.state.attempts.len();
        let mut fields = self.config.hints.revealed_fields(&self.puzzle, attempt_count);
        if self.state.status == SessionStatus::Lost && attempt_count < self.config.hints.giveaway_after
        {
            fields.extend(hints::giveaway(&self.puzzle));
        }
        fields
    }

    /// Hints the player can see now. Hard mode hides unlocked hints until
    /// they are requested; a finished game shows everything unlocked.
    pub fn visible_hints(&self) -> Vec<HintField> {
        let unlocked = self.unlocked_hints();
        if self.state.hard_mode && !self.state.status.is_terminal() {
            unlocked
                .into_iter()
                .take(self.state.hints_requested)
                .collect()
        } else {
            unlocked
        }
    }

    /// Unlocked hints still hidden by hard mode.
    pub fn pending_hints(&self) -> usize {
        if !self.state.hard_mode || self.state.status.is_terminal() {
            return 0;
        }
        self.unlocked_hints()
            .len()
            .saturating_sub(self.state.hints_requested)
    }

    /// Reveal the next unlocked hint in hard mode. `None` when nothing is waiting.
    pub fn request_hint(&mut self) -> Option<HintField> {
        if self.pending_hints() == 0 {
            return None;
        }
        let field = self.unlocked_hints().get(self.state.hints_requested).cloned()?;
        self.state.hints_requested += 1;
        Some(field)
    }

    pub fn warmth(&self, attempt: &Attempt) -> Option<Warmth> {
        attempt
            .similarity
            .map(|score| self.config.similarity.warmth(score))
    }
}

//! Front-end seam and the loop that plays one day's puzzle.

use crate::config::EngineConfig;
use crate::enrich::{DEFAULT_LOOKUP_TIMEOUT, IllustrationSource};
use crate::geo::Proximity;
use crate::lexicon::DomainLexicon;
use crate::puzzle::{Domain, HintField, Puzzle};
use crate::runner::{Services, SessionRunner};
use crate::session::{Attempt, GuessError, SessionStatus};
use crate::similarity::Warmth;
use crate::{debug_log, info_log};
use chrono::NaiveDate;
use std::sync::Arc;

/// What the player asked for at the prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserAction {
    Guess(String),
    Hint,
    Share,
    Exit,
}

/// Choice offered while no puzzle is available.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnavailableAction {
    Retry,
    Exit,
}

pub struct IntroInfo {
    pub domain: Domain,
    pub title: String,
    pub puzzle_number: u32,
    pub max_attempts: usize,
    pub attempts_left: usize,
    pub hard_mode: bool,
    pub restored: bool,
    pub display_fields: Vec<(String, String)>,
}

/// One attempt row plus the derived feedback bands.
pub struct AttemptView<'a> {
    pub number: usize,
    pub max_attempts: usize,
    pub attempt: &'a Attempt,
    pub warmth: Option<Warmth>,
    pub proximity: Option<Proximity>,
}

pub struct Outcome {
    pub status: SessionStatus,
    pub answer: String,
    pub attempts: usize,
    pub share_text: String,
}

/// Front-end seam; the game loop talks only to this.
pub trait GameInterface {
    fn display_intro(&mut self, info: &IntroInfo);
    fn read_action(&mut self) -> UserAction;
    fn display_attempt(&mut self, view: &AttemptView);
    fn display_rejection(&mut self, error: &GuessError);
    fn display_hints(&mut self, hints: &[HintField], pending: usize);
    fn display_no_hint(&mut self);
    fn display_illustration(&mut self, url: &str);
    fn display_outcome(&mut self, outcome: &Outcome);
    fn display_share(&mut self, text: &str);
    fn display_unavailable(&mut self, domain: Domain, date: NaiveDate);
    fn read_unavailable_action(&mut self) -> UnavailableAction;
    fn display_exit_message(&mut self);
}

/// Everything needed to pick and play one day's puzzle.
pub struct DailyGame<'a> {
    pub source: &'a dyn crate::source::PuzzleSource,
    pub lexicon: &'a dyn DomainLexicon,
    pub config: &'a EngineConfig,
    pub domain: Domain,
    pub date: NaiveDate,
    pub hard_mode: bool,
    pub illustrations: Option<Arc<dyn IllustrationSource>>,
}

fn attempt_view<'a>(runner: &SessionRunner, attempt: &'a Attempt, number: usize) -> AttemptView<'a> {
    let session = runner.session();
    AttemptView {
        number,
        max_attempts: session.config().max_attempts,
        attempt,
        warmth: session.warmth(attempt),
        proximity: attempt
            .geo_hint
            .map(|hint| session.config().proximity.classify(hint.distance_km)),
    }
}

fn outcome(runner: &SessionRunner, puzzle_number: u32) -> Outcome {
    let session = runner.session();
    Outcome {
        status: session.status(),
        answer: session.puzzle().answer.clone(),
        attempts: session.attempts().len(),
        share_text: runner.share_text(puzzle_number),
    }
}

fn show_hints<I: GameInterface>(runner: &SessionRunner, interface: &mut I) {
    let session = runner.session();
    let hints = session.visible_hints();
    let pending = session.pending_hints();
    if !hints.is_empty() || pending > 0 {
        interface.display_hints(&hints, pending);
    }
}

fn hint_signature(runner: &SessionRunner) -> (usize, usize) {
    let session = runner.session();
    (session.visible_hints().len(), session.pending_hints())
}

/// Ask the source for the day's puzzle until one appears or the player gives up.
pub fn resolve_puzzle<I: GameInterface>(
    source: &dyn crate::source::PuzzleSource,
    domain: Domain,
    date: NaiveDate,
    interface: &mut I,
) -> Option<Puzzle> {
    loop {
        if let Some(puzzle) = source.puzzle_for_date(domain, date) {
            return Some(puzzle);
        }
        info_log!("no {} puzzle for {}", domain, date);
        interface.display_unavailable(domain, date);
        match interface.read_unavailable_action() {
            UnavailableAction::Retry => continue,
            UnavailableAction::Exit => {
                interface.display_exit_message();
                return None;
            }
        }
    }
}

/// Play one puzzle through `interface` until it ends or the player exits.
pub fn game_loop<I: GameInterface>(
    runner: &mut SessionRunner,
    lexicon: &dyn DomainLexicon,
    puzzle_number: u32,
    interface: &mut I,
) -> SessionStatus {
    {
        let session = runner.session();
        interface.display_intro(&IntroInfo {
            domain: session.puzzle().domain,
            title: session.config().share_title.clone(),
            puzzle_number,
            max_attempts: session.config().max_attempts,
            attempts_left: session.attempts_left(),
            hard_mode: session.hard_mode(),
            restored: runner.was_restored(),
            display_fields: session
                .puzzle()
                .display_fields
                .iter()
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect(),
        });
        for (i, attempt) in session.attempts().iter().enumerate() {
            interface.display_attempt(&attempt_view(runner, attempt, i + 1));
        }
    }
    show_hints(runner, interface);

    if runner.session().status().is_terminal() {
        interface.display_outcome(&outcome(runner, puzzle_number));
        return runner.session().status();
    }

    let mut illustration_shown = false;
    loop {
        if !illustration_shown {
            if let Some(url) = runner.illustration() {
                interface.display_illustration(url);
                illustration_shown = true;
            }
        }

        match interface.read_action() {
            UserAction::Exit => {
                interface.display_exit_message();
                break;
            }
            UserAction::Share => {
                let text = runner.share_text(puzzle_number);
                interface.display_share(&text);
            }
            UserAction::Hint => match runner.request_hint() {
                Some(_) => show_hints(runner, interface),
                None => interface.display_no_hint(),
            },
            UserAction::Guess(raw) => {
                let before = hint_signature(runner);
                match runner.submit_guess(&raw, lexicon) {
                    Ok(attempt) => {
                        let number = runner.session().attempts().len();
                        interface.display_attempt(&attempt_view(runner, &attempt, number));
                        if hint_signature(runner) != before {
                            show_hints(runner, interface);
                        }
                    }
                    Err(e) => {
                        debug_log!("rejected '{}': {}", raw, e);
                        interface.display_rejection(&e);
                    }
                }
                if runner.session().status().is_terminal() {
                    if !illustration_shown {
                        if let Some(url) = runner.wait_illustration(DEFAULT_LOOKUP_TIMEOUT) {
                            interface.display_illustration(url);
                        }
                    }
                    interface.display_outcome(&outcome(runner, puzzle_number));
                    break;
                }
            }
        }
    }
    runner.session().status()
}

/// Resolve the day's puzzle, open its session and play it.
///
/// Returns `None` when the player left while no puzzle was available.
pub fn play_daily<I: GameInterface>(
    game: &DailyGame,
    services: Services,
    interface: &mut I,
) -> Option<SessionStatus> {
    let puzzle = resolve_puzzle(game.source, game.domain, game.date, interface)?;
    let puzzle_number = game
        .source
        .puzzle_number(game.domain, game.date)
        .unwrap_or(1);
    let config = game.config.domain(game.domain);
    let mut runner = SessionRunner::open(puzzle, config, game.hard_mode, services);
    if let Some(source) = &game.illustrations {
        runner.start_illustration(Arc::clone(source));
    }
    Some(game_loop(&mut runner, game.lexicon, puzzle_number, interface))
}

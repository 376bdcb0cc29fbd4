use crate::game_state::{
    AttemptView, GameInterface, IntroInfo, Outcome, UnavailableAction, UserAction,
};
use crate::puzzle::{Domain, HintField};
use crate::session::{GuessError, SessionStatus};
use crate::share;
use chrono::NaiveDate;
use clap::Parser;
use std::io::BufRead;
use std::path::PathBuf;

/// Daily guessing games in the terminal
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Puzzle domain: capital, city, plant, song, date-event or trivia-term
    #[arg(short = 'd', long = "domain", default_value_t = Domain::Capital)]
    pub domain: Domain,

    /// Play the puzzle for this date (YYYY-MM-DD) instead of today
    #[arg(long = "date")]
    pub date: Option<NaiveDate>,

    /// Puzzle catalog JSON file (defaults to the built-in catalog)
    #[arg(short = 'c', long = "catalog")]
    pub catalog_path: Option<PathBuf>,

    /// Newline-delimited list of valid entries for the chosen domain
    #[arg(short = 'l', long = "lexicon")]
    pub lexicon_path: Option<PathBuf>,

    /// Engine configuration JSON with per-domain overrides
    #[arg(long = "config")]
    pub config_path: Option<PathBuf>,

    /// Directory for saved sessions
    #[arg(long = "store-dir")]
    pub store_dir: Option<PathBuf>,

    /// Hide unlocked hints until requested
    #[arg(long = "hard")]
    pub hard: bool,

    /// Append finished-game results to this JSONL file
    #[arg(long = "results")]
    pub results_path: Option<PathBuf>,
}

#[must_use]
pub fn parse_cli() -> Cli {
    Cli::parse()
}

// UI Input/Output functions

/// Read one trimmed line. `None` on end of input or a read error.
fn read_trimmed<R: BufRead>(reader: &mut R) -> Option<String> {
    let mut input = String::new();
    match reader.read_line(&mut input) {
        Ok(0) => None,
        Ok(_) => Some(input.trim().to_string()),
        Err(e) => {
            log::warn!("failed to read input: {e}");
            None
        }
    }
}

pub fn read_action<R: BufRead>(reader: &mut R) -> UserAction {
    println!("\nEnter your guess ('hint', 'share' or 'exit'):");
    let Some(input) = read_trimmed(reader) else {
        return UserAction::Exit;
    };
    match input.to_lowercase().as_str() {
        "exit" | "quit" => UserAction::Exit,
        "hint" => UserAction::Hint,
        "share" => UserAction::Share,
        _ => UserAction::Guess(input),
    }
}

pub fn read_unavailable_action<R: BufRead>(reader: &mut R) -> UnavailableAction {
    println!("Type 'retry' to check again or 'exit' to quit:");
    let Some(input) = read_trimmed(reader) else {
        return UnavailableAction::Exit;
    };
    match input.to_lowercase().as_str() {
        "retry" | "r" => UnavailableAction::Retry,
        _ => UnavailableAction::Exit,
    }
}

/// Uppercased guess followed by its G/Y/X pattern.
pub fn format_letters(view: &AttemptView) -> String {
    let letters: String = view
        .attempt
        .letters()
        .iter()
        .map(|l| l.letter.to_uppercase().to_string())
        .collect();
    let pattern: String = view
        .attempt
        .letter_statuses
        .iter()
        .map(|s| s.to_char())
        .collect();
    format!("{letters}  {pattern}")
}

pub fn format_attempt(view: &AttemptView) -> String {
    let mut line = format!(
        "{}/{}  {}  {}",
        view.number,
        view.max_attempts,
        share::attempt_row(view.attempt),
        format_letters(view)
    );
    if let (Some(score), Some(warmth)) = (view.attempt.similarity, view.warmth) {
        if !view.attempt.is_correct {
            line.push_str(&format!("  {} ({:.0}%)", warmth.label(), score * 100.0));
        }
    }
    if let Some(hint) = view.attempt.geo_hint {
        line.push_str(&format!(
            "  {:.0} km {} {}",
            hint.distance_km,
            hint.direction.arrow(),
            hint.direction
        ));
        if let Some(proximity) = view.proximity {
            line.push_str(&format!(" ({})", proximity.label()));
        }
    }
    if view.attempt.is_correct {
        line.push_str("  ✓");
    }
    line
}

pub fn display_intro(info: &IntroInfo) {
    let mode = if info.hard_mode { " [hard mode]" } else { "" };
    println!("{} #{} ({}){}", info.title, info.puzzle_number, info.domain, mode);
    for (key, value) in &info.display_fields {
        println!("{key}: {value}");
    }
    if info.restored {
        println!("Resuming saved game.");
    }
    println!(
        "{} of {} attempts left.",
        info.attempts_left, info.max_attempts
    );
}

pub fn display_hints(hints: &[HintField], pending: usize) {
    if !hints.is_empty() {
        println!("Hints:");
        for hint in hints {
            println!("  {}: {}", hint.label, hint.value);
        }
    }
    if pending > 0 {
        println!("({pending} hint(s) unlocked, type 'hint' to reveal)");
    }
}

pub fn display_outcome(outcome: &Outcome) {
    match outcome.status {
        SessionStatus::Won => println!(
            "\nSolved in {} attempt(s)! The answer was {}.",
            outcome.attempts, outcome.answer
        ),
        SessionStatus::Lost => println!("\nOut of attempts. The answer was {}.", outcome.answer),
        SessionStatus::Playing => {}
    }
    println!("\n{}", outcome.share_text);
}

pub fn display_exit_message() {
    println!("Exiting.");
}

/// CLI implementation of the GameInterface trait over any `BufRead`.
pub struct CliInterface<R: BufRead> {
    reader: R,
}

impl<R: BufRead> CliInterface<R> {
    pub fn new(reader: R) -> Self {
        Self { reader }
    }
}

impl<R: BufRead> GameInterface for CliInterface<R> {
    fn display_intro(&mut self, info: &IntroInfo) {
        display_intro(info);
    }

    fn read_action(&mut self) -> UserAction {
        read_action(&mut self.reader)
    }

    fn display_attempt(&mut self, view: &AttemptView) {
        println!("{}", format_attempt(view));
    }

    fn display_rejection(&mut self, error: &GuessError) {
        println!("Invalid guess: {error}.");
    }

    fn display_hints(&mut self, hints: &[HintField], pending: usize) {
        display_hints(hints, pending);
    }

    fn display_no_hint(&mut self) {
        println!("No hint to reveal right now.");
    }

    fn display_illustration(&mut self, url: &str) {
        println!("Illustration: {url}");
    }

    fn display_outcome(&mut self, outcome: &Outcome) {
        display_outcome(outcome);
    }

    fn display_share(&mut self, text: &str) {
        println!("\n{text}");
    }

    fn display_unavailable(&mut self, domain: Domain, date: NaiveDate) {
        println!("No {domain} puzzle is available for {date}.");
    }

    fn read_unavailable_action(&mut self) -> UnavailableAction {
        read_unavailable_action(&mut self.reader)
    }

    fn display_exit_message(&mut self) {
        display_exit_message();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diff::LetterStatus;
    use crate::geo::{Direction, GeoHint, Proximity};
    use crate::session::Attempt;
    use crate::similarity::Warmth;
    use std::io::Cursor;

    #[test]
    fn test_parse_cli_defaults() {
        let cli = Cli::try_parse_from(["daily-guess"]).unwrap();
        assert_eq!(cli.domain, Domain::Capital);
        assert_eq!(cli.date, None);
        assert!(!cli.hard);
        assert!(cli.catalog_path.is_none());
    }

    #[test]
    fn test_parse_cli_all_flags() {
        let cli = Cli::try_parse_from([
            "daily-guess",
            "--domain",
            "plant",
            "--date",
            "2025-02-14",
            "--catalog",
            "cat.json",
            "--lexicon",
            "plants.txt",
            "--config",
            "engine.json",
            "--store-dir",
            "/tmp/sessions",
            "--hard",
            "--results",
            "results.jsonl",
        ])
        .unwrap();
        assert_eq!(cli.domain, Domain::Plant);
        assert_eq!(cli.date, NaiveDate::from_ymd_opt(2025, 2, 14));
        assert_eq!(cli.catalog_path, Some(PathBuf::from("cat.json")));
        assert_eq!(cli.lexicon_path, Some(PathBuf::from("plants.txt")));
        assert_eq!(cli.config_path, Some(PathBuf::from("engine.json")));
        assert_eq!(cli.store_dir, Some(PathBuf::from("/tmp/sessions")));
        assert!(cli.hard);
        assert_eq!(cli.results_path, Some(PathBuf::from("results.jsonl")));
    }

    #[test]
    fn test_parse_cli_rejects_unknown_domain() {
        assert!(Cli::try_parse_from(["daily-guess", "--domain", "weather"]).is_err());
    }

    #[test]
    fn test_parse_cli_rejects_bad_date() {
        assert!(Cli::try_parse_from(["daily-guess", "--date", "2025-13-40"]).is_err());
    }

    #[test]
    fn test_read_action_guess_keeps_case() {
        let mut reader = Cursor::new("  New Delhi \n");
        assert_eq!(
            read_action(&mut reader),
            UserAction::Guess("New Delhi".to_string())
        );
    }

    #[test]
    fn test_read_action_commands() {
        let mut reader = Cursor::new("HINT\nshare\nExit\nquit\n");
        assert_eq!(read_action(&mut reader), UserAction::Hint);
        assert_eq!(read_action(&mut reader), UserAction::Share);
        assert_eq!(read_action(&mut reader), UserAction::Exit);
        assert_eq!(read_action(&mut reader), UserAction::Exit);
    }

    #[test]
    fn test_read_action_empty_line_is_a_guess() {
        let mut reader = Cursor::new("\n");
        assert_eq!(read_action(&mut reader), UserAction::Guess(String::new()));
    }

    #[test]
    fn test_read_action_eof_exits() {
        let mut reader = Cursor::new("");
        assert_eq!(read_action(&mut reader), UserAction::Exit);
    }

    #[test]
    fn test_read_unavailable_action() {
        let mut reader = Cursor::new("retry\nr\nnope\n");
        assert_eq!(read_unavailable_action(&mut reader), UnavailableAction::Retry);
        assert_eq!(read_unavailable_action(&mut reader), UnavailableAction::Retry);
        assert_eq!(read_unavailable_action(&mut reader), UnavailableAction::Exit);
        assert_eq!(read_unavailable_action(&mut reader), UnavailableAction::Exit);
    }

    fn attempt(guess: &str, pattern: &str) -> Attempt {
        Attempt {
            guess_raw: guess.to_string(),
            guess_normalized: guess.to_lowercase(),
            letter_statuses: pattern.chars().filter_map(LetterStatus::from_char).collect(),
            similarity: None,
            geo_hint: None,
            is_correct: pattern.chars().all(|c| c == 'G'),
        }
    }

    #[test]
    fn test_format_letter_attempt() {
        let a = attempt("Padua", "GGXXX");
        let view = AttemptView {
            number: 2,
            max_attempts: 6,
            attempt: &a,
            warmth: None,
            proximity: None,
        };
        assert_eq!(format_attempt(&view), "2/6  🟩🟩⬛⬛⬛  PADUA  GGXXX");
    }

    #[test]
    fn test_format_attempt_with_geo_hint() {
        let mut a = attempt("Rome", "XYXX");
        a.geo_hint = Some(GeoHint {
            distance_km: 2007.4,
            direction: Direction::N,
        });
        let view = AttemptView {
            number: 1,
            max_attempts: 6,
            attempt: &a,
            warmth: None,
            proximity: Some(Proximity::FarAway),
        };
        let line = format_attempt(&view);
        assert!(line.ends_with("2007 km ⬆️ N (far away)"), "{line}");
    }

    #[test]
    fn test_format_attempt_with_warmth() {
        let mut a = attempt("oak", "XXX");
        a.similarity = Some(0.61);
        let view = AttemptView {
            number: 3,
            max_attempts: 6,
            attempt: &a,
            warmth: Some(Warmth::Warm),
            proximity: None,
        };
        assert!(format_attempt(&view).ends_with("warm (61%)"));
    }
}

// Library interface for daily-guess
// This allows integration tests and other front-ends to drive the engine

/// Hard ceiling on attempts per puzzle; domain configs may only lower it.
pub const MAX_ATTEMPTS: usize = 6;

pub mod cli;
pub mod config;
pub mod diff;
pub mod enrich;
pub mod events;
pub mod game_state;
pub mod geo;
pub mod hints;
pub mod lexicon;
pub mod logging;
pub mod normalize;
pub mod puzzle;
pub mod runner;
pub mod session;
pub mod share;
pub mod similarity;
pub mod sink;
pub mod source;
pub mod store;

// Re-export commonly used items for easier testing
pub use config::{Comparator, DomainConfig, EngineConfig};
pub use diff::{LetterResult, LetterStatus, diff};
pub use game_state::{GameInterface, UserAction, game_loop, play_daily};
pub use lexicon::{DomainLexicon, OpenLexicon, WordListLexicon};
pub use normalize::normalize;
pub use puzzle::{Domain, HintField, Puzzle};
pub use runner::{Services, SessionRunner};
pub use session::{Attempt, GuessError, PuzzleSession, SessionState, SessionStatus};
pub use source::{CatalogSource, PuzzleSource};
pub use store::{FileStore, MemoryStore, SessionStore};

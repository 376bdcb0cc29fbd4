//! Optional lookups that decorate a puzzle (illustrations and the like).
//!
//! Lookups run off the caller's thread and can only degrade: an error, a
//! timeout, or a result for a puzzle the player has already left all end up
//! as "nothing to show".

use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, TryRecvError};
use std::thread;
use std::time::Duration;
use thiserror::Error;

/// Upper bound for waiting on a lookup when the caller chooses to block.
pub const DEFAULT_LOOKUP_TIMEOUT: Duration = Duration::from_secs(3);

#[derive(Debug, Error)]
pub enum LookupError {
    #[error("lookup failed: {0}")]
    Failed(String),
    #[error("nothing found")]
    NotFound,
}

/// A lookup result tagged with the puzzle it was started for.
#[derive(Debug, Clone, PartialEq)]
pub struct Tagged<T> {
    pub puzzle_id: String,
    pub value: T,
}

pub struct PendingLookup<T> {
    puzzle_id: String,
    receiver: Receiver<Result<T, LookupError>>,
    done: bool,
}

/// Run `lookup` on a worker thread for `puzzle_id`.
pub fn spawn_lookup<T, F>(puzzle_id: &str, lookup: F) -> PendingLookup<T>
where
    T: Send + 'static,
    F: FnOnce() -> Result<T, LookupError> + Send + 'static,
{
    let (sender, receiver) = mpsc::channel();
    thread::spawn(move || {
        // Receiver is gone once the player has moved on
        let _ = sender.send(lookup());
    });
    PendingLookup {
        puzzle_id: puzzle_id.to_string(),
        receiver,
        done: false,
    }
}

impl<T> PendingLookup<T> {
    pub fn puzzle_id(&self) -> &str {
        &self.puzzle_id
    }

    pub fn is_done(&self) -> bool {
        self.done
    }

    fn settle(&mut self, result: Result<T, LookupError>) -> Option<Tagged<T>> {
        self.done = true;
        match result {
            Ok(value) => Some(Tagged {
                puzzle_id: self.puzzle_id.clone(),
                value,
            }),
            Err(e) => {
                log::warn!("lookup for puzzle {} degraded: {}", self.puzzle_id, e);
                None
            }
        }
    }

    /// Non-blocking check. `None` while still running or once settled.
    pub fn poll(&mut self) -> Option<Tagged<T>> {
        if self.done {
            return None;
        }
        match self.receiver.try_recv() {
            Ok(result) => self.settle(result),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => {
                self.done = true;
                log::warn!("lookup for puzzle {} vanished", self.puzzle_id);
                None
            }
        }
    }

    /// Block up to `timeout`; a timeout settles the lookup as unavailable.
    pub fn wait(&mut self, timeout: Duration) -> Option<Tagged<T>> {
        if self.done {
            return None;
        }
        match self.receiver.recv_timeout(timeout) {
            Ok(result) => self.settle(result),
            Err(RecvTimeoutError::Timeout) => {
                self.done = true;
                log::warn!(
                    "lookup for puzzle {} timed out after {:?}",
                    self.puzzle_id,
                    timeout
                );
                None
            }
            Err(RecvTimeoutError::Disconnected) => {
                self.done = true;
                None
            }
        }
    }
}

/// Holds at most one enrichment value, always for the current puzzle.
#[derive(Debug, Clone)]
pub struct EnrichmentSlot<T> {
    current_puzzle: String,
    value: Option<T>,
}

impl<T> EnrichmentSlot<T> {
    pub fn new(current_puzzle: &str) -> Self {
        Self {
            current_puzzle: current_puzzle.to_string(),
            value: None,
        }
    }

    /// Switch puzzles, dropping whatever belonged to the previous one.
    pub fn reset(&mut self, puzzle_id: &str) {
        self.current_puzzle = puzzle_id.to_string();
        self.value = None;
    }

    /// Store a result if it belongs to the current puzzle. Returns whether it was kept.
    pub fn accept(&mut self, result: Tagged<T>) -> bool {
        if result.puzzle_id != self.current_puzzle {
            log::debug!(
                "discarding stale lookup for {} (now on {})",
                result.puzzle_id,
                self.current_puzzle
            );
            return false;
        }
        self.value = Some(result.value);
        true
    }

    pub fn get(&self) -> Option<&T> {
        self.value.as_ref()
    }
}

/// Where a puzzle's illustration URL comes from.
pub trait IllustrationSource: Send + Sync {
    fn illustration_for(&self, puzzle_id: &str) -> Result<String, LookupError>;
}

/// Start an illustration lookup for `puzzle_id` on a worker thread.
pub fn lookup_illustration(
    source: Arc<dyn IllustrationSource>,
    puzzle_id: &str,
) -> PendingLookup<String> {
    let id = puzzle_id.to_string();
    spawn_lookup(puzzle_id, move || source.illustration_for(&id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    struct Fixed(HashMap<String, String>);

    impl IllustrationSource for Fixed {
        fn illustration_for(&self, puzzle_id: &str) -> Result<String, LookupError> {
            self.0.get(puzzle_id).cloned().ok_or(LookupError::NotFound)
        }
    }

    #[test]
    fn test_successful_lookup() {
        let mut pending = spawn_lookup("p1", || Ok::<_, LookupError>(42));
        let tagged = pending.wait(Duration::from_secs(5)).unwrap();
        assert_eq!(tagged.puzzle_id, "p1");
        assert_eq!(tagged.value, 42);
        assert!(pending.is_done());
        assert!(pending.poll().is_none());
    }

    #[test]
    fn test_failed_lookup_degrades() {
        let mut pending =
            spawn_lookup::<u32, _>("p1", || Err(LookupError::Failed("offline".into())));
        assert!(pending.wait(Duration::from_secs(5)).is_none());
        assert!(pending.is_done());
    }

    #[test]
    fn test_timeout_degrades() {
        let mut pending = spawn_lookup("p1", || {
            thread::sleep(Duration::from_millis(500));
            Ok::<_, LookupError>(1)
        });
        assert!(pending.wait(Duration::from_millis(10)).is_none());
        assert!(pending.is_done());
    }

    #[test]
    fn test_slot_discards_stale_results() {
        let mut slot = EnrichmentSlot::new("day-1");
        slot.reset("day-2");
        let stale = Tagged {
            puzzle_id: "day-1".to_string(),
            value: "old.png".to_string(),
        };
        assert!(!slot.accept(stale));
        assert!(slot.get().is_none());

        let fresh = Tagged {
            puzzle_id: "day-2".to_string(),
            value: "new.png".to_string(),
        };
        assert!(slot.accept(fresh));
        assert_eq!(slot.get().map(String::as_str), Some("new.png"));
    }

    #[test]
    fn test_illustration_lookup() {
        let mut images = HashMap::new();
        images.insert("p1".to_string(), "https://img.example/p1.jpg".to_string());
        let source: Arc<dyn IllustrationSource> = Arc::new(Fixed(images));

        let mut found = lookup_illustration(Arc::clone(&source), "p1");
        let tagged = found.wait(Duration::from_secs(5)).unwrap();
        assert_eq!(tagged.value, "https://img.example/p1.jpg");

        let mut missing = lookup_illustration(source, "p2");
        assert!(missing.wait(Duration::from_secs(5)).is_none());
    }
}

//! A session plus its side effects: persistence, result reporting, events
//! and the optional illustration lookup.
//!
//! None of the side effects can fail a guess. Store and sink errors are
//! logged and dropped; the session state is already updated by then.

use crate::config::DomainConfig;
use crate::enrich::{self, EnrichmentSlot, IllustrationSource, PendingLookup};
use crate::events::{EventListener, SessionEvent};
use crate::lexicon::DomainLexicon;
use crate::puzzle::{HintField, Puzzle};
use crate::session::{Attempt, GuessError, PuzzleSession, SessionState};
use crate::share;
use crate::sink::{GameResult, ResultsSink};
use crate::store::SessionStore;
use crate::{debug_log, info_log};
use std::sync::Arc;

/// Collaborators a runner reports to.
pub struct Services<'a> {
    pub store: &'a mut dyn SessionStore,
    pub sink: &'a dyn ResultsSink,
    pub listeners: Vec<Box<dyn EventListener + 'a>>,
}

impl<'a> Services<'a> {
    pub fn new(store: &'a mut dyn SessionStore, sink: &'a dyn ResultsSink) -> Self {
        Self {
            store,
            sink,
            listeners: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_listener<L: EventListener + 'a>(mut self, listener: L) -> Self {
        self.listeners.push(Box::new(listener));
        self
    }
}

pub struct SessionRunner<'a> {
    session: PuzzleSession,
    key: String,
    restored: bool,
    services: Services<'a>,
    illustration: EnrichmentSlot<String>,
    pending_illustration: Option<PendingLookup<String>>,
}

fn restore_from(
    store: &dyn SessionStore,
    key: &str,
    puzzle: &Puzzle,
    config: &DomainConfig,
) -> Option<PuzzleSession> {
    let state: SessionState = match store.load(key) {
        Ok(Some(state)) => state,
        Ok(None) => return None,
        Err(e) => {
            log::warn!("could not load session {key}: {e}");
            return None;
        }
    };
    match PuzzleSession::restore(puzzle.clone(), config.clone(), state) {
        Ok(session) => Some(session),
        Err(e) => {
            log::warn!("discarding stored session {key}: {e}");
            None
        }
    }
}

impl<'a> SessionRunner<'a> {
    /// Restore the session for `puzzle` from the store, or start a new one.
    ///
    /// `hard_mode` only applies to a new session; a restored one keeps its own.
    pub fn open(
        puzzle: Puzzle,
        config: DomainConfig,
        hard_mode: bool,
        services: Services<'a>,
    ) -> Self {
        let key = puzzle.storage_key();
        let restored = restore_from(&*services.store, &key, &puzzle, &config);
        let is_restored = restored.is_some();
        let session =
            restored.unwrap_or_else(|| PuzzleSession::new(puzzle, config, hard_mode));
        info_log!(
            "opened {} ({}, {} attempts)",
            key,
            if is_restored { "restored" } else { "new" },
            session.attempts().len()
        );

        let illustration = EnrichmentSlot::new(&session.puzzle().id);
        let mut runner = Self {
            session,
            key,
            restored: is_restored,
            services,
            illustration,
            pending_illustration: None,
        };
        let event = SessionEvent::Created {
            domain: runner.session.puzzle().domain,
            puzzle_id: runner.session.puzzle().id.clone(),
            restored: is_restored,
        };
        runner.emit(&event);
        runner
    }

    pub fn session(&self) -> &PuzzleSession {
        &self.session
    }

    pub fn was_restored(&self) -> bool {
        self.restored
    }

    pub fn storage_key(&self) -> &str {
        &self.key
    }

    fn emit(&mut self, event: &SessionEvent) {
        for listener in &mut self.services.listeners {
            listener.on_event(event);
        }
    }

    fn persist(&mut self) {
        if let Err(e) = self.services.store.save(&self.key, self.session.state()) {
            log::warn!("could not save session {}: {}", self.key, e);
        }
    }

    fn report(&mut self) {
        let result = GameResult {
            domain: self.session.puzzle().domain,
            success: self.session.status() == crate::session::SessionStatus::Won,
            attempts: self.session.attempts().len(),
        };
        debug_log!("reporting {:?}", result);
        if let Err(e) = self.services.sink.report_result(result) {
            log::warn!("could not report result for {}: {}", self.key, e);
        }
    }

    /// Submit a guess, persist the new state, and report once on the
    /// transition into a finished game.
    pub fn submit_guess(
        &mut self,
        raw: &str,
        lexicon: &dyn DomainLexicon,
    ) -> Result<Attempt, GuessError> {
        let was_terminal = self.session.status().is_terminal();
        let attempt = match self.session.submit_guess(raw, lexicon) {
            Ok(attempt) => attempt.clone(),
            Err(e) => {
                self.emit(&SessionEvent::GuessRejected {
                    reason: e.to_string(),
                });
                return Err(e);
            }
        };

        self.emit(&SessionEvent::GuessSubmitted {
            attempt_number: self.session.attempts().len(),
            correct: attempt.is_correct,
        });
        self.persist();

        let status = self.session.status();
        if !was_terminal && status.is_terminal() {
            self.report();
            self.emit(&SessionEvent::Finished {
                status,
                attempts: self.session.attempts().len(),
            });
        }
        Ok(attempt)
    }

    /// Hard-mode hint request; persisted when something is revealed.
    pub fn request_hint(&mut self) -> Option<HintField> {
        let field = self.session.request_hint()?;
        self.emit(&SessionEvent::HintRevealed {
            label: field.label.clone(),
        });
        self.persist();
        Some(field)
    }

    pub fn share_text(&self, puzzle_number: u32) -> String {
        share::render(&self.session, puzzle_number)
    }

    /// Kick off the illustration lookup for this puzzle.
    pub fn start_illustration(&mut self, source: Arc<dyn IllustrationSource>) {
        let puzzle_id = self.session.puzzle().id.clone();
        self.illustration.reset(&puzzle_id);
        self.pending_illustration = Some(enrich::lookup_illustration(source, &puzzle_id));
    }

    /// Illustration URL if the lookup has finished successfully. Never blocks.
    pub fn illustration(&mut self) -> Option<&str> {
        if let Some(pending) = self.pending_illustration.as_mut() {
            if let Some(tagged) = pending.poll() {
                self.illustration.accept(tagged);
            }
            if pending.is_done() {
                self.pending_illustration = None;
            }
        }
        self.illustration.get().map(String::as_str)
    }

    /// Like `illustration`, but waits up to `timeout` for a pending lookup.
    pub fn wait_illustration(&mut self, timeout: std::time::Duration) -> Option<&str> {
        if let Some(mut pending) = self.pending_illustration.take() {
            if let Some(tagged) = pending.wait(timeout) {
                self.illustration.accept(tagged);
            }
        }
        self.illustration.get().map(String::as_str)
    }
}

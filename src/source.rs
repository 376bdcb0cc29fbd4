//! Where each day's puzzle comes from.

use crate::enrich::{IllustrationSource, LookupError};
use crate::puzzle::{Domain, Puzzle};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::Path;
use thiserror::Error;

pub const EMBEDDED_CATALOG: &str = include_str!("resources/catalog.json");

/// Joins a catalog id and the serving date in rotated puzzle ids.
pub const DATE_SEPARATOR: char = '@';

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("failed to read catalog: {0}")]
    Io(#[from] io::Error),
    #[error("invalid catalog: {0}")]
    Json(#[from] serde_json::Error),
    #[error("duplicate puzzle id '{0}'")]
    DuplicateId(String),
    #[error("puzzle id '{0}' contains '{DATE_SEPARATOR}'")]
    InvalidId(String),
}

/// Deterministic daily puzzles: same (domain, date) gives the same puzzle.
pub trait PuzzleSource {
    /// `None` means no puzzle is configured for that day.
    fn puzzle_for_date(&self, domain: Domain, date: NaiveDate) -> Option<Puzzle>;

    /// Running number shown in the share text.
    fn puzzle_number(&self, _domain: Domain, _date: NaiveDate) -> Option<u32> {
        None
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogEntry {
    /// Pinned entries only ever appear on this date.
    #[serde(default)]
    pub date: Option<NaiveDate>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(flatten)]
    pub puzzle: Puzzle,
}

/// Puzzle catalog loaded from JSON.
///
/// Unpinned entries rotate by the number of days since `epoch`, in file order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogSource {
    pub epoch: NaiveDate,
    pub puzzles: Vec<CatalogEntry>,
}

impl CatalogSource {
    pub fn from_json(data: &str) -> Result<Self, SourceError> {
        let catalog: Self = serde_json::from_str(data)?;
        let mut seen = std::collections::HashSet::new();
        for entry in &catalog.puzzles {
            if entry.puzzle.id.contains(DATE_SEPARATOR) {
                return Err(SourceError::InvalidId(entry.puzzle.id.clone()));
            }
            if !seen.insert(entry.puzzle.storage_key()) {
                return Err(SourceError::DuplicateId(entry.puzzle.id.clone()));
            }
        }
        Ok(catalog)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, SourceError> {
        Self::from_json(&fs::read_to_string(path)?)
    }

    pub fn embedded() -> Result<Self, SourceError> {
        Self::from_json(EMBEDDED_CATALOG)
    }

    fn day_index(&self, date: NaiveDate) -> Option<i64> {
        let days = (date - self.epoch).num_days();
        (days >= 0).then_some(days)
    }

    fn entry_for(&self, domain: Domain, date: NaiveDate) -> Option<&CatalogEntry> {
        let days = self.day_index(date)?;
        let in_domain = || self.puzzles.iter().filter(move |e| e.puzzle.domain == domain);
        if let Some(pinned) = in_domain().find(|e| e.date == Some(date)) {
            return Some(pinned);
        }
        let rotation: Vec<&CatalogEntry> = in_domain().filter(|e| e.date.is_none()).collect();
        if rotation.is_empty() {
            return None;
        }
        let index = usize::try_from(days).ok()? % rotation.len();
        rotation.get(index).copied()
    }
}

/// Rotated entries recur, so their id is suffixed with the day they are served on.
fn dated_id(id: &str, date: NaiveDate) -> String {
    format!("{id}{DATE_SEPARATOR}{date}")
}

/// Catalog id behind a served puzzle id.
fn catalog_id(puzzle_id: &str) -> &str {
    puzzle_id
        .split_once(DATE_SEPARATOR)
        .map_or(puzzle_id, |(id, _)| id)
}

impl PuzzleSource for CatalogSource {
    /// Pinned entries keep their catalog id; rotated ones get a per-day id.
    fn puzzle_for_date(&self, domain: Domain, date: NaiveDate) -> Option<Puzzle> {
        let entry = self.entry_for(domain, date)?;
        let mut puzzle = entry.puzzle.clone();
        if entry.date.is_none() {
            puzzle.id = dated_id(&entry.puzzle.id, date);
        }
        Some(puzzle)
    }

    fn puzzle_number(&self, _domain: Domain, date: NaiveDate) -> Option<u32> {
        self.day_index(date)
            .and_then(|days| u32::try_from(days + 1).ok())
    }
}

impl IllustrationSource for CatalogSource {
    fn illustration_for(&self, puzzle_id: &str) -> Result<String, LookupError> {
        self.puzzles
            .iter()
            .find(|e| e.puzzle.id == catalog_id(puzzle_id))
            .and_then(|e| e.image.clone())
            .ok_or(LookupError::NotFound)
    }
}

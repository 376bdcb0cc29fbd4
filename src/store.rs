//! Session persistence keyed by `{domain}-{puzzleId}`.
//!
//! Snapshots are JSON with a `version` field. Version 0 is the unversioned
//! layout (no `version`, no `hints_requested`) and is migrated on read.

use crate::session::{Attempt, SessionState, SessionStatus};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const SNAPSHOT_VERSION: u32 = 1;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("session store I/O failed: {0}")]
    Io(#[from] io::Error),
    #[error("session snapshot is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("session snapshot version {found} is newer than supported version {supported}")]
    UnsupportedVersion { found: u32, supported: u32 },
}

/// On-disk layout of one session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub version: u32,
    pub puzzle_id: String,
    pub attempts: Vec<Attempt>,
    pub status: SessionStatus,
    #[serde(default)]
    pub hard_mode: bool,
    #[serde(default)]
    pub hints_requested: usize,
}

impl Snapshot {
    pub fn from_state(state: &SessionState) -> Self {
        Self {
            version: SNAPSHOT_VERSION,
            puzzle_id: state.puzzle_id.clone(),
            attempts: state.attempts.clone(),
            status: state.status,
            hard_mode: state.hard_mode,
            hints_requested: state.hints_requested,
        }
    }

    /// Bring an older snapshot up to the current layout.
    pub fn migrate(mut self) -> Result<Self, StoreError> {
        if self.version > SNAPSHOT_VERSION {
            return Err(StoreError::UnsupportedVersion {
                found: self.version,
                supported: SNAPSHOT_VERSION,
            });
        }
        if self.version == 0 {
            // Unversioned sessions never tracked requested hints
            self.hints_requested = 0;
            self.version = SNAPSHOT_VERSION;
        }
        Ok(self)
    }

    pub fn into_state(self) -> SessionState {
        SessionState {
            puzzle_id: self.puzzle_id,
            attempts: self.attempts,
            status: self.status,
            hard_mode: self.hard_mode,
            hints_requested: self.hints_requested,
        }
    }

    pub fn to_json(&self) -> Result<String, StoreError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(data: &str) -> Result<Self, StoreError> {
        let snapshot: Self = serde_json::from_str(data)?;
        snapshot.migrate()
    }
}

/// Durable key-value storage for sessions.
pub trait SessionStore {
    fn load(&self, key: &str) -> Result<Option<SessionState>, StoreError>;
    fn save(&mut self, key: &str, state: &SessionState) -> Result<(), StoreError>;
}

/// Keeps serialized snapshots in memory; used by tests and one-off runs.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
    writes: usize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn raw(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    pub fn insert_raw(&mut self, key: &str, json: &str) {
        self.entries.insert(key.to_string(), json.to_string());
    }

    /// Number of successful saves.
    pub fn writes(&self) -> usize {
        self.writes
    }
}

impl SessionStore for MemoryStore {
    fn load(&self, key: &str) -> Result<Option<SessionState>, StoreError> {
        self.entries
            .get(key)
            .map(|json| Snapshot::from_json(json).map(Snapshot::into_state))
            .transpose()
    }

    fn save(&mut self, key: &str, state: &SessionState) -> Result<(), StoreError> {
        let json = Snapshot::from_state(state).to_json()?;
        self.entries.insert(key.to_string(), json);
        self.writes += 1;
        Ok(())
    }
}

/// One JSON file per session under a directory.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

/// `<data dir>/daily-guess/sessions`, when the platform has a data dir.
pub fn default_store_dir() -> Option<PathBuf> {
    dirs::data_local_dir().map(|dir| dir.join("daily-guess").join("sessions"))
}

fn file_name(key: &str) -> String {
    let safe: String = key
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();
    format!("{safe}.json")
}

impl FileStore {
    pub fn new<P: Into<PathBuf>>(dir: P) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(file_name(key))
    }
}

impl SessionStore for FileStore {
    fn load(&self, key: &str) -> Result<Option<SessionState>, StoreError> {
        let path = self.path_for(key);
        let data = match fs::read_to_string(&path) {
            Ok(data) => data,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        Ok(Some(Snapshot::from_json(&data)?.into_state()))
    }

    fn save(&mut self, key: &str, state: &SessionState) -> Result<(), StoreError> {
        fs::create_dir_all(&self.dir)?;
        let json = Snapshot::from_state(state).to_json()?;
        // Write beside the target, then rename into place
        let path = self.path_for(key);
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, json)?;
        fs::rename(&tmp, &path)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diff::LetterStatus;

    fn sample_state() -> SessionState {
        let mut state = SessionState::new("2024-06-01", true);
        state.attempts.push(Attempt {
            guess_raw: "Paris".to_string(),
            guess_normalized: "paris".to_string(),
            letter_statuses: vec![LetterStatus::Absent; 5],
            similarity: None,
            geo_hint: None,
            is_correct: false,
        });
        state.hints_requested = 1;
        state
    }

    #[test]
    fn test_memory_store_round_trip() {
        let mut store = MemoryStore::new();
        assert!(store.load("capital-2024-06-01").unwrap().is_none());
        store.save("capital-2024-06-01", &sample_state()).unwrap();
        assert_eq!(store.load("capital-2024-06-01").unwrap(), Some(sample_state()));
        assert_eq!(store.writes(), 1);
    }

    #[test]
    fn test_snapshot_carries_version() {
        let json = Snapshot::from_state(&sample_state()).to_json().unwrap();
        assert!(json.contains("\"version\": 1"));
    }

    #[test]
    fn test_unversioned_snapshot_migrates() {
        let legacy = r#"{
            "puzzle_id": "2024-06-01",
            "attempts": [],
            "status": "playing",
            "hard_mode": false,
            "hints_requested": 4
        }"#;
        let snapshot = Snapshot::from_json(legacy).unwrap();
        assert_eq!(snapshot.version, SNAPSHOT_VERSION);
        assert_eq!(snapshot.hints_requested, 0);
    }

    #[test]
    fn test_newer_snapshot_refused() {
        let future = r#"{
            "version": 99,
            "puzzle_id": "x",
            "attempts": [],
            "status": "won"
        }"#;
        assert!(matches!(
            Snapshot::from_json(future),
            Err(StoreError::UnsupportedVersion { found: 99, .. })
        ));
    }

    #[test]
    fn test_corrupt_snapshot_is_error() {
        let mut store = MemoryStore::new();
        store.insert_raw("capital-1", "{ truncated");
        assert!(matches!(store.load("capital-1"), Err(StoreError::Json(_))));
    }

    #[test]
    fn test_file_store_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = FileStore::new(dir.path().join("sessions"));
        assert!(store.load("plant-p1").unwrap().is_none());
        store.save("plant-p1", &sample_state()).unwrap();
        assert!(store.path_for("plant-p1").exists());
        assert_eq!(store.load("plant-p1").unwrap(), Some(sample_state()));
    }

    #[test]
    fn test_file_store_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = FileStore::new(dir.path());
        let mut state = sample_state();
        store.save("k", &state).unwrap();
        state.status = SessionStatus::Lost;
        store.save("k", &state).unwrap();
        assert_eq!(store.load("k").unwrap().unwrap().status, SessionStatus::Lost);
    }

    #[test]
    fn test_file_name_sanitized() {
        assert_eq!(file_name("song-a/b c"), "song-a_b_c.json");
    }
}

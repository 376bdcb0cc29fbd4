//! Best-effort reporting of finished games.

use crate::puzzle::Domain;
use serde::{Deserialize, Serialize};
use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::mpsc::{self, Sender};
use std::thread::{self, JoinHandle};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SinkError {
    #[error("results sink I/O failed: {0}")]
    Io(#[from] io::Error),
    #[error("results sink encoding failed: {0}")]
    Json(#[from] serde_json::Error),
    #[error("results sink is closed")]
    Closed,
}

/// Outcome of one finished session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameResult {
    pub domain: Domain,
    pub success: bool,
    pub attempts: usize,
}

pub trait ResultsSink {
    fn report_result(&self, result: GameResult) -> Result<(), SinkError>;
}

/// Writes results to the log only.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl ResultsSink for LogSink {
    fn report_result(&self, result: GameResult) -> Result<(), SinkError> {
        log::info!(
            "result: domain={} success={} attempts={}",
            result.domain,
            result.success,
            result.attempts
        );
        Ok(())
    }
}

/// Appends one JSON object per result to a file.
#[derive(Debug, Clone)]
pub struct JsonlSink {
    path: PathBuf,
}

impl JsonlSink {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }
}

impl ResultsSink for JsonlSink {
    fn report_result(&self, result: GameResult) -> Result<(), SinkError> {
        let mut line = serde_json::to_string(&result)?;
        line.push('\n');
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        file.write_all(line.as_bytes())?;
        Ok(())
    }
}

/// Hands results to a worker thread so the caller never waits on the inner sink.
///
/// Failures of the inner sink are logged on the worker and dropped.
pub struct BackgroundSink {
    sender: Option<Sender<GameResult>>,
    worker: Option<JoinHandle<()>>,
}

impl BackgroundSink {
    pub fn spawn<S>(inner: S) -> Self
    where
        S: ResultsSink + Send + 'static,
    {
        let (sender, receiver) = mpsc::channel::<GameResult>();
        let worker = thread::spawn(move || {
            for result in receiver {
                if let Err(e) = inner.report_result(result) {
                    log::warn!("dropping result for {}: {}", result.domain, e);
                }
            }
        });
        Self {
            sender: Some(sender),
            worker: Some(worker),
        }
    }

    /// Close the channel and wait for queued results to drain.
    pub fn shutdown(mut self) {
        self.close();
    }

    fn close(&mut self) {
        self.sender.take();
        if let Some(worker) = self.worker.take() {
            if worker.join().is_err() {
                log::warn!("results worker panicked");
            }
        }
    }
}

impl ResultsSink for BackgroundSink {
    fn report_result(&self, result: GameResult) -> Result<(), SinkError> {
        match &self.sender {
            Some(sender) => sender.send(result).map_err(|_| SinkError::Closed),
            None => Err(SinkError::Closed),
        }
    }
}

impl Drop for BackgroundSink {
    fn drop(&mut self) {
        self.close();
    }
}

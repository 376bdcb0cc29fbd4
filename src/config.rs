//! Per-domain engine tuning.
//!
//! Each game is a `DomainConfig` rather than its own engine. All numbers here
//! are defaults that an `EngineConfig` file can override.

use crate::geo::ProximityBands;
use crate::hints::HintPolicy;
use crate::puzzle::Domain;
use crate::similarity::SimilarityPolicy;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::Path;
use thiserror::Error;

/// How a guess is judged against the answer beyond the letter diff.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Comparator {
    /// Fixed-length style play; letter colours are the feedback.
    LetterDiff,
    /// Free-text names; a similarity score and warmth accompany the colours.
    FreeText,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DomainConfig {
    pub comparator: Comparator,
    /// Compute distance/direction when both coordinates are known.
    pub geo: bool,
    pub max_attempts: usize,
    pub similarity: SimilarityPolicy,
    pub proximity: ProximityBands,
    pub hints: HintPolicy,
    pub share_title: String,
    pub share_url: String,
}

impl Default for DomainConfig {
    fn default() -> Self {
        Self {
            comparator: Comparator::LetterDiff,
            geo: false,
            max_attempts: crate::MAX_ATTEMPTS,
            similarity: SimilarityPolicy::default(),
            proximity: ProximityBands::default(),
            hints: HintPolicy::default(),
            share_title: "Daily Guess".to_string(),
            share_url: "https://dailyguess.example/".to_string(),
        }
    }
}

impl DomainConfig {
    pub fn for_domain(domain: Domain) -> Self {
        let base = Self::default();
        let (comparator, geo, title, path) = match domain {
            Domain::Capital => (Comparator::LetterDiff, true, "Capitale", "capital"),
            Domain::City => (Comparator::LetterDiff, true, "Citydle", "city"),
            Domain::Plant => (Comparator::FreeText, false, "Plantle", "plant"),
            Domain::Song => (Comparator::FreeText, false, "Songle", "song"),
            Domain::DateEvent => (Comparator::FreeText, false, "Whendle", "history"),
            Domain::TriviaTerm => (Comparator::LetterDiff, false, "Termle", "trivia"),
        };
        Self {
            comparator,
            geo,
            share_title: title.to_string(),
            share_url: format!("https://dailyguess.example/{path}"),
            ..base
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] io::Error),
    #[error("invalid config: {0}")]
    Json(#[from] serde_json::Error),
    #[error("{domain}: max_attempts must be between 1 and {max}, got {got}")]
    MaxAttempts {
        domain: Domain,
        max: usize,
        got: usize,
    },
}

/// Overrides keyed by domain; missing domains use `DomainConfig::for_domain`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub domains: BTreeMap<Domain, DomainConfig>,
}

impl EngineConfig {
    pub fn from_json(data: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(data)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        Self::from_json(&fs::read_to_string(path)?)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        for (domain, config) in &self.domains {
            if config.max_attempts == 0 || config.max_attempts > crate::MAX_ATTEMPTS {
                return Err(ConfigError::MaxAttempts {
                    domain: *domain,
                    max: crate::MAX_ATTEMPTS,
                    got: config.max_attempts,
                });
            }
        }
        Ok(())
    }

    pub fn domain(&self, domain: Domain) -> DomainConfig {
        self.domains
            .get(&domain)
            .cloned()
            .unwrap_or_else(|| DomainConfig::for_domain(domain))
    }
}

use crate::geo::Coordinate;
use crate::normalize::normalize;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// A guessing-game variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Domain {
    Capital,
    City,
    Plant,
    Song,
    DateEvent,
    TriviaTerm,
}

impl Domain {
    pub const ALL: [Domain; 6] = [
        Domain::Capital,
        Domain::City,
        Domain::Plant,
        Domain::Song,
        Domain::DateEvent,
        Domain::TriviaTerm,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Capital => "capital",
            Self::City => "city",
            Self::Plant => "plant",
            Self::Song => "song",
            Self::DateEvent => "date-event",
            Self::TriviaTerm => "trivia-term",
        }
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Domain {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|d| d.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown domain '{s}'"))
    }
}

/// One progressively revealed clue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HintField {
    pub label: String,
    pub value: String,
}

impl HintField {
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
        }
    }
}

/// Today's puzzle for one domain. Immutable once fetched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Puzzle {
    pub id: String,
    pub domain: Domain,
    pub answer: String,
    #[serde(default)]
    pub display_fields: BTreeMap<String, String>,
    #[serde(default)]
    pub coordinates: Option<Coordinate>,
    #[serde(default)]
    pub valid_aliases: Vec<String>,
    /// Broad to specific.
    #[serde(default)]
    pub hint_fields: Vec<HintField>,
}

impl Puzzle {
    pub fn new(id: impl Into<String>, domain: Domain, answer: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            domain,
            answer: answer.into(),
            display_fields: BTreeMap::new(),
            coordinates: None,
            valid_aliases: Vec::new(),
            hint_fields: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_aliases<I, S>(mut self, aliases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.valid_aliases.extend(aliases.into_iter().map(Into::into));
        self
    }

    #[must_use]
    pub fn with_hint(mut self, label: &str, value: &str) -> Self {
        self.hint_fields.push(HintField::new(label, value));
        self
    }

    #[must_use]
    pub fn with_coordinates(mut self, coordinates: Coordinate) -> Self {
        self.coordinates = Some(coordinates);
        self
    }

    #[must_use]
    pub fn with_display_field(mut self, key: &str, value: &str) -> Self {
        self.display_fields.insert(key.to_string(), value.to_string());
        self
    }

    pub fn normalized_answer(&self) -> String {
        normalize(&self.answer)
    }

    /// Canonical answer first, then aliases, all normalized and deduplicated.
    pub fn accepted_names(&self) -> Vec<String> {
        let mut names = vec![self.normalized_answer()];
        for alias in &self.valid_aliases {
            let n = normalize(alias);
            if !n.is_empty() && !names.contains(&n) {
                names.push(n);
            }
        }
        names
    }

    /// Whether a normalized guess is the answer or one of its aliases.
    pub fn accepts(&self, normalized_guess: &str) -> bool {
        self.accepted_names().iter().any(|n| n == normalized_guess)
    }

    /// Session persistence key, `{domain}-{puzzleId}`.
    pub fn storage_key(&self) -> String {
        format!("{}-{}", self.domain, self.id)
    }
}

//! Which guesses count as real names for a domain.

use crate::geo::Coordinate;
use crate::normalize::normalize;
use crate::puzzle::Domain;
use std::collections::HashMap;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

pub const EMBEDDED_CAPITALS: &str = include_str!("resources/capitals.txt");

/// Recognised guesses per domain, used to reject nonsense before scoring.
pub trait DomainLexicon {
    fn is_valid_entry(&self, domain: Domain, normalized_guess: &str) -> bool;

    /// Location of a guessed place, when the lexicon knows it.
    fn coordinates(&self, _domain: Domain, _normalized_guess: &str) -> Option<Coordinate> {
        None
    }
}

/// Accepts every guess. For domains with no word list to check against.
#[derive(Debug, Default, Clone, Copy)]
pub struct OpenLexicon;

impl DomainLexicon for OpenLexicon {
    fn is_valid_entry(&self, _domain: Domain, _normalized_guess: &str) -> bool {
        true
    }
}

/// Word lists keyed by domain. Domains without a list accept everything.
#[derive(Debug, Default, Clone)]
pub struct WordListLexicon {
    entries: HashMap<Domain, HashMap<String, Option<Coordinate>>>,
}

/// Parse one `name` or `name|lat|lon` line.
fn parse_line(line: &str) -> Option<(String, Option<Coordinate>)> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return None;
    }
    let mut parts = line.split('|');
    let name = normalize(parts.next()?);
    if name.is_empty() {
        return None;
    }
    let lat = parts.next().and_then(|s| s.trim().parse::<f64>().ok());
    let lon = parts.next().and_then(|s| s.trim().parse::<f64>().ok());
    let coordinate = match (lat, lon) {
        (Some(lat), Some(lon)) => Some(Coordinate::new(lat, lon)),
        _ => None,
    };
    Some((name, coordinate))
}

impl WordListLexicon {
    pub fn new() -> Self {
        Self::default()
    }

    /// Lexicon with the bundled capital list serving both place domains.
    pub fn embedded() -> Self {
        let mut lexicon = Self::new();
        lexicon.load_str(Domain::Capital, EMBEDDED_CAPITALS);
        lexicon.load_str(Domain::City, EMBEDDED_CAPITALS);
        lexicon
    }

    pub fn load_str(&mut self, domain: Domain, data: &str) -> usize {
        let list = self.entries.entry(domain).or_default();
        let before = list.len();
        for (name, coordinate) in data.lines().filter_map(parse_line) {
            list.insert(name, coordinate);
        }
        list.len() - before
    }

    pub fn load_file<P: AsRef<Path>>(&mut self, domain: Domain, path: P) -> io::Result<usize> {
        let file = File::open(path)?;
        let reader = BufReader::new(file);
        let list = self.entries.entry(domain).or_default();
        let before = list.len();
        for line in reader.lines() {
            if let Some((name, coordinate)) = parse_line(&line?) {
                list.insert(name, coordinate);
            }
        }
        Ok(list.len() - before)
    }

    pub fn len(&self, domain: Domain) -> usize {
        self.entries.get(&domain).map_or(0, HashMap::len)
    }

    pub fn is_empty(&self, domain: Domain) -> bool {
        self.len(domain) == 0
    }
}

impl DomainLexicon for WordListLexicon {
    fn is_valid_entry(&self, domain: Domain, normalized_guess: &str) -> bool {
        match self.entries.get(&domain) {
            Some(list) => list.contains_key(normalized_guess),
            None => true,
        }
    }

    fn coordinates(&self, domain: Domain, normalized_guess: &str) -> Option<Coordinate> {
        self.entries.get(&domain)?.get(normalized_guess).copied().flatten()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_load_from_str_normalizes() {
        let mut lexicon = WordListLexicon::new();
        let added = lexicon.load_str(Domain::Capital, "Paris|48.8566|2.3522\n  BOGOTÁ \n\n# comment\n");
        assert_eq!(added, 2);
        assert!(lexicon.is_valid_entry(Domain::Capital, "paris"));
        assert!(lexicon.is_valid_entry(Domain::Capital, "bogota"));
        assert!(!lexicon.is_valid_entry(Domain::Capital, "gotham"));
    }

    #[test]
    fn test_coordinates_when_present() {
        let mut lexicon = WordListLexicon::new();
        lexicon.load_str(Domain::City, "Paris|48.8566|2.3522\nLyon\nNice|bad|7.26");
        let paris = lexicon.coordinates(Domain::City, "paris").unwrap();
        assert!((paris.lat - 48.8566).abs() < 1e-9);
        assert!(lexicon.coordinates(Domain::City, "lyon").is_none());
        assert!(lexicon.coordinates(Domain::City, "nice").is_none());
        assert!(lexicon.coordinates(Domain::City, "rome").is_none());
    }

    #[test]
    fn test_domain_without_list_accepts_all() {
        let mut lexicon = WordListLexicon::new();
        lexicon.load_str(Domain::Capital, "Paris");
        assert!(lexicon.is_valid_entry(Domain::Song, "anything goes"));
        assert!(!lexicon.is_valid_entry(Domain::Capital, "anything goes"));
    }

    #[test]
    fn test_embedded_capitals() {
        let lexicon = WordListLexicon::embedded();
        assert!(lexicon.len(Domain::Capital) > 100);
        assert!(lexicon.is_valid_entry(Domain::Capital, "canberra"));
        assert!(lexicon.is_valid_entry(Domain::City, "reykjavik"));
        assert!(lexicon.coordinates(Domain::Capital, "tokyo").is_some());
    }

    #[test]
    fn test_load_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "Rosa").unwrap();
        writeln!(file, "Quercus robur").unwrap();
        writeln!(file, "lavandula").unwrap();
        let mut lexicon = WordListLexicon::new();
        let added = lexicon.load_file(Domain::Plant, file.path()).unwrap();
        assert_eq!(added, 3);
        assert!(lexicon.is_valid_entry(Domain::Plant, "quercus robur"));
    }

    #[test]
    fn test_load_missing_file_errors() {
        let mut lexicon = WordListLexicon::new();
        assert!(lexicon.load_file(Domain::Plant, "/nonexistent/plants.txt").is_err());
    }

    #[test]
    fn test_open_lexicon() {
        assert!(OpenLexicon.is_valid_entry(Domain::Capital, "xyz"));
        assert!(OpenLexicon.coordinates(Domain::Capital, "paris").is_none());
    }
}

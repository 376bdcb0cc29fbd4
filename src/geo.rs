//! Distance and coarse direction hints for location games.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Mean Earth radius used by the spherical approximation.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub lat: f64,
    pub lon: f64,
}

impl Coordinate {
    pub const fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }
}

/// Single compass letter pointing from the guess toward the target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    N,
    S,
    E,
    W,
}

impl Direction {
    pub fn arrow(self) -> &'static str {
        match self {
            Self::N => "⬆️",
            Self::S => "⬇️",
            Self::E => "➡️",
            Self::W => "⬅️",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let letter = match self {
            Self::N => "N",
            Self::S => "S",
            Self::E => "E",
            Self::W => "W",
        };
        f.write_str(letter)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoHint {
    pub distance_km: f64,
    pub direction: Direction,
}

/// Great-circle distance by the haversine formula.
pub fn haversine_km(a: Coordinate, b: Coordinate) -> f64 {
    let lat1 = a.lat.to_radians();
    let lat2 = b.lat.to_radians();
    let d_lat = (b.lat - a.lat).to_radians();
    let d_lon = (b.lon - a.lon).to_radians();

    let h = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lon / 2.0).sin().powi(2);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());
    EARTH_RADIUS_KM * c
}

/// Longitude delta wrapped into [-180, 180] so the hint points the short way round.
fn wrapped_lon_delta(from: f64, to: f64) -> f64 {
    let mut delta = to - from;
    while delta > 180.0 {
        delta -= 360.0;
    }
    while delta < -180.0 {
        delta += 360.0;
    }
    delta
}

/// Axis with the larger absolute delta wins; latitude wins ties.
pub fn direction(from: Coordinate, to: Coordinate) -> Direction {
    let d_lat = to.lat - from.lat;
    let d_lon = wrapped_lon_delta(from.lon, to.lon);
    if d_lat.abs() >= d_lon.abs() {
        if d_lat >= 0.0 { Direction::N } else { Direction::S }
    } else if d_lon >= 0.0 {
        Direction::E
    } else {
        Direction::W
    }
}

pub fn hint(guess: Coordinate, target: Coordinate) -> GeoHint {
    GeoHint {
        distance_km: haversine_km(guess, target),
        direction: direction(guess, target),
    }
}

/// Qualitative distance wording shown next to the number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Proximity {
    VeryClose,
    CloseBy,
    SameRegion,
    SameCountry,
    SameContinent,
    FarAway,
}

impl Proximity {
    pub fn label(self) -> &'static str {
        match self {
            Self::VeryClose => "very close",
            Self::CloseBy => "close by",
            Self::SameRegion => "same region",
            Self::SameCountry => "same country-scale",
            Self::SameContinent => "same continent-scale",
            Self::FarAway => "far away",
        }
    }
}

/// Upper bounds (exclusive, km) for each band; beyond the last is far away.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProximityBands {
    pub very_close_km: f64,
    pub close_by_km: f64,
    pub same_region_km: f64,
    pub same_country_km: f64,
    pub same_continent_km: f64,
}

impl Default for ProximityBands {
    fn default() -> Self {
        Self {
            very_close_km: 50.0,
            close_by_km: 200.0,
            same_region_km: 500.0,
            same_country_km: 1000.0,
            same_continent_km: 2000.0,
        }
    }
}

impl ProximityBands {
    pub fn classify(&self, distance_km: f64) -> Proximity {
        if distance_km < self.very_close_km {
            Proximity::VeryClose
        } else if distance_km < self.close_by_km {
            Proximity::CloseBy
        } else if distance_km < self.same_region_km {
            Proximity::SameRegion
        } else if distance_km < self.same_country_km {
            Proximity::SameCountry
        } else if distance_km < self.same_continent_km {
            Proximity::SameContinent
        } else {
            Proximity::FarAway
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PARIS: Coordinate = Coordinate::new(48.8566, 2.3522);
    const LONDON: Coordinate = Coordinate::new(51.5074, -0.1278);
    const MADRID: Coordinate = Coordinate::new(40.4168, -3.7038);

    /// Closed form for the (0,0) -> (10,10) case.
    fn analytic_origin_to_ten() -> f64 {
        let s = 5.0_f64.to_radians().sin().powi(2);
        let h = s + 10.0_f64.to_radians().cos() * s;
        2.0 * EARTH_RADIUS_KM * h.sqrt().asin()
    }

    #[test]
    fn test_origin_to_ten_ten() {
        let hint = hint(Coordinate::new(0.0, 0.0), Coordinate::new(10.0, 10.0));
        assert!(matches!(hint.direction, Direction::N | Direction::E));
        assert!((hint.distance_km - analytic_origin_to_ten()).abs() < 0.5);
        assert!((hint.distance_km - 1568.5).abs() < 2.0);
    }

    #[test]
    fn test_tie_goes_to_latitude() {
        assert_eq!(
            direction(Coordinate::new(0.0, 0.0), Coordinate::new(10.0, 10.0)),
            Direction::N
        );
        assert_eq!(
            direction(Coordinate::new(0.0, 0.0), Coordinate::new(-10.0, -10.0)),
            Direction::S
        );
    }

    #[test]
    fn test_direction_axes() {
        assert_eq!(direction(MADRID, PARIS), Direction::N);
        assert_eq!(direction(PARIS, MADRID), Direction::S);
        assert_eq!(direction(Coordinate::new(0.0, 0.0), Coordinate::new(1.0, 20.0)), Direction::E);
        assert_eq!(direction(Coordinate::new(0.0, 0.0), Coordinate::new(1.0, -20.0)), Direction::W);
    }

    #[test]
    fn test_direction_across_antimeridian() {
        // Fiji to Samoa is a short hop east over the 180th meridian
        let suva = Coordinate::new(-18.1248, 178.4501);
        let apia = Coordinate::new(-13.8507, -171.7514);
        assert_eq!(direction(suva, apia), Direction::E);
        assert_eq!(direction(apia, suva), Direction::W);
    }

    #[test]
    fn test_known_city_distance() {
        let d = haversine_km(PARIS, LONDON);
        assert!((d - 343.5).abs() < 5.0, "paris-london {d}");
    }

    #[test]
    fn test_distance_symmetric_and_zero() {
        assert!((haversine_km(PARIS, MADRID) - haversine_km(MADRID, PARIS)).abs() < 1e-9);
        assert!(haversine_km(PARIS, PARIS).abs() < 1e-9);
    }

    #[test]
    fn test_antipodes_half_circumference() {
        let d = haversine_km(Coordinate::new(0.0, 0.0), Coordinate::new(0.0, 180.0));
        assert!((d - std::f64::consts::PI * EARTH_RADIUS_KM).abs() < 1e-6);
    }

    #[test]
    fn test_proximity_bands_default() {
        let bands = ProximityBands::default();
        assert_eq!(bands.classify(0.0), Proximity::VeryClose);
        assert_eq!(bands.classify(49.9), Proximity::VeryClose);
        assert_eq!(bands.classify(50.0), Proximity::CloseBy);
        assert_eq!(bands.classify(343.0), Proximity::SameRegion);
        assert_eq!(bands.classify(999.0), Proximity::SameCountry);
        assert_eq!(bands.classify(1568.0), Proximity::SameContinent);
        assert_eq!(bands.classify(2000.0), Proximity::FarAway);
    }

    #[test]
    fn test_proximity_bands_configurable() {
        let bands = ProximityBands {
            very_close_km: 10.0,
            ..ProximityBands::default()
        };
        assert_eq!(bands.classify(30.0), Proximity::CloseBy);
        assert_eq!(Proximity::SameContinent.label(), "same continent-scale");
    }
}

// src/models/coordinate.rs

//! Galaxy coordinates.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{ExtractError, Result};
use crate::utils::number::parse_i64;
use crate::utils::text::captures;

/// Kind of body occupying a galaxy slot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CelestialType {
    #[default]
    Planet,
    Debris,
    Moon,
}

impl CelestialType {
    /// Numeric code used in page links (`type=1`, `type=3`).
    pub fn code(self) -> i64 {
        match self {
            Self::Planet => 1,
            Self::Debris => 2,
            Self::Moon => 3,
        }
    }

    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            1 => Some(Self::Planet),
            2 => Some(Self::Debris),
            3 => Some(Self::Moon),
            _ => None,
        }
    }

    fn letter(self) -> char {
        match self {
            Self::Planet => 'P',
            Self::Debris => 'D',
            Self::Moon => 'M',
        }
    }
}

/// Position of a celestial: galaxy, system, slot and body kind.
///
/// Equality is structural, so a planet and its moon at the same slot differ.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Coordinate {
    pub galaxy: i64,
    pub system: i64,
    pub position: i64,
    #[serde(rename = "type")]
    pub kind: CelestialType,
}

impl Coordinate {
    pub fn new(galaxy: i64, system: i64, position: i64, kind: CelestialType) -> Self {
        Self {
            galaxy,
            system,
            position,
            kind,
        }
    }

    pub fn planet(galaxy: i64, system: i64, position: i64) -> Self {
        Self::new(galaxy, system, position, CelestialType::Planet)
    }

    pub fn moon(galaxy: i64, system: i64, position: i64) -> Self {
        Self::new(galaxy, system, position, CelestialType::Moon)
    }

    /// Same slot, different body kind.
    pub fn with_kind(self, kind: CelestialType) -> Self {
        Self { kind, ..self }
    }

    /// True when galaxy, system and position are all unset.
    pub fn is_zero(&self) -> bool {
        self.galaxy == 0 && self.system == 0 && self.position == 0
    }

    /// First `[G:S:P]` group found in `text`, typed as a planet.
    ///
    /// # Examples
    /// ```
    /// use ogextract::models::Coordinate;
    ///
    /// let coord = Coordinate::find_in("Attack on Homeworld [4:208:8]").unwrap();
    /// assert_eq!(coord, Some(Coordinate::planet(4, 208, 8)));
    /// ```
    pub fn find_in(text: &str) -> Result<Option<Self>> {
        Ok(captures(text, r"\[(\d+):(\d+):(\d+)]")?
            .map(|m| Self::planet(parse_i64(&m[0]), parse_i64(&m[1]), parse_i64(&m[2]))))
    }

    /// Split `"Name [G:S:P]"` into the trimmed name and a planet coordinate.
    pub fn parse_named(text: &str) -> Result<Option<(String, Self)>> {
        Ok(captures(text, r"([^\[]+) \[(\d+):(\d+):(\d+)]")?.map(|m| {
            (
                m[0].trim().to_string(),
                Self::planet(parse_i64(&m[1]), parse_i64(&m[2]), parse_i64(&m[3])),
            )
        }))
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}:{}:{}:{}]",
            self.kind.letter(),
            self.galaxy,
            self.system,
            self.position
        )
    }
}

impl FromStr for Coordinate {
    type Err = ExtractError;

    /// Accepts `[P:1:2:3]`, `[M:1:2:3]`, `[1:2:3]` and `1:2:3`.
    fn from_str(s: &str) -> Result<Self> {
        let inner = s.trim().trim_start_matches('[').trim_end_matches(']');
        let parts: Vec<&str> = inner.split(':').map(str::trim).collect();
        let (kind, numbers) = match parts.as_slice() {
            [k, rest @ ..] if rest.len() == 3 => {
                let kind = match k.to_ascii_uppercase().as_str() {
                    "P" => CelestialType::Planet,
                    "M" => CelestialType::Moon,
                    "D" => CelestialType::Debris,
                    _ => return Err(ExtractError::validation(format!("invalid coordinate '{s}'"))),
                };
                (kind, rest)
            }
            rest if rest.len() == 3 => (CelestialType::Planet, rest),
            _ => return Err(ExtractError::validation(format!("invalid coordinate '{s}'"))),
        };
        let mut values = [0i64; 3];
        for (slot, raw) in values.iter_mut().zip(numbers) {
            *slot = raw
                .parse()
                .map_err(|_| ExtractError::validation(format!("invalid coordinate '{s}'")))?;
        }
        Ok(Self::new(values[0], values[1], values[2], kind))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(Coordinate::planet(1, 2, 3).to_string(), "[P:1:2:3]");
        assert_eq!(Coordinate::moon(4, 208, 8).to_string(), "[M:4:208:8]");
    }

    #[test]
    fn test_from_str() {
        assert_eq!("[M:1:2:3]".parse::<Coordinate>().unwrap(), Coordinate::moon(1, 2, 3));
        assert_eq!("1:2:3".parse::<Coordinate>().unwrap(), Coordinate::planet(1, 2, 3));
        assert!("1:2".parse::<Coordinate>().is_err());
        assert!("[X:1:2:3]".parse::<Coordinate>().is_err());
    }

    #[test]
    fn test_named_coordinate_round_trip() {
        for galaxy in 1..=9 {
            for system in [1, 42, 499] {
                for position in 1..=15 {
                    let text = format!("Colony [{galaxy}:{system}:{position}]");
                    let (name, coord) = Coordinate::parse_named(&text).unwrap().unwrap();
                    assert_eq!(name, "Colony");
                    assert_eq!(coord, Coordinate::planet(galaxy, system, position));
                    assert_eq!(coord.to_string().parse::<Coordinate>().unwrap(), coord);
                }
            }
        }
    }

    #[test]
    fn test_find_in_without_coordinate() {
        assert_eq!(Coordinate::find_in("nothing here").unwrap(), None);
    }

    #[test]
    fn test_equality_includes_kind() {
        assert_ne!(Coordinate::planet(1, 2, 3), Coordinate::moon(1, 2, 3));
        assert!(Coordinate::default().is_zero());
    }
}

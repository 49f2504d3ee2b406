// src/models/celestial.rs

//! Planets and moons owned by the player.

use serde::{Deserialize, Serialize};

use super::Coordinate;

/// Used and total building fields.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fields {
    pub built: i64,
    pub total: i64,
}

impl Fields {
    pub fn is_full(&self) -> bool {
        self.built >= self.total
    }
}

/// Temperature range in degrees Celsius.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Temperature {
    pub min: i64,
    pub max: i64,
}

impl Temperature {
    pub fn mean(&self) -> i64 {
        (self.min + self.max) / 2
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Moon {
    pub id: i64,
    pub img: String,
    pub name: String,
    pub diameter: i64,
    pub coordinate: Coordinate,
    pub fields: Fields,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Planet {
    pub id: i64,
    pub img: String,
    pub name: String,
    pub diameter: i64,
    pub coordinate: Coordinate,
    pub fields: Fields,
    pub temperature: Temperature,
    pub moon: Option<Moon>,
}

/// Either kind of owned body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Celestial {
    Planet(Planet),
    Moon(Moon),
}

impl Celestial {
    pub fn id(&self) -> i64 {
        match self {
            Self::Planet(p) => p.id,
            Self::Moon(m) => m.id,
        }
    }

    pub fn coordinate(&self) -> Coordinate {
        match self {
            Self::Planet(p) => p.coordinate,
            Self::Moon(m) => m.coordinate,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Self::Planet(p) => &p.name,
            Self::Moon(m) => &m.name,
        }
    }
}

/// Flatten planets and their moons, planet first.
pub fn celestials(planets: &[Planet]) -> Vec<Celestial> {
    let mut out = Vec::with_capacity(planets.len() * 2);
    for planet in planets {
        out.push(Celestial::Planet(planet.clone()));
        if let Some(moon) = &planet.moon {
            out.push(Celestial::Moon(moon.clone()));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_celestials_flatten() {
        let planets = vec![
            Planet {
                id: 1,
                coordinate: Coordinate::planet(1, 1, 1),
                moon: Some(Moon {
                    id: 2,
                    coordinate: Coordinate::moon(1, 1, 1),
                    ..Default::default()
                }),
                ..Default::default()
            },
            Planet {
                id: 3,
                ..Default::default()
            },
        ];
        let all = celestials(&planets);
        let ids: Vec<i64> = all.iter().map(Celestial::id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
        assert_eq!(all[1].coordinate(), Coordinate::moon(1, 1, 1));
    }

    #[test]
    fn test_temperature_and_fields() {
        assert_eq!(Temperature { min: -20, max: 20 }.mean(), 0);
        assert!(Fields { built: 163, total: 163 }.is_full());
    }
}

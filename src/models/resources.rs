// src/models/resources.rs

//! Resource amounts and per-resource details.

use serde::{Deserialize, Serialize};

/// Plain amounts, as shown in the resource bar.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resources {
    pub metal: i64,
    pub crystal: i64,
    pub deuterium: i64,
    pub energy: i64,
    pub darkmatter: i64,
    pub population: i64,
    pub food: i64,
}

impl Resources {
    /// Scale metal, crystal and deuterium by `ratio`, truncating.
    pub fn scaled(&self, ratio: f64) -> Resources {
        Resources {
            metal: (self.metal as f64 * ratio) as i64,
            crystal: (self.crystal as f64 * ratio) as i64,
            deuterium: (self.deuterium as f64 * ratio) as i64,
            ..Resources::default()
        }
    }

    pub fn total(&self) -> i64 {
        self.metal + self.crystal + self.deuterium
    }
}

/// Storable resource (metal, crystal, deuterium).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredResource {
    pub available: i64,
    pub storage_capacity: i64,
    pub current_production: i64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnergyDetails {
    pub available: i64,
    pub current_production: i64,
    pub consumption: i64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DarkmatterDetails {
    pub available: i64,
    pub purchased: i64,
    pub found: i64,
}

/// Lifeform food stock.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FoodDetails {
    pub available: i64,
    pub storage_capacity: i64,
    pub overproduction: i64,
    pub consumed_in: i64,
    pub time_till_food_runs_out: i64,
}

/// Lifeform population.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PopulationDetails {
    pub available: i64,
    pub t2_lifeforms: i64,
    pub t3_lifeforms: i64,
    pub living_space: i64,
    pub satisfied: i64,
    pub hungry: f64,
    pub growth_rate: f64,
    pub bunker_space: i64,
}

/// Everything the resource bar and its tooltips expose.
///
/// Sections whose tooltip was absent stay at zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ResourcesDetails {
    pub metal: StoredResource,
    pub crystal: StoredResource,
    pub deuterium: StoredResource,
    pub energy: EnergyDetails,
    pub darkmatter: DarkmatterDetails,
    pub food: FoodDetails,
    pub population: PopulationDetails,
}

impl ResourcesDetails {
    /// Available amounts only.
    pub fn available(&self) -> Resources {
        Resources {
            metal: self.metal.available,
            crystal: self.crystal.available,
            deuterium: self.deuterium.available,
            energy: self.energy.available,
            darkmatter: self.darkmatter.available,
            population: self.population.available,
            food: self.food.available,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scaled_truncates() {
        let res = Resources {
            metal: 1001,
            crystal: 3,
            deuterium: 10,
            energy: 50,
            ..Default::default()
        };
        let half = res.scaled(0.5);
        assert_eq!((half.metal, half.crystal, half.deuterium), (500, 1, 5));
        assert_eq!(half.energy, 0);
        assert_eq!(res.total(), 1014);
    }

    #[test]
    fn test_available() {
        let mut details = ResourcesDetails::default();
        details.metal.available = 7;
        details.food.available = 3;
        let res = details.available();
        assert_eq!(res.metal, 7);
        assert_eq!(res.food, 3);
    }
}

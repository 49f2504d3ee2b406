// src/models/techs.rs

//! Levels and counts per technology family.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::ids::*;
use crate::error::Result;

/// Declares a named-field level set with id-based access.
macro_rules! tech_set {
    ($(#[$meta:meta])* $name:ident { $($field:ident => $id:path),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
        pub struct $name {
            $(pub $field: i64,)+
        }

        impl $name {
            /// Value for `id`, 0 when the id is not part of this set.
            pub fn by_id(&self, id: TechId) -> i64 {
                match id {
                    $($id => self.$field,)+
                    _ => 0,
                }
            }

            /// Set the value for `id`; returns false when the id is foreign.
            pub fn set(&mut self, id: TechId, value: i64) -> bool {
                match id {
                    $($id => {
                        self.$field = value;
                        true
                    })+
                    _ => false,
                }
            }

            /// `(id, value)` pairs in declaration order.
            pub fn iter(&self) -> impl Iterator<Item = (TechId, i64)> {
                [$(($id, self.$field)),+].into_iter()
            }
        }

        impl TechSet for $name {
            const IDS: &'static [TechId] = &[$($id),+];

            fn set_level(&mut self, id: TechId, value: i64) -> bool {
                self.set(id, value)
            }
        }
    };
}

/// Fixed family of technologies filled one id at a time.
pub trait TechSet: Default {
    /// Member ids in declaration order.
    const IDS: &'static [TechId];

    fn set_level(&mut self, id: TechId, value: i64) -> bool;

    /// Build a set by reading every member id with `read`.
    fn read_each(mut read: impl FnMut(TechId) -> Result<i64>) -> Result<Self> {
        let mut out = Self::default();
        for &id in Self::IDS {
            out.set_level(id, read(id)?);
        }
        Ok(out)
    }
}

tech_set! {
    /// Mines, power plants and storages.
    ResourcesBuildings {
        metal_mine => METAL_MINE,
        crystal_mine => CRYSTAL_MINE,
        deuterium_synthesizer => DEUTERIUM_SYNTHESIZER,
        solar_plant => SOLAR_PLANT,
        fusion_reactor => FUSION_REACTOR,
        solar_satellite => SOLAR_SATELLITE,
        metal_storage => METAL_STORAGE,
        crystal_storage => CRYSTAL_STORAGE,
        deuterium_tank => DEUTERIUM_TANK,
    }
}

tech_set! {
    Facilities {
        robotics_factory => ROBOTICS_FACTORY,
        shipyard => SHIPYARD,
        research_lab => RESEARCH_LAB,
        alliance_depot => ALLIANCE_DEPOT,
        missile_silo => MISSILE_SILO,
        nanite_factory => NANITE_FACTORY,
        terraformer => TERRAFORMER,
        space_dock => SPACE_DOCK,
        lunar_base => LUNAR_BASE,
        sensor_phalanx => SENSOR_PHALANX,
        jump_gate => JUMP_GATE,
    }
}

tech_set! {
    Researches {
        energy_technology => ENERGY_TECHNOLOGY,
        laser_technology => LASER_TECHNOLOGY,
        ion_technology => ION_TECHNOLOGY,
        hyperspace_technology => HYPERSPACE_TECHNOLOGY,
        plasma_technology => PLASMA_TECHNOLOGY,
        combustion_drive => COMBUSTION_DRIVE,
        impulse_drive => IMPULSE_DRIVE,
        hyperspace_drive => HYPERSPACE_DRIVE,
        espionage_technology => ESPIONAGE_TECHNOLOGY,
        computer_technology => COMPUTER_TECHNOLOGY,
        astrophysics => ASTROPHYSICS,
        intergalactic_research_network => INTERGALACTIC_RESEARCH_NETWORK,
        graviton_technology => GRAVITON_TECHNOLOGY,
        weapons_technology => WEAPONS_TECHNOLOGY,
        shielding_technology => SHIELDING_TECHNOLOGY,
        armour_technology => ARMOUR_TECHNOLOGY,
    }
}

tech_set! {
    /// Ship counts. A count of -1 means the fleet tooltip printed `?`.
    ShipsInfos {
        light_fighter => LIGHT_FIGHTER,
        heavy_fighter => HEAVY_FIGHTER,
        cruiser => CRUISER,
        battleship => BATTLESHIP,
        battlecruiser => BATTLECRUISER,
        bomber => BOMBER,
        destroyer => DESTROYER,
        deathstar => DEATHSTAR,
        small_cargo => SMALL_CARGO,
        large_cargo => LARGE_CARGO,
        colony_ship => COLONY_SHIP,
        recycler => RECYCLER,
        espionage_probe => ESPIONAGE_PROBE,
        solar_satellite => SOLAR_SATELLITE,
        crawler => CRAWLER,
        reaper => REAPER,
        pathfinder => PATHFINDER,
    }
}

tech_set! {
    DefensesInfos {
        rocket_launcher => ROCKET_LAUNCHER,
        light_laser => LIGHT_LASER,
        heavy_laser => HEAVY_LASER,
        gauss_cannon => GAUSS_CANNON,
        ion_cannon => ION_CANNON,
        plasma_turret => PLASMA_TURRET,
        small_shield_dome => SMALL_SHIELD_DOME,
        large_shield_dome => LARGE_SHIELD_DOME,
        anti_ballistic_missiles => ANTI_BALLISTIC_MISSILES,
        interplanetary_missiles => INTERPLANETARY_MISSILES,
    }
}

impl ShipsInfos {
    /// Component-wise sum.
    pub fn add(&mut self, other: &ShipsInfos) {
        for (id, count) in other.iter() {
            let current = self.by_id(id);
            self.set(id, current + count);
        }
    }

    /// Number of ships, ignoring unknown (`-1`) entries.
    pub fn count(&self) -> i64 {
        self.iter().map(|(_, n)| n.max(0)).sum()
    }

    pub fn has_ships(&self) -> bool {
        self.count() > 0
    }
}

impl DefensesInfos {
    /// Defenses able to shoot at ships: missiles and shield domes excluded.
    pub fn count_ship_defenses(&self) -> i64 {
        self.iter()
            .filter(|(id, _)| {
                ![
                    INTERPLANETARY_MISSILES,
                    ANTI_BALLISTIC_MISSILES,
                    SMALL_SHIELD_DOME,
                    LARGE_SHIELD_DOME,
                ]
                .contains(id)
            })
            .map(|(_, n)| n)
            .sum()
    }

    pub fn has_ship_defense(&self) -> bool {
        self.count_ship_defenses() > 0
    }
}

/// Lifeform species of a planet.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LifeformType {
    #[default]
    None,
    Humans,
    Rocktal,
    Mechas,
    Kaelesh,
}

impl LifeformType {
    /// Species number used in css classes and tech ids (`lifeform1`, `11101`).
    pub fn number(self) -> Option<i64> {
        match self {
            Self::None => None,
            Self::Humans => Some(1),
            Self::Rocktal => Some(2),
            Self::Mechas => Some(3),
            Self::Kaelesh => Some(4),
        }
    }

    pub fn from_number(n: i64) -> Self {
        match n {
            1 => Self::Humans,
            2 => Self::Rocktal,
            3 => Self::Mechas,
            4 => Self::Kaelesh,
            _ => Self::None,
        }
    }

    pub const ALL: [LifeformType; 4] = [Self::Humans, Self::Rocktal, Self::Mechas, Self::Kaelesh];
}

/// Lifeform building ids of a species (`1N101` through `1N112`).
pub fn lf_building_ids(lifeform: LifeformType) -> Vec<TechId> {
    match lifeform.number() {
        Some(n) => (101..=112).map(|i| 10_000 + n * 1_000 + i).collect(),
        None => Vec::new(),
    }
}

/// Lifeform research ids of a species (`1N201` through `1N218`).
pub fn lf_research_ids(lifeform: LifeformType) -> Vec<TechId> {
    match lifeform.number() {
        Some(n) => (201..=218).map(|i| 10_000 + n * 1_000 + i).collect(),
        None => Vec::new(),
    }
}

/// Lifeform buildings of the current planet.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LfBuildings {
    pub lifeform_type: LifeformType,
    pub levels: BTreeMap<TechId, i64>,
}

impl LfBuildings {
    pub fn level(&self, id: TechId) -> i64 {
        self.levels.get(&id).copied().unwrap_or(0)
    }
}

/// Lifeform research levels, any species.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LfResearches {
    pub levels: BTreeMap<TechId, i64>,
}

impl LfResearches {
    pub fn level(&self, id: TechId) -> i64 {
        self.levels.get(&id).copied().unwrap_or(0)
    }
}

/// Every tech level of one celestial, from the planet techs payload.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Techs {
    pub resources_buildings: ResourcesBuildings,
    pub facilities: Facilities,
    pub ships: ShipsInfos,
    pub defenses: DefensesInfos,
    pub researches: Researches,
    pub lf_buildings: LfBuildings,
    pub lf_researches: LfResearches,
}

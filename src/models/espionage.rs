// src/models/espionage.rs

//! Espionage reports.

use std::collections::BTreeMap;

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

use super::ids::{AllianceClass, CharacterClass, TechId};
use super::{Coordinate, DefensesInfos, Facilities, Researches, Resources, ResourcesBuildings, ShipsInfos};

/// Passive report (our probes) or action notice (someone probed us).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EspionageReportType {
    Action,
    #[default]
    Report,
}

/// Full espionage report.
///
/// Tech levels are kept per section keyed by id. An id missing from its
/// section was not disclosed; a present zero was disclosed as absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EspionageReport {
    pub id: i64,
    #[serde(rename = "type")]
    pub kind: EspionageReportType,
    pub coordinate: Coordinate,
    pub date: Option<DateTime<FixedOffset>>,
    pub username: String,
    pub character_class: CharacterClass,
    pub alliance_class: AllianceClass,
    pub last_activity: i64,
    pub counter_espionage: i64,
    pub api_key: String,
    pub honorable_target: bool,
    pub is_bandit: bool,
    pub is_starlord: bool,
    pub is_inactive: bool,
    pub is_long_inactive: bool,
    pub resources: Resources,
    pub has_buildings_information: bool,
    pub has_researches_information: bool,
    pub has_fleet_information: bool,
    pub has_defenses_information: bool,
    pub buildings: BTreeMap<TechId, i64>,
    pub researches: BTreeMap<TechId, i64>,
    pub ships: BTreeMap<TechId, i64>,
    pub defenses: BTreeMap<TechId, i64>,
}

impl EspionageReport {
    /// Disclosed level or count of `id`, any section.
    pub fn level(&self, id: TechId) -> Option<i64> {
        [&self.buildings, &self.researches, &self.ships, &self.defenses]
            .into_iter()
            .find_map(|section| section.get(&id).copied())
    }

    pub fn resources_buildings(&self) -> Option<ResourcesBuildings> {
        self.has_buildings_information.then(|| {
            let mut out = ResourcesBuildings::default();
            fill(&self.buildings, |id, v| out.set(id, v));
            out
        })
    }

    pub fn facilities(&self) -> Option<Facilities> {
        self.has_buildings_information.then(|| {
            let mut out = Facilities::default();
            fill(&self.buildings, |id, v| out.set(id, v));
            out
        })
    }

    pub fn researches_infos(&self) -> Option<Researches> {
        self.has_researches_information.then(|| {
            let mut out = Researches::default();
            fill(&self.researches, |id, v| out.set(id, v));
            out
        })
    }

    pub fn ships_infos(&self) -> Option<ShipsInfos> {
        self.has_fleet_information.then(|| {
            let mut out = ShipsInfos::default();
            fill(&self.ships, |id, v| out.set(id, v));
            out
        })
    }

    pub fn defenses_infos(&self) -> Option<DefensesInfos> {
        self.has_defenses_information.then(|| {
            let mut out = DefensesInfos::default();
            fill(&self.defenses, |id, v| out.set(id, v));
            out
        })
    }

    /// Share of the target's resources an attack would carry away.
    pub fn plunder_ratio(&self, attacker_class: CharacterClass) -> f64 {
        let mut ratio = 0.5;
        if self.is_inactive && attacker_class == CharacterClass::Discoverer {
            ratio = 0.75;
        }
        if self.is_bandit {
            ratio = 1.0;
        } else if !self.is_inactive && self.is_starlord {
            ratio = 0.75;
        }
        ratio
    }

    pub fn loot(&self, attacker_class: CharacterClass) -> Resources {
        self.resources.scaled(self.plunder_ratio(attacker_class))
    }

    /// Fleet and defense sections were both revealed and hold nothing that
    /// fights back. Unrevealed sections never count as defenceless.
    pub fn is_defenceless(&self) -> bool {
        match (self.ships_infos(), self.defenses_infos()) {
            (Some(ships), Some(defenses)) => !ships.has_ships() && !defenses.has_ship_defense(),
            _ => false,
        }
    }
}

fn fill(section: &BTreeMap<TechId, i64>, mut set: impl FnMut(TechId, i64) -> bool) {
    for (id, level) in section {
        set(*id, *level);
    }
}

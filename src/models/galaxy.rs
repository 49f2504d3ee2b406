// src/models/galaxy.rs

//! Galaxy view of one solar system.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::Coordinate;

/// Debris field orbiting a slot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Debris {
    pub metal: i64,
    pub crystal: i64,
    pub deuterium: i64,
    pub recyclers_needed: i64,
}

/// Debris at the far edge of the system (slot 16).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpeditionDebris {
    pub metal: i64,
    pub crystal: i64,
    pub deuterium: i64,
    pub pathfinders_needed: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoonInfos {
    pub id: i64,
    pub name: String,
    pub diameter: i64,
    pub activity: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerInfos {
    pub id: i64,
    pub name: String,
    pub rank: i64,
    pub is_bandit: bool,
    pub is_starlord: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllianceInfos {
    pub id: i64,
    pub name: String,
    pub tag: String,
    pub rank: i64,
    pub member: i64,
}

/// Status flags shown next to a player in the galaxy view.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerFlags {
    pub administrator: bool,
    pub inactive: bool,
    pub vacation: bool,
    pub strong_player: bool,
    pub newbie: bool,
    pub honorable_target: bool,
    pub banned: bool,
}

/// Everything known about one occupied slot.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanetInfos {
    pub id: i64,
    pub name: String,
    pub img: String,
    pub coordinate: Coordinate,
    /// Minutes since last activity: 0 none, 15 within the quarter hour.
    pub activity: i64,
    #[serde(flatten)]
    pub flags: PlayerFlags,
    pub destroyed: bool,
    pub debris: Debris,
    pub moon: Option<MoonInfos>,
    pub player: PlayerInfos,
    pub alliance: Option<AllianceInfos>,
}

/// Galaxy events of the system.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SystemEvents {
    pub darkmatter: i64,
    pub has_asteroid: bool,
}

/// One solar system, keyed by slot 1 through 15.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SystemInfos {
    pub galaxy: i64,
    pub system: i64,
    pub overlay_token: String,
    pub planets: BTreeMap<i64, PlanetInfos>,
    pub expedition_debris: ExpeditionDebris,
    pub events: SystemEvents,
}

impl SystemInfos {
    /// Occupant of `position`, if any.
    pub fn position(&self, position: i64) -> Option<&PlanetInfos> {
        self.planets.get(&position)
    }

    pub fn iter(&self) -> impl Iterator<Item = &PlanetInfos> {
        self.planets.values()
    }
}

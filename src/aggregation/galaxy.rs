// src/aggregation/galaxy.rs

//! Galaxy reconciliation.
//!
//! Both galaxy layouts (HTML rows and the JSON `galaxyContent` list) are first
//! read into a [`RawSystem`]: per position, a list of entries tagged by kind.
//! [`reconcile`] then folds every entry into the record of its slot.

use crate::models::{
    AllianceInfos, Coordinate, Debris, ExpeditionDebris, MoonInfos, PlanetInfos, PlayerFlags,
    PlayerInfos, SystemEvents, SystemInfos,
};

/// Slot holding the expedition debris field.
pub const EXPEDITION_POSITION: i64 = 16;

/// Slot reserved for system events; never modeled as a celestial.
pub const EVENTS_POSITION: i64 = 17;

/// The requesting player, used for own planets whose row carries no player
/// tooltip.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GalaxyContext {
    pub player_id: i64,
    pub player_name: String,
    pub player_rank: i64,
}

/// Planet part of a galaxy row.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlanetEntry {
    pub id: i64,
    pub name: String,
    pub img: String,
    pub activity: i64,
    pub flags: PlayerFlags,
    pub destroyed: bool,
    pub player: PlayerInfos,
    pub alliance: Option<AllianceInfos>,
}

/// One body found at a position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GalaxyEntry {
    Planet(PlanetEntry),
    Moon(MoonInfos),
    Debris(Debris),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GalaxyRow {
    pub position: i64,
    pub entries: Vec<GalaxyEntry>,
}

/// Galaxy page as read, before reconciliation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawSystem {
    pub galaxy: i64,
    pub system: i64,
    pub overlay_token: String,
    pub rows: Vec<GalaxyRow>,
    pub events: SystemEvents,
}

/// Fold raw rows into per-position records.
///
/// Position 16 only contributes its debris, as expedition debris. Position
/// 17 is skipped. Rows without entries leave their slot empty.
pub fn reconcile(raw: RawSystem, ctx: &GalaxyContext) -> SystemInfos {
    let mut out = SystemInfos {
        galaxy: raw.galaxy,
        system: raw.system,
        overlay_token: raw.overlay_token,
        events: raw.events,
        ..SystemInfos::default()
    };

    for row in raw.rows {
        match row.position {
            EXPEDITION_POSITION => {
                for entry in row.entries {
                    if let GalaxyEntry::Debris(debris) = entry {
                        out.expedition_debris = ExpeditionDebris {
                            metal: debris.metal,
                            crystal: debris.crystal,
                            deuterium: debris.deuterium,
                            pathfinders_needed: debris.recyclers_needed,
                        };
                    }
                }
            }
            EVENTS_POSITION => {
                log::debug!("skipping events slot in {}:{}", raw.galaxy, raw.system);
            }
            position if row.entries.is_empty() => {
                log::debug!("empty slot {position}");
            }
            position => {
                let mut infos = PlanetInfos {
                    coordinate: Coordinate::planet(raw.galaxy, raw.system, position),
                    ..PlanetInfos::default()
                };
                for entry in row.entries {
                    apply(&mut infos, entry);
                }
                if !infos.destroyed && infos.player.id == 0 && infos.id != 0 {
                    infos.player.id = ctx.player_id;
                    infos.player.name = ctx.player_name.clone();
                    infos.player.rank = ctx.player_rank;
                }
                out.planets.insert(position, infos);
            }
        }
    }
    out
}

fn apply(infos: &mut PlanetInfos, entry: GalaxyEntry) {
    match entry {
        GalaxyEntry::Planet(planet) => {
            infos.id = planet.id;
            infos.name = planet.name;
            infos.img = planet.img;
            infos.activity = planet.activity;
            infos.flags = planet.flags;
            infos.destroyed = planet.destroyed;
            infos.player = planet.player;
            infos.alliance = planet.alliance;
        }
        GalaxyEntry::Moon(moon) => infos.moon = Some(moon),
        GalaxyEntry::Debris(debris) => infos.debris = debris,
    }
}

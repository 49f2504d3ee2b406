// src/extractors/v10.rs

//! 10.0: the galaxy view becomes a JSON document. Each `galaxyContent`
//! item lists the bodies of one position with a numeric `planetType`.

use serde::Deserialize;

use super::ExtractorTable;
use crate::aggregation::galaxy::{
    EXPEDITION_POSITION, GalaxyContext, GalaxyEntry, GalaxyRow, PlanetEntry, RawSystem, reconcile,
};
use crate::document::Document;
use crate::error::{ExtractError, Result};
use crate::models::{AllianceInfos, CelestialType, Debris, MoonInfos, PlayerFlags, PlayerInfos, SystemInfos};
use crate::utils::json;

pub fn table(base: ExtractorTable) -> ExtractorTable {
    ExtractorTable { galaxy, ..base }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GalaxyPayload {
    #[serde(default, deserialize_with = "json::boolean")]
    success: bool,
    #[serde(default, deserialize_with = "json::string")]
    new_ajax_token: String,
    #[serde(default, deserialize_with = "json::or_default")]
    system: SystemJson,
}

#[derive(Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct SystemJson {
    #[serde(deserialize_with = "json::int")]
    galaxy: i64,
    #[serde(deserialize_with = "json::int")]
    system: i64,
    #[serde(deserialize_with = "json::or_default")]
    galaxy_content: Vec<SlotJson>,
}

#[derive(Default, Deserialize)]
#[serde(default)]
struct SlotJson {
    #[serde(deserialize_with = "json::int")]
    position: i64,
    #[serde(deserialize_with = "json::or_default")]
    player: PlayerJson,
    #[serde(deserialize_with = "json::or_default")]
    planets: Bodies,
}

/// `planets` is a list, or a single object when the slot holds one body.
#[derive(Deserialize)]
#[serde(untagged)]
enum Bodies {
    Many(Vec<Body>),
    One(Body),
}

impl Default for Bodies {
    fn default() -> Self {
        Bodies::Many(Vec::new())
    }
}

impl Bodies {
    fn iter(&self) -> std::slice::Iter<'_, Body> {
        match self {
            Bodies::Many(list) => list.iter(),
            Bodies::One(body) => std::slice::from_ref(body).iter(),
        }
    }
}

#[derive(Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct Body {
    #[serde(deserialize_with = "json::int")]
    planet_type: i64,
    #[serde(deserialize_with = "json::int")]
    planet_id: i64,
    #[serde(deserialize_with = "json::string")]
    planet_name: String,
    #[serde(deserialize_with = "json::string")]
    image_information: String,
    #[serde(deserialize_with = "json::boolean")]
    is_destroyed: bool,
    #[serde(deserialize_with = "json::int")]
    size: i64,
    #[serde(deserialize_with = "json::or_default")]
    activity: Activity,
    #[serde(deserialize_with = "json::int")]
    required_ships: i64,
    #[serde(deserialize_with = "json::or_default")]
    resources: DebrisResources,
}

#[derive(Default, Deserialize)]
#[serde(default)]
struct DebrisResources {
    metal: Amount,
    crystal: Amount,
    deuterium: Amount,
}

#[derive(Default, Deserialize)]
#[serde(default)]
struct Amount {
    #[serde(deserialize_with = "json::int")]
    amount: i64,
}

#[derive(Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct PlayerJson {
    #[serde(deserialize_with = "json::int")]
    player_id: i64,
    #[serde(deserialize_with = "json::string")]
    player_name: String,
    #[serde(deserialize_with = "json::int")]
    highscore_position_player: i64,
    #[serde(deserialize_with = "json::or_default")]
    rank: RankJson,
    #[serde(deserialize_with = "json::int")]
    alliance_id: i64,
    #[serde(deserialize_with = "json::string")]
    alliance_name: String,
    #[serde(deserialize_with = "json::string")]
    alliance_tag: String,
    #[serde(deserialize_with = "json::int")]
    highscore_position_alliance: i64,
    #[serde(deserialize_with = "json::boolean")]
    is_alliance_member: bool,
    #[serde(deserialize_with = "json::boolean")]
    is_admin: bool,
    #[serde(deserialize_with = "json::boolean")]
    is_inactive: bool,
    #[serde(deserialize_with = "json::boolean")]
    is_on_vacation: bool,
    #[serde(deserialize_with = "json::boolean")]
    is_strong: bool,
    #[serde(deserialize_with = "json::boolean")]
    is_newbie: bool,
    #[serde(deserialize_with = "json::boolean")]
    is_honorable_target: bool,
    #[serde(deserialize_with = "json::boolean")]
    is_banned: bool,
}

#[derive(Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct RankJson {
    #[serde(deserialize_with = "json::string")]
    rank_class: String,
}

/// `showActivity` is `false` when hidden, 15 or 60 otherwise. A missing
/// activity object reads as hidden.
#[derive(Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct Activity {
    #[serde(default = "recently", deserialize_with = "json::int")]
    show_activity: i64,
    #[serde(deserialize_with = "json::boolean")]
    show_minutes: bool,
    #[serde(deserialize_with = "json::int")]
    idle_time: i64,
}

fn recently() -> i64 {
    15
}

impl Activity {
    /// Minutes since last activity: exact idle time inside the hour, 15 for
    /// "active recently", 0 when hidden.
    fn minutes(&self) -> i64 {
        match self.show_activity {
            0 => 0,
            60 if self.show_minutes => self.idle_time,
            _ => 15,
        }
    }
}

/// `{success, newAjaxToken, system: {galaxy, system, galaxyContent: [...]}}`.
///
/// A body that is not JSON means the session is gone.
fn galaxy(doc: &Document, ctx: &GalaxyContext) -> Result<SystemInfos> {
    let payload: GalaxyPayload = serde_json::from_str(doc.raw()).map_err(|_| ExtractError::NotLogged)?;
    if !payload.success {
        return Err(ExtractError::mismatch("success"));
    }

    let mut raw = RawSystem {
        galaxy: payload.system.galaxy,
        system: payload.system.system,
        overlay_token: payload.new_ajax_token,
        ..RawSystem::default()
    };
    for slot in &payload.system.galaxy_content {
        raw.rows.push(galaxy_row(slot));
    }
    Ok(reconcile(raw, ctx))
}

fn galaxy_row(slot: &SlotJson) -> GalaxyRow {
    let position = slot.position;
    let player = &slot.player;

    let mut entries = Vec::new();
    for body in slot.planets.iter() {
        // Only the first body of the expedition slot counts.
        if position == EXPEDITION_POSITION {
            entries.push(GalaxyEntry::Debris(debris(body)));
            break;
        }
        match CelestialType::from_code(body.planet_type) {
            Some(CelestialType::Planet) => {
                let rank_class = &player.rank.rank_class;
                entries.push(GalaxyEntry::Planet(PlanetEntry {
                    id: body.planet_id,
                    name: body.planet_name.clone(),
                    img: body.image_information.clone(),
                    activity: body.activity.minutes(),
                    flags: PlayerFlags {
                        administrator: player.is_admin,
                        inactive: player.is_inactive,
                        vacation: player.is_on_vacation,
                        strong_player: player.is_strong,
                        newbie: player.is_newbie,
                        honorable_target: player.is_honorable_target,
                        banned: player.is_banned,
                    },
                    destroyed: body.is_destroyed,
                    player: PlayerInfos {
                        id: player.player_id,
                        name: player.player_name.clone(),
                        rank: player.highscore_position_player,
                        is_bandit: rank_class.contains("bandit"),
                        is_starlord: rank_class.contains("starlord"),
                    },
                    alliance: (player.alliance_id > 0).then(|| AllianceInfos {
                        id: player.alliance_id,
                        name: player.alliance_name.clone(),
                        tag: player.alliance_tag.clone(),
                        rank: player.highscore_position_alliance,
                        member: i64::from(player.is_alliance_member),
                    }),
                }));
            }
            Some(CelestialType::Moon) => entries.push(GalaxyEntry::Moon(MoonInfos {
                id: body.planet_id,
                name: body.planet_name.clone(),
                diameter: body.size,
                activity: body.activity.minutes(),
            })),
            Some(CelestialType::Debris) => entries.push(GalaxyEntry::Debris(debris(body))),
            None => log::debug!("unknown body type at position {position}"),
        }
    }
    GalaxyRow { position, entries }
}

fn debris(body: &Body) -> Debris {
    Debris {
        metal: body.resources.metal.amount,
        crystal: body.resources.crystal.amount,
        deuterium: body.resources.deuterium.amount,
        recyclers_needed: body.required_ships,
    }
}

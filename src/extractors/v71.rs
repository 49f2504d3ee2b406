// src/extractors/v71.rs

//! 7.1: planet techs arrive as JSON keyed by technology id, the resources
//! payload is wrapped in a `resources` object with lifeform fields, union
//! rows carry their ids and the highscore table is parsed.

use serde::Deserialize;

use super::{ExtractorTable, json_failure, report, tooltip_value, v6};
use crate::clock::Clock;
use crate::document::{Document, Selection};
use crate::error::{ExtractError, Result};
use crate::models::{
    AttackEvent, Coordinate, DarkmatterDetails, DefensesInfos, EnergyDetails, Facilities,
    FoodDetails, Highscore, HighscorePlayer, LfBuildings, LfResearches, LifeformType,
    PopulationDetails, Researches, ResourcesBuildings, ResourcesDetails, ShipsInfos,
    StoredResource, TechSet, Techs, lf_building_ids, lf_research_ids,
};
use crate::utils::json;
use crate::utils::number::{parse_float, parse_i64, parse_int};
use crate::utils::text::{capture, captures};

pub fn table(base: ExtractorTable) -> ExtractorTable {
    ExtractorTable {
        resources_details_json,
        techs,
        highscore,
        attacks,
        espionage_report: |doc, config| report::extract(doc, config, report::V71),
        ..base
    }
}

/// `{resources: {metal: {amount, storage, tooltip}, ..., food, population}}`.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ResourcesPayload {
    resources: ResourceEntries,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ResourceEntries {
    metal: ResourceEntry,
    crystal: ResourceEntry,
    deuterium: ResourceEntry,
    energy: ResourceEntry,
    darkmatter: ResourceEntry,
    food: ResourceEntry,
    population: ResourceEntry,
}

/// Capacity and production come from the tooltip.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ResourceEntry {
    #[serde(deserialize_with = "json::int")]
    amount: i64,
    #[serde(deserialize_with = "json::string")]
    tooltip: String,
}

impl ResourceEntry {
    fn tooltip(&self) -> Document {
        Document::fragment(&self.tooltip)
    }

    fn stored(&self) -> Result<StoredResource> {
        let tip = self.tooltip();
        Ok(StoredResource {
            available: self.amount,
            storage_capacity: tooltip_value(&tip, 1)?,
            current_production: tooltip_value(&tip, 2)?,
        })
    }
}

pub(crate) fn resources_details_json(doc: &Document) -> Result<ResourcesDetails> {
    let payload: ResourcesPayload = serde_json::from_str(doc.raw()).map_err(|e| json_failure(doc, e))?;
    let entries = payload.resources;
    Ok(ResourcesDetails {
        metal: entries.metal.stored()?,
        crystal: entries.crystal.stored()?,
        deuterium: entries.deuterium.stored()?,
        energy: EnergyDetails {
            available: entries.energy.amount,
            ..v6::energy(&entries.energy.tooltip())?
        },
        darkmatter: DarkmatterDetails {
            available: entries.darkmatter.amount,
            ..v6::darkmatter(&entries.darkmatter.tooltip())?
        },
        food: food(&entries.food.tooltip())?,
        population: population(&entries.population.tooltip())?,
    })
}

/// Five-row food tooltip.
pub(crate) fn food(tooltip: &Document) -> Result<FoodDetails> {
    Ok(FoodDetails {
        available: tooltip_value(tooltip, 0)?,
        storage_capacity: tooltip_value(tooltip, 1)?,
        overproduction: tooltip_value(tooltip, 2)?,
        consumed_in: tooltip_value(tooltip, 3)?,
        time_till_food_runs_out: tooltip_value(tooltip, 4)?,
    })
}

/// Eight-row population tooltip. Hunger and growth are decimals, growth
/// prefixed with `±`.
pub(crate) fn population(tooltip: &Document) -> Result<PopulationDetails> {
    let cell = |row: usize| -> Result<String> {
        Ok(tooltip.select("table tr")?.eq(row).find("td")?.eq(0).text())
    };
    Ok(PopulationDetails {
        available: tooltip_value(tooltip, 0)?,
        t2_lifeforms: tooltip_value(tooltip, 1)?,
        t3_lifeforms: tooltip_value(tooltip, 2)?,
        living_space: tooltip_value(tooltip, 3)?,
        satisfied: tooltip_value(tooltip, 4)?,
        hungry: parse_float(cell(5)?.trim()),
        growth_rate: parse_float(cell(6)?.trim().trim_start_matches('±')),
        bunker_space: tooltip_value(tooltip, 7)?,
    })
}

/// Every family from one `{"1": 30, "202": 5, "11101": 2, ...}` object.
///
/// The lifeform species is the one with a built level; a planet without
/// lifeform buildings reports [`LifeformType::None`].
fn techs(doc: &Document) -> Result<Techs> {
    let levels = json::levels(&mut serde_json::Deserializer::from_str(doc.raw()))
        .map_err(|e| json_failure(doc, e))?;
    let level = |id: i64| levels.get(&id).copied().unwrap_or(0);
    let read = |id: i64| -> Result<i64> { Ok(level(id)) };

    let lifeform_type = LifeformType::ALL
        .into_iter()
        .find(|&lt| lf_building_ids(lt).into_iter().any(|id| level(id) > 0))
        .unwrap_or_default();
    let lf_buildings = LfBuildings {
        lifeform_type,
        levels: lf_building_ids(lifeform_type)
            .into_iter()
            .map(|id| (id, level(id)))
            .collect(),
    };
    let lf_researches = LfResearches {
        levels: LifeformType::ALL
            .into_iter()
            .flat_map(lf_research_ids)
            .filter_map(|id| Some((id, level(id))).filter(|(_, n)| *n > 0))
            .collect(),
    };

    Ok(Techs {
        resources_buildings: ResourcesBuildings::read_each(read)?,
        facilities: Facilities::read_each(read)?,
        ships: ShipsInfos::read_each(read)?,
        defenses: DefensesInfos::read_each(read)?,
        researches: Researches::read_each(read)?,
        lf_buildings,
        lf_researches,
    })
}

// Highscore

/// Reads the player id of a ranking row.
pub(crate) type PlayerId = fn(&Selection<'_>) -> i64;

fn highscore(doc: &Document) -> Result<Highscore> {
    read_highscore(doc, |row| {
        parse_i64(row.find("td.sendmsg a").map(|a| a.attr_or("data-playerid", "0")).unwrap_or("0"))
    })
}

/// Ranking page, either the full page or the `#stat_list_content` AJAX
/// fragment. Rows without a homeworld link are skipped.
pub(crate) fn read_highscore(doc: &Document, player_id: PlayerId) -> Result<Highscore> {
    let scope = if doc.select("#stat_list_content")?.len() == 1 {
        "#stat_list_content "
    } else {
        ""
    };
    let script = doc.select(&format!("{scope}script"))?.first().text();
    let variable = |name: &str| -> Result<i64> {
        let pattern = format!(r"var {name} = (\d+);");
        capture(&script, &pattern)?
            .map(|n| parse_i64(&n))
            .ok_or_else(|| ExtractError::mismatch(format!("var {name}")))
    };

    let mut out = Highscore {
        curr_page: variable("site")?,
        category: variable("currentCategory")?,
        kind: variable("currentType")?,
        nb_page: (doc.select(&format!("{scope}select.changeSite option"))?.len() as i64 - 1).max(0),
        players: Vec::new(),
    };

    for row in doc.select(&format!("{scope}#ranks tbody tr"))?.each() {
        let mut player = HighscorePlayer {
            position: parse_i64(row.find("td.position")?.text().trim()),
            id: player_id(&row),
            name: row.find("span.playername")?.text().trim().to_string(),
            ..HighscorePlayer::default()
        };
        let ally = row.find("td.name span.ally-tag a")?.attr_or("href", "").to_string();
        if let Some(id) = capture(&ally, r"allianceId=(\d+)")? {
            player.alliance_id = parse_i64(&id);
        }

        let mut homeworld = None;
        for link in row.find("td.name a")?.each() {
            let href = link.attr_or("href", "");
            if let Some(m) = captures(href, r"galaxy=(\d+)&system=(\d+)&position=(\d+)")? {
                homeworld = Some(Coordinate::planet(parse_i64(&m[0]), parse_i64(&m[1]), parse_i64(&m[2])));
                break;
            }
        }
        let Some(homeworld) = homeworld else {
            log::debug!("highscore row {} without homeworld", player.position);
            continue;
        };
        player.homeworld = homeworld;
        player.honour_points = parse_int(row.find("span.honorScore span")?.text().trim());

        let score = row.find("td.score")?;
        player.score = parse_int(score.text().trim());
        if let Some(ships) = capture(score.attr_or("title", "0").trim(), r"([\d.]+)")? {
            player.ships = parse_int(&ships);
        }
        out.players.push(player);
    }
    Ok(out)
}

// Event list

pub(crate) const EVENT_LIST: v6::EventList = v6::EventList {
    row_ids: true,
    keep_friendly: true,
};

fn attacks(doc: &Document, clock: &dyn Clock, own: &[Coordinate]) -> Result<Vec<AttackEvent>> {
    v6::read_attacks(doc, clock, own, EVENT_LIST)
}

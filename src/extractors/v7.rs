// src/extractors/v7.rs

//! 7.0: technologies become named spans carrying `data-value`, the resource
//! bar moves to `div#*_box`, build queues print an end timestamp and cancel
//! links go through the `component=overview` endpoint.

use serde::Deserialize;

use super::{ExtractorTable, json_failure, reject_overview, report, tooltip_value, v6};
use crate::clock::Clock;
use crate::config::ExtractorConfig;
use crate::document::Document;
use crate::error::{ExtractError, Result};
use crate::models::ids::*;
use crate::models::{
    CancelInfos, CharacterClass, CombatReportSummary, Constructions, DarkmatterDetails,
    DefensesInfos, EnergyDetails, Facilities, Page, QueueItem, Researches, Resources, ResourcesBuildings, ResourcesDetails, ShipsInfos,
    StoredResource, TechSet,
};
use crate::utils::json;
use crate::utils::number::parse_i64;
use crate::utils::text::capture;

pub fn table(base: ExtractorTable) -> ExtractorTable {
    ExtractorTable {
        resources,
        resources_details,
        resources_details_json,
        resources_buildings,
        facilities,
        ships,
        defenses,
        researches,
        character_class,
        constructions,
        cancel_building,
        cancel_research,
        combat_report_summaries,
        espionage_report: |doc, config| report::extract(doc, config, report::V7),
        ..base
    }
}

/// Name of the span holding a technology, as used in 7.x markup.
pub(crate) fn tech_name(id: TechId) -> Option<&'static str> {
    Some(match id {
        METAL_MINE => "metalMine",
        CRYSTAL_MINE => "crystalMine",
        DEUTERIUM_SYNTHESIZER => "deuteriumSynthesizer",
        SOLAR_PLANT => "solarPlant",
        FUSION_REACTOR => "fusionPlant",
        METAL_STORAGE => "metalStorage",
        CRYSTAL_STORAGE => "crystalStorage",
        DEUTERIUM_TANK => "deuteriumStorage",

        ROBOTICS_FACTORY => "roboticsFactory",
        SHIPYARD => "shipyard",
        RESEARCH_LAB => "researchLaboratory",
        ALLIANCE_DEPOT => "allianceDepot",
        MISSILE_SILO => "missileSilo",
        NANITE_FACTORY => "naniteFactory",
        TERRAFORMER => "terraformer",
        SPACE_DOCK => "repairDock",
        LUNAR_BASE => "lunarBase",
        SENSOR_PHALANX => "sensorPhalanx",
        JUMP_GATE => "jumpGate",

        ENERGY_TECHNOLOGY => "energyTechnology",
        LASER_TECHNOLOGY => "laserTechnology",
        ION_TECHNOLOGY => "ionTechnology",
        HYPERSPACE_TECHNOLOGY => "hyperspaceTechnology",
        PLASMA_TECHNOLOGY => "plasmaTechnology",
        COMBUSTION_DRIVE => "combustionDriveTechnology",
        IMPULSE_DRIVE => "impulseDriveTechnology",
        HYPERSPACE_DRIVE => "hyperspaceDriveTechnology",
        ESPIONAGE_TECHNOLOGY => "espionageTechnology",
        COMPUTER_TECHNOLOGY => "computerTechnology",
        ASTROPHYSICS => "astrophysicsTechnology",
        INTERGALACTIC_RESEARCH_NETWORK => "researchNetworkTechnology",
        GRAVITON_TECHNOLOGY => "gravitonTechnology",
        WEAPONS_TECHNOLOGY => "weaponsTechnology",
        SHIELDING_TECHNOLOGY => "shieldingTechnology",
        ARMOUR_TECHNOLOGY => "armorTechnology",

        LIGHT_FIGHTER => "fighterLight",
        HEAVY_FIGHTER => "fighterHeavy",
        CRUISER => "cruiser",
        BATTLESHIP => "battleship",
        BATTLECRUISER => "interceptor",
        BOMBER => "bomber",
        DESTROYER => "destroyer",
        DEATHSTAR => "deathstar",
        REAPER => "reaper",
        PATHFINDER => "explorer",
        SMALL_CARGO => "transporterSmall",
        LARGE_CARGO => "transporterLarge",
        COLONY_SHIP => "colonyShip",
        RECYCLER => "recycler",
        ESPIONAGE_PROBE => "espionageProbe",
        SOLAR_SATELLITE => "solarSatellite",
        CRAWLER => "resbuggy",

        ROCKET_LAUNCHER => "rocketLauncher",
        LIGHT_LASER => "laserCannonLight",
        HEAVY_LASER => "laserCannonHeavy",
        GAUSS_CANNON => "gaussCannon",
        ION_CANNON => "ionCannon",
        PLASMA_TURRET => "plasmaCannon",
        SMALL_SHIELD_DOME => "shieldDomeSmall",
        LARGE_SHIELD_DOME => "shieldDomeLarge",
        ANTI_BALLISTIC_MISSILES => "missileInterceptor",
        INTERPLANETARY_MISSILES => "missileInterplanetary",
        _ => return None,
    })
}

/// `data-value` of the level span, or of the amount span for units.
pub(crate) fn tech_value(doc: &Document, id: TechId) -> Result<i64> {
    let Some(name) = tech_name(id) else {
        return Ok(0);
    };
    let inner = if (200..600).contains(&id) { "span.amount" } else { "span.level" };
    level_of(doc, &format!("span.{name} {inner}"))
}

pub(crate) fn level_of(doc: &Document, css: &str) -> Result<i64> {
    Ok(parse_i64(doc.select(css)?.first().attr_or("data-value", "0")))
}

fn resources_buildings(doc: &Document) -> Result<ResourcesBuildings> {
    reject_overview(doc)?;
    ResourcesBuildings::read_each(|id| tech_value(doc, id))
}

fn facilities(doc: &Document) -> Result<Facilities> {
    reject_overview(doc)?;
    Facilities::read_each(|id| tech_value(doc, id))
}

fn ships(doc: &Document) -> Result<ShipsInfos> {
    reject_overview(doc)?;
    ShipsInfos::read_each(|id| tech_value(doc, id))
}

fn defenses(doc: &Document) -> Result<DefensesInfos> {
    reject_overview(doc)?;
    DefensesInfos::read_each(|id| tech_value(doc, id))
}

fn researches(doc: &Document) -> Result<Researches> {
    Researches::read_each(|id| tech_value(doc, id))
}

fn character_class(doc: &Document) -> Result<CharacterClass> {
    let badge = doc.select("div#characterclass a div")?;
    if badge.has_class("miner") {
        Ok(CharacterClass::Collector)
    } else if badge.has_class("warrior") {
        Ok(CharacterClass::General)
    } else if badge.has_class("explorer") {
        Ok(CharacterClass::Discoverer)
    } else {
        Err(ExtractError::mismatch("div#characterclass a div"))
    }
}

// Resource bar

fn resources(doc: &Document) -> Result<Resources> {
    Ok(resources_details(doc)?.available())
}

/// Every value of the bar comes from the `div#*_box` tooltips.
fn resources_details(doc: &Document) -> Result<ResourcesDetails> {
    let tooltip = |name: &str| doc.nested(&format!("div#{name}_box"), "title");
    Ok(ResourcesDetails {
        metal: v6::stored(&tooltip("metal")?)?,
        crystal: v6::stored(&tooltip("crystal")?)?,
        deuterium: v6::stored(&tooltip("deuterium")?)?,
        energy: v6::energy(&tooltip("energy")?)?,
        darkmatter: v6::darkmatter(&tooltip("darkmatter")?)?,
        ..ResourcesDetails::default()
    })
}

/// `{metal: {actual, max, tooltip}, ...}`.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ResourcesPayload {
    metal: ResourceEntry,
    crystal: ResourceEntry,
    deuterium: ResourceEntry,
    energy: ResourceEntry,
    darkmatter: ResourceEntry,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ResourceEntry {
    #[serde(deserialize_with = "json::int")]
    actual: i64,
    #[serde(deserialize_with = "json::int")]
    max: i64,
    #[serde(deserialize_with = "json::string")]
    tooltip: String,
}

impl ResourceEntry {
    fn tooltip(&self) -> Document {
        Document::fragment(&self.tooltip)
    }
}

fn resources_details_json(doc: &Document) -> Result<ResourcesDetails> {
    let payload: ResourcesPayload = serde_json::from_str(doc.raw()).map_err(|e| json_failure(doc, e))?;
    let stored = |entry: &ResourceEntry| -> Result<StoredResource> {
        Ok(StoredResource {
            available: entry.actual,
            storage_capacity: entry.max,
            current_production: tooltip_value(&entry.tooltip(), 2)?,
        })
    };
    Ok(ResourcesDetails {
        metal: stored(&payload.metal)?,
        crystal: stored(&payload.crystal)?,
        deuterium: stored(&payload.deuterium)?,
        energy: EnergyDetails {
            available: payload.energy.actual,
            ..v6::energy(&payload.energy.tooltip())?
        },
        darkmatter: DarkmatterDetails {
            available: payload.darkmatter.actual,
            ..v6::darkmatter(&payload.darkmatter.tooltip())?
        },
        ..ResourcesDetails::default()
    })
}

// Build queues

/// Seconds left on queue `queue` (`building`, `research`, `lfbuilding`,
/// `lfresearch`) from its `restTime` end timestamp.
pub(crate) fn rest_time(doc: &Document, queue: &str, clock: &dyn Clock) -> Result<Option<i64>> {
    let pattern = format!(r"var restTime{queue} = (\d+) -");
    Ok(capture(doc.raw(), &pattern)?.map(|end| clock.until(parse_i64(&end))))
}

pub(crate) fn queue(doc: &Document, queue: &str, clock: &dyn Clock) -> Result<Option<QueueItem>> {
    let countdown = rest_time(doc, queue, clock)?;
    v6::queued(doc.raw(), countdown, &format!(r#"onclick="cancel{queue}\((\d+),"#))
}

fn constructions(doc: &Document, clock: &dyn Clock) -> Result<Constructions> {
    Ok(Constructions {
        building: queue(doc, "building", clock)?,
        research: queue(doc, "research", clock)?,
        ..Constructions::default()
    })
}

/// Cancel handle behind script variable `link_var`, ids from the
/// `function_name(techId, listId, ...)` onclick of construction table `index`.
pub(crate) fn cancel_by_link(doc: &Document, link_var: &str, function_name: &str, index: usize) -> Result<CancelInfos> {
    let pattern = format!(r"{link_var}[^?]+\?page=ingame&component=overview&modus=2&token=(\w+)&action=cancel");
    let token = capture(doc.raw(), &pattern)?.ok_or_else(|| ExtractError::token(link_var))?;
    v6::cancel_from_table(
        doc,
        token,
        index,
        "a.abortNow",
        &format!(r"{function_name}\((\d+),\s?(\d+),"),
    )
}

fn cancel_building(doc: &Document, _config: &ExtractorConfig) -> Result<CancelInfos> {
    cancel_by_link(doc, "cancelLinkbuilding", "cancelbuilding", 0)
}

fn cancel_research(doc: &Document, _config: &ExtractorConfig) -> Result<CancelInfos> {
    cancel_by_link(doc, "cancelLinkresearch", "cancelresearch", 1)
}

// Messages

pub(crate) const COMBAT_LIST: v6::CombatList = v6::CombatList {
    origin_pattern: r"page=ingame&component=fleetdispatch&galaxy=(\d+)&system=(\d+)&position=(\d+)&type=(\d+)&",
    api_key: true,
};

fn combat_report_summaries(doc: &Document) -> Result<Page<CombatReportSummary>> {
    v6::read_combat_summaries(doc, COMBAT_LIST)
}

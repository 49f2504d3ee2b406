// src/extractors/v6.rs

//! Base table: the 6.x desktop layout.
//!
//! Levels live in `div.{family}{id} span.level` text, ship counts in the
//! title of their `div`, and the resource bar tooltips hang off `li#*_box`.
//! Readers that later versions reuse with different anchors are exposed as
//! `pub(crate)` and take a small layout value.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::Deserialize;

use super::{
    ExtractorTable, ajax_chat_token, body_id, is_logged, is_mobile, json_failure, ogame_session,
    ogame_timestamp, planet_coordinate, planet_id, planet_type, reject_overview, report,
    server_time_at, tear_down_token, tooltip_value, upgrade_token,
};
use crate::aggregation::attacks::{AttackRow, merge};
use crate::aggregation::galaxy::{
    EXPEDITION_POSITION, GalaxyContext, GalaxyEntry, GalaxyRow, PlanetEntry, RawSystem, reconcile,
};
use crate::aggregation::messages::page_count;
use crate::clock::Clock;
use crate::config::ExtractorConfig;
use crate::document::{Document, Selection};
use crate::error::{ExtractError, Result};
use crate::models::ids::*;
use crate::models::{
    AllianceInfos, AttackEvent, CancelInfos, CelestialType, CombatReportSummary, Constructions,
    Coordinate, DarkmatterDetails, Debris, DefensesInfos, EnergyDetails, EspionageReportSummary,
    EspionageReportType, Facilities, Fields, Fleet, MoonInfos, Page, Planet, PlayerFlags, PlayerInfos,
    QueueItem, Researches, Resources, ResourcesBuildings, ResourcesDetails, ShipsInfos, Slots,
    StoredResource, SystemInfos, TechSet, Temperature,
};
use crate::utils::json;
use crate::utils::number::{parse_i64, parse_int};
use crate::utils::text::{capture, captures};
use crate::utils::url::query_i64;

const PLANET_INFOS: &str = r"([^\[]+) \[(\d+):(\d+):(\d+)](?:[^:]+:\s\D+)?([\d.,]+)(?i)(?:km|км)? \((\d+)/(\d+)\)(?:de|da|od|mellem|)?\s*([-\d]+).+C\s*(?:bis|-tl|para|to|a|do|ile|tot|og|til|la|:sta)\s*([-\d]+).+C";

const MOON_INFOS: &str = r"([^\[]+) \[(\d+):(\d+):(\d+)]([\d.,]+)(?i)(?:km|км)? \((\d+)/(\d+)\)";

/// `label: 1.234` lines of galaxy tooltips.
const PREFIXED_NUMBER: &str = r".*: ([\d.,]+)";

pub fn table() -> ExtractorTable {
    ExtractorTable {
        is_logged,
        is_mobile,
        ogame_session,
        body_id,
        planet_id,
        planet_type,
        planet_coordinate,
        ogame_timestamp,
        server_time,

        upgrade_token,
        tear_down_token,
        ajax_chat_token,

        resources,
        resources_details,
        resources_details_json,

        resources_buildings,
        facilities,
        ships,
        defenses,
        researches,
        techs: |_| Err(ExtractError::Unavailable("techs")),
        character_class: |_| Err(ExtractError::Unavailable("character_class")),
        lf_buildings: |_| Err(ExtractError::Unavailable("lf_buildings")),
        lf_researches: |_| Err(ExtractError::Unavailable("lf_researches")),

        planets,
        constructions,
        cancel_building,
        cancel_research,
        cancel_lf_building: |_, _| Err(ExtractError::Unavailable("cancel_lf_building")),
        technology_details: |_| Err(ExtractError::Unavailable("technology_details")),

        fleets,
        slots,

        highscore: |_| Err(ExtractError::Unavailable("highscore")),
        attacks,
        combat_report_summaries,
        espionage_report_summaries,
        espionage_report: |doc, config| report::extract(doc, config, report::V6),
        galaxy,
    }
}

fn server_time(doc: &Document, clock: &dyn Clock) -> Result<DateTime<chrono::FixedOffset>> {
    server_time_at(doc, "li.OGameClock", clock)
}

// Resources

fn resources(doc: &Document) -> Result<Resources> {
    let amount = |name: &str| -> Result<i64> {
        tooltip_value(&doc.nested(&format!("li#{name}_box"), "title")?, 0)
    };
    Ok(Resources {
        metal: amount("metal")?,
        crystal: amount("crystal")?,
        deuterium: amount("deuterium")?,
        energy: amount("energy")?,
        darkmatter: amount("darkmatter")?,
        ..Resources::default()
    })
}

/// Available, storage and production rows of a metal, crystal or
/// deuterium tooltip.
pub(crate) fn stored(tooltip: &Document) -> Result<StoredResource> {
    Ok(StoredResource {
        available: tooltip_value(tooltip, 0)?,
        storage_capacity: tooltip_value(tooltip, 1)?,
        current_production: tooltip_value(tooltip, 2)?,
    })
}

pub(crate) fn energy(tooltip: &Document) -> Result<EnergyDetails> {
    Ok(EnergyDetails {
        available: tooltip_value(tooltip, 0)?,
        current_production: tooltip_value(tooltip, 1)?,
        consumption: tooltip_value(tooltip, 2)?,
    })
}

pub(crate) fn darkmatter(tooltip: &Document) -> Result<DarkmatterDetails> {
    Ok(DarkmatterDetails {
        available: tooltip_value(tooltip, 0)?,
        purchased: tooltip_value(tooltip, 1)?,
        found: tooltip_value(tooltip, 2)?,
    })
}

fn resources_details(doc: &Document) -> Result<ResourcesDetails> {
    let tooltip = |name: &str| doc.nested(&format!("li#{name}_box"), "title");
    let available = |name: &str| -> Result<i64> {
        Ok(parse_int(&doc.text(&format!("span#resources_{name}"))?))
    };

    let mut out = ResourcesDetails {
        metal: stored(&tooltip("metal")?)?,
        crystal: stored(&tooltip("crystal")?)?,
        deuterium: stored(&tooltip("deuterium")?)?,
        energy: energy(&tooltip("energy")?)?,
        darkmatter: darkmatter(&tooltip("darkmatter")?)?,
        ..ResourcesDetails::default()
    };
    out.metal.available = available("metal")?;
    out.crystal.available = available("crystal")?;
    out.deuterium.available = available("deuterium")?;
    out.energy.available = available("energy")?;
    out.darkmatter.available = available("darkmatter")?;
    Ok(out)
}

/// `fetchResources` payload: `{metal: {resources: {actual, max}, tooltip}, ...}`.
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
    #[serde(deserialize_with = "json::string")]
    tooltip: String,
    #[serde(deserialize_with = "json::or_default")]
    resources: ResourceAmounts,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ResourceAmounts {
    #[serde(deserialize_with = "json::int")]
    actual: i64,
    #[serde(deserialize_with = "json::int")]
    max: i64,
}

impl ResourceEntry {
    fn tooltip(&self) -> Document {
        Document::fragment(&self.tooltip)
    }

    fn stored(&self) -> Result<StoredResource> {
        Ok(StoredResource {
            available: self.resources.actual,
            storage_capacity: self.resources.max,
            current_production: tooltip_value(&self.tooltip(), 2)?,
        })
    }
}

fn resources_details_json(doc: &Document) -> Result<ResourcesDetails> {
    let payload: ResourcesPayload = serde_json::from_str(doc.raw()).map_err(|e| json_failure(doc, e))?;
    let energy_tip = payload.energy.tooltip();
    let darkmatter_tip = payload.darkmatter.tooltip();
    Ok(ResourcesDetails {
        metal: payload.metal.stored()?,
        crystal: payload.crystal.stored()?,
        deuterium: payload.deuterium.stored()?,
        energy: EnergyDetails {
            available: payload.energy.resources.actual,
            current_production: tooltip_value(&energy_tip, 1)?,
            consumption: tooltip_value(&energy_tip, 2)?,
        },
        darkmatter: DarkmatterDetails {
            available: payload.darkmatter.resources.actual,
            purchased: tooltip_value(&darkmatter_tip, 1)?,
            found: tooltip_value(&darkmatter_tip, 2)?,
        },
        ..ResourcesDetails::default()
    })
}

// Tech levels

/// Level printed in `div.{prefix}{id} span.level`, label text left out.
fn level(doc: &Document, prefix: &str, id: TechId) -> Result<i64> {
    Ok(parse_int(
        &doc.select(&format!("div.{prefix}{id} span.level"))?.own_text(),
    ))
}

/// Ship count from the `Name (12)` title of its box.
fn ship_count(doc: &Document, id: TechId) -> Result<i64> {
    let family = match id {
        SMALL_CARGO | LARGE_CARGO | COLONY_SHIP | RECYCLER | ESPIONAGE_PROBE | SOLAR_SATELLITE => "civil",
        // Not built before 7.0.
        CRAWLER | REAPER | PATHFINDER => return Ok(0),
        _ => "military",
    };
    let div = doc.select(&format!("div.{family}{id}"))?;
    let mut title = div.attr_or("title", "");
    if title.is_empty() {
        title = div.find("a")?.attr_or("title", "");
    }
    Ok(capture(title, r".+\(([\d.,]+)\)")?
        .map(|n| parse_int(&n))
        .unwrap_or(0))
}

fn resources_buildings(doc: &Document) -> Result<ResourcesBuildings> {
    reject_overview(doc)?;
    ResourcesBuildings::read_each(|id| level(doc, "supply", id))
}

fn facilities(doc: &Document) -> Result<Facilities> {
    reject_overview(doc)?;
    Facilities::read_each(|id| level(doc, "station", id))
}

fn defenses(doc: &Document) -> Result<DefensesInfos> {
    reject_overview(doc)?;
    DefensesInfos::read_each(|id| level(doc, "defense", id))
}

fn ships(doc: &Document) -> Result<ShipsInfos> {
    reject_overview(doc)?;
    ShipsInfos::read_each(|id| ship_count(doc, id))
}

/// Research levels are account wide, any page will do.
fn researches(doc: &Document) -> Result<Researches> {
    Researches::read_each(|id| level(doc, "research", id))
}

// Planets

fn planets(doc: &Document) -> Result<Vec<Planet>> {
    let mut out = Vec::new();
    for row in doc.select("div.smallplanet")?.each() {
        match planet(&row)? {
            Some(planet) => out.push(planet),
            None => log::debug!("skipping unreadable planet row {:?}", row.attr("id")),
        }
    }
    Ok(out)
}

fn planet(row: &Selection<'_>) -> Result<Option<Planet>> {
    let Ok(id) = row.attr_or("id", "").trim_start_matches("planet-").parse::<i64>() else {
        return Ok(None);
    };
    let infos = row.find("a.planetlink")?.nested("title").text("html")?;
    let Some(m) = captures(&infos, PLANET_INFOS)? else {
        return Ok(None);
    };
    Ok(Some(Planet {
        id,
        img: row.find("img.planetPic")?.attr_or("src", "").to_string(),
        name: m[0].trim().to_string(),
        diameter: parse_int(&m[4]),
        coordinate: Coordinate::planet(parse_i64(&m[1]), parse_i64(&m[2]), parse_i64(&m[3])),
        fields: Fields {
            built: parse_i64(&m[5]),
            total: parse_i64(&m[6]),
        },
        temperature: Temperature {
            min: parse_i64(&m[7]),
            max: parse_i64(&m[8]),
        },
        moon: moon(&row.find("a.moonlink")?)?,
    }))
}

fn moon(link: &Selection<'_>) -> Result<Option<crate::models::Moon>> {
    let Some(id) = link.attr("href").and_then(|href| query_i64(href, "cp")) else {
        return Ok(None);
    };
    let infos = link.nested("title").text("html")?;
    let Some(m) = captures(&infos, MOON_INFOS)? else {
        return Ok(None);
    };
    Ok(Some(crate::models::Moon {
        id,
        img: link.find("img.icon-moon")?.attr_or("src", "").to_string(),
        name: m[0].trim().to_string(),
        diameter: parse_int(&m[4]),
        coordinate: Coordinate::moon(parse_i64(&m[1]), parse_i64(&m[2]), parse_i64(&m[3])),
        fields: Fields {
            built: parse_i64(&m[5]),
            total: parse_i64(&m[6]),
        },
    }))
}

// Build queues

/// Queue entry whose tech id sits in the first group of `id_pattern`.
///
/// `countdown` is `None` when the queue is idle.
pub(crate) fn queued(raw: &str, countdown: Option<i64>, id_pattern: &str) -> Result<Option<QueueItem>> {
    let Some(countdown) = countdown else {
        return Ok(None);
    };
    let id = capture(raw, id_pattern)?.ok_or_else(|| ExtractError::mismatch(id_pattern))?;
    Ok(Some(QueueItem {
        id: parse_i64(&id),
        countdown,
    }))
}

/// 6.x prints the remaining seconds directly.
fn constructions(doc: &Document, _clock: &dyn Clock) -> Result<Constructions> {
    let raw = doc.raw();
    let remaining = |pattern: &str| -> Result<Option<i64>> {
        Ok(capture(raw, pattern)?.map(|n| parse_i64(&n).abs()))
    };
    Ok(Constructions {
        building: queued(
            raw,
            remaining(r#"getElementByIdWithCache\("Countdown"\),(\d+),"#)?,
            r#"onclick="cancelProduction\((\d+),"#,
        )?,
        research: queued(
            raw,
            remaining(r#"getElementByIdWithCache\("researchCountdown"\),(\d+),"#)?,
            r#"onclick="cancelResearch\((\d+),"#,
        )?,
        ..Constructions::default()
    })
}

/// Tech and list ids from the onclick of `link` in construction table `index`.
pub(crate) fn cancel_from_table(
    doc: &Document,
    token: String,
    index: usize,
    link: &str,
    onclick: &str,
) -> Result<CancelInfos> {
    let handler = doc
        .select("table.construction")?
        .eq(index)
        .find(link)?
        .first()
        .attr_or("onclick", "")
        .to_string();
    let m = captures(&handler, onclick)?.ok_or_else(|| ExtractError::mismatch(onclick))?;
    Ok(CancelInfos {
        token,
        tech_id: parse_i64(&m[0]),
        list_id: parse_i64(&m[1]),
    })
}

fn cancel_building(doc: &Document, _config: &ExtractorConfig) -> Result<CancelInfos> {
    let token = capture(
        doc.raw(),
        r#"page=overview&modus=2&token=(\w+)&techid="\+cancelProduction_id\+"&listid="\+production_listid"#,
    )?
    .ok_or_else(|| ExtractError::token("cancel building"))?;
    cancel_from_table(doc, token, 0, "a.abortNow", r"cancelProduction\((\d+),\s?(\d+),")
}

fn cancel_research(doc: &Document, _config: &ExtractorConfig) -> Result<CancelInfos> {
    let token = capture(
        doc.raw(),
        r#"page=overview&modus=2&token=(\w+)"\+"&techid="\+id\+"&listid="\+listId"#,
    )?
    .ok_or_else(|| ExtractError::token("cancel research"))?;
    cancel_from_table(doc, token, 1, "a.abortNow", r"cancelResearch\((\d+),\s?(\d+),")
}

// Event list

/// Event list variants.
#[derive(Debug, Clone, Copy)]
pub(crate) struct EventList {
    /// Rows carry `eventRow-N` ids and alliance rows are grouped attacks.
    pub row_ids: bool,
    /// Non-hostile rows are kept so friendly invitations and union members
    /// take part in the merge.
    pub keep_friendly: bool,
}

pub(crate) const EVENT_LIST: EventList = EventList {
    row_ids: false,
    keep_friendly: false,
};

fn attacks(doc: &Document, clock: &dyn Clock, own: &[Coordinate]) -> Result<Vec<AttackEvent>> {
    read_attacks(doc, clock, own, EVENT_LIST)
}

pub(crate) fn read_attacks(
    doc: &Document,
    clock: &dyn Clock,
    own: &[Coordinate],
    list: EventList,
) -> Result<Vec<AttackEvent>> {
    if !doc.exists("div#eventListWrap")? {
        if ogame_session(doc).is_ok() {
            return Err(ExtractError::EventsBoxNotDisplayed);
        }
        return Err(ExtractError::NotLogged);
    }

    let mut rows = Vec::new();
    for (css, alliance) in [("tr.allianceAttack", true), ("tr.eventFleet", false)] {
        for tr in doc.select(css)?.each() {
            if let Some(row) = attack_row(&tr, clock, alliance, list)? {
                rows.push(row);
            }
        }
    }
    Ok(merge(rows, own))
}

fn attack_row(tr: &Selection<'_>, clock: &dyn Clock, alliance: bool, list: EventList) -> Result<Option<AttackRow>> {
    let classes = tr.attr_or("class", "");
    let countdown = tr.find("td.countDown")?;
    let hostile = countdown.has_class("hostile") || !countdown.find("span.hostile")?.is_empty();
    let friendly = countdown.has_class("friendly") || !countdown.find("span.friendly")?.is_empty();
    if !hostile && !list.keep_friendly {
        return Ok(None);
    }

    let mission = if list.row_ids && alliance {
        Some(MissionId::GroupedAttack)
    } else {
        MissionId::from_code(parse_i64(tr.attr_or("data-mission-type", "")))
    };
    let Some(mission_type) = mission.filter(|m| m.is_hostile_kind()) else {
        return Ok(None);
    };

    let id = if list.row_ids { event_id(tr)? } else { 0 };

    let sender = tr.find("a.sendMail")?;
    let attacker_id = parse_i64(sender.attr_or("data-playerid", ""));
    let origin = if attacker_id != 0 {
        fleet_coordinate(tr, "td.coordsOrigin", "td.originFleet figure")?
    } else {
        None
    };

    let missiles = if mission_type == MissionId::MissileAttack {
        parse_int(&tr.find("td.detailsFleet span")?.first().text())
    } else {
        0
    };

    let union_id = classes
        .split_whitespace()
        .filter_map(|c| c.strip_prefix("union").map(|rest| rest.trim_start_matches("union")))
        .filter(|id| !id.is_empty() && id.chars().all(|ch| ch.is_ascii_digit()))
        .map(parse_i64)
        .last()
        .unwrap_or(0);

    let arrival = parse_i64(tr.attr_or("data-arrival-time", ""));
    let event = AttackEvent {
        id,
        mission_type,
        origin,
        destination: fleet_coordinate(tr, "td.destCoords", "td.destFleet figure")?.unwrap_or_default(),
        destination_name: tr.find("td.destFleet")?.text().trim().to_string(),
        arrival_time: DateTime::from_timestamp(arrival, 0),
        arrive_in: clock.until(arrival),
        attacker_name: sender.attr_or("title", "").to_string(),
        attacker_id,
        union_id,
        missiles,
        ships: fleet(tr)?,
    };

    Ok(Some(AttackRow {
        event,
        partner: classes.contains("partnerInfo"),
        hostile,
        friendly,
    }))
}

/// `eventRow-N` / `eventRow-unionN` row id, else the `unionunionN` class.
fn event_id(tr: &Selection<'_>) -> Result<i64> {
    if let Some(m) = captures(tr.attr_or("id", ""), r"eventRow-(union)?(\d+)")? {
        return Ok(parse_i64(&m[1]));
    }
    Ok(capture(tr.attr_or("class", ""), r"unionunion(\d+)")?
        .map(|id| parse_i64(&id))
        .unwrap_or(0))
}

fn fleet_coordinate(tr: &Selection<'_>, coords: &str, figure: &str) -> Result<Option<Coordinate>> {
    let Some(coordinate) = Coordinate::find_in(tr.find(coords)?.text().trim())? else {
        return Ok(None);
    };
    if tr.find(figure)?.has_class("moon") {
        return Ok(Some(coordinate.with_kind(CelestialType::Moon)));
    }
    Ok(Some(coordinate))
}

/// Fleet composition from the movement tooltip; `?` counts become -1.
fn fleet(tr: &Selection<'_>) -> Result<Option<ShipsInfos>> {
    let icon = tr.find("td.icon_movement span")?;
    if icon.attr("title").is_none() {
        return Ok(None);
    }
    let tooltip = icon.nested("title");
    let mut ships = ShipsInfos::default();
    for line in tooltip.select("tr")?.each() {
        let cells = line.find("td")?;
        let name = cells.eq(0).text();
        let count_text = cells.eq(1).text();
        let count = parse_int(&count_text);
        let Some(id) = ship_id_from_name(&name) else {
            continue;
        };
        if count > 0 {
            ships.set(id, count);
        } else if count_text.trim() == "?" {
            ships.set(id, -1);
        }
    }
    Ok(Some(ships))
}

// Fleet movements

/// Own fleets listed on the movement page.
///
/// The movement page of a player without fleets redirects to the dispatch
/// page, which reads as no fleets.
fn fleets(doc: &Document, config: &ExtractorConfig) -> Result<Vec<Fleet>> {
    let rows = doc.select("div.fleetDetails")?;
    if rows.is_empty() {
        return match body_id(doc)?.as_str() {
            "movement" | "fleetdispatch" | "fleet1" => Ok(Vec::new()),
            _ => Err(ExtractError::mismatch("div.fleetDetails")),
        };
    }
    let script = doc.scripts()?.join("\n");
    rows.each().map(|row| fleet_movement(&row, &script, config)).collect()
}

fn fleet_movement(row: &Selection<'_>, script: &str, config: &ExtractorConfig) -> Result<Fleet> {
    let origin = Coordinate::find_in(&row.find("span.originCoords a")?.text())?.unwrap_or_default();
    let origin = if row.find("span.originPlanet figure")?.has_class("moon") {
        origin.with_kind(CelestialType::Moon)
    } else {
        origin.with_kind(CelestialType::Planet)
    };
    let destination = Coordinate::find_in(&row.find("span.destinationCoords a")?.text())?.unwrap_or_default();
    let figure = row.find("span.destinationPlanet figure")?;
    let destination = destination.with_kind(if figure.has_class("moon") {
        CelestialType::Moon
    } else if figure.has_class("tf") {
        CelestialType::Debris
    } else {
        CelestialType::Planet
    });

    let toggle = row.find("a.openCloseDetails")?;
    let return_flight = matches!(
        row.attr_or("data-return-flight", "").trim(),
        "1" | "t" | "T" | "true" | "True" | "TRUE"
    );
    let arrive = timer_seconds(script, row.find("span.timer")?.attr_or("id", ""), ",")?;
    let back = timer_seconds(script, row.find("span.nextTimer")?.attr_or("id", ""), r"\s*\);")?;

    // Ship lines, then a blank and the cargo lines closing the tooltip.
    // Lifeform servers add a food line after deuterium.
    let lines = row.find("table.fleetinfo tr")?;
    let cargo_end = if config.lifeform_enabled { 4 } else { 3 };
    let cargo = |from_end: usize| -> Result<i64> {
        let Some(index) = lines.len().checked_sub(from_end) else {
            return Ok(0);
        };
        Ok(parse_int(&lines.eq(index).find("td")?.eq(1).text()))
    };
    let resources = Resources {
        metal: cargo(cargo_end)?,
        crystal: cargo(cargo_end - 1)?,
        deuterium: cargo(cargo_end - 2)?,
        ..Resources::default()
    };

    let mut ships = ShipsInfos::default();
    for index in 1..lines.len().saturating_sub(5) {
        let cells = lines.eq(index).find("td")?;
        if let Some(id) = ship_id_from_name(cells.eq(0).text().trim().trim_end_matches(':')) {
            ships.set(id, parse_int(&cells.eq(1).text()));
        }
    }

    // Departure stamp: `label:| 02.01.2006<br>15:04:05`.
    let stamp = if return_flight { "div.destination img" } else { "div.origin img" };
    let start_time = row
        .find(stamp)?
        .attr("title")
        .and_then(|title| title.split_once(":| "))
        .and_then(|(_, when)| NaiveDateTime::parse_from_str(when.trim(), "%d.%m.%Y<br>%H:%M:%S").ok())
        .and_then(|naive| config.zone().localize(&naive))
        .map(|time| time.with_timezone(&Utc));

    let federation = row.find("span.fedAttack a")?.attr_or("href", "").to_string();
    Ok(Fleet {
        id: parse_i64(toggle.attr_or("data-mission-id", "0")),
        mission: MissionId::from_code(parse_i64(row.attr_or("data-mission-type", ""))),
        return_flight,
        in_deep_space: row.find("span.fleetDetailButton a")?.has_class("fleet_icon_forward_end"),
        origin,
        destination,
        ships,
        resources,
        start_time,
        arrival_time: DateTime::from_timestamp(parse_i64(toggle.attr_or("data-end-time", "")), 0),
        back_time: DateTime::from_timestamp(parse_i64(row.attr_or("data-arrival-time", "")), 0),
        arrive_in: if return_flight { -1 } else { arrive },
        back_in: if return_flight { arrive } else { back },
        union_id: query_i64(&federation, "union").unwrap_or(0),
        target_planet_id: query_i64(&federation, "target").unwrap_or(0),
    })
}

/// Countdown the movement script seeds into timer element `id`.
fn timer_seconds(script: &str, id: &str, tail: &str) -> Result<i64> {
    if id.is_empty() {
        return Ok(0);
    }
    let pattern = format!(r#"getElementByIdWithCache\("{}"\),\s*(\d+){tail}"#, regex::escape(id));
    Ok(capture(script, &pattern)?.map(|s| parse_i64(&s)).unwrap_or(0))
}

/// Slot usage from the movement page counters or the dispatch page header.
fn slots(doc: &Document) -> Result<Slots> {
    match body_id(doc)?.as_str() {
        "movement" => {
            let count = |css: &str| -> Result<i64> { Ok(parse_int(&doc.select(css)?.first().text())) };
            Ok(Slots {
                in_use: count("span.fleetSlots > span.current")?,
                total: count("span.fleetSlots > span.all")?,
                exp_in_use: count("span.expSlots > span.current")?,
                exp_total: count("span.expSlots > span.all")?,
            })
        }
        "fleetdispatch" | "fleet1" => {
            let blocks = doc.select("div#slots > div")?;
            let usage = |index: usize| -> Result<(i64, i64)> {
                Ok(captures(&blocks.eq(index).text(), r"(\d+)/(\d+)")?
                    .map(|m| (parse_i64(&m[0]), parse_i64(&m[1])))
                    .unwrap_or_default())
            };
            let (in_use, total) = usage(0)?;
            let (exp_in_use, exp_total) = usage(1)?;
            Ok(Slots {
                in_use,
                total,
                exp_in_use,
                exp_total,
            })
        }
        _ => Err(ExtractError::mismatch("span.fleetSlots")),
    }
}

// Messages

/// Anchors of the combat report list.
#[derive(Debug, Clone, Copy)]
pub(crate) struct CombatList {
    /// Attack link pattern capturing galaxy, system, position and type.
    pub origin_pattern: &'static str,
    /// The list prints an API key icon.
    pub api_key: bool,
}

pub(crate) const COMBAT_LIST: CombatList = CombatList {
    origin_pattern: r"page=fleet1&galaxy=(\d+)&system=(\d+)&position=(\d+)&type=(\d+)&",
    api_key: false,
};

fn combat_report_summaries(doc: &Document) -> Result<Page<CombatReportSummary>> {
    read_combat_summaries(doc, COMBAT_LIST)
}

pub(crate) fn read_combat_summaries(doc: &Document, list: CombatList) -> Result<Page<CombatReportSummary>> {
    let mut items = Vec::new();
    for msg in doc.select("li.msg")?.each() {
        let Some(id) = msg.attr("data-msg-id").and_then(|id| id.parse::<i64>().ok()) else {
            continue;
        };
        let mut summary = CombatReportSummary {
            id,
            ..CombatReportSummary::default()
        };

        let head = msg.find("div.msg_head")?;
        let destination = Coordinate::find_in(&head.find("a")?.text())?.unwrap_or_default();
        summary.destination = if head.find("figure")?.has_class("moon") {
            destination.with_kind(CelestialType::Moon)
        } else {
            destination
        };

        if list.api_key {
            let title = msg.find("span.icon_apikey")?.attr_or("title", "");
            summary.api_key = capture(title, r"'(cr-[^']+)'")?.unwrap_or_default();
        }

        let spans = msg.find("span.msg_content div.combatLeftSide span")?;
        read_combat_amounts(&spans, &mut summary)?;
        summary.created_at = message_date(&msg.find("span.msg_date")?.text());

        let link = msg
            .find("div.msg_actions a span.icon_attack")?
            .parent()
            .attr_or("href", "")
            .to_string();
        let Some(origin) = attack_origin(&link, list.origin_pattern)? else {
            log::debug!("combat report {id} without attack link");
            continue;
        };
        summary.origin = (origin != summary.destination).then_some(origin);
        items.push(summary);
    }
    Ok(Page::new(items, page_count(doc)?))
}

/// Resources, debris and loot from the left side spans of a combat summary.
pub(crate) fn read_combat_amounts(spans: &Selection<'_>, summary: &mut CombatReportSummary) -> Result<()> {
    let resources = spans.eq(1);
    if let Some(m) = captures(
        resources.attr_or("title", ""),
        r"([\d.,]+)<br/>\D*([\d.,]+)<br/>\D*([\d.,]+)",
    )? {
        summary.metal = parse_int(&m[0]);
        summary.crystal = parse_int(&m[1]);
        summary.deuterium = parse_int(&m[2]);
    }
    summary.debris_field = parse_int(spans.eq(2).attr_or("title", "0"));
    if let Some(loot) = capture(&resources.text(), r"[\d.,]+\D*([\d.,]+)")? {
        summary.loot = parse_int(&loot);
    }
    Ok(())
}

pub(crate) fn message_date(text: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(text.trim(), "%d.%m.%Y %H:%M:%S").ok()
}

pub(crate) fn attack_origin(link: &str, pattern: &str) -> Result<Option<Coordinate>> {
    Ok(captures(link, pattern)?.map(|m| {
        Coordinate::new(
            parse_i64(&m[0]),
            parse_i64(&m[1]),
            parse_i64(&m[2]),
            CelestialType::from_code(parse_i64(&m[3])).unwrap_or_default(),
        )
    }))
}

fn espionage_report_summaries(doc: &Document) -> Result<Page<EspionageReportSummary>> {
    let mut items = Vec::new();
    for msg in doc.select("li.msg")?.each() {
        let Some(id) = msg.attr("data-msg-id").and_then(|id| id.parse::<i64>().ok()) else {
            continue;
        };
        let kind = if msg.find("span.espionageDefText")?.is_empty() {
            EspionageReportType::Report
        } else {
            EspionageReportType::Action
        };
        let link = msg.find("span.msg_title a")?;
        let target = Coordinate::find_in(&link.text())?.unwrap_or_default();
        let target = if link.find("figure")?.has_class("moon") {
            target.with_kind(CelestialType::Moon)
        } else {
            target
        };

        let mut loot_percentage = 0.0;
        if kind == EspionageReportType::Report {
            for block in msg.find("div.compacting")?.each() {
                let text = block.text();
                if let Some(percent) = capture(&text, r": (\d+)%")? {
                    loot_percentage = parse_i64(&percent) as f64 / 100.0;
                }
            }
        }

        items.push(EspionageReportSummary {
            id,
            kind,
            from: msg.find("span.msg_sender")?.text(),
            target,
            loot_percentage,
        });
    }
    Ok(Page::new(items, page_count(doc)?))
}

// Galaxy

/// `{galaxy: html}` payload of the 6.x galaxy view.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct GalaxyPayload {
    #[serde(deserialize_with = "json::string")]
    galaxy: String,
}

fn galaxy(doc: &Document, ctx: &GalaxyContext) -> Result<SystemInfos> {
    let payload: GalaxyPayload = serde_json::from_str(doc.raw()).map_err(|_| ExtractError::NotLogged)?;
    let html = payload.galaxy;
    let page = Document::fragment(&html);

    let table = page.select("table")?;
    let mut raw = RawSystem {
        galaxy: parse_int(table.attr_or("data-galaxy", "0")),
        system: parse_int(table.attr_or("data-system", "0")),
        overlay_token: capture(&html, r#"data-overlay-token="([^"]+)""#)?.unwrap_or_default(),
        ..RawSystem::default()
    };
    if page.select("div#warning")?.len() == 1 {
        return Err(ExtractError::VacationMode);
    }
    if !page.exists("span.fright span#filter_empty")? {
        return Err(ExtractError::UnsupportedLayout);
    }

    for (i, row) in page.select("tr.row")?.each().enumerate() {
        if row.attr_or("class", "").contains("empty_filter") {
            continue;
        }
        raw.rows.push(galaxy_row(&page, &row, i as i64 + 1)?);
    }

    if let Some(debris) = listed_debris(&page, EXPEDITION_POSITION)? {
        raw.rows.push(GalaxyRow {
            position: EXPEDITION_POSITION,
            entries: vec![GalaxyEntry::Debris(debris)],
        });
    }
    let darkmatter = page.select("div#debris17 ul.ListLinks li")?.first().text();
    if let Some(amount) = capture(&darkmatter, PREFIXED_NUMBER)? {
        raw.events.darkmatter = parse_int(&amount);
    }
    raw.events.has_asteroid = page.exists("div#planet17")?;

    Ok(reconcile(raw, ctx))
}

/// Debris of `div#debris{position}`: metal, crystal and collectors needed.
fn listed_debris(page: &Document, position: i64) -> Result<Option<Debris>> {
    let lines = page.select(&format!("div#debris{position} ul.ListLinks li"))?;
    let amount = |i: usize| -> Result<Option<i64>> {
        Ok(capture(&lines.eq(i).text(), PREFIXED_NUMBER)?.map(|n| parse_int(&n)))
    };
    let Some(metal) = amount(0)? else {
        return Ok(None);
    };
    Ok(Some(Debris {
        metal,
        crystal: amount(1)?.unwrap_or(0),
        deuterium: 0,
        recyclers_needed: amount(2)?.unwrap_or(0),
    }))
}

fn activity(div: &Selection<'_>) -> i64 {
    let class = div.attr_or("class", "");
    if class.contains("minute15") {
        15
    } else if class.contains("showMinutes") {
        parse_i64(div.text().trim())
    } else {
        0
    }
}

fn galaxy_row(page: &Document, row: &Selection<'_>, index: i64) -> Result<GalaxyRow> {
    let classes = row.attr_or("class", "");
    let position = row
        .find("td.position")?
        .text()
        .trim()
        .parse::<i64>()
        .unwrap_or(index);
    let mut entries = Vec::new();

    let tooltips = row.find("div.htmlTooltip")?;
    let planet_tip = tooltips.first();
    let mut planet = PlanetEntry {
        id: parse_i64(row.find("td.colonized")?.attr_or("data-planet-id", "")),
        name: planet_tip.find("h1 span")?.text(),
        img: planet_tip.find("img")?.attr_or("src", "").to_string(),
        activity: activity(&row.find("td:not(.moon) div.activity")?.first()),
        ..PlanetEntry::default()
    };

    let player_span = row.find("td.playername span")?;
    planet.flags = PlayerFlags {
        administrator: !row.find("span.status_abbr_admin")?.is_empty(),
        inactive: classes.contains("inactive_filter"),
        vacation: classes.contains("vacation_filter"),
        strong_player: !row.find("span.status_abbr_strong")?.is_empty(),
        newbie: classes.contains("newbie_filter"),
        honorable_target: !row.find("span.status_abbr_honorableTarget")?.is_empty(),
        banned: !row.find("td.playername a span.status_abbr_banned")?.is_empty(),
    };

    let mut player = PlayerInfos {
        is_bandit: ["rank_bandit1", "rank_bandit2", "rank_bandit3"]
            .iter()
            .any(|c| player_span.has_class(c)),
        is_starlord: ["rank_starlord1", "rank_starlord2", "rank_starlord3"]
            .iter()
            .any(|c| player_span.has_class(c)),
        ..PlayerInfos::default()
    };
    if tooltips.len() > 1 {
        for tip in tooltips.each() {
            if let Some(id) = capture(tip.attr_or("id", ""), r"^player(\d+)")? {
                player.id = parse_i64(&id);
                player.name = tip.find("h1 span")?.text();
                player.rank = parse_i64(tip.find("li.rank a")?.text().trim());
            }
        }
    }
    if player.name.is_empty() {
        player.name = player_span.text().trim().to_string();
        planet.destroyed = player.name.is_empty();
    }
    planet.player = player;

    let ally = row.find("span.allytagwrapper")?;
    if !ally.is_empty() {
        let links = ally.find("ul.ListLinks li")?;
        planet.alliance = Some(AllianceInfos {
            id: parse_i64(ally.attr_or("rel", "").trim_start_matches("alliance")),
            name: ally.find("h1")?.text(),
            tag: ally.own_text().trim().to_string(),
            rank: parse_i64(links.eq(0).find("a")?.text().trim()),
            member: capture(&links.eq(1).text(), PREFIXED_NUMBER)?
                .map(|n| parse_int(&n))
                .unwrap_or(0),
        });
    }
    entries.push(GalaxyEntry::Planet(planet));

    let moon_cell = row.find("td.moon")?;
    let moon_id = parse_i64(moon_cell.attr_or("data-moon-id", ""));
    if moon_id > 0 {
        let size = moon_cell.find("span#moonsize")?.text();
        entries.push(GalaxyEntry::Moon(MoonInfos {
            id: moon_id,
            name: String::new(),
            diameter: parse_int(size.split(' ').next().unwrap_or_default()),
            activity: activity(&moon_cell.find("div.activity")?.first()),
        }));
    }

    if let Some(debris) = listed_debris(page, position)? {
        entries.push(GalaxyEntry::Debris(debris));
    }

    Ok(GalaxyRow { position, entries })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use crate::models::Moon;

    fn tip(rows: &[&str]) -> String {
        let cells: String = rows.iter().map(|r| format!("<tr><th>x</th><td>{r}</td></tr>")).collect();
        format!("<table>{cells}</table>").replace('"', "&quot;")
    }

    #[test]
    fn test_resources_from_tooltips() {
        let html = format!(
            r#"<ul>
            <li id="metal_box" title="{}"></li>
            <li id="crystal_box" title="{}"></li>
            <li id="deuterium_box" title="{}"></li>
            <li id="energy_box" title="{}"></li>
            <li id="darkmatter_box" title="{}"></li>
            </ul>"#,
            tip(&["1.234.567", "2.000.000", "+4.200"]),
            tip(&["800.000"]),
            tip(&["20.000"]),
            tip(&["-120", "3.000", "3.120"]),
            tip(&["8.000", "5.000", "3.000"]),
        );
        let doc = Document::parse(html.as_bytes()).unwrap();
        let res = resources(&doc).unwrap();
        assert_eq!(res.metal, 1_234_567);
        assert_eq!(res.crystal, 800_000);
        assert_eq!(res.energy, -120);
        assert_eq!(res.darkmatter, 8_000);
        assert_eq!(resources(&doc).unwrap(), res);
    }

    #[test]
    fn test_resources_details_full_page() {
        let html = format!(
            r#"<span id="resources_metal">1.000</span><span id="resources_energy">-5</span>
            <li id="metal_box" title="{}"></li><li id="energy_box" title="{}"></li>"#,
            tip(&["1.000", "100.000", "2.500"]),
            tip(&["-5", "40", "45"]),
        );
        let doc = Document::parse(html.as_bytes()).unwrap();
        let details = resources_details(&doc).unwrap();
        assert_eq!(details.metal.available, 1_000);
        assert_eq!(details.metal.storage_capacity, 100_000);
        assert_eq!(details.metal.current_production, 2_500);
        assert_eq!(details.energy.consumption, 45);
        assert_eq!(details.crystal, StoredResource::default());
    }

    #[test]
    fn test_resources_details_json() {
        let payload = r#"{
            "metal": {"resources": {"actual": 1500, "max": 10000}, "tooltip": "<table><tr><td>1.500</td></tr><tr><td>10.000</td></tr><tr><td>320</td></tr></table>"},
            "crystal": {"resources": {"actual": "700", "max": 5000}, "tooltip": ""},
            "energy": {"resources": {"actual": -30}, "tooltip": "<table><tr><td>-30</td></tr><tr><td>100</td></tr><tr><td>130</td></tr></table>"},
            "darkmatter": {"resources": {"actual": 42}, "tooltip": ""}
        }"#;
        let doc = Document::parse(payload.as_bytes()).unwrap();
        let details = resources_details_json(&doc).unwrap();
        assert_eq!(details.metal.available, 1500);
        assert_eq!(details.metal.current_production, 320);
        assert_eq!(details.crystal.available, 700);
        assert_eq!(details.energy.current_production, 100);
        assert_eq!(details.darkmatter.available, 42);
    }

    #[test]
    fn test_resources_details_json_on_html_page() {
        let logged = Document::parse(br#"<meta name="ogame-session" content="abc"/><p>overview</p>"#).unwrap();
        assert!(matches!(
            resources_details_json(&logged).err().unwrap(),
            ExtractError::InvalidCelestial
        ));
        let anonymous = Document::parse(b"<p>login</p>").unwrap();
        assert!(matches!(
            resources_details_json(&anonymous).err().unwrap(),
            ExtractError::Json(_)
        ));
    }

    #[test]
    fn test_levels_and_ships() {
        let doc = Document::parse(
            br#"<body id="resources">
            <div class="supply1"><span class="level"><span class="textlabel">Metal Mine</span> 21</span></div>
            <div class="supply212"><span class="level">8</span></div>
            <div class="civil202" title="Small Cargo (1.234)"></div>
            <div class="military204"><a title="Light Fighter (17)"></a></div>
            </body>"#,
        )
        .unwrap();
        let buildings = resources_buildings(&doc).unwrap();
        assert_eq!(buildings.metal_mine, 21);
        assert_eq!(buildings.solar_satellite, 8);
        assert_eq!(buildings.crystal_mine, 0);
        let fleet = ships(&doc).unwrap();
        assert_eq!(fleet.small_cargo, 1_234);
        assert_eq!(fleet.light_fighter, 17);
        assert_eq!(fleet.pathfinder, 0);
    }

    #[test]
    fn test_overview_is_invalid_celestial_except_research() {
        let doc = Document::parse(
            br#"<body id="overview"><div class="research113"><span class="level">12</span></div></body>"#,
        )
        .unwrap();
        assert!(matches!(facilities(&doc), Err(ExtractError::InvalidCelestial)));
        assert!(matches!(defenses(&doc), Err(ExtractError::InvalidCelestial)));
        assert!(matches!(ships(&doc), Err(ExtractError::InvalidCelestial)));
        assert_eq!(researches(&doc).unwrap().energy_technology, 12);
    }

    #[test]
    fn test_planets_with_moon() {
        let planet_title = "<b>Homeworld [1:2:3]</b><br/>12.800km (163/188)<br>-18°C to 22°C"
            .replace('"', "&quot;");
        let moon_title = "<b>Moon [1:2:3]</b><br/>8.660km (1/1)".to_string();
        let html = format!(
            r#"<div id="planetList">
            <div class="smallplanet" id="planet-33620229">
              <a class="planetlink" title="{planet_title}"><img class="planetPic" src="/p.png"></a>
              <a class="moonlink" href="/game/index.php?page=ingame&cp=33620230" title="{moon_title}"><img class="icon-moon" src="/m.png"></a>
            </div>
            <div class="smallplanet" id="planet-1"><a class="planetlink" title="garbage"></a></div>
            </div>"#
        );
        let doc = Document::parse(html.as_bytes()).unwrap();
        let list = planets(&doc).unwrap();
        assert_eq!(list.len(), 1);
        let home = &list[0];
        assert_eq!(home.id, 33620229);
        assert_eq!(home.name, "Homeworld");
        assert_eq!(home.coordinate, Coordinate::planet(1, 2, 3));
        assert_eq!(home.diameter, 12_800);
        assert_eq!(home.fields, Fields { built: 163, total: 188 });
        assert_eq!(home.temperature, Temperature { min: -18, max: 22 });
        assert_eq!(home.img, "/p.png");
        let moon: &Moon = home.moon.as_ref().unwrap();
        assert_eq!(moon.id, 33620230);
        assert_eq!(moon.coordinate, Coordinate::moon(1, 2, 3));
        assert_eq!(moon.diameter, 8_660);
    }

    #[test]
    fn test_constructions_and_cancel() {
        let doc = Document::parse(
            br#"<script>
            new baulisteCountdown(getElementByIdWithCache("Countdown"),1520,"/x");
            var link = "index.php?page=overview&modus=2&token=deadbeef&techid="+cancelProduction_id+"&listid="+production_listid;
            </script>
            <table class="construction"><tr><td><a class="abortNow" onclick="cancelProduction(1, 4242, &quot;Cancel?&quot;)">x</a></td></tr></table>
            <table class="construction"></table>
            <a onclick="cancelProduction(1,4242,">x</a>"#,
        )
        .unwrap();
        let queues = constructions(&doc, &FixedClock::at(0)).unwrap();
        assert_eq!(queues.building, Some(QueueItem { id: 1, countdown: 1520 }));
        assert_eq!(queues.research, None);

        let cancel = cancel_building(&doc, &ExtractorConfig::default()).unwrap();
        assert_eq!(cancel.token, "deadbeef");
        assert_eq!((cancel.tech_id, cancel.list_id), (1, 4242));
        assert!(matches!(
            cancel_research(&doc, &ExtractorConfig::default()).err().unwrap(),
            ExtractError::TokenNotFound(_)
        ));
    }

    const EVENTS: &str = r#"<html><head><meta name="ogame-session" content="abc"/></head><body>
        <div id="eventListWrap"><table>
        <tr class="eventFleet union7" data-mission-type="2" data-arrival-time="1700000600">
          <td class="countDown"><span class="hostile">10:00</span></td>
          <td class="originFleet"><figure class="planetIcon moon"></figure></td>
          <td class="coordsOrigin">[5:5:5]</td>
          <td class="destFleet"><figure class="planetIcon planet"></figure> Home</td>
          <td class="destCoords">[1:2:3]</td>
          <td class="icon_movement"><span title="<table><tr><td>Light Fighter</td><td>5</td></tr></table>"></span></td>
          <td><a class="sendMail" data-playerid="99" title="Bob"></a></td>
        </tr>
        <tr class="eventFleet union7 partnerInfo" data-mission-type="2" data-arrival-time="1700000600">
          <td class="countDown hostile"></td>
          <td class="destCoords">[1:2:3]</td>
          <td class="icon_movement"><span title="<table><tr><td>Light Fighter</td><td>3</td></tr><tr><td>Cruiser</td><td>?</td></tr></table>"></span></td>
        </tr>
        <tr class="eventFleet" data-mission-type="3" data-arrival-time="1700000900">
          <td class="countDown hostile"></td><td class="destCoords">[1:2:3]</td>
        </tr>
        <tr class="eventFleet" data-mission-type="1" data-arrival-time="1700000900">
          <td class="countDown friendly"></td><td class="destCoords">[1:2:3]</td>
        </tr>
        </table></div></body></html>"#;

    #[test]
    fn test_attacks_merge_union() {
        let doc = Document::parse(EVENTS.as_bytes()).unwrap();
        let out = attacks(&doc, &FixedClock::at(1_700_000_000), &[]).unwrap();
        assert_eq!(out.len(), 1);
        let attack = &out[0];
        assert_eq!(attack.mission_type, MissionId::GroupedAttack);
        assert_eq!(attack.union_id, 7);
        assert_eq!(attack.attacker_id, 99);
        assert_eq!(attack.attacker_name, "Bob");
        assert_eq!(attack.origin, Some(Coordinate::moon(5, 5, 5)));
        assert_eq!(attack.destination, Coordinate::planet(1, 2, 3));
        assert_eq!(attack.destination_name, "Home");
        assert_eq!(attack.arrive_in, 600);
        let ships = attack.ships.unwrap();
        assert_eq!(ships.light_fighter, 8);
        assert_eq!(ships.cruiser, -1);
    }

    #[test]
    fn test_attacks_without_event_box() {
        let logged = Document::parse(br#"<meta name="ogame-session" content="abc"/><body></body>"#).unwrap();
        assert!(matches!(
            attacks(&logged, &FixedClock::at(0), &[]),
            Err(ExtractError::EventsBoxNotDisplayed)
        ));
        let anonymous = Document::parse(b"<body>login</body>").unwrap();
        assert!(matches!(
            attacks(&anonymous, &FixedClock::at(0), &[]),
            Err(ExtractError::NotLogged)
        ));
    }

    #[test]
    fn test_combat_report_summaries() {
        let doc = Document::parse(
            br#"<ul class="pagination"><li data-page="1"></li><li data-page="3"></li></ul>
            <li class="msg" data-msg-id="501">
              <div class="msg_head"><a>Attack at Colony [2:30:9]</a><figure class="planetIcon moon"></figure><span class="msg_date">13.11.2023 20:15:00</span></div>
              <span class="msg_content"><div class="combatLeftSide">
                <span>Attacker: Bob</span>
                <span title="10.000<br/>Crystal: 5.000<br/>Deuterium: 1.000">Loot: 16.000 / 16.000</span>
                <span title="3.300">Debris</span>
              </div></span>
              <div class="msg_actions"><a href="index.php?page=fleet1&galaxy=2&system=31&position=4&type=1&routine=3"><span class="icon_attack"></span></a></div>
            </li>
            <li class="msg" data-msg-id="502"><div class="msg_head"><a>[1:1:1]</a></div></li>
            <li class="msg" data-msg-id="oops"></li>"#,
        )
        .unwrap();
        let page = combat_report_summaries(&doc).unwrap();
        assert_eq!(page.nb_page, 3);
        assert_eq!(page.items.len(), 1);
        let summary = &page.items[0];
        assert_eq!(summary.id, 501);
        assert_eq!(summary.destination, Coordinate::moon(2, 30, 9));
        assert_eq!(summary.origin, Some(Coordinate::planet(2, 31, 4)));
        assert_eq!((summary.metal, summary.crystal, summary.deuterium), (10_000, 5_000, 1_000));
        assert_eq!(summary.loot, 16_000);
        assert_eq!(summary.debris_field, 3_300);
        assert!(summary.created_at.is_some());
    }

    #[test]
    fn test_espionage_report_summaries() {
        let doc = Document::parse(
            r#"<li class="msg" data-msg-id="10">
              <span class="msg_title"><a>Espionage report from Colony [4:116:8]<figure class="planetIcon planet"></figure></a></span>
              <span class="msg_sender">Fleet Command</span>
              <div class="compacting">Player: Fritz</div>
              <div class="compacting">Loot: 75%</div>
            </li>
            <li class="msg" data-msg-id="11">
              <span class="msg_title"><a>Moon [4:116:9]<figure class="planetIcon moon"></figure></a></span>
              <span class="espionageDefText">A foreign fleet was spotted</span>
            </li>"#
                .as_bytes(),
        )
        .unwrap();
        let page = espionage_report_summaries(&doc).unwrap();
        assert_eq!(page.nb_page, 1);
        assert_eq!(page.items.len(), 2);
        assert_eq!(page.items[0].kind, EspionageReportType::Report);
        assert_eq!(page.items[0].from, "Fleet Command");
        assert_eq!(page.items[0].target, Coordinate::planet(4, 116, 8));
        assert!((page.items[0].loot_percentage - 0.75).abs() < f64::EPSILON);
        assert_eq!(page.items[1].kind, EspionageReportType::Action);
        assert_eq!(page.items[1].target, Coordinate::moon(4, 116, 9));
        assert_eq!(page.items[1].loot_percentage, 0.0);
    }

    fn galaxy_payload(body: &str) -> Document {
        let payload = serde_json::json!({ "galaxy": body });
        Document::parse(payload.to_string().as_bytes()).unwrap()
    }

    #[test]
    fn test_galaxy_rows() {
        let doc = galaxy_payload(
            r#"<div data-overlay-token="tok123"></div>
            <span class="fright"><span id="filter_empty"></span></span>
            <table data-galaxy="4" data-system="116">
            <tr class="row inactive_filter">
              <td class="position">8</td>
              <td class="colonized" data-planet-id="555">
                <div class="htmlTooltip"><h1>Planet: <span>Colony</span></h1><img src="/c.png"><span id="pos-planet">[4:116:8]</span></div>
                <div class="activity minute15"></div>
              </td>
              <td class="moon" data-moon-id="556"><span id="moonsize">8.660 km</span><div class="activity showMinutes">34</div></td>
              <td><div id="debris8"><ul class="ListLinks"><li>Metal: 1.200</li><li>Crystal: 600</li><li>Recyclers needed: 1</li></ul></div></td>
              <td class="playername"><span class="rank_bandit2">Fritz</span>
                <div class="htmlTooltip" id="player100"><h1>Player: <span>Fritz</span></h1><ul><li class="rank"><a>321</a></li></ul></div></td>
              <td><span class="allytagwrapper" rel="alliance77">TAG<div><h1>The Alliance</h1><ul class="ListLinks"><li><a>12</a></li><li>Member: 24</li></ul></div></span></td>
            </tr>
            <tr class="row empty_filter"><td class="position">9</td></tr>
            <tr class="row"><td class="position">3</td><td class="colonized" data-planet-id="700"><div class="htmlTooltip"><h1><span>Mine</span></h1></div></td><td class="playername"><span>Me</span></td></tr>
            </table>
            <div id="debris16"><ul class="ListLinks"><li>Metal: 7.200</li><li>Crystal: 7.200</li><li>Pathfinders needed: 1</li></ul></div>
            <div id="debris17"><ul class="ListLinks"><li>Dark Matter: 1.500</li></ul></div>
            <div id="planet17"></div>"#,
        );
        let ctx = GalaxyContext {
            player_id: 42,
            player_name: "Me".to_string(),
            player_rank: 7,
        };
        let system = galaxy(&doc, &ctx).unwrap();
        assert_eq!((system.galaxy, system.system), (4, 116));
        assert_eq!(system.overlay_token, "tok123");
        assert_eq!(system.planets.len(), 2);

        let slot = system.position(8).unwrap();
        assert_eq!(slot.id, 555);
        assert_eq!(slot.name, "Colony");
        assert_eq!(slot.activity, 15);
        assert!(slot.flags.inactive);
        assert_eq!(slot.player.id, 100);
        assert_eq!(slot.player.rank, 321);
        assert!(slot.player.is_bandit);
        let moon = slot.moon.as_ref().unwrap();
        assert_eq!((moon.id, moon.diameter, moon.activity), (556, 8_660, 34));
        assert_eq!(slot.debris.metal, 1_200);
        assert_eq!(slot.debris.recyclers_needed, 1);
        let alliance = slot.alliance.as_ref().unwrap();
        assert_eq!((alliance.id, alliance.rank, alliance.member), (77, 12, 24));

        let own = system.position(3).unwrap();
        assert_eq!(own.player.id, 42);
        assert_eq!(own.player.name, "Me");

        assert_eq!(system.expedition_debris.metal, 7_200);
        assert_eq!(system.expedition_debris.pathfinders_needed, 1);
        assert_eq!(system.events.darkmatter, 1_500);
        assert!(system.events.has_asteroid);
    }

    #[test]
    fn test_galaxy_blocked_views() {
        let vacation = galaxy_payload(r#"<div id="warning">vacation</div>"#);
        assert!(matches!(
            galaxy(&vacation, &GalaxyContext::default()),
            Err(ExtractError::VacationMode)
        ));
        let mobile = galaxy_payload("<table></table>");
        assert!(matches!(
            galaxy(&mobile, &GalaxyContext::default()),
            Err(ExtractError::UnsupportedLayout)
        ));
        let html = Document::parse(b"<html>login</html>").unwrap();
        assert!(matches!(
            galaxy(&html, &GalaxyContext::default()),
            Err(ExtractError::NotLogged)
        ));
    }

    #[test]
    fn test_missing_entries_are_unavailable() {
        let table = table();
        let doc = Document::fragment("<p></p>");
        assert!(matches!(
            (table.highscore)(&doc),
            Err(ExtractError::Unavailable("highscore"))
        ));
        assert!(matches!(
            (table.cancel_lf_building)(&doc, &ExtractorConfig::default()),
            Err(ExtractError::Unavailable(_))
        ));
    }

    const MOVEMENT: &str = r#"<html><body id="movement">
        <span class="fleetSlots"><span class="current">3</span>/<span class="all">11</span></span>
        <span class="expSlots"><span class="current">1</span>/<span class="all">3</span></span>
        <div class="fleetDetails" data-mission-type="3" data-return-flight="false" data-arrival-time="1578794779">
          <span class="timer" id="timer_8441918"></span>
          <span class="nextTimer" id="timerNext_8441918"></span>
          <span class="originPlanet"><figure class="planetIcon moon"></figure>Moon</span>
          <span class="originCoords"><a>[4:116:12]</a></span>
          <span class="destinationPlanet"><figure class="planetIcon planet"></figure>Home</span>
          <span class="destinationCoords"><a>[4:117:9]</a></span>
          <a class="openCloseDetails" data-mission-id="8441918" data-end-time="1578794155"></a>
          <div class="origin"><img title="Start time:| 12.01.2020<br>01:45:31"></div>
          <span class="fleetDetailButton"><a class="fleet_icon_forward"></a></span>
          <span class="fedAttack"><a href="index.php?page=ingame&component=fleetdispatch&union=77&target=33620229"></a></span>
          <table class="fleetinfo">
            <tr><th>Ships:</th></tr>
            <tr><td>Small Cargo:</td><td class="value">12</td></tr>
            <tr><td>Light Fighter:</td><td class="value">3</td></tr>
            <tr><td>&nbsp;</td></tr>
            <tr><th>Shipment:</th></tr>
            <tr><td>Metal:</td><td class="value">1.000</td></tr>
            <tr><td>Crystal:</td><td class="value">2.000</td></tr>
            <tr><td>Deuterium:</td><td class="value">3.000</td></tr>
            FOOD
          </table>
        </div>
        <div class="fleetDetails" data-mission-type="8" data-return-flight="true" data-arrival-time="1578797349">
          <span class="timer" id="timer_8441803"></span>
          <span class="originCoords"><a>[4:208:10]</a></span>
          <span class="destinationPlanet"><figure class="planetIcon tf"></figure></span>
          <span class="destinationCoords"><a>[4:116:13]</a></span>
          <a class="openCloseDetails" data-mission-id="8441803" data-end-time="1578797349"></a>
        </div>
        <script>
          new simpleCountdown(getElementByIdWithCache("timer_8441918"), 621, "/game/reload");
          new simpleCountdown(getElementByIdWithCache("timerNext_8441918"), 1245);
          new simpleCountdown(getElementByIdWithCache("timer_8441803"), 2815, "/game/reload");
        </script>
      </body></html>"#;

    fn movement(food: &str) -> Document {
        Document::parse(MOVEMENT.replace("FOOD", food).as_bytes()).unwrap()
    }

    #[test]
    fn test_fleets_outbound_and_returning() {
        let doc = movement("");
        let found = fleets(&doc, &ExtractorConfig::default()).unwrap();
        assert_eq!(found.len(), 2);

        let outbound = &found[0];
        assert_eq!(outbound.id, 8441918);
        assert_eq!(outbound.mission, Some(MissionId::Transport));
        assert!(!outbound.return_flight && outbound.is_cancellable());
        assert_eq!(outbound.origin, Coordinate::moon(4, 116, 12));
        assert_eq!(outbound.destination, Coordinate::planet(4, 117, 9));
        assert_eq!((outbound.arrive_in, outbound.back_in), (621, 1245));
        assert_eq!(outbound.ships.by_id(SMALL_CARGO), 12);
        assert_eq!(outbound.ships.by_id(LIGHT_FIGHTER), 3);
        assert_eq!(
            (outbound.resources.metal, outbound.resources.crystal, outbound.resources.deuterium),
            (1_000, 2_000, 3_000)
        );
        assert_eq!((outbound.union_id, outbound.target_planet_id), (77, 33620229));
        assert_eq!(outbound.start_time.unwrap().timestamp(), 1_578_793_531);
        assert_eq!(outbound.arrival_time.unwrap().timestamp(), 1_578_794_155);
        assert_eq!(outbound.back_time.unwrap().timestamp(), 1_578_794_779);

        let returning = &found[1];
        assert_eq!(returning.mission, Some(MissionId::RecycleDebrisField));
        assert!(returning.return_flight && !returning.is_cancellable());
        assert_eq!(returning.destination.kind, CelestialType::Debris);
        assert_eq!((returning.arrive_in, returning.back_in), (-1, 2_815));
        assert!(!returning.ships.has_ships());
        assert!(returning.start_time.is_none());
    }

    #[test]
    fn test_fleet_cargo_with_lifeforms() {
        let food = r#"<tr><td>Food:</td><td class="value">4</td></tr>"#;
        let doc = movement(food);

        let lifeform = ExtractorConfig::new("en", "Europe/Berlin", true);
        let fleet = &fleets(&doc, &lifeform).unwrap()[0];
        assert_eq!(
            (fleet.resources.metal, fleet.resources.crystal, fleet.resources.deuterium),
            (1_000, 2_000, 3_000)
        );
        assert_eq!(fleet.ships.count(), 15);
        // Printed in Berlin winter time.
        assert_eq!(fleet.start_time.unwrap().timestamp(), 1_578_793_531 - 3_600);

        // Without the flag every cargo line reads one row too low.
        let fleet = &fleets(&doc, &ExtractorConfig::default()).unwrap()[0];
        assert_eq!(
            (fleet.resources.metal, fleet.resources.crystal, fleet.resources.deuterium),
            (2_000, 3_000, 4)
        );
    }

    #[test]
    fn test_fleets_on_other_pages() {
        let dispatch = Document::parse(
            br#"<body id="ingamepage"><script>var currentPage = "fleetdispatch";</script></body>"#,
        )
        .unwrap();
        assert!(fleets(&dispatch, &ExtractorConfig::default()).unwrap().is_empty());

        let overview = Document::parse(br#"<body id="overview"></body>"#).unwrap();
        assert!(matches!(
            fleets(&overview, &ExtractorConfig::default()).err().unwrap(),
            ExtractError::StructuralMismatch(_)
        ));
    }

    #[test]
    fn test_slots_from_movement_and_dispatch() {
        let used = slots(&movement("")).unwrap();
        assert_eq!(used, Slots { in_use: 3, total: 11, exp_in_use: 1, exp_total: 3 });
        assert_eq!((used.free(), used.free_expeditions()), (8, 2));

        let dispatch = Document::parse(
            br#"<body id="ingamepage"><script>var currentPage = "fleetdispatch";</script>
            <div id="slots"><div class="fleft"><span>Fleets:</span> 0/4</div><div class="fleft"><span>Expeditions:</span> 0/1</div></div></body>"#,
        )
        .unwrap();
        assert_eq!(slots(&dispatch).unwrap(), Slots { in_use: 0, total: 4, exp_in_use: 0, exp_total: 1 });

        let overview = Document::parse(br#"<body id="overview"></body>"#).unwrap();
        assert!(slots(&overview).is_err());
    }
}

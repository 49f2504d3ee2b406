// src/extractors/v11_15.rs

//! 11.15: messages carry their data in `div.rawMessageData` attributes.
//!
//! Espionage reports no longer need positional reading: every value sits
//! in a `data-raw-*` attribute, with tech levels as JSON objects keyed by
//! id. Combat summaries keep their markup but take resources from the raw
//! result.

use std::collections::BTreeMap;

use chrono::NaiveDateTime;
use serde::Deserialize;

use super::{ExtractorTable, report, v6, v7};
use crate::aggregation::messages::page_count;
use crate::config::ExtractorConfig;
use crate::document::{Document, Selection};
use crate::error::{ExtractError, Partial, Result};
use crate::models::ids::{AllianceClass, CharacterClass, TechId};
use crate::models::{
    CelestialType, CombatReportSummary, Coordinate, EspionageReport, EspionageReportSummary,
    EspionageReportType, Page,
};
use crate::utils::json;
use crate::utils::number::{parse_i64, parse_int};
use crate::utils::text::capture;

pub fn table(base: ExtractorTable) -> ExtractorTable {
    ExtractorTable {
        combat_report_summaries,
        espionage_report_summaries,
        espionage_report,
        ..base
    }
}

/// Raw class attribute such as `{"ID":1,"name":"..."}`.
#[derive(Default, Deserialize)]
#[serde(default)]
struct RawClass {
    #[serde(rename = "ID", deserialize_with = "json::int")]
    id: i64,
}

fn class_code(raw: &str) -> i64 {
    serde_json::from_str::<RawClass>(raw.trim())
        .map(|class| class.id)
        .unwrap_or(0)
}

/// Levels of a raw `{"<id>": level}` object; anything else reads as empty.
fn raw_levels(raw: &str) -> BTreeMap<TechId, i64> {
    json::levels(&mut serde_json::Deserializer::from_str(raw.trim())).unwrap_or_default()
}

/// `data-raw-result` of a combat message, `{loot: {resources: [...]}}`.
#[derive(Default, Deserialize)]
#[serde(default)]
struct RawResult {
    #[serde(deserialize_with = "json::or_default")]
    loot: RawLoot,
}

#[derive(Default, Deserialize)]
#[serde(default)]
struct RawLoot {
    #[serde(deserialize_with = "json::or_default")]
    resources: Vec<LootEntry>,
}

#[derive(Default, Deserialize)]
#[serde(default)]
struct LootEntry {
    #[serde(deserialize_with = "json::string")]
    resource: String,
    #[serde(deserialize_with = "json::int")]
    amount: i64,
}

// Combat reports

fn combat_report_summaries(doc: &Document) -> Result<Page<CombatReportSummary>> {
    let mut items = Vec::new();
    for msg in doc.select(".msg[data-msg-id]")?.each() {
        let Some(id) = msg.attr("data-msg-id").and_then(|id| id.parse::<i64>().ok()) else {
            continue;
        };
        if let Some(summary) = combat_summary(&msg, id)? {
            items.push(summary);
        }
    }
    Ok(Page::new(items, page_count(doc)?))
}

fn combat_summary(msg: &Selection<'_>, id: i64) -> Result<Option<CombatReportSummary>> {
    let mut summary = CombatReportSummary {
        id,
        ..CombatReportSummary::default()
    };

    let destination = Coordinate::find_in(&msg.find("div.msgHead a")?.text())?.unwrap_or_default();
    summary.destination = if msg.find("div.msgHead figure")?.has_class("moon") {
        destination.with_kind(CelestialType::Moon)
    } else {
        destination
    };

    let title = msg.find("button.icon_apikey")?.attr_or("title", "");
    summary.api_key = capture(title, r"'(cr-[^']+)'")?.unwrap_or_default();

    let raw = msg.find("div.rawMessageData")?.attr_or("data-raw-result", "").to_string();
    if let Ok(result) = serde_json::from_str::<RawResult>(&raw) {
        for entry in result.loot.resources {
            let amount = entry.amount;
            match entry.resource.to_lowercase().as_str() {
                "metal" => summary.metal = amount,
                "crystal" => summary.crystal = amount,
                "deuterium" => summary.deuterium = amount,
                other => log::debug!("combat report {id}: unknown loot resource {other:?}"),
            }
        }
    }

    let spans = msg.find("span.msg_content div.combatLeftSide span")?;
    summary.debris_field = parse_int(spans.eq(2).attr_or("title", "0"));
    if let Some(loot) = capture(&spans.eq(1).text(), r"[\d.,]+\D*([\d.,]+)")? {
        summary.loot = parse_int(&loot);
    }
    summary.created_at = v6::message_date(&msg.find("div.msgDate")?.text());

    let onclick = msg
        .find("message-footer.msg_actions button.msgAttackBtn")?
        .attr_or("onclick", "")
        .to_string();
    let Some(origin) = v6::attack_origin(&onclick, v7::COMBAT_LIST.origin_pattern)? else {
        log::debug!("combat report {id} without attack button");
        return Ok(None);
    };
    summary.origin = (origin != summary.destination).then_some(origin);
    Ok(Some(summary))
}

// Espionage reports

fn espionage_report_summaries(doc: &Document) -> Result<Page<EspionageReportSummary>> {
    let mut items = Vec::new();
    for msg in doc.select(".msg")?.each() {
        let Some(id) = msg.attr("data-msg-id").and_then(|id| id.parse::<i64>().ok()) else {
            continue;
        };
        let kind = if msg.find("span.espionageDefText")?.is_empty() {
            EspionageReportType::Report
        } else {
            EspionageReportType::Action
        };

        let raw = msg.find("div.rawMessageData")?;
        let target = raw
            .attr_or("data-raw-coordinates", "")
            .parse::<Coordinate>()
            .unwrap_or_default();
        let target = if raw.attr_or("data-raw-targetplanettype", "") == "3" {
            target.with_kind(CelestialType::Moon)
        } else {
            target
        };

        let mut loot_percentage = 0.0;
        if kind == EspionageReportType::Report {
            for block in msg.find(".lootPercentage")?.each() {
                if let Some(percent) = capture(&block.text(), r": (\d+)%")? {
                    loot_percentage = parse_i64(&percent) as f64 / 100.0;
                }
            }
        }

        items.push(EspionageReportSummary {
            id,
            kind,
            from: msg.find(".msgSender")?.text().trim().to_string(),
            target,
            loot_percentage,
        });
    }
    Ok(Page::new(items, page_count(doc)?))
}

/// Every section the raw data does not mark hidden is disclosed, so the
/// report is always complete.
fn espionage_report(doc: &Document, config: &ExtractorConfig) -> Result<Partial<EspionageReport>> {
    let raw = doc.select("div.rawMessageData")?.first();
    if raw.is_empty() {
        return Err(ExtractError::mismatch("div.rawMessageData"));
    }
    let data = |name: &str, default: &'static str| -> String {
        raw.attr(&format!("data-raw-{name}"))
            .unwrap_or(default)
            .trim()
            .to_string()
    };

    let coordinate = data("coordinates", "")
        .parse::<Coordinate>()
        .map_err(|_| ExtractError::mismatch("div.rawMessageData[data-raw-coordinates]"))?;
    let mut report = EspionageReport {
        id: parse_i64(doc.select("div.detail_msg")?.attr_or("data-msg-id", "0")),
        kind: EspionageReportType::Report,
        // Any type other than `1` is a moon.
        coordinate: if data("targetplanettype", "1") == "1" {
            coordinate
        } else {
            coordinate.with_kind(CelestialType::Moon)
        },
        username: data("playername", ""),
        character_class: CharacterClass::from_code(class_code(&data("characterclass", ""))),
        alliance_class: AllianceClass::from_code(class_code(&data("allianceclass", ""))),
        honorable_target: doc.exists("span.status_abbr_honorableTarget")?,
        last_activity: parse_int(&data("activity", "-1")).max(0),
        counter_espionage: parse_int(&data("counterespionagechance", "0")),
        ..EspionageReport::default()
    };
    report.date = NaiveDateTime::parse_from_str(doc.text("span.msg_date")?.trim(), "%d.%m.%Y %H:%M:%S")
        .ok()
        .and_then(|naive| config.zone().localize(&naive));

    // Rank badge and inactivity markers live in different blocks.
    report::read_status(&doc.select("span.honorRank")?.first(), &mut report);
    report::read_status(&doc.select("div.playerInfo")?.first().find("span")?, &mut report);

    let api_key = doc.select("button.icon_apikey")?.nested("title");
    report.api_key = api_key.select("input")?.first().attr_or("value", "").to_string();

    report.resources.metal = parse_i64(&data("metal", "0"));
    report.resources.crystal = parse_i64(&data("crystal", "0"));
    report.resources.deuterium = parse_i64(&data("deuterium", "0"));
    report.resources.food = parse_i64(&data("food", "0"));
    report.resources.population = parse_i64(&data("population", "0"));
    report.resources.energy = parse_int(&doc.select("resource-icon.energy")?.next().text());

    let sections = [
        ("buildings", "buildings", &mut report.has_buildings_information, &mut report.buildings),
        ("research", "research", &mut report.has_researches_information, &mut report.researches),
        ("ships", "fleet", &mut report.has_fleet_information, &mut report.ships),
        ("def", "defense", &mut report.has_defenses_information, &mut report.defenses),
    ];
    for (hidden, levels, flag, section) in sections {
        *flag = data(&format!("hidden{hidden}"), "1").is_empty();
        if *flag {
            *section = raw_levels(&data(levels, ""));
        }
    }

    Ok(Partial::complete(report))
}

// src/extractors/report.rs

//! Positional espionage report reader.
//!
//! From 6.0 through 9.x the report detail is a list of `div.detail_txt`
//! blocks followed by `ul.detail_list` sections. Versions only differ in
//! which block holds which line, captured by [`ReportLayout`].

use std::collections::BTreeMap;

use chrono::NaiveDateTime;

use crate::config::ExtractorConfig;
use crate::document::{Document, Selection};
use crate::error::{ExtractError, Partial, Result};
use crate::models::ids::{AllianceClass, CharacterClass, TechId};
use crate::models::{CelestialType, Coordinate, EspionageReport, EspionageReportType};
use crate::utils::number::{parse_i64, parse_int};
use crate::utils::text::capture;

/// Block positions and section rules of one report layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportLayout {
    /// `div.detail_txt` index holding the activity timer.
    pub activity_block: usize,
    /// `div.detail_txt` index holding the counter-espionage chance.
    pub counter_block: usize,
    /// Character and alliance class lines are present.
    pub classes: bool,
    /// Only the first resources list belongs to the target.
    pub first_resources_only: bool,
    /// Only the first buildings list belongs to the target.
    pub first_buildings_only: bool,
}

pub const V6: ReportLayout = ReportLayout {
    activity_block: 1,
    counter_block: 1,
    classes: false,
    first_resources_only: false,
    first_buildings_only: false,
};

pub const V7: ReportLayout = ReportLayout {
    activity_block: 2,
    counter_block: 2,
    ..V6
};

pub const V71: ReportLayout = ReportLayout {
    classes: true,
    first_resources_only: true,
    ..V7
};

pub const V9: ReportLayout = ReportLayout {
    activity_block: 3,
    first_buildings_only: true,
    ..V71
};

/// Detail sections and the icon class that carries each row's id.
const SECTIONS: [(&str, &str); 4] = [
    ("buildings", r"building(\d+)"),
    ("research", r"research(\d+)"),
    ("ships", r"tech(\d+)"),
    ("defense", r"defense(\d+)"),
];

/// Read a report with `layout`.
///
/// A section row without its icon stops that section and marks the report
/// [`ExtractError::HiddenInformation`]; rows read before it are kept.
pub fn extract(doc: &Document, config: &ExtractorConfig, layout: ReportLayout) -> Result<Partial<EspionageReport>> {
    let mut report = EspionageReport {
        id: parse_i64(doc.select("div.detail_msg")?.attr_or("data-msg-id", "0")),
        ..EspionageReport::default()
    };

    let title = doc.select("span.msg_title a")?.first();
    let (_, coordinate) = Coordinate::parse_named(&title.text())?
        .ok_or_else(|| ExtractError::mismatch("span.msg_title a"))?;
    let figure = title.find("figure")?.first();
    let kind = if figure.has_class("moon") {
        CelestialType::Moon
    } else {
        CelestialType::Planet
    };
    report.coordinate = coordinate.with_kind(kind);

    if doc.exists("span.espionageDefText")? {
        report.kind = EspionageReportType::Action;
    }
    report.date = NaiveDateTime::parse_from_str(doc.text("span.msg_date")?.trim(), "%d.%m.%Y %H:%M:%S")
        .ok()
        .and_then(|naive| config.zone().localize(&naive));

    let blocks = doc.select("div.detail_txt")?;
    let head = blocks.first();
    let username = head.find("span span")?.first().text();
    report.username = username
        .trim()
        .split("(i")
        .next()
        .unwrap_or_default()
        .trim()
        .to_string();

    if layout.classes {
        let class_name = blocks.eq(1).find("span span")?.first().text();
        report.character_class = CharacterClass::from_localized(&class_name);
        let badge = blocks.eq(2).find("span.alliance_class")?;
        report.alliance_class = ["trader", "warrior", "researcher"]
            .into_iter()
            .find(|class| badge.has_class(class))
            .map(AllianceClass::from_css)
            .unwrap_or_default();
        report.honorable_target = !head.find("span.status_abbr_honorableTarget")?.is_empty();
    }

    let spans = head.find("span")?;
    read_status(&spans, &mut report);

    let api_key = doc.select("span.icon_apikey")?.nested("title");
    report.api_key = api_key.attr("input", "value")?.unwrap_or_default();

    let activity = blocks.eq(layout.activity_block).find("font")?.text();
    if activity.len() == 2 {
        report.last_activity = parse_int(&activity);
    }
    if let Some(chance) = capture(&blocks.eq(layout.counter_block).text(), r"(\d+)%")? {
        report.counter_espionage = parse_i64(&chance);
    }

    let mut hidden = false;
    let mut resources_seen = false;
    let mut buildings_seen = false;
    for list in doc.select("ul.detail_list")?.each() {
        let data_type = list.attr_or("data-type", "");
        if data_type == "resources" {
            if layout.first_resources_only && resources_seen {
                continue;
            }
            resources_seen = true;
            let items = list.find("li")?;
            let amount = |i: usize| parse_int(items.eq(i).attr_or("title", "0"));
            report.resources.metal = amount(0);
            report.resources.crystal = amount(1);
            report.resources.deuterium = amount(2);
            report.resources.energy = amount(3);
            continue;
        }
        let Some((_, icon_pattern)) = SECTIONS.iter().find(|(name, _)| *name == data_type) else {
            continue;
        };
        if data_type == "buildings" {
            if layout.first_buildings_only && buildings_seen {
                continue;
            }
            buildings_seen = true;
        }
        let revealed = list.find("li.detail_list_fail")?.is_empty();
        let (levels, complete) = read_section(&list, icon_pattern)?;
        hidden |= !complete;
        let (flag, section) = match data_type {
            "buildings" => (&mut report.has_buildings_information, &mut report.buildings),
            "research" => (&mut report.has_researches_information, &mut report.researches),
            "ships" => (&mut report.has_fleet_information, &mut report.ships),
            _ => (&mut report.has_defenses_information, &mut report.defenses),
        };
        *flag = revealed;
        section.extend(levels);
    }

    Ok(if hidden {
        Partial::hidden(report)
    } else {
        Partial::complete(report)
    })
}

/// Honor rank and inactivity from the spans of the first block.
pub(crate) fn read_status(spans: &Selection<'_>, report: &mut EspionageReport) {
    if spans.has_class("honorRank") {
        report.is_bandit = ["rank_bandit1", "rank_bandit2", "rank_bandit3"]
            .iter()
            .any(|c| spans.has_class(c));
        report.is_starlord = ["rank_starlord1", "rank_starlord2", "rank_starlord3"]
            .iter()
            .any(|c| spans.has_class(c));
    }
    if spans.has_class("status_abbr_longinactive") {
        report.is_inactive = true;
        report.is_long_inactive = true;
    } else if spans.has_class("status_abbr_inactive") {
        report.is_inactive = true;
    }
}

/// Levels of one section, and false when a row had no icon.
fn read_section(list: &Selection<'_>, icon_pattern: &str) -> Result<(BTreeMap<TechId, i64>, bool)> {
    let mut levels = BTreeMap::new();
    for row in list.find("li.detail_list_el")?.each() {
        let img = row.find("img")?;
        if img.is_empty() {
            log::debug!("report row without icon, section left incomplete");
            return Ok((levels, false));
        }
        let Some(id) = capture(img.attr_or("class", ""), icon_pattern)? else {
            continue;
        };
        levels.insert(parse_i64(&id), parse_int(&row.find("span.fright")?.text()));
    }
    Ok((levels, true))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ids::*;

    fn page(buildings: &str) -> String {
        format!(
            r#"<div class="detail_msg" data-msg-id="1234">
            <span class="msg_title"><a>Espionage report from Colony [3:77:8]<figure class="planetIcon planet"></figure></a></span>
            <span class="msg_date">13.11.2023 20:15:00</span>
            <div class="detail_txt"><span class="status_abbr_longinactive">Player: <span class="status_abbr_longinactive">Fritz (i I)</span></span></div>
            <div class="detail_txt"><span>Class: <span>General</span></span></div>
            <div class="detail_txt">Alliance: <span class="alliance_class small warrior"></span>
              Activity <font>25</font> Chance of counter-espionage: 12%</div>
            <span class="icon_apikey" title="<input value='sr-en-1-abc'>"></span>
            <ul class="detail_list" data-type="resources">
              <li title="1.500.000"></li><li title="800.000"></li><li title="20.000"></li><li title="-120"></li>
            </ul>
            <ul class="detail_list" data-type="buildings">{buildings}</ul>
            <ul class="detail_list" data-type="ships">
              <li class="detail_list_el"><img class="tech202"><span class="fright">14</span></li>
            </ul>
            <ul class="detail_list" data-type="defense"><li class="detail_list_fail">no info</li></ul>
            <ul class="detail_list" data-type="resources"><li title="1"></li></ul>
            </div>"#
        )
    }

    #[test]
    fn test_v71_report() {
        let html = page(
            r#"<li class="detail_list_el"><img class="building1"><span class="fright">21</span></li>
               <li class="detail_list_el"><img class="building22"><span class="fright">0</span></li>"#,
        );
        let doc = Document::parse(html.as_bytes()).unwrap();
        let config = ExtractorConfig::default();
        let report = extract(&doc, &config, V71).unwrap();
        assert!(report.is_complete());
        let report = report.value;
        assert_eq!(report.id, 1234);
        assert_eq!(report.coordinate, Coordinate::planet(3, 77, 8));
        assert_eq!(report.username, "Fritz");
        assert_eq!(report.character_class, CharacterClass::General);
        assert_eq!(report.alliance_class, AllianceClass::Warrior);
        assert!(report.is_long_inactive && report.is_inactive);
        assert_eq!(report.counter_espionage, 12);
        assert_eq!(report.last_activity, 25);
        assert_eq!(report.api_key, "sr-en-1-abc");
        assert_eq!(report.resources.metal, 1_500_000);
        assert_eq!(report.resources.energy, -120);
        assert_eq!(report.buildings.get(&METAL_MINE), Some(&21));
        assert_eq!(report.buildings.get(&METAL_STORAGE), Some(&0));
        assert_eq!(report.level(CRYSTAL_MINE), None);
        assert_eq!(report.ships.get(&SMALL_CARGO), Some(&14));
        assert!(report.has_fleet_information);
        assert!(!report.has_defenses_information);
        assert!(report.date.is_some());
    }

    #[test]
    fn test_missing_icon_is_hidden_information() {
        let html = page(
            r#"<li class="detail_list_el"><img class="building1"><span class="fright">21</span></li>
               <li class="detail_list_el"><span class="fright">9</span></li>
               <li class="detail_list_el"><img class="building2"><span class="fright">18</span></li>"#,
        );
        let doc = Document::parse(html.as_bytes()).unwrap();
        let report = extract(&doc, &ExtractorConfig::default(), V71).unwrap();
        assert!(matches!(report.error, Some(ExtractError::HiddenInformation)));
        assert_eq!(report.value.buildings.get(&METAL_MINE), Some(&21));
        assert_eq!(report.value.buildings.get(&CRYSTAL_MINE), None);
        assert_eq!(report.value.ships.get(&SMALL_CARGO), Some(&14));
    }

    #[test]
    fn test_missing_coordinate_is_structural() {
        let doc = Document::fragment(r#"<div class="detail_msg" data-msg-id="1"></div>"#);
        assert!(matches!(
            extract(&doc, &ExtractorConfig::default(), V6).err().unwrap(),
            ExtractError::StructuralMismatch(_)
        ));
    }
}

// src/extractors/mod.rs

//! Field extractors.
//!
//! A client version is described by an [`ExtractorTable`]: one plain
//! function per entity. [`v6`] builds the base table and every later module
//! takes its predecessor's table and replaces the entries whose markup
//! changed, so a table never consults another at call time.
//!
//! Every function is pure over its inputs. JSON payloads are handed in as a
//! [`Document`] too and read through [`Document::raw`].

pub mod report;
pub mod v10;
pub mod v104;
pub mod v11;
pub mod v11_13;
pub mod v11_15;
pub mod v12;
pub mod v6;
pub mod v7;
pub mod v71;
pub mod v9;

use chrono::{DateTime, FixedOffset, NaiveDateTime, TimeZone};

use crate::aggregation::galaxy::GalaxyContext;
use crate::clock::Clock;
use crate::config::ExtractorConfig;
use crate::document::Document;
use crate::error::{ExtractError, Partial, Result};
use crate::models::{
    AttackEvent, CancelInfos, CelestialType, CharacterClass, CombatReportSummary, Constructions,
    Coordinate, DefensesInfos, EspionageReport, EspionageReportSummary, Facilities, Fleet, Highscore,
    LfBuildings, LfResearches, Page, Planet, Researches, Resources, ResourcesBuildings,
    ResourcesDetails, ShipsInfos, Slots, SystemInfos, TechnologyDetails, Techs,
};
use crate::utils::number::{parse_i64, parse_int};
use crate::utils::text::{capture, captures, is_match};

/// Function table of one client version.
#[derive(Clone, Copy)]
pub struct ExtractorTable {
    pub is_logged: fn(&Document) -> bool,
    pub is_mobile: fn(&Document) -> Result<bool>,
    pub ogame_session: fn(&Document) -> Result<String>,
    pub body_id: fn(&Document) -> Result<String>,
    pub planet_id: fn(&Document) -> Result<i64>,
    pub planet_type: fn(&Document) -> Result<CelestialType>,
    pub planet_coordinate: fn(&Document) -> Result<Coordinate>,
    pub ogame_timestamp: fn(&Document) -> Result<i64>,
    pub server_time: fn(&Document, &dyn Clock) -> Result<DateTime<FixedOffset>>,

    pub upgrade_token: fn(&Document) -> Result<String>,
    pub tear_down_token: fn(&Document) -> Result<String>,
    pub ajax_chat_token: fn(&Document) -> Result<String>,

    pub resources: fn(&Document) -> Result<Resources>,
    pub resources_details: fn(&Document) -> Result<ResourcesDetails>,
    pub resources_details_json: fn(&Document) -> Result<ResourcesDetails>,

    pub resources_buildings: fn(&Document) -> Result<ResourcesBuildings>,
    pub facilities: fn(&Document) -> Result<Facilities>,
    pub ships: fn(&Document) -> Result<ShipsInfos>,
    pub defenses: fn(&Document) -> Result<DefensesInfos>,
    pub researches: fn(&Document) -> Result<Researches>,
    pub techs: fn(&Document) -> Result<Techs>,
    pub character_class: fn(&Document) -> Result<CharacterClass>,
    pub lf_buildings: fn(&Document) -> Result<LfBuildings>,
    pub lf_researches: fn(&Document) -> Result<LfResearches>,

    pub planets: fn(&Document) -> Result<Vec<Planet>>,
    pub constructions: fn(&Document, &dyn Clock) -> Result<Constructions>,
    pub cancel_building: fn(&Document, &ExtractorConfig) -> Result<CancelInfos>,
    pub cancel_research: fn(&Document, &ExtractorConfig) -> Result<CancelInfos>,
    pub cancel_lf_building: fn(&Document, &ExtractorConfig) -> Result<CancelInfos>,
    pub technology_details: fn(&Document) -> Result<TechnologyDetails>,

    pub fleets: fn(&Document, &ExtractorConfig) -> Result<Vec<Fleet>>,
    pub slots: fn(&Document) -> Result<Slots>,

    pub highscore: fn(&Document) -> Result<Highscore>,
    pub attacks: fn(&Document, &dyn Clock, &[Coordinate]) -> Result<Vec<AttackEvent>>,
    pub combat_report_summaries: fn(&Document) -> Result<Page<CombatReportSummary>>,
    pub espionage_report_summaries: fn(&Document) -> Result<Page<EspionageReportSummary>>,
    pub espionage_report: fn(&Document, &ExtractorConfig) -> Result<Partial<EspionageReport>>,
    pub galaxy: fn(&Document, &GalaxyContext) -> Result<SystemInfos>,
}

/// True when the page carries a session marker.
pub fn is_logged(doc: &Document) -> bool {
    let raw = doc.raw();
    is_match(raw, r#"<meta name="ogame-session" content="\w+"/>"#).unwrap_or(false)
        || is_match(raw, r#"var session = "\w+""#).unwrap_or(false)
}

/// `var isMobile = true;` in any inline script.
pub fn is_mobile(doc: &Document) -> Result<bool> {
    for script in doc.scripts()? {
        if let Some(flag) = capture(&script, r"var isMobile = (true|false);")? {
            return Ok(flag == "true");
        }
    }
    Ok(false)
}

pub fn ogame_session(doc: &Document) -> Result<String> {
    if let Some(session) = doc.attr(r#"meta[name="ogame-session"]"#, "content")? {
        if !session.is_empty() {
            return Ok(session);
        }
    }
    for script in doc.scripts()? {
        if let Some(session) = capture(&script, r#"var session = "([^"]+)";"#)? {
            return Ok(session);
        }
    }
    Err(ExtractError::token("ogame-session"))
}

/// Id of the page body. Single-page layouts report `ingamepage` there and
/// name the real page in script.
pub fn body_id(doc: &Document) -> Result<String> {
    let id = doc.attr("body", "id")?.unwrap_or_default();
    if id == "ingamepage" {
        if let Some(page) = capture(doc.raw(), r#"var currentPage = "([^"]+)";"#)? {
            return Ok(page);
        }
    }
    Ok(id)
}

fn meta(doc: &Document, name: &str) -> Result<Option<String>> {
    doc.attr(&format!(r#"meta[name="{name}"]"#), "content")
}

pub fn planet_id(doc: &Document) -> Result<i64> {
    let id = meta(doc, "ogame-planet-id")?.map(|v| parse_i64(&v)).unwrap_or(0);
    if id == 0 {
        return Err(ExtractError::mismatch(r#"meta[name="ogame-planet-id"]"#));
    }
    Ok(id)
}

pub fn planet_type(doc: &Document) -> Result<CelestialType> {
    match meta(doc, "ogame-planet-type")?.as_deref() {
        Some("planet") => Ok(CelestialType::Planet),
        Some("moon") => Ok(CelestialType::Moon),
        _ => Err(ExtractError::mismatch(r#"meta[name="ogame-planet-type"]"#)),
    }
}

pub fn planet_coordinate(doc: &Document) -> Result<Coordinate> {
    let kind = planet_type(doc)?;
    let raw = meta(doc, "ogame-planet-coordinates")?.unwrap_or_default();
    let m = captures(&raw, r"(\d+):(\d+):(\d+)")?
        .ok_or_else(|| ExtractError::mismatch(r#"meta[name="ogame-planet-coordinates"]"#))?;
    Ok(Coordinate::new(
        parse_i64(&m[0]),
        parse_i64(&m[1]),
        parse_i64(&m[2]),
        kind,
    ))
}

/// Server timestamp, 0 when the page does not print one.
pub fn ogame_timestamp(doc: &Document) -> Result<i64> {
    Ok(meta(doc, "ogame-timestamp")?
        .map(|v| parse_i64(&v))
        .unwrap_or(0))
}

/// Upgrade token of a building or research detail fragment.
pub fn upgrade_token(doc: &Document) -> Result<String> {
    capture(doc.raw(), r#"var upgradeEndpoint = ".+&token=([^&]+)&"#)?
        .ok_or_else(|| ExtractError::token("upgradeEndpoint"))
}

pub fn tear_down_token(doc: &Document) -> Result<String> {
    capture(doc.raw(), r"modus=3&token=([^&]+)&")?.ok_or_else(|| ExtractError::token("tear down"))
}

pub fn ajax_chat_token(doc: &Document) -> Result<String> {
    capture(doc.raw(), r#"ajaxChatToken\s?=\s?['"](\w+)['"]"#)?
        .ok_or_else(|| ExtractError::token("ajaxChatToken"))
}

/// Generic `var token = "..."` script variable.
///
/// # Examples
/// ```
/// use ogextract::document::Document;
/// use ogextract::extractors::script_token;
///
/// let doc = Document::fragment(r#"<script>var token = "9d44b41d8136dffadab759749508105e";</script>"#);
/// assert_eq!(script_token(&doc).unwrap(), "9d44b41d8136dffadab759749508105e");
/// ```
pub fn script_token(doc: &Document) -> Result<String> {
    capture(doc.raw(), r#"var token = "([^"]+)""#)?.ok_or_else(|| ExtractError::token("token"))
}

/// Read the in-game clock printed by `css` (`02.01.2006 15:04:05`).
///
/// The page does not print its offset. It is recovered by rounding the
/// distance to `clock` to the nearest quarter hour, and the returned time
/// carries that offset.
pub fn server_time_at(doc: &Document, css: &str, clock: &dyn Clock) -> Result<DateTime<FixedOffset>> {
    let text = doc.select(css)?.first().text();
    let naive = NaiveDateTime::parse_from_str(text.trim(), "%d.%m.%Y %H:%M:%S")
        .map_err(|_| ExtractError::mismatch(css))?;
    let drift = clock.until(naive.and_utc().timestamp());
    let quarters = (drift as f64 / 900.0).round() as i64;
    let offset_secs = i32::try_from(quarters.saturating_mul(900)).map_err(|_| ExtractError::mismatch(css))?;
    let offset = FixedOffset::east_opt(offset_secs).ok_or_else(|| ExtractError::mismatch(css))?;
    offset
        .from_local_datetime(&naive)
        .single()
        .ok_or_else(|| ExtractError::mismatch(css))
}

/// Error for a per-celestial page answered with the overview.
pub(crate) fn reject_overview(doc: &Document) -> Result<()> {
    if body_id(doc)? == "overview" {
        return Err(ExtractError::InvalidCelestial);
    }
    Ok(())
}

/// First-cell value of tooltip row `row`.
pub(crate) fn tooltip_value(tooltip: &Document, row: usize) -> Result<i64> {
    Ok(parse_int(
        &tooltip.select("table tr")?.eq(row).find("td")?.eq(0).text(),
    ))
}

/// Unparsable JSON is a celestial mismatch on a logged page, a plain
/// decoding error otherwise.
pub(crate) fn json_failure(doc: &Document, err: serde_json::Error) -> ExtractError {
    if is_logged(doc) {
        ExtractError::InvalidCelestial
    } else {
        ExtractError::Json(err)
    }
}

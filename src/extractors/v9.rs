// src/extractors/v9.rs

//! 9.0: lifeforms. The resource bar gains food and population, lifeform
//! buildings and researches get their own pages and queues, and the
//! technology details overlay is served as JSON wrapping HTML.

use std::collections::BTreeMap;

use serde::Deserialize;

use super::{ExtractorTable, json_failure, report, v6, v7, v71};
use crate::clock::Clock;
use crate::config::ExtractorConfig;
use crate::document::Document;
use crate::error::{ExtractError, Result};
use crate::models::{
    CancelInfos, Constructions, LfBuildings, LfResearches, LifeformType, Resources,
    ResourcesDetails, TechId, TechnologyDetails, lf_building_ids, lf_research_ids,
};
use crate::utils::json;
use crate::utils::number::parse_i64;
use crate::utils::text::captures;

pub fn table(base: ExtractorTable) -> ExtractorTable {
    ExtractorTable {
        resources,
        resources_details,
        lf_buildings,
        lf_researches,
        constructions,
        cancel_research,
        cancel_lf_building,
        technology_details,
        espionage_report: |doc, config| report::extract(doc, config, report::V9),
        ..base
    }
}

// Resource bar

fn resources(doc: &Document) -> Result<Resources> {
    Ok(resources_details(doc)?.available())
}

pub(crate) fn resources_details(doc: &Document) -> Result<ResourcesDetails> {
    let tooltip = |name: &str| doc.nested(&format!("div#{name}_box"), "title");
    Ok(ResourcesDetails {
        metal: v6::stored(&tooltip("metal")?)?,
        crystal: v6::stored(&tooltip("crystal")?)?,
        deuterium: v6::stored(&tooltip("deuterium")?)?,
        energy: v6::energy(&tooltip("energy")?)?,
        darkmatter: v6::darkmatter(&tooltip("darkmatter")?)?,
        food: v71::food(&tooltip("food")?)?,
        population: v71::population(&tooltip("population")?)?,
    })
}

// Lifeform pages

fn lifeform_level(doc: &Document, id: TechId) -> Result<i64> {
    v7::level_of(doc, &format!("span.lifeformTech{id} span.level"))
}

/// Species from the `#lifeform` badge, levels of that species' buildings.
fn lf_buildings(doc: &Document) -> Result<LfBuildings> {
    let badge = doc.select("#lifeform a div")?;
    let lifeform_type = LifeformType::ALL
        .into_iter()
        .find(|lt| lt.number().is_some_and(|n| badge.has_class(&format!("lifeform{n}"))))
        .unwrap_or_default();
    let mut levels = BTreeMap::new();
    for id in lf_building_ids(lifeform_type) {
        levels.insert(id, lifeform_level(doc, id)?);
    }
    Ok(LfBuildings { lifeform_type, levels })
}

/// Researches of every species; a planet can hold techs from all four.
fn lf_researches(doc: &Document) -> Result<LfResearches> {
    let mut out = LfResearches::default();
    for id in LifeformType::ALL.into_iter().flat_map(lf_research_ids) {
        out.levels.insert(id, lifeform_level(doc, id)?);
    }
    Ok(out)
}

// Build queues

fn constructions(doc: &Document, clock: &dyn Clock) -> Result<Constructions> {
    Ok(Constructions {
        building: v7::queue(doc, "building", clock)?,
        research: v7::queue(doc, "research", clock)?,
        lf_building: v7::queue(doc, "lfbuilding", clock)?,
        lf_research: v7::queue(doc, "lfresearch", clock)?,
    })
}

/// The lifeform queue table sits between buildings and research.
fn cancel_research(doc: &Document, config: &ExtractorConfig) -> Result<CancelInfos> {
    let index = if config.lifeform_enabled { 2 } else { 1 };
    v7::cancel_by_link(doc, "cancelLinkresearch", "cancelresearch", index)
}

fn cancel_lf_building(doc: &Document, _config: &ExtractorConfig) -> Result<CancelInfos> {
    v7::cancel_by_link(doc, "cancelLinklfbuilding", "cancellfbuilding", 1)
}

// Technology details

/// `{content: {technologydetails: "<div id=technologydetails ...>"}}`.
#[derive(Default, Deserialize)]
#[serde(default)]
struct DetailsPayload {
    #[serde(deserialize_with = "json::or_default")]
    content: DetailsContent,
}

#[derive(Default, Deserialize)]
#[serde(default)]
struct DetailsContent {
    #[serde(deserialize_with = "json::string")]
    technologydetails: String,
}

fn technology_details(doc: &Document) -> Result<TechnologyDetails> {
    let payload: DetailsPayload = serde_json::from_str(doc.raw()).map_err(|e| json_failure(doc, e))?;
    read_technology_details(&Document::fragment(&payload.content.technologydetails))
}

pub(crate) fn read_technology_details(overlay: &Document) -> Result<TechnologyDetails> {
    let duration = overlay
        .attr("li.build_duration time", "datetime")?
        .unwrap_or_default();
    let m = captures(&duration, r"PT(?:(\d+)H)?(?:(\d+)M)?(\d+)S")?
        .ok_or_else(|| ExtractError::mismatch("li.build_duration time"))?;
    let production_duration = parse_i64(&m[0])
        .saturating_mul(3_600)
        .saturating_add(parse_i64(&m[1]).saturating_mul(60))
        .saturating_add(parse_i64(&m[2]));

    let cost = |name: &str| -> Result<i64> {
        Ok(parse_i64(
            overlay.select(&format!("div.costs li.{name}"))?.attr_or("data-value", "0"),
        ))
    };
    let downgrade = overlay.select("button.downgrade")?;

    Ok(TechnologyDetails {
        technology_id: parse_i64(overlay.select("div#technologydetails")?.attr_or("data-technology-id", "0")),
        production_duration,
        level: parse_i64(overlay.select("span.level")?.attr_or("data-value", "0")).saturating_sub(1),
        price: Resources {
            metal: cost("metal")?,
            crystal: cost("crystal")?,
            deuterium: cost("deuterium")?,
            population: cost("population")?,
            ..Resources::default()
        },
        tear_down_enabled: downgrade.len() == 1 && downgrade.attr("disabled").is_none(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use crate::models::QueueItem;

    const QUEUES: &str = r#"<html><body id="overview">
        <script>
          var restTimebuilding = 1661005000 - 1660999591 - timeDelta;
          var cancelLinkbuilding = "https://s1-en.ogame.gameforge.com/game/index.php?page=ingame&component=overview&modus=2&token=07287218c9&action=cancel";
          var restTimelfbuilding = 1661000600 - 1660999591 - timeDelta;
          var cancelLinklfbuilding = "https://s1-en.ogame.gameforge.com/game/index.php?page=ingame&component=overview&modus=2&token=07287218c9&action=cancel";
          var restTimeresearch = 1661000000 - 1660999591 - timeDelta;
          var cancelLinkresearch = "https://s1-en.ogame.gameforge.com/game/index.php?page=ingame&component=overview&modus=2&token=07287218c9&action=cancel";
        </script>
        <table class="construction"><tr><td><a class="abortNow" onclick="cancelbuilding(1,3998100,&quot;Cancel?&quot;)"></a></td></tr></table>
        <table class="construction"><tr><td><a class="abortNow" onclick="cancellfbuilding(11101,3998104,&quot;Cancel?&quot;)"></a></td></tr></table>
        <table class="construction"><tr><td><a class="abortNow" onclick="cancelresearch(113,3998106,&quot;Cancel?&quot;)"></a></td></tr></table>
      </body></html>"#;

    #[test]
    fn test_constructions_with_lifeform_queues() {
        let doc = Document::parse(QUEUES.as_bytes()).unwrap();
        let queues = constructions(&doc, &FixedClock::at(1_661_000_000)).unwrap();
        assert_eq!(queues.building, Some(QueueItem { id: 1, countdown: 5_000 }));
        assert_eq!(queues.research, Some(QueueItem { id: 113, countdown: 0 }));
        assert_eq!(queues.lf_building, Some(QueueItem { id: 11101, countdown: 600 }));
        assert_eq!(queues.lf_research, None);
    }

    #[test]
    fn test_cancel_research_table_shifts_with_lifeform() {
        let doc = Document::parse(QUEUES.as_bytes()).unwrap();
        let enabled = ExtractorConfig::new("en", "UTC", true);
        let research = cancel_research(&doc, &enabled).unwrap();
        assert_eq!((research.tech_id, research.list_id), (113, 3_998_106));
        assert_eq!(research.token, "07287218c9");

        let lf = cancel_lf_building(&doc, &enabled).unwrap();
        assert_eq!((lf.tech_id, lf.list_id), (11101, 3_998_104));

        let disabled = ExtractorConfig::new("en", "UTC", false);
        assert!(matches!(
            cancel_research(&doc, &disabled).err().unwrap(),
            ExtractError::StructuralMismatch(_)
        ));
    }

    #[test]
    fn test_lf_buildings_and_researches() {
        let doc = Document::fragment(
            r#"<div id="lifeform"><a><div class="lifeform-item-icon small lifeform2"></div></a></div>
            <span class="lifeformTech12101"><span class="level" data-value="2">2</span></span>
            <span class="lifeformTech12102"><span class="level" data-value="1">1</span></span>
            <span class="lifeformTech11201"><span class="level" data-value="4">4</span></span>
            <span class="lifeformTech14218"><span class="level" data-value="1">1</span></span>"#,
        );
        let buildings = lf_buildings(&doc).unwrap();
        assert_eq!(buildings.lifeform_type, LifeformType::Rocktal);
        assert_eq!(buildings.level(12101), 2);
        assert_eq!(buildings.level(12102), 1);
        assert_eq!(buildings.level(12112), 0);
        let researches = lf_researches(&doc).unwrap();
        assert_eq!(researches.level(11201), 4);
        assert_eq!(researches.level(14218), 1);
        assert_eq!(researches.levels.len(), 72);

        let none = lf_buildings(&Document::fragment("<p></p>")).unwrap();
        assert_eq!(none.lifeform_type, LifeformType::None);
        assert!(none.levels.is_empty());
    }

    #[test]
    fn test_technology_details() {
        let overlay = r#"<div id="technologydetails" data-technology-id="11105"><ul><li class="build_duration"><time datetime="PT41M12S">41m 12s</time></li></ul><span class="level" data-value="1">1</span><div class="costs"><ul><li class="metal" data-value="50000"></li><li class="crystal" data-value="40000"></li><li class="deuterium" data-value="50000"></li><li class="population" data-value="100000000"></li></ul></div><button class="downgrade" disabled></button></div>"#;
        let payload = serde_json::json!({ "target": "technologydetails", "content": { "technologydetails": overlay } });
        let doc = Document::parse(payload.to_string().as_bytes()).unwrap();
        let details = technology_details(&doc).unwrap();
        assert_eq!(details.technology_id, 11105);
        assert_eq!(details.production_duration, 41 * 60 + 12);
        assert_eq!(details.level, 0);
        assert_eq!(details.price.population, 100_000_000);
        assert!(!details.tear_down_enabled);

        let enabled = Document::fragment(
            r#"<div id="technologydetails" data-technology-id="1"><li class="build_duration"><time datetime="PT6H58M48S"></time></li><button class="downgrade"></button></div>"#,
        );
        let details = read_technology_details(&enabled).unwrap();
        assert_eq!(details.production_duration, 6 * 3_600 + 58 * 60 + 48);
        assert!(details.tear_down_enabled);
    }

    #[test]
    fn test_technology_details_without_duration() {
        let overlay = Document::fragment(r#"<div id="technologydetails" data-technology-id="1"></div>"#);
        assert!(matches!(
            read_technology_details(&overlay).err().unwrap(),
            ExtractError::StructuralMismatch(_)
        ));
    }

    #[test]
    fn test_resources_details_with_food_and_population() {
        let doc = Document::fragment(
            r#"<div id="crystal_box" title="<table><tr><td>700</td></tr><tr><td>1.000</td></tr><tr><td>+20</td></tr></table>"></div>
            <div id="food_box" title="<table><tr><td>42</td></tr></table>"></div>
            <div id="population_box" title="<table><tr><td>1.500</td></tr></table>"></div>"#,
        );
        let details = resources_details(&doc).unwrap();
        assert_eq!(details.crystal.storage_capacity, 1_000);
        assert_eq!(details.food.available, 42);
        let available = resources(&doc).unwrap();
        assert_eq!((available.crystal, available.food, available.population), (700, 42, 1_500));
    }
}

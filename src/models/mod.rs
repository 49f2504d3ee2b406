// src/models/mod.rs

//! Domain models produced by the extractors.
//!
//! All types are plain values built fresh per extraction call and owned by
//! the caller.

mod attack;
mod celestial;
mod construction;
mod coordinate;
mod espionage;
mod fleet;
mod galaxy;
mod highscore;
pub mod ids;
mod messages;
mod resources;
mod techs;

pub use attack::AttackEvent;
pub use celestial::{Celestial, Fields, Moon, Planet, Temperature, celestials};
pub use construction::{CancelInfos, Constructions, QueueItem, TechnologyDetails};
pub use coordinate::{CelestialType, Coordinate};
pub use espionage::{EspionageReport, EspionageReportType};
pub use fleet::{Fleet, Slots};
pub use galaxy::{
    AllianceInfos, Debris, ExpeditionDebris, MoonInfos, PlanetInfos, PlayerFlags, PlayerInfos,
    SystemEvents, SystemInfos,
};
pub use highscore::{Highscore, HighscorePlayer};
pub use ids::{AllianceClass, CharacterClass, MissionId, TechId};
pub use messages::{CombatReportSummary, EspionageReportSummary, Page};
pub use resources::{
    DarkmatterDetails, EnergyDetails, FoodDetails, PopulationDetails, Resources, ResourcesDetails,
    StoredResource,
};
pub use techs::{
    DefensesInfos, Facilities, LfBuildings, LfResearches, LifeformType, Researches,
    ResourcesBuildings, ShipsInfos, TechSet, Techs, lf_building_ids, lf_research_ids,
};

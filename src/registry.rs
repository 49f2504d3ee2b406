// src/registry.rs

//! Version resolution.
//!
//! A [`Registry`] holds one [`ExtractorTable`] per client version that
//! changed the markup. Each table is built by copying its predecessor and
//! replacing the entries that changed, so resolving a version is a lookup of
//! the greatest registered version not above the request.
//!
//! [`Extractor`] binds a resolved table to a frozen [`ExtractorConfig`] and
//! exposes every field extractor over raw page bytes.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

use crate::aggregation::galaxy::GalaxyContext;
use crate::classify;
use crate::clock::Clock;
use crate::config::ExtractorConfig;
use crate::document::Document;
use crate::error::{ExtractError, Partial, Result};
use crate::extractors::{ExtractorTable, v6, v7, v9, v10, v11, v11_13, v11_15, v12, v71, v104};
use crate::models::{
    AttackEvent, CancelInfos, CelestialType, CharacterClass, CombatReportSummary, Constructions,
    Coordinate, DefensesInfos, EspionageReport, EspionageReportSummary, Facilities, Fleet, Highscore,
    LfBuildings, LfResearches, Page, Planet, Researches, Resources, ResourcesBuildings,
    ResourcesDetails, ShipsInfos, Slots, SystemInfos, TechnologyDetails, Techs,
};

/// Client version `major.minor.patch`.
///
/// # Examples
/// ```
/// use ogextract::registry::Version;
///
/// let v: Version = "11.16.2".parse().unwrap();
/// assert_eq!(v, Version::new(11, 16, 2));
/// assert_eq!("7.1".parse::<Version>().unwrap(), Version::new(7, 1, 0));
/// assert!(Version::new(9, 0, 0) < Version::new(10, 0, 0));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Version {
    pub major: u32,
    pub minor: u32,
    pub patch: u32,
}

impl Version {
    pub const fn new(major: u32, minor: u32, patch: u32) -> Self {
        Self { major, minor, patch }
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

impl FromStr for Version {
    type Err = ExtractError;

    /// Accepts one to three numeric parts; a pre-release suffix (`-rc1`) is
    /// ignored.
    fn from_str(s: &str) -> Result<Self> {
        let unsupported = || ExtractError::UnsupportedVersion(s.to_string());
        let core = s.trim().trim_start_matches('v');
        let core = core.split(['-', '+']).next().unwrap_or_default();
        let parts: Vec<&str> = core.split('.').collect();
        if parts.is_empty() || parts.len() > 3 {
            return Err(unsupported());
        }
        let mut numbers = [0u32; 3];
        for (slot, part) in numbers.iter_mut().zip(&parts) {
            *slot = part.parse().map_err(|_| unsupported())?;
        }
        Ok(Self::new(numbers[0], numbers[1], numbers[2]))
    }
}

/// Extractor tables by version.
#[derive(Clone)]
pub struct Registry {
    /// Sorted by version.
    tables: Vec<(Version, ExtractorTable)>,
}

impl Registry {
    /// Registry holding a single base table.
    pub fn new(version: Version, base: ExtractorTable) -> Self {
        Self {
            tables: vec![(version, base)],
        }
    }

    /// Every known client layout, from 6.0.0 up.
    pub fn standard() -> Self {
        Self::new(Version::new(6, 0, 0), v6::table())
            .with(Version::new(7, 0, 0), v7::table)
            .with(Version::new(7, 1, 0), v71::table)
            .with(Version::new(9, 0, 0), v9::table)
            .with(Version::new(10, 0, 0), v10::table)
            .with(Version::new(10, 4, 0), v104::table)
            .with(Version::new(11, 0, 0), v11::table)
            .with(Version::new(11, 13, 0), v11_13::table)
            .with(Version::new(11, 15, 0), v11_15::table)
            .with(Version::new(12, 0, 0), v12::table)
    }

    /// Register `version` as `delta` applied to the table it supersedes.
    ///
    /// A version below the base is ignored. Registering an existing version
    /// replaces its table.
    pub fn with(mut self, version: Version, delta: fn(ExtractorTable) -> ExtractorTable) -> Self {
        let Some(previous) = self.lookup(version) else {
            log::warn!("version {version} is below the base table, ignored");
            return self;
        };
        let table = delta(previous.1);
        match self.tables.binary_search_by(|(v, _)| v.cmp(&version)) {
            Ok(index) => self.tables[index].1 = table,
            Err(index) => self.tables.insert(index, (version, table)),
        }
        self
    }

    fn lookup(&self, version: Version) -> Option<(Version, ExtractorTable)> {
        self.tables.iter().rev().find(|(v, _)| *v <= version).copied()
    }

    /// Registered versions, ascending.
    pub fn versions(&self) -> impl Iterator<Item = Version> + '_ {
        self.tables.iter().map(|(v, _)| *v)
    }

    /// Greatest registered version not above `version`, with its table.
    pub fn resolve(&self, version: &str) -> Result<(Version, ExtractorTable)> {
        let requested: Version = version.parse()?;
        self.lookup(requested)
            .ok_or_else(|| ExtractError::UnsupportedVersion(version.to_string()))
    }

    /// [`Extractor`] for `version` bound to `config`.
    pub fn extractor(&self, version: &str, config: ExtractorConfig) -> Result<Extractor> {
        config.validate()?;
        let (resolved, table) = self.resolve(version)?;
        log::debug!("client {version} resolved to extractor table {resolved}");
        Ok(Extractor {
            version: resolved,
            table,
            config,
        })
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.versions().map(|v| v.to_string()))
            .finish()
    }
}

/// Field extractors of one client version.
///
/// Holds only function pointers and an immutable configuration, so one
/// value can be shared freely between threads.
#[derive(Clone)]
pub struct Extractor {
    version: Version,
    table: ExtractorTable,
    config: ExtractorConfig,
}

/// Methods that only need the parsed page.
macro_rules! page_readers {
    ($($(#[$meta:meta])* $name:ident -> $out:ty;)*) => {
        $(
            $(#[$meta])*
            pub fn $name(&self, bytes: &[u8]) -> Result<$out> {
                (self.table.$name)(&Document::parse(bytes)?)
            }
        )*
    };
}

impl Extractor {
    /// Extractor from the standard registry.
    ///
    /// # Examples
    /// ```
    /// use ogextract::config::ExtractorConfig;
    /// use ogextract::registry::{Extractor, Version};
    ///
    /// let extractor = Extractor::new("11.16.2", ExtractorConfig::default()).unwrap();
    /// assert_eq!(extractor.version(), Version::new(11, 15, 0));
    /// assert!(Extractor::new("5.9.0", ExtractorConfig::default()).is_err());
    /// ```
    pub fn new(version: &str, config: ExtractorConfig) -> Result<Self> {
        Registry::standard().extractor(version, config)
    }

    /// Registered version whose table is in use.
    pub fn version(&self) -> Version {
        self.version
    }

    pub fn config(&self) -> &ExtractorConfig {
        &self.config
    }

    pub fn table(&self) -> &ExtractorTable {
        &self.table
    }

    /// Page-level error that applies before any field is read.
    pub fn classify(&self, bytes: &[u8], celestial_page: bool) -> Option<ExtractError> {
        match Document::parse(bytes) {
            Ok(doc) => classify::classify(&doc, celestial_page),
            Err(err) => Some(err),
        }
    }

    /// False for input that is not a document at all.
    pub fn is_logged(&self, bytes: &[u8]) -> bool {
        Document::parse(bytes).is_ok_and(|doc| (self.table.is_logged)(&doc))
    }

    page_readers! {
        is_mobile -> bool;
        ogame_session -> String;
        body_id -> String;
        planet_id -> i64;
        planet_type -> CelestialType;
        planet_coordinate -> Coordinate;
        ogame_timestamp -> i64;

        upgrade_token -> String;
        tear_down_token -> String;
        ajax_chat_token -> String;

        resources -> Resources;
        resources_details -> ResourcesDetails;
        /// Resource bar from the `fetchResources` JSON payload.
        resources_details_json -> ResourcesDetails;

        resources_buildings -> ResourcesBuildings;
        facilities -> Facilities;
        ships -> ShipsInfos;
        defenses -> DefensesInfos;
        researches -> Researches;
        /// All levels of the current celestial from the JSON techs payload.
        techs -> Techs;
        character_class -> CharacterClass;
        lf_buildings -> LfBuildings;
        lf_researches -> LfResearches;

        planets -> Vec<Planet>;
        /// Overlay opened from a building or research icon.
        technology_details -> TechnologyDetails;

        /// Fleet and expedition slots from the movement or dispatch page.
        slots -> Slots;

        highscore -> Highscore;
        combat_report_summaries -> Page<CombatReportSummary>;
        espionage_report_summaries -> Page<EspionageReportSummary>;
    }

    pub fn server_time(&self, bytes: &[u8], clock: &dyn Clock) -> Result<DateTime<FixedOffset>> {
        (self.table.server_time)(&Document::parse(bytes)?, clock)
    }

    /// Build queues with countdowns relative to `clock`.
    pub fn constructions(&self, bytes: &[u8], clock: &dyn Clock) -> Result<Constructions> {
        (self.table.constructions)(&Document::parse(bytes)?, clock)
    }

    pub fn cancel_building(&self, bytes: &[u8]) -> Result<CancelInfos> {
        (self.table.cancel_building)(&Document::parse(bytes)?, &self.config)
    }

    pub fn cancel_research(&self, bytes: &[u8]) -> Result<CancelInfos> {
        (self.table.cancel_research)(&Document::parse(bytes)?, &self.config)
    }

    pub fn cancel_lf_building(&self, bytes: &[u8]) -> Result<CancelInfos> {
        (self.table.cancel_lf_building)(&Document::parse(bytes)?, &self.config)
    }

    /// Own fleets on the movement page, with cargo rows placed by the
    /// configured lifeform flag and departure times read in the server
    /// timezone.
    pub fn fleets(&self, bytes: &[u8]) -> Result<Vec<Fleet>> {
        (self.table.fleets)(&Document::parse(bytes)?, &self.config)
    }

    /// Hostile fleets heading for the player. `own` lists the player's
    /// celestials, see [`crate::aggregation::attacks::merge`].
    pub fn attacks(&self, bytes: &[u8], clock: &dyn Clock, own: &[Coordinate]) -> Result<Vec<AttackEvent>> {
        (self.table.attacks)(&Document::parse(bytes)?, clock, own)
    }

    /// Report detail. Withheld sections come back as a [`Partial`] carrying
    /// `HiddenInformation`.
    pub fn espionage_report(&self, bytes: &[u8]) -> Result<Partial<EspionageReport>> {
        (self.table.espionage_report)(&Document::parse(bytes)?, &self.config)
    }

    pub fn galaxy(&self, bytes: &[u8], ctx: &GalaxyContext) -> Result<SystemInfos> {
        (self.table.galaxy)(&Document::parse(bytes)?, ctx)
    }
}

impl fmt::Debug for Extractor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Extractor")
            .field("version", &self.version)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_send_sync<T: Send + Sync>() {}

    #[test]
    fn test_version_parsing() {
        assert_eq!("12.0.0".parse::<Version>().unwrap(), Version::new(12, 0, 0));
        assert_eq!("v10.4".parse::<Version>().unwrap(), Version::new(10, 4, 0));
        assert_eq!("11.9.0-rc2".parse::<Version>().unwrap(), Version::new(11, 9, 0));
        assert!(matches!(
            "eleven".parse::<Version>(),
            Err(ExtractError::UnsupportedVersion(_))
        ));
        assert!("1.2.3.4".parse::<Version>().is_err());
        assert!("".parse::<Version>().is_err());
    }

    #[test]
    fn test_resolve_picks_greatest_not_above() {
        let registry = Registry::standard();
        let resolve = |v: &str| registry.resolve(v).map(|(version, _)| version).unwrap();
        assert_eq!(resolve("6.0.0"), Version::new(6, 0, 0));
        assert_eq!(resolve("6.8.3"), Version::new(6, 0, 0));
        assert_eq!(resolve("7.1.0"), Version::new(7, 1, 0));
        assert_eq!(resolve("8.7.4"), Version::new(7, 1, 0));
        assert_eq!(resolve("11.9.0"), Version::new(11, 0, 0));
        assert_eq!(resolve("11.16.2"), Version::new(11, 15, 0));
        assert_eq!(resolve("13.1.0"), Version::new(12, 0, 0));
        assert!(matches!(
            registry.resolve("5.9.9"),
            Err(ExtractError::UnsupportedVersion(_))
        ));
    }

    #[test]
    fn test_delta_copies_predecessor() {
        let registry = Registry::standard();
        let (_, v6) = registry.resolve("6.0.0").unwrap();
        let (_, v7) = registry.resolve("7.0.0").unwrap();
        let (_, v12) = registry.resolve("12.0.0").unwrap();
        // 7.0 keeps the base galaxy reader, 10.0 replaces it.
        assert_eq!(v6.galaxy as usize, v7.galaxy as usize);
        assert_ne!(v6.galaxy as usize, v12.galaxy as usize);
        assert_ne!(v6.resources_buildings as usize, v7.resources_buildings as usize);
    }

    #[test]
    fn test_registering_out_of_order() {
        let registry = Registry::new(Version::new(6, 0, 0), v6::table())
            .with(Version::new(9, 0, 0), v9::table)
            .with(Version::new(7, 0, 0), v7::table)
            .with(Version::new(1, 0, 0), v7::table);
        let versions: Vec<_> = registry.versions().collect();
        assert_eq!(
            versions,
            [Version::new(6, 0, 0), Version::new(7, 0, 0), Version::new(9, 0, 0)]
        );
        assert_eq!(format!("{registry:?}"), r#"["6.0.0", "7.0.0", "9.0.0"]"#);
    }

    #[test]
    fn test_extractor_over_bytes() {
        assert_send_sync::<Extractor>();
        let extractor = Extractor::new("7.1.0", ExtractorConfig::default()).unwrap();
        let page = br#"<html><head><meta name="ogame-session" content="abc123"/><meta name="ogame-planet-id" content="33620229"/></head><body id="overview"></body></html>"#;
        assert!(extractor.is_logged(page));
        assert_eq!(extractor.planet_id(page).unwrap(), 33_620_229);
        assert!(matches!(
            extractor.facilities(page),
            Err(ExtractError::InvalidCelestial)
        ));
        assert!(matches!(
            extractor.classify(page, true),
            Some(ExtractError::InvalidCelestial)
        ));
        assert!(matches!(
            extractor.planet_id(b""),
            Err(ExtractError::MalformedDocument(_))
        ));
        assert!(!extractor.is_logged(b""));
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let config = ExtractorConfig::new("", "UTC", false);
        assert!(matches!(
            Extractor::new("12.0.0", config),
            Err(ExtractError::Validation(_))
        ));
    }
}

//! ogextract CLI
//!
//! Runs one extractor over a saved page and prints the result as JSON.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use serde::Serialize;

use ogextract::aggregation::GalaxyContext;
use ogextract::clock::{Clock, FixedClock, SystemClock};
use ogextract::config::ExtractorConfig;
use ogextract::models::Coordinate;
use ogextract::{Extractor, Result};

/// ogextract - OGame page extractor
#[derive(Parser, Debug)]
#[command(name = "ogextract", version, about = "Extract game state from a saved OGame page")]
struct Cli {
    /// Client version the page was served by (e.g. 11.16.2)
    version: String,

    /// Entity to extract
    #[arg(value_enum)]
    kind: Kind,

    /// Saved page (HTML or JSON)
    file: PathBuf,

    /// Extractor configuration (TOML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Unix time to compute countdowns against, instead of now
    #[arg(long)]
    now: Option<i64>,

    /// Own celestial coordinates for attack detection (e.g. 4:208:8)
    #[arg(long = "own")]
    own: Vec<String>,

    /// Treat the page as a per-celestial request when classifying
    #[arg(long)]
    celestial: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum Kind {
    Classify,
    Session,
    Planet,
    ServerTime,
    Resources,
    ResourcesDetails,
    ResourcesDetailsJson,
    ResourcesBuildings,
    Facilities,
    Ships,
    Defenses,
    Researches,
    Techs,
    CharacterClass,
    LfBuildings,
    LfResearches,
    Planets,
    Constructions,
    CancelBuilding,
    CancelResearch,
    CancelLfBuilding,
    TechnologyDetails,
    Fleets,
    Slots,
    Highscore,
    Attacks,
    CombatReports,
    EspionageReports,
    EspionageReport,
    Galaxy,
}

/// Initialize logging based on verbosity flag.
fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();
}

fn print<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = match &cli.config {
        Some(path) => ExtractorConfig::load(path)?,
        None => ExtractorConfig::default(),
    };
    let extractor = Extractor::new(&cli.version, config)?;
    log::info!(
        "Client {} read with the {} extractor",
        cli.version,
        extractor.version()
    );

    let page = std::fs::read(&cli.file)?;
    let clock: Box<dyn Clock> = match cli.now {
        Some(ts) => Box::new(FixedClock::at(ts)),
        None => Box::new(SystemClock),
    };
    let own = cli
        .own
        .iter()
        .map(|c| c.parse::<Coordinate>())
        .collect::<Result<Vec<_>>>()?;

    match cli.kind {
        Kind::Classify => match extractor.classify(&page, cli.celestial) {
            Some(err) => println!("{err}"),
            None => println!("ok"),
        },
        Kind::Session => print(&extractor.ogame_session(&page)?)?,
        Kind::Planet => print(&serde_json::json!({
            "id": extractor.planet_id(&page)?,
            "coordinate": extractor.planet_coordinate(&page)?,
            "timestamp": extractor.ogame_timestamp(&page)?,
        }))?,
        Kind::ServerTime => print(&extractor.server_time(&page, clock.as_ref())?)?,
        Kind::Resources => print(&extractor.resources(&page)?)?,
        Kind::ResourcesDetails => print(&extractor.resources_details(&page)?)?,
        Kind::ResourcesDetailsJson => print(&extractor.resources_details_json(&page)?)?,
        Kind::ResourcesBuildings => print(&extractor.resources_buildings(&page)?)?,
        Kind::Facilities => print(&extractor.facilities(&page)?)?,
        Kind::Ships => print(&extractor.ships(&page)?)?,
        Kind::Defenses => print(&extractor.defenses(&page)?)?,
        Kind::Researches => print(&extractor.researches(&page)?)?,
        Kind::Techs => print(&extractor.techs(&page)?)?,
        Kind::CharacterClass => print(&extractor.character_class(&page)?)?,
        Kind::LfBuildings => print(&extractor.lf_buildings(&page)?)?,
        Kind::LfResearches => print(&extractor.lf_researches(&page)?)?,
        Kind::Planets => print(&extractor.planets(&page)?)?,
        Kind::Constructions => print(&extractor.constructions(&page, clock.as_ref())?)?,
        Kind::CancelBuilding => print(&extractor.cancel_building(&page)?)?,
        Kind::CancelResearch => print(&extractor.cancel_research(&page)?)?,
        Kind::CancelLfBuilding => print(&extractor.cancel_lf_building(&page)?)?,
        Kind::TechnologyDetails => print(&extractor.technology_details(&page)?)?,
        Kind::Fleets => print(&extractor.fleets(&page)?)?,
        Kind::Slots => print(&extractor.slots(&page)?)?,
        Kind::Highscore => print(&extractor.highscore(&page)?)?,
        Kind::Attacks => print(&extractor.attacks(&page, clock.as_ref(), &own)?)?,
        Kind::CombatReports => print(&extractor.combat_report_summaries(&page)?)?,
        Kind::EspionageReports => print(&extractor.espionage_report_summaries(&page)?)?,
        Kind::EspionageReport => {
            let report = extractor.espionage_report(&page)?;
            if let Some(err) = &report.error {
                log::warn!("Report is incomplete: {err}");
            }
            print(&report.value)?;
        }
        Kind::Galaxy => print(&extractor.galaxy(&page, &GalaxyContext::default())?)?,
    }

    Ok(())
}

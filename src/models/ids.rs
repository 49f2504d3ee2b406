// src/models/ids.rs

//! Numeric technology ids, mission kinds and localized name tables.

use serde::{Deserialize, Serialize};

use crate::utils::text::normalize_name;

/// Game-wide technology id (buildings, research, ships, defenses, lifeform techs).
pub type TechId = i64;

pub const METAL_MINE: TechId = 1;
pub const CRYSTAL_MINE: TechId = 2;
pub const DEUTERIUM_SYNTHESIZER: TechId = 3;
pub const SOLAR_PLANT: TechId = 4;
pub const FUSION_REACTOR: TechId = 12;
pub const METAL_STORAGE: TechId = 22;
pub const CRYSTAL_STORAGE: TechId = 23;
pub const DEUTERIUM_TANK: TechId = 24;

pub const ROBOTICS_FACTORY: TechId = 14;
pub const NANITE_FACTORY: TechId = 15;
pub const SHIPYARD: TechId = 21;
pub const RESEARCH_LAB: TechId = 31;
pub const TERRAFORMER: TechId = 33;
pub const ALLIANCE_DEPOT: TechId = 34;
pub const SPACE_DOCK: TechId = 36;
pub const LUNAR_BASE: TechId = 41;
pub const SENSOR_PHALANX: TechId = 42;
pub const JUMP_GATE: TechId = 43;
pub const MISSILE_SILO: TechId = 44;

pub const ESPIONAGE_TECHNOLOGY: TechId = 106;
pub const COMPUTER_TECHNOLOGY: TechId = 108;
pub const WEAPONS_TECHNOLOGY: TechId = 109;
pub const SHIELDING_TECHNOLOGY: TechId = 110;
pub const ARMOUR_TECHNOLOGY: TechId = 111;
pub const ENERGY_TECHNOLOGY: TechId = 113;
pub const HYPERSPACE_TECHNOLOGY: TechId = 114;
pub const COMBUSTION_DRIVE: TechId = 115;
pub const IMPULSE_DRIVE: TechId = 117;
pub const HYPERSPACE_DRIVE: TechId = 118;
pub const LASER_TECHNOLOGY: TechId = 120;
pub const ION_TECHNOLOGY: TechId = 121;
pub const PLASMA_TECHNOLOGY: TechId = 122;
pub const INTERGALACTIC_RESEARCH_NETWORK: TechId = 123;
pub const ASTROPHYSICS: TechId = 124;
pub const GRAVITON_TECHNOLOGY: TechId = 199;

pub const SMALL_CARGO: TechId = 202;
pub const LARGE_CARGO: TechId = 203;
pub const LIGHT_FIGHTER: TechId = 204;
pub const HEAVY_FIGHTER: TechId = 205;
pub const CRUISER: TechId = 206;
pub const BATTLESHIP: TechId = 207;
pub const COLONY_SHIP: TechId = 208;
pub const RECYCLER: TechId = 209;
pub const ESPIONAGE_PROBE: TechId = 210;
pub const BOMBER: TechId = 211;
pub const SOLAR_SATELLITE: TechId = 212;
pub const DESTROYER: TechId = 213;
pub const DEATHSTAR: TechId = 214;
pub const BATTLECRUISER: TechId = 215;
pub const CRAWLER: TechId = 217;
pub const REAPER: TechId = 218;
pub const PATHFINDER: TechId = 219;

pub const ROCKET_LAUNCHER: TechId = 401;
pub const LIGHT_LASER: TechId = 402;
pub const HEAVY_LASER: TechId = 403;
pub const GAUSS_CANNON: TechId = 404;
pub const ION_CANNON: TechId = 405;
pub const PLASMA_TURRET: TechId = 406;
pub const SMALL_SHIELD_DOME: TechId = 407;
pub const LARGE_SHIELD_DOME: TechId = 408;
pub const ANTI_BALLISTIC_MISSILES: TechId = 502;
pub const INTERPLANETARY_MISSILES: TechId = 503;

pub const RESOURCES_BUILDINGS: [TechId; 8] = [
    METAL_MINE,
    CRYSTAL_MINE,
    DEUTERIUM_SYNTHESIZER,
    SOLAR_PLANT,
    FUSION_REACTOR,
    METAL_STORAGE,
    CRYSTAL_STORAGE,
    DEUTERIUM_TANK,
];

pub const FACILITIES: [TechId; 11] = [
    ROBOTICS_FACTORY,
    SHIPYARD,
    RESEARCH_LAB,
    ALLIANCE_DEPOT,
    MISSILE_SILO,
    NANITE_FACTORY,
    TERRAFORMER,
    SPACE_DOCK,
    LUNAR_BASE,
    SENSOR_PHALANX,
    JUMP_GATE,
];

pub const RESEARCHES: [TechId; 16] = [
    ESPIONAGE_TECHNOLOGY,
    COMPUTER_TECHNOLOGY,
    WEAPONS_TECHNOLOGY,
    SHIELDING_TECHNOLOGY,
    ARMOUR_TECHNOLOGY,
    ENERGY_TECHNOLOGY,
    HYPERSPACE_TECHNOLOGY,
    COMBUSTION_DRIVE,
    IMPULSE_DRIVE,
    HYPERSPACE_DRIVE,
    LASER_TECHNOLOGY,
    ION_TECHNOLOGY,
    PLASMA_TECHNOLOGY,
    INTERGALACTIC_RESEARCH_NETWORK,
    ASTROPHYSICS,
    GRAVITON_TECHNOLOGY,
];

pub const SHIPS: [TechId; 17] = [
    SMALL_CARGO,
    LARGE_CARGO,
    LIGHT_FIGHTER,
    HEAVY_FIGHTER,
    CRUISER,
    BATTLESHIP,
    COLONY_SHIP,
    RECYCLER,
    ESPIONAGE_PROBE,
    BOMBER,
    SOLAR_SATELLITE,
    DESTROYER,
    DEATHSTAR,
    BATTLECRUISER,
    CRAWLER,
    REAPER,
    PATHFINDER,
];

pub const DEFENSES: [TechId; 10] = [
    ROCKET_LAUNCHER,
    LIGHT_LASER,
    HEAVY_LASER,
    GAUSS_CANNON,
    ION_CANNON,
    PLASMA_TURRET,
    SMALL_SHIELD_DOME,
    LARGE_SHIELD_DOME,
    ANTI_BALLISTIC_MISSILES,
    INTERPLANETARY_MISSILES,
];

/// Fleet mission kinds that show up in the event list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissionId {
    Attack,
    GroupedAttack,
    Transport,
    Park,
    ParkInThatAlly,
    Spy,
    Colonize,
    RecycleDebrisField,
    Destroy,
    MissileAttack,
    Expedition,
}

impl MissionId {
    pub fn from_code(code: i64) -> Option<Self> {
        Some(match code {
            1 => Self::Attack,
            2 => Self::GroupedAttack,
            3 => Self::Transport,
            4 => Self::Park,
            5 => Self::ParkInThatAlly,
            6 => Self::Spy,
            7 => Self::Colonize,
            8 => Self::RecycleDebrisField,
            9 => Self::Destroy,
            10 => Self::MissileAttack,
            15 => Self::Expedition,
            _ => return None,
        })
    }

    pub fn code(self) -> i64 {
        match self {
            Self::Attack => 1,
            Self::GroupedAttack => 2,
            Self::Transport => 3,
            Self::Park => 4,
            Self::ParkInThatAlly => 5,
            Self::Spy => 6,
            Self::Colonize => 7,
            Self::RecycleDebrisField => 8,
            Self::Destroy => 9,
            Self::MissileAttack => 10,
            Self::Expedition => 15,
        }
    }

    /// Missions reported as incoming attacks.
    pub fn is_hostile_kind(self) -> bool {
        matches!(
            self,
            Self::Attack | Self::GroupedAttack | Self::Destroy | Self::MissileAttack | Self::Spy
        )
    }
}

/// Player character class.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CharacterClass {
    #[default]
    NoClass,
    Collector,
    General,
    Discoverer,
}

impl CharacterClass {
    /// Class id used by raw report data (`1` collector, `2` general, `3` discoverer).
    pub fn from_code(code: i64) -> Self {
        match code {
            1 => Self::Collector,
            2 => Self::General,
            3 => Self::Discoverer,
            _ => Self::NoClass,
        }
    }

    /// Class from its localized display name.
    pub fn from_localized(name: &str) -> Self {
        const COLLECTOR: &[&str] = &[
            "Recolector", "Sakupljač", "Coletor", "Samleren", "Kollektor", "Le collecteur",
            "Collezionista", "Gyűjtő", "Verzamelaar", "Collector", "Zbieracz", "Colecionador",
            "Colecționarul", "Zbiralec", "Zberateľ", "Keräilijä", "Samlare", "Koleksiyoncu",
            "Sběratel", "Συλλέκτης", "Коллекционер", "採礦師", "回収船",
        ];
        const GENERAL: &[&str] = &[
            "General", "Generalen", "Général", "Generale", "Tábornok", "Generaal", "Generał",
            "Splošno", "Generál", "Komentaja", "Στρατηγός", "Генерал", "將軍", "将軍",
        ];
        const DISCOVERER: &[&str] = &[
            "Descubridor", "Otkrivač", "Descobridor", "Opdageren", "Entdecker", "L`explorateur",
            "Esploratore", "Felfedező", "Ontdekker", "Discoverer", "Odkrywca", "Exploratorul",
            "Odkritelj", "Objaviteľ", "Löytäjä", "Upptäckare", "Kaşif", "Průzkumník",
            "Εξερευνητής", "Исследователь", "探險家", "探索船",
        ];
        let name = name.trim();
        if COLLECTOR.contains(&name) {
            Self::Collector
        } else if GENERAL.contains(&name) {
            Self::General
        } else if DISCOVERER.contains(&name) {
            Self::Discoverer
        } else {
            Self::NoClass
        }
    }
}

/// Alliance class shown in espionage reports.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AllianceClass {
    #[default]
    NoAllianceClass,
    Warrior,
    Trader,
    Researcher,
}

impl AllianceClass {
    pub fn from_code(code: i64) -> Self {
        match code {
            1 => Self::Warrior,
            2 => Self::Trader,
            3 => Self::Researcher,
            _ => Self::NoAllianceClass,
        }
    }

    /// Class from the css class of its badge (`trader`, `warrior`, `researcher`).
    pub fn from_css(class: &str) -> Self {
        match class {
            "warrior" => Self::Warrior,
            "trader" => Self::Trader,
            "researcher" => Self::Researcher,
            _ => Self::NoAllianceClass,
        }
    }
}

/// Ship id for a localized ship name, as printed in fleet tooltips.
///
/// # Examples
/// ```
/// use ogextract::models::ids::{ship_id_from_name, LARGE_CARGO, LIGHT_FIGHTER};
///
/// assert_eq!(ship_id_from_name("Light Fighter"), Some(LIGHT_FIGHTER));
/// assert_eq!(ship_id_from_name("Großer Transporter"), Some(LARGE_CARGO));
/// assert_eq!(ship_id_from_name("Banana"), None);
/// ```
pub fn ship_id_from_name(name: &str) -> Option<TechId> {
    let key = normalize_name(name);
    SHIP_NAMES
        .iter()
        .find(|(n, _)| *n == key)
        .map(|(_, id)| *id)
}

/// Normalized localized ship names.
const SHIP_NAMES: &[(&str, TechId)] = &[
    // en
    ("lightfighter", LIGHT_FIGHTER),
    ("heavyfighter", HEAVY_FIGHTER),
    ("cruiser", CRUISER),
    ("battleship", BATTLESHIP),
    ("battlecruiser", BATTLECRUISER),
    ("bomber", BOMBER),
    ("destroyer", DESTROYER),
    ("deathstar", DEATHSTAR),
    ("smallcargo", SMALL_CARGO),
    ("largecargo", LARGE_CARGO),
    ("colonyship", COLONY_SHIP),
    ("recycler", RECYCLER),
    ("espionageprobe", ESPIONAGE_PROBE),
    ("solarsatellite", SOLAR_SATELLITE),
    ("crawler", CRAWLER),
    ("reaper", REAPER),
    ("pathfinder", PATHFINDER),
    // de
    ("leichterjager", LIGHT_FIGHTER),
    ("schwererjager", HEAVY_FIGHTER),
    ("kreuzer", CRUISER),
    ("schlachtschiff", BATTLESHIP),
    ("schlachtkreuzer", BATTLECRUISER),
    ("zerstorer", DESTROYER),
    ("todesstern", DEATHSTAR),
    ("kleinertransporter", SMALL_CARGO),
    ("groertransporter", LARGE_CARGO),
    ("kolonieschiff", COLONY_SHIP),
    ("spionagesonde", ESPIONAGE_PROBE),
    ("solarsatellit", SOLAR_SATELLITE),
    // dk
    ("kravler", CRAWLER),
    ("stifinder", PATHFINDER),
    ("lillejger", LIGHT_FIGHTER),
    ("storjger", HEAVY_FIGHTER),
    ("krydser", CRUISER),
    ("slagskib", BATTLESHIP),
    ("ddsstjerne", DEATHSTAR),
    ("lilletransporter", SMALL_CARGO),
    ("stortransporter", LARGE_CARGO),
    ("koloniskib", COLONY_SHIP),
    // es
    ("cazadorligero", LIGHT_FIGHTER),
    ("cazadorpesado", HEAVY_FIGHTER),
    ("crucero", CRUISER),
    ("navedebatalla", BATTLESHIP),
    ("acorazado", BATTLECRUISER),
    ("bombardero", BOMBER),
    ("destructor", DESTROYER),
    ("estrelladelamuerte", DEATHSTAR),
    ("navepequenadecarga", SMALL_CARGO),
    ("navegrandedecarga", LARGE_CARGO),
    ("colonizador", COLONY_SHIP),
    ("reciclador", RECYCLER),
    ("sondadeespionaje", ESPIONAGE_PROBE),
    ("satelitesolar", SOLAR_SATELLITE),
    // mx
    ("navedelacolonia", COLONY_SHIP),
    ("taladrador", CRAWLER),
    ("segador", REAPER),
    ("explorador", PATHFINDER),
    // fr
    ("chasseurleger", LIGHT_FIGHTER),
    ("chasseurlourd", HEAVY_FIGHTER),
    ("croiseur", CRUISER),
    ("vaisseaudebataille", BATTLESHIP),
    ("traqueur", BATTLECRUISER),
    ("bombardier", BOMBER),
    ("destructeur", DESTROYER),
    ("etoiledelamort", DEATHSTAR),
    ("petittransporteur", SMALL_CARGO),
    ("grandtransporteur", LARGE_CARGO),
    ("vaisseaudecolonisation", COLONY_SHIP),
    ("recycleur", RECYCLER),
    ("sondedespionnage", ESPIONAGE_PROBE),
    ("satellitesolaire", SOLAR_SATELLITE),
    ("foreuse", CRAWLER),
    ("faucheur", REAPER),
    ("eclaireur", PATHFINDER),
    // it
    ("caccialeggero", LIGHT_FIGHTER),
    ("cacciapesante", HEAVY_FIGHTER),
    ("incrociatore", CRUISER),
    ("navedabattaglia", BATTLESHIP),
    ("incrociatoredabattaglia", BATTLECRUISER),
    ("bombardiere", BOMBER),
    ("corazzata", DESTROYER),
    ("mortenera", DEATHSTAR),
    ("cargoleggero", SMALL_CARGO),
    ("cargopesante", LARGE_CARGO),
    ("colonizzatrice", COLONY_SHIP),
    ("riciclatrici", RECYCLER),
    ("sondaspia", ESPIONAGE_PROBE),
    ("satellitesolare", SOLAR_SATELLITE),
    // br
    ("cacaligeiro", LIGHT_FIGHTER),
    ("cacapesado", HEAVY_FIGHTER),
    ("cruzador", CRUISER),
    ("navedebatalha", BATTLESHIP),
    ("interceptador", BATTLECRUISER),
    ("bombardeiro", BOMBER),
    ("destruidor", DESTROYER),
    ("estreladamorte", DEATHSTAR),
    ("cargueiropequeno", SMALL_CARGO),
    ("cargueirogrande", LARGE_CARGO),
    ("navecolonizadora", COLONY_SHIP),
    ("sondadeespionagem", ESPIONAGE_PROBE),
    // pt
    ("interceptor", BATTLECRUISER),
    ("navedecolonizacao", COLONY_SHIP),
    ("rastejador", CRAWLER),
    ("ceifeira", REAPER),
    ("exploradora", PATHFINDER),
    // nl
    ("lichtgevechtsschip", LIGHT_FIGHTER),
    ("zwaargevechtsschip", HEAVY_FIGHTER),
    ("kruiser", CRUISER),
    ("slagschip", BATTLESHIP),
    ("bommenwerper", BOMBER),
    ("vernietiger", DESTROYER),
    ("sterdesdoods", DEATHSTAR),
    ("kleinvrachtschip", SMALL_CARGO),
    ("grootvrachtschip", LARGE_CARGO),
    ("kolonisatieschip", COLONY_SHIP),
    ("zonneenergiesatelliet", SOLAR_SATELLITE),
    ("processer", CRAWLER),
    ("ruimer", REAPER),
    ("navigator", PATHFINDER),
    // pl
    ("lekkimysliwiec", LIGHT_FIGHTER),
    ("ciezkimysliwiec", HEAVY_FIGHTER),
    ("krazownik", CRUISER),
    ("okretwojenny", BATTLESHIP),
    ("pancernik", BATTLECRUISER),
    ("bombowiec", BOMBER),
    ("niszczyciel", DESTROYER),
    ("gwiazdasmierci", DEATHSTAR),
    ("maytransporter", SMALL_CARGO),
    ("duzytransporter", LARGE_CARGO),
    ("statekkolonizacyjny", COLONY_SHIP),
    ("recykler", RECYCLER),
    ("sondaszpiegowska", ESPIONAGE_PROBE),
    ("satelitasoneczny", SOLAR_SATELLITE),
    ("pezacz", CRAWLER),
    ("rozpruwacz", REAPER),
    ("pionier", PATHFINDER),
    // cz
    ("lehkystihac", LIGHT_FIGHTER),
    ("tezkystihac", HEAVY_FIGHTER),
    ("kriznik", CRUISER),
    ("bitevnilod", BATTLESHIP),
    ("bitevnikriznik", BATTLECRUISER),
    ("bombarder", BOMBER),
    ("nicitel", DESTROYER),
    ("hvezdasmrti", DEATHSTAR),
    ("malytransporter", SMALL_CARGO),
    ("velkytransporter", LARGE_CARGO),
    ("kolonizacnilod", COLONY_SHIP),
    ("recyklator", RECYCLER),
    ("spionaznisonda", ESPIONAGE_PROBE),
    ("solarnisatelit", SOLAR_SATELLITE),
    ("rozparovac", REAPER),
    ("pruzkumnik", PATHFINDER),
    // hr
    ("malilovac", LIGHT_FIGHTER),
    ("velikilovac", HEAVY_FIGHTER),
    ("krstarica", CRUISER),
    ("borbenibrod", BATTLESHIP),
    ("oklopnakrstarica", BATTLECRUISER),
    ("razarac", DESTROYER),
    ("zvijezdasmrti", DEATHSTAR),
    ("malitransporter", SMALL_CARGO),
    ("velikitransporter", LARGE_CARGO),
    ("kolonijalnibrod", COLONY_SHIP),
    ("recikler", RECYCLER),
    ("sondezaspijunazu", ESPIONAGE_PROBE),
    ("puzavac", CRAWLER),
    ("zetelac", REAPER),
    ("krcilac", PATHFINDER),
    // tr
    ("hafifavc", LIGHT_FIGHTER),
    ("agravc", HEAVY_FIGHTER),
    ("kruvazor", CRUISER),
    ("komutagemisi", BATTLESHIP),
    ("firkateyn", BATTLECRUISER),
    ("bombardmangemisi", BOMBER),
    ("muhrip", DESTROYER),
    ("olumyildizi", DEATHSTAR),
    ("kucuknakliyegemisi", SMALL_CARGO),
    ("buyuknakliyegemisi", LARGE_CARGO),
    ("kolonigemisi", COLONY_SHIP),
    ("geridonusumcu", RECYCLER),
    ("casussondasi", ESPIONAGE_PROBE),
    ("solaruydu", SOLAR_SATELLITE),
    ("paletli", CRAWLER),
    ("azrail", REAPER),
    ("rehber", PATHFINDER),
    // gr
    ("ελαφρυμαχητικο", LIGHT_FIGHTER),
    ("βαρυμαχητικο", HEAVY_FIGHTER),
    ("καταδιωκτικο", CRUISER),
    ("καταδρομικο", BATTLESHIP),
    ("θωρηκτοαναχαιτισης", BATTLECRUISER),
    ("βομβαρδιστικο", BOMBER),
    ("μικρομεταγωγικο", SMALL_CARGO),
    ("μεγαλομεταγωγικο", LARGE_CARGO),
    ("σκαφοςαποικιοποιησης", COLONY_SHIP),
    ("ανακυκλωτης", RECYCLER),
    ("κατασκοπευτικοστελεχος", ESPIONAGE_PROBE),
    ("ηλιακοισυλλεκτες", SOLAR_SATELLITE),
    // ru
    ("легкииистребитель", LIGHT_FIGHTER),
    ("тяжелыиистребитель", HEAVY_FIGHTER),
    ("креисер", CRUISER),
    ("линкор", BATTLESHIP),
    ("линеиныикреисер", BATTLECRUISER),
    ("бомбардировщик", BOMBER),
    ("уничтожитель", DESTROYER),
    ("звездасмерти", DEATHSTAR),
    ("малыитранспорт", SMALL_CARGO),
    ("большоитранспорт", LARGE_CARGO),
    ("колонизатор", COLONY_SHIP),
    ("переработчик", RECYCLER),
    ("шпионскиизонд", ESPIONAGE_PROBE),
    ("солнечныиспутник", SOLAR_SATELLITE),
    ("гусеничник", CRAWLER),
    ("жнец", REAPER),
    ("первопроходец", PATHFINDER),
    // tw
    ("輕型戰鬥機", LIGHT_FIGHTER),
    ("重型戰鬥機", HEAVY_FIGHTER),
    ("戰列艦", BATTLESHIP),
    ("戰鬥巡洋艦", BATTLECRUISER),
    ("導彈艦", BOMBER),
    ("毀滅者", DESTROYER),
    ("死星", DEATHSTAR),
    ("小型運輸艦", SMALL_CARGO),
    ("大型運輸艦", LARGE_CARGO),
    ("殖民船", COLONY_SHIP),
    ("回收船", RECYCLER),
    ("間諜衛星", ESPIONAGE_PROBE),
    ("太陽能衛星", SOLAR_SATELLITE),
    ("履帶車", CRAWLER),
    ("惡魔飛船", REAPER),
    ("探路者", PATHFINDER),
];

// src/config.rs

//! Extraction configuration.
//!
//! An [`ExtractorConfig`] is built once (from code or a TOML file), validated,
//! and then shared read-only by every extraction call.

use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;

use chrono::{DateTime, FixedOffset, NaiveDateTime, Offset, TimeZone, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::error::{ExtractError, Result};

/// Per-extractor settings that influence how pages are read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractorConfig {
    /// Server language code (`en`, `de`, `fr`, ...). Localized names are
    /// matched against every language, so this only identifies the server.
    #[serde(default = "defaults::language")]
    pub language: String,

    /// Server timezone: an IANA zone (`Europe/Berlin`) or a fixed UTC
    /// offset (`+01:00`)
    #[serde(default = "defaults::timezone")]
    pub timezone: String,

    /// Lifeform content is enabled on the server; shifts some page sections
    #[serde(default)]
    pub lifeform_enabled: bool,
}

impl ExtractorConfig {
    /// Build a configuration from explicit values.
    pub fn new(language: impl Into<String>, timezone: impl Into<String>, lifeform_enabled: bool) -> Self {
        Self {
            language: language.into(),
            timezone: timezone.into(),
            lifeform_enabled,
        }
    }

    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration or return default if loading fails.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        Self::load(&path).unwrap_or_else(|e| {
            log::warn!(
                "Config load failed from {:?}: {}. Using defaults.",
                path.as_ref(),
                e
            );
            Self::default()
        })
    }

    /// Validate configuration values for basic sanity.
    pub fn validate(&self) -> Result<()> {
        if self.language.trim().is_empty() {
            return Err(ExtractError::validation("language is empty"));
        }
        if !self.language.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(ExtractError::validation(format!(
                "language '{}' is not a language code",
                self.language
            )));
        }
        self.timezone.parse::<ServerTimezone>()?;
        Ok(())
    }

    /// Parsed server timezone.
    ///
    /// Falls back to UTC for values `validate` would reject.
    pub fn zone(&self) -> ServerTimezone {
        self.timezone.parse().unwrap_or_default()
    }
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            language: defaults::language(),
            timezone: defaults::timezone(),
            lifeform_enabled: false,
        }
    }
}

/// Timezone server pages print their dates in.
///
/// # Examples
/// ```
/// use chrono::NaiveDate;
/// use ogextract::config::ServerTimezone;
///
/// let berlin: ServerTimezone = "Europe/Berlin".parse().unwrap();
/// let summer = NaiveDate::from_ymd_opt(2024, 7, 1).unwrap().and_hms_opt(12, 0, 0).unwrap();
/// let winter = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap().and_hms_opt(12, 0, 0).unwrap();
/// assert_eq!(berlin.localize(&summer).unwrap().offset().local_minus_utc(), 7200);
/// assert_eq!(berlin.localize(&winter).unwrap().offset().local_minus_utc(), 3600);
/// assert!("Mars/Olympus".parse::<ServerTimezone>().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServerTimezone {
    /// IANA zone, daylight saving included.
    Zone(Tz),
    Fixed(FixedOffset),
}

impl ServerTimezone {
    /// Instant of a wall-clock time printed by the server.
    ///
    /// A time skipped by a daylight saving jump has no instant; a repeated
    /// one reads as its earlier instant.
    pub fn localize(&self, naive: &NaiveDateTime) -> Option<DateTime<FixedOffset>> {
        match self {
            Self::Zone(tz) => tz
                .from_local_datetime(naive)
                .earliest()
                .map(|time| time.fixed_offset()),
            Self::Fixed(offset) => offset.from_local_datetime(naive).single(),
        }
    }
}

impl Default for ServerTimezone {
    fn default() -> Self {
        Self::Fixed(Utc.fix())
    }
}

impl FromStr for ServerTimezone {
    type Err = ExtractError;

    fn from_str(value: &str) -> Result<Self> {
        let v = value.trim();
        if let Ok(tz) = v.parse::<Tz>() {
            return Ok(Self::Zone(tz));
        }
        v.parse::<FixedOffset>()
            .map(Self::Fixed)
            .map_err(|_| ExtractError::config(format!("invalid timezone '{value}'")))
    }
}

impl fmt::Display for ServerTimezone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Zone(tz) => write!(f, "{}", tz.name()),
            Self::Fixed(offset) => write!(f, "{offset}"),
        }
    }
}

mod defaults {
    pub fn language() -> String {
        "en".to_string()
    }

    pub fn timezone() -> String {
        "UTC".to_string()
    }
}

// src/error.rs

//! Unified error handling for the extraction engine.

use std::fmt;

use thiserror::Error;

/// Result type alias for extraction operations.
pub type Result<T> = std::result::Result<T, ExtractError>;

/// Unified extraction error type.
#[derive(Error, Debug)]
pub enum ExtractError {
    /// Top-level input could not be read as a document at all
    #[error("Malformed document: {0}")]
    MalformedDocument(String),

    /// Page shows a logged-out state
    #[error("not logged")]
    NotLogged,

    /// Page belongs to another celestial context than the one requested
    #[error("invalid celestial")]
    InvalidCelestial,

    /// Required anchor (selector or pattern) is absent from a well-formed page
    #[error("Structural mismatch: '{0}' not found")]
    StructuralMismatch(String),

    /// Player privacy settings withheld part of the data; the entity is still usable
    #[error("hidden information: deactivate 'Hide pictures in reports'")]
    HiddenInformation,

    /// Mobile or alternate layout this version cannot read
    #[error("unsupported layout")]
    UnsupportedLayout,

    /// Action token missing from the page
    #[error("Token not found: {0}")]
    TokenNotFound(String),

    /// Full page without the event list box
    #[error("eventList box is not displayed")]
    EventsBoxNotDisplayed,

    /// Account is in vacation mode, galaxy view is blocked
    #[error("account in vacation mode")]
    VacationMode,

    /// No extractor table registered for this client version
    #[error("Unsupported client version: {0}")]
    UnsupportedVersion(String),

    /// Operation has no extractor in the resolved client version
    #[error("{0} is not available for this client version")]
    Unavailable(&'static str),

    /// JSON serialization/deserialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parsing failed
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// CSS selector parsing failed
    #[error("Invalid selector '{selector}': {message}")]
    Selector { selector: String, message: String },

    /// Regular expression failed to compile
    #[error("Invalid pattern '{pattern}': {message}")]
    Pattern { pattern: String, message: String },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Configuration validation error
    #[error("Validation error: {0}")]
    Validation(String),
}

impl ExtractError {
    /// Create a structural mismatch naming the missing selector or pattern.
    pub fn mismatch(anchor: impl Into<String>) -> Self {
        Self::StructuralMismatch(anchor.into())
    }

    /// Create a token-not-found error for the named token.
    pub fn token(name: impl Into<String>) -> Self {
        Self::TokenNotFound(name.into())
    }

    /// Create a malformed document error.
    pub fn malformed(message: impl fmt::Display) -> Self {
        Self::MalformedDocument(message.to_string())
    }

    /// Create a selector parsing error.
    pub fn selector(selector: impl Into<String>, message: impl fmt::Display) -> Self {
        Self::Selector {
            selector: selector.into(),
            message: message.to_string(),
        }
    }

    /// Create a pattern compilation error.
    pub fn pattern(pattern: impl Into<String>, message: impl fmt::Display) -> Self {
        Self::Pattern {
            pattern: pattern.into(),
            message: message.to_string(),
        }
    }

    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// True for errors that leave a best-effort entity usable.
    pub fn is_partial(&self) -> bool {
        matches!(self, Self::HiddenInformation)
    }
}

/// Entity returned together with a non-fatal classification.
///
/// Report extractors use this instead of `Result` so a caller can keep the
/// populated value while still seeing that part of it was withheld.
#[derive(Debug)]
pub struct Partial<T> {
    pub value: T,
    pub error: Option<ExtractError>,
}

impl<T> Partial<T> {
    /// Fully extracted value.
    pub fn complete(value: T) -> Self {
        Self { value, error: None }
    }

    /// Value extracted with information withheld.
    pub fn hidden(value: T) -> Self {
        Self {
            value,
            error: Some(ExtractError::HiddenInformation),
        }
    }

    /// True when nothing was withheld.
    pub fn is_complete(&self) -> bool {
        self.error.is_none()
    }

    /// Discard the value when any error was attached.
    pub fn into_result(self) -> Result<T> {
        match self.error {
            None => Ok(self.value),
            Some(e) => Err(e),
        }
    }
}

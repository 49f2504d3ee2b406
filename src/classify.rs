// src/classify.rs

//! Page-level error classification.
//!
//! Before a field extractor runs, a page can already tell why it will not
//! carry the requested data. [`classify`] checks, in order, for a lost
//! session, a per-celestial request answered with the overview, and the
//! mobile layout.
//!
//! `HiddenInformation` is not a page-level condition; only report
//! extractors raise it, next to the partially read report.

use crate::document::Document;
use crate::error::{ExtractError, Result};
use crate::extractors::{body_id, is_logged, is_mobile};

/// First error kind that applies to `doc`, if any.
///
/// `celestial_page` tells whether the caller asked for a page bound to one
/// planet or moon (supplies, facilities, shipyard, ...).
///
/// # Examples
/// ```
/// use ogextract::classify::classify;
/// use ogextract::document::Document;
/// use ogextract::error::ExtractError;
///
/// let doc = Document::fragment("<html><body id=\"login\"></body></html>");
/// assert!(matches!(classify(&doc, false), Some(ExtractError::NotLogged)));
/// ```
pub fn classify(doc: &Document, celestial_page: bool) -> Option<ExtractError> {
    if !is_logged(doc) {
        return Some(ExtractError::NotLogged);
    }
    if celestial_page && body_id(doc).is_ok_and(|id| id == "overview") {
        return Some(ExtractError::InvalidCelestial);
    }
    if is_mobile(doc).unwrap_or(false) {
        return Some(ExtractError::UnsupportedLayout);
    }
    None
}

/// [`classify`] as a `Result`, for use with `?` ahead of an extractor.
pub fn check(doc: &Document, celestial_page: bool) -> Result<()> {
    match classify(doc, celestial_page) {
        Some(err) => {
            log::debug!("page rejected: {err}");
            Err(err)
        }
        None => Ok(()),
    }
}

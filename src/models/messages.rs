// src/models/messages.rs

//! Message list entries.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::{Coordinate, EspionageReportType};

/// One page of a paginated message list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// Number of pages the list has, at least 1.
    pub nb_page: i64,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, nb_page: i64) -> Self {
        Self {
            items,
            nb_page: nb_page.max(1),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EspionageReportSummary {
    pub id: i64,
    #[serde(rename = "type")]
    pub kind: EspionageReportType,
    pub from: String,
    pub target: Coordinate,
    pub loot_percentage: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CombatReportSummary {
    pub id: i64,
    pub api_key: String,
    /// Attacker's origin; absent when it equals the destination.
    pub origin: Option<Coordinate>,
    pub destination: Coordinate,
    pub loot: i64,
    pub metal: i64,
    pub crystal: i64,
    pub deuterium: i64,
    pub debris_field: i64,
    pub created_at: Option<NaiveDateTime>,
}

// src/models/construction.rs

//! Build queues, cancel handles and technology details.

use serde::{Deserialize, Serialize};

use super::Resources;
use super::ids::TechId;

/// One running queue entry: what is built and seconds left.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueueItem {
    pub id: TechId,
    pub countdown: i64,
}

/// Running build queues of a celestial. Empty queues are `None`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Constructions {
    pub building: Option<QueueItem>,
    pub research: Option<QueueItem>,
    pub lf_building: Option<QueueItem>,
    pub lf_research: Option<QueueItem>,
}

/// Everything needed to post a cancel request for a queued item.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CancelInfos {
    pub token: String,
    pub tech_id: TechId,
    pub list_id: i64,
}

/// Detail overlay of a single technology.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TechnologyDetails {
    pub technology_id: TechId,
    /// Build duration in seconds.
    pub production_duration: i64,
    /// Current level (the overlay shows the next one).
    pub level: i64,
    pub price: Resources,
    pub tear_down_enabled: bool,
}

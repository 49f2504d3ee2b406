// src/models/attack.rs

//! Incoming fleet events.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ids::MissionId;
use super::{Coordinate, ShipsInfos};

/// Hostile fleet heading to one of the player's celestials.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttackEvent {
    pub id: i64,
    pub mission_type: MissionId,
    /// Unknown for missile attacks and anonymous attackers.
    pub origin: Option<Coordinate>,
    pub destination: Coordinate,
    pub destination_name: String,
    pub arrival_time: Option<DateTime<Utc>>,
    /// Seconds until arrival relative to the extraction clock.
    pub arrive_in: i64,
    pub attacker_name: String,
    pub attacker_id: i64,
    /// Shared by every fleet of a grouped attack, 0 otherwise.
    pub union_id: i64,
    pub missiles: i64,
    /// Absent when the event row carried no fleet tooltip.
    pub ships: Option<ShipsInfos>,
}

// src/models/fleet.rs

//! Own fleet movements and fleet slots.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ids::MissionId;
use super::{Coordinate, Resources, ShipsInfos};

/// One of the player's fleets on the movement page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fleet {
    pub id: i64,
    /// `None` for mission codes without a [`MissionId`].
    pub mission: Option<MissionId>,
    pub return_flight: bool,
    /// Expedition holding at its destination.
    pub in_deep_space: bool,
    pub origin: Coordinate,
    pub destination: Coordinate,
    pub ships: ShipsInfos,
    /// Cargo carried.
    pub resources: Resources,
    pub start_time: Option<DateTime<Utc>>,
    pub arrival_time: Option<DateTime<Utc>>,
    pub back_time: Option<DateTime<Utc>>,
    /// Seconds until arrival, -1 on the way back.
    pub arrive_in: i64,
    /// Seconds until the fleet is home again.
    pub back_in: i64,
    /// Federation of an open grouped attack, 0 otherwise.
    pub union_id: i64,
    pub target_planet_id: i64,
}

impl Fleet {
    /// The fleet can still be recalled.
    pub fn is_cancellable(&self) -> bool {
        !self.return_flight && !self.in_deep_space && self.mission != Some(MissionId::MissileAttack)
    }
}

/// Fleet and expedition slot usage.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slots {
    pub in_use: i64,
    pub total: i64,
    pub exp_in_use: i64,
    pub exp_total: i64,
}

impl Slots {
    pub fn free(&self) -> i64 {
        self.total.saturating_sub(self.in_use).max(0)
    }

    pub fn free_expeditions(&self) -> i64 {
        self.exp_total.saturating_sub(self.exp_in_use).max(0)
    }
}

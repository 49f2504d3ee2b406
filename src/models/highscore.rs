// src/models/highscore.rs

//! Highscore rankings.

use serde::{Deserialize, Serialize};

use super::Coordinate;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HighscorePlayer {
    pub position: i64,
    pub id: i64,
    pub name: String,
    pub score: i64,
    pub alliance_id: i64,
    pub honour_points: i64,
    pub homeworld: Coordinate,
    /// Ship count, only present on military rankings.
    pub ships: i64,
}

/// One page of a ranking.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Highscore {
    pub nb_page: i64,
    pub curr_page: i64,
    pub category: i64,
    #[serde(rename = "type")]
    pub kind: i64,
    pub players: Vec<HighscorePlayer>,
}

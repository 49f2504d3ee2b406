// src/extractors/v12.rs

//! 12.0: the clock moves into a `div` and ranking rows are identified by
//! their own `id` instead of a message link.

use chrono::{DateTime, FixedOffset};

use super::{ExtractorTable, server_time_at, v71};
use crate::clock::Clock;
use crate::document::{Document, Selection};
use crate::error::Result;
use crate::models::Highscore;
use crate::utils::number::parse_i64;

pub fn table(base: ExtractorTable) -> ExtractorTable {
    ExtractorTable {
        server_time,
        highscore,
        ..base
    }
}

fn server_time(doc: &Document, clock: &dyn Clock) -> Result<DateTime<FixedOffset>> {
    server_time_at(doc, "div.OGameClock", clock)
}

/// `<tr id="position123456">`.
fn row_player_id(row: &Selection<'_>) -> i64 {
    parse_i64(row.attr_or("id", "position0").trim_start_matches("position"))
}

fn highscore(doc: &Document) -> Result<Highscore> {
    v71::read_highscore(doc, row_player_id)
}

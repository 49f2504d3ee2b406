// src/extractors/v11_13.rs

//! 11.13: queue countdowns move into `time.*Countdown` elements carrying the
//! end timestamp in `data-end`.

use super::{ExtractorTable, v6};
use crate::clock::Clock;
use crate::document::Document;
use crate::error::Result;
use crate::models::{Constructions, QueueItem};
use crate::utils::number::parse_i64;

pub fn table(base: ExtractorTable) -> ExtractorTable {
    ExtractorTable { constructions, ..base }
}

/// Queue whose `time.{countdown}` element has a positive end time. The tech
/// id comes from the `{cancel}(id, ...)` onclick.
fn queue(doc: &Document, clock: &dyn Clock, countdown: &str, cancel: &str) -> Result<Option<QueueItem>> {
    let end = parse_i64(doc.select(&format!("time.{countdown}"))?.attr_or("data-end", "0"));
    let remaining = (end > 0).then(|| clock.until(end));
    v6::queued(doc.raw(), remaining, &format!(r#"onclick="{cancel}\((\d+),"#))
}

fn constructions(doc: &Document, clock: &dyn Clock) -> Result<Constructions> {
    Ok(Constructions {
        building: queue(doc, clock, "buildingCountdown", "cancelbuilding")?,
        research: queue(doc, clock, "researchCountdown", "cancelresearch")?,
        lf_building: queue(doc, clock, "lfbuildingCountdown", "cancellfbuilding")?,
        lf_research: queue(doc, clock, "lfResearchCountdown", "cancellfresearch")?,
    })
}

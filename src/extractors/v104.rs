// src/extractors/v104.rs

//! 10.4: upgrade and tear-down handles share the page-wide `var token`.

use super::{ExtractorTable, script_token};

pub fn table(base: ExtractorTable) -> ExtractorTable {
    ExtractorTable {
        upgrade_token: script_token,
        tear_down_token: script_token,
        ..base
    }
}

// src/extractors/v11.rs

//! 11.0: cancel handles use the page-wide `window.token` and the first link
//! of each construction table. Tables are fixed: buildings, lifeform
//! buildings, research.

use super::{ExtractorTable, v6};
use crate::config::ExtractorConfig;
use crate::document::Document;
use crate::error::{ExtractError, Result};
use crate::models::CancelInfos;
use crate::utils::text::capture;

pub fn table(base: ExtractorTable) -> ExtractorTable {
    ExtractorTable {
        cancel_building: |doc, _| cancel(doc, "cancelbuilding", 0),
        cancel_lf_building: |doc, _| cancel(doc, "cancellfbuilding", 1),
        cancel_research,
        ..base
    }
}

fn cancel_research(doc: &Document, _config: &ExtractorConfig) -> Result<CancelInfos> {
    cancel(doc, "cancelresearch", 2)
}

fn cancel(doc: &Document, function_name: &str, index: usize) -> Result<CancelInfos> {
    let token = capture(doc.raw(), r"window\.token = '([^']+)'")?
        .ok_or_else(|| ExtractError::token("window.token"))?;
    v6::cancel_from_table(doc, token, index, "a", &format!(r"{function_name}\((\d+),\s?(\d+),"))
}

#[cfg(test)]
mod tests {
    use super::*;

    const OVERVIEW: &str = r#"<html><body>
        <script>window.token = '5175965b16d3e743a710b8a07e5b35f1';</script>
        <table class="construction"><tr><td><a onclick="cancelbuilding(1, 5168837, &quot;Cancel?&quot;)">x</a></td></tr></table>
        <table class="construction"><tr><td><a onclick="cancellfbuilding(11102, 5168840, &quot;Cancel?&quot;)">x</a></td></tr></table>
        <table class="construction"><tr><td><a onclick="cancelresearch(124, 5168841, &quot;Cancel?&quot;)">x</a></td></tr></table>
      </body></html>"#;

    #[test]
    fn test_cancel_handles() {
        let doc = Document::parse(OVERVIEW.as_bytes()).unwrap();
        let table = table(crate::extractors::v6::table());
        let config = ExtractorConfig::default();

        let building = (table.cancel_building)(&doc, &config).unwrap();
        assert_eq!(building.token, "5175965b16d3e743a710b8a07e5b35f1");
        assert_eq!((building.tech_id, building.list_id), (1, 5_168_837));
        let lf = (table.cancel_lf_building)(&doc, &config).unwrap();
        assert_eq!((lf.tech_id, lf.list_id), (11102, 5_168_840));
        let research = cancel_research(&doc, &config).unwrap();
        assert_eq!((research.tech_id, research.list_id), (124, 5_168_841));
    }

    #[test]
    fn test_missing_window_token() {
        let doc = Document::fragment(r#"<table class="construction"><tr><td><a onclick="cancelbuilding(1, 2, 3)"></a></td></tr></table>"#);
        assert!(matches!(
            cancel(&doc, "cancelbuilding", 0).err().unwrap(),
            ExtractError::TokenNotFound(_)
        ));
    }
}

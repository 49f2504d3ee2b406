// src/aggregation/messages.rs

//! Paginated message list collation.

use std::collections::HashSet;

use crate::document::Document;
use crate::error::Result;
use crate::models::{CombatReportSummary, EspionageReportSummary, Page};
use crate::utils::number::parse_i64;

/// Entry of a message list, identified by its message id.
pub trait Message {
    fn message_id(&self) -> i64;
}

impl Message for EspionageReportSummary {
    fn message_id(&self) -> i64 {
        self.id
    }
}

impl Message for CombatReportSummary {
    fn message_id(&self) -> i64 {
        self.id
    }
}

/// Number of pages advertised by the `ul.pagination` block, 1 without one.
pub fn page_count(doc: &Document) -> Result<i64> {
    let last = doc.select("ul.pagination li")?.last();
    Ok(last.attr("data-page").map(parse_i64).unwrap_or(1).max(1))
}

/// Concatenate pages fetched one after the other.
///
/// A message can shift onto the next page while the list is walked; the
/// first occurrence of each id wins.
pub fn collate<T: Message>(pages: impl IntoIterator<Item = Page<T>>) -> Vec<T> {
    let mut seen = HashSet::new();
    let mut out = Vec::new();
    for page in pages {
        for item in page.items {
            if seen.insert(item.message_id()) {
                out.push(item);
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary(id: i64) -> EspionageReportSummary {
        EspionageReportSummary {
            id,
            ..Default::default()
        }
    }

    #[test]
    fn test_collate_drops_shifted_duplicates() {
        let pages = vec![
            Page::new(vec![summary(3), summary(2)], 2),
            Page::new(vec![summary(2), summary(1)], 2),
        ];
        let ids: Vec<i64> = collate(pages).iter().map(|s| s.id).collect();
        assert_eq!(ids, vec![3, 2, 1]);
    }

    #[test]
    fn test_page_count() {
        let doc = Document::fragment(
            r#"<ul class="pagination"><li data-page="1">1</li><li data-page="4">4</li></ul>"#,
        );
        assert_eq!(page_count(&doc).unwrap(), 4);
        assert_eq!(page_count(&Document::fragment("<p></p>")).unwrap(), 1);
    }
}

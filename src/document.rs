// src/document.rs

//! Document adapter.
//!
//! Wraps `scraper` so extractors can query pages the way the game client
//! markup is usually described: a selection of elements that can be narrowed
//! with CSS selectors, indexed positionally, and read for attributes or text.
//! Tooltip HTML stored inside attributes or JSON strings is re-parsed as its
//! own [`Document`].

use scraper::{ElementRef, Html, Selector};

use crate::error::{ExtractError, Result};

/// Parsed page plus its raw source.
///
/// The raw text is kept because several values only exist inside inline
/// script and are read with regular expressions.
pub struct Document {
    raw: String,
    html: Html,
}

impl Document {
    /// Parse a full page.
    ///
    /// HTML is parsed leniently; only input that cannot be a text document at
    /// all is rejected.
    pub fn parse(bytes: &[u8]) -> Result<Self> {
        let text = std::str::from_utf8(bytes)
            .map_err(|e| ExtractError::malformed(format!("invalid UTF-8: {e}")))?;
        let text = text.strip_prefix('\u{feff}').unwrap_or(text);
        if text.trim().is_empty() {
            return Err(ExtractError::malformed("empty document"));
        }
        if text.contains('\0') {
            return Err(ExtractError::malformed("binary content"));
        }
        Ok(Self::build(text))
    }

    /// Parse an embedded fragment (tooltip attribute, JSON string field).
    ///
    /// Never fails; an empty fragment yields an empty document.
    pub fn fragment(source: &str) -> Self {
        Self::build(source)
    }

    fn build(source: &str) -> Self {
        Self {
            raw: source.to_string(),
            html: Html::parse_document(source),
        }
    }

    /// Raw source text.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// Underlying `scraper` tree.
    pub fn html(&self) -> &Html {
        &self.html
    }

    /// Select all elements matching `css`.
    pub fn select(&self, css: &str) -> Result<Selection<'_>> {
        let sel = selector(css)?;
        Ok(Selection {
            nodes: self.html.select(&sel).collect(),
        })
    }

    /// True when at least one element matches `css`.
    pub fn exists(&self, css: &str) -> Result<bool> {
        let sel = selector(css)?;
        Ok(self.html.select(&sel).next().is_some())
    }

    /// Text of every `<script>` element, in document order.
    pub fn scripts(&self) -> Result<Vec<String>> {
        Ok(self.select("script")?.iter().map(|s| element_text(&s)).collect())
    }

    /// Attribute `name` of the first element matching `css`.
    pub fn attr(&self, css: &str, name: &str) -> Result<Option<String>> {
        Ok(self.select(css)?.attr(name).map(str::to_string))
    }

    /// Concatenated text of every element matching `css`.
    pub fn text(&self, css: &str) -> Result<String> {
        Ok(self.select(css)?.text())
    }

    /// Parse the attribute `name` of the first element matching `css` as a
    /// nested document. Missing attributes give an empty document.
    pub fn nested(&self, css: &str, name: &str) -> Result<Document> {
        Ok(self.select(css)?.nested(name))
    }
}

/// Compile a CSS selector.
pub fn selector(css: &str) -> Result<Selector> {
    Selector::parse(css).map_err(|e| ExtractError::selector(css, format!("{e:?}")))
}

fn element_text(el: &ElementRef<'_>) -> String {
    el.text().collect::<String>()
}

/// Ordered set of elements, narrowed and read like a query result.
#[derive(Clone, Default)]
pub struct Selection<'a> {
    nodes: Vec<ElementRef<'a>>,
}

impl<'a> Selection<'a> {
    /// Selection holding a single element.
    pub fn of(el: ElementRef<'a>) -> Self {
        Self { nodes: vec![el] }
    }

    /// Descendants of every element that match `css`.
    pub fn find(&self, css: &str) -> Result<Selection<'a>> {
        let sel = selector(css)?;
        let mut nodes: Vec<ElementRef<'a>> = Vec::new();
        for node in &self.nodes {
            for found in node.select(&sel) {
                if !nodes.iter().any(|n| n.id() == found.id()) {
                    nodes.push(found);
                }
            }
        }
        Ok(Selection { nodes })
    }

    /// Element at position `index`, or an empty selection.
    pub fn eq(&self, index: usize) -> Selection<'a> {
        Selection {
            nodes: self.nodes.get(index).copied().into_iter().collect(),
        }
    }

    pub fn first(&self) -> Selection<'a> {
        self.eq(0)
    }

    pub fn last(&self) -> Selection<'a> {
        Selection {
            nodes: self.nodes.last().copied().into_iter().collect(),
        }
    }

    /// Parent element of every element.
    pub fn parent(&self) -> Selection<'a> {
        Selection {
            nodes: self
                .nodes
                .iter()
                .filter_map(|n| n.parent().and_then(ElementRef::wrap))
                .collect(),
        }
    }

    /// Next element sibling of every element.
    pub fn next(&self) -> Selection<'a> {
        Selection {
            nodes: self
                .nodes
                .iter()
                .filter_map(|n| n.next_siblings().find_map(ElementRef::wrap))
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Iterate over the underlying elements.
    pub fn iter(&self) -> impl Iterator<Item = ElementRef<'a>> + '_ {
        self.nodes.iter().copied()
    }

    /// Iterate over single-element selections, wrapped for further queries.
    pub fn each(&self) -> impl Iterator<Item = Selection<'a>> + '_ {
        self.nodes.iter().map(|n| Selection::of(*n))
    }

    /// Attribute of the first element.
    pub fn attr(&self, name: &str) -> Option<&'a str> {
        self.nodes.first().and_then(|n| n.value().attr(name))
    }

    /// Attribute of the first element, or `default`.
    pub fn attr_or(&self, name: &str, default: &'a str) -> &'a str {
        self.attr(name).unwrap_or(default)
    }

    /// Concatenated text of every element.
    pub fn text(&self) -> String {
        self.nodes.iter().map(element_text).collect()
    }

    /// True when any element carries `class`.
    pub fn has_class(&self, class: &str) -> bool {
        self.nodes
            .iter()
            .any(|n| n.value().classes().any(|c| c == class))
    }

    /// Parse attribute `name` of the first element as a nested document.
    pub fn nested(&self, name: &str) -> Document {
        Document::fragment(self.attr(name).unwrap_or(""))
    }

    /// Text of the first element's direct text children, nested elements
    /// left out.
    pub fn own_text(&self) -> String {
        self.nodes
            .first()
            .map(|n| {
                n.children()
                    .filter_map(|c| c.value().as_text().map(|t| t.to_string()))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Inner HTML of the first element.
    pub fn inner_html(&self) -> String {
        self.nodes.first().map(|n| n.inner_html()).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"<html><body id="overview">
        <ul><li id="metal_box" class="metal tooltip" title="<table><tr><th>Available:</th><td>1.234</td></tr><tr><th>Storage</th><td>10.000</td></tr></table>">x</li></ul>
        <div class="a b"><span>one</span><span>two</span></div>
        <script>var session = "abc123";</script>
    </body></html>"#;

    #[test]
    fn test_parse_rejects_invalid_utf8() {
        let err = Document::parse(&[0xff, 0xfe, 0x00]).err().unwrap();
        assert!(matches!(err, ExtractError::MalformedDocument(_)));
    }

    #[test]
    fn test_parse_rejects_empty() {
        assert!(matches!(
            Document::parse(b"   ").err().unwrap(),
            ExtractError::MalformedDocument(_)
        ));
    }

    #[test]
    fn test_parse_tolerates_broken_markup() {
        let doc = Document::parse(b"<div><span>unclosed").unwrap();
        assert_eq!(doc.text("span").unwrap(), "unclosed");
    }

    #[test]
    fn test_nested_tooltip() {
        let doc = Document::parse(PAGE.as_bytes()).unwrap();
        let tooltip = doc.nested("li#metal_box", "title").unwrap();
        let rows = tooltip.select("table tr").unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows.eq(1).find("td").unwrap().text(), "10.000");
    }

    #[test]
    fn test_selection_positional_access() {
        let doc = Document::parse(PAGE.as_bytes()).unwrap();
        let spans = doc.select("div.a span").unwrap();
        assert_eq!(spans.eq(1).text(), "two");
        assert_eq!(spans.last().text(), "two");
        assert!(spans.eq(5).is_empty());
        assert!(spans.parent().has_class("b"));
    }

    #[test]
    fn test_scripts_and_attr() {
        let doc = Document::parse(PAGE.as_bytes()).unwrap();
        assert!(doc.scripts().unwrap()[0].contains("abc123"));
        assert_eq!(doc.attr("body", "id").unwrap().as_deref(), Some("overview"));
        assert!(doc.attr("body", "missing").unwrap().is_none());
    }

    #[test]
    fn test_own_text_skips_children() {
        let doc = Document::fragment(
            r#"<span class="level"><span class="textlabel">Metal Mine</span> 21</span>"#,
        );
        let level = doc.select("span.level").unwrap();
        assert_eq!(level.own_text().trim(), "21");
        assert!(level.text().contains("Metal Mine"));
    }

    #[test]
    fn test_invalid_selector() {
        let doc = Document::fragment("<p></p>");
        assert!(matches!(
            doc.select("[[invalid").err().unwrap(),
            ExtractError::Selector { .. }
        ));
    }
}

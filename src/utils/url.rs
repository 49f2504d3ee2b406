// src/utils/url.rs

//! Href query helpers.
//!
//! Game links are mostly relative (`index.php?page=...&cp=123`) or start
//! with `&`. They are resolved against a dummy base before the query string is
//! read with `url`.

use url::Url;

const BASE: &str = "https://localhost/game/index.php";

/// Value of query parameter `key` in `href`.
///
/// # Examples
/// ```
/// use ogextract::utils::url::query_param;
///
/// assert_eq!(
///     query_param("index.php?page=ingame&cp=33620229", "cp").as_deref(),
///     Some("33620229")
/// );
/// assert_eq!(query_param("&cp=42&x=1", "cp").as_deref(), Some("42"));
/// assert_eq!(query_param("#", "cp"), None);
/// ```
pub fn query_param(href: &str, key: &str) -> Option<String> {
    let url = resolve(href)?;
    url.query_pairs()
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.into_owned())
}

/// Numeric query parameter `key` in `href`.
pub fn query_i64(href: &str, key: &str) -> Option<i64> {
    query_param(href, key)?.trim().parse().ok()
}

fn resolve(href: &str) -> Option<Url> {
    let href = href.trim();
    // Bare "&a=b" fragments have no leading '?'
    let href = if href.starts_with('&') {
        format!("?{}", &href[1..])
    } else {
        href.to_string()
    };
    let base = Url::parse(BASE).ok()?;
    base.join(&href).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_i64_galaxy_link() {
        let href = "https://s1-en.ogame.gameforge.com/game/index.php?page=ingame&component=galaxy&galaxy=4&system=116&position=9";
        assert_eq!(query_i64(href, "galaxy"), Some(4));
        assert_eq!(query_i64(href, "system"), Some(116));
        assert_eq!(query_i64(href, "position"), Some(9));
        assert_eq!(query_i64(href, "missing"), None);
    }

    #[test]
    fn test_query_param_encoded() {
        assert_eq!(
            query_param("?page=highscore&allianceId=500123", "allianceId").as_deref(),
            Some("500123")
        );
    }
}

// src/utils/text.rs

//! Pattern matching over script text and localized name normalization.

use regex::Regex;

use crate::error::{ExtractError, Result};

/// Compile `pattern`.
pub fn regex(pattern: &str) -> Result<Regex> {
    Regex::new(pattern).map_err(|e| ExtractError::pattern(pattern, e))
}

/// First capture group of `pattern` in `haystack`.
pub fn capture(haystack: &str, pattern: &str) -> Result<Option<String>> {
    Ok(regex(pattern)?
        .captures(haystack)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string()))
}

/// True when `pattern` matches anywhere in `haystack`.
pub fn is_match(haystack: &str, pattern: &str) -> Result<bool> {
    Ok(regex(pattern)?.is_match(haystack))
}

/// Every capture group of the first match, in order.
///
/// Groups that did not participate in the match are returned as empty
/// strings so positions stay stable.
pub fn captures(haystack: &str, pattern: &str) -> Result<Option<Vec<String>>> {
    Ok(regex(pattern)?.captures(haystack).map(|c| {
        c.iter()
            .skip(1)
            .map(|m| m.map(|m| m.as_str().to_string()).unwrap_or_default())
            .collect()
    }))
}

/// Normalize a localized display name for table lookup.
///
/// Accents are folded, characters outside the alphabets used by game
/// translations are dropped and the result is lowercased:
/// `"Chasseur léger"` becomes `"chasseurleger"`.
pub fn normalize_name(name: &str) -> String {
    name.chars()
        .map(fold_accent)
        .filter(|c| is_name_char(*c))
        .flat_map(char::to_lowercase)
        .collect()
}

fn is_name_char(c: char) -> bool {
    c.is_ascii_alphabetic()
        || ('\u{0391}'..='\u{03c9}').contains(&c)
        || ('\u{0400}'..='\u{04ff}').contains(&c)
        || ('\u{3040}'..='\u{30ff}').contains(&c)
        || ('\u{4e00}'..='\u{9fff}').contains(&c)
}

fn fold_accent(c: char) -> char {
    match c {
        'à' | 'á' | 'â' | 'ã' | 'ä' | 'å' | 'ą' => 'a',
        'À' | 'Á' | 'Â' | 'Ã' | 'Ä' | 'Å' | 'Ą' => 'A',
        'ç' | 'ć' | 'č' => 'c',
        'Ç' | 'Ć' | 'Č' => 'C',
        'è' | 'é' | 'ê' | 'ë' | 'ę' | 'ě' => 'e',
        'È' | 'É' | 'Ê' | 'Ë' | 'Ę' | 'Ě' => 'E',
        'ì' | 'í' | 'î' | 'ï' => 'i',
        'Ì' | 'Í' | 'Î' | 'Ï' => 'I',
        'ñ' | 'ń' | 'ň' => 'n',
        'Ñ' | 'Ń' | 'Ň' => 'N',
        'ò' | 'ó' | 'ô' | 'õ' | 'ö' | 'ő' => 'o',
        'Ò' | 'Ó' | 'Ô' | 'Õ' | 'Ö' | 'Ő' => 'O',
        'ù' | 'ú' | 'û' | 'ü' | 'ű' | 'ů' => 'u',
        'Ù' | 'Ú' | 'Û' | 'Ü' | 'Ű' | 'Ů' => 'U',
        'ý' | 'ÿ' => 'y',
        'Ý' => 'Y',
        'ś' | 'š' | 'ș' | 'ş' => 's',
        'Ś' | 'Š' | 'Ș' | 'Ş' => 'S',
        'ź' | 'ż' | 'ž' => 'z',
        'Ź' | 'Ż' | 'Ž' => 'Z',
        'ř' => 'r',
        'Ř' => 'R',
        'ť' | 'ț' | 'ţ' => 't',
        'Ť' | 'Ț' | 'Ţ' => 'T',
        'ď' => 'd',
        'Ď' => 'D',
        'ğ' => 'g',
        'Ğ' => 'G',
        'й' => 'и',
        'ά' => 'α',
        'έ' => 'ε',
        'ή' => 'η',
        'ί' | 'ϊ' | 'ΐ' => 'ι',
        'ό' => 'ο',
        'ύ' | 'ϋ' | 'ΰ' => 'υ',
        'ώ' => 'ω',
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capture() {
        let script = r#"var session = "abc"; var token = "9d44";"#;
        assert_eq!(
            capture(script, r#"var token = "([^"]+)""#).unwrap().as_deref(),
            Some("9d44")
        );
        assert!(capture(script, r"nothing(\d+)").unwrap().is_none());
    }

    #[test]
    fn test_captures_keeps_positions() {
        let got = captures("PT5M", r"PT(?:(\d+)H)?(?:(\d+)M)?(?:(\d+)S)?")
            .unwrap()
            .unwrap();
        assert_eq!(got, vec!["".to_string(), "5".to_string(), "".to_string()]);
    }

    #[test]
    fn test_invalid_pattern() {
        assert!(matches!(
            regex("(unclosed").err().unwrap(),
            ExtractError::Pattern { .. }
        ));
    }

    #[test]
    fn test_normalize_name() {
        assert_eq!(normalize_name("Light Fighter"), "lightfighter");
        assert_eq!(normalize_name("Chasseur léger"), "chasseurleger");
        assert_eq!(normalize_name("Großer Transporter"), "groertransporter");
        assert_eq!(normalize_name("Mały transporter"), "maytransporter");
    }
}

//! Cloud cover threshold extraction

use lazy_static::lazy_static;
use regex::Regex;

pub const CLEAR_SKY: f64 = 10.0;
pub const MOSTLY_CLEAR: f64 = 20.0;

lazy_static! {
    static ref BOUNDED_RE: Regex = Regex::new(
        r"\b(?:less\s+than|under|below|max|maximum)\s+(\d+(?:\.\d+)?)\s*%?\s*cloud"
    )
    .unwrap();
    static ref PERCENT_RE: Regex = Regex::new(r"(\d+(?:\.\d+)?)\s*%\s*cloud").unwrap();
    static ref MOSTLY_CLEAR_RE: Regex = Regex::new(r"\bmostly\s+clear\b").unwrap();
    static ref CLEAR_SKY_RE: Regex = Regex::new(r"\bclear\s+sk(?:y|ies)\b").unwrap();
}

/// Extract a maximum cloud cover percentage, clamped to 0..=100
pub fn extract_cloud_cover(text: &str) -> Option<f64> {
    let text = text.to_lowercase();

    let numeric = BOUNDED_RE
        .captures(&text)
        .or_else(|| PERCENT_RE.captures(&text))
        .and_then(|caps| caps[1].parse::<f64>().ok());

    if let Some(value) = numeric {
        return Some(value.clamp(0.0, 100.0));
    }

    // "mostly clear skies" counts as clear sky
    if CLEAR_SKY_RE.is_match(&text) {
        return Some(CLEAR_SKY);
    }
    if MOSTLY_CLEAR_RE.is_match(&text) {
        return Some(MOSTLY_CLEAR);
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounded_phrases() {
        assert_eq!(extract_cloud_cover("less than 20% clouds"), Some(20.0));
        assert_eq!(extract_cloud_cover("Sentinel-2 with less than 20% cloud cover"), Some(20.0));
        assert_eq!(extract_cloud_cover("under 15 % cloud"), Some(15.0));
        assert_eq!(extract_cloud_cover("below 5 cloud"), Some(5.0));
        assert_eq!(extract_cloud_cover("maximum 30% cloudiness"), Some(30.0));
        assert_eq!(extract_cloud_cover("max 12.5% clouds"), Some(12.5));
    }

    #[test]
    fn test_bare_percentage() {
        assert_eq!(extract_cloud_cover("scenes with 40% cloud cover"), Some(40.0));
    }

    #[test]
    fn test_qualitative() {
        assert_eq!(extract_cloud_cover("clear skies over Rome"), Some(10.0));
        assert_eq!(extract_cloud_cover("a clear sky"), Some(10.0));
        assert_eq!(extract_cloud_cover("mostly clear"), Some(20.0));
        assert_eq!(extract_cloud_cover("mostly clear skies"), Some(10.0));
        assert_eq!(extract_cloud_cover("mostly clear weather"), Some(20.0));
    }

    #[test]
    fn test_absent() {
        assert_eq!(extract_cloud_cover("Sentinel-2 images of Paris"), None);
        assert_eq!(extract_cloud_cover("20% of the area"), None);
    }

    #[test]
    fn test_clamped() {
        assert_eq!(extract_cloud_cover("less than 150% cloud"), Some(100.0));
    }
}

//! Regex entity extractors
//!
//! Each extractor is independent of the others:
//! - product/sensor type
//! - date range
//! - cloud cover threshold
//! - location name

pub mod cloud;
pub mod dates;
pub mod location;
pub mod product;

use crate::models::{BoundingBox, DataType, Geometry};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

pub use cloud::extract_cloud_cover;
pub use dates::{extract_dates, month_span, DateRange};
pub use location::extract_location;
pub use product::{extract_product, ProductMatch, DEFAULT_PRODUCT};

/// Entities inferred from free text, shared by every resolution tier
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExtractedEntities {
    pub product: Option<String>,
    pub data_type: Option<DataType>,
    pub provider: Option<String>,
    pub location: Option<String>,
    pub bbox: Option<BoundingBox>,
    pub geometry: Option<Geometry>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub cloud_cover_max: Option<f64>,
    #[serde(default)]
    pub product_defaulted: bool,
    #[serde(default)]
    pub dates_defaulted: bool,
}

/// Run every regex extractor over the text
pub fn extract_all(text: &str, today: NaiveDate) -> ExtractedEntities {
    let product = extract_product(text);
    let dates = extract_dates(text, today);

    ExtractedEntities {
        product: Some(product.product),
        data_type: Some(product.data_type),
        provider: None,
        location: extract_location(text),
        bbox: None,
        geometry: None,
        start_date: Some(dates.start),
        end_date: Some(dates.end),
        cloud_cover_max: extract_cloud_cover(text),
        product_defaulted: product.defaulted,
        dates_defaulted: dates.defaulted,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_all_full_query() {
        let today = NaiveDate::from_ymd_opt(2024, 6, 15).unwrap();
        let entities = extract_all(
            "Sentinel-2 images of Paris from January 2024 with less than 20% cloud cover",
            today,
        );

        assert_eq!(entities.product.as_deref(), Some("S2_MSI_L2A"));
        assert_eq!(entities.data_type, Some(DataType::Optical));
        assert_eq!(entities.location.as_deref(), Some("Paris"));
        assert_eq!(entities.start_date, NaiveDate::from_ymd_opt(2024, 1, 1));
        assert_eq!(entities.end_date, NaiveDate::from_ymd_opt(2024, 1, 31));
        assert_eq!(entities.cloud_cover_max, Some(20.0));
        assert!(!entities.product_defaulted);
        assert!(!entities.dates_defaulted);
    }

    #[test]
    fn test_extract_all_defaults() {
        let today = NaiveDate::from_ymd_opt(2024, 6, 15).unwrap();
        let entities = extract_all("something interesting", today);

        assert!(entities.product_defaulted);
        assert!(entities.dates_defaulted);
        assert!(entities.location.is_none());
        assert!(entities.cloud_cover_max.is_none());
    }
}

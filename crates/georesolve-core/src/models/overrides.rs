//! Caller-supplied explicit fields applied after inference

use super::request::{validate_cloud_cover, BoundingBox, DataType, Geometry, StructuredRequest};
use crate::error::{GeoResolveError, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Explicit request fields. Every set field wins over the inferred value.
///
/// Values are kept raw (strings, `Vec<f64>`) so malformed input reaches
/// [`RequestOverrides::apply`] and is reported instead of dropped.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RequestOverrides {
    #[serde(default)]
    pub product: Option<String>,
    #[serde(default)]
    pub data_type: Option<String>,
    #[serde(default)]
    pub provider: Option<String>,
    #[serde(default)]
    pub geometry: Option<serde_json::Value>,
    #[serde(default)]
    pub bbox: Option<Vec<f64>>,
    #[serde(default)]
    pub location_name: Option<String>,
    #[serde(default)]
    pub start_date: Option<String>,
    #[serde(default)]
    pub end_date: Option<String>,
    #[serde(default)]
    pub cloud_cover_max: Option<f64>,
    #[serde(default)]
    pub limit: Option<u32>,
}

impl RequestOverrides {
    pub fn is_empty(&self) -> bool {
        self.product.is_none()
            && self.data_type.is_none()
            && self.provider.is_none()
            && self.geometry.is_none()
            && self.bbox.is_none()
            && self.location_name.is_none()
            && self.start_date.is_none()
            && self.end_date.is_none()
            && self.cloud_cover_max.is_none()
            && self.limit.is_none()
    }

    /// Whether the caller supplied an area, which makes geocoding unnecessary
    pub fn has_explicit_area(&self) -> bool {
        self.geometry.is_some() || self.bbox.is_some()
    }

    /// Validate every set field without touching a request
    pub fn validate(&self) -> Result<()> {
        self.parsed().map(|_| ())
    }

    /// Merge into `request`; the request is left untouched on error
    pub fn apply(&self, request: &mut StructuredRequest) -> Result<()> {
        let parsed = self.parsed()?;
        let mut merged = request.clone();

        if let Some(ref product) = self.product {
            merged.product = Some(product.clone());
            merged.product_defaulted = false;
        }
        if let Some(data_type) = parsed.data_type {
            merged.data_type = Some(data_type);
        }
        if let Some(ref provider) = self.provider {
            merged.provider = Some(provider.clone());
        }
        if let Some(geometry) = parsed.geometry {
            merged.geometry = Some(geometry);
        }
        if let Some(bbox) = parsed.bbox {
            merged.bbox = Some(bbox);
        }
        if let Some(ref location) = self.location_name {
            merged.location_name = Some(location.clone());
        }
        if let Some(start) = parsed.start_date {
            merged.start_date = Some(start);
            merged.dates_defaulted = false;
        }
        if let Some(end) = parsed.end_date {
            merged.end_date = Some(end);
            merged.dates_defaulted = false;
        }
        if let Some(cloud) = self.cloud_cover_max {
            merged.cloud_cover_max = Some(cloud);
        }
        if let Some(limit) = self.limit {
            merged.limit = limit;
        }

        // a single explicit bound moves the inferred one instead of failing
        if let (Some(start), Some(end)) = (merged.start_date, merged.end_date) {
            if start > end {
                match (parsed.start_date, parsed.end_date) {
                    (Some(start), None) => merged.end_date = Some(start),
                    (None, Some(end)) => merged.start_date = Some(end),
                    _ => {
                        return Err(GeoResolveError::Validation(format!(
                            "start_date {} is after end_date {}",
                            start, end
                        )))
                    }
                }
                merged.dates_defaulted = false;
            }
        }

        *request = merged;
        Ok(())
    }

    fn parsed(&self) -> Result<ParsedOverrides> {
        let data_type = self
            .data_type
            .as_deref()
            .map(str::parse::<DataType>)
            .transpose()?;

        let geometry = self.geometry.clone().map(Geometry::from_value).transpose()?;

        let bbox = self
            .bbox
            .as_deref()
            .map(BoundingBox::from_slice)
            .transpose()?;

        let start_date = self.start_date.as_deref().map(parse_iso_date).transpose()?;
        let end_date = self.end_date.as_deref().map(parse_iso_date).transpose()?;
        if let (Some(start), Some(end)) = (start_date, end_date) {
            if start > end {
                return Err(GeoResolveError::Validation(format!(
                    "start_date {} is after end_date {}",
                    start, end
                )));
            }
        }

        if let Some(cloud) = self.cloud_cover_max {
            validate_cloud_cover(cloud)?;
        }

        if self.limit == Some(0) {
            return Err(GeoResolveError::Validation(
                "limit must be a positive integer".to_string(),
            ));
        }

        Ok(ParsedOverrides {
            data_type,
            geometry,
            bbox,
            start_date,
            end_date,
        })
    }
}

struct ParsedOverrides {
    data_type: Option<DataType>,
    geometry: Option<Geometry>,
    bbox: Option<BoundingBox>,
    start_date: Option<NaiveDate>,
    end_date: Option<NaiveDate>,
}

/// Parse a strict `YYYY-MM-DD` date
pub fn parse_iso_date(value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").map_err(|e| {
        GeoResolveError::Validation(format!("invalid date '{}' (expected YYYY-MM-DD): {}", value, e))
    })
}

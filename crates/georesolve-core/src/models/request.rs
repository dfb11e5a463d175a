//! Structured request model handed to the search gateway

use crate::error::{GeoResolveError, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Default number of results requested from the gateway
pub const DEFAULT_LIMIT: u32 = 10;

/// Kind of geospatial data
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataType {
    Optical,
    Sar,
    Dem,
    LandCover,
    Climate,
    Population,
    AirQuality,
}

impl DataType {
    pub fn as_str(&self) -> &'static str {
        match self {
            DataType::Optical => "optical",
            DataType::Sar => "sar",
            DataType::Dem => "dem",
            DataType::LandCover => "land_cover",
            DataType::Climate => "climate",
            DataType::Population => "population",
            DataType::AirQuality => "air_quality",
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DataType {
    type Err = GeoResolveError;

    fn from_str(s: &str) -> Result<Self> {
        let normalized: String = s
            .trim()
            .to_lowercase()
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect();

        match normalized.as_str() {
            "optical" => Ok(DataType::Optical),
            "sar" | "radar" => Ok(DataType::Sar),
            "dem" | "elevation" => Ok(DataType::Dem),
            "landcover" => Ok(DataType::LandCover),
            "climate" => Ok(DataType::Climate),
            "population" => Ok(DataType::Population),
            "airquality" => Ok(DataType::AirQuality),
            _ => Err(GeoResolveError::Validation(format!(
                "unknown data type '{}'",
                s
            ))),
        }
    }
}

/// Axis-aligned rectangle in WGS84 as (minX, minY, maxX, maxY)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(into = "[f64; 4]", try_from = "[f64; 4]")]
pub struct BoundingBox {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl BoundingBox {
    /// Create a bounding box, rejecting non-finite or inverted coordinates
    pub fn new(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Result<Self> {
        if ![min_x, min_y, max_x, max_y].iter().all(|v| v.is_finite()) {
            return Err(GeoResolveError::Validation(
                "bbox coordinates must be finite numbers".to_string(),
            ));
        }
        if min_x > max_x || min_y > max_y {
            return Err(GeoResolveError::Validation(format!(
                "bbox must satisfy minX<=maxX and minY<=maxY, got ({}, {}, {}, {})",
                min_x, min_y, max_x, max_y
            )));
        }
        Ok(Self {
            min_x,
            min_y,
            max_x,
            max_y,
        })
    }

    /// Build from a caller-supplied slice that must hold exactly 4 numbers
    pub fn from_slice(values: &[f64]) -> Result<Self> {
        match values {
            [min_x, min_y, max_x, max_y] => Self::new(*min_x, *min_y, *max_x, *max_y),
            _ => Err(GeoResolveError::Validation(format!(
                "bbox must have 4 values (minx, miny, maxx, maxy), got {}",
                values.len()
            ))),
        }
    }

    /// Build from the (south, north, west, east) ordering used by Nominatim
    pub fn from_south_north_west_east(south: f64, north: f64, west: f64, east: f64) -> Result<Self> {
        Self::new(west, south, east, north)
    }

    pub fn as_array(&self) -> [f64; 4] {
        [self.min_x, self.min_y, self.max_x, self.max_y]
    }

    /// Centre point as (lon, lat)
    pub fn center(&self) -> (f64, f64) {
        (
            (self.min_x + self.max_x) / 2.0,
            (self.min_y + self.max_y) / 2.0,
        )
    }
}

impl From<BoundingBox> for [f64; 4] {
    fn from(bbox: BoundingBox) -> Self {
        bbox.as_array()
    }
}

impl TryFrom<[f64; 4]> for BoundingBox {
    type Error = GeoResolveError;

    fn try_from(values: [f64; 4]) -> Result<Self> {
        Self::from_slice(&values)
    }
}

impl fmt::Display for BoundingBox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "({}, {}, {}, {})",
            self.min_x, self.min_y, self.max_x, self.max_y
        )
    }
}

/// GeoJSON geometry object, kept as raw JSON
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Geometry(pub serde_json::Value);

impl Geometry {
    /// Degenerate point geometry at (lon, lat)
    pub fn point(lon: f64, lat: f64) -> Self {
        Self(serde_json::json!({
            "type": "Point",
            "coordinates": [lon, lat],
        }))
    }

    /// Accept any JSON object carrying a string `type` member
    pub fn from_value(value: serde_json::Value) -> Result<Self> {
        match value.get("type").and_then(|t| t.as_str()) {
            Some(_) if value.is_object() => Ok(Self(value)),
            _ => Err(GeoResolveError::Validation(
                "geometry must be a GeoJSON object with a 'type' member".to_string(),
            )),
        }
    }

    pub fn geometry_type(&self) -> Option<&str> {
        self.0.get("type").and_then(|t| t.as_str())
    }
}

/// Which tier produced the inferred fields
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResolutionTier {
    Llm,
    Regex,
}

impl ResolutionTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResolutionTier::Llm => "llm",
            ResolutionTier::Regex => "regex",
        }
    }
}

/// Canonical structured geospatial query
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StructuredRequest {
    pub product: Option<String>,
    pub data_type: Option<DataType>,
    pub provider: Option<String>,
    pub geometry: Option<Geometry>,
    pub bbox: Option<BoundingBox>,
    pub location_name: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub cloud_cover_max: Option<f64>,
    pub limit: u32,

    /// Tier that produced the inferred fields (None when every tier failed)
    pub resolved_by: Option<ResolutionTier>,
    /// Product came from the regex tier's default rather than a match
    #[serde(default)]
    pub product_defaulted: bool,
    /// Date range came from the regex tier's default window
    #[serde(default)]
    pub dates_defaulted: bool,
}

impl StructuredRequest {
    /// Request with every field unset except the result limit
    pub fn empty(limit: u32) -> Self {
        Self {
            product: None,
            data_type: None,
            provider: None,
            geometry: None,
            bbox: None,
            location_name: None,
            start_date: None,
            end_date: None,
            cloud_cover_max: None,
            limit: limit.max(1),
            resolved_by: None,
            product_defaulted: false,
            dates_defaulted: false,
        }
    }

    /// Whether the request has any spatial constraint at all
    pub fn has_area(&self) -> bool {
        self.geometry.is_some() || self.bbox.is_some() || self.location_name.is_some()
    }

    /// Callers should ask the user for clarification when this is true
    pub fn is_low_confidence(&self) -> bool {
        self.resolved_by.is_none() || self.product_defaulted || !self.has_area()
    }

    /// One-line description for logs and terminal output
    pub fn summary(&self) -> String {
        let mut parts = Vec::new();
        if let Some(ref product) = self.product {
            parts.push(format!("product={}", product));
        }
        if let Some(data_type) = self.data_type {
            parts.push(format!("type={}", data_type));
        }
        if let Some(ref location) = self.location_name {
            parts.push(format!("location={}", location));
        } else if let Some(bbox) = self.bbox {
            parts.push(format!("bbox={}", bbox));
        }
        if let (Some(start), Some(end)) = (self.start_date, self.end_date) {
            parts.push(format!("dates={} to {}", start, end));
        }
        if let Some(cloud) = self.cloud_cover_max {
            parts.push(format!("clouds<{}%", cloud));
        }
        parts.push(format!("limit={}", self.limit));

        format!("StructuredRequest({})", parts.join(", "))
    }
}

impl Default for StructuredRequest {
    fn default() -> Self {
        Self::empty(DEFAULT_LIMIT)
    }
}

/// Check the 0..=100 cloud cover range
pub fn validate_cloud_cover(value: f64) -> Result<f64> {
    if value.is_finite() && (0.0..=100.0).contains(&value) {
        Ok(value)
    } else {
        Err(GeoResolveError::Validation(format!(
            "cloud_cover_max must be between 0 and 100, got {}",
            value
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bbox_rejects_wrong_arity() {
        assert!(BoundingBox::from_slice(&[1.0, 2.0, 3.0]).is_err());
        assert!(BoundingBox::from_slice(&[1.0, 2.0, 3.0, 4.0, 5.0]).is_err());
    }

    #[test]
    fn test_bbox_rejects_inverted() {
        assert!(BoundingBox::new(10.0, 0.0, 5.0, 1.0).is_err());
        assert!(BoundingBox::new(0.0, 10.0, 5.0, 1.0).is_err());
        assert!(BoundingBox::new(f64::NAN, 0.0, 5.0, 1.0).is_err());
    }

    #[test]
    fn test_bbox_from_nominatim_order() {
        let bbox = BoundingBox::from_south_north_west_east(48.81, 48.90, 2.25, 2.42).unwrap();
        assert_eq!(bbox.as_array(), [2.25, 48.81, 2.42, 48.90]);
    }

    #[test]
    fn test_bbox_serializes_as_array() {
        let bbox = BoundingBox::new(2.25, 48.81, 2.42, 48.90).unwrap();
        let json = serde_json::to_string(&bbox).unwrap();
        assert_eq!(json, "[2.25,48.81,2.42,48.9]");

        let back: BoundingBox = serde_json::from_str(&json).unwrap();
        assert_eq!(back, bbox);

        assert!(serde_json::from_str::<BoundingBox>("[3.0,0.0,1.0,1.0]").is_err());
    }

    #[test]
    fn test_data_type_parsing() {
        assert_eq!("land_cover".parse::<DataType>().unwrap(), DataType::LandCover);
        assert_eq!("Land Cover".parse::<DataType>().unwrap(), DataType::LandCover);
        assert_eq!("SAR".parse::<DataType>().unwrap(), DataType::Sar);
        assert_eq!("air_quality".parse::<DataType>().unwrap(), DataType::AirQuality);
        assert!("hyperspectral".parse::<DataType>().is_err());
    }

    #[test]
    fn test_geometry_point() {
        let point = Geometry::point(2.35, 48.85);
        assert_eq!(point.geometry_type(), Some("Point"));
        assert_eq!(point.0["coordinates"][0], 2.35);
    }

    #[test]
    fn test_geometry_from_value_requires_type() {
        assert!(Geometry::from_value(serde_json::json!({"coordinates": [1, 2]})).is_err());
        assert!(Geometry::from_value(serde_json::json!("Point")).is_err());
        assert!(Geometry::from_value(serde_json::json!({"type": "Polygon", "coordinates": []})).is_ok());
    }

    #[test]
    fn test_empty_request_is_low_confidence() {
        let request = StructuredRequest::empty(0);
        assert_eq!(request.limit, 1);
        assert!(request.is_low_confidence());
        assert!(request.product.is_none());
    }

    #[test]
    fn test_summary() {
        let mut request = StructuredRequest::default();
        request.product = Some("S2_MSI_L2A".to_string());
        request.data_type = Some(DataType::Optical);
        request.location_name = Some("Paris".to_string());
        request.start_date = NaiveDate::from_ymd_opt(2024, 1, 1);
        request.end_date = NaiveDate::from_ymd_opt(2024, 1, 31);
        request.cloud_cover_max = Some(20.0);

        assert_eq!(
            request.summary(),
            "StructuredRequest(product=S2_MSI_L2A, type=optical, location=Paris, \
             dates=2024-01-01 to 2024-01-31, clouds<20%, limit=10)"
        );
    }

    #[test]
    fn test_cloud_cover_range() {
        assert!(validate_cloud_cover(0.0).is_ok());
        assert!(validate_cloud_cover(100.0).is_ok());
        assert!(validate_cloud_cover(-1.0).is_err());
        assert!(validate_cloud_cover(100.5).is_err());
    }
}

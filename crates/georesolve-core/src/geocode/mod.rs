//! Place name geocoding with request rate limiting

mod rate_limit;
mod transport;

pub use rate_limit::RateLimiter;
pub use transport::{GeocodingTransport, NominatimTransport};

use crate::config::GeocoderConfig;
use crate::error::{GeoResolveError, Result};
use crate::models::{BoundingBox, Geometry};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;

/// A geocoded place
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeocodeResult {
    pub bbox: Option<BoundingBox>,
    pub geometry: Geometry,
    pub display_name: Option<String>,
    pub lat: f64,
    pub lon: f64,
}

/// Address information for a coordinate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReverseGeocodeResult {
    pub display_name: Option<String>,
    pub address: serde_json::Map<String, Value>,
    pub lat: f64,
    pub lon: f64,
}

/// Rate-limited geocoder over a pluggable transport
pub struct Geocoder {
    transport: Arc<dyn GeocodingTransport>,
    limiter: RateLimiter,
}

impl Geocoder {
    /// Nominatim-backed geocoder from configuration
    pub fn new(config: &GeocoderConfig) -> Result<Self> {
        let transport = NominatimTransport::new(config)?;
        Ok(Self::with_transport(
            Arc::new(transport),
            Duration::from_millis(config.min_interval_ms),
        ))
    }

    pub fn with_transport(transport: Arc<dyn GeocodingTransport>, min_interval: Duration) -> Self {
        Self {
            transport,
            limiter: RateLimiter::new(min_interval),
        }
    }

    /// Resolve a place name; any failure is logged and reported as `None`
    pub async fn geocode(&self, place: &str) -> Option<GeocodeResult> {
        let place = place.trim();
        if place.is_empty() {
            return None;
        }

        self.limiter.acquire().await;

        let payload = match self.transport.search(place).await {
            Ok(payload) => payload,
            Err(e) => {
                tracing::warn!("Geocoding request failed for '{}': {}", place, e);
                return None;
            }
        };

        match parse_search_response(&payload) {
            Ok(Some(result)) => {
                tracing::debug!(
                    "Geocoded '{}' -> {}",
                    place,
                    result.display_name.as_deref().unwrap_or("?")
                );
                Some(result)
            }
            Ok(None) => {
                tracing::warn!("No geocoding results for '{}'", place);
                None
            }
            Err(e) => {
                tracing::warn!("Malformed geocoding response for '{}': {}", place, e);
                None
            }
        }
    }

    pub async fn reverse_geocode(&self, lat: f64, lon: f64) -> Option<ReverseGeocodeResult> {
        if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lon) {
            tracing::warn!("Reverse geocoding skipped, coordinate out of range: ({}, {})", lat, lon);
            return None;
        }

        self.limiter.acquire().await;

        let parsed = match self.transport.reverse(lat, lon).await {
            Ok(payload) => parse_reverse_response(&payload),
            Err(e) => Err(e),
        };

        match parsed {
            Ok(result) => Some(result),
            Err(e) => {
                tracing::warn!("Reverse geocoding failed for ({}, {}): {}", lat, lon, e);
                None
            }
        }
    }
}

/// Parse a Nominatim `/search` payload; an empty array is `Ok(None)`
pub fn parse_search_response(payload: &Value) -> Result<Option<GeocodeResult>> {
    let results = payload
        .as_array()
        .ok_or_else(|| malformed("search response is not an array"))?;
    let Some(first) = results.first() else {
        return Ok(None);
    };

    let lat = coordinate(first, "lat")?;
    let lon = coordinate(first, "lon")?;

    let bbox = match first.get("boundingbox") {
        None | Some(Value::Null) => None,
        Some(Value::Array(values)) if values.len() == 4 => {
            let mut nums = [0.0; 4];
            for (slot, raw) in nums.iter_mut().zip(values) {
                *slot = number(raw).ok_or_else(|| malformed("non-numeric boundingbox value"))?;
            }
            let [south, north, west, east] = nums;
            Some(BoundingBox::from_south_north_west_east(south, north, west, east)?)
        }
        Some(_) => return Err(malformed("boundingbox must hold four values")),
    };

    let geometry = match first.get("geojson") {
        Some(value @ Value::Object(_)) => Geometry::from_value(value.clone())?,
        _ => Geometry::point(lon, lat),
    };

    Ok(Some(GeocodeResult {
        bbox,
        geometry,
        display_name: first
            .get("display_name")
            .and_then(Value::as_str)
            .map(str::to_string),
        lat,
        lon,
    }))
}

pub fn parse_reverse_response(payload: &Value) -> Result<ReverseGeocodeResult> {
    if let Some(error) = payload.get("error").and_then(Value::as_str) {
        return Err(GeoResolveError::NotFound(error.to_string()));
    }

    Ok(ReverseGeocodeResult {
        display_name: payload
            .get("display_name")
            .and_then(Value::as_str)
            .map(str::to_string),
        address: payload
            .get("address")
            .and_then(Value::as_object)
            .cloned()
            .unwrap_or_default(),
        lat: coordinate(payload, "lat")?,
        lon: coordinate(payload, "lon")?,
    })
}

/// Nominatim encodes numbers as strings; accept either
fn number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn coordinate(obj: &Value, key: &str) -> Result<f64> {
    obj.get(key)
        .and_then(number)
        .ok_or_else(|| malformed(&format!("missing or invalid '{}'", key)))
}

fn malformed(message: &str) -> GeoResolveError {
    GeoResolveError::ExternalError(format!("geocoder: {}", message))
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CannedTransport {
        search: Result<Value>,
        reverse: Value,
        calls: AtomicUsize,
    }

    impl CannedTransport {
        fn new(search: Value) -> Self {
            Self {
                search: Ok(search),
                reverse: json!({}),
                calls: AtomicUsize::new(0),
            }
        }

        fn failing() -> Self {
            Self {
                search: Err(GeoResolveError::ExternalError("connection refused".to_string())),
                reverse: json!({}),
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl GeocodingTransport for CannedTransport {
        async fn search(&self, _query: &str) -> Result<Value> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match &self.search {
                Ok(value) => Ok(value.clone()),
                Err(e) => Err(GeoResolveError::ExternalError(e.to_string())),
            }
        }

        async fn reverse(&self, _lat: f64, _lon: f64) -> Result<Value> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.reverse.clone())
        }
    }

    fn paris() -> Value {
        json!([{
            "lat": "48.8588897",
            "lon": "2.3200410",
            "display_name": "Paris, Île-de-France, France",
            "boundingbox": ["48.81", "48.90", "2.25", "2.42"],
            "geojson": {"type": "Polygon", "coordinates": [[[2.25, 48.81], [2.42, 48.81], [2.42, 48.90], [2.25, 48.81]]]}
        }])
    }

    fn canned_geocoder(transport: CannedTransport) -> (Geocoder, Arc<CannedTransport>) {
        let transport = Arc::new(transport);
        let geocoder = Geocoder::with_transport(transport.clone(), Duration::from_secs(1));
        (geocoder, transport)
    }

    #[test]
    fn test_bbox_reordered_to_min_max() {
        let result = parse_search_response(&paris()).unwrap().unwrap();
        assert_eq!(result.bbox.unwrap().as_array(), [2.25, 48.81, 2.42, 48.90]);
        assert_eq!(result.geometry.geometry_type(), Some("Polygon"));
        assert!((result.lat - 48.8588897).abs() < 1e-9);
    }

    #[test]
    fn test_numeric_bbox_and_point_fallback() {
        let payload = json!([{"lat": 10.5, "lon": -3.25, "boundingbox": [10.0, 11.0, -4.0, -3.0]}]);
        let result = parse_search_response(&payload).unwrap().unwrap();

        assert_eq!(result.bbox.unwrap().as_array(), [-4.0, 10.0, -3.0, 11.0]);
        assert_eq!(result.geometry, Geometry::point(-3.25, 10.5));
        assert!(result.display_name.is_none());
    }

    #[test]
    fn test_empty_and_malformed_payloads() {
        assert!(parse_search_response(&json!([])).unwrap().is_none());
        assert!(parse_search_response(&json!({"error": "x"})).is_err());
        assert!(parse_search_response(&json!([{"lon": "1"}])).is_err());
        assert!(parse_search_response(&json!([{"lat": "1", "lon": "2", "boundingbox": ["a", "b", "c", "d"]}])).is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_geocode_success() {
        let (geocoder, _) = canned_geocoder(CannedTransport::new(paris()));
        let result = geocoder.geocode("Paris").await.unwrap();
        assert_eq!(result.display_name.as_deref(), Some("Paris, Île-de-France, France"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_geocode_failures_are_none() {
        let (geocoder, transport) = canned_geocoder(CannedTransport::failing());
        assert!(geocoder.geocode("Paris").await.is_none());
        assert_eq!(transport.calls.load(Ordering::SeqCst), 1);

        let (geocoder, _) = geocoder_empty();
        assert!(geocoder.geocode("Nowhere").await.is_none());
    }

    fn geocoder_empty() -> (Geocoder, Arc<CannedTransport>) {
        canned_geocoder(CannedTransport::new(json!([])))
    }

    #[tokio::test(start_paused = true)]
    async fn test_blank_place_skips_request() {
        let (geocoder, transport) = canned_geocoder(CannedTransport::new(paris()));
        assert!(geocoder.geocode("   ").await.is_none());
        assert_eq!(transport.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_geocode_calls_are_rate_limited() {
        let (geocoder, transport) = canned_geocoder(CannedTransport::new(paris()));
        let start = tokio::time::Instant::now();

        geocoder.geocode("Paris").await;
        geocoder.geocode("Paris").await;
        geocoder.geocode("Paris").await;

        assert_eq!(transport.calls.load(Ordering::SeqCst), 3);
        assert!(start.elapsed() >= Duration::from_secs(2));
    }

    #[tokio::test(start_paused = true)]
    async fn test_reverse_geocode() {
        let mut transport = CannedTransport::new(json!([]));
        transport.reverse = json!({
            "lat": "48.8566",
            "lon": "2.3522",
            "display_name": "Paris, France",
            "address": {"city": "Paris", "country_code": "fr"}
        });
        let (geocoder, _) = canned_geocoder(transport);

        let result = geocoder.reverse_geocode(48.8566, 2.3522).await.unwrap();
        assert_eq!(result.display_name.as_deref(), Some("Paris, France"));
        assert_eq!(result.address["city"], "Paris");

        assert!(geocoder.reverse_geocode(123.0, 0.0).await.is_none());
    }

    #[test]
    fn test_reverse_error_payload() {
        let err = parse_reverse_response(&json!({"error": "Unable to geocode"})).unwrap_err();
        assert!(matches!(err, GeoResolveError::NotFound(_)));
    }
}

//! LLM-backed entity extraction

use super::LLMBackend;
use crate::error::{GeoResolveError, Result};
use crate::extract::ExtractedEntities;
use crate::models::{parse_iso_date, validate_cloud_cover, BoundingBox, DataType};
use serde_json::{Map, Value};
use std::sync::Arc;

const SCHEMA_KEYS: &[&str] = &[
    "product",
    "data_type",
    "location",
    "bbox",
    "start_date",
    "end_date",
    "cloud_cover_max",
    "provider",
];

/// Turns free text into entities by asking an LLM for a fixed JSON shape
#[derive(Clone)]
pub struct LLMExtractor {
    backend: Arc<dyn LLMBackend>,
}

impl LLMExtractor {
    pub fn new(backend: Arc<dyn LLMBackend>) -> Self {
        Self { backend }
    }

    pub fn backend(&self) -> &Arc<dyn LLMBackend> {
        &self.backend
    }

    /// Prompt the backend and parse its reply.
    ///
    /// Transport failures come back as `Http`/`ExternalError`; replies that
    /// are not a usable JSON object come back as `SchemaViolation`.
    pub async fn extract(&self, text: &str) -> Result<ExtractedEntities> {
        let prompt = build_extraction_prompt(text);
        let response = self.backend.complete(&prompt).await?;
        tracing::debug!("LLM reply ({} chars)", response.len());
        parse_extraction_response(&response)
    }
}

pub fn build_extraction_prompt(query: &str) -> String {
    format!(
        r#"Extract geospatial data request parameters from this query.

Query: "{}"

Return a JSON object with these fields (use null if not mentioned):
{{
    "product": "product code like S2_MSI_L2A, LANDSAT_C2L2, COP-DEM_GLO-30",
    "data_type": "optical|sar|dem|land_cover|climate|population|air_quality",
    "location": "location name mentioned",
    "bbox": [minx, miny, maxx, maxy] or null,
    "start_date": "YYYY-MM-DD",
    "end_date": "YYYY-MM-DD",
    "cloud_cover_max": number 0-100 or null,
    "provider": "preferred provider or null"
}}

Product mappings:
- sentinel-2, sentinel 2, s2 -> S2_MSI_L2A (optical)
- sentinel-1, sentinel 1, s1, sar -> S1_SAR_GRD (sar)
- landsat 8, landsat 9, landsat -> LANDSAT_C2L2 (optical)
- sentinel-5p, air quality, no2 -> S5P_L2 (air_quality)
- era5, reanalysis -> ERA5_REANALYSIS (climate)
- dem, elevation, srtm, height -> COP-DEM_GLO-30 (dem)
- land cover, landcover, lulc -> ESA_WORLDCOVER (land_cover)
- modis -> MODIS_MOD09GA (optical)

Time mappings:
- "last week" -> past 7 days from today
- "last month" -> past 30 days from today
- "last N days" -> past N days from today
- "yesterday" -> yesterday's date
- "January 2024" -> 2024-01-01 to 2024-01-31
- "2024" -> 2024-01-01 to 2024-12-31

Cloud cover:
- "less than 20% clouds" -> 20
- "clear skies" -> 10
- "mostly clear" -> 20

Return ONLY valid JSON, no explanation."#,
        query
    )
}

/// First balanced `{...}` span, ignoring braces inside JSON strings
pub fn extract_json_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, c) in text[start..].char_indices() {
        if in_string {
            match c {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match c {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&text[start..=start + offset]);
                }
            }
            _ => {}
        }
    }
    None
}

pub fn parse_extraction_response(response: &str) -> Result<ExtractedEntities> {
    let json_str = extract_json_object(response).ok_or_else(|| {
        GeoResolveError::SchemaViolation("no JSON object in LLM reply".to_string())
    })?;

    let value: Value = serde_json::from_str(json_str)
        .map_err(|e| GeoResolveError::SchemaViolation(format!("invalid JSON: {}", e)))?;

    let Value::Object(obj) = value else {
        return Err(GeoResolveError::SchemaViolation(
            "reply is not a JSON object".to_string(),
        ));
    };

    if !SCHEMA_KEYS.iter().any(|key| obj.contains_key(*key)) {
        return Err(GeoResolveError::SchemaViolation(
            "reply has none of the expected keys".to_string(),
        ));
    }

    let data_type = match optional_str(&obj, "data_type")? {
        Some(raw) => match raw.parse::<DataType>() {
            Ok(data_type) => Some(data_type),
            Err(_) => {
                tracing::debug!("Ignoring unknown data_type from LLM: {}", raw);
                None
            }
        },
        None => None,
    };

    let bbox = match obj.get("bbox") {
        None | Some(Value::Null) => None,
        Some(Value::Array(items)) => {
            let coords: Vec<f64> = items.iter().filter_map(Value::as_f64).collect();
            if coords.len() != 4 || items.len() != 4 {
                return Err(GeoResolveError::SchemaViolation(
                    "bbox must be four numbers".to_string(),
                ));
            }
            Some(BoundingBox::from_slice(&coords).map_err(as_schema)?)
        }
        Some(other) => {
            return Err(GeoResolveError::SchemaViolation(format!(
                "bbox must be an array, got {}",
                other
            )))
        }
    };

    let start_date = optional_str(&obj, "start_date")?
        .map(parse_iso_date)
        .transpose()
        .map_err(as_schema)?;
    let end_date = optional_str(&obj, "end_date")?
        .map(parse_iso_date)
        .transpose()
        .map_err(as_schema)?;
    if let (Some(start), Some(end)) = (start_date, end_date) {
        if start > end {
            return Err(GeoResolveError::SchemaViolation(format!(
                "start_date {} is after end_date {}",
                start, end
            )));
        }
    }

    let cloud_cover_max = match obj.get("cloud_cover_max") {
        None | Some(Value::Null) => None,
        Some(Value::Number(n)) => {
            let value = n.as_f64().ok_or_else(|| {
                GeoResolveError::SchemaViolation("cloud_cover_max is not a number".to_string())
            })?;
            Some(validate_cloud_cover(value).map_err(as_schema)?)
        }
        Some(other) => {
            return Err(GeoResolveError::SchemaViolation(format!(
                "cloud_cover_max must be a number, got {}",
                other
            )))
        }
    };

    Ok(ExtractedEntities {
        product: optional_str(&obj, "product")?.map(str::to_string),
        data_type,
        provider: optional_str(&obj, "provider")?.map(str::to_string),
        location: optional_str(&obj, "location")?.map(str::to_string),
        bbox,
        geometry: None,
        start_date,
        end_date,
        cloud_cover_max,
        product_defaulted: false,
        dates_defaulted: false,
    })
}

/// String field that may be absent, null, empty or the literal "null"
fn optional_str<'a>(obj: &'a Map<String, Value>, key: &str) -> Result<Option<&'a str>> {
    match obj.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => {
            let s = s.trim();
            if s.is_empty() || s.eq_ignore_ascii_case("null") {
                Ok(None)
            } else {
                Ok(Some(s))
            }
        }
        Some(other) => Err(GeoResolveError::SchemaViolation(format!(
            "{} must be a string, got {}",
            key, other
        ))),
    }
}

fn as_schema(err: GeoResolveError) -> GeoResolveError {
    GeoResolveError::SchemaViolation(err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LLMProviderKind;
    use async_trait::async_trait;
    use chrono::NaiveDate;

    struct CannedBackend(String);

    #[async_trait]
    impl LLMBackend for CannedBackend {
        async fn complete(&self, _prompt: &str) -> Result<String> {
            Ok(self.0.clone())
        }

        fn model_name(&self) -> &str {
            "canned"
        }

        fn provider(&self) -> LLMProviderKind {
            LLMProviderKind::Ollama
        }
    }

    #[test]
    fn test_prompt_embeds_query_and_schema() {
        let prompt = build_extraction_prompt("DEM of Nepal");
        assert!(prompt.contains("Query: \"DEM of Nepal\""));
        for key in SCHEMA_KEYS {
            assert!(prompt.contains(&format!("\"{}\"", key)), "missing {}", key);
        }
        assert!(prompt.contains("COP-DEM_GLO-30"));
    }

    #[test]
    fn test_extract_json_object_with_prose() {
        let reply = "Sure! Here it is:\n```json\n{\"product\": \"S2_MSI_L2A\"}\n```\nHope that helps {ok}";
        assert_eq!(extract_json_object(reply), Some("{\"product\": \"S2_MSI_L2A\"}"));
    }

    #[test]
    fn test_extract_json_object_nested_and_strings() {
        let reply = r#"{"location": "a } b", "meta": {"x": "\"{"}} trailing"#;
        assert_eq!(
            extract_json_object(reply),
            Some(r#"{"location": "a } b", "meta": {"x": "\"{"}}"#)
        );
    }

    #[test]
    fn test_extract_json_object_unbalanced() {
        assert_eq!(extract_json_object("no json here"), None);
        assert_eq!(extract_json_object("{\"product\": \"x\""), None);
    }

    #[test]
    fn test_parse_full_reply() {
        let reply = r#"{"product": "LANDSAT_C2L2", "data_type": "optical", "location": "Rome",
            "bbox": [12.3, 41.8, 12.6, 42.0], "start_date": "2023-06-01", "end_date": "2023-06-30",
            "cloud_cover_max": 15, "provider": null}"#;
        let entities = parse_extraction_response(reply).unwrap();

        assert_eq!(entities.product.as_deref(), Some("LANDSAT_C2L2"));
        assert_eq!(entities.data_type, Some(DataType::Optical));
        assert_eq!(entities.location.as_deref(), Some("Rome"));
        assert_eq!(entities.bbox.unwrap().as_array(), [12.3, 41.8, 12.6, 42.0]);
        assert_eq!(entities.start_date, NaiveDate::from_ymd_opt(2023, 6, 1));
        assert_eq!(entities.end_date, NaiveDate::from_ymd_opt(2023, 6, 30));
        assert_eq!(entities.cloud_cover_max, Some(15.0));
        assert!(entities.provider.is_none());
    }

    #[test]
    fn test_parse_null_strings_and_unknown_type() {
        let reply = r#"{"product": "null", "data_type": "hyperspectral", "location": ""}"#;
        let entities = parse_extraction_response(reply).unwrap();
        assert!(entities.product.is_none());
        assert!(entities.data_type.is_none());
        assert!(entities.location.is_none());
    }

    #[test]
    fn test_parse_schema_violations() {
        let cases = [
            "not json at all",
            "{\"foo\": 1}",
            "{\"bbox\": [1, 2, 3]}",
            "{\"bbox\": \"1,2,3,4\"}",
            "{\"bbox\": [10, 0, 5, 1]}",
            "{\"start_date\": \"last week\"}",
            "{\"start_date\": \"2024-02-01\", \"end_date\": \"2024-01-01\"}",
            "{\"cloud_cover_max\": 150}",
            "{\"cloud_cover_max\": \"20\"}",
            "{\"product\": 42}",
        ];
        for case in cases {
            assert!(
                matches!(
                    parse_extraction_response(case),
                    Err(GeoResolveError::SchemaViolation(_))
                ),
                "expected schema violation for {}",
                case
            );
        }
    }

    #[tokio::test]
    async fn test_extractor_uses_backend() {
        let backend = Arc::new(CannedBackend(
            "Here you go: {\"product\": \"S1_SAR_GRD\", \"data_type\": \"sar\", \"location\": \"Dhaka\"}"
                .to_string(),
        ));
        let extractor = LLMExtractor::new(backend);
        let entities = extractor.extract("radar over Dhaka").await.unwrap();

        assert_eq!(entities.product.as_deref(), Some("S1_SAR_GRD"));
        assert_eq!(entities.data_type, Some(DataType::Sar));
        assert_eq!(entities.location.as_deref(), Some("Dhaka"));
    }
}

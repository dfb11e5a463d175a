//! Natural-language query resolution
//!
//! Runs the configured tiers in order (LLM first when available, regex as
//! the floor), geocodes the resolved place name when no area came out of
//! the text, and finally merges caller overrides.

mod clock;
mod strategy;

pub use clock::{Clock, FixedClock, SystemClock};
pub use strategy::{FailureKind, TextToRequestStrategy, TierFailure};

use crate::config::{Config, ResolverConfig};
use crate::error::Result;
use crate::extract::ExtractedEntities;
use crate::geocode::Geocoder;
use crate::llm::{build_backend, LLMExtractor};
use crate::models::{RequestOverrides, ResolutionTier, StructuredRequest};
use std::sync::Arc;

pub struct QueryResolver {
    strategies: Vec<TextToRequestStrategy>,
    geocoder: Option<Arc<Geocoder>>,
    clock: Arc<dyn Clock>,
    default_limit: u32,
}

impl QueryResolver {
    pub fn new(
        strategies: Vec<TextToRequestStrategy>,
        geocoder: Option<Arc<Geocoder>>,
        config: &ResolverConfig,
    ) -> Self {
        Self {
            strategies,
            geocoder,
            clock: Arc::new(SystemClock),
            default_limit: config.default_limit.max(1),
        }
    }

    /// LLM tier (if configured) then regex, plus a Nominatim geocoder
    /// unless geocoding is disabled
    pub fn from_config(config: &Config) -> Result<Self> {
        let mut strategies = Vec::new();
        if let Some(ref llm) = config.llm {
            let backend = build_backend(llm)?;
            strategies.push(TextToRequestStrategy::Llm(LLMExtractor::new(backend)));
        }
        strategies.push(TextToRequestStrategy::Regex);

        let geocoder = if config.resolver.disable_geocoding {
            None
        } else {
            Some(Arc::new(Geocoder::new(&config.geocoder)?))
        };

        Ok(Self::new(strategies, geocoder, &config.resolver))
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn strategies(&self) -> &[TextToRequestStrategy] {
        &self.strategies
    }

    pub fn has_llm(&self) -> bool {
        self.strategies.iter().any(TextToRequestStrategy::is_llm)
    }

    /// Best-effort resolution; never fails
    pub async fn resolve(&self, text: &str, llm_available: bool) -> StructuredRequest {
        let mut request = self.infer(text, llm_available).await;
        self.geocode_into(&mut request, None).await;
        tracing::debug!("Resolved: {}", request.summary());
        request
    }

    /// Resolution with explicit fields merged last.
    ///
    /// Overrides are validated before any tier runs, so malformed caller
    /// input fails fast with `Validation`.
    pub async fn resolve_with_overrides(
        &self,
        text: &str,
        llm_available: bool,
        overrides: &RequestOverrides,
    ) -> Result<StructuredRequest> {
        overrides.validate()?;

        let mut request = self.infer(text, llm_available).await;

        if overrides.has_explicit_area() {
            tracing::debug!("Explicit area supplied, skipping geocoding");
        } else {
            let inferred_area = request.bbox.is_some() || request.geometry.is_some();
            if overrides.location_name.is_some() && inferred_area {
                // the inferred area belongs to a different place
                tracing::debug!("Location override supplied, dropping inferred area");
                request.bbox = None;
                request.geometry = None;
            }
            self.geocode_into(&mut request, overrides.location_name.as_deref())
                .await;
        }

        overrides.apply(&mut request)?;
        tracing::debug!("Resolved with overrides: {}", request.summary());
        Ok(request)
    }

    async fn infer(&self, text: &str, llm_available: bool) -> StructuredRequest {
        let today = self.clock.today();

        for strategy in &self.strategies {
            if strategy.is_llm() && !llm_available {
                tracing::debug!("Skipping {} tier, LLM unavailable", strategy.name());
                continue;
            }

            tracing::debug!("Trying {} tier", strategy.name());
            match strategy.attempt(text, today).await {
                Ok(entities) => {
                    tracing::info!("Query resolved by {} tier", strategy.name());
                    return self.build_request(entities, strategy.tier());
                }
                Err(failure) => {
                    tracing::warn!("{}, falling back", failure);
                }
            }
        }

        tracing::warn!("Every resolution tier failed for query: {}", text);
        StructuredRequest::empty(self.default_limit)
    }

    fn build_request(&self, entities: ExtractedEntities, tier: ResolutionTier) -> StructuredRequest {
        StructuredRequest {
            product: entities.product,
            data_type: entities.data_type,
            provider: entities.provider,
            geometry: entities.geometry,
            bbox: entities.bbox,
            location_name: entities.location,
            start_date: entities.start_date,
            end_date: entities.end_date,
            cloud_cover_max: entities.cloud_cover_max,
            limit: self.default_limit,
            resolved_by: Some(tier),
            product_defaulted: entities.product_defaulted,
            dates_defaulted: entities.dates_defaulted,
        }
    }

    /// Fill geometry/bbox from the place name when the text gave no area.
    /// An explicit location override replaces the inferred one.
    async fn geocode_into(&self, request: &mut StructuredRequest, location_override: Option<&str>) {
        let Some(ref geocoder) = self.geocoder else {
            return;
        };

        let place = match location_override {
            Some(place) => place,
            None if request.geometry.is_some() || request.bbox.is_some() => return,
            None => match request.location_name.as_deref() {
                Some(place) => place,
                None => return,
            },
        };

        match geocoder.geocode(place).await {
            Some(result) => {
                request.bbox = result.bbox;
                request.geometry = Some(result.geometry);
            }
            None => tracing::warn!("Could not geocode '{}', leaving area unset", place),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LLMProviderKind;
    use crate::error::GeoResolveError;
    use crate::geocode::GeocodingTransport;
    use crate::llm::LLMBackend;
    use crate::models::DataType;
    use async_trait::async_trait;
    use chrono::NaiveDate;
    use proptest::prelude::*;
    use serde_json::{json, Value};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    enum Reply {
        Text(&'static str),
        Down,
    }

    struct MockBackend {
        reply: Reply,
        calls: AtomicUsize,
    }

    impl MockBackend {
        fn new(reply: Reply) -> Arc<Self> {
            Arc::new(Self {
                reply,
                calls: AtomicUsize::new(0),
            })
        }
    }

    #[async_trait]
    impl LLMBackend for MockBackend {
        async fn complete(&self, _prompt: &str) -> Result<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match self.reply {
                Reply::Text(text) => Ok(text.to_string()),
                Reply::Down => Err(GeoResolveError::ExternalError("connection refused".into())),
            }
        }

        fn model_name(&self) -> &str {
            "mock"
        }

        fn provider(&self) -> LLMProviderKind {
            LLMProviderKind::OpenAi
        }
    }

    struct PlaceTransport {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl GeocodingTransport for PlaceTransport {
        async fn search(&self, query: &str) -> Result<Value> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if query == "Atlantis" {
                return Ok(json!([]));
            }
            Ok(json!([{
                "lat": "48.85",
                "lon": "2.35",
                "display_name": query,
                "boundingbox": ["48.81", "48.90", "2.25", "2.42"]
            }]))
        }

        async fn reverse(&self, _lat: f64, _lon: f64) -> Result<Value> {
            Ok(json!({}))
        }
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 15).unwrap()
    }

    fn resolver(
        llm: Option<Arc<MockBackend>>,
        geocode: bool,
    ) -> (QueryResolver, Arc<PlaceTransport>) {
        let mut strategies = Vec::new();
        if let Some(backend) = llm {
            strategies.push(TextToRequestStrategy::Llm(LLMExtractor::new(backend)));
        }
        strategies.push(TextToRequestStrategy::Regex);

        let transport = Arc::new(PlaceTransport {
            calls: AtomicUsize::new(0),
        });
        let geocoder = geocode
            .then(|| Arc::new(Geocoder::with_transport(transport.clone(), Duration::ZERO)));

        let resolver = QueryResolver::new(strategies, geocoder, &ResolverConfig::default())
            .with_clock(Arc::new(FixedClock(today())));
        (resolver, transport)
    }

    #[tokio::test]
    async fn test_regex_only_resolution() {
        let (resolver, _) = resolver(None, false);
        let request = resolver
            .resolve(
                "Sentinel-2 images of Paris from January 2024 with less than 20% cloud cover",
                true,
            )
            .await;

        assert_eq!(request.resolved_by, Some(ResolutionTier::Regex));
        assert_eq!(request.product.as_deref(), Some("S2_MSI_L2A"));
        assert_eq!(request.location_name.as_deref(), Some("Paris"));
        assert_eq!(request.start_date, NaiveDate::from_ymd_opt(2024, 1, 1));
        assert_eq!(request.end_date, NaiveDate::from_ymd_opt(2024, 1, 31));
        assert_eq!(request.cloud_cover_max, Some(20.0));
        assert_eq!(request.limit, 10);
        assert!(request.bbox.is_none());
    }

    #[tokio::test]
    async fn test_llm_reply_wrapped_in_prose() {
        let backend = MockBackend::new(Reply::Text(
            "Here is the JSON you asked for:\n{\"product\": \"COP-DEM_GLO-30\", \"data_type\": \"dem\", \
             \"location\": \"Nepal\", \"bbox\": null, \"start_date\": null, \"end_date\": null, \
             \"cloud_cover_max\": null, \"provider\": null}\nLet me know if you need more.",
        ));
        let (resolver, _) = resolver(Some(backend.clone()), false);
        let request = resolver.resolve("elevation model of Nepal", true).await;

        assert_eq!(request.resolved_by, Some(ResolutionTier::Llm));
        assert_eq!(request.product.as_deref(), Some("COP-DEM_GLO-30"));
        assert_eq!(request.data_type, Some(DataType::Dem));
        assert_eq!(request.location_name.as_deref(), Some("Nepal"));
        assert!(request.start_date.is_none());
        assert_eq!(backend.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_llm_transport_failure_falls_back_to_regex() {
        let backend = MockBackend::new(Reply::Down);
        let (resolver, _) = resolver(Some(backend.clone()), false);
        let request = resolver.resolve("Landsat 8 data for New York last month", true).await;

        assert_eq!(backend.calls.load(Ordering::SeqCst), 1);
        assert_eq!(request.resolved_by, Some(ResolutionTier::Regex));
        assert_eq!(request.product.as_deref(), Some("LANDSAT_C2L2"));
        assert_eq!(request.location_name.as_deref(), Some("New York"));
        assert_eq!(request.start_date, NaiveDate::from_ymd_opt(2024, 5, 16));
        assert_eq!(request.end_date, Some(today()));
    }

    #[tokio::test]
    async fn test_llm_schema_violation_falls_back_to_regex() {
        let backend = MockBackend::new(Reply::Text("I could not understand the request."));
        let (resolver, _) = resolver(Some(backend), false);
        let request = resolver.resolve("SAR over Dhaka", true).await;

        assert_eq!(request.resolved_by, Some(ResolutionTier::Regex));
        assert_eq!(request.product.as_deref(), Some("S1_SAR_GRD"));
    }

    #[tokio::test]
    async fn test_llm_skipped_when_unavailable() {
        let backend = MockBackend::new(Reply::Text("{\"product\": \"X\"}"));
        let (resolver, _) = resolver(Some(backend.clone()), false);
        let request = resolver.resolve("Sentinel-2 Paris", false).await;

        assert_eq!(backend.calls.load(Ordering::SeqCst), 0);
        assert_eq!(request.resolved_by, Some(ResolutionTier::Regex));
    }

    #[tokio::test]
    async fn test_total_failure_returns_empty_request() {
        let backend = MockBackend::new(Reply::Down);
        let resolver = QueryResolver::new(
            vec![TextToRequestStrategy::Llm(LLMExtractor::new(backend))],
            None,
            &ResolverConfig::default(),
        );
        let request = resolver.resolve("anything", true).await;

        assert_eq!(request, StructuredRequest::empty(10));
        assert!(request.is_low_confidence());
    }

    #[tokio::test]
    async fn test_geocodes_resolved_location() {
        let (resolver, transport) = resolver(None, true);
        let request = resolver.resolve("images of Paris last week", true).await;

        assert_eq!(transport.calls.load(Ordering::SeqCst), 1);
        assert_eq!(request.bbox.unwrap().as_array(), [2.25, 48.81, 2.42, 48.90]);
        assert_eq!(request.geometry.unwrap().geometry_type(), Some("Point"));
    }

    #[tokio::test]
    async fn test_geocoding_failure_leaves_area_unset() {
        let (resolver, _) = resolver(None, true);
        let request = resolver.resolve("images of Atlantis", true).await;

        assert_eq!(request.location_name.as_deref(), Some("Atlantis"));
        assert!(request.bbox.is_none());
        assert!(request.geometry.is_none());
    }

    #[tokio::test]
    async fn test_llm_bbox_skips_geocoding() {
        let backend = MockBackend::new(Reply::Text(
            "{\"location\": \"Rome\", \"bbox\": [12.3, 41.8, 12.6, 42.0]}",
        ));
        let (resolver, transport) = resolver(Some(backend), true);
        let request = resolver.resolve("Rome", true).await;

        assert_eq!(transport.calls.load(Ordering::SeqCst), 0);
        assert_eq!(request.bbox.unwrap().as_array(), [12.3, 41.8, 12.6, 42.0]);
    }

    #[tokio::test]
    async fn test_override_product_wins() {
        let (resolver, _) = resolver(None, false);
        let overrides = RequestOverrides {
            product: Some("LANDSAT_C2L2".to_string()),
            ..Default::default()
        };
        let request = resolver
            .resolve_with_overrides("Sentinel-2 Paris", true, &overrides)
            .await
            .unwrap();

        assert_eq!(request.product.as_deref(), Some("LANDSAT_C2L2"));
    }

    #[tokio::test]
    async fn test_geometry_override_suppresses_geocoding() {
        let (resolver, transport) = resolver(None, true);
        let overrides = RequestOverrides {
            geometry: Some(json!({"type": "Point", "coordinates": [1.0, 2.0]})),
            ..Default::default()
        };
        let request = resolver
            .resolve_with_overrides("images of Paris", true, &overrides)
            .await
            .unwrap();

        assert_eq!(transport.calls.load(Ordering::SeqCst), 0);
        assert_eq!(request.geometry.unwrap().geometry_type(), Some("Point"));
        assert!(request.bbox.is_none());
    }

    #[tokio::test]
    async fn test_location_override_is_geocoded() {
        let (resolver, transport) = resolver(None, true);
        let overrides = RequestOverrides {
            location_name: Some("Lisbon".to_string()),
            ..Default::default()
        };
        let request = resolver
            .resolve_with_overrides("images of Paris", true, &overrides)
            .await
            .unwrap();

        assert_eq!(transport.calls.load(Ordering::SeqCst), 1);
        assert_eq!(request.location_name.as_deref(), Some("Lisbon"));
        assert!(request.bbox.is_some());
    }

    #[tokio::test]
    async fn test_location_override_drops_inferred_area() {
        let llm = MockBackend::new(Reply::Text(
            "{\"location\": \"Rome\", \"bbox\": [12.3, 41.8, 12.6, 42.0]}",
        ));
        let overrides = RequestOverrides {
            location_name: Some("Atlantis".to_string()),
            ..Default::default()
        };

        let (with_geocoder, transport) = resolver(Some(llm.clone()), true);
        let request = with_geocoder
            .resolve_with_overrides("imagery of Rome", true, &overrides)
            .await
            .unwrap();
        assert_eq!(transport.calls.load(Ordering::SeqCst), 1);
        assert_eq!(request.location_name.as_deref(), Some("Atlantis"));
        assert!(request.bbox.is_none());
        assert!(request.geometry.is_none());

        let (offline, _) = resolver(Some(llm), false);
        let request = offline
            .resolve_with_overrides("imagery of Rome", true, &overrides)
            .await
            .unwrap();
        assert_eq!(request.location_name.as_deref(), Some("Atlantis"));
        assert!(request.bbox.is_none());
    }

    #[tokio::test]
    async fn test_malformed_overrides_rejected() {
        let (resolver, _) = resolver(None, false);

        let bad_bbox = RequestOverrides {
            bbox: Some(vec![1.0, 2.0, 3.0]),
            ..Default::default()
        };
        let err = resolver
            .resolve_with_overrides("Paris", true, &bad_bbox)
            .await
            .unwrap_err();
        assert!(matches!(err, GeoResolveError::Validation(_)));

        let bad_cloud = RequestOverrides {
            cloud_cover_max: Some(120.0),
            ..Default::default()
        };
        assert!(resolver
            .resolve_with_overrides("Paris", true, &bad_cloud)
            .await
            .is_err());
    }

    proptest! {
        #[test]
        fn prop_resolve_always_has_positive_limit(text in "\\PC{0,80}") {
            let runtime = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
                .unwrap();
            let (resolver, _) = resolver(None, false);
            let request = runtime.block_on(resolver.resolve(&text, true));

            prop_assert!(request.limit >= 1);
            if let (Some(start), Some(end)) = (request.start_date, request.end_date) {
                prop_assert!(start <= end);
            }
            if let Some(cloud) = request.cloud_cover_max {
                prop_assert!((0.0..=100.0).contains(&cloud));
            }
        }
    }
}

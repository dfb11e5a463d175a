//! Georesolve Core Library
//!
//! Turns free-text geospatial data requests into structured search queries
//! and ranks a static catalog of datasets and analysis workflows against an
//! analysis description.
//!
//! # Features
//! - Tiered query resolution: LLM extraction with a regex fallback
//! - Rate-limited geocoding against Nominatim
//! - Weighted keyword/use-case/index catalog matching
//! - Pluggable LLM backends (OpenAI-compatible, Ollama)

pub mod catalog;
pub mod config;
pub mod error;
pub mod extract;
pub mod geocode;
pub mod llm;
pub mod models;
pub mod resolver;

pub use catalog::{
    recommend, recommend_datasets, recommend_with_fallback, recommend_workflow, AnalysisCategory,
    AnalysisWorkflow, DataCategory, DataSource, DatasetRecommendation, Scorable, ScoredMatch,
    SpectralIndex, WorkflowRecommendation, DEFAULT_TOP_N,
};
pub use config::{Config, GeocoderConfig, LLMProviderKind, LLMServiceConfig, ResolverConfig};
pub use error::{Error, GeoResolveError, Result};
pub use extract::ExtractedEntities;
pub use geocode::{
    GeocodeResult, Geocoder, GeocodingTransport, NominatimTransport, ReverseGeocodeResult,
};
pub use llm::{build_backend, LLMBackend, LLMExtractor, OllamaBackend, OpenAICompatibleBackend};
pub use models::{
    BoundingBox, DataType, Geometry, RequestOverrides, ResolutionTier, StructuredRequest,
};
pub use resolver::{
    Clock, FailureKind, FixedClock, QueryResolver, SystemClock, TextToRequestStrategy, TierFailure,
};

/// Default config directory name
pub const CONFIG_DIR_NAME: &str = "georesolve";

/// User agent sent to external services
pub const USER_AGENT: &str = concat!("georesolve/", env!("CARGO_PKG_VERSION"));

//! Request models

mod overrides;
mod request;

pub use overrides::{parse_iso_date, RequestOverrides};
pub use request::{
    validate_cloud_cover, BoundingBox, DataType, Geometry, ResolutionTier, StructuredRequest,
    DEFAULT_LIMIT,
};

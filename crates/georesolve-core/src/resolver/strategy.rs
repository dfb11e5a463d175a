//! Resolution tiers

use crate::error::GeoResolveError;
use crate::extract::{extract_all, ExtractedEntities};
use crate::llm::LLMExtractor;
use crate::models::ResolutionTier;
use chrono::NaiveDate;
use std::fmt;

/// Why a tier gave up
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// Network, timeout or non-success HTTP status
    Transport,
    /// Reply was not a usable JSON object
    Schema,
}

#[derive(Debug, Clone)]
pub struct TierFailure {
    pub tier: ResolutionTier,
    pub kind: FailureKind,
    pub message: String,
}

impl TierFailure {
    pub fn from_error(tier: ResolutionTier, err: &GeoResolveError) -> Self {
        let kind = if err.is_transport() {
            FailureKind::Transport
        } else {
            FailureKind::Schema
        };
        Self {
            tier,
            kind,
            message: err.to_string(),
        }
    }
}

impl fmt::Display for TierFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match self.kind {
            FailureKind::Transport => "transport",
            FailureKind::Schema => "schema",
        };
        write!(f, "{} tier failed ({}): {}", self.tier.as_str(), kind, self.message)
    }
}

/// One way of turning text into entities, tried in order by the resolver
#[derive(Clone)]
pub enum TextToRequestStrategy {
    Llm(LLMExtractor),
    Regex,
}

impl TextToRequestStrategy {
    pub fn tier(&self) -> ResolutionTier {
        match self {
            Self::Llm(_) => ResolutionTier::Llm,
            Self::Regex => ResolutionTier::Regex,
        }
    }

    pub fn name(&self) -> &'static str {
        self.tier().as_str()
    }

    pub fn is_llm(&self) -> bool {
        matches!(self, Self::Llm(_))
    }

    pub async fn attempt(
        &self,
        text: &str,
        today: NaiveDate,
    ) -> std::result::Result<ExtractedEntities, TierFailure> {
        match self {
            Self::Llm(extractor) => extractor
                .extract(text)
                .await
                .map_err(|e| TierFailure::from_error(self.tier(), &e)),
            Self::Regex => Ok(extract_all(text, today)),
        }
    }
}

impl fmt::Debug for TextToRequestStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Llm(extractor) => f
                .debug_tuple("Llm")
                .field(&extractor.backend().model_name())
                .finish(),
            Self::Regex => f.write_str("Regex"),
        }
    }
}

//! LLM trait definitions

use crate::config::LLMProviderKind;
use crate::error::Result;
use async_trait::async_trait;

/// Text completion backend used by the extraction tier
#[async_trait]
pub trait LLMBackend: Send + Sync {
    /// Complete a single free-text prompt
    async fn complete(&self, prompt: &str) -> Result<String>;

    /// Get model name
    fn model_name(&self) -> &str;

    /// Which provider this backend talks to
    fn provider(&self) -> LLMProviderKind;
}

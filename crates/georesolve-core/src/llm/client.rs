//! HTTP clients for external LLM services (Groq, OpenRouter, vLLM, Ollama)

use super::cache::{completion_cache_key, CompletionCache};
use super::LLMBackend;
use crate::config::{LLMProviderKind, LLMServiceConfig};
use crate::error::{GeoResolveError, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

const OPENROUTER_REFERER: &str = "https://github.com/georesolve/georesolve";
const OPENROUTER_TITLE: &str = "georesolve";
const MAX_TOKENS: u32 = 500;

/// Build the backend named by the configuration
pub fn build_backend(config: &LLMServiceConfig) -> Result<Arc<dyn LLMBackend>> {
    config.validate()?;

    let backend: Arc<dyn LLMBackend> = match config.provider {
        LLMProviderKind::Ollama => Arc::new(OllamaBackend::new(config.clone())?),
        LLMProviderKind::Groq | LLMProviderKind::OpenRouter | LLMProviderKind::OpenAi => {
            Arc::new(OpenAICompatibleBackend::new(config.clone())?)
        }
    };

    tracing::debug!(
        "LLM backend: {} ({}) at {}",
        backend.provider(),
        backend.model_name(),
        config.url
    );

    Ok(backend)
}

fn http_client(timeout_secs: u64) -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .user_agent(crate::USER_AGENT)
        .build()
        .map_err(GeoResolveError::Http)
}

async fn error_for_status(response: reqwest::Response, service: &str) -> Result<reqwest::Response> {
    if response.status().is_success() {
        return Ok(response);
    }
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    Err(GeoResolveError::ExternalError(format!(
        "{} error (HTTP {}): {}",
        service, status, body
    )))
}

/// Chat message for completion requests
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

/// Client for any `/chat/completions` endpoint with bearer auth
pub struct OpenAICompatibleBackend {
    http_client: reqwest::Client,
    config: LLMServiceConfig,
    cache: CompletionCache,
}

impl OpenAICompatibleBackend {
    pub fn new(config: LLMServiceConfig) -> Result<Self> {
        let http_client = http_client(config.timeout_secs)?;
        Ok(Self {
            http_client,
            config,
            cache: CompletionCache::new(),
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.config.url.trim_end_matches('/'))
    }
}

#[async_trait]
impl LLMBackend for OpenAICompatibleBackend {
    async fn complete(&self, prompt: &str) -> Result<String> {
        let cache_key = completion_cache_key(&self.config.model, prompt);
        if let Some(cached) = self.cache.get(&cache_key) {
            tracing::debug!("Cache hit for completion");
            return Ok(cached);
        }

        #[derive(Serialize)]
        struct ChatRequest<'a> {
            model: &'a str,
            messages: Vec<ChatMessage>,
            temperature: f32,
            max_tokens: u32,
        }

        #[derive(Deserialize)]
        struct ChatResponse {
            choices: Vec<ChatChoice>,
        }

        #[derive(Deserialize)]
        struct ChatChoice {
            message: ChatMessage,
        }

        let request = ChatRequest {
            model: &self.config.model,
            messages: vec![ChatMessage::user(prompt)],
            temperature: 0.0,
            max_tokens: MAX_TOKENS,
        };

        let mut req = self.http_client.post(self.endpoint()).json(&request);

        if let Some(ref api_key) = self.config.api_key {
            req = req.bearer_auth(api_key);
        }
        if self.config.provider == LLMProviderKind::OpenRouter {
            req = req
                .header("HTTP-Referer", OPENROUTER_REFERER)
                .header("X-Title", OPENROUTER_TITLE);
        }

        let response = req.send().await?;
        let response = error_for_status(response, self.config.provider.as_str()).await?;
        let chat_response: ChatResponse = response.json().await?;

        let content = chat_response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| GeoResolveError::Llm("No response from LLM".to_string()))?
            .message
            .content;

        self.cache.set(cache_key, content.clone());
        Ok(content)
    }

    fn model_name(&self) -> &str {
        &self.config.model
    }

    fn provider(&self) -> LLMProviderKind {
        self.config.provider
    }
}

/// Client for a local Ollama daemon (`/api/generate`)
pub struct OllamaBackend {
    http_client: reqwest::Client,
    config: LLMServiceConfig,
    cache: CompletionCache,
}

impl OllamaBackend {
    pub fn new(config: LLMServiceConfig) -> Result<Self> {
        let http_client = http_client(config.timeout_secs)?;
        Ok(Self {
            http_client,
            config,
            cache: CompletionCache::new(),
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/api/generate", self.config.url.trim_end_matches('/'))
    }
}

#[async_trait]
impl LLMBackend for OllamaBackend {
    async fn complete(&self, prompt: &str) -> Result<String> {
        let cache_key = completion_cache_key(&self.config.model, prompt);
        if let Some(cached) = self.cache.get(&cache_key) {
            tracing::debug!("Cache hit for completion");
            return Ok(cached);
        }

        #[derive(Serialize)]
        struct GenerateRequest<'a> {
            model: &'a str,
            prompt: &'a str,
            stream: bool,
            options: GenerateOptions,
        }

        #[derive(Serialize)]
        struct GenerateOptions {
            temperature: f32,
        }

        #[derive(Deserialize)]
        struct GenerateResponse {
            response: String,
        }

        let request = GenerateRequest {
            model: &self.config.model,
            prompt,
            stream: false,
            options: GenerateOptions { temperature: 0.0 },
        };

        let response = self
            .http_client
            .post(self.endpoint())
            .json(&request)
            .send()
            .await?;
        let response = error_for_status(response, "ollama").await?;
        let generated: GenerateResponse = response.json().await?;

        self.cache.set(cache_key, generated.response.clone());
        Ok(generated.response)
    }

    fn model_name(&self) -> &str {
        &self.config.model
    }

    fn provider(&self) -> LLMProviderKind {
        LLMProviderKind::Ollama
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(provider: LLMProviderKind) -> LLMServiceConfig {
        LLMServiceConfig {
            api_key: Some("test-key".to_string()),
            url: "http://localhost:9/v1/".to_string(),
            ..LLMServiceConfig::for_provider(provider)
        }
    }

    #[test]
    fn test_build_backend_selects_by_provider() {
        let ollama = build_backend(&config(LLMProviderKind::Ollama)).unwrap();
        assert_eq!(ollama.provider(), LLMProviderKind::Ollama);
        assert_eq!(ollama.model_name(), "llama3");

        let groq = build_backend(&config(LLMProviderKind::Groq)).unwrap();
        assert_eq!(groq.provider(), LLMProviderKind::Groq);
        assert_eq!(groq.model_name(), "llama-3.1-8b-instant");
    }

    #[test]
    fn test_build_backend_rejects_missing_key() {
        let mut cfg = config(LLMProviderKind::OpenRouter);
        cfg.api_key = None;
        assert!(matches!(build_backend(&cfg), Err(GeoResolveError::Config(_))));
    }

    #[test]
    fn test_endpoints_strip_trailing_slash() {
        let backend = OpenAICompatibleBackend::new(config(LLMProviderKind::OpenAi)).unwrap();
        assert_eq!(backend.endpoint(), "http://localhost:9/v1/chat/completions");

        let mut cfg = config(LLMProviderKind::Ollama);
        cfg.url = "http://localhost:11434/".to_string();
        let backend = OllamaBackend::new(cfg).unwrap();
        assert_eq!(backend.endpoint(), "http://localhost:11434/api/generate");
    }

    #[tokio::test]
    async fn test_unreachable_backend_is_transport_error() {
        let mut cfg = config(LLMProviderKind::OpenAi);
        cfg.url = "http://127.0.0.1:9".to_string();
        cfg.timeout_secs = 2;
        let backend = OpenAICompatibleBackend::new(cfg).unwrap();

        let err = backend.complete("hello").await.unwrap_err();
        assert!(err.is_transport(), "unexpected error: {}", err);
    }
}

//! Configuration management

use crate::error::{GeoResolveError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// LLM backend for the extraction tier; None means regex only.
    /// A file without an `llm` key falls back to `GEORESOLVE_LLM_*`,
    /// while an explicit `llm: null` disables the tier.
    #[serde(
        default = "LLMServiceConfig::from_env",
        skip_serializing_if = "Option::is_none"
    )]
    pub llm: Option<LLMServiceConfig>,

    /// Geocoding service configuration
    #[serde(default)]
    pub geocoder: GeocoderConfig,

    /// Resolver defaults
    #[serde(default)]
    pub resolver: ResolverConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            llm: LLMServiceConfig::from_env(),
            geocoder: GeocoderConfig::default(),
            resolver: ResolverConfig::default(),
        }
    }
}

/// Supported LLM backends
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LLMProviderKind {
    /// Groq cloud API (OpenAI-compatible)
    Groq,
    /// OpenRouter (OpenAI-compatible, extra attribution headers)
    OpenRouter,
    /// Any OpenAI-compatible endpoint (vLLM, OpenAI, LM Studio)
    OpenAi,
    /// Local Ollama daemon
    Ollama,
}

impl LLMProviderKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            LLMProviderKind::Groq => "groq",
            LLMProviderKind::OpenRouter => "openrouter",
            LLMProviderKind::OpenAi => "openai",
            LLMProviderKind::Ollama => "ollama",
        }
    }

    fn default_url(&self) -> &'static str {
        match self {
            LLMProviderKind::Groq => "https://api.groq.com/openai/v1",
            LLMProviderKind::OpenRouter => "https://openrouter.ai/api/v1",
            LLMProviderKind::OpenAi => "http://localhost:8000/v1",
            LLMProviderKind::Ollama => "http://localhost:11434",
        }
    }

    fn default_model(&self) -> &'static str {
        match self {
            LLMProviderKind::Groq => "llama-3.1-8b-instant",
            LLMProviderKind::OpenRouter => "meta-llama/llama-3.1-8b-instruct:free",
            LLMProviderKind::OpenAi => "meta-llama/Llama-3.1-8B-Instruct",
            LLMProviderKind::Ollama => "llama3",
        }
    }

    fn default_timeout(&self) -> u64 {
        match self {
            LLMProviderKind::Ollama => 60,
            _ => 30,
        }
    }

    /// Provider-specific environment variable holding the API key
    fn api_key_env(&self) -> Option<&'static str> {
        match self {
            LLMProviderKind::Groq => Some("GROQ_API_KEY"),
            LLMProviderKind::OpenRouter => Some("OPENROUTER_API_KEY"),
            LLMProviderKind::OpenAi => Some("OPENAI_API_KEY"),
            LLMProviderKind::Ollama => None,
        }
    }

    pub fn requires_api_key(&self) -> bool {
        matches!(self, LLMProviderKind::Groq | LLMProviderKind::OpenRouter)
    }
}

impl fmt::Display for LLMProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LLMProviderKind {
    type Err = GeoResolveError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "groq" => Ok(LLMProviderKind::Groq),
            "openrouter" => Ok(LLMProviderKind::OpenRouter),
            "openai" | "vllm" => Ok(LLMProviderKind::OpenAi),
            "ollama" => Ok(LLMProviderKind::Ollama),
            other => Err(GeoResolveError::Config(format!(
                "unknown LLM provider '{}' (expected groq, openrouter, openai, ollama)",
                other
            ))),
        }
    }
}

/// LLM service configuration for the extraction tier
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LLMServiceConfig {
    pub provider: LLMProviderKind,

    /// Base URL of the service (without the endpoint path)
    pub url: String,

    /// Model name for completions
    pub model: String,

    /// API key (optional, for authenticated services)
    #[serde(default)]
    pub api_key: Option<String>,

    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl LLMServiceConfig {
    /// Defaults for a provider, taking the API key from its usual variable
    pub fn for_provider(provider: LLMProviderKind) -> Self {
        let api_key = std::env::var("GEORESOLVE_LLM_API_KEY").ok().or_else(|| {
            provider
                .api_key_env()
                .and_then(|name| std::env::var(name).ok())
        });

        Self {
            provider,
            url: provider.default_url().to_string(),
            model: provider.default_model().to_string(),
            api_key,
            timeout_secs: provider.default_timeout(),
        }
    }

    /// Read `GEORESOLVE_LLM_*` variables; None when no provider is named
    pub fn from_env() -> Option<Self> {
        let provider: LLMProviderKind = std::env::var("GEORESOLVE_LLM_PROVIDER")
            .ok()?
            .parse()
            .map_err(|e| tracing::warn!("Ignoring GEORESOLVE_LLM_PROVIDER: {}", e))
            .ok()?;

        let mut config = Self::for_provider(provider);
        if let Ok(url) = std::env::var("GEORESOLVE_LLM_URL") {
            config.url = url;
        }
        if let Ok(model) = std::env::var("GEORESOLVE_LLM_MODEL") {
            config.model = model;
        }
        Some(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.url.trim().is_empty() {
            return Err(GeoResolveError::Config("LLM url is empty".to_string()));
        }
        if self.provider.requires_api_key() && self.api_key.is_none() {
            return Err(GeoResolveError::Config(format!(
                "{} requires an API key (set {} or GEORESOLVE_LLM_API_KEY)",
                self.provider,
                self.provider.api_key_env().unwrap_or("GEORESOLVE_LLM_API_KEY")
            )));
        }
        Ok(())
    }
}

/// Geocoding service configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeocoderConfig {
    /// Nominatim base URL (the `/search` and `/reverse` paths are appended)
    #[serde(default = "default_geocoder_url")]
    pub url: String,

    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Minimum spacing between requests, in milliseconds
    #[serde(default = "default_min_interval_ms")]
    pub min_interval_ms: u64,

    #[serde(default = "default_geocoder_timeout")]
    pub timeout_secs: u64,
}

impl Default for GeocoderConfig {
    fn default() -> Self {
        Self {
            url: default_geocoder_url(),
            user_agent: default_user_agent(),
            min_interval_ms: default_min_interval_ms(),
            timeout_secs: default_geocoder_timeout(),
        }
    }
}

fn default_geocoder_url() -> String {
    std::env::var("GEORESOLVE_GEOCODER_URL")
        .unwrap_or_else(|_| "https://nominatim.openstreetmap.org".to_string())
}

fn default_user_agent() -> String {
    crate::USER_AGENT.to_string()
}

// Nominatim usage policy: at most one request per second
fn default_min_interval_ms() -> u64 {
    1000
}

fn default_geocoder_timeout() -> u64 {
    10
}

/// Resolver defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolverConfig {
    /// Result limit used when the caller does not supply one
    #[serde(default = "default_limit")]
    pub default_limit: u32,

    /// Skip the geocoding step entirely
    #[serde(default)]
    pub disable_geocoding: bool,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            default_limit: default_limit(),
            disable_geocoding: false,
        }
    }
}

fn default_limit() -> u32 {
    crate::models::DEFAULT_LIMIT
}

impl Config {
    /// Load config from default path
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::default_path())
    }

    /// Load config from a path, falling back to defaults when it is missing
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let config: Config = serde_yaml::from_str(&content)?;
            config.validate()?;
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    /// Save config to default path
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::default_path())
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, self.to_yaml()?)?;
        Ok(())
    }

    pub fn to_yaml(&self) -> Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Get default config path
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(crate::CONFIG_DIR_NAME)
            .join("config.yml")
    }

    pub fn validate(&self) -> Result<()> {
        if self.resolver.default_limit == 0 {
            return Err(GeoResolveError::Config(
                "resolver.default_limit must be at least 1".to_string(),
            ));
        }
        if let Some(ref llm) = self.llm {
            llm.validate()?;
        }
        Ok(())
    }
}

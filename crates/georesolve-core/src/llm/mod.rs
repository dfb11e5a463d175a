//! LLM integration for the extraction tier

mod cache;
mod client;
mod extractor;
mod traits;

pub use cache::{completion_cache_key, CompletionCache};
pub use client::{build_backend, ChatMessage, OllamaBackend, OpenAICompatibleBackend};
pub use extractor::{
    build_extraction_prompt, extract_json_object, parse_extraction_response, LLMExtractor,
};
pub use traits::LLMBackend;

pub mod analyze;
pub mod config;
pub mod digest;
pub mod environment;
pub mod error;
pub mod llm;
pub mod logging;
pub mod news;
pub mod normalize;
pub mod pipeline;
pub mod prompt;
pub mod select;
pub mod webhook;

#[cfg(test)]
pub(crate) mod testing;

use async_openai::{config::OpenAIConfig, Client as OpenAIClient};
use async_trait::async_trait;
use ollama_rs::Ollama;

pub use error::DigestError;

pub const TARGET_WEB_REQUEST: &str = "web_request";
pub const TARGET_LLM_REQUEST: &str = "llm_request";

#[derive(Clone, Debug)]
pub enum LLMClient {
    Ollama(Ollama),
    OpenAI(OpenAIClient<OpenAIConfig>),
}

#[derive(Clone, Debug)]
pub struct LLMParams {
    pub llm_client: LLMClient,
    pub model: String,
}

/// Fetches raw articles for one configured source query.
#[async_trait]
pub trait NewsSource: Send + Sync {
    async fn fetch(
        &self,
        query: &config::SourceQuery,
        limit: usize,
    ) -> Result<Vec<news::RawArticle>, DigestError>;
}

/// Single-shot text completion.
#[async_trait]
pub trait LanguageModel: Send + Sync {
    async fn complete(
        &self,
        prompt: &str,
        max_tokens: u32,
        temperature: f32,
    ) -> Result<String, DigestError>;
}

/// Best-effort message delivery. Implementations log their own failures.
#[async_trait]
pub trait Delivery: Send + Sync {
    async fn deliver(&self, text: &str);
}

use async_openai::types::{
    ChatCompletionRequestMessage, ChatCompletionRequestUserMessageArgs,
    CreateChatCompletionRequestArgs,
};
use async_trait::async_trait;
use ollama_rs::generation::completion::request::GenerationRequest;
use ollama_rs::generation::options::GenerationOptions;
use regex::Regex;
use std::sync::OnceLock;
use std::time::Duration;
use tokio::time::timeout;
use tracing::{debug, warn};

use crate::{DigestError, LLMClient, LLMParams, LanguageModel, TARGET_LLM_REQUEST};

pub const LLM_TIMEOUT: Duration = Duration::from_secs(180);

/// Strips `<think>...</think>` blocks emitted by reasoning models.
///
/// If nothing is left after stripping, the original text is returned untouched.
pub fn strip_thinking_tags(text: &str) -> String {
    static THINK_RE: OnceLock<Regex> = OnceLock::new();
    let re = THINK_RE.get_or_init(|| {
        // (?s) so the block can span lines.
        Regex::new(r"(?s)<think>.*?</think>").expect("static regex is valid")
    });

    let result = re.replace_all(text, "").trim().to_string();
    if result.is_empty() {
        return text.to_string();
    }
    result
}

impl LLMParams {
    async fn generate_ollama(
        &self,
        ollama: &ollama_rs::Ollama,
        prompt: &str,
        max_tokens: u32,
        temperature: f32,
    ) -> Result<String, DigestError> {
        let mut request = GenerationRequest::new(self.model.clone(), prompt.to_string());
        request.options = Some(
            GenerationOptions::default()
                .temperature(temperature)
                .num_predict(max_tokens as i32),
        );

        match timeout(LLM_TIMEOUT, ollama.generate(request)).await {
            Ok(Ok(response)) => Ok(response.response),
            Ok(Err(e)) => Err(DigestError::ModelUnavailable(format!(
                "Ollama generation failed: {}",
                e
            ))),
            Err(_) => Err(DigestError::ModelUnavailable(format!(
                "Ollama request timed out after {} seconds",
                LLM_TIMEOUT.as_secs()
            ))),
        }
    }

    async fn generate_openai(
        &self,
        client: &async_openai::Client<async_openai::config::OpenAIConfig>,
        prompt: &str,
        max_tokens: u32,
        temperature: f32,
    ) -> Result<String, DigestError> {
        let messages: Vec<ChatCompletionRequestMessage> =
            vec![ChatCompletionRequestUserMessageArgs::default()
                .content(prompt)
                .build()
                .map_err(|e| DigestError::ModelUnavailable(format!("Invalid request: {}", e)))?
                .into()];
        let request = CreateChatCompletionRequestArgs::default()
            .model(self.model.clone())
            .messages(messages)
            .max_completion_tokens(max_tokens)
            .temperature(temperature)
            .build()
            .map_err(|e| DigestError::ModelUnavailable(format!("Invalid request: {}", e)))?;

        match timeout(LLM_TIMEOUT, client.chat().create(request)).await {
            Ok(Ok(response)) => response
                .choices
                .into_iter()
                .next()
                .and_then(|choice| choice.message.content)
                .ok_or_else(|| {
                    DigestError::ModelUnavailable("OpenAI response had no content".to_string())
                }),
            Ok(Err(e)) => Err(DigestError::ModelUnavailable(format!(
                "OpenAI request failed: {}",
                e
            ))),
            Err(_) => Err(DigestError::ModelUnavailable(format!(
                "OpenAI request timed out after {} seconds",
                LLM_TIMEOUT.as_secs()
            ))),
        }
    }
}

#[async_trait]
impl LanguageModel for LLMParams {
    /// One request, no retries: a failed call is reported to the caller.
    async fn complete(
        &self,
        prompt: &str,
        max_tokens: u32,
        temperature: f32,
    ) -> Result<String, DigestError> {
        debug!(target: TARGET_LLM_REQUEST, "Sending LLM request to {} ({} max tokens): {}", self.model, max_tokens, prompt);

        let result = match &self.llm_client {
            LLMClient::Ollama(ollama) => {
                self.generate_ollama(ollama, prompt, max_tokens, temperature)
                    .await
            }
            LLMClient::OpenAI(client) => {
                self.generate_openai(client, prompt, max_tokens, temperature)
                    .await
            }
        };

        match result {
            Ok(text) if !text.trim().is_empty() => {
                debug!(target: TARGET_LLM_REQUEST, "LLM response received: {}", text);
                Ok(strip_thinking_tags(&text))
            }
            Ok(_) => {
                warn!(target: TARGET_LLM_REQUEST, "LLM returned an empty response");
                Err(DigestError::ModelUnavailable(
                    "empty response from model".to_string(),
                ))
            }
            Err(e) => {
                warn!(target: TARGET_LLM_REQUEST, "LLM request failed: {}", e);
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_thinking_tags() {
        let raw = "<think>\nThe user wants an array.\n</think>\n[2, 0, 1]";
        assert_eq!(strip_thinking_tags(raw), "[2, 0, 1]");
    }

    #[test]
    fn test_strip_thinking_tags_keeps_plain_text() {
        assert_eq!(strip_thinking_tags("  [0, 1]  "), "[0, 1]");
    }

    #[test]
    fn test_strip_thinking_tags_never_returns_empty() {
        let raw = "<think>only reasoning</think>";
        assert_eq!(strip_thinking_tags(raw), raw);
    }
}

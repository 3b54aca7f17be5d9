//! Type definitions for the news module.

use serde::{Deserialize, Deserializer};
use serde_json::Value;
use tokio::time::Duration;

/// An article as returned by the news API. Every field is optional and untrusted.
///
/// A field of the wrong JSON type reads as `None` instead of failing the record, so one
/// odd article never costs the rest of the response.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawArticle {
    #[serde(default, deserialize_with = "lenient_source")]
    pub source: Option<ArticleSource>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub content: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub url: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub published_at: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ArticleSource {
    #[serde(default, deserialize_with = "lenient_string")]
    pub name: Option<String>,
}

impl RawArticle {
    /// Publisher name, if the source reported one.
    pub fn source_name(&self) -> Option<&str> {
        self.source.as_ref().and_then(|s| s.name.as_deref())
    }
}

fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => Some(s),
        _ => None,
    })
}

fn lenient_source<'de, D>(deserializer: D) -> Result<Option<ArticleSource>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).ok())
}

/// Envelope shared by NewsAPI's `everything` and `top-headlines` endpoints.
///
/// Errors come back as `{"status": "error", "code": ..., "message": ...}`. Articles are
/// kept as raw JSON here and decoded one at a time.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewsApiResponse {
    pub status: String,
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub total_results: Option<u64>,
    #[serde(default)]
    pub articles: Vec<Value>,
}

// Constants
pub const DEFAULT_NEWS_API_BASE_URL: &str = "https://newsapi.org/v2";
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
/// NewsAPI rejects page sizes above this.
pub const MAX_PAGE_SIZE: usize = 100;

//! HTTP client for the NewsAPI headline endpoints.

use async_trait::async_trait;
use reqwest::header;
use tokio::time::timeout;
use tracing::{debug, info, warn};
use url::Url;

use super::types::{NewsApiResponse, RawArticle, MAX_PAGE_SIZE, REQUEST_TIMEOUT};
use crate::config::SourceQuery;
use crate::{DigestError, NewsSource, TARGET_WEB_REQUEST};

pub struct NewsApiClient {
    client: reqwest::Client,
    api_key: String,
    base_url: Url,
}

impl NewsApiClient {
    pub fn with_base_url(api_key: impl Into<String>, base_url: &str) -> anyhow::Result<Self> {
        // Url::join drops the last path segment unless the base ends with a slash.
        let mut base = base_url.trim().to_string();
        if !base.ends_with('/') {
            base.push('/');
        }
        let base_url = Url::parse(&base)
            .map_err(|e| anyhow::anyhow!("Invalid news API base URL {}: {}", base_url, e))?;

        let client = reqwest::Client::builder()
            .gzip(true)
            .user_agent(concat!("news-digest/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| anyhow::anyhow!("Failed to build HTTP client: {}", e))?;

        Ok(NewsApiClient {
            client,
            api_key: api_key.into(),
            base_url,
        })
    }

    /// Region-scoped queries go to `top-headlines`; everything else to `everything`,
    /// newest first.
    pub fn request_url(&self, source: &SourceQuery, limit: usize) -> Result<Url, DigestError> {
        let page_size = limit.clamp(1, MAX_PAGE_SIZE).to_string();
        let endpoint = if source.region.is_some() {
            "top-headlines"
        } else {
            "everything"
        };

        let mut url = self
            .base_url
            .join(endpoint)
            .map_err(|e| DigestError::SourceUnavailable(format!("Invalid endpoint: {}", e)))?;

        {
            let mut pairs = url.query_pairs_mut();
            if let Some(query) = &source.query {
                pairs.append_pair("q", query);
            }
            match &source.region {
                Some(region) => {
                    pairs.append_pair("country", region);
                }
                None => {
                    if let Some(language) = &source.language {
                        pairs.append_pair("language", language);
                    }
                    pairs.append_pair("sortBy", "publishedAt");
                }
            }
            pairs.append_pair("pageSize", &page_size);
        }

        Ok(url)
    }
}

#[async_trait]
impl NewsSource for NewsApiClient {
    async fn fetch(
        &self,
        source: &SourceQuery,
        limit: usize,
    ) -> Result<Vec<RawArticle>, DigestError> {
        let url = self.request_url(source, limit)?;
        debug!(target: TARGET_WEB_REQUEST, "Fetching news for source {} from {}", source, url);

        let response = match timeout(
            REQUEST_TIMEOUT,
            self.client
                .get(url)
                .header("X-Api-Key", &self.api_key)
                .header(header::ACCEPT, "application/json")
                .send(),
        )
        .await
        {
            Ok(Ok(response)) => response,
            Ok(Err(err)) => {
                return Err(DigestError::SourceUnavailable(format!(
                    "Request failed: {}",
                    err
                )))
            }
            Err(_) => {
                return Err(DigestError::SourceUnavailable(format!(
                    "Request timed out after {} seconds",
                    REQUEST_TIMEOUT.as_secs()
                )))
            }
        };

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| DigestError::SourceUnavailable(format!("Failed to read body: {}", e)))?;

        if !status.is_success() {
            warn!(target: TARGET_WEB_REQUEST, "Non-success status {} for source {}", status, source);
            // NewsAPI still sends its error envelope on 4xx responses.
            let detail = serde_json::from_str::<NewsApiResponse>(&body)
                .ok()
                .and_then(|r| r.message)
                .unwrap_or_default();
            return Err(DigestError::SourceUnavailable(format!(
                "HTTP {} {}",
                status, detail
            )));
        }

        let articles = parse_response(&body)?;
        info!(target: TARGET_WEB_REQUEST, "Fetched {} articles for source {}", articles.len(), source);
        for article in &articles {
            debug!(
                target: TARGET_WEB_REQUEST,
                " - {:?} ({}, {})",
                article.title.as_deref().unwrap_or_default(),
                article.source_name().unwrap_or("unknown source"),
                article.published_at.as_deref().unwrap_or("undated")
            );
        }
        Ok(articles)
    }
}

/// Decodes a NewsAPI response body, turning a reported error status into
/// `SourceUnavailable`.
///
/// Entries that are not JSON objects are dropped; every other entry is kept for the
/// normalizer to judge.
pub fn parse_response(body: &str) -> Result<Vec<RawArticle>, DigestError> {
    let parsed: NewsApiResponse = serde_json::from_str(body)
        .map_err(|e| DigestError::SourceUnavailable(format!("Invalid response body: {}", e)))?;

    if parsed.status != "ok" {
        return Err(DigestError::SourceUnavailable(format!(
            "{}: {}",
            parsed.code.unwrap_or_else(|| parsed.status.clone()),
            parsed.message.unwrap_or_default()
        )));
    }

    if let Some(total) = parsed.total_results {
        debug!(target: TARGET_WEB_REQUEST, "Source reports {} total results", total);
    }
    let articles = parsed
        .articles
        .into_iter()
        .filter_map(|entry| match serde_json::from_value::<RawArticle>(entry) {
            Ok(article) => Some(article),
            Err(e) => {
                debug!(target: TARGET_WEB_REQUEST, "Dropping unreadable article entry: {}", e);
                None
            }
        })
        .collect();
    Ok(articles)
}

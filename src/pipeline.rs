//! Sequences fetch, normalize, select, analyze and deliver for one digest run.

use anyhow::Result;
use std::sync::Arc;
use tracing::{info, warn};

use crate::analyze::Analyzer;
use crate::config::DigestConfig;
use crate::digest::{assemble, digest_header};
use crate::news::RawArticle;
use crate::normalize::normalize;
use crate::prompt::header_date;
use crate::select::select;
use crate::{Delivery, LanguageModel, NewsSource};

pub const NO_SOURCE_DATA_MESSAGE: &str = "⚠️ News digest: no source data (all news sources returned zero articles).";
pub const NO_ANALYZED_ARTICLES_NOTE: &str = "_No articles could be analyzed today._";

pub fn insufficient_articles_message(count: usize, min_articles: usize) -> String {
    format!(
        "⚠️ News digest: insufficient quality articles ({} found, {} required).",
        count, min_articles
    )
}

/// The external collaborators a run talks to.
#[derive(Clone)]
pub struct Capabilities {
    pub source: Arc<dyn NewsSource>,
    pub model: Arc<dyn LanguageModel>,
    pub delivery: Arc<dyn Delivery>,
}

/// How a run ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// Every source came back empty; a diagnostic was delivered.
    NoSourceData,
    /// Too few articles survived normalization; a diagnostic was delivered.
    InsufficientArticles { count: usize },
    /// A digest with `articles` analyzed articles was delivered.
    Delivered { articles: usize },
}

pub struct Pipeline {
    config: DigestConfig,
    capabilities: Capabilities,
}

impl Pipeline {
    pub fn new(config: DigestConfig, capabilities: Capabilities) -> Self {
        Pipeline {
            config,
            capabilities,
        }
    }

    /// Runs one digest from fetch to delivery. Each step runs once; nothing is retried.
    ///
    /// Returns an error only when an analysis fails under the `Abort` policy, in which
    /// case nothing is delivered.
    pub async fn run(&self) -> Result<RunOutcome> {
        let raw = self.fetch_all().await;
        if raw.is_empty() {
            warn!("No articles from any source");
            self.capabilities
                .delivery
                .deliver(NO_SOURCE_DATA_MESSAGE)
                .await;
            return Ok(RunOutcome::NoSourceData);
        }

        let articles = normalize(&raw, self.config.min_summary_length);
        info!(
            "Normalized {} raw articles into {} candidates",
            raw.len(),
            articles.len()
        );
        if articles.len() < self.config.min_articles {
            warn!(
                "Only {} quality articles, need {}",
                articles.len(),
                self.config.min_articles
            );
            self.capabilities
                .delivery
                .deliver(&insufficient_articles_message(
                    articles.len(),
                    self.config.min_articles,
                ))
                .await;
            return Ok(RunOutcome::InsufficientArticles {
                count: articles.len(),
            });
        }

        let model = self.capabilities.model.as_ref();
        let selection = select(model, &articles, self.config.top_n).await;

        let header = digest_header(&header_date(), &self.config.topic);
        let analyzer = Analyzer::new(model);
        let digest = assemble(
            &header,
            &selection,
            &articles,
            &analyzer,
            self.config.analysis_failure_policy,
        )
        .await?;

        let text = if digest.articles == 0 {
            format!("{}\n\n{}", digest.text, NO_ANALYZED_ARTICLES_NOTE)
        } else {
            digest.text
        };
        self.capabilities.delivery.deliver(&text).await;

        info!("Delivered digest with {} articles", digest.articles);
        Ok(RunOutcome::Delivered {
            articles: digest.articles,
        })
    }

    /// Fetches every configured source in order. A failing source counts as empty.
    async fn fetch_all(&self) -> Vec<RawArticle> {
        let mut raw = Vec::new();
        for source in &self.config.sources {
            match self
                .capabilities
                .source
                .fetch(source, self.config.fetch_limit)
                .await
            {
                Ok(mut articles) => {
                    info!("Source {} returned {} articles", source, articles.len());
                    raw.append(&mut articles);
                }
                Err(e) => {
                    warn!("Source {} failed, treating as empty: {}", source, e);
                }
            }
        }
        raw
    }
}

//! Per-article structured analysis.

use async_trait::async_trait;
use tracing::{info, warn};

use crate::normalize::NormalizedArticle;
use crate::prompt;
use crate::{DigestError, LanguageModel};

/// Analysis is prose across seven sections; it needs far more room than ranking.
pub const ANALYSIS_MAX_TOKENS: u32 = 1500;
pub const ANALYSIS_TEMPERATURE: f32 = 0.2;

/// Produces the analysis text for one article.
#[async_trait]
pub trait ArticleAnalyzer: Send + Sync {
    async fn analyze(&self, article: &NormalizedArticle) -> Result<String, DigestError>;
}

/// [`ArticleAnalyzer`] backed by a language model.
pub struct Analyzer<'a> {
    model: &'a dyn LanguageModel,
}

impl<'a> Analyzer<'a> {
    pub fn new(model: &'a dyn LanguageModel) -> Self {
        Analyzer { model }
    }
}

#[async_trait]
impl<'a> ArticleAnalyzer for Analyzer<'a> {
    /// Returns the model output as-is. Section conformance is only logged, never enforced.
    async fn analyze(&self, article: &NormalizedArticle) -> Result<String, DigestError> {
        info!(" - analyzing => {}", article.title);

        let analysis_prompt = prompt::analysis_prompt(article);
        let analysis = self
            .model
            .complete(&analysis_prompt, ANALYSIS_MAX_TOKENS, ANALYSIS_TEMPERATURE)
            .await?;

        let missing = prompt::missing_sections(&analysis);
        if !missing.is_empty() {
            warn!(
                "Analysis of {:?} is missing sections: {}",
                article.title,
                missing.join(", ")
            );
        }

        Ok(analysis)
    }
}

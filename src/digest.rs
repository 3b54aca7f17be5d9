//! Renders the selected articles and their analyses into the final message.

use tracing::{error, info, warn};

use crate::analyze::ArticleAnalyzer;
use crate::config::AnalysisFailurePolicy;
use crate::normalize::NormalizedArticle;
use crate::DigestError;

/// Body used in place of an analysis under [`AnalysisFailurePolicy::Placeholder`].
pub const ANALYSIS_UNAVAILABLE: &str = "_Analysis unavailable for this article._";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Digest {
    pub text: String,
    /// Number of article blocks rendered after the header.
    pub articles: usize,
}

/// Header line, e.g. `📌 2026-10-15 AI News Digest`.
pub fn digest_header(date: &str, topic: &str) -> String {
    format!("📌 {} {} News Digest", date, topic)
}

fn render_block(article: &NormalizedArticle, body: &str) -> String {
    let mut block = format!("**{}**\n", article.title);
    if !article.url.is_empty() {
        block.push_str(&format!("<{}>\n", article.url));
    }
    block.push_str(body.trim_end());
    block.push_str("\n\n");
    block
}

/// Builds the digest for `selection`, in selection order.
///
/// Indices outside `articles` are skipped. Repeated indices are rendered each time they
/// appear. Analyzer failures are handled according to `policy`; only
/// [`AnalysisFailurePolicy::Abort`] makes this return an error.
pub async fn assemble(
    header: &str,
    selection: &[i64],
    articles: &[NormalizedArticle],
    analyzer: &dyn ArticleAnalyzer,
    policy: AnalysisFailurePolicy,
) -> Result<Digest, DigestError> {
    let mut text = format!("{}\n\n", header);
    let mut rendered = 0;

    for &index in selection {
        let Some(article) = usize::try_from(index).ok().and_then(|i| articles.get(i)) else {
            warn!(
                "Skipping selected index {} (only {} articles)",
                index,
                articles.len()
            );
            continue;
        };

        match analyzer.analyze(article).await {
            Ok(analysis) => {
                text.push_str(&render_block(article, &analysis));
                rendered += 1;
            }
            Err(e) => match policy {
                AnalysisFailurePolicy::Skip => {
                    error!("Analysis failed for {:?}, leaving it out: {}", article.title, e);
                }
                AnalysisFailurePolicy::Placeholder => {
                    error!("Analysis failed for {:?}, using placeholder: {}", article.title, e);
                    text.push_str(&render_block(article, ANALYSIS_UNAVAILABLE));
                    rendered += 1;
                }
                AnalysisFailurePolicy::Abort => {
                    error!("Analysis failed for {:?}, aborting digest: {}", article.title, e);
                    return Err(e);
                }
            },
        }
    }

    info!("Assembled digest with {} of {} selected articles", rendered, selection.len());
    Ok(Digest {
        text: text.trim_end().to_string(),
        articles: rendered,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyze::Analyzer;
    use crate::testing::{normalized_articles, ScriptedModel};
    use async_trait::async_trait;

    /// Echoes the title back, failing for titles listed in `fail_on`.
    struct EchoAnalyzer {
        fail_on: Vec<&'static str>,
    }

    #[async_trait]
    impl ArticleAnalyzer for EchoAnalyzer {
        async fn analyze(&self, article: &NormalizedArticle) -> Result<String, DigestError> {
            if self.fail_on.iter().any(|title| *title == article.title) {
                return Err(DigestError::ModelUnavailable("boom".to_string()));
            }
            Ok(format!("analysis of {}", article.title))
        }
    }

    fn echo() -> EchoAnalyzer {
        EchoAnalyzer { fail_on: vec![] }
    }

    #[tokio::test]
    async fn test_out_of_range_indices_are_skipped() {
        let articles = normalized_articles(5);
        let digest = assemble("H", &[99, 1, -1, 5], &articles, &echo(), Default::default())
            .await
            .unwrap();

        assert_eq!(digest.articles, 1);
        assert!(digest.text.contains("analysis of Article 1"));
        assert!(!digest.text.contains("Article 0"));
    }

    #[tokio::test]
    async fn test_blocks_follow_selection_order() {
        let articles = normalized_articles(5);
        let digest = assemble("Header", &[1, 4, 2], &articles, &echo(), Default::default())
            .await
            .unwrap();

        let pos = |needle: &str| digest.text.find(needle).unwrap();
        assert!(digest.text.starts_with("Header\n\n"));
        assert!(pos("**Article 1**") < pos("**Article 4**"));
        assert!(pos("**Article 4**") < pos("**Article 2**"));
        assert_eq!(digest.articles, 3);
    }

    #[tokio::test]
    async fn test_block_layout() {
        let articles = normalized_articles(1);
        let digest = assemble("H", &[0], &articles, &echo(), Default::default())
            .await
            .unwrap();
        assert_eq!(
            digest.text,
            "H\n\n**Article 0**\n<https://news.example.com/article 0>\nanalysis of Article 0"
        );
    }

    #[tokio::test]
    async fn test_duplicate_indices_render_twice() {
        let articles = normalized_articles(3);
        let digest = assemble("H", &[2, 2], &articles, &echo(), Default::default())
            .await
            .unwrap();
        assert_eq!(digest.articles, 2);
        assert_eq!(digest.text.matches("**Article 2**").count(), 2);
    }

    #[tokio::test]
    async fn test_skip_policy_drops_failed_article() {
        let articles = normalized_articles(3);
        let analyzer = EchoAnalyzer {
            fail_on: vec!["Article 1"],
        };
        let digest = assemble("H", &[0, 1, 2], &articles, &analyzer, AnalysisFailurePolicy::Skip)
            .await
            .unwrap();
        assert_eq!(digest.articles, 2);
        assert!(!digest.text.contains("Article 1"));
    }

    #[tokio::test]
    async fn test_placeholder_policy_keeps_title() {
        let articles = normalized_articles(3);
        let analyzer = EchoAnalyzer {
            fail_on: vec!["Article 1"],
        };
        let digest = assemble(
            "H",
            &[0, 1, 2],
            &articles,
            &analyzer,
            AnalysisFailurePolicy::Placeholder,
        )
        .await
        .unwrap();
        assert_eq!(digest.articles, 3);
        assert!(digest.text.contains("**Article 1**"));
        assert!(digest.text.contains(ANALYSIS_UNAVAILABLE));
    }

    #[tokio::test]
    async fn test_abort_policy_propagates() {
        let articles = normalized_articles(3);
        let analyzer = EchoAnalyzer {
            fail_on: vec!["Article 1"],
        };
        let result = assemble(
            "H",
            &[0, 1, 2],
            &articles,
            &analyzer,
            AnalysisFailurePolicy::Abort,
        )
        .await;
        assert!(matches!(result, Err(DigestError::ModelUnavailable(_))));
    }

    #[tokio::test]
    async fn test_assemble_with_model_backed_analyzer() {
        let articles = normalized_articles(5);
        let model = ScriptedModel::replying(&["first analysis", "second analysis"]);
        let analyzer = Analyzer::new(&model);

        let digest = assemble("H", &[3, 0], &articles, &analyzer, Default::default())
            .await
            .unwrap();
        assert_eq!(model.calls(), 2);
        assert!(model.prompts.lock().unwrap()[0].contains("Title: Article 3"));
        assert!(digest.text.find("first analysis") < digest.text.find("second analysis"));
    }

    #[test]
    fn test_digest_header() {
        assert_eq!(digest_header("2026-10-15", "AI"), "📌 2026-10-15 AI News Digest");
    }
}

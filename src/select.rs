//! Model-driven ranking of the normalized article set.

use tracing::{debug, info, warn};

use crate::normalize::NormalizedArticle;
use crate::prompt;
use crate::LanguageModel;

/// Ranking output is a short array; keep the budget tight.
pub const SELECTION_MAX_TOKENS: u32 = 200;
pub const SELECTION_TEMPERATURE: f32 = 0.2;

/// Indices into the article slice handed to [`select`].
///
/// These come straight from the model: they may be negative, out of range, repeated or
/// unsorted. Check bounds before indexing.
pub type Selection = Vec<i64>;

/// Asks the model for the `top_n` most newsworthy articles.
///
/// Never fails: an unusable reply or a model error yields [`fallback_selection`].
pub async fn select(
    model: &dyn LanguageModel,
    articles: &[NormalizedArticle],
    top_n: usize,
) -> Selection {
    let selection_prompt = prompt::selection_prompt(articles, top_n);

    let response = match model
        .complete(&selection_prompt, SELECTION_MAX_TOKENS, SELECTION_TEMPERATURE)
        .await
    {
        Ok(response) => response,
        Err(e) => {
            warn!("Selection request failed, using first {} articles: {}", top_n, e);
            return fallback_selection(top_n, articles.len());
        }
    };

    match parse_selection(&response) {
        Some(mut indices) => {
            indices.truncate(top_n);
            info!("Model selected articles {:?}", indices);
            indices
        }
        None => {
            warn!(
                "Could not parse selection {:?}, using first {} articles",
                response, top_n
            );
            fallback_selection(top_n, articles.len())
        }
    }
}

/// `[0, 1, ..., min(top_n, article_count) - 1]`.
pub fn fallback_selection(top_n: usize, article_count: usize) -> Selection {
    (0..top_n.min(article_count) as i64).collect()
}

/// Parses a JSON array of integers, tolerating surrounding whitespace and a single
/// Markdown code fence.
pub fn parse_selection(response: &str) -> Option<Selection> {
    let trimmed = strip_code_fence(response.trim());
    match serde_json::from_str::<Vec<i64>>(trimmed) {
        Ok(indices) => Some(indices),
        Err(e) => {
            debug!("Selection is not a JSON integer array: {}", e);
            None
        }
    }
}

fn strip_code_fence(text: &str) -> &str {
    let Some(inner) = text.strip_prefix("```") else {
        return text;
    };
    let Some(inner) = inner.strip_suffix("```") else {
        return text;
    };
    // Drop an optional language tag such as ```json.
    let inner = inner.trim_start_matches(|c: char| c.is_ascii_alphabetic());
    inner.trim()
}

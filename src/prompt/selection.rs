use crate::normalize::NormalizedArticle;
use crate::prompt::common::{current_date, DONT_TELL_ME};

/// Generate a prompt asking the model to pick the `top_n` most newsworthy articles.
///
/// Articles are listed as `[index] title: ... summary: ...`, where the index is the
/// article's position in `articles`.
pub fn selection_prompt(articles: &[NormalizedArticle], top_n: usize) -> String {
    let listing = articles
        .iter()
        .enumerate()
        .map(|(i, article)| {
            format!(
                "[{}] title: {} summary: {}",
                i, article.title, article.summary_text
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        r#"You are the editor of a daily technology and markets briefing. Today's date: {date}

## CANDIDATE ARTICLES:
----------
{listing}
----------

Select the {top_n} most newsworthy articles from the list above.

Selection criteria, in order of weight:
1. Industry impact: changes that affect how a whole industry operates or competes.
2. Technical novelty: genuinely new technology, research results or capabilities.
3. Market relevance: likely to move stock prices, valuations or capital flows.
4. Developer ecosystem: affects tools, platforms, APIs or open-source projects developers rely on.

Exclude:
- Celebrity news, gossip and personal-life stories.
- Promotional content, product deals, discounts and advertisements.
- Near-duplicates of an article you already selected.

Respond with ONLY a JSON array of at most {top_n} integers, the indices of the selected
articles in order of importance, for example: [3, 0, 7]
Do not include any other text, explanation or formatting.
{dont_tell_me}"#,
        date = current_date(),
        listing = listing,
        top_n = top_n,
        dont_tell_me = DONT_TELL_ME
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn article(title: &str) -> NormalizedArticle {
        NormalizedArticle {
            title: title.to_string(),
            summary_text: format!("{} summary text long enough to keep", title),
            url: String::new(),
        }
    }

    #[test]
    fn test_selection_prompt_enumerates_articles_by_position() {
        let prompt = selection_prompt(&[article("Alpha"), article("Beta")], 3);
        assert!(prompt.contains("[0] title: Alpha summary: Alpha summary text"));
        assert!(prompt.contains("[1] title: Beta summary: Beta summary text"));
        assert!(prompt.contains("JSON array of at most 3 integers"));
    }

    #[test]
    fn test_selection_prompt_states_exclusions() {
        let prompt = selection_prompt(&[article("Alpha")], 1);
        assert!(prompt.contains("gossip"));
        assert!(prompt.contains("Promotional content"));
    }
}

//! Turns raw source records into the canonical, deduplicated article set.

use std::collections::HashSet;
use tracing::debug;

use crate::news::RawArticle;

/// Summaries shorter than this (in characters) are treated as teaser text.
pub const DEFAULT_MIN_SUMMARY_LENGTH: usize = 30;

/// Title NewsAPI substitutes for articles pulled by the publisher.
const REMOVED_TITLE: &str = "[Removed]";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedArticle {
    pub title: String,
    pub summary_text: String,
    pub url: String,
}

impl From<&NormalizedArticle> for RawArticle {
    fn from(article: &NormalizedArticle) -> Self {
        RawArticle {
            title: Some(article.title.clone()),
            description: Some(article.summary_text.clone()),
            url: Some(article.url.clone()),
            ..RawArticle::default()
        }
    }
}

fn field(value: &Option<String>) -> &str {
    value.as_deref().map(str::trim).unwrap_or("")
}

fn long_enough(text: &str, min_length: usize) -> bool {
    !text.is_empty() && text.chars().count() >= min_length
}

/// Filters and deduplicates `raw` in input order.
///
/// An article survives when its trimmed title is non-empty and unseen in this batch and
/// either its description or its content reaches `min_summary_length` characters. The
/// description is preferred. Rejections are silent.
pub fn normalize(raw: &[RawArticle], min_summary_length: usize) -> Vec<NormalizedArticle> {
    let mut seen_titles: HashSet<&str> = HashSet::new();
    let mut articles = Vec::new();

    for item in raw {
        let title = field(&item.title);
        if title.is_empty() || title == REMOVED_TITLE {
            debug!("Dropping article without a usable title: {:?}", item.url);
            continue;
        }

        let description = field(&item.description);
        let summary_text = if long_enough(description, min_summary_length) {
            description
        } else {
            field(&item.content)
        };
        if !long_enough(summary_text, min_summary_length) {
            debug!("Dropping article with short summary: {}", title);
            continue;
        }

        if !seen_titles.insert(title) {
            debug!("Dropping duplicate article: {}", title);
            continue;
        }

        articles.push(NormalizedArticle {
            title: title.to_string(),
            summary_text: summary_text.to_string(),
            url: field(&item.url).to_string(),
        });
    }

    articles
}

#[cfg(test)]
mod tests {
    use super::*;

    const LONG: &str = "Regulators approved the merger after a six-month review of market share.";

    fn raw(title: Option<&str>, description: Option<&str>, content: Option<&str>) -> RawArticle {
        RawArticle {
            title: title.map(String::from),
            description: description.map(String::from),
            content: content.map(String::from),
            url: title.map(|t| format!("https://example.com/{}", t.len())),
            ..RawArticle::default()
        }
    }

    #[test]
    fn test_every_output_meets_quality_threshold() {
        let input = vec![
            raw(Some("Good"), Some(LONG), None),
            raw(Some("Short teaser"), Some("Read more"), Some("Also short")),
            raw(Some("   "), Some(LONG), None),
            raw(None, Some(LONG), None),
            raw(Some("Content only"), None, Some(LONG)),
            raw(Some("Nothing"), None, None),
        ];

        let output = normalize(&input, DEFAULT_MIN_SUMMARY_LENGTH);
        assert_eq!(output.len(), 2);
        for article in &output {
            assert!(!article.title.is_empty());
            assert!(article.summary_text.chars().count() >= DEFAULT_MIN_SUMMARY_LENGTH);
        }
    }

    #[test]
    fn test_description_preferred_content_fallback() {
        let input = vec![
            raw(Some("A"), Some(LONG), Some("content that is long enough to qualify too")),
            raw(Some("B"), Some("teaser"), Some(LONG)),
        ];
        let output = normalize(&input, DEFAULT_MIN_SUMMARY_LENGTH);
        assert_eq!(output[0].summary_text, LONG);
        assert_eq!(output[1].summary_text, LONG);
    }

    #[test]
    fn test_duplicate_titles_keep_first_occurrence() {
        let mut first = raw(Some("Same headline"), Some(LONG), None);
        first.url = Some("https://first.example.com".to_string());
        let mut second = raw(
            Some("  Same headline "),
            Some("A different but equally long description of the event."),
            None,
        );
        second.url = Some("https://second.example.com".to_string());

        let output = normalize(&[first, second], DEFAULT_MIN_SUMMARY_LENGTH);
        assert_eq!(output.len(), 1);
        assert_eq!(output[0].summary_text, LONG);
        assert_eq!(output[0].url, "https://first.example.com");
    }

    #[test]
    fn test_rejected_duplicate_does_not_block_later_valid_copy() {
        // The first copy fails the length check, so the title is still free.
        let input = vec![
            raw(Some("Headline"), Some("short"), None),
            raw(Some("Headline"), Some(LONG), None),
        ];
        let output = normalize(&input, DEFAULT_MIN_SUMMARY_LENGTH);
        assert_eq!(output.len(), 1);
        assert_eq!(output[0].summary_text, LONG);
    }

    #[test]
    fn test_removed_placeholder_is_dropped() {
        let input = vec![raw(Some("[Removed]"), Some(LONG), None)];
        assert!(normalize(&input, DEFAULT_MIN_SUMMARY_LENGTH).is_empty());
    }

    #[test]
    fn test_length_counts_characters_not_bytes() {
        // 10 Hangul syllables are 30 bytes but only 10 characters.
        let korean = "가나다라마바사아자차";
        let input = vec![raw(Some("제목"), Some(korean), None)];
        assert!(normalize(&input, 11).is_empty());
        assert_eq!(normalize(&input, 10).len(), 1);
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let input = vec![
            raw(Some(" One "), Some(LONG), None),
            raw(Some("Two"), None, Some(LONG)),
            raw(Some("One"), Some(LONG), None),
            raw(Some(""), Some(LONG), None),
        ];
        let first = normalize(&input, DEFAULT_MIN_SUMMARY_LENGTH);
        let fed_back: Vec<RawArticle> = first.iter().map(RawArticle::from).collect();
        let second = normalize(&fed_back, DEFAULT_MIN_SUMMARY_LENGTH);
        assert_eq!(first, second);
    }

    #[test]
    fn test_twelve_articles_with_duplicates_and_empty_titles() {
        let mut input = Vec::new();
        for i in 0..6 {
            input.push(raw(Some(&format!("Headline {}", i)), Some(LONG), None));
        }
        for i in 0..4 {
            input.push(raw(Some(&format!("Headline {}", i)), Some(LONG), None));
        }
        input.push(raw(Some(""), Some(LONG), None));
        input.push(raw(None, Some(LONG), None));
        assert_eq!(input.len(), 12);

        let output = normalize(&input, DEFAULT_MIN_SUMMARY_LENGTH);
        assert_eq!(output.len(), 6);
        let titles: Vec<&str> = output.iter().map(|a| a.title.as_str()).collect();
        assert_eq!(
            titles,
            vec!["Headline 0", "Headline 1", "Headline 2", "Headline 3", "Headline 4", "Headline 5"]
        );
    }
}

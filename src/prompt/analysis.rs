use crate::normalize::NormalizedArticle;
use crate::prompt::common::{DONT_TELL_ME, NO_SPECULATION};

/// Section headers the analysis is asked to contain, in order.
///
/// Changing a header changes the output contract; keep tests and any downstream
/// consumers in sync.
pub const ANALYSIS_SECTIONS: [&str; 7] = [
    "1. Summary",
    "2. Core Event",
    "3. Event Type",
    "4. Affected Companies / Industries",
    "5. Industry Impact",
    "6. Market Impact",
    "7. Risks & Uncertainties",
];

pub const EVENT_TYPES: [&str; 10] = [
    "Investment",
    "M&A",
    "Earnings",
    "New Product",
    "Regulation",
    "Policy",
    "Technical Innovation",
    "Security Incident",
    "Partnership",
    "Other",
];

/// Generate the structured analysis prompt for a single article.
pub fn analysis_prompt(article: &NormalizedArticle) -> String {
    format!(
        r#"
## ARTICLE (FOR ANALYSIS):
----------
Title: {title}
{summary}
----------
{no_speculation}
Analyze the article above using exactly the following seven sections, with each header
written on its own line as shown.

**{s1}**
3-5 lines of factual summary. Keep names, figures, amounts and policy or law references
exactly as written in the article.

**{s2}**
One sentence defining the core event.

**{s3}**
Exactly one of: {event_types}.

**{s4}**
Only companies or industries named in the article that are directly affected. If no
company is named, describe the affected industry instead.

**{s5}**
Effects on competitive dynamics, market share and barriers to entry.

**{s6}**
- Direction: up / down / neutral
- Intensity: low / medium / high
- Probability: a percentage or percentage range (e.g. 60-70%)
- Time horizon: short-term (1-7 days) or medium-term (1-3 months)
- Rationale: one or two sentences grounded in the article text

**{s7}**
- Information gaps
- Policy variables
- Macroeconomic variables
- Execution risk
{dont_tell_me}"#,
        title = article.title,
        summary = article.summary_text,
        no_speculation = NO_SPECULATION,
        s1 = ANALYSIS_SECTIONS[0],
        s2 = ANALYSIS_SECTIONS[1],
        s3 = ANALYSIS_SECTIONS[2],
        s4 = ANALYSIS_SECTIONS[3],
        s5 = ANALYSIS_SECTIONS[4],
        s6 = ANALYSIS_SECTIONS[5],
        s7 = ANALYSIS_SECTIONS[6],
        event_types = EVENT_TYPES.join(", "),
        dont_tell_me = DONT_TELL_ME
    )
}

/// Section headers from [`ANALYSIS_SECTIONS`] that do not appear in `analysis`.
pub fn missing_sections(analysis: &str) -> Vec<&'static str> {
    ANALYSIS_SECTIONS
        .iter()
        .copied()
        .filter(|section| !analysis.contains(section))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn article() -> NormalizedArticle {
        NormalizedArticle {
            title: "Chipmaker announces $20B fab".to_string(),
            summary_text: "The company will build a plant in Arizona under the CHIPS Act."
                .to_string(),
            url: "https://example.com/fab".to_string(),
        }
    }

    #[test]
    fn test_analysis_prompt_lists_every_section_in_order() {
        let prompt = analysis_prompt(&article());
        let mut last = 0;
        for section in ANALYSIS_SECTIONS {
            let pos = prompt
                .find(section)
                .unwrap_or_else(|| panic!("missing section {}", section));
            assert!(pos > last, "section {} out of order", section);
            last = pos;
        }
    }

    #[test]
    fn test_analysis_prompt_carries_article_and_constraints() {
        let prompt = analysis_prompt(&article());
        assert!(prompt.contains("Title: Chipmaker announces $20B fab"));
        assert!(prompt.contains("CHIPS Act"));
        assert!(prompt.contains("Do NOT introduce"));
        for event_type in EVENT_TYPES {
            assert!(prompt.contains(event_type));
        }
        for field in ["Direction:", "Intensity:", "Probability:", "Time horizon:", "Rationale:"] {
            assert!(prompt.contains(field), "missing market field {}", field);
        }
    }

    #[test]
    fn test_missing_sections() {
        let complete = ANALYSIS_SECTIONS.join("\ntext\n");
        assert!(missing_sections(&complete).is_empty());

        let partial = "**1. Summary**\nSomething happened.\n**2. Core Event**\nIt happened.";
        let missing = missing_sections(partial);
        assert_eq!(missing.len(), 5);
        assert_eq!(missing[0], "3. Event Type");
    }
}

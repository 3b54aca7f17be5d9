use chrono::Local;

// Common text blocks for all prompts
pub const DONT_TELL_ME: &str = r#"
Important instructions for your responses:

1. Do not narrate or describe your actions.
2. Do not summarize or restate the instructions I've given you.
3. Do not preface your responses with phrases like "Here's a summary..." or "I will now..."
4. Do not acknowledge or confirm that you understand these instructions.
5. Avoid phrases like "As an AI language model..." or similar self-referential statements.
"#;

pub const NO_SPECULATION: &str = r#"
STRICT CONSTRAINT:
* Use ONLY facts stated in the article below.
* Do NOT introduce companies, people, figures, dates or events that the article does not mention.
* If the article does not contain the information a section asks for, write "Not stated in the article."
"#;

/// Utility function to get the current date in a human-readable format
pub fn current_date() -> String {
    let today = Local::now();
    format!(
        "{} {}, {}",
        today.format("%B"),
        today.format("%-d"),
        today.format("%Y")
    )
}

/// Date stamp used in the digest header.
pub fn header_date() -> String {
    Local::now().format("%Y-%m-%d").to_string()
}

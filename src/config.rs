//! Run configuration for the digest pipeline.
//!
//! Values come from the environment (see [`DigestConfig::from_env`]) and may be
//! overridden by command-line flags in the binary.

use anyhow::{anyhow, Result};
use std::fmt;
use std::str::FromStr;

use crate::environment::{
    get_env_var_any, get_env_var_as_vec, get_env_var_bool, get_env_var_parsed,
};
use crate::normalize::DEFAULT_MIN_SUMMARY_LENGTH;

pub const DEFAULT_TOPIC: &str = "AI";
pub const DEFAULT_TOP_N: usize = 3;
pub const DEFAULT_MIN_ARTICLES: usize = 3;
pub const DEFAULT_FETCH_LIMIT: usize = 20;
pub const DEFAULT_SOURCES: &str = "AI|us|;AI||ko";

/// One news query: any combination of a search string, a country code and a language code.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SourceQuery {
    pub query: Option<String>,
    pub region: Option<String>,
    pub language: Option<String>,
}

impl FromStr for SourceQuery {
    type Err = anyhow::Error;

    /// Parses `query|region|language`; trailing fields may be omitted and empty
    /// fields mean "unset".
    fn from_str(s: &str) -> Result<Self> {
        let parts: Vec<&str> = s.split('|').map(str::trim).collect();
        if parts.len() > 3 {
            return Err(anyhow!(
                "Invalid source {:?}: expected query|region|language",
                s
            ));
        }

        let field = |i: usize| {
            parts
                .get(i)
                .filter(|p| !p.is_empty())
                .map(|p| p.to_string())
        };
        let source = SourceQuery {
            query: field(0),
            region: field(1),
            language: field(2),
        };

        if source.query.is_none() && source.region.is_none() && source.language.is_none() {
            return Err(anyhow!("Invalid source {:?}: all fields are empty", s));
        }
        Ok(source)
    }
}

impl fmt::Display for SourceQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}|{}|{}",
            self.query.as_deref().unwrap_or(""),
            self.region.as_deref().unwrap_or(""),
            self.language.as_deref().unwrap_or("")
        )
    }
}

/// What to do with a selected article whose analysis call failed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum AnalysisFailurePolicy {
    /// Leave the article out of the digest and keep going.
    #[default]
    Skip,
    /// Keep the article's title with a short "analysis unavailable" note.
    Placeholder,
    /// Fail the whole run; nothing is delivered.
    Abort,
}

impl FromStr for AnalysisFailurePolicy {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "skip" => Ok(AnalysisFailurePolicy::Skip),
            "placeholder" => Ok(AnalysisFailurePolicy::Placeholder),
            "abort" => Ok(AnalysisFailurePolicy::Abort),
            other => Err(anyhow!(
                "Unknown analysis failure policy {:?} (expected skip, placeholder or abort)",
                other
            )),
        }
    }
}

#[derive(Clone, Debug)]
pub struct DigestConfig {
    /// Shown in the digest header.
    pub topic: String,
    pub top_n: usize,
    /// Below this many normalized articles the run stops with a diagnostic.
    pub min_articles: usize,
    pub min_summary_length: usize,
    /// Page size requested from each source.
    pub fetch_limit: usize,
    pub sources: Vec<SourceQuery>,
    pub analysis_failure_policy: AnalysisFailurePolicy,
    pub dry_run: bool,
}

impl Default for DigestConfig {
    fn default() -> Self {
        DigestConfig {
            topic: DEFAULT_TOPIC.to_string(),
            top_n: DEFAULT_TOP_N,
            min_articles: DEFAULT_MIN_ARTICLES,
            min_summary_length: DEFAULT_MIN_SUMMARY_LENGTH,
            fetch_limit: DEFAULT_FETCH_LIMIT,
            sources: parse_sources(DEFAULT_SOURCES).unwrap_or_default(),
            analysis_failure_policy: AnalysisFailurePolicy::default(),
            dry_run: false,
        }
    }
}

impl DigestConfig {
    /// Builds the configuration from `DIGEST_*` environment variables.
    pub fn from_env() -> Result<Self> {
        let defaults = DigestConfig::default();

        let sources = {
            let raw = get_env_var_as_vec("DIGEST_SOURCES", ';');
            if raw.is_empty() {
                defaults.sources
            } else {
                raw.iter()
                    .map(|s| s.parse())
                    .collect::<Result<Vec<SourceQuery>>>()?
            }
        };

        let analysis_failure_policy = match get_env_var_any(&["DIGEST_ANALYSIS_FAILURE"]) {
            Some(value) => value.parse()?,
            None => defaults.analysis_failure_policy,
        };

        let config = DigestConfig {
            topic: get_env_var_any(&["DIGEST_TOPIC"]).unwrap_or(defaults.topic),
            top_n: get_env_var_parsed("DIGEST_TOP_N", defaults.top_n)?,
            min_articles: get_env_var_parsed("DIGEST_MIN_ARTICLES", defaults.min_articles)?,
            min_summary_length: get_env_var_parsed(
                "DIGEST_MIN_SUMMARY_LENGTH",
                defaults.min_summary_length,
            )?,
            fetch_limit: get_env_var_parsed("DIGEST_FETCH_LIMIT", defaults.fetch_limit)?,
            sources,
            analysis_failure_policy,
            dry_run: get_env_var_bool("DIGEST_DRY_RUN", false)?,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.top_n == 0 {
            return Err(anyhow!("top_n must be at least 1"));
        }
        if self.fetch_limit == 0 {
            return Err(anyhow!("fetch_limit must be at least 1"));
        }
        if self.sources.is_empty() {
            return Err(anyhow!("At least one news source must be configured"));
        }
        Ok(())
    }
}

/// Parses a `;`-separated list of `query|region|language` sources.
pub fn parse_sources(value: &str) -> Result<Vec<SourceQuery>> {
    value
        .split(';')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::parse)
        .collect()
}

//! # news-digest
//!
//! Fetches headlines, lets a language model pick and analyze the most newsworthy ones,
//! and posts the result to a chat webhook. Runs once and exits; schedule it externally.
//!
//! ## Configuration
//!
//! - `NEWS_API_KEY`: NewsAPI key (required)
//! - `NEWS_API_BASE_URL`: NewsAPI base URL (default: "https://newsapi.org/v2")
//! - `DIGEST_WEBHOOK_URL` or `DISCORD_WEBHOOK`: Discord or Slack webhook (required unless `--dry-run`)
//! - `DIGEST_TOPIC`, `DIGEST_SOURCES`, `DIGEST_TOP_N`, `DIGEST_MIN_ARTICLES`,
//!   `DIGEST_MIN_SUMMARY_LENGTH`, `DIGEST_FETCH_LIMIT`, `DIGEST_ANALYSIS_FAILURE`
//! - `LLM_TYPE`: "ollama" or "openai" (default: "ollama")
//! - `LLM_MODEL`: model name
//! - `OLLAMA_HOST`, `OLLAMA_PORT`: Ollama endpoint (default: localhost:11434)
//! - `OPENAI_API_KEY`, `OPENAI_BASE_URL`: OpenAI-compatible endpoint
//!
//! Command-line flags override the corresponding environment values.

use anyhow::{anyhow, Context, Result};
use async_openai::{config::OpenAIConfig, Client as OpenAIClient};
use clap::Parser;
use ollama_rs::Ollama;
use std::env;
use std::sync::Arc;
use tracing::info;

use news_digest::config::{AnalysisFailurePolicy, DigestConfig, SourceQuery};
use news_digest::environment::{get_env_var_any, get_env_var_parsed};
use news_digest::logging::configure_logging;
use news_digest::news::{NewsApiClient, DEFAULT_NEWS_API_BASE_URL};
use news_digest::pipeline::{Capabilities, Pipeline, RunOutcome};
use news_digest::webhook::{StdoutDelivery, WebhookSender};
use news_digest::{Delivery, LLMClient, LLMParams};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Topic shown in the digest header
    #[arg(short, long)]
    topic: Option<String>,

    /// Number of articles to select and analyze
    #[arg(short = 'n', long)]
    top_n: Option<usize>,

    /// Minimum number of quality articles required to build a digest
    #[arg(long)]
    min_articles: Option<usize>,

    /// Minimum summary length, in characters, for an article to be kept
    #[arg(long)]
    min_summary_length: Option<usize>,

    /// News source as query|region|language (repeatable)
    #[arg(short, long = "source")]
    sources: Vec<SourceQuery>,

    /// What to do when an article's analysis fails: skip, placeholder or abort
    #[arg(long)]
    analysis_failure: Option<AnalysisFailurePolicy>,

    /// Print the digest instead of posting it
    #[arg(long)]
    dry_run: bool,

    /// Directory for rolling log files
    #[arg(long, default_value = "logs")]
    log_dir: String,
}

impl Args {
    fn apply(self, mut config: DigestConfig) -> Result<DigestConfig> {
        if let Some(topic) = self.topic {
            config.topic = topic;
        }
        if let Some(top_n) = self.top_n {
            config.top_n = top_n;
        }
        if let Some(min_articles) = self.min_articles {
            config.min_articles = min_articles;
        }
        if let Some(min_summary_length) = self.min_summary_length {
            config.min_summary_length = min_summary_length;
        }
        if !self.sources.is_empty() {
            config.sources = self.sources;
        }
        if let Some(policy) = self.analysis_failure {
            config.analysis_failure_policy = policy;
        }
        config.dry_run |= self.dry_run;
        config.validate()?;
        Ok(config)
    }
}

fn build_llm_params() -> Result<LLMParams> {
    let llm_type = env::var("LLM_TYPE").unwrap_or_else(|_| "ollama".to_string());

    let (llm_client, default_model) = match llm_type.to_lowercase().as_str() {
        "openai" => {
            let api_key = env::var("OPENAI_API_KEY")
                .context("OPENAI_API_KEY must be set when LLM_TYPE is openai")?;
            let mut config = OpenAIConfig::new().with_api_key(api_key);
            if let Some(base) = get_env_var_any(&["OPENAI_BASE_URL"]) {
                config = config.with_api_base(base);
            }
            (LLMClient::OpenAI(OpenAIClient::with_config(config)), "gpt-4o-mini")
        }
        "ollama" => {
            let host = env::var("OLLAMA_HOST").unwrap_or_else(|_| "localhost".to_string());
            let port: u16 = get_env_var_parsed("OLLAMA_PORT", 11434)?;
            let base_url = if host.starts_with("http://") || host.starts_with("https://") {
                host
            } else {
                format!("http://{}", host)
            };

            info!("Connecting to Ollama at {}:{}", base_url, port);
            (LLMClient::Ollama(Ollama::new(base_url, port)), "llama3.1")
        }
        other => return Err(anyhow!("Unknown LLM_TYPE {:?} (expected ollama or openai)", other)),
    };

    Ok(LLMParams {
        llm_client,
        model: get_env_var_any(&["LLM_MODEL"]).unwrap_or_else(|| default_model.to_string()),
    })
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    configure_logging(&args.log_dir);

    let config = args.apply(DigestConfig::from_env()?)?;

    let api_key = env::var("NEWS_API_KEY").context("NEWS_API_KEY environment variable required")?;
    let base_url = get_env_var_any(&["NEWS_API_BASE_URL"])
        .unwrap_or_else(|| DEFAULT_NEWS_API_BASE_URL.to_string());
    let source = NewsApiClient::with_base_url(api_key, &base_url)?;

    let delivery: Arc<dyn Delivery> = if config.dry_run {
        Arc::new(StdoutDelivery)
    } else {
        let webhook = get_env_var_any(&["DIGEST_WEBHOOK_URL", "DISCORD_WEBHOOK"])
            .context("DIGEST_WEBHOOK_URL environment variable required (or use --dry-run)")?;
        Arc::new(WebhookSender::new(&webhook)?)
    };

    let llm_params = build_llm_params()?;
    info!(
        "Building {} digest from {} sources with {} (top {})",
        config.topic,
        config.sources.len(),
        llm_params.model,
        config.top_n
    );

    let pipeline = Pipeline::new(
        config,
        Capabilities {
            source: Arc::new(source),
            model: Arc::new(llm_params),
            delivery,
        },
    );

    match pipeline.run().await? {
        RunOutcome::NoSourceData => info!("Run finished: no source data"),
        RunOutcome::InsufficientArticles { count } => {
            info!("Run finished: only {} quality articles", count)
        }
        RunOutcome::Delivered { articles } => {
            info!("Run finished: digest with {} articles delivered", articles)
        }
    }

    Ok(())
}

//! Fake capabilities shared by the unit tests.

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;

use crate::config::SourceQuery;
use crate::news::RawArticle;
use crate::normalize::NormalizedArticle;
use crate::{Delivery, DigestError, LanguageModel, NewsSource};

/// Replies with scripted responses in order and records every prompt it sees.
///
/// Once the script runs out, every further call fails with `ModelUnavailable`.
#[derive(Default)]
pub struct ScriptedModel {
    replies: Mutex<VecDeque<Result<String, DigestError>>>,
    pub prompts: Mutex<Vec<String>>,
}

impl ScriptedModel {
    pub fn new(replies: Vec<Result<String, DigestError>>) -> Self {
        ScriptedModel {
            replies: Mutex::new(replies.into()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn replying(replies: &[&str]) -> Self {
        Self::new(replies.iter().map(|r| Ok(r.to_string())).collect())
    }

    pub fn calls(&self) -> usize {
        self.prompts.lock().unwrap().len()
    }
}

#[async_trait]
impl LanguageModel for ScriptedModel {
    async fn complete(
        &self,
        prompt: &str,
        _max_tokens: u32,
        _temperature: f32,
    ) -> Result<String, DigestError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(DigestError::ModelUnavailable("script exhausted".into())))
    }
}

/// Serves one scripted batch per call, in order; calls beyond the script return nothing.
#[derive(Default)]
pub struct StaticSource {
    batches: Mutex<VecDeque<Result<Vec<RawArticle>, DigestError>>>,
    pub queries: Mutex<Vec<SourceQuery>>,
}

impl StaticSource {
    pub fn new(batches: Vec<Result<Vec<RawArticle>, DigestError>>) -> Self {
        StaticSource {
            batches: Mutex::new(batches.into()),
            queries: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> usize {
        self.queries.lock().unwrap().len()
    }
}

#[async_trait]
impl NewsSource for StaticSource {
    async fn fetch(
        &self,
        query: &SourceQuery,
        _limit: usize,
    ) -> Result<Vec<RawArticle>, DigestError> {
        self.queries.lock().unwrap().push(query.clone());
        self.batches
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(Vec::new()))
    }
}

#[derive(Default)]
pub struct RecordingDelivery {
    pub messages: Mutex<Vec<String>>,
}

impl RecordingDelivery {
    pub fn messages(&self) -> Vec<String> {
        self.messages.lock().unwrap().clone()
    }
}

#[async_trait]
impl Delivery for RecordingDelivery {
    async fn deliver(&self, text: &str) {
        self.messages.lock().unwrap().push(text.to_string());
    }
}

pub fn raw_article(title: &str) -> RawArticle {
    RawArticle {
        title: Some(title.to_string()),
        description: Some(format!(
            "{} was reported today with enough detail to analyze.",
            title
        )),
        url: Some(format!(
            "https://news.example.com/{}",
            title.to_lowercase().replace(' ', "-")
        )),
        ..RawArticle::default()
    }
}

pub fn normalized_article(title: &str) -> NormalizedArticle {
    NormalizedArticle {
        title: title.to_string(),
        summary_text: format!("{} was reported today with enough detail to analyze.", title),
        url: format!("https://news.example.com/{}", title.to_lowercase()),
    }
}

pub fn normalized_articles(count: usize) -> Vec<NormalizedArticle> {
    (0..count)
        .map(|i| normalized_article(&format!("Article {}", i)))
        .collect()
}

use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};
use std::time::Duration;
use tokio::time::timeout;
use tracing::{error, info};
use url::Url;

use crate::{Delivery, TARGET_WEB_REQUEST};

const DELIVERY_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WebhookKind {
    Discord,
    Slack,
}

impl WebhookKind {
    /// Slack incoming webhooks live on `hooks.slack.com`; anything else is treated as Discord.
    pub fn from_url(url: &Url) -> Self {
        match url.host_str() {
            Some("hooks.slack.com") => WebhookKind::Slack,
            _ => WebhookKind::Discord,
        }
    }

    /// Largest message, in characters, the platform accepts in one post.
    pub fn message_limit(self) -> usize {
        match self {
            WebhookKind::Discord => 2000,
            WebhookKind::Slack => 40000,
        }
    }

    fn payload(self, content: &str) -> Value {
        match self {
            WebhookKind::Discord => json!({ "content": content }),
            WebhookKind::Slack => json!({
                "text": content,
                "unfurl_links": false,
                "unfurl_media": false,
            }),
        }
    }
}

/// Posts messages to a chat webhook, splitting them to fit the platform limit.
pub struct WebhookSender {
    client: Client,
    url: Url,
    kind: WebhookKind,
}

impl WebhookSender {
    pub fn new(url: &str) -> anyhow::Result<Self> {
        let url = Url::parse(url.trim())
            .map_err(|e| anyhow::anyhow!("Invalid webhook URL: {}", e))?;
        let kind = WebhookKind::from_url(&url);
        Ok(Self::with_kind(url, kind))
    }

    pub fn with_kind(url: Url, kind: WebhookKind) -> Self {
        WebhookSender {
            client: Client::new(),
            url,
            kind,
        }
    }

    async fn post(&self, content: &str) {
        let payload = self.kind.payload(content);
        info!(target: TARGET_WEB_REQUEST, "Sending {:?} webhook with {} characters", self.kind, content.chars().count());

        let res = timeout(
            DELIVERY_TIMEOUT,
            self.client.post(self.url.clone()).json(&payload).send(),
        )
        .await;

        match res {
            Ok(Ok(response)) => {
                if response.status().is_success() {
                    info!(" ** Webhook message sent successfully");
                } else {
                    let status = response.status();
                    let error_text = response.text().await.unwrap_or_default();
                    error!(" !! Error sending webhook message ({}): {}", status, error_text);
                }
            }
            Ok(Err(err)) => {
                error!(" !! Error sending webhook message: {:?}", err);
            }
            Err(_) => {
                error!(
                    " !! Webhook request timed out after {} seconds",
                    DELIVERY_TIMEOUT.as_secs()
                );
            }
        }
    }
}

#[async_trait]
impl Delivery for WebhookSender {
    async fn deliver(&self, text: &str) {
        for chunk in split_message(text, self.kind.message_limit()) {
            self.post(&chunk).await;
        }
    }
}

/// Prints messages instead of posting them. Used for dry runs.
pub struct StdoutDelivery;

#[async_trait]
impl Delivery for StdoutDelivery {
    async fn deliver(&self, text: &str) {
        println!("{}\n", text);
    }
}

/// Splits `text` into chunks of at most `limit` characters.
///
/// Breaks fall on line boundaries where possible; a single line longer than `limit` is
/// cut at character boundaries. Chunks are never empty, so blank lines that would open a
/// chunk are dropped. Blank lines inside a chunk are kept.
pub fn split_message(text: &str, limit: usize) -> Vec<String> {
    let limit = limit.max(1);
    if text.chars().count() <= limit {
        return vec![text.to_string()];
    }

    let mut chunks = Vec::new();
    let mut current = String::new();
    let mut current_len = 0;

    for line in text.split('\n') {
        let line_len = line.chars().count();
        let needed = if current.is_empty() {
            line_len
        } else {
            current_len + 1 + line_len
        };

        if needed <= limit {
            if !current.is_empty() {
                current.push('\n');
                current_len += 1;
            }
            current.push_str(line);
            current_len += line_len;
            continue;
        }

        if !current.is_empty() {
            chunks.push(std::mem::take(&mut current));
            current_len = 0;
        }

        if line_len <= limit {
            current.push_str(line);
            current_len = line_len;
        } else {
            let chars: Vec<char> = line.chars().collect();
            let mut pieces = chars.chunks(limit).map(|c| c.iter().collect::<String>());
            let last = pieces.next_back().unwrap_or_default();
            chunks.extend(pieces);
            current_len = last.chars().count();
            current = last;
        }
    }

    if !current.is_empty() {
        chunks.push(current);
    }
    chunks
}

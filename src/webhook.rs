//! Webhook message types and delivery.
//!
//! [`MessageSink`] is the delivery seam the polling loop talks to;
//! [`WebhookClient`] is the production implementation, wrapping rendered
//! embeds in the webhook's JSON message shape and posting them. Delivery is
//! fire-and-forget from the core's perspective: a failed post is logged by
//! the caller and never retried.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use thiserror::Error;

use crate::config::WebhookConfig;

#[derive(Debug, Error)]
pub enum WebhookError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("webhook delivery failed with status {status}: {body}")]
    DeliveryFailed { status: u16, body: String },
}

pub type Result<T> = std::result::Result<T, WebhookError>;

/// One embed in a webhook message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WebhookEmbed {
    pub title: String,
    pub url: String,
    pub description: String,
    pub color: u32,
}

/// The full webhook payload: posting identity plus embeds.
#[derive(Debug, Clone, Serialize)]
pub struct WebhookMessage {
    pub username: String,
    pub avatar_url: String,
    pub embeds: Vec<WebhookEmbed>,
}

/// Destination for rendered change notifications.
#[async_trait]
pub trait MessageSink: Send + Sync {
    /// Deliver one batch of embeds as a single message. At most one attempt.
    async fn deliver(&self, embeds: Vec<WebhookEmbed>) -> Result<()>;
}

/// Posts messages to a webhook URL.
pub struct WebhookClient {
    client: Client,
    url: String,
    username: String,
    avatar_url: String,
}

impl WebhookClient {
    pub fn new(config: &WebhookConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("pagewatch/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(10))
            .build()?;

        Ok(Self {
            client,
            url: config.url.clone(),
            username: config.username.clone(),
            avatar_url: config.avatar_url.clone(),
        })
    }
}

#[async_trait]
impl MessageSink for WebhookClient {
    async fn deliver(&self, embeds: Vec<WebhookEmbed>) -> Result<()> {
        // An empty message is not a message.
        if embeds.is_empty() {
            return Ok(());
        }

        let message = WebhookMessage {
            username: self.username.clone(),
            avatar_url: self.avatar_url.clone(),
            embeds,
        };

        let response = self.client.post(&self.url).json(&message).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(WebhookError::DeliveryFailed {
                status: status.as_u16(),
                body,
            });
        }

        Ok(())
    }
}

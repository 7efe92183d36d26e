//! Page-database client.
//!
//! The polling loop only knows the [`PageStore`] trait: "give me the current
//! snapshot". [`HttpPageStore`] is the production implementation, querying a
//! remote page database over HTTP with bearer-token auth and following
//! cursor pagination until the full database has been read.

pub mod error;
pub mod parse;

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};
use tracing::debug;

use crate::config::StoreConfig;
use crate::model::Snapshot;

pub use error::{Result, StoreError};

/// Source of page snapshots. Implementations own fetching, pagination, and
/// auth; the core never sees any of it.
#[async_trait]
pub trait PageStore: Send + Sync {
    /// Fetch the full current state of the database.
    async fn fetch_snapshot(&self) -> Result<Snapshot>;
}

/// HTTP client for the remote page database's query endpoint.
pub struct HttpPageStore {
    client: Client,
    base_url: String,
    database_id: String,
    token: String,
}

impl HttpPageStore {
    pub fn new(config: &StoreConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("pagewatch/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            database_id: config.database_id.clone(),
            token: config.token.clone(),
        })
    }

    /// POST one query request, optionally resuming from a pagination cursor.
    async fn query_page(&self, cursor: Option<&str>) -> Result<Value> {
        let url = format!("{}/databases/{}/query", self.base_url, self.database_id);

        let mut body = json!({});
        if let Some(cursor) = cursor {
            body["start_cursor"] = json!(cursor);
        }

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.token)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(StoreError::Api {
                status: status.as_u16(),
                body,
            });
        }

        Ok(response.json().await?)
    }
}

#[async_trait]
impl PageStore for HttpPageStore {
    async fn fetch_snapshot(&self) -> Result<Snapshot> {
        let mut snapshot = Snapshot::new();
        let mut cursor: Option<String> = None;

        loop {
            let body = self.query_page(cursor.as_deref()).await?;
            let batch = parse::parse_query_response(&body)?;

            for page in batch.pages {
                snapshot.insert(page.id.clone(), page);
            }

            match batch.next_cursor {
                Some(next) => cursor = Some(next),
                None => break,
            }
        }

        debug!("fetched snapshot of {} pages", snapshot.len());
        Ok(snapshot)
    }
}

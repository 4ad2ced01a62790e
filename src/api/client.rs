use std::time::Duration;

use anyhow::{Context, Result};

use super::error::ApiError;
use super::types::{FeedItem, FeedPage, PageRequest};

pub const DEFAULT_ENDPOINT: &str = "http://localhost:8080";
const FEED_PATH: &str = "/shorts/feed";

/// HTTP client for the shorts Feed Service.
#[derive(Clone)]
pub struct FeedClient {
    http: reqwest::Client,
    base_url: String,
}

impl FeedClient {
    /// Create a client for `base_url`. Without a timeout a request runs until
    /// the transport gives up on its own.
    pub fn new(base_url: &str, timeout: Option<Duration>) -> Result<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build().context("Failed to create HTTP client")?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn feed_url(&self) -> String {
        format!("{}{}", self.base_url, FEED_PATH)
    }

    /// Fetch one page of the feed. An empty vector means the feed is exhausted.
    pub async fn fetch_page(&self, request: PageRequest) -> Result<Vec<FeedItem>, ApiError> {
        let page: FeedPage = self
            .http
            .get(self.feed_url())
            .query(&[("page", request.page), ("size", request.size)])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(page.content)
    }
}

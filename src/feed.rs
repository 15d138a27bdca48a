use axum::body::Bytes;
use reqwest::{Client, StatusCode};
use std::time::{Duration, Instant};
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{debug, info};

#[derive(Debug, Error)]
pub enum FeedError {
    #[error("feed request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("feed returned HTTP {0}")]
    Status(StatusCode),
    #[error("feed payload is not a time series: {0}")]
    Parse(#[from] serde_json::Error),
}

struct CachedBody {
    fetched_at: Instant,
    body: Bytes,
}

/// Fetches the upstream JSON feed, reusing a successful body for `max_age`.
pub struct FeedClient {
    client: Client,
    url: String,
    max_age: Duration,
    cache: Mutex<Option<CachedBody>>,
}

impl FeedClient {
    pub fn new(url: impl Into<String>, max_age: Duration) -> Self {
        Self {
            client: Client::new(),
            url: url.into(),
            max_age,
            cache: Mutex::new(None),
        }
    }

    pub fn max_age(&self) -> Duration {
        self.max_age
    }

    /// Cached body while fresh, otherwise a new upstream GET. The cache lock
    /// is not held across the request.
    pub async fn fetch(&self) -> Result<Bytes, FeedError> {
        if let Some(body) = self.fresh_body().await {
            debug!("serving feed from cache");
            return Ok(body);
        }

        let response = self.client.get(&self.url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(FeedError::Status(status));
        }
        let body = response.bytes().await?;
        info!("fetched {} bytes from {}", body.len(), self.url);

        *self.cache.lock().await = Some(CachedBody {
            fetched_at: Instant::now(),
            body: body.clone(),
        });
        Ok(body)
    }

    async fn fresh_body(&self) -> Option<Bytes> {
        let cache = self.cache.lock().await;
        cache
            .as_ref()
            .filter(|cached| cached.fetched_at.elapsed() < self.max_age)
            .map(|cached| cached.body.clone())
    }

    /// Forces the next fetch to go upstream.
    pub async fn invalidate(&self) {
        self.cache.lock().await.take();
    }
}

use crate::feed::{FeedClient, FeedError};
use crate::series::Series;
use axum::body::Bytes;
use serde::de::IgnoredAny;
use serde_json::Value;
use tracing::error;

const EMPTY_ARRAY: &[u8] = b"[]";

/// Owns the feed client and hands out fresh [`Series`] values.
pub struct SeriesRepository {
    feed: FeedClient,
}

impl SeriesRepository {
    pub fn new(feed: FeedClient) -> Self {
        Self { feed }
    }

    pub fn feed(&self) -> &FeedClient {
        &self.feed
    }

    /// Current series, or an empty one when the feed cannot be fetched or
    /// parsed. Failures are logged and go no further.
    pub async fn load(&self) -> Series {
        match self.try_load().await {
            Ok(series) => series,
            Err(err) => {
                error!("failed to load gym data: {err}");
                Series::default()
            }
        }
    }

    pub async fn try_load(&self) -> Result<Series, FeedError> {
        let body = self.feed.fetch().await?;
        Series::from_slice(&body)
    }

    /// Upstream body exactly as fetched, provided it is a JSON array;
    /// `[]` otherwise.
    pub async fn load_raw(&self) -> Bytes {
        match self.try_load_raw().await {
            Ok(body) => body,
            Err(err) => {
                error!("failed to load gym data: {err}");
                Bytes::from_static(EMPTY_ARRAY)
            }
        }
    }

    pub async fn try_load_raw(&self) -> Result<Bytes, FeedError> {
        let body = self.feed.fetch().await?;
        serde_json::from_slice::<Vec<IgnoredAny>>(&body)?;
        Ok(body)
    }

    /// Last element of the upstream array, untouched.
    pub async fn latest_raw(&self) -> Option<Value> {
        let body = self.load_raw().await;
        serde_json::from_slice::<Vec<Value>>(&body).ok()?.pop()
    }

    pub async fn reload(&self) -> Series {
        self.feed.invalidate().await;
        self.load().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::spawn_upstream;
    use serde_json::json;
    use std::time::Duration;

    const FEED: &str = r#"[
        {"timestamp": "2024-01-01T09:00:00", "source": "scraper", "gyms": [
            {"name": "A", "percentage_full": 40, "extra": 1}
        ]},
        7,
        {"timestamp": "2024-01-01T10:00:00", "gyms": [{"name": "A", "percentage_full": 55}]}
    ]"#;

    fn repository(url: &str) -> SeriesRepository {
        SeriesRepository::new(FeedClient::new(url, Duration::from_secs(300)))
    }

    #[tokio::test]
    async fn load_degrades_to_empty_series() {
        let repository = repository("http://127.0.0.1:1/gym_capacity_data.json");
        assert!(repository.try_load().await.is_err());
        let series = repository.load().await;
        assert!(series.is_empty());
        assert!(series.latest().is_none());
        assert!(series.locations().is_empty());
        assert_eq!(series.latest_occupancy("A"), 0.0);

        assert_eq!(&repository.load_raw().await[..], b"[]");
        assert!(repository.latest_raw().await.is_none());
    }

    #[tokio::test]
    async fn raw_body_is_passed_through_unchanged() {
        let upstream = spawn_upstream(FEED).await;
        let repository = repository(&upstream.url);

        let body = repository.load_raw().await;
        assert_eq!(&body[..], FEED.as_bytes());

        let latest = repository.latest_raw().await.unwrap();
        assert_eq!(latest["gyms"][0]["percentage_full"], json!(55));

        let series = repository.load().await;
        assert_eq!(series.len(), 2);
        assert_eq!(upstream.hits(), 1);
    }

    #[tokio::test]
    async fn non_array_body_is_not_passed_through() {
        let upstream = spawn_upstream(r#"{"error": "rate limited"}"#).await;
        let repository = repository(&upstream.url);

        assert!(repository.try_load_raw().await.is_err());
        assert_eq!(&repository.load_raw().await[..], b"[]");
        assert!(repository.load().await.is_empty());
    }
}

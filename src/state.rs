use crate::config::Config;
use crate::feed::FeedClient;
use crate::repository::SeriesRepository;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub repository: Arc<SeriesRepository>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let feed = FeedClient::new(config.feed_url.clone(), config.max_age);
        Self {
            config: Arc::new(config),
            repository: Arc::new(SeriesRepository::new(feed)),
        }
    }
}

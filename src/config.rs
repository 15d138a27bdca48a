use chrono::{FixedOffset, Offset, Utc};
use std::{env, time::Duration};
use thiserror::Error;

pub const DEFAULT_FEED_URL: &str =
    "https://raw.githubusercontent.com/tortillatiff/gym-scraper/main/gym_capacity_data.json";

pub const DEFAULT_PINNED: [&str; 2] = ["ActiveSG Gym @ Ang Mo Kio CC", "Yio Chu Kang ActiveSG Gym"];

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{name} is not a valid value: {value:?}")]
    Invalid { name: &'static str, value: String },
}

/// Inclusive range of tracked hours shown on the heatmap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HourWindow {
    pub start: u32,
    pub end: u32,
}

impl HourWindow {
    pub fn new(start: u32, end: u32) -> Option<Self> {
        (start <= end && end <= 23).then_some(Self { start, end })
    }

    pub fn hours(&self) -> impl Iterator<Item = u32> {
        self.start..=self.end
    }

    pub fn index_of(&self, hour: u32) -> Option<usize> {
        (self.start..=self.end)
            .contains(&hour)
            .then(|| (hour - self.start) as usize)
    }

    fn parse(value: &str) -> Option<Self> {
        let (start, end) = value.split_once('-')?;
        Self::new(start.trim().parse().ok()?, end.trim().parse().ok()?)
    }
}

impl Default for HourWindow {
    fn default() -> Self {
        Self { start: 7, end: 22 }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub feed_url: String,
    pub max_age: Duration,
    pub utc_offset: FixedOffset,
    pub hours: HourWindow,
    pub default_pinned: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 8080,
            feed_url: DEFAULT_FEED_URL.to_string(),
            max_age: Duration::from_secs(300),
            utc_offset: sgt(),
            hours: HourWindow::default(),
            default_pinned: DEFAULT_PINNED.iter().map(|name| name.to_string()).collect(),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(value) = lookup("PORT") {
            config.port = value.parse().map_err(|_| invalid("PORT", &value))?;
        }
        if let Some(value) = lookup("GYM_FEED_URL") {
            config.feed_url = value;
        }
        if let Some(value) = lookup("GYM_FEED_MAX_AGE_SECS") {
            let secs: u64 = value
                .parse()
                .map_err(|_| invalid("GYM_FEED_MAX_AGE_SECS", &value))?;
            config.max_age = Duration::from_secs(secs);
        }
        if let Some(value) = lookup("GYM_FEED_UTC_OFFSET") {
            config.utc_offset = value
                .parse()
                .map_err(|_| invalid("GYM_FEED_UTC_OFFSET", &value))?;
        }
        if let Some(value) = lookup("GYM_HEATMAP_HOURS") {
            config.hours =
                HourWindow::parse(&value).ok_or_else(|| invalid("GYM_HEATMAP_HOURS", &value))?;
        }
        if let Some(value) = lookup("GYM_DEFAULT_PINNED") {
            config.default_pinned = value
                .split(';')
                .map(str::trim)
                .filter(|name| !name.is_empty())
                .map(str::to_string)
                .collect();
        }

        Ok(config)
    }
}

fn sgt() -> FixedOffset {
    FixedOffset::east_opt(8 * 3600).unwrap_or(Utc.fix())
}

fn invalid(name: &'static str, value: &str) -> ConfigError {
    ConfigError::Invalid {
        name,
        value: value.to_string(),
    }
}

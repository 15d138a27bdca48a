use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use tracing::warn;

/// One location's occupancy reading inside a [`TimePoint`].
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Snapshot {
    #[serde(default, deserialize_with = "lenient_string")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient_number")]
    pub percentage_full: f64,
    #[serde(
        default,
        deserialize_with = "lenient_opt_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub timestamp: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient_opt_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub status: Option<String>,
}

/// One timestamped batch of snapshots across all tracked locations.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct TimePoint {
    #[serde(default, deserialize_with = "lenient_string")]
    pub timestamp: String,
    #[serde(default, deserialize_with = "lenient_snapshots")]
    pub gyms: Vec<Snapshot>,
}

impl TimePoint {
    /// First snapshot recorded for `name`, if any.
    pub fn find(&self, name: &str) -> Option<&Snapshot> {
        self.gyms.iter().find(|gym| gym.name == name)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HistoryEntry {
    pub timestamp: String,
    pub gym: Snapshot,
}

/// Day-of-week by hour-of-day average occupancy. `None` marks a bucket
/// that no time point fell into.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Grid {
    pub days: Vec<String>,
    pub hours: Vec<u32>,
    pub data: Vec<Vec<Option<i64>>>,
}

impl Grid {
    pub fn cell(&self, day: &str, hour: u32) -> Option<Option<i64>> {
        let row = self.days.iter().position(|label| label == day)?;
        let col = self.hours.iter().position(|h| *h == hour)?;
        Some(self.data[row][col])
    }
}

#[derive(Debug, Deserialize)]
pub struct PinRequest {
    pub name: String,
}

#[derive(Debug, Deserialize, Default)]
pub struct HeatmapQuery {
    #[serde(default)]
    pub gym: String,
}

#[derive(Debug, Deserialize, Default)]
pub struct IndexQuery {
    #[serde(default)]
    pub reload: bool,
}

// Feed fields are read leniently: a wrong-typed or null value falls back
// to a default instead of failing the whole record.

fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(text) => text,
        Value::Null => String::new(),
        other => other.to_string(),
    })
}

fn lenient_opt_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(text) => Some(text),
        _ => None,
    })
}

fn lenient_number<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Number(number) => number.as_f64().unwrap_or_default(),
        Value::String(text) => text.trim().parse().unwrap_or_default(),
        _ => 0.0,
    })
}

fn lenient_snapshots<'de, D>(deserializer: D) -> Result<Vec<Snapshot>, D::Error>
where
    D: Deserializer<'de>,
{
    let Value::Array(items) = Value::deserialize(deserializer)? else {
        return Ok(Vec::new());
    };
    Ok(items
        .into_iter()
        .filter_map(|item| match serde_json::from_value(item) {
            Ok(gym) => Some(gym),
            Err(err) => {
                warn!("skipping malformed gym reading: {err}");
                None
            }
        })
        .collect())
}

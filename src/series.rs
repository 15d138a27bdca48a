use crate::feed::FeedError;
use crate::models::{HistoryEntry, TimePoint};
use serde_json::Value;
use std::collections::BTreeSet;
use tracing::warn;

/// Time points in the order the producer supplied them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Series {
    points: Vec<TimePoint>,
}

impl Series {
    pub fn new(points: Vec<TimePoint>) -> Self {
        Self { points }
    }

    /// Parses a feed body. The top level must be an array; elements that are
    /// not time-point shaped are skipped.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, FeedError> {
        let raw: Vec<Value> = serde_json::from_slice(bytes)?;
        let total = raw.len();
        let points: Vec<TimePoint> = raw
            .into_iter()
            .filter_map(|value| match serde_json::from_value(value) {
                Ok(point) => Some(point),
                Err(err) => {
                    warn!("skipping malformed feed entry: {err}");
                    None
                }
            })
            .collect();
        if points.len() != total {
            warn!("kept {} of {total} feed entries", points.len());
        }
        Ok(Self { points })
    }

    pub fn points(&self) -> &[TimePoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn latest(&self) -> Option<&TimePoint> {
        self.points.last()
    }

    /// Every distinct location name seen anywhere in the series.
    pub fn locations(&self) -> BTreeSet<String> {
        self.points
            .iter()
            .flat_map(|point| point.gyms.iter().map(|gym| gym.name.clone()))
            .collect()
    }

    /// Occupancy of `name` in the latest time point, 0 when unknown.
    pub fn latest_occupancy(&self, name: &str) -> f64 {
        self.latest()
            .and_then(|point| point.find(name))
            .map(|gym| gym.percentage_full)
            .filter(|value| !value.is_nan())
            .unwrap_or(0.0)
    }

    /// Readings for one location; time points without it are dropped.
    pub fn history(&self, name: &str) -> Vec<HistoryEntry> {
        self.points
            .iter()
            .filter_map(|point| {
                point.find(name).map(|gym| HistoryEntry {
                    timestamp: point.timestamp.clone(),
                    gym: gym.clone(),
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FEED: &str = r#"[
        {"timestamp": "2024-01-01T09:00:00", "gyms": [
            {"name": "A", "percentage_full": 40, "timestamp": "2024-01-01T09:00:00", "status": "Medium"},
            {"name": "B", "percentage_full": 10, "status": "Low"}
        ]},
        {"timestamp": "2024-01-01T10:00:00", "gyms": [
            {"name": "B", "percentage_full": 20}
        ]},
        {"timestamp": "2024-01-01T11:00:00", "gyms": [
            {"name": "A", "percentage_full": 75},
            {"name": "B", "percentage_full": 5}
        ]}
    ]"#;

    fn series() -> Series {
        Series::from_slice(FEED.as_bytes()).unwrap()
    }

    #[test]
    fn parses_points_in_supplied_order() {
        let series = series();
        assert_eq!(series.len(), 3);
        assert_eq!(series.latest().unwrap().timestamp, "2024-01-01T11:00:00");
    }

    #[test]
    fn rejects_non_array_payload() {
        assert!(Series::from_slice(br#"{"gyms": []}"#).is_err());
        assert!(Series::from_slice(b"not json").is_err());
    }

    #[test]
    fn skips_entries_that_are_not_objects() {
        let series = Series::from_slice(br#"[1, {"timestamp": "x"}, "y"]"#).unwrap();
        assert_eq!(series.len(), 1);
    }

    #[test]
    fn bad_reading_keeps_the_rest_of_its_time_point() {
        let series = Series::from_slice(
            br#"[{"timestamp": "2024-01-01T09:00:00", "gyms": [
                {"name": null, "percentage_full": 10},
                {"name": "A", "percentage_full": 50}
            ]}, {"timestamp": "2024-01-08T09:00:00", "gyms": null}]"#,
        )
        .unwrap();
        assert_eq!(series.len(), 2);
        assert_eq!(series.points()[0].gyms.len(), 2);
        assert_eq!(series.latest_occupancy("A"), 0.0);

        let grid = crate::heatmap::build_grid(
            &series,
            "A",
            crate::config::HourWindow::default(),
            chrono::FixedOffset::east_opt(8 * 3600).unwrap(),
        );
        assert_eq!(grid.cell("Mon", 9), Some(Some(25)));
    }

    #[test]
    fn locations_are_distinct() {
        let names: Vec<String> = series().locations().into_iter().collect();
        assert_eq!(names, vec!["A", "B"]);
    }

    #[test]
    fn latest_occupancy_falls_back_to_zero() {
        let series = series();
        assert_eq!(series.latest_occupancy("A"), 75.0);
        assert_eq!(series.latest_occupancy("C"), 0.0);
        assert_eq!(Series::default().latest_occupancy("A"), 0.0);
    }

    #[test]
    fn history_drops_points_without_location() {
        let history = series().history("A");
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].gym.percentage_full, 40.0);
        assert_eq!(history[1].timestamp, "2024-01-01T11:00:00");
        assert!(series().history("C").is_empty());
    }
}

use crate::calendar::{bucket, display_row, DAY_AXIS};
use crate::config::HourWindow;
use crate::models::Grid;
use crate::series::Series;
use chrono::FixedOffset;

/// Average occupancy of `name` per (day, hour) bucket.
///
/// A bucket with no time points is `None`. A time point that falls in a
/// bucket but has no reading for `name` still counts, contributing 0.
pub fn build_grid(series: &Series, name: &str, hours: HourWindow, offset: FixedOffset) -> Grid {
    let columns = hours.hours().count();
    let mut sums = vec![vec![0.0f64; columns]; DAY_AXIS.len()];
    let mut counts = vec![vec![0u32; columns]; DAY_AXIS.len()];

    for point in series.points() {
        let Some((day_of_week, hour)) = bucket(&point.timestamp, offset) else {
            continue;
        };
        let (Some(row), Some(col)) = (display_row(day_of_week), hours.index_of(hour)) else {
            continue;
        };
        counts[row][col] += 1;
        sums[row][col] += point.find(name).map_or(0.0, |gym| gym.percentage_full);
    }

    let data = sums
        .iter()
        .zip(&counts)
        .map(|(row_sums, row_counts)| {
            row_sums
                .iter()
                .zip(row_counts)
                .map(|(sum, count)| (*count > 0).then(|| round_half_up(sum / f64::from(*count))))
                .collect()
        })
        .collect();

    Grid {
        days: DAY_AXIS.iter().map(|(label, _)| label.to_string()).collect(),
        hours: hours.hours().collect(),
        data,
    }
}

fn round_half_up(value: f64) -> i64 {
    (value + 0.5).floor() as i64
}

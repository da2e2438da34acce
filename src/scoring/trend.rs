//! Trend of a reading series.

use crate::telemetry::Reading;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TrendDirection {
    Rising,
    Falling,
    Stable,
    /// Not enough readings to tell
    Unknown,
}

impl TrendDirection {
    pub fn classify(change_percent: Option<f64>, stable_band_percent: f64) -> Self {
        match change_percent {
            Some(pct) if pct > stable_band_percent => TrendDirection::Rising,
            Some(pct) if pct < -stable_band_percent => TrendDirection::Falling,
            Some(_) => TrendDirection::Stable,
            None => TrendDirection::Unknown,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            TrendDirection::Rising => "rising",
            TrendDirection::Falling => "falling",
            TrendDirection::Stable => "stable",
            TrendDirection::Unknown => "unknown",
        }
    }
}

/// Percent change from the newest reading at least `window` older than the
/// latest one (or the oldest reading) to the latest.
///
/// `readings` must be chronological. Returns `None` when there are no
/// readings or the base value is not positive.
pub fn change_percent(readings: &[Reading], window: chrono::Duration) -> Option<f64> {
    let latest = readings.last()?;
    let cutoff = latest.timestamp - window;
    let base = readings
        .iter()
        .rev()
        .find(|r| r.timestamp <= cutoff)
        .unwrap_or(&readings[0]);

    if base.value <= 0.0 {
        return None;
    }
    Some((latest.value - base.value) / base.value * 100.0)
}

/// Score adjustment for a trend.
///
/// Below the target range a rise is welcome; elsewhere a drop is.
pub fn trend_bonus(change_percent: f64, below_low: bool) -> f64 {
    if below_low {
        if change_percent >= 8.0 {
            0.25
        } else if change_percent >= 3.0 {
            0.1
        } else if change_percent <= -8.0 {
            -0.25
        } else {
            0.0
        }
    } else if change_percent <= -20.0 {
        0.5
    } else if change_percent <= -8.0 {
        0.25
    } else if change_percent >= 20.0 {
        -0.5
    } else if change_percent >= 8.0 {
        -0.25
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn series(points: &[(u32, f64)]) -> Vec<Reading> {
        points
            .iter()
            .map(|&(hour, value)| Reading {
                timestamp: Utc.with_ymd_and_hms(2024, 1, 15, hour, 0, 0).unwrap(),
                value,
            })
            .collect()
    }

    #[test]
    fn test_change_uses_sample_outside_window() {
        let readings = series(&[(0, 1000.0), (2, 1100.0), (9, 1200.0), (12, 1320.0)]);
        // Newest sample at or before 04:00 is the 02:00 one.
        let pct = change_percent(&readings, chrono::Duration::hours(8)).unwrap();
        assert!((pct - 20.0).abs() < 1e-9);
    }

    #[test]
    fn test_change_falls_back_to_first_sample() {
        let readings = series(&[(10, 1000.0), (12, 900.0)]);
        let pct = change_percent(&readings, chrono::Duration::hours(8)).unwrap();
        assert!((pct + 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_change_undefined_cases() {
        assert_eq!(change_percent(&[], chrono::Duration::hours(8)), None);
        let zero_base = series(&[(0, 0.0), (12, 50.0)]);
        assert_eq!(change_percent(&zero_base, chrono::Duration::hours(8)), None);
    }

    #[test]
    fn test_recovery_bonus_below_target() {
        assert_eq!(trend_bonus(10.0, true), 0.25);
        assert_eq!(trend_bonus(5.0, true), 0.1);
        assert_eq!(trend_bonus(1.0, true), 0.0);
        assert_eq!(trend_bonus(-9.0, true), -0.25);
    }

    #[test]
    fn test_dropping_bonus_in_or_above_target() {
        assert_eq!(trend_bonus(-25.0, false), 0.5);
        assert_eq!(trend_bonus(-10.0, false), 0.25);
        assert_eq!(trend_bonus(0.0, false), 0.0);
        assert_eq!(trend_bonus(10.0, false), -0.25);
        assert_eq!(trend_bonus(30.0, false), -0.5);
    }

    #[test]
    fn test_direction_band() {
        assert_eq!(TrendDirection::classify(Some(0.5), 1.0), TrendDirection::Stable);
        assert_eq!(TrendDirection::classify(Some(1.5), 1.0), TrendDirection::Rising);
        assert_eq!(TrendDirection::classify(Some(-1.5), 1.0), TrendDirection::Falling);
        assert_eq!(TrendDirection::classify(None, 1.0), TrendDirection::Unknown);
    }
}

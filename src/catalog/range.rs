//! Target operating ranges such as `"1500-7500 cfs"` or `"4.0-6.0 ft"`.

use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// Measurement unit of a gauge reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Unit {
    /// Discharge, cubic feet per second
    Cfs,
    /// Gauge height, feet
    Feet,
}

impl Unit {
    pub fn suffix(&self) -> &'static str {
        match self {
            Unit::Cfs => "cfs",
            Unit::Feet => "ft",
        }
    }
}

/// The band of readings considered ideal for a site.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TargetRange {
    pub low: f64,
    pub high: f64,
    pub unit: Unit,
}

impl TargetRange {
    pub fn new(low: f64, high: f64, unit: Unit) -> Self {
        Self { low, high, unit }
    }

    /// A range the flow index cannot be computed against.
    pub fn is_degenerate(&self) -> bool {
        self.low <= 0.0 || self.high <= 0.0 || self.high < self.low
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.low && value <= self.high
    }
}

impl fmt::Display for TargetRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{} {}", self.low, self.high, self.unit.suffix())
    }
}

impl FromStr for TargetRange {
    type Err = String;

    /// Parses `"<low>-<high> <unit>"`; the unit is `cfs` or `ft`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim().to_lowercase();
        let (numbers, unit) = if let Some(rest) = trimmed.strip_suffix("cfs") {
            (rest, Unit::Cfs)
        } else if let Some(rest) = trimmed.strip_suffix("ft") {
            (rest, Unit::Feet)
        } else {
            return Err("expected a 'cfs' or 'ft' unit".to_string());
        };

        let (low, high) = numbers
            .trim()
            .split_once('-')
            .ok_or_else(|| "expected '<low>-<high>'".to_string())?;
        let low: f64 = low
            .trim()
            .parse()
            .map_err(|_| format!("'{}' is not a number", low.trim()))?;
        let high: f64 = high
            .trim()
            .parse()
            .map_err(|_| format!("'{}' is not a number", high.trim()))?;

        if !low.is_finite() || !high.is_finite() {
            return Err("bounds must be finite".to_string());
        }

        Ok(TargetRange::new(low, high, unit))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_cfs_range() {
        let range: TargetRange = "250-1200 cfs".parse().unwrap();
        assert_eq!(range, TargetRange::new(250.0, 1200.0, Unit::Cfs));
    }

    #[test]
    fn test_parse_feet_range() {
        let range: TargetRange = "4.0-6.0 ft".parse().unwrap();
        assert_eq!(range, TargetRange::new(4.0, 6.0, Unit::Feet));
    }

    #[test]
    fn test_parse_tolerates_case_and_spacing() {
        let range: TargetRange = "  800 - 4000CFS ".parse().unwrap();
        assert_eq!(range, TargetRange::new(800.0, 4000.0, Unit::Cfs));
    }

    #[test]
    fn test_parse_rejects_missing_unit() {
        assert!("250-1200".parse::<TargetRange>().is_err());
    }

    #[test]
    fn test_parse_rejects_missing_bound() {
        assert!("1200 cfs".parse::<TargetRange>().is_err());
        assert!("-1200 cfs".parse::<TargetRange>().is_err());
        assert!("abc-1200 cfs".parse::<TargetRange>().is_err());
    }

    #[test]
    fn test_degenerate_ranges() {
        assert!(TargetRange::new(0.0, 100.0, Unit::Cfs).is_degenerate());
        assert!(TargetRange::new(100.0, 0.0, Unit::Cfs).is_degenerate());
        assert!(TargetRange::new(500.0, 100.0, Unit::Cfs).is_degenerate());
        assert!(!TargetRange::new(100.0, 100.0, Unit::Cfs).is_degenerate());
    }

    #[test]
    fn test_display_format() {
        let range = TargetRange::new(3.5, 7.5, Unit::Feet);
        assert_eq!(range.to_string(), "3.5-7.5 ft");
    }
}

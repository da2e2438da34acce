//! Condition scoring.
//!
//! Turns a site's readings and its region's forecast into a 0-5
//! desirability score. Scoring never fails: missing or malformed inputs
//! fall back to neutral values and are reflected in the status label.

pub mod flow;
pub mod trend;

pub use flow::FlowBand;
pub use trend::TrendDirection;

use crate::catalog::{Catalog, Site};
use crate::config::ScoringConfig;
use crate::telemetry::{ConditionSnapshot, Precipitation, Reading};
use serde::Serialize;
use std::fmt;

pub const MAX_SCORE: f64 = 5.0;
/// Score for a site with neither readings nor a forecast
pub const NO_DATA_SCORE: f64 = 2.5;
const RISING_ESTIMATE: f64 = 1.0;
const STABLE_ESTIMATE: f64 = 2.0;

/// Human-facing condition of a site.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConditionStatus {
    Closed,
    NoData,
    RisingEstimated,
    StableEstimated,
    /// Latest reading is under the site's absolute minimum
    Unusable,
    Low,
    InShape,
    SlightlyHigh,
    High,
    BlownOut,
    /// Target range is not usable
    Unknown,
}

impl ConditionStatus {
    pub fn label(&self) -> &'static str {
        match self {
            ConditionStatus::Closed => "closed",
            ConditionStatus::NoData => "no data",
            ConditionStatus::RisingEstimated => "rising (estimated)",
            ConditionStatus::StableEstimated => "low/stable (estimated)",
            ConditionStatus::Unusable => "too low",
            ConditionStatus::Low => "low",
            ConditionStatus::InShape => "in shape",
            ConditionStatus::SlightlyHigh => "slightly high",
            ConditionStatus::High => "high",
            ConditionStatus::BlownOut => "blown out",
            ConditionStatus::Unknown => "unknown",
        }
    }

    /// Whether the status is backed by gauge readings.
    pub fn is_measured(&self) -> bool {
        !matches!(
            self,
            ConditionStatus::Closed
                | ConditionStatus::NoData
                | ConditionStatus::RisingEstimated
                | ConditionStatus::StableEstimated
        )
    }
}

impl fmt::Display for ConditionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl From<FlowBand> for ConditionStatus {
    fn from(band: FlowBand) -> Self {
        match band {
            FlowBand::Low => ConditionStatus::Low,
            FlowBand::InRange => ConditionStatus::InShape,
            FlowBand::SlightlyHigh => ConditionStatus::SlightlyHigh,
            FlowBand::High => ConditionStatus::High,
            FlowBand::BlownOut => ConditionStatus::BlownOut,
            FlowBand::Degenerate => ConditionStatus::Unknown,
        }
    }
}

/// Composite score with its breakdown.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Score {
    /// Final score in [0, 5]
    pub total: f64,
    /// Flow contribution (5 x flow index)
    pub flow: f64,
    pub trend: f64,
    pub weather: f64,
    pub behavior: f64,
    pub status: ConditionStatus,
    pub direction: TrendDirection,
    pub latest: Option<f64>,
    pub change_percent: Option<f64>,
}

impl Score {
    fn fixed(total: f64, status: ConditionStatus) -> Self {
        Self {
            total,
            flow: 0.0,
            trend: 0.0,
            weather: 0.0,
            behavior: 0.0,
            status,
            direction: TrendDirection::Unknown,
            latest: None,
            change_percent: None,
        }
    }
}

/// Score adjustment for the forecast bucket.
pub fn weather_bonus(precipitation: Precipitation) -> f64 {
    match precipitation {
        Precipitation::Dry => 0.5,
        Precipitation::Trace => 0.0,
        Precipitation::Light => -0.25,
        Precipitation::Moderate => -0.75,
        Precipitation::Heavy => -1.0,
        Precipitation::Unclassified => 0.0,
    }
}

/// A site together with its score, in catalog order.
#[derive(Debug, Clone, Serialize)]
pub struct SiteScore {
    pub site_id: String,
    pub region: String,
    pub score: Score,
}

/// Pure scoring function parameterised by [`ScoringConfig`].
#[derive(Debug, Clone, Default)]
pub struct Scorer {
    config: ScoringConfig,
}

impl Scorer {
    pub fn new(config: ScoringConfig) -> Self {
        Self { config }
    }

    /// Score one site.
    ///
    /// `readings` may be unsorted or contain junk; non-finite and negative
    /// values are dropped before scoring.
    pub fn score(
        &self,
        site: &Site,
        readings: &[Reading],
        forecast: Option<Precipitation>,
    ) -> Score {
        if site.closed {
            return Score::fixed(0.0, ConditionStatus::Closed);
        }

        let mut clean: Vec<Reading> = readings
            .iter()
            .copied()
            .filter(|r| r.value.is_finite() && r.value >= 0.0)
            .collect();
        clean.sort_by_key(|r| r.timestamp);

        let Some(latest) = clean.last().map(|r| r.value) else {
            return match forecast {
                Some(p) if p.is_significant() => {
                    Score::fixed(RISING_ESTIMATE, ConditionStatus::RisingEstimated)
                }
                Some(_) => Score::fixed(STABLE_ESTIMATE, ConditionStatus::StableEstimated),
                None => Score::fixed(NO_DATA_SCORE, ConditionStatus::NoData),
            };
        };

        let window = chrono::Duration::hours(i64::from(self.config.trend_window_hours));
        let change = trend::change_percent(&clean, window);
        let direction = TrendDirection::classify(change, self.config.stable_band_percent);

        if latest < site.minimum {
            return Score {
                latest: Some(latest),
                change_percent: change,
                direction,
                ..Score::fixed(0.0, ConditionStatus::Unusable)
            };
        }

        let (index, band) = flow::flow_index(latest, site.minimum, &site.target);
        let below_low = band == FlowBand::Low;
        let flow = MAX_SCORE * index;
        let trend = change.map_or(0.0, |pct| trend::trend_bonus(pct, below_low));
        let weather = forecast.map_or(0.0, weather_bonus);
        let behavior = flow::behavior_bonus(site.behavior, index);

        Score {
            total: (flow + trend + weather + behavior).clamp(0.0, MAX_SCORE),
            flow,
            trend,
            weather,
            behavior,
            status: band.into(),
            direction,
            latest: Some(latest),
            change_percent: change,
        }
    }

    /// Score every site of the catalog against a fetched snapshot.
    pub fn score_catalog(&self, catalog: &Catalog, snapshot: &ConditionSnapshot) -> Vec<SiteScore> {
        catalog
            .sites()
            .iter()
            .map(|site| {
                let score = self.score(
                    site,
                    snapshot.readings(&site.id),
                    snapshot.forecast(&site.region),
                );
                tracing::debug!(
                    site = %site.id,
                    total = score.total,
                    status = %score.status,
                    "Site scored"
                );
                SiteScore {
                    site_id: site.id.clone(),
                    region: site.region.clone(),
                    score,
                }
            })
            .collect()
    }
}

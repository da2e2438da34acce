//! Inputs of a single planning run.

use super::error::PlanError;
use crate::config::EconomicsConfig;
use crate::scoring::{SiteScore, MAX_SCORE};
use chrono::{Duration, NaiveDate};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

/// Inclusive trip window; always at least one day long.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TripWindow {
    start: NaiveDate,
    end: NaiveDate,
}

impl TripWindow {
    /// Window from `start` to `end`, both inclusive.
    ///
    /// ```rust
    /// use chrono::NaiveDate;
    /// use navigator::planner::TripWindow;
    ///
    /// let start = NaiveDate::from_ymd_opt(2025, 1, 10).unwrap();
    /// let end = NaiveDate::from_ymd_opt(2025, 1, 16).unwrap();
    /// assert_eq!(TripWindow::new(start, end).unwrap().length(), 7);
    /// assert!(TripWindow::new(end, start).is_err());
    /// ```
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, PlanError> {
        let length = (end - start).num_days() + 1;
        if length < 1 {
            return Err(PlanError::NonPositiveTripLength(length));
        }
        Ok(Self { start, end })
    }

    /// Window of `days` days beginning at `start`.
    pub fn from_length(start: NaiveDate, days: i64) -> Result<Self, PlanError> {
        if days < 1 {
            return Err(PlanError::NonPositiveTripLength(days));
        }
        let end = start
            .checked_add_signed(Duration::days(days - 1))
            .ok_or(PlanError::NonPositiveTripLength(days))?;
        Ok(Self { start, end })
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    /// Number of calendar days in the window.
    pub fn length(&self) -> u32 {
        ((self.end - self.start).num_days() + 1) as u32
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }
}

/// Round a score to the nearest quarter point, inside [0, 5].
pub fn round_to_quarter(value: f64) -> f64 {
    if !value.is_finite() {
        return 0.0;
    }
    ((value * 4.0).round() / 4.0).clamp(0.0, MAX_SCORE)
}

/// Operator ratings per site (and for the lake), fixed for the whole run.
///
/// Sites without a rating are treated as 0 and never become candidates.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Ratings {
    values: BTreeMap<String, f64>,
}

impl Ratings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Default ratings: each site's score rounded to the nearest 0.25.
    pub fn from_scores(scores: &[SiteScore]) -> Self {
        let values = scores
            .iter()
            .map(|s| (s.site_id.clone(), round_to_quarter(s.score.total)))
            .collect();
        Self { values }
    }

    /// Set a rating, clamped into [0, 5].
    pub fn set(&mut self, id: impl Into<String>, rating: f64) {
        let rating = if rating.is_finite() {
            rating.clamp(0.0, MAX_SCORE)
        } else {
            0.0
        };
        self.values.insert(id.into(), rating);
    }

    pub fn with(mut self, id: impl Into<String>, rating: f64) -> Self {
        self.set(id, rating);
        self
    }

    pub fn get(&self, id: &str) -> Option<f64> {
        self.values.get(id).copied()
    }

    /// Rating of a site, 0 when unrated.
    pub fn of(&self, id: &str) -> f64 {
        self.get(id).unwrap_or(0.0)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.values.iter().map(|(k, v)| (k.as_str(), *v))
    }
}

/// Regions, sites, the lake or the corridor excluded by the operator.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Vetoes {
    ids: BTreeSet<String>,
}

impl Vetoes {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn veto(&mut self, id: impl Into<String>) {
        self.ids.insert(id.into());
    }

    pub fn with(mut self, id: impl Into<String>) -> Self {
        self.veto(id);
        self
    }

    pub fn is_vetoed(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.ids.iter().map(String::as_str)
    }
}

/// Fuel economics for cost estimates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Economics {
    pub mpg: f64,
    /// Signed, added to every hub's price
    pub price_adjustment: f64,
    pub default_fuel_price: f64,
}

impl Default for Economics {
    fn default() -> Self {
        EconomicsConfig::default().into()
    }
}

impl From<EconomicsConfig> for Economics {
    fn from(config: EconomicsConfig) -> Self {
        Self {
            mpg: config.mpg,
            price_adjustment: config.price_adjustment,
            default_fuel_price: config.default_fuel_price,
        }
    }
}

impl Economics {
    pub fn validate(&self) -> Result<(), PlanError> {
        if !(self.mpg.is_finite() && self.mpg > 0.0) {
            return Err(PlanError::InvalidEconomics(format!(
                "fuel efficiency must be positive, got {}",
                self.mpg
            )));
        }
        if !self.price_adjustment.is_finite() || !self.default_fuel_price.is_finite() {
            return Err(PlanError::InvalidEconomics(
                "fuel prices must be finite".to_string(),
            ));
        }
        Ok(())
    }

    /// Fuel cost of driving `miles` after filling up at `hub_price`.
    ///
    /// ```rust
    /// use navigator::planner::Economics;
    ///
    /// let economics = Economics { mpg: 20.0, price_adjustment: 0.5, default_fuel_price: 4.0 };
    /// assert_eq!(economics.fuel_cost(100.0, Some(3.5)), 20.0);
    /// assert_eq!(economics.fuel_cost(100.0, None), 22.5);
    /// ```
    pub fn fuel_cost(&self, miles: f64, hub_price: Option<f64>) -> f64 {
        let price = (hub_price.unwrap_or(self.default_fuel_price) + self.price_adjustment).max(0.0);
        miles / self.mpg * price
    }
}

/// Immutable description of one planning run.
#[derive(Debug, Clone, Serialize)]
pub struct PlanningRequest {
    pub window: TripWindow,
    pub ratings: Ratings,
    pub vetoes: Vetoes,
    pub economics: Economics,
    /// Hub the trip starts from; the catalog's home base when unset
    pub start: Option<String>,
}

impl PlanningRequest {
    pub fn new(window: TripWindow) -> Self {
        Self {
            window,
            ratings: Ratings::new(),
            vetoes: Vetoes::new(),
            economics: Economics::default(),
            start: None,
        }
    }

    pub fn with_ratings(mut self, ratings: Ratings) -> Self {
        self.ratings = ratings;
        self
    }

    pub fn with_vetoes(mut self, vetoes: Vetoes) -> Self {
        self.vetoes = vetoes;
        self
    }

    pub fn with_economics(mut self, economics: Economics) -> Self {
        self.economics = economics;
        self
    }

    pub fn starting_at(mut self, hub: impl Into<String>) -> Self {
        self.start = Some(hub.into());
        self
    }
}

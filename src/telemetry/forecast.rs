//! Free-text forecast classification.
//!
//! weather.gov describes precipitation in prose. It is reduced once, at the
//! provider boundary, to a [`Precipitation`] bucket; nothing downstream
//! looks at the text again.

use super::ForecastPeriod;
use serde::Serialize;
use std::fmt;

/// Expected precipitation intensity for the next forecast period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Precipitation {
    Dry,
    Trace,
    Light,
    Moderate,
    Heavy,
    /// Forecast text did not match any known phrasing
    Unclassified,
}

impl Precipitation {
    /// Classify a single forecast description.
    pub fn classify(text: &str) -> Self {
        let txt = text.to_lowercase();

        if txt.contains("heavy rain")
            || txt.contains("1 inch")
            || txt.contains("one inch")
            || (txt.contains("rain") && txt.contains("100%"))
        {
            return Precipitation::Heavy;
        }
        if txt.contains("between half and three quarters")
            || txt.contains("half an inch")
            || txt.contains("three quarters of an inch")
        {
            return Precipitation::Moderate;
        }
        if txt.contains("between a quarter and half") {
            return Precipitation::Light;
        }
        if txt.contains("a quarter of an inch")
            || txt.contains("less than a tenth")
            || txt.contains("light rain")
            || txt.contains("drizzle")
            || txt.contains("showers")
        {
            return Precipitation::Trace;
        }
        if txt.contains("dry") || txt.contains("clear") || txt.contains("sunny") {
            return Precipitation::Dry;
        }

        Precipitation::Unclassified
    }

    /// Classify the first period of a forecast; `None` for an empty forecast.
    pub fn from_periods(periods: &[ForecastPeriod]) -> Option<Self> {
        periods
            .first()
            .map(|p| Self::classify(&p.detailed_forecast))
    }

    /// Heavy enough that an ungauged river is probably rising.
    pub fn is_significant(&self) -> bool {
        matches!(self, Precipitation::Moderate | Precipitation::Heavy)
    }

    pub fn label(&self) -> &'static str {
        match self {
            Precipitation::Dry => "dry",
            Precipitation::Trace => "trace",
            Precipitation::Light => "light",
            Precipitation::Moderate => "moderate",
            Precipitation::Heavy => "heavy",
            Precipitation::Unclassified => "unclassified",
        }
    }
}

impl fmt::Display for Precipitation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

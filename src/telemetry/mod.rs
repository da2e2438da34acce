//! Telemetry and forecast providers.
//!
//! Providers are the only I/O the planner depends on. They are consumed
//! through the [`TelemetryProvider`] and [`ForecastProvider`] traits so the
//! HTTP implementations can be swapped for fixtures in tests. The
//! [`ConditionFetcher`] issues every call as one concurrent batch and turns
//! failures into empty results.

mod batch;
mod error;
pub mod forecast;
mod http;
pub mod parser;

pub use batch::{ConditionFetcher, ConditionSnapshot};
pub use error::FetchError;
pub use forecast::Precipitation;
pub use http::{HttpForecast, HttpTelemetry};

use crate::catalog::{Coordinates, Gauge};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::time::Duration;

/// One gauge sample.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Reading {
    pub timestamp: DateTime<Utc>,
    pub value: f64,
}

/// One period of a short-range forecast.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForecastPeriod {
    pub name: String,
    pub detailed_forecast: String,
}

/// Source of gauge readings.
#[async_trait]
pub trait TelemetryProvider: Send + Sync + 'static {
    /// Readings for `gauge` covering the last `lookback`, oldest first.
    async fn readings(&self, gauge: &Gauge, lookback: Duration)
        -> Result<Vec<Reading>, FetchError>;
}

/// Source of short-range forecasts.
#[async_trait]
pub trait ForecastProvider: Send + Sync + 'static {
    /// Forecast periods for a point, nearest period first.
    async fn forecast(&self, point: Coordinates) -> Result<Vec<ForecastPeriod>, FetchError>;
}

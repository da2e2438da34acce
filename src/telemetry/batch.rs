//! One concurrent batch of telemetry and forecast calls.

use super::error::FetchError;
use super::forecast::Precipitation;
use super::http::{HttpForecast, HttpTelemetry};
use super::{ForecastProvider, Reading, TelemetryProvider};
use crate::catalog::{Catalog, Coordinates, Gauge};
use crate::config::FetchConfig;
use futures::future::{join, join_all};
use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Everything the scorer needs, gathered before planning starts.
#[derive(Debug, Clone, Default)]
pub struct ConditionSnapshot {
    readings: HashMap<String, Vec<Reading>>,
    forecasts: HashMap<String, Precipitation>,
    degraded_calls: usize,
}

impl ConditionSnapshot {
    /// A snapshot with no data; every site scores from its fallbacks.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Readings for a site, oldest first; empty when nothing was fetched.
    pub fn readings(&self, site_id: &str) -> &[Reading] {
        self.readings.get(site_id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Precipitation bucket for a region or the lake.
    pub fn forecast(&self, area_id: &str) -> Option<Precipitation> {
        self.forecasts.get(area_id).copied()
    }

    pub fn insert_readings(&mut self, site_id: impl Into<String>, readings: Vec<Reading>) {
        self.readings.insert(site_id.into(), readings);
    }

    pub fn insert_forecast(&mut self, area_id: impl Into<String>, precipitation: Precipitation) {
        self.forecasts.insert(area_id.into(), precipitation);
    }

    /// Calls that failed or timed out during the batch.
    pub fn degraded_calls(&self) -> usize {
        self.degraded_calls
    }
}

/// Issues every provider call at once and degrades failures to empty.
pub struct ConditionFetcher {
    telemetry: Arc<dyn TelemetryProvider>,
    forecast: Arc<dyn ForecastProvider>,
    timeout: Duration,
    lookback: Duration,
}

impl ConditionFetcher {
    pub fn new(
        telemetry: Arc<dyn TelemetryProvider>,
        forecast: Arc<dyn ForecastProvider>,
        config: &FetchConfig,
    ) -> Self {
        Self {
            telemetry,
            forecast,
            timeout: Duration::from_secs(config.timeout_seconds),
            lookback: Duration::from_secs(u64::from(config.lookback_hours) * 3600),
        }
    }

    /// Fetcher backed by the live USGS, CDEC and weather.gov services.
    pub fn with_http(config: &FetchConfig) -> Result<Self, FetchError> {
        Ok(Self::new(
            Arc::new(HttpTelemetry::new(config.clone())?),
            Arc::new(HttpForecast::new(config.clone())?),
            config,
        ))
    }

    /// Override the per-call timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Fetch readings for every open site and forecasts for every region.
    ///
    /// Each gauge is requested once even when several sites share it. A site
    /// takes the readings of its first gauge that returned data.
    pub async fn fetch(&self, catalog: &Catalog) -> ConditionSnapshot {
        let mut gauges: Vec<&Gauge> = Vec::new();
        for site in catalog.sites().iter().filter(|s| !s.closed) {
            for gauge in &site.gauges {
                if !gauges.contains(&gauge) {
                    gauges.push(gauge);
                }
            }
        }

        let mut points: Vec<(&str, Coordinates)> = catalog
            .regions()
            .iter()
            .filter_map(|r| r.forecast_point.map(|p| (r.id.as_str(), p)))
            .collect();
        if let Some(lake) = catalog.lake() {
            if let Some(p) = lake.forecast_point {
                points.push((lake.id.as_str(), p));
            }
        }

        tracing::info!(
            gauges = gauges.len(),
            forecasts = points.len(),
            "Fetching conditions"
        );
        let start = Instant::now();

        let gauge_calls = join_all(gauges.iter().map(|g| {
            self.guarded(
                "telemetry",
                &g.id,
                self.telemetry.readings(g, self.lookback),
            )
        }));
        let forecast_calls = join_all(
            points
                .iter()
                .map(|(id, p)| self.guarded("forecast", id, self.forecast.forecast(*p))),
        );
        let (gauge_results, forecast_results) = join(gauge_calls, forecast_calls).await;

        let mut snapshot = ConditionSnapshot::empty();
        snapshot.degraded_calls = gauge_results.iter().filter(|r| r.is_none()).count()
            + forecast_results.iter().filter(|r| r.is_none()).count();

        let by_gauge: HashMap<&Gauge, Vec<Reading>> = gauges
            .iter()
            .copied()
            .zip(gauge_results)
            .filter_map(|(g, r)| r.map(|readings| (g, readings)))
            .filter(|(_, readings)| !readings.is_empty())
            .collect();

        for site in catalog.sites() {
            let first_with_data = site.gauges.iter().find_map(|g| by_gauge.get(g));
            if let Some(readings) = first_with_data {
                snapshot.insert_readings(site.id.clone(), readings.clone());
            }
        }

        for ((id, _), periods) in points.iter().zip(forecast_results) {
            if let Some(precipitation) = periods.and_then(|p| Precipitation::from_periods(&p)) {
                snapshot.insert_forecast(*id, precipitation);
            }
        }

        tracing::info!(
            sites_with_data = snapshot.readings.len(),
            forecasts = snapshot.forecasts.len(),
            degraded = snapshot.degraded_calls,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Conditions fetched"
        );

        snapshot
    }

    /// Run one provider call under the timeout; `None` means degraded.
    async fn guarded<T, F>(&self, kind: &'static str, source_id: &str, call: F) -> Option<T>
    where
        F: Future<Output = Result<T, FetchError>>,
    {
        let start = Instant::now();
        let outcome = tokio::time::timeout(self.timeout, call).await;
        metrics::histogram!("navigator_fetch_duration_seconds", "kind" => kind)
            .record(start.elapsed().as_secs_f64());

        match outcome {
            Ok(Ok(value)) => Some(value),
            Ok(Err(error)) => {
                tracing::warn!(
                    kind,
                    source_id,
                    error = %error,
                    "Fetch failed, treating as no data"
                );
                metrics::counter!("navigator_fetch_degraded_total", "kind" => kind).increment(1);
                None
            }
            Err(_) => {
                tracing::warn!(
                    kind,
                    source_id,
                    timeout_seconds = self.timeout.as_secs_f64(),
                    "Fetch timed out, treating as no data"
                );
                metrics::counter!("navigator_fetch_degraded_total", "kind" => kind).increment(1);
                None
            }
        }
    }
}

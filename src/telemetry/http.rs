//! reqwest-backed providers for USGS, CDEC and weather.gov.

use super::error::FetchError;
use super::parser;
use super::{ForecastPeriod, ForecastProvider, Reading, TelemetryProvider};
use crate::catalog::{Coordinates, Gauge, GaugeSource};
use crate::config::FetchConfig;
use async_trait::async_trait;
use chrono::Utc;
use std::time::Duration;

fn build_client(config: &FetchConfig) -> Result<reqwest::Client, FetchError> {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(config.timeout_seconds))
        .user_agent(config.user_agent.clone())
        .build()
        .map_err(|e| FetchError::Client(e.to_string()))
}

/// Classify reqwest error into FetchError.
fn classify_error(e: reqwest::Error, timeout_seconds: u64) -> FetchError {
    if e.is_timeout() {
        FetchError::Timeout(timeout_seconds)
    } else {
        FetchError::ConnectionFailed(e.to_string())
    }
}

async fn get_text(
    request: reqwest::RequestBuilder,
    timeout_seconds: u64,
) -> Result<String, FetchError> {
    let response = request
        .send()
        .await
        .map_err(|e| classify_error(e, timeout_seconds))?;

    if !response.status().is_success() {
        return Err(FetchError::HttpError(response.status().as_u16()));
    }

    response
        .text()
        .await
        .map_err(|e| FetchError::ParseError(e.to_string()))
}

/// Gauge readings from USGS (JSON) and CDEC (CSV).
pub struct HttpTelemetry {
    client: reqwest::Client,
    config: FetchConfig,
}

impl HttpTelemetry {
    pub fn new(config: FetchConfig) -> Result<Self, FetchError> {
        Ok(Self {
            client: build_client(&config)?,
            config,
        })
    }

    async fn fetch_usgs(&self, gauge: &Gauge, lookback: Duration) -> Result<Vec<Reading>, FetchError> {
        let hours = (lookback.as_secs() / 3600).max(1);
        let request = self.client.get(&self.config.usgs_base_url).query(&[
            ("format", "json".to_string()),
            ("sites", gauge.id.clone()),
            ("parameterCd", gauge.parameter.clone()),
            ("period", format!("PT{}H", hours)),
        ]);
        let body = get_text(request, self.config.timeout_seconds).await?;
        parser::parse_usgs_response(&body)
    }

    async fn fetch_cdec(&self, gauge: &Gauge, lookback: Duration) -> Result<Vec<Reading>, FetchError> {
        let end = Utc::now();
        let start = end
            - chrono::Duration::from_std(lookback)
                .map_err(|e| FetchError::Client(e.to_string()))?;
        let request = self.client.get(&self.config.cdec_base_url).query(&[
            ("Stations", gauge.id.clone()),
            ("SensorNums", gauge.parameter.clone()),
            ("dur_code", "E".to_string()),
            ("Start", start.format("%Y-%m-%d").to_string()),
            ("End", end.format("%Y-%m-%d").to_string()),
        ]);
        let body = get_text(request, self.config.timeout_seconds).await?;
        Ok(parser::parse_cdec_csv(&body)?
            .into_iter()
            .filter(|r| r.timestamp >= start)
            .collect())
    }
}

#[async_trait]
impl TelemetryProvider for HttpTelemetry {
    async fn readings(
        &self,
        gauge: &Gauge,
        lookback: Duration,
    ) -> Result<Vec<Reading>, FetchError> {
        match gauge.source {
            GaugeSource::Usgs => self.fetch_usgs(gauge, lookback).await,
            GaugeSource::Cdec => self.fetch_cdec(gauge, lookback).await,
        }
    }
}

/// Forecasts from the weather.gov points/forecast API.
pub struct HttpForecast {
    client: reqwest::Client,
    config: FetchConfig,
}

impl HttpForecast {
    pub fn new(config: FetchConfig) -> Result<Self, FetchError> {
        Ok(Self {
            client: build_client(&config)?,
            config,
        })
    }
}

#[async_trait]
impl ForecastProvider for HttpForecast {
    async fn forecast(&self, point: Coordinates) -> Result<Vec<ForecastPeriod>, FetchError> {
        let points_url = format!(
            "{}/points/{:.4},{:.4}",
            self.config.weather_base_url.trim_end_matches('/'),
            point.lat,
            point.lon
        );
        let body = get_text(self.client.get(&points_url), self.config.timeout_seconds).await?;
        let forecast_url = parser::parse_points_response(&body)?;

        let body = get_text(self.client.get(&forecast_url), self.config.timeout_seconds).await?;
        parser::parse_forecast_response(&body)
    }
}

//! Configuration for telemetry and forecast fetching.

use serde::{Deserialize, Serialize};

/// Endpoints and limits for the condition fetch batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    /// USGS instantaneous-values service
    pub usgs_base_url: String,
    /// CDEC CSV data servlet
    pub cdec_base_url: String,
    /// weather.gov API root
    pub weather_base_url: String,
    /// Per-call timeout; a call that exceeds it degrades to empty
    pub timeout_seconds: u64,
    /// How far back to request gauge readings
    pub lookback_hours: u32,
    /// User-Agent sent with every request (weather.gov rejects anonymous clients)
    pub user_agent: String,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            usgs_base_url: "https://waterservices.usgs.gov/nwis/iv/".to_string(),
            cdec_base_url: "https://cdec.water.ca.gov/dynamicapp/req/CSVDataServlet".to_string(),
            weather_base_url: "https://api.weather.gov".to_string(),
            timeout_seconds: 8,
            lookback_hours: 48,
            user_agent: "(steelhead-navigator)".to_string(),
        }
    }
}

/// Tunables for the condition scorer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    /// Trend is measured against the newest sample at least this old
    pub trend_window_hours: u32,
    /// Percent change inside which a trend counts as stable
    pub stable_band_percent: f64,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            trend_window_hours: 8,
            stable_band_percent: 1.0,
        }
    }
}

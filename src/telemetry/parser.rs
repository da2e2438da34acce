//! Response parsing for the USGS, CDEC and weather.gov services.

use super::error::FetchError;
use super::{ForecastPeriod, Reading};
use chrono::{DateTime, FixedOffset, NaiveDateTime, TimeZone, Utc};
use serde::Deserialize;

/// USGS instantaneous-values JSON (`/nwis/iv/?format=json`)
#[derive(Deserialize)]
struct UsgsResponse {
    value: UsgsValue,
}

#[derive(Deserialize)]
struct UsgsValue {
    #[serde(rename = "timeSeries", default)]
    time_series: Vec<UsgsTimeSeries>,
}

#[derive(Deserialize)]
struct UsgsTimeSeries {
    #[serde(default)]
    values: Vec<UsgsValues>,
}

#[derive(Deserialize)]
struct UsgsValues {
    #[serde(default)]
    value: Vec<UsgsPoint>,
}

#[derive(Deserialize)]
struct UsgsPoint {
    value: String,
    #[serde(rename = "dateTime")]
    date_time: String,
}

/// Keep physically meaningful samples, oldest first.
fn finish(mut readings: Vec<Reading>) -> Vec<Reading> {
    readings.retain(|r| r.value.is_finite() && r.value >= 0.0);
    readings.sort_by_key(|r| r.timestamp);
    readings
}

/// Parse a USGS response into readings.
///
/// A response with no time series is a valid empty result. Individual
/// points with unparseable values (USGS uses sentinels such as `-999999`
/// or `Ice`) are skipped.
pub fn parse_usgs_response(body: &str) -> Result<Vec<Reading>, FetchError> {
    let response: UsgsResponse =
        serde_json::from_str(body).map_err(|e| FetchError::ParseError(e.to_string()))?;

    let points = response
        .value
        .time_series
        .into_iter()
        .next()
        .and_then(|ts| ts.values.into_iter().next())
        .map(|v| v.value)
        .unwrap_or_default();

    let readings = points
        .into_iter()
        .filter_map(|p| {
            let timestamp = DateTime::parse_from_rfc3339(&p.date_time)
                .ok()?
                .with_timezone(&Utc);
            let value: f64 = p.value.trim().parse().ok()?;
            Some(Reading { timestamp, value })
        })
        .collect();

    Ok(finish(readings))
}

/// CDEC stamps readings in Pacific Standard Time year round.
fn parse_cdec_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let pacific_standard = FixedOffset::west_opt(8 * 3600)?;
    let raw = raw.trim();
    let naive = NaiveDateTime::parse_from_str(raw, "%Y%m%d %H%M")
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%m/%d/%Y %H:%M"))
        .ok()?;
    pacific_standard
        .from_local_datetime(&naive)
        .single()
        .map(|dt| dt.with_timezone(&Utc))
}

/// Parse CDEC `CSVDataServlet` output.
///
/// Columns: `STATION_ID,DURATION,SENSOR_NUMBER,SENSOR_TYPE,DATE TIME,OBS DATE,VALUE,DATA_FLAG,UNITS`.
/// The header row and rows with missing values (`---`) are skipped.
pub fn parse_cdec_csv(body: &str) -> Result<Vec<Reading>, FetchError> {
    let trimmed = body.trim_start();
    if trimmed.starts_with('<') {
        return Err(FetchError::ParseError(
            "expected CSV, got markup".to_string(),
        ));
    }

    let readings = trimmed
        .lines()
        .filter_map(|line| {
            let cols: Vec<&str> = line.split(',').collect();
            if cols.len() < 7 {
                return None;
            }
            let timestamp = parse_cdec_timestamp(cols[4])?;
            let value: f64 = cols[6].trim().parse().ok()?;
            Some(Reading { timestamp, value })
        })
        .collect();

    Ok(finish(readings))
}

#[derive(Deserialize)]
struct PointsResponse {
    properties: PointsProperties,
}

#[derive(Deserialize)]
struct PointsProperties {
    forecast: Option<String>,
}

#[derive(Deserialize)]
struct ForecastResponse {
    properties: ForecastProperties,
}

#[derive(Deserialize)]
struct ForecastProperties {
    #[serde(default)]
    periods: Vec<RawPeriod>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawPeriod {
    #[serde(default)]
    name: String,
    #[serde(default)]
    detailed_forecast: String,
}

/// Extract the forecast URL from a weather.gov `/points/{lat},{lon}` response.
pub fn parse_points_response(body: &str) -> Result<String, FetchError> {
    let response: PointsResponse =
        serde_json::from_str(body).map_err(|e| FetchError::ParseError(e.to_string()))?;
    response
        .properties
        .forecast
        .ok_or_else(|| FetchError::ParseError("points response has no forecast URL".to_string()))
}

/// Parse the periods of a weather.gov forecast response.
pub fn parse_forecast_response(body: &str) -> Result<Vec<ForecastPeriod>, FetchError> {
    let response: ForecastResponse =
        serde_json::from_str(body).map_err(|e| FetchError::ParseError(e.to_string()))?;
    Ok(response
        .properties
        .periods
        .into_iter()
        .map(|p| ForecastPeriod {
            name: p.name,
            detailed_forecast: p.detailed_forecast,
        })
        .collect())
}

//! Shared test utilities for navigator integration tests.
//!
//! Provides a compact catalog with a fully precomputed route table, so
//! planner expectations can be worked out by hand.

#![allow(dead_code)]

use chrono::NaiveDate;
use navigator::catalog::Catalog;
use navigator::config::PlannerConfig;
use navigator::planner::{Itinerary, Planner, PlanningRequest, Ratings, TripWindow, Vetoes};
use navigator::routing::RouteTable;

// =============================================================================
// Test Catalog
// =============================================================================

/// Home near Reno; the lake is under an hour away, the coast a long day.
///
/// - `coast` (naturally ordered): klamath, smith, chetco, all based at crescent
/// - `north`: alsea, siletz, both based at newport
/// - lake `pyramid` with the `eagle` corridor stop
pub const TEST_CATALOG: &str = r#"
home = "home"

[lake]
id = "pyramid"
name = "Pyramid Lake"
hub = "pyramid"
corridor = "eagle"
forecast = { lat = 40.0, lon = -119.6 }

[[hubs]]
id = "home"
name = "Home"
lat = 39.53
lon = -119.81
fuel_price = 3.50

[[hubs]]
id = "pyramid"
name = "Pyramid"
lat = 40.0
lon = -119.6
fuel_price = 4.00

[[hubs]]
id = "eagle"
name = "Eagle Lake"
lat = 40.55
lon = -120.80
region = "corridor"

[[hubs]]
id = "crescent"
name = "Crescent City"
lat = 41.75
lon = -124.2
fuel_price = 4.80

[[hubs]]
id = "newport"
name = "Newport"
lat = 44.63
lon = -124.05
fuel_price = 4.60

[[regions]]
id = "coast"
name = "Redwood Coast"
naturally_ordered = true
forecast = { lat = 41.75, lon = -124.2 }

[[regions]]
id = "north"
name = "Central Oregon"
forecast = { lat = 44.63, lon = -124.05 }

[[sites]]
id = "klamath"
name = "Klamath"
region = "coast"
hub = "crescent"
lat = 41.52
lon = -124.0
target = "3000-12000 cfs"
behavior = "large"
gauges = [{ source = "usgs", id = "11530500" }]

[[sites]]
id = "smith"
name = "Smith"
region = "coast"
hub = "crescent"
lat = 41.79
lon = -124.07
target = "1000-5000 cfs"
minimum = 600
behavior = "flashy"
preferred = true
gauges = [{ source = "usgs", id = "11532500" }]

[[sites]]
id = "chetco"
name = "Chetco"
region = "coast"
hub = "crescent"
lat = 42.05
lon = -124.27
target = "4.0-7.0 ft"
gauges = [{ source = "cdec", id = "CHE" }, { source = "usgs", id = "14400000" }]

[[sites]]
id = "alsea"
name = "Alsea"
region = "north"
hub = "newport"
lat = 44.38
lon = -123.83
target = "500-2500 cfs"
gauges = [{ source = "usgs", id = "14306500" }]

[[sites]]
id = "siletz"
name = "Siletz"
region = "north"
hub = "newport"
lat = 44.72
lon = -123.89
target = "800-3000 cfs"
gauges = [{ source = "usgs", id = "14305500" }]
"#;

/// Every hub pair, so no route is estimated.
pub const TEST_ROUTES: &str = r#"{
  "home|pyramid": { "miles": 40.0, "hours": 0.9 },
  "home|eagle": { "miles": 120.0, "hours": 2.5 },
  "home|crescent": { "miles": 380.0, "hours": 7.2 },
  "home|newport": { "miles": 560.0, "hours": 11.0 },
  "pyramid|eagle": { "miles": 90.0, "hours": 2.0 },
  "pyramid|crescent": { "miles": 360.0, "hours": 7.0 },
  "pyramid|newport": { "miles": 540.0, "hours": 10.5 },
  "eagle|crescent": { "miles": 270.0, "hours": 5.5 },
  "eagle|newport": { "miles": 450.0, "hours": 9.0 },
  "crescent|newport": { "miles": 230.0, "hours": 5.0 }
}"#;

pub const COASTAL_SITES: [&str; 5] = ["klamath", "smith", "chetco", "alsea", "siletz"];

/// Three single-site regions, all based at newport, listed after `north`.
const EXTRA_REGIONS: &str = r#"
[[regions]]
id = "yaquina"
name = "Yaquina"

[[regions]]
id = "nestucca"
name = "Nestucca"

[[regions]]
id = "tillamook"
name = "Tillamook"

"#;

const EXTRA_SITES: &str = r#"
[[sites]]
id = "big-elk"
name = "Big Elk"
region = "yaquina"
hub = "newport"
lat = 44.59
lon = -123.85
target = "300-1500 cfs"

[[sites]]
id = "three-rivers"
name = "Three Rivers"
region = "nestucca"
hub = "newport"
lat = 45.21
lon = -123.87
target = "400-1800 cfs"

[[sites]]
id = "wilson"
name = "Wilson"
region = "tillamook"
hub = "newport"
lat = 45.48
lon = -123.74
target = "700-3000 cfs"
"#;

pub const EXTRA_SITE_IDS: [&str; 3] = ["big-elk", "three-rivers", "wilson"];

pub fn test_catalog() -> Catalog {
    Catalog::from_toml(TEST_CATALOG).expect("test catalog is valid")
}

/// The test catalog with five coastal regions, enough to force the
/// allocator to drop regions on short trips.
pub fn wide_catalog() -> Catalog {
    let content = TEST_CATALOG.replacen("[[sites]]", &format!("{}[[sites]]", EXTRA_REGIONS), 1);
    Catalog::from_toml(&format!("{}{}", content, EXTRA_SITES)).expect("wide catalog is valid")
}

pub fn test_routes() -> RouteTable {
    RouteTable::from_json(TEST_ROUTES).expect("test routes are valid")
}

// =============================================================================
// Request Builders
// =============================================================================

pub fn jan(day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 1, day).unwrap()
}

pub fn window(days: i64) -> TripWindow {
    TripWindow::from_length(jan(10), days).unwrap()
}

pub fn ratings(pairs: &[(&str, f64)]) -> Ratings {
    pairs
        .iter()
        .fold(Ratings::new(), |r, (id, rating)| r.with(*id, *rating))
}

pub fn vetoes(ids: &[&str]) -> Vetoes {
    ids.iter().fold(Vetoes::new(), |v, id| v.with(*id))
}

/// Plan against the test catalog with default thresholds.
pub fn plan(request: &PlanningRequest) -> Itinerary {
    let catalog = test_catalog();
    let routes = test_routes();
    Planner::new(&catalog, &routes, PlannerConfig::default())
        .plan(request)
        .expect("planning succeeds")
}

/// Plan against the wide catalog with default thresholds.
pub fn plan_wide(request: &PlanningRequest) -> Itinerary {
    let catalog = wide_catalog();
    let routes = test_routes();
    Planner::new(&catalog, &routes, PlannerConfig::default())
        .plan(request)
        .expect("planning succeeds")
}

// =============================================================================
// Fixture Bodies
// =============================================================================

/// USGS instantaneous-values body with the given `(rfc3339, value)` points.
pub fn usgs_body(points: &[(&str, &str)]) -> String {
    let values: Vec<serde_json::Value> = points
        .iter()
        .map(|(ts, v)| serde_json::json!({ "value": v, "dateTime": ts }))
        .collect();
    serde_json::json!({
        "value": {
            "timeSeries": [{ "values": [{ "value": values }] }]
        }
    })
    .to_string()
}

/// weather.gov points body pointing at `forecast_url`.
pub fn points_body(forecast_url: &str) -> String {
    serde_json::json!({ "properties": { "forecast": forecast_url } }).to_string()
}

/// weather.gov forecast body whose first period reads `text`.
pub fn forecast_body(text: &str) -> String {
    serde_json::json!({
        "properties": {
            "periods": [
                { "name": "Tonight", "detailedForecast": text },
                { "name": "Tomorrow", "detailedForecast": "Sunny." }
            ]
        }
    })
    .to_string()
}

//! Travel graph between hubs.
//!
//! Routes come from a read-only precomputed table keyed by hub pair. Pairs
//! missing from the table are estimated from the great-circle distance, so a
//! route lookup never fails.

mod error;
pub mod fallback;

pub use error::RouteError;

use crate::catalog::Hub;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

const BUILTIN_ROUTES: &str = include_str!("../../data/routes.json");

/// Where a route's numbers came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RouteSource {
    Precomputed,
    Estimated,
    /// Origin and destination are the same hub
    Stationary,
}

/// Distance, duration and optional path between two hubs.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Route {
    pub miles: f64,
    pub hours: f64,
    /// `[lon, lat]` pairs
    pub geometry: Vec<[f64; 2]>,
    pub source: RouteSource,
}

impl Route {
    pub fn stationary() -> Self {
        Self {
            miles: 0.0,
            hours: 0.0,
            geometry: Vec::new(),
            source: RouteSource::Stationary,
        }
    }
}

/// Anything that can answer "how far from A to B".
///
/// Lookups are infallible; implementations degrade to an estimate.
pub trait RouteProvider: Send + Sync {
    fn route(&self, from: &Hub, to: &Hub) -> Route;
}

#[derive(Debug, Clone, Deserialize)]
struct RouteEdge {
    miles: f64,
    hours: f64,
    #[serde(default)]
    geometry: Vec<[f64; 2]>,
}

/// Symmetric lookup table with great-circle fallback.
#[derive(Debug, Clone, Default)]
pub struct RouteTable {
    edges: HashMap<(String, String), RouteEdge>,
}

fn edge_key(a: &str, b: &str) -> (String, String) {
    if a <= b {
        (a.to_string(), b.to_string())
    } else {
        (b.to_string(), a.to_string())
    }
}

impl RouteTable {
    /// A table with no entries; every route is estimated.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn builtin() -> Result<Self, RouteError> {
        Self::from_json(BUILTIN_ROUTES)
    }

    pub fn load(path: &Path) -> Result<Self, RouteError> {
        if !path.exists() {
            return Err(RouteError::NotFound(path.to_path_buf()));
        }
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    pub fn load_or_builtin(path: Option<&Path>) -> Result<Self, RouteError> {
        match path {
            Some(p) => Self::load(p),
            None => Self::builtin(),
        }
    }

    /// Parse `{"hub-a|hub-b": {"miles": .., "hours": .., "geometry": [[lon, lat], ..]}}`.
    pub fn from_json(content: &str) -> Result<Self, RouteError> {
        let raw: HashMap<String, RouteEdge> =
            serde_json::from_str(content).map_err(|e| RouteError::Parse(e.to_string()))?;

        let mut edges = HashMap::with_capacity(raw.len());
        for (key, edge) in raw {
            let (a, b) = key.split_once('|').ok_or_else(|| RouteError::InvalidEdge {
                key: key.clone(),
                message: "expected '<hub>|<hub>'".to_string(),
            })?;
            if !(edge.miles.is_finite() && edge.miles >= 0.0)
                || !(edge.hours.is_finite() && edge.hours >= 0.0)
            {
                return Err(RouteError::InvalidEdge {
                    key,
                    message: "miles and hours must be non-negative".to_string(),
                });
            }
            edges.insert(edge_key(a.trim(), b.trim()), edge);
        }

        tracing::debug!(routes = edges.len(), "Route table loaded");
        Ok(Self { edges })
    }

    pub fn len(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }
}

impl RouteProvider for RouteTable {
    fn route(&self, from: &Hub, to: &Hub) -> Route {
        if from.id == to.id {
            return Route::stationary();
        }

        if let Some(edge) = self.edges.get(&edge_key(&from.id, &to.id)) {
            let mut geometry = edge.geometry.clone();
            // Stored once per pair; flip when the far end lies nearer the origin.
            if let (Some(first), Some(last)) = (geometry.first(), geometry.last()) {
                let origin = [from.coordinates.lon, from.coordinates.lat];
                if distance_sq(*last, origin) < distance_sq(*first, origin) {
                    geometry.reverse();
                }
            }
            return Route {
                miles: edge.miles,
                hours: edge.hours,
                geometry,
                source: RouteSource::Precomputed,
            };
        }

        let (miles, hours) = fallback::estimate(from.coordinates, to.coordinates);
        tracing::trace!(from = %from.id, to = %to.id, miles, "Estimated route");
        Route {
            miles,
            hours,
            geometry: vec![
                [from.coordinates.lon, from.coordinates.lat],
                [to.coordinates.lon, to.coordinates.lat],
            ],
            source: RouteSource::Estimated,
        }
    }
}

fn distance_sq(a: [f64; 2], b: [f64; 2]) -> f64 {
    (a[0] - b[0]).powi(2) + (a[1] - b[1]).powi(2)
}

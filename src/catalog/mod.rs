//! Site catalog: hubs, regions, sites and the lake excursion.
//!
//! The catalog is loaded once, validated, and never mutated afterwards.
//! Region order in the file is the planner's priority order, and site order
//! within a region is the region's natural (south to north) order.

mod error;
mod range;
mod records;

pub use error::CatalogError;
pub use range::{TargetRange, Unit};

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::path::Path;

const BUILTIN_CATALOG: &str = include_str!("../../data/catalog.toml");

/// Latitude/longitude in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lon: f64,
}

/// Agency publishing a gauge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GaugeSource {
    Usgs,
    Cdec,
}

impl fmt::Display for GaugeSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GaugeSource::Usgs => write!(f, "USGS"),
            GaugeSource::Cdec => write!(f, "CDEC"),
        }
    }
}

/// One measurement source for a site.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Gauge {
    pub source: GaugeSource,
    pub id: String,
    /// USGS parameter code or CDEC sensor number
    pub parameter: String,
}

/// Qualitative flow dynamics; tunes how the scorer rewards the flow index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BehaviorClass {
    Flashy,
    Large,
    Glacial,
    Mixed,
    Generic,
}

impl BehaviorClass {
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim().to_lowercase().as_str() {
            "flashy" => Some(BehaviorClass::Flashy),
            "large" | "big" => Some(BehaviorClass::Large),
            "glacial" => Some(BehaviorClass::Glacial),
            "mixed" | "medium" => Some(BehaviorClass::Mixed),
            "generic" => Some(BehaviorClass::Generic),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Hub {
    pub id: String,
    pub name: String,
    pub coordinates: Coordinates,
    pub fuel_price: Option<f64>,
    /// Region (or lake) this hub serves; staging waypoints have none
    pub region: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Region {
    pub id: String,
    pub name: String,
    /// Sites are listed in a meaningful linear order and get sequenced
    pub naturally_ordered: bool,
    /// Reaching the region costs enough to justify a two-day floor
    pub extended_access: bool,
    pub forecast_point: Option<Coordinates>,
    pub site_ids: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Site {
    pub id: String,
    pub name: String,
    pub region: String,
    pub hub: String,
    pub coordinates: Coordinates,
    /// Primary gauge first
    pub gauges: Vec<Gauge>,
    pub target: TargetRange,
    /// Readings below this are unusable
    pub minimum: f64,
    pub behavior: BehaviorClass,
    pub preferred: bool,
    pub closed: bool,
    pub notes: Option<String>,
}

/// The stillwater excursion that runs before the coastal loop.
#[derive(Debug, Clone, Serialize)]
pub struct Lake {
    pub id: String,
    pub name: String,
    pub hub: String,
    /// Overnight waypoint used when the drive to the lake is too long for one day
    pub staging: Option<String>,
    /// Half-day stop between the lake and the coast
    pub corridor: Option<String>,
    pub forecast_point: Option<Coordinates>,
}

#[derive(Debug, Clone)]
pub struct Catalog {
    home: String,
    hubs: Vec<Hub>,
    regions: Vec<Region>,
    sites: Vec<Site>,
    lake: Option<Lake>,
    hub_index: HashMap<String, usize>,
    site_index: HashMap<String, usize>,
    region_index: HashMap<String, usize>,
}

impl Catalog {
    /// The catalog compiled into the binary.
    pub fn builtin() -> Result<Self, CatalogError> {
        Self::from_toml(BUILTIN_CATALOG)
    }

    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        if !path.exists() {
            return Err(CatalogError::NotFound(path.to_path_buf()));
        }
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Load from `path` when given, otherwise the built-in catalog.
    pub fn load_or_builtin(path: Option<&Path>) -> Result<Self, CatalogError> {
        match path {
            Some(p) => Self::load(p),
            None => Self::builtin(),
        }
    }

    pub fn from_toml(content: &str) -> Result<Self, CatalogError> {
        let file: records::CatalogFile =
            toml::from_str(content).map_err(|e| CatalogError::Parse(e.to_string()))?;
        let catalog = file.into_catalog()?;
        tracing::debug!(
            hubs = catalog.hubs.len(),
            regions = catalog.regions.len(),
            sites = catalog.sites.len(),
            "Catalog loaded"
        );
        Ok(catalog)
    }

    fn assemble(
        home: String,
        hubs: Vec<Hub>,
        regions: Vec<Region>,
        sites: Vec<Site>,
        lake: Option<Lake>,
    ) -> Self {
        let index = |ids: Vec<&str>| -> HashMap<String, usize> {
            ids.into_iter()
                .enumerate()
                .map(|(i, id)| (id.to_string(), i))
                .collect()
        };
        let hub_index = index(hubs.iter().map(|h| h.id.as_str()).collect());
        let site_index = index(sites.iter().map(|s| s.id.as_str()).collect());
        let region_index = index(regions.iter().map(|r| r.id.as_str()).collect());

        Self {
            home,
            hubs,
            regions,
            sites,
            lake,
            hub_index,
            site_index,
            region_index,
        }
    }

    pub fn home_id(&self) -> &str {
        &self.home
    }

    pub fn hubs(&self) -> &[Hub] {
        &self.hubs
    }

    pub fn hub(&self, id: &str) -> Option<&Hub> {
        self.hub_index.get(id).map(|&i| &self.hubs[i])
    }

    /// Regions in priority order.
    pub fn regions(&self) -> &[Region] {
        &self.regions
    }

    pub fn region(&self, id: &str) -> Option<&Region> {
        self.region_index.get(id).map(|&i| &self.regions[i])
    }

    pub fn sites(&self) -> &[Site] {
        &self.sites
    }

    pub fn site(&self, id: &str) -> Option<&Site> {
        self.site_index.get(id).map(|&i| &self.sites[i])
    }

    /// Sites of a region in natural order.
    pub fn sites_in<'a>(&'a self, region: &'a Region) -> impl Iterator<Item = &'a Site> + 'a {
        region.site_ids.iter().filter_map(|id| self.site(id))
    }

    pub fn lake(&self) -> Option<&Lake> {
        self.lake.as_ref()
    }

    /// Region (or lake id) served by a hub.
    pub fn region_of_hub(&self, hub_id: &str) -> Option<&str> {
        self.hub(hub_id).and_then(|h| h.region.as_deref())
    }

    /// Display name for a hub, falling back to the id.
    pub fn hub_name<'a>(&'a self, hub_id: &'a str) -> &'a str {
        self.hub(hub_id).map(|h| h.name.as_str()).unwrap_or(hub_id)
    }

    /// Display name for a site or the lake, falling back to the id.
    pub fn site_name<'a>(&'a self, site_id: &'a str) -> &'a str {
        if let Some(site) = self.site(site_id) {
            return &site.name;
        }
        match &self.lake {
            Some(lake) if lake.id == site_id => &lake.name,
            _ => site_id,
        }
    }
}

//! Raw catalog records as they appear in TOML, and their validation.

use super::error::CatalogError;
use super::range::{TargetRange, Unit};
use super::{BehaviorClass, Catalog, Coordinates, Gauge, GaugeSource, Hub, Lake, Region, Site};
use serde::Deserialize;
use std::collections::{HashMap, HashSet};

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub(super) struct CatalogFile {
    home: String,
    #[serde(default)]
    hubs: Vec<HubRecord>,
    #[serde(default)]
    regions: Vec<RegionRecord>,
    #[serde(default)]
    sites: Vec<SiteRecord>,
    lake: Option<LakeRecord>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct HubRecord {
    id: String,
    name: Option<String>,
    lat: f64,
    lon: f64,
    fuel_price: Option<f64>,
    region: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct PointRecord {
    lat: f64,
    lon: f64,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RegionRecord {
    id: String,
    name: String,
    #[serde(default)]
    naturally_ordered: bool,
    #[serde(default)]
    extended_access: bool,
    forecast: Option<PointRecord>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct GaugeRecord {
    source: GaugeSource,
    id: String,
    parameter: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct SiteRecord {
    id: String,
    name: String,
    region: String,
    hub: String,
    lat: f64,
    lon: f64,
    target: String,
    #[serde(default)]
    minimum: f64,
    behavior: Option<String>,
    #[serde(default)]
    preferred: bool,
    #[serde(default)]
    closed: bool,
    #[serde(default)]
    gauges: Vec<GaugeRecord>,
    notes: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct LakeRecord {
    id: String,
    name: String,
    hub: String,
    staging: Option<String>,
    corridor: Option<String>,
    forecast: Option<PointRecord>,
}

fn coordinates(owner: &str, lat: f64, lon: f64) -> Result<Coordinates, CatalogError> {
    if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lon) {
        return Err(CatalogError::Validation {
            field: format!("{}.lat/lon", owner),
            message: format!("({}, {}) is not a valid coordinate", lat, lon),
        });
    }
    Ok(Coordinates { lat, lon })
}

fn point(owner: &str, record: Option<PointRecord>) -> Result<Option<Coordinates>, CatalogError> {
    record
        .map(|p| coordinates(&format!("{}.forecast", owner), p.lat, p.lon))
        .transpose()
}

fn default_parameter(source: GaugeSource, unit: Unit) -> &'static str {
    match (source, unit) {
        (GaugeSource::Usgs, Unit::Cfs) => "00060",
        (GaugeSource::Usgs, Unit::Feet) => "00065",
        (GaugeSource::Cdec, Unit::Cfs) => "20",
        (GaugeSource::Cdec, Unit::Feet) => "1",
    }
}

fn check_unique<'a>(
    kind: &'static str,
    ids: impl Iterator<Item = &'a str>,
) -> Result<(), CatalogError> {
    let mut seen = HashSet::new();
    for id in ids {
        if id.trim().is_empty() {
            return Err(CatalogError::Validation {
                field: format!("{}.id", kind),
                message: "id cannot be empty".to_string(),
            });
        }
        if !seen.insert(id) {
            return Err(CatalogError::DuplicateId {
                kind,
                id: id.to_string(),
            });
        }
    }
    Ok(())
}

impl CatalogFile {
    /// Validate references and build the immutable catalog.
    pub(super) fn into_catalog(self) -> Result<Catalog, CatalogError> {
        check_unique("hub", self.hubs.iter().map(|h| h.id.as_str()))?;
        check_unique(
            "region",
            self.regions
                .iter()
                .map(|r| r.id.as_str())
                .chain(self.lake.iter().map(|l| l.id.as_str())),
        )?;
        check_unique(
            "site",
            self.sites
                .iter()
                .map(|s| s.id.as_str())
                .chain(self.lake.iter().map(|l| l.id.as_str())),
        )?;

        let hub_ids: HashSet<&str> = self.hubs.iter().map(|h| h.id.as_str()).collect();
        let region_ids: HashSet<&str> = self.regions.iter().map(|r| r.id.as_str()).collect();
        let require_hub = |owner: &str, id: &str| -> Result<(), CatalogError> {
            if hub_ids.contains(id) {
                Ok(())
            } else {
                Err(CatalogError::UnknownReference {
                    owner: owner.to_string(),
                    kind: "hub",
                    id: id.to_string(),
                })
            }
        };

        require_hub("home", &self.home)?;

        let lake = match self.lake {
            Some(record) => {
                let owner = format!("lake '{}'", record.id);
                require_hub(&owner, &record.hub)?;
                for waypoint in record.staging.iter().chain(record.corridor.iter()) {
                    require_hub(&owner, waypoint)?;
                }
                Some(Lake {
                    forecast_point: point(&owner, record.forecast)?,
                    id: record.id,
                    name: record.name,
                    hub: record.hub,
                    staging: record.staging,
                    corridor: record.corridor,
                })
            }
            None => None,
        };

        let mut sites = Vec::with_capacity(self.sites.len());
        let mut hub_regions: HashMap<String, String> = HashMap::new();
        for record in self.sites {
            let owner = format!("site '{}'", record.id);
            require_hub(&owner, &record.hub)?;
            if !region_ids.contains(record.region.as_str()) {
                return Err(CatalogError::UnknownReference {
                    owner,
                    kind: "region",
                    id: record.region,
                });
            }

            let target: TargetRange =
                record
                    .target
                    .parse()
                    .map_err(|reason| CatalogError::InvalidRange {
                        site: record.id.clone(),
                        value: record.target.clone(),
                        reason,
                    })?;

            if !record.minimum.is_finite() || record.minimum < 0.0 {
                return Err(CatalogError::Validation {
                    field: format!("sites.{}.minimum", record.id),
                    message: "minimum must be a non-negative number".to_string(),
                });
            }

            let behavior = match record.behavior.as_deref() {
                None => BehaviorClass::Generic,
                Some(label) => BehaviorClass::from_label(label).unwrap_or_else(|| {
                    tracing::warn!(
                        site = %record.id,
                        behavior = label,
                        "Unknown behavior class, scoring as generic"
                    );
                    BehaviorClass::Generic
                }),
            };

            let mut gauges = Vec::with_capacity(record.gauges.len());
            for g in record.gauges {
                if g.id.trim().is_empty() {
                    return Err(CatalogError::Validation {
                        field: format!("sites.{}.gauges.id", record.id),
                        message: "gauge id cannot be empty".to_string(),
                    });
                }
                gauges.push(Gauge {
                    parameter: g
                        .parameter
                        .unwrap_or_else(|| default_parameter(g.source, target.unit).to_string()),
                    source: g.source,
                    id: g.id,
                });
            }

            hub_regions
                .entry(record.hub.clone())
                .or_insert_with(|| record.region.clone());

            sites.push(Site {
                coordinates: coordinates(&owner, record.lat, record.lon)?,
                id: record.id,
                name: record.name,
                region: record.region,
                hub: record.hub,
                gauges,
                target,
                minimum: record.minimum,
                behavior,
                preferred: record.preferred,
                closed: record.closed,
                notes: record.notes,
            });
        }

        let mut regions = Vec::with_capacity(self.regions.len());
        for record in self.regions {
            let owner = format!("region '{}'", record.id);
            let site_ids = sites
                .iter()
                .filter(|s| s.region == record.id)
                .map(|s| s.id.clone())
                .collect();
            regions.push(Region {
                forecast_point: point(&owner, record.forecast)?,
                id: record.id,
                name: record.name,
                naturally_ordered: record.naturally_ordered,
                extended_access: record.extended_access,
                site_ids,
            });
        }

        let mut hubs = Vec::with_capacity(self.hubs.len());
        for record in self.hubs {
            let owner = format!("hub '{}'", record.id);
            if let Some(price) = record.fuel_price {
                if !price.is_finite() || price < 0.0 {
                    return Err(CatalogError::Validation {
                        field: format!("hubs.{}.fuel_price", record.id),
                        message: "fuel price must be a non-negative number".to_string(),
                    });
                }
            }
            let region = record.region.or_else(|| {
                lake.as_ref()
                    .filter(|l| l.hub == record.id)
                    .map(|l| l.id.clone())
                    .or_else(|| hub_regions.get(&record.id).cloned())
            });
            hubs.push(Hub {
                coordinates: coordinates(&owner, record.lat, record.lon)?,
                name: record.name.unwrap_or_else(|| record.id.clone()),
                id: record.id,
                fuel_price: record.fuel_price,
                region,
            });
        }

        Ok(Catalog::assemble(self.home, hubs, regions, sites, lake))
    }
}

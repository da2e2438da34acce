//! Itinerary planning.
//!
//! [`Planner::plan`] runs the allocator and the itinerary builder over one
//! immutable [`PlanningRequest`]. Planning is synchronous and performs no
//! I/O; telemetry is gathered and scored beforehand and reaches the planner
//! only through the request's ratings.
//!
//! # Example
//!
//! ```rust
//! use chrono::NaiveDate;
//! use navigator::catalog::Catalog;
//! use navigator::config::PlannerConfig;
//! use navigator::planner::{Planner, PlanningRequest, Ratings, TripWindow};
//! use navigator::routing::RouteTable;
//!
//! let catalog = Catalog::builtin().unwrap();
//! let routes = RouteTable::builtin().unwrap();
//! let planner = Planner::new(&catalog, &routes, PlannerConfig::default());
//!
//! let start = NaiveDate::from_ymd_opt(2025, 1, 10).unwrap();
//! let window = TripWindow::from_length(start, 10).unwrap();
//! let request = PlanningRequest::new(window).with_ratings(Ratings::new().with("smith", 4.5));
//!
//! let itinerary = planner.plan(&request).unwrap();
//! assert_eq!(itinerary.days_consumed(), 10);
//! ```

pub mod allocator;
mod builder;
pub mod candidates;
mod error;
pub mod itinerary;
mod request;
pub mod sequencer;

pub use allocator::{Allocation, AllocationSlot, RegionCandidate};
pub use error::PlanError;
pub use itinerary::{ActivityKind, Itinerary, ItineraryEntry, ItinerarySummary, RouteSegment};
pub use request::{round_to_quarter, Economics, PlanningRequest, Ratings, TripWindow, Vetoes};

use crate::catalog::{Catalog, Site};
use crate::config::PlannerConfig;
use crate::routing::RouteProvider;
use builder::ItineraryBuilder;
use std::time::Instant;

/// Plans itineraries over a fixed catalog and route provider.
pub struct Planner<'a> {
    catalog: &'a Catalog,
    routes: &'a dyn RouteProvider,
    config: PlannerConfig,
}

impl<'a> Planner<'a> {
    pub fn new(catalog: &'a Catalog, routes: &'a dyn RouteProvider, config: PlannerConfig) -> Self {
        Self {
            catalog,
            routes,
            config,
        }
    }

    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }

    /// Rating the lake is planned with.
    pub fn lake_rating(&self, request: &PlanningRequest) -> Option<f64> {
        self.catalog.lake().map(|lake| {
            request
                .ratings
                .get(&lake.id)
                .unwrap_or(self.config.lake_default_rating)
        })
    }

    /// Regions eligible for days, in priority order.
    pub fn region_candidates(&self, request: &PlanningRequest) -> Vec<RegionCandidate> {
        self.catalog
            .regions()
            .iter()
            .filter(|region| !request.vetoes.is_vetoed(&region.id))
            .filter_map(|region| {
                let sites = candidates::region_candidates(
                    self.catalog,
                    region,
                    &request.ratings,
                    &request.vetoes,
                    self.config.preference_boost,
                );
                (!sites.is_empty()).then(|| RegionCandidate {
                    id: region.id.clone(),
                    score: candidates::region_score(&sites),
                    extended_access: region.extended_access,
                })
            })
            .collect()
    }

    /// Site a region would be based around, if any.
    pub fn representative(&self, region_id: &str, request: &PlanningRequest) -> Option<&'a Site> {
        let catalog = self.catalog;
        let region = catalog.region(region_id)?;
        let sites = candidates::region_candidates(
            catalog,
            region,
            &request.ratings,
            &request.vetoes,
            self.config.preference_boost,
        );
        candidates::representative(&sites).map(|c| c.site)
    }

    pub fn allocate(&self, request: &PlanningRequest) -> Allocation {
        let lake = self
            .catalog
            .lake()
            .filter(|lake| !request.vetoes.is_vetoed(&lake.id))
            .zip(self.lake_rating(request))
            .map(|(lake, rating)| (lake.id.as_str(), rating));
        allocator::allocate(
            request.window.length(),
            lake,
            &self.region_candidates(request),
            &self.config,
        )
    }

    /// Build the itinerary for `request`.
    pub fn plan(&self, request: &PlanningRequest) -> Result<Itinerary, PlanError> {
        let started = Instant::now();
        request.economics.validate()?;
        let start = request
            .start
            .clone()
            .unwrap_or_else(|| self.catalog.home_id().to_string());
        if self.catalog.hub(&start).is_none() {
            return Err(PlanError::UnknownStart(start));
        }

        let allocation = self.allocate(request);
        let itinerary = ItineraryBuilder::new(
            self.catalog,
            self.routes,
            &self.config,
            request,
            &allocation,
            start,
        )
        .build();

        let summary = itinerary.summary();
        metrics::histogram!("navigator_plan_duration_seconds")
            .record(started.elapsed().as_secs_f64());
        tracing::info!(
            trip_days = request.window.length(),
            fish_days = summary.fish_days,
            miles = summary.miles.round() as u64,
            fuel_cost = summary.fuel_cost,
            entries = itinerary.entries.len(),
            "Itinerary planned"
        );
        Ok(itinerary)
    }
}

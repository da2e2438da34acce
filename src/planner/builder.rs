//! Itinerary construction.
//!
//! A single forward pass over the trip: the lake excursion, one visit per
//! allocated region in priority order, slack days, then the mandatory
//! return home. Every phase checks that the return still fits before it
//! commits a day, so the schedule always ends at home on the last day.

use super::allocator::Allocation;
use super::candidates::{region_candidates, representative, Candidate};
use super::itinerary::{ActivityKind, Itinerary, ItineraryEntry, RouteSegment, TRANSIT};
use super::request::PlanningRequest;
use super::sequencer::{sequence, SequenceCandidate};
use crate::catalog::{Catalog, Lake, Region};
use crate::config::PlannerConfig;
use crate::routing::{Route, RouteProvider};
use chrono::{Days, NaiveDate};
use std::collections::HashSet;

/// Extra days needed to stay at a new base rather than the current one
const NEW_BASE_MIN_STAY: u32 = 2;
/// Days the corridor stop reserves for the coastal stay that follows
const CORRIDOR_COASTAL_RESERVE: u32 = 2;

pub(crate) struct ItineraryBuilder<'a> {
    catalog: &'a Catalog,
    routes: &'a dyn RouteProvider,
    config: &'a PlannerConfig,
    request: &'a PlanningRequest,
    allocation: &'a Allocation,
    trip_days: u32,
    date: NaiveDate,
    location: String,
    days_used: u32,
    visited: HashSet<String>,
    last_site: Option<String>,
    entries: Vec<ItineraryEntry>,
    segments: Vec<RouteSegment>,
}

impl<'a> ItineraryBuilder<'a> {
    pub(crate) fn new(
        catalog: &'a Catalog,
        routes: &'a dyn RouteProvider,
        config: &'a PlannerConfig,
        request: &'a PlanningRequest,
        allocation: &'a Allocation,
        start: String,
    ) -> Self {
        Self {
            catalog,
            routes,
            config,
            request,
            allocation,
            trip_days: request.window.length(),
            date: request.window.start(),
            location: start,
            days_used: 0,
            visited: HashSet::new(),
            last_site: None,
            entries: Vec::new(),
            segments: Vec::new(),
        }
    }

    pub(crate) fn build(mut self) -> Itinerary {
        let catalog = self.catalog;
        if let Some(lake) = catalog.lake() {
            if self.lake_excursion(lake) {
                self.corridor_stop(lake);
            }
        }
        for region in catalog.regions() {
            self.visit_region(region);
        }
        self.fill_slack();
        self.return_home();

        Itinerary {
            window: self.request.window,
            allocation: self.allocation.clone(),
            entries: self.entries,
            segments: self.segments,
        }
    }

    fn home(&self) -> &'a str {
        self.catalog.home_id()
    }

    fn route(&self, from: &str, to: &str) -> Route {
        match (self.catalog.hub(from), self.catalog.hub(to)) {
            (Some(a), Some(b)) => self.routes.route(a, b),
            _ => Route::stationary(),
        }
    }

    /// Driving days needed to get home from `hub`; none from home itself.
    fn return_days_from(&self, hub: &str) -> u32 {
        if hub == self.home() {
            return 0;
        }
        self.config.return_days(self.route(hub, self.home()).hours)
    }

    fn drive_consumes_day(&self, route: &Route) -> bool {
        route.hours > self.config.day_consuming_drive_hours
    }

    fn fuel_cost(&self, from: &str, miles: f64) -> f64 {
        let price = self.catalog.hub(from).and_then(|h| h.fuel_price);
        self.request.economics.fuel_cost(miles, price)
    }

    fn remaining(&self) -> u32 {
        self.trip_days.saturating_sub(self.days_used)
    }

    fn push(&mut self, entry: ItineraryEntry) {
        if entry.consumes_day {
            self.days_used += 1;
            self.date = self.date + Days::new(1);
        }
        self.entries.push(entry);
    }

    fn record_segment(&mut self, from: &str, to: &str, route: &Route) {
        self.segments.push(RouteSegment {
            from: from.to_string(),
            to: to.to_string(),
            miles: route.miles,
            hours: route.hours,
            geometry: route.geometry.clone(),
            source: route.source,
        });
    }

    /// Drive from the current location to `to`; returns the entry's date.
    fn drive(&mut self, to: &str, force_consume: bool) -> NaiveDate {
        let from = self.location.clone();
        let route = self.route(&from, to);
        let consumes_day = force_consume || self.drive_consumes_day(&route);
        let date = self.date;
        self.record_segment(&from, to, &route);
        let entry = ItineraryEntry {
            date,
            location: to.to_string(),
            origin: Some(from.clone()),
            kind: ActivityKind::Drive,
            description: format!(
                "Drive {} to {} ({:.0} mi, {:.1} h)",
                self.catalog.hub_name(&from),
                self.catalog.hub_name(to),
                route.miles,
                route.hours
            ),
            site: None,
            miles: route.miles,
            hours: route.hours,
            cost: self.fuel_cost(&from, route.miles),
            consumes_day,
        };
        self.push(entry);
        self.location = to.to_string();
        date
    }

    fn fish(&mut self, site: Option<&str>, description: String) {
        let entry = ItineraryEntry {
            date: self.date,
            location: self.location.clone(),
            origin: None,
            kind: ActivityKind::Fish,
            description,
            site: site.map(str::to_string),
            miles: 0.0,
            hours: 0.0,
            cost: 0.0,
            consumes_day: true,
        };
        self.push(entry);
        self.last_site = site.map(str::to_string);
    }

    fn rest(&mut self, description: String) {
        let entry = ItineraryEntry {
            date: self.date,
            location: self.location.clone(),
            origin: None,
            kind: ActivityKind::Rest,
            description,
            site: None,
            miles: 0.0,
            hours: 0.0,
            cost: 0.0,
            consumes_day: true,
        };
        self.push(entry);
    }

    /// Drive to the lake (through the staging waypoint when the direct drive
    /// is too long) and fish it. Returns whether any lake day was fished.
    fn lake_excursion(&mut self, lake: &'a Lake) -> bool {
        let allocated = self.allocation.days(&lake.id);
        if allocated == 0 {
            return false;
        }

        let at_home = self.location == self.home();
        let on_corridor =
            self.location == lake.hub || lake.staging.as_deref() == Some(self.location.as_str());
        if !at_home && !on_corridor {
            tracing::debug!(start = %self.location, "Start is off the lake corridor, skipping lake");
            return false;
        }

        let mut legs: Vec<&str> = Vec::new();
        if self.location != lake.hub {
            let direct = self.route(&self.location, &lake.hub);
            match lake.staging.as_deref() {
                Some(staging)
                    if direct.hours > self.config.comfortable_drive_hours
                        && self.location != staging =>
                {
                    legs.push(staging);
                }
                _ => {}
            }
            legs.push(&lake.hub);
        }

        let mut travel_days = 0;
        let mut from = self.location.clone();
        for leg in &legs {
            if self.drive_consumes_day(&self.route(&from, leg)) {
                travel_days += 1;
            }
            from = leg.to_string();
        }

        let return_days = self.return_days_from(&lake.hub);
        if self.days_used + travel_days + 1 + return_days > self.trip_days {
            tracing::debug!(
                travel_days,
                return_days,
                trip_days = self.trip_days,
                "Lake does not fit, skipping"
            );
            return false;
        }

        for leg in legs {
            self.drive(leg, false);
        }

        let rating = self
            .request
            .ratings
            .get(&lake.id)
            .unwrap_or(self.config.lake_default_rating);
        let lake_days = allocated.min(self.config.lake_tier(rating));
        let mut fished = 0;
        for day in 0..lake_days {
            if self.days_used + return_days >= self.trip_days {
                break;
            }
            self.fish(
                Some(lake.id.as_str()),
                format!("Fish {} (day {})", lake.name, day + 1),
            );
            fished += 1;
        }
        self.visited.insert(lake.id.clone());
        fished > 0
    }

    /// Half-day stop at the corridor waypoint on the way to the coast.
    fn corridor_stop(&mut self, lake: &Lake) {
        let Some(corridor) = lake.corridor.as_deref() else {
            return;
        };
        if self.request.vetoes.is_vetoed(corridor)
            || self
                .catalog
                .region_of_hub(corridor)
                .is_some_and(|r| self.request.vetoes.is_vetoed(r))
        {
            return;
        }
        let coastal_follows = self
            .allocation
            .slots()
            .iter()
            .any(|s| !s.is_lake && s.days > 0 && !self.request.vetoes.is_vetoed(&s.id));
        if !coastal_follows {
            return;
        }
        let needed = 1 + CORRIDOR_COASTAL_RESERVE + self.return_days_from(corridor);
        if self.days_used + needed > self.trip_days {
            tracing::debug!("No room for the corridor stop");
            return;
        }

        let date = self.drive(corridor, true);
        self.entries.push(ItineraryEntry {
            date,
            location: corridor.to_string(),
            origin: None,
            kind: ActivityKind::Fish,
            description: format!("Half-day fish near {}", self.catalog.hub_name(corridor)),
            site: None,
            miles: 0.0,
            hours: 0.0,
            cost: 0.0,
            consumes_day: false,
        });
        self.last_site = None;
    }

    fn visit_region(&mut self, region: &'a Region) {
        let vetoes = &self.request.vetoes;
        if vetoes.is_vetoed(&region.id) || self.visited.contains(&region.id) {
            return;
        }
        let allocated = self.allocation.days(&region.id);
        if allocated == 0 {
            return;
        }

        let candidates = region_candidates(
            self.catalog,
            region,
            &self.request.ratings,
            vetoes,
            self.config.preference_boost,
        );
        let Some(top) = representative(&candidates) else {
            return;
        };
        if top.boosted < self.config.fishable_minimum {
            tracing::debug!(
                region = %region.id,
                best = top.boosted,
                "No fishable site in region, skipping"
            );
            return;
        }

        let base = top.site.hub.clone();
        let moving = base != self.location;
        let move_days = if moving && self.drive_consumes_day(&self.route(&self.location, &base)) {
            1
        } else {
            0
        };
        let min_stay = if moving { NEW_BASE_MIN_STAY } else { 1 };
        let return_days = self.return_days_from(&base);
        let fixed = self.days_used + move_days + return_days;
        if fixed + min_stay > self.trip_days {
            tracing::debug!(
                region = %region.id,
                days_used = self.days_used,
                move_days,
                min_stay,
                return_days,
                "Region does not fit, skipping"
            );
            return;
        }
        let stay = allocated.max(min_stay).min(self.trip_days - fixed);

        let plan = self.day_sites(region, &candidates, stay as usize);
        if moving {
            self.drive(&base, false);
        }
        // Days beyond the visit list stay at its last site.
        for site_id in (0..stay as usize).filter_map(|day| plan.get(day).or(plan.last())) {
            let description = format!("Fish {}", self.catalog.site_name(site_id));
            self.fish(Some(site_id.as_str()), description);
        }
        self.visited.insert(region.id.clone());
        tracing::debug!(region = %region.id, base = %base, stay, "Region scheduled");
    }

    /// Site for each stay day; never empty when `candidates` is not.
    fn day_sites(&self, region: &Region, candidates: &[Candidate], stay: usize) -> Vec<String> {
        let mut plan = if region.naturally_ordered {
            let line: Vec<SequenceCandidate> = candidates
                .iter()
                .map(|c| SequenceCandidate {
                    id: c.site.id.clone(),
                    position: c.position,
                    rating: c.rating,
                })
                .collect();
            sequence(&line, stay, self.config.reverse_margin)
        } else {
            let mut ranked: Vec<&Candidate> = candidates.iter().collect();
            ranked.sort_by(|a, b| {
                b.boosted
                    .total_cmp(&a.boosted)
                    .then(a.position.cmp(&b.position))
            });
            ranked.into_iter().take(stay).map(|c| c.site.id.clone()).collect()
        };
        if plan.is_empty() {
            if let Some(top) = representative(candidates) {
                plan.push(top.site.id.clone());
            }
        }
        plan
    }

    /// Spend days beyond what the return needs at the current location.
    fn fill_slack(&mut self) {
        let return_days = self.return_days_from(&self.location);
        let slack = self.remaining().saturating_sub(return_days);
        if slack == 0 {
            return;
        }
        tracing::debug!(slack, location = %self.location, "Filling slack days");

        let at_home = self.location == self.home();
        for _ in 0..slack {
            if at_home {
                self.rest("Rest day at home".to_string());
                continue;
            }
            match self.last_site.clone() {
                Some(site) => {
                    let description = format!("Extra day on {}", self.catalog.site_name(&site));
                    self.fish(Some(site.as_str()), description);
                }
                None => {
                    let description =
                        format!("Extra day near {}", self.catalog.hub_name(&self.location));
                    self.fish(None, description);
                }
            }
        }
    }

    /// Drive home in one to three equal legs.
    fn return_home(&mut self) {
        let home = self.home();
        if self.location == home {
            return;
        }
        let from = self.location.clone();
        let route = self.route(&from, home);
        let legs = self
            .config
            .return_days(route.hours)
            .min(self.remaining())
            .max(1);
        let cost = self.fuel_cost(&from, route.miles);
        self.record_segment(&from, home, &route);

        for leg in 0..legs {
            let last = leg + 1 == legs;
            let origin = if leg == 0 { from.clone() } else { TRANSIT.to_string() };
            let location = if last { home.to_string() } else { TRANSIT.to_string() };
            let description = if legs == 1 {
                format!("Drive home from {}", self.catalog.hub_name(&from))
            } else {
                format!(
                    "Return leg {} of {} from {}",
                    leg + 1,
                    legs,
                    self.catalog.hub_name(&from)
                )
            };
            self.push(ItineraryEntry {
                date: self.date,
                location: location.clone(),
                origin: Some(origin),
                kind: ActivityKind::ReturnLeg,
                description,
                site: None,
                miles: route.miles / f64::from(legs),
                hours: route.hours / f64::from(legs),
                cost: cost / f64::from(legs),
                consumes_day: true,
            });
            self.location = location;
        }
    }
}

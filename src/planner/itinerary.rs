//! The emitted schedule.

use super::allocator::Allocation;
use super::request::TripWindow;
use crate::catalog::Catalog;
use crate::routing::RouteSource;
use chrono::NaiveDate;
use serde::Serialize;
use std::fmt;

/// Location id used for overnight stops between return legs.
pub const TRANSIT: &str = "transit";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ActivityKind {
    Drive,
    Fish,
    ReturnLeg,
    Rest,
}

impl fmt::Display for ActivityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ActivityKind::Drive => "DRIVE",
            ActivityKind::Fish => "FISH",
            ActivityKind::ReturnLeg => "RETURN",
            ActivityKind::Rest => "REST",
        };
        f.write_str(label)
    }
}

/// One line of the schedule.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ItineraryEntry {
    pub date: NaiveDate,
    /// Hub the activity ends at
    pub location: String,
    /// Hub a travel entry starts from
    #[serde(skip_serializing_if = "Option::is_none")]
    pub origin: Option<String>,
    pub kind: ActivityKind,
    pub description: String,
    /// Site (or lake) fished
    #[serde(skip_serializing_if = "Option::is_none")]
    pub site: Option<String>,
    pub miles: f64,
    pub hours: f64,
    pub cost: f64,
    pub consumes_day: bool,
}

/// Path of one drive, for map consumers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RouteSegment {
    pub from: String,
    pub to: String,
    pub miles: f64,
    pub hours: f64,
    /// `[lon, lat]` pairs
    pub geometry: Vec<[f64; 2]>,
    pub source: RouteSource,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ItinerarySummary {
    pub total_days: u32,
    pub fish_days: u32,
    pub travel_days: u32,
    pub rest_days: u32,
    pub miles: f64,
    pub hours: f64,
    pub fuel_cost: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Itinerary {
    pub window: TripWindow,
    pub allocation: Allocation,
    pub entries: Vec<ItineraryEntry>,
    pub segments: Vec<RouteSegment>,
}

impl Itinerary {
    pub fn entries(&self) -> &[ItineraryEntry] {
        &self.entries
    }

    /// Calendar days consumed by the schedule.
    pub fn days_consumed(&self) -> u32 {
        self.entries.iter().filter(|e| e.consumes_day).count() as u32
    }

    pub fn summary(&self) -> ItinerarySummary {
        let consuming = |kind: ActivityKind| {
            self.entries
                .iter()
                .filter(|e| e.consumes_day && e.kind == kind)
                .count() as u32
        };
        ItinerarySummary {
            total_days: self.days_consumed(),
            fish_days: consuming(ActivityKind::Fish),
            travel_days: consuming(ActivityKind::Drive) + consuming(ActivityKind::ReturnLeg),
            rest_days: consuming(ActivityKind::Rest),
            miles: self.entries.iter().map(|e| e.miles).sum(),
            hours: self.entries.iter().map(|e| e.hours).sum(),
            fuel_cost: self.entries.iter().map(|e| e.cost).sum(),
        }
    }

    /// Fishing days per region (or lake), in order of first appearance.
    ///
    /// Entries are grouped by the region their location hub serves; hubs that
    /// serve no region are left out.
    pub fn days_by_region(&self, catalog: &Catalog) -> Vec<(String, u32)> {
        let mut counts: Vec<(String, u32)> = Vec::new();
        for entry in self
            .entries
            .iter()
            .filter(|e| e.kind == ActivityKind::Fish && e.consumes_day)
        {
            let Some(region) = catalog.region_of_hub(&entry.location) else {
                continue;
            };
            match counts.iter_mut().find(|(id, _)| id == region) {
                Some((_, days)) => *days += 1,
                None => counts.push((region.to_string(), 1)),
            }
        }
        counts
    }
}

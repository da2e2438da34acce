//! Steelhead Navigator - river conditions scoring and expedition planning
//!
//! This library scores steelhead rivers from live gauge telemetry and weather
//! forecasts, then plans a day-by-day road-trip itinerary across coastal
//! regions and an optional lake excursion.

pub mod catalog;
pub mod cli;
pub mod config;
pub mod logging;
pub mod planner;
pub mod routing;
pub mod scoring;
pub mod telemetry;

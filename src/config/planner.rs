//! Planner thresholds and trip economics.

use serde::{Deserialize, Serialize};

/// Thresholds used by the allocator, sequencer and itinerary builder.
///
/// One threshold set is carried; every field can be overridden from the
/// `[planner]` section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlannerConfig {
    /// Lake rating that earns three lake days
    pub lake_three_day_rating: f64,
    /// Lake rating that earns two lake days
    pub lake_two_day_rating: f64,
    /// Lake is left out of the plan below this rating
    pub lake_minimum_rating: f64,
    /// Lake rating used when the operator supplies none
    pub lake_default_rating: f64,
    /// Coastal scores below this mean the coast is not worth the drive
    pub not_worth_it_score: f64,
    /// Second-best region is only raised to two days at or above this score
    pub second_best_minimum_score: f64,
    /// Day floor for regions flagged as extended access
    pub extended_access_floor: u32,
    /// A region needs a candidate at or above this (boosted) rating
    pub fishable_minimum: f64,
    /// Selection-only boost for preferred sites
    pub preference_boost: f64,
    /// Sequencer reverses only for a rating gain of at least this much
    pub reverse_margin: f64,
    /// Longest drive that still counts as a comfortable single day
    pub comfortable_drive_hours: f64,
    /// Drives longer than this consume a day
    pub day_consuming_drive_hours: f64,
    /// Return trips up to this long are driven in one leg
    pub single_leg_return_hours: f64,
    /// Return trips up to this long are driven in two legs, longer ones in three
    pub two_leg_return_hours: f64,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            lake_three_day_rating: 3.5,
            lake_two_day_rating: 3.25,
            lake_minimum_rating: 0.5,
            lake_default_rating: 3.5,
            not_worth_it_score: 1.0,
            second_best_minimum_score: 2.0,
            extended_access_floor: 2,
            fishable_minimum: 2.5,
            preference_boost: 1.5,
            reverse_margin: 0.5,
            comfortable_drive_hours: 10.0,
            day_consuming_drive_hours: 4.0,
            single_leg_return_hours: 12.0,
            two_leg_return_hours: 27.0,
        }
    }
}

impl PlannerConfig {
    /// Lake days earned by a rating: 3, 2 or 1.
    pub fn lake_tier(&self, rating: f64) -> u32 {
        if rating >= self.lake_three_day_rating {
            3
        } else if rating >= self.lake_two_day_rating {
            2
        } else {
            1
        }
    }

    /// Number of driving days needed to cover a return of `hours`.
    pub fn return_days(&self, hours: f64) -> u32 {
        if hours <= self.single_leg_return_hours {
            1
        } else if hours <= self.two_leg_return_hours {
            2
        } else {
            3
        }
    }
}

/// Fuel economics applied to every drive leg.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EconomicsConfig {
    /// Vehicle fuel efficiency in miles per gallon
    pub mpg: f64,
    /// Signed adjustment added to every hub's fuel price
    pub price_adjustment: f64,
    /// Price used for locations without a known fuel price
    pub default_fuel_price: f64,
}

impl Default for EconomicsConfig {
    fn default() -> Self {
        Self {
            mpg: 20.0,
            price_adjustment: 0.0,
            default_fuel_price: 4.00,
        }
    }
}

//! Splits the trip's day budget across the lake and coastal regions.

use crate::config::PlannerConfig;
use serde::Serialize;

/// A coastal region eligible for days.
#[derive(Debug, Clone, PartialEq)]
pub struct RegionCandidate {
    pub id: String,
    /// Sum of the region's two best site ratings
    pub score: f64,
    pub extended_access: bool,
}

/// Days granted to one region (or the lake).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AllocationSlot {
    pub id: String,
    pub days: u32,
    pub is_lake: bool,
}

/// Allocator output: the lake first, then regions in priority order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Allocation {
    slots: Vec<AllocationSlot>,
}

impl Allocation {
    pub fn days(&self, id: &str) -> u32 {
        self.slots
            .iter()
            .find(|s| s.id == id)
            .map_or(0, |s| s.days)
    }

    pub fn total(&self) -> u32 {
        self.slots.iter().map(|s| s.days).sum()
    }

    pub fn slots(&self) -> &[AllocationSlot] {
        &self.slots
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Whether any coastal region received days.
    pub fn has_coastal(&self) -> bool {
        self.slots.iter().any(|s| !s.is_lake && s.days > 0)
    }
}

#[derive(Debug, Clone)]
struct Slot {
    id: String,
    score: f64,
    days: u32,
    minimum: u32,
    is_lake: bool,
    /// 0 for the lake, 1.. for regions in priority order
    priority: usize,
}

/// Lowest score first; on equal scores the later priority loses.
fn weakest<'a>(slots: impl Iterator<Item = &'a Slot>) -> Option<&'a Slot> {
    slots.fold(None, |weakest: Option<&Slot>, s| match weakest {
        Some(w) if w.score < s.score || (w.score == s.score && w.priority > s.priority) => Some(w),
        _ => Some(s),
    })
}

/// Allocate `trip_days` across the lake and `regions` (given in priority order).
///
/// `lake` is the lake id and its rating, or `None` when the lake is vetoed or
/// absent. The result never exceeds `trip_days`; any shortfall surfaces as
/// slack in the itinerary.
pub fn allocate(
    trip_days: u32,
    lake: Option<(&str, f64)>,
    regions: &[RegionCandidate],
    config: &PlannerConfig,
) -> Allocation {
    let mut slots: Vec<Slot> = Vec::new();

    if let Some((id, rating)) = lake {
        if rating >= config.lake_minimum_rating {
            let tier = config.lake_tier(rating);
            slots.push(Slot {
                id: id.to_string(),
                score: rating,
                days: tier,
                minimum: tier,
                is_lake: true,
                priority: 0,
            });
        } else {
            tracing::debug!(lake = id, rating, "Lake rated below minimum, leaving it out");
        }
    }

    for (i, region) in regions.iter().enumerate().filter(|(_, r)| !r.extended_access) {
        slots.push(Slot {
            id: region.id.clone(),
            score: region.score,
            days: 1,
            minimum: 1,
            is_lake: false,
            priority: i + 1,
        });
    }

    let mut committed: u32 = slots.iter().map(|s| s.days).sum();
    let floor = config.extended_access_floor.max(1);
    for (i, region) in regions.iter().enumerate().filter(|(_, r)| r.extended_access) {
        if committed + floor > trip_days {
            tracing::debug!(region = %region.id, "Not enough days for extended-access region");
            continue;
        }
        committed += floor;
        slots.push(Slot {
            id: region.id.clone(),
            score: region.score,
            days: floor,
            minimum: floor,
            is_lake: false,
            priority: i + 1,
        });
    }

    // Over budget: trim the weakest slot that can give a day back, then
    // drop the weakest slots outright.
    loop {
        let total: u32 = slots.iter().map(|s| s.days).sum();
        if total <= trip_days {
            break;
        }
        let reducible = weakest(slots.iter().filter(|s| s.days > s.minimum)).map(|s| s.id.clone());
        if let Some(id) = reducible {
            if let Some(slot) = slots.iter_mut().find(|s| s.id == id) {
                slot.days -= 1;
            }
            continue;
        }
        let Some(id) = weakest(slots.iter()).map(|s| s.id.clone()) else {
            break;
        };
        tracing::debug!(region = %id, "Dropping region to fit the trip");
        slots.retain(|s| s.id != id);
    }

    let mut remainder = trip_days - slots.iter().map(|s| s.days).sum::<u32>();

    // Coastal slots ranked best first; ties keep priority order.
    let mut ranked: Vec<usize> = (0..slots.len()).filter(|&i| !slots[i].is_lake).collect();
    ranked.sort_by(|&a, &b| {
        slots[b]
            .score
            .total_cmp(&slots[a].score)
            .then(slots[a].priority.cmp(&slots[b].priority))
    });
    let lake_index = slots.iter().position(|s| s.is_lake);
    let coast_worth_it = ranked
        .first()
        .is_some_and(|&i| slots[i].score >= config.not_worth_it_score);

    if remainder > 0 {
        if !coast_worth_it {
            if let Some(target) = lake_index.or(ranked.first().copied()) {
                slots[target].days += remainder;
            }
        } else {
            if let Some(&second) = ranked.get(1) {
                if slots[second].score >= config.second_best_minimum_score && slots[second].days < 2 {
                    let raise = (2 - slots[second].days).min(remainder);
                    slots[second].days += raise;
                    remainder -= raise;
                }
            }
            slots[ranked[0]].days += remainder;
        }
    }

    slots.sort_by_key(|s| s.priority);
    let allocation = Allocation {
        slots: slots
            .into_iter()
            .map(|s| AllocationSlot {
                id: s.id,
                days: s.days,
                is_lake: s.is_lake,
            })
            .collect(),
    };
    tracing::debug!(total = allocation.total(), trip_days, "Days allocated");
    allocation
}

#[cfg(test)]
mod tests {
    use super::*;

    fn region(id: &str, score: f64) -> RegionCandidate {
        RegionCandidate {
            id: id.to_string(),
            score,
            extended_access: false,
        }
    }

    fn extended(id: &str, score: f64) -> RegionCandidate {
        RegionCandidate {
            extended_access: true,
            ..region(id, score)
        }
    }

    #[test]
    fn test_remainder_goes_to_best_region() {
        let regions = [region("norcal", 1.0), region("south-oregon", 4.2)];
        let allocation = allocate(8, None, &regions, &PlannerConfig::default());
        assert_eq!(allocation.days("norcal"), 1);
        assert_eq!(allocation.days("south-oregon"), 7);
    }

    #[test]
    fn test_second_best_raised_to_two() {
        let regions = [region("a", 7.0), region("b", 5.0), region("c", 3.0)];
        let allocation = allocate(10, None, &regions, &PlannerConfig::default());
        assert_eq!(allocation.days("b"), 2);
        assert_eq!(allocation.days("c"), 1);
        assert_eq!(allocation.days("a"), 7);
    }

    #[test]
    fn test_lake_tiers() {
        let config = PlannerConfig::default();
        let regions = [region("a", 6.0)];
        assert_eq!(allocate(10, Some(("lake", 3.5)), &regions, &config).days("lake"), 3);
        assert_eq!(allocate(10, Some(("lake", 3.25)), &regions, &config).days("lake"), 2);
        assert_eq!(allocate(10, Some(("lake", 1.0)), &regions, &config).days("lake"), 1);
        assert_eq!(allocate(10, Some(("lake", 0.25)), &regions, &config).days("lake"), 0);
    }

    #[test]
    fn test_lake_listed_first() {
        let allocation = allocate(10, Some(("lake", 4.0)), &[region("a", 6.0)], &PlannerConfig::default());
        assert!(allocation.slots()[0].is_lake);
        assert_eq!(allocation.total(), 10);
    }

    #[test]
    fn test_degenerate_coast_sends_days_to_lake() {
        let regions = [region("a", 0.5), region("b", 0.75)];
        let allocation = allocate(9, Some(("lake", 4.0)), &regions, &PlannerConfig::default());
        assert_eq!(allocation.days("lake"), 7);
        assert_eq!(allocation.days("a"), 1);
        assert_eq!(allocation.days("b"), 1);
    }

    #[test]
    fn test_degenerate_without_lake_sends_days_to_best() {
        let regions = [region("a", 0.5), region("b", 0.75)];
        let allocation = allocate(5, None, &regions, &PlannerConfig::default());
        assert_eq!(allocation.days("b"), 4);
    }

    #[test]
    fn test_no_coast_sends_everything_to_lake() {
        let allocation = allocate(5, Some(("lake", 4.0)), &[], &PlannerConfig::default());
        assert_eq!(allocation.days("lake"), 5);
    }

    #[test]
    fn test_extended_access_dropped_when_budget_is_short() {
        let regions = [region("a", 6.0), region("b", 5.0), extended("olympic", 9.0)];
        let allocation = allocate(5, Some(("lake", 4.0)), &regions, &PlannerConfig::default());
        assert_eq!(allocation.days("olympic"), 0);
        assert_eq!(allocation.total(), 5);
    }

    #[test]
    fn test_extended_access_gets_floor() {
        let regions = [region("a", 6.0), extended("olympic", 2.0)];
        let allocation = allocate(6, None, &regions, &PlannerConfig::default());
        assert_eq!(allocation.days("olympic"), 2);
        assert_eq!(allocation.days("a"), 4);
    }

    #[test]
    fn test_over_budget_trims_then_drops() {
        let regions = [region("a", 6.0), region("b", 2.0), region("c", 4.0)];
        let allocation = allocate(2, Some(("lake", 4.0)), &regions, &PlannerConfig::default());
        // Nothing sits above its floor, so b drops, c loses the 4.0 tie to
        // the lake, then the lake goes and a takes what is left.
        assert_eq!(allocation.total(), 2);
        assert_eq!(allocation.days("b"), 0);
        assert_eq!(allocation.days("c"), 0);
        assert_eq!(allocation.days("lake"), 0);
        assert_eq!(allocation.days("a"), 2);
    }

    #[test]
    fn test_over_budget_keeps_lake_tier() {
        let regions = [
            region("a", 8.0),
            region("b", 8.0),
            region("c", 4.0),
            region("d", 4.0),
            region("e", 4.0),
        ];
        let config = PlannerConfig::default();

        let allocation = allocate(7, Some(("lake", 4.0)), &regions, &config);
        assert_eq!(allocation.days("lake"), 3);
        assert_eq!(allocation.days("e"), 0);
        assert_eq!(allocation.total(), 7);

        let regions = [region("a", 8.0), region("b", 8.0), region("c", 3.0), region("d", 3.0)];
        let allocation = allocate(5, Some(("lake", 3.25)), &regions, &config);
        assert_eq!(allocation.days("lake"), 2);
        assert_eq!(allocation.days("d"), 0);
        assert_eq!(allocation.total(), 5);
    }

    #[test]
    fn test_single_day_trip() {
        let regions = [region("a", 6.0), region("b", 8.0)];
        let allocation = allocate(1, None, &regions, &PlannerConfig::default());
        assert_eq!(allocation.total(), 1);
        assert_eq!(allocation.days("b"), 1);
    }

    #[test]
    fn test_deterministic() {
        let regions = [region("a", 3.0), region("b", 3.0), extended("c", 3.0)];
        let config = PlannerConfig::default();
        let first = allocate(7, Some(("lake", 3.3)), &regions, &config);
        let second = allocate(7, Some(("lake", 3.3)), &regions, &config);
        assert_eq!(first, second);
    }
}

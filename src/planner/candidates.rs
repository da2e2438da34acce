//! Candidate sites of a region under a fixed set of ratings and vetoes.

use super::request::{Ratings, Vetoes};
use crate::catalog::{Catalog, Region, Site};

#[derive(Debug, Clone)]
pub struct Candidate<'a> {
    pub site: &'a Site,
    /// Index in the region's natural order
    pub position: usize,
    pub rating: f64,
    /// Rating plus the preference boost; used only to pick the representative
    pub boosted: f64,
}

/// Sites of `region` that can be fished: open, not vetoed, rated above 0.
pub fn region_candidates<'a>(
    catalog: &'a Catalog,
    region: &'a Region,
    ratings: &Ratings,
    vetoes: &Vetoes,
    preference_boost: f64,
) -> Vec<Candidate<'a>> {
    catalog
        .sites_in(region)
        .enumerate()
        .filter(|(_, site)| !site.closed && !vetoes.is_vetoed(&site.id))
        .filter_map(|(position, site)| {
            let rating = ratings.of(&site.id);
            (rating > 0.0).then(|| Candidate {
                site,
                position,
                rating,
                boosted: if site.preferred {
                    rating + preference_boost
                } else {
                    rating
                },
            })
        })
        .collect()
}

/// Highest boosted rating; ties go to the earlier site.
pub fn representative<'c, 'a>(candidates: &'c [Candidate<'a>]) -> Option<&'c Candidate<'a>> {
    candidates.iter().fold(None, |best: Option<&Candidate>, c| match best {
        Some(b) if b.boosted >= c.boosted => Some(b),
        _ => Some(c),
    })
}

/// Region score used for allocation: sum of the two best ratings.
pub fn region_score(candidates: &[Candidate]) -> f64 {
    let mut ratings: Vec<f64> = candidates.iter().map(|c| c.rating).collect();
    ratings.sort_by(|a, b| b.total_cmp(a));
    ratings.iter().take(2).sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    const CATALOG: &str = r#"
        home = "home"

        [[hubs]]
        id = "home"
        lat = 40.0
        lon = -111.0

        [[hubs]]
        id = "camp"
        lat = 42.0
        lon = -124.2

        [[regions]]
        id = "coast"
        name = "Coast"
        naturally_ordered = true

        [[sites]]
        id = "a"
        name = "A"
        region = "coast"
        hub = "camp"
        lat = 42.0
        lon = -124.2
        target = "500-2000 cfs"

        [[sites]]
        id = "b"
        name = "B"
        region = "coast"
        hub = "camp"
        lat = 42.1
        lon = -124.2
        target = "500-2000 cfs"
        preferred = true

        [[sites]]
        id = "c"
        name = "C"
        region = "coast"
        hub = "camp"
        lat = 42.2
        lon = -124.2
        target = "500-2000 cfs"
        closed = true
    "#;

    #[test]
    fn test_candidates_exclude_closed_vetoed_and_unrated() {
        let catalog = Catalog::from_toml(CATALOG).unwrap();
        let region = catalog.region("coast").unwrap();
        let ratings = Ratings::new().with("a", 3.0).with("b", 0.0).with("c", 5.0);

        let candidates = region_candidates(&catalog, region, &ratings, &Vetoes::new(), 1.5);
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].site.id, "a");

        let vetoes = Vetoes::new().with("a");
        assert!(region_candidates(&catalog, region, &ratings, &vetoes, 1.5).is_empty());
    }

    #[test]
    fn test_preference_boost_picks_representative() {
        let catalog = Catalog::from_toml(CATALOG).unwrap();
        let region = catalog.region("coast").unwrap();
        let ratings = Ratings::new().with("a", 3.5).with("b", 2.5);

        let candidates = region_candidates(&catalog, region, &ratings, &Vetoes::new(), 1.5);
        assert_eq!(representative(&candidates).unwrap().site.id, "b");
        assert_eq!(region_score(&candidates), 6.0);
    }

    #[test]
    fn test_representative_tie_goes_to_earlier_site() {
        let catalog = Catalog::from_toml(CATALOG).unwrap();
        let region = catalog.region("coast").unwrap();
        let ratings = Ratings::new().with("a", 3.0).with("b", 3.0);

        let candidates = region_candidates(&catalog, region, &ratings, &Vetoes::new(), 0.0);
        assert_eq!(representative(&candidates).unwrap().site.id, "a");
    }
}

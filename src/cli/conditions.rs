//! Conditions command handler

use crate::catalog::Catalog;
use crate::cli::output::{format_conditions_json, format_conditions_table, ConditionView};
use crate::cli::{gather_scores, init_tracing, load_config, load_sources, ConditionsArgs};
use crate::planner::Ratings;
use crate::scoring::SiteScore;
use anyhow::bail;

/// Handle `navigator conditions`
pub async fn run_conditions(args: ConditionsArgs) -> anyhow::Result<String> {
    let config = load_config(&args.config, args.log_level.as_deref())?;
    init_tracing(&config.logging)?;

    let (catalog, _) = load_sources(&config)?;
    if let Some(region) = &args.region {
        if catalog.region(region).is_none() {
            bail!("Unknown region: {}", region);
        }
    }

    let scores = gather_scores(&config, &catalog, args.offline).await?;
    let views = condition_views(&catalog, &scores, args.region.as_deref());

    if args.json {
        Ok(format_conditions_json(&views)?)
    } else {
        Ok(format_conditions_table(&views))
    }
}

/// Views for every scored site, optionally narrowed to one region.
pub fn condition_views(
    catalog: &Catalog,
    scores: &[SiteScore],
    region: Option<&str>,
) -> Vec<ConditionView> {
    let ratings = Ratings::from_scores(scores);
    let selected: Vec<SiteScore> = scores
        .iter()
        .filter(|s| region.is_none_or(|r| s.region == r))
        .cloned()
        .collect();
    ConditionView::collect(catalog, &selected, &ratings)
}

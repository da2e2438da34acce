//! Plan command handler

use crate::catalog::Catalog;
use crate::cli::output::{format_itinerary_json, format_itinerary_table};
use crate::cli::{gather_scores, init_tracing, load_config, load_sources, PlanArgs};
use crate::config::NavigatorConfig;
use crate::planner::{Economics, Itinerary, Planner, PlanningRequest, Ratings, TripWindow, Vetoes};
use crate::routing::RouteProvider;
use crate::scoring::SiteScore;
use anyhow::bail;
use chrono::{Local, NaiveDate};

/// Trip length used when neither an end date nor a length is given.
pub const DEFAULT_TRIP_DAYS: i64 = 10;

/// Handle `navigator plan`
pub async fn run_plan(args: PlanArgs) -> anyhow::Result<String> {
    let config = load_config(&args.config, args.log_level.as_deref())?;
    init_tracing(&config.logging)?;

    let (catalog, routes) = load_sources(&config)?;
    let scores = gather_scores(&config, &catalog, args.offline).await?;
    let itinerary = plan_with_scores(&args, &config, &catalog, &routes, &scores)?;

    if args.json {
        Ok(format_itinerary_json(&itinerary, &catalog)?)
    } else {
        Ok(format_itinerary_table(&itinerary, &catalog))
    }
}

/// Trip window from the start, end and length flags.
pub fn resolve_window(
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
    days: Option<i64>,
) -> anyhow::Result<TripWindow> {
    let start = start.unwrap_or_else(|| Local::now().date_naive());
    let window = match (end, days) {
        (Some(end), _) => TripWindow::new(start, end)?,
        (None, Some(days)) => TripWindow::from_length(start, days)?,
        (None, None) => TripWindow::from_length(start, DEFAULT_TRIP_DAYS)?,
    };
    Ok(window)
}

fn is_rateable(catalog: &Catalog, id: &str) -> bool {
    catalog.site(id).is_some() || catalog.lake().is_some_and(|lake| lake.id == id)
}

fn is_vetoable(catalog: &Catalog, id: &str) -> bool {
    is_rateable(catalog, id) || catalog.region(id).is_some() || catalog.hub(id).is_some()
}

/// Assemble the planning request: scored ratings, then manual overrides.
pub fn build_request(
    args: &PlanArgs,
    config: &NavigatorConfig,
    catalog: &Catalog,
    scores: &[SiteScore],
) -> anyhow::Result<PlanningRequest> {
    let window = resolve_window(args.start, args.end, args.days)?;

    let mut ratings = Ratings::from_scores(scores);
    for (id, rating) in &args.ratings {
        if !is_rateable(catalog, id) {
            bail!("Unknown site or lake in --rating: {}", id);
        }
        ratings.set(id.clone(), *rating);
    }

    let mut vetoes = Vetoes::new();
    for id in &args.vetoes {
        if !is_vetoable(catalog, id) {
            bail!("Unknown region, site or hub in --veto: {}", id);
        }
        vetoes.veto(id.clone());
    }

    let mut economics = Economics::from(config.economics.clone());
    if let Some(mpg) = args.mpg {
        economics.mpg = mpg;
    }
    if let Some(adjustment) = args.price_adjustment {
        economics.price_adjustment = adjustment;
    }

    let mut request = PlanningRequest::new(window)
        .with_ratings(ratings)
        .with_vetoes(vetoes)
        .with_economics(economics);
    if let Some(from) = &args.from {
        request = request.starting_at(from.clone());
    }

    tracing::debug!(
        trip_days = request.window.length(),
        overrides = args.ratings.len(),
        vetoes = args.vetoes.len(),
        "Planning request assembled"
    );
    Ok(request)
}

/// Plan over already scored sites.
pub fn plan_with_scores(
    args: &PlanArgs,
    config: &NavigatorConfig,
    catalog: &Catalog,
    routes: &dyn RouteProvider,
    scores: &[SiteScore],
) -> anyhow::Result<Itinerary> {
    let request = build_request(args, config, catalog, scores)?;
    let planner = Planner::new(catalog, routes, config.planner.clone());
    Ok(planner.plan(&request)?)
}

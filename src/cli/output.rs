//! Output formatting helpers for CLI commands

use crate::catalog::Catalog;
use crate::planner::{ActivityKind, Itinerary, Ratings};
use crate::scoring::{ConditionStatus, SiteScore};
use colored::Colorize;
use comfy_table::{presets::UTF8_FULL, Cell, ContentArrangement, Table};
use serde_json::json;

/// View model for condition display
#[derive(Debug, Clone, serde::Serialize)]
pub struct ConditionView {
    pub site: String,
    pub name: String,
    pub region: String,
    pub status: ConditionStatus,
    pub score: f64,
    pub rating: f64,
    pub latest: Option<f64>,
    pub target: String,
    pub trend: String,
    pub preferred: bool,
}

impl ConditionView {
    pub fn collect(catalog: &Catalog, scores: &[SiteScore], ratings: &Ratings) -> Vec<Self> {
        scores
            .iter()
            .filter_map(|s| {
                let site = catalog.site(&s.site_id)?;
                Some(Self {
                    site: site.id.clone(),
                    name: site.name.clone(),
                    region: site.region.clone(),
                    status: s.score.status,
                    score: s.score.total,
                    rating: ratings.of(&site.id),
                    latest: s.score.latest,
                    target: site.target.to_string(),
                    trend: s.score.direction.label().to_string(),
                    preferred: site.preferred,
                })
            })
            .collect()
    }
}

fn colored_status(status: ConditionStatus) -> String {
    let label = status.label();
    match status {
        ConditionStatus::InShape => label.green().to_string(),
        ConditionStatus::SlightlyHigh | ConditionStatus::Low => label.yellow().to_string(),
        ConditionStatus::High | ConditionStatus::BlownOut | ConditionStatus::Unusable => {
            label.red().to_string()
        }
        ConditionStatus::Closed => label.dimmed().to_string(),
        _ => label.cyan().to_string(),
    }
}

fn colored_kind(kind: ActivityKind) -> String {
    let label = kind.to_string();
    match kind {
        ActivityKind::Fish => label.green().to_string(),
        ActivityKind::Drive => label.cyan().to_string(),
        ActivityKind::ReturnLeg => label.yellow().to_string(),
        ActivityKind::Rest => label.dimmed().to_string(),
    }
}

/// Format site conditions as a table
pub fn format_conditions_table(views: &[ConditionView]) -> String {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![
        "Site", "Region", "Status", "Score", "Rating", "Latest", "Target", "Trend",
    ]);

    for v in views {
        let name = if v.preferred {
            format!("{} ★", v.name)
        } else {
            v.name.clone()
        };
        table.add_row(vec![
            Cell::new(name),
            Cell::new(&v.region),
            Cell::new(colored_status(v.status)),
            Cell::new(format!("{:.2}", v.score)),
            Cell::new(format!("{:.2}", v.rating)),
            Cell::new(v.latest.map_or("-".to_string(), |l| format!("{}", l))),
            Cell::new(&v.target),
            Cell::new(&v.trend),
        ]);
    }

    table.to_string()
}

/// Format site conditions as JSON
pub fn format_conditions_json(views: &[ConditionView]) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&json!({
        "sites": views
    }))
}

/// Format an itinerary as a table followed by its summary
pub fn format_itinerary_table(itinerary: &Itinerary, catalog: &Catalog) -> String {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Date", "Kind", "Location", "Activity", "Miles", "Hours", "Fuel"]);

    for e in itinerary.entries() {
        let travel = matches!(e.kind, ActivityKind::Drive | ActivityKind::ReturnLeg);
        table.add_row(vec![
            Cell::new(e.date.format("%a %b %d").to_string()),
            Cell::new(colored_kind(e.kind)),
            Cell::new(catalog.hub_name(&e.location)),
            Cell::new(&e.description),
            Cell::new(if travel { format!("{:.0}", e.miles) } else { String::new() }),
            Cell::new(if travel { format!("{:.1}", e.hours) } else { String::new() }),
            Cell::new(if travel { format!("${:.2}", e.cost) } else { String::new() }),
        ]);
    }

    let summary = itinerary.summary();
    let regions = itinerary
        .days_by_region(catalog)
        .into_iter()
        .map(|(id, days)| {
            let name = catalog
                .region(&id)
                .map_or_else(|| catalog.site_name(&id), |r| r.name.as_str());
            format!("{} {}", name, days)
        })
        .collect::<Vec<_>>()
        .join(", ");

    let mut out = table.to_string();
    out.push_str(&format!(
        "\n{} days: {} fishing, {} travel, {} rest | {:.0} mi, {:.1} h, ${:.2} fuel",
        summary.total_days,
        summary.fish_days,
        summary.travel_days,
        summary.rest_days,
        summary.miles,
        summary.hours,
        summary.fuel_cost
    ));
    if !regions.is_empty() {
        out.push_str(&format!("\nFishing days by region: {}", regions));
    }
    out
}

/// Format an itinerary as JSON
pub fn format_itinerary_json(
    itinerary: &Itinerary,
    catalog: &Catalog,
) -> Result<String, serde_json::Error> {
    let days_by_region: Vec<_> = itinerary
        .days_by_region(catalog)
        .into_iter()
        .map(|(region, days)| json!({ "region": region, "days": days }))
        .collect();

    serde_json::to_string_pretty(&json!({
        "window": itinerary.window,
        "allocation": itinerary.allocation,
        "entries": itinerary.entries,
        "summary": itinerary.summary(),
        "days_by_region": days_by_region,
        "segments": itinerary.segments,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::{Score, TrendDirection};

    fn create_test_score(site_id: &str, region: &str, status: ConditionStatus) -> SiteScore {
        SiteScore {
            site_id: site_id.to_string(),
            region: region.to_string(),
            score: Score {
                total: 3.75,
                flow: 5.0,
                trend: -0.25,
                weather: -1.0,
                behavior: 0.0,
                status,
                direction: TrendDirection::Rising,
                latest: Some(2100.0),
                change_percent: Some(12.0),
            },
        }
    }

    #[test]
    fn test_conditions_table_contains_sites() {
        let catalog = Catalog::builtin().unwrap();
        let scores = vec![create_test_score("smith", "norcal", ConditionStatus::InShape)];
        let views = ConditionView::collect(&catalog, &scores, &Ratings::new().with("smith", 3.75));

        let output = format_conditions_table(&views);
        assert!(output.contains("Smith"));
        assert!(output.contains("in shape"));
        assert!(output.contains("3.75"));
        assert!(output.contains("rising"));
    }

    #[test]
    fn test_conditions_json_valid() {
        let catalog = Catalog::builtin().unwrap();
        let scores = vec![create_test_score("chetco", "south-oregon", ConditionStatus::BlownOut)];
        let views = ConditionView::collect(&catalog, &scores, &Ratings::new());

        let json = format_conditions_json(&views).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed["sites"][0]["site"], "chetco");
        assert_eq!(parsed["sites"][0]["status"], "blown_out");
    }

    #[test]
    fn test_unknown_sites_are_skipped() {
        let catalog = Catalog::builtin().unwrap();
        let scores = vec![create_test_score("nowhere", "norcal", ConditionStatus::NoData)];
        assert!(ConditionView::collect(&catalog, &scores, &Ratings::new()).is_empty());
    }

    fn builtin_itinerary() -> (Catalog, Itinerary) {
        use crate::config::PlannerConfig;
        use crate::planner::{Planner, PlanningRequest, TripWindow};
        use crate::routing::RouteTable;

        let catalog = Catalog::builtin().unwrap();
        let routes = RouteTable::builtin().unwrap();
        let start = chrono::NaiveDate::from_ymd_opt(2025, 1, 10).unwrap();
        let request = PlanningRequest::new(TripWindow::from_length(start, 14).unwrap())
            .with_ratings(Ratings::new().with("smith", 4.5).with("pyramid", 4.0));
        let itinerary = Planner::new(&catalog, &routes, PlannerConfig::default())
            .plan(&request)
            .unwrap();
        (catalog, itinerary)
    }

    #[test]
    fn test_itinerary_table_has_summary() {
        let (catalog, itinerary) = builtin_itinerary();
        let output = format_itinerary_table(&itinerary, &catalog);
        assert!(output.contains("14 days"));
        assert!(output.contains("Fishing days by region: Pyramid Lake 3"));
    }

    #[test]
    fn test_itinerary_json_valid() {
        let (catalog, itinerary) = builtin_itinerary();
        let json = format_itinerary_json(&itinerary, &catalog).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(parsed["summary"]["total_days"], 14);
        assert_eq!(
            parsed["entries"].as_array().unwrap().len(),
            itinerary.entries().len()
        );
        assert_eq!(parsed["days_by_region"][0]["region"], "pyramid");
        assert!(parsed["segments"].as_array().unwrap().len() >= 2);
    }
}

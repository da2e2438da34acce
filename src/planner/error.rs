use thiserror::Error;

/// Conditions that stop a plan before the builder runs.
///
/// Everything else (missing telemetry, unknown routes, regions that do not
/// fit) degrades inside the planner instead of surfacing here.
#[derive(Debug, Error, PartialEq)]
pub enum PlanError {
    #[error("Trip must be at least one day long, got {0} day(s)")]
    NonPositiveTripLength(i64),

    #[error("Unknown start location: {0}")]
    UnknownStart(String),

    #[error("Invalid economics: {0}")]
    InvalidEconomics(String),
}

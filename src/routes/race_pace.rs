//! Race-pace statistics endpoint.
//!
//! - GET /api/stats/race_pace?year&gp&session_type

use axum::extract::{Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::errors::{AppError, ErrorResponse};
use crate::routes::AppState;
use crate::services::laps::filter_race_laps;
use crate::services::stats::{aggregate_race_pace, DriverPaceSummary};

fn default_year() -> u16 {
    2021
}

fn default_gp() -> String {
    "Bahrain".to_string()
}

fn default_session_type() -> String {
    "R".to_string()
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct RacePaceQuery {
    /// Season year (e.g. 2021)
    #[serde(default = "default_year")]
    pub year: u16,
    /// Event name or location key (e.g. "Bahrain")
    #[serde(default = "default_gp")]
    pub gp: String,
    /// Session type (e.g. "R")
    #[serde(default = "default_session_type")]
    pub session_type: String,
}

/// Race-pace statistics response.
#[derive(Debug, Serialize, ToSchema)]
pub struct RacePaceResponse {
    /// Season year
    pub year: u16,
    /// Event name or location key
    pub gp: String,
    /// Session type
    pub session_type: String,
    /// Per-driver pace summaries in roster order.
    /// Drivers with zero clean laps are omitted.
    pub data: Vec<DriverPaceSummary>,
}

/// Get per-driver race-pace statistics for a session.
///
/// Filters the lap table to representative laps (accurate, clear track —
/// no in/out laps, no Safety Car / VSC / red flag running), groups them
/// by driver, and returns the lap-time distribution and descriptive
/// statistics for each driver.
#[utoipa::path(
    get,
    path = "/api/stats/race_pace",
    tag = "Statistics",
    params(RacePaceQuery),
    responses(
        (status = 200, description = "Per-driver race-pace statistics", body = RacePaceResponse),
        (status = 400, description = "Invalid query parameters", body = ErrorResponse),
        (status = 500, description = "Session data unavailable", body = ErrorResponse),
    )
)]
pub async fn get_race_pace(
    State(state): State<AppState>,
    Query(params): Query<RacePaceQuery>,
) -> Result<Json<RacePaceResponse>, AppError> {
    if params.gp.trim().is_empty() || params.session_type.trim().is_empty() {
        return Err(AppError::BadRequest(
            "gp and session_type must be non-empty".to_string(),
        ));
    }

    let session = state
        .timing_client
        .fetch_session(params.year, &params.gp, &params.session_type)
        .await?;

    let filtered = filter_race_laps(&session.laps);
    let data = aggregate_race_pace(&filtered, &session);

    Ok(Json(RacePaceResponse {
        year: params.year,
        gp: params.gp,
        session_type: params.session_type,
        data,
    }))
}

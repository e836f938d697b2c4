//! Fastest-lap telemetry endpoint.
//!
//! - GET /api/fastest_lap?year&gp&session_type&driver

use axum::extract::{Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::errors::{AppError, ErrorResponse};
use crate::routes::AppState;
use crate::services::laps::{add_distance, format_lap_time, pick_fastest, TelemetryPoint};

fn default_year() -> u16 {
    2021
}

fn default_gp() -> String {
    "Bahrain".to_string()
}

fn default_session_type() -> String {
    "Q".to_string()
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct FastestLapQuery {
    /// Season year (e.g. 2021)
    #[serde(default = "default_year")]
    pub year: u16,
    /// Event name or location key (e.g. "Bahrain")
    #[serde(default = "default_gp")]
    pub gp: String,
    /// Session type (e.g. "Q", "R", "FP1")
    #[serde(default = "default_session_type")]
    pub session_type: String,
    /// Driver identifier. Absent: fastest lap across the whole session.
    pub driver: Option<String>,
}

/// Fastest-lap telemetry response.
#[derive(Debug, Serialize, ToSchema)]
pub struct FastestLapResponse {
    /// Season year
    pub year: u16,
    /// Event name or location key
    pub gp: String,
    /// Session type
    pub session_type: String,
    /// Driver who set the lap
    pub driver: String,
    /// Lap time as a display string, e.g. "1:31.447"
    pub lap_time: String,
    /// Car telemetry with the derived cumulative distance channel
    pub telemetry: Vec<TelemetryPoint>,
}

/// Get car telemetry for the fastest lap of a session.
///
/// Selects the fastest timed lap — session-wide, or for one driver when
/// `driver` is given — and returns its telemetry augmented with a
/// cumulative distance axis for plotting.
#[utoipa::path(
    get,
    path = "/api/fastest_lap",
    tag = "Telemetry",
    params(FastestLapQuery),
    responses(
        (status = 200, description = "Telemetry for the fastest lap", body = FastestLapResponse),
        (status = 400, description = "Invalid query parameters", body = ErrorResponse),
        (status = 500, description = "Session data unavailable or no timed lap", body = ErrorResponse),
    )
)]
pub async fn get_fastest_lap(
    State(state): State<AppState>,
    Query(params): Query<FastestLapQuery>,
) -> Result<Json<FastestLapResponse>, AppError> {
    if params.gp.trim().is_empty() || params.session_type.trim().is_empty() {
        return Err(AppError::BadRequest(
            "gp and session_type must be non-empty".to_string(),
        ));
    }

    let laps = state
        .timing_client
        .fetch_laps(params.year, &params.gp, &params.session_type)
        .await?;

    let fastest = pick_fastest(&laps, params.driver.as_deref()).ok_or_else(|| {
        AppError::DataUnavailable(match &params.driver {
            Some(d) => format!("no timed lap for driver {} in this session", d),
            None => "no timed lap in this session".to_string(),
        })
    })?;

    // pick_fastest only returns timed laps
    let lap_time = fastest
        .lap_time
        .ok_or_else(|| AppError::Internal("fastest lap has no recorded time".to_string()))?;

    let samples = state
        .timing_client
        .fetch_car_data(
            params.year,
            &params.gp,
            &params.session_type,
            &fastest.driver,
            fastest.lap_number,
        )
        .await?;

    Ok(Json(FastestLapResponse {
        year: params.year,
        gp: params.gp,
        session_type: params.session_type,
        driver: fastest.driver.clone(),
        lap_time: format_lap_time(lap_time),
        telemetry: add_distance(&samples),
    }))
}

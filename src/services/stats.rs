//! Race-pace statistics.
//!
//! Groups filtered laps by driver and computes the descriptive-statistics
//! summary for each group. All functions are pure over the collections
//! the provider materialized for the request.

use serde::Serialize;
use utoipa::ToSchema;

use crate::services::provider::{LapRecord, SessionData};

/// Descriptive statistics for one driver's clean-lap times, in seconds.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PaceMetrics {
    pub min: f64,
    /// 25th percentile (linear interpolation)
    pub q1: f64,
    pub median: f64,
    /// 75th percentile (linear interpolation)
    pub q3: f64,
    pub max: f64,
    /// Sample standard deviation (n−1 divisor); 0.0 for fewer than 2 laps
    pub std: f64,
}

/// Race-pace aggregation result for one driver.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct DriverPaceSummary {
    /// Driver identifier
    pub driver: String,
    /// Team name, taken from the driver's laps
    pub team: String,
    /// Team color as "#RRGGBB"; null when the roster lookup cannot resolve it
    pub color: Option<String>,
    /// Clean-lap times in seconds, in lap order
    pub lap_times: Vec<f64>,
    pub metrics: PaceMetrics,
}

/// Quantile via linear interpolation between order statistics.
///
/// `sorted` must be ascending and non-empty; `q` in [0, 1]. Matches the
/// standard "linear" method: position `q * (n - 1)`, interpolating
/// between the two adjacent values.
fn quantile(sorted: &[f64], q: f64) -> f64 {
    let n = sorted.len();
    if n == 1 {
        return sorted[0];
    }
    let pos = q * (n - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    if lo == hi {
        return sorted[lo];
    }
    let frac = pos - lo as f64;
    sorted[lo] + (sorted[hi] - sorted[lo]) * frac
}

/// Sample standard deviation (n−1 divisor).
///
/// Undefined for fewer than 2 values; normalized to 0.0 so callers
/// never observe NaN.
fn std_dev(values: &[f64]) -> f64 {
    let n = values.len();
    if n < 2 {
        return 0.0;
    }
    let mean = values.iter().sum::<f64>() / n as f64;
    let var = values.iter().map(|v| (v - mean) * (v - mean)).sum::<f64>() / (n - 1) as f64;
    var.sqrt()
}

/// Summarize one driver's lap times. `lap_times` must be non-empty.
pub fn summarize(lap_times: &[f64]) -> PaceMetrics {
    debug_assert!(!lap_times.is_empty());

    let mut sorted = lap_times.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

    PaceMetrics {
        min: sorted[0],
        q1: quantile(&sorted, 0.25),
        median: quantile(&sorted, 0.5),
        q3: quantile(&sorted, 0.75),
        max: sorted[sorted.len() - 1],
        std: std_dev(lap_times),
    }
}

/// Aggregate filtered laps into per-driver pace summaries.
///
/// Iterates the session roster in provider order. Drivers with no
/// surviving laps are skipped — a session legitimately has drivers with
/// zero clean laps (retirements, full race under Safety Car). A roster
/// entry that fails to resolve only loses its color, never the driver.
pub fn aggregate_race_pace(filtered_laps: &[LapRecord], session: &SessionData) -> Vec<DriverPaceSummary> {
    let mut results = Vec::new();

    for info in &session.drivers {
        let driver_laps: Vec<&LapRecord> = filtered_laps
            .iter()
            .filter(|lap| lap.driver == info.driver)
            .collect();

        if driver_laps.is_empty() {
            continue;
        }

        // Laps for one driver within a session share one team.
        let team = driver_laps[0].team.clone();
        let color = session
            .driver_info(&info.driver)
            .and_then(|d| d.team_color.as_ref())
            .map(|hex| format!("#{}", hex));

        let lap_times: Vec<f64> = driver_laps.iter().filter_map(|lap| lap.lap_time).collect();
        if lap_times.is_empty() {
            continue;
        }
        let metrics = summarize(&lap_times);

        results.push(DriverPaceSummary {
            driver: info.driver.clone(),
            team,
            color,
            lap_times,
            metrics,
        });
    }

    results
}

//! Lap selection and telemetry distance derivation.
//!
//! Pure functions over already-materialized provider data: race-lap
//! validity filtering, fastest-lap selection, and the cumulative
//! distance axis added to car telemetry for plotting.

use serde::Serialize;
use utoipa::ToSchema;

use crate::services::provider::{LapRecord, TelemetrySample};

/// Track status code for a clear (green-flag) track.
const TRACK_STATUS_CLEAR: &str = "1";

/// A telemetry sample with the derived cumulative distance channel.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct TelemetryPoint {
    /// Offset from lap start in seconds
    pub time: f64,
    /// Speed in km/h
    pub speed: f64,
    /// Throttle application, 0–100
    #[serde(skip_serializing_if = "Option::is_none")]
    pub throttle: Option<f64>,
    /// Brake application, 0–100
    #[serde(skip_serializing_if = "Option::is_none")]
    pub brake: Option<f64>,
    /// Selected gear
    #[serde(skip_serializing_if = "Option::is_none")]
    pub n_gear: Option<u32>,
    /// Engine RPM
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rpm: Option<u32>,
    /// DRS status code
    #[serde(skip_serializing_if = "Option::is_none")]
    pub drs: Option<u32>,
    /// Cumulative distance from lap start in metres
    pub distance: f64,
}

/// Select the laps eligible for race-pace analysis.
///
/// Keeps a lap iff the provider marked it accurate and the track was
/// clear for its whole duration. This excludes in/out laps, laps with
/// track-limit violations, and laps run under Safety Car / VSC / red
/// flag conditions. Idempotent.
pub fn filter_race_laps(laps: &[LapRecord]) -> Vec<LapRecord> {
    laps.iter()
        .filter(|lap| lap.is_accurate && lap.track_status == TRACK_STATUS_CLEAR)
        .cloned()
        .collect()
}

/// Pick the fastest timed lap, optionally narrowed to one driver.
///
/// Untimed laps never qualify. Returns `None` when no lap in the pool
/// has a recorded time (e.g. unknown driver id).
pub fn pick_fastest<'a>(laps: &'a [LapRecord], driver: Option<&str>) -> Option<&'a LapRecord> {
    laps.iter()
        .filter(|lap| driver.map_or(true, |d| lap.driver == d))
        .filter(|lap| lap.lap_time.is_some())
        .min_by(|a, b| {
            a.lap_time
                .partial_cmp(&b.lap_time)
                .unwrap_or(std::cmp::Ordering::Equal)
        })
}

/// Derive the cumulative distance axis for a lap's telemetry.
///
/// Trapezoidal integration of speed over the sample time deltas. Speed
/// is km/h and time is seconds, so each increment is divided by 3.6 to
/// yield metres. The first sample's distance is 0 and the series is
/// monotonically non-decreasing. Empty input yields empty output.
pub fn add_distance(samples: &[TelemetrySample]) -> Vec<TelemetryPoint> {
    let mut points = Vec::with_capacity(samples.len());
    let mut distance = 0.0;

    for (i, sample) in samples.iter().enumerate() {
        if i > 0 {
            let prev = &samples[i - 1];
            // Samples are time-ascending per the provider contract;
            // clamp anyway so distance can never decrease.
            let dt = (sample.time - prev.time).max(0.0);
            distance += dt * (prev.speed + sample.speed) / 2.0 / 3.6;
        }
        points.push(TelemetryPoint {
            time: sample.time,
            speed: sample.speed,
            throttle: sample.throttle,
            brake: sample.brake,
            n_gear: sample.n_gear,
            rpm: sample.rpm,
            drs: sample.drs,
            distance,
        });
    }

    points
}

/// Format a lap time in seconds as a display string, e.g. "1:31.447".
pub fn format_lap_time(seconds: f64) -> String {
    let total_millis = (seconds * 1000.0).round() as u64;
    let minutes = total_millis / 60_000;
    let rem = total_millis % 60_000;
    format!("{}:{:02}.{:03}", minutes, rem / 1000, rem % 1000)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lap(driver: &str, time: Option<f64>, status: &str, accurate: bool) -> LapRecord {
        LapRecord {
            driver: driver.to_string(),
            lap_number: 1,
            lap_time: time,
            track_status: status.to_string(),
            is_accurate: accurate,
            team: "Test Team".to_string(),
        }
    }

    fn sample(time: f64, speed: f64) -> TelemetrySample {
        TelemetrySample {
            time,
            speed,
            throttle: None,
            brake: None,
            n_gear: None,
            rpm: None,
            drs: None,
        }
    }

    #[test]
    fn test_filter_keeps_only_accurate_clear_laps() {
        let laps = vec![
            lap("A", Some(90.0), "1", true),
            lap("A", Some(91.0), "2", true),  // safety car
            lap("A", Some(92.0), "1", false), // out lap
            lap("B", Some(89.5), "1", true),
        ];
        let filtered = filter_race_laps(&laps);
        assert_eq!(filtered.len(), 2);
        assert_eq!(filtered[0].driver, "A");
        assert_eq!(filtered[1].driver, "B");
    }

    #[test]
    fn test_filter_is_idempotent() {
        let laps = vec![
            lap("A", Some(90.0), "1", true),
            lap("A", Some(91.0), "4", true),
            lap("B", None, "1", false),
        ];
        let once = filter_race_laps(&laps);
        let twice = filter_race_laps(&once);
        assert_eq!(once.len(), twice.len());
        for (a, b) in once.iter().zip(twice.iter()) {
            assert_eq!(a.driver, b.driver);
            assert_eq!(a.lap_time, b.lap_time);
        }
    }

    #[test]
    fn test_filter_empty_input() {
        assert!(filter_race_laps(&[]).is_empty());
    }

    #[test]
    fn test_pick_fastest_session_wide() {
        let laps = vec![
            lap("A", Some(90.0), "1", true),
            lap("B", Some(89.5), "1", true),
            lap("C", None, "1", false),
        ];
        let fastest = pick_fastest(&laps, None).unwrap();
        assert_eq!(fastest.driver, "B");
    }

    #[test]
    fn test_pick_fastest_for_driver() {
        let laps = vec![
            lap("A", Some(90.0), "1", true),
            lap("A", Some(88.7), "1", true),
            lap("B", Some(87.0), "1", true),
        ];
        let fastest = pick_fastest(&laps, Some("A")).unwrap();
        assert_eq!(fastest.lap_time, Some(88.7));
    }

    #[test]
    fn test_pick_fastest_unknown_driver() {
        let laps = vec![lap("A", Some(90.0), "1", true)];
        assert!(pick_fastest(&laps, Some("Z")).is_none());
    }

    #[test]
    fn test_pick_fastest_ignores_untimed_laps() {
        let laps = vec![lap("A", None, "1", true), lap("B", None, "1", true)];
        assert!(pick_fastest(&laps, None).is_none());
    }

    #[test]
    fn test_add_distance_empty() {
        assert!(add_distance(&[]).is_empty());
    }

    #[test]
    fn test_add_distance_starts_at_zero() {
        let points = add_distance(&[sample(0.0, 250.0)]);
        assert_eq!(points.len(), 1);
        assert_eq!(points[0].distance, 0.0);
    }

    #[test]
    fn test_add_distance_trapezoid() {
        // 1s at constant 180 km/h (50 m/s) → 50 m per interval
        let points = add_distance(&[
            sample(0.0, 180.0),
            sample(1.0, 180.0),
            sample(2.0, 180.0),
        ]);
        assert!((points[1].distance - 50.0).abs() < 1e-9);
        assert!((points[2].distance - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_add_distance_averages_speeds() {
        // 0 → 72 km/h over 1s: trapezoid gives (0 + 20 m/s) / 2 = 10 m
        let points = add_distance(&[sample(0.0, 0.0), sample(1.0, 72.0)]);
        assert!((points[1].distance - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_add_distance_non_decreasing() {
        let samples = vec![
            sample(0.0, 0.0),
            sample(0.5, 120.0),
            sample(0.4, 140.0), // out-of-order timestamp, clamped
            sample(1.5, 0.0),
            sample(2.0, 0.0), // stationary, distance holds
        ];
        let points = add_distance(&samples);
        assert_eq!(points[0].distance, 0.0);
        for pair in points.windows(2) {
            assert!(pair[1].distance >= pair[0].distance);
        }
    }

    #[test]
    fn test_format_lap_time() {
        assert_eq!(format_lap_time(91.447), "1:31.447");
        assert_eq!(format_lap_time(59.999), "0:59.999");
        assert_eq!(format_lap_time(60.0), "1:00.000");
        assert_eq!(format_lap_time(125.0014), "2:05.001");
    }
}

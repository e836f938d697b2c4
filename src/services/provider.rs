//! Upstream timing service client.
//!
//! Fetches per-session lap tables, driver rosters, and per-lap car
//! telemetry from the timing data API. Owns the optional on-disk response
//! cache; the analysis pipeline only ever sees already-materialized
//! collections.

use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while retrieving session data.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("Timing API request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Timing API returned status {status} for {path}")]
    Status {
        status: reqwest::StatusCode,
        path: String,
    },
    #[error("Malformed timing API response for {path}: {message}")]
    Decode { path: String, message: String },
}

/// One completed lap from the session's lap table.
#[derive(Debug, Clone, Deserialize)]
pub struct LapRecord {
    /// Driver identifier (three-letter abbreviation, e.g. "VER")
    pub driver: String,
    pub lap_number: u32,
    /// Lap time in seconds. `None` when no time was recorded.
    pub lap_time: Option<f64>,
    /// Track condition code during the lap; "1" means clear/green.
    pub track_status: String,
    /// Whether the provider judges the lap's timing data trustworthy.
    pub is_accurate: bool,
    pub team: String,
}

/// One entry of the session's driver roster.
#[derive(Debug, Clone, Deserialize)]
pub struct DriverInfo {
    pub driver: String,
    pub team_name: String,
    /// Team color as hex digits without the leading '#'.
    /// Absent when the provider cannot resolve it — never fabricated.
    pub team_color: Option<String>,
}

/// One timestamped car-state reading within a lap.
#[derive(Debug, Clone, Deserialize)]
pub struct TelemetrySample {
    /// Offset from lap start in seconds, ascending within a lap.
    pub time: f64,
    /// Speed in km/h, non-negative.
    pub speed: f64,
    pub throttle: Option<f64>,
    pub brake: Option<f64>,
    pub n_gear: Option<u32>,
    pub rpm: Option<u32>,
    pub drs: Option<u32>,
}

/// Materialized session data for one request: the full lap table plus
/// the driver roster in the provider's order.
#[derive(Debug, Clone)]
pub struct SessionData {
    pub laps: Vec<LapRecord>,
    pub drivers: Vec<DriverInfo>,
}

impl SessionData {
    /// Look up a roster entry by driver id. Total function: resolution
    /// failure is an absence, never an error.
    pub fn driver_info(&self, driver: &str) -> Option<&DriverInfo> {
        self.drivers.iter().find(|d| d.driver == driver)
    }
}

/// Client for the upstream timing data API.
#[derive(Debug, Clone)]
pub struct TimingClient {
    client: reqwest::Client,
    base_url: String,
    user_agent: String,
    cache_dir: Option<PathBuf>,
}

impl TimingClient {
    pub fn new(base_url: &str, user_agent: &str, cache_dir: Option<PathBuf>) -> Self {
        let client = reqwest::Client::builder()
            .build()
            .expect("Failed to build HTTP client");
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            user_agent: user_agent.to_string(),
            cache_dir,
        }
    }

    /// Fetch the lap table for a session.
    pub async fn fetch_laps(
        &self,
        year: u16,
        gp: &str,
        session_type: &str,
    ) -> Result<Vec<LapRecord>, ProviderError> {
        self.get_json(&format!("/v1/sessions/{}/{}/{}/laps", year, gp, session_type))
            .await
    }

    /// Fetch the driver roster for a session, in the provider's order.
    pub async fn fetch_drivers(
        &self,
        year: u16,
        gp: &str,
        session_type: &str,
    ) -> Result<Vec<DriverInfo>, ProviderError> {
        self.get_json(&format!(
            "/v1/sessions/{}/{}/{}/drivers",
            year, gp, session_type
        ))
        .await
    }

    /// Fetch laps and roster for a session in parallel.
    pub async fn fetch_session(
        &self,
        year: u16,
        gp: &str,
        session_type: &str,
    ) -> Result<SessionData, ProviderError> {
        let (laps, drivers) = futures::future::try_join(
            self.fetch_laps(year, gp, session_type),
            self.fetch_drivers(year, gp, session_type),
        )
        .await?;
        Ok(SessionData { laps, drivers })
    }

    /// Fetch car telemetry for one lap, time-ascending.
    pub async fn fetch_car_data(
        &self,
        year: u16,
        gp: &str,
        session_type: &str,
        driver: &str,
        lap_number: u32,
    ) -> Result<Vec<TelemetrySample>, ProviderError> {
        self.get_json(&format!(
            "/v1/sessions/{}/{}/{}/car_data?driver={}&lap={}",
            year, gp, session_type, driver, lap_number
        ))
        .await
    }

    /// GET a JSON document, consulting the on-disk cache first.
    ///
    /// Cache reads that fail to parse are treated as misses; cache write
    /// failures are logged and never fail the request.
    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ProviderError> {
        let cache_file = self.cache_path(path);

        if let Some(ref file) = cache_file {
            if let Ok(body) = std::fs::read_to_string(file) {
                match serde_json::from_str(&body) {
                    Ok(parsed) => {
                        tracing::debug!("Cache hit for {}", path);
                        return Ok(parsed);
                    }
                    Err(e) => {
                        tracing::warn!("Discarding unreadable cache entry for {}: {}", path, e);
                    }
                }
            }
        }

        let url = format!("{}{}", self.base_url, path);
        let response = self
            .client
            .get(&url)
            .header(reqwest::header::USER_AGENT, &self.user_agent)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ProviderError::Status {
                status,
                path: path.to_string(),
            });
        }

        let body = response.text().await?;
        let parsed = serde_json::from_str(&body).map_err(|e| ProviderError::Decode {
            path: path.to_string(),
            message: e.to_string(),
        })?;

        if let Some(file) = cache_file {
            if let Err(e) = std::fs::write(&file, &body) {
                tracing::warn!("Failed to write cache file {}: {}", file.display(), e);
            }
        }

        Ok(parsed)
    }

    /// Cache file for a request path, or `None` when caching is disabled.
    fn cache_path(&self, path: &str) -> Option<PathBuf> {
        let dir = self.cache_dir.as_ref()?;
        let key: String = path
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
            .collect();
        Some(dir.join(format!("{}.json", key)))
    }
}

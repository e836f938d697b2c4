pub mod fastest_lap;
pub mod health;
pub mod race_pace;

use crate::services::provider::TimingClient;

/// Shared application state for the session data endpoints.
#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) timing_client: TimingClient,
}

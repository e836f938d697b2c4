pub mod laps;
pub mod provider;
pub mod stats;

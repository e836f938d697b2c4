/// Application configuration, parsed from environment variables.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Base URL of the upstream timing data service.
    pub timing_api_url: String,
    pub timing_user_agent: String,
    pub port: u16,
    /// Directory for the provider's on-disk response cache.
    /// `None` disables caching entirely.
    pub cache_dir: Option<String>,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self {
            timing_api_url: std::env::var("TIMING_API_URL")
                .unwrap_or_else(|_| "https://timing.example.com".to_string()),
            timing_user_agent: std::env::var("TIMING_USER_AGENT")
                .unwrap_or_else(|_| "RacePaceApi/0.1".to_string()),
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .expect("PORT must be a valid u16"),
            cache_dir: std::env::var("CACHE_DIR").ok().filter(|d| !d.is_empty()),
        }
    }
}

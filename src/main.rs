// Race Pace API v0.1
use axum::{routing::get, Router};
use std::net::SocketAddr;
use std::path::PathBuf;
use tower_http::cors::{Any, CorsLayer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

mod config;
mod errors;
mod routes;
mod services;

use config::AppConfig;
use routes::AppState;
use services::provider::TimingClient;

/// Race Pace API — OpenAPI specification.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Race Pace API",
        version = "0.1.0",
        description = "Motorsport session telemetry and race-pace statistics API. \
            Retrieves lap timing and car telemetry for a session from the upstream \
            timing service, filters laps to a representative clean-track subset, \
            and serves per-driver lap-time distributions alongside fastest-lap \
            telemetry with a derived distance axis.",
        license(name = "MIT"),
    ),
    tags(
        (name = "Health", description = "Service health check"),
        (name = "Telemetry", description = "Fastest-lap car telemetry"),
        (name = "Statistics", description = "Race-pace lap-time statistics"),
    ),
    paths(
        routes::health::health_check,
        routes::fastest_lap::get_fastest_lap,
        routes::race_pace::get_race_pace,
    ),
    components(
        schemas(
            routes::health::HealthResponse,
            routes::fastest_lap::FastestLapResponse,
            routes::race_pace::RacePaceResponse,
            services::laps::TelemetryPoint,
            services::stats::DriverPaceSummary,
            services::stats::PaceMetrics,
            errors::ErrorResponse,
        )
    )
)]
struct ApiDoc;

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "race_pace_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::from_env();

    // Ensure the provider cache directory exists before first use
    let cache_dir = config.cache_dir.as_ref().map(PathBuf::from);
    if let Some(ref dir) = cache_dir {
        match std::fs::create_dir_all(dir) {
            Ok(()) => tracing::info!("Provider cache enabled at {}", dir.display()),
            Err(e) => {
                tracing::warn!(
                    "Failed to create cache directory {}: {} — continuing without cache",
                    dir.display(),
                    e
                );
            }
        }
    }

    let timing_client = TimingClient::new(
        &config.timing_api_url,
        &config.timing_user_agent,
        cache_dir,
    );

    let app_state = AppState { timing_client };

    // CORS — read-only API, restrict methods to GET
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([axum::http::Method::GET])
        .allow_headers(Any);

    // Build router
    // Data routes share the timing client via AppState; health is standalone.
    let data_routes = Router::new()
        .route("/api/fastest_lap", get(routes::fastest_lap::get_fastest_lap))
        .route("/api/stats/race_pace", get(routes::race_pace::get_race_pace))
        .with_state(app_state);

    let health_routes = Router::new().route("/api/health", get(routes::health::health_check));

    let app = Router::new()
        .merge(health_routes)
        .merge(data_routes)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(cors);

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("API server listening on {}", addr);
    tracing::info!(
        "Swagger UI available at http://localhost:{}/swagger-ui/",
        config.port
    );

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind TCP listener");
    axum::serve(listener, app)
        .await
        .expect("Server terminated unexpectedly");
}

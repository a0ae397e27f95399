// Pesca Azul API v0.1
use axum::http::Method;
use axum::{
    routing::{get, post},
    Router,
};
use sqlx::postgres::PgPoolOptions;
use std::net::SocketAddr;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

mod config;
mod db;
mod errors;
mod helpers;
mod routes;
mod services;

use config::AppConfig;
use routes::alerts::AlertState;
use routes::health::HealthState;
use services::alerts::new_alert_store;
use services::weather::WeatherClient;

/// Maximum number of connections in the database pool.
const DB_POOL_MAX_CONNECTIONS: u32 = 5;
/// Minimum number of connections kept alive in the database pool.
const DB_POOL_MIN_CONNECTIONS: u32 = 1;

/// Pesca Azul API OpenAPI specification.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Pesca Azul API",
        version = "0.1.0",
        description = "Fishing conditions for the Brazilian coast. \
            Serves weather and sea-state readings for a map location with a \
            fishing recommendation, keeps a per-user feed of condition alerts, \
            stores fishing trip records and aggregates them into profile statistics.",
        license(name = "MIT"),
    ),
    tags(
        (name = "Health", description = "Service health check"),
        (name = "Conditions", description = "Weather, sea state and fishing recommendation"),
        (name = "Regions", description = "Coastal region lookup"),
        (name = "Alerts", description = "Per-user condition alert feed"),
        (name = "Trips", description = "Fishing trip records and statistics"),
    ),
    paths(
        routes::health::health_check,
        routes::conditions::get_conditions,
        routes::regions::classify_region,
        routes::alerts::get_alerts,
        routes::alerts::evaluate_reading,
        routes::alerts::mark_alert_read,
        routes::alerts::mark_all_alerts_read,
        routes::trips::list_trips,
        routes::trips::create_trip,
        routes::trips::import_gpx_trip,
        routes::stats::get_user_stats,
    ),
    components(
        schemas(
            routes::health::HealthResponse,
            routes::conditions::ConditionsResponse,
            routes::regions::RegionResponse,
            routes::alerts::AlertFeedResponse,
            routes::alerts::EvaluateResponse,
            routes::alerts::MarkAllReadResponse,
            routes::trips::TripDocument,
            routes::trips::TripResponse,
            services::reading::WeatherReading,
            services::weather::ReadingSource,
            services::geo::GeoPoint,
            services::alerts::Alert,
            services::alerts::AlertKind,
            services::alerts::AlertType,
            services::alerts::AlertPriority,
            services::recommendation::Recommendation,
            services::recommendation::RecommendationLevel,
            services::conditions::ConditionLabels,
            services::stats::StatisticsSummary,
            errors::ErrorResponse,
        )
    )
)]
struct ApiDoc;

#[tokio::main]
async fn main() {
    // Initialize tracing (LOG_FORMAT=json for structured output)
    let json_logs = std::env::var("LOG_FORMAT").is_ok_and(|f| f.eq_ignore_ascii_case("json"));
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "pesca_azul_api=debug,tower_http=debug".into()),
        )
        .with(json_logs.then(|| tracing_subscriber::fmt::layer().json()))
        .with((!json_logs).then(|| tracing_subscriber::fmt::layer()))
        .init();

    let config = AppConfig::from_env();

    // Set up database connection pool
    let pool = PgPoolOptions::new()
        .max_connections(DB_POOL_MAX_CONNECTIONS)
        .min_connections(DB_POOL_MIN_CONNECTIONS)
        .connect(&config.database_url)
        .await
        .expect("Failed to connect to database");

    // Run migrations
    sqlx::migrate!()
        .run(&pool)
        .await
        .expect("Failed to run database migrations");

    tracing::info!("Database migrations completed");

    let weather_client = WeatherClient::new(
        config.openweather_api_key.clone(),
        &config.openweather_base_url,
        &config.http_user_agent,
    )
    .expect("Failed to build weather client");
    if !weather_client.has_api_key() {
        tracing::warn!("OPENWEATHER_API_KEY not set, all readings will be synthetic");
    }

    let alert_state = AlertState {
        store: new_alert_store(),
        capacity: config.alert_capacity,
    };
    tracing::info!("Alert feeds retain {} alerts per user", alert_state.capacity);

    // CORS: browser clients read conditions and post trips and readings
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers(Any);

    // Build router
    // Each group carries only the state it needs.
    let health_routes = Router::new()
        .route("/api/v1/health", get(routes::health::health_check))
        .with_state(HealthState {
            pool: pool.clone(),
            weather: weather_client.clone(),
        });

    let conditions_routes = Router::new()
        .route("/api/v1/conditions", get(routes::conditions::get_conditions))
        .with_state(weather_client);

    let region_routes = Router::new().route(
        "/api/v1/regions/classify",
        get(routes::regions::classify_region),
    );

    let alert_routes = Router::new()
        .route(
            "/api/v1/users/:user_id/alerts",
            get(routes::alerts::get_alerts),
        )
        .route(
            "/api/v1/users/:user_id/alerts/evaluate",
            post(routes::alerts::evaluate_reading),
        )
        .route(
            "/api/v1/users/:user_id/alerts/read-all",
            post(routes::alerts::mark_all_alerts_read),
        )
        .route(
            "/api/v1/users/:user_id/alerts/:alert_id/read",
            post(routes::alerts::mark_alert_read),
        )
        .with_state(alert_state);

    let trip_routes = Router::new()
        .route(
            "/api/v1/users/:user_id/trips",
            get(routes::trips::list_trips).post(routes::trips::create_trip),
        )
        .route(
            "/api/v1/users/:user_id/trips/gpx",
            post(routes::trips::import_gpx_trip),
        )
        .route(
            "/api/v1/users/:user_id/stats",
            get(routes::stats::get_user_stats),
        )
        .with_state(pool);

    let app = Router::new()
        .merge(health_routes)
        .merge(conditions_routes)
        .merge(region_routes)
        .merge(alert_routes)
        .merge(trip_routes)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(TraceLayer::new_for_http())
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

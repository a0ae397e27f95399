use axum::extract::State;
use axum::Json;
use serde::Serialize;
use sqlx::PgPool;
use utoipa::ToSchema;

use crate::services::weather::{ReadingSource, WeatherClient};

#[derive(Clone)]
pub struct HealthState {
    pub pool: PgPool,
    pub weather: WeatherClient,
}

/// Health check response.
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    /// "ok", or "degraded" when the database is unreachable
    pub status: String,
    /// API version
    pub version: String,
    /// Whether the trip database answered
    pub database: bool,
    /// Source readings come from when the provider is healthy
    pub weather_source: ReadingSource,
}

impl HealthResponse {
    fn new(db_ok: bool, weather_source: ReadingSource) -> Self {
        Self {
            status: if db_ok { "ok" } else { "degraded" }.to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            database: db_ok,
            weather_source,
        }
    }
}

/// Service health.
///
/// Still 200 when the database is down; the alert and conditions endpoints
/// keep working without it.
#[utoipa::path(
    get,
    path = "/api/v1/health",
    tag = "Health",
    responses(
        (status = 200, description = "Service status", body = HealthResponse),
    )
)]
pub async fn health_check(State(state): State<HealthState>) -> Json<HealthResponse> {
    let db_ok = sqlx::query_scalar::<_, i32>("SELECT 1")
        .fetch_one(&state.pool)
        .await
        .is_ok();
    if !db_ok {
        tracing::warn!("Health check: database unreachable");
    }

    let weather_source = if state.weather.has_api_key() {
        ReadingSource::Live
    } else {
        ReadingSource::Synthetic
    };
    Json(HealthResponse::new(db_ok, weather_source))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_follows_database() {
        let ok = HealthResponse::new(true, ReadingSource::Live);
        assert_eq!(ok.status, "ok");
        let degraded = HealthResponse::new(false, ReadingSource::Synthetic);
        assert_eq!(degraded.status, "degraded");
        assert!(!degraded.database);
    }
}

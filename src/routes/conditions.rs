//! Current conditions for a map location.
//!
//! - GET /api/v1/conditions?lat=&lng=

use axum::extract::{Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::errors::{validate_coordinates, AppError, ErrorResponse};
use crate::routes::regions::RegionResponse;
use crate::services::conditions::ConditionLabels;
use crate::services::geo::GeoPoint;
use crate::services::reading::WeatherReading;
use crate::services::recommendation::{recommend, Recommendation};
use crate::services::weather::{ReadingSource, WeatherClient};

#[derive(Debug, Deserialize, IntoParams)]
pub struct ConditionsQuery {
    /// Latitude in decimal degrees
    pub lat: f64,
    /// Longitude in decimal degrees
    pub lng: f64,
}

/// Everything the map panel shows for a clicked location.
#[derive(Debug, Serialize, ToSchema)]
pub struct ConditionsResponse {
    pub location: GeoPoint,
    pub reading: WeatherReading,
    /// Whether the reading came from the provider or the synthetic generator
    pub source: ReadingSource,
    pub region: RegionResponse,
    pub recommendation: Recommendation,
    pub labels: ConditionLabels,
}

impl ConditionsResponse {
    fn build(location: GeoPoint, reading: WeatherReading, source: ReadingSource) -> Self {
        Self {
            location,
            region: RegionResponse::for_latitude(location.lat),
            recommendation: recommend(Some(&reading)),
            labels: ConditionLabels::for_reading(&reading),
            reading,
            source,
        }
    }
}

/// Get the weather reading and fishing recommendation for a location.
///
/// Falls back to a synthetic reading when the weather provider is not
/// configured or unavailable; `source` says which one was used.
#[utoipa::path(
    get,
    path = "/api/v1/conditions",
    tag = "Conditions",
    params(ConditionsQuery),
    responses(
        (status = 200, description = "Conditions for the location", body = ConditionsResponse),
        (status = 400, description = "Coordinates out of range", body = ErrorResponse),
    )
)]
pub async fn get_conditions(
    State(weather): State<WeatherClient>,
    Query(query): Query<ConditionsQuery>,
) -> Result<Json<ConditionsResponse>, AppError> {
    validate_coordinates(query.lat, query.lng)?;
    let location = GeoPoint::new(query.lat, query.lng);

    let (reading, source) = weather.fetch_reading(location.lat, location.lng).await;
    tracing::debug!(
        "Conditions for ({}, {}) from {:?} source",
        location.lat,
        location.lng,
        source
    );

    Ok(Json(ConditionsResponse::build(location, reading, source)))
}

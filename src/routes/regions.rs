use axum::extract::Query;
use axum::Json;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::errors::{AppError, ErrorResponse};
use crate::services::region::{classify, glyph_for, species_for};

#[derive(Debug, Deserialize, IntoParams)]
pub struct ClassifyQuery {
    /// Latitude in decimal degrees (south is negative)
    pub lat: f64,
}

/// Coastal region for a latitude, with display and catch hints.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct RegionResponse {
    /// Region name (e.g. "Nordeste")
    pub region: String,
    /// Representative coastal state (e.g. "Bahia")
    pub state: String,
    /// Display glyph for the region
    pub glyph: String,
    /// Species commonly caught in the region
    pub species: Vec<String>,
}

impl RegionResponse {
    pub fn for_latitude(lat: f64) -> Self {
        let m = classify(lat);
        Self {
            region: m.region.to_string(),
            state: m.state.to_string(),
            glyph: glyph_for(m.region).to_string(),
            species: species_for(m.region).iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// Classify a latitude into a Brazilian coastal region.
#[utoipa::path(
    get,
    path = "/api/v1/regions/classify",
    tag = "Regions",
    params(ClassifyQuery),
    responses(
        (status = 200, description = "Region for the latitude", body = RegionResponse),
        (status = 400, description = "Latitude out of range", body = ErrorResponse),
    )
)]
pub async fn classify_region(
    Query(query): Query<ClassifyQuery>,
) -> Result<Json<RegionResponse>, AppError> {
    if !query.lat.is_finite() || !(-90.0..=90.0).contains(&query.lat) {
        return Err(AppError::BadRequest(format!(
            "lat must be between -90 and 90, got {}",
            query.lat
        )));
    }
    Ok(Json(RegionResponse::for_latitude(query.lat)))
}

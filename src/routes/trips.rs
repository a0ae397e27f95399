//! Fishing trip record endpoints.
//!
//! - GET  /api/v1/users/:user_id/trips
//! - POST /api/v1/users/:user_id/trips
//! - POST /api/v1/users/:user_id/trips/gpx?species=&count=

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::db::{models, queries};
use crate::errors::{AppError, ErrorResponse};
use crate::helpers::round_2dp;
use crate::services::geo::GeoPoint;
use crate::services::gpx::parse_gpx;
use crate::services::stats::track_distance_km;
use crate::services::trips::TripRecord;

/// A trip document as posted by a client.
///
/// Field names vary between app versions (`count`/`quantidade`/`peixes`,
/// `species`/`especie`/`speciesName`, `locations`/`localizacoes`/`track`);
/// all of them are accepted and stored unchanged.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(transparent)]
#[schema(value_type = Object)]
pub struct TripDocument(pub serde_json::Value);

#[derive(Debug, Deserialize, IntoParams)]
pub struct GpxImportQuery {
    /// Species caught on the trip
    pub species: Option<String>,
    /// Number of fish caught
    pub count: Option<u64>,
}

/// A stored trip, normalized.
#[derive(Debug, Serialize, ToSchema)]
pub struct TripResponse {
    pub id: Uuid,
    pub name: Option<String>,
    /// Creation time in ISO 8601 / RFC 3339 format
    pub created_at: String,
    pub species: Option<String>,
    pub catch_count: u64,
    /// Track points in order; `null` where coordinates could not be read
    pub track: Vec<Option<GeoPoint>>,
    /// Length of the track in km (2 decimal places)
    pub distance_km: f64,
}

impl From<models::TripRecordRow> for TripResponse {
    fn from(row: models::TripRecordRow) -> Self {
        let record = TripRecord::from_document(&row.document);
        Self {
            id: row.id,
            name: row.name,
            created_at: row.created_at.to_rfc3339(),
            distance_km: round_2dp(track_distance_km(&record.track)),
            species: record.species,
            catch_count: record.catch_count,
            track: record.track,
        }
    }
}

/// Read an optional trip name from a posted document.
fn document_name(doc: &serde_json::Value) -> Option<&str> {
    ["name", "nome"]
        .iter()
        .filter_map(|k| doc.get(*k))
        .find_map(|v| v.as_str())
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

/// List a user's trips, oldest first.
#[utoipa::path(
    get,
    path = "/api/v1/users/{user_id}/trips",
    tag = "Trips",
    params(
        ("user_id" = String, Path, description = "Opaque user identifier"),
    ),
    responses(
        (status = 200, description = "Normalized trip records", body = Vec<TripResponse>),
    )
)]
pub async fn list_trips(
    State(pool): State<PgPool>,
    Path(user_id): Path<String>,
) -> Result<Json<Vec<TripResponse>>, AppError> {
    let rows = queries::list_trip_documents(&pool, &user_id).await?;
    let items: Vec<TripResponse> = rows.into_iter().map(TripResponse::from).collect();
    Ok(Json(items))
}

/// Store a trip document.
#[utoipa::path(
    post,
    path = "/api/v1/users/{user_id}/trips",
    tag = "Trips",
    params(
        ("user_id" = String, Path, description = "Opaque user identifier"),
    ),
    request_body = TripDocument,
    responses(
        (status = 201, description = "Trip stored", body = TripResponse),
        (status = 400, description = "Body is not a JSON object", body = ErrorResponse),
    )
)]
pub async fn create_trip(
    State(pool): State<PgPool>,
    Path(user_id): Path<String>,
    Json(TripDocument(document)): Json<TripDocument>,
) -> Result<(StatusCode, Json<TripResponse>), AppError> {
    if !document.is_object() {
        return Err(AppError::BadRequest(
            "Trip document must be a JSON object".to_string(),
        ));
    }

    let row =
        queries::insert_trip_document(&pool, &user_id, document_name(&document), &document).await?;
    tracing::info!("Stored trip {} for user {}", row.id, user_id);
    Ok((StatusCode::CREATED, Json(TripResponse::from(row))))
}

/// Import a GPX track as a trip.
#[utoipa::path(
    post,
    path = "/api/v1/users/{user_id}/trips/gpx",
    tag = "Trips",
    params(
        ("user_id" = String, Path, description = "Opaque user identifier"),
        GpxImportQuery,
    ),
    request_body(content = String, description = "GPX 1.1 document", content_type = "application/gpx+xml"),
    responses(
        (status = 201, description = "Trip imported", body = TripResponse),
        (status = 400, description = "Invalid GPX", body = ErrorResponse),
    )
)]
pub async fn import_gpx_trip(
    State(pool): State<PgPool>,
    Path(user_id): Path<String>,
    Query(query): Query<GpxImportQuery>,
    body: String,
) -> Result<(StatusCode, Json<TripResponse>), AppError> {
    let trip = parse_gpx(&body)?;
    let species = query
        .species
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty());
    let document = trip.to_document(species, query.count);

    let row = queries::insert_trip_document(&pool, &user_id, trip.name.as_deref(), &document)
        .await?;
    tracing::info!(
        "Imported GPX trip {} for user {} ({} points)",
        row.id,
        user_id,
        trip.track.len()
    );
    Ok((StatusCode::CREATED, Json(TripResponse::from(row))))
}

use axum::extract::{Path, State};
use axum::Json;
use sqlx::PgPool;

use crate::db::queries;
use crate::errors::AppError;
use crate::services::stats::{aggregate, StatisticsSummary};
use crate::services::trips::TripRecord;

/// Profile statistics over all of a user's trips.
///
/// Recomputed from the stored documents on every call.
#[utoipa::path(
    get,
    path = "/api/v1/users/{user_id}/stats",
    tag = "Trips",
    params(
        ("user_id" = String, Path, description = "Opaque user identifier"),
    ),
    responses(
        (status = 200, description = "Aggregated trip statistics", body = StatisticsSummary),
    )
)]
pub async fn get_user_stats(
    State(pool): State<PgPool>,
    Path(user_id): Path<String>,
) -> Result<Json<StatisticsSummary>, AppError> {
    let rows = queries::list_trip_documents(&pool, &user_id).await?;
    let records: Vec<TripRecord> = rows
        .iter()
        .map(|row| TripRecord::from_document(&row.document))
        .collect();

    let summary = aggregate(&records);
    tracing::debug!(
        "Stats for {}: {} trips, {} catches, {} km",
        user_id,
        summary.trip_count,
        summary.total_catches,
        summary.distance_km
    );
    Ok(Json(summary))
}

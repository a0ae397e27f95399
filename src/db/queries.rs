use sqlx::PgPool;
use uuid::Uuid;

use super::models::TripRecordRow;

/// Store a trip document for a user, returning the stored row.
pub async fn insert_trip_document(
    pool: &PgPool,
    user_id: &str,
    name: Option<&str>,
    document: &serde_json::Value,
) -> Result<TripRecordRow, sqlx::Error> {
    sqlx::query_as::<_, TripRecordRow>(
        "INSERT INTO trip_records (id, user_id, name, document)
         VALUES ($1, $2, $3, $4)
         RETURNING id, user_id, name, document, created_at",
    )
    .bind(Uuid::new_v4())
    .bind(user_id)
    .bind(name)
    .bind(document)
    .fetch_one(pool)
    .await
}

/// All trip documents for a user, oldest first.
pub async fn list_trip_documents(
    pool: &PgPool,
    user_id: &str,
) -> Result<Vec<TripRecordRow>, sqlx::Error> {
    sqlx::query_as::<_, TripRecordRow>(
        "SELECT id, user_id, name, document, created_at
         FROM trip_records
         WHERE user_id = $1
         ORDER BY created_at, id",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await
}

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// A stored trip document, exactly as it was posted.
#[derive(Debug, Clone, FromRow)]
pub struct TripRecordRow {
    pub id: Uuid,
    #[allow(dead_code)] // Filtered on in SQL; not echoed back to the owner
    pub user_id: String,
    pub name: Option<String>,
    pub document: serde_json::Value,
    pub created_at: DateTime<Utc>,
}

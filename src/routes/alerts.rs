//! Per-user condition alert feed endpoints.
//!
//! - GET  /api/v1/users/:user_id/alerts?compact=true
//! - POST /api/v1/users/:user_id/alerts/evaluate
//! - POST /api/v1/users/:user_id/alerts/:alert_id/read
//! - POST /api/v1/users/:user_id/alerts/read-all

use axum::extract::{Path, Query, State};
use axum::Json;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::errors::{AppError, ErrorResponse};
use crate::services::alerts::{Alert, AlertFeed, SharedAlertStore, COMPACT_ALERT_CAPACITY};
use crate::services::reading::WeatherReading;

/// Shared state for alert endpoints.
#[derive(Clone)]
pub struct AlertState {
    pub store: SharedAlertStore,
    /// Capacity given to feeds created on first use
    pub capacity: usize,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct AlertFeedQuery {
    /// Return only the newest alerts, as the dashboard widget does
    #[serde(default)]
    pub compact: bool,
}

/// A user's retained alerts plus summary counts.
#[derive(Debug, Serialize, ToSchema)]
pub struct AlertFeedResponse {
    /// Retained alerts, newest first
    pub alerts: Vec<Alert>,
    /// Number of retained alerts (before any compact limit)
    pub total: usize,
    /// Alerts not yet marked read
    pub unread: usize,
    /// High-priority alerts
    pub critical: usize,
    /// Maximum number of alerts the feed retains
    pub capacity: usize,
}

impl AlertFeedResponse {
    fn from_feed(feed: &AlertFeed, limit: Option<usize>) -> Self {
        let alerts = feed.alerts();
        let shown = limit.map_or(alerts.len(), |l| l.min(alerts.len()));
        Self {
            alerts: alerts[..shown].to_vec(),
            total: alerts.len(),
            unread: feed.unread_count(),
            critical: feed.high_priority_count(),
            capacity: feed.capacity(),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct EvaluateResponse {
    /// Alerts from this reading that made it into the feed
    pub new_alerts: Vec<Alert>,
    pub feed: AlertFeedResponse,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct MarkAllReadResponse {
    /// How many alerts changed from unread to read
    pub marked: usize,
    pub feed: AlertFeedResponse,
}

/// Get a user's alert feed.
#[utoipa::path(
    get,
    path = "/api/v1/users/{user_id}/alerts",
    tag = "Alerts",
    params(
        ("user_id" = String, Path, description = "Opaque user identifier"),
        AlertFeedQuery,
    ),
    responses(
        (status = 200, description = "Retained alerts, newest first", body = AlertFeedResponse),
    )
)]
pub async fn get_alerts(
    State(state): State<AlertState>,
    Path(user_id): Path<String>,
    Query(query): Query<AlertFeedQuery>,
) -> Json<AlertFeedResponse> {
    let limit = query.compact.then_some(COMPACT_ALERT_CAPACITY);
    let store = state.store.read().await;
    let response = match store.get(&user_id) {
        Some(feed) => AlertFeedResponse::from_feed(feed, limit),
        None => AlertFeedResponse::from_feed(&AlertFeed::new(state.capacity), limit),
    };
    Json(response)
}

/// Evaluate a weather reading and merge the resulting alerts into the feed.
///
/// Alerts whose kind is already in the feed are not added again.
#[utoipa::path(
    post,
    path = "/api/v1/users/{user_id}/alerts/evaluate",
    tag = "Alerts",
    params(
        ("user_id" = String, Path, description = "Opaque user identifier"),
    ),
    request_body = WeatherReading,
    responses(
        (status = 200, description = "Alerts generated and merged", body = EvaluateResponse),
        (status = 400, description = "Invalid reading", body = ErrorResponse),
    )
)]
pub async fn evaluate_reading(
    State(state): State<AlertState>,
    Path(user_id): Path<String>,
    Json(reading): Json<WeatherReading>,
) -> Result<Json<EvaluateResponse>, AppError> {
    if reading.wind_speed_ms < 0.0 || reading.visibility_m < 0.0 {
        return Err(AppError::BadRequest(
            "wind_speed_ms and visibility_m must not be negative".to_string(),
        ));
    }

    let mut store = state.store.write().await;
    let feed = store
        .entry(user_id.clone())
        .or_insert_with(|| AlertFeed::new(state.capacity));
    let new_alerts = feed.ingest(&reading, Utc::now());

    tracing::info!(
        "User {}: {} new alert(s), {} retained",
        user_id,
        new_alerts.len(),
        feed.alerts().len()
    );

    Ok(Json(EvaluateResponse {
        new_alerts,
        feed: AlertFeedResponse::from_feed(feed, None),
    }))
}

/// Mark one alert as read.
#[utoipa::path(
    post,
    path = "/api/v1/users/{user_id}/alerts/{alert_id}/read",
    tag = "Alerts",
    params(
        ("user_id" = String, Path, description = "Opaque user identifier"),
        ("alert_id" = String, Path, description = "Alert id, e.g. \"wind_2026-03-01T08:00:00.000Z\""),
    ),
    responses(
        (status = 200, description = "Alert marked read", body = AlertFeedResponse),
        (status = 404, description = "No such alert in the feed", body = ErrorResponse),
    )
)]
pub async fn mark_alert_read(
    State(state): State<AlertState>,
    Path((user_id, alert_id)): Path<(String, String)>,
) -> Result<Json<AlertFeedResponse>, AppError> {
    let mut store = state.store.write().await;
    let feed = store
        .get_mut(&user_id)
        .filter(|feed| feed.alerts().iter().any(|a| a.id == alert_id))
        .ok_or_else(|| AppError::NotFound(format!("Alert {} not found", alert_id)))?;
    feed.mark_read(&alert_id);
    Ok(Json(AlertFeedResponse::from_feed(feed, None)))
}

/// Mark every alert in the feed as read.
#[utoipa::path(
    post,
    path = "/api/v1/users/{user_id}/alerts/read-all",
    tag = "Alerts",
    params(
        ("user_id" = String, Path, description = "Opaque user identifier"),
    ),
    responses(
        (status = 200, description = "All alerts marked read", body = MarkAllReadResponse),
    )
)]
pub async fn mark_all_alerts_read(
    State(state): State<AlertState>,
    Path(user_id): Path<String>,
) -> Json<MarkAllReadResponse> {
    let mut store = state.store.write().await;
    let response = match store.get_mut(&user_id) {
        Some(feed) => MarkAllReadResponse {
            marked: feed.mark_all_read(),
            feed: AlertFeedResponse::from_feed(feed, None),
        },
        None => MarkAllReadResponse {
            marked: 0,
            feed: AlertFeedResponse::from_feed(&AlertFeed::new(state.capacity), None),
        },
    };
    Json(response)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::alerts::{new_alert_store, AlertKind};
    use crate::services::reading::sample_reading;

    fn state(capacity: usize) -> AlertState {
        AlertState {
            store: new_alert_store(),
            capacity,
        }
    }

    fn stormy() -> WeatherReading {
        WeatherReading {
            wind_speed_ms: 14.0,
            wave_height_m: Some(4.5),
            visibility_m: 3_000.0,
            pressure_hpa: 995.0,
            temperature_c: 16.0,
            ..sample_reading()
        }
    }

    async fn evaluate(state: &AlertState, user: &str, reading: WeatherReading) -> EvaluateResponse {
        let Json(resp) = evaluate_reading(
            State(state.clone()),
            Path(user.to_string()),
            Json(reading),
        )
        .await
        .unwrap();
        resp
    }

    #[tokio::test]
    async fn test_unknown_user_has_empty_feed() {
        let s = state(10);
        let Json(feed) = get_alerts(
            State(s),
            Path("nobody".to_string()),
            Query(AlertFeedQuery::default()),
        )
        .await;
        assert!(feed.alerts.is_empty());
        assert_eq!(feed.capacity, 10);
    }

    #[tokio::test]
    async fn test_evaluate_then_reevaluate_dedups() {
        let s = state(10);
        let first = evaluate(&s, "u1", stormy()).await;
        // wave, highwave, wind, windstrong, visibility, pressure, coldwater
        assert_eq!(first.new_alerts.len(), 7);
        assert_eq!(first.feed.critical, 4);
        assert_eq!(first.feed.unread, 7);

        let second = evaluate(&s, "u1", stormy()).await;
        assert!(second.new_alerts.is_empty());
        assert_eq!(second.feed.total, 7);
    }

    #[tokio::test]
    async fn test_feeds_are_per_user() {
        let s = state(10);
        evaluate(&s, "u1", stormy()).await;
        let Json(other) = get_alerts(
            State(s.clone()),
            Path("u2".to_string()),
            Query(AlertFeedQuery::default()),
        )
        .await;
        assert_eq!(other.total, 0);
    }

    #[tokio::test]
    async fn test_capacity_from_state() {
        let s = state(3);
        let resp = evaluate(&s, "u1", stormy()).await;
        assert_eq!(resp.feed.total, 3);
        assert_eq!(resp.new_alerts.len(), 3);
    }

    #[tokio::test]
    async fn test_compact_view_limits_alerts() {
        let s = state(10);
        evaluate(&s, "u1", stormy()).await;
        let Json(feed) = get_alerts(
            State(s),
            Path("u1".to_string()),
            Query(AlertFeedQuery { compact: true }),
        )
        .await;
        assert_eq!(feed.alerts.len(), COMPACT_ALERT_CAPACITY);
        assert_eq!(feed.total, 7);
    }

    #[tokio::test]
    async fn test_mark_read_and_read_all() {
        let s = state(10);
        let resp = evaluate(&s, "u1", stormy()).await;
        let id = resp.new_alerts[0].id.clone();

        let Json(feed) = mark_alert_read(State(s.clone()), Path(("u1".to_string(), id)))
            .await
            .unwrap();
        assert_eq!(feed.unread, 6);

        let Json(all) = mark_all_alerts_read(State(s.clone()), Path("u1".to_string())).await;
        assert_eq!(all.marked, 6);
        assert_eq!(all.feed.unread, 0);
    }

    #[tokio::test]
    async fn test_mark_read_unknown_alert_is_not_found() {
        let s = state(10);
        evaluate(&s, "u1", stormy()).await;
        let result = mark_alert_read(
            State(s),
            Path(("u1".to_string(), "wind_1970-01-01T00:00:00.000Z".to_string())),
        )
        .await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_ideal_conditions_raise_success_only() {
        let s = state(10);
        let calm = WeatherReading {
            wind_speed_ms: 3.0,
            wave_height_m: Some(0.5),
            ..sample_reading()
        };
        let resp = evaluate(&s, "u1", calm).await;
        assert_eq!(resp.new_alerts.len(), 1);
        assert_eq!(resp.new_alerts[0].kind, AlertKind::Ideal);
    }

    #[tokio::test]
    async fn test_negative_wind_is_rejected() {
        let s = state(10);
        let bad = WeatherReading {
            wind_speed_ms: -1.0,
            ..sample_reading()
        };
        let result = evaluate_reading(State(s), Path("u1".to_string()), Json(bad)).await;
        assert!(matches!(result, Err(AppError::BadRequest(_))));
    }
}

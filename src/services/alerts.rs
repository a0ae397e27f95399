//! Condition alert engine.
//!
//! Every rule is evaluated independently against a [`WeatherReading`], so a
//! single reading can raise several alerts (e.g. both wave alerts above 4 m).
//! Alerts are retained per user in an [`AlertFeed`], newest first:
//!
//! - a new alert is dropped when an alert of the same kind is still retained
//! - the feed is truncated to its capacity after every merge (oldest go first)
//!
//! The kind is also the prefix of the alert id (`"{kind}_{timestamp}"`), so
//! clients that only see ids can still group alerts by condition.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tokio::sync::RwLock;
use utoipa::ToSchema;

use crate::services::reading::WeatherReading;
use crate::services::thresholds::{
    COLD_WATER_C, PRESSURE_LOW_HPA, VISIBILITY_LOW_KM, WAVE_CALM_M, WAVE_HIGH_M, WAVE_VERY_HIGH_M,
    WIND_DANGER_MS, WIND_LIGHT_MS, WIND_MODERATE_MS,
};

/// Feed capacity used by the full alert screen.
pub const DEFAULT_ALERT_CAPACITY: usize = 10;

/// Feed capacity used by the compact dashboard card.
pub const COMPACT_ALERT_CAPACITY: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum AlertType {
    Danger,
    Warning,
    Info,
    Success,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum AlertPriority {
    High,
    Medium,
    Low,
}

/// The condition an alert reports. Its tag doubles as the id prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum AlertKind {
    Wave,
    HighWave,
    Wind,
    WindStrong,
    Visibility,
    Pressure,
    Ideal,
    ColdWater,
}

impl AlertKind {
    /// Rule evaluation order.
    pub const ALL: [AlertKind; 8] = [
        AlertKind::Wave,
        AlertKind::HighWave,
        AlertKind::Wind,
        AlertKind::WindStrong,
        AlertKind::Visibility,
        AlertKind::Pressure,
        AlertKind::Ideal,
        AlertKind::ColdWater,
    ];

    /// Stable id prefix. Never contains `_`.
    pub fn tag(&self) -> &'static str {
        match self {
            AlertKind::Wave => "wave",
            AlertKind::HighWave => "highwave",
            AlertKind::Wind => "wind",
            AlertKind::WindStrong => "windstrong",
            AlertKind::Visibility => "visibility",
            AlertKind::Pressure => "pressure",
            AlertKind::Ideal => "ideal",
            AlertKind::ColdWater => "coldwater",
        }
    }

    pub fn alert_type(&self) -> AlertType {
        match self {
            AlertKind::HighWave | AlertKind::WindStrong => AlertType::Danger,
            AlertKind::Wave | AlertKind::Wind | AlertKind::Visibility => AlertType::Warning,
            AlertKind::Pressure | AlertKind::ColdWater => AlertType::Info,
            AlertKind::Ideal => AlertType::Success,
        }
    }

    pub fn priority(&self) -> AlertPriority {
        match self {
            AlertKind::Wave | AlertKind::HighWave | AlertKind::Wind | AlertKind::WindStrong => {
                AlertPriority::High
            }
            AlertKind::Visibility | AlertKind::Pressure => AlertPriority::Medium,
            AlertKind::Ideal | AlertKind::ColdWater => AlertPriority::Low,
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            AlertKind::Wave => "Ondas Altas",
            AlertKind::HighWave => "Ondas Muito Altas",
            AlertKind::Wind => "Ventos Fortes",
            AlertKind::WindStrong => "Ventos Muito Fortes",
            AlertKind::Visibility => "Baixa Visibilidade",
            AlertKind::Pressure => "Pressão Baixa",
            AlertKind::Ideal => "Condições Ideais",
            AlertKind::ColdWater => "Água Fria",
        }
    }

    pub fn glyph(&self) -> &'static str {
        match self {
            AlertKind::Wave => "⚠️",
            AlertKind::HighWave => "🚨",
            AlertKind::Wind => "💨",
            AlertKind::WindStrong => "🌪️",
            AlertKind::Visibility => "🌫️",
            AlertKind::Pressure => "📉",
            AlertKind::Ideal => "✅",
            AlertKind::ColdWater => "❄️",
        }
    }

    /// Whether this rule fires for the reading.
    pub fn triggered_by(&self, reading: &WeatherReading) -> bool {
        let wave = reading.effective_wave_height_m();
        let wind = reading.wind_speed_ms;
        match self {
            AlertKind::Wave => wave > WAVE_HIGH_M,
            AlertKind::HighWave => wave > WAVE_VERY_HIGH_M,
            AlertKind::Wind => wind > WIND_MODERATE_MS,
            AlertKind::WindStrong => wind > WIND_DANGER_MS,
            AlertKind::Visibility => reading.visibility_km() < VISIBILITY_LOW_KM,
            AlertKind::Pressure => reading.pressure_hpa < PRESSURE_LOW_HPA,
            AlertKind::Ideal => wave < WAVE_CALM_M && wind < WIND_LIGHT_MS,
            AlertKind::ColdWater => reading.temperature_c < COLD_WATER_C,
        }
    }

    fn message(&self, reading: &WeatherReading) -> String {
        let wave = reading.effective_wave_height_m();
        match self {
            AlertKind::Wave => format!(
                "Altura das ondas: {:.1}m - Cuidado com embarcações pequenas",
                wave
            ),
            AlertKind::HighWave => format!("Altura das ondas: {:.1}m - Condições perigosas!", wave),
            AlertKind::Wind => format!(
                "Velocidade do vento: {:.1}m/s - Atenção à navegação",
                reading.wind_speed_ms
            ),
            AlertKind::WindStrong => format!(
                "Velocidade do vento: {:.1}m/s - EVITE sair ao mar",
                reading.wind_speed_ms
            ),
            AlertKind::Visibility => format!(
                "Visibilidade: {:.1}km - Cuidado ao navegar",
                reading.visibility_km()
            ),
            AlertKind::Pressure => "Queda na pressão - Possível mudança no tempo".to_string(),
            AlertKind::Ideal => "Mar calmo e ventos fracos - Excelente para pesca!".to_string(),
            AlertKind::ColdWater => format!(
                "Temperatura: {:.0}°C - Espécies podem estar em profundidade",
                reading.temperature_c
            ),
        }
    }
}

/// A user-dismissible notice raised by a threshold breach.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Alert {
    /// `"{kind}_{timestamp}"`, unique within a generation batch
    pub id: String,
    pub kind: AlertKind,
    pub title: String,
    pub glyph: String,
    pub message: String,
    #[serde(rename = "type")]
    pub alert_type: AlertType,
    pub priority: AlertPriority,
    /// Generation time (ISO 8601)
    pub timestamp: DateTime<Utc>,
    pub is_read: bool,
}

impl Alert {
    fn new(kind: AlertKind, reading: &WeatherReading, now: DateTime<Utc>) -> Self {
        Self {
            id: format!(
                "{}_{}",
                kind.tag(),
                now.to_rfc3339_opts(SecondsFormat::Millis, true)
            ),
            kind,
            title: kind.title().to_string(),
            glyph: kind.glyph().to_string(),
            message: kind.message(reading),
            alert_type: kind.alert_type(),
            priority: kind.priority(),
            timestamp: now,
            is_read: false,
        }
    }

    /// The stable portion of the id identifying the underlying condition.
    #[allow(dead_code)] // Merges dedup on `kind`, which always equals this prefix
    pub fn kind_prefix(&self) -> &str {
        self.id.split('_').next().unwrap_or(&self.id)
    }
}

/// Evaluate every rule against the reading, in rule order.
pub fn generate(reading: &WeatherReading, now: DateTime<Utc>) -> Vec<Alert> {
    AlertKind::ALL
        .iter()
        .filter(|kind| kind.triggered_by(reading))
        .map(|&kind| Alert::new(kind, reading, now))
        .collect()
}

/// Merge a fresh batch into the retained alerts.
///
/// New alerts whose kind is already retained are dropped; survivors go in
/// front of `existing` and the result is truncated to `capacity`.
pub fn merge(new_alerts: Vec<Alert>, existing: Vec<Alert>, capacity: usize) -> Vec<Alert> {
    let mut seen: HashSet<AlertKind> = existing.iter().map(|a| a.kind).collect();
    let mut merged: Vec<Alert> = new_alerts
        .into_iter()
        .filter(|a| seen.insert(a.kind))
        .collect();
    merged.extend(existing);
    merged.truncate(capacity);
    merged
}

/// Bounded, newest-first alert list owned by one user session.
#[derive(Debug, Clone)]
pub struct AlertFeed {
    capacity: usize,
    alerts: Vec<Alert>,
}

impl AlertFeed {
    /// Create an empty feed. Capacity is at least 1.
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            alerts: Vec::new(),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn alerts(&self) -> &[Alert] {
        &self.alerts
    }

    /// Generate alerts for a reading and merge them in.
    ///
    /// Returns the alerts from this batch that were actually retained.
    pub fn ingest(&mut self, reading: &WeatherReading, now: DateTime<Utc>) -> Vec<Alert> {
        let batch = generate(reading, now);
        let batch_ids: HashSet<String> = batch.iter().map(|a| a.id.clone()).collect();
        let existing = std::mem::take(&mut self.alerts);
        self.alerts = merge(batch, existing, self.capacity);

        let retained: Vec<Alert> = self
            .alerts
            .iter()
            .filter(|a| batch_ids.contains(&a.id))
            .cloned()
            .collect();
        tracing::debug!(
            "Alert feed ingest: {} new retained, {} total",
            retained.len(),
            self.alerts.len()
        );
        retained
    }

    /// Mark one alert read. Returns false when no alert has this id.
    pub fn mark_read(&mut self, id: &str) -> bool {
        match self.alerts.iter_mut().find(|a| a.id == id) {
            Some(alert) => {
                alert.is_read = true;
                true
            }
            None => false,
        }
    }

    /// Mark every retained alert read. Returns how many changed.
    pub fn mark_all_read(&mut self) -> usize {
        let mut changed = 0;
        for alert in self.alerts.iter_mut().filter(|a| !a.is_read) {
            alert.is_read = true;
            changed += 1;
        }
        changed
    }

    pub fn unread_count(&self) -> usize {
        self.alerts.iter().filter(|a| !a.is_read).count()
    }

    pub fn high_priority_count(&self) -> usize {
        self.alerts
            .iter()
            .filter(|a| a.priority == AlertPriority::High)
            .count()
    }
}

/// Per-user alert feeds. Each merge runs under a single write guard.
pub type SharedAlertStore = Arc<RwLock<HashMap<String, AlertFeed>>>;

pub fn new_alert_store() -> SharedAlertStore {
    Arc::new(RwLock::new(HashMap::new()))
}

//! Trip document normalization.
//!
//! Trip records are stored as free-form JSON documents written by several
//! client versions, so the same fact shows up under different field names.
//! This module resolves them once into a canonical [`TripRecord`]:
//!
//! - catch count: `count`, `quantidade`, `peixes` (default 1)
//! - species: `species`, `especie`, `speciesName`
//! - track: `locations`, `localizacoes`, `track`, where each point is
//!   `{lat, lng}`, `{latitude, longitude}` or a GeoJSON-style `[lng, lat]`
//!
//! Nothing here fails: unusable values fall back to defaults, and points
//! that cannot be resolved stay in the track as `None` so the aggregator can
//! skip the pairs that touch them.

use serde::Serialize;
use serde_json::Value;
use utoipa::ToSchema;

use crate::services::geo::GeoPoint;

const COUNT_FIELDS: [&str; 3] = ["count", "quantidade", "peixes"];
const SPECIES_FIELDS: [&str; 3] = ["species", "especie", "speciesName"];
const TRACK_FIELDS: [&str; 3] = ["locations", "localizacoes", "track"];

/// Catch count assumed when a record does not state one.
pub const DEFAULT_CATCH_COUNT: u64 = 1;

/// Canonical trip record handed to the statistics aggregator.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct TripRecord {
    /// Species label, when the record names one
    pub species: Option<String>,
    /// Number of fish caught on this trip
    pub catch_count: u64,
    /// GPS track in recording order; `null` entries could not be resolved
    pub track: Vec<Option<GeoPoint>>,
}

impl TripRecord {
    /// Normalize a stored trip document.
    pub fn from_document(doc: &Value) -> Self {
        Self {
            species: resolve_species(doc),
            catch_count: resolve_catch_count(doc),
            track: resolve_track(doc),
        }
    }
}

/// First field from `names` that is present and not null.
fn first_present<'a>(doc: &'a Value, names: &[&str]) -> Option<&'a Value> {
    names
        .iter()
        .filter_map(|name| doc.get(*name))
        .find(|v| !v.is_null())
}

/// Read a finite number from a JSON number or a numeric string.
fn as_number(v: &Value) -> Option<f64> {
    let n = match v {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }?;
    n.is_finite().then_some(n)
}

fn resolve_catch_count(doc: &Value) -> u64 {
    let Some(raw) = first_present(doc, &COUNT_FIELDS) else {
        return DEFAULT_CATCH_COUNT;
    };
    match as_number(raw) {
        Some(n) if n >= 0.0 => n.trunc() as u64,
        _ => {
            tracing::warn!(
                "Unusable catch count {}, defaulting to {}",
                raw,
                DEFAULT_CATCH_COUNT
            );
            DEFAULT_CATCH_COUNT
        }
    }
}

fn resolve_species(doc: &Value) -> Option<String> {
    first_present(doc, &SPECIES_FIELDS)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

fn resolve_track(doc: &Value) -> Vec<Option<GeoPoint>> {
    match first_present(doc, &TRACK_FIELDS) {
        Some(Value::Array(points)) => points.iter().map(resolve_point).collect(),
        Some(other) => {
            tracing::debug!("Ignoring non-array track value: {}", other);
            Vec::new()
        }
        None => Vec::new(),
    }
}

/// Resolve one track point, or `None` when its coordinates are unusable.
pub fn resolve_point(v: &Value) -> Option<GeoPoint> {
    let (lat, lng) = match v {
        Value::Object(_) => (
            first_present(v, &["lat", "latitude"]).and_then(as_number),
            first_present(v, &["lng", "longitude", "lon"]).and_then(as_number),
        ),
        // GeoJSON order: [lng, lat]
        Value::Array(pair) => (
            pair.get(1).and_then(as_number),
            pair.first().and_then(as_number),
        ),
        _ => (None, None),
    };
    let point = GeoPoint::new(lat?, lng?);
    point.is_valid().then_some(point)
}

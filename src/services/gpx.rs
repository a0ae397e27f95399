//! GPX track import for fishing trips.
//!
//! Reads a GPX 1.1 document recorded by a phone or chartplotter and extracts:
//! - Trip name from `<metadata><name>` (falls back to `<trk><name>`)
//! - Start time from `<metadata><time>` or the first `<trkpt><time>`
//! - Track points from every `<trkpt>` across all `<trkseg>` sections

use chrono::{DateTime, FixedOffset};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use serde_json::json;
use thiserror::Error;

use crate::services::geo::GeoPoint;

/// Errors that can occur during GPX parsing.
#[derive(Debug, Error)]
pub enum GpxError {
    #[error("XML parsing error: {0}")]
    Xml(#[from] quick_xml::Error),
    #[error("Missing required field: {0}")]
    MissingField(String),
}

/// A trip parsed from a GPX file.
#[derive(Debug, Clone, PartialEq)]
pub struct GpxTrip {
    pub name: Option<String>,
    pub started_at: Option<DateTime<FixedOffset>>,
    /// Track points in file order; `None` where a `<trkpt>` had unusable coordinates
    pub track: Vec<Option<GeoPoint>>,
}

impl GpxTrip {
    /// Build the stored trip document, in the same shape clients post directly.
    pub fn to_document(&self, species: Option<&str>, count: Option<u64>) -> serde_json::Value {
        let locations: Vec<serde_json::Value> = self
            .track
            .iter()
            .map(|p| match p {
                Some(p) => json!({ "lat": p.lat, "lng": p.lng }),
                None => serde_json::Value::Null,
            })
            .collect();

        let mut doc = json!({
            "name": self.name,
            "source": "gpx",
            "locations": locations,
        });
        if let Some(started_at) = self.started_at {
            doc["started_at"] = json!(started_at.to_rfc3339());
        }
        if let Some(species) = species {
            doc["species"] = json!(species);
        }
        if let Some(count) = count {
            doc["count"] = json!(count);
        }
        doc
    }
}

/// Parse GPX XML content into a trip.
pub fn parse_gpx(gpx_xml: &str) -> Result<GpxTrip, GpxError> {
    let mut reader = Reader::from_str(gpx_xml);

    let mut metadata_name: Option<String> = None;
    let mut track_name: Option<String> = None;
    let mut metadata_time: Option<DateTime<FixedOffset>> = None;
    let mut first_point_time: Option<DateTime<FixedOffset>> = None;
    let mut track: Vec<Option<GeoPoint>> = Vec::new();
    let mut saw_trkpt = false;

    // Track nesting context
    let mut in_metadata = false;
    let mut in_author = false;
    let mut in_trk = false;
    let mut in_trkpt = false;
    let mut current_point: Option<GeoPoint> = None;

    // Current element name (for capturing text content)
    let mut current_element: Option<&'static str> = None;

    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) => {
                let local_name = local_name_str(e.name().as_ref());

                match local_name.as_str() {
                    "metadata" => in_metadata = true,
                    "author" if in_metadata => in_author = true,
                    "name" if in_metadata && !in_author => {
                        current_element = Some("metadata_name");
                    }
                    "time" if in_metadata => current_element = Some("metadata_time"),
                    "trk" => in_trk = true,
                    "name" if in_trk && !in_trkpt => current_element = Some("trk_name"),
                    "trkpt" => {
                        in_trkpt = true;
                        saw_trkpt = true;
                        current_point = point_from_attributes(e);
                    }
                    "time" if in_trkpt => current_element = Some("trkpt_time"),
                    _ => {}
                }
            }
            // <trkpt lat=".." lon=".."/> has no children and no End event
            Ok(Event::Empty(ref e)) => {
                if local_name_str(e.name().as_ref()) == "trkpt" {
                    saw_trkpt = true;
                    track.push(point_from_attributes(e));
                }
            }
            Ok(Event::Text(ref e)) => {
                if let Some(elem) = current_element {
                    let text = e.unescape().unwrap_or_default().trim().to_string();
                    if !text.is_empty() {
                        match elem {
                            "metadata_name" => metadata_name = Some(text),
                            "trk_name" => track_name = Some(text),
                            "metadata_time" => metadata_time = parse_time(&text),
                            "trkpt_time" if first_point_time.is_none() => {
                                first_point_time = parse_time(&text);
                            }
                            _ => {}
                        }
                    }
                }
            }
            Ok(Event::End(ref e)) => {
                let local_name = local_name_str(e.name().as_ref());
                current_element = None;

                match local_name.as_str() {
                    "metadata" => in_metadata = false,
                    "author" if in_author => in_author = false,
                    "trk" => in_trk = false,
                    "trkpt" => {
                        track.push(current_point.take());
                        in_trkpt = false;
                    }
                    _ => {}
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(GpxError::Xml(e)),
            _ => {}
        }
        buf.clear();
    }

    if !saw_trkpt {
        return Err(GpxError::MissingField(
            "at least one <trkpt> track point".to_string(),
        ));
    }

    Ok(GpxTrip {
        name: metadata_name.or(track_name),
        started_at: metadata_time.or(first_point_time),
        track,
    })
}

/// Read `lat`/`lon` attributes, or `None` when either is missing or invalid.
fn point_from_attributes(e: &BytesStart) -> Option<GeoPoint> {
    let mut lat: Option<f64> = None;
    let mut lon: Option<f64> = None;
    for attr in e.attributes().flatten() {
        let key = std::str::from_utf8(attr.key.as_ref()).unwrap_or("");
        let val = std::str::from_utf8(&attr.value).unwrap_or("");
        match key {
            "lat" => lat = parse_coord("lat", val),
            "lon" => lon = parse_coord("lon", val),
            _ => {}
        }
    }
    let point = GeoPoint::new(lat?, lon?);
    if !point.is_valid() {
        tracing::warn!(
            "Out-of-range trkpt ({}, {}), leaving a gap in the track",
            point.lat,
            point.lng
        );
        return None;
    }
    Some(point)
}

fn parse_coord(name: &str, val: &str) -> Option<f64> {
    match val.trim().parse::<f64>() {
        Ok(v) => Some(v),
        Err(e) => {
            tracing::warn!("Malformed trkpt {}='{}': {}, leaving a gap", name, val, e);
            None
        }
    }
}

fn parse_time(text: &str) -> Option<DateTime<FixedOffset>> {
    DateTime::parse_from_rfc3339(text)
        .map_err(|e| tracing::debug!("Ignoring unparseable GPX time '{}': {}", text, e))
        .ok()
}

/// Extract the local name from a potentially namespaced XML element name.
/// e.g. `gpx:trkpt` -> `trkpt`, `trkpt` -> `trkpt`
fn local_name_str(full: &[u8]) -> String {
    let s = std::str::from_utf8(full).unwrap_or("");
    match s.rfind(':') {
        Some(pos) => s[pos + 1..].to_string(),
        None => s.to_string(),
    }
}

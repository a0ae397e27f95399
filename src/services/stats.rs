//! Trip statistics aggregation.
//!
//! A full recomputation over all of a user's trips on every call: total
//! catches, the most-caught species and the distance covered along recorded
//! GPS tracks.

use serde::Serialize;
use std::collections::HashMap;
use utoipa::ToSchema;

use crate::helpers::round_2dp;
use crate::services::geo::{haversine_km, GeoPoint};
use crate::services::trips::TripRecord;

/// Shown as the top species when there is nothing to rank.
pub const NO_SPECIES: &str = "—";

/// Species label for records that do not name one.
pub const UNKNOWN_SPECIES: &str = "Desconhecida";

/// Profile statistics for one user.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct StatisticsSummary {
    /// Number of trip records scanned
    pub trip_count: usize,
    /// Total fish caught across all trips
    pub total_catches: u64,
    /// Most-caught species, or "—" when no species has a catch
    pub top_species: String,
    /// Distance travelled along recorded tracks, in km (2 decimal places)
    pub distance_km: f64,
}

/// Unrounded length of a track in kilometres.
///
/// Only consecutive pairs where both points resolved contribute; a track
/// with fewer than two points has length zero.
pub fn track_distance_km(track: &[Option<GeoPoint>]) -> f64 {
    track
        .windows(2)
        .filter_map(|pair| match pair {
            [Some(a), Some(b)] => Some(haversine_km(*a, *b)),
            _ => None,
        })
        .sum()
}

/// Aggregate statistics over a user's trip records.
pub fn aggregate(records: &[TripRecord]) -> StatisticsSummary {
    let mut total_catches: u64 = 0;
    let mut distance_km = 0.0;

    // Species in first-seen order, so ties go to the earliest one
    let mut species_order: Vec<(&str, u64)> = Vec::new();
    let mut species_index: HashMap<&str, usize> = HashMap::new();

    for record in records {
        total_catches = total_catches.saturating_add(record.catch_count);

        let species = record.species.as_deref().unwrap_or(UNKNOWN_SPECIES);
        let idx = *species_index.entry(species).or_insert_with(|| {
            species_order.push((species, 0));
            species_order.len() - 1
        });
        species_order[idx].1 = species_order[idx].1.saturating_add(record.catch_count);

        distance_km += track_distance_km(&record.track);
    }

    let mut top_species = NO_SPECIES;
    let mut top_count = 0;
    for &(species, count) in &species_order {
        if count > top_count {
            top_species = species;
            top_count = count;
        }
    }

    StatisticsSummary {
        trip_count: records.len(),
        total_catches,
        top_species: top_species.to_string(),
        distance_km: round_2dp(distance_km),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn trip(species: Option<&str>, count: u64) -> TripRecord {
        TripRecord {
            species: species.map(str::to_string),
            catch_count: count,
            track: Vec::new(),
        }
    }

    fn track(points: &[(f64, f64)]) -> Vec<Option<GeoPoint>> {
        points
            .iter()
            .map(|&(lat, lng)| Some(GeoPoint::new(lat, lng)))
            .collect()
    }

    #[test]
    fn test_empty_input() {
        let s = aggregate(&[]);
        assert_eq!(
            s,
            StatisticsSummary {
                trip_count: 0,
                total_catches: 0,
                top_species: "—".to_string(),
                distance_km: 0.0,
            }
        );
    }

    #[test]
    fn test_modal_species_and_total() {
        let s = aggregate(&[trip(Some("Robalo"), 3), trip(Some("Corvina"), 2)]);
        assert_eq!(s.top_species, "Robalo");
        assert_eq!(s.total_catches, 5);
        assert_eq!(s.trip_count, 2);
    }

    #[test]
    fn test_species_weighted_by_catch_count() {
        let s = aggregate(&[
            trip(Some("Robalo"), 1),
            trip(Some("Robalo"), 1),
            trip(Some("Garoupa"), 5),
        ]);
        assert_eq!(s.top_species, "Garoupa");
    }

    #[test]
    fn test_tie_goes_to_first_seen() {
        let s = aggregate(&[
            trip(Some("Corvina"), 2),
            trip(Some("Robalo"), 1),
            trip(Some("Robalo"), 1),
        ]);
        assert_eq!(s.top_species, "Corvina");
    }

    #[test]
    fn test_missing_species_counts_as_unknown() {
        let s = aggregate(&[trip(None, 4), trip(Some("Robalo"), 1)]);
        assert_eq!(s.top_species, UNKNOWN_SPECIES);
    }

    #[test]
    fn test_zero_catches_have_no_top_species() {
        let s = aggregate(&[trip(Some("Robalo"), 0)]);
        assert_eq!(s.top_species, NO_SPECIES);
        assert_eq!(s.total_catches, 0);
    }

    #[test]
    fn test_one_degree_track() {
        let mut t = trip(Some("Robalo"), 1);
        t.track = track(&[(0.0, 0.0), (1.0, 0.0)]);
        let s = aggregate(&[t]);
        assert!((s.distance_km - 111.19).abs() < 0.02, "got {}", s.distance_km);
    }

    #[test]
    fn test_distance_rounded_to_two_places() {
        let mut t = trip(None, 1);
        t.track = track(&[(-12.9714, -38.5014), (-12.9801, -38.5122), (-13.0, -38.53)]);
        let s = aggregate(&[t]);
        assert_eq!(s.distance_km, (s.distance_km * 100.0).round() / 100.0);
        assert!(s.distance_km > 0.0);
    }

    #[test]
    fn test_single_point_track_is_zero() {
        let mut t = trip(None, 1);
        t.track = track(&[(-12.9, -38.5)]);
        assert_eq!(aggregate(&[t]).distance_km, 0.0);
    }

    #[test]
    fn test_gaps_skip_only_their_pairs() {
        let full = track(&[(0.0, 0.0), (1.0, 0.0), (2.0, 0.0)]);
        let gapped = vec![full[0], None, full[1], full[2]];
        // Only the (1,0) -> (2,0) pair survives
        let d = track_distance_km(&gapped);
        assert!((d - 111.195).abs() < 0.01, "got {}", d);
    }

    #[test]
    fn test_distance_sums_across_trips() {
        let mut a = trip(None, 1);
        a.track = track(&[(0.0, 0.0), (1.0, 0.0)]);
        let mut b = trip(None, 1);
        b.track = track(&[(0.0, 0.0), (0.0, 1.0)]);
        let s = aggregate(&[a, b]);
        assert!((s.distance_km - 222.39).abs() < 0.02, "got {}", s.distance_km);
    }

    fn arb_track() -> impl Strategy<Value = Vec<Option<GeoPoint>>> {
        proptest::collection::vec(
            proptest::option::weighted(0.85, (-60.0f64..10.0, -60.0f64..-30.0)),
            0..20,
        )
        .prop_map(|pts| {
            pts.into_iter()
                .map(|p| p.map(|(lat, lng)| GeoPoint::new(lat, lng)))
                .collect()
        })
    }

    proptest! {
        #[test]
        fn prop_track_distance_symmetric_under_reversal(t in arb_track()) {
            let forward = track_distance_km(&t);
            let mut reversed = t.clone();
            reversed.reverse();
            let backward = track_distance_km(&reversed);
            prop_assert!((forward - backward).abs() < 1e-6);
        }

        #[test]
        fn prop_summary_is_non_negative(
            tracks in proptest::collection::vec(arb_track(), 0..6),
            counts in proptest::collection::vec(0u64..50, 0..6),
        ) {
            let records: Vec<TripRecord> = tracks
                .into_iter()
                .zip(counts.iter().copied())
                .map(|(t, c)| TripRecord { species: Some("Robalo".to_string()), catch_count: c, track: t })
                .collect();
            let s = aggregate(&records);
            prop_assert!(s.distance_km >= 0.0);
            prop_assert_eq!(s.total_catches, records.iter().map(|r| r.catch_count).sum::<u64>());
        }
    }
}

//! Fishing recommendation evaluator.
//!
//! Rules are checked top to bottom and the first match wins:
//! danger, then warning, then excellent, otherwise good.

use serde::Serialize;
use utoipa::ToSchema;

use crate::services::reading::WeatherReading;
use crate::services::thresholds::{
    VISIBILITY_CLEAR_KM, VISIBILITY_LOW_KM, WAVE_EXCELLENT_MAX_M, WAVE_HIGH_M, WAVE_MODERATE_M,
    WIND_DANGER_MS, WIND_LIGHT_MS, WIND_MODERATE_MS,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum RecommendationLevel {
    Danger,
    Warning,
    Good,
    Excellent,
    /// No reading available yet
    Unknown,
}

impl RecommendationLevel {
    pub fn message(&self) -> &'static str {
        match self {
            RecommendationLevel::Danger => "Condições perigosas - EVITE pescar hoje",
            RecommendationLevel::Warning => "Condições moderadas - Cuidado com vento e ondas",
            RecommendationLevel::Good => "Condições boas para pesca",
            RecommendationLevel::Excellent => "Condições excelentes para pesca!",
            RecommendationLevel::Unknown => "Clique no mapa para ver condições",
        }
    }

    pub fn glyph(&self) -> &'static str {
        match self {
            RecommendationLevel::Danger => "🚫",
            RecommendationLevel::Warning => "⚠️",
            RecommendationLevel::Good => "👍",
            RecommendationLevel::Excellent => "🌟",
            RecommendationLevel::Unknown => "🗺️",
        }
    }
}

/// Qualitative fishing suitability for a reading.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct Recommendation {
    pub level: RecommendationLevel,
    pub message: String,
    pub glyph: String,
}

impl From<RecommendationLevel> for Recommendation {
    fn from(level: RecommendationLevel) -> Self {
        Self {
            level,
            message: level.message().to_string(),
            glyph: level.glyph().to_string(),
        }
    }
}

/// Classify a reading. `None` means no location has been picked yet.
pub fn recommend(reading: Option<&WeatherReading>) -> Recommendation {
    match reading {
        Some(r) => classify(r).into(),
        None => RecommendationLevel::Unknown.into(),
    }
}

fn classify(reading: &WeatherReading) -> RecommendationLevel {
    let wind = reading.wind_speed_ms;
    let wave = reading.effective_wave_height_m();
    let visibility_km = reading.visibility_km();

    if wind > WIND_DANGER_MS || wave > WAVE_HIGH_M {
        RecommendationLevel::Danger
    } else if wind > WIND_MODERATE_MS || wave > WAVE_MODERATE_M || visibility_km < VISIBILITY_LOW_KM
    {
        RecommendationLevel::Warning
    } else if wind < WIND_LIGHT_MS
        && wave < WAVE_EXCELLENT_MAX_M
        && visibility_km > VISIBILITY_CLEAR_KM
    {
        RecommendationLevel::Excellent
    } else {
        RecommendationLevel::Good
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::reading::sample_reading;
    use proptest::prelude::*;

    fn level(wind: f64, wave: Option<f64>, visibility_m: f64) -> RecommendationLevel {
        let r = WeatherReading {
            wind_speed_ms: wind,
            wave_height_m: wave,
            visibility_m,
            ..sample_reading()
        };
        recommend(Some(&r)).level
    }

    #[test]
    fn test_strong_wind_is_danger() {
        assert_eq!(level(15.0, Some(1.0), 12_000.0), RecommendationLevel::Danger);
    }

    #[test]
    fn test_high_waves_are_danger() {
        assert_eq!(level(2.0, Some(3.2), 20_000.0), RecommendationLevel::Danger);
    }

    #[test]
    fn test_warning_triggers() {
        assert_eq!(level(9.0, Some(1.0), 12_000.0), RecommendationLevel::Warning);
        assert_eq!(level(3.0, Some(2.5), 12_000.0), RecommendationLevel::Warning);
        assert_eq!(level(3.0, Some(0.5), 4_000.0), RecommendationLevel::Warning);
    }

    #[test]
    fn test_excellent() {
        assert_eq!(level(3.0, Some(1.0), 15_000.0), RecommendationLevel::Excellent);
    }

    #[test]
    fn test_excellent_needs_clear_visibility() {
        // Exactly 10 km is not strictly above the clear threshold
        assert_eq!(level(3.0, Some(1.0), 10_000.0), RecommendationLevel::Good);
    }

    #[test]
    fn test_missing_waves_default_to_one_metre() {
        assert_eq!(level(3.0, None, 15_000.0), RecommendationLevel::Excellent);
    }

    #[test]
    fn test_good_otherwise() {
        assert_eq!(level(6.0, Some(1.2), 12_000.0), RecommendationLevel::Good);
    }

    #[test]
    fn test_no_reading_is_unknown() {
        let rec = recommend(None);
        assert_eq!(rec.level, RecommendationLevel::Unknown);
        assert!(rec.message.contains("mapa"));
    }

    #[test]
    fn test_serializes_lowercase_level() {
        let json = serde_json::to_value(recommend(None)).unwrap();
        assert_eq!(json["level"], "unknown");
    }

    proptest! {
        #[test]
        fn prop_every_numeric_reading_gets_a_known_level(
            wind in 0.0f64..40.0,
            wave in proptest::option::of(0.0f64..10.0),
            vis in 0.0f64..50_000.0,
        ) {
            let l = level(wind, wave, vis);
            prop_assert!(matches!(
                l,
                RecommendationLevel::Danger
                    | RecommendationLevel::Warning
                    | RecommendationLevel::Excellent
                    | RecommendationLevel::Good
            ));
        }
    }
}

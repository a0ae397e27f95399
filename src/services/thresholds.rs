//! Sea-state thresholds shared by the alert engine and the recommendation
//! evaluator.

/// Wave height assumed when the reading carries no marine data (m).
pub const DEFAULT_WAVE_HEIGHT_M: f64 = 1.0;

/// Waves above this are a warning (m).
pub const WAVE_HIGH_M: f64 = 3.0;
/// Waves above this are dangerous (m).
pub const WAVE_VERY_HIGH_M: f64 = 4.0;
/// Waves above this downgrade the recommendation to a warning (m).
pub const WAVE_MODERATE_M: f64 = 2.0;
/// Waves below this still allow an excellent recommendation (m).
pub const WAVE_EXCELLENT_MAX_M: f64 = 1.5;
/// Waves below this (with light wind) count as ideal conditions (m).
pub const WAVE_CALM_M: f64 = 1.0;

/// Wind above this is a warning (m/s).
pub const WIND_MODERATE_MS: f64 = 8.0;
/// Wind above this is dangerous (m/s).
pub const WIND_DANGER_MS: f64 = 12.0;
/// Wind below this is light (m/s).
pub const WIND_LIGHT_MS: f64 = 5.0;

/// Visibility below this is poor (km).
pub const VISIBILITY_LOW_KM: f64 = 5.0;
/// Visibility above this is required for an excellent recommendation (km).
pub const VISIBILITY_CLEAR_KM: f64 = 10.0;

/// Pressure below this signals a weather change (hPa).
pub const PRESSURE_LOW_HPA: f64 = 1000.0;

/// Water colder than this pushes fish deeper (°C).
pub const COLD_WATER_C: f64 = 18.0;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::services::thresholds::DEFAULT_WAVE_HEIGHT_M;

/// A snapshot of weather and sea-state measurements for one location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct WeatherReading {
    /// Air temperature in Celsius
    pub temperature_c: f64,
    /// Wind speed in metres per second
    pub wind_speed_ms: f64,
    /// Wind direction in degrees (0 = north, 90 = east)
    pub wind_direction_deg: f64,
    /// Significant wave height in metres, when marine data is available
    #[serde(default)]
    pub wave_height_m: Option<f64>,
    /// Wave period in seconds, when marine data is available
    #[serde(default)]
    pub wave_period_s: Option<f64>,
    /// Wave direction in degrees, when marine data is available
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wave_direction_deg: Option<f64>,
    /// Horizontal visibility in metres
    pub visibility_m: f64,
    /// Sea-level pressure in hPa
    pub pressure_hpa: f64,
    /// Relative humidity percentage
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub humidity_pct: Option<f64>,
    /// Short condition text from the provider (e.g. "céu limpo")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Provider's name for the location
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location_name: Option<String>,
}

impl WeatherReading {
    /// Wave height used by the rules: the measured value, or 1.0 m when absent.
    pub fn effective_wave_height_m(&self) -> f64 {
        self.wave_height_m.unwrap_or(DEFAULT_WAVE_HEIGHT_M)
    }

    pub fn visibility_km(&self) -> f64 {
        self.visibility_m / 1000.0
    }
}

#[cfg(test)]
pub(crate) fn sample_reading() -> WeatherReading {
    WeatherReading {
        temperature_c: 24.0,
        wind_speed_ms: 6.0,
        wind_direction_deg: 90.0,
        wave_height_m: Some(1.2),
        wave_period_s: Some(7.0),
        wave_direction_deg: None,
        visibility_m: 12_000.0,
        pressure_hpa: 1013.0,
        humidity_pct: None,
        description: None,
        location_name: None,
    }
}

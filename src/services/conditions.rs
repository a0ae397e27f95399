//! Human-readable labels for a weather reading, in Portuguese.

use serde::Serialize;
use utoipa::ToSchema;

use crate::services::reading::WeatherReading;

const COMPASS_POINTS: [&str; 8] = ["N", "NE", "L", "SE", "S", "SO", "O", "NO"];

/// 8-point compass label for a bearing in degrees.
pub fn wind_direction_label(deg: f64) -> &'static str {
    let idx = (deg.rem_euclid(360.0) / 45.0).round() as usize % COMPASS_POINTS.len();
    COMPASS_POINTS[idx]
}

pub fn wind_label(speed_ms: f64) -> &'static str {
    if speed_ms < 5.0 {
        "Calmo"
    } else if speed_ms < 10.0 {
        "Moderado"
    } else {
        "Forte"
    }
}

pub fn wave_label(height_m: f64) -> &'static str {
    if height_m < 1.0 {
        "Calmas"
    } else if height_m < 2.0 {
        "Moderadas"
    } else {
        "Altas"
    }
}

pub fn temperature_label(celsius: f64) -> &'static str {
    if celsius > 28.0 {
        "Quente"
    } else if celsius > 22.0 {
        "Agradável"
    } else {
        "Fresco"
    }
}

/// All labels for one reading.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct ConditionLabels {
    pub wind_direction: String,
    pub wind: String,
    pub waves: String,
    pub temperature: String,
}

impl ConditionLabels {
    pub fn for_reading(reading: &WeatherReading) -> Self {
        Self {
            wind_direction: wind_direction_label(reading.wind_direction_deg).to_string(),
            wind: wind_label(reading.wind_speed_ms).to_string(),
            waves: wave_label(reading.effective_wave_height_m()).to_string(),
            temperature: temperature_label(reading.temperature_c).to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::reading::sample_reading;

    #[test]
    fn test_wind_direction_label() {
        assert_eq!(wind_direction_label(0.0), "N");
        assert_eq!(wind_direction_label(44.0), "NE");
        assert_eq!(wind_direction_label(90.0), "L");
        assert_eq!(wind_direction_label(225.0), "SO");
        assert_eq!(wind_direction_label(270.0), "O");
        assert_eq!(wind_direction_label(350.0), "N");
        assert_eq!(wind_direction_label(-90.0), "O");
    }

    #[test]
    fn test_wind_label_bounds() {
        assert_eq!(wind_label(4.9), "Calmo");
        assert_eq!(wind_label(5.0), "Moderado");
        assert_eq!(wind_label(10.0), "Forte");
    }

    #[test]
    fn test_wave_label_bounds() {
        assert_eq!(wave_label(0.5), "Calmas");
        assert_eq!(wave_label(1.0), "Moderadas");
        assert_eq!(wave_label(2.0), "Altas");
    }

    #[test]
    fn test_temperature_label_bounds() {
        assert_eq!(temperature_label(28.5), "Quente");
        assert_eq!(temperature_label(28.0), "Agradável");
        assert_eq!(temperature_label(22.0), "Fresco");
    }

    #[test]
    fn test_labels_for_reading() {
        let mut r = sample_reading();
        r.wave_height_m = None;
        let labels = ConditionLabels::for_reading(&r);
        assert_eq!(labels.wind_direction, "L");
        assert_eq!(labels.wind, "Moderado");
        assert_eq!(labels.waves, "Moderadas");
        assert_eq!(labels.temperature, "Agradável");
    }
}

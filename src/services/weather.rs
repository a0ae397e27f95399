//! OpenWeatherMap current-weather client.
//!
//! Fetches a [`WeatherReading`] for a coordinate. The provider has no marine
//! data, so wave fields are filled with plausible synthetic values. When no
//! API key is configured or the provider is unreachable, a whole synthetic
//! reading is generated from the latitude instead.
//! See: https://openweathermap.org/current

use rand::Rng;
use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::errors::AppError;
use crate::helpers::round_1dp;
use crate::services::reading::WeatherReading;

pub const DEFAULT_OPENWEATHER_BASE_URL: &str = "https://api.openweathermap.org";

const KELVIN_OFFSET: f64 = 273.15;

/// Where a reading came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ReadingSource {
    /// Fetched from the weather provider
    Live,
    /// Generated locally from the latitude
    Synthetic,
}

/// Client for the OpenWeatherMap current weather API.
#[derive(Debug, Clone)]
pub struct WeatherClient {
    client: reqwest::Client,
    api_key: Option<String>,
    base_url: String,
    user_agent: String,
}

// --- OpenWeatherMap JSON response types ---

#[derive(Debug, Deserialize)]
struct OwmResponse {
    #[serde(default)]
    name: Option<String>,
    main: OwmMain,
    wind: OwmWind,
    #[serde(default)]
    visibility: Option<f64>,
    #[serde(default)]
    weather: Vec<OwmCondition>,
}

#[derive(Debug, Deserialize)]
struct OwmMain {
    /// Kelvin
    temp: f64,
    pressure: f64,
    #[serde(default)]
    humidity: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct OwmWind {
    speed: f64,
    #[serde(default)]
    deg: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct OwmCondition {
    description: String,
}

/// Visibility the provider reports when it omits the field (its maximum).
const OWM_MAX_VISIBILITY_M: f64 = 10_000.0;

impl WeatherClient {
    pub fn new(
        api_key: Option<String>,
        base_url: &str,
        user_agent: &str,
    ) -> Result<Self, AppError> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(10))
            .build()
            .map_err(|e| AppError::InternalError(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self {
            client,
            api_key: api_key.filter(|k| !k.trim().is_empty()),
            base_url: base_url.trim_end_matches('/').to_string(),
            user_agent: user_agent.to_string(),
        })
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    /// Fetch the current reading, falling back to a synthetic one on any failure.
    pub async fn fetch_reading(&self, lat: f64, lng: f64) -> (WeatherReading, ReadingSource) {
        let Some(api_key) = self.api_key.as_deref() else {
            tracing::debug!("No weather API key configured, using synthetic reading");
            return (synthetic(lat, lng), ReadingSource::Synthetic);
        };

        match self.fetch_live(lat, lng, api_key).await {
            Ok(reading) => (reading, ReadingSource::Live),
            Err(e) => {
                tracing::warn!(
                    "Weather fetch for ({}, {}) failed, using synthetic reading: {}",
                    lat,
                    lng,
                    e
                );
                (synthetic(lat, lng), ReadingSource::Synthetic)
            }
        }
    }

    async fn fetch_live(
        &self,
        lat: f64,
        lng: f64,
        api_key: &str,
    ) -> Result<WeatherReading, AppError> {
        let url = format!("{}/data/2.5/weather", self.base_url);

        let mut headers = HeaderMap::new();
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(&self.user_agent)
                .map_err(|e| AppError::InternalError(format!("Invalid User-Agent: {}", e)))?,
        );

        let response = self
            .client
            .get(&url)
            .headers(headers)
            .query(&[
                ("lat", lat.to_string()),
                ("lon", lng.to_string()),
                ("appid", api_key.to_string()),
                ("lang", "pt_br".to_string()),
            ])
            .send()
            .await
            .map_err(|e| {
                AppError::ExternalServiceError(format!("Weather request failed: {}", e))
            })?;

        if !response.status().is_success() {
            return Err(AppError::ExternalServiceError(format!(
                "Weather provider returned HTTP {}",
                response.status()
            )));
        }

        let body: OwmResponse = response.json().await.map_err(|e| {
            AppError::ExternalServiceError(format!("Weather JSON parse error: {}", e))
        })?;

        let mut reading = body.into_reading();
        add_synthetic_waves(&mut reading, &mut rand::thread_rng());
        Ok(reading)
    }
}

impl OwmResponse {
    fn into_reading(self) -> WeatherReading {
        WeatherReading {
            temperature_c: round_1dp(self.main.temp - KELVIN_OFFSET),
            wind_speed_ms: self.wind.speed,
            wind_direction_deg: self.wind.deg.unwrap_or(0.0),
            wave_height_m: None,
            wave_period_s: None,
            wave_direction_deg: None,
            visibility_m: self.visibility.unwrap_or(OWM_MAX_VISIBILITY_M),
            pressure_hpa: self.main.pressure,
            humidity_pct: self.main.humidity,
            description: self.weather.into_iter().next().map(|w| w.description),
            location_name: self.name.filter(|n| !n.is_empty()),
        }
    }
}

/// Fill in wave height (0.5 to 3.0 m), period (4 to 12 s) and direction.
pub fn add_synthetic_waves<R: Rng + ?Sized>(reading: &mut WeatherReading, rng: &mut R) {
    reading.wave_height_m = Some(round_1dp(rng.gen_range(0.5..3.0)));
    reading.wave_period_s = Some(round_1dp(rng.gen_range(4.0..12.0)));
    reading.wave_direction_deg = Some(f64::from(rng.gen_range(0u32..360)));
}

fn synthetic(lat: f64, lng: f64) -> WeatherReading {
    synthetic_reading(lat, lng, &mut rand::thread_rng())
}

/// Generate a plausible reading for a coordinate off the Brazilian coast.
///
/// Warmer and calmer the further north the latitude.
pub fn synthetic_reading<R: Rng + ?Sized>(lat: f64, lng: f64, rng: &mut R) -> WeatherReading {
    // (base temperature, temperature spread, base wind, wind spread, cloud odds)
    let (temp_base, temp_spread, wind_base, wind_spread, cloud_threshold) = if lat < -20.0 {
        (18.0, 8.0, 4.0, 6.0, 0.7)
    } else if lat < -10.0 {
        (22.0, 6.0, 3.0, 4.0, 0.6)
    } else if lat < 0.0 {
        (26.0, 4.0, 2.0, 3.0, 0.8)
    } else {
        (28.0, 3.0, 1.0, 2.0, 0.9)
    };

    let temperature_c = temp_base + rng.gen::<f64>() * temp_spread;
    let base_wind = wind_base + rng.gen::<f64>() * wind_spread;
    let overcast = rng.gen::<f64>() > cloud_threshold;
    let description = match (overcast, lat >= 0.0) {
        (false, _) => "céu limpo",
        (true, true) => "chuva leve",
        (true, false) => "nublado",
    };

    let mut reading = WeatherReading {
        temperature_c: round_1dp(temperature_c),
        wind_speed_ms: round_1dp(base_wind + rng.gen::<f64>() * 2.0),
        wind_direction_deg: f64::from(rng.gen_range(0u32..360)),
        wave_height_m: None,
        wave_period_s: None,
        wave_direction_deg: None,
        visibility_m: f64::from(10_000 + rng.gen_range(0u32..15_000)),
        pressure_hpa: f64::from(1010 + rng.gen_range(0u32..20)),
        humidity_pct: Some(f64::from(60 + rng.gen_range(0u32..30))),
        description: Some(description.to_string()),
        location_name: Some(format!(
            "Área Oceânica {:.2}°S {:.2}°W",
            lat,
            lng.abs()
        )),
    };
    add_synthetic_waves(&mut reading, rng);
    reading
}

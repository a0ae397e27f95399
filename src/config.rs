use crate::services::alerts::DEFAULT_ALERT_CAPACITY;
use crate::services::weather::DEFAULT_OPENWEATHER_BASE_URL;

/// Application configuration, parsed from environment variables.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub port: u16,
    /// OpenWeatherMap key; without one every reading is synthetic.
    pub openweather_api_key: Option<String>,
    pub openweather_base_url: String,
    pub http_user_agent: String,
    /// How many alerts each user's feed retains.
    pub alert_capacity: usize,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self {
            database_url: std::env::var("DATABASE_URL").expect("DATABASE_URL must be set"),
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .expect("PORT must be a valid u16"),
            openweather_api_key: std::env::var("OPENWEATHER_API_KEY")
                .ok()
                .filter(|k| !k.trim().is_empty()),
            openweather_base_url: std::env::var("OPENWEATHER_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_OPENWEATHER_BASE_URL.to_string()),
            http_user_agent: std::env::var("HTTP_USER_AGENT")
                .unwrap_or_else(|_| "PescaAzul/0.1 (+https://pescaazul.app)".to_string()),
            alert_capacity: parse_alert_capacity(std::env::var("ALERT_CAPACITY").ok().as_deref()),
        }
    }
}

fn parse_alert_capacity(raw: Option<&str>) -> usize {
    let Some(raw) = raw else {
        return DEFAULT_ALERT_CAPACITY;
    };
    let capacity: usize = raw
        .trim()
        .parse()
        .expect("ALERT_CAPACITY must be a positive integer");
    if capacity == 0 {
        tracing::warn!("ALERT_CAPACITY=0 would drop every alert, using 1");
        return 1;
    }
    capacity
}

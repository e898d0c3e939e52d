use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use waypoint_core::NetworkError;

const ICON_BASE_URL: &str = "https://openweathermap.org/img/wn";

/// Weather condition categories mapped from provider icon codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeatherCondition {
    Clear,
    PartlyCloudy,
    Cloudy,
    Fog,
    Rain,
    HeavyRain,
    Snow,
    Thunderstorm,
}

impl WeatherCondition {
    /// Map an icon code such as `"10d"` to a condition.
    /// See: https://openweathermap.org/weather-conditions
    pub fn from_icon_code(code: &str) -> Option<Self> {
        let group = code.get(..2)?;
        match group {
            "01" => Some(Self::Clear),
            "02" => Some(Self::PartlyCloudy),
            "03" | "04" => Some(Self::Cloudy),
            "09" => Some(Self::HeavyRain), // shower rain
            "10" => Some(Self::Rain),
            "11" => Some(Self::Thunderstorm),
            "13" => Some(Self::Snow),
            "50" => Some(Self::Fog),
            _ => None,
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::Clear => "Clear",
            Self::PartlyCloudy => "Partly Cloudy",
            Self::Cloudy => "Cloudy",
            Self::Fog => "Fog",
            Self::Rain => "Rain",
            Self::HeavyRain => "Heavy Rain",
            Self::Snow => "Snow",
            Self::Thunderstorm => "Thunderstorm",
        }
    }
}

/// Current conditions for a resolved place.
///
/// Everything except `place_name` is optional because the provider may omit
/// it; precipitation is the exception and defaults to 0.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherSnapshot {
    pub place_name: String,
    pub country: Option<String>,
    pub temperature_c: Option<f64>,
    /// Provider's free-text description, e.g. "light rain"
    pub condition: Option<String>,
    pub humidity_pct: Option<u8>,
    pub pressure_hpa: Option<f64>,
    pub precipitation_mm: f64,
    /// Provider icon code, e.g. "10d"
    pub icon_ref: Option<String>,
    pub fetched_at: DateTime<Utc>,
}

impl WeatherSnapshot {
    pub fn icon_url(&self) -> Option<String> {
        self.icon_ref
            .as_deref()
            .map(|icon| format!("{}/{}@2x.png", ICON_BASE_URL, icon))
    }

    pub fn category(&self) -> Option<WeatherCondition> {
        self.icon_ref.as_deref().and_then(WeatherCondition::from_icon_code)
    }
}

/// Weather lookup errors. A location with no geocoding match is not an
/// error; the provider returns `Ok(None)` for it.
#[derive(Debug, Clone, thiserror::Error)]
pub enum WeatherError {
    #[error("Weather API key is not configured")]
    MissingApiKey,

    #[error(transparent)]
    Network(#[from] NetworkError),
}

impl WeatherError {
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::MissingApiKey => "Weather is unavailable: no API key configured.",
            Self::Network(_) => "Weather service unavailable. Please try again later.",
        }
    }
}

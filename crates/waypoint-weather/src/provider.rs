//! OpenWeather-compatible current conditions client.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use reqwest::Client;
use serde::Deserialize;
use tracing::instrument;
use waypoint_core::{send_with_retry, NetworkError, ReqwestErrorExt, RetryConfig};

use crate::types::{WeatherError, WeatherSnapshot};

const DEFAULT_BASE_URL: &str = "https://api.openweathermap.org";
const DEFAULT_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Deserialize)]
struct CurrentResponse {
    #[serde(default)]
    main: Option<MainBlock>,
    #[serde(default)]
    weather: Vec<ConditionBlock>,
    #[serde(default)]
    rain: Option<RainBlock>,
}

#[derive(Debug, Deserialize)]
struct MainBlock {
    temp: Option<f64>,
    humidity: Option<f64>,
    pressure: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct ConditionBlock {
    description: Option<String>,
    icon: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RainBlock {
    #[serde(rename = "1h")]
    one_hour: Option<f64>,
}

#[derive(Debug, Clone)]
pub struct WeatherProvider {
    client: Arc<Client>,
    base_url: String,
    api_key: Option<String>,
    retry: RetryConfig,
}

impl WeatherProvider {
    pub fn new(api_key: Option<String>) -> Result<Self, WeatherError> {
        Self::with_options(
            DEFAULT_BASE_URL,
            api_key,
            Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        )
    }

    pub fn with_options(
        base_url: &str,
        api_key: Option<String>,
        timeout: Duration,
    ) -> Result<Self, WeatherError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| WeatherError::Network(e.into_network_error()))?;

        Ok(Self {
            client: Arc::new(client),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
            retry: RetryConfig::default(),
        })
    }

    pub fn retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    pub(crate) fn http(&self) -> &Client {
        &self.client
    }

    pub(crate) fn base_url(&self) -> &str {
        &self.base_url
    }

    pub(crate) fn retry_config(&self) -> &RetryConfig {
        &self.retry
    }

    pub(crate) fn api_key(&self) -> Result<&str, WeatherError> {
        self.api_key.as_deref().ok_or(WeatherError::MissingApiKey)
    }

    /// Two-stage lookup: resolve the name, then fetch current conditions.
    ///
    /// Returns `Ok(None)` when the name has no geocoding match.
    pub async fn lookup(&self, name: &str) -> Result<Option<WeatherSnapshot>, WeatherError> {
        let Some(found) = self.geocode(name).await? else {
            return Ok(None);
        };

        let snapshot = self
            .current_at(found.lat, found.lon, &found.name, found.country.as_deref())
            .await?;
        Ok(Some(snapshot))
    }

    /// Fetch current conditions for a coordinate already known to the caller.
    #[instrument(skip(self), level = "debug")]
    pub async fn current_at(
        &self,
        lat: f64,
        lon: f64,
        place_name: &str,
        country: Option<&str>,
    ) -> Result<WeatherSnapshot, WeatherError> {
        let api_key = self.api_key()?;
        let url = format!("{}/data/2.5/weather", self.base_url);
        let lat = lat.to_string();
        let lon = lon.to_string();

        let response = send_with_retry(&self.retry, || {
            self.client
                .get(&url)
                .query(&[
                    ("lat", lat.as_str()),
                    ("lon", lon.as_str()),
                    ("appid", api_key),
                    ("units", "metric"),
                ])
                .send()
        })
        .await?;

        let body: CurrentResponse = response
            .json()
            .await
            .map_err(|e| NetworkError::InvalidResponse(e.to_string()))?;

        Ok(Self::into_snapshot(body, place_name, country))
    }

    fn into_snapshot(
        body: CurrentResponse,
        place_name: &str,
        country: Option<&str>,
    ) -> WeatherSnapshot {
        let main = body.main;
        let condition = body.weather.into_iter().next();
        let (description, icon) = match condition {
            Some(c) => (c.description, c.icon),
            None => (None, None),
        };

        WeatherSnapshot {
            place_name: place_name.to_string(),
            country: country.map(String::from),
            temperature_c: main.as_ref().and_then(|m| m.temp),
            condition: description,
            humidity_pct: main
                .as_ref()
                .and_then(|m| m.humidity)
                .map(|h| h.round().clamp(0.0, 100.0) as u8),
            pressure_hpa: main.as_ref().and_then(|m| m.pressure),
            precipitation_mm: body.rain.and_then(|r| r.one_hour).unwrap_or(0.0),
            icon_ref: icon,
            fetched_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn provider_for(server: &MockServer) -> WeatherProvider {
        WeatherProvider::with_options(&server.uri(), Some("key".into()), Duration::from_secs(2))
            .unwrap()
            .retry(RetryConfig::none())
    }

    async fn mount_geocode(server: &MockServer, body: serde_json::Value) {
        Mock::given(method("GET"))
            .and(path("/geo/1.0/direct"))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn test_lookup_resolves_then_fetches() {
        let mock_server = MockServer::start().await;
        mount_geocode(
            &mock_server,
            serde_json::json!([{"name": "Paris", "lat": 48.85, "lon": 2.35, "country": "FR"}]),
        )
        .await;

        Mock::given(method("GET"))
            .and(path("/data/2.5/weather"))
            .and(query_param("lat", "48.85"))
            .and(query_param("lon", "2.35"))
            .and(query_param("units", "metric"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "main": {"temp": 18.2, "humidity": 64, "pressure": 1015},
                "weather": [{"description": "light rain", "icon": "10d"}],
                "rain": {"1h": 0.4}
            })))
            .mount(&mock_server)
            .await;

        let snapshot = provider_for(&mock_server)
            .lookup("Paris")
            .await
            .unwrap()
            .unwrap();

        assert_eq!(snapshot.place_name, "Paris");
        assert_eq!(snapshot.country.as_deref(), Some("FR"));
        assert_eq!(snapshot.temperature_c, Some(18.2));
        assert_eq!(snapshot.humidity_pct, Some(64));
        assert_eq!(snapshot.pressure_hpa, Some(1015.0));
        assert_eq!(snapshot.condition.as_deref(), Some("light rain"));
        assert_eq!(snapshot.icon_ref.as_deref(), Some("10d"));
        assert_eq!(snapshot.precipitation_mm, 0.4);
    }

    #[tokio::test]
    async fn test_missing_rain_defaults_to_zero() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/data/2.5/weather"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "main": {"temp": 25.0, "humidity": 40, "pressure": 1009},
                "weather": [{"description": "clear sky", "icon": "01d"}]
            })))
            .mount(&mock_server)
            .await;

        let snapshot = provider_for(&mock_server)
            .current_at(41.9, 12.5, "Rome", None)
            .await
            .unwrap();

        assert_eq!(snapshot.precipitation_mm, 0.0);
        assert_eq!(snapshot.country, None);
    }

    #[tokio::test]
    async fn test_sparse_body_leaves_fields_empty() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/data/2.5/weather"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
            .mount(&mock_server)
            .await;

        let snapshot = provider_for(&mock_server)
            .current_at(0.0, 0.0, "Null Island", None)
            .await
            .unwrap();

        assert_eq!(snapshot.place_name, "Null Island");
        assert_eq!(snapshot.temperature_c, None);
        assert_eq!(snapshot.condition, None);
        assert_eq!(snapshot.precipitation_mm, 0.0);
    }

    #[tokio::test]
    async fn test_lookup_no_match_skips_second_call() {
        let mock_server = MockServer::start().await;
        mount_geocode(&mock_server, serde_json::json!([])).await;

        Mock::given(method("GET"))
            .and(path("/data/2.5/weather"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&mock_server)
            .await;

        let result = provider_for(&mock_server).lookup("Atlantis").await.unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_conditions_failure_is_error() {
        let mock_server = MockServer::start().await;
        mount_geocode(
            &mock_server,
            serde_json::json!([{"name": "Oslo", "lat": 59.9, "lon": 10.7, "country": "NO"}]),
        )
        .await;

        Mock::given(method("GET"))
            .and(path("/data/2.5/weather"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&mock_server)
            .await;

        let result = provider_for(&mock_server).lookup("Oslo").await;
        assert!(matches!(
            result,
            Err(WeatherError::Network(NetworkError::ServerError { status: 503, .. }))
        ));
    }

    #[tokio::test]
    async fn test_missing_api_key() {
        let provider = WeatherProvider::new(None).unwrap();
        let result = provider.lookup("Paris").await;
        assert!(matches!(result, Err(WeatherError::MissingApiKey)));
    }
}

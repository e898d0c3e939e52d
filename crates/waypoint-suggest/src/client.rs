//! Mapbox-compatible forward geocoding client.

use std::sync::Arc;
use std::time::Duration;

use reqwest::Client;
use tracing::instrument;
use waypoint_core::{send_with_retry, NetworkError, ReqwestErrorExt, RetryConfig};

use crate::error::SuggestError;
use crate::types::{FeatureCollection, Suggestion};

const DEFAULT_BASE_URL: &str = "https://api.mapbox.com";
const DEFAULT_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Clone)]
pub struct GeocodingClient {
    client: Arc<Client>,
    base_url: String,
    access_token: Option<String>,
    place_types: String,
    limit: usize,
    retry: RetryConfig,
}

impl GeocodingClient {
    pub fn new(access_token: Option<String>) -> Result<Self, SuggestError> {
        Self::with_options(
            DEFAULT_BASE_URL,
            access_token,
            Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        )
    }

    pub fn with_options(
        base_url: &str,
        access_token: Option<String>,
        timeout: Duration,
    ) -> Result<Self, SuggestError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| SuggestError::Network(e.into_network_error()))?;

        Ok(Self {
            client: Arc::new(client),
            base_url: base_url.trim_end_matches('/').to_string(),
            access_token,
            place_types: "place".to_string(),
            limit: 5,
            retry: RetryConfig::default(),
        })
    }

    pub fn place_types(mut self, place_types: impl Into<String>) -> Self {
        self.place_types = place_types.into();
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    pub fn retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    /// Look up place suggestions for partial input, best match first.
    #[instrument(skip(self), level = "debug")]
    pub async fn suggest(&self, query: &str) -> Result<Vec<Suggestion>, SuggestError> {
        let token = self
            .access_token
            .as_deref()
            .ok_or(SuggestError::MissingToken)?;

        let url = format!(
            "{}/geocoding/v5/mapbox.places/{}.json",
            self.base_url,
            urlencoding::encode(query)
        );
        let limit = self.limit.to_string();

        let response = send_with_retry(&self.retry, || {
            self.client
                .get(&url)
                .query(&[
                    ("access_token", token),
                    ("types", self.place_types.as_str()),
                    ("limit", limit.as_str()),
                ])
                .send()
        })
        .await?;

        let body: FeatureCollection = response
            .json()
            .await
            .map_err(|e| NetworkError::InvalidResponse(e.to_string()))?;

        let suggestions: Vec<Suggestion> = body
            .features
            .into_iter()
            .take(self.limit)
            .map(Suggestion::from)
            .collect();

        tracing::debug!("Geocoding returned {} suggestions", suggestions.len());
        Ok(suggestions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn feature(id: &str, text: &str, place_name: &str) -> serde_json::Value {
        serde_json::json!({
            "id": id,
            "text": text,
            "place_name": place_name,
            "center": [2.35, 48.85]
        })
    }

    fn client_for(server: &MockServer) -> GeocodingClient {
        GeocodingClient::with_options(
            &server.uri(),
            Some("test_token".to_string()),
            Duration::from_secs(2),
        )
        .unwrap()
        .retry(RetryConfig::none())
    }

    #[tokio::test]
    async fn test_suggest_sends_filters_and_maps_features() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/geocoding/v5/mapbox.places/par.json"))
            .and(query_param("access_token", "test_token"))
            .and(query_param("types", "place"))
            .and(query_param("limit", "5"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "features": [
                    feature("place.1", "Paris", "Paris, France"),
                    feature("place.2", "Parma", "Parma, Emilia-Romagna, Italy"),
                ]
            })))
            .mount(&mock_server)
            .await;

        let suggestions = client_for(&mock_server).suggest("par").await.unwrap();

        assert_eq!(suggestions.len(), 2);
        assert_eq!(suggestions[0].id, "place.1");
        assert_eq!(suggestions[0].display_name, "Paris, France");
        assert_eq!(suggestions[1].short_name, "Parma");
    }

    #[tokio::test]
    async fn test_suggest_encodes_query_in_path() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/geocoding/v5/mapbox.places/new%20york.json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "features": [feature("place.9", "New York", "New York, United States")]
            })))
            .mount(&mock_server)
            .await;

        let suggestions = client_for(&mock_server).suggest("new york").await.unwrap();
        assert_eq!(suggestions.len(), 1);
    }

    #[tokio::test]
    async fn test_suggest_caps_results_to_limit() {
        let mock_server = MockServer::start().await;

        let features: Vec<_> = (0..8)
            .map(|i| feature(&format!("place.{i}"), "Town", "Town, Somewhere"))
            .collect();
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({ "features": features })),
            )
            .mount(&mock_server)
            .await;

        let suggestions = client_for(&mock_server)
            .limit(3)
            .suggest("town")
            .await
            .unwrap();
        assert_eq!(suggestions.len(), 3);
        assert_eq!(suggestions[0].id, "place.0");
    }

    #[tokio::test]
    async fn test_suggest_non_success_is_network_error() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&mock_server)
            .await;

        let result = client_for(&mock_server).suggest("paris").await;
        assert!(matches!(
            result,
            Err(SuggestError::Network(NetworkError::ServerError { status: 401, .. }))
        ));
    }

    #[tokio::test]
    async fn test_suggest_malformed_body_is_invalid_response() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&mock_server)
            .await;

        let result = client_for(&mock_server).suggest("paris").await;
        assert!(matches!(
            result,
            Err(SuggestError::Network(NetworkError::InvalidResponse(_)))
        ));
    }

    #[tokio::test]
    async fn test_missing_token_short_circuits() {
        let client = GeocodingClient::new(None).unwrap();
        let result = client.suggest("paris").await;
        assert!(matches!(result, Err(SuggestError::MissingToken)));
    }
}

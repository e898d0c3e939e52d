//! Direct geocoding: convert a place name to coordinates.
//! Only the single best match is used; there is no disambiguation step.

use serde::{Deserialize, Serialize};
use tracing::instrument;
use waypoint_core::{send_with_retry, NetworkError};

use crate::provider::WeatherProvider;
use crate::types::WeatherError;

/// First geocoding match for a place name
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoMatch {
    pub name: String,
    pub lat: f64,
    pub lon: f64,
    #[serde(default)]
    pub country: Option<String>,
}

impl WeatherProvider {
    /// Resolve a place name to its best match.
    ///
    /// Returns `Ok(None)` when the provider knows no such place.
    #[instrument(skip(self), level = "debug")]
    pub async fn geocode(&self, name: &str) -> Result<Option<GeoMatch>, WeatherError> {
        let api_key = self.api_key()?;
        let url = format!("{}/geo/1.0/direct", self.base_url());

        let response = send_with_retry(self.retry_config(), || {
            self.http()
                .get(&url)
                .query(&[("q", name), ("limit", "1"), ("appid", api_key)])
                .send()
        })
        .await?;

        let matches: Vec<GeoMatch> = response
            .json()
            .await
            .map_err(|e| NetworkError::InvalidResponse(e.to_string()))?;

        let best = matches.into_iter().next();
        match &best {
            Some(m) => tracing::debug!("Geocoded '{}' to {}, {} ({})", name, m.lat, m.lon, m.name),
            None => tracing::info!("No geocoding match for '{}'", name),
        }
        Ok(best)
    }
}

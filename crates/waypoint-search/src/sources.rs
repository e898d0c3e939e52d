//! Seams between the session and the remote providers.
//!
//! The session only talks to these traits, so tests can swap in scripted
//! fakes and front ends can plug in other providers.

use async_trait::async_trait;
use waypoint_places::{attractions_prompt, PlacesError, TextGenerationClient};
use waypoint_suggest::{GeocodingClient, SuggestError, Suggestion};
use waypoint_weather::{WeatherError, WeatherProvider, WeatherSnapshot};

use crate::query::QueryTarget;

#[async_trait]
pub trait SuggestionSource: Send + Sync {
    async fn suggest(&self, text: &str) -> Result<Vec<Suggestion>, SuggestError>;
}

/// Produces the raw free-text attraction list for a place.
#[async_trait]
pub trait PlaceSource: Send + Sync {
    async fn list_places(&self, place_name: &str) -> Result<String, PlacesError>;
}

/// `Ok(None)` means the place could not be resolved.
#[async_trait]
pub trait WeatherSource: Send + Sync {
    async fn current(&self, target: &QueryTarget) -> Result<Option<WeatherSnapshot>, WeatherError>;
}

#[async_trait]
impl SuggestionSource for GeocodingClient {
    async fn suggest(&self, text: &str) -> Result<Vec<Suggestion>, SuggestError> {
        GeocodingClient::suggest(self, text).await
    }
}

#[async_trait]
impl WeatherSource for WeatherProvider {
    async fn current(&self, target: &QueryTarget) -> Result<Option<WeatherSnapshot>, WeatherError> {
        match target.coordinates {
            Some(at) => self
                .current_at(at.lat, at.lng, &target.place_name, None)
                .await
                .map(Some),
            None => self.lookup(&target.text).await,
        }
    }
}

/// Text-generation client paired with the prompt it is asked.
#[derive(Debug, Clone)]
pub struct PlacesService {
    client: TextGenerationClient,
    max_places: usize,
}

impl PlacesService {
    pub fn new(client: TextGenerationClient, max_places: usize) -> Self {
        Self { client, max_places }
    }
}

#[async_trait]
impl PlaceSource for PlacesService {
    async fn list_places(&self, place_name: &str) -> Result<String, PlacesError> {
        let prompt = attractions_prompt(place_name, self.max_places);
        self.client.generate(&prompt).await
    }
}

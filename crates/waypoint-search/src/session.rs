//! Search session: owns the query lifecycle and the published view model.
//!
//! Lookups run as spawned tasks that report back over an mpsc channel. The
//! session applies each message on its own task, so all state changes are
//! serialized; results tagged with an outdated generation are dropped.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use tokio::sync::{mpsc, watch};
use tokio_util::sync::CancellationToken;
use waypoint_core::{Config, SearchConfig};
use waypoint_places::{parse_places, TextGenerationClient};
use waypoint_suggest::{GeocodingClient, Suggestion};
use waypoint_weather::WeatherProvider;

use crate::error::{Channel, SearchError};
use crate::messages::SearchMessage;
use crate::query::QueryTarget;
use crate::sources::{PlaceSource, PlacesService, SuggestionSource, WeatherSource};
use crate::suggestions::request_suggestions;
use crate::task::run_isolated;
use crate::view::{SearchResult, SearchStatus, SectionState};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionSettings {
    /// Quiet period after the last keystroke before suggestions are fetched
    pub debounce: Duration,
    /// Trimmed input shorter than this (in characters) fetches nothing
    pub min_query_chars: usize,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            debounce: Duration::from_millis(300),
            min_query_chars: 2,
        }
    }
}

impl From<&SearchConfig> for SessionSettings {
    fn from(config: &SearchConfig) -> Self {
        Self {
            debounce: config.debounce(),
            min_query_chars: config.min_query_chars,
        }
    }
}

pub struct SearchSession {
    settings: SessionSettings,
    suggestions: Arc<dyn SuggestionSource>,
    places: Arc<dyn PlaceSource>,
    weather: Arc<dyn WeatherSource>,

    tx: mpsc::UnboundedSender<SearchMessage>,
    rx: mpsc::UnboundedReceiver<SearchMessage>,
    publisher: watch::Sender<SearchResult>,
    result: SearchResult,

    suggestion_generation: u64,
    query_generation: u64,
    /// Set from scheduling until the current lookup reports back
    lookup_token: Option<CancellationToken>,
    hard_failure: Option<SearchError>,
}

impl SearchSession {
    pub fn new(
        suggestions: Arc<dyn SuggestionSource>,
        places: Arc<dyn PlaceSource>,
        weather: Arc<dyn WeatherSource>,
        settings: SessionSettings,
    ) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let (publisher, _) = watch::channel(SearchResult::default());

        Self {
            settings,
            suggestions,
            places,
            weather,
            tx,
            rx,
            publisher,
            result: SearchResult::default(),
            suggestion_generation: 0,
            query_generation: 0,
            lookup_token: None,
            hard_failure: None,
        }
    }

    /// Build a session backed by the real providers described in `config`.
    pub fn from_config(config: &Config) -> Result<Self> {
        let providers = &config.providers;
        let timeout = config.search.request_timeout();
        let retry = config.retry.to_retry_config();

        let geocoding = GeocodingClient::with_options(
            &providers.geocoding_base_url,
            providers.mapbox_token.clone(),
            timeout,
        )?
        .place_types(config.search.place_types.clone())
        .limit(config.search.suggestion_limit)
        .retry(retry.clone());

        let generation = TextGenerationClient::with_options(
            &providers.text_generation_base_url,
            &providers.text_generation_model,
            providers.gemini_api_key.clone(),
            timeout,
        )?
        .retry(retry.clone());

        let weather = WeatherProvider::with_options(
            &providers.weather_base_url,
            providers.openweather_api_key.clone(),
            timeout,
        )?
        .retry(retry);

        Ok(Self::new(
            Arc::new(geocoding),
            Arc::new(PlacesService::new(generation, config.places.max_places)),
            Arc::new(weather),
            SessionSettings::from(&config.search),
        ))
    }

    pub fn result(&self) -> &SearchResult {
        &self.result
    }

    pub fn snapshot(&self) -> SearchResult {
        self.result.clone()
    }

    /// Receiver that sees every published change of the view model.
    pub fn subscribe(&self) -> watch::Receiver<SearchResult> {
        self.publisher.subscribe()
    }

    /// True while a query is loading or a suggestion lookup is pending.
    pub fn is_busy(&self) -> bool {
        self.result.is_loading() || self.lookup_token.is_some()
    }

    /// The search box text changed.
    ///
    /// Restarts the debounce window; nothing is fetched for input shorter
    /// than the configured minimum.
    pub fn on_input_changed(&mut self, text: &str) {
        self.result.query = text.to_string();
        self.supersede_lookup();

        let trimmed = text.trim();
        if trimmed.chars().count() < self.settings.min_query_chars {
            self.result.clear_suggestions();
            self.publish();
            return;
        }

        let token = CancellationToken::new();
        self.lookup_token = Some(token.clone());
        request_suggestions(
            &self.tx,
            Arc::clone(&self.suggestions),
            self.suggestion_generation,
            trimmed.to_string(),
            self.settings.debounce,
            token,
        );
        self.publish();
    }

    /// Submit free text as the active query. Blank text is ignored.
    pub fn on_query_committed(&mut self, text: &str) {
        if text.trim().is_empty() {
            tracing::debug!("Ignoring blank query");
            return;
        }
        self.commit(QueryTarget::from_text(text));
    }

    /// Submit a suggestion; its coordinates feed the weather lookup directly.
    pub fn on_suggestion_chosen(&mut self, suggestion: &Suggestion) {
        self.commit(QueryTarget::from_suggestion(suggestion));
    }

    /// Close the suggestion list without committing anything.
    pub fn dismiss_suggestions(&mut self) {
        self.supersede_lookup();
        self.result.clear_suggestions();
        self.publish();
    }

    /// Apply every message that has already arrived. Returns how many.
    pub fn poll(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(msg) = self.rx.try_recv() {
            self.apply(msg);
            applied += 1;
        }
        applied
    }

    /// Wait for the next message and apply it.
    ///
    /// The session holds a sender itself, so this only returns `false` if
    /// the channel is somehow closed.
    pub async fn next_update(&mut self) -> bool {
        match self.rx.recv().await {
            Some(msg) => {
                self.apply(msg);
                true
            }
            None => false,
        }
    }

    /// Apply messages until nothing is pending.
    pub async fn settle(&mut self) {
        while self.is_busy() {
            if !self.next_update().await {
                break;
            }
        }
    }

    fn commit(&mut self, target: QueryTarget) {
        self.supersede_lookup();
        self.query_generation += 1;
        let generation = self.query_generation;

        tracing::info!(generation, query = %target.text, "Starting search");
        self.result = SearchResult::loading(&target.text, generation);
        self.hard_failure = None;
        self.publish();

        self.request_places(generation, target.place_name.clone());
        self.request_weather(generation, target);
    }

    /// Abandon the current suggestion lookup, if any.
    fn supersede_lookup(&mut self) {
        if let Some(token) = self.lookup_token.take() {
            token.cancel();
        }
        self.suggestion_generation += 1;
        self.result.suggestions_loading = false;
    }

    fn request_places(&self, generation: u64, place_name: String) {
        let tx = self.tx.clone();
        let source = Arc::clone(&self.places);

        tokio::spawn(async move {
            let result = run_isolated(Channel::Places, async move {
                source
                    .list_places(&place_name)
                    .await
                    .map(|text| parse_places(&text))
            })
            .await;
            let _ = tx.send(SearchMessage::PlacesDone { generation, result });
        });
    }

    fn request_weather(&self, generation: u64, target: QueryTarget) {
        let tx = self.tx.clone();
        let source = Arc::clone(&self.weather);

        tokio::spawn(async move {
            let result =
                run_isolated(Channel::Weather, async move { source.current(&target).await }).await;
            let _ = tx.send(SearchMessage::WeatherDone { generation, result });
        });
    }

    fn apply(&mut self, msg: SearchMessage) {
        match msg {
            SearchMessage::SuggestionsStarted { generation } => {
                if generation != self.suggestion_generation {
                    return;
                }
                self.result.suggestions_loading = true;
            }
            SearchMessage::SuggestionsDone { generation, result } => {
                if generation != self.suggestion_generation {
                    tracing::debug!(generation, "Dropping stale suggestions");
                    return;
                }
                self.lookup_token = None;
                self.result.suggestions_loading = false;

                match result {
                    Ok(suggestions) => {
                        tracing::debug!("Received {} suggestions", suggestions.len());
                        self.result.suggestions = suggestions;
                        self.result.suggestion_error = None;
                    }
                    Err(err) => {
                        tracing::warn!(channel = %err.channel(), "{}", err);
                        self.result.suggestions.clear();
                        self.result.suggestion_error = Some(err.user_message().to_string());
                    }
                }
            }
            SearchMessage::PlacesDone { generation, result } => {
                if generation != self.query_generation {
                    tracing::debug!(generation, "Dropping stale places");
                    return;
                }

                match result {
                    Ok(places) => {
                        tracing::info!("Found {} places", places.len());
                        self.result.places = places;
                        self.result.places_section = SectionState::Ready;
                    }
                    Err(err) => {
                        self.result.places.clear();
                        self.result.places_section =
                            SectionState::Unavailable(err.user_message().to_string());
                        if err.is_hard() {
                            tracing::error!(channel = %err.channel(), "{}", err);
                            self.hard_failure = Some(err);
                        } else {
                            tracing::warn!(channel = %err.channel(), "{}", err);
                        }
                    }
                }
                self.settle_status();
            }
            SearchMessage::WeatherDone { generation, result } => {
                if generation != self.query_generation {
                    tracing::debug!(generation, "Dropping stale weather");
                    return;
                }

                match result {
                    Ok(Some(snapshot)) => {
                        self.result.weather = Some(snapshot);
                        self.result.weather_section = SectionState::Ready;
                    }
                    Ok(None) => {
                        tracing::info!("No weather match for {:?}", self.result.committed_query);
                        self.result.weather = None;
                        self.result.weather_section = SectionState::Ready;
                    }
                    Err(err) => {
                        tracing::warn!(channel = %err.channel(), "{}", err);
                        self.result.weather = None;
                        self.result.weather_section =
                            SectionState::Unavailable(err.user_message().to_string());
                    }
                }
                self.settle_status();
            }
        }

        self.publish();
    }

    /// Leave `Loading` once both sections have an outcome.
    fn settle_status(&mut self) {
        if !self.result.is_loading()
            || !self.result.places_section.is_settled()
            || !self.result.weather_section.is_settled()
        {
            return;
        }

        match self.hard_failure.take() {
            Some(err) => {
                self.result.status = SearchStatus::Failed;
                self.result.error = Some(err.user_message().to_string());
            }
            None => {
                self.result.status = SearchStatus::Ready;
                self.result.error = None;
            }
        }
        tracing::info!(
            generation = self.query_generation,
            status = ?self.result.status,
            "Search settled"
        );
    }

    fn publish(&self) {
        self.publisher.send_replace(self.result.clone());
    }
}

impl Drop for SearchSession {
    fn drop(&mut self) {
        if let Some(token) = self.lookup_token.take() {
            token.cancel();
        }
    }
}

#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::DateTime;
use parking_lot::Mutex;
use waypoint_places::PlacesError;
use waypoint_search::{
    Coordinates, PlaceSource, QueryTarget, SearchSession, SessionSettings, Suggestion,
    SuggestionSource, WeatherSnapshot, WeatherSource,
};
use waypoint_suggest::SuggestError;
use waypoint_weather::WeatherError;

pub const ATTRACTIONS: &str = "Here you go:\n\
    1. **Eiffel Tower**\n\
    Iconic landmark\n\
    Type: Historical\n\
    2. Louvre\n\
    Famous museum\n";

type SuggestScript = dyn Fn(&str) -> (Duration, Result<Vec<Suggestion>, SuggestError>) + Send + Sync;
type PlacesScript = dyn Fn(&str) -> (Duration, Result<String, PlacesError>) + Send + Sync;
type WeatherScript =
    dyn Fn(&QueryTarget) -> (Duration, Result<Option<WeatherSnapshot>, WeatherError>) + Send + Sync;

pub struct FakeSuggestions {
    script: Box<SuggestScript>,
    pub calls: Mutex<Vec<String>>,
}

impl FakeSuggestions {
    pub fn new(
        script: impl Fn(&str) -> (Duration, Result<Vec<Suggestion>, SuggestError>) + Send + Sync + 'static,
    ) -> Arc<Self> {
        Arc::new(Self {
            script: Box::new(script),
            calls: Mutex::new(Vec::new()),
        })
    }

    /// Answers every lookup immediately with one suggestion named after it.
    pub fn echo() -> Arc<Self> {
        Self::new(|text| (Duration::ZERO, Ok(vec![suggestion(text)])))
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().clone()
    }
}

#[async_trait]
impl SuggestionSource for FakeSuggestions {
    async fn suggest(&self, text: &str) -> Result<Vec<Suggestion>, SuggestError> {
        self.calls.lock().push(text.to_string());
        let (delay, result) = (self.script)(text);
        tokio::time::sleep(delay).await;
        result
    }
}

pub struct FakePlaces {
    script: Box<PlacesScript>,
    pub calls: Mutex<Vec<String>>,
}

impl FakePlaces {
    pub fn new(
        script: impl Fn(&str) -> (Duration, Result<String, PlacesError>) + Send + Sync + 'static,
    ) -> Arc<Self> {
        Arc::new(Self {
            script: Box::new(script),
            calls: Mutex::new(Vec::new()),
        })
    }

    pub fn fixture() -> Arc<Self> {
        Self::new(|_| (Duration::from_millis(50), Ok(ATTRACTIONS.to_string())))
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().clone()
    }
}

#[async_trait]
impl PlaceSource for FakePlaces {
    async fn list_places(&self, place_name: &str) -> Result<String, PlacesError> {
        self.calls.lock().push(place_name.to_string());
        let (delay, result) = (self.script)(place_name);
        tokio::time::sleep(delay).await;
        result
    }
}

pub struct FakeWeather {
    script: Box<WeatherScript>,
    pub calls: Mutex<Vec<QueryTarget>>,
}

impl FakeWeather {
    pub fn new(
        script: impl Fn(&QueryTarget) -> (Duration, Result<Option<WeatherSnapshot>, WeatherError>)
            + Send
            + Sync
            + 'static,
    ) -> Arc<Self> {
        Arc::new(Self {
            script: Box::new(script),
            calls: Mutex::new(Vec::new()),
        })
    }

    pub fn fixture() -> Arc<Self> {
        Self::new(|target| {
            (
                Duration::from_millis(50),
                Ok(Some(weather_for(&target.place_name))),
            )
        })
    }

    pub fn calls(&self) -> Vec<QueryTarget> {
        self.calls.lock().clone()
    }
}

#[async_trait]
impl WeatherSource for FakeWeather {
    async fn current(&self, target: &QueryTarget) -> Result<Option<WeatherSnapshot>, WeatherError> {
        self.calls.lock().push(target.clone());
        let (delay, result) = (self.script)(target);
        tokio::time::sleep(delay).await;
        result
    }
}

pub fn suggestion(text: &str) -> Suggestion {
    Suggestion {
        id: format!("place.{text}"),
        short_name: text.to_string(),
        display_name: format!("{text}, Testland"),
        coordinates: Coordinates { lat: 10.5, lng: 20.25 },
    }
}

pub fn weather_for(place_name: &str) -> WeatherSnapshot {
    WeatherSnapshot {
        place_name: place_name.to_string(),
        country: Some("TL".into()),
        temperature_c: Some(21.0),
        condition: Some("clear sky".into()),
        humidity_pct: Some(40),
        pressure_hpa: Some(1013.0),
        precipitation_mm: 0.0,
        icon_ref: Some("01d".into()),
        fetched_at: DateTime::from_timestamp(1_714_564_800, 0).unwrap(),
    }
}

pub fn session(
    suggestions: &Arc<FakeSuggestions>,
    places: &Arc<FakePlaces>,
    weather: &Arc<FakeWeather>,
) -> SearchSession {
    SearchSession::new(
        suggestions.clone(),
        places.clone(),
        weather.clone(),
        SessionSettings::default(),
    )
}

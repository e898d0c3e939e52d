use serde::{Deserialize, Serialize};

/// Geographic point in decimal degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

/// One autocomplete entry, ordered by provider relevance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Suggestion {
    pub id: String,
    /// Place name alone, e.g. "Paris"
    pub short_name: String,
    /// Fully qualified name, e.g. "Paris, Île-de-France, France"
    pub display_name: String,
    pub coordinates: Coordinates,
}

/// Forward geocoding response body
#[derive(Debug, Deserialize)]
pub(crate) struct FeatureCollection {
    #[serde(default)]
    pub features: Vec<Feature>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Feature {
    pub id: String,
    pub text: String,
    pub place_name: String,
    /// `[lng, lat]`
    pub center: [f64; 2],
}

impl From<Feature> for Suggestion {
    fn from(feature: Feature) -> Self {
        let [lng, lat] = feature.center;
        Self {
            id: feature.id,
            short_name: feature.text,
            display_name: feature.place_name,
            coordinates: Coordinates { lat, lng },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_feature_center_is_lng_lat() {
        let json = serde_json::json!({
            "id": "place.123",
            "text": "Paris",
            "place_name": "Paris, France",
            "center": [2.3522, 48.8566]
        });
        let feature: Feature = serde_json::from_value(json).unwrap();
        let suggestion = Suggestion::from(feature);

        assert_eq!(suggestion.short_name, "Paris");
        assert_eq!(suggestion.display_name, "Paris, France");
        assert_eq!(suggestion.coordinates.lat, 48.8566);
        assert_eq!(suggestion.coordinates.lng, 2.3522);
    }

    #[test]
    fn test_missing_features_is_empty() {
        let body: FeatureCollection = serde_json::from_str("{}").unwrap();
        assert!(body.features.is_empty());
    }
}

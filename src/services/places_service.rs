//! Places Service
//!
//! Text-search client for the Google Places API, used to geocode free-text
//! queries into address plus coordinates when the user pins an item's
//! location. Results are mapped to a small suggestion DTO; nothing from the
//! raw API shape leaks past this module.

use std::env;
use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use url::Url;

const PLACES_TEXT_SEARCH_URL: &str = "https://maps.googleapis.com/maps/api/place/textsearch/json";
const REQUEST_TIMEOUT_SECS: u64 = 10;

#[derive(Debug)]
pub enum PlacesError {
    EnvironmentError(String),
    RequestError(reqwest::Error),
    ResponseError(String),
}

impl fmt::Display for PlacesError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlacesError::EnvironmentError(msg) => write!(f, "{}", msg),
            PlacesError::RequestError(err) => write!(f, "places request failed: {}", err),
            PlacesError::ResponseError(msg) => write!(f, "places API error: {}", msg),
        }
    }
}

impl std::error::Error for PlacesError {}

impl From<reqwest::Error> for PlacesError {
    fn from(err: reqwest::Error) -> Self {
        PlacesError::RequestError(err)
    }
}

#[derive(Debug, Deserialize)]
struct PlacesResponse {
    status: String,
    #[serde(default)]
    results: Vec<PlaceResult>,
    error_message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct PlaceResult {
    name: String,
    #[serde(default)]
    formatted_address: String,
    geometry: PlaceGeometry,
    place_id: String,
}

#[derive(Debug, Deserialize)]
struct PlaceGeometry {
    location: PlaceLatLng,
}

#[derive(Debug, Deserialize)]
struct PlaceLatLng {
    lat: f64,
    lng: f64,
}

/// What callers get back: enough to fill in an item's location.
#[derive(Debug, Clone, Serialize)]
pub struct PlaceSuggestion {
    pub name: String,
    pub address: String,
    pub lat: f64,
    pub lng: f64,
    pub place_id: String,
}

pub struct PlacesService {
    client: reqwest::Client,
    api_key: String,
}

impl PlacesService {
    pub fn from_env() -> Result<Self, PlacesError> {
        let api_key = env::var("GOOGLE_PLACES_API_KEY").map_err(|_| {
            PlacesError::EnvironmentError(
                "GOOGLE_PLACES_API_KEY environment variable not set".to_string(),
            )
        })?;
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;
        Ok(Self { client, api_key })
    }

    pub async fn search(&self, query: &str) -> Result<Vec<PlaceSuggestion>, PlacesError> {
        let url = Url::parse_with_params(
            PLACES_TEXT_SEARCH_URL,
            &[("query", query), ("key", self.api_key.as_str())],
        )
        .map_err(|err| PlacesError::ResponseError(format!("could not build request URL: {}", err)))?;

        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(PlacesError::ResponseError(format!(
                "places endpoint answered with HTTP {}",
                status
            )));
        }

        let payload: PlacesResponse = response.json().await?;
        match payload.status.as_str() {
            "OK" | "ZERO_RESULTS" => Ok(payload
                .results
                .into_iter()
                .map(|result| PlaceSuggestion {
                    name: result.name,
                    address: result.formatted_address,
                    lat: result.geometry.location.lat,
                    lng: result.geometry.location.lng,
                    place_id: result.place_id,
                })
                .collect()),
            other => Err(PlacesError::ResponseError(format!(
                "{}: {}",
                other,
                payload.error_message.unwrap_or_default()
            ))),
        }
    }
}

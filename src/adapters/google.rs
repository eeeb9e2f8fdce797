use crate::domain::model::{Candidate, Coordinate};
use crate::domain::ports::{Geocoder, PlaceSearch};
use crate::utils::error::{FinderError, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use url::Url;

pub const DEFAULT_BASE_URL: &str = "https://maps.googleapis.com/";
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 10;

const GEOCODE_PATH: &str = "maps/api/geocode/json";
const TEXT_SEARCH_PATH: &str = "maps/api/place/textsearch/json";

/// Google Geocoding and Places Text Search over HTTP. One client serves
/// both ports and shares its connection pool across concurrent searches.
#[derive(Debug, Clone)]
pub struct GoogleMapsClient {
    client: Client,
    base_url: Url,
    api_key: String,
}

impl GoogleMapsClient {
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        Self::with_endpoint(
            api_key,
            DEFAULT_BASE_URL,
            Duration::from_secs(DEFAULT_TIMEOUT_SECONDS),
        )
    }

    pub fn with_endpoint(
        api_key: impl Into<String>,
        base_url: &str,
        timeout: Duration,
    ) -> Result<Self> {
        let mut base_url = Url::parse(base_url)?;
        // Url::join drops the last segment unless the path ends in '/'.
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("birthday-deals/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            base_url,
            api_key: api_key.into(),
        })
    }

    async fn get_json<T: for<'de> Deserialize<'de>>(
        &self,
        path: &str,
        params: &[(&str, &str)],
    ) -> Result<T> {
        let url = self.base_url.join(path)?;
        tracing::debug!("GET {}", url);

        let response = self
            .client
            .get(url)
            .query(params)
            .query(&[("key", self.api_key.as_str())])
            .send()
            .await?
            .error_for_status()?;

        Ok(response.json::<T>().await?)
    }
}

#[derive(Debug, Deserialize)]
struct LatLng {
    lat: f64,
    lng: f64,
}

#[derive(Debug, Deserialize)]
struct Geometry {
    location: LatLng,
}

#[derive(Debug, Deserialize)]
struct GeocodeResponse {
    status: String,
    #[serde(default)]
    results: Vec<GeocodeResult>,
    error_message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GeocodeResult {
    geometry: Geometry,
}

#[derive(Debug, Deserialize)]
struct TextSearchResponse {
    status: String,
    #[serde(default)]
    results: Vec<PlaceResult>,
    error_message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct PlaceResult {
    name: Option<String>,
    formatted_address: Option<String>,
    geometry: Geometry,
    rating: Option<f64>,
    user_ratings_total: Option<u64>,
    place_id: Option<String>,
}

impl From<PlaceResult> for Candidate {
    fn from(place: PlaceResult) -> Self {
        Candidate {
            name: place.name,
            location: Coordinate::new(place.geometry.location.lat, place.geometry.location.lng),
            formatted_address: place.formatted_address,
            rating: place.rating,
            user_ratings_total: place.user_ratings_total,
            place_id: place.place_id,
        }
    }
}

/// Maps the provider's `status` field. `Ok(false)` is ZERO_RESULTS.
fn check_status(status: &str, error_message: Option<String>) -> Result<bool> {
    match status {
        "OK" => Ok(true),
        "ZERO_RESULTS" => Ok(false),
        other => Err(FinderError::ProviderError {
            status: other.to_string(),
            message: error_message.unwrap_or_else(|| "no error message".to_string()),
        }),
    }
}

#[async_trait]
impl Geocoder for GoogleMapsClient {
    async fn geocode(&self, location: &str) -> Result<Option<Coordinate>> {
        if let Some(literal) = Coordinate::parse_literal(location) {
            tracing::debug!("Using coordinate literal {}", literal);
            return Ok(Some(literal));
        }

        let response: GeocodeResponse = self
            .get_json(GEOCODE_PATH, &[("address", location)])
            .await?;

        if !check_status(&response.status, response.error_message)? {
            return Ok(None);
        }
        Ok(response
            .results
            .into_iter()
            .next()
            .map(|r| Coordinate::new(r.geometry.location.lat, r.geometry.location.lng)))
    }
}

#[async_trait]
impl PlaceSearch for GoogleMapsClient {
    async fn search(
        &self,
        query: &str,
        center: Coordinate,
        radius_meters: f64,
    ) -> Result<Vec<Candidate>> {
        let location = center.to_string();
        let radius = format!("{:.0}", radius_meters);

        let response: TextSearchResponse = self
            .get_json(
                TEXT_SEARCH_PATH,
                &[
                    ("query", query),
                    ("location", location.as_str()),
                    ("radius", radius.as_str()),
                ],
            )
            .await?;

        if !check_status(&response.status, response.error_message)? {
            return Ok(Vec::new());
        }
        Ok(response.results.into_iter().map(Candidate::from).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_status() {
        assert!(check_status("OK", None).unwrap());
        assert!(!check_status("ZERO_RESULTS", None).unwrap());
        let err = check_status("OVER_QUERY_LIMIT", Some("slow down".to_string())).unwrap_err();
        assert!(matches!(
            err,
            FinderError::ProviderError { ref status, ref message }
                if status == "OVER_QUERY_LIMIT" && message == "slow down"
        ));
    }

    #[test]
    fn test_base_url_gets_trailing_slash() {
        let client =
            GoogleMapsClient::with_endpoint("k", "http://localhost:9000/proxy", Duration::from_secs(1))
                .unwrap();
        assert_eq!(
            client.base_url.join(GEOCODE_PATH).unwrap().as_str(),
            "http://localhost:9000/proxy/maps/api/geocode/json"
        );
    }

    #[test]
    fn test_place_result_without_optional_fields() {
        let json = serde_json::json!({
            "geometry": {"location": {"lat": 40.1, "lng": -74.2}}
        });
        let place: PlaceResult = serde_json::from_value(json).unwrap();
        let candidate = Candidate::from(place);
        assert_eq!(candidate.location, Coordinate::new(40.1, -74.2));
        assert!(candidate.rating.is_none());
        assert!(candidate.place_id.is_none());
    }

    #[tokio::test]
    async fn test_literal_skips_network() {
        // Port 9 is discard; any request would fail.
        let client =
            GoogleMapsClient::with_endpoint("k", "http://127.0.0.1:9", Duration::from_millis(200))
                .unwrap();
        let origin = client.geocode("40.0,-74.0").await.unwrap();
        assert_eq!(origin, Some(Coordinate::new(40.0, -74.0)));
    }
}

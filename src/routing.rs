//! Distance-matrix client
//!
//! One outbound request per route lookup. Every failure, whether transport,
//! status or payload shape, collapses into [`TravelError::Upstream`].

use async_trait::async_trait;
use chrono::{DateTime, FixedOffset};
use serde::Deserialize;
use tracing::instrument;

use crate::{TravelError, config::TravelConfig};

const DISTANCE_MATRIX_PATH: &str = "/maps/api/distancematrix/json";
const TRAVEL_MODE: &str = "driving";

/// Duration and distance of the first route the upstream returns
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RouteResult {
    pub duration_seconds: u64,
    pub distance_meters: u64,
}

/// Parameters of a single origin-destination lookup
#[derive(Debug, Clone, PartialEq)]
pub struct RouteRequest {
    pub origin: String,
    pub destination: String,
    pub departure: Option<DateTime<FixedOffset>>,
}

impl RouteRequest {
    pub fn new<O: Into<String>, D: Into<String>>(origin: O, destination: D) -> Self {
        Self {
            origin: origin.into(),
            destination: destination.into(),
            departure: None,
        }
    }

    /// Ask for traffic-aware driving at the given departure instant
    #[must_use]
    pub fn departing_at(mut self, departure: DateTime<FixedOffset>) -> Self {
        self.departure = Some(departure);
        self
    }

    /// Query parameters as sent upstream, minus the API key
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![
            ("origins", self.origin.clone()),
            ("destinations", self.destination.clone()),
        ];
        if let Some(departure) = self.departure {
            pairs.push(("departure_time", departure.timestamp().to_string()));
            pairs.push(("mode", TRAVEL_MODE.to_string()));
        }
        pairs
    }
}

/// Anything that can answer a route lookup
#[async_trait]
pub trait DistanceMatrixProvider: Send + Sync {
    async fn route(&self, request: &RouteRequest) -> Result<RouteResult, TravelError>;
}

/// Client for the Google Distance Matrix API
#[derive(Debug, Clone)]
pub struct GoogleDistanceMatrixClient {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
}

impl GoogleDistanceMatrixClient {
    pub fn new(config: &TravelConfig) -> Result<Self, TravelError> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("commute/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| TravelError::config(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            endpoint: format!("{}{}", config.api_base_url, DISTANCE_MATRIX_PATH),
            api_key: config.api_key.clone(),
        })
    }
}

#[async_trait]
impl DistanceMatrixProvider for GoogleDistanceMatrixClient {
    #[instrument(skip(self), fields(endpoint = %self.endpoint))]
    async fn route(&self, request: &RouteRequest) -> Result<RouteResult, TravelError> {
        tracing::debug!("Calling the distance-matrix API");
        let response = self
            .client
            .get(&self.endpoint)
            .query(&request.query_pairs())
            .query(&[("key", self.api_key.as_str())])
            .send()
            .await?
            .error_for_status()?;

        let response: ApiResponse = response.json().await?;
        let result = response.first_route()?;
        tracing::debug!(
            duration_seconds = result.duration_seconds,
            distance_meters = result.distance_meters,
            "Route received"
        );
        Ok(result)
    }
}

#[derive(Debug, Deserialize)]
struct ValueResponse {
    value: u64,
}

#[derive(Debug, Deserialize)]
struct ElementResponse {
    status: Option<String>,
    duration: Option<ValueResponse>,
    distance: Option<ValueResponse>,
}

#[derive(Debug, Deserialize)]
struct RowResponse {
    #[serde(default)]
    elements: Vec<ElementResponse>,
}

#[derive(Debug, Deserialize)]
struct ApiResponse {
    status: Option<String>,
    #[serde(default)]
    rows: Vec<RowResponse>,
}

impl ApiResponse {
    fn first_route(self) -> Result<RouteResult, TravelError> {
        let api_status = self.status;
        let element = self
            .rows
            .into_iter()
            .next()
            .and_then(|row| row.elements.into_iter().next())
            .ok_or_else(|| {
                TravelError::upstream(format!(
                    "No rows[0].elements[0] in response (status {api_status:?})"
                ))
            })?;

        match (element.duration, element.distance) {
            (Some(duration), Some(distance)) => Ok(RouteResult {
                duration_seconds: duration.value,
                distance_meters: distance.value,
            }),
            _ => Err(TravelError::upstream(format!(
                "Element without duration or distance (status {:?})",
                element.status
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> Result<RouteResult, TravelError> {
        let response: ApiResponse = serde_json::from_str(json).expect("should deserialise");
        response.first_route()
    }

    #[test]
    fn test_first_element_is_used() {
        let json = r#"{
            "status": "OK",
            "origin_addresses": ["Gent"],
            "destination_addresses": ["Brussel"],
            "rows": [
                {"elements": [
                    {"status": "OK", "duration": {"text": "10 mins", "value": 600}, "distance": {"text": "12.3 km", "value": 12345}},
                    {"status": "OK", "duration": {"value": 1}, "distance": {"value": 1}}
                ]},
                {"elements": [{"status": "OK", "duration": {"value": 2}, "distance": {"value": 2}}]}
            ]
        }"#;

        assert_eq!(
            parse(json).unwrap(),
            RouteResult {
                duration_seconds: 600,
                distance_meters: 12345,
            }
        );
    }

    #[test]
    fn test_empty_rows_is_upstream_error() {
        let err = parse(r#"{"status": "INVALID_REQUEST", "rows": []}"#).unwrap_err();
        assert!(matches!(err, TravelError::Upstream { .. }));
    }

    #[test]
    fn test_missing_rows_is_upstream_error() {
        let err = parse(r#"{"status": "REQUEST_DENIED", "error_message": "bad key"}"#).unwrap_err();
        assert!(matches!(err, TravelError::Upstream { .. }));
    }

    #[test]
    fn test_not_found_element_is_upstream_error() {
        let err = parse(r#"{"rows": [{"elements": [{"status": "NOT_FOUND"}]}]}"#).unwrap_err();
        assert!(matches!(err, TravelError::Upstream { .. }));
        assert!(err.to_string().contains("NOT_FOUND"));
    }

    #[test]
    fn test_query_pairs_without_departure() {
        let request = RouteRequest::new("Gent", "Brussel");
        assert_eq!(
            request.query_pairs(),
            vec![
                ("origins", "Gent".to_string()),
                ("destinations", "Brussel".to_string()),
            ]
        );
    }

    #[test]
    fn test_query_pairs_with_departure() {
        let departure = DateTime::parse_from_rfc3339("2026-10-20T07:00:00+02:00").unwrap();
        let request = RouteRequest::new("Gent", "Brussel").departing_at(departure);
        let pairs = request.query_pairs();

        assert!(pairs.contains(&("departure_time", "1792472400".to_string())));
        assert!(pairs.contains(&("mode", "driving".to_string())));
    }

    #[test]
    fn test_client_endpoint_uses_base_url() {
        let mut config = TravelConfig::new("key", "Gent");
        config.api_base_url = "http://127.0.0.1:9999".to_string();
        let client = GoogleDistanceMatrixClient::new(&config).unwrap();

        assert_eq!(
            client.endpoint,
            "http://127.0.0.1:9999/maps/api/distancematrix/json"
        );
    }
}

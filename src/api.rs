//! HTTP handlers for the travel endpoints

use std::sync::Arc;

use axum::{
    Router,
    extract::{Query, State},
    response::Json,
    routing::get,
};
use chrono::{DateTime, FixedOffset, SecondsFormat};
use serde::{Deserialize, Serialize};

use crate::{
    TravelError,
    config::TravelConfig,
    departure::Clock,
    error::ApiError,
    routing::{DistanceMatrixProvider, RouteRequest, RouteResult},
};

const TRAVEL_TIME_FAILED: &str = "Failed to retrieve travel time";
const TRAVEL_DISTANCE_FAILED: &str = "Failed to retrieve travel distance";

/// Shared, read-only state handed to every handler
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<TravelConfig>,
    pub provider: Arc<dyn DistanceMatrixProvider>,
    pub clock: Arc<dyn Clock>,
}

impl AppState {
    pub fn new(
        config: TravelConfig,
        provider: Arc<dyn DistanceMatrixProvider>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            config: Arc::new(config),
            provider,
            clock,
        }
    }
}

#[derive(Debug, Default, PartialEq)]
pub struct TravelQuery {
    pub destination: Option<String>,
}

impl TravelQuery {
    /// First non-empty `destination`; repeated keys do not reject the request
    pub fn from_pairs(pairs: Vec<(String, String)>) -> Self {
        let mut destinations = pairs
            .into_iter()
            .filter(|(key, _)| key == "destination")
            .map(|(_, value)| value)
            .peekable();
        let first = destinations.peek().cloned();
        Self {
            destination: destinations.find(|d| !d.is_empty()).or(first),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TravelTimeResponse {
    pub travel_time_seconds: u64,
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TravelDistanceResponse {
    pub travel_distance_meters: u64,
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TravelResponse {
    pub travel_time_minutes: u64,
    pub travel_distance_kilometers: String,
    pub departure_time: String,
}

impl TravelResponse {
    fn new(route: RouteResult, departure: DateTime<FixedOffset>) -> Self {
        Self {
            travel_time_minutes: seconds_to_minutes(route.duration_seconds),
            travel_distance_kilometers: meters_to_kilometers(route.distance_meters),
            departure_time: departure.to_rfc3339_opts(SecondsFormat::Secs, false),
        }
    }
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/traveltime", get(get_travel_time))
        .route("/traveldistance", get(get_travel_distance))
        .route("/travel", get(get_travel))
        .route("/health", get(health))
        .with_state(state)
}

async fn get_travel_time(
    State(state): State<AppState>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Result<Json<TravelTimeResponse>, ApiError> {
    let destination = require_destination(TravelQuery::from_pairs(pairs))?;
    let request = RouteRequest::new(state.config.origin.as_str(), destination);

    let route = fetch_route(&state, &request, TRAVEL_TIME_FAILED).await?;
    Ok(Json(TravelTimeResponse {
        travel_time_seconds: route.duration_seconds,
    }))
}

async fn get_travel_distance(
    State(state): State<AppState>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Result<Json<TravelDistanceResponse>, ApiError> {
    let destination = require_destination(TravelQuery::from_pairs(pairs))?;
    let departure = state.clock.next_departure();
    let request =
        RouteRequest::new(state.config.origin.as_str(), destination).departing_at(departure);

    let route = fetch_route(&state, &request, TRAVEL_DISTANCE_FAILED).await?;
    Ok(Json(TravelDistanceResponse {
        travel_distance_meters: route.distance_meters,
    }))
}

async fn get_travel(
    State(state): State<AppState>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Result<Json<TravelResponse>, ApiError> {
    let destination = require_destination(TravelQuery::from_pairs(pairs))?;
    let departure = state.clock.next_departure();
    let request =
        RouteRequest::new(state.config.origin.as_str(), destination).departing_at(departure);

    let route = fetch_route(&state, &request, TRAVEL_TIME_FAILED).await?;
    Ok(Json(TravelResponse::new(route, departure)))
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

fn require_destination(query: TravelQuery) -> Result<String, ApiError> {
    parse_destination(query.destination).map_err(|e| {
        tracing::debug!("Rejected request: {}", e);
        ApiError::DestinationRequired
    })
}

fn parse_destination(destination: Option<String>) -> Result<String, TravelError> {
    destination
        .filter(|d| !d.is_empty())
        .ok_or_else(|| TravelError::validation("destination query parameter is missing or empty"))
}

/// Single upstream call; detail is logged and replaced by `failure_message`
async fn fetch_route(
    state: &AppState,
    request: &RouteRequest,
    failure_message: &'static str,
) -> Result<RouteResult, ApiError> {
    state.provider.route(request).await.map_err(|e| {
        tracing::error!(destination = %request.destination, "{}: {}", failure_message, e);
        ApiError::Upstream(failure_message)
    })
}

/// Whole minutes, halves rounded up
fn seconds_to_minutes(seconds: u64) -> u64 {
    (seconds + 30) / 60
}

/// Kilometres with exactly two decimals, halves rounded up
fn meters_to_kilometers(meters: u64) -> String {
    let centi = (meters + 5) / 10;
    format!("{}.{:02}", centi / 100, centi % 100)
}

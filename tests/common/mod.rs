#![allow(dead_code)]

use std::sync::{
    Arc, Mutex,
    atomic::{AtomicUsize, Ordering},
};

use async_trait::async_trait;
use axum::{body::Body, http::Request, response::Response};
use chrono::{DateTime, FixedOffset, TimeZone};
use chrono_tz::{Europe::Brussels, Tz};
use commute::{
    AppState, Clock, DistanceMatrixProvider, FixedClock, RouteRequest, RouteResult, TravelConfig,
    TravelError,
};
use http_body_util::BodyExt;
use tower::ServiceExt;

pub const ORIGIN: &str = "Industriepark Zwijnaarde, Gent";

/// Provider double that counts calls and records what it was asked
pub struct StubProvider {
    outcome: Box<dyn Fn() -> Result<RouteResult, TravelError> + Send + Sync>,
    calls: AtomicUsize,
    requests: Mutex<Vec<RouteRequest>>,
}

impl StubProvider {
    pub fn with_route(duration_seconds: u64, distance_meters: u64) -> Self {
        Self::new(move || {
            Ok(RouteResult {
                duration_seconds,
                distance_meters,
            })
        })
    }

    pub fn with_error(message: &'static str) -> Self {
        Self::new(move || Err(TravelError::upstream(message)))
    }

    fn new<F>(outcome: F) -> Self
    where
        F: Fn() -> Result<RouteResult, TravelError> + Send + Sync + 'static,
    {
        Self {
            outcome: Box::new(outcome),
            calls: AtomicUsize::new(0),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn requests(&self) -> Vec<RouteRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl DistanceMatrixProvider for StubProvider {
    async fn route(&self, request: &RouteRequest) -> Result<RouteResult, TravelError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().unwrap().push(request.clone());
        (self.outcome)()
    }
}

pub fn at(rfc3339: &str) -> DateTime<FixedOffset> {
    DateTime::parse_from_rfc3339(rfc3339).unwrap()
}

/// Local time in Belgium, where the origin is
pub fn brussels(year: i32, month: u32, day: u32, hour: u32) -> DateTime<Tz> {
    Brussels
        .with_ymd_and_hms(year, month, day, hour, 0, 0)
        .unwrap()
}

pub fn state_with<C: Clock + 'static>(provider: Arc<StubProvider>, clock: C) -> AppState {
    AppState::new(
        TravelConfig::new("test-key", ORIGIN),
        provider,
        Arc::new(clock),
    )
}

pub fn clock_at<Z>(now: DateTime<Z>) -> FixedClock<Z>
where
    Z: TimeZone,
{
    FixedClock::new(now)
}

/// Send a GET through the router and return status plus JSON body
pub async fn get_json(state: AppState, uri: &str) -> (u16, serde_json::Value) {
    let response: Response = commute::router(state)
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();

    let status = response.status().as_u16();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = serde_json::from_slice(&bytes).unwrap();
    (status, body)
}

//! Commute - travel time and distance from a fixed origin
//!
//! This library provides the HTTP handlers, the distance-matrix client and
//! the departure-time calculation behind the commute service.

pub mod api;
pub mod config;
pub mod departure;
pub mod error;
pub mod logging;
pub mod routing;
pub mod web;

// Re-export core types for public API
pub use api::{AppState, router};
pub use config::TravelConfig;
pub use departure::{Clock, FixedClock, SystemClock, next_departure};
pub use error::{ApiError, TravelError};
pub use routing::{DistanceMatrixProvider, GoogleDistanceMatrixClient, RouteRequest, RouteResult};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

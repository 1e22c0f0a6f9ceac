use std::sync::Arc;

use anyhow::Context;
use commute::{AppState, GoogleDistanceMatrixClient, SystemClock, TravelConfig, logging, web};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = TravelConfig::from_env().context("Refusing to start")?;

    logging::init_tracing(&config);

    let client =
        GoogleDistanceMatrixClient::new(&config).context("Failed to set up distance-matrix client")?;
    let clock = SystemClock::new(config.timezone);

    tracing::info!(origin = %config.origin, "Starting commute service");
    let state = AppState::new(config, Arc::new(client), Arc::new(clock));
    web::run(state).await
}

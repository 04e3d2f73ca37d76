use std::time::{Duration, Instant};

use thiserror::Error;
use tokio::sync::oneshot;
use tracing::{debug, error, info};

use crate::records::Application;

/// Message shown to the user for any fetch failure. The specific cause only
/// goes to the log.
pub const FETCH_ERROR_MESSAGE: &str = "Error fetching applications.";

const REQUEST_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("failed to build http client: {0}")]
    Client(#[source] reqwest::Error),
    #[error("request failed: {0}")]
    Request(#[source] reqwest::Error),
    #[error("endpoint returned {0}")]
    Status(reqwest::StatusCode),
    #[error("could not decode response body: {0}")]
    Decode(#[source] reqwest::Error),
}

pub type FetchOutcome = Result<Vec<Application>, FetchError>;

/// Load state of the record collection. Transitions Loading -> Loaded or
/// Loading -> Failed exactly once per run; there is no retry.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum LoadStatus {
    #[default]
    Loading,
    Loaded,
    Failed(String),
}

/// Spawn the single background fetch and hand back the channel the result
/// arrives on. Dropping the receiver discards the pending result.
pub fn spawn_fetch(url: String) -> oneshot::Receiver<FetchOutcome> {
    let (tx, rx) = oneshot::channel();
    tokio::spawn(async move {
        let outcome = fetch_applications(&url).await;
        match &outcome {
            Ok(records) => info!("Fetched {} application records", records.len()),
            Err(e) => error!("Fetching applications failed: {e}"),
        }
        // The receiver is gone when the UI quit mid-flight.
        let _ = tx.send(outcome);
    });
    rx
}

async fn fetch_applications(url: &str) -> FetchOutcome {
    let start_time = Instant::now();

    let client = reqwest::Client::builder()
        .user_agent(concat!("atv/", env!("CARGO_PKG_VERSION")))
        .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
        .build()
        .map_err(FetchError::Client)?;

    let response = client.get(url).send().await.map_err(FetchError::Request)?;
    let status = response.status();
    if !status.is_success() {
        return Err(FetchError::Status(status));
    }

    let records: Vec<Application> =
        response.json().await.map_err(FetchError::Decode)?;

    debug!(
        "Fetch of {url} took {}ms",
        start_time.elapsed().as_millis()
    );
    Ok(records)
}

//! Timeout-bounded HTTP GET.
//!
//! The fetcher owns no state: the client, URL and budget are passed on every
//! call. The request future is raced against a timer; if the timer wins, the
//! request future is dropped, which cancels the in-flight request.

use super::data_source::SourceError;
use reqwest::header::ACCEPT;
use reqwest::{Client, Response, Url};
use std::time::Duration;
use tokio::time::timeout;

/// Default budget for the remote tier.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(8000);

/// Issue a GET against `url`, failing with [`SourceError::Timeout`] if no
/// response arrives within `budget`.
///
/// The status code is not inspected here; callers decide what counts as success.
pub async fn fetch_with_timeout(
    client: &Client,
    url: &Url,
    budget: Duration,
) -> Result<Response, SourceError> {
    tracing::debug!("GET {} (budget {:?})", url, budget);

    let request = client
        .get(url.clone())
        .header(ACCEPT, "application/json")
        .send();

    let response = timeout(budget, request)
        .await
        .map_err(|_| {
            tracing::warn!("Request to {} timed out after {:?}", url, budget);
            SourceError::Timeout(budget)
        })?
        .map_err(|e| SourceError::Transport(e.to_string()))?;

    tracing::debug!("GET {} -> {}", url, response.status());
    Ok(response)
}

//! Single-request fetcher
//!
//! Performs exactly one network round trip per call. There are no retries
//! here; the next scheduler tick is the retry.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Url};

use super::{FetchError, WidgetConfig};

/// Default request timeout for the HTTP transport
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Performs a GET request and returns the response body
#[async_trait]
pub trait Transport: Send + Sync {
    async fn get(&self, url: &Url) -> Result<String, FetchError>;
}

/// HTTP transport backed by a shared reqwest client
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    /// Creates a transport whose requests are aborted after `timeout`
    pub fn new(timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("widgetdash/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn get(&self, url: &Url) -> Result<String, FetchError> {
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(network_failure)?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::BadStatus(status.as_u16()));
        }

        response.text().await.map_err(network_failure)
    }
}

/// Maps a transport-level reqwest error, including timeouts, to `NetworkFailure`
fn network_failure(err: reqwest::Error) -> FetchError {
    if err.is_timeout() {
        FetchError::NetworkFailure(format!("request timed out: {}", err.without_url()))
    } else {
        FetchError::NetworkFailure(err.without_url().to_string())
    }
}

/// Fetches and decodes one payload for `config`
///
/// # Returns
/// * `Ok(P)` - the decoded payload
/// * `Err(FetchError)` - network failure, failure status, or undecodable body
pub async fn fetch<P>(config: &WidgetConfig<P>, transport: &dyn Transport) -> Result<P, FetchError> {
    let body = transport.get(config.endpoint()).await?;
    config.decode(&body)
}

//! Refreshing widgets
//!
//! A refreshing widget pairs a data source with a cache and a renderer: it
//! fetches on load, refreshes on an interval, persists the last good payload,
//! and falls back to the cached payload (or a placeholder) when a fetch fails.
//!
//! Swapping a provider only requires a new decode function; the fetch, cache,
//! render and scheduling machinery is shared.

mod cycle;
mod fetch;

pub use cycle::{CycleOutcome, RefreshingWidget};
pub use fetch::{fetch, HttpTransport, Transport, DEFAULT_TIMEOUT};

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use reqwest::Url;
use thiserror::Error;

use crate::render::{Fragment, Project};

/// Why a single fetch failed
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FetchError {
    /// The request could not complete (connection error, timeout, ...)
    #[error("network failure: {0}")]
    NetworkFailure(String),

    /// The server answered with a failure status
    #[error("server responded with status {0}")]
    BadStatus(u16),

    /// The response body did not have the expected shape
    #[error("could not decode response: {0}")]
    DecodeFailure(String),
}

impl FetchError {
    /// Short category name used in logs
    pub fn category(&self) -> &'static str {
        match self {
            FetchError::NetworkFailure(_) => "network",
            FetchError::BadStatus(_) => "status",
            FetchError::DecodeFailure(_) => "decode",
        }
    }
}

impl From<serde_json::Error> for FetchError {
    fn from(err: serde_json::Error) -> Self {
        FetchError::DecodeFailure(err.to_string())
    }
}

/// Errors detected while building a widget configuration
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// Poll interval must be strictly positive
    #[error("poll interval for widget '{0}' must be greater than zero")]
    ZeroInterval(String),

    /// Widget ids name cache keys and board regions, so they cannot be empty
    #[error("widget id must not be empty")]
    EmptyId,
}

/// Decoder from a raw response body to a payload
pub type Decode<P> = Arc<dyn Fn(&str) -> Result<P, FetchError> + Send + Sync>;

/// Immutable description of one refreshing widget
pub struct WidgetConfig<P> {
    id: String,
    endpoint: Url,
    poll_interval: Duration,
    decode: Decode<P>,
    render: Project<P>,
}

impl<P> WidgetConfig<P> {
    /// Builds a configuration, rejecting an empty id or a zero poll interval
    pub fn new(
        id: impl Into<String>,
        endpoint: Url,
        poll_interval: Duration,
        decode: Decode<P>,
        render: Project<P>,
    ) -> Result<Self, ConfigError> {
        let id = id.into();
        if id.is_empty() {
            return Err(ConfigError::EmptyId);
        }
        if poll_interval.is_zero() {
            return Err(ConfigError::ZeroInterval(id));
        }
        Ok(Self {
            id,
            endpoint,
            poll_interval,
            decode,
            render,
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    pub fn poll_interval(&self) -> Duration {
        self.poll_interval
    }

    /// Decodes a response body into this widget's payload
    pub fn decode(&self, body: &str) -> Result<P, FetchError> {
        (self.decode)(body)
    }

    /// Projection used by the widget's renderer
    pub fn projection(&self) -> Project<P> {
        Arc::clone(&self.render)
    }

    /// Renders a payload without touching the board
    pub fn render(&self, payload: &P) -> Fragment {
        (self.render)(payload)
    }
}

impl<P> fmt::Debug for WidgetConfig<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Endpoint query strings may carry API keys, so only the host is shown
        f.debug_struct("WidgetConfig")
            .field("id", &self.id)
            .field("host", &self.endpoint.host_str())
            .field("poll_interval", &self.poll_interval)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(id: &str, interval: Duration) -> Result<WidgetConfig<i64>, ConfigError> {
        WidgetConfig::new(
            id,
            Url::parse("https://api.example.com/data?apikey=secret").unwrap(),
            interval,
            Arc::new(|body: &str| {
                body.trim()
                    .parse::<i64>()
                    .map_err(|e| FetchError::DecodeFailure(e.to_string()))
            }),
            Arc::new(|value: &i64| Fragment::new().text(value.to_string())),
        )
    }

    #[test]
    fn test_config_rejects_zero_interval() {
        let result = config("weather", Duration::ZERO);
        assert_eq!(result.err(), Some(ConfigError::ZeroInterval("weather".to_string())));
    }

    #[test]
    fn test_config_rejects_empty_id() {
        let result = config("", Duration::from_secs(60));
        assert_eq!(result.err(), Some(ConfigError::EmptyId));
    }

    #[test]
    fn test_config_decode_and_render() {
        let config = config("counter", Duration::from_secs(60)).unwrap();
        assert_eq!(config.decode("42").unwrap(), 42);
        assert!(matches!(config.decode("nope"), Err(FetchError::DecodeFailure(_))));
        assert_eq!(config.render(&7).visible_text(), "7");
    }

    #[test]
    fn test_config_debug_hides_query_string() {
        let config = config("counter", Duration::from_secs(60)).unwrap();
        let debug = format!("{:?}", config);
        assert!(debug.contains("api.example.com"));
        assert!(!debug.contains("secret"));
    }

    #[test]
    fn test_fetch_error_categories() {
        assert_eq!(FetchError::NetworkFailure("x".into()).category(), "network");
        assert_eq!(FetchError::BadStatus(503).category(), "status");
        assert_eq!(FetchError::DecodeFailure("x".into()).category(), "decode");
    }

    #[test]
    fn test_json_error_converts_to_decode_failure() {
        let err = serde_json::from_str::<serde_json::Value>("{ invalid").unwrap_err();
        assert!(matches!(FetchError::from(err), FetchError::DecodeFailure(_)));
    }
}

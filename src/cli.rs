//! Command-line interface parsing for widgetdash
//!
//! All configuration, including provider credentials, comes in through these
//! flags or their environment variables and is handed to the widgets at
//! construction time.

use std::path::PathBuf;
use std::time::Duration;

use clap::builder::TypedValueParser as _;
use clap::Parser;
use thiserror::Error;

use crate::sources::{NewsProvider, NewsQuery, DEFAULT_NEWS_LIMIT};
use crate::widget::DEFAULT_TIMEOUT;

/// Error types for CLI argument validation
#[derive(Debug, Error, PartialEq)]
pub enum CliError {
    /// Latitude outside -90..=90
    #[error("Invalid latitude: {0}. Expected a value between -90 and 90")]
    InvalidLatitude(f64),

    /// Longitude outside -180..=180
    #[error("Invalid longitude: {0}. Expected a value between -180 and 180")]
    InvalidLongitude(f64),
}

/// widgetdash - weather and headlines in your terminal, with offline fallback
#[derive(Parser, Debug)]
#[command(name = "widgetdash")]
#[command(about = "Terminal dashboard with a weather panel and a news ticker")]
#[command(version)]
pub struct Cli {
    /// Latitude used for the weather panel
    #[arg(long, default_value_t = -34.9, allow_negative_numbers = true)]
    pub latitude: f64,

    /// Longitude used for the weather panel
    #[arg(long, default_value_t = -56.2, allow_negative_numbers = true)]
    pub longitude: f64,

    /// Seconds between weather refreshes
    #[arg(long, value_name = "SECS", default_value_t = 1800, value_parser = clap::value_parser!(u64).range(1..))]
    pub weather_interval: u64,

    /// Seconds between news refreshes
    #[arg(long, value_name = "SECS", default_value_t = 3600, value_parser = clap::value_parser!(u64).range(1..))]
    pub news_interval: u64,

    /// News provider to query
    #[arg(long, value_enum, default_value_t = NewsProvider::Newsdata)]
    pub news_provider: NewsProvider,

    /// API key for the news provider
    #[arg(long, env = "WIDGETDASH_NEWS_API_KEY", hide_env_values = true)]
    pub news_api_key: Option<String>,

    /// Country code for headlines
    #[arg(long, default_value = "uy")]
    pub news_country: String,

    /// Language code for headlines (newsdata only)
    #[arg(long, default_value = "es")]
    pub news_language: String,

    /// Comma-separated headline categories
    #[arg(long, default_value = "politics,sports,top,technology,business")]
    pub news_category: String,

    /// Maximum number of headlines shown
    #[arg(long, default_value_t = DEFAULT_NEWS_LIMIT, value_parser = clap::value_parser!(u64).range(1..=50).map(|n| n as usize))]
    pub news_limit: usize,

    /// Seconds before an API request is abandoned
    #[arg(long, value_name = "SECS", default_value_t = DEFAULT_TIMEOUT.as_secs(), value_parser = clap::value_parser!(u64).range(1..))]
    pub timeout: u64,

    /// Directory for cached payloads, preferences and the log file
    #[arg(long, env = "WIDGETDASH_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    /// Enable debug logging (RUST_LOG is honoured when set)
    #[arg(long)]
    pub debug: bool,
}

/// Validated configuration derived from CLI arguments
#[derive(Debug, Clone)]
pub struct DashboardConfig {
    pub latitude: f64,
    pub longitude: f64,
    pub weather_interval: Duration,
    pub news_interval: Duration,
    /// `None` when no API key was supplied; the news widget then stays unavailable
    pub news: Option<NewsQuery>,
    pub timeout: Duration,
    pub data_dir: Option<PathBuf>,
    pub debug: bool,
}

impl DashboardConfig {
    /// Creates a DashboardConfig from parsed CLI arguments.
    ///
    /// # Returns
    /// * `Ok(DashboardConfig)` with durations and the news query resolved
    /// * `Err(CliError)` if the coordinates are out of range
    pub fn from_cli(cli: &Cli) -> Result<Self, CliError> {
        if !(-90.0..=90.0).contains(&cli.latitude) {
            return Err(CliError::InvalidLatitude(cli.latitude));
        }
        if !(-180.0..=180.0).contains(&cli.longitude) {
            return Err(CliError::InvalidLongitude(cli.longitude));
        }

        let news = cli
            .news_api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
            .map(|key| NewsQuery {
                provider: cli.news_provider,
                api_key: key.to_string(),
                country: cli.news_country.clone(),
                language: cli.news_language.clone(),
                category: cli.news_category.clone(),
                limit: cli.news_limit,
            });

        Ok(DashboardConfig {
            latitude: cli.latitude,
            longitude: cli.longitude,
            weather_interval: Duration::from_secs(cli.weather_interval),
            news_interval: Duration::from_secs(cli.news_interval),
            news,
            timeout: Duration::from_secs(cli.timeout),
            data_dir: cli.data_dir.clone(),
            debug: cli.debug,
        })
    }
}

//! Latest-headlines news sources
//!
//! Two provider adapters share one payload type. Only the endpoint and the
//! decode step differ, so switching provider never touches the cache,
//! renderer, or scheduler.

use std::sync::Arc;
use std::time::Duration;

use clap::ValueEnum;
use reqwest::Url;
use serde::{Deserialize, Serialize};

use crate::render::Fragment;
use crate::widget::{ConfigError, FetchError, WidgetConfig};

const NEWSDATA_BASE_URL: &str = "https://newsdata.io/api/1/latest";
const NEWSAPI_BASE_URL: &str = "https://newsapi.org/v2/top-headlines";

/// Widget id of the news ticker (also its cache key and board region)
pub const NEWS_WIDGET_ID: &str = "news";

/// Default number of headlines kept per fetch
pub const DEFAULT_NEWS_LIMIT: usize = 5;

/// A single headline
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Article {
    pub title: String,
    pub link: String,
}

/// Headlines from the most recent successful fetch
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Headlines {
    pub articles: Vec<Article>,
}

/// Supported news providers
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum NewsProvider {
    /// newsdata.io `latest` endpoint
    Newsdata,
    /// newsapi.org `top-headlines` endpoint
    Newsapi,
}

/// What to ask the news provider for
#[derive(Debug, Clone)]
pub struct NewsQuery {
    pub provider: NewsProvider,
    pub api_key: String,
    pub country: String,
    pub language: String,
    pub category: String,
    pub limit: usize,
}

impl NewsQuery {
    /// Builds the provider-specific request URL
    pub fn endpoint(&self) -> Url {
        match self.provider {
            NewsProvider::Newsdata => {
                let mut url = Url::parse(NEWSDATA_BASE_URL).expect("newsdata base URL is valid");
                url.query_pairs_mut()
                    .append_pair("apikey", &self.api_key)
                    .append_pair("country", &self.country)
                    .append_pair("language", &self.language)
                    .append_pair("category", &self.category);
                url
            }
            NewsProvider::Newsapi => {
                let mut url = Url::parse(NEWSAPI_BASE_URL).expect("newsapi base URL is valid");
                url.query_pairs_mut()
                    .append_pair("country", &self.country)
                    .append_pair("category", &self.category)
                    .append_pair("apiKey", &self.api_key);
                url
            }
        }
    }
}

/// newsdata.io response structure
#[derive(Debug, Deserialize)]
struct NewsdataResponse {
    status: String,
    #[serde(default)]
    results: Vec<NewsdataArticle>,
}

#[derive(Debug, Deserialize)]
struct NewsdataArticle {
    title: Option<String>,
    link: Option<String>,
}

/// newsapi.org response structure
#[derive(Debug, Deserialize)]
struct NewsapiResponse {
    status: String,
    #[serde(default)]
    articles: Vec<NewsapiArticle>,
    #[serde(default)]
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct NewsapiArticle {
    title: Option<String>,
    url: Option<String>,
}

/// Keeps up to `limit` articles that have both a title and a link
fn collect_articles(
    raw: impl Iterator<Item = (Option<String>, Option<String>)>,
    limit: usize,
) -> Result<Headlines, FetchError> {
    let articles: Vec<Article> = raw
        .filter_map(|(title, link)| {
            let title = title?.trim().to_string();
            let link = link?.trim().to_string();
            (!title.is_empty() && !link.is_empty()).then_some(Article { title, link })
        })
        .take(limit)
        .collect();

    if articles.is_empty() {
        return Err(FetchError::DecodeFailure("response contained no articles".to_string()));
    }
    Ok(Headlines { articles })
}

/// Decodes a newsdata.io `latest` response
pub fn decode_newsdata(body: &str, limit: usize) -> Result<Headlines, FetchError> {
    let response: NewsdataResponse = serde_json::from_str(body)?;
    if response.status != "success" {
        return Err(FetchError::DecodeFailure(format!(
            "provider status '{}'",
            response.status
        )));
    }
    collect_articles(
        response.results.into_iter().map(|a| (a.title, a.link)),
        limit,
    )
}

/// Decodes a newsapi.org `top-headlines` response
pub fn decode_newsapi(body: &str, limit: usize) -> Result<Headlines, FetchError> {
    let response: NewsapiResponse = serde_json::from_str(body)?;
    if response.status != "ok" {
        return Err(FetchError::DecodeFailure(format!(
            "provider status '{}': {}",
            response.status,
            response.message.unwrap_or_default()
        )));
    }
    collect_articles(
        response.articles.into_iter().map(|a| (a.title, a.url)),
        limit,
    )
}

/// Renders headlines as a list of links
pub fn render_headlines(headlines: &Headlines) -> Fragment {
    headlines
        .articles
        .iter()
        .fold(Fragment::new(), |fragment, article| {
            fragment.link(&article.title, &article.link)
        })
}

/// Configuration of the news widget
pub fn news_widget(
    query: &NewsQuery,
    poll_interval: Duration,
) -> Result<WidgetConfig<Headlines>, ConfigError> {
    let limit = query.limit;
    let decode: Arc<dyn Fn(&str) -> Result<Headlines, FetchError> + Send + Sync> =
        match query.provider {
            NewsProvider::Newsdata => Arc::new(move |body: &str| decode_newsdata(body, limit)),
            NewsProvider::Newsapi => Arc::new(move |body: &str| decode_newsapi(body, limit)),
        };

    WidgetConfig::new(
        NEWS_WIDGET_ID,
        query.endpoint(),
        poll_interval,
        decode,
        Arc::new(render_headlines),
    )
}

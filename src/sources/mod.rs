//! Data sources for the dashboard widgets
//!
//! Each source provides an endpoint, a decoder from the provider's response
//! into a payload, and a renderer from that payload into a fragment.

pub mod news;
pub mod weather;

pub use news::{
    news_widget, Article, Headlines, NewsProvider, NewsQuery, DEFAULT_NEWS_LIMIT, NEWS_WIDGET_ID,
};
pub use weather::{
    weather_code_to_condition, weather_widget, WeatherCondition, WeatherReading,
    WEATHER_WIDGET_ID,
};

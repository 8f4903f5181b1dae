//! Open-Meteo current weather source
//!
//! Decodes the `current_weather` block of the Open-Meteo forecast API into a
//! [`WeatherReading`] and renders it for the weather panel.

use std::sync::Arc;
use std::time::Duration;

use reqwest::Url;
use serde::{Deserialize, Serialize};

use crate::render::Fragment;
use crate::widget::{ConfigError, FetchError, WidgetConfig};

/// Base URL for the Open-Meteo API
const OPEN_METEO_BASE_URL: &str = "https://api.open-meteo.com/v1/forecast";

/// Widget id of the weather panel (also its cache key and board region)
pub const WEATHER_WIDGET_ID: &str = "weather";

/// Current conditions at the configured coordinates
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherReading {
    /// Temperature in Celsius
    pub temperature: f64,
    /// Wind speed in km/h
    pub windspeed: f64,
    /// WMO weather code
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weathercode: Option<u8>,
    /// Observation time as reported by the provider (local ISO 8601, minutes precision)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub observed_at: Option<String>,
}

/// Types of weather conditions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WeatherCondition {
    Clear,
    PartlyCloudy,
    Cloudy,
    Fog,
    Drizzle,
    Rain,
    HeavyRain,
    Snow,
    Thunderstorm,
    Unknown,
}

impl WeatherCondition {
    pub fn label(&self) -> &'static str {
        match self {
            WeatherCondition::Clear => "Clear sky",
            WeatherCondition::PartlyCloudy => "Partly cloudy",
            WeatherCondition::Cloudy => "Overcast",
            WeatherCondition::Fog => "Fog",
            WeatherCondition::Drizzle => "Drizzle",
            WeatherCondition::Rain => "Rain",
            WeatherCondition::HeavyRain => "Heavy rain",
            WeatherCondition::Snow => "Snow",
            WeatherCondition::Thunderstorm => "Thunderstorm",
            WeatherCondition::Unknown => "Unknown",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            WeatherCondition::Clear => "\u{2600}",          // ☀
            WeatherCondition::PartlyCloudy => "\u{26C5}",   // ⛅
            WeatherCondition::Cloudy => "\u{2601}",         // ☁
            WeatherCondition::Fog => "\u{1F32B}",           // 🌫
            WeatherCondition::Drizzle => "\u{1F326}",       // 🌦
            WeatherCondition::Rain => "\u{1F327}",          // 🌧
            WeatherCondition::HeavyRain => "\u{26C6}",      // ⛆
            WeatherCondition::Snow => "\u{2744}",           // ❄
            WeatherCondition::Thunderstorm => "\u{26C8}",   // ⛈
            WeatherCondition::Unknown => "?",
        }
    }
}

/// Map WMO weather code to WeatherCondition
///
/// Weather codes from WMO (World Meteorological Organization):
/// - 0: Clear sky
/// - 1-2: Mainly clear, partly cloudy
/// - 3: Overcast
/// - 45, 48: Fog
/// - 51, 53, 56: Light/moderate drizzle
/// - 55, 57: Dense drizzle
/// - 61, 66: Light rain
/// - 63, 65, 67, 80-82: Moderate/heavy rain and showers
/// - 71-77, 85-86: Snow
/// - 95-99: Thunderstorm
pub fn weather_code_to_condition(code: u8) -> WeatherCondition {
    match code {
        0 => WeatherCondition::Clear,
        1 | 2 => WeatherCondition::PartlyCloudy,
        3 => WeatherCondition::Cloudy,
        45 | 48 => WeatherCondition::Fog,
        51 | 53 | 56 => WeatherCondition::Drizzle,
        61 | 66 => WeatherCondition::Rain,
        55 | 57 | 63 | 65 | 67 | 80..=82 => WeatherCondition::HeavyRain,
        71..=77 | 85 | 86 => WeatherCondition::Snow,
        95..=99 => WeatherCondition::Thunderstorm,
        _ => WeatherCondition::Unknown,
    }
}

/// Open-Meteo API response structure
#[derive(Debug, Deserialize)]
struct OpenMeteoResponse {
    current_weather: CurrentWeather,
}

/// Current weather block from Open-Meteo
#[derive(Debug, Deserialize)]
struct CurrentWeather {
    temperature: f64,
    windspeed: f64,
    #[serde(default)]
    weathercode: Option<u8>,
    #[serde(default)]
    time: Option<String>,
}

/// Builds the Open-Meteo current weather URL for the given coordinates
pub fn weather_endpoint(latitude: f64, longitude: f64) -> Url {
    let mut url = Url::parse(OPEN_METEO_BASE_URL).expect("Open-Meteo base URL is valid");
    url.query_pairs_mut()
        .append_pair("latitude", &latitude.to_string())
        .append_pair("longitude", &longitude.to_string())
        .append_pair("current_weather", "true");
    url
}

/// Decodes an Open-Meteo response body
pub fn decode_weather(body: &str) -> Result<WeatherReading, FetchError> {
    let response: OpenMeteoResponse = serde_json::from_str(body)?;
    let current = response.current_weather;

    if !current.temperature.is_finite() || !current.windspeed.is_finite() {
        return Err(FetchError::DecodeFailure(
            "non-finite temperature or wind speed".to_string(),
        ));
    }

    Ok(WeatherReading {
        temperature: current.temperature,
        windspeed: current.windspeed,
        weathercode: current.weathercode,
        observed_at: current.time,
    })
}

/// Renders a reading for the weather panel
pub fn render_weather(reading: &WeatherReading) -> Fragment {
    let condition = reading.weathercode.map(weather_code_to_condition);

    let mut fragment = Fragment::new()
        .icon(condition.unwrap_or(WeatherCondition::Unknown).icon())
        .text(format!("{}°C", reading.temperature))
        .text(format!("Wind {} km/h", reading.windspeed));

    if let Some(condition) = condition {
        fragment = fragment.text(condition.label());
    }
    if let Some(ref observed_at) = reading.observed_at {
        fragment = fragment.text(format!("Observed {}", observed_at.replace('T', " ")));
    }
    fragment
}

/// Configuration of the weather widget
pub fn weather_widget(
    latitude: f64,
    longitude: f64,
    poll_interval: Duration,
) -> Result<WidgetConfig<WeatherReading>, ConfigError> {
    WidgetConfig::new(
        WEATHER_WIDGET_ID,
        weather_endpoint(latitude, longitude),
        poll_interval,
        Arc::new(decode_weather),
        Arc::new(render_weather),
    )
}

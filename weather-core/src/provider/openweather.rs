use async_trait::async_trait;
use chrono::{DateTime, Local, TimeZone};
use reqwest::Client;
use serde::Deserialize;

use crate::{
    config::ApiSettings,
    error::ServiceError,
    model::{Celsius, Weather, WeatherType},
};

use super::WeatherProvider;

#[derive(Debug, Clone)]
pub struct OpenWeatherProvider {
    settings: ApiSettings,
    http: Client,
}

impl OpenWeatherProvider {
    pub fn new(settings: ApiSettings) -> Self {
        Self {
            settings,
            http: Client::new(),
        }
    }

    /// Fill the URL template. The city is form-encoded, the country code goes in as is.
    pub fn request_url(&self, city: &str, country_code: &str) -> String {
        let city: String = url::form_urlencoded::byte_serialize(city.as_bytes()).collect();

        // Country code last so raw user text is never re-substituted.
        self.settings
            .url_template
            .replace("{api_key}", &self.settings.api_key)
            .replace("{city}", &city)
            .replace("{country_code}", country_code)
    }

    /// One GET against the current-weather endpoint; returns the raw body.
    pub async fn fetch(&self, city: &str, country_code: &str) -> Result<Vec<u8>, ServiceError> {
        let url = self.request_url(city, country_code);
        tracing::debug!(city, country_code, "requesting current weather from OpenWeather");

        let res = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(ServiceError::transport)?;

        let status = res.status();
        let body = res.bytes().await.map_err(ServiceError::transport)?;

        if !status.is_success() {
            return Err(ServiceError::Status {
                status: status.as_u16(),
                body: truncate_body(&String::from_utf8_lossy(&body)),
            });
        }

        tracing::debug!(bytes = body.len(), "received OpenWeather response");
        Ok(body.to_vec())
    }
}

#[derive(Debug, Deserialize)]
struct OwMain {
    temp: f64,
}

/// OpenWeather sends a number; a quoted id is classified the same way.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum OwConditionId {
    Number(serde_json::Number),
    Text(String),
}

impl OwConditionId {
    fn into_code(self) -> String {
        match self {
            OwConditionId::Number(n) => n.to_string(),
            OwConditionId::Text(s) => s,
        }
    }
}

#[derive(Debug, Deserialize)]
struct OwWeather {
    id: OwConditionId,
}

#[derive(Debug, Deserialize)]
struct OwSys {
    sunrise: i64,
    sunset: i64,
}

#[derive(Debug, Deserialize)]
struct OwCurrentResponse {
    name: String,
    main: OwMain,
    weather: Vec<OwWeather>,
    sys: OwSys,
}

/// Decode an OpenWeather current-weather payload.
pub fn parse_openweather_response(body: &[u8]) -> Result<Weather, ServiceError> {
    let parsed: OwCurrentResponse = serde_json::from_slice(body).map_err(ServiceError::decode)?;

    let code = parsed
        .weather
        .into_iter()
        .next()
        .map(|w| w.id.into_code())
        .ok_or(ServiceError::EmptyWeatherList)?;

    let weather_type =
        WeatherType::from_code(&code).ok_or_else(|| ServiceError::UnknownWeatherCode(code))?;

    Ok(Weather {
        temperature: round_celsius(parsed.main.temp)?,
        weather_type,
        sunrise: unix_to_local("sys.sunrise", parsed.sys.sunrise)?,
        sunset: unix_to_local("sys.sunset", parsed.sys.sunset)?,
        city: parsed.name,
    })
}

#[async_trait]
impl WeatherProvider for OpenWeatherProvider {
    async fn get_weather(&self, city: &str, country_code: &str) -> Result<Weather, ServiceError> {
        let body = self.fetch(city, country_code).await?;
        parse_openweather_response(&body)
    }
}

/// Halves go to the even neighbour: 2.5 -> 2, 3.5 -> 4.
fn round_celsius(temp: f64) -> Result<Celsius, ServiceError> {
    let rounded = temp.round_ties_even();
    if !(f64::from(Celsius::MIN)..=f64::from(Celsius::MAX)).contains(&rounded) {
        return Err(ServiceError::TemperatureOutOfRange(temp));
    }
    Ok(rounded as Celsius)
}

fn unix_to_local(field: &'static str, ts: i64) -> Result<DateTime<Local>, ServiceError> {
    Local
        .timestamp_opt(ts, 0)
        .single()
        .ok_or(ServiceError::InvalidTimestamp { field, value: ts })
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((cut, _)) => format!("{}...", &body[..cut]),
        None => body.to_string(),
    }
}

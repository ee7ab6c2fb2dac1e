use crate::{Config, ServiceError, Weather, provider::openweather::OpenWeatherProvider};
use async_trait::async_trait;
use std::fmt::Debug;

pub mod openweather;

#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    /// Current weather for `city` in the country given by its ISO 3166-1 code.
    async fn get_weather(&self, city: &str, country_code: &str) -> Result<Weather, ServiceError>;
}

/// Construct the OpenWeather provider from config.
pub fn provider_from_config(config: &Config) -> anyhow::Result<Box<dyn WeatherProvider>> {
    let settings = config.api_settings().ok_or_else(|| {
        anyhow::anyhow!(
            "No OpenWeather API key configured.\n\
                 Hint: run `weather configure` and enter your API key."
        )
    })?;

    Ok(Box::new(OpenWeatherProvider::new(settings)))
}

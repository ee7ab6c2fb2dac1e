//! Core library for the `weather` CLI.
//!
//! This crate defines:
//! - Configuration & credentials handling
//! - The OpenWeather client and response parsing
//! - Shared domain models and human-readable formatting
//! - The lookup history store
//!
//! It is used by `weather-cli`, but can also be reused by other binaries or services.

pub mod config;
pub mod error;
pub mod format;
pub mod history;
pub mod model;
pub mod provider;

pub use config::{ApiSettings, Config};
pub use error::ServiceError;
pub use format::format_weather;
pub use history::{PlainFileWeatherStorage, WeatherStorage, save_weather};
pub use model::{Celsius, Weather, WeatherType};
pub use provider::{WeatherProvider, provider_from_config};

use chrono::{DateTime, Local};
use std::fmt;

/// Whole degrees Celsius.
pub type Celsius = i32;

/// Weather category derived from the OpenWeather condition id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WeatherType {
    Thunderstorm,
    Drizzle,
    Rain,
    Snow,
    Clear,
    Fog,
    Clouds,
}

/// Condition id prefixes, checked in order. "800" must precede "80".
const CODE_PREFIXES: [(&str, WeatherType); 7] = [
    ("2", WeatherType::Thunderstorm),
    ("3", WeatherType::Drizzle),
    ("5", WeatherType::Rain),
    ("6", WeatherType::Snow),
    ("7", WeatherType::Fog),
    ("800", WeatherType::Clear),
    ("80", WeatherType::Clouds),
];

impl WeatherType {
    /// Classify the textual form of a condition id by its first matching prefix.
    pub fn from_code(code: &str) -> Option<Self> {
        CODE_PREFIXES
            .iter()
            .find(|(prefix, _)| code.starts_with(prefix))
            .map(|(_, weather_type)| *weather_type)
    }

    pub fn label(&self) -> &'static str {
        match self {
            WeatherType::Thunderstorm => "Thunderstorm",
            WeatherType::Drizzle => "Drizzle",
            WeatherType::Rain => "Rain",
            WeatherType::Snow => "Snow",
            WeatherType::Clear => "Clear",
            WeatherType::Fog => "Fog",
            WeatherType::Clouds => "Clouds",
        }
    }
}

impl fmt::Display for WeatherType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Current weather for a city, as reported by the provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Weather {
    pub temperature: Celsius,
    pub weather_type: WeatherType,
    pub sunrise: DateTime<Local>,
    pub sunset: DateTime<Local>,
    pub city: String,
}

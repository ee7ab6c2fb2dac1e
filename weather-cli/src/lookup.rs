use std::{io::Write, process::ExitCode};

use weather_core::{WeatherProvider, WeatherStorage, format_weather, save_weather};

/// How a single lookup ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Shown,
    InvalidCountryCode,
    ServiceUnavailable,
}

impl Outcome {
    pub fn exit_code(self) -> ExitCode {
        match self {
            Outcome::Shown => ExitCode::SUCCESS,
            Outcome::InvalidCountryCode | Outcome::ServiceUnavailable => ExitCode::from(1),
        }
    }
}

/// ISO 3166-1 codes are 1 to 3 characters long.
fn is_valid_country_code(code: &str) -> bool {
    (1..=3).contains(&code.chars().count())
}

/// Fetch, print and record the weather for one city.
///
/// Service failures are reported on `out` and turned into an [`Outcome`];
/// only output and history write failures come back as errors.
pub async fn lookup(
    provider: &dyn WeatherProvider,
    storage: &dyn WeatherStorage,
    city: &str,
    country_code: &str,
    out: &mut dyn Write,
) -> anyhow::Result<Outcome> {
    if !is_valid_country_code(country_code) {
        writeln!(out, "Invalid country code format")?;
        return Ok(Outcome::InvalidCountryCode);
    }

    let weather = match provider.get_weather(city, country_code).await {
        Ok(weather) => weather,
        Err(err) => {
            tracing::warn!(error = %err, city, country_code, "weather lookup failed");
            writeln!(out, "Could not get weather for this city: {city}, {country_code}")?;
            return Ok(Outcome::ServiceUnavailable);
        }
    };

    writeln!(out, "{}", format_weather(&weather))?;
    save_weather(&weather, storage)?;

    Ok(Outcome::Shown)
}

use crate::model::Weather;

/// Render weather as the multi-line text shown to the user and kept in history.
pub fn format_weather(weather: &Weather) -> String {
    format!(
        "{}, temperature {}°C, {}\nSunrise: {}\nSunset: {}\n",
        weather.city,
        weather.temperature,
        weather.weather_type,
        weather.sunrise.format("%H:%M"),
        weather.sunset.format("%H:%M"),
    )
}

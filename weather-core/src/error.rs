use thiserror::Error;

/// Failure to obtain or interpret weather data from the provider.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("weather service request failed: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("weather service answered with status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("weather service returned invalid JSON: {0}")]
    InvalidJson(#[source] serde_json::Error),

    #[error("weather service payload is malformed: {0}")]
    MalformedPayload(#[source] serde_json::Error),

    #[error("weather service payload has no weather conditions")]
    EmptyWeatherList,

    #[error("unrecognized weather condition id '{0}'")]
    UnknownWeatherCode(String),

    #[error("temperature {0} does not fit in whole degrees Celsius")]
    TemperatureOutOfRange(f64),

    #[error("field `{field}` holds an out-of-range timestamp: {value}")]
    InvalidTimestamp { field: &'static str, value: i64 },
}

impl ServiceError {
    /// Strips the request URL, which carries the API key, before wrapping.
    pub(crate) fn transport(err: reqwest::Error) -> Self {
        ServiceError::Transport(err.without_url())
    }

    /// Splits decode failures into broken JSON and well-formed JSON of the wrong shape.
    pub(crate) fn decode(err: serde_json::Error) -> Self {
        match err.classify() {
            serde_json::error::Category::Data => ServiceError::MalformedPayload(err),
            _ => ServiceError::InvalidJson(err),
        }
    }
}

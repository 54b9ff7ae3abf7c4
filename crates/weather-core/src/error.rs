use thiserror::Error;

#[derive(Debug, Error)]
pub enum WeatherError {
    #[error("no coordinates found for city: {0}")]
    CityNotFound(String),

    #[error("{service} request failed with status {status}")]
    Upstream { service: &'static str, status: u16 },

    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("invalid response from weather service: {0}")]
    InvalidResponse(String),

    #[error("invalid timezone: {0}")]
    InvalidTimezone(String),

    #[error("invalid date '{0}': expected YYYY-MM-DD")]
    InvalidDate(String),

    #[error("invalid date range: start {start} is after end {end}")]
    InvalidDateRange { start: String, end: String },

    #[error("invalid datetime '{0}': expected YYYY-MM-DDTHH:MM[:SS] or RFC 3339")]
    InvalidDatetime(String),

    #[error("local time {datetime} does not exist in {timezone}")]
    NonexistentLocalTime { datetime: String, timezone: String },

    #[error("config error: {0}")]
    Config(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, WeatherError>;

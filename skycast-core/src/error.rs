use thiserror::Error;

/// Failures a weather query can surface to its caller. An unresolvable city
/// and an unreachable provider are always reported as different variants.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum WeatherError {
    #[error("City '{0}' not found")]
    LocationNotFound(String),

    #[error("Weather service is unavailable: {0}")]
    Unavailable(String),
}

impl WeatherError {
    pub fn unavailable(reason: impl Into<String>) -> Self {
        WeatherError::Unavailable(reason.into())
    }
}

pub type WeatherResult<T> = Result<T, WeatherError>;

use crate::{
    Config, WeatherResult,
    model::{CurrentConditions, ForecastSeries},
    provider::openweather::OpenWeatherProvider,
    units::UnitSystem,
};
use async_trait::async_trait;
use std::fmt::Debug;

pub mod openweather;

/// Upstream weather source, keyed by a location name and a unit system.
///
/// Implementations must report an unresolvable location as
/// [`WeatherError::LocationNotFound`](crate::WeatherError::LocationNotFound) and
/// every transport problem as
/// [`WeatherError::Unavailable`](crate::WeatherError::Unavailable).
#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    async fn current(&self, location: &str, units: UnitSystem) -> WeatherResult<CurrentConditions>;

    /// Up to 5 days of 3-hour slots, in the order the provider delivers them.
    async fn forecast(&self, location: &str, units: UnitSystem) -> WeatherResult<ForecastSeries>;
}

/// Construct the upstream provider from config.
pub fn provider_from_config(config: &Config) -> anyhow::Result<Box<dyn WeatherProvider>> {
    let provider = OpenWeatherProvider::from_config(config)?;
    Ok(Box::new(provider))
}

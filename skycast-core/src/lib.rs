//! Core library for the `skycast` weather proxy and its front end.
//!
//! This crate defines:
//! - Configuration handling
//! - The upstream provider abstraction and its OpenWeather client
//! - Forecast aggregation and rain detection over 3-hour forecast slots
//! - The query service the HTTP proxy exposes
//! - User preference storage for the front end
//!
//! It is used by `skycast-server` and `skycast-cli`.

pub mod aggregate;
pub mod config;
pub mod error;
pub mod model;
pub mod prefs;
pub mod provider;
pub mod rain;
pub mod service;
pub mod units;

pub use config::Config;
pub use error::{WeatherError, WeatherResult};
pub use model::{
    CurrentConditions, DailySummary, ForecastReport, ForecastSeries, RainAlert, RainAlertReport,
    RawSample, WeatherKind,
};
pub use prefs::{FileStore, InMemoryStore, PreferenceStore, PrefsUpdate, UserId, UserPrefs};
pub use provider::{WeatherProvider, openweather::OpenWeatherProvider};
pub use service::QueryService;
pub use units::{TemperatureSymbol, UnitSystem};

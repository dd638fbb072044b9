//! The three queries the proxy exposes, built on a [`WeatherProvider`].

use chrono::{NaiveDateTime, Utc};
use std::sync::Arc;

use crate::{
    WeatherResult,
    aggregate::aggregate_daily,
    model::{CurrentConditions, ForecastReport, RainAlertReport},
    provider::WeatherProvider,
    rain::evaluate_rain,
    units::UnitSystem,
};

#[derive(Debug, Clone)]
pub struct QueryService {
    provider: Arc<dyn WeatherProvider>,
}

impl QueryService {
    pub fn new(provider: Arc<dyn WeatherProvider>) -> Self {
        Self { provider }
    }

    pub async fn current_weather(&self, location: &str, units: &str) -> WeatherResult<CurrentConditions> {
        let units = UnitSystem::normalize(units);
        self.provider.current(location, units).await
    }

    pub async fn forecast(&self, location: &str, units: &str) -> WeatherResult<ForecastReport> {
        let units = UnitSystem::normalize(units);
        let series = self.provider.forecast(location, units).await?;
        let forecast = aggregate_daily(&series.samples);

        tracing::debug!(
            city = %series.city,
            slots = series.samples.len(),
            days = forecast.len(),
            "aggregated forecast"
        );

        Ok(ForecastReport {
            city: series.city,
            forecast,
        })
    }

    /// Rain check relative to the current UTC time, which is the clock the
    /// provider's forecast slots are expressed in.
    pub async fn rain_alert(
        &self,
        location: &str,
        units: &str,
        hours_ahead: i64,
    ) -> WeatherResult<RainAlertReport> {
        self.rain_alert_at(location, units, hours_ahead, Utc::now().naive_utc())
            .await
    }

    pub async fn rain_alert_at(
        &self,
        location: &str,
        units: &str,
        hours_ahead: i64,
        now: NaiveDateTime,
    ) -> WeatherResult<RainAlertReport> {
        let units = UnitSystem::normalize(units);
        let series = self.provider.forecast(location, units).await?;
        let alert = evaluate_rain(&series.samples, now, hours_ahead);

        if alert.triggered {
            tracing::info!(city = %series.city, slots = alert.qualifying_timestamps.len(), "rain expected");
        }

        Ok(RainAlertReport::new(series.city, alert))
    }
}

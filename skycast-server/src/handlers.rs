//! HTTP handlers for the weather endpoints

use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};
use skycast_core::{
    CurrentConditions, ForecastReport, RainAlertReport, UnitSystem, rain::DEFAULT_HOURS_AHEAD,
};

use crate::AppState;
use crate::error::ApiResult;
use crate::extract::ApiQuery;

fn default_units() -> String {
    UnitSystem::default().as_str().to_string()
}

fn default_hours_ahead() -> i64 {
    DEFAULT_HOURS_AHEAD
}

/// Query parameters for `/weather` and `/forecast`
#[derive(Debug, Deserialize)]
pub struct CityQuery {
    pub city: String,
    #[serde(default = "default_units")]
    pub units: String,
}

/// Query parameters for `/rain_alert`
#[derive(Debug, Deserialize)]
pub struct RainAlertQuery {
    pub city: String,
    #[serde(default = "default_units")]
    pub units: String,
    // Older clients send the misspelled `hours_ahed`.
    #[serde(default = "default_hours_ahead", alias = "hours_ahed")]
    pub hours_ahead: i64,
}

#[derive(Debug, Serialize)]
pub struct Pong {
    pub ping: &'static str,
}

pub async fn ping() -> Json<Pong> {
    Json(Pong { ping: "pong!" })
}

/// Current conditions for a city
pub async fn current_weather(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<CityQuery>,
) -> ApiResult<Json<CurrentConditions>> {
    let current = state
        .service
        .current_weather(&query.city, &query.units)
        .await?;
    Ok(Json(current))
}

/// Up to five daily summaries for a city
pub async fn forecast(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<CityQuery>,
) -> ApiResult<Json<ForecastReport>> {
    let report = state.service.forecast(&query.city, &query.units).await?;
    Ok(Json(report))
}

pub async fn rain_alert(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<RainAlertQuery>,
) -> ApiResult<Json<RainAlertReport>> {
    let report = state
        .service
        .rain_alert(&query.city, &query.units, query.hours_ahead)
        .await?;
    Ok(Json(report))
}

use async_trait::async_trait;
use chrono::{DateTime, NaiveDateTime};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, de::DeserializeOwned};
use std::time::Duration;

use crate::{
    Config, WeatherError, WeatherResult,
    model::{CurrentConditions, ForecastSeries, RawSample, TIMESTAMP_FORMAT, WeatherKind},
    units::UnitSystem,
};

use super::WeatherProvider;

#[derive(Debug, Clone)]
pub struct OpenWeatherProvider {
    api_key: String,
    base_url: String,
    lang: String,
    http: Client,
}

impl OpenWeatherProvider {
    pub fn new(api_key: String) -> Self {
        let defaults = crate::config::OpenWeatherConfig::default();
        Self {
            api_key,
            base_url: defaults.base_url,
            lang: defaults.lang,
            http: Client::new(),
        }
    }

    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let api_key = config.api_key()?.to_owned();
        let ow = &config.openweather;

        let http = Client::builder()
            .timeout(Duration::from_secs(ow.timeout_secs))
            .build()?;

        Ok(Self {
            api_key,
            base_url: ow.base_url.trim_end_matches('/').to_string(),
            lang: ow.lang.clone(),
            http,
        })
    }

    /// Point the client at another host, e.g. a mock server.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    async fn fetch<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        location: &str,
        units: UnitSystem,
    ) -> WeatherResult<T> {
        let url = format!("{}/data/2.5/{}", self.base_url, endpoint);

        tracing::debug!(%url, location, units = units.as_str(), "querying OpenWeather");

        let res = self
            .http
            .get(&url)
            .query(&[
                ("q", location),
                ("appid", self.api_key.as_str()),
                ("units", units.as_str()),
                ("lang", self.lang.as_str()),
            ])
            .send()
            .await
            .map_err(|e| {
                tracing::warn!(endpoint, error = %e, "OpenWeather request failed");
                WeatherError::unavailable(format!("Failed to reach OpenWeather ({endpoint}): {e}"))
            })?;

        let status = res.status();
        let body = res.text().await.map_err(|e| {
            WeatherError::unavailable(format!("Failed to read OpenWeather {endpoint} response body: {e}"))
        })?;

        if status == StatusCode::NOT_FOUND {
            tracing::info!(location, "OpenWeather could not resolve location");
            return Err(WeatherError::LocationNotFound(location.to_string()));
        }

        if !status.is_success() {
            tracing::warn!(endpoint, %status, body = %truncate_body(&body), "OpenWeather returned an error");
            return Err(WeatherError::unavailable(format!(
                "OpenWeather {} request failed with status {}: {}",
                endpoint,
                status,
                truncate_body(&body),
            )));
        }

        serde_json::from_str(&body).map_err(|e| {
            tracing::warn!(endpoint, error = %e, "OpenWeather returned malformed JSON");
            WeatherError::unavailable(format!("Failed to parse OpenWeather {endpoint} JSON: {e}"))
        })
    }
}

#[derive(Debug, Deserialize)]
struct OwMain {
    temp: f64,
    feels_like: f64,
}

#[derive(Debug, Deserialize)]
struct OwWeather {
    main: String,
    description: String,
}

#[derive(Debug, Deserialize)]
struct OwCurrentResponse {
    name: String,
    main: OwMain,
    #[serde(default)]
    weather: Vec<OwWeather>,
}

#[derive(Debug, Deserialize)]
struct OwCity {
    name: String,
}

#[derive(Debug, Deserialize)]
struct OwForecastEntry {
    dt: i64,
    dt_txt: Option<String>,
    main: OwMain,
    #[serde(default)]
    weather: Vec<OwWeather>,
    pop: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct OwForecastResponse {
    city: OwCity,
    #[serde(default)]
    list: Vec<OwForecastEntry>,
}

impl OwForecastEntry {
    fn timestamp(&self) -> Option<NaiveDateTime> {
        self.dt_txt
            .as_deref()
            .and_then(|txt| NaiveDateTime::parse_from_str(txt, TIMESTAMP_FORMAT).ok())
            .or_else(|| DateTime::from_timestamp(self.dt, 0).map(|dt| dt.naive_utc()))
    }

    fn into_sample(self) -> Option<RawSample> {
        let timestamp = self.timestamp()?;
        let (kind, description) = describe(&self.weather);

        Some(RawSample {
            timestamp,
            temperature: self.main.temp,
            feels_like: self.main.feels_like,
            weather_kind: kind,
            weather_description: description,
            precipitation_probability: self.pop.unwrap_or(0.0),
        })
    }
}

fn describe(weather: &[OwWeather]) -> (WeatherKind, String) {
    weather
        .first()
        .map(|w| (WeatherKind::from_label(&w.main), w.description.clone()))
        .unwrap_or_else(|| (WeatherKind::Unknown, "Unknown".to_string()))
}

#[async_trait]
impl WeatherProvider for OpenWeatherProvider {
    async fn current(&self, location: &str, units: UnitSystem) -> WeatherResult<CurrentConditions> {
        let parsed: OwCurrentResponse = self.fetch("weather", location, units).await?;
        let (_, description) = describe(&parsed.weather);

        Ok(CurrentConditions {
            city: parsed.name,
            temperature: parsed.main.temp,
            feels_like: parsed.main.feels_like,
            weather: description,
        })
    }

    async fn forecast(&self, location: &str, units: UnitSystem) -> WeatherResult<ForecastSeries> {
        let parsed: OwForecastResponse = self.fetch("forecast", location, units).await?;

        let total = parsed.list.len();
        let samples: Vec<RawSample> = parsed
            .list
            .into_iter()
            .filter_map(OwForecastEntry::into_sample)
            .collect();

        if samples.len() < total {
            tracing::warn!(dropped = total - samples.len(), "skipped forecast slots without a usable timestamp");
        }

        Ok(ForecastSeries {
            city: parsed.city.name,
            samples,
        })
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn provider(server: &MockServer) -> OpenWeatherProvider {
        OpenWeatherProvider::new("TEST_KEY".into()).with_base_url(server.uri())
    }

    #[tokio::test]
    async fn current_maps_main_fields() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/data/2.5/weather"))
            .and(query_param("q", "Lviv"))
            .and(query_param("appid", "TEST_KEY"))
            .and(query_param("units", "imperial"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "name": "Lviv",
                "dt": 1717000000,
                "main": { "temp": 61.3, "feels_like": 60.1, "humidity": 70 },
                "weather": [{ "main": "Clouds", "description": "broken clouds" }]
            })))
            .mount(&server)
            .await;

        let current = provider(&server)
            .current("Lviv", UnitSystem::Imperial)
            .await
            .unwrap();

        assert_eq!(current.city, "Lviv");
        assert_eq!(current.temperature, 61.3);
        assert_eq!(current.feels_like, 60.1);
        assert_eq!(current.weather, "broken clouds");
    }

    #[tokio::test]
    async fn upstream_404_is_location_not_found() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/data/2.5/weather"))
            .respond_with(ResponseTemplate::new(404).set_body_json(serde_json::json!({
                "cod": "404",
                "message": "city not found"
            })))
            .mount(&server)
            .await;

        let err = provider(&server)
            .current("Atlantis", UnitSystem::Metric)
            .await
            .unwrap_err();

        assert_eq!(err, WeatherError::LocationNotFound("Atlantis".into()));
    }

    #[tokio::test]
    async fn upstream_5xx_is_unavailable() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/data/2.5/forecast"))
            .respond_with(ResponseTemplate::new(502))
            .mount(&server)
            .await;

        let err = provider(&server)
            .forecast("Kyiv", UnitSystem::Metric)
            .await
            .unwrap_err();

        assert!(matches!(err, WeatherError::Unavailable(_)));
    }

    #[tokio::test]
    async fn malformed_body_is_unavailable() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/data/2.5/weather"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let err = provider(&server)
            .current("Kyiv", UnitSystem::Metric)
            .await
            .unwrap_err();

        assert!(err.to_string().contains("Failed to parse OpenWeather weather JSON"));
    }

    #[tokio::test]
    async fn refused_connection_is_unavailable() {
        let err = OpenWeatherProvider::new("KEY".into())
            .with_base_url("http://127.0.0.1:1")
            .current("Kyiv", UnitSystem::Metric)
            .await
            .unwrap_err();

        assert!(matches!(err, WeatherError::Unavailable(_)));
    }

    #[tokio::test]
    async fn forecast_parses_slots_and_defaults_pop() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/data/2.5/forecast"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "city": { "name": "Odesa", "country": "UA" },
                "list": [
                    {
                        "dt": 1717146000,
                        "dt_txt": "2024-05-31 09:00:00",
                        "main": { "temp": 21.4, "feels_like": 21.0 },
                        "weather": [{ "main": "Rain", "description": "light rain" }],
                        "pop": 0.35
                    },
                    {
                        "dt": 1717156800,
                        "dt_txt": "2024-05-31 12:00:00",
                        "main": { "temp": 24.0, "feels_like": 23.8 },
                        "weather": [{ "main": "Clear", "description": "clear sky" }]
                    }
                ]
            })))
            .mount(&server)
            .await;

        let series = provider(&server)
            .forecast("Odesa", UnitSystem::Metric)
            .await
            .unwrap();

        assert_eq!(series.city, "Odesa");
        assert_eq!(series.samples.len(), 2);

        let first = &series.samples[0];
        assert_eq!(first.timestamp.to_string(), "2024-05-31 09:00:00");
        assert_eq!(first.weather_kind, WeatherKind::Rain);
        assert_eq!(first.precipitation_probability, 0.35);

        let second = &series.samples[1];
        assert_eq!(second.weather_kind, WeatherKind::Clear);
        assert_eq!(second.precipitation_probability, 0.0);
    }

    #[test]
    fn timestamp_falls_back_to_unix_seconds() {
        let entry = OwForecastEntry {
            dt: 1717146000,
            dt_txt: None,
            main: OwMain { temp: 0.0, feels_like: 0.0 },
            weather: Vec::new(),
            pop: None,
        };

        assert_eq!(entry.timestamp().unwrap().to_string(), "2024-05-31 09:00:00");
    }

    #[test]
    fn truncate_body_respects_char_boundaries() {
        let long = "ж".repeat(300);
        let out = truncate_body(&long);

        assert!(out.ends_with("..."));
        assert_eq!(out.chars().count(), 203);
    }
}

use anyhow::{Result, anyhow, bail};
use reqwest::Client;
use serde::{Deserialize, de::DeserializeOwned};
use skycast_core::{CurrentConditions, ForecastReport, RainAlertReport, UnitSystem};
use std::time::Duration;

/// Thin client for the skycast proxy endpoints.
#[derive(Debug, Clone)]
pub struct ProxyClient {
    base_url: String,
    http: Client,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

impl ProxyClient {
    pub fn new(base_url: &str) -> Result<Self> {
        let http = Client::builder().timeout(Duration::from_secs(30)).build()?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http,
        })
    }

    pub async fn weather(&self, city: &str, units: UnitSystem) -> Result<CurrentConditions> {
        self.get("weather", &[("city", city), ("units", units.as_str())])
            .await
    }

    pub async fn forecast(&self, city: &str, units: UnitSystem) -> Result<ForecastReport> {
        self.get("forecast", &[("city", city), ("units", units.as_str())])
            .await
    }

    pub async fn rain_alert(
        &self,
        city: &str,
        units: UnitSystem,
        hours_ahead: i64,
    ) -> Result<RainAlertReport> {
        let hours = hours_ahead.to_string();
        self.get(
            "rain_alert",
            &[("city", city), ("units", units.as_str()), ("hours_ahead", hours.as_str())],
        )
        .await
    }

    /// Error bodies carry a user-facing message; anything else without one
    /// means the service itself is down.
    async fn get<T: DeserializeOwned>(&self, endpoint: &str, query: &[(&str, &str)]) -> Result<T> {
        let url = format!("{}/{}", self.base_url, endpoint);

        let res = self.http.get(&url).query(query).send().await.map_err(|e| {
            tracing::debug!(%url, error = %e, "proxy request failed");
            anyhow!("Error connecting to server")
        })?;

        let status = res.status();
        let body = res
            .text()
            .await
            .map_err(|_| anyhow!("Weather service is unavailable"))?;

        if !status.is_success() {
            return match serde_json::from_str::<ErrorBody>(&body) {
                Ok(err) => Err(anyhow!(err.error)),
                Err(_) => {
                    tracing::debug!(%url, %status, "proxy returned an error without a message");
                    bail!("Weather service is unavailable")
                }
            };
        }

        serde_json::from_str(&body).map_err(|e| {
            tracing::debug!(%url, error = %e, "unexpected proxy response");
            anyhow!("Weather service is unavailable")
        })
    }
}

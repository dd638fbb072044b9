use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Format the provider uses for forecast slots, and the one we echo back.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Closed set of weather groups the upstream client maps onto.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeatherKind {
    Thunderstorm,
    Drizzle,
    Rain,
    Snow,
    Atmosphere,
    Clear,
    Clouds,
    #[default]
    Unknown,
}

impl WeatherKind {
    /// Map a provider group label (e.g. OpenWeather's `main` field).
    pub fn from_label(label: &str) -> Self {
        let lower = label.trim().to_lowercase();

        match lower.as_str() {
            "thunderstorm" => WeatherKind::Thunderstorm,
            "drizzle" => WeatherKind::Drizzle,
            "snow" => WeatherKind::Snow,
            "clear" => WeatherKind::Clear,
            "clouds" => WeatherKind::Clouds,
            "mist" | "smoke" | "haze" | "dust" | "fog" | "sand" | "ash" | "squall" | "tornado" => {
                WeatherKind::Atmosphere
            }
            other if other.contains("rain") => WeatherKind::Rain,
            _ => WeatherKind::Unknown,
        }
    }

    pub fn is_rain(&self) -> bool {
        matches!(self, WeatherKind::Rain)
    }
}

/// One upstream observation or forecast slot.
#[derive(Debug, Clone, PartialEq)]
pub struct RawSample {
    pub timestamp: NaiveDateTime,
    pub temperature: f64,
    pub feels_like: f64,
    pub weather_kind: WeatherKind,
    pub weather_description: String,
    /// Probability of precipitation in `[0, 1]`; zero when the provider omits it.
    pub precipitation_probability: f64,
}

/// A forecast stream as returned by the provider, with the resolved city name.
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastSeries {
    pub city: String,
    pub samples: Vec<RawSample>,
}

/// Current conditions, shaped as the `/weather` endpoint returns them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentConditions {
    pub city: String,
    pub temperature: f64,
    pub feels_like: f64,
    pub weather: String,
}

/// One aggregated calendar day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailySummary {
    pub date: NaiveDate,
    pub temp_day: f64,
    pub temp_night: f64,
    pub feels_like_day: f64,
    pub feels_like_night: f64,
    #[serde(rename = "weather")]
    pub weather_description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastReport {
    pub city: String,
    pub forecast: Vec<DailySummary>,
}

/// Outcome of the rain predicate.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RainAlert {
    pub triggered: bool,
    pub qualifying_timestamps: Vec<NaiveDateTime>,
}

/// `/rain_alert` body. `alert_times` is omitted when no alert fired.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RainAlertReport {
    pub alert: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub alert_times: Vec<String>,
    pub city: String,
}

impl RainAlertReport {
    pub fn new(city: String, alert: RainAlert) -> Self {
        let alert_times = alert
            .qualifying_timestamps
            .iter()
            .map(|ts| ts.format(TIMESTAMP_FORMAT).to_string())
            .collect();

        Self {
            alert: alert.triggered,
            alert_times,
            city,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn weather_kind_maps_provider_groups() {
        assert_eq!(WeatherKind::from_label("Rain"), WeatherKind::Rain);
        assert_eq!(WeatherKind::from_label("light rain"), WeatherKind::Rain);
        assert_eq!(WeatherKind::from_label("Clouds"), WeatherKind::Clouds);
        assert_eq!(WeatherKind::from_label("Mist"), WeatherKind::Atmosphere);
        assert_eq!(WeatherKind::from_label("whatever"), WeatherKind::Unknown);
    }

    #[test]
    fn only_rain_is_rain_like() {
        assert!(WeatherKind::Rain.is_rain());
        assert!(!WeatherKind::Drizzle.is_rain());
        assert!(!WeatherKind::Thunderstorm.is_rain());
    }

    #[test]
    fn quiet_rain_report_omits_times() {
        let report = RainAlertReport::new("Kyiv".into(), RainAlert::default());
        let json = serde_json::to_value(&report).unwrap();

        assert_eq!(json, serde_json::json!({ "alert": false, "city": "Kyiv" }));
    }

    #[test]
    fn triggered_rain_report_formats_times() {
        let ts = NaiveDate::from_ymd_opt(2024, 5, 1)
            .unwrap()
            .and_hms_opt(15, 0, 0)
            .unwrap();
        let alert = RainAlert {
            triggered: true,
            qualifying_timestamps: vec![ts],
        };

        let json = serde_json::to_value(RainAlertReport::new("Kyiv".into(), alert)).unwrap();

        assert_eq!(json["alert"], true);
        assert_eq!(json["alert_times"], serde_json::json!(["2024-05-01 15:00:00"]));
    }

    #[test]
    fn daily_summary_uses_weather_key() {
        let summary = DailySummary {
            date: NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
            temp_day: 12.5,
            temp_night: 4.0,
            feels_like_day: 11.0,
            feels_like_night: 1.5,
            weather_description: "light rain".into(),
        };

        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["date"], "2024-05-01");
        assert_eq!(json["weather"], "light rain");
    }
}

//! Human-readable text for proxy responses.

use skycast_core::{CurrentConditions, ForecastReport, RainAlertReport, TemperatureSymbol};
use std::fmt::Write;

pub fn current(data: &CurrentConditions, unit: TemperatureSymbol) -> String {
    format!(
        "City: {}\nTemperature: {}{unit}\nFeels like: {}{unit}\nWeather: {}",
        data.city, data.temperature, data.feels_like, data.weather
    )
}

pub fn forecast(report: &ForecastReport, unit: TemperatureSymbol) -> String {
    let mut text = format!("5 day forecast for {}:\n", report.city);

    for day in &report.forecast {
        // Writing into a String cannot fail.
        let _ = write!(
            text,
            "\n{}:\nDaytime: {}{unit} feels like {}{unit}\nNighttime: {}{unit} feels like {}{unit}\n{}\n",
            day.date,
            day.temp_day,
            day.feels_like_day,
            day.temp_night,
            day.feels_like_night,
            day.weather_description,
        );
    }

    text
}

/// `None` when the report carries no alert.
pub fn rain_notice(report: &RainAlertReport) -> Option<String> {
    if !report.alert {
        return None;
    }

    let times: Vec<&str> = report
        .alert_times
        .iter()
        .map(|t| t.split_once(' ').map_or(t.as_str(), |(_, time)| time))
        .collect();

    Some(format!(
        "Rain is expected in the near future in {} ({})",
        report.city,
        times.join(", ")
    ))
}

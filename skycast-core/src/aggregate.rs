//! Collapse a 3-hour forecast stream into one summary per calendar day.

use std::collections::HashMap;

use chrono::NaiveDate;

use crate::model::{DailySummary, RawSample};

/// Maximum number of days a forecast report carries.
pub const MAX_FORECAST_DAYS: usize = 5;

#[derive(Debug)]
struct DayAccumulator {
    date: NaiveDate,
    temp_day: f64,
    temp_night: f64,
    feels_like_day: f64,
    feels_like_night: f64,
    weather_description: String,
}

impl DayAccumulator {
    fn start(date: NaiveDate, sample: &RawSample) -> Self {
        Self {
            date,
            temp_day: sample.temperature,
            temp_night: sample.temperature,
            feels_like_day: sample.feels_like,
            feels_like_night: sample.feels_like,
            weather_description: sample.weather_description.clone(),
        }
    }

    // The description stays with the first sample of the day.
    fn absorb(&mut self, sample: &RawSample) {
        self.temp_day = self.temp_day.max(sample.temperature);
        self.temp_night = self.temp_night.min(sample.temperature);
        self.feels_like_day = self.feels_like_day.max(sample.feels_like);
        self.feels_like_night = self.feels_like_night.min(sample.feels_like);
    }

    fn finish(self) -> DailySummary {
        DailySummary {
            date: self.date,
            temp_day: round1(self.temp_day),
            temp_night: round1(self.temp_night),
            feels_like_day: round1(self.feels_like_day),
            feels_like_night: round1(self.feels_like_night),
            weather_description: self.weather_description,
        }
    }
}

/// Group samples by the date part of their timestamp and emit at most
/// [`MAX_FORECAST_DAYS`] summaries in order of first appearance.
///
/// Rounding to one decimal happens on emission, after the extremes are known.
pub fn aggregate_daily(samples: &[RawSample]) -> Vec<DailySummary> {
    let mut days: Vec<DayAccumulator> = Vec::new();
    let mut index: HashMap<NaiveDate, usize> = HashMap::new();

    for sample in samples {
        let date = sample.timestamp.date();

        match index.get(&date) {
            Some(&i) => days[i].absorb(sample),
            None => {
                index.insert(date, days.len());
                days.push(DayAccumulator::start(date, sample));
            }
        }
    }

    days.into_iter()
        .take(MAX_FORECAST_DAYS)
        .map(DayAccumulator::finish)
        .collect()
}

// Decimal formatting rounds the exact binary value, ties to even.
fn round1(value: f64) -> f64 {
    format!("{value:.1}").parse().unwrap_or(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::WeatherKind;
    use chrono::{Datelike, Duration, NaiveDateTime};
    use proptest::prelude::*;

    fn at(day: u32, hour: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, day)
            .unwrap()
            .and_hms_opt(hour, 0, 0)
            .unwrap()
    }

    fn sample(ts: NaiveDateTime, temp: f64, feels: f64, desc: &str) -> RawSample {
        RawSample {
            timestamp: ts,
            temperature: temp,
            feels_like: feels,
            weather_kind: WeatherKind::Clouds,
            weather_description: desc.to_string(),
            precipitation_probability: 0.0,
        }
    }

    #[test]
    fn empty_input_yields_no_days() {
        assert!(aggregate_daily(&[]).is_empty());
    }

    #[test]
    fn single_sample_day_has_equal_extremes() {
        let out = aggregate_daily(&[sample(at(1, 12), 7.04, 5.0, "clear sky")]);

        assert_eq!(out.len(), 1);
        assert_eq!(out[0].temp_day, 7.0);
        assert_eq!(out[0].temp_night, 7.0);
        assert_eq!(out[0].feels_like_day, out[0].feels_like_night);
    }

    #[test]
    fn extremes_and_first_description_per_day() {
        let samples = vec![
            sample(at(1, 0), 3.0, 1.0, "overcast clouds"),
            sample(at(1, 12), 9.5, 8.0, "light rain"),
            sample(at(1, 21), 1.5, -2.0, "clear sky"),
            sample(at(2, 0), 0.0, -3.0, "snow"),
        ];

        let out = aggregate_daily(&samples);

        assert_eq!(out.len(), 2);
        assert_eq!(out[0].date, NaiveDate::from_ymd_opt(2024, 3, 1).unwrap());
        assert_eq!(out[0].temp_day, 9.5);
        assert_eq!(out[0].temp_night, 1.5);
        assert_eq!(out[0].feels_like_day, 8.0);
        assert_eq!(out[0].feels_like_night, -2.0);
        assert_eq!(out[0].weather_description, "overcast clouds");
        assert_eq!(out[1].weather_description, "snow");
    }

    #[test]
    fn rounds_after_taking_extremes() {
        let samples = vec![
            sample(at(1, 9), 5.26, 5.26, "a"),
            sample(at(1, 21), 5.24, 5.24, "b"),
        ];

        let out = aggregate_daily(&samples);

        assert_eq!(out[0].temp_day, 5.3);
        assert_eq!(out[0].temp_night, 5.2);
    }

    #[test]
    fn ties_round_on_the_stored_value() {
        assert_eq!(round1(0.15), 0.1);
        assert_eq!(round1(0.25), 0.2);
        assert_eq!(round1(0.35), 0.3);
        assert_eq!(round1(12.25), 12.2);
        assert_eq!(round1(-0.25), -0.2);
        assert_eq!(round1(12.75), 12.8);
        assert_eq!(round1(-3.0), -3.0);
    }

    #[test]
    fn truncates_to_five_days_in_first_seen_order() {
        let samples: Vec<RawSample> = (1..=7)
            .map(|day| sample(at(day, 6), day as f64, day as f64, "x"))
            .collect();

        let out = aggregate_daily(&samples);

        assert_eq!(out.len(), MAX_FORECAST_DAYS);
        let days: Vec<u32> = out.iter().map(|d| d.date.day()).collect();
        assert_eq!(days, vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn full_five_day_stream_gives_five_days() {
        let start = at(1, 0);
        let samples: Vec<RawSample> = (0..40)
            .map(|i| sample(start + Duration::hours(3 * i), i as f64, i as f64 - 2.0, "x"))
            .collect();

        let out = aggregate_daily(&samples);

        assert_eq!(out.len(), 5);
        assert_eq!(out[0].temp_night, 0.0);
        assert_eq!(out[0].temp_day, 7.0);
    }

    proptest! {
        #[test]
        fn output_is_capped_and_ordered(
            temps in prop::collection::vec((-40.0f64..45.0, -50.0f64..45.0), 0..60)
        ) {
            let start = at(1, 0);
            let samples: Vec<RawSample> = temps
                .iter()
                .enumerate()
                .map(|(i, (t, f))| sample(start + Duration::hours(3 * i as i64), *t, *f, "x"))
                .collect();

            let distinct_days = samples
                .iter()
                .map(|s| s.timestamp.date())
                .collect::<std::collections::HashSet<_>>()
                .len();

            let out = aggregate_daily(&samples);

            prop_assert_eq!(out.len(), distinct_days.min(MAX_FORECAST_DAYS));
            for day in &out {
                prop_assert!(day.temp_day >= day.temp_night);
                prop_assert!(day.feels_like_day >= day.feels_like_night);
            }
            for pair in out.windows(2) {
                prop_assert!(pair[0].date < pair[1].date);
            }
        }
    }
}

//! Look-ahead rain detection over a forecast stream.

use chrono::{NaiveDateTime, TimeDelta};

use crate::model::{RainAlert, RawSample};

/// Default look-ahead used by the rain watcher and the `/rain_alert` endpoint.
pub const DEFAULT_HOURS_AHEAD: i64 = 6;

/// Report every slot in `(.., now + hours_ahead]` where rain is forecast with
/// a non-zero probability.
///
/// Samples are scanned in timestamp order and the scan ends at the first slot
/// past the cutoff. The input is sorted (stably) before scanning, so callers do
/// not need to guarantee provider ordering.
pub fn evaluate_rain(samples: &[RawSample], now: NaiveDateTime, hours_ahead: i64) -> RainAlert {
    let cutoff = horizon_end(now, hours_ahead);

    let mut ordered: Vec<&RawSample> = samples.iter().collect();
    ordered.sort_by_key(|s| s.timestamp);

    let mut alert = RainAlert::default();

    for sample in ordered {
        if sample.timestamp > cutoff {
            break;
        }

        if sample.weather_kind.is_rain() && sample.precipitation_probability > 0.0 {
            alert.triggered = true;
            alert.qualifying_timestamps.push(sample.timestamp);
        }
    }

    alert
}

// Horizons past chrono's range clamp to the earliest/latest representable time.
fn horizon_end(now: NaiveDateTime, hours_ahead: i64) -> NaiveDateTime {
    TimeDelta::try_hours(hours_ahead)
        .and_then(|delta| now.checked_add_signed(delta))
        .unwrap_or(if hours_ahead < 0 {
            NaiveDateTime::MIN
        } else {
            NaiveDateTime::MAX
        })
}

//! Periodic rain check for every user with a default city and unit.

use anyhow::Result;
use skycast_core::{PreferenceStore, UserId};
use std::time::Duration;
use tokio::time::MissedTickBehavior;

use crate::{client::ProxyClient, render};

/// One notice per user whose city expects rain.
pub async fn check_all(
    store: &dyn PreferenceStore,
    client: &ProxyClient,
    hours_ahead: i64,
) -> Result<Vec<(UserId, String)>> {
    let mut notices = Vec::new();

    for (id, prefs) in store.all().await? {
        let (Some(city), Some(unit)) = (prefs.city.as_deref(), prefs.unit) else {
            continue;
        };

        match client.rain_alert(city, unit.unit_system(), hours_ahead).await {
            Ok(report) => {
                if let Some(notice) = render::rain_notice(&report) {
                    notices.push((id, notice));
                }
            }
            Err(e) => tracing::warn!(user = id, city, "rain check failed: {e}"),
        }
    }

    Ok(notices)
}

/// Poll on a fixed period until interrupted, or for a single cycle with `once`.
/// A cycle always finishes before the next tick is awaited.
pub async fn run(
    store: &dyn PreferenceStore,
    client: &ProxyClient,
    hours_ahead: i64,
    period: Duration,
    once: bool,
) -> Result<()> {
    let mut ticker = tokio::time::interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        ticker.tick().await;
        tracing::info!("checking rain for stored users");

        for (id, notice) in check_all(store, client, hours_ahead).await? {
            println!("[user {id}] {notice}");
        }

        if once {
            return Ok(());
        }
    }
}

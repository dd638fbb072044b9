use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use inquire::{Password, Select, Text, validator::Validation};
use skycast_core::{
    Config, FileStore, PreferenceStore, PrefsUpdate, TemperatureSymbol, UserId, UserPrefs,
};
use std::time::Duration;

use crate::{client::ProxyClient, render, watch};

const SETUP_HINT: &str = "First, set the city and measurement system. (skycast settings)";

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "skycast", version, about = "Weather and rain alerts from the skycast proxy")]
pub struct Cli {
    /// User whose preferences are read and written; defaults to `client.user_id` from config.
    #[arg(long, global = true)]
    pub user: Option<UserId>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the OpenWeather API key and the proxy address.
    Configure,

    /// Choose the default city and temperature unit.
    Settings,

    /// Show current weather.
    Weather {
        /// City to look up; the default city when absent.
        city: Option<String>,

        /// Repeat the last looked-up city instead of the default one.
        #[arg(long, conflicts_with = "city")]
        last: bool,
    },

    /// Show the 5 day forecast.
    Forecast {
        city: Option<String>,

        #[arg(long, conflicts_with = "city")]
        last: bool,
    },

    /// Check every stored user for upcoming rain on a fixed interval.
    Watch {
        /// Run a single check and exit.
        #[arg(long)]
        once: bool,
    },
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        let mut config = Config::load()?.with_env_overrides();
        let user = self.user.unwrap_or(config.client.user_id);

        let store = FileStore::open_default()?;
        let client = ProxyClient::new(&config.client.server_url)?;

        match self.command {
            Command::Configure => configure(&mut config),
            Command::Settings => settings(&store, user).await,
            Command::Weather { city, last } => {
                let (city, unit) = target(&store, user, city, last).await?;
                let data = client.weather(&city, unit.unit_system()).await?;
                println!("{}", render::current(&data, unit));
                Ok(())
            }
            Command::Forecast { city, last } => {
                let (city, unit) = target(&store, user, city, last).await?;
                let report = client.forecast(&city, unit.unit_system()).await?;
                print!("{}", render::forecast(&report, unit));
                Ok(())
            }
            Command::Watch { once } => {
                let period = Duration::from_secs(config.client.poll_interval_secs.max(1));
                watch::run(&store, &client, config.client.hours_ahead, period, once).await
            }
        }
    }
}

fn configure(config: &mut Config) -> Result<()> {
    let api_key = Password::new("OpenWeather API key:")
        .without_confirmation()
        .prompt()
        .context("Failed to read API key")?;

    let server_url = Text::new("Proxy URL:")
        .with_default(&config.client.server_url)
        .prompt()
        .context("Failed to read proxy URL")?;

    if !api_key.trim().is_empty() {
        config.set_api_key(api_key.trim().to_string());
    }
    config.client.server_url = server_url.trim().to_string();
    config.save()?;

    println!("Saved configuration to {}", Config::config_file_path()?.display());
    Ok(())
}

async fn settings(store: &dyn PreferenceStore, user: UserId) -> Result<()> {
    let existing = store.get(user).await?;

    let (ask_unit, ask_city) = match existing.as_ref() {
        Some(prefs) if prefs.is_watchable() => {
            println!("Welcome back!");
            let choice = Select::new("What do you want to change?", vec!["Default city", "Measurement system"])
                .prompt()
                .context("Failed to read choice")?;
            (choice == "Measurement system", choice == "Default city")
        }
        _ => (true, true),
    };

    let mut update = PrefsUpdate::default();

    if ask_unit {
        let unit = Select::new("Select a temperature measurement system:", TemperatureSymbol::all().to_vec())
            .prompt()
            .context("Failed to read unit")?;
        update.unit = Some(unit);
    }

    if ask_city {
        let city = Text::new("Enter default city:")
            .with_validator(|input: &str| {
                Ok(match validate_city(input) {
                    Ok(_) => Validation::Valid,
                    Err(e) => Validation::Invalid(e.to_string().into()),
                })
            })
            .prompt()
            .context("Failed to read city")?;
        update.city = Some(validate_city(&city)?);
    }

    let saved = store.upsert(user, update).await?;
    if let Some(city) = &saved.city {
        println!("Default city: {city}\nRun `skycast weather` to see the forecast");
    }
    Ok(())
}

/// Resolve city and unit for a lookup, recording an explicit city as the last one.
async fn target(
    store: &dyn PreferenceStore,
    user: UserId,
    city: Option<String>,
    last: bool,
) -> Result<(String, TemperatureSymbol)> {
    let prefs = store.get(user).await?;
    let resolved = resolve_target(prefs.as_ref(), city.as_deref(), last)?;

    if city.is_some() {
        store
            .upsert(
                user,
                PrefsUpdate {
                    last_city: Some(resolved.0.clone()),
                    ..Default::default()
                },
            )
            .await?;
    }

    Ok(resolved)
}

fn resolve_target(
    prefs: Option<&UserPrefs>,
    city: Option<&str>,
    last: bool,
) -> Result<(String, TemperatureSymbol)> {
    let Some(prefs) = prefs else {
        bail!(SETUP_HINT);
    };

    let city = match city {
        Some(c) => Some(c.trim().to_string()),
        None if last => prefs.last_city.clone().or_else(|| prefs.city.clone()),
        None => prefs.city.clone(),
    };

    match city.filter(|c| !c.is_empty()) {
        Some(city) => Ok((city, prefs.unit.unwrap_or(TemperatureSymbol::Celsius))),
        None => bail!(SETUP_HINT),
    }
}

/// City names are one or more alphabetic words; hyphens and apostrophes are
/// allowed inside a word.
fn validate_city(input: &str) -> Result<String> {
    let words: Vec<&str> = input.split_whitespace().collect();

    let valid = !words.is_empty()
        && words.iter().all(|w| {
            w.chars().any(char::is_alphabetic)
                && w.chars().all(|c| c.is_alphabetic() || c == '-' || c == '\'')
        });

    if !valid {
        bail!("Please enter the correct city name");
    }

    Ok(words.join(" "))
}

use std::{io::Write, process::ExitCode};

use anyhow::Context;
use clap::Parser;
use tracing::info;
use weather_core::{Config, ConfigError, HistoryStore, Settings, WeatherClient};

use crate::{
    render,
    shell::{InquirePrompter, Shell},
};

/// Top-level CLI struct. Everything else happens in the interactive menu.
#[derive(Debug, Parser)]
#[command(
    name = "weather",
    version,
    about = "Current weather by city (OpenWeather), with a local search history",
    long_about = "Current weather by city (OpenWeather), with a local search history.\n\n\
                  Requires the OPENWEATHER_API_KEY environment variable. Set RUST_LOG for diagnostics."
)]
pub struct Cli {}

impl Cli {
    pub async fn run(self) -> anyhow::Result<ExitCode> {
        println!("Welcome to Weather CLI (OpenWeather)");

        let settings = Settings::load().context("Failed to load settings")?;

        let Some(config) =
            config_or_hint(settings, |name| std::env::var(name).ok(), &mut std::io::stderr())?
        else {
            return Ok(ExitCode::FAILURE);
        };

        let client = WeatherClient::new(&config)?;
        let store = HistoryStore::from_config(&config);
        info!(history = %store.path().display(), "starting interactive session");

        Shell::new(client, store, InquirePrompter, std::io::stdout()).run().await?;
        Ok(ExitCode::SUCCESS)
    }
}

/// A missing credential is explained once, on `err`, and yields `None`.
/// Other configuration errors are returned as-is.
fn config_or_hint<F>(
    settings: Settings,
    lookup: F,
    err: &mut impl Write,
) -> anyhow::Result<Option<Config>>
where
    F: FnOnce(&str) -> Option<String>,
{
    match Config::from_lookup(settings, lookup) {
        Ok(config) => Ok(Some(config)),
        Err(ConfigError::MissingCredential(_)) => {
            writeln!(err, "{}", render::missing_credential_hint())?;
            Ok(None)
        }
        Err(e) => Err(e.into()),
    }
}

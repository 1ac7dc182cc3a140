use std::io::IsTerminal;

use anyhow::{Context, anyhow};
use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use inquire::{Confirm, Password, PasswordDisplayMode, Select, Text};
use tracing::info;
use weather_core::{Config, ThemePreference, WeatherQuery, provider_from_config};

use crate::{
    location::{ConfiguredLocation, parse_coordinates, query_from_geolocator},
    render::{Palette, describe_error, render_reading},
};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weather", version, about = "Current weather conditions from OpenWeather")]
pub struct Cli {
    /// More log output (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Print the reading as JSON instead of a card.
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the API key, theme and optional home location.
    Configure,

    /// Show weather for a city.
    City {
        /// City name, e.g. "Paris" or "New York".
        #[arg(required = true, num_args = 1..)]
        name: Vec<String>,
    },

    /// Show weather for a coordinate pair.
    Coords {
        #[arg(long, allow_hyphen_values = true)]
        lat: f64,

        #[arg(long, allow_hyphen_values = true)]
        lon: f64,
    },

    /// Show weather for the current (home) location.
    Here,

    /// Show or change the light/dark theme.
    Theme {
        #[arg(value_enum)]
        action: Option<ThemeAction>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ThemeAction {
    Light,
    Dark,
    Toggle,
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Command::Configure => configure(),
            Command::City { name } => {
                let query = WeatherQuery::by_city(name.join(" "));
                show(query, self.json).await
            }
            Command::Coords { lat, lon } => {
                show(WeatherQuery::by_coordinates(lat, lon), self.json).await
            }
            Command::Here => {
                let config = Config::load()?;
                let locator = ConfiguredLocation::new(config.home);
                let query = query_from_geolocator(&locator).await?;
                show(query, self.json).await
            }
            Command::Theme { action } => theme(action),
        }
    }
}

async fn show(query: WeatherQuery, json: bool) -> anyhow::Result<()> {
    let config = Config::load()?;
    let provider = provider_from_config(&config)?;
    let interactive = !json && std::io::stdin().is_terminal();

    let reading = loop {
        match provider.fetch_current_conditions(&query).await {
            Ok(reading) => break reading,
            Err(err) if interactive && err.is_retryable() => {
                eprintln!("{}", describe_error(&err));
                if !offer_retry() {
                    return Err(anyhow!(describe_error(&err)));
                }
                info!(%query, "retrying at user request");
            }
            Err(err) => return Err(anyhow!(describe_error(&err))),
        }
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&reading)?);
    } else {
        let palette = Palette::for_theme(config.theme, std::io::stdout().is_terminal());
        println!("{}", render_reading(&reading, palette));
    }

    Ok(())
}

fn offer_retry() -> bool {
    Confirm::new("Try again?").with_default(true).prompt().unwrap_or(false)
}

fn theme(action: Option<ThemeAction>) -> anyhow::Result<()> {
    let mut config = Config::load()?;

    let Some(action) = action else {
        println!("{}", config.theme);
        return Ok(());
    };

    let next = apply_theme_action(&mut config, action);
    config.save()?;
    println!("Theme set to {next}");

    Ok(())
}

fn apply_theme_action(config: &mut Config, action: ThemeAction) -> ThemePreference {
    match action {
        ThemeAction::Light => config.set_theme(ThemePreference::Light),
        ThemeAction::Dark => config.set_theme(ThemePreference::Dark),
        ThemeAction::Toggle => {
            config.toggle_theme();
        }
    }
    config.theme
}

fn configure() -> anyhow::Result<()> {
    let mut config = Config::load()?;

    let mut key_prompt = Password::new("OpenWeather API key:")
        .with_display_mode(PasswordDisplayMode::Masked)
        .without_confirmation();
    if config.has_stored_api_key() {
        key_prompt = key_prompt.with_help_message("Leave empty to keep the stored key");
    }
    let api_key = key_prompt.prompt().context("API key prompt cancelled")?;
    if !api_key.trim().is_empty() {
        config.set_api_key(api_key.trim().to_string());
    }

    let themes = vec![ThemePreference::Light, ThemePreference::Dark];
    let start = themes.iter().position(|t| *t == config.theme).unwrap_or(0);
    let theme = Select::new("Theme:", themes)
        .with_starting_cursor(start)
        .prompt()
        .context("Theme prompt cancelled")?;
    config.set_theme(theme);

    let home = Text::new("Home location as \"lat,lon\" (optional):")
        .with_validator(|input: &str| {
            if input.trim().is_empty() || parse_coordinates(input).is_some() {
                Ok(inquire::validator::Validation::Valid)
            } else {
                Ok(inquire::validator::Validation::Invalid(
                    "Expected e.g. 52.52,13.405 within valid ranges".into(),
                ))
            }
        })
        .prompt()
        .context("Home location prompt cancelled")?;
    if let Some(pos) = parse_coordinates(&home) {
        config.set_home(pos.latitude, pos.longitude);
    }

    config.save()?;
    println!("Configuration saved to {}", Config::config_file_path()?.display());

    Ok(())
}

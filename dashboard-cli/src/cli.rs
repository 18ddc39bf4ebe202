use anyhow::{Context, Result, anyhow};
use chrono::{Local, Offset};
use clap::{Parser, Subcommand};
use dashboard_core::{
    Config, DashboardError, ForecastGrouping, LocationQuery, OpenWeatherClient, load_dashboard,
};
use inquire::{Password, PasswordDisplayMode, Text};

use crate::render;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weather-dash", version, about = "Weather dashboard for your terminal")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the OpenWeather API key and an optional default city.
    Configure,

    /// Show current conditions and the 5-day forecast.
    Show {
        /// City to search for, e.g. "Paris" or "Paris,FR".
        #[arg(conflicts_with_all = ["lat", "lon"])]
        city: Option<String>,

        /// Latitude in degrees, used together with --lon.
        #[arg(long, requires = "lon", allow_negative_numbers = true)]
        lat: Option<f64>,

        /// Longitude in degrees, used together with --lat.
        #[arg(long, requires = "lat", allow_negative_numbers = true)]
        lon: Option<f64>,

        /// Print the render-ready dashboard as JSON.
        #[arg(long)]
        json: bool,

        /// Forecast grouping: "stride" or "calendar-day". Overrides the config.
        #[arg(long, value_parser = parse_grouping)]
        grouping: Option<ForecastGrouping>,
    },
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        match self.command {
            Command::Configure => configure(),
            Command::Show { city, lat, lon, json, grouping } => {
                let config = Config::load()?;
                let query = resolve_query(city, lat, lon, &config)?;
                show(&config, query, json, grouping).await
            }
        }
    }
}

fn configure() -> Result<()> {
    let mut config = Config::load()?;

    let api_key = Password::new("OpenWeather API key:")
        .with_display_mode(PasswordDisplayMode::Masked)
        .without_confirmation()
        .with_help_message("Get a free key at https://openweathermap.org/api")
        .prompt()
        .context("Failed to read API key")?;

    let api_key = api_key.trim().to_string();
    if api_key.is_empty() {
        return Err(anyhow!("API key must not be empty"));
    }
    config.set_api_key(api_key);

    let current_city = config.default_city.clone().unwrap_or_default();
    let city = Text::new("Default city (leave empty for none):")
        .with_initial_value(&current_city)
        .prompt()
        .context("Failed to read default city")?;
    let city = city.trim();
    config.default_city = (!city.is_empty()).then(|| city.to_string());

    config.save()?;
    println!("Configuration saved to {}", Config::config_file_path()?.display());

    Ok(())
}

async fn show(
    config: &Config,
    query: LocationQuery,
    json: bool,
    grouping: Option<ForecastGrouping>,
) -> Result<()> {
    let api_key = config.api_key()?;
    let client = match config.base_url.as_deref() {
        Some(base_url) => OpenWeatherClient::with_base_url(api_key, base_url),
        None => OpenWeatherClient::new(api_key),
    };

    let mut presenter = config.presenter(Local::now().offset().fix());
    if let Some(grouping) = grouping {
        presenter.grouping = grouping;
    }

    match load_dashboard(&client, &query, &presenter).await {
        Ok(dashboard) => {
            if json {
                let out = serde_json::to_string_pretty(&dashboard)
                    .context("Failed to serialize dashboard to JSON")?;
                println!("{out}");
            } else {
                print!("{}", render::dashboard(&dashboard));
            }
            Ok(())
        }
        Err(DashboardError::Malformed(err)) => {
            tracing::error!(%query, error = %err, "rejected weather payload");
            let message = err.user_message();
            Err(anyhow::Error::new(err).context(message))
        }
        Err(DashboardError::Fetch(err)) => {
            Err(err.context(format!("Unable to load weather for {query}")))
        }
    }
}

/// Pick what to look up: explicit city, then coordinates, then the default city.
fn resolve_query(
    city: Option<String>,
    lat: Option<f64>,
    lon: Option<f64>,
    config: &Config,
) -> Result<LocationQuery> {
    if let Some(city) = city {
        let city = city.trim();
        if city.is_empty() {
            return Err(anyhow!("City name must not be empty"));
        }
        return Ok(LocationQuery::City(city.to_string()));
    }

    if let (Some(lat), Some(lon)) = (lat, lon) {
        if !(-90.0..=90.0).contains(&lat) {
            return Err(anyhow!("Latitude {lat} is out of range (-90..=90)"));
        }
        if !(-180.0..=180.0).contains(&lon) {
            return Err(anyhow!("Longitude {lon} is out of range (-180..=180)"));
        }
        return Ok(LocationQuery::Coordinates { lat, lon });
    }

    config
        .default_city
        .as_deref()
        .map(str::trim)
        .filter(|city| !city.is_empty())
        .map(|city| LocationQuery::City(city.to_string()))
        .ok_or_else(|| {
            anyhow!(
                "No location given.\n\
                 Hint: pass a city (`weather-dash show Paris`), coordinates \
                 (`--lat 48.85 --lon 2.35`), or set a default city with `weather-dash configure`."
            )
        })
}

fn parse_grouping(value: &str) -> Result<ForecastGrouping, String> {
    ForecastGrouping::try_from(value).map_err(|err| err.to_string())
}

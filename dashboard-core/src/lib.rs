//! Core library for the `weather-dash` dashboard.
//!
//! This crate defines:
//! - Provider payload and render-ready models
//! - Icon category resolution
//! - The presenter turning raw payloads into display values
//! - Configuration & credentials handling
//! - The OpenWeather fetch layer
//!
//! It is used by `dashboard-cli`, but the presenter is pure and can be reused
//! by any front-end.

pub mod config;
pub mod error;
pub mod icon;
pub mod model;
pub mod presenter;
pub mod provider;

pub use config::{Config, WeekdayZoneSetting};
pub use error::{DashboardError, MalformedInput};
pub use icon::{DayPhase, IconCategory};
pub use model::{
    Dashboard, DisplayCurrent, DisplayForecastDay, LocationQuery, RawCurrentConditions,
    RawForecastEntry, RawForecastSeries,
};
pub use presenter::{
    ForecastGrouping, Presenter, WeekdayZone, downsample_forecast, downsample_forecast_with,
    normalize_current,
};
pub use provider::{OpenWeatherClient, WeatherSource, load_dashboard};

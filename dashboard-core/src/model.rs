use serde::{Deserialize, Serialize};

use crate::icon::{DayPhase, IconCategory};

/// What the user asked for: a searched city or a geolocated position.
#[derive(Debug, Clone, PartialEq)]
pub enum LocationQuery {
    City(String),
    Coordinates { lat: f64, lon: f64 },
}

impl LocationQuery {
    /// Query parameters understood by the OpenWeather endpoints.
    pub fn query_params(&self) -> Vec<(&'static str, String)> {
        match self {
            LocationQuery::City(city) => vec![("q", city.clone())],
            LocationQuery::Coordinates { lat, lon } => {
                vec![("lat", lat.to_string()), ("lon", lon.to_string())]
            }
        }
    }
}

impl std::fmt::Display for LocationQuery {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LocationQuery::City(city) => f.write_str(city),
            LocationQuery::Coordinates { lat, lon } => write!(f, "{lat:.4}, {lon:.4}"),
        }
    }
}

// Provider payloads (metric units). Unknown fields are ignored.

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConditionDescriptor {
    pub main: String,
    pub description: String,
    pub icon: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawSys {
    pub country: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawMain {
    pub temp: f64,
    pub feels_like: f64,
    pub humidity: u8,
    pub pressure: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawWind {
    /// m/s
    pub speed: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawCurrentConditions {
    pub name: String,
    pub sys: RawSys,
    pub main: RawMain,
    pub weather: Vec<ConditionDescriptor>,
    pub wind: RawWind,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawForecastMain {
    pub temp: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawForecastEntry {
    /// Unix seconds.
    pub dt: i64,
    pub main: RawForecastMain,
    pub weather: Vec<ConditionDescriptor>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawCity {
    pub name: Option<String>,
    pub country: Option<String>,
    /// Shift in seconds from UTC.
    pub timezone: Option<i32>,
}

/// Forecast list in chronological order, roughly one entry per 3 hours.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RawForecastSeries {
    pub list: Vec<RawForecastEntry>,
    #[serde(default)]
    pub city: Option<RawCity>,
}

// Render-ready values. Everything is rounded and unit-converted already.

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DisplayCurrent {
    pub location: String,
    pub temperature_c: i32,
    pub feels_like_c: i32,
    pub humidity_pct: u8,
    pub pressure_hpa: u32,
    pub wind_kmh: i32,
    pub icon: IconCategory,
    pub phase: DayPhase,
    pub condition: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DisplayForecastDay {
    pub weekday: String,
    pub temperature_c: i32,
    pub icon: IconCategory,
    pub phase: DayPhase,
    pub condition: String,
}

/// A presented dashboard. Current conditions are always present; the
/// forecast may be missing on its own, with the reason in `forecast_error`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Dashboard {
    pub current: DisplayCurrent,
    pub forecast: Vec<DisplayForecastDay>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub forecast_error: Option<String>,
}

impl Dashboard {
    pub fn new(current: DisplayCurrent, forecast: Vec<DisplayForecastDay>) -> Self {
        Self { current, forecast, forecast_error: None }
    }

    pub fn without_forecast(current: DisplayCurrent, reason: impl std::fmt::Display) -> Self {
        Self { current, forecast: Vec::new(), forecast_error: Some(reason.to_string()) }
    }

    pub fn has_forecast(&self) -> bool {
        self.forecast_error.is_none() && !self.forecast.is_empty()
    }
}

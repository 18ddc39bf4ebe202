use async_trait::async_trait;
use std::fmt::Debug;

use crate::{
    error::DashboardError,
    model::{Dashboard, LocationQuery, RawCurrentConditions, RawForecastSeries},
    presenter::{Presenter, normalize_current},
};

pub mod openweather;

pub use openweather::OpenWeatherClient;

/// Source of raw weather payloads. Owns transport, keys and retries.
#[async_trait]
pub trait WeatherSource: Send + Sync + Debug {
    async fn current(&self, query: &LocationQuery) -> anyhow::Result<RawCurrentConditions>;

    async fn forecast(&self, query: &LocationQuery) -> anyhow::Result<RawForecastSeries>;
}

/// Fetch current conditions and forecast concurrently, then present both.
///
/// Current conditions are required. A forecast that fails to fetch or to
/// present is reported in `Dashboard::forecast_error` instead.
pub async fn load_dashboard(
    source: &dyn WeatherSource,
    query: &LocationQuery,
    presenter: &Presenter,
) -> Result<Dashboard, DashboardError> {
    tracing::debug!(%query, grouping = %presenter.grouping, "loading dashboard");

    let (current, forecast) = tokio::join!(source.current(query), source.forecast(query));

    let current = current.map_err(DashboardError::from_source).inspect_err(|err| {
        tracing::warn!(%query, error = %err, "current conditions unavailable");
    })?;

    let dashboard = match forecast.map_err(DashboardError::from_source) {
        Ok(series) => {
            tracing::debug!(entries = series.list.len(), "received forecast series");
            presenter.present(&current, &series)?
        }
        Err(err) => Dashboard::without_forecast(normalize_current(&current)?, err),
    };

    if let Some(reason) = &dashboard.forecast_error {
        tracing::warn!(%query, %reason, "showing dashboard without forecast");
    }

    Ok(dashboard)
}

use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;

use crate::{
    error::MalformedInput,
    model::{LocationQuery, RawCurrentConditions, RawForecastSeries},
};

use super::WeatherSource;

pub const DEFAULT_BASE_URL: &str = "https://api.openweathermap.org/data/2.5";

#[derive(Debug, Clone)]
pub struct OpenWeatherClient {
    api_key: String,
    base_url: String,
    http: Client,
}

impl OpenWeatherClient {
    pub fn new(api_key: String) -> Self {
        Self::with_base_url(api_key, DEFAULT_BASE_URL)
    }

    pub fn with_base_url(api_key: String, base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
            http: Client::new(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        what: &str,
        query: &LocationQuery,
    ) -> Result<T> {
        let url = format!("{}/{endpoint}", self.base_url);

        let mut params = query.query_params();
        params.push(("appid", self.api_key.clone()));
        params.push(("units", "metric".to_string()));

        tracing::debug!(%url, %query, "requesting OpenWeather {what}");

        let res = self
            .http
            .get(&url)
            .query(&params)
            .send()
            .await
            .with_context(|| format!("Failed to send request to OpenWeather ({what})"))?;

        let status = res.status();
        let body = res
            .text()
            .await
            .with_context(|| format!("Failed to read OpenWeather {what} response body"))?;

        if !status.is_success() {
            tracing::warn!(%status, %query, "OpenWeather {what} request failed");
            return Err(anyhow!(
                "{} not found (status {}): {}",
                capitalize(what),
                status,
                truncate_body(&body),
            ));
        }

        // A body that arrived but cannot be decoded is bad data, not a failed fetch.
        serde_json::from_str(&body).map_err(|err| {
            tracing::warn!(%query, error = %err, "undecodable OpenWeather {what}");
            MalformedInput::payload(format!("OpenWeather {what}"), err).into()
        })
    }
}

#[async_trait]
impl WeatherSource for OpenWeatherClient {
    async fn current(&self, query: &LocationQuery) -> Result<RawCurrentConditions> {
        self.get_json("weather", "weather data", query).await
    }

    async fn forecast(&self, query: &LocationQuery) -> Result<RawForecastSeries> {
        self.get_json("forecast", "forecast data", query).await
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((cut, _)) => format!("{}...", &body[..cut]),
        None => body.to_string(),
    }
}

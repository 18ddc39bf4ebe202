use thiserror::Error;

/// Provider payload that cannot be rendered.
///
/// Kept distinct from "no data yet": callers render a fallback message for
/// this instead of a loading state.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MalformedInput {
    #[error("malformed {context}: no weather conditions present")]
    MissingConditions { context: String },

    #[error("malformed {field}: value {value} is not a finite number")]
    NonFinite { field: String, value: f64 },

    #[error("malformed {field}: value {value} is out of range")]
    OutOfRange { field: String, value: f64 },

    #[error("malformed {context}: {detail}")]
    Payload { context: String, detail: String },

    #[error("malformed {context}: timestamp {value} is out of range")]
    Timestamp { context: String, value: i64 },
}

impl MalformedInput {
    pub fn missing_conditions<S: Into<String>>(context: S) -> Self {
        Self::MissingConditions { context: context.into() }
    }

    pub fn non_finite<S: Into<String>>(field: S, value: f64) -> Self {
        Self::NonFinite { field: field.into(), value }
    }

    pub fn out_of_range<S: Into<String>>(field: S, value: f64) -> Self {
        Self::OutOfRange { field: field.into(), value }
    }

    pub fn payload<S: Into<String>, D: std::fmt::Display>(context: S, detail: D) -> Self {
        Self::Payload { context: context.into(), detail: detail.to_string() }
    }

    pub fn timestamp<S: Into<String>>(context: S, value: i64) -> Self {
        Self::Timestamp { context: context.into(), value }
    }

    pub fn user_message(&self) -> &'static str {
        "The weather service returned data that could not be displayed. Please try again later."
    }
}

/// Failure to build a dashboard: either the fetch failed or the data is garbage.
#[derive(Debug, Error)]
pub enum DashboardError {
    #[error("failed to fetch weather data: {0:#}")]
    Fetch(#[source] anyhow::Error),

    #[error(transparent)]
    Malformed(#[from] MalformedInput),
}

impl DashboardError {
    /// Classify an error coming out of a [`WeatherSource`](crate::WeatherSource):
    /// an undecodable payload is malformed input, anything else is a fetch failure.
    pub fn from_source(err: anyhow::Error) -> Self {
        match err.downcast::<MalformedInput>() {
            Ok(malformed) => Self::Malformed(malformed),
            Err(err) => Self::Fetch(err),
        }
    }
}

use serde::{Deserialize, Serialize};

/// Condition class used to pick a glyph, independent of day/night.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum IconCategory {
    #[default]
    Clear,
    PartlyCloudy,
    Cloudy,
    Drizzle,
    Rain,
    Thunderstorm,
    Snow,
    Mist,
}

/// OpenWeather icon prefix → category. Codes look like "10d" / "10n".
const ICON_TABLE: &[(&str, IconCategory)] = &[
    ("01", IconCategory::Clear),
    ("02", IconCategory::PartlyCloudy),
    ("03", IconCategory::Cloudy),
    ("04", IconCategory::Cloudy),
    ("09", IconCategory::Drizzle),
    ("10", IconCategory::Rain),
    ("11", IconCategory::Thunderstorm),
    ("13", IconCategory::Snow),
    ("50", IconCategory::Mist),
];

impl IconCategory {
    /// Resolve a provider icon code by its two-digit prefix.
    ///
    /// The provider's code space is open-ended, so anything not in the table
    /// (including short or garbled codes) falls back to `Clear`.
    pub fn resolve(code: &str) -> Self {
        code.get(..2)
            .and_then(|prefix| {
                ICON_TABLE
                    .iter()
                    .find(|(known, _)| *known == prefix)
                    .map(|(_, category)| *category)
            })
            .unwrap_or_default()
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Clear => "Clear",
            Self::PartlyCloudy => "Partly Cloudy",
            Self::Cloudy => "Cloudy",
            Self::Drizzle => "Drizzle",
            Self::Rain => "Rain",
            Self::Thunderstorm => "Thunderstorm",
            Self::Snow => "Snow",
            Self::Mist => "Mist",
        }
    }

    /// Glyph identifier for graphical front-ends.
    pub fn icon_name(&self) -> &'static str {
        match self {
            Self::Clear => "sun",
            Self::PartlyCloudy => "cloud_sun",
            Self::Cloudy => "cloud",
            Self::Drizzle => "cloud_drizzle",
            Self::Rain => "cloud_rain",
            Self::Thunderstorm => "cloud_lightning",
            Self::Snow => "cloud_snow",
            Self::Mist => "wind",
        }
    }

    /// Single-glyph rendering for terminals.
    pub fn glyph(&self, phase: DayPhase) -> &'static str {
        match (self, phase) {
            (Self::Clear, DayPhase::Day) => "☀",
            (Self::Clear, DayPhase::Night) => "☾",
            (Self::PartlyCloudy, _) => "⛅",
            (Self::Cloudy, _) => "☁",
            (Self::Drizzle, _) => "🌦",
            (Self::Rain, _) => "🌧",
            (Self::Thunderstorm, _) => "⛈",
            (Self::Snow, _) => "❄",
            (Self::Mist, _) => "🌫",
        }
    }
}

/// Day/night variant carried by the icon code suffix. Only a shade hint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum DayPhase {
    #[default]
    Day,
    Night,
}

impl DayPhase {
    pub fn resolve(code: &str) -> Self {
        if code.ends_with('n') { Self::Night } else { Self::Day }
    }
}

//! Pure mapping from provider payloads to render-ready values.
//!
//! Nothing in here does I/O or keeps state: the same input always yields the
//! same output. Rounding uses `f64::round` (half away from zero), so 20.5
//! becomes 21 and -0.5 becomes -1.

use chrono::{DateTime, FixedOffset, NaiveDate, Offset, Timelike, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    error::MalformedInput,
    icon::{DayPhase, IconCategory},
    model::{
        ConditionDescriptor, Dashboard, DisplayCurrent, DisplayForecastDay, RawCurrentConditions,
        RawForecastEntry, RawForecastSeries,
    },
};

/// Number of days shown in the forecast strip.
pub const FORECAST_DAYS: usize = 5;

/// Forecast entries per day at the provider's 3-hour spacing.
pub const ENTRIES_PER_DAY: usize = 8;

const KMH_PER_MPS: f64 = 3.6;

const NOON_SECONDS: i64 = 12 * 3600;

/// How the 3-hourly forecast list is reduced to one entry per day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ForecastGrouping {
    /// Every 8th entry starting at index 0. Assumes a fixed 3-hour interval
    /// and does not look at dates at all.
    #[default]
    Stride,
    /// One entry per local calendar date: the one closest to 12:00.
    CalendarDay,
}

impl ForecastGrouping {
    pub fn as_str(&self) -> &'static str {
        match self {
            ForecastGrouping::Stride => "stride",
            ForecastGrouping::CalendarDay => "calendar-day",
        }
    }

    pub const fn all() -> &'static [ForecastGrouping] {
        &[ForecastGrouping::Stride, ForecastGrouping::CalendarDay]
    }
}

impl std::fmt::Display for ForecastGrouping {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for ForecastGrouping {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.to_lowercase().as_str() {
            "stride" => Ok(ForecastGrouping::Stride),
            "calendar-day" | "calendar" => Ok(ForecastGrouping::CalendarDay),
            _ => Err(anyhow::anyhow!(
                "Unknown forecast grouping '{value}'. Supported: stride, calendar-day."
            )),
        }
    }
}

/// Which clock the weekday labels are read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WeekdayZone {
    /// The viewer's own UTC offset.
    Viewer(FixedOffset),
    /// The forecast location's offset (`city.timezone`), UTC if absent.
    Location,
}

impl WeekdayZone {
    pub fn offset_for(&self, series: &RawForecastSeries) -> FixedOffset {
        match self {
            WeekdayZone::Viewer(offset) => *offset,
            WeekdayZone::Location => series
                .city
                .as_ref()
                .and_then(|city| city.timezone)
                .and_then(FixedOffset::east_opt)
                .unwrap_or_else(|| Utc.fix()),
        }
    }
}

impl Default for WeekdayZone {
    fn default() -> Self {
        WeekdayZone::Viewer(Utc.fix())
    }
}

/// Presentation settings applied to a (current, forecast) pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Presenter {
    pub grouping: ForecastGrouping,
    pub zone: WeekdayZone,
}

impl Presenter {
    pub fn new(grouping: ForecastGrouping, zone: WeekdayZone) -> Self {
        Self { grouping, zone }
    }

    /// Present both payloads. Only broken current conditions fail the call; a
    /// broken forecast leaves the dashboard without its forecast strip.
    pub fn present(
        &self,
        current: &RawCurrentConditions,
        forecast: &RawForecastSeries,
    ) -> Result<Dashboard, MalformedInput> {
        let current = normalize_current(current)?;

        Ok(match self.present_forecast(forecast) {
            Ok(days) => Dashboard::new(current, days),
            Err(err) => Dashboard::without_forecast(current, err),
        })
    }

    pub fn present_forecast(
        &self,
        forecast: &RawForecastSeries,
    ) -> Result<Vec<DisplayForecastDay>, MalformedInput> {
        let offset = self.zone.offset_for(forecast);
        downsample_forecast_with(forecast, self.grouping, &offset)
    }
}

pub fn normalize_current(raw: &RawCurrentConditions) -> Result<DisplayCurrent, MalformedInput> {
    let condition = first_condition(&raw.weather, "current conditions")?;

    Ok(DisplayCurrent {
        location: format!("{}, {}", raw.name, raw.sys.country),
        temperature_c: round_finite("main.temp", raw.main.temp)?,
        feels_like_c: round_finite("main.feels_like", raw.main.feels_like)?,
        humidity_pct: raw.main.humidity,
        pressure_hpa: raw.main.pressure,
        wind_kmh: mps_to_kmh(raw.wind.speed)?,
        icon: IconCategory::resolve(&condition.icon),
        phase: DayPhase::resolve(&condition.icon),
        condition: condition.description.clone(),
    })
}

/// Stride-sampled forecast: entries 0, 8, 16, 24, 32 at most.
pub fn downsample_forecast(
    series: &RawForecastSeries,
    offset: &FixedOffset,
) -> Result<Vec<DisplayForecastDay>, MalformedInput> {
    downsample_forecast_with(series, ForecastGrouping::Stride, offset)
}

/// Reduce the forecast to at most [`FORECAST_DAYS`] entries, in order.
///
/// Only the entries that end up on screen are validated; a broken entry that
/// is skipped by the grouping does not fail the call. `CalendarDay` needs a
/// valid timestamp on every entry to know its date.
pub fn downsample_forecast_with(
    series: &RawForecastSeries,
    grouping: ForecastGrouping,
    offset: &FixedOffset,
) -> Result<Vec<DisplayForecastDay>, MalformedInput> {
    let selected = match grouping {
        ForecastGrouping::Stride => stride_indices(series.list.len()),
        ForecastGrouping::CalendarDay => calendar_day_indices(&series.list, offset)?,
    };

    selected
        .into_iter()
        .map(|index| forecast_day(index, &series.list[index], offset))
        .collect()
}

fn stride_indices(len: usize) -> Vec<usize> {
    (0..len).step_by(ENTRIES_PER_DAY).take(FORECAST_DAYS).collect()
}

fn calendar_day_indices(
    entries: &[RawForecastEntry],
    offset: &FixedOffset,
) -> Result<Vec<usize>, MalformedInput> {
    // (date, best index, distance from noon in seconds)
    let mut days: Vec<(NaiveDate, usize, i64)> = Vec::with_capacity(FORECAST_DAYS + 1);

    for (index, entry) in entries.iter().enumerate() {
        let local = local_time(entry.dt, offset, index)?;
        let date = local.date_naive();
        let distance = (i64::from(local.num_seconds_from_midnight()) - NOON_SECONDS).abs();

        if let Some(day) = days.last_mut().filter(|(day_date, _, _)| *day_date == date) {
            if distance < day.2 {
                day.1 = index;
                day.2 = distance;
            }
            continue;
        }

        if days.len() == FORECAST_DAYS {
            break;
        }
        days.push((date, index, distance));
    }

    Ok(days.into_iter().map(|(_, index, _)| index).collect())
}

fn forecast_day(
    index: usize,
    entry: &RawForecastEntry,
    offset: &FixedOffset,
) -> Result<DisplayForecastDay, MalformedInput> {
    let condition = first_condition(&entry.weather, &format!("forecast entry {index}"))?;
    let local = local_time(entry.dt, offset, index)?;

    Ok(DisplayForecastDay {
        weekday: local.format("%a").to_string(),
        temperature_c: round_finite(&format!("list[{index}].main.temp"), entry.main.temp)?,
        icon: IconCategory::resolve(&condition.icon),
        phase: DayPhase::resolve(&condition.icon),
        condition: condition.description.clone(),
    })
}

fn first_condition<'a>(
    weather: &'a [ConditionDescriptor],
    context: &str,
) -> Result<&'a ConditionDescriptor, MalformedInput> {
    weather.first().ok_or_else(|| MalformedInput::missing_conditions(context))
}

fn local_time(
    ts: i64,
    offset: &FixedOffset,
    index: usize,
) -> Result<DateTime<FixedOffset>, MalformedInput> {
    DateTime::from_timestamp(ts, 0)
        .map(|utc| utc.with_timezone(offset))
        .ok_or_else(|| MalformedInput::timestamp(format!("forecast entry {index}"), ts))
}

fn mps_to_kmh(speed: f64) -> Result<i32, MalformedInput> {
    if !speed.is_finite() {
        return Err(MalformedInput::non_finite("wind.speed", speed));
    }
    round_finite("wind.speed", speed * KMH_PER_MPS)
}

fn round_finite(field: &str, value: f64) -> Result<i32, MalformedInput> {
    if !value.is_finite() {
        return Err(MalformedInput::non_finite(field, value));
    }
    let rounded = value.round();
    if rounded < f64::from(i32::MIN) || rounded > f64::from(i32::MAX) {
        return Err(MalformedInput::out_of_range(field, value));
    }
    Ok(rounded as i32)
}

//! Plain-text rendering of a presented dashboard.

use dashboard_core::{Dashboard, DisplayCurrent, DisplayForecastDay};
use std::fmt::Write;

pub fn dashboard(dashboard: &Dashboard) -> String {
    let mut out = current(&dashboard.current);
    out.push('\n');
    out.push_str(&forecast(&dashboard.forecast));
    out
}

fn current(current: &DisplayCurrent) -> String {
    let mut out = String::new();

    let _ = writeln!(
        out,
        "{}  {}°  {}",
        current.icon.glyph(current.phase),
        current.temperature_c,
        capitalize(&current.condition)
    );
    let _ = writeln!(out, "{}", current.location);
    let _ = writeln!(out, "Feels like {}°", current.feels_like_c);
    out.push('\n');

    let rows = [
        ("Temperature", format!("{}°C", current.temperature_c)),
        ("Humidity", format!("{}%", current.humidity_pct)),
        ("Wind Speed", format!("{} km/h", current.wind_kmh)),
        ("Pressure", format!("{} hPa", current.pressure_hpa)),
    ];
    for (label, value) in rows {
        let _ = writeln!(out, "  {label:<12} {value}");
    }

    out
}

fn forecast(days: &[DisplayForecastDay]) -> String {
    let mut out = String::from("5-Day Forecast\n");

    if days.is_empty() {
        out.push_str("  No forecast available.\n");
        return out;
    }

    for day in days {
        let _ = writeln!(
            out,
            "  {:<4} {}  {:>4}°  {}",
            day.weekday,
            day.icon.glyph(day.phase),
            day.temperature_c,
            capitalize(&day.condition)
        );
    }

    out
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

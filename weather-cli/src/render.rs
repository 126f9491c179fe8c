//! Human-friendly output.

use std::io::{self, Write};

use chrono::Local;
use weather_core::{FetchError, Recent, StoreError, WeatherRecord, config::API_KEY_ENV};

pub fn weather(out: &mut impl Write, record: &WeatherRecord) -> io::Result<()> {
    writeln!(out)?;
    writeln!(out, "Weather — {}", record.location())?;
    writeln!(
        out,
        "   • Temp: {:.1}°C (feels {:.1}°C)",
        record.temperature_c, record.feels_like_c
    )?;
    writeln!(out, "   • Condition: {}", record.condition)?;
    writeln!(out, "   • Humidity: {}%", record.humidity_pct)?;
    writeln!(out, "   • Wind: {:.1} m/s", record.wind_speed_mps)?;
    Ok(())
}

/// One line per record, newest first.
pub fn history(out: &mut impl Write, recent: &Recent) -> io::Result<()> {
    writeln!(out)?;
    if let Some(err) = &recent.error {
        writeln!(out, "Could not read search history: {err}")?;
        return Ok(());
    }
    if recent.records.is_empty() {
        writeln!(out, "(No history yet.)")?;
        return Ok(());
    }

    writeln!(out, "Last searches:")?;
    for record in recent.records.iter().rev() {
        writeln!(out, " - {}", summary_line(record))?;
    }
    Ok(())
}

fn summary_line(record: &WeatherRecord) -> String {
    format!(
        "{}: {} — {:.1}°C, {}",
        record.observed_at.with_timezone(&Local).format("%Y-%m-%d %H:%M"),
        record.location(),
        record.temperature_c,
        record.condition,
    )
}

pub fn fetch_error(out: &mut impl Write, err: &FetchError) -> io::Result<()> {
    writeln!(out)?;
    writeln!(out, "Error: {err}")
}

/// The lookup worked but could not be saved.
pub fn store_error(out: &mut impl Write, err: &StoreError) -> io::Result<()> {
    writeln!(out, "Warning: search not saved to history: {err}")
}

pub fn missing_credential_hint() -> String {
    format!(
        "{API_KEY_ENV} environment variable is not set.\n\
         \x20   Get a free API key at https://openweathermap.org/ and set it like:\n\
         \x20   Windows (PowerShell):   setx {API_KEY_ENV} your_key_here\n\
         \x20   macOS/Linux (bash/zsh): export {API_KEY_ENV}=your_key_here"
    )
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A normalized weather observation for one city, as displayed and stored in history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WeatherRecord {
    pub city: String,
    /// Two-letter country code reported by the provider.
    pub country_code: String,
    pub temperature_c: f64,
    pub feels_like_c: f64,
    pub humidity_pct: u8,
    pub wind_speed_mps: f64,
    pub condition: String,
    /// When the lookup happened; the provider's own timestamp is not used.
    pub observed_at: DateTime<Utc>,
}

impl WeatherRecord {
    /// "Liverpool, GB"
    pub fn location(&self) -> String {
        format!("{}, {}", self.city, self.country_code)
    }

    /// Reject records that could not be displayed or stored faithfully.
    ///
    /// Numeric fields must be finite: JSON has no encoding for infinity or NaN.
    pub fn check(&self) -> Result<(), &'static str> {
        if self.city.trim().is_empty() {
            return Err("empty city name");
        }
        if self.country_code.trim().is_empty() {
            return Err("empty country code");
        }
        if self.condition.trim().is_empty() {
            return Err("missing weather description");
        }
        if self.humidity_pct > 100 {
            return Err("humidity out of range");
        }
        if ![self.temperature_c, self.feels_like_c, self.wind_speed_mps].iter().all(|v| v.is_finite()) {
            return Err("non-finite numeric field");
        }
        Ok(())
    }
}

/// Round to one decimal place.
pub(crate) fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

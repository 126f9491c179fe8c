use chrono::Utc;
use reqwest::{Client, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use tracing::{debug, warn};

use crate::{
    config::Config,
    error::{ConfigError, FetchError},
    model::{WeatherRecord, round1},
};

/// OpenWeather "current weather by city name" client.
///
/// Holds no state between calls other than the HTTP connection pool.
#[derive(Debug, Clone)]
pub struct WeatherClient {
    api_key: SecretString,
    endpoint: String,
    http: Client,
}

impl WeatherClient {
    pub fn new(config: &Config) -> Result<Self, ConfigError> {
        config.settings.validate()?;

        let http = Client::builder()
            .timeout(config.settings.timeout())
            .build()
            .map_err(ConfigError::HttpClient)?;

        Ok(Self {
            api_key: config.api_key().clone(),
            endpoint: config.settings.endpoint.clone(),
            http,
        })
    }

    /// Look up current conditions for `city_name`, in metric units.
    ///
    /// Makes exactly one request; nothing is retried or cached.
    pub async fn fetch(&self, city_name: &str) -> Result<WeatherRecord, FetchError> {
        let city = city_name.trim();
        if city.is_empty() {
            return Err(FetchError::EmptyCity);
        }

        debug!(city, "requesting current weather");

        let res = self
            .http
            .get(&self.endpoint)
            .query(&[
                ("q", city),
                ("appid", self.api_key.expose_secret()),
                ("units", "metric"),
            ])
            .send()
            .await
            .map_err(FetchError::network)?;

        let status = res.status();
        let body = res.text().await.map_err(FetchError::network)?;

        debug!(city, %status, "OpenWeather responded");

        match status {
            StatusCode::NOT_FOUND => return Err(FetchError::CityNotFound(city.to_string())),
            StatusCode::UNAUTHORIZED => return Err(FetchError::AuthError),
            StatusCode::TOO_MANY_REQUESTS => return Err(FetchError::RateLimited),
            s if !s.is_success() => {
                warn!(city, %status, "unexpected OpenWeather status");
                return Err(FetchError::UnexpectedStatus {
                    status: s.as_u16(),
                    body: truncate_body(&body),
                });
            }
            _ => {}
        }

        let parsed: OwCurrentResponse = serde_json::from_str(&body).map_err(|e| {
            warn!(city, error = %e, "failed to parse OpenWeather response");
            FetchError::MalformedResponse(e.to_string())
        })?;

        parsed.into_record()
    }
}

#[derive(Debug, Deserialize)]
struct OwMain {
    temp: f64,
    feels_like: f64,
    humidity: u8,
}

#[derive(Debug, Deserialize)]
struct OwWeather {
    description: String,
}

#[derive(Debug, Deserialize)]
struct OwWind {
    speed: f64,
}

#[derive(Debug, Deserialize)]
struct OwSys {
    country: String,
}

#[derive(Debug, Deserialize)]
struct OwCurrentResponse {
    name: String,
    sys: OwSys,
    main: OwMain,
    weather: Vec<OwWeather>,
    wind: OwWind,
}

impl OwCurrentResponse {
    fn into_record(self) -> Result<WeatherRecord, FetchError> {
        let condition = self.weather.first().map(|w| title_case(&w.description)).unwrap_or_default();

        let record = WeatherRecord {
            city: self.name,
            country_code: self.sys.country,
            temperature_c: round1(self.main.temp),
            feels_like_c: round1(self.main.feels_like),
            humidity_pct: self.main.humidity,
            wind_speed_mps: round1(self.wind.speed),
            condition,
            observed_at: Utc::now(),
        };

        // Checked after rounding: round1 overflows to infinity near f64::MAX.
        record.check().map_err(|reason| FetchError::MalformedResponse(reason.to_string()))?;
        Ok(record)
    }
}

/// "light intensity drizzle" -> "Light Intensity Drizzle"
fn title_case(s: &str) -> String {
    s.split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> serde_json::Value {
        serde_json::json!({
            "name": "Liverpool",
            "dt": 1_700_000_000,
            "sys": { "country": "GB" },
            "main": { "temp": 12.34, "feels_like": 11.06, "humidity": 81 },
            "weather": [{ "description": "light rain" }],
            "wind": { "speed": 5.14 }
        })
    }

    fn parse(value: serde_json::Value) -> Result<WeatherRecord, FetchError> {
        serde_json::from_value::<OwCurrentResponse>(value)
            .map_err(|e| FetchError::MalformedResponse(e.to_string()))?
            .into_record()
    }

    #[test]
    fn maps_provider_fields() {
        let record = parse(sample()).unwrap();

        assert_eq!(record.city, "Liverpool");
        assert_eq!(record.country_code, "GB");
        assert_eq!(record.temperature_c, 12.3);
        assert_eq!(record.feels_like_c, 11.1);
        assert_eq!(record.humidity_pct, 81);
        assert_eq!(record.wind_speed_mps, 5.1);
        assert_eq!(record.condition, "Light Rain");
    }

    #[test]
    fn empty_weather_list_is_malformed() {
        let mut value = sample();
        value["weather"] = serde_json::json!([]);

        assert!(matches!(parse(value), Err(FetchError::MalformedResponse(_))));
    }

    #[test]
    fn humidity_above_hundred_is_malformed() {
        let mut value = sample();
        value["main"]["humidity"] = serde_json::json!(140);

        assert!(matches!(parse(value), Err(FetchError::MalformedResponse(_))));
    }

    #[test]
    fn fractional_humidity_is_malformed() {
        let mut value = sample();
        value["main"]["humidity"] = serde_json::json!(80.5);

        assert!(matches!(parse(value), Err(FetchError::MalformedResponse(_))));
    }

    #[test]
    fn huge_temperature_is_malformed_not_infinite() {
        let mut value = sample();
        value["main"]["temp"] = serde_json::json!(1e308);

        assert!(matches!(parse(value), Err(FetchError::MalformedResponse(_))));
    }

    #[test]
    fn title_case_handles_spacing_and_case() {
        assert_eq!(title_case("overcast clouds"), "Overcast Clouds");
        assert_eq!(title_case("  heavy   SNOW "), "Heavy Snow");
        assert_eq!(title_case(""), "");
    }

    #[test]
    fn truncate_body_limits_length() {
        let long = "x".repeat(500);
        let out = truncate_body(&long);
        assert_eq!(out.len(), 203);
        assert!(out.ends_with("..."));
        assert_eq!(truncate_body("short"), "short");
    }

    #[test]
    fn zero_timeout_is_refused_at_construction() {
        let settings = crate::config::Settings { timeout_secs: 0, ..Default::default() };
        let err = WeatherClient::new(&Config::new("KEY", settings)).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidSetting(_)));
    }

    #[test]
    fn debug_output_redacts_key() {
        let cfg = Config::new("SUPER_SECRET", crate::config::Settings::default());
        let client = WeatherClient::new(&cfg).unwrap();
        assert!(!format!("{client:?}").contains("SUPER_SECRET"));
    }
}

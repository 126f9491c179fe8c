//! Core library for the `weather` CLI.
//!
//! This crate defines:
//! - Configuration & credential handling
//! - The OpenWeather client that turns a city name into a [`WeatherRecord`]
//! - The bounded, persisted search history
//!
//! It is used by `weather-cli`, but can also be reused by other binaries or services.

pub mod client;
pub mod config;
pub mod error;
pub mod history;
pub mod model;

pub use client::WeatherClient;
pub use config::{Config, Settings};
pub use error::{ConfigError, FetchError, StoreError};
pub use history::{HISTORY_LIMIT, HistoryStore, Recent};
pub use model::WeatherRecord;

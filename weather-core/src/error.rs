use std::path::PathBuf;

use thiserror::Error;

/// Failure of a single weather lookup.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Please enter a city name.")]
    EmptyCity,

    #[error("City '{0}' not found.")]
    CityNotFound(String),

    #[error("Invalid or missing API key (OpenWeather rejected the credential).")]
    AuthError,

    #[error("OpenWeather rate limit reached; wait a moment and try again.")]
    RateLimited,

    /// Transport failure. The request URL is stripped before this is built,
    /// since it carries the API key as a query parameter.
    #[error("Network error: {0}")]
    NetworkError(#[source] reqwest::Error),

    #[error("Malformed response from OpenWeather: {0}")]
    MalformedResponse(String),

    #[error("OpenWeather request failed with status {status}: {body}")]
    UnexpectedStatus { status: u16, body: String },
}

impl FetchError {
    pub(crate) fn network(err: reqwest::Error) -> Self {
        FetchError::NetworkError(err.without_url())
    }
}

/// Failure reading or writing the persisted search history.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("History file {} is corrupt: {source}", path.display())]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Refused before touching the file.
    #[error("Refusing to save invalid record: {0}")]
    InvalidRecord(&'static str),

    #[error("History file {} could not be accessed: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Startup-time configuration failure.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} environment variable is not set.")]
    MissingCredential(&'static str),

    #[error("Could not determine platform config directory")]
    NoConfigDir,

    #[error("Failed to read config file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Invalid setting: {0}")]
    InvalidSetting(String),

    #[error("Failed to build HTTP client: {0}")]
    HttpClient(#[source] reqwest::Error),
}

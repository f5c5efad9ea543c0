use crate::model::ConfigError;
use crate::parser::lenient;
use crate::utils::read_json_file;
use clap::ValueEnum;
use serde::Deserialize;
use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::{error, warn};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    Live,
    #[default]
    Mock,
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Live => write!(f, "live"),
            Mode::Mock => write!(f, "mock"),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(from = "AirbnbFile")]
pub struct AirbnbConfig {
    pub base_url: String,
    pub operation_name: String,
    pub locale: String,
    pub currency: String,
    pub headers: HashMap<String, String>,
}

impl Default for AirbnbConfig {
    fn default() -> Self {
        Self {
            base_url: "https://www.airbnb.com/api/v3/PdpReviews".to_string(),
            operation_name: "PdpReviews".to_string(),
            locale: "en".to_string(),
            currency: "USD".to_string(),
            headers: HashMap::new(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(from = "SettingsFile")]
pub struct Settings {
    /// `None` lets the caller pick; the run falls back to mock.
    pub mode: Option<Mode>,
    pub concurrency: usize,
    pub request_timeout_seconds: u64,
    /// Total attempts per request, first one included.
    pub max_retries: u32,
    /// Read for compatibility with existing settings files. The backoff
    /// schedule itself is fixed, see `scraper::fetcher::backoff_delay`.
    pub retry_backoff_seconds: u64,
    pub mock_fixture: PathBuf,
    pub airbnb: AirbnbConfig,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            mode: None,
            concurrency: 5,
            request_timeout_seconds: 20,
            max_retries: 3,
            retry_backoff_seconds: 2,
            mock_fixture: PathBuf::from("data/sample_output.json"),
            airbnb: AirbnbConfig::default(),
        }
    }
}

/// `airbnb` section as written. Text fields may be `null`, `headers` may be
/// `null`; missing or unusable values take the defaults.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct AirbnbFile {
    #[serde(deserialize_with = "lenient::text")]
    base_url: Option<String>,
    #[serde(deserialize_with = "lenient::text")]
    operation_name: Option<String>,
    #[serde(deserialize_with = "lenient::text")]
    locale: Option<String>,
    #[serde(deserialize_with = "lenient::text")]
    currency: Option<String>,
    #[serde(deserialize_with = "lenient::string_map")]
    headers: HashMap<String, String>,
}

impl From<AirbnbFile> for AirbnbConfig {
    fn from(file: AirbnbFile) -> Self {
        let defaults = AirbnbConfig::default();
        Self {
            base_url: file.base_url.unwrap_or(defaults.base_url),
            operation_name: file.operation_name.unwrap_or(defaults.operation_name),
            locale: file.locale.unwrap_or(defaults.locale),
            currency: file.currency.unwrap_or(defaults.currency),
            headers: file.headers,
        }
    }
}

/// Settings file as written. Numbers are coerced (`"5"` and `2.5` are
/// accepted); anything unusable falls back to the default for that key only.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct SettingsFile {
    mode: Option<Mode>,
    #[serde(deserialize_with = "lenient::integer")]
    concurrency: Option<u64>,
    #[serde(deserialize_with = "lenient::integer")]
    request_timeout_seconds: Option<u64>,
    #[serde(deserialize_with = "lenient::integer")]
    max_retries: Option<u64>,
    #[serde(deserialize_with = "lenient::integer")]
    retry_backoff_seconds: Option<u64>,
    #[serde(deserialize_with = "lenient::text")]
    mock_fixture: Option<String>,
    #[serde(deserialize_with = "lenient::object")]
    airbnb: Option<AirbnbConfig>,
}

impl From<SettingsFile> for Settings {
    fn from(file: SettingsFile) -> Self {
        let defaults = Settings::default();
        Self {
            mode: file.mode,
            concurrency: file
                .concurrency
                .and_then(|v| usize::try_from(v).ok())
                .unwrap_or(defaults.concurrency),
            request_timeout_seconds: file
                .request_timeout_seconds
                .unwrap_or(defaults.request_timeout_seconds),
            max_retries: file
                .max_retries
                .and_then(|v| u32::try_from(v).ok())
                .unwrap_or(defaults.max_retries),
            retry_backoff_seconds: file
                .retry_backoff_seconds
                .unwrap_or(defaults.retry_backoff_seconds),
            mock_fixture: file
                .mock_fixture
                .map(PathBuf::from)
                .unwrap_or(defaults.mock_fixture),
            airbnb: file.airbnb.unwrap_or(defaults.airbnb),
        }
    }
}

impl Settings {
    /// CLI override first, then the settings file, then mock.
    pub fn resolve_mode(&self, cli_override: Option<Mode>) -> Mode {
        cli_override.or(self.mode).unwrap_or_default()
    }
}

pub fn load_config(path: &Path) -> Result<Settings, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::NotFound(path.to_path_buf()));
    }
    Ok(read_json_file(path)?)
}

/// Settings problems never stop a run: they are logged and defaults are used.
pub fn load_settings_or_default(path: &Path) -> Settings {
    match load_config(path) {
        Ok(settings) => settings,
        Err(ConfigError::NotFound(p)) => {
            warn!("Settings file {} not found. Using defaults (mock mode).", p.display());
            Settings::default()
        }
        Err(e) => {
            error!("Failed to parse settings: {}", e);
            Settings::default()
        }
    }
}

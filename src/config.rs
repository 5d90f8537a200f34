use crate::errors::ConfigError;
use std::{env, path::PathBuf, str::FromStr, time::Duration};

pub const DEFAULT_API_URL: &str =
    "https://pgee-api-staging-d8a9bf89a6c4.herokuapp.com/public/user_dashboard/5f983344-1221-4f6a-a0ac-1fb3a5a3cd7f";
pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_REFRESH_SECS: u64 = 15;
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Visual style of the rendered page. Only colors differ between themes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    #[default]
    Aurora,
    Slate,
}

impl Theme {
    pub fn as_str(self) -> &'static str {
        match self {
            Theme::Aurora => "aurora",
            Theme::Slate => "slate",
        }
    }
}

impl FromStr for Theme {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_ascii_lowercase().as_str() {
            "aurora" => Ok(Theme::Aurora),
            "slate" => Ok(Theme::Slate),
            other => Err(format!("unknown theme '{other}', expected 'aurora' or 'slate'")),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Settings {
    pub port: u16,
    pub api_url: String,
    pub refresh: Duration,
    pub request_timeout: Duration,
    pub theme: Theme,
    pub fallback_path: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            api_url: DEFAULT_API_URL.to_string(),
            refresh: Duration::from_secs(DEFAULT_REFRESH_SECS),
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            theme: Theme::default(),
            fallback_path: None,
        }
    }
}

impl Settings {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds settings from any key lookup; blank values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let defaults = Self::default();
        let refresh_secs = parse_positive(
            "DASHBOARD_REFRESH_SECS",
            get("DASHBOARD_REFRESH_SECS"),
            DEFAULT_REFRESH_SECS,
        )?;
        let timeout_secs = parse_positive(
            "DASHBOARD_TIMEOUT_SECS",
            get("DASHBOARD_TIMEOUT_SECS"),
            DEFAULT_TIMEOUT_SECS,
        )?;

        Ok(Self {
            port: parse_or("PORT", get("PORT"), defaults.port)?,
            api_url: get("DASHBOARD_API_URL").unwrap_or(defaults.api_url),
            refresh: Duration::from_secs(refresh_secs),
            request_timeout: Duration::from_secs(timeout_secs),
            theme: parse_or("DASHBOARD_THEME", get("DASHBOARD_THEME"), defaults.theme)?,
            fallback_path: get("DASHBOARD_FALLBACK_PATH").map(PathBuf::from),
        })
    }
}

fn parse_or<T>(key: &'static str, raw: Option<String>, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match raw {
        None => Ok(default),
        Some(value) => value.parse::<T>().map_err(|err| ConfigError::Invalid {
            key,
            reason: err.to_string(),
            value,
        }),
    }
}

fn parse_positive(key: &'static str, raw: Option<String>, default: u64) -> Result<u64, ConfigError> {
    let parsed = parse_or(key, raw, default)?;
    if parsed == 0 {
        return Err(ConfigError::Invalid {
            key,
            value: parsed.to_string(),
            reason: "must be greater than zero".to_string(),
        });
    }
    Ok(parsed)
}

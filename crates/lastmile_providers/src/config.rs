use std::time::Duration;

use thiserror::Error;

use crate::{
    cache::{GEOCODE_TTL, ROUTE_TTL},
    mapbox::MAPBOX_API_URL,
    osrm::OSRM_PUBLIC_URL,
};

pub const MAPBOX_TOKEN_ENV_VAR: &str = "MAPBOX_TOKEN";
pub const MAPBOX_URL_ENV_VAR: &str = "LASTMILE_MAPBOX_URL";
pub const OSRM_URL_ENV_VAR: &str = "LASTMILE_OSRM_URL";
pub const HTTP_TIMEOUT_ENV_VAR: &str = "LASTMILE_HTTP_TIMEOUT_SECS";
pub const ROUTE_TTL_ENV_VAR: &str = "LASTMILE_ROUTE_TTL_SECS";
pub const GEOCODE_TTL_ENV_VAR: &str = "LASTMILE_GEOCODE_TTL_SECS";

pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(12);

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("{name} must be a whole number of seconds, got \"{value}\"")]
    InvalidSeconds { name: &'static str, value: String },

    #[error("{0} must be greater than zero")]
    ZeroTimeout(&'static str),
}

/// Everything read from the environment, built once at startup and passed
/// down by reference.
#[derive(Debug, Clone)]
pub struct LastmileConfig {
    pub mapbox_token: Option<String>,
    pub mapbox_url: String,
    pub osrm_url: String,
    pub request_timeout: Duration,
    pub route_ttl: Duration,
    pub geocode_ttl: Duration,
}

impl Default for LastmileConfig {
    fn default() -> Self {
        Self {
            mapbox_token: None,
            mapbox_url: MAPBOX_API_URL.to_string(),
            osrm_url: OSRM_PUBLIC_URL.to_string(),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            route_ttl: ROUTE_TTL,
            geocode_ttl: GEOCODE_TTL,
        }
    }
}

impl LastmileConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let non_blank = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        let seconds = |name: &'static str, default: Duration| match non_blank(name) {
            None => Ok(default),
            Some(value) => value
                .trim()
                .parse::<u64>()
                .map(Duration::from_secs)
                .map_err(|_| ConfigError::InvalidSeconds { name, value }),
        };

        let request_timeout = seconds(HTTP_TIMEOUT_ENV_VAR, defaults.request_timeout)?;
        if request_timeout.is_zero() {
            return Err(ConfigError::ZeroTimeout(HTTP_TIMEOUT_ENV_VAR));
        }

        Ok(Self {
            mapbox_token: non_blank(MAPBOX_TOKEN_ENV_VAR).map(|token| token.trim().to_string()),
            mapbox_url: non_blank(MAPBOX_URL_ENV_VAR).unwrap_or(defaults.mapbox_url),
            osrm_url: non_blank(OSRM_URL_ENV_VAR).unwrap_or(defaults.osrm_url),
            request_timeout,
            route_ttl: seconds(ROUTE_TTL_ENV_VAR, defaults.route_ttl)?,
            geocode_ttl: seconds(GEOCODE_TTL_ENV_VAR, defaults.geocode_ttl)?,
        })
    }

    /// Token shortened to its first 6 and last 2 characters, safe to print.
    pub fn masked_token(&self) -> Option<String> {
        self.mapbox_token.as_deref().map(mask_secret)
    }
}

pub fn mask_secret(secret: &str) -> String {
    let chars: Vec<char> = secret.chars().collect();

    if chars.len() <= 8 {
        return "(invalid)".to_string();
    }

    let head: String = chars[..6].iter().collect();
    let tail: String = chars[chars.len() - 2..].iter().collect();
    format!("{head}…{tail}")
}

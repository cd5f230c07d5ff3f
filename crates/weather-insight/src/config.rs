use std::collections::HashMap;

use thiserror::Error;

use crate::model::{Coordinate, ValidationError};
use crate::prompt::PromptLanguage;

pub const GEMINI_API_KEY_ENV: &str = "GEMINI_API_KEY";
pub const GEMINI_MODEL_ENV: &str = "GEMINI_MODEL";
pub const GEMINI_ENDPOINT_ENV: &str = "GEMINI_ENDPOINT";
pub const OPEN_METEO_ENDPOINT_ENV: &str = "OPEN_METEO_ENDPOINT";
pub const DEFAULT_LAT_ENV: &str = "WEATHER_INSIGHT_DEFAULT_LAT";
pub const DEFAULT_LON_ENV: &str = "WEATHER_INSIGHT_DEFAULT_LON";
pub const LANGUAGE_ENV: &str = "WEATHER_INSIGHT_LANG";
pub const LOG_ENV: &str = "WEATHER_INSIGHT_LOG";

pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_GEMINI_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_OPEN_METEO_ENDPOINT: &str = "https://api.open-meteo.com/v1/forecast";
// Tehran.
pub const DEFAULT_LATITUDE: f64 = 35.6892;
pub const DEFAULT_LONGITUDE: f64 = 51.3890;

#[derive(Debug, Clone, PartialEq)]
pub struct RuntimeConfig {
    pub gemini_api_key: Option<String>,
    pub gemini_model: String,
    pub gemini_endpoint: String,
    pub open_meteo_endpoint: String,
    pub default_coordinate: Coordinate,
    pub language: PromptLanguage,
}

impl RuntimeConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_pairs(std::env::vars())
    }

    pub fn from_pairs<I, K, V>(pairs: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let env_map: HashMap<String, String> = pairs
            .into_iter()
            .map(|(key, value)| (key.into(), value.into()))
            .collect();
        let lookup = |key: &str| {
            env_map
                .get(key)
                .map(|value| value.trim())
                .filter(|value| !value.is_empty())
        };

        let language = match lookup(LANGUAGE_ENV) {
            Some(raw) => PromptLanguage::parse(raw)
                .ok_or_else(|| ConfigError::InvalidLanguage(raw.to_string()))?,
            None => PromptLanguage::default(),
        };

        Ok(Self {
            gemini_api_key: lookup(GEMINI_API_KEY_ENV).map(ToOwned::to_owned),
            gemini_model: lookup(GEMINI_MODEL_ENV)
                .unwrap_or(DEFAULT_GEMINI_MODEL)
                .to_string(),
            gemini_endpoint: normalize_endpoint(
                lookup(GEMINI_ENDPOINT_ENV).unwrap_or(DEFAULT_GEMINI_ENDPOINT),
            ),
            open_meteo_endpoint: normalize_endpoint(
                lookup(OPEN_METEO_ENDPOINT_ENV).unwrap_or(DEFAULT_OPEN_METEO_ENDPOINT),
            ),
            default_coordinate: resolve_default_coordinate(
                lookup(DEFAULT_LAT_ENV),
                lookup(DEFAULT_LON_ENV),
            )?,
            language,
        })
    }
}

fn normalize_endpoint(raw: &str) -> String {
    raw.trim_end_matches('/').to_string()
}

fn resolve_default_coordinate(
    lat: Option<&str>,
    lon: Option<&str>,
) -> Result<Coordinate, ConfigError> {
    let lat = lat.map_or_else(|| DEFAULT_LATITUDE.to_string(), ToOwned::to_owned);
    let lon = lon.map_or_else(|| DEFAULT_LONGITUDE.to_string(), ToOwned::to_owned);
    Coordinate::parse(&lat, &lon).map_err(ConfigError::InvalidDefaultCoordinate)
}

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("invalid WEATHER_INSIGHT_DEFAULT_LAT/WEATHER_INSIGHT_DEFAULT_LON: {0}")]
    InvalidDefaultCoordinate(#[source] ValidationError),
    #[error("invalid WEATHER_INSIGHT_LANG: {0} (expected fa|en)")]
    InvalidLanguage(String),
}

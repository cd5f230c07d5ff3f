use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::DashboardError;
use crate::model::{
    Coordinate, CurrentConditions, DailySeries, ForecastResult, HourlySeries, LocationEcho,
};

use super::{ForecastApi, build_http_client, execute_request};

const FORECAST_DAILY_FIELDS: &str =
    "temperature_2m_max,temperature_2m_min,weather_code,precipitation_sum";
const FORECAST_HOURLY_FIELDS: &str = "temperature_2m,relative_humidity_2m,wind_speed_10m";
const FORECAST_DAYS: usize = 7;
const FALLBACK_MESSAGE: &str = "Failed to fetch weather data";

#[derive(Debug, Serialize)]
struct ForecastQuery<'a> {
    latitude: f64,
    longitude: f64,
    daily: &'a str,
    hourly: &'a str,
    current_weather: bool,
    timezone: &'a str,
    forecast_days: usize,
}

#[derive(Debug, Deserialize)]
struct ForecastResponse {
    latitude: f64,
    longitude: f64,
    elevation: Option<f64>,
    timezone: Option<String>,
    #[serde(default)]
    timezone_abbreviation: String,
    #[serde(default)]
    utc_offset_seconds: i32,
    current_weather: Option<CurrentWeather>,
    daily: Option<DailyPayload>,
    hourly: Option<HourlyPayload>,
}

#[derive(Debug, Deserialize)]
struct CurrentWeather {
    time: String,
    temperature: f64,
    windspeed: f64,
    winddirection: f64,
    weathercode: i64,
}

#[derive(Debug, Deserialize)]
struct DailyPayload {
    #[serde(default)]
    time: Vec<String>,
    #[serde(default)]
    temperature_2m_max: Vec<f64>,
    #[serde(default)]
    temperature_2m_min: Vec<f64>,
    #[serde(default)]
    weather_code: Vec<i64>,
    // Only precipitation may be null; it reads as no rain.
    #[serde(default)]
    precipitation_sum: Vec<Option<f64>>,
}

#[derive(Debug, Deserialize)]
struct HourlyPayload {
    #[serde(default)]
    time: Vec<String>,
    #[serde(default)]
    temperature_2m: Vec<Option<f64>>,
    #[serde(default)]
    relative_humidity_2m: Vec<Option<f64>>,
    #[serde(default)]
    wind_speed_10m: Vec<Option<f64>>,
}

/// Blocking Open-Meteo forecast client. One GET per `fetch`, no retries.
#[derive(Debug, Clone)]
pub struct OpenMeteoClient {
    client: Client,
    endpoint: String,
}

impl OpenMeteoClient {
    pub fn new(endpoint: impl Into<String>) -> Result<Self, DashboardError> {
        Ok(Self {
            client: build_http_client()?,
            endpoint: endpoint.into(),
        })
    }
}

impl ForecastApi for OpenMeteoClient {
    fn fetch(&self, coordinate: Coordinate) -> Result<ForecastResult, DashboardError> {
        let query = ForecastQuery {
            latitude: coordinate.latitude(),
            longitude: coordinate.longitude(),
            daily: FORECAST_DAILY_FIELDS,
            hourly: FORECAST_HOURLY_FIELDS,
            current_weather: true,
            timezone: "auto",
            forecast_days: FORECAST_DAYS,
        };
        debug!(endpoint = %self.endpoint, "requesting forecast");

        let body = execute_request(
            self.client.get(&self.endpoint).query(&query),
            FALLBACK_MESSAGE,
        )?;
        parse_forecast_response(&body)
    }
}

fn invalid(message: impl std::fmt::Display) -> DashboardError {
    DashboardError::provider(None, format!("forecast payload: {message}"))
}

/// Decodes a 2xx forecast body. Malformed payloads map to a provider error without status.
pub fn parse_forecast_response(body: &str) -> Result<ForecastResult, DashboardError> {
    let payload: ForecastResponse = serde_json::from_str(body).map_err(invalid)?;

    let timezone = payload
        .timezone
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .ok_or_else(|| invalid("missing timezone"))?;
    let current = payload
        .current_weather
        .ok_or_else(|| invalid("missing current_weather"))?;
    let daily = payload.daily.ok_or_else(|| invalid("missing daily"))?;

    let daily = DailySeries::new(
        daily.time,
        daily.temperature_2m_max,
        daily.temperature_2m_min,
        daily.weather_code,
        daily
            .precipitation_sum
            .into_iter()
            .map(|value| value.unwrap_or(0.0))
            .collect(),
    )
    .map_err(|error| DashboardError::provider(None, error.to_string()))?;

    let hourly = payload
        .hourly
        .map(|hourly| {
            HourlySeries::new(
                hourly.time,
                hourly.temperature_2m,
                hourly.relative_humidity_2m,
                hourly.wind_speed_10m,
            )
        })
        .transpose()
        .map_err(|error| DashboardError::provider(None, error.to_string()))?;

    Ok(ForecastResult {
        location: LocationEcho {
            latitude: payload.latitude,
            longitude: payload.longitude,
            timezone,
            timezone_abbreviation: payload.timezone_abbreviation,
            utc_offset_seconds: payload.utc_offset_seconds,
            elevation: payload.elevation,
        },
        current: CurrentConditions {
            temperature_c: current.temperature,
            wind_speed_kmh: current.windspeed,
            wind_direction_deg: current.winddirection,
            weather_code: current.weathercode,
            time: current.time,
        },
        daily,
        hourly,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const BODY: &str = r#"{
        "latitude": 35.7,
        "longitude": 51.4,
        "elevation": 1191.0,
        "timezone": "Asia/Tehran",
        "timezone_abbreviation": "GMT+3:30",
        "utc_offset_seconds": 12600,
        "current_weather": {
            "time": "2026-10-18T14:30",
            "temperature": 21.4,
            "windspeed": 9.7,
            "winddirection": 245,
            "weathercode": 1,
            "is_day": 1
        },
        "daily": {
            "time": ["2026-10-18", "2026-10-19"],
            "temperature_2m_max": [24.1, 23.0],
            "temperature_2m_min": [12.3, 11.9],
            "weather_code": [0, 61],
            "precipitation_sum": [null, 4.2]
        },
        "hourly": {
            "time": ["2026-10-18T00:00", "2026-10-18T01:00"],
            "temperature_2m": [14.0, 13.5],
            "relative_humidity_2m": [40, null],
            "wind_speed_10m": [5.1, 4.8]
        }
    }"#;

    #[test]
    fn open_meteo_forecast_parses_location_current_and_series() {
        let forecast = parse_forecast_response(BODY).expect("forecast");

        assert_eq!(forecast.location.timezone, "Asia/Tehran");
        assert_eq!(forecast.location.utc_offset_seconds, 12_600);
        assert_eq!(forecast.location.elevation, Some(1191.0));
        assert_eq!(forecast.current.temperature_c, 21.4);
        assert_eq!(forecast.current.wind_direction_deg, 245.0);
        assert_eq!(forecast.current.weather_code, 1);
        assert_eq!(forecast.daily.len(), 2);
        let hourly = serde_json::to_value(&forecast.hourly).expect("hourly json");
        assert_eq!(hourly["times"].as_array().map(Vec::len), Some(2));
        assert_eq!(hourly["relative_humidity_pct"][1], serde_json::Value::Null);
    }

    #[test]
    fn open_meteo_forecast_treats_null_precipitation_as_zero() {
        let forecast = parse_forecast_response(BODY).expect("forecast");
        let first = forecast.daily.get(0).expect("first day");
        assert_eq!(first.precipitation_mm, 0.0);
        assert_eq!(forecast.daily.get(1).expect("second day").precipitation_mm, 4.2);
    }

    #[test]
    fn open_meteo_forecast_rejects_mismatched_daily_lengths() {
        let body = BODY.replace(r#""weather_code": [0, 61]"#, r#""weather_code": [0]"#);
        let error = parse_forecast_response(&body).expect_err("must fail");

        assert!(
            matches!(&error, DashboardError::Provider { status: None, message } if message.contains("length mismatch")),
            "unexpected error: {error:?}"
        );
    }

    #[test]
    fn open_meteo_forecast_rejects_null_daily_temperature() {
        let body = BODY.replace(
            r#""temperature_2m_max": [24.1, 23.0]"#,
            r#""temperature_2m_max": [24.1, null]"#,
        );
        let error = parse_forecast_response(&body).expect_err("must fail");

        assert!(
            matches!(&error, DashboardError::Provider { status: None, message } if message.starts_with("forecast payload:")),
            "unexpected error: {error:?}"
        );
    }

    #[test]
    fn open_meteo_forecast_rejects_missing_current_weather() {
        let body = r#"{"latitude": 1.0, "longitude": 2.0, "timezone": "GMT", "daily": {}}"#;
        let error = parse_forecast_response(body).expect_err("must fail");
        assert_eq!(
            error,
            DashboardError::provider(None, "forecast payload: missing current_weather")
        );
    }

    #[test]
    fn open_meteo_forecast_rejects_non_json_body() {
        let error = parse_forecast_response("not json").expect_err("must fail");
        assert!(matches!(error, DashboardError::Provider { status: None, .. }));
    }

    #[test]
    fn open_meteo_query_requests_daily_hourly_and_current_fields() {
        let query = ForecastQuery {
            latitude: 35.6892,
            longitude: 51.389,
            daily: FORECAST_DAILY_FIELDS,
            hourly: FORECAST_HOURLY_FIELDS,
            current_weather: true,
            timezone: "auto",
            forecast_days: FORECAST_DAYS,
        };
        let value = serde_json::to_value(&query).expect("serialize");

        assert_eq!(value["daily"], FORECAST_DAILY_FIELDS);
        assert_eq!(value["current_weather"], true);
        assert_eq!(value["timezone"], "auto");
        assert_eq!(value["forecast_days"], 7);
    }
}

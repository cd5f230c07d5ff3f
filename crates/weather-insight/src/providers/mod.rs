use reqwest::blocking::{Client, RequestBuilder};
use serde_json::Value;

use crate::error::DashboardError;
use crate::model::{Coordinate, ForecastResult};

pub mod gemini;
pub mod open_meteo;

/// Stage 1 of a cycle: one forecast fetch per call.
pub trait ForecastApi {
    fn fetch(&self, coordinate: Coordinate) -> Result<ForecastResult, DashboardError>;
}

/// Stage 2 of a cycle: one summary request per call.
pub trait InterpretationApi {
    fn interpret(&self, forecast: &ForecastResult) -> Result<String, DashboardError>;
}

impl<T: ForecastApi + ?Sized> ForecastApi for &T {
    fn fetch(&self, coordinate: Coordinate) -> Result<ForecastResult, DashboardError> {
        (**self).fetch(coordinate)
    }
}

impl<T: InterpretationApi + ?Sized> InterpretationApi for &T {
    fn interpret(&self, forecast: &ForecastResult) -> Result<String, DashboardError> {
        (**self).interpret(forecast)
    }
}

pub(crate) fn build_http_client() -> Result<Client, DashboardError> {
    Client::builder()
        .build()
        .map_err(|error| DashboardError::network(error.to_string()))
}

/// Sends the request and returns the body of a 2xx response.
pub(crate) fn execute_request(
    request: RequestBuilder,
    fallback_message: &str,
) -> Result<String, DashboardError> {
    let response = request
        .send()
        .map_err(|error| DashboardError::network(error.without_url().to_string()))?;
    let status = response.status();
    let body = response
        .text()
        .map_err(|error| DashboardError::network(error.without_url().to_string()))?;

    if status.is_success() {
        return Ok(body);
    }

    let message = extract_error_message(&body).unwrap_or_else(|| {
        status
            .canonical_reason()
            .unwrap_or(fallback_message)
            .to_string()
    });

    Err(DashboardError::provider(Some(status.as_u16()), message))
}

/// Pulls a human message out of a JSON error body. Non-JSON bodies yield `None`.
pub(crate) fn extract_error_message(body: &str) -> Option<String> {
    let json = serde_json::from_str::<Value>(body.trim()).ok()?;

    let nested = json.get("error").and_then(|error| error.get("message"));
    ["reason", "message", "error"]
        .into_iter()
        .filter_map(|key| json.get(key))
        .chain(nested)
        .filter_map(Value::as_str)
        .map(str::trim)
        .find(|message| !message.is_empty())
        .map(ToOwned::to_owned)
}

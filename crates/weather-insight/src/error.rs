use thiserror::Error;

use crate::model::ValidationError;

/// Failures a client call can run into, one variant per origin.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum DashboardError {
    #[error("network error: {0}")]
    Network(String),
    #[error("provider error{}: {message}", status_suffix(.status))]
    Provider { status: Option<u16>, message: String },
    #[error("{0}")]
    Configuration(String),
}

fn status_suffix(status: &Option<u16>) -> String {
    status.map(|code| format!(" ({code})")).unwrap_or_default()
}

impl DashboardError {
    pub fn provider(status: Option<u16>, message: impl Into<String>) -> Self {
        Self::Provider {
            status,
            message: message.into(),
        }
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self::Network(message.into())
    }

    /// Message stored in the forecast stage's error slot.
    pub fn forecast_message(&self) -> String {
        match self {
            Self::Provider {
                status: Some(status),
                message,
            } => format!(
                "Failed to retrieve weather information: HTTP error! Status: {status}. Message: {message}"
            ),
            Self::Provider {
                status: None,
                message,
            } => format!("Failed to retrieve weather information: {message}"),
            Self::Network(message) => {
                format!("Failed to retrieve weather information: {message}")
            }
            Self::Configuration(message) => message.clone(),
        }
    }

    /// Message stored in the interpretation stage's error slot.
    pub fn interpretation_message(&self) -> String {
        match self {
            Self::Configuration(message) => message.clone(),
            Self::Provider {
                status: Some(status),
                message,
            } => format!("Failed to get AI interpretation: ({status}) {message}"),
            Self::Provider {
                status: None,
                message,
            }
            | Self::Network(message) => format!("Failed to get AI interpretation: {message}"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    User,
    Runtime,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppError {
    pub kind: ErrorKind,
    pub message: String,
}

impl AppError {
    pub fn user(message: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::User,
            message: message.into(),
        }
    }

    pub fn runtime(message: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::Runtime,
            message: message.into(),
        }
    }

    pub fn exit_code(&self) -> i32 {
        match self.kind {
            ErrorKind::User => 2,
            ErrorKind::Runtime => 1,
        }
    }
}

impl From<ValidationError> for AppError {
    fn from(error: ValidationError) -> Self {
        Self::user(error.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_forecast_message_formats_http_failures() {
        let error = DashboardError::provider(Some(429), "rate limited");
        assert_eq!(
            error.forecast_message(),
            "Failed to retrieve weather information: HTTP error! Status: 429. Message: rate limited"
        );
    }

    #[test]
    fn error_forecast_message_formats_transport_failures() {
        let error = DashboardError::network("connection refused");
        assert_eq!(
            error.forecast_message(),
            "Failed to retrieve weather information: connection refused"
        );
    }

    #[test]
    fn error_interpretation_message_keeps_configuration_text() {
        let error = DashboardError::Configuration("Gemini API key is not configured.".into());
        assert_eq!(
            error.interpretation_message(),
            "Gemini API key is not configured."
        );
    }

    #[test]
    fn error_interpretation_message_prefixes_provider_failures() {
        let error = DashboardError::provider(None, "AI did not return a valid interpretation.");
        assert_eq!(
            error.interpretation_message(),
            "Failed to get AI interpretation: AI did not return a valid interpretation."
        );
    }

    #[test]
    fn error_display_includes_status_when_known() {
        assert_eq!(
            DashboardError::provider(Some(503), "down").to_string(),
            "provider error (503): down"
        );
        assert_eq!(
            DashboardError::provider(None, "bad json").to_string(),
            "provider error: bad json"
        );
    }

    #[test]
    fn exit_code_mapping_user_and_runtime_are_stable() {
        assert_eq!(AppError::user("x").exit_code(), 2);
        assert_eq!(AppError::runtime("x").exit_code(), 1);
    }

    #[test]
    fn validation_errors_map_to_user_kind() {
        let error: AppError = ValidationError::NotANumber.into();
        assert_eq!(error.kind, ErrorKind::User);
    }
}

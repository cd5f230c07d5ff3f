use std::fmt;

use serde_json::{Value, json};

use crate::redaction::redact_sensitive;

pub const ENVELOPE_SCHEMA_VERSION: &str = "v1";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    Human,
    Json,
}

impl OutputMode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Human => "human",
            Self::Json => "json",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutputModeSelectionError {
    pub explicit: OutputMode,
}

impl fmt::Display for OutputModeSelectionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "conflicting output flags: --json requires --output json (got {})",
            self.explicit.as_str()
        )
    }
}

impl std::error::Error for OutputModeSelectionError {}

pub fn select_output_mode(
    explicit: Option<OutputMode>,
    json_flag: bool,
    default_mode: OutputMode,
) -> Result<OutputMode, OutputModeSelectionError> {
    match (explicit, json_flag) {
        (Some(mode), true) if mode != OutputMode::Json => {
            Err(OutputModeSelectionError { explicit: mode })
        }
        (Some(mode), _) => Ok(mode),
        (None, true) => Ok(OutputMode::Json),
        (None, false) => Ok(default_mode),
    }
}

pub fn success_envelope(command: &str, result: Value) -> serde_json::Result<String> {
    serde_json::to_string(&json!({
        "schema_version": ENVELOPE_SCHEMA_VERSION,
        "command": command,
        "ok": true,
        "result": result,
    }))
}

/// Builds the failure envelope. The message is redacted before it is embedded.
pub fn error_envelope(command: &str, code: &str, message: &str, kind: &str, exit_code: i32) -> String {
    let payload = json!({
        "schema_version": ENVELOPE_SCHEMA_VERSION,
        "command": command,
        "ok": false,
        "error": {
            "code": code,
            "message": redact_sensitive(message),
            "details": {
                "kind": kind,
                "exit_code": exit_code,
            }
        }
    });

    serde_json::to_string(&payload).unwrap_or_else(|_| {
        format!(
            "{{\"schema_version\":\"{ENVELOPE_SCHEMA_VERSION}\",\"ok\":false,\"error\":{{\"code\":\"runtime.serialize_failed\"}}}}"
        )
    })
}

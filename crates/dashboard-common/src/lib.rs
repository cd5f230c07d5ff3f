//! Shared dashboard plumbing.
//!
//! - `output_contract`: output-mode selection and the JSON envelope contract.
//! - `redaction`: masking of credentials in user-visible messages.
//! - `logging`: stderr tracing subscriber setup.

#![deny(clippy::unwrap_used, clippy::expect_used)]
#![cfg_attr(test, allow(clippy::unwrap_used, clippy::expect_used))]

pub mod logging;
pub mod output_contract;
pub mod redaction;

pub use logging::{DEFAULT_LOG_DIRECTIVE, init_tracing};
pub use output_contract::{
    ENVELOPE_SCHEMA_VERSION, OutputMode, OutputModeSelectionError, error_envelope,
    select_output_mode, success_envelope,
};
pub use redaction::{mask_secret, redact_sensitive};

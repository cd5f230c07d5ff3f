#![deny(clippy::unwrap_used, clippy::expect_used)]
#![cfg_attr(test, allow(clippy::unwrap_used, clippy::expect_used))]

pub mod config;
pub mod dashboard;
pub mod error;
pub mod model;
pub mod prompt;
pub mod providers;
pub mod render;
pub mod weather_code;

#[cfg(test)]
mod fixtures;

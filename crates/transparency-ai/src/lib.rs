//! Core library for the product transparency platform: configuration,
//! telemetry, and the disclosure intake / report workflows composed by the
//! `transparency-ai-api` service binary.

pub mod config;
pub mod error;
pub mod telemetry;
pub mod workflows;

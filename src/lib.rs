//! cli-template: a Rust CLI starter with layered configuration and logging
//!
//! The interesting part lives in [`config`]: environment/YAML-driven
//! settings resolution with validation, caching, and explicit reload. The
//! CLI commands are thin demonstrations built on top of it.

pub mod cli;
pub mod config;
pub mod logging;

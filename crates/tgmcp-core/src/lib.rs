//! Core domain + application contracts for the Telegram MCP server.
//!
//! This crate is intentionally transport-agnostic. The Telegram HTTP client
//! and the MCP wire layer live in adapter crates behind the `BotApi` port.

pub mod config;
pub mod domain;
pub mod errors;
pub mod logging;
pub mod ports;
pub mod utils;

pub use errors::{Error, Result};

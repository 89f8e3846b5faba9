//! Telegram Bot API adapter.
//!
//! Implements the `tgmcp-core` `BotApi` port over HTTPS: one POST per remote
//! operation against `{api_base}/bot{token}/{method}`, responses unwrapped
//! from Telegram's `{ok, result, description, error_code}` envelope into
//! typed results or classified errors.

pub mod client;
pub mod envelope;
pub mod facade;

mod auth;
mod chat;
mod messaging;
mod updates;

pub use client::{ApiClient, CallOptions};
pub use facade::TelegramBot;

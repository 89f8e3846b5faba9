use std::{env, fs, path::Path, time::Duration};

use crate::{errors::Error, Result};

pub const DEFAULT_API_BASE: &str = "https://api.telegram.org";

/// Typed configuration for the server.
///
/// Everything comes from the environment (optionally seeded from a `.env`
/// file that never overrides variables already set).
#[derive(Clone, Debug)]
pub struct Config {
    /// Bot token. Required, non-empty; only ever used to derive the base URL.
    pub telegram_bot_token: String,
    /// API origin, overridable for tests / local Bot API servers.
    pub api_base: String,
    /// Default per-request HTTP timeout.
    pub request_timeout: Duration,
    /// Added on top of a `getUpdates` long-poll `timeout` so the HTTP
    /// deadline always outlives Telegram's own.
    pub long_poll_grace: Duration,
}

impl Config {
    pub fn load() -> Result<Self> {
        load_dotenv_if_present(Path::new(".env"));

        let telegram_bot_token = env_str("TELEGRAM_BOT_TOKEN").unwrap_or_default();
        if telegram_bot_token.trim().is_empty() {
            return Err(Error::Config(
                "TELEGRAM_BOT_TOKEN environment variable is required".to_string(),
            ));
        }

        let api_base = env_str("TELEGRAM_API_BASE")
            .and_then(non_empty)
            .unwrap_or_else(|| DEFAULT_API_BASE.to_string());

        let request_timeout =
            Duration::from_millis(env_u64("REQUEST_TIMEOUT_MS").unwrap_or(30_000));
        let long_poll_grace =
            Duration::from_millis(env_u64("LONG_POLL_GRACE_MS").unwrap_or(10_000));

        Ok(Self {
            telegram_bot_token,
            api_base,
            request_timeout,
            long_poll_grace,
        })
    }
}

fn load_dotenv_if_present(path: &Path) {
    let Ok(contents) = fs::read_to_string(path) else {
        return;
    };
    tracing::debug!(path = %path.display(), "loading .env file");

    for raw in contents.lines() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let Some((k, v)) = line.split_once('=') else {
            continue;
        };

        let key = k.trim();
        if key.is_empty() {
            continue;
        }
        if env::var_os(key).is_some() {
            continue; // do not override existing env
        }

        let mut val = v.trim().to_string();
        // Strip optional surrounding quotes.
        if val.len() >= 2
            && ((val.starts_with('"') && val.ends_with('"'))
                || (val.starts_with('\'') && val.ends_with('\'')))
        {
            val = val[1..val.len() - 1].to_string();
        }

        env::set_var(key, val);
    }
}

fn env_str(key: &str) -> Option<String> {
    env::var(key).ok()
}

fn env_u64(key: &str) -> Option<u64> {
    env_str(key).and_then(|s| s.trim().parse::<u64>().ok())
}

fn non_empty(s: String) -> Option<String> {
    if s.trim().is_empty() {
        None
    } else {
        Some(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Env-var tests mutate process state; keep them in one test so they
    // cannot race each other under the parallel test runner.
    #[test]
    fn load_requires_token_and_applies_defaults() {
        env::remove_var("TELEGRAM_BOT_TOKEN");
        env::remove_var("TELEGRAM_API_BASE");
        env::remove_var("REQUEST_TIMEOUT_MS");
        env::remove_var("LONG_POLL_GRACE_MS");

        let err = Config::load().unwrap_err();
        assert!(matches!(err, Error::Config(_)));

        env::set_var("TELEGRAM_BOT_TOKEN", "   ");
        assert!(matches!(Config::load(), Err(Error::Config(_))));

        env::set_var("TELEGRAM_BOT_TOKEN", "123:abc");
        let cfg = Config::load().unwrap();
        assert_eq!(cfg.telegram_bot_token, "123:abc");
        assert_eq!(cfg.api_base, DEFAULT_API_BASE);
        assert_eq!(cfg.request_timeout, Duration::from_millis(30_000));
        assert_eq!(cfg.long_poll_grace, Duration::from_millis(10_000));

        env::set_var("TELEGRAM_API_BASE", "http://127.0.0.1:8081");
        env::set_var("REQUEST_TIMEOUT_MS", "5000");
        let cfg = Config::load().unwrap();
        assert_eq!(cfg.api_base, "http://127.0.0.1:8081");
        assert_eq!(cfg.request_timeout, Duration::from_millis(5000));

        env::remove_var("TELEGRAM_BOT_TOKEN");
        env::remove_var("TELEGRAM_API_BASE");
        env::remove_var("REQUEST_TIMEOUT_MS");
    }
}

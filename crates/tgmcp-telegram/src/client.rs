use std::time::Duration;

use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

use tgmcp_core::{config::Config, errors::Error, Result};

use crate::envelope::decode_body;

/// Stable user-facing prefix for anything that goes wrong during a call,
/// local or remote, so callers see one error surface.
const REQUEST_FAILED: &str = "Telegram API request failed";

/// Per-call transport overrides.
#[derive(Clone, Copy, Debug, Default)]
pub struct CallOptions {
    /// Replaces the client's default HTTP timeout for this call only.
    /// `getUpdates` long polls use this to outlive their own poll window.
    pub timeout: Option<Duration>,
}

/// One HTTP POST per remote operation against
/// `{api_base}/bot{token}/{method}`.
///
/// Holds the only copy of the bot token (inside the derived URL); it is
/// never logged and does not appear in `Debug` output.
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    default_timeout: Duration,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("default_timeout", &self.default_timeout)
            .finish_non_exhaustive()
    }
}

impl ApiClient {
    /// Fails fast on an empty token: a client that would silently target an
    /// invalid endpoint must never be constructed.
    pub fn new(token: &str, api_base: &str, default_timeout: Duration) -> Result<Self> {
        if token.trim().is_empty() {
            return Err(Error::Config("Telegram bot token is required".to_string()));
        }

        let http = reqwest::Client::builder()
            .build()
            .map_err(|e| Error::Config(format!("http client build failed: {e}")))?;

        Ok(Self {
            http,
            base_url: format!("{}/bot{}", api_base.trim_end_matches('/'), token),
            default_timeout,
        })
    }

    pub fn from_config(cfg: &Config) -> Result<Self> {
        Self::new(&cfg.telegram_bot_token, &cfg.api_base, cfg.request_timeout)
    }

    /// Issue one POST for `method` with `params` as the JSON body and decode
    /// the envelope. No retries; rate-limit classification is surfaced so a
    /// caller may wait `retry_after` itself.
    pub async fn call<T: DeserializeOwned>(
        &self,
        method: &str,
        params: Value,
        opts: CallOptions,
    ) -> Result<T> {
        debug!(method, "telegram api call");

        let timeout = opts.timeout.unwrap_or(self.default_timeout);

        let response = self
            .http
            .post(format!("{}/{}", self.base_url, method))
            .timeout(timeout)
            .json(&params)
            .send()
            .await
            .map_err(|e| wrap(Error::Transport(e.to_string())))?;

        // Telegram reports failures inside the envelope; non-2xx statuses
        // still carry one, so the body decides, not the status line.
        let body = response
            .text()
            .await
            .map_err(|e| wrap(Error::Transport(e.to_string())))?;

        decode_body(&body).map_err(wrap)
    }
}

/// Re-wrap a failure with the stable prefix while keeping its class, so
/// auth stays non-retryable and rate limits keep their delay.
fn wrap(e: Error) -> Error {
    match e {
        Error::Transport(m) => Error::Transport(format!("{REQUEST_FAILED}: {m}")),
        Error::Protocol(m) => Error::Protocol(format!("{REQUEST_FAILED}: {m}")),
        Error::Auth { code, description } => Error::Auth {
            code,
            description: format!("{REQUEST_FAILED}: {description}"),
        },
        Error::RateLimited {
            description,
            retry_after_secs,
        } => Error::RateLimited {
            description: format!("{REQUEST_FAILED}: {description}"),
            retry_after_secs,
        },
        Error::Api { code, description } => Error::Api {
            code,
            description: format!("{REQUEST_FAILED}: {description}"),
        },
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_token_fails_at_construction() {
        let err = ApiClient::new("", "https://api.telegram.org", Duration::from_secs(30))
            .unwrap_err();
        assert!(matches!(err, Error::Config(_)), "{err:?}");

        let err = ApiClient::new("   ", "https://api.telegram.org", Duration::from_secs(30))
            .unwrap_err();
        assert!(matches!(err, Error::Config(_)), "{err:?}");
    }

    #[test]
    fn base_url_embeds_token_and_trims_slash() {
        let client =
            ApiClient::new("123:abc", "https://api.telegram.org/", Duration::from_secs(30))
                .unwrap();
        assert_eq!(client.base_url, "https://api.telegram.org/bot123:abc");
    }

    #[test]
    fn debug_output_never_contains_the_token() {
        let client =
            ApiClient::new("123:secret", "https://api.telegram.org", Duration::from_secs(30))
                .unwrap();
        let debug = format!("{client:?}");
        assert!(!debug.contains("secret"));
    }

    #[test]
    fn wrap_prefixes_but_preserves_class() {
        let e = wrap(Error::Transport("connection refused".to_string()));
        assert_eq!(
            e.to_string(),
            "Telegram API request failed: connection refused"
        );
        assert!(e.is_retryable());

        let e = wrap(Error::Api {
            code: Some(400),
            description: "Chat not found".to_string(),
        });
        // The stable prefix leads the user-facing message.
        assert_eq!(e.to_string(), "Telegram API request failed: Chat not found");
        assert!(!e.is_retryable());

        let e = wrap(Error::RateLimited {
            description: "Too Many Requests".to_string(),
            retry_after_secs: Some(9),
        });
        assert_eq!(e.retry_after_secs(), Some(9));

        let e = wrap(Error::Auth {
            code: 401,
            description: "Unauthorized".to_string(),
        });
        assert!(matches!(e, Error::Auth { code: 401, .. }));
    }

    #[tokio::test]
    async fn transport_failure_is_wrapped() {
        // Reserved TEST-NET address: the connection attempt fails locally.
        let client = ApiClient::new(
            "123:abc",
            "http://192.0.2.1:9",
            Duration::from_millis(50),
        )
        .unwrap();
        let err = client
            .call::<serde_json::Value>("getMe", serde_json::json!({}), CallOptions::default())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Transport(_)), "{err:?}");
        assert!(err.to_string().starts_with("Telegram API request failed:"), "{err}");
    }
}

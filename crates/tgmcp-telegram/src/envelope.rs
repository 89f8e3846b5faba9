//! The generic success/failure wrapper Telegram returns for every call.

use serde::Deserialize;

use tgmcp_core::{errors::Error, Result};

/// Wire contract: when `ok` is true `result` is present; when `ok` is false
/// `description` is present (with `error_code` and sometimes `parameters`).
/// Never constructed locally outside of tests.
#[derive(Debug, Deserialize)]
pub struct ResponseEnvelope<T> {
    pub ok: bool,
    pub result: Option<T>,
    pub description: Option<String>,
    pub error_code: Option<i64>,
    pub parameters: Option<ResponseParameters>,
}

#[derive(Debug, Deserialize)]
pub struct ResponseParameters {
    pub migrate_to_chat_id: Option<i64>,
    pub retry_after: Option<u64>,
}

const NO_DESCRIPTION: &str = "Unknown error occurred";

/// Pure classification of a decoded envelope: the unwrapped result, or an
/// error sorted into the workspace taxonomy (auth / rate-limit / generic
/// api / protocol).
pub fn unwrap_envelope<T>(envelope: ResponseEnvelope<T>) -> Result<T> {
    if !envelope.ok {
        let description = envelope
            .description
            .unwrap_or_else(|| NO_DESCRIPTION.to_string());

        return Err(match envelope.error_code {
            Some(code @ (401 | 403)) => Error::Auth { code, description },
            Some(429) => Error::RateLimited {
                description,
                retry_after_secs: envelope.parameters.and_then(|p| p.retry_after),
            },
            code => Error::Api { code, description },
        });
    }

    envelope
        .result
        .ok_or_else(|| Error::Protocol("malformed success envelope: result is missing".to_string()))
}

/// Parse a raw response body and classify it. A body that is not a valid
/// envelope at all is a remote contract violation, not a transport failure.
pub fn decode_body<T: serde::de::DeserializeOwned>(body: &str) -> Result<T> {
    let envelope: ResponseEnvelope<T> = serde_json::from_str(body)
        .map_err(|e| Error::Protocol(format!("response is not a Telegram envelope: {e}")))?;
    unwrap_envelope(envelope)
}

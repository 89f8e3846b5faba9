/// Error taxonomy shared by every crate in the workspace.
///
/// Adapter crates map their failures into this type so callers see one
/// taxonomy regardless of whether a failure was local (validation, decoding)
/// or remote (Telegram rejected the call).
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Fatal startup problem (missing/empty bot token). The process should
    /// not reach the transport with one of these.
    #[error("config error: {0}")]
    Config(String),

    /// Tool arguments or operation parameters failed a local invariant.
    #[error("validation error: {0}")]
    Validation(String),

    /// No structured response reached us (network failure, timeout).
    /// Displays as the bare description so the client's stable
    /// "Telegram API request failed:" prefix stays at the front of the
    /// user-facing message. The same holds for the other remote variants.
    #[error("{0}")]
    Transport(String),

    /// Telegram rejected the token (401/403). Not retryable.
    #[error("{description}")]
    Auth { code: i64, description: String },

    /// Telegram throttled us (429). Retryable after `retry_after_secs`.
    #[error("{description}")]
    RateLimited {
        description: String,
        retry_after_secs: Option<u64>,
    },

    /// Any other non-ok envelope from Telegram.
    #[error("{description}")]
    Api {
        code: Option<i64>,
        description: String,
    },

    /// The remote broke its own contract (e.g. `ok: true` without a result).
    #[error("{0}")]
    Protocol(String),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Whether a caller may reasonably retry the operation. Only rate limits
    /// and transport failures qualify; everything else is deterministic.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Error::RateLimited { .. } | Error::Transport(_))
    }

    /// Seconds Telegram asked us to wait, when it told us.
    pub fn retry_after_secs(&self) -> Option<u64> {
        match self {
            Error::RateLimited {
                retry_after_secs, ..
            } => *retry_after_secs,
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

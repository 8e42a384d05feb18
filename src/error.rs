//! Error types for saltapi-client.

use thiserror::Error;

/// Boxed error produced by a wrapped client.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Main error type for all dispatch operations.
#[derive(Debug, Error)]
pub enum SaltApiError {
    /// Neither `token` nor `eauth` was supplied.
    #[error("No authentication credentials given")]
    AuthenticationRequired,

    /// A `wheel.`/`runner.` prefixed function was combined with a client
    /// other than `sync` or `async`.
    #[error("With fun of \"{fun}\", client must be \"sync\" or \"async\" not \"{client}\".")]
    InvalidClientMode { client: String, fun: String },

    /// No handler is registered under the resolved client name.
    #[error("Unknown client: {0}")]
    UnknownClient(String),

    /// A positional parameter of the selected call is absent.
    #[error("Missing argument '{arg}' for client {client}")]
    MissingArgument {
        client: &'static str,
        arg: &'static str,
    },

    /// A parameter is present but has an unusable type.
    #[error("Invalid argument '{arg}': {reason}")]
    InvalidArgument { arg: String, reason: String },

    /// Error raised by the wrapped client, passed through untouched.
    #[error(transparent)]
    Backend(BoxError),

    /// Options could not be loaded.
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// MsgPack serialization error.
    #[error("MsgPack encode error: {0}")]
    MsgPackEncode(#[from] rmp_serde::encode::Error),

    /// MsgPack deserialization error.
    #[error("MsgPack decode error: {0}")]
    MsgPackDecode(#[from] rmp_serde::decode::Error),
}

impl SaltApiError {
    pub(crate) fn invalid(arg: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidArgument {
            arg: arg.into(),
            reason: reason.into(),
        }
    }

    /// True for rejections caused by the request itself (bad or missing
    /// fields). The caller has to change the lowstate before retrying.
    pub fn is_request_error(&self) -> bool {
        matches!(
            self,
            Self::AuthenticationRequired
                | Self::InvalidClientMode { .. }
                | Self::UnknownClient(_)
                | Self::MissingArgument { .. }
                | Self::InvalidArgument { .. }
        )
    }
}

/// Result type alias using SaltApiError.
pub type Result<T> = std::result::Result<T, SaltApiError>;

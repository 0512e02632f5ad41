//! Error types shared by the client crate.

use thiserror::Error;

use crate::config::ConfigError;

/// Result alias used across the client crate.
pub type Result<T> = std::result::Result<T, ClientError>;

/// Errors surfaced while coercing values, framing requests, or talking to the server.
#[derive(Debug, Error)]
pub enum ClientError {
    /// A native value has no `DbValue` representation.
    #[error("unsupported type: {0}")]
    UnsupportedType(String),
    /// The reserved `db_id` field of a record is missing or not a number/string.
    #[error("invalid db_id: {0}")]
    InvalidDbId(String),
    /// A `{key, value}` pair could not be coerced on one side.
    #[error("invalid key value: {0}")]
    InvalidKeyValue(String),
    /// JSON encoding or decoding failed.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    /// The transport failed before a response was produced.
    #[error("transport error: {0}")]
    Transport(String),
    /// The server answered with a non-success status.
    #[error("server returned {status}: {message}")]
    #[allow(missing_docs)]
    Server { status: u16, message: String },
    /// Loading or persisting the client config failed.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl ClientError {
    pub(crate) fn unsupported<T: Into<String>>(msg: T) -> Self {
        ClientError::UnsupportedType(msg.into())
    }

    pub(crate) fn invalid_db_id<T: Into<String>>(msg: T) -> Self {
        ClientError::InvalidDbId(msg.into())
    }

    pub(crate) fn invalid_key_value<T: Into<String>>(msg: T) -> Self {
        ClientError::InvalidKeyValue(msg.into())
    }

    /// Builds a transport error from any displayable cause.
    pub fn transport<T: Into<String>>(msg: T) -> Self {
        ClientError::Transport(msg.into())
    }

    /// Returns true for errors raised by value coercion.
    pub fn is_coercion(&self) -> bool {
        matches!(
            self,
            ClientError::UnsupportedType(_)
                | ClientError::InvalidDbId(_)
                | ClientError::InvalidKeyValue(_)
        )
    }
}

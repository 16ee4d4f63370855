//! Error taxonomy for the list-query layer.
//! 列表查询层的错误分类。

use thiserror::Error;

/// Failure reported by the transport collaborator.
///
/// Errors are `Clone` because a single in-flight fetch fans its outcome out to
/// every subscriber that joined it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    #[error("network error: {0}")]
    Network(String),

    #[error("request timed out")]
    Timeout,

    #[error("server responded with status {status}")]
    Status {
        status: u16,
        /// `message` field of the error body, when the backend sent one
        message: Option<String>,
    },

    #[error("response body is not valid JSON: {0}")]
    Decode(String),
}

impl TransportError {
    /// Message suitable for a toast or inline alert.
    /// 适合在提示框中展示的用户可读信息。
    pub fn user_message(&self) -> String {
        match self {
            TransportError::Network(_) => {
                "Unable to reach the server. Check your connection and try again.".to_string()
            }
            TransportError::Timeout => "The server took too long to respond.".to_string(),
            TransportError::Status { status, message } => match (*status, message) {
                (401, _) => "Your session has expired. Please sign in again.".to_string(),
                (403, _) => "You do not have permission to view this data.".to_string(),
                (404, _) => "The requested record could not be found.".to_string(),
                (422, Some(msg)) if !msg.is_empty() => msg.clone(),
                (422, _) => "Some of the submitted values are invalid.".to_string(),
                (500..=599, _) => {
                    "The server ran into a problem. Please try again later.".to_string()
                }
                (_, Some(msg)) if !msg.is_empty() => msg.clone(),
                (status, _) => format!("Request failed with status {status}."),
            },
            TransportError::Decode(_) => "The server sent an unreadable response.".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ListQueryError {
    /// A filter value was a nested object or array where a scalar was expected.
    #[error("invalid parameter shape for '{key}': expected a scalar, found {found}")]
    InvalidParamShape { key: String, found: &'static str },

    #[error(transparent)]
    Transport(#[from] TransportError),

    /// Items or a record could not be decoded into the entity type.
    #[error("failed to decode {what}: {reason}")]
    Decode { what: String, reason: String },

    /// The background fetch task panicked or was cancelled by the runtime.
    #[error("fetch aborted: {0}")]
    FetchAborted(String),
}

impl ListQueryError {
    pub fn user_message(&self) -> String {
        match self {
            ListQueryError::Transport(err) => err.user_message(),
            ListQueryError::InvalidParamShape { key, .. } => {
                format!("The filter '{key}' has an unsupported value.")
            }
            ListQueryError::Decode { .. } => "The server sent data in an unexpected format.".to_string(),
            ListQueryError::FetchAborted(_) => "Loading was interrupted. Please try again.".to_string(),
        }
    }

    pub(crate) fn decode(what: impl Into<String>, err: impl std::fmt::Display) -> Self {
        ListQueryError::Decode {
            what: what.into(),
            reason: err.to_string(),
        }
    }
}

//! Error taxonomy shared by the stores, the HTTP client and persistence.
//!
//! Every variant carries owned strings rather than source errors so the
//! error can be cloned into [`crate::Async::Fail`] and compared in state.

use thiserror::Error;

#[derive(Error, Debug, Clone, Eq, PartialEq)]
pub enum DashboardError {
    /// The request never produced a usable HTTP response, or the server
    /// answered with an error status.
    #[error("transport error: {0}")]
    Transport(String),

    /// The response body could not be interpreted.
    #[error("unexpected response shape: {0}")]
    UnexpectedShape(String),

    /// A mutation was answered, but not with a success status code.
    #[error("request rejected with status {status_code}: {message}")]
    Rejected { status_code: u16, message: String },

    /// Reading or writing the persisted state failed.
    #[error("storage error: {0}")]
    Storage(String),

    #[error("configuration error: {0}")]
    Config(String),

    /// The store's reducer queue is gone.
    #[error("state channel closed")]
    ChannelClosed,
}

impl DashboardError {
    pub fn is_transport(&self) -> bool {
        matches!(self, DashboardError::Transport(_))
    }

    pub fn is_rejected(&self) -> bool {
        matches!(self, DashboardError::Rejected { .. })
    }
}

impl From<reqwest::Error> for DashboardError {
    fn from(value: reqwest::Error) -> Self {
        if value.is_decode() {
            DashboardError::UnexpectedShape(value.to_string())
        } else {
            DashboardError::Transport(value.to_string())
        }
    }
}

impl From<serde_json::Error> for DashboardError {
    fn from(value: serde_json::Error) -> Self {
        DashboardError::UnexpectedShape(value.to_string())
    }
}

impl From<std::io::Error> for DashboardError {
    fn from(value: std::io::Error) -> Self {
        DashboardError::Storage(value.to_string())
    }
}

impl From<toml::de::Error> for DashboardError {
    fn from(value: toml::de::Error) -> Self {
        DashboardError::Config(value.to_string())
    }
}

pub type Result<T> = std::result::Result<T, DashboardError>;

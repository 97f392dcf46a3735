use reqwest::StatusCode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    /// Connection, timeout or body decoding failure.
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("server returned {status}: {}", detail.as_deref().unwrap_or("no detail"))]
    Status {
        status: StatusCode,
        detail: Option<String>,
    },

    /// An authenticated endpoint was called with an anonymous context.
    #[error("not authenticated")]
    MissingToken,
}

impl ApiError {
    /// Server-supplied `detail`, when there is one.
    pub fn detail(&self) -> Option<&str> {
        match self {
            Self::Status { detail, .. } => detail.as_deref(),
            _ => None,
        }
    }

    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Status { status, .. } => Some(*status),
            Self::Transport(e) => e.status(),
            Self::MissingToken => None,
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::MissingToken) || self.status() == Some(StatusCode::UNAUTHORIZED)
    }
}

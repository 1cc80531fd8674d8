use reqwest::StatusCode;
use serde_json::Value;
use thiserror::Error;

/// Failures raised by the integration API client.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("integration API returned server error {status}")]
    ServerError { status: u16 },

    #[error("integration API request timed out")]
    Timeout,

    #[error("integration API rejected the request as invalid")]
    BadRequest { body: Option<String> },

    #[error("integration API resource not found")]
    NotFound { body: Option<String> },

    #[error("integration API rejected the request with status {status}")]
    Rejected { status: u16, body: Option<String> },

    #[error("integration API transport error: {0}")]
    Transport(String),
}

impl ApiError {
    /// Maps a non-success HTTP status to the matching failure.
    pub fn from_status(status: StatusCode, body: Option<String>) -> Self {
        match status.as_u16() {
            400 => ApiError::BadRequest { body },
            404 => ApiError::NotFound { body },
            408 => ApiError::Timeout,
            code @ 500..=599 => ApiError::ServerError { status: code },
            code @ 400..=499 => ApiError::Rejected { status: code, body },
            code => ApiError::Transport(format!("unexpected response status {}", code)),
        }
    }

    pub(crate) fn from_reqwest(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ApiError::Timeout
        } else {
            ApiError::Transport(err.to_string())
        }
    }

    /// HTTP status code carried by client-side rejections.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::ServerError { status } | ApiError::Rejected { status, .. } => Some(*status),
            ApiError::BadRequest { .. } => Some(400),
            ApiError::NotFound { .. } => Some(404),
            ApiError::Timeout | ApiError::Transport(_) => None,
        }
    }

    /// The `meta.message` field of the response body, when the API sent one.
    pub fn response_message(&self) -> Option<String> {
        let body = match self {
            ApiError::BadRequest { body }
            | ApiError::NotFound { body }
            | ApiError::Rejected { body, .. } => body.as_deref()?,
            _ => return None,
        };

        let parsed: Value = serde_json::from_str(body).ok()?;
        parsed
            .get("meta")?
            .get("message")?
            .as_str()
            .map(str::to_string)
    }
}

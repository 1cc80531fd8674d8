use super::result::ErrorKind;
use crate::remote::ApiError;

pub const SERVICE_UNAVAILABLE_MESSAGE: &str = "Integration API is unavailable";
pub const TIMEOUT_MESSAGE: &str = "Integration API request timed out";

/// Maps a client failure onto the caller-facing error kind and message.
///
/// Rejections surface the API's own `meta.message`; everything else gets a
/// fixed message.
pub fn classify(err: &ApiError) -> (ErrorKind, String) {
    match err {
        ApiError::ServerError { .. } | ApiError::Transport(_) => (
            ErrorKind::ServiceUnavailable,
            SERVICE_UNAVAILABLE_MESSAGE.to_string(),
        ),
        ApiError::Timeout => (ErrorKind::Timeout, TIMEOUT_MESSAGE.to_string()),
        ApiError::BadRequest { .. } | ApiError::NotFound { .. } | ApiError::Rejected { .. } => {
            let message = err.response_message().unwrap_or_else(|| {
                format!(
                    "request rejected with status {}",
                    err.status().unwrap_or_default()
                )
            });
            (ErrorKind::ClientError, message)
        }
    }
}

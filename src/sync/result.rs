use serde::Serialize;
use std::fmt;

/// Why a sync failed, as far as callers need to know.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// The integration is down or unreachable.
    ServiceUnavailable,
    /// The integration did not answer in time.
    Timeout,
    /// The integration refused the request (bad input, unknown tenant).
    ClientError,
}

impl ErrorKind {
    /// Whether trying the same sync again later can succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, ErrorKind::ServiceUnavailable | ErrorKind::Timeout)
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::ServiceUnavailable => write!(f, "service_unavailable"),
            ErrorKind::Timeout => write!(f, "timeout"),
            ErrorKind::ClientError => write!(f, "client_error"),
        }
    }
}

/// Outcome of one sync run.
///
/// `Success` carries the local row ids of every cat inserted or updated.
/// Their order follows the remote listing but callers should only rely on
/// the set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SyncResult {
    Success { ids: Vec<i64> },
    Failure { kind: ErrorKind, message: String },
}

impl SyncResult {
    pub fn success(ids: Vec<i64>) -> Self {
        SyncResult::Success { ids }
    }

    pub fn failure(kind: ErrorKind, message: impl Into<String>) -> Self {
        SyncResult::Failure {
            kind,
            message: message.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, SyncResult::Success { .. })
    }

    pub fn ids(&self) -> Option<&[i64]> {
        match self {
            SyncResult::Success { ids } => Some(ids.as_slice()),
            SyncResult::Failure { .. } => None,
        }
    }

    pub fn error(&self) -> Option<(ErrorKind, &str)> {
        match self {
            SyncResult::Success { .. } => None,
            SyncResult::Failure { kind, message } => Some((*kind, message)),
        }
    }
}

use thiserror::Error;

/// Error taxonomy for the whole crate.
///
/// The orchestrator's retry loop partitions these with [`SolverError::is_fatal`]:
/// fatal errors surface to the caller immediately, everything else counts
/// against the retry budget and is logged at debug level.
#[derive(Debug, Error)]
pub enum SolverError {
    /// HTTP 400 — the solver understood the request but could not compute an
    /// answer (unrecognized challenge text, garbled image). Recoverable:
    /// refresh the challenge and resubmit with fresh evidence.
    #[error("solver rejected the request: {0}")]
    BadRequest(String),

    /// HTTP 401 — bad license key or exhausted quota. Never retried.
    #[error("invalid license key or out of credits")]
    Unauthorized,

    /// HTTP 502 — the solver is under maintenance. Transient.
    #[error("solver service is temporarily unavailable (maintenance)")]
    ServiceUnavailable,

    /// Any other non-2xx status. The body is kept for diagnosis.
    #[error("solver api error: status {status}: {body}")]
    Api { status: u16, body: String },

    #[error("http transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// A required bounding box, attribute, or text node was missing from the
    /// live DOM. Fatal for the current attempt; the orchestrator may retry.
    #[error("evidence collection failed: {0}")]
    Evidence(String),

    /// The solver's response violated its contract (wrong point count,
    /// out-of-range panel index). Raised before any pointer action.
    #[error("solver contract violation: {0}")]
    Contract(String),

    /// Challenge text in a phrasing we refuse to guess at.
    #[error("unsupported challenge phrasing: {0}")]
    UnsupportedPhrasing(String),

    /// A browser-driver round trip failed (CDP or WebDriver).
    #[error("driver error: {0}")]
    Driver(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl SolverError {
    /// Whether this error should abort the whole solve call instead of
    /// counting against the retry budget.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            SolverError::Unauthorized | SolverError::Api { .. } | SolverError::Transport(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn service_errors_are_fatal() {
        assert!(SolverError::Unauthorized.is_fatal());
        assert!(SolverError::Api {
            status: 500,
            body: String::new()
        }
        .is_fatal());
    }

    #[test]
    fn recoverable_errors_are_not_fatal() {
        assert!(!SolverError::BadRequest("no answer".into()).is_fatal());
        assert!(!SolverError::ServiceUnavailable.is_fatal());
        assert!(!SolverError::Evidence("missing box".into()).is_fatal());
        assert!(!SolverError::Contract("3 points".into()).is_fatal());
        assert!(!SolverError::UnsupportedPhrasing("??".into()).is_fatal());
    }
}

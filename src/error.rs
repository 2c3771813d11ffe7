//! Ways a scenario can fail.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScenarioFailure {
    /// The request never produced a response (connection refused, timeout, ...).
    #[error("transport failure during {step}: {message}")]
    Transport {
        step: String,
        message: String,
    },

    #[error("expected status {expected}, got {actual}")]
    Status {
        expected: u16,
        actual: u16,
    },

    #[error("expected any status other than {rejected}")]
    UnexpectedStatus {
        rejected: u16,
    },

    /// Body could not be decoded as the JSON shape the expectation needs.
    #[error("undecodable response body (status {status}): {body}")]
    Undecodable {
        status: u16,
        body: String,
    },

    #[error("expected feedback {expected:?}, got {actual:?}")]
    Feedback {
        expected: String,
        actual: String,
    },

    #[error("expected {pointer} to be {expected:?}, got {actual}")]
    Field {
        pointer: String,
        expected: String,
        actual: String,
    },

    #[error("expected a non-empty JSON array, got {actual}")]
    EmptyCollection {
        actual: String,
    },
}

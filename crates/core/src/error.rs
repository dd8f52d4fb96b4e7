//! Failures of a poll cycle.
//!
//! Every variant means the cycle placed no marker. Markers rendered by
//! earlier cycles are never touched by a failing one.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PollError {
    /// The request never produced a body (dns, refused connection, timeout...)
    #[error("Network error: {0}")]
    Network(String),

    /// The body is not a json object
    #[error("Invalid json body: {0}")]
    InvalidJson(String),

    #[error("Response has no position")]
    MissingPosition,

    /// `position` is there but is not a pair of numbers
    #[error("Malformed position: {0}")]
    MalformedPosition(String),

    /// The feed answered with an error message instead of a position
    #[error("Feed reported: {0}")]
    Reported(String),

    #[error("Map container not found: {0}")]
    MissingContainer(String),

    /// The map surface refused the marker
    #[error("Surface error: {0}")]
    Surface(String),
}

impl PollError {
    /// True when the request itself failed, as opposed to its content
    pub fn is_network(&self) -> bool {
        matches!(self, PollError::Network(_))
    }
}

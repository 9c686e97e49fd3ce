//! Error types.
//!
//! Only structural problems abort a run. A project that cannot reach its
//! minimum reviewer count is not an error: it is reported through
//! [`Roster::shortfalls`](crate::models::Roster::shortfalls) and the decision log.

use thiserror::Error;

use crate::models::ReviewType;
use crate::validation::ValidationError;

/// Fatal errors raised before any scoring begins.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RosterError {
    /// A configuration parameter is out of range.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// The requested roster type only exists as a history tag.
    #[error("review type {0} cannot be used as a roster type")]
    UnsupportedRosterType(ReviewType),

    /// Reviewer or project data failed integrity checks.
    #[error("invalid input: {}", summarize(.0))]
    InvalidInput(Vec<ValidationError>),
}

fn summarize(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(|e| e.message.as_str())
        .collect::<Vec<_>>()
        .join("; ")
}

impl From<Vec<ValidationError>> for RosterError {
    fn from(errors: Vec<ValidationError>) -> Self {
        RosterError::InvalidInput(errors)
    }
}

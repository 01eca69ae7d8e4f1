//! Typed failures of the version resolver and the track reader.
//!
//! The rendered messages are shown to users verbatim, so their wording is
//! stable and covered by tests.

use thiserror::Error;

/// A version string did not have the `major.minor.patch[-suffix]` shape.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("version string '{version}' does not conform to pattern '{pattern}'")]
pub struct InvalidSyntax {
    pub version: String,
    pub pattern: &'static str,
}

/// A track specification could not be turned into a [`crate::track::Track`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TrackSyntaxError {
    #[error("Track '{track}' is invalid. Mandatory element '{path}' is missing.")]
    MissingElement { track: String, path: String },

    #[error("Track '{track}' is invalid. Element '{path}' must be {expected}.")]
    InvalidElement {
        track: String,
        path: String,
        expected: &'static str,
    },

    #[error("Track '{track}' is invalid. Operation '{operation}' has unknown type '{kind}'.")]
    UnknownOperationType {
        track: String,
        operation: String,
        kind: String,
    },

    #[error("Track '{track}' is invalid. Duplicate {kind} name '{name}'.")]
    DuplicateName {
        track: String,
        kind: &'static str,
        name: String,
    },

    #[error("Track '{track}' is invalid. Both challenges '{first}' and '{second}' are marked as default.")]
    MultipleDefaultChallenges {
        track: String,
        first: String,
        second: String,
    },

    #[error(
        "Track '{track}' is invalid. Challenge '{challenge}' references unknown operation '{operation}'."
    )]
    UnknownOperation {
        track: String,
        challenge: String,
        operation: String,
    },
}

impl TrackSyntaxError {
    /// Name of the track the error was raised for.
    pub fn track(&self) -> &str {
        match self {
            Self::MissingElement { track, .. }
            | Self::InvalidElement { track, .. }
            | Self::UnknownOperationType { track, .. }
            | Self::DuplicateName { track, .. }
            | Self::MultipleDefaultChallenges { track, .. }
            | Self::UnknownOperation { track, .. } => track,
        }
    }
}

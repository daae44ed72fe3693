//! Error types for the car-wash booking client.
//!
//! # Design
//! Two kinds only. `ValidationError` is raised client-side before any
//! request is issued. `NetworkError` covers everything from the transport
//! layer: connection failure, non-2xx status, and encode/decode failure.
//! `NotFound` keeps a dedicated variant because callers distinguish "the
//! booking does not exist" from "the server misbehaved".

use thiserror::Error;

/// Failures surfaced by a `Transport` or by `CarwashClient` parse methods.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NetworkError {
    /// No response was received.
    #[error("transport failed: {0}")]
    Transport(String),

    /// The server returned 404.
    #[error("resource not found")]
    NotFound,

    /// The server returned a non-2xx status other than 404.
    #[error("HTTP {status}: {body}")]
    HttpStatus { status: u16, body: String },

    /// The response body did not match the expected shape.
    #[error("deserialization failed: {0}")]
    Deserialization(String),

    /// The request payload could not be encoded.
    #[error("serialization failed: {0}")]
    Serialization(String),
}

/// Input rejected before any request is made.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{0} is required")]
    MissingField(&'static str),

    #[error("appointment time is in the past")]
    AppointmentInPast,

    #[error("rating must be between 1 and 5, got {0}")]
    RatingOutOfRange(u8),

    #[error("please select a car wash service to proceed")]
    NoServiceSelected,
}

/// Any failure of a workflow operation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WorkflowError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Network(#[from] NetworkError),
}

impl WorkflowError {
    pub fn is_validation(&self) -> bool {
        matches!(self, WorkflowError::Validation(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_are_human_readable() {
        assert_eq!(
            ValidationError::MissingField("plate number").to_string(),
            "plate number is required"
        );
        assert_eq!(
            NetworkError::HttpStatus {
                status: 500,
                body: "boom".into()
            }
            .to_string(),
            "HTTP 500: boom"
        );
    }

    #[test]
    fn workflow_error_is_transparent() {
        let err: WorkflowError = ValidationError::RatingOutOfRange(0).into();
        assert!(err.is_validation());
        assert_eq!(err.to_string(), "rating must be between 1 and 5, got 0");

        let err: WorkflowError = NetworkError::NotFound.into();
        assert!(!err.is_validation());
        assert_eq!(err.to_string(), "resource not found");
    }
}

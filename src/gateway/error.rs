//! Error types for boundary calls
//!
//! A call either yields its payload or exactly one of these. Nothing is
//! retried automatically.

use super::operation::Operation;
use thiserror::Error;

/// User-facing text for payloads that do not match the expected shape
pub const UNEXPECTED_RESPONSE: &str = "unexpected response format";

#[derive(Debug, Clone, Error, PartialEq)]
pub enum GatewayError {
    /// The engine reported a failure (domain error, bad index, I/O, ...)
    #[error("{operation} failed: {message}")]
    Boundary { operation: Operation, message: String },

    /// A successful envelope carried a payload of the wrong shape
    #[error("{operation} failed: unexpected response format ({detail})")]
    Decode { operation: Operation, detail: String },

    /// An argument could not be turned into a null-terminated buffer
    #[error("{operation} failed: {argument} cannot be passed to the engine ({detail})")]
    Encode {
        operation: Operation,
        argument: &'static str,
        detail: String,
    },
}

impl GatewayError {
    pub fn operation(&self) -> Operation {
        match self {
            GatewayError::Boundary { operation, .. }
            | GatewayError::Decode { operation, .. }
            | GatewayError::Encode { operation, .. } => *operation,
        }
    }

    /// Message to show the user: the engine's text verbatim when there is one
    pub fn user_message(&self) -> String {
        match self {
            GatewayError::Boundary { message, .. } => message.clone(),
            GatewayError::Decode { .. } => UNEXPECTED_RESPONSE.to_string(),
            GatewayError::Encode { .. } => self.to_string(),
        }
    }

    pub fn is_boundary(&self) -> bool {
        matches!(self, GatewayError::Boundary { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_boundary_message_is_verbatim() {
        let err = GatewayError::Boundary {
            operation: Operation::RemoveSegment,
            message: "Segment index 4 out of bounds".to_string(),
        };
        assert_eq!(err.to_string(), "remove segment failed: Segment index 4 out of bounds");
        assert_eq!(err.user_message(), "Segment index 4 out of bounds");
        assert!(err.is_boundary());
    }

    #[test]
    fn test_decode_message_is_generic() {
        let err = GatewayError::Decode {
            operation: Operation::GetGroups,
            detail: "expected a map".to_string(),
        };
        assert_eq!(err.user_message(), UNEXPECTED_RESPONSE);
        assert_eq!(err.operation(), Operation::GetGroups);
        assert!(!err.is_boundary());
    }
}

//! Common types and utilities for the FortiOS provider
//!
//! This crate contains the schema intermediate representation, the key
//! translation rules between Terraform and FortiOS REST names, and the error
//! types shared by the catalog, runtime, generator and CLI components.

mod definition;
mod naming;

pub use definition::{
    AdoptRule, AttributeDefinition, AttributeType, Constraint, Normalization, ResourceDefinition,
    ResourceKind,
};
pub use naming::{to_api_key, to_tf_key};

use std::fmt;
use thiserror::Error;

/// Lifecycle verb used when wrapping upstream failures
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verb {
    Creating,
    Reading,
    Updating,
    Deleting,
}

impl fmt::Display for Verb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Verb::Creating => write!(f, "creating"),
            Verb::Reading => write!(f, "reading"),
            Verb::Updating => write!(f, "updating"),
            Verb::Deleting => write!(f, "deleting"),
        }
    }
}

/// Failure reported by a FortiOS REST client
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ClientError {
    #[error("HTTP {status}: {message}")]
    Http { status: u16, message: String },

    #[error("{0}")]
    Transport(String),
}

/// Errors that can occur while loading schemas or managing resources
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Generation error: {0}")]
    Generation(String),

    #[error("Validation failed: {}", .0.join("; "))]
    Validation(Vec<String>),

    #[error("Unknown resource type: {0}")]
    UnknownResource(String),

    #[error("Error {verb} {resource} resource while getting object: {message}")]
    Expand {
        verb: Verb,
        resource: String,
        message: String,
    },

    #[error("Error {verb} {resource} resource: {source}")]
    Client {
        verb: Verb,
        resource: String,
        #[source]
        source: ClientError,
    },

    #[error("Error reading {resource} resource from API: {message}")]
    Refresh { resource: String, message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for provider operations
pub type Result<T> = std::result::Result<T, ProviderError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_error_wrapping_message() {
        let err = ProviderError::Client {
            verb: Verb::Creating,
            resource: "WanoptPeer".to_string(),
            source: ClientError::Http {
                status: 500,
                message: "internal error".to_string(),
            },
        };
        assert_eq!(
            err.to_string(),
            "Error creating WanoptPeer resource: HTTP 500: internal error"
        );
    }

    #[test]
    fn test_expand_and_refresh_messages() {
        let err = ProviderError::Expand {
            verb: Verb::Updating,
            resource: "SystemInterface".to_string(),
            message: "missing mkey".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Error updating SystemInterface resource while getting object: missing mkey"
        );

        let err = ProviderError::Refresh {
            resource: "DlpSettings".to_string(),
            message: "Error reading size: expected integer".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Error reading DlpSettings resource from API: Error reading size: expected integer"
        );
    }

    #[test]
    fn test_validation_joins_violations() {
        let err = ProviderError::Validation(vec!["a: too long".into(), "b: required".into()]);
        assert_eq!(err.to_string(), "Validation failed: a: too long; b: required");
    }
}

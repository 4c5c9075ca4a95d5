//! Error types for the Arbiter core library.
//!
//! Uses `thiserror` for public API error types. Only `ArbiterError` ever
//! escapes a resolution call; the per-candidate errors (`AlgorithmError`,
//! `CapabilityError`) are folded into an `ApplicabilityOutcome` at the probe
//! boundary.

use std::path::PathBuf;

/// Top-level error type for the Arbiter core library.
#[derive(Debug, thiserror::Error)]
pub enum ArbiterError {
    #[error("{} is not a valid catalog directory", path.display())]
    CatalogMissing { path: PathBuf },

    #[error("Algorithm already registered: {identifier}")]
    AlreadyRegistered { identifier: String },

    #[error("Dataset error: {0}")]
    Dataset(#[from] DatasetError),

    #[error("Property error: {0}")]
    Property(#[from] PropertyError),

    #[error("Configuration error: {0}")]
    Config(#[from] Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Errors from reading or building a dataset.
#[derive(Debug, thiserror::Error)]
pub enum DatasetError {
    #[error("line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error("Dataset has no attributes")]
    NoAttributes,

    #[error("Class index {index} out of range for {count} attributes")]
    ClassIndexOutOfRange { index: usize, count: usize },

    #[error("Invalid dataset specification: {message}")]
    InvalidSpec { message: String },
}

/// Errors from the configuration-string codec and argument helpers.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PropertyError {
    #[error("Invalid property '{entry}'")]
    InvalidEntry { entry: String },

    #[error("Missing value after '{flag}'")]
    MissingArgument { flag: String },

    #[error("Could only find {found} {side} args before not finding the delimiter")]
    DelimiterNotFound { found: usize, side: &'static str },

    #[error("The number of left and right args doesn't leave anything in the middle")]
    EmptyMiddle,
}

/// Errors raised by an algorithm implementation while being constructed,
/// configured, or asked for its capabilities.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AlgorithmError {
    #[error("failed to instantiate: {message}")]
    Instantiation { message: String },

    #[error("illegal access: {message}")]
    IllegalAccess { message: String },

    #[error("invalid option '{option}': {reason}")]
    InvalidOption { option: String, reason: String },

    #[error("unsupported attribute type: {message}")]
    UnsupportedAttributeType { message: String },

    #[error("{message}")]
    Other { message: String },
}

impl AlgorithmError {
    pub fn instantiation(message: impl Into<String>) -> Self {
        Self::Instantiation {
            message: message.into(),
        }
    }

    pub fn invalid_option(option: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidOption {
            option: option.into(),
            reason: reason.into(),
        }
    }

    pub fn other(message: impl Into<String>) -> Self {
        Self::Other {
            message: message.into(),
        }
    }
}

/// A typed unsupported-feature condition reported by a capability test.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CapabilityError {
    #[error("Cannot handle {kind} attributes! (attribute '{attribute}')")]
    UnsupportedAttributeType { attribute: String, kind: String },

    #[error("Cannot handle {kind} class! (attribute '{attribute}')")]
    UnsupportedClassType { attribute: String, kind: String },

    #[error("Class attribute not set!")]
    ClassNotSet,

    #[error("Cannot handle a class attribute!")]
    ClassNotAllowed,

    #[error("Cannot handle missing values! (attribute '{attribute}')")]
    MissingValues { attribute: String },

    #[error("Cannot handle missing class values!")]
    MissingClassValues,

    #[error("Not enough training instances (required: {required}, provided: {provided})!")]
    NotEnoughInstances { required: usize, provided: usize },
}

pub type Result<T> = std::result::Result<T, ArbiterError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_missing_message() {
        let err = ArbiterError::CatalogMissing {
            path: PathBuf::from("/opt/params/base"),
        };
        assert_eq!(
            err.to_string(),
            "/opt/params/base is not a valid catalog directory"
        );
    }

    #[test]
    fn test_capability_error_messages() {
        let err = CapabilityError::NotEnoughInstances {
            required: 1,
            provided: 0,
        };
        assert_eq!(
            err.to_string(),
            "Not enough training instances (required: 1, provided: 0)!"
        );

        let err = CapabilityError::UnsupportedAttributeType {
            attribute: "colour".into(),
            kind: "nominal".into(),
        };
        assert!(err.to_string().contains("nominal attributes"));
    }

    #[test]
    fn test_dataset_error_converts() {
        let err: ArbiterError = DatasetError::NoAttributes.into();
        assert!(matches!(err, ArbiterError::Dataset(_)));
    }
}

//! Error handling types
//!
//! Resolution failures are recoverable and travel as [`Error`] values.
//! Misuse of the registration API (an interface marker that is not an
//! interface) is a caller bug and panics at the offending call instead.

use std::fmt;

use thiserror::Error;

use crate::type_key::TypeKey;

/// Result type alias for operations that can fail
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for registry resolution and invocation
#[derive(Error, Debug)]
pub enum Error {
    /// Invalid argument provided to the invoker
    #[error("Invalid argument: {message}")]
    InvalidArgument {
        /// Description of the invalid argument
        message: String,
    },

    /// A declared parameter could not be resolved through the registry chain
    #[error("Unable to invoke: value of args[{index}] not found for type {type_name}")]
    MissingDependency {
        /// Zero-based position of the parameter
        index: usize,
        /// Declared type of the parameter
        type_name: &'static str,
    },

    /// A resolved value does not have the declared parameter type
    #[error("Unable to invoke: value of args[{index}] is not a {expected}")]
    TypeMismatch {
        /// Zero-based position of the parameter
        index: usize,
        /// Declared type of the parameter
        expected: &'static str,
    },

    /// Configuration-related error
    #[error("Configuration error: {message}")]
    Configuration {
        /// Description of the configuration error
        message: String,
        /// Optional source error
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

impl Error {
    /// Create an invalid argument error
    pub fn invalid_argument<S: Into<String>>(message: S) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }

    /// Create a missing dependency error for the parameter at `index`
    pub fn missing_dependency(index: usize, key: &TypeKey) -> Self {
        Self::MissingDependency {
            index,
            type_name: key.name(),
        }
    }

    /// Create a type mismatch error for the parameter at `index`
    pub fn type_mismatch(index: usize, key: &TypeKey) -> Self {
        Self::TypeMismatch {
            index,
            expected: key.name(),
        }
    }

    /// Create a configuration error
    pub fn configuration<S: Into<String>>(message: S) -> Self {
        Self::Configuration {
            message: message.into(),
            source: None,
        }
    }

    /// Create a configuration error with source
    pub fn configuration_with_source<S, E>(message: S, source: E) -> Self
    where
        S: Into<String>,
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Configuration {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Whether this error reports an unresolved parameter
    pub fn is_missing_dependency(&self) -> bool {
        matches!(self, Self::MissingDependency { .. })
    }
}

/// Extension trait for adding context to foreign errors
///
/// # Example
///
/// ```ignore
/// use wiring::error::ErrorContext;
///
/// let raw = std::fs::read_to_string(&path).context("Failed to read wiring.toml")?;
/// ```
pub trait ErrorContext<T> {
    /// Wrap the error as a configuration error prefixed with `context`
    fn context<C>(self, context: C) -> Result<T>
    where
        C: fmt::Display + Send + Sync + 'static;

    /// Same as [`ErrorContext::context`] with a lazily built message
    fn with_context<C, F>(self, f: F) -> Result<T>
    where
        C: fmt::Display + Send + Sync + 'static,
        F: FnOnce() -> C;
}

impl<T, E> ErrorContext<T> for std::result::Result<T, E>
where
    E: std::error::Error + Send + Sync + 'static,
{
    fn context<C>(self, context: C) -> Result<T>
    where
        C: fmt::Display + Send + Sync + 'static,
    {
        self.map_err(|err| Error::configuration_with_source(format!("{context}: {err}"), err))
    }

    fn with_context<C, F>(self, f: F) -> Result<T>
    where
        C: fmt::Display + Send + Sync + 'static,
        F: FnOnce() -> C,
    {
        self.map_err(|err| Error::configuration_with_source(format!("{}: {}", f(), err), err))
    }
}

//! Errors and error specific types for universal use

/// Custom Result
/// A custom datatype that wraps the error variant <E> into a report, allowing
/// error_stack::Report<E> specific extendability
///
/// Effectively, equivalent to `Result<T, error_stack::Report<E>>`
///
pub type CustomResult<T, E> = error_stack::Result<T, E>;

/// Validation errors.
#[allow(missing_docs)] // Only to prevent warnings about struct fields not being documented
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    /// The provided input is missing a required field.
    #[error("Missing required field: {field_name}")]
    MissingRequiredField { field_name: String },

    /// An incorrect value was provided for the field specified by `field_name`.
    #[error("Incorrect value provided for field: {field_name}")]
    IncorrectValueProvided { field_name: &'static str },

    /// An invalid input was provided.
    #[error("{message}")]
    InvalidValue { message: String },
}

/// Errors for the application setup and boot path.
#[derive(Debug, thiserror::Error)]
pub enum ApplicationError {
    /// Invalid configuration was provided for the application.
    #[error("Invalid configuration value provided: {0}")]
    InvalidConfigurationValueError(String),

    /// Configuration could not be read or parsed.
    #[error("Failed to read or parse configuration: {0}")]
    ConfigurationError(String),

    /// The underlying I/O operation failed.
    #[error("I/O error: {0}")]
    IoError(std::io::Error),
}

impl From<std::io::Error> for ApplicationError {
    fn from(err: std::io::Error) -> Self {
        Self::IoError(err)
    }
}

/// Result of the application setup and boot path.
pub type ApplicationResult<T> = Result<T, ApplicationError>;

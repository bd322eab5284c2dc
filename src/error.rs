use thiserror::Error;

use crate::metadata::invoke::{BindingFailure, ParameterSpec};

macro_rules! invalid_argument {
    // Single string version
    ($msg:expr) => {
        crate::Error::InvalidArgument($msg.to_string())
    };

    // Format string with arguments version
    ($fmt:expr, $($arg:tt)*) => {
        crate::Error::InvalidArgument(format!($fmt, $($arg)*))
    };
}

macro_rules! invalid_operation {
    // Single string version
    ($msg:expr) => {
        crate::Error::InvalidOperation($msg.to_string())
    };

    // Format string with arguments version
    ($fmt:expr, $($arg:tt)*) => {
        crate::Error::InvalidOperation(format!($fmt, $($arg)*))
    };
}

/// The generic Error type, which provides coverage for all errors this library can potentially
/// return.
///
/// Every failure surfaces synchronously to the immediate caller. Nothing is retried, and errors
/// produced by a host method body during invocation are passed through untouched, so callers can
/// match on exactly what the body returned.
///
/// # Error Categories
///
/// ## Input Errors
/// - [`Error::InvalidArgument`] - A required input was absent or of the wrong shape
/// - [`Error::InvalidOperation`] - The operation is not valid for the target entity
///
/// ## Binding Errors
/// - [`Error::ParameterBinding`] - Supplied arguments do not bind to the declared parameters
///
/// ## Type System Errors
/// - [`Error::NotCollectionType`] - The type is not any kind of sequence
/// - [`Error::TypeNotFound`] - A well-known type is missing from a registry
///
/// ## Host Errors
/// - [`Error::NotSupported`] - The host cannot perform the requested call
/// - [`Error::LockError`] - Host storage could not be locked
/// - [`Error::Error`] - Generic failure, used by host method bodies
///
/// # Examples
///
/// ```rust
/// use metascope::{Error, metadata::invoke::BindingFailure};
///
/// fn describe(error: &Error) -> &'static str {
///     match error {
///         Error::ParameterBinding { failure: BindingFailure::Undefined, .. } => "missing argument",
///         Error::ParameterBinding { .. } => "bad argument",
///         Error::InvalidArgument(_) => "invalid argument",
///         _ => "other",
///     }
/// }
/// # let _ = describe;
/// ```
#[derive(Error, Debug)]
pub enum Error {
    /// A required input was absent or unusable.
    ///
    /// Raised for null entity tokens, a missing instance on an instance member, an instance
    /// that is not an object of the declaring type, and values that cannot be stored.
    #[error("Invalid argument - {0}")]
    InvalidArgument(String),

    /// The operation is not valid in the current state of the target.
    ///
    /// Raised for wrong-arity data member access, `parent_attributes` on a root node, raising
    /// an event and accessing a property through an accessor it does not declare.
    #[error("Invalid operation - {0}")]
    InvalidOperation(String),

    /// The supplied arguments do not bind to the declared parameters.
    ///
    /// Binding is all-or-nothing: the first parameter that fails aborts the whole pass.
    ///
    /// # Fields
    ///
    /// * `parameter` - The parameter that could not be bound
    /// * `failure` - Why it could not be bound
    #[error("The argument does not bind to the parameter {parameter}, actual value: {failure}")]
    ParameterBinding {
        /// The offending parameter
        parameter: Box<ParameterSpec>,
        /// The value that failed validation, or the marker that no value was available
        failure: BindingFailure,
    },

    /// The type is not an array and implements no sequence interface.
    #[error("{0} is not a collection type")]
    NotCollectionType(String),

    /// A type that the operation depends on is missing from the registry.
    #[error("Failed to find type - {0}")]
    TypeNotFound(String),

    /// The host cannot perform the requested operation.
    ///
    /// Raised when invoking a method that carries no body.
    #[error("Not supported - {0}")]
    NotSupported(String),

    /// Failed to lock target.
    ///
    /// This error occurs when host storage guarded by a lock has been poisoned by a panicking
    /// writer.
    #[error("Failed to lock target")]
    LockError,

    /// Generic error for miscellaneous failures.
    ///
    /// Host method bodies use this to report their own failures.
    #[error("{0}")]
    Error(String),
}

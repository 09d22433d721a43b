//! Result and error types for probar-mock.

use thiserror::Error;

/// Result type for mock operations
pub type MockResult<T> = Result<T, MockError>;

/// Errors that can occur while configuring or matching mock expectations
///
/// Mismatch variants carry the rendered expectation lists so that the
/// message alone is enough to diagnose the failing test.
#[derive(Debug, Error)]
pub enum MockError {
    /// An operation is not supported by this kind of expectation
    #[error("{operation} not supported for {target}")]
    UnsupportedOperation {
        /// Operation that was attempted
        operation: String,
        /// Kind of expectation it was attempted on
        target: String,
    },

    /// A call was made that no expectation accounts for
    #[error(
        "Mock Failure: Unexpected call to function: {name}\n\
         \tEXPECTED calls that did NOT happen:\n{expected}\n\
         \tACTUAL calls that did happen (in call order):\n{actual}"
    )]
    UnexpectedCall {
        /// Called function name
        name: String,
        /// Rendered unfulfilled expectations
        expected: String,
        /// Rendered actual call history
        actual: String,
    },

    /// A call was made on an object no expectation is bound to
    #[error(
        "Mock Failure: Function called on an unexpected object: {name}\n\
         \tActual object for call has address: <{object}>\n\
         \tEXPECTED calls that did NOT happen related to function: {name}\n{expected}\n\
         \tACTUAL calls that did happen related to function: {name}\n{actual}"
    )]
    UnexpectedObject {
        /// Called function name
        name: String,
        /// Rendered object address (or `<none>`)
        object: String,
        /// Rendered unfulfilled expectations for this function
        expected: String,
        /// Rendered fulfilled expectations for this function
        actual: String,
    },

    /// A call passed a parameter that no candidate expectation declares
    #[error(
        "Mock Failure: Unexpected parameter name to function \"{name}\": {parameter}\n\
         \tEXPECTED calls that DID NOT happen related to function: {name}\n{expected}\n\
         \tACTUAL calls that DID happen related to function: {name}\n{actual}"
    )]
    UnexpectedInputParameter {
        /// Called function name
        name: String,
        /// Rendered parameter (`<type> <name>: <value>`)
        parameter: String,
        /// Rendered unfulfilled expectations for this function
        expected: String,
        /// Rendered fulfilled expectations for this function
        actual: String,
    },

    /// A call requested an output parameter no candidate expectation declares
    #[error(
        "Mock Failure: Unexpected output parameter name to function \"{name}\": {parameter}\n\
         \tEXPECTED calls that DID NOT happen related to function: {name}\n{expected}\n\
         \tACTUAL calls that DID happen related to function: {name}\n{actual}"
    )]
    UnexpectedOutputParameter {
        /// Called function name
        name: String,
        /// Output parameter name
        parameter: String,
        /// Rendered unfulfilled expectations for this function
        expected: String,
        /// Rendered fulfilled expectations for this function
        actual: String,
    },

    /// A call omitted a parameter that every candidate expectation declares
    #[error(
        "Mock Failure: Expected parameter for function \"{name}\" did not happen.\n\
         \tEXPECTED calls that DID NOT happen related to function: {name}\n{expected}\n\
         \tACTUAL calls that DID happen related to function: {name}\n{actual}"
    )]
    ExpectedParameterDidntHappen {
        /// Called function name
        name: String,
        /// Rendered unfulfilled expectations for this function
        expected: String,
        /// Rendered fulfilled expectations for this function
        actual: String,
    },

    /// Verification found expectations that were never fulfilled
    #[error(
        "Mock Failure: Expected call did not happen.\n\
         \tEXPECTED calls that did NOT happen:\n{expected}\n\
         \tACTUAL calls that did happen (in call order):\n{actual}"
    )]
    ExpectedCallsDidntHappen {
        /// Rendered unfulfilled expectations
        expected: String,
        /// Rendered actual call history
        actual: String,
    },

    /// Verification under strict ordering found calls made out of order
    #[error(
        "Mock Failure: Out of order calls\n\
         \tEXPECTED calls with call order:\n{expected}\n\
         \tACTUAL calls that did happen (in call order):\n{actual}"
    )]
    CallOrderViolated {
        /// Rendered out-of-order expectations
        expected: String,
        /// Rendered actual call history
        actual: String,
    },

    /// Copy-out requested for an output parameter that was never declared
    #[error("No output parameter named \"{name}\" was expected")]
    UnknownOutputParameter {
        /// Requested output parameter name
        name: String,
    },

    /// Copy-out destination cannot hold the declared output value
    #[error("Output parameter \"{name}\" needs {required} bytes but the destination holds {available}")]
    OutputBufferTooSmall {
        /// Output parameter name
        name: String,
        /// Declared size in bytes
        required: usize,
        /// Destination size in bytes
        available: usize,
    },

    /// JSON error (configuration loading)
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl MockError {
    /// Create an unsupported-operation usage error
    #[must_use]
    pub fn unsupported(operation: impl Into<String>, target: impl Into<String>) -> Self {
        Self::UnsupportedOperation {
            operation: operation.into(),
            target: target.into(),
        }
    }

    /// Whether this error is programmer misuse of the configuration API
    /// rather than an expectation mismatch.
    #[must_use]
    pub const fn is_usage_error(&self) -> bool {
        matches!(self, Self::UnsupportedOperation { .. })
    }
}

//! Error types for boundary calls

/// Result type for boundary calls
pub type BoundaryResult<T> = Result<T, BoundaryError>;

/// Faults raised while marshaling or dispatching a boundary call.
///
/// Every variant is fatal to the call that raised it and to nothing else.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum BoundaryError {
    /// A value's tag disagrees with the declared tag
    #[error("Type mismatch at {location}: expected {expected}, got {got}")]
    TypeMismatch {
        /// Where the value was found (parameter, return value, element)
        location: String,
        /// Declared tag
        expected: String,
        /// Tag actually carried
        got: String,
    },

    /// Wrong number of arguments
    #[error("'{name}' expects {expected} arguments, got {got}")]
    ArityMismatch {
        /// Entry point name
        name: String,
        /// Declared arity
        expected: usize,
        /// Supplied arity
        got: usize,
    },

    /// No entry point registered under the name
    #[error("Unknown entry point '{0}'")]
    UnknownEntryPoint(String),

    /// Function reference does not name a live export
    #[error("Invalid function reference {0:#x}")]
    InvalidFunctionRef(u64),

    /// Two exports registered under the same name
    #[error("Duplicate entry point '{0}'")]
    DuplicateEntryPoint(String),

    /// A marshaling buffer could not be allocated
    #[error("Allocation of {requested} bytes failed: {reason}")]
    Allocation {
        /// Bytes requested
        requested: usize,
        /// Why the allocation was refused
        reason: String,
    },

    /// Buffer ended before a value was complete
    #[error("Truncated buffer at offset {0}")]
    Truncated(usize),

    /// String bytes are not valid UTF-8
    #[error("Invalid UTF-8 at offset {0}")]
    InvalidUtf8(usize),

    /// Buffer contents inconsistent with their header
    #[error("Malformed value: {0}")]
    Malformed(String),

    /// Callee panicked
    #[error("'{name}' panicked: {message}")]
    Panic {
        /// Entry point name
        name: String,
        /// Panic payload
        message: String,
    },

    /// Nested calls went deeper than the configured limit
    #[error("Call depth limit of {0} exceeded")]
    CallDepthExceeded(usize),

    /// Error raised by callee code
    #[error("{0}")]
    Callee(String),
}

impl BoundaryError {
    /// Type mismatch between a declared and an actual tag name.
    pub fn mismatch(
        location: impl Into<String>,
        expected: impl ToString,
        got: impl ToString,
    ) -> Self {
        BoundaryError::TypeMismatch {
            location: location.into(),
            expected: expected.to_string(),
            got: got.to_string(),
        }
    }

    /// Relocate a type mismatch; other faults pass through unchanged.
    pub fn at(self, location: impl Into<String>) -> Self {
        match self {
            BoundaryError::TypeMismatch { expected, got, .. } => BoundaryError::TypeMismatch {
                location: location.into(),
                expected,
                got,
            },
            other => other,
        }
    }

    /// Allocation failure for `requested` bytes
    pub fn allocation(requested: usize, reason: impl ToString) -> Self {
        BoundaryError::Allocation {
            requested,
            reason: reason.to_string(),
        }
    }

    /// Whether this is a type mismatch fault
    pub fn is_type_mismatch(&self) -> bool {
        matches!(
            self,
            BoundaryError::TypeMismatch { .. } | BoundaryError::ArityMismatch { .. }
        )
    }
}

impl From<String> for BoundaryError {
    fn from(s: String) -> Self {
        BoundaryError::Callee(s)
    }
}

impl From<&str> for BoundaryError {
    fn from(s: &str) -> Self {
        BoundaryError::Callee(s.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TypeTag;

    #[test]
    fn test_relocate_mismatch() {
        let err = BoundaryError::mismatch("value", TypeTag::Int32, TypeTag::Float32)
            .at("ParamRef1 parameter 0");
        assert_eq!(
            err.to_string(),
            "Type mismatch at ParamRef1 parameter 0: expected int32, got float32"
        );
    }

    #[test]
    fn test_relocate_keeps_other_faults() {
        let err = BoundaryError::Truncated(3).at("elsewhere");
        assert_eq!(err, BoundaryError::Truncated(3));
    }

    #[test]
    fn test_callee_conversion() {
        let err: BoundaryError = "no such file".into();
        assert_eq!(err.to_string(), "no such file");
        assert!(!err.is_type_mismatch());
    }
}

//! Error types for the traversal machine
//!
//! - [`CompileError`]: structural problems found while assembling a pipeline
//! - [`ExecutionError`]: failures raised by a function while a traverser flows
//! - [`ConfigError`]: configuration loading and validation

use crate::value::ValueKind;
use std::path::PathBuf;

/// Assembly-time errors. Fatal to building the compilation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CompileError {
    /// Label name rejected
    #[error("malformed label {label:?}: {reason}")]
    MalformedLabel {
        /// Offending label
        label: String,
        /// Why it was rejected
        reason: &'static str,
    },

    /// No factory registered for the instruction
    #[error("unknown instruction `{op}` at position {index}")]
    UnknownInstruction {
        /// Instruction name
        op: String,
        /// Position in its bytecode
        index: usize,
    },

    /// Neighboring functions disagree on the flowing type
    #[error("type mismatch at `{op}` (position {index}): expected {expected}, found {found}")]
    TypeMismatch {
        /// Instruction name
        op: String,
        /// Position in its bytecode
        index: usize,
        /// Input kind the function declares
        expected: ValueKind,
        /// Output kind of the preceding function
        found: ValueKind,
    },

    /// Arguments do not fit the instruction
    #[error("invalid arguments for `{op}`: {reason}")]
    InvalidArguments {
        /// Instruction name
        op: String,
        /// What is wrong
        reason: String,
    },

    /// Processor could not be created for the program
    #[error("processor setup failed: {0}")]
    Processor(String),
}

impl CompileError {
    /// Shorthand for [`CompileError::InvalidArguments`]
    #[inline]
    #[must_use]
    pub fn invalid_arguments(op: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidArguments {
            op: op.into(),
            reason: reason.into(),
        }
    }
}

/// Failure of a function while evaluating a traverser
///
/// Stops that traverser's path. Sibling traversers and already dispatched
/// sibling branches are unaffected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ExecutionError {
    /// Function-specific failure
    #[error("function `{function}` failed: {reason}")]
    FunctionFailed {
        /// Display name of the failing function
        function: String,
        /// Reason reported by the function
        reason: String,
    },

    /// Runtime value did not have the kind the function needs
    #[error("function `{function}` expected {expected}, found {found}")]
    UnexpectedValue {
        /// Display name of the failing function
        function: String,
        /// Kind the function needs
        expected: ValueKind,
        /// Kind it received
        found: ValueKind,
    },
}

impl ExecutionError {
    /// Shorthand for [`ExecutionError::FunctionFailed`]
    #[inline]
    #[must_use]
    pub fn failed(function: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::FunctionFailed {
            function: function.into(),
            reason: reason.into(),
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File could not be read
    #[error("failed to read config {path}: {source}")]
    Io {
        /// File that was read
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// TOML did not parse into the config type
    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),

    /// Parsed but semantically wrong
    #[error("invalid config value: {0}")]
    Invalid(String),
}

/// Result alias for assembly
pub type CompileResult<T> = Result<T, CompileError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn type_mismatch_names_the_function() {
        let err = CompileError::TypeMismatch {
            op: "plus".into(),
            index: 2,
            expected: ValueKind::Long,
            found: ValueKind::String,
        };
        let message = err.to_string();
        assert!(message.contains("plus"));
        assert!(message.contains("expected long"));
        assert!(message.contains("found string"));
    }

    #[test]
    fn execution_failure_message() {
        let err = ExecutionError::failed("plus(1)", "overflow");
        assert_eq!(err.to_string(), "function `plus(1)` failed: overflow");
    }

    #[test]
    fn config_invalid_message() {
        let err = ConfigError::Invalid("worker_threads must be > 0".into());
        assert!(err.to_string().contains("worker_threads"));
    }
}

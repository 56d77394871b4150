//! Compile error types.

use crate::diagnostics::Diagnostic;
use thiserror::Error;

/// Errors that can occur when compiling a model.
#[derive(Debug, Error)]
pub enum CompileError {
    /// The validator reported at least one error-severity diagnostic. All
    /// diagnostics from the pass, warnings included, are carried here and
    /// were also reported through the sink.
    #[error("model validation failed with {errors} error(s)")]
    ModelInvalid {
        errors: usize,
        diagnostics: Vec<Diagnostic>,
    },
}

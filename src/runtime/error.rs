//! Evaluation error types.

use crate::compile::CompileError;
use thiserror::Error;

/// Errors that can occur when initialising or evaluating.
#[derive(Debug, Error)]
pub enum EvaluateError {
    /// The model is dirty and automatic compilation is disabled.
    #[error("model has not been compiled; call compile() or enable auto_compile")]
    NotCompiled,

    /// Automatic compilation ran and the model failed validation.
    #[error(transparent)]
    Compile(#[from] CompileError),
}

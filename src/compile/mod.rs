//! Model compilation: validation followed by pipeline construction.
//!
//! Compilation is cheap and idempotent; a clean model is not recompiled.
//! Any mutation of the model clears the clean flag and the next
//! `initialise`/`evaluate` (or an explicit [`StateMachine::compile`] call)
//! rebuilds the pipelines.

mod error;
mod ops;
mod pipelines;
mod traversal;
mod validate;

pub use error::CompileError;

pub(crate) use ops::Compiled;

use crate::diagnostics::{Diagnostic, Severity};
use crate::model::StateMachine;

impl<M: 'static> StateMachine<M> {
    /// Validate the model and rebuild the action pipelines.
    ///
    /// All diagnostics are reported through the sink; the error carries them
    /// as well. A model that is already clean returns immediately.
    pub fn compile(&mut self) -> Result<(), CompileError> {
        if self.clean && self.compiled.is_some() {
            return Ok(());
        }

        let diagnostics = validate::validate(self);
        let errors = diagnostics
            .iter()
            .filter(|d| d.severity == Severity::Error)
            .count();
        if errors > 0 {
            self.compiled = None;
            return Err(CompileError::ModelInvalid {
                errors,
                diagnostics,
            });
        }

        let (regions, vertices) = pipelines::element_pipelines(self);
        let transitions = traversal::transition_pipelines(self, &regions, &vertices);
        self.compiled = Some(Compiled {
            vertices,
            transitions,
        });
        self.clean = true;
        Ok(())
    }

    /// Run the validator without compiling.
    pub fn validate(&self) -> Vec<Diagnostic> {
        validate::validate(self)
    }
}

#[cfg(test)]
mod tests {
    use crate::model::{PseudoStateKind, StateMachine};

    fn valid_machine() -> StateMachine<u8> {
        let mut machine = StateMachine::new("m");
        let initial = machine.add_pseudo_state("initial", machine.root(), PseudoStateKind::Initial);
        let a = machine.add_state("a", machine.root()).id();
        machine.transition(initial, a);
        machine
    }

    #[test]
    fn compile_sets_the_clean_flag() {
        let mut machine = valid_machine();
        assert!(!machine.is_clean());
        machine.compile().expect("valid model");
        assert!(machine.is_clean());
    }

    #[test]
    fn recompiling_a_clean_model_is_a_no_op() {
        let mut machine = valid_machine();
        machine.compile().expect("valid model");
        machine.compile().expect("still valid");
        assert!(machine.is_clean());
    }

    #[test]
    fn compile_fails_on_structural_errors() {
        let mut machine: StateMachine<u8> = StateMachine::new("m");
        machine.add_state("orphan", machine.root());

        let result = machine.compile();
        assert!(result.is_err());
        assert!(!machine.is_clean());
    }

    #[test]
    fn validate_reports_without_compiling() {
        let machine = {
            let mut m: StateMachine<u8> = StateMachine::new("m");
            m.add_state("orphan", m.root());
            m
        };
        let diagnostics = machine.validate();
        assert!(!diagnostics.is_empty());
        assert!(!machine.is_clean());
    }
}

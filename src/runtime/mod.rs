//! The public evaluation surface: `initialise`, `evaluate`, and the
//! shared-model variant `evaluate_compiled`.
//!
//! Evaluation is single-threaded and runs to completion per call: a message
//! is consumed, compound transitions and completion chains included, before
//! the call returns. A compiled model is read-only during evaluation, so
//! separate threads may drive separate instances through
//! [`StateMachine::evaluate_compiled`] as long as each instance stays on one
//! thread.

mod error;
mod evaluator;

pub use error::EvaluateError;

use crate::instance::Instance;
use crate::model::StateMachine;

impl<M: 'static> StateMachine<M> {
    /// Compile if needed, then enter the machine's initial configuration on
    /// `instance` by running the root's entry pipeline.
    pub fn initialise(&mut self, instance: &mut dyn Instance) -> Result<(), EvaluateError> {
        self.ensure_compiled()?;
        let compiled = self.compiled.as_ref().ok_or(EvaluateError::NotCompiled)?;
        self.settings.sink().log(&format!("initialise {}", self.name));
        compiled.enter_vertex(self.root, None, instance, false);
        Ok(())
    }

    /// Compile if needed, then offer `message` to the instance's active
    /// configuration. Returns `Ok(true)` iff some transition ran. A
    /// terminated instance consumes nothing.
    pub fn evaluate(
        &mut self,
        instance: &mut dyn Instance,
        message: &M,
    ) -> Result<bool, EvaluateError> {
        self.ensure_compiled()?;
        self.evaluate_compiled(instance, message)
    }

    /// Evaluate against an already compiled model without taking `&mut
    /// self`. Fails with [`EvaluateError::NotCompiled`] when the model has
    /// mutated since the last compile.
    pub fn evaluate_compiled(
        &self,
        instance: &mut dyn Instance,
        message: &M,
    ) -> Result<bool, EvaluateError> {
        if !self.clean {
            return Err(EvaluateError::NotCompiled);
        }
        let compiled = self.compiled.as_ref().ok_or(EvaluateError::NotCompiled)?;
        if instance.is_terminated() {
            return Ok(false);
        }
        Ok(evaluator::evaluate_message(
            self,
            compiled,
            instance,
            Some(message),
        ))
    }

    fn ensure_compiled(&mut self) -> Result<(), EvaluateError> {
        if self.clean && self.compiled.is_some() {
            return Ok(());
        }
        if !self.settings.auto_compile {
            return Err(EvaluateError::NotCompiled);
        }
        self.compile()?;
        Ok(())
    }
}

//! Engine-level configuration.
//!
//! Everything that would otherwise be ambient process state lives here: the
//! namespace separator used by qualified names, the reserved name for
//! implicitly created regions, the diagnostic sink, and the random selection
//! function used by choice pseudo-states. A [`Settings`] value is owned by
//! each [`StateMachine`](crate::StateMachine).

use crate::diagnostics::{DiagnosticSink, TracingSink};
use rand::Rng;
use std::fmt;
use std::sync::Arc;

type RandomFn = Arc<dyn Fn(u32) -> u32 + Send + Sync>;

/// Configuration carried by a state machine.
#[derive(Clone)]
pub struct Settings {
    /// Separator between ancestor names in qualified names.
    pub namespace_separator: String,
    /// Name given to regions created implicitly for a state parent.
    pub default_region_name: String,
    /// Re-evaluate completion at the source after an internal transition.
    pub internal_transitions_trigger_completion: bool,
    /// Compile automatically on the first `initialise`/`evaluate` of a
    /// mutated model.
    pub auto_compile: bool,
    sink: Arc<dyn DiagnosticSink>,
    random: RandomFn,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            namespace_separator: ".".to_string(),
            default_region_name: "default".to_string(),
            internal_transitions_trigger_completion: false,
            auto_compile: true,
            sink: Arc::new(TracingSink),
            random: Arc::new(|max| {
                if max == 0 {
                    0
                } else {
                    rand::rng().random_range(0..max)
                }
            }),
        }
    }
}

impl Settings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the separator used by qualified names.
    pub fn with_separator(mut self, separator: impl Into<String>) -> Self {
        self.namespace_separator = separator.into();
        self
    }

    /// Set the reserved name for implicitly created regions.
    pub fn with_default_region_name(mut self, name: impl Into<String>) -> Self {
        self.default_region_name = name.into();
        self
    }

    /// Make internal transitions re-evaluate completion at their source.
    pub fn with_internal_completion(mut self, enabled: bool) -> Self {
        self.internal_transitions_trigger_completion = enabled;
        self
    }

    /// Enable or disable automatic compilation of a mutated model.
    pub fn with_auto_compile(mut self, enabled: bool) -> Self {
        self.auto_compile = enabled;
        self
    }

    /// Replace the diagnostic sink.
    pub fn with_sink(mut self, sink: Arc<dyn DiagnosticSink>) -> Self {
        self.sink = sink;
        self
    }

    /// Replace the random selection function. `f(max)` must return a value
    /// in `[0, max)`; stub it for deterministic choice selection in tests.
    pub fn with_random(mut self, f: impl Fn(u32) -> u32 + Send + Sync + 'static) -> Self {
        self.random = Arc::new(f);
        self
    }

    pub fn sink(&self) -> &dyn DiagnosticSink {
        self.sink.as_ref()
    }

    /// Draw a value in `[0, max)` from the configured random function.
    pub fn random(&self, max: u32) -> u32 {
        (self.random)(max)
    }
}

impl fmt::Debug for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Settings")
            .field("namespace_separator", &self.namespace_separator)
            .field("default_region_name", &self.default_region_name)
            .field(
                "internal_transitions_trigger_completion",
                &self.internal_transitions_trigger_completion,
            )
            .field("auto_compile", &self.auto_compile)
            .finish_non_exhaustive()
    }
}

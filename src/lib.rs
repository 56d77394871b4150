//! Statecraft: a UML-style hierarchical state machine engine
//!
//! A model is assembled programmatically from regions, states, pseudo-states,
//! and transitions, then compiled into flat per-element action pipelines.
//! Independent instances evaluate messages against the shared model, each
//! keeping its own active configuration, so one model can drive any number
//! of concurrently evolving instances.
//!
//! # Core Concepts
//!
//! - **Model**: the declarative tree built through [`StateMachine`]
//! - **Compilation**: validation plus precomputation of entry/exit/traversal
//!   pipelines, so evaluation does no tree walking beyond transition
//!   selection
//! - **Instance**: per-evaluation mutable state behind the [`Instance`]
//!   trait, including the records that power shallow and deep history
//!
//! # Example
//!
//! ```rust
//! use statecraft::{DefaultInstance, PseudoStateKind, StateMachine};
//!
//! #[derive(Debug, PartialEq)]
//! enum Event {
//!     Play,
//!     Stop,
//! }
//!
//! # fn main() -> Result<(), statecraft::EvaluateError> {
//! let mut player = StateMachine::new("player");
//! let initial = player.add_pseudo_state("initial", player.root(), PseudoStateKind::Initial);
//! let idle = player.add_state("idle", player.root()).id();
//! let playing = player.add_state("playing", player.root()).id();
//! player.transition(initial, idle);
//! player
//!     .transition(idle, playing)
//!     .when(|event, _| matches!(event, Some(Event::Play)));
//! player
//!     .transition(playing, idle)
//!     .when(|event, _| matches!(event, Some(Event::Stop)));
//!
//! let mut instance = DefaultInstance::new();
//! player.initialise(&mut instance)?;
//! assert!(player.evaluate(&mut instance, &Event::Play)?);
//! assert!(!player.evaluate(&mut instance, &Event::Play)?);
//! assert!(player.evaluate(&mut instance, &Event::Stop)?);
//! # Ok(())
//! # }
//! ```

pub mod compile;
pub mod diagnostics;
pub mod instance;
pub mod model;
pub mod runtime;
pub mod settings;

// Re-export commonly used types
pub use compile::CompileError;
pub use diagnostics::{Diagnostic, DiagnosticSink, MemorySink, Severity, SinkLevel, TracingSink};
pub use instance::{ConfigurationSnapshot, DefaultInstance, Instance, SnapshotError};
pub use model::{
    Behavior, Guard, Parent, PseudoStateKind, RegionId, StateMachine, StateRef, TransitionId,
    TransitionKind, TransitionRef, VertexId,
};
pub use runtime::EvaluateError;
pub use settings::Settings;

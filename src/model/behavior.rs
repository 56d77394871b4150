//! Guards and actions attached to model elements.
//!
//! Actions (entry and exit behaviors, transition effects) and guards are
//! plain closures captured by value. The engine invokes them synchronously on
//! the thread that called `evaluate`; a guard must be a pure predicate over
//! the message and the instance.
//!
//! The message parameter is `Option<&M>`: `Some` for an ordinary message and
//! `None` for the completion token offered when a state's configuration
//! becomes complete. Guards written for named events simply do not match the
//! completion token.

use crate::instance::Instance;
use std::sync::Arc;

/// Action invoked during entry, exit, or transition traversal.
///
/// Arguments are the message being consumed (`None` for the completion
/// token), the instance under evaluation, and the deep-history flag that
/// cascades through nested entry.
pub type Behavior<M> = Arc<dyn Fn(Option<&M>, &mut dyn Instance, bool) + Send + Sync>;

pub(crate) fn behavior<M>(
    f: impl Fn(Option<&M>, &mut dyn Instance, bool) + Send + Sync + 'static,
) -> Behavior<M> {
    Arc::new(f)
}

type Predicate<M> = Arc<dyn Fn(Option<&M>, &dyn Instance) -> bool + Send + Sync>;

/// Predicate controlling whether a transition is enabled.
///
/// A transition starts out with [`Guard::always`]; [`Guard::otherwise`]
/// installs the `else` sentinel that choice and junction selection fall back
/// to when no ordinary branch is enabled.
///
/// # Example
///
/// ```rust
/// use statecraft::{DefaultInstance, Guard};
///
/// let instance = DefaultInstance::new();
/// let positive: Guard<i32> = Guard::when(|message, _| matches!(message, Some(v) if *v > 0));
///
/// assert!(positive.check(Some(&5), &instance));
/// assert!(!positive.check(Some(&-5), &instance));
/// assert!(!positive.check(None, &instance));
/// ```
pub struct Guard<M: 'static>(GuardKind<M>);

enum GuardKind<M: 'static> {
    Always,
    Else,
    When(Predicate<M>),
}

impl<M: 'static> Guard<M> {
    /// Guard that is enabled for every message, including the completion
    /// token.
    pub fn always() -> Self {
        Guard(GuardKind::Always)
    }

    /// The `else` sentinel recognized by choice/junction selection. Never
    /// enabled during ordinary guard evaluation.
    pub fn otherwise() -> Self {
        Guard(GuardKind::Else)
    }

    /// Guard backed by a predicate over the message and the instance.
    pub fn when(f: impl Fn(Option<&M>, &dyn Instance) -> bool + Send + Sync + 'static) -> Self {
        Guard(GuardKind::When(Arc::new(f)))
    }

    pub fn is_else(&self) -> bool {
        matches!(self.0, GuardKind::Else)
    }

    /// True when an explicit predicate was installed, as opposed to the
    /// always-true default or the else sentinel.
    pub fn is_predicate(&self) -> bool {
        matches!(self.0, GuardKind::When(_))
    }

    /// Evaluate the guard. The else sentinel reports `false` here; only
    /// pseudo-state selection gives it meaning.
    pub fn check(&self, message: Option<&M>, instance: &dyn Instance) -> bool {
        match &self.0 {
            GuardKind::Always => true,
            GuardKind::Else => false,
            GuardKind::When(predicate) => predicate(message, instance),
        }
    }
}

impl<M: 'static> Clone for Guard<M> {
    fn clone(&self) -> Self {
        Guard(match &self.0 {
            GuardKind::Always => GuardKind::Always,
            GuardKind::Else => GuardKind::Else,
            GuardKind::When(predicate) => GuardKind::When(Arc::clone(predicate)),
        })
    }
}

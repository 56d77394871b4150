//! Fluent handles returned by the construction API.
//!
//! `add_state` returns a [`StateRef`] for chaining entry and exit behaviors;
//! `transition`/`internal_transition` return a [`TransitionRef`] for chaining
//! a guard, effects, or the local kind. Both borrow the machine mutably, so
//! finish a chain (usually with `id()`) before constructing the next element.

use crate::instance::Instance;
use crate::model::behavior::{behavior, Guard};
use crate::model::ids::{TransitionId, VertexId};
use crate::model::machine::StateMachine;
use crate::model::transition::TransitionKind;

/// Fluent handle to a freshly added state.
pub struct StateRef<'a, M: 'static> {
    machine: &'a mut StateMachine<M>,
    id: VertexId,
}

impl<'a, M: 'static> StateRef<'a, M> {
    pub(crate) fn new(machine: &'a mut StateMachine<M>, id: VertexId) -> Self {
        Self { machine, id }
    }

    /// Append an entry behavior. Entry behaviors run after the state is
    /// recorded as current, in the order they were attached.
    pub fn entry(
        self,
        action: impl Fn(Option<&M>, &mut dyn Instance, bool) + Send + Sync + 'static,
    ) -> Self {
        self.machine.push_entry(self.id, behavior(action));
        self
    }

    /// Append an exit behavior. Exit behaviors run after child regions have
    /// been left.
    pub fn exit(
        self,
        action: impl Fn(Option<&M>, &mut dyn Instance, bool) + Send + Sync + 'static,
    ) -> Self {
        self.machine.push_exit(self.id, behavior(action));
        self
    }

    pub fn id(&self) -> VertexId {
        self.id
    }
}

impl<M: 'static> From<StateRef<'_, M>> for VertexId {
    fn from(state: StateRef<'_, M>) -> Self {
        state.id
    }
}

/// Fluent handle to a freshly added transition.
pub struct TransitionRef<'a, M: 'static> {
    machine: &'a mut StateMachine<M>,
    id: TransitionId,
}

impl<'a, M: 'static> TransitionRef<'a, M> {
    pub(crate) fn new(machine: &'a mut StateMachine<M>, id: TransitionId) -> Self {
        Self { machine, id }
    }

    /// Guard the transition with a predicate over the message and instance.
    pub fn when(
        self,
        guard: impl Fn(Option<&M>, &dyn Instance) -> bool + Send + Sync + 'static,
    ) -> Self {
        self.machine.transitions[self.id.idx()].guard = Guard::when(guard);
        self.machine.touch();
        self
    }

    /// Mark this as the `else` branch of a choice or junction. Selection
    /// falls back to it when no guarded branch is enabled.
    pub fn otherwise(self) -> Self {
        self.machine.transitions[self.id.idx()].guard = Guard::otherwise();
        self.machine.touch();
        self
    }

    /// Append a transition effect, run between exit and entry.
    pub fn effect(
        self,
        action: impl Fn(Option<&M>, &mut dyn Instance, bool) + Send + Sync + 'static,
    ) -> Self {
        self.machine.transitions[self.id.idx()]
            .effects
            .push(behavior(action));
        self.machine.touch();
        self
    }

    /// Request local semantics: the source is not exited or re-entered.
    /// Valid only when the target is a proper descendant of the source;
    /// anything else is normalized back to external.
    pub fn local(self) -> Self {
        let data = &self.machine.transitions[self.id.idx()];
        let descends = data
            .target
            .map(|t| self.machine.is_proper_descendant(t, data.source))
            .unwrap_or(false);
        self.machine.transitions[self.id.idx()].kind = if descends {
            TransitionKind::Local
        } else {
            TransitionKind::External
        };
        self.machine.touch();
        self
    }

    pub fn id(&self) -> TransitionId {
        self.id
    }
}

impl<M: 'static> From<TransitionRef<'_, M>> for TransitionId {
    fn from(transition: TransitionRef<'_, M>) -> Self {
        transition.id
    }
}

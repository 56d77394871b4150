//! Transition data.

use crate::model::behavior::{Behavior, Guard};
use crate::model::ids::VertexId;

/// How a transition relates source and target.
///
/// `Internal` transitions have no target and run only their effects. `Local`
/// is valid only when the target is a proper descendant of the source;
/// construction normalizes anything else to `External`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TransitionKind {
    External,
    Internal,
    Local,
}

pub(crate) struct TransitionData<M: 'static> {
    pub(crate) source: VertexId,
    pub(crate) target: Option<VertexId>,
    pub(crate) kind: TransitionKind,
    pub(crate) guard: Guard<M>,
    pub(crate) effects: Vec<Behavior<M>>,
    pub(crate) alive: bool,
}

impl<M: 'static> TransitionData<M> {
    pub(crate) fn new(source: VertexId, target: Option<VertexId>, kind: TransitionKind) -> Self {
        Self {
            source,
            target,
            kind,
            guard: Guard::always(),
            effects: Vec::new(),
            alive: true,
        }
    }
}

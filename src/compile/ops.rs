//! Precompiled action pipelines.
//!
//! Compilation reduces evaluation to running flat sequences of closures: each
//! region and vertex gets `leave`, `begin_enter`, `end_enter`, and `enter`
//! pipelines, and each transition gets a `traverse` pipeline capturing its
//! full exit-effect-entry sequence. Pipelines are concatenated by literal
//! vector extension at compile time; the few steps that depend on runtime
//! state (a region's current child, history records) are single ops that
//! dispatch through the compiled table by ID.

use crate::instance::Instance;
use crate::model::{TransitionId, VertexId};
use std::sync::Arc;

/// One compiled pipeline step.
///
/// Arguments: the compiled table (for ops that dispatch dynamically), the
/// message, the instance, and the cascading deep-history flag.
pub(crate) type Op<M> =
    Arc<dyn Fn(&Compiled<M>, Option<&M>, &mut dyn Instance, bool) + Send + Sync>;

pub(crate) fn op<M: 'static>(
    f: impl Fn(&Compiled<M>, Option<&M>, &mut dyn Instance, bool) + Send + Sync + 'static,
) -> Op<M> {
    Arc::new(f)
}

/// The four pipelines of a region or vertex.
pub(crate) struct ElementOps<M: 'static> {
    pub(crate) leave: Vec<Op<M>>,
    pub(crate) begin_enter: Vec<Op<M>>,
    pub(crate) end_enter: Vec<Op<M>>,
    pub(crate) enter: Vec<Op<M>>,
}

impl<M: 'static> ElementOps<M> {
    pub(crate) fn empty() -> Self {
        Self {
            leave: Vec::new(),
            begin_enter: Vec::new(),
            end_enter: Vec::new(),
            enter: Vec::new(),
        }
    }

    /// Populate `enter` as `begin_enter` followed by `end_enter`.
    pub(crate) fn seal(&mut self) {
        let mut enter = Vec::with_capacity(self.begin_enter.len() + self.end_enter.len());
        enter.extend_from_slice(&self.begin_enter);
        enter.extend_from_slice(&self.end_enter);
        self.enter = enter;
    }
}

pub(crate) struct TransitionOps<M: 'static> {
    pub(crate) traverse: Vec<Op<M>>,
    /// Set when the target is a choice or junction: selection re-runs there
    /// at evaluation time with the live message.
    pub(crate) compound: Option<VertexId>,
}

impl<M: 'static> TransitionOps<M> {
    pub(crate) fn empty() -> Self {
        Self {
            traverse: Vec::new(),
            compound: None,
        }
    }
}

/// The compiled artifact: pipeline tables indexed by element ID.
///
/// Region pipelines exist only while compiling; they are concatenated into
/// the pipelines of their owning states and of transitions, so the runtime
/// tables carry vertices and transitions alone.
pub(crate) struct Compiled<M: 'static> {
    pub(crate) vertices: Vec<ElementOps<M>>,
    pub(crate) transitions: Vec<TransitionOps<M>>,
}

impl<M: 'static> Compiled<M> {
    pub(crate) fn run(
        &self,
        ops: &[Op<M>],
        message: Option<&M>,
        instance: &mut dyn Instance,
        history: bool,
    ) {
        for step in ops {
            step(self, message, instance, history);
        }
    }

    pub(crate) fn enter_vertex(
        &self,
        vertex: VertexId,
        message: Option<&M>,
        instance: &mut dyn Instance,
        history: bool,
    ) {
        self.run(&self.vertices[vertex.idx()].enter, message, instance, history);
    }

    pub(crate) fn leave_vertex(
        &self,
        vertex: VertexId,
        message: Option<&M>,
        instance: &mut dyn Instance,
        history: bool,
    ) {
        self.run(&self.vertices[vertex.idx()].leave, message, instance, history);
    }

    pub(crate) fn traverse(
        &self,
        transition: TransitionId,
        message: Option<&M>,
        instance: &mut dyn Instance,
        history: bool,
    ) {
        self.run(
            &self.transitions[transition.idx()].traverse,
            message,
            instance,
            history,
        );
    }
}

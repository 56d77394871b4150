//! Arena handles for model elements.
//!
//! Elements hold parent and child references as plain IDs into the arenas
//! owned by [`StateMachine`](crate::StateMachine), which keeps the tree free
//! of ownership cycles. IDs are only meaningful for the machine that issued
//! them.

use serde::{Deserialize, Serialize};

/// Handle to a region.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RegionId(pub(crate) u32);

/// Handle to a vertex (state, final state, or pseudo-state).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct VertexId(pub(crate) u32);

/// Handle to a transition.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TransitionId(pub(crate) u32);

impl RegionId {
    pub(crate) fn idx(self) -> usize {
        self.0 as usize
    }
}

impl VertexId {
    pub(crate) fn idx(self) -> usize {
        self.0 as usize
    }
}

impl TransitionId {
    pub(crate) fn idx(self) -> usize {
        self.0 as usize
    }
}

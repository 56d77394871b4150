//! The state machine model: an arena of regions, vertices, and transitions.
//!
//! The machine owns every element; relationships are IDs, so parent/child
//! back-references never form ownership cycles. Construction is fluent and
//! total: structural mistakes are deferred to the validator, which reports
//! them when the model is compiled.

use crate::compile::Compiled;
use crate::instance::Instance;
use crate::model::behavior::{behavior, Behavior};
use crate::model::builder::{StateRef, TransitionRef};
use crate::model::ids::{RegionId, TransitionId, VertexId};
use crate::model::region::{Parent, RegionData};
use crate::model::transition::{TransitionData, TransitionKind};
use crate::model::vertex::{PseudoStateKind, StateData, VertexData, VertexKind};
use crate::settings::Settings;

/// A hierarchical state machine model, generic over the message type `M`.
///
/// The machine is the root state of the tree. Mutating the model clears the
/// `clean` flag; compilation rebuilds the action pipelines and sets it again.
/// Independent [`Instance`](crate::Instance) values hold the per-evaluation
/// active configuration, so one compiled model can drive many instances.
pub struct StateMachine<M: 'static> {
    pub(crate) name: String,
    pub(crate) settings: Settings,
    pub(crate) regions: Vec<RegionData>,
    pub(crate) vertices: Vec<VertexData<M>>,
    pub(crate) transitions: Vec<TransitionData<M>>,
    pub(crate) root: VertexId,
    pub(crate) clean: bool,
    pub(crate) compiled: Option<Compiled<M>>,
}

impl<M: 'static> StateMachine<M> {
    /// Create a machine with default [`Settings`].
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_settings(name, Settings::default())
    }

    pub fn with_settings(name: impl Into<String>, settings: Settings) -> Self {
        let name = name.into();
        let root_data = VertexData::new(name.clone(), None, VertexKind::State(StateData::new()));
        Self {
            name,
            settings,
            regions: Vec::new(),
            vertices: vec![root_data],
            transitions: Vec::new(),
            root: VertexId(0),
            clean: false,
            compiled: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The root state of the machine.
    pub fn root(&self) -> VertexId {
        self.root
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Mutable access to the settings. Sink and random replacements take
    /// effect immediately; separator and region-name changes only affect
    /// elements created afterwards.
    pub fn settings_mut(&mut self) -> &mut Settings {
        &mut self.settings
    }

    /// True when the compiled pipelines match the current model.
    pub fn is_clean(&self) -> bool {
        self.clean
    }


    /// Add an explicitly named region to a state.
    pub fn add_region(&mut self, name: impl Into<String>, state: VertexId) -> RegionId {
        let region = self.push_region(name.into(), state);
        self.attach_region(state, region, false);
        region
    }

    /// Add a state. The parent may be a region or a state; for a state
    /// parent the default region is created lazily, named by
    /// [`Settings::default_region_name`].
    pub fn add_state(
        &mut self,
        name: impl Into<String>,
        parent: impl Into<Parent>,
    ) -> StateRef<'_, M> {
        let id = self.push_vertex(name.into(), parent.into(), VertexKind::State(StateData::new()));
        StateRef::new(self, id)
    }

    /// Add a final state. Final states permit no outgoing transitions; a
    /// region is complete when its current vertex is final.
    pub fn add_final_state(
        &mut self,
        name: impl Into<String>,
        parent: impl Into<Parent>,
    ) -> VertexId {
        self.push_vertex(name.into(), parent.into(), VertexKind::Final)
    }

    /// Add a pseudo-state of the given kind.
    pub fn add_pseudo_state(
        &mut self,
        name: impl Into<String>,
        parent: impl Into<Parent>,
        kind: PseudoStateKind,
    ) -> VertexId {
        self.push_vertex(name.into(), parent.into(), VertexKind::Pseudo(kind))
    }

    /// Add an external transition between two vertices. Returns a fluent
    /// handle for attaching a guard, effects, or the local kind.
    pub fn transition(&mut self, source: VertexId, target: VertexId) -> TransitionRef<'_, M> {
        let id = self.push_transition(source, Some(target), TransitionKind::External);
        TransitionRef::new(self, id)
    }

    /// Add an internal transition: no target, no exit or entry, effects only.
    pub fn internal_transition(&mut self, source: VertexId) -> TransitionRef<'_, M> {
        let id = self.push_transition(source, None, TransitionKind::Internal);
        TransitionRef::new(self, id)
    }

    fn push_region(&mut self, name: String, parent: VertexId) -> RegionId {
        let id = RegionId(self.regions.len() as u32);
        self.regions.push(RegionData::new(name, parent));
        self.touch();
        id
    }

    fn push_vertex(&mut self, name: String, parent: Parent, kind: VertexKind<M>) -> VertexId {
        let region = self.owning_region(parent);
        let id = VertexId(self.vertices.len() as u32);
        self.vertices.push(VertexData::new(name, Some(region), kind));
        self.regions[region.idx()].vertices.push(id);
        self.touch();
        id
    }

    fn push_transition(
        &mut self,
        source: VertexId,
        target: Option<VertexId>,
        kind: TransitionKind,
    ) -> TransitionId {
        let id = TransitionId(self.transitions.len() as u32);
        self.transitions.push(TransitionData::new(source, target, kind));
        self.vertices[source.idx()].outgoing.push(id);
        self.touch();
        id
    }

    fn owning_region(&mut self, parent: Parent) -> RegionId {
        match parent {
            Parent::Region(region) => region,
            Parent::State(state) => self.default_region_of(state),
        }
    }

    fn default_region_of(&mut self, state: VertexId) -> RegionId {
        if let VertexKind::State(data) = &self.vertices[state.idx()].kind {
            if let Some(region) = data.default_region {
                return region;
            }
        }
        let name = self.settings.default_region_name.clone();
        let region = self.push_region(name, state);
        self.attach_region(state, region, true);
        region
    }

    fn attach_region(&mut self, state: VertexId, region: RegionId, default: bool) {
        let attached = match &mut self.vertices[state.idx()].kind {
            VertexKind::State(data) => {
                data.regions.push(region);
                if default {
                    data.default_region = Some(region);
                }
                true
            }
            _ => false,
        };
        if !attached {
            // The region stays in the arena with a non-state parent; the
            // validator reports it at compile time.
            let name = self.qualified_name(state);
            self.settings
                .sink()
                .error(&format!("{name}: only states may own regions"));
        }
        self.touch();
    }

    pub(crate) fn push_entry(&mut self, state: VertexId, action: Behavior<M>) {
        if let VertexKind::State(data) = &mut self.vertices[state.idx()].kind {
            data.entry.push(action);
        }
        self.touch();
    }

    pub(crate) fn push_exit(&mut self, state: VertexId, action: Behavior<M>) {
        if let VertexKind::State(data) = &mut self.vertices[state.idx()].kind {
            data.exit.push(action);
        }
        self.touch();
    }

    /// Attach an entry behavior without going through [`StateRef`].
    pub fn entry(
        &mut self,
        state: VertexId,
        action: impl Fn(Option<&M>, &mut dyn Instance, bool) + Send + Sync + 'static,
    ) {
        self.push_entry(state, behavior(action));
    }

    /// Attach an exit behavior without going through [`StateRef`].
    pub fn exit(
        &mut self,
        state: VertexId,
        action: impl Fn(Option<&M>, &mut dyn Instance, bool) + Send + Sync + 'static,
    ) {
        self.push_exit(state, behavior(action));
    }

    pub(crate) fn touch(&mut self) {
        self.clean = false;
    }


    /// Detach a transition from the model.
    pub fn remove_transition(&mut self, transition: TransitionId) {
        if !self.transitions[transition.idx()].alive {
            return;
        }
        let source = self.transitions[transition.idx()].source;
        self.transitions[transition.idx()].alive = false;
        self.vertices[source.idx()].outgoing.retain(|&t| t != transition);
        self.touch();
    }

    /// Detach a vertex and its whole subtree, dropping every transition that
    /// referenced a removed element. The root cannot be removed.
    pub fn remove_vertex(&mut self, vertex: VertexId) {
        if vertex == self.root {
            let name = self.qualified_name(vertex);
            self.settings
                .sink()
                .error(&format!("{name}: the machine root cannot be removed"));
            return;
        }
        if !self.vertices[vertex.idx()].alive {
            return;
        }
        let (dead_vertices, dead_regions) = self.collect_subtree(vertex);
        if let Some(parent) = self.vertices[vertex.idx()].parent {
            self.regions[parent.idx()].vertices.retain(|&v| v != vertex);
        }
        self.bury(&dead_vertices, &dead_regions);
    }

    /// Detach a region and its whole subtree.
    pub fn remove_region(&mut self, region: RegionId) {
        if !self.regions[region.idx()].alive {
            return;
        }
        let mut dead_vertices = Vec::new();
        let mut dead_regions = vec![region];
        for vertex in self.regions[region.idx()].vertices.clone() {
            let (vs, rs) = self.collect_subtree(vertex);
            dead_vertices.extend(vs);
            dead_regions.extend(rs);
        }
        let owner = self.regions[region.idx()].parent;
        if let VertexKind::State(data) = &mut self.vertices[owner.idx()].kind {
            data.regions.retain(|&r| r != region);
            if data.default_region == Some(region) {
                data.default_region = None;
            }
        }
        self.bury(&dead_vertices, &dead_regions);
    }

    fn collect_subtree(&self, vertex: VertexId) -> (Vec<VertexId>, Vec<RegionId>) {
        let mut vertices = Vec::new();
        let mut regions = Vec::new();
        let mut stack = vec![vertex];
        while let Some(v) = stack.pop() {
            vertices.push(v);
            if let VertexKind::State(data) = &self.vertices[v.idx()].kind {
                for &r in &data.regions {
                    regions.push(r);
                    stack.extend(self.regions[r.idx()].vertices.iter().copied());
                }
            }
        }
        (vertices, regions)
    }

    fn bury(&mut self, vertices: &[VertexId], regions: &[RegionId]) {
        for &v in vertices {
            self.vertices[v.idx()].alive = false;
        }
        for &r in regions {
            self.regions[r.idx()].alive = false;
        }
        let dead_transitions: Vec<TransitionId> = self
            .transitions
            .iter()
            .enumerate()
            .filter(|(_, t)| {
                t.alive
                    && (vertices.contains(&t.source)
                        || t.target.map(|v| vertices.contains(&v)).unwrap_or(false))
            })
            .map(|(i, _)| TransitionId(i as u32))
            .collect();
        for t in dead_transitions {
            let source = self.transitions[t.idx()].source;
            self.transitions[t.idx()].alive = false;
            if self.vertices[source.idx()].alive {
                self.vertices[source.idx()].outgoing.retain(|&x| x != t);
            }
        }
        self.touch();
    }


    pub fn vertex_name(&self, vertex: VertexId) -> &str {
        &self.vertices[vertex.idx()].name
    }

    pub fn region_name(&self, region: RegionId) -> &str {
        &self.regions[region.idx()].name
    }

    /// Ancestor names joined by the configured namespace separator.
    pub fn qualified_name(&self, vertex: VertexId) -> String {
        let mut parts = vec![self.vertices[vertex.idx()].name.as_str()];
        let mut cursor = vertex;
        while let Some(region) = self.vertices[cursor.idx()].parent {
            parts.push(self.regions[region.idx()].name.as_str());
            cursor = self.regions[region.idx()].parent;
            parts.push(self.vertices[cursor.idx()].name.as_str());
        }
        parts.reverse();
        parts.join(&self.settings.namespace_separator)
    }

    pub fn region_qualified_name(&self, region: RegionId) -> String {
        let owner = self.qualified_name(self.regions[region.idx()].parent);
        format!(
            "{owner}{}{}",
            self.settings.namespace_separator,
            self.regions[region.idx()].name
        )
    }

    /// Child regions of a state; empty for pseudo-states and final states.
    pub fn regions_of(&self, vertex: VertexId) -> &[RegionId] {
        match &self.vertices[vertex.idx()].kind {
            VertexKind::State(data) => &data.regions,
            _ => &[],
        }
    }

    pub fn vertices_of(&self, region: RegionId) -> &[VertexId] {
        &self.regions[region.idx()].vertices
    }

    pub fn outgoing_of(&self, vertex: VertexId) -> &[TransitionId] {
        &self.vertices[vertex.idx()].outgoing
    }

    pub fn parent_region_of(&self, vertex: VertexId) -> Option<RegionId> {
        self.vertices[vertex.idx()].parent
    }

    pub fn owner_of(&self, region: RegionId) -> VertexId {
        self.regions[region.idx()].parent
    }

    pub fn source_of(&self, transition: TransitionId) -> VertexId {
        self.transitions[transition.idx()].source
    }

    pub fn target_of(&self, transition: TransitionId) -> Option<VertexId> {
        self.transitions[transition.idx()].target
    }

    pub fn kind_of(&self, transition: TransitionId) -> TransitionKind {
        self.transitions[transition.idx()].kind
    }

    /// A state with no regions.
    pub fn is_simple(&self, vertex: VertexId) -> bool {
        matches!(&self.vertices[vertex.idx()].kind, VertexKind::State(d) if d.regions.is_empty())
    }

    /// A state with at least one region.
    pub fn is_composite(&self, vertex: VertexId) -> bool {
        matches!(&self.vertices[vertex.idx()].kind, VertexKind::State(d) if !d.regions.is_empty())
    }

    /// A state with two or more regions, all active concurrently.
    pub fn is_orthogonal(&self, vertex: VertexId) -> bool {
        matches!(&self.vertices[vertex.idx()].kind, VertexKind::State(d) if d.regions.len() >= 2)
    }

    pub fn is_final_state(&self, vertex: VertexId) -> bool {
        matches!(self.vertices[vertex.idx()].kind, VertexKind::Final)
    }

    pub fn pseudo_kind_of(&self, vertex: VertexId) -> Option<PseudoStateKind> {
        match self.vertices[vertex.idx()].kind {
            VertexKind::Pseudo(kind) => Some(kind),
            _ => None,
        }
    }

    /// True when the vertex is recorded as current all the way up to the
    /// root for this instance.
    pub fn is_active(&self, instance: &dyn Instance, vertex: VertexId) -> bool {
        let mut cursor = vertex;
        loop {
            match self.vertices[cursor.idx()].parent {
                None => return true,
                Some(region) => {
                    if instance.current(region) != Some(cursor) {
                        return false;
                    }
                    cursor = self.regions[region.idx()].parent;
                }
            }
        }
    }

    /// A region is complete when its current vertex is final.
    pub fn region_is_complete(&self, instance: &dyn Instance, region: RegionId) -> bool {
        instance
            .current(region)
            .map(|v| self.is_final_state(v))
            .unwrap_or(false)
    }

    /// A state is complete when every child region is complete; simple
    /// states are trivially complete.
    pub fn is_complete(&self, instance: &dyn Instance, vertex: VertexId) -> bool {
        match &self.vertices[vertex.idx()].kind {
            VertexKind::State(data) => data
                .regions
                .iter()
                .all(|&r| self.region_is_complete(instance, r)),
            VertexKind::Final => true,
            VertexKind::Pseudo(_) => false,
        }
    }

    /// True when `vertex` lies strictly below `ancestor` in the tree.
    pub fn is_proper_descendant(&self, vertex: VertexId, ancestor: VertexId) -> bool {
        if vertex == ancestor {
            return false;
        }
        let mut cursor = vertex;
        while let Some(region) = self.vertices[cursor.idx()].parent {
            cursor = self.regions[region.idx()].parent;
            if cursor == ancestor {
                return true;
            }
        }
        false
    }

    pub(crate) fn transition_data(&self, transition: TransitionId) -> &TransitionData<M> {
        &self.transitions[transition.idx()]
    }
}

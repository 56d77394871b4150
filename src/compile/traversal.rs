//! Pass B: transition traversal pipelines.
//!
//! Each transition's `traverse` pipeline captures its complete
//! exit-effect-entry sequence. External transitions are scoped by the least
//! common ancestor of source and target: the source-side child of the LCA is
//! left, effects run, then the target-side ancestors are begin-entered down
//! to the target's parent and the target is entered in full. Local
//! transitions never leave the source; internal transitions run effects
//! only.

use crate::compile::ops::{op, ElementOps, Op, TransitionOps};
use crate::model::{
    PseudoStateKind, RegionId, StateMachine, TransitionId, TransitionKind, VertexId,
};

/// An element on the root-to-vertex ancestry path.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum PathElem {
    Vertex(VertexId),
    Region(RegionId),
}

pub(crate) fn transition_pipelines<M: 'static>(
    machine: &StateMachine<M>,
    regions: &[ElementOps<M>],
    vertices: &[ElementOps<M>],
) -> Vec<TransitionOps<M>> {
    let mut out = Vec::with_capacity(machine.transitions.len());
    for (index, data) in machine.transitions.iter().enumerate() {
        let id = TransitionId(index as u32);
        if !data.alive {
            out.push(TransitionOps::empty());
            continue;
        }
        let mut ops = TransitionOps::empty();

        match (data.kind, data.target) {
            (TransitionKind::Internal, _) | (_, None) => {
                push_effects(machine, id, &mut ops.traverse);
            }
            (TransitionKind::Local, Some(target)) => {
                let source_path = ancestry(machine, data.source);
                let target_path = ancestry(machine, target);
                let source_at = target_path
                    .iter()
                    .position(|&e| e == PathElem::Vertex(data.source));
                match source_at {
                    Some(at) => {
                        if let Some(PathElem::Region(region)) = target_path.get(at + 1) {
                            ops.traverse.extend_from_slice(&regions[region.idx()].leave);
                        }
                        push_effects(machine, id, &mut ops.traverse);
                        enter_chain(&target_path, at + 2, regions, vertices, &mut ops.traverse);
                    }
                    // Not a descendant after all; treat as external.
                    None => external_traverse(
                        machine,
                        id,
                        &source_path,
                        &target_path,
                        regions,
                        vertices,
                        &mut ops.traverse,
                    ),
                }
            }
            (_, Some(target)) => {
                let source_path = ancestry(machine, data.source);
                let target_path = ancestry(machine, target);
                external_traverse(
                    machine,
                    id,
                    &source_path,
                    &target_path,
                    regions,
                    vertices,
                    &mut ops.traverse,
                );
            }
        }

        if let Some(target) = data.target {
            if matches!(
                machine.pseudo_kind_of(target),
                Some(PseudoStateKind::Choice | PseudoStateKind::Junction)
            ) {
                ops.compound = Some(target);
            }
        }

        out.push(ops);
    }
    out
}

fn external_traverse<M: 'static>(
    machine: &StateMachine<M>,
    id: TransitionId,
    source_path: &[PathElem],
    target_path: &[PathElem],
    regions: &[ElementOps<M>],
    vertices: &[ElementOps<M>],
    traverse: &mut Vec<Op<M>>,
) {
    let at = divergence(source_path, target_path);
    traverse.extend_from_slice(elem_ops(source_path[at], regions, vertices).leave.as_slice());
    push_effects(machine, id, traverse);
    for &elem in &target_path[at..target_path.len() - 1] {
        traverse.extend_from_slice(elem_ops(elem, regions, vertices).begin_enter.as_slice());
    }
    if let Some(&last) = target_path.last() {
        traverse.extend_from_slice(elem_ops(last, regions, vertices).enter.as_slice());
    }
}

/// Begin-enter every element from `from` up to (excluding) the last path
/// element, then fully enter the last.
fn enter_chain<M: 'static>(
    path: &[PathElem],
    from: usize,
    regions: &[ElementOps<M>],
    vertices: &[ElementOps<M>],
    traverse: &mut Vec<Op<M>>,
) {
    if path.is_empty() {
        return;
    }
    for &elem in &path[from.min(path.len() - 1)..path.len() - 1] {
        traverse.extend_from_slice(elem_ops(elem, regions, vertices).begin_enter.as_slice());
    }
    if let Some(&last) = path.last() {
        traverse.extend_from_slice(elem_ops(last, regions, vertices).enter.as_slice());
    }
}

fn push_effects<M: 'static>(machine: &StateMachine<M>, id: TransitionId, traverse: &mut Vec<Op<M>>) {
    for effect in &machine.transition_data(id).effects {
        let effect = effect.clone();
        traverse.push(op(move |_c, m, i, h| effect(m, i, h)));
    }
}

fn elem_ops<'a, M: 'static>(
    elem: PathElem,
    regions: &'a [ElementOps<M>],
    vertices: &'a [ElementOps<M>],
) -> &'a ElementOps<M> {
    match elem {
        PathElem::Vertex(v) => &vertices[v.idx()],
        PathElem::Region(r) => &regions[r.idx()],
    }
}

/// Root-to-vertex path, alternating vertices and regions.
fn ancestry<M: 'static>(machine: &StateMachine<M>, vertex: VertexId) -> Vec<PathElem> {
    let mut path = Vec::new();
    let mut cursor = vertex;
    loop {
        path.push(PathElem::Vertex(cursor));
        match machine.parent_region_of(cursor) {
            Some(region) => {
                path.push(PathElem::Region(region));
                cursor = machine.owner_of(region);
            }
            None => break,
        }
    }
    path.reverse();
    path
}

/// Index of the boundary element below the least common ancestor region.
///
/// Capped so self- and ancestor-targeted transitions exit and re-enter the
/// boundary vertex. A divergence at two sibling regions backs up to their
/// shared owning vertex: neither region is an ancestor of the other side's
/// vertex, so the orthogonal state itself exits and re-enters whole.
fn divergence(source: &[PathElem], target: &[PathElem]) -> usize {
    let mut i = 0;
    while i < source.len() - 1 && i < target.len() - 1 && source[i] == target[i] {
        i += 1;
    }
    if i > 0
        && source[i] != target[i]
        && matches!(source[i], PathElem::Region(_))
        && matches!(target[i], PathElem::Region(_))
    {
        i -= 1;
    }
    i
}

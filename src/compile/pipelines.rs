//! Pass A: element pipelines.
//!
//! A depth-first walk over the validated model resolves each region's
//! initial-family child and whether a deep history pseudo-state sits in any
//! ancestor region, then builds the `leave`/`begin_enter`/`end_enter`
//! pipelines for every region and vertex. Entry runs parent before child,
//! exit runs child before parent, and orthogonal regions are entered in
//! declared order and left in reverse.

use crate::compile::ops::{op, ElementOps};
use crate::model::{PseudoStateKind, RegionId, StateMachine, VertexId, VertexKind};

#[derive(Clone, Copy, Default)]
struct RegionInfo {
    initial: Option<VertexId>,
    initial_kind: Option<PseudoStateKind>,
    /// True when some ancestor region's initial-family child is deep
    /// history; entry must then consult the instance's records.
    deep_history_above: bool,
}

pub(crate) fn element_pipelines<M: 'static>(
    machine: &StateMachine<M>,
) -> (Vec<ElementOps<M>>, Vec<ElementOps<M>>) {
    let info = region_info(machine);

    let mut regions: Vec<ElementOps<M>> = Vec::with_capacity(machine.regions.len());
    for (index, data) in machine.regions.iter().enumerate() {
        let id = RegionId(index as u32);
        if !data.alive {
            regions.push(ElementOps::empty());
            continue;
        }
        regions.push(region_ops(id, info[index]));
    }

    let mut vertices: Vec<ElementOps<M>> = Vec::with_capacity(machine.vertices.len());
    for (index, data) in machine.vertices.iter().enumerate() {
        let id = VertexId(index as u32);
        if !data.alive {
            vertices.push(ElementOps::empty());
            continue;
        }
        let mut ops = ElementOps::empty();
        match &data.kind {
            VertexKind::State(state) => {
                for &region in state.regions.iter().rev() {
                    ops.leave.extend_from_slice(&regions[region.idx()].leave);
                }
                for exit in &state.exit {
                    let exit = exit.clone();
                    ops.leave.push(op(move |_c, m, i, h| exit(m, i, h)));
                }
                if let Some(parent) = data.parent {
                    ops.begin_enter
                        .push(op(move |_c, _m, i, _h| i.set_current(parent, id)));
                }
                for entry in &state.entry {
                    let entry = entry.clone();
                    ops.begin_enter.push(op(move |_c, m, i, h| entry(m, i, h)));
                }
                for &region in &state.regions {
                    ops.end_enter.extend_from_slice(&regions[region.idx()].enter);
                }
            }
            VertexKind::Final => {
                if let Some(parent) = data.parent {
                    ops.begin_enter
                        .push(op(move |_c, _m, i, _h| i.set_current(parent, id)));
                }
            }
            VertexKind::Pseudo(kind) => match kind {
                PseudoStateKind::Initial => {
                    if let Some(&transition) = data.outgoing.first() {
                        ops.end_enter
                            .push(op(move |c, m, i, h| c.traverse(transition, m, i, h)));
                    }
                }
                PseudoStateKind::ShallowHistory | PseudoStateKind::DeepHistory => {
                    let deep = *kind == PseudoStateKind::DeepHistory;
                    let transition = data.outgoing.first().copied();
                    let region = data.parent;
                    ops.end_enter.push(op(move |c, m, i, h| {
                        let recorded = region.and_then(|r| i.current(r));
                        match recorded {
                            Some(vertex) => c.enter_vertex(vertex, m, i, h || deep),
                            None => {
                                if let Some(t) = transition {
                                    c.traverse(t, m, i, h || deep);
                                }
                            }
                        }
                    }));
                }
                PseudoStateKind::Terminate => {
                    ops.begin_enter
                        .push(op(move |_c, _m, i, _h| i.set_terminated(true)));
                }
                PseudoStateKind::Choice | PseudoStateKind::Junction => {}
            },
        }
        ops.seal();
        vertices.push(ops);
    }

    (regions, vertices)
}

fn region_ops<M: 'static>(id: RegionId, info: RegionInfo) -> ElementOps<M> {
    let mut ops = ElementOps::empty();

    ops.leave.push(op(move |c, m, i, h| {
        if let Some(current) = i.current(id) {
            c.leave_vertex(current, m, i, h);
        }
    }));

    if let (Some(initial), Some(kind)) = (info.initial, info.initial_kind) {
        if info.deep_history_above || kind.is_history() {
            let is_history = kind.is_history();
            let deep = kind == PseudoStateKind::DeepHistory;
            ops.end_enter.push(op(move |c, m, i, h| {
                let vertex = if h || is_history {
                    i.current(id).unwrap_or(initial)
                } else {
                    initial
                };
                c.enter_vertex(vertex, m, i, h || deep);
            }));
        } else {
            ops.end_enter
                .push(op(move |c, m, i, h| c.enter_vertex(initial, m, i, h)));
        }
    }

    ops.seal();
    ops
}

fn region_info<M: 'static>(machine: &StateMachine<M>) -> Vec<RegionInfo> {
    let mut info = vec![RegionInfo::default(); machine.regions.len()];
    let mut stack = vec![(machine.root(), false)];
    while let Some((vertex, deep_above)) = stack.pop() {
        for &region in machine.regions_of(vertex) {
            let initial = machine
                .vertices_of(region)
                .iter()
                .copied()
                .find(|&v| {
                    machine
                        .pseudo_kind_of(v)
                        .map(|k| k.is_initial_family())
                        .unwrap_or(false)
                });
            let initial_kind = initial.and_then(|v| machine.pseudo_kind_of(v));
            info[region.idx()] = RegionInfo {
                initial,
                initial_kind,
                deep_history_above: deep_above,
            };
            let below = deep_above || initial_kind == Some(PseudoStateKind::DeepHistory);
            for &child in machine.vertices_of(region) {
                stack.push((child, below));
            }
        }
    }
    info
}

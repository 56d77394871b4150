//! Message evaluation against a compiled model.
//!
//! Selection is depth-first: a state first offers the message to the current
//! vertex of each child region in declared order, and only consults its own
//! outgoing transitions when no descendant consumed it. Within a vertex,
//! transitions are tried in declaration order and the first enabled guard
//! wins. Executing a transition runs its precompiled traverse pipeline,
//! chains through choice/junction targets with the live message, and then
//! re-evaluates completion at the newly entered configuration.

use crate::compile::Compiled;
use crate::instance::Instance;
use crate::model::{PseudoStateKind, StateMachine, TransitionId, VertexId};

pub(crate) fn evaluate_message<M: 'static>(
    machine: &StateMachine<M>,
    compiled: &Compiled<M>,
    instance: &mut dyn Instance,
    message: Option<&M>,
) -> bool {
    evaluate_vertex(machine, compiled, machine.root(), instance, message)
}

fn evaluate_vertex<M: 'static>(
    machine: &StateMachine<M>,
    compiled: &Compiled<M>,
    vertex: VertexId,
    instance: &mut dyn Instance,
    message: Option<&M>,
) -> bool {
    let mut consumed = false;

    // Inner transitions take priority; every orthogonal region gets a look
    // unless an earlier one deactivated this vertex or terminated the
    // instance.
    for &region in machine.regions_of(vertex) {
        if let Some(current) = instance.current(region) {
            if evaluate_vertex(machine, compiled, current, instance, message) {
                consumed = true;
                if instance.is_terminated() || !machine.is_active(&*instance, vertex) {
                    return true;
                }
            }
        }
    }

    if consumed {
        if machine.is_complete(&*instance, vertex) {
            evaluate_completion(machine, compiled, vertex, instance);
        }
        return true;
    }

    for &transition in machine.outgoing_of(vertex) {
        let guard = &machine.transition_data(transition).guard;
        if guard.is_else() {
            continue;
        }
        if guard.check(message, &*instance) {
            execute(machine, compiled, transition, instance, message);
            return true;
        }
    }

    false
}

/// Run a selected transition: traverse, compound chaining, completion.
fn execute<M: 'static>(
    machine: &StateMachine<M>,
    compiled: &Compiled<M>,
    transition: TransitionId,
    instance: &mut dyn Instance,
    message: Option<&M>,
) {
    let source = machine.qualified_name(machine.source_of(transition));
    match machine.target_of(transition) {
        Some(target) => machine.settings().sink().log(&format!(
            "traverse {source} -> {}",
            machine.qualified_name(target)
        )),
        None => machine
            .settings()
            .sink()
            .log(&format!("internal transition at {source}")),
    }

    compiled.traverse(transition, message, instance, false);
    if instance.is_terminated() {
        return;
    }

    if let Some(pseudo) = compiled.transitions[transition.idx()].compound {
        if let Some(next) = select_branch(machine, pseudo, &*instance, message) {
            execute(machine, compiled, next, instance, message);
        }
        return;
    }

    match machine.target_of(transition) {
        Some(target) => {
            if machine.pseudo_kind_of(target).is_none() {
                complete_upward(machine, compiled, target, instance);
            }
        }
        None => {
            if machine.settings().internal_transitions_trigger_completion {
                let source = machine.source_of(transition);
                if machine.is_active(&*instance, source)
                    && machine.is_complete(&*instance, source)
                {
                    evaluate_completion(machine, compiled, source, instance);
                }
            }
        }
    }
}

/// Fire completion at the target and then at each enclosing state the same
/// traversal pushed over the completeness threshold, innermost first.
///
/// A transition landing on a final state can complete an ancestor whose
/// other regions were already resting at final states; that ancestor's
/// completion transition must fire even though no frame of the selection
/// recursion covers it. The walk stops at the first ancestor that is no
/// longer active or not complete.
fn complete_upward<M: 'static>(
    machine: &StateMachine<M>,
    compiled: &Compiled<M>,
    vertex: VertexId,
    instance: &mut dyn Instance,
) {
    let mut cursor = Some(vertex);
    while let Some(v) = cursor {
        if instance.is_terminated() {
            return;
        }
        if !machine.is_active(&*instance, v) || !machine.is_complete(&*instance, v) {
            return;
        }
        evaluate_completion(machine, compiled, v, instance);
        cursor = machine.parent_region_of(v).map(|r| machine.owner_of(r));
    }
}

/// Try the completion transitions of a complete state with the completion
/// token (`None` message). First enabled branch wins; chains further through
/// `execute`.
fn evaluate_completion<M: 'static>(
    machine: &StateMachine<M>,
    compiled: &Compiled<M>,
    vertex: VertexId,
    instance: &mut dyn Instance,
) {
    for &transition in machine.outgoing_of(vertex) {
        let guard = &machine.transition_data(transition).guard;
        if guard.is_else() {
            continue;
        }
        if guard.check(None, &*instance) {
            execute(machine, compiled, transition, instance, None);
            return;
        }
    }
}

/// Select the outgoing branch of a choice or junction.
///
/// Choice picks uniformly among enabled branches through the configured
/// random function; junction requires exactly one enabled branch. Both fall
/// back to the else branch, and both report an ill-formed selection through
/// the sink and leave the instance where it is.
fn select_branch<M: 'static>(
    machine: &StateMachine<M>,
    pseudo: VertexId,
    instance: &dyn Instance,
    message: Option<&M>,
) -> Option<TransitionId> {
    let outgoing = machine.outgoing_of(pseudo);
    let mut enabled = Vec::new();
    for &t in outgoing {
        let guard = &machine.transition_data(t).guard;
        if !guard.is_else() && guard.check(message, instance) {
            enabled.push(t);
        }
    }
    let else_branch = || {
        outgoing
            .iter()
            .copied()
            .find(|&t| machine.transition_data(t).guard.is_else())
    };

    match machine.pseudo_kind_of(pseudo) {
        Some(PseudoStateKind::Choice) => match enabled.len() {
            0 => else_branch().or_else(|| {
                ill_formed(machine, pseudo, "choice has no enabled transition");
                None
            }),
            1 => Some(enabled[0]),
            n => {
                let pick = (machine.settings().random(n as u32) as usize).min(n - 1);
                Some(enabled[pick])
            }
        },
        Some(PseudoStateKind::Junction) => match enabled.len() {
            0 => else_branch().or_else(|| {
                ill_formed(machine, pseudo, "junction has no enabled transition");
                None
            }),
            1 => Some(enabled[0]),
            _ => {
                ill_formed(machine, pseudo, "junction has multiple enabled transitions");
                None
            }
        },
        // Initial-family descent is precompiled; terminate selects nothing.
        _ => outgoing.first().copied(),
    }
}

fn ill_formed<M: 'static>(machine: &StateMachine<M>, pseudo: VertexId, detail: &str) {
    let name = machine.qualified_name(pseudo);
    machine
        .settings()
        .sink()
        .error(&format!("ill-formed: {name}: {detail}"));
}

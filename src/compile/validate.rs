//! Structural validation of an assembled model.
//!
//! The validator collects every finding instead of stopping at the first,
//! so one compile attempt reports the full picture. Each diagnostic is also
//! forwarded to the configured sink. Compilation proceeds only when no
//! error-severity diagnostic was produced.

use crate::diagnostics::{Diagnostic, Severity};
use crate::model::{PseudoStateKind, RegionId, StateMachine, VertexId, VertexKind};

pub(crate) fn validate<M: 'static>(machine: &StateMachine<M>) -> Vec<Diagnostic> {
    let mut diagnostics = Vec::new();

    for (index, region) in machine.regions.iter().enumerate() {
        if !region.alive {
            continue;
        }
        let id = RegionId(index as u32);
        let name = machine.region_qualified_name(id);

        if !matches!(
            machine.vertices[region.parent.idx()].kind,
            VertexKind::State(_)
        ) {
            error(
                &mut diagnostics,
                &name,
                "region is owned by a non-state vertex",
            );
        }

        let initials = region
            .vertices
            .iter()
            .filter(|&&v| {
                machine
                    .pseudo_kind_of(v)
                    .map(|k| k.is_initial_family())
                    .unwrap_or(false)
            })
            .count();
        match initials {
            0 => error(
                &mut diagnostics,
                &name,
                "region has no initial, shallow history, or deep history vertex",
            ),
            1 => {}
            n => error(
                &mut diagnostics,
                &name,
                &format!("region has {n} initial-family vertices, expected exactly one"),
            ),
        }
    }

    for (index, vertex) in machine.vertices.iter().enumerate() {
        if !vertex.alive {
            continue;
        }
        let id = VertexId(index as u32);
        let outgoing = machine.outgoing_of(id);

        match &vertex.kind {
            VertexKind::State(_) => {}
            VertexKind::Final => {
                if !outgoing.is_empty() {
                    error(
                        &mut diagnostics,
                        &machine.qualified_name(id),
                        "final state has outgoing transitions",
                    );
                }
            }
            VertexKind::Pseudo(kind) if kind.is_initial_family() => {
                if outgoing.len() != 1 {
                    error(
                        &mut diagnostics,
                        &machine.qualified_name(id),
                        &format!(
                            "initial-family vertex has {} outgoing transitions, expected exactly one",
                            outgoing.len()
                        ),
                    );
                } else if machine.target_of(outgoing[0]).is_none() {
                    error(
                        &mut diagnostics,
                        &machine.qualified_name(id),
                        "initial-family vertex has no resolvable default target",
                    );
                }
            }
            VertexKind::Pseudo(PseudoStateKind::Choice | PseudoStateKind::Junction) => {
                if outgoing.is_empty() {
                    error(
                        &mut diagnostics,
                        &machine.qualified_name(id),
                        "has no outgoing transitions",
                    );
                    continue;
                }
                let has_else = outgoing
                    .iter()
                    .any(|&t| machine.transition_data(t).guard.is_else());
                let guarded = outgoing
                    .iter()
                    .filter(|&&t| machine.transition_data(t).guard.is_predicate())
                    .count();
                if !has_else && guarded < 2 {
                    diagnostics.push(Diagnostic {
                        severity: Severity::Warning,
                        element: machine.qualified_name(id),
                        detail: "no else branch and fewer than two guarded transitions; \
                                 selection may dead-end"
                            .to_string(),
                    });
                }
            }
            VertexKind::Pseudo(PseudoStateKind::Terminate) => {
                if !outgoing.is_empty() {
                    error(
                        &mut diagnostics,
                        &machine.qualified_name(id),
                        "terminate vertex has outgoing transitions",
                    );
                }
            }
            VertexKind::Pseudo(_) => {}
        }
    }

    for transition in machine.transitions.iter() {
        if !transition.alive || !transition.guard.is_else() {
            continue;
        }
        let source_is_branch = matches!(
            machine.pseudo_kind_of(transition.source),
            Some(PseudoStateKind::Choice | PseudoStateKind::Junction)
        );
        if !source_is_branch {
            error(
                &mut diagnostics,
                &machine.qualified_name(transition.source),
                "else branch on a vertex that is not a choice or junction",
            );
        }
    }

    for diagnostic in &diagnostics {
        match diagnostic.severity {
            Severity::Error => machine.settings().sink().error(&diagnostic.to_string()),
            Severity::Warning => machine.settings().sink().warn(&diagnostic.to_string()),
        }
    }

    diagnostics
}

fn error(diagnostics: &mut Vec<Diagnostic>, element: &str, detail: &str) {
    diagnostics.push(Diagnostic {
        severity: Severity::Error,
        element: element.to_string(),
        detail: detail.to_string(),
    });
}

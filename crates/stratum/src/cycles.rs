//! Cycle detection and breaking in the resolved parent relation.
//!
//! A containment hierarchy must be a forest, but nothing stops an input graph
//! from declaring `a` inside `b` inside `a`. Rather than rejecting such
//! input, the offending parent reference is severed deterministically: chains
//! are walked in node insertion order, and the first reference found to close
//! a loop is removed with a `hierarchy_cycle` warning. Every node stays in
//! the layout; the severed node simply becomes a root.

use std::collections::HashMap;

use indexmap::IndexMap;
use log::debug;

use stratum_core::{
    diagnostic::{Diagnostic, DiagnosticKind, Diagnostics},
    identifier::Id,
};

#[derive(Clone, Copy, PartialEq)]
enum Mark {
    OnPath,
    Done,
}

/// Removes parent references until the relation is acyclic.
///
/// Returns the pruned map. One warning is recorded per cycle, naming the
/// member chain and the severed reference.
pub(crate) fn break_cycles(
    mut parents: IndexMap<Id, Id>,
    diagnostics: &mut Diagnostics,
) -> IndexMap<Id, Id> {
    let mut marks: HashMap<Id, Mark> = HashMap::with_capacity(parents.len());
    let roots: Vec<Id> = parents.keys().copied().collect();
    let mut severed = 0usize;

    for start in roots {
        if marks.contains_key(&start) {
            continue;
        }

        let mut path: Vec<Id> = Vec::new();
        let mut current = start;
        loop {
            marks.insert(current, Mark::OnPath);
            path.push(current);

            let Some(&parent) = parents.get(&current) else {
                break;
            };
            match marks.get(&parent) {
                Some(Mark::OnPath) => {
                    // `current -> parent` closes the loop; cut it here.
                    parents.swap_remove(&current);
                    severed += 1;
                    diagnostics.push(Diagnostic::warning(
                        DiagnosticKind::HierarchyCycle,
                        format!(
                            "containment cycle through {}; reference '{current}' -> \
                             '{parent}' removed, '{current}' becomes a root",
                            describe_cycle(&path, parent),
                        ),
                    ));
                    break;
                }
                Some(Mark::Done) => break,
                None => current = parent,
            }
        }

        for visited in path {
            marks.insert(visited, Mark::Done);
        }
    }

    if severed > 0 {
        debug!(severed; "Containment cycles broken");
    }
    parents
}

/// Renders the loop portion of a walked path, e.g. `'a' -> 'b' -> 'a'`.
fn describe_cycle(path: &[Id], closing: Id) -> String {
    let loop_start = path.iter().position(|&id| id == closing).unwrap_or(0);
    let mut rendered: Vec<String> = path[loop_start..]
        .iter()
        .map(|id| format!("'{id}'"))
        .collect();
    rendered.push(format!("'{closing}'"));
    rendered.join(" -> ")
}

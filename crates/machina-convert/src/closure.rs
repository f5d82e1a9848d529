//! Lambda-closure and symbol-move primitives over node sets.

use std::collections::HashSet;

use machina_core::{Machine, NodeId, TransitionId, LAMBDA};

/// Compute the lambda-closure of `states`: every node reachable from a member
/// by zero or more lambda-labeled transitions.
///
/// The traversal marks visited *transitions* rather than visited nodes, so
/// diamond-shaped lambda paths are fully explored while lambda cycles still
/// terminate. The result is deduplicated and sorted ascending by index;
/// callers compare closures for set equality and need a reproducible order.
pub fn lambda_closure(machine: &Machine, states: &[NodeId]) -> Vec<NodeId> {
    let mut result: Vec<NodeId> = Vec::new();
    let mut seen: HashSet<TransitionId> = HashSet::new();
    let mut stack: Vec<NodeId> = states.to_vec();

    while let Some(id) = stack.pop() {
        result.push(id);
        for transition in machine.outgoing(id) {
            if !transition.carries(LAMBDA) {
                continue;
            }
            if !seen.insert(transition.id()) {
                continue;
            }
            stack.push(transition.to());
        }
    }

    result.sort_unstable();
    result.dedup();
    result
}

/// Compute the symbol-move of `states`: the union of destinations of every
/// outgoing transition whose label set contains `symbol`.
///
/// No closure is applied and the result is not deduplicated; callers close
/// the result separately.
pub fn move_set(machine: &Machine, symbol: &str, states: &[NodeId]) -> Vec<NodeId> {
    let mut result = Vec::new();
    for &id in states {
        for transition in machine.outgoing(id) {
            if transition.carries(symbol) {
                result.push(transition.to());
            }
        }
    }
    result
}

/// Whether any node of `states` is accepting.
pub(crate) fn any_final(machine: &Machine, states: &[NodeId]) -> bool {
    states
        .iter()
        .any(|id| machine.node(*id).is_some_and(|node| node.is_final()))
}

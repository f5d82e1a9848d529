//! Subset construction: NFA to DFA conversion.

use std::collections::HashMap;

use tracing::{debug, info};

use machina_core::{Machine, NodeId};

use crate::closure::{any_final, lambda_closure, move_set};
use crate::error::{ConvertError, ConvertResult};

/// Convert a nondeterministic machine into an equivalent deterministic one.
///
/// Each output node carries the witness set of input states it summarizes in
/// its `sub_nodes`. Two witness sets denote the same DFA state iff they
/// contain exactly the same origin indices; lookup is backed by a hash map
/// keyed on the sorted index set, since the construction is worst-case
/// exponential in input node count.
///
/// A symbol whose closed move is empty produces no outgoing transition: the
/// result may be a partial DFA, which is a valid outcome, not an error.
///
/// Fails with [`ConvertError::InvalidAutomaton`] before any work if the input
/// has no start node. The input machine is never mutated.
pub fn convert_to_dfa(nfa: &Machine) -> ConvertResult<Machine> {
    let start = nfa.start_node().ok_or(ConvertError::InvalidAutomaton)?;
    debug!(
        nodes = nfa.node_count(),
        symbols = nfa.alphabet().len(),
        "subset_construction_start"
    );

    let mut dfa = Machine::new(nfa.alphabet().clone());
    let mut witness_lookup: HashMap<Vec<NodeId>, NodeId> = HashMap::new();

    let seed = lambda_closure(nfa, &[start]);
    let seed_final = any_final(nfa, &seed);
    let first = dfa.add_node_with(seed.clone(), true, seed_final);
    witness_lookup.insert(seed, first);

    // Worklist is "every DFA node not yet processed", in creation order,
    // including nodes appended below. Termination: the number of distinct
    // witness sets is bounded by 2^|input nodes|.
    let mut order: Vec<NodeId> = vec![first];
    let mut cursor = 0;
    while cursor < order.len() {
        let current = order[cursor];
        cursor += 1;

        let witness: Vec<NodeId> = dfa
            .node(current)
            .map(|node| node.sub_nodes().to_vec())
            .unwrap_or_default();

        for symbol in nfa.alphabet().symbols() {
            let candidate = lambda_closure(nfa, &move_set(nfa, symbol, &witness));
            if candidate.is_empty() {
                continue;
            }

            let target = match witness_lookup.get(&candidate) {
                Some(&existing) => existing,
                None => {
                    let is_final = any_final(nfa, &candidate);
                    let fresh = dfa.add_node_with(candidate.clone(), false, is_final);
                    witness_lookup.insert(candidate, fresh);
                    order.push(fresh);
                    fresh
                }
            };

            // Merges into the existing (current, target) edge if one exists.
            dfa.add_transition(current, target, [symbol.as_str()])?;
        }
    }

    info!(
        input_nodes = nfa.node_count(),
        output_nodes = dfa.node_count(),
        transitions = dfa.transition_count(),
        "subset_construction_complete"
    );
    Ok(dfa)
}

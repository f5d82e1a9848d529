//! DFA minimization by partition refinement.

use std::collections::{HashMap, HashSet};

use tracing::{debug, info};

use machina_core::{Machine, NodeId, LAMBDA};

use crate::error::{ConvertError, ConvertResult};

/// Collapse equivalent states of a deterministic machine.
///
/// The input must already be deterministic: at most one outgoing transition
/// per `(node, symbol)`. Violations are detected best-effort while building
/// the successor table and reported as
/// [`ConvertError::NonDeterministicInput`]; detection is not guaranteed for
/// unreachable nodes.
///
/// Unreachable nodes are discarded. The initial partition separates final
/// from non-final reachable nodes; refinement then splits blocks until two
/// states share a block iff, for every symbol, their successors fall in the
/// same block — where a missing successor is distinct from any block. Output
/// nodes carry their block's members as `sub_nodes` for traceability.
///
/// Minimization is idempotent: running it on its own output is a no-op up to
/// node identity.
pub fn minimize_dfa(dfa: &Machine) -> ConvertResult<Machine> {
    let start = dfa.start_node().ok_or(ConvertError::InvalidAutomaton)?;
    let symbols = dfa.alphabet().symbols();

    // Forward reachability from the start node.
    let mut seen: HashSet<NodeId> = HashSet::from([start]);
    let mut stack = vec![start];
    let mut reachable: Vec<NodeId> = Vec::new();
    while let Some(id) = stack.pop() {
        reachable.push(id);
        for transition in dfa.outgoing(id) {
            if seen.insert(transition.to()) {
                stack.push(transition.to());
            }
        }
    }
    // Creation order coincides with ascending index.
    reachable.sort_unstable();

    debug!(
        nodes = dfa.node_count(),
        reachable = reachable.len(),
        "minimization_start"
    );

    // Successor per (node, symbol), rejecting overlapping labels.
    let mut successor: HashMap<(NodeId, usize), NodeId> = HashMap::new();
    for &id in &reachable {
        for transition in dfa.outgoing(id) {
            if transition.carries(LAMBDA) {
                return Err(ConvertError::NonDeterministicInput {
                    node: id,
                    symbol: LAMBDA.to_string(),
                });
            }
            for (symbol_index, symbol) in symbols.iter().enumerate() {
                if !transition.carries(symbol) {
                    continue;
                }
                if successor.insert((id, symbol_index), transition.to()).is_some() {
                    return Err(ConvertError::NonDeterministicInput {
                        node: id,
                        symbol: symbol.clone(),
                    });
                }
            }
        }
    }

    // Initial partition: final vs non-final.
    let is_final =
        |id: NodeId| -> bool { dfa.node(id).is_some_and(|node| node.is_final()) };
    let finals: Vec<NodeId> = reachable.iter().copied().filter(|&id| is_final(id)).collect();
    let non_finals: Vec<NodeId> = reachable
        .iter()
        .copied()
        .filter(|&id| !is_final(id))
        .collect();
    let mut blocks: Vec<Vec<NodeId>> = [finals, non_finals]
        .into_iter()
        .filter(|block| !block.is_empty())
        .collect();

    // Refinement only ever splits, so the partition is stable exactly when
    // the block count stops growing.
    let mut passes = 0_usize;
    loop {
        passes += 1;
        let block_of: HashMap<NodeId, usize> = membership(&blocks);
        let signature = |id: NodeId| -> Vec<Option<usize>> {
            (0..symbols.len())
                .map(|symbol_index| {
                    successor
                        .get(&(id, symbol_index))
                        .and_then(|target| block_of.get(target).copied())
                })
                .collect()
        };

        let mut next: Vec<Vec<NodeId>> = Vec::new();
        for block in &blocks {
            if block.len() < 2 {
                next.push(block.clone());
                continue;
            }
            // Greedy single-founder grouping: the first unplaced member opens
            // a sub-block and admits later members with an identical
            // per-symbol block signature; the rest stay pending.
            let mut pending: Vec<NodeId> = block.clone();
            while let Some(&founder) = pending.first() {
                let founder_signature = signature(founder);
                let (group, rest): (Vec<NodeId>, Vec<NodeId>) = pending
                    .iter()
                    .copied()
                    .partition(|&member| signature(member) == founder_signature);
                next.push(group);
                pending = rest;
            }
        }

        let stable = next.len() == blocks.len();
        blocks = next;
        if stable {
            break;
        }
    }

    // Deterministic output order: blocks by smallest member.
    blocks.sort_by_key(|block| block[0]);

    let mut minimized = Machine::new(dfa.alphabet().clone());
    let mut block_node: Vec<NodeId> = Vec::with_capacity(blocks.len());
    for block in &blocks {
        let contains_start = block.contains(&start);
        let accepting = block.iter().any(|&id| is_final(id));
        block_node.push(minimized.add_node_with(block.clone(), contains_start, accepting));
    }

    let block_of: HashMap<NodeId, usize> = membership(&blocks);
    for (block_index, block) in blocks.iter().enumerate() {
        for (symbol_index, symbol) in symbols.iter().enumerate() {
            // Equivalence guarantees every member resolves to the same target
            // block; merging through add_transition keeps one edge per pair.
            for &member in block {
                if let Some(target) = successor.get(&(member, symbol_index)) {
                    let to = block_node[block_of[target]];
                    minimized.add_transition(block_node[block_index], to, [symbol.as_str()])?;
                }
            }
        }
    }

    info!(
        reachable = reachable.len(),
        blocks = blocks.len(),
        passes,
        "minimization_complete"
    );
    Ok(minimized)
}

fn membership(blocks: &[Vec<NodeId>]) -> HashMap<NodeId, usize> {
    blocks
        .iter()
        .enumerate()
        .flat_map(|(index, block)| block.iter().map(move |&id| (id, index)))
        .collect()
}

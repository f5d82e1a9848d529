//! Persistence: the flat portable record and JSON file helpers.
//!
//! [`MachineRecord`] is the on-disk contract: alphabet symbol list, per-node
//! records (index, flags, optional witness indices, outgoing transition
//! records) and a start-node index where `-1` means "no start node". The
//! shape must stay stable across save/load.
//!
//! Decoding rebuilds `sub_nodes` as index-only breadcrumbs, exactly as they
//! are stored on a live machine; witness identity is all a loaded machine
//! needs for display and traceability, full cross-machine connectivity is
//! intentionally not reconstructed.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use machina_core::{Alphabet, Machine, NodeId};

use crate::error::{ConvertError, ConvertResult};

/// Sentinel for "no start node" in [`MachineRecord::start_node_index`].
pub const NO_START_NODE: i64 = -1;

/// Flat, serde-friendly image of a [`Machine`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MachineRecord {
    /// Alphabet symbols in order.
    pub alphabet: Vec<String>,

    /// Per-node records in machine order.
    pub nodes: Vec<NodeRecord>,

    /// Index of the start node, or [`NO_START_NODE`].
    pub start_node_index: i64,
}

/// One node of a [`MachineRecord`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeRecord {
    /// The node's index.
    pub index: u32,

    /// Accepting flag.
    pub is_final: bool,

    /// Start flag.
    pub is_starter: bool,

    /// Whether the node carries a witness set.
    pub has_sub_nodes: bool,

    /// Witness indices into the origin machine, empty unless `has_sub_nodes`.
    #[serde(default)]
    pub sub_node_indices: Vec<u32>,

    /// Outgoing transitions of this node.
    #[serde(default)]
    pub transitions: Vec<TransitionRecord>,
}

/// One transition of a [`NodeRecord`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransitionRecord {
    /// Source node index.
    pub from_index: u32,

    /// Destination node index.
    pub to_index: u32,

    /// Label set in stored order; may include lambda.
    pub letters: Vec<String>,
}

/// Flatten a machine into its portable record.
///
/// Each transition is recorded once, under its source node; decoding restores
/// the double-ended adjacency bookkeeping.
pub fn encode_machine(machine: &Machine) -> MachineRecord {
    let nodes = machine
        .nodes()
        .map(|node| NodeRecord {
            index: node.id().0,
            is_final: node.is_final(),
            is_starter: node.is_starter(),
            has_sub_nodes: node.has_sub_nodes(),
            sub_node_indices: node.sub_nodes().iter().map(|id| id.0).collect(),
            transitions: machine
                .outgoing(node.id())
                .map(|transition| TransitionRecord {
                    from_index: transition.from().0,
                    to_index: transition.to().0,
                    letters: transition.letters().to_vec(),
                })
                .collect(),
        })
        .collect();

    MachineRecord {
        alphabet: machine.alphabet().symbols().to_vec(),
        nodes,
        start_node_index: machine
            .start_node()
            .map(|id| i64::from(id.0))
            .unwrap_or(NO_START_NODE),
    }
}

/// Rebuild a machine from its portable record.
///
/// Validation is strict: a transition or start index referencing a node
/// absent from the node list fails with
/// [`ConvertError::SerializationMismatch`] instead of being dropped.
pub fn decode_machine(record: &MachineRecord) -> ConvertResult<Machine> {
    let mut machine = Machine::new(Alphabet::new(record.alphabet.iter().cloned()));

    for node in &record.nodes {
        let sub_nodes = if node.has_sub_nodes {
            node.sub_node_indices.iter().map(|&i| NodeId(i)).collect()
        } else {
            Vec::new()
        };
        machine.restore_node(NodeId(node.index), sub_nodes, node.is_starter, node.is_final)?;
    }

    for node in &record.nodes {
        for transition in &node.transitions {
            let from = NodeId(transition.from_index);
            let to = NodeId(transition.to_index);
            if machine.node(from).is_none() {
                return Err(ConvertError::SerializationMismatch {
                    index: transition.from_index,
                });
            }
            if machine.node(to).is_none() {
                return Err(ConvertError::SerializationMismatch {
                    index: transition.to_index,
                });
            }
            machine.add_transition(from, to, transition.letters.iter().cloned())?;
        }
    }

    if record.start_node_index != NO_START_NODE {
        let index = u32::try_from(record.start_node_index)
            .map_err(|_| ConvertError::SerializationMismatch { index: u32::MAX })?;
        if machine.node(NodeId(index)).is_none() {
            return Err(ConvertError::SerializationMismatch { index });
        }
        machine.set_starter(NodeId(index))?;
    }

    debug!(
        nodes = machine.node_count(),
        transitions = machine.transition_count(),
        "machine_decoded"
    );
    Ok(machine)
}

/// Save a machine to `path` as pretty-printed JSON of its record.
pub fn save_to_path(machine: &Machine, path: impl AsRef<Path>) -> ConvertResult<()> {
    let path = path.as_ref();
    let record = encode_machine(machine);
    let json = serde_json::to_string_pretty(&record)?;
    std::fs::write(path, json)?;

    info!(
        path = %path.display(),
        nodes = machine.node_count(),
        "Saved machine"
    );
    Ok(())
}

/// Load a machine from a JSON record file at `path`.
pub fn load_from_path(path: impl AsRef<Path>) -> ConvertResult<Machine> {
    let path = path.as_ref();
    let json = std::fs::read_to_string(path)?;
    let record: MachineRecord = serde_json::from_str(&json)?;
    let machine = decode_machine(&record)?;

    info!(
        path = %path.display(),
        nodes = machine.node_count(),
        "Loaded machine"
    );
    Ok(machine)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::convert_to_dfa;
    use crate::test_fixtures;
    use tempfile::TempDir;

    #[test]
    fn encode_captures_flags_letters_and_start() {
        let nfa = test_fixtures::lambda_branch_nfa();
        let record = encode_machine(&nfa);

        assert_eq!(record.alphabet, ["a", "b"]);
        assert_eq!(record.start_node_index, 0);
        assert_eq!(record.nodes.len(), 3);
        assert!(record.nodes[0].is_starter);
        assert!(record.nodes[2].is_final);
        // The (1, 2) pair is one record with both letters merged.
        assert_eq!(record.nodes[1].transitions.len(), 1);
        assert_eq!(record.nodes[1].transitions[0].letters, ["λ", "b"]);
    }

    #[test]
    fn round_trip_preserves_the_machine() {
        let nfa = test_fixtures::lambda_branch_nfa();
        let decoded = decode_machine(&encode_machine(&nfa)).unwrap();

        assert_eq!(encode_machine(&decoded), encode_machine(&nfa));
    }

    #[test]
    fn round_trip_preserves_witness_breadcrumbs() {
        let nfa = test_fixtures::lambda_branch_nfa();
        let dfa = convert_to_dfa(&nfa).unwrap();
        let decoded = decode_machine(&encode_machine(&dfa)).unwrap();

        for (original, restored) in dfa.nodes().zip(decoded.nodes()) {
            assert_eq!(original.id(), restored.id());
            assert_eq!(original.sub_nodes(), restored.sub_nodes());
            assert_eq!(original.has_sub_nodes(), restored.has_sub_nodes());
        }
    }

    #[test]
    fn startless_machine_round_trips_with_sentinel() {
        let machine = test_fixtures::startless_machine();
        let record = encode_machine(&machine);
        assert_eq!(record.start_node_index, NO_START_NODE);

        let decoded = decode_machine(&record).unwrap();
        assert_eq!(decoded.start_node(), None);
    }

    #[test]
    fn unknown_transition_index_is_rejected() {
        let mut record = encode_machine(&test_fixtures::startless_machine());
        record.nodes[0].transitions.push(TransitionRecord {
            from_index: 0,
            to_index: 99,
            letters: vec!["a".to_string()],
        });

        match decode_machine(&record) {
            Err(ConvertError::SerializationMismatch { index }) => assert_eq!(index, 99),
            other => panic!("expected SerializationMismatch, got {other:?}"),
        }
    }

    #[test]
    fn unknown_start_index_is_rejected() {
        let mut record = encode_machine(&test_fixtures::startless_machine());
        record.start_node_index = 7;

        assert!(matches!(
            decode_machine(&record),
            Err(ConvertError::SerializationMismatch { index: 7 })
        ));
    }

    #[test]
    fn save_and_load_through_a_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("machine.json");

        let nfa = test_fixtures::dense_nfa();
        save_to_path(&nfa, &path).unwrap();
        let loaded = load_from_path(&path).unwrap();

        assert_eq!(encode_machine(&loaded), encode_machine(&nfa));
    }

    #[test]
    fn duplicate_node_index_is_rejected() {
        let mut record = encode_machine(&test_fixtures::startless_machine());
        let duplicate = record.nodes[0].clone();
        record.nodes.push(duplicate);

        assert!(matches!(
            decode_machine(&record),
            Err(ConvertError::Machine(_))
        ));
    }
}

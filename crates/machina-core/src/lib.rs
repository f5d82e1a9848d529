//! Core domain types shared across the machina workspace.
//!
//! A [`Machine`] owns an arena of nodes and transitions describing a finite
//! automaton (deterministic or not). Nodes and transitions are addressed by
//! integer ids everywhere; node equality is index equality, never reference
//! identity. The graph is mutated exclusively through the methods on
//! [`Machine`], which uphold the structural invariants:
//!
//! - node indices are unique within a machine and assigned by a per-machine
//!   monotonically increasing counter
//! - transition endpoints belong to the owning machine
//! - at most one transition object exists per `(from, to)` pair; additional
//!   symbols are merged into that transition's letter set
//! - a self-loop appears once in its node's adjacency list, every other
//!   transition appears in both endpoints' lists

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The reserved symbol denoting the empty (epsilon) transition.
///
/// Lambda labels an edge that can be traversed without consuming input. It is
/// never a member of an [`Alphabet`].
pub const LAMBDA: &str = "λ";

/// Identifier for nodes within a [`Machine`].
#[derive(
    Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct NodeId(pub u32);

/// Identifier for transitions within a [`Machine`].
#[derive(
    Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct TransitionId(pub u32);

/// Result type alias for machine mutations.
pub type MachineResult<T> = Result<T, MachineError>;

/// Errors produced by graph mutators.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MachineError {
    /// A node referenced by id is not part of this machine.
    #[error("node not found: {id:?}")]
    NodeNotFound { id: NodeId },

    /// A transition referenced by id is not part of this machine.
    #[error("transition not found: {id:?}")]
    TransitionNotFound { id: TransitionId },

    /// A transition letter is neither lambda nor an alphabet member.
    #[error("symbol {symbol:?} is not in the alphabet")]
    UnknownSymbol { symbol: String },

    /// An explicit node index collides with an existing node.
    #[error("node index {id:?} already exists")]
    DuplicateIndex { id: NodeId },
}

/// Ordered sequence of distinct input symbols.
///
/// Symbol order is significant: converters and reports iterate symbols in the
/// order they were added. [`LAMBDA`] is reserved and silently rejected.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Alphabet {
    symbols: Vec<String>,
}

impl Alphabet {
    /// Build an alphabet from a symbol sequence, dropping duplicates and lambda.
    pub fn new<I, S>(symbols: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut alphabet = Self::default();
        for symbol in symbols {
            alphabet.add_symbol(symbol);
        }
        alphabet
    }

    /// Append a symbol. Returns `false` if it was a duplicate or lambda.
    pub fn add_symbol(&mut self, symbol: impl Into<String>) -> bool {
        let symbol = symbol.into();
        if symbol == LAMBDA || self.symbols.contains(&symbol) {
            return false;
        }
        self.symbols.push(symbol);
        true
    }

    /// Check membership. Lambda is never a member.
    pub fn contains(&self, symbol: &str) -> bool {
        self.symbols.iter().any(|s| s == symbol)
    }

    /// Symbols in insertion order.
    pub fn symbols(&self) -> &[String] {
        &self.symbols
    }

    /// Number of symbols.
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    /// Whether the alphabet has no symbols.
    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }
}

/// A single automaton state.
///
/// `sub_nodes` carries the witness set when this node was produced by
/// conversion or minimization: the indices of the origin-machine states it
/// summarizes. The ids point into *another* machine and are identity
/// breadcrumbs only, never resolved against this machine's arena.
#[derive(Debug, Clone)]
pub struct Node {
    id: NodeId,
    is_final: bool,
    is_starter: bool,
    sub_nodes: Vec<NodeId>,
    edges: Vec<TransitionId>,
}

impl Node {
    /// The node's index within its machine.
    pub fn id(&self) -> NodeId {
        self.id
    }

    /// Whether this is an accepting state.
    pub fn is_final(&self) -> bool {
        self.is_final
    }

    /// Whether this is the machine's start state.
    pub fn is_starter(&self) -> bool {
        self.is_starter
    }

    /// Origin-machine witness set, empty for primitive nodes.
    pub fn sub_nodes(&self) -> &[NodeId] {
        &self.sub_nodes
    }

    /// Whether this node summarizes origin-machine states.
    pub fn has_sub_nodes(&self) -> bool {
        !self.sub_nodes.is_empty()
    }

    /// Adjacent transition ids (incoming and outgoing; self-loops once).
    pub fn edges(&self) -> &[TransitionId] {
        &self.edges
    }
}

impl PartialEq for Node {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Node {}

/// A labeled edge between two nodes of the same machine.
#[derive(Debug, Clone)]
pub struct Transition {
    id: TransitionId,
    from: NodeId,
    to: NodeId,
    letters: Vec<String>,
}

impl Transition {
    /// The transition's id within its machine.
    pub fn id(&self) -> TransitionId {
        self.id
    }

    /// Source node.
    pub fn from(&self) -> NodeId {
        self.from
    }

    /// Destination node.
    pub fn to(&self) -> NodeId {
        self.to
    }

    /// Label set in insertion order. May include [`LAMBDA`].
    pub fn letters(&self) -> &[String] {
        &self.letters
    }

    /// Whether the label set contains `symbol`.
    pub fn carries(&self, symbol: &str) -> bool {
        self.letters.iter().any(|l| l == symbol)
    }

    /// Whether both endpoints are the same node.
    pub fn is_self_loop(&self) -> bool {
        self.from == self.to
    }
}

/// An automaton graph: node arena, transition arena, alphabet, start node.
///
/// Nodes are stored in creation order, which doubles as the default display
/// order. Transitions live in a slot arena; removal leaves a tombstone so
/// transition ids stay stable.
#[derive(Debug, Default, Clone)]
pub struct Machine {
    nodes: Vec<Node>,
    node_slots: HashMap<NodeId, usize>,
    transitions: Vec<Option<Transition>>,
    alphabet: Alphabet,
    start: Option<NodeId>,
    next_index: u32,
}

impl Machine {
    /// Create an empty machine over the given alphabet.
    pub fn new(alphabet: Alphabet) -> Self {
        Self {
            alphabet,
            ..Self::default()
        }
    }

    /// The machine's alphabet.
    pub fn alphabet(&self) -> &Alphabet {
        &self.alphabet
    }

    /// The start node, if one has been designated.
    pub fn start_node(&self) -> Option<NodeId> {
        self.start
    }

    /// Look up a node by id.
    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.node_slots.get(&id).map(|&slot| &self.nodes[slot])
    }

    /// Nodes in creation order.
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.iter()
    }

    /// Number of live nodes.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Look up a transition by id.
    pub fn transition(&self, id: TransitionId) -> Option<&Transition> {
        self.transitions
            .get(id.0 as usize)
            .and_then(|slot| slot.as_ref())
    }

    /// Live transitions in creation order.
    pub fn transitions(&self) -> impl Iterator<Item = &Transition> {
        self.transitions.iter().filter_map(|slot| slot.as_ref())
    }

    /// Number of live transitions.
    pub fn transition_count(&self) -> usize {
        self.transitions.iter().filter(|slot| slot.is_some()).count()
    }

    /// Outgoing transitions of a node, in adjacency order.
    pub fn outgoing(&self, id: NodeId) -> impl Iterator<Item = &Transition> + '_ {
        self.node(id)
            .into_iter()
            .flat_map(|node| node.edges.iter())
            .filter_map(|tid| self.transition(*tid))
            .filter(move |t| t.from == id)
    }

    /// Find the unique transition object for a `(from, to)` pair.
    pub fn find_transition(&self, from: NodeId, to: NodeId) -> Option<TransitionId> {
        self.outgoing(from).find(|t| t.to == to).map(|t| t.id)
    }

    /// Append a primitive node (no witness set, no flags).
    pub fn add_node(&mut self) -> NodeId {
        self.add_node_with(Vec::new(), false, false)
    }

    /// Append a node with an explicit witness set and flags.
    ///
    /// Passing `is_starter = true` also designates the node as the machine's
    /// start node, clearing any previous starter.
    pub fn add_node_with(
        &mut self,
        sub_nodes: Vec<NodeId>,
        is_starter: bool,
        is_final: bool,
    ) -> NodeId {
        let id = NodeId(self.next_index);
        self.next_index += 1;
        self.push_node(Node {
            id,
            is_final,
            is_starter: false,
            sub_nodes,
            edges: Vec::new(),
        });
        if is_starter {
            // Cannot fail: the node was just inserted.
            let _ = self.set_starter(id);
        }
        id
    }

    /// Insert a node with an explicit index, used when rebuilding a machine
    /// from a persisted record. The index counter is advanced past `id`.
    ///
    /// Does not touch the machine's start designation even when `is_starter`
    /// is set; persisted records carry the start index separately.
    pub fn restore_node(
        &mut self,
        id: NodeId,
        sub_nodes: Vec<NodeId>,
        is_starter: bool,
        is_final: bool,
    ) -> MachineResult<NodeId> {
        if self.node_slots.contains_key(&id) {
            return Err(MachineError::DuplicateIndex { id });
        }
        self.next_index = self.next_index.max(id.0 + 1);
        self.push_node(Node {
            id,
            is_final,
            is_starter,
            sub_nodes,
            edges: Vec::new(),
        });
        Ok(id)
    }

    /// Remove a node together with every incident transition.
    ///
    /// Clears the start designation if the removed node held it.
    pub fn remove_node(&mut self, id: NodeId) -> MachineResult<()> {
        let slot = *self
            .node_slots
            .get(&id)
            .ok_or(MachineError::NodeNotFound { id })?;

        let incident: Vec<TransitionId> = self.nodes[slot].edges.clone();
        for tid in incident {
            // Adjacency lists only hold live transition ids.
            self.remove_transition(tid)?;
        }

        self.nodes.remove(slot);
        self.node_slots.remove(&id);
        for (position, node) in self.nodes.iter().enumerate().skip(slot) {
            self.node_slots.insert(node.id, position);
        }

        if self.start == Some(id) {
            self.start = None;
        }
        Ok(())
    }

    /// Add a transition, or merge `letters` into the existing `(from, to)`
    /// edge. Letters must be alphabet members or [`LAMBDA`].
    pub fn add_transition<I, S>(
        &mut self,
        from: NodeId,
        to: NodeId,
        letters: I,
    ) -> MachineResult<TransitionId>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        if !self.node_slots.contains_key(&from) {
            return Err(MachineError::NodeNotFound { id: from });
        }
        if !self.node_slots.contains_key(&to) {
            return Err(MachineError::NodeNotFound { id: to });
        }

        let mut incoming: Vec<String> = Vec::new();
        for letter in letters {
            let letter = letter.into();
            if letter != LAMBDA && !self.alphabet.contains(&letter) {
                return Err(MachineError::UnknownSymbol { symbol: letter });
            }
            if !incoming.contains(&letter) {
                incoming.push(letter);
            }
        }

        if let Some(tid) = self.find_transition(from, to) {
            // find_transition only returns live ids.
            if let Some(slot) = self.transitions[tid.0 as usize].as_mut() {
                for letter in incoming {
                    if !slot.letters.contains(&letter) {
                        slot.letters.push(letter);
                    }
                }
            }
            return Ok(tid);
        }

        let tid = TransitionId(self.transitions.len() as u32);
        self.transitions.push(Some(Transition {
            id: tid,
            from,
            to,
            letters: incoming,
        }));
        self.node_mut(from).edges.push(tid);
        if from != to {
            self.node_mut(to).edges.push(tid);
        }
        Ok(tid)
    }

    /// Remove a transition from the arena and both adjacency lists.
    pub fn remove_transition(&mut self, id: TransitionId) -> MachineResult<()> {
        let transition = self
            .transitions
            .get_mut(id.0 as usize)
            .and_then(|slot| slot.take())
            .ok_or(MachineError::TransitionNotFound { id })?;

        self.node_mut(transition.from).edges.retain(|&tid| tid != id);
        if transition.from != transition.to {
            self.node_mut(transition.to).edges.retain(|&tid| tid != id);
        }
        Ok(())
    }

    /// Flip a node's accepting flag. Returns the new value.
    pub fn toggle_final(&mut self, id: NodeId) -> MachineResult<bool> {
        if !self.node_slots.contains_key(&id) {
            return Err(MachineError::NodeNotFound { id });
        }
        let node = self.node_mut(id);
        node.is_final = !node.is_final;
        Ok(node.is_final)
    }

    /// Designate `id` as the start node, clearing any previous starter.
    pub fn set_starter(&mut self, id: NodeId) -> MachineResult<()> {
        if !self.node_slots.contains_key(&id) {
            return Err(MachineError::NodeNotFound { id });
        }
        if let Some(previous) = self.start {
            if previous != id {
                self.node_mut(previous).is_starter = false;
            }
        }
        self.node_mut(id).is_starter = true;
        self.start = Some(id);
        Ok(())
    }

    fn push_node(&mut self, node: Node) {
        self.node_slots.insert(node.id, self.nodes.len());
        self.nodes.push(node);
    }

    fn node_mut(&mut self, id: NodeId) -> &mut Node {
        let slot = self.node_slots[&id];
        &mut self.nodes[slot]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ab_machine() -> Machine {
        Machine::new(Alphabet::new(["a", "b"]))
    }

    #[test]
    fn alphabet_rejects_lambda_and_duplicates() {
        let mut alphabet = Alphabet::new(["a", "b", "a"]);
        assert_eq!(alphabet.symbols(), ["a", "b"]);
        assert!(!alphabet.add_symbol(LAMBDA));
        assert!(!alphabet.add_symbol("a"));
        assert!(alphabet.add_symbol("c"));
        assert!(!alphabet.contains(LAMBDA));
    }

    #[test]
    fn node_indices_are_sequential_per_machine() {
        let mut machine = ab_machine();
        assert_eq!(machine.add_node(), NodeId(0));
        assert_eq!(machine.add_node(), NodeId(1));

        // Counter is scoped to the machine, not the process.
        let mut other = ab_machine();
        assert_eq!(other.add_node(), NodeId(0));
    }

    #[test]
    fn add_transition_merges_letters_on_same_pair() {
        let mut machine = ab_machine();
        let n0 = machine.add_node();
        let n1 = machine.add_node();

        let first = machine.add_transition(n0, n1, ["a"]).unwrap();
        let second = machine.add_transition(n0, n1, ["b", "a"]).unwrap();
        assert_eq!(first, second);
        assert_eq!(machine.transition_count(), 1);
        assert_eq!(machine.transition(first).unwrap().letters(), ["a", "b"]);
    }

    #[test]
    fn self_loop_is_stored_once_in_adjacency() {
        let mut machine = ab_machine();
        let n0 = machine.add_node();
        let tid = machine.add_transition(n0, n0, ["a"]).unwrap();

        let node = machine.node(n0).unwrap();
        assert_eq!(node.edges(), [tid]);
        assert!(machine.transition(tid).unwrap().is_self_loop());
    }

    #[test]
    fn non_loop_transition_appears_in_both_adjacency_lists() {
        let mut machine = ab_machine();
        let n0 = machine.add_node();
        let n1 = machine.add_node();
        let tid = machine.add_transition(n0, n1, ["a"]).unwrap();

        assert_eq!(machine.node(n0).unwrap().edges(), [tid]);
        assert_eq!(machine.node(n1).unwrap().edges(), [tid]);
        // Only the source lists it as outgoing.
        assert_eq!(machine.outgoing(n1).count(), 0);
    }

    #[test]
    fn unknown_symbol_is_rejected() {
        let mut machine = ab_machine();
        let n0 = machine.add_node();
        let err = machine.add_transition(n0, n0, ["z"]).unwrap_err();
        assert_eq!(
            err,
            MachineError::UnknownSymbol {
                symbol: "z".to_string()
            }
        );
        // Lambda is always accepted.
        assert!(machine.add_transition(n0, n0, [LAMBDA]).is_ok());
    }

    #[test]
    fn set_starter_moves_the_flag() {
        let mut machine = ab_machine();
        let n0 = machine.add_node();
        let n1 = machine.add_node();

        machine.set_starter(n0).unwrap();
        machine.set_starter(n1).unwrap();

        assert_eq!(machine.start_node(), Some(n1));
        assert!(!machine.node(n0).unwrap().is_starter());
        assert!(machine.node(n1).unwrap().is_starter());
    }

    #[test]
    fn remove_node_drops_incident_transitions_and_start() {
        let mut machine = ab_machine();
        let n0 = machine.add_node();
        let n1 = machine.add_node();
        let n2 = machine.add_node();
        machine.set_starter(n1).unwrap();
        machine.add_transition(n0, n1, ["a"]).unwrap();
        machine.add_transition(n1, n2, ["b"]).unwrap();
        machine.add_transition(n1, n1, ["a"]).unwrap();
        machine.add_transition(n0, n2, ["b"]).unwrap();

        machine.remove_node(n1).unwrap();

        assert_eq!(machine.node_count(), 2);
        assert_eq!(machine.transition_count(), 1);
        assert_eq!(machine.start_node(), None);
        assert!(machine.node(n1).is_none());
        assert!(machine.find_transition(n0, n2).is_some());
    }

    #[test]
    fn remove_transition_updates_adjacency() {
        let mut machine = ab_machine();
        let n0 = machine.add_node();
        let n1 = machine.add_node();
        let tid = machine.add_transition(n0, n1, ["a"]).unwrap();

        machine.remove_transition(tid).unwrap();

        assert!(machine.node(n0).unwrap().edges().is_empty());
        assert!(machine.node(n1).unwrap().edges().is_empty());
        assert_eq!(
            machine.remove_transition(tid),
            Err(MachineError::TransitionNotFound { id: tid })
        );

        // Ids are never reused after removal.
        let next = machine.add_transition(n1, n0, ["b"]).unwrap();
        assert_ne!(next, tid);
    }

    #[test]
    fn restore_node_keeps_explicit_indices() {
        let mut machine = ab_machine();
        machine
            .restore_node(NodeId(4), Vec::new(), false, true)
            .unwrap();
        assert_eq!(
            machine.restore_node(NodeId(4), Vec::new(), false, false),
            Err(MachineError::DuplicateIndex { id: NodeId(4) })
        );

        // Fresh indices continue past the restored one.
        assert_eq!(machine.add_node(), NodeId(5));
    }

    #[test]
    fn toggle_final_flips_and_reports() {
        let mut machine = ab_machine();
        let n0 = machine.add_node();
        assert!(machine.toggle_final(n0).unwrap());
        assert!(!machine.toggle_final(n0).unwrap());
        assert_eq!(
            machine.toggle_final(NodeId(9)),
            Err(MachineError::NodeNotFound { id: NodeId(9) })
        );
    }
}

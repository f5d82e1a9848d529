//! Prebuilt machines for testing.
//!
//! Small, fully in-memory automata exercising the interesting corners of the
//! conversion pipeline: lambda branches, lambda cycles, collapsible states
//! and partial transition functions.

use machina_core::{Alphabet, Machine, LAMBDA};

/// The `{a, b}` alphabet used by most fixtures.
pub fn ab_alphabet() -> Alphabet {
    Alphabet::new(["a", "b"])
}

/// NFA over `{a, b}`: `0 --a--> 1`, `1 --λ--> 2`, `1 --b--> 2`; start 0,
/// final 2.
///
/// `closure({0}) = {0}` and `closure({1}) = {1, 2}`, so conversion produces
/// witness sets `{0}`, `{1, 2}` and `{2}`.
pub fn lambda_branch_nfa() -> Machine {
    let mut machine = Machine::new(ab_alphabet());
    let n0 = machine.add_node();
    let n1 = machine.add_node();
    let n2 = machine.add_node();
    machine.set_starter(n0).unwrap();
    machine.toggle_final(n2).unwrap();
    machine.add_transition(n0, n1, ["a"]).unwrap();
    machine.add_transition(n1, n2, [LAMBDA]).unwrap();
    machine.add_transition(n1, n2, ["b"]).unwrap();
    machine
}

/// DFA over `{a, b}` with two interchangeable final states.
///
/// `0 --a--> 1`, `0 --b--> 2`; both 1 and 2 are final and feed node 3 on
/// every symbol. Minimization merges 1 and 2.
pub fn collapsible_dfa() -> Machine {
    let mut machine = Machine::new(ab_alphabet());
    let n0 = machine.add_node();
    let n1 = machine.add_node();
    let n2 = machine.add_node();
    let n3 = machine.add_node();
    machine.set_starter(n0).unwrap();
    machine.toggle_final(n1).unwrap();
    machine.toggle_final(n2).unwrap();
    machine.add_transition(n0, n1, ["a"]).unwrap();
    machine.add_transition(n0, n2, ["b"]).unwrap();
    machine.add_transition(n1, n3, ["a", "b"]).unwrap();
    machine.add_transition(n2, n3, ["a", "b"]).unwrap();
    machine
}

/// NFA over `{a, b}` mixing lambda cycles, branching and self-loops.
///
/// Dense enough that subset construction visits several distinct witness
/// sets and minimization has something to collapse.
pub fn dense_nfa() -> Machine {
    let mut machine = Machine::new(ab_alphabet());
    let n0 = machine.add_node();
    let n1 = machine.add_node();
    let n2 = machine.add_node();
    let n3 = machine.add_node();
    machine.set_starter(n0).unwrap();
    machine.toggle_final(n3).unwrap();
    machine.add_transition(n0, n1, ["a", LAMBDA]).unwrap();
    machine.add_transition(n1, n0, [LAMBDA]).unwrap();
    machine.add_transition(n1, n2, ["a"]).unwrap();
    machine.add_transition(n1, n1, ["b"]).unwrap();
    machine.add_transition(n2, n3, ["a", "b"]).unwrap();
    machine.add_transition(n3, n3, ["b"]).unwrap();
    machine
}

/// Two-node machine with one transition and no start node; used for codec
/// and report edge cases.
pub fn startless_machine() -> Machine {
    let mut machine = Machine::new(ab_alphabet());
    let n0 = machine.add_node();
    let n1 = machine.add_node();
    machine.add_transition(n0, n1, ["a", "b"]).unwrap();
    machine
}

/// DFA over `{a}` accepting strings of even length; already minimal.
pub fn even_length_dfa() -> Machine {
    let mut machine = Machine::new(Alphabet::new(["a"]));
    let even = machine.add_node();
    let odd = machine.add_node();
    machine.set_starter(even).unwrap();
    machine.toggle_final(even).unwrap();
    machine.add_transition(even, odd, ["a"]).unwrap();
    machine.add_transition(odd, even, ["a"]).unwrap();
    machine
}

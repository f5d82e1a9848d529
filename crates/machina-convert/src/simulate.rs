//! Acceptance simulation for input strings.
//!
//! Used by the editor's "test input" affordance and by the property tests
//! that check language equivalence between a machine and its conversion.

use machina_core::{Machine, NodeId};

use crate::closure::{any_final, lambda_closure, move_set};
use crate::error::{ConvertError, ConvertResult};

/// Nondeterministic acceptance: does any closure-reachable path over `input`
/// end in a final state?
///
/// Fails with [`ConvertError::InvalidAutomaton`] if the machine has no start
/// node. Symbols outside the alphabet simply move nowhere.
pub fn nfa_accepts<'a, I>(machine: &Machine, input: I) -> ConvertResult<bool>
where
    I: IntoIterator<Item = &'a str>,
{
    let start = machine.start_node().ok_or(ConvertError::InvalidAutomaton)?;
    let mut current = lambda_closure(machine, &[start]);

    for symbol in input {
        current = lambda_closure(machine, &move_set(machine, symbol, &current));
        if current.is_empty() {
            return Ok(false);
        }
    }
    Ok(any_final(machine, &current))
}

/// Deterministic acceptance: walk the unique transition per symbol; a missing
/// transition rejects.
///
/// Assumes the machine is deterministic; on a node with overlapping labels
/// the walk fails with [`ConvertError::NonDeterministicInput`].
pub fn dfa_accepts<'a, I>(machine: &Machine, input: I) -> ConvertResult<bool>
where
    I: IntoIterator<Item = &'a str>,
{
    let start = machine.start_node().ok_or(ConvertError::InvalidAutomaton)?;
    let mut current = start;

    for symbol in input {
        let mut next: Option<NodeId> = None;
        for transition in machine.outgoing(current) {
            if !transition.carries(symbol) {
                continue;
            }
            if next.is_some() {
                return Err(ConvertError::NonDeterministicInput {
                    node: current,
                    symbol: symbol.to_string(),
                });
            }
            next = Some(transition.to());
        }
        match next {
            Some(node) => current = node,
            None => return Ok(false),
        }
    }

    Ok(machine
        .node(current)
        .is_some_and(|node| node.is_final()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::convert_to_dfa;
    use crate::test_fixtures;

    #[test]
    fn nfa_accepts_follows_lambda_paths() {
        let nfa = test_fixtures::lambda_branch_nfa();

        assert!(nfa_accepts(&nfa, ["a"]).unwrap());
        assert!(nfa_accepts(&nfa, ["a", "b"]).unwrap());
        assert!(!nfa_accepts(&nfa, []).unwrap());
        assert!(!nfa_accepts(&nfa, ["b"]).unwrap());
        assert!(!nfa_accepts(&nfa, ["a", "b", "b"]).unwrap());
    }

    #[test]
    fn dfa_walk_agrees_with_nfa_acceptance() {
        let nfa = test_fixtures::lambda_branch_nfa();
        let dfa = convert_to_dfa(&nfa).unwrap();

        for input in [
            vec![],
            vec!["a"],
            vec!["b"],
            vec!["a", "b"],
            vec!["a", "a"],
            vec!["a", "b", "b"],
        ] {
            assert_eq!(
                nfa_accepts(&nfa, input.iter().copied()).unwrap(),
                dfa_accepts(&dfa, input.iter().copied()).unwrap(),
                "disagreement on {input:?}"
            );
        }
    }

    #[test]
    fn even_length_dfa_accepts_even_strings() {
        let dfa = test_fixtures::even_length_dfa();
        assert!(dfa_accepts(&dfa, []).unwrap());
        assert!(!dfa_accepts(&dfa, ["a"]).unwrap());
        assert!(dfa_accepts(&dfa, ["a", "a"]).unwrap());
    }

    #[test]
    fn unknown_symbol_rejects() {
        let dfa = test_fixtures::even_length_dfa();
        assert!(!dfa_accepts(&dfa, ["z"]).unwrap());
        let nfa = test_fixtures::lambda_branch_nfa();
        assert!(!nfa_accepts(&nfa, ["z"]).unwrap());
    }

    #[test]
    fn simulation_requires_a_start_node() {
        let machine = test_fixtures::startless_machine();
        assert!(matches!(
            nfa_accepts(&machine, ["a"]),
            Err(ConvertError::InvalidAutomaton)
        ));
        assert!(matches!(
            dfa_accepts(&machine, ["a"]),
            Err(ConvertError::InvalidAutomaton)
        ));
    }
}

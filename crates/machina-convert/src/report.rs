//! Deterministic textual reports of machines and their conversions.
//!
//! The report renders the transition relation as one formal
//! `δ(state, symbol) = state` line per pair. Every listing follows the
//! machine's own stored order (nodes in creation order, letters and adjacency
//! in insertion order), so the output is fully reproducible for a given
//! input.

use std::fmt::Write as _;

use machina_core::Machine;

use crate::error::ConvertResult;
use crate::minimize::minimize_dfa;
use crate::subset::convert_to_dfa;

/// Rendering options for [`describe_with`].
#[derive(Debug, Clone)]
pub struct ReportOptions {
    /// Prefix for input-machine node names.
    pub input_prefix: String,
    /// Prefix for output-machine node names.
    pub output_prefix: String,
    /// Whether converted sections list each node's witness set.
    pub include_witness_sets: bool,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self {
            input_prefix: "i".to_string(),
            output_prefix: "o".to_string(),
            include_witness_sets: true,
        }
    }
}

/// Render a report for `machine` with default options.
///
/// With `also_convert_and_minimize` set, the machine is converted to a DFA
/// and that DFA minimized; the report then carries `[INPUT]`, `[OUTPUT]` and
/// `[MINIMIZED]` sections, the latter two including the witness-set mapping
/// back to input node indices.
pub fn describe(machine: &Machine, also_convert_and_minimize: bool) -> ConvertResult<String> {
    describe_with(machine, also_convert_and_minimize, &ReportOptions::default())
}

/// Render a report with explicit [`ReportOptions`].
pub fn describe_with(
    machine: &Machine,
    also_convert_and_minimize: bool,
    options: &ReportOptions,
) -> ConvertResult<String> {
    let mut out = String::new();
    render_section(&mut out, "[INPUT]", machine, &options.input_prefix, None);

    if also_convert_and_minimize {
        let dfa = convert_to_dfa(machine)?;
        let witness = options
            .include_witness_sets
            .then_some(options.input_prefix.as_str());
        out.push('\n');
        render_section(&mut out, "[OUTPUT]", &dfa, &options.output_prefix, witness);

        let minimized = minimize_dfa(&dfa)?;
        out.push('\n');
        render_section(
            &mut out,
            "[MINIMIZED]",
            &minimized,
            &options.output_prefix,
            witness.map(|_| options.output_prefix.as_str()),
        );
    }

    Ok(out)
}

fn render_section(
    out: &mut String,
    title: &str,
    machine: &Machine,
    prefix: &str,
    witness_prefix: Option<&str>,
) {
    let _ = writeln!(out, "{title}\n");
    let _ = writeln!(
        out,
        "Alphabet: {{{}}}\n",
        machine.alphabet().symbols().join(", ")
    );

    let names: Vec<String> = machine
        .nodes()
        .map(|node| format!("{prefix}{}", node.id().0))
        .collect();
    let _ = writeln!(out, "Nodes: {{{}}}\n", names.join(", "));

    if let Some(witness_prefix) = witness_prefix {
        for node in machine.nodes() {
            let members: Vec<String> = node
                .sub_nodes()
                .iter()
                .map(|id| format!("{witness_prefix}{}", id.0))
                .collect();
            let _ = writeln!(out, "{prefix}{}: {{{}}}", node.id().0, members.join(", "));
        }
        out.push('\n');
    }

    match machine.start_node() {
        Some(start) => {
            let _ = writeln!(out, "Start Node: {prefix}{}\n", start.0);
        }
        None => {
            let _ = writeln!(out, "Start Node: none\n");
        }
    }

    let accepting: Vec<String> = machine
        .nodes()
        .filter(|node| node.is_final())
        .map(|node| format!("{prefix}{}", node.id().0))
        .collect();
    let _ = writeln!(out, "Accept Nodes: {{{}}}\n", accepting.join(", "));

    let _ = writeln!(out, "Transitions:");
    for node in machine.nodes() {
        for transition in machine.outgoing(node.id()) {
            for letter in transition.letters() {
                let _ = writeln!(
                    out,
                    " δ({prefix}{}, {letter}) = {prefix}{}",
                    node.id().0,
                    transition.to().0
                );
            }
        }
    }
}

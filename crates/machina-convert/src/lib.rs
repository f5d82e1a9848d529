//! Transformation algorithms over [`machina_core::Machine`] graphs.
//!
//! This crate is the algorithmic half of the machina workspace. An external
//! editor builds a possibly nondeterministic machine through the core
//! mutators; this crate turns it into something useful:
//!
//! - **Closure & move** — lambda-closure and symbol-move over node sets, the
//!   primitives behind everything else
//! - **Subset construction** — [`convert_to_dfa`], producing an equivalent
//!   deterministic machine whose nodes carry witness sets of origin states
//! - **Minimization** — [`minimize_dfa`], partition refinement collapsing
//!   equivalent states of an already-deterministic machine
//! - **Persistence** — a flat, serde-friendly record type and JSON file
//!   helpers forming the on-disk contract
//! - **Reporting** — [`describe`], a deterministic textual rendering of a
//!   machine and its converted/minimized counterparts
//! - **Simulation** — acceptance checks for input strings against NFAs and
//!   DFAs
//!
//! All transformations are pure with respect to their input: they return a
//! fresh [`Machine`](machina_core::Machine) and never mutate the one passed
//! in.

mod closure;
mod error;
mod minimize;
pub mod persistence;
mod report;
mod simulate;
mod subset;
pub mod test_fixtures;

pub use closure::{lambda_closure, move_set};
pub use error::{ConvertError, ConvertResult};
pub use minimize::minimize_dfa;
pub use persistence::{
    decode_machine, encode_machine, load_from_path, save_to_path, MachineRecord, NodeRecord,
    TransitionRecord, NO_START_NODE,
};
pub use report::{describe, describe_with, ReportOptions};
pub use simulate::{dfa_accepts, nfa_accepts};
pub use subset::convert_to_dfa;

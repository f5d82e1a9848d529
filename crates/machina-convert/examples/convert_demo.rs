//! Walk a small NFA through the full pipeline and print the report.
//!
//! Run with:
//! ```bash
//! cargo run --example convert_demo -p machina-convert
//! ```

use anyhow::Result;
use machina_convert::{
    convert_to_dfa, describe, encode_machine, minimize_dfa, save_to_path, test_fixtures,
};

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "machina_convert=debug".into()),
        )
        .init();

    let nfa = test_fixtures::dense_nfa();
    let dfa = convert_to_dfa(&nfa)?;
    let minimized = minimize_dfa(&dfa)?;

    println!("{}", describe(&nfa, true)?);
    println!(
        "nodes: nfa={} dfa={} minimized={}",
        nfa.node_count(),
        dfa.node_count(),
        minimized.node_count()
    );

    let out = std::env::temp_dir().join("machina_demo.json");
    save_to_path(&minimized, &out)?;
    println!(
        "saved {} node records to {}",
        encode_machine(&minimized).nodes.len(),
        out.display()
    );
    Ok(())
}

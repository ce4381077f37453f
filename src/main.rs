//! Command-line perft runner for the ferz move generator.

use std::env;
use std::time::Instant;

use anyhow::{Context, Result, bail};
use tracing::info;

use ferz_core::{Position, divide, perft};

const USAGE: &str = "usage: ferz <perft|divide> <depth> [fen]";

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let args: Vec<String> = env::args().skip(1).collect();
    let Some((command, rest)) = args.split_first() else {
        bail!(USAGE);
    };
    let Some((depth_arg, fen_args)) = rest.split_first() else {
        bail!(USAGE);
    };
    let depth: u32 = depth_arg
        .parse()
        .with_context(|| format!("invalid depth \"{depth_arg}\""))?;

    // The FEN arrives as the remaining (space-split) arguments, so it can be
    // passed unquoted; absent a FEN, start from the initial position.
    let mut pos: Position = if fen_args.is_empty() {
        Position::starting_position()
    } else {
        fen_args.join(" ").parse().context("malformed FEN")?
    };

    // Build the sliding attack tables before the clock starts.
    ferz_core::attacks::init();

    match command.as_str() {
        "perft" => {
            let start = Instant::now();
            let nodes = perft(&mut pos, depth);
            report(depth, nodes, start);
            println!("{nodes}");
        }
        "divide" => {
            let start = Instant::now();
            let rows = divide(&mut pos, depth);
            let total: u64 = rows.iter().map(|(_, nodes)| nodes).sum();
            for (mv, nodes) in &rows {
                println!("{mv}: {nodes}");
            }
            println!("total: {total}");
            report(depth, total, start);
        }
        other => bail!("unknown command \"{other}\"\n{USAGE}"),
    }

    Ok(())
}

fn report(depth: u32, nodes: u64, start: Instant) {
    let elapsed = start.elapsed();
    let nps = (nodes as f64 / elapsed.as_secs_f64().max(f64::EPSILON)) as u64;
    info!(depth, nodes, ?elapsed, nps, "perft finished");
}

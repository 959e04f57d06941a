//! Headless simulator.
//!
//! Usage: `rowmatch-sim [LEVEL.json] [--seed N] [--max-swaps N] [--json]`
//!
//! Plays one level with the hint planner and prints every event. With
//! `--json`, prints one JSON object per swap (plus the initial fill) carrying
//! the board snapshot instead. Exits non-zero if the level does not complete.

use std::path::Path;

use anyhow::{bail, Context, Result};
use serde_json::json;

use rowmatch::core::{EngineConfig, Level, Resolver};
use rowmatch::logging;
use rowmatch::sim::{autoplay, describe_event, parse_sim_args, SimEnd, Step, DEMO_LEVEL};

fn main() -> Result<()> {
    logging::init_from_env(true)?;

    let args: Vec<String> = std::env::args().skip(1).collect();
    let opts = parse_sim_args(&args)?;

    let level = match &opts.level_path {
        Some(path) => Level::load(Path::new(path)).with_context(|| format!("loading {}", path))?,
        None => Level::from_json(DEMO_LEVEL)?,
    };

    let mut config = EngineConfig::from_env();
    if let Some(seed) = opts.seed {
        config.seed = seed;
    }

    let mut resolver = Resolver::new(&level, &config, false);
    let report = autoplay(&mut resolver, opts.max_swaps, |step, resolver| {
        if opts.json {
            let line = match step {
                Step::Events(events) if events.is_empty() => return,
                Step::Events(_) => json!({ "snapshot": resolver.snapshot() }),
                Step::Swapped {
                    from,
                    to,
                    rows_cleared,
                } => json!({
                    "swap": { "from": [from.x, from.y], "to": [to.x, to.y] },
                    "rows_cleared": rows_cleared,
                }),
            };
            println!("{}", line);
            return;
        }
        if let Step::Events(events) = step {
            for event in events {
                println!("{}", describe_event(event, resolver.level()));
            }
        }
    });

    let summary = format!(
        "{} swaps, {} rows cleared, seed {}",
        report.swaps,
        report.rows_cleared,
        resolver.seed()
    );
    match report.end {
        SimEnd::LevelComplete => {
            if !opts.json {
                println!("done: {}", summary);
            }
            Ok(())
        }
        SimEnd::Stuck => bail!("board stuck before completion: {}", summary),
        SimEnd::SwapLimit => bail!("swap limit {} reached: {}", opts.max_swaps, summary),
    }
}

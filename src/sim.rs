//! Headless autoplay used by the `rowmatch-sim` binary.
//!
//! The player is the hint planner: take the active hint (or ask for one),
//! make the single swap [`plan_swap_for_group`] proposes, repeat. Collected
//! tiles land instantly, so every indicator slot is filled as soon as its row
//! clears.

use anyhow::{anyhow, Result};

use crate::core::{plan_swap_for_group, HintTracker, Level, Resolver, SwapOutcome};
use crate::input::AnimationTracker;
use crate::types::{GameEvent, GridPos};

pub const DEFAULT_MAX_SWAPS: u32 = 500;

pub const DEMO_LEVEL: &str = r#"{"groups": [
  {"key": "fruit", "items": ["apple", "pear", "plum", "fig"]},
  {"key": "tools", "items": ["saw", "drill", "file", "vise"]},
  {"key": "birds", "items": ["crow", "wren", "owl", "kite"]},
  {"key": "trees", "items": ["oak", "elm", "ash", "yew"]}
]}"#;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimOptions {
    pub level_path: Option<String>,
    pub seed: Option<u32>,
    pub max_swaps: u32,
    pub json: bool,
}

impl Default for SimOptions {
    fn default() -> Self {
        Self {
            level_path: None,
            seed: None,
            max_swaps: DEFAULT_MAX_SWAPS,
            json: false,
        }
    }
}

/// Parse `[LEVEL.json] [--seed N] [--max-swaps N] [--json]` (program name excluded).
pub fn parse_sim_args(args: &[String]) -> Result<SimOptions> {
    let mut opts = SimOptions::default();
    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--seed" => {
                i += 1;
                let v = args
                    .get(i)
                    .ok_or_else(|| anyhow!("sim: missing value for --seed"))?;
                let seed = v
                    .parse::<u32>()
                    .map_err(|_| anyhow!("sim: invalid --seed value: {}", v))?;
                opts.seed = Some(seed);
            }
            "--max-swaps" => {
                i += 1;
                let v = args
                    .get(i)
                    .ok_or_else(|| anyhow!("sim: missing value for --max-swaps"))?;
                opts.max_swaps = v
                    .parse::<u32>()
                    .map_err(|_| anyhow!("sim: invalid --max-swaps value: {}", v))?;
            }
            "--json" => opts.json = true,
            flag if flag.starts_with("--") => {
                return Err(anyhow!("sim: unknown flag {}", flag));
            }
            path => {
                if opts.level_path.is_some() {
                    return Err(anyhow!("sim: more than one level path given"));
                }
                opts.level_path = Some(path.to_string());
            }
        }
        i += 1;
    }
    Ok(opts)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimEnd {
    LevelComplete,
    /// No group can be completed and no swap is planned.
    Stuck,
    SwapLimit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimReport {
    pub swaps: u32,
    pub rows_cleared: u32,
    pub end: SimEnd,
}

/// What the autoplay loop reports to its observer.
#[derive(Debug, Clone, Copy)]
pub enum Step<'a> {
    Events(&'a [GameEvent]),
    Swapped {
        from: GridPos,
        to: GridPos,
        rows_cleared: u32,
    },
}

/// Play `resolver` until the level completes, the board gets stuck, or
/// `max_swaps` swaps were made.
pub fn autoplay<F>(resolver: &mut Resolver, max_swaps: u32, mut observe: F) -> SimReport
where
    F: FnMut(Step<'_>, &Resolver),
{
    let mut hints = HintTracker::new();
    let mut animations = AnimationTracker::new();
    let mut report = SimReport {
        swaps: 0,
        rows_cleared: resolver.populate(),
        end: SimEnd::Stuck,
    };
    flush_events(resolver, &mut hints, &mut animations, &mut observe);

    loop {
        if resolver.is_level_complete() {
            report.end = SimEnd::LevelComplete;
            break;
        }
        if report.swaps >= max_swaps {
            report.end = SimEnd::SwapLimit;
            break;
        }

        let plan = hints
            .active()
            .or_else(|| hints.request(resolver))
            .and_then(|group| plan_swap_for_group(resolver.board(), group));
        let Some((from, to)) = plan else {
            log::warn!(
                "stuck after {} swaps: nothing completable, {} tiles left",
                report.swaps,
                resolver.board().occupied_count()
            );
            report.end = SimEnd::Stuck;
            break;
        };

        report.swaps += 1;
        match resolver.request_swap(from, to) {
            SwapOutcome::Accepted { rows_cleared } => {
                report.rows_cleared += rows_cleared;
                observe(
                    Step::Swapped {
                        from,
                        to,
                        rows_cleared,
                    },
                    resolver,
                );
            }
            SwapOutcome::Rejected(reason) => {
                log::error!("planned swap {:?} -> {:?} rejected: {}", from, to, reason.message());
                hints.clear();
            }
        }
        flush_events(resolver, &mut hints, &mut animations, &mut observe);
    }

    report
}

fn flush_events<F>(
    resolver: &mut Resolver,
    hints: &mut HintTracker,
    animations: &mut AnimationTracker,
    observe: &mut F,
) where
    F: FnMut(Step<'_>, &Resolver),
{
    let mut events = resolver.drain_events();
    for event in &events {
        if let GameEvent::GroupCollected { group, .. } = event {
            hints.on_group_collected(*group);
        }
    }
    animations.track(&events);
    for slot in animations.complete_all() {
        resolver.notify_arrived(slot);
    }
    // arrivals raise SlotFilled
    events.extend(resolver.drain_events());
    observe(Step::Events(&events), resolver);
}

/// One human-readable line per event, with group and item names resolved.
pub fn describe_event(event: &GameEvent, level: &Level) -> String {
    let group_name = |id| level.group_key(id).unwrap_or("?").to_string();
    let item_name = |id| level.item_key(id).unwrap_or("?").to_string();
    match event {
        GameEvent::TileSpawned { tile, origin } => format!(
            "spawn   {:<8} {:<8} at ({}, {}) {:?}",
            group_name(tile.group()),
            item_name(tile.item()),
            tile.pos.x,
            tile.pos.y,
            origin
        ),
        GameEvent::TilesSwapped { first, second } => format!(
            "swap    ({}, {}) <-> ({}, {})",
            second.pos.x, second.pos.y, first.pos.x, first.pos.y
        ),
        GameEvent::SwapRejected { from, to, reason } => format!(
            "reject  ({}, {}) -> ({}, {}): {}",
            from.x,
            from.y,
            to.x,
            to.y,
            reason.code()
        ),
        GameEvent::GroupCollected {
            group,
            collection_index,
        } => format!("collect {} -> slot {}", group_name(*group), collection_index),
        GameEvent::TileCollected {
            tile,
            collection_index,
        } => format!(
            "fly     {} -> slot {}",
            item_name(tile.item()),
            collection_index
        ),
        GameEvent::TileMoved(mv) => format!(
            "fall    {} ({}, {}) -> ({}, {})",
            item_name(mv.tile.item()),
            mv.from.x,
            mv.from.y,
            mv.to.x,
            mv.to.y
        ),
        GameEvent::SlotFilled {
            collection_index,
            arrivals,
        } => format!("slot    {} has {}", collection_index, arrivals),
        GameEvent::AllGroupsCollected => "all groups collected".to_string(),
        GameEvent::LevelComplete => "level complete".to_string(),
    }
}

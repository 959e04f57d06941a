//! Core game logic - pure, deterministic, and testable
//!
//! This crate holds every rule of the row-collection puzzle: the board, the
//! token supply, the cascade and the hint query. It has **no dependencies** on
//! terminals, input devices or files beyond loading level JSON, which makes it:
//!
//! - **Deterministic**: one seed fixes the spawn queue, every shuffle and every hint tie-break
//! - **Testable**: the resolver runs synchronously and reports through plain events
//! - **Portable**: presentation collaborators subscribe to events and queries only
//!
//! # Module Structure
//!
//! - [`board`]: `width x height` grid with collapse and completed-row detection
//! - [`spawn`]: spawn-queue generation (normalization, guaranteed groups, no pre-solved start)
//! - [`resolver`]: one level attempt; swap validation and the clear/collapse/refill cascade
//! - [`hint`]: completable-group query, single-hint tracking and a swap planner
//! - [`level`]: level definitions, board shape, random level assembly and level selection
//! - [`geometry`]: grid <-> world mapping for visuals and pointer input
//! - [`rank`]: rank ladder over completed levels
//! - [`config`]: engine configuration with environment overrides
//! - [`rng`]: seedable LCG shared by every random draw
//! - [`snapshot`]: serializable view of a level attempt
//!
//! # Game Rules
//!
//! - A row is **complete** when every cell is occupied by the same group; it is
//!   collected immediately, whether a swap, a refill or the initial fill made it.
//! - Any two occupied cells may be swapped; there is no adjacency rule.
//! - Each cleared row takes the next collection index, which selects the
//!   indicator slot its tiles fly to.
//! - The level is complete once the board is empty and the spawn queue is exhausted.
//!
//! # Example
//!
//! ```
//! use rowmatch_core::{EngineConfig, Level, LevelDefinition, GroupDefinition, Resolver};
//! use rowmatch_types::GameEvent;
//!
//! let level = Level::from_definition(&LevelDefinition {
//!     groups: vec![
//!         GroupDefinition::new("fruit", &["apple", "pear"]),
//!         GroupDefinition::new("tools", &["saw", "drill"]),
//!     ],
//! });
//!
//! let mut resolver = Resolver::new(&level, &EngineConfig::default(), false);
//! resolver.populate();
//!
//! assert_eq!(resolver.board().height(), 2);
//! let spawned = resolver
//!     .drain_events()
//!     .iter()
//!     .filter(|e| matches!(e, GameEvent::TileSpawned { .. }))
//!     .count();
//! assert!(spawned >= 8);
//! ```

pub mod board;
pub mod config;
pub mod error;
pub mod geometry;
pub mod hint;
pub mod level;
pub mod rank;
pub mod resolver;
pub mod rng;
pub mod snapshot;
pub mod spawn;

pub use rowmatch_types as types;

// Re-export commonly used types for convenience
pub use board::{Board, Cell, CompletedRows};
pub use config::{EngineConfig, WidthPolicy};
pub use error::LevelError;
pub use geometry::Geometry;
pub use hint::{completable_groups, find_completable_group, plan_swap_for_group, HintTracker};
pub use level::{
    assemble_random_level, AssemblyDiagnostic, BoardShape, Group, GroupDefinition, Level,
    LevelBook, LevelDefinition, LevelSource, RandomLevel, SelectedLevel,
};
pub use rank::{Rank, RankLadder};
pub use resolver::{Resolver, SwapOutcome};
pub use rng::SimpleRng;
pub use snapshot::{GameSnapshot, TokenSnapshot};
pub use spawn::{normalize_items, precompleted_rows, SpawnQueue, SpawnReport};

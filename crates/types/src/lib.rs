//! Core types module - shared data structures and constants
//!
//! This module defines the fundamental types used throughout the engine.
//! All types are pure data structures with no external dependencies, making them
//! usable in any context (core rules, input mediation, terminal presentation).
//!
//! # Board Coordinates
//!
//! Cells are addressed as `(x, y)`:
//!
//! - **x**: column, `0..width`, left to right
//! - **y**: row, `0..height`, **bottom to top** (row 0 is the floor tiles fall onto)
//!
//! # Scan Order
//!
//! Every traversal that assigns order to something observable (completed-row
//! detection, clearing, initial fill, refill, the pre-completion check of the
//! spawn generator) uses one order: row-major, bottom to top, left to right.
//! Collection indices handed to indicator slots follow from it.
//!
//! # Level Shape Constants
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `DEFAULT_BOARD_WIDTH` | 4 | Columns on a regular level |
//! | `TUTORIAL_BOARD_WIDTH` | 3 | Columns on the tutorial level |
//! | `DEFAULT_MAX_BOARD_HEIGHT` | 5 | Rows cap; height = min(groups, cap) |
//! | `MAX_BOARD_HEIGHT` | 16 | Hard upper bound for any configured cap |
//! | `MAX_BOARD_WIDTH` | 32 | Hard upper bound for any width policy |
//! | `MAX_SPAWN_ATTEMPTS` | 20 | Spawn-queue regenerations before giving up |
//! | `RANDOM_LEVEL_GROUPS` | 7 | Groups in an assembled random level |
//! | `RANDOM_LEVEL_ATTEMPTS` | 100 | Assembly attempts before best effort |
//!
//! # Examples
//!
//! ```
//! use rowmatch_types::{GridPos, GroupId, ItemId, Phase, SwapRejection, Token};
//!
//! let token = Token::new(GroupId(2), ItemId(7));
//! assert_eq!(token.group, GroupId(2));
//!
//! let pos = GridPos::new(1, 0);
//! assert_eq!(pos.offset(0, 1), GridPos::new(1, 1));
//!
//! assert_eq!(Phase::Idle.as_str(), "idle");
//! assert_eq!(SwapRejection::SameCell.code(), "same_cell");
//! ```

/// Columns on a regular level.
pub const DEFAULT_BOARD_WIDTH: u8 = 4;

/// Columns on the tutorial level.
pub const TUTORIAL_BOARD_WIDTH: u8 = 3;

/// Default cap on board rows (height = min(required groups, cap)).
pub const DEFAULT_MAX_BOARD_HEIGHT: u8 = 5;

/// Hard upper bound for a configured row cap.
pub const MAX_BOARD_HEIGHT: usize = 16;

/// Hard upper bound for the board width, whatever the width policy says.
pub const MAX_BOARD_WIDTH: u8 = 32;

/// Spawn-queue regenerations before the generator accepts its best candidate.
pub const MAX_SPAWN_ATTEMPTS: u32 = 20;

/// Number of groups an assembled random level asks for.
pub const RANDOM_LEVEL_GROUPS: usize = 7;

/// Shuffle attempts for random level assembly.
pub const RANDOM_LEVEL_ATTEMPTS: u32 = 100;

/// Distance between neighbouring cell centres in world units.
pub const DEFAULT_CELL_SIZE: f32 = 1.1;

/// Identity of a group within one level (index into the level's group list).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GroupId(pub u16);

/// Identity of an item within one level's item catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ItemId(pub u16);

/// Monotonic id handed out when a token is drawn from the spawn queue.
///
/// Presentation collaborators key their visual proxies on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TileId(pub u32);

/// Immutable pairing of a group and one of its items.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Token {
    pub group: GroupId,
    pub item: ItemId,
}

impl Token {
    pub fn new(group: GroupId, item: ItemId) -> Self {
        Self { group, item }
    }
}

/// A cell address on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GridPos {
    pub x: i8,
    pub y: i8,
}

impl GridPos {
    pub fn new(x: i8, y: i8) -> Self {
        Self { x, y }
    }

    pub fn offset(self, dx: i8, dy: i8) -> Self {
        Self {
            x: self.x.saturating_add(dx),
            y: self.y.saturating_add(dy),
        }
    }
}

/// A token placed on the board.
///
/// `pos` always equals the cell the tile is stored in; the board rewrites it
/// on every placement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Tile {
    pub id: TileId,
    pub token: Token,
    pub pos: GridPos,
}

impl Tile {
    pub fn group(&self) -> GroupId {
        self.token.group
    }

    pub fn item(&self) -> ItemId {
        self.token.item
    }
}

/// A position in world (presentation) space.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Match resolver state.
///
/// The cascade runs `Clearing -> Collapsing -> Refilling` until no row
/// completes, then returns to `Idle`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    Idle,
    Clearing,
    Collapsing,
    Refilling,
}

impl Phase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Idle => "idle",
            Phase::Clearing => "clearing",
            Phase::Collapsing => "collapsing",
            Phase::Refilling => "refilling",
        }
    }
}

/// One tile dropped by gravity. `tile.pos` already equals `to`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TileMove {
    pub tile: Tile,
    pub from: GridPos,
    pub to: GridPos,
}

/// Where a freshly drawn tile enters the scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SpawnOrigin {
    /// Initial fill: the tile appears at its own cell.
    InPlace,
    /// Refill: the tile appears above its column and falls into place.
    ColumnTop,
}

/// Why a swap request was turned into a snap-back.
///
/// Mis-drags are expected; none of these are failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SwapRejection {
    /// Requested while a cascade is still resolving. The cascade runs to rest
    /// inside a single call, so callers only see this from a re-entrant request.
    Busy,
    SameCell,
    OutOfBounds,
    EmptySource,
    EmptyTarget,
    LevelComplete,
}

impl SwapRejection {
    pub fn code(self) -> &'static str {
        match self {
            SwapRejection::Busy => "busy",
            SwapRejection::SameCell => "same_cell",
            SwapRejection::OutOfBounds => "out_of_bounds",
            SwapRejection::EmptySource | SwapRejection::EmptyTarget => "empty_cell",
            SwapRejection::LevelComplete => "level_complete",
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            SwapRejection::Busy => "resolver is busy",
            SwapRejection::SameCell => "source and target are the same cell",
            SwapRejection::OutOfBounds => "cell is outside the board",
            SwapRejection::EmptySource => "no tile at the source cell",
            SwapRejection::EmptyTarget => "no tile at the target cell",
            SwapRejection::LevelComplete => "level is already complete",
        }
    }
}

/// Facts the engine reports to presentation collaborators.
///
/// The engine never waits on the presentation; it records these in order and
/// the caller drains them after each request.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GameEvent {
    /// A token was drawn from the spawn queue and placed.
    TileSpawned { tile: Tile, origin: SpawnOrigin },
    /// Two tiles exchanged cells; both carry their new positions.
    TilesSwapped { first: Tile, second: Tile },
    /// A swap was refused; the dragged tile should return to `from`.
    SwapRejected {
        from: GridPos,
        to: GridPos,
        reason: SwapRejection,
    },
    /// A row of `group` was cleared. Fired once per row.
    GroupCollected { group: GroupId, collection_index: u32 },
    /// A tile left the board and is in flight to indicator slot `collection_index`.
    TileCollected { tile: Tile, collection_index: u32 },
    /// Gravity moved a tile down its column.
    TileMoved(TileMove),
    /// A collected tile reached its indicator slot.
    SlotFilled { collection_index: u32, arrivals: u32 },
    /// As many rows were cleared as the level has groups.
    AllGroupsCollected,
    /// Board empty and spawn queue exhausted. Fired at most once.
    LevelComplete,
}

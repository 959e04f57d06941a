//! Input/swap mediator - turns a drag gesture into a swap request
//!
//! The mediator picks up the tile under the pointer on drag-start, follows the
//! pointer, and on drag-end either asks the resolver for a swap or hands the
//! presentation a snap-back target. It never mutates the board itself.
//!
//! Input is gated twice: while the resolver runs a cascade and while the
//! presentation still has animations in flight ([`AnimationTracker`]).

use crate::core::{Resolver, SwapOutcome};
use crate::types::{GameEvent, GridPos, Point, SpawnOrigin, Tile};

/// Pending presentation animations, counted from resolver events.
///
/// The core never waits for visuals; whoever animates reports completion here.
#[derive(Debug, Clone, Default)]
pub struct AnimationTracker {
    pending: usize,
    /// Collection indices of collected tiles still flying to their slot.
    in_flight: Vec<u32>,
}

impl AnimationTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count the animations a batch of events implies. Returns how many were added.
    pub fn track(&mut self, events: &[GameEvent]) -> usize {
        let mut added = 0;
        for event in events {
            match event {
                GameEvent::TileCollected {
                    collection_index, ..
                } => {
                    self.in_flight.push(*collection_index);
                    added += 1;
                }
                GameEvent::TileMoved(_)
                | GameEvent::TilesSwapped { .. }
                | GameEvent::TileSpawned {
                    origin: SpawnOrigin::ColumnTop,
                    ..
                } => added += 1,
                _ => {}
            }
        }
        self.pending += added;
        added
    }

    pub fn pending(&self) -> usize {
        self.pending
    }

    pub fn is_idle(&self) -> bool {
        self.pending == 0
    }

    /// Finish every pending animation.
    ///
    /// Returns the slot index of each collected tile that landed, one entry per
    /// tile, to be forwarded to [`Resolver::notify_arrived`].
    pub fn complete_all(&mut self) -> Vec<u32> {
        self.pending = 0;
        std::mem::take(&mut self.in_flight)
    }
}

/// What the presentation should do when a drag ends.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DropOutcome {
    /// The resolver accepted the swap and resolved the board.
    Swapped {
        from: GridPos,
        to: GridPos,
        rows_cleared: u32,
    },
    /// Return the dragged tile to `to` (its cell centre); nothing changed.
    SnapBack { tile: Tile, to: Point },
    /// No drag was in progress.
    Ignored,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Drag {
    pub tile: Tile,
    pub origin: GridPos,
    pub pointer: Point,
}

#[derive(Debug, Clone, Default)]
pub struct DragMediator {
    active: Option<Drag>,
}

impl DragMediator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_dragging(&self) -> bool {
        self.active.is_some()
    }

    pub fn active(&self) -> Option<Drag> {
        self.active
    }

    /// Pick up the tile under `world`.
    ///
    /// Ignored while busy, while a drag is already active, or when the pointer
    /// is not over an occupied cell.
    pub fn drag_start(
        &mut self,
        world: Point,
        resolver: &Resolver,
        animations: &AnimationTracker,
    ) -> Option<Tile> {
        if resolver.is_busy() || !animations.is_idle() || resolver.is_level_complete() {
            return None;
        }
        if self.active.is_some() {
            return None;
        }
        let origin = resolver.geometry().to_cell(world);
        let tile = resolver.board().get_at(origin)?;
        self.active = Some(Drag {
            tile,
            origin,
            pointer: world,
        });
        Some(tile)
    }

    /// Follow the pointer. Returns the dragged tile's new position, if dragging.
    pub fn drag_move(&mut self, world: Point) -> Option<Point> {
        let drag = self.active.as_mut()?;
        drag.pointer = world;
        Some(world)
    }

    /// Drop at `world`: request a swap when the target cell is in bounds,
    /// differs from the source and is occupied; otherwise snap back.
    pub fn drag_end(&mut self, world: Point, resolver: &mut Resolver) -> DropOutcome {
        let Some(drag) = self.active.take() else {
            return DropOutcome::Ignored;
        };
        let home = resolver.geometry().to_world(drag.origin);
        let snap_back = DropOutcome::SnapBack {
            tile: drag.tile,
            to: home,
        };

        let target = resolver.geometry().to_cell(world);
        let valid = resolver.board().contains(target)
            && target != drag.origin
            && resolver.board().is_occupied(target.x, target.y);
        if !valid {
            return snap_back;
        }

        match resolver.request_swap(drag.origin, target) {
            SwapOutcome::Accepted { rows_cleared } => DropOutcome::Swapped {
                from: drag.origin,
                to: target,
                rows_cleared,
            },
            SwapOutcome::Rejected(_) => snap_back,
        }
    }

    /// Drop the current drag without a swap (focus lost, restart).
    pub fn cancel(&mut self) -> Option<Drag> {
        self.active.take()
    }
}

//! Hint finder - read-only queries over a settled board
//!
//! "Completable" means the group has one tile per column somewhere on the
//! board (its tile count equals the board width). The tiles need not share a
//! row; arranging them is left to the player.

use std::collections::BTreeMap;

use crate::board::Board;
use crate::resolver::Resolver;
use crate::rng::SimpleRng;
use crate::types::{GridPos, GroupId};

/// Groups whose tile count on the board equals the board width, in id order.
pub fn completable_groups(board: &Board) -> Vec<GroupId> {
    if board.width() == 0 {
        return Vec::new();
    }
    let mut counts: BTreeMap<GroupId, usize> = BTreeMap::new();
    for tile in board.tiles() {
        *counts.entry(tile.group()).or_insert(0) += 1;
    }
    counts
        .into_iter()
        .filter(|&(_, count)| count == board.width() as usize)
        .map(|(group, _)| group)
        .collect()
}

/// One completable group, chosen uniformly at random among all that qualify.
pub fn find_completable_group(board: &Board, rng: &mut SimpleRng) -> Option<GroupId> {
    let groups = completable_groups(board);
    rng.choose(&groups).copied()
}

/// A single swap that brings `group` closer to filling one row.
///
/// Targets the fully occupied row that already holds most tiles of the group
/// (lowest row on ties) and moves one outside tile of the group into it.
/// Returns `(source, target)`, or `None` when the group has a complete row
/// already or no occupied row can take it.
pub fn plan_swap_for_group(board: &Board, group: GroupId) -> Option<(GridPos, GridPos)> {
    let width = board.width() as i8;
    let mut best_row: Option<(i8, usize)> = None;

    for y in 0..board.height() as i8 {
        let row_full = (0..width).all(|x| board.is_occupied(x, y));
        if !row_full {
            continue;
        }
        let count = (0..width)
            .filter(|&x| board.get(x, y).is_some_and(|t| t.group() == group))
            .count();
        if count == width as usize {
            return None;
        }
        if best_row.map_or(true, |(_, best)| count > best) {
            best_row = Some((y, count));
        }
    }

    let (row, _) = best_row?;
    let target = (0..width)
        .map(|x| GridPos::new(x, row))
        .find(|pos| board.get_at(*pos).is_some_and(|t| t.group() != group))?;
    let source = board
        .tiles()
        .into_iter()
        .find(|t| t.group() == group && t.pos.y != row)
        .map(|t| t.pos)?;
    Some((source, target))
}

/// At most one highlighted group at a time.
///
/// A new hint is only handed out once the previous one has been collected.
#[derive(Debug, Clone, Default)]
pub struct HintTracker {
    active: Option<GroupId>,
}

impl HintTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn active(&self) -> Option<GroupId> {
        self.active
    }

    /// Ask the resolver for a hint; `None` while one is showing or nothing qualifies.
    pub fn request(&mut self, resolver: &mut Resolver) -> Option<GroupId> {
        if self.active.is_some() {
            return None;
        }
        let group = resolver.find_completable_group()?;
        self.active = Some(group);
        Some(group)
    }

    /// Drop the hint if `group` was the hinted one. Returns true if it was.
    pub fn on_group_collected(&mut self, group: GroupId) -> bool {
        if self.active == Some(group) {
            self.active = None;
            return true;
        }
        false
    }

    pub fn clear(&mut self) {
        self.active = None;
    }
}

use serde::Serialize;

use crate::resolver::Resolver;
use crate::types::Tile;

/// One occupied cell, as plain numbers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct TokenSnapshot {
    pub group: u16,
    pub item: u16,
    pub tile: u32,
}

impl From<Tile> for TokenSnapshot {
    fn from(value: Tile) -> Self {
        Self {
            group: value.token.group.0,
            item: value.token.item.0,
            tile: value.id.0,
        }
    }
}

/// Serializable view of a level attempt.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GameSnapshot {
    pub width: u8,
    pub height: u8,
    /// Scan order: bottom row first, left to right.
    pub cells: Vec<Option<TokenSnapshot>>,
    pub phase: &'static str,
    pub collected: u32,
    pub total_groups: u32,
    pub queue_remaining: usize,
    pub level_complete: bool,
    pub seed: u32,
}

impl GameSnapshot {
    pub fn capture(resolver: &Resolver) -> Self {
        let board = resolver.board();
        Self {
            width: board.width(),
            height: board.height(),
            cells: board
                .cells()
                .iter()
                .map(|cell| cell.map(TokenSnapshot::from))
                .collect(),
            phase: resolver.phase().as_str(),
            collected: resolver.collected_count(),
            total_groups: resolver.total_groups(),
            queue_remaining: resolver.queue().len(),
            level_complete: resolver.is_level_complete(),
            seed: resolver.seed(),
        }
    }

    pub fn occupied(&self) -> usize {
        self.cells.iter().filter(|cell| cell.is_some()).count()
    }

    /// Rows printed top row first; `..` marks an empty cell, otherwise the group id.
    pub fn to_text(&self) -> String {
        let width = self.width as usize;
        if width == 0 {
            return String::new();
        }
        let mut out = String::new();
        for row in self.cells.chunks(width).rev() {
            let line: Vec<String> = row
                .iter()
                .map(|cell| match cell {
                    Some(token) => format!("{:>2}", token.group),
                    None => "..".to_string(),
                })
                .collect();
            out.push_str(&line.join(" "));
            out.push('\n');
        }
        out
    }
}

//! Board module - owns the grid of tiles
//!
//! The board is a `width x height` grid where each cell is empty or holds a tile.
//! Uses a flat vector in row-major order (`y * width + x`) with row 0 at the bottom.
//! The board knows geometry and occupancy only; collection rules live in the resolver.

use arrayvec::ArrayVec;

use crate::types::{GridPos, GroupId, Tile, TileMove, MAX_BOARD_HEIGHT, MAX_BOARD_WIDTH};

/// A cell on the board: empty or a placed tile.
pub type Cell = Option<Tile>;

/// Row indices of completed rows, in scan order (bottom to top).
pub type CompletedRows = ArrayVec<u8, MAX_BOARD_HEIGHT>;

/// The game board - `width` columns x `height` rows using flat storage
#[derive(Debug, Clone, PartialEq)]
pub struct Board {
    width: u8,
    height: u8,
    /// Flat array of cells, row-major order (y * width + x), y = 0 is the bottom row
    cells: Vec<Cell>,
}

impl Board {
    /// Create a new empty board.
    ///
    /// Dimensions are clamped to `MAX_BOARD_WIDTH` x `MAX_BOARD_HEIGHT`.
    pub fn new(width: u8, height: u8) -> Self {
        let width = width.min(MAX_BOARD_WIDTH);
        let height = height.min(MAX_BOARD_HEIGHT as u8);
        Self {
            width,
            height,
            cells: vec![None; width as usize * height as usize],
        }
    }

    /// Calculate flat index from (x, y) coordinates
    #[inline(always)]
    fn index(&self, x: i8, y: i8) -> Option<usize> {
        if self.is_out_of_bounds(x, y) {
            return None;
        }
        Some((y as usize) * (self.width as usize) + (x as usize))
    }

    pub fn width(&self) -> u8 {
        self.width
    }

    pub fn height(&self) -> u8 {
        self.height
    }

    /// Check if position is out of bounds
    pub fn is_out_of_bounds(&self, x: i8, y: i8) -> bool {
        x < 0 || x >= self.width as i8 || y < 0 || y >= self.height as i8
    }

    pub fn contains(&self, pos: GridPos) -> bool {
        !self.is_out_of_bounds(pos.x, pos.y)
    }

    /// Tile at (x, y). Empty and out-of-bounds cells both read as `None`.
    pub fn get(&self, x: i8, y: i8) -> Option<Tile> {
        self.index(x, y).and_then(|idx| self.cells[idx])
    }

    pub fn get_at(&self, pos: GridPos) -> Option<Tile> {
        self.get(pos.x, pos.y)
    }

    /// Place `cell` at (x, y), rewriting the tile's stored position.
    /// Returns false (and changes nothing) if out of bounds.
    pub fn set(&mut self, x: i8, y: i8, cell: Cell) -> bool {
        match self.index(x, y) {
            Some(idx) => {
                self.cells[idx] = cell.map(|tile| Tile {
                    pos: GridPos::new(x, y),
                    ..tile
                });
                true
            }
            None => false,
        }
    }

    /// Remove and return the tile at (x, y).
    pub fn clear(&mut self, x: i8, y: i8) -> Option<Tile> {
        let idx = self.index(x, y)?;
        self.cells[idx].take()
    }

    /// Check if position is occupied (within bounds and filled)
    pub fn is_occupied(&self, x: i8, y: i8) -> bool {
        self.get(x, y).is_some()
    }

    /// Exchange the occupants of two cells (either may be empty).
    ///
    /// Any two cells may be swapped; adjacency is not a rule of this game.
    /// Returns false without touching the board if either cell is out of bounds.
    pub fn swap(&mut self, a: GridPos, b: GridPos) -> bool {
        let (Some(ia), Some(ib)) = (self.index(a.x, a.y), self.index(b.x, b.y)) else {
            return false;
        };
        self.cells.swap(ia, ib);
        if let Some(tile) = self.cells[ia].as_mut() {
            tile.pos = a;
        }
        if let Some(tile) = self.cells[ib].as_mut() {
            tile.pos = b;
        }
        true
    }

    /// True iff no cell is occupied.
    pub fn is_empty(&self) -> bool {
        self.cells.iter().all(|cell| cell.is_none())
    }

    pub fn occupied_count(&self) -> usize {
        self.cells.iter().filter(|cell| cell.is_some()).count()
    }

    fn row(&self, y: usize) -> &[Cell] {
        let width = self.width as usize;
        let start = y * width;
        &self.cells[start..start + width]
    }

    /// The common group of a completed row, or `None` if the row is not complete.
    ///
    /// A row is complete iff the board has at least one column and every cell in
    /// the row holds a tile of the same group.
    pub fn row_group(&self, y: usize) -> Option<GroupId> {
        if y >= self.height as usize || self.width == 0 {
            return None;
        }
        let row = self.row(y);
        let group = row[0]?.group();
        row.iter()
            .all(|cell| matches!(cell, Some(tile) if tile.group() == group))
            .then_some(group)
    }

    pub fn is_row_complete(&self, y: usize) -> bool {
        self.row_group(y).is_some()
    }

    /// Completed rows in scan order (bottom to top).
    pub fn completed_rows(&self) -> CompletedRows {
        (0..self.height)
            .filter(|&y| self.is_row_complete(y as usize))
            .collect()
    }

    /// Close the gaps in every column.
    ///
    /// Each tile drops by the number of empty cells below it, keeping the
    /// relative order within its column. Returns every tile that moved with its
    /// new position already committed.
    pub fn collapse(&mut self) -> Vec<TileMove> {
        let mut moves = Vec::new();
        let width = self.width as usize;

        for x in 0..width {
            let mut write_y = 0usize;
            for read_y in 0..self.height as usize {
                let read_idx = read_y * width + x;
                let Some(mut tile) = self.cells[read_idx].take() else {
                    continue;
                };
                let from = tile.pos;
                let to = GridPos::new(x as i8, write_y as i8);
                tile.pos = to;
                self.cells[write_y * width + x] = Some(tile);
                if write_y != read_y {
                    moves.push(TileMove { tile, from, to });
                }
                write_y += 1;
            }
        }

        moves
    }

    /// Every cell position in scan order: bottom row first, left to right.
    pub fn scan_order(&self) -> impl Iterator<Item = GridPos> {
        let (width, height) = (self.width as i8, self.height as i8);
        (0..height).flat_map(move |y| (0..width).map(move |x| GridPos::new(x, y)))
    }

    /// Empty cells in scan order.
    pub fn empty_cells(&self) -> Vec<GridPos> {
        self.scan_order()
            .filter(|pos| self.get_at(*pos).is_none())
            .collect()
    }

    /// All placed tiles in scan order.
    pub fn tiles(&self) -> Vec<Tile> {
        self.cells.iter().flatten().copied().collect()
    }

    /// Get a reference to the internal cells (row-major, bottom row first)
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Remove every tile.
    pub fn clear_all(&mut self) {
        for cell in &mut self.cells {
            *cell = None;
        }
    }

    /// Assert that every stored tile position matches its cell.
    ///
    /// A mismatch is a programming error; this is a no-op in release builds.
    pub fn debug_check_positions(&self) {
        if cfg!(debug_assertions) {
            for (pos, cell) in self.scan_order().zip(self.cells.iter()) {
                if let Some(tile) = cell {
                    debug_assert_eq!(tile.pos, pos, "tile {:?} out of sync with its cell", tile.id);
                }
            }
        }
    }
}

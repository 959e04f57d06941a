//! Grid <-> world coordinate mapping.
//!
//! The board is centred on `origin`; cell centres are `cell_size` apart and
//! row 0 is the lowest row. Presentation collaborators use this to place
//! visuals and to turn pointer positions back into cells.

use crate::types::{GridPos, Point};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Geometry {
    width: u8,
    height: u8,
    cell_size: f32,
    origin: Point,
}

impl Geometry {
    pub fn new(width: u8, height: u8, cell_size: f32, origin: Point) -> Self {
        Self {
            width,
            height,
            cell_size,
            origin,
        }
    }

    pub fn cell_size(&self) -> f32 {
        self.cell_size
    }

    pub fn origin(&self) -> Point {
        self.origin
    }

    /// Move the board (e.g. after a screen resize).
    pub fn set_origin(&mut self, origin: Point) {
        self.origin = origin;
    }

    /// Offset of cell (0, 0) from the origin.
    fn grid_offset(&self) -> Point {
        let total_w = (self.width as f32 - 1.0).max(0.0) * self.cell_size;
        let total_h = (self.height as f32 - 1.0).max(0.0) * self.cell_size;
        Point::new(-total_w / 2.0, -total_h / 2.0)
    }

    /// Pure `(column, row) -> offset from the origin` mapping.
    pub fn local_offset(&self, x: i8, y: i8) -> Point {
        self.local_offset_f(x as f32, y as f32)
    }

    /// Like [`local_offset`](Self::local_offset) for fractional grid coordinates.
    pub fn local_offset_f(&self, x: f32, y: f32) -> Point {
        let offset = self.grid_offset();
        Point::new(offset.x + x * self.cell_size, offset.y + y * self.cell_size)
    }

    /// World position of a cell centre.
    pub fn to_world(&self, pos: GridPos) -> Point {
        let local = self.local_offset(pos.x, pos.y);
        Point::new(self.origin.x + local.x, self.origin.y + local.y)
    }

    /// World position of fractional grid coordinates.
    pub fn to_world_f(&self, x: f32, y: f32) -> Point {
        let local = self.local_offset_f(x, y);
        Point::new(self.origin.x + local.x, self.origin.y + local.y)
    }

    /// Where a refilled tile enters: one row above the top of its column.
    pub fn spawn_point(&self, x: i8) -> Point {
        self.to_world(GridPos::new(x, self.height as i8))
    }

    /// Nearest cell to a world position. The result may be out of bounds.
    pub fn to_cell(&self, world: Point) -> GridPos {
        if self.cell_size <= 0.0 {
            return GridPos::new(-1, -1);
        }
        let offset = self.grid_offset();
        let local_x = world.x - (self.origin.x + offset.x);
        let local_y = world.y - (self.origin.y + offset.y);
        // `as` saturates, so far-away pointers land on i8::MIN/MAX
        GridPos::new(
            (local_x / self.cell_size).round() as i8,
            (local_y / self.cell_size).round() as i8,
        )
    }
}

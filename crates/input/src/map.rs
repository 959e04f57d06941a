//! Mapping from terminal events to player commands and pointer gestures.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};

use crate::core::Geometry;
use crate::types::Point;

/// Keyboard commands besides quitting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerCommand {
    Hint,
    Restart,
    /// Advance once the current level is complete.
    NextLevel,
}

/// A pointer gesture step, in world coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    Down(Point),
    Drag(Point),
    Up(Point),
}

/// Map keyboard input to player commands.
pub fn handle_key_event(key: KeyEvent) -> Option<PlayerCommand> {
    match key.code {
        KeyCode::Char('h') | KeyCode::Char('H') | KeyCode::Char('?') => Some(PlayerCommand::Hint),
        KeyCode::Char('r') | KeyCode::Char('R') => Some(PlayerCommand::Restart),
        KeyCode::Char('n') | KeyCode::Char('N') => Some(PlayerCommand::NextLevel),
        _ => None,
    }
}

/// Check if key should quit the game.
pub fn should_quit(key: KeyEvent) -> bool {
    matches!(key.code, KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc)
        || (key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL))
}

/// Where the board sits on screen, in terminal cells.
///
/// Board cell `(x, y)` covers `cell_cols x cell_rows` terminal cells; screen
/// rows grow downward while board rows grow upward.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScreenMapping {
    pub left: u16,
    pub top: u16,
    pub cell_cols: u16,
    pub cell_rows: u16,
    pub board_height: u8,
}

impl ScreenMapping {
    /// Top-left terminal cell of board cell `(x, y)`.
    pub fn cell_origin(&self, x: i8, y: i8) -> (u16, u16) {
        let flipped = (self.board_height as i32 - 1 - y as i32).max(0) as u16;
        (
            self.left + x.max(0) as u16 * self.cell_cols,
            self.top + flipped * self.cell_rows,
        )
    }

    /// Fractional board coordinates of a terminal cell; cell centres land on integers.
    pub fn to_grid(&self, column: u16, row: u16) -> (f32, f32) {
        let cols = self.cell_cols.max(1) as f32;
        let rows = self.cell_rows.max(1) as f32;
        let gx = (column as f32 - self.left as f32 + 0.5) / cols - 0.5;
        let from_top = (row as f32 - self.top as f32 + 0.5) / rows - 0.5;
        (gx, self.board_height as f32 - 1.0 - from_top)
    }

    /// World position under a terminal cell.
    pub fn to_world(&self, geometry: &Geometry, column: u16, row: u16) -> Point {
        let (gx, gy) = self.to_grid(column, row);
        geometry.to_world_f(gx, gy)
    }
}

/// Map a mouse event to a pointer gesture. Only the left button drags.
pub fn handle_mouse_event(
    event: MouseEvent,
    screen: &ScreenMapping,
    geometry: &Geometry,
) -> Option<PointerEvent> {
    let world = || screen.to_world(geometry, event.column, event.row);
    match event.kind {
        MouseEventKind::Down(MouseButton::Left) => Some(PointerEvent::Down(world())),
        MouseEventKind::Drag(MouseButton::Left) => Some(PointerEvent::Drag(world())),
        MouseEventKind::Up(MouseButton::Left) => Some(PointerEvent::Up(world())),
        _ => None,
    }
}

//! BoardView: maps a `core::Resolver` into a terminal framebuffer.
//!
//! This module is pure (no I/O). The same [`ScreenMapping`] it lays the board
//! out with is handed to the input layer, so drawn cells and pointer hit tests
//! always agree.

use crate::core::Resolver;
use crate::fb::{FrameBuffer, Rgb, Style};
use crate::input::{Drag, ScreenMapping};
use crate::types::{GridPos, GroupId};

/// Terminal viewport dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u16,
    pub height: u16,
}

impl Viewport {
    pub fn new(width: u16, height: u16) -> Self {
        Self { width, height }
    }
}

/// Per-frame state owned by the player loop rather than the engine.
#[derive(Debug, Clone, Copy, Default)]
pub struct Hud<'a> {
    pub title: &'a str,
    pub status: &'a str,
    pub hint: Option<GroupId>,
    pub drag: Option<Drag>,
}

const GROUP_COLORS: [Rgb; 8] = [
    Rgb::new(170, 60, 60),
    Rgb::new(60, 140, 70),
    Rgb::new(60, 90, 170),
    Rgb::new(170, 140, 40),
    Rgb::new(130, 60, 160),
    Rgb::new(40, 140, 150),
    Rgb::new(180, 90, 40),
    Rgb::new(110, 110, 110),
];

const BORDER: Style = Style::new(Rgb::new(200, 200, 200), Rgb::new(0, 0, 0));
const EMPTY: Style = Style::new(Rgb::new(70, 70, 80), Rgb::new(25, 25, 32));
const TEXT: Style = Style::new(Rgb::new(220, 220, 220), Rgb::new(0, 0, 0));

fn group_style(group: GroupId) -> Style {
    let bg = GROUP_COLORS[group.0 as usize % GROUP_COLORS.len()];
    Style::new(Rgb::new(245, 245, 245), bg)
}

pub struct BoardView {
    /// Board cell width in terminal columns.
    cell_cols: u16,
    /// Board cell height in terminal rows.
    cell_rows: u16,
}

impl Default for BoardView {
    fn default() -> Self {
        Self {
            cell_cols: 8,
            cell_rows: 3,
        }
    }
}

impl BoardView {
    pub fn new(cell_cols: u16, cell_rows: u16) -> Self {
        Self {
            cell_cols: cell_cols.max(1),
            cell_rows: cell_rows.max(1),
        }
    }

    /// Where a `width x height` board lands in `viewport`: centred, below the title line.
    pub fn layout(&self, width: u8, height: u8, viewport: Viewport) -> ScreenMapping {
        let frame_w = width as u16 * self.cell_cols + 2;
        let frame_h = height as u16 * self.cell_rows + 2;
        let start_x = viewport.width.saturating_sub(frame_w) / 2;
        let start_y = (viewport.height.saturating_sub(frame_h) / 2).max(2);
        ScreenMapping {
            left: start_x + 1,
            top: start_y + 1,
            cell_cols: self.cell_cols,
            cell_rows: self.cell_rows,
            board_height: height,
        }
    }

    pub fn render(&self, resolver: &Resolver, hud: &Hud<'_>, viewport: Viewport) -> FrameBuffer {
        let mut fb = FrameBuffer::new(viewport.width, viewport.height);
        let board = resolver.board();
        let screen = self.layout(board.width(), board.height(), viewport);

        let inner_w = board.width() as u16 * self.cell_cols;
        let inner_h = board.height() as u16 * self.cell_rows;
        self.draw_border(&mut fb, screen.left - 1, screen.top - 1, inner_w + 2, inner_h + 2);

        let dragged = hud.drag.map(|drag| drag.origin);
        for pos in board.scan_order() {
            let (col, row) = screen.cell_origin(pos.x, pos.y);
            match board.get_at(pos) {
                Some(tile) => {
                    let mut style = group_style(tile.group());
                    if dragged == Some(pos) {
                        style = style.reverse();
                    }
                    let hinted = hud.hint == Some(tile.group());
                    if hinted {
                        style = style.bold();
                    }
                    fb.fill_rect(col, row, self.cell_cols, self.cell_rows, ' ', style);
                    let label = resolver.level().item_key(tile.item()).unwrap_or("?");
                    self.draw_label(&mut fb, col, row, label, style);
                    if hinted {
                        fb.put_char(col, row, '*', style);
                    }
                }
                None => {
                    fb.fill_rect(col, row, self.cell_cols, self.cell_rows, ' ', EMPTY);
                    fb.put_char(col + self.cell_cols / 2, row + self.cell_rows / 2, '·', EMPTY);
                }
            }
        }

        fb.put_str(0, 0, hud.title, TEXT.bold());
        let progress = format!(
            "rows {}/{}  queue {}",
            resolver.collected_count(),
            resolver.total_groups(),
            resolver.queue().len()
        );
        fb.put_str(
            viewport.width.saturating_sub(progress.len() as u16),
            0,
            &progress,
            TEXT,
        );

        let slots_y = screen.top + inner_h + 1;
        self.draw_slots(&mut fb, resolver, screen.left - 1, slots_y);

        fb.put_str(0, viewport.height.saturating_sub(1), hud.status, TEXT);
        fb
    }

    fn draw_border(&self, fb: &mut FrameBuffer, x: u16, y: u16, w: u16, h: u16) {
        if w < 2 || h < 2 {
            return;
        }
        let right = x + w - 1;
        let bottom = y + h - 1;
        fb.put_char(x, y, '┌', BORDER);
        fb.put_char(right, y, '┐', BORDER);
        fb.put_char(x, bottom, '└', BORDER);
        fb.put_char(right, bottom, '┘', BORDER);
        for cx in x + 1..right {
            fb.put_char(cx, y, '─', BORDER);
            fb.put_char(cx, bottom, '─', BORDER);
        }
        for cy in y + 1..bottom {
            fb.put_char(x, cy, '│', BORDER);
            fb.put_char(right, cy, '│', BORDER);
        }
    }

    /// Item name centred on the cell's middle row, cut to fit.
    fn draw_label(&self, fb: &mut FrameBuffer, col: u16, row: u16, label: &str, style: Style) {
        let room = self.cell_cols.saturating_sub(2) as usize;
        let text: String = label.chars().take(room).collect();
        let len = text.chars().count() as u16;
        let x = col + (self.cell_cols - len) / 2;
        fb.put_str(x, row + self.cell_rows / 2, &text, style);
    }

    /// One indicator per required group: arrivals out of board width once assigned.
    fn draw_slots(&self, fb: &mut FrameBuffer, resolver: &Resolver, x: u16, y: u16) {
        let width = resolver.board().width();
        let mut cx = x;
        for index in 0..resolver.total_groups() {
            let slot = match resolver.indicator_fill(index) {
                Some(arrivals) => format!("[{}/{}]", arrivals.min(width as u32), width),
                None => "[ - ]".to_string(),
            };
            fb.put_str(cx, y, &slot, TEXT);
            cx = cx.saturating_add(slot.chars().count() as u16 + 1);
        }
    }
}

/// Board cell under a terminal cell, if it is inside the board.
pub fn cell_at(resolver: &Resolver, screen: &ScreenMapping, column: u16, row: u16) -> Option<GridPos> {
    let world = screen.to_world(resolver.geometry(), column, row);
    let pos = resolver.geometry().to_cell(world);
    resolver.board().contains(pos).then_some(pos)
}

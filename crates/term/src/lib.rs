//! Terminal presentation for the player binary.
//!
//! Renders into a simple framebuffer that is flushed to the terminal, row by
//! row, only where it changed. Board cells are several characters wide so item
//! names fit and mouse drags have room to land.

pub mod board_view;
pub mod fb;
pub mod renderer;

pub use rowmatch_core as core;
pub use rowmatch_input as input;
pub use rowmatch_types as types;

pub use board_view::{cell_at, BoardView, Hud, Viewport};
pub use fb::{FrameBuffer, Glyph, Rgb, Style};
pub use renderer::TerminalRenderer;

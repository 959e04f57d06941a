//! Terminal backend: owns stdout and flushes changed framebuffer rows.

use std::io::{self, Write};

use anyhow::Result;

use crossterm::cursor::{Hide, MoveTo, Show};
use crossterm::event::{DisableMouseCapture, EnableMouseCapture};
use crossterm::queue;
use crossterm::style::{
    Attribute, Color, Print, ResetColor, SetAttribute, SetBackgroundColor, SetForegroundColor,
};
use crossterm::terminal::{
    self, Clear, ClearType, DisableLineWrap, EnableLineWrap, EnterAlternateScreen,
    LeaveAlternateScreen,
};

use crate::fb::{FrameBuffer, Rgb, Style};

pub struct TerminalRenderer {
    stdout: io::Stdout,
    last: Option<FrameBuffer>,
}

impl Default for TerminalRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl TerminalRenderer {
    pub fn new() -> Self {
        Self {
            stdout: io::stdout(),
            last: None,
        }
    }

    /// Raw mode, alternate screen and mouse capture (drags need it).
    pub fn enter(&mut self) -> Result<()> {
        terminal::enable_raw_mode()?;
        queue!(
            self.stdout,
            EnterAlternateScreen,
            EnableMouseCapture,
            Hide,
            DisableLineWrap
        )?;
        self.stdout.flush()?;
        Ok(())
    }

    pub fn exit(&mut self) -> Result<()> {
        queue!(
            self.stdout,
            ResetColor,
            SetAttribute(Attribute::Reset),
            EnableLineWrap,
            Show,
            DisableMouseCapture,
            LeaveAlternateScreen
        )?;
        self.stdout.flush()?;
        terminal::disable_raw_mode()?;
        Ok(())
    }

    /// Force the next draw to be a full redraw (e.g. after a resize).
    pub fn invalidate(&mut self) {
        self.last = None;
    }

    /// Draw a frame, rewriting only the rows that differ from the last one.
    pub fn draw(&mut self, fb: FrameBuffer) -> Result<()> {
        let rows = match &self.last {
            Some(prev) => changed_rows(prev, &fb),
            None => {
                queue!(self.stdout, Clear(ClearType::All))?;
                (0..fb.height()).collect()
            }
        };

        let mut current: Option<Style> = None;
        for y in rows {
            queue!(self.stdout, MoveTo(0, y))?;
            for glyph in fb.row(y) {
                if current != Some(glyph.style) {
                    self.apply_style(glyph.style)?;
                    current = Some(glyph.style);
                }
                queue!(self.stdout, Print(glyph.ch))?;
            }
        }

        queue!(self.stdout, ResetColor, SetAttribute(Attribute::Reset))?;
        self.stdout.flush()?;
        self.last = Some(fb);
        Ok(())
    }

    fn apply_style(&mut self, style: Style) -> Result<()> {
        queue!(
            self.stdout,
            SetAttribute(Attribute::Reset),
            SetForegroundColor(rgb_to_color(style.fg)),
            SetBackgroundColor(rgb_to_color(style.bg))
        )?;
        if style.bold {
            queue!(self.stdout, SetAttribute(Attribute::Bold))?;
        }
        if style.reverse {
            queue!(self.stdout, SetAttribute(Attribute::Reverse))?;
        }
        Ok(())
    }
}

fn rgb_to_color(rgb: Rgb) -> Color {
    Color::Rgb {
        r: rgb.r,
        g: rgb.g,
        b: rgb.b,
    }
}

/// Rows of `next` that differ from `prev`; all rows when the size changed.
fn changed_rows(prev: &FrameBuffer, next: &FrameBuffer) -> Vec<u16> {
    if prev.width() != next.width() || prev.height() != next.height() {
        return (0..next.height()).collect();
    }
    (0..next.height())
        .filter(|&y| prev.row(y) != next.row(y))
        .collect()
}

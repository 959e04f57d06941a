//! Framebuffer of styled terminal cells.

/// 24-bit RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Style {
    pub fg: Rgb,
    pub bg: Rgb,
    pub bold: bool,
    pub reverse: bool,
}

impl Style {
    pub const fn new(fg: Rgb, bg: Rgb) -> Self {
        Self {
            fg,
            bg,
            bold: false,
            reverse: false,
        }
    }

    pub const fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    pub const fn reverse(mut self) -> Self {
        self.reverse = true;
        self
    }
}

impl Default for Style {
    fn default() -> Self {
        Self::new(Rgb::new(220, 220, 220), Rgb::new(0, 0, 0))
    }
}

/// One terminal cell: a character and its style.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Glyph {
    pub ch: char,
    pub style: Style,
}

impl Default for Glyph {
    fn default() -> Self {
        Self {
            ch: ' ',
            style: Style::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameBuffer {
    width: u16,
    height: u16,
    glyphs: Vec<Glyph>,
}

impl FrameBuffer {
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            width,
            height,
            glyphs: vec![Glyph::default(); width as usize * height as usize],
        }
    }

    pub fn width(&self) -> u16 {
        self.width
    }

    pub fn height(&self) -> u16 {
        self.height
    }

    #[inline(always)]
    fn idx(&self, x: u16, y: u16) -> Option<usize> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some((y as usize) * (self.width as usize) + (x as usize))
    }

    pub fn get(&self, x: u16, y: u16) -> Option<Glyph> {
        self.idx(x, y).map(|i| self.glyphs[i])
    }

    /// Glyphs of screen row `y` (empty past the bottom).
    pub fn row(&self, y: u16) -> &[Glyph] {
        match self.idx(0, y) {
            Some(start) => &self.glyphs[start..start + self.width as usize],
            None => &[],
        }
    }

    pub fn put_char(&mut self, x: u16, y: u16, ch: char, style: Style) {
        if let Some(i) = self.idx(x, y) {
            self.glyphs[i] = Glyph { ch, style };
        }
    }

    /// Write `s` from `(x, y)`, clipped at the right edge.
    pub fn put_str(&mut self, x: u16, y: u16, s: &str, style: Style) {
        for (offset, ch) in s.chars().enumerate() {
            let Some(cx) = x.checked_add(offset as u16) else {
                break;
            };
            if cx >= self.width {
                break;
            }
            self.put_char(cx, y, ch, style);
        }
    }

    pub fn fill_rect(&mut self, x: u16, y: u16, w: u16, h: u16, ch: char, style: Style) {
        for dy in 0..h {
            for dx in 0..w {
                self.put_char(x.saturating_add(dx), y.saturating_add(dy), ch, style);
            }
        }
    }

    /// Every row joined with newlines; handy in tests.
    pub fn text(&self) -> String {
        (0..self.height)
            .map(|y| self.row(y).iter().map(|g| g.ch).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn put_str_clips_at_right_edge() {
        let mut fb = FrameBuffer::new(4, 1);
        fb.put_str(2, 0, "abc", Style::default());
        assert_eq!(fb.text(), "  ab");
    }

    #[test]
    fn out_of_range_writes_are_ignored() {
        let mut fb = FrameBuffer::new(2, 2);
        fb.put_char(5, 0, 'x', Style::default());
        fb.fill_rect(1, 1, 3, 3, '#', Style::default());
        assert_eq!(fb.text(), "  \n #");
        assert!(fb.row(2).is_empty());
    }
}

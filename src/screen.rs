//! Double-buffered screen rendering
//!
//! Widgets draw into a cell buffer. `flush` compares it with what the
//! terminal is known to show and sends only the cells that differ.

use std::io;

use crate::terminal::{sgr, Color, Terminal};

/// A single cell on the screen
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Cell {
    pub ch: char,
    pub fg: Color,
    pub bg: Color,
}

impl Default for Cell {
    fn default() -> Self {
        Self::new(' ', Color::LightGray, Color::Black)
    }
}

impl Cell {
    pub fn new(ch: char, fg: Color, bg: Color) -> Self {
        Self { ch, fg, bg }
    }
}

/// Frame buffer addressed with 1-based (row, col) coordinates
pub struct Screen {
    width: u16,
    height: u16,
    /// Frame being drawn
    cells: Vec<Cell>,
    /// Terminal contents as of the last flush; `None` is unknown
    shown: Vec<Option<Cell>>,
}

impl Screen {
    pub fn new(width: u16, height: u16) -> Self {
        let size = usize::from(width) * usize::from(height);
        Self {
            width,
            height,
            cells: vec![Cell::default(); size],
            shown: vec![None; size],
        }
    }

    pub fn size(&self) -> (u16, u16) {
        (self.width, self.height)
    }

    /// Resize, discarding contents
    pub fn resize(&mut self, width: u16, height: u16) {
        *self = Self::new(width, height);
    }

    fn index(&self, row: u16, col: u16) -> Option<usize> {
        let on_screen = (1..=self.height).contains(&row) && (1..=self.width).contains(&col);
        on_screen.then(|| usize::from(row - 1) * usize::from(self.width) + usize::from(col - 1))
    }

    /// Set one cell; positions off screen are ignored
    pub fn set(&mut self, row: u16, col: u16, ch: char, fg: Color, bg: Color) {
        if let Some(idx) = self.index(row, col) {
            self.cells[idx] = Cell::new(ch, fg, bg);
        }
    }

    #[cfg(test)]
    pub fn get(&self, row: u16, col: u16) -> Option<Cell> {
        self.index(row, col).map(|idx| self.cells[idx])
    }

    /// Write text left to right, clipped at the right edge
    pub fn write_str(&mut self, row: u16, col: u16, s: &str, fg: Color, bg: Color) {
        for (c, ch) in (col..=self.width).zip(s.chars()) {
            self.set(row, c, ch, fg, bg);
        }
    }

    #[allow(clippy::too_many_arguments)]
    pub fn fill(&mut self, row: u16, col: u16, width: u16, height: u16, ch: char, fg: Color, bg: Color) {
        for r in row..row.saturating_add(height) {
            for c in col..col.saturating_add(width) {
                self.set(r, c, ch, fg, bg);
            }
        }
    }

    pub fn clear_with(&mut self, ch: char, fg: Color, bg: Color) {
        self.cells.fill(Cell::new(ch, fg, bg));
    }

    /// Single-line box with a blank interior
    pub fn draw_box(&mut self, row: u16, col: u16, width: u16, height: u16, fg: Color, bg: Color) {
        if width < 2 || height < 2 {
            return;
        }
        let bottom = row + height - 1;
        let right = col + width - 1;

        self.fill(row, col, width, height, ' ', fg, bg);
        for c in col..=right {
            self.set(row, c, '─', fg, bg);
            self.set(bottom, c, '─', fg, bg);
        }
        for r in row..=bottom {
            self.set(r, col, '│', fg, bg);
            self.set(r, right, '│', fg, bg);
        }
        for (r, c, ch) in [(row, col, '┌'), (row, right, '┐'), (bottom, col, '└'), (bottom, right, '┘')] {
            self.set(r, c, ch, fg, bg);
        }
    }

    /// Darken a two-column strip right of a box and the row below it,
    /// offset by one cell like a DOS window shadow
    pub fn draw_shadow(&mut self, row: u16, col: u16, width: u16, height: u16) {
        let right = (row + 1..=row + height).flat_map(|r| [(r, col + width), (r, col + width + 1)]);
        let below = (col + 2..col + width + 2).map(|c| (row + height, c));

        let positions: Vec<(u16, u16)> = right.chain(below).collect();
        for (r, c) in positions {
            if let Some(idx) = self.index(r, c) {
                let cell = &mut self.cells[idx];
                cell.fg = Color::DarkGray;
                cell.bg = Color::Black;
            }
        }
    }

    /// Send changed cells to the terminal
    pub fn flush(&mut self, term: &mut Terminal) -> io::Result<()> {
        let width = usize::from(self.width);
        let mut out = String::new();
        // Index the terminal cursor is known to sit on
        let mut cursor: Option<usize> = None;
        let mut colors: Option<(Color, Color)> = None;

        for (idx, cell) in self.cells.iter().enumerate() {
            if self.shown[idx] == Some(*cell) {
                continue;
            }
            if cursor != Some(idx) {
                out.push_str(&format!("\x1b[{};{}H", idx / width + 1, idx % width + 1));
            }
            if colors != Some((cell.fg, cell.bg)) {
                out.push_str(&sgr(cell.fg, cell.bg));
                colors = Some((cell.fg, cell.bg));
            }
            out.push(cell.ch);
            self.shown[idx] = Some(*cell);
            // Writing the last column leaves the cursor pending a wrap
            cursor = if (idx + 1) % width == 0 { None } else { Some(idx + 1) };
        }

        if !out.is_empty() {
            out.push_str("\x1b[?25l");
            term.write_raw(&out)?;
        }
        term.flush()
    }

    /// Force full redraw on next flush
    pub fn invalidate(&mut self) {
        self.shown.fill(None);
    }
}

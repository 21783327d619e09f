/// Immediate-mode 2D drawing surface.
///
/// The game draws in play-field coordinates through five primitives.  The
/// terminal implementation rasterises them onto a cell buffer and writes
/// the buffer out with crossterm on `present`.
use std::io::Write;

use crossterm::{
    cursor,
    style::{self, Color, Print},
    QueueableCommand,
};

use crate::assets::{Glyph, ImageHandle};
use crate::entities::Rect;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Align {
    Left,
    Center,
    Right,
}

pub trait Surface {
    /// Logical width in play-field units.
    fn width(&self) -> i32;
    fn height(&self) -> i32;

    fn clear(&mut self);
    /// Fill `rect`.  An `opacity` below 1 blends over what is already there.
    fn fill_rect(&mut self, rect: Rect, color: Color, opacity: f32);
    fn draw_image(&mut self, image: ImageHandle, rect: Rect);
    fn fill_text(&mut self, text: &str, x: i32, y: i32, align: Align, color: Color);
    fn stroke_line(&mut self, from: (f32, f32), to: (f32, f32), color: Color, width: f32);
}

// ── Terminal implementation ──────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Cell {
    pub ch: char,
    pub fg: Color,
    pub bg: Color,
    /// How many translucent fills this cell has been through.
    fade: u8,
}

impl Cell {
    const BLANK: Cell = Cell {
        ch: ' ',
        fg: Color::White,
        bg: Color::Black,
        fade: 0,
    };
}

pub struct TerminalSurface<W: Write> {
    out: W,
    cols: u16,
    rows: u16,
    width: i32,
    height: i32,
    cells: Vec<Cell>,
    atlas: Vec<Glyph>,
}

impl<W: Write> TerminalSurface<W> {
    /// A `cols`×`rows` terminal showing a `width`×`height` play field.
    pub fn new(out: W, cols: u16, rows: u16, width: i32, height: i32, atlas: Vec<Glyph>) -> Self {
        TerminalSurface {
            out,
            cols,
            rows,
            width,
            height,
            cells: vec![Cell::BLANK; cols as usize * rows as usize],
            atlas,
        }
    }

    pub fn set_atlas(&mut self, atlas: Vec<Glyph>) {
        self.atlas = atlas;
    }

    pub fn resize(&mut self, cols: u16, rows: u16) {
        self.cols = cols;
        self.rows = rows;
        self.cells = vec![Cell::BLANK; cols as usize * rows as usize];
    }

    pub fn cell(&self, col: u16, row: u16) -> Option<&Cell> {
        if col < self.cols && row < self.rows {
            self.cells.get(row as usize * self.cols as usize + col as usize)
        } else {
            None
        }
    }

    /// The characters of one row, trailing blanks included.
    pub fn row_text(&self, row: u16) -> String {
        (0..self.cols)
            .filter_map(|c| self.cell(c, row).map(|cell| cell.ch))
            .collect()
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn to_col(&self, x: f32) -> i32 {
        (x * self.cols as f32 / self.width as f32).floor() as i32
    }

    fn to_row(&self, y: f32) -> i32 {
        (y * self.rows as f32 / self.height as f32).floor() as i32
    }

    fn put(&mut self, col: i32, row: i32, ch: char, fg: Color) {
        if col < 0 || row < 0 || col >= self.cols as i32 || row >= self.rows as i32 {
            return;
        }
        let idx = row as usize * self.cols as usize + col as usize;
        let cell = &mut self.cells[idx];
        cell.ch = ch;
        cell.fg = fg;
        cell.fade = 0;
    }

    /// Write the buffer to the terminal.
    pub fn present(&mut self) -> std::io::Result<()> {
        let mut fg = None;
        let mut bg = None;
        for row in 0..self.rows {
            self.out.queue(cursor::MoveTo(0, row))?;
            for col in 0..self.cols {
                let cell = self.cells[row as usize * self.cols as usize + col as usize];
                if fg != Some(cell.fg) {
                    self.out.queue(style::SetForegroundColor(cell.fg))?;
                    fg = Some(cell.fg);
                }
                if bg != Some(cell.bg) {
                    self.out.queue(style::SetBackgroundColor(cell.bg))?;
                    bg = Some(cell.bg);
                }
                self.out.queue(Print(cell.ch))?;
            }
        }
        self.out.queue(style::ResetColor)?;
        self.out.flush()
    }
}

impl<W: Write> Surface for TerminalSurface<W> {
    fn width(&self) -> i32 {
        self.width
    }

    fn height(&self) -> i32 {
        self.height
    }

    fn clear(&mut self) {
        self.cells.fill(Cell::BLANK);
    }

    fn fill_rect(&mut self, rect: Rect, color: Color, opacity: f32) {
        let c0 = self.to_col(rect.left as f32).max(0);
        let c1 = self.to_col(rect.right as f32).min(self.cols as i32);
        let r0 = self.to_row(rect.top as f32).max(0);
        let r1 = self.to_row(rect.bottom as f32).min(self.rows as i32);

        for row in r0..r1 {
            for col in c0..c1 {
                let idx = row as usize * self.cols as usize + col as usize;
                let cell = &mut self.cells[idx];
                if opacity >= 1.0 {
                    *cell = Cell {
                        ch: ' ',
                        fg: color,
                        bg: color,
                        fade: 0,
                    };
                    continue;
                }
                if cell.ch == ' ' {
                    continue;
                }
                cell.fade = cell.fade.saturating_add(1);
                if cell.fade as f32 * opacity >= 1.0 {
                    *cell = Cell::BLANK;
                } else {
                    cell.fg = Color::DarkGrey;
                }
            }
        }
    }

    fn draw_image(&mut self, image: ImageHandle, rect: Rect) {
        let glyph = match self.atlas.get(image.index()) {
            Some(g) => g.clone(),
            None => return,
        };
        let c0 = self.to_col(rect.left as f32);
        let c1 = self.to_col(rect.right as f32).max(c0 + 1);
        let row = self.to_row(rect.top as f32);
        let span = c1 - c0;

        for (dy, line) in glyph.rows.iter().enumerate() {
            let len = line.chars().count() as i32;
            let start = c0 + (span - len).max(0) / 2;
            for (dx, ch) in line.chars().enumerate() {
                if ch != ' ' {
                    self.put(start + dx as i32, row + dy as i32, ch, glyph.color);
                }
            }
        }
    }

    fn fill_text(&mut self, text: &str, x: i32, y: i32, align: Align, color: Color) {
        let len = text.chars().count() as i32;
        let anchor = self.to_col(x as f32);
        let start = match align {
            Align::Left => anchor,
            Align::Center => anchor - len / 2,
            Align::Right => anchor - len,
        };
        let row = self.to_row(y as f32);
        for (i, ch) in text.chars().enumerate() {
            self.put(start + i as i32, row, ch, color);
        }
    }

    fn stroke_line(&mut self, from: (f32, f32), to: (f32, f32), color: Color, width: f32) {
        if !(from.0.is_finite() && from.1.is_finite() && to.0.is_finite() && to.1.is_finite()) {
            return;
        }
        let (mut x0, mut y0) = (self.to_col(from.0), self.to_row(from.1));
        let (x1, y1) = (self.to_col(to.0), self.to_row(to.1));

        // Skip lines far outside the grid.
        let limit = 2 * (self.cols as i32 + self.rows as i32);
        if x0.abs().max(y0.abs()).max(x1.abs()).max(y1.abs()) > limit {
            return;
        }

        let ch = if width >= 2.0 { '•' } else { '·' };
        let dx = (x1 - x0).abs();
        let dy = -(y1 - y0).abs();
        let sx = if x0 < x1 { 1 } else { -1 };
        let sy = if y0 < y1 { 1 } else { -1 };
        let mut err = dx + dy;
        loop {
            self.put(x0, y0, ch, color);
            if x0 == x1 && y0 == y1 {
                break;
            }
            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x0 += sx;
            }
            if e2 <= dx {
                err += dx;
                y0 += sy;
            }
        }
    }
}

use crossterm::cursor::MoveTo;
use crossterm::style::{Color, Print, ResetColor, SetForegroundColor};
use crossterm::terminal::{self, Clear, ClearType};
use crossterm::QueueableCommand;
use std::io::{self, Stdout, Write};
use unicode_width::UnicodeWidthStr;

use crate::engine::{Rect, Surface, COLOR_GRASS};

const CELL_COLS: u16 = 2;
const BORDER_COLOR: Color = Color::DarkGrey;

#[derive(Clone, Copy, PartialEq)]
struct CellDraw {
    color: Color,
    eighths: u8,
}

const EMPTY: CellDraw = CellDraw {
    color: Color::Reset,
    eighths: 0,
};

/// Terminal implementation of the pixel-space `Surface`: each grid cell is
/// two terminal columns, and sub-cell fill rectangles are quantized to a
/// per-cell coverage level rendered as shade glyphs. Only cells whose
/// appearance changed since the last flush are reprinted.
pub struct TermSurface {
    dimension: usize,
    cell_px: u16,
    cells: Vec<CellDraw>,
    drawn: Vec<Option<CellDraw>>,
    last_hud: String,
    needs_full: bool,
    origin_x: u16,
    origin_y: u16,
}

impl TermSurface {
    pub fn new(dimension: usize, cell_px: u16) -> Self {
        Self {
            dimension,
            cell_px,
            cells: vec![EMPTY; dimension * dimension],
            drawn: vec![None; dimension * dimension],
            last_hud: String::new(),
            needs_full: true,
            origin_x: 0,
            origin_y: 0,
        }
    }

    fn glyph(eighths: u8) -> &'static str {
        match eighths {
            0 => "  ",
            1..=2 => "░░",
            3..=5 => "▒▒",
            6..=7 => "▓▓",
            _ => "██",
        }
    }

    /// Push pending cell and HUD changes to the terminal, re-centering and
    /// redrawing everything when the terminal was resized.
    pub fn flush(&mut self, stdout: &mut Stdout, hud: &str) -> io::Result<()> {
        let needed_w = self.dimension as u16 * CELL_COLS + 2;
        let needed_h = self.dimension as u16 + 3;

        stdout.queue(MoveTo(0, 0))?;
        let (term_w, term_h) = terminal::size()?;
        if term_w < needed_w || term_h < needed_h {
            stdout.queue(Clear(ClearType::All))?;
            let msg = format!(
                "Terminal too small. Need at least {}x{} (cols x rows). Current: {}x{}.",
                needed_w, needed_h, term_w, term_h
            );
            stdout.queue(Print(msg))?;
            stdout.flush()?;
            self.needs_full = true;
            return Ok(());
        }

        let origin_x = (term_w - needed_w) / 2;
        let origin_y = (term_h - needed_h) / 2;
        if origin_x != self.origin_x || origin_y != self.origin_y {
            self.origin_x = origin_x;
            self.origin_y = origin_y;
            self.needs_full = true;
        }

        if self.needs_full {
            stdout.queue(Clear(ClearType::All))?;
            self.draw_border(stdout)?;
            self.drawn.fill(None);
            self.last_hud.clear();
        }

        if hud != self.last_hud {
            stdout.queue(MoveTo(self.origin_x, self.origin_y))?;
            stdout.queue(SetForegroundColor(Color::White))?;
            stdout.queue(Clear(ClearType::CurrentLine))?;
            stdout.queue(Print(hud))?;
            stdout.queue(ResetColor)?;
            self.last_hud = hud.to_string();
        }

        for idx in 0..self.cells.len() {
            if self.drawn[idx] != Some(self.cells[idx]) {
                self.drawn[idx] = Some(self.cells[idx]);
                self.draw_cell(stdout, idx)?;
            }
        }
        self.needs_full = false;

        stdout.flush()?;
        Ok(())
    }

    fn draw_border(&self, stdout: &mut Stdout) -> io::Result<()> {
        let inner = "─".repeat(self.dimension * CELL_COLS as usize);
        stdout.queue(SetForegroundColor(BORDER_COLOR))?;
        stdout.queue(MoveTo(self.origin_x, self.origin_y + 1))?;
        stdout.queue(Print(format!("┌{}┐", inner)))?;
        for y in 0..self.dimension as u16 {
            stdout.queue(MoveTo(self.origin_x, self.origin_y + 2 + y))?;
            stdout.queue(Print("│"))?;
            stdout.queue(MoveTo(
                self.origin_x + 1 + self.dimension as u16 * CELL_COLS,
                self.origin_y + 2 + y,
            ))?;
            stdout.queue(Print("│"))?;
        }
        stdout.queue(MoveTo(
            self.origin_x,
            self.origin_y + 2 + self.dimension as u16,
        ))?;
        stdout.queue(Print(format!("└{}┘", inner)))?;
        stdout.queue(ResetColor)?;
        Ok(())
    }

    fn draw_cell(&self, stdout: &mut Stdout, idx: usize) -> io::Result<()> {
        let cell = self.cells[idx];
        let text = Self::glyph(cell.eighths);
        let x = (idx % self.dimension) as u16;
        let y = (idx / self.dimension) as u16;
        stdout.queue(MoveTo(self.origin_x + 1 + x * CELL_COLS, self.origin_y + 2 + y))?;
        stdout.queue(SetForegroundColor(cell.color))?;
        stdout.queue(Print(text))?;
        let w = UnicodeWidthStr::width(text);
        for _ in w..CELL_COLS as usize {
            stdout.queue(Print(' '))?;
        }
        stdout.queue(ResetColor)?;
        Ok(())
    }

    #[cfg(test)]
    fn coverage(&self, cx: usize, cy: usize) -> (Color, u8) {
        let cell = self.cells[cy * self.dimension + cx];
        (cell.color, cell.eighths)
    }
}

impl Surface for TermSurface {
    fn fill_rect(&mut self, rect: Rect, color: Color) {
        if rect.w == 0 || rect.h == 0 {
            return;
        }
        let px = self.cell_px as u32;
        let x0 = rect.x as u32;
        let y0 = rect.y as u32;
        let x1 = x0 + rect.w as u32;
        let y1 = y0 + rect.h as u32;
        let last = self.dimension - 1;
        for cy in ((y0 / px) as usize)..=(((y1 - 1) / px) as usize).min(last) {
            for cx in ((x0 / px) as usize)..=(((x1 - 1) / px) as usize).min(last) {
                let left = cx as u32 * px;
                let top = cy as u32 * px;
                let ox = x1.min(left + px).saturating_sub(x0.max(left));
                let oy = y1.min(top + px).saturating_sub(y0.max(top));
                let covered = (((ox * oy) as f64 / (px * px) as f64) * 8.0).round() as u8;
                let slot = &mut self.cells[cy * self.dimension + cx];
                if color == COLOR_GRASS {
                    // Grass is the board background: a background fill
                    // drains foreground coverage instead of adding it.
                    slot.eighths = slot.eighths.min(8 - covered.min(8));
                    if slot.eighths == 0 {
                        *slot = EMPTY;
                    }
                } else {
                    *slot = CellDraw {
                        color,
                        eighths: covered.min(8),
                    };
                }
            }
        }
    }
}

//! World-space drawing onto a grid of terminal cells.

use glam::Vec2;
use ratatui::prelude::*;

use crate::sim::Aabb;

#[derive(Clone, Copy)]
struct Cell {
    ch: char,
    fg: Color,
    bg: Color,
    bold: bool,
}

pub struct Surface {
    cols: usize,
    rows: usize,
    sx: f32,
    sy: f32,
    cells: Vec<Vec<Cell>>,
}

impl Surface {
    pub fn new(area: Rect, world_w: f32, world_h: f32, bg: Color) -> Self {
        let cols = area.width as usize;
        let rows = area.height as usize;
        let blank = Cell { ch: ' ', fg: Color::Reset, bg, bold: false };
        Self {
            cols,
            rows,
            sx: cols as f32 / world_w.max(1.0),
            sy: rows as f32 / world_h.max(1.0),
            cells: vec![vec![blank; cols]; rows],
        }
    }

    /// Vertical background blend from `top` to `bottom`.
    pub fn gradient(&mut self, top: (u8, u8, u8), bottom: (u8, u8, u8)) {
        let n = self.rows.max(2) - 1;
        for (y, row) in self.cells.iter_mut().enumerate() {
            let t = y as f32 / n as f32;
            let bg = lerp_rgb(top, bottom, t);
            for cell in row.iter_mut() {
                cell.bg = bg;
            }
        }
    }

    fn cell_of(&self, x: f32, y: f32) -> Option<(usize, usize)> {
        let cx = (x * self.sx).floor();
        let cy = (y * self.sy).floor();
        if cx < 0.0 || cy < 0.0 {
            return None;
        }
        let (cx, cy) = (cx as usize, cy as usize);
        (cx < self.cols && cy < self.rows).then_some((cx, cy))
    }

    fn put(&mut self, col: usize, row: usize, ch: char, fg: Color, bold: bool) {
        if let Some(cell) = self.cells.get_mut(row).and_then(|r| r.get_mut(col)) {
            cell.ch = ch;
            cell.fg = fg;
            cell.bold = bold;
        }
    }

    pub fn plot(&mut self, p: Vec2, ch: char, fg: Color) {
        if let Some((c, r)) = self.cell_of(p.x, p.y) {
            self.put(c, r, ch, fg, false);
        }
    }

    pub fn plot_bold(&mut self, p: Vec2, ch: char, fg: Color) {
        if let Some((c, r)) = self.cell_of(p.x, p.y) {
            self.put(c, r, ch, fg, true);
        }
    }

    /// Fill every cell the box covers; a box smaller than a cell still
    /// paints the cell holding its top-left corner.
    pub fn fill_rect(&mut self, b: Aabb, ch: char, fg: Color) {
        let c0 = (b.x * self.sx).floor().max(0.0) as usize;
        let r0 = (b.y * self.sy).floor().max(0.0) as usize;
        let c1 = ((b.right() * self.sx).ceil() as usize).max(c0 + 1).min(self.cols);
        let r1 = ((b.bottom() * self.sy).ceil() as usize).max(r0 + 1).min(self.rows);
        if b.right() < 0.0 || b.bottom() < 0.0 {
            return;
        }
        for r in r0..r1 {
            for c in c0..c1 {
                self.put(c, r, ch, fg, false);
            }
        }
    }

    /// Paint the background colour of the cells under a box.
    pub fn shade_rect(&mut self, b: Aabb, bg: Color) {
        if b.right() < 0.0 || b.bottom() < 0.0 {
            return;
        }
        let c0 = (b.x * self.sx).floor().max(0.0) as usize;
        let r0 = (b.y * self.sy).floor().max(0.0) as usize;
        let c1 = ((b.right() * self.sx).ceil() as usize).min(self.cols);
        let r1 = ((b.bottom() * self.sy).ceil() as usize).min(self.rows);
        for r in r0..r1 {
            for c in c0..c1 {
                self.cells[r][c].bg = bg;
            }
        }
    }

    /// Filled circle; always marks at least the centre cell.
    pub fn disc(&mut self, center: Vec2, r: f32, ch: char, fg: Color) {
        let bb = Aabb::new(center.x - r, center.y - r, r * 2.0, r * 2.0);
        let c0 = (bb.x * self.sx).floor().max(0.0) as usize;
        let r0 = (bb.y * self.sy).floor().max(0.0) as usize;
        let c1 = ((bb.right() * self.sx).ceil().max(0.0) as usize).min(self.cols);
        let r1 = ((bb.bottom() * self.sy).ceil().max(0.0) as usize).min(self.rows);
        for row in r0..r1 {
            for col in c0..c1 {
                let wx = (col as f32 + 0.5) / self.sx;
                let wy = (row as f32 + 0.5) / self.sy;
                if Vec2::new(wx, wy).distance(center) <= r {
                    self.put(col, row, ch, fg, false);
                }
            }
        }
        self.plot_bold(center, ch, fg);
    }

    /// Text centred horizontally on a cell row counted from the middle
    /// of the surface (negative rows are above it).
    pub fn banner(&mut self, row_offset: i32, s: &str, fg: Color) {
        let row = self.rows as i32 / 2 + row_offset;
        if row < 0 || row as usize >= self.rows {
            return;
        }
        let len = s.chars().count();
        let start = self.cols.saturating_sub(len) / 2;
        for (i, ch) in s.chars().enumerate() {
            self.put(start + i, row as usize, ch, fg, true);
        }
    }

    /// Darken everything already drawn, like a translucent overlay.
    pub fn dim(&mut self, amount: f32) {
        for row in &mut self.cells {
            for cell in row.iter_mut() {
                cell.fg = fade(cell.fg, 1.0 - amount);
                cell.bg = fade(cell.bg, 1.0 - amount);
            }
        }
    }

    pub fn into_lines(self) -> Vec<Line<'static>> {
        self.cells
            .into_iter()
            .map(|row| {
                let spans: Vec<Span<'static>> = row
                    .into_iter()
                    .map(|cell| {
                        let mut style = Style::default().fg(cell.fg).bg(cell.bg);
                        if cell.bold {
                            style = style.add_modifier(Modifier::BOLD);
                        }
                        Span::styled(String::from(cell.ch), style)
                    })
                    .collect();
                Line::from(spans)
            })
            .collect()
    }
}

/// Scale an RGB colour toward black; other colours pass through.
pub fn fade(color: Color, amount: f32) -> Color {
    match color {
        Color::Rgb(r, g, b) => {
            let k = amount.clamp(0.0, 1.0);
            Color::Rgb((r as f32 * k) as u8, (g as f32 * k) as u8, (b as f32 * k) as u8)
        }
        other => other,
    }
}

/// Push an RGB colour toward white.
pub fn brighten(color: Color, amount: f32) -> Color {
    match color {
        Color::Rgb(r, g, b) => {
            let up = |c: u8| (c as f32 + (255.0 - c as f32) * amount.clamp(0.0, 1.0)) as u8;
            Color::Rgb(up(r), up(g), up(b))
        }
        other => other,
    }
}

pub fn lerp_rgb(a: (u8, u8, u8), b: (u8, u8, u8), t: f32) -> Color {
    let t = t.clamp(0.0, 1.0);
    let mix = |x: u8, y: u8| (x as f32 + (y as f32 - x as f32) * t) as u8;
    Color::Rgb(mix(a.0, b.0), mix(a.1, b.1), mix(a.2, b.2))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chars(surface: Surface) -> Vec<String> {
        surface
            .into_lines()
            .into_iter()
            .map(|line| line.spans.iter().map(|s| s.content.to_string()).collect())
            .collect()
    }

    #[test]
    fn test_world_scales_onto_cells() {
        let mut s = Surface::new(Rect::new(0, 0, 8, 6), 800.0, 600.0, Color::Black);
        s.plot(Vec2::new(450.0, 150.0), '●', Color::White);
        let rows = chars(s);
        assert_eq!(rows[1].chars().nth(4), Some('●'));
    }

    #[test]
    fn test_small_rect_still_visible() {
        let mut s = Surface::new(Rect::new(0, 0, 8, 6), 800.0, 600.0, Color::Black);
        s.fill_rect(Aabb::new(210.0, 310.0, 5.0, 5.0), '█', Color::Red);
        let rows = chars(s);
        assert_eq!(rows[3], "  █     ");
    }

    #[test]
    fn test_offscreen_drawing_is_ignored() {
        let mut s = Surface::new(Rect::new(0, 0, 4, 4), 100.0, 100.0, Color::Black);
        s.plot(Vec2::new(-10.0, 50.0), 'x', Color::White);
        s.fill_rect(Aabb::new(-50.0, 0.0, 20.0, 20.0), 'x', Color::White);
        s.disc(Vec2::new(500.0, 500.0), 3.0, 'x', Color::White);
        assert!(chars(s).iter().all(|r| r == "    "));
    }

    #[test]
    fn test_fade_scales_rgb() {
        assert_eq!(fade(Color::Rgb(200, 100, 50), 0.5), Color::Rgb(100, 50, 25));
        assert_eq!(fade(Color::Red, 0.5), Color::Red);
    }
}

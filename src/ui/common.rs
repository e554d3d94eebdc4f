//! Shared UI pieces: a cell buffer for scaled scenes, the standard panel
//! layout and the two-line status bar.

use crate::math::Color as RgbColor;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

pub fn tui_color(color: RgbColor) -> Color {
    Color::Rgb(color.r, color.g, color.b)
}

/// Black or white, whichever reads better on `bg`.
pub fn contrast_color(bg: RgbColor) -> Color {
    let luma = 0.299 * bg.r as f32 + 0.587 * bg.g as f32 + 0.114 * bg.b as f32;
    if luma > 140.0 {
        Color::Black
    } else {
        Color::White
    }
}

/// Cell in the render buffer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cell {
    pub ch: char,
    pub fg: Color,
    pub bg: Color,
}

impl Default for Cell {
    fn default() -> Self {
        Self {
            ch: ' ',
            fg: Color::Reset,
            bg: Color::Reset,
        }
    }
}

/// Something drawn into a scaled scene: a filled rectangle with an optional
/// label written from its top-left corner.
#[derive(Debug, Clone)]
pub struct Sprite {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
    pub color: RgbColor,
    pub label: Option<String>,
    pub highlighted: bool,
}

/// A grid of cells mapped onto a logical world of `world_w` x `world_h`.
#[derive(Debug, Clone)]
pub struct CellBuffer {
    pub width: u16,
    pub height: u16,
    cells: Vec<Vec<Cell>>,
    world_w: f32,
    world_h: f32,
}

impl CellBuffer {
    pub fn new(width: u16, height: u16, world_w: f32, world_h: f32, bg: Color) -> Self {
        let fill = Cell {
            bg,
            ..Cell::default()
        };
        Self {
            width,
            height,
            cells: vec![vec![fill; width as usize]; height as usize],
            world_w: world_w.max(1.0),
            world_h: world_h.max(1.0),
        }
    }

    /// World point to cell, or `None` when it falls outside the grid.
    pub fn to_cell(&self, x: f32, y: f32) -> Option<(usize, usize)> {
        let col = (x / self.world_w * self.width as f32).floor();
        let row = (y / self.world_h * self.height as f32).floor();
        if col < 0.0 || row < 0.0 || col >= self.width as f32 || row >= self.height as f32 {
            return None;
        }
        Some((col as usize, row as usize))
    }

    /// Cell center back to world coordinates.
    pub fn to_world(&self, col: u16, row: u16) -> (f32, f32) {
        (
            (col as f32 + 0.5) * self.world_w / self.width.max(1) as f32,
            (row as f32 + 0.5) * self.world_h / self.height.max(1) as f32,
        )
    }

    pub fn get(&self, col: usize, row: usize) -> Option<&Cell> {
        self.cells.get(row).and_then(|r| r.get(col))
    }

    pub fn set(&mut self, col: usize, row: usize, cell: Cell) {
        if let Some(slot) = self.cells.get_mut(row).and_then(|r| r.get_mut(col)) {
            *slot = cell;
        }
    }

    /// Write `text` starting at a cell, keeping each cell's background.
    pub fn put_str(&mut self, col: usize, row: usize, text: &str, fg: Color) {
        for (i, ch) in text.chars().enumerate() {
            if let Some(slot) = self.cells.get_mut(row).and_then(|r| r.get_mut(col + i)) {
                slot.ch = ch;
                slot.fg = fg;
            }
        }
    }

    /// Fill the world-space rectangle. Anything non-empty on the grid covers
    /// at least one cell; anything off the grid paints nothing.
    pub fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32, bg: Color) {
        let sx = self.width as f32 / self.world_w;
        let sy = self.height as f32 / self.world_h;
        let c0 = (x * sx).floor() as i64;
        let r0 = (y * sy).floor() as i64;
        let c1 = (((x + w) * sx).ceil() as i64).max(c0 + 1);
        let r1 = (((y + h) * sy).ceil() as i64).max(r0 + 1);
        if c1 <= 0 || r1 <= 0 {
            return;
        }
        for row in r0.max(0)..r1.min(self.height as i64) {
            for col in c0.max(0)..c1.min(self.width as i64) {
                let slot = &mut self.cells[row as usize][col as usize];
                slot.bg = bg;
                slot.ch = ' ';
            }
        }
    }

    pub fn draw_sprite(&mut self, sprite: &Sprite) {
        if sprite.w > 0.0 && sprite.h > 0.0 {
            self.fill_rect(sprite.x, sprite.y, sprite.w, sprite.h, tui_color(sprite.color));
        }
        // Labels anchor at the origin; an origin off the grid hides them
        if let Some((col, row)) = self.to_cell(sprite.x, sprite.y) {
            if let Some(label) = &sprite.label {
                let fg = if sprite.w > 0.0 && sprite.h > 0.0 {
                    contrast_color(sprite.color)
                } else {
                    tui_color(sprite.color)
                };
                self.put_str(col, row, label, fg);
            }
            if sprite.highlighted {
                if let Some(cell) = self.cells.get_mut(row).and_then(|r| r.get_mut(col)) {
                    cell.ch = '#';
                    cell.fg = Color::Yellow;
                }
            }
        }
    }

    /// Render row by row, merging runs of equal style into one span.
    pub fn render(&self, frame: &mut Frame, area: Rect) {
        for (row_idx, row) in self.cells.iter().enumerate().take(area.height as usize) {
            let mut spans: Vec<Span> = Vec::new();
            let mut current_fg = Color::Reset;
            let mut current_bg = Color::Reset;
            let mut current_text = String::new();

            for cell in row.iter().take(area.width as usize) {
                if (cell.fg != current_fg || cell.bg != current_bg) && !current_text.is_empty() {
                    spans.push(Span::styled(
                        std::mem::take(&mut current_text),
                        Style::default().fg(current_fg).bg(current_bg),
                    ));
                }
                current_fg = cell.fg;
                current_bg = cell.bg;
                current_text.push(cell.ch);
            }
            if !current_text.is_empty() {
                spans.push(Span::styled(
                    current_text,
                    Style::default().fg(current_fg).bg(current_bg),
                ));
            }

            let row_area = Rect::new(area.x, area.y + row_idx as u16, area.width, 1);
            frame.render_widget(Paragraph::new(Line::from(spans)), row_area);
        }
    }

    #[cfg(test)]
    pub fn row_text(&self, row: usize) -> String {
        self.cells[row].iter().map(|c| c.ch).collect()
    }
}

/// Areas returned by `create_layout`.
pub struct PanelLayout {
    pub content: Rect,
    /// Two lines at the bottom of the content column
    pub status_bar: Rect,
    pub info_panel: Rect,
}

/// Bordered panel split into content, a status bar below it and an info
/// column on the right.
pub fn create_layout(
    frame: &mut Frame,
    area: Rect,
    title: &str,
    border_color: Color,
    info_panel_width: u16,
) -> PanelLayout {
    frame.render_widget(Clear, area);

    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let h_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(20), Constraint::Length(info_panel_width)])
        .split(inner);

    let v_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(2)])
        .split(h_chunks[0]);

    PanelLayout {
        content: v_chunks[0],
        status_bar: v_chunks[1],
        info_panel: h_chunks[1],
    }
}

/// Status message on the first line, key hints on the second.
pub fn render_status_bar(
    frame: &mut Frame,
    area: Rect,
    status_text: &str,
    status_color: Color,
    controls: &[(&str, &str)],
) {
    if area.height < 1 {
        return;
    }

    let status = Paragraph::new(status_text)
        .style(Style::default().fg(status_color))
        .alignment(Alignment::Center);
    frame.render_widget(status, Rect { height: 1, ..area });

    if area.height >= 2 && !controls.is_empty() {
        let mut spans = Vec::new();
        for (i, (key, action)) in controls.iter().enumerate() {
            if i > 0 {
                spans.push(Span::raw("  "));
            }
            spans.push(Span::styled(*key, Style::default().fg(Color::White)));
            spans.push(Span::styled(
                format!(" {}", action),
                Style::default().fg(Color::DarkGray),
            ));
        }
        frame.render_widget(
            Paragraph::new(Line::from(spans)).alignment(Alignment::Center),
            Rect {
                y: area.y + 1,
                height: 1,
                ..area
            },
        );
    }
}

pub fn render_too_small(frame: &mut Frame, area: Rect, title: &str, min_w: u16, min_h: u16) {
    let text = format!(
        "{}: terminal too small ({}x{}, need {}x{})",
        title, area.width, area.height, min_w, min_h
    );
    frame.render_widget(
        Paragraph::new(text)
            .style(Style::default().fg(Color::Yellow))
            .alignment(Alignment::Center),
        area,
    );
}

/// A centered rectangle of at most `width` x `height` inside `area`.
pub fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let w = width.min(area.width);
    let h = height.min(area.height);
    Rect::new(
        area.x + (area.width - w) / 2,
        area.y + (area.height - h) / 2,
        w,
        h,
    )
}

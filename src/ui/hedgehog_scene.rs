//! Top-down terminal view of the hedgehog platformer.
//!
//! The camera looks straight down, centered on the player. Platforms shade
//! by height; rings, springs and spikes are single glyphs.

use super::common::{
    create_layout, render_status_bar, render_too_small, tui_color, Cell, CellBuffer,
};
use crate::platformer::{HedgehogSession, PlatformerInput};
use crossterm::event::KeyCode;
use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::Line,
    widgets::Paragraph,
    Frame,
};

/// World units across the view at the narrowest terminal dimension.
const VIEW_SPAN: f32 = 60.0;

/// Seconds a steering key stays held; terminals never report releases.
const HOLD_SECS: f32 = 0.2;

/// Turns terminal key presses into held stick input.
#[derive(Debug, Clone, Default)]
pub struct HedgehogControls {
    move_x: f32,
    move_z: f32,
    hold_x: f32,
    hold_z: f32,
    jump: bool,
    spin: bool,
}

impl HedgehogControls {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn press(&mut self, code: KeyCode) {
        match code {
            KeyCode::Left | KeyCode::Char('a') => {
                self.move_x = -1.0;
                self.hold_x = HOLD_SECS;
            }
            KeyCode::Right | KeyCode::Char('d') => {
                self.move_x = 1.0;
                self.hold_x = HOLD_SECS;
            }
            KeyCode::Up | KeyCode::Char('w') => {
                self.move_z = 1.0;
                self.hold_z = HOLD_SECS;
            }
            KeyCode::Down | KeyCode::Char('s') => {
                self.move_z = -1.0;
                self.hold_z = HOLD_SECS;
            }
            KeyCode::Char(' ') => self.jump = true,
            KeyCode::Char('e') => self.spin = true,
            _ => {}
        }
    }

    /// Input for the next tick of `dt` seconds. Presses are consumed.
    pub fn take_input(&mut self, dt: f32) -> PlatformerInput {
        let input = PlatformerInput {
            move_x: self.move_x,
            move_z: self.move_z,
            jump: std::mem::take(&mut self.jump),
            spin: std::mem::take(&mut self.spin),
        };
        self.hold_x -= dt;
        if self.hold_x <= 0.0 {
            self.move_x = 0.0;
        }
        self.hold_z -= dt;
        if self.hold_z <= 0.0 {
            self.move_z = 0.0;
        }
        input
    }
}

/// Rasterize the level around the player. Cells are twice as tall as wide,
/// so each row covers two columns' worth of world z.
pub fn level_buffer(session: &HedgehogSession, width: u16, height: u16) -> CellBuffer {
    let mut buffer = CellBuffer::new(width, height, width as f32, height as f32, Color::Black);
    let player = &session.player;
    let scale = VIEW_SPAN / width.min(height * 2).max(1) as f32;
    let half_w = width as f32 / 2.0;
    let half_h = height as f32 / 2.0;

    // World x grows to the right, world z grows upward on screen
    let to_cell = |x: f32, z: f32| -> Option<(usize, usize)> {
        let col = half_w + (x - player.position.x) / scale;
        let row = half_h - (z - player.position.z) / (scale * 2.0);
        if col < 0.0 || row < 0.0 || col >= width as f32 || row >= height as f32 {
            None
        } else {
            Some((col as usize, row as usize))
        }
    };

    let mut platforms: Vec<_> = session.level.platforms.iter().collect();
    platforms.sort_by(|a, b| a.aabb().max.y.total_cmp(&b.aabb().max.y));
    for platform in platforms {
        let bounds = platform.aabb();
        for row in 0..height {
            for col in 0..width {
                let x = player.position.x + (col as f32 + 0.5 - half_w) * scale;
                let z = player.position.z - (row as f32 + 0.5 - half_h) * scale * 2.0;
                if bounds.covers_xz(x, z) {
                    let shade = if platform.pitch_deg != 0.0 { '/' } else { ' ' };
                    buffer.set(
                        col as usize,
                        row as usize,
                        Cell {
                            ch: shade,
                            fg: Color::Gray,
                            bg: tui_color(platform.color),
                        },
                    );
                }
            }
        }
    }

    let mut glyph = |x: f32, z: f32, ch: char, fg: Color| {
        if let Some((col, row)) = to_cell(x, z) {
            let bg = buffer.get(col, row).map(|c| c.bg).unwrap_or(Color::Black);
            buffer.set(col, row, Cell { ch, fg, bg });
        }
    };

    for ring in session.level.rings.iter().filter(|r| !r.collected) {
        glyph(ring.position.x, ring.position.z, 'o', Color::Yellow);
    }
    for spring in &session.level.springs {
        glyph(spring.position.x, spring.position.z, '^', Color::LightRed);
    }
    for spike in &session.level.spikes {
        glyph(spike.position.x, spike.position.z, 'X', Color::Red);
    }

    let heading = match ((player.rotation_y % 360.0 + 360.0) % 360.0 / 45.0).round() as u32 % 8 {
        0 => '↑',
        1 => '↗',
        2 => '→',
        3 => '↘',
        4 => '↓',
        5 => '↙',
        6 => '←',
        _ => '↖',
    };
    let player_color = if player.is_invincible() {
        Color::Magenta
    } else {
        Color::LightBlue
    };
    glyph(player.position.x, player.position.z, heading, player_color);

    buffer
}

pub fn render_hedgehog_scene(frame: &mut Frame, area: Rect, session: &HedgehogSession) {
    const MIN_WIDTH: u16 = 40;
    const MIN_HEIGHT: u16 = 14;
    if area.width < MIN_WIDTH || area.height < MIN_HEIGHT {
        render_too_small(frame, area, "Hedgehog", MIN_WIDTH, MIN_HEIGHT);
        return;
    }

    let layout = create_layout(frame, area, " Hedgehog ", Color::LightBlue, 24);
    level_buffer(session, layout.content.width, layout.content.height).render(frame, layout.content);

    let player = &session.player;
    let status = format!(
        "Health {}/{}  Rings {}  Left {}",
        player.health,
        player.tuning.max_health,
        session.rings_collected,
        session.level.rings_remaining()
    );
    render_status_bar(
        frame,
        layout.status_bar,
        &status,
        Color::Yellow,
        &[
            ("[WASD/Arrows]", "Move"),
            ("[Space]", "Jump/Homing"),
            ("[E]", "Spin"),
            ("[Q]", "Quit"),
        ],
    );

    let mut lines: Vec<Line> = session.debug_text().lines().map(|l| Line::from(l.to_string())).collect();
    lines.push(Line::from(""));
    lines.push(Line::from(format!(
        "Pos {:.0},{:.0},{:.0}",
        player.position.x, player.position.y, player.position.z
    )));
    lines.push(Line::from(format!("FOV {:.0}", session.camera.fov)));
    frame.render_widget(
        Paragraph::new(lines).style(Style::default().fg(Color::Gray)),
        Rect {
            x: layout.info_panel.x + 1,
            width: layout.info_panel.width.saturating_sub(1),
            ..layout.info_panel
        },
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_held_movement_expires() {
        let mut controls = HedgehogControls::new();
        controls.press(KeyCode::Up);
        controls.press(KeyCode::Char(' '));

        let first = controls.take_input(0.1);
        assert_eq!(first.move_z, 1.0);
        assert!(first.jump);

        let second = controls.take_input(0.1);
        assert_eq!(second.move_z, 1.0);
        assert!(!second.jump);

        assert_eq!(controls.take_input(0.1).move_z, 0.0);
    }

    #[test]
    fn test_player_drawn_at_center() {
        let session = HedgehogSession::test_course();
        let buffer = level_buffer(&session, 41, 21);
        assert_eq!(buffer.get(20, 10).map(|c| c.ch), Some('↑'));
    }
}

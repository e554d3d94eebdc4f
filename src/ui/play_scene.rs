//! Runtime view: the current frame scaled from project coordinates into the
//! terminal.

use super::common::{
    create_layout, render_status_bar, render_too_small, tui_color, CellBuffer, Sprite,
};
use crate::engine::{Engine, EngineObject, Key, ObjectKind};
use crossterm::event::KeyCode;
use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::Line,
    widgets::Paragraph,
    Frame,
};

/// Terminal key to project key. Letters are case-insensitive.
pub fn map_key(code: KeyCode) -> Option<Key> {
    match code {
        KeyCode::Left => Some(Key::Left),
        KeyCode::Right => Some(Key::Right),
        KeyCode::Up => Some(Key::Up),
        KeyCode::Down => Some(Key::Down),
        KeyCode::Enter => Some(Key::Enter),
        KeyCode::Esc => Some(Key::Escape),
        KeyCode::Tab => Some(Key::Tab),
        KeyCode::Backspace => Some(Key::Backspace),
        KeyCode::Char(' ') => Some(Key::Space),
        KeyCode::Char(c) if c.is_ascii_alphanumeric() => Some(Key::Char(c.to_ascii_lowercase())),
        _ => None,
    }
}

pub fn object_sprite(obj: &EngineObject) -> Sprite {
    let label = obj.display_text();
    let filled = matches!(obj.kind, ObjectKind::Active);
    Sprite {
        x: obj.x,
        y: obj.y,
        w: if filled { obj.w } else { 0.0 },
        h: if filled { obj.h } else { 0.0 },
        color: obj.current_color(),
        label,
        highlighted: false,
    }
}

/// Rasterize the engine's current frame into a `width` x `height` buffer.
pub fn frame_buffer(engine: &Engine, width: u16, height: u16) -> CellBuffer {
    let config = engine.config();
    let bg = engine
        .current_frame()
        .map(|f| tui_color(f.bg_color))
        .unwrap_or(Color::Black);
    let mut buffer = CellBuffer::new(
        width,
        height,
        config.screen_width as f32,
        config.screen_height as f32,
        bg,
    );
    if let Some(frame) = engine.current_frame() {
        for obj in &frame.objects {
            buffer.draw_sprite(&object_sprite(obj));
        }
    }
    buffer
}

pub fn render_play_scene(frame: &mut Frame, area: Rect, engine: &Engine) {
    const MIN_WIDTH: u16 = 40;
    const MIN_HEIGHT: u16 = 12;
    if area.width < MIN_WIDTH || area.height < MIN_HEIGHT {
        render_too_small(frame, area, "engine4k", MIN_WIDTH, MIN_HEIGHT);
        return;
    }

    let frame_name = engine.current_frame_name().unwrap_or("-");
    let layout = create_layout(frame, area, &format!(" {} ", frame_name), Color::LightBlue, 22);

    let buffer = frame_buffer(engine, layout.content.width, layout.content.height);
    buffer.render(frame, layout.content);

    let status = if engine.is_running() {
        format!("Tick {}", engine.tick_count())
    } else {
        "Stopped".to_string()
    };
    render_status_bar(
        frame,
        layout.status_bar,
        &status,
        Color::Gray,
        &[("[keys]", "Game input"), ("[Ctrl+Q]", "Quit")],
    );

    render_info_panel(frame, layout.info_panel, engine);
}

fn render_info_panel(frame: &mut Frame, area: Rect, engine: &Engine) {
    let mut lines = vec![Line::from("Frames:")];
    let current = engine.current_frame_name();
    for name in engine.frame_names() {
        let marker = if Some(name) == current { ">" } else { " " };
        lines.push(Line::from(format!("{} {}", marker, name)));
    }
    if let Some(current) = engine.current_frame() {
        lines.push(Line::from(""));
        lines.push(Line::from(format!("Objects: {}", current.objects.len())));
        lines.push(Line::from(format!("Events: {}", current.events.len())));
    }
    let held: Vec<String> = engine.input().held_keys().map(|k| k.to_string()).collect();
    if !held.is_empty() {
        lines.push(Line::from(""));
        lines.push(Line::from(format!("Held: {}", held.join(" "))));
    }
    frame.render_widget(
        Paragraph::new(lines).style(Style::default().fg(Color::Gray)),
        Rect {
            x: area.x + 1,
            width: area.width.saturating_sub(1),
            ..area
        },
    );
}

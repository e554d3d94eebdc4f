//! Terminal editor: frame list, scene view, property inspector and event sheet.
//!
//! All edits go through [`EditorState`]; this screen only maps keys to edits
//! and draws the result.

use super::common::{centered_rect, contrast_color, render_status_bar, tui_color, CellBuffer, Sprite};
use super::prompt::{PromptOutcome, TextPrompt};
use crate::core::Result;
use crate::editor::{param_fields, ClauseRole, EditorState, ACTION_TYPES, CONDITION_TYPES, PROPERTY_FIELDS};
use crate::engine::object::format_counter;
use crate::math::Color as RgbColor;
use crate::project::ObjectData;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use std::path::PathBuf;

/// Cursor movement per arrow press, in project units.
const CURSOR_STEP: f64 = 10.0;
/// Selected-object movement per shifted arrow press.
const NUDGE_STEP: f64 = 5.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Frames,
    Scene,
    Events,
}

impl Focus {
    fn next(self) -> Self {
        match self {
            Focus::Frames => Focus::Scene,
            Focus::Scene => Focus::Events,
            Focus::Events => Focus::Frames,
        }
    }
}

/// What an open prompt's answer will be used for.
#[derive(Debug, Clone, PartialEq)]
enum PromptPurpose {
    RenameFrame,
    BgColor,
    Property(&'static str),
    NewEvent,
    EditEvent(usize),
    SaveAs,
    Open,
}

/// What the main loop should do after a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorAction {
    Continue,
    /// Run the project from the selected frame
    Play,
    Quit,
}

pub struct EditorScreen {
    pub state: EditorState,
    /// Placement cursor in project coordinates
    pub cursor: (f64, f64),
    pub focus: Focus,
    /// Index into `PROPERTY_FIELDS`
    pub property_index: usize,
    pub status: String,
    prompt: Option<(PromptPurpose, TextPrompt)>,
    quit_armed: bool,
    world_w: f64,
    world_h: f64,
}

impl EditorScreen {
    pub fn new(state: EditorState, world_w: u32, world_h: u32) -> Self {
        Self {
            state,
            cursor: (world_w as f64 / 2.0, world_h as f64 / 2.0),
            focus: Focus::Scene,
            property_index: 0,
            status: "Ready".to_string(),
            prompt: None,
            quit_armed: false,
            world_w: world_w as f64,
            world_h: world_h as f64,
        }
    }

    pub fn is_prompting(&self) -> bool {
        self.prompt.is_some()
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> EditorAction {
        if let Some((purpose, mut prompt)) = self.prompt.take() {
            match prompt.handle_key(key) {
                PromptOutcome::Editing => self.prompt = Some((purpose, prompt)),
                PromptOutcome::Cancelled => self.status = "Cancelled".to_string(),
                PromptOutcome::Submitted(text) => {
                    if let Err(e) = self.apply_prompt(&purpose, &text) {
                        prompt.error = Some(e.to_string());
                        self.prompt = Some((purpose, prompt));
                    }
                }
            }
            return EditorAction::Continue;
        }

        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        let quitting = matches!(key.code, KeyCode::Esc) || (ctrl && key.code == KeyCode::Char('q'));
        if !quitting {
            self.quit_armed = false;
        }

        match key.code {
            _ if quitting => return self.request_quit(),
            KeyCode::Char('s') if ctrl => self.save(),
            KeyCode::Char('o') if ctrl => self.open_prompt(PromptPurpose::Open, "Open project", ""),
            KeyCode::Char('n') if ctrl => {
                self.state.new_project();
                self.status = "New project".to_string();
            }
            KeyCode::Char('r') if ctrl => return EditorAction::Play,
            KeyCode::F(5) => return EditorAction::Play,
            KeyCode::Tab => self.focus = self.focus.next(),
            _ => match self.focus {
                Focus::Frames => self.handle_frames_key(key),
                Focus::Scene => self.handle_scene_key(key),
                Focus::Events => self.handle_events_key(key),
            },
        }
        EditorAction::Continue
    }

    fn request_quit(&mut self) -> EditorAction {
        if self.state.dirty && !self.quit_armed {
            self.quit_armed = true;
            self.status = "Unsaved changes. Press again to quit, Ctrl+S to save".to_string();
            EditorAction::Continue
        } else {
            EditorAction::Quit
        }
    }

    fn save(&mut self) {
        if self.state.current_file.is_none() {
            self.open_prompt(PromptPurpose::SaveAs, "Save as", "project.json");
            return;
        }
        match self.state.save() {
            Ok(()) => self.status = "Saved".to_string(),
            Err(e) => self.status = format!("Save failed: {}", e),
        }
    }

    fn open_prompt(&mut self, purpose: PromptPurpose, title: &str, input: &str) {
        let hints = match &purpose {
            PromptPurpose::NewEvent | PromptPurpose::EditEvent(_) => event_hints(),
            PromptPurpose::BgColor => vec!["R,G,B with each value 0-255".to_string()],
            PromptPurpose::Property(field) if is_numeric_field(field) => {
                vec!["Whole number; anything else becomes 0".to_string()]
            }
            _ => Vec::new(),
        };
        self.prompt = Some((
            purpose,
            TextPrompt::new(title).with_input(input).with_hints(hints),
        ));
    }

    fn apply_prompt(&mut self, purpose: &PromptPurpose, text: &str) -> Result<()> {
        match purpose {
            PromptPurpose::RenameFrame => {
                self.state.rename_frame(text)?;
                self.status = format!("Renamed frame to {}", text);
            }
            PromptPurpose::BgColor => {
                self.state.set_bg_color(text)?;
                self.status = format!("Background set to {}", text);
            }
            PromptPurpose::Property(field) => {
                self.state.apply_property(field, text)?;
                self.status = format!("Set {}", field);
            }
            PromptPurpose::NewEvent => {
                let index = self.state.add_event_line(text)?;
                self.status = format!("Added event {}", index + 1);
            }
            PromptPurpose::EditEvent(index) => {
                let event = crate::project::parse_event(text)?;
                self.state.replace_event(*index, event)?;
                self.status = format!("Updated event {}", index + 1);
            }
            PromptPurpose::SaveAs => {
                self.state.save_as(&PathBuf::from(text))?;
                self.status = format!("Saved {}", text);
            }
            PromptPurpose::Open => {
                self.state.open(&PathBuf::from(text))?;
                self.status = format!("Opened {}", text);
            }
        }
        Ok(())
    }

    fn handle_frames_key(&mut self, key: KeyEvent) {
        let selected = self.state.selected_frame;
        match key.code {
            KeyCode::Up => {
                self.state.select_frame(selected.saturating_sub(1));
            }
            KeyCode::Down => {
                self.state.select_frame(selected + 1);
            }
            KeyCode::Char('a') => {
                let name = self.state.add_frame();
                self.status = format!("Added {}", name);
            }
            KeyCode::Char('x') | KeyCode::Delete => {
                if let Some(removed) = self.state.remove_frame(selected) {
                    self.status = format!("Removed {}", removed.name);
                }
            }
            KeyCode::Char('r') => {
                let name = self.state.frame_name().unwrap_or_default().to_string();
                self.open_prompt(PromptPurpose::RenameFrame, "Rename frame", &name);
            }
            KeyCode::Char('b') => {
                let color = self.state.bg_color_text();
                self.open_prompt(PromptPurpose::BgColor, "Background color", &color);
            }
            _ => {}
        }
    }

    fn handle_scene_key(&mut self, key: KeyEvent) {
        let shift = key.modifiers.contains(KeyModifiers::SHIFT);
        let arrow = match key.code {
            KeyCode::Left => Some((-1.0, 0.0)),
            KeyCode::Right => Some((1.0, 0.0)),
            KeyCode::Up => Some((0.0, -1.0)),
            KeyCode::Down => Some((0.0, 1.0)),
            _ => None,
        };
        if let Some((dx, dy)) = arrow {
            if shift {
                self.state.nudge_selected(dx * NUDGE_STEP, dy * NUDGE_STEP);
            } else {
                self.move_cursor(dx * CURSOR_STEP, dy * CURSOR_STEP);
            }
            return;
        }

        match key.code {
            KeyCode::Enter | KeyCode::Char(' ') => {
                let (x, y) = self.cursor;
                if self.state.select_at(x, y) {
                    self.status = format!("Selected {}", self.state.selected_object.as_deref().unwrap_or(""));
                } else {
                    self.status = "Nothing here".to_string();
                }
            }
            KeyCode::Char('n') => {
                let (x, y) = self.cursor;
                match self.state.place_object(x, y) {
                    Ok(name) => self.status = format!("Placed {}", name),
                    Err(e) => self.status = e.to_string(),
                }
            }
            KeyCode::Char('m') => {
                let (x, y) = self.cursor;
                if let Some(name) = self.state.selected_object.clone() {
                    self.state.move_object(&name, x, y);
                    self.status = format!("Moved {}", name);
                }
            }
            KeyCode::Char('x') | KeyCode::Delete => {
                if self.state.delete_selected_object() {
                    self.status = "Deleted object".to_string();
                }
            }
            KeyCode::Char('[') => {
                self.property_index =
                    (self.property_index + PROPERTY_FIELDS.len() - 1) % PROPERTY_FIELDS.len();
            }
            KeyCode::Char(']') => {
                self.property_index = (self.property_index + 1) % PROPERTY_FIELDS.len();
            }
            KeyCode::Char('e') => {
                let field = PROPERTY_FIELDS[self.property_index];
                match self.state.property(field) {
                    Some(value) => {
                        self.open_prompt(PromptPurpose::Property(field), &format!("Set {}", field), &value)
                    }
                    None => self.status = "Select an object first".to_string(),
                }
            }
            _ => {}
        }
    }

    fn handle_events_key(&mut self, key: KeyEvent) {
        let count = self.state.events().len();
        let selected = self.state.selected_event;
        match key.code {
            KeyCode::Up if count > 0 => {
                self.state.selected_event = Some(selected.map_or(0, |i| i.saturating_sub(1)));
            }
            KeyCode::Down if count > 0 => {
                self.state.selected_event = Some(selected.map_or(0, |i| (i + 1).min(count - 1)));
            }
            KeyCode::Char('a') => self.open_prompt(PromptPurpose::NewEvent, "New event", ""),
            KeyCode::Enter => {
                if let Some(index) = selected.filter(|&i| i < count) {
                    let line = self.state.events()[index].to_string();
                    self.open_prompt(PromptPurpose::EditEvent(index), "Edit event", &line);
                }
            }
            KeyCode::Char('x') | KeyCode::Delete => {
                if let Some(index) = selected {
                    if self.state.delete_event(index).is_ok() {
                        self.status = format!("Deleted event {}", index + 1);
                    }
                }
            }
            _ => {}
        }
    }

    fn move_cursor(&mut self, dx: f64, dy: f64) {
        self.cursor.0 = (self.cursor.0 + dx).clamp(0.0, (self.world_w - 1.0).max(0.0));
        self.cursor.1 = (self.cursor.1 + dy).clamp(0.0, (self.world_h - 1.0).max(0.0));
    }

    // ── Drawing ───────────────────────────────────────────────────

    pub fn draw(&self, f: &mut Frame, area: Rect) {
        let v_chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(10), Constraint::Length(2)])
            .split(area);

        let h_chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Length(20), // Frames
                Constraint::Min(30),    // Scene + events
                Constraint::Length(30), // Properties
            ])
            .split(v_chunks[0]);

        let center = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(6), Constraint::Length(8)])
            .split(h_chunks[1]);

        self.draw_frames(f, h_chunks[0]);
        self.draw_scene(f, center[0]);
        self.draw_events(f, center[1]);
        self.draw_properties(f, h_chunks[2]);

        let controls: &[(&str, &str)] = match self.focus {
            Focus::Frames => &[("[a]", "Add"), ("[x]", "Remove"), ("[r]", "Rename"), ("[b]", "Bg")],
            Focus::Scene => &[
                ("[Arrows]", "Cursor"),
                ("[n]", "Place"),
                ("[Enter]", "Select"),
                ("[m]", "Move"),
                ("[e]", "Edit prop"),
            ],
            Focus::Events => &[("[a]", "Add"), ("[Enter]", "Edit"), ("[x]", "Delete")],
        };
        let dirty = if self.state.dirty { " *" } else { "" };
        let file = self
            .state
            .current_file
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "untitled".to_string());
        render_status_bar(
            f,
            v_chunks[1],
            &format!("{}{} | {}", file, dirty, self.status),
            Color::Gray,
            controls,
        );

        if let Some((_, prompt)) = &self.prompt {
            prompt.draw(f, centered_rect(70, 14, area));
        }
    }

    fn panel(&self, title: &str, focus: Focus) -> Block<'static> {
        let color = if self.focus == focus { Color::Cyan } else { Color::DarkGray };
        Block::default()
            .title(format!(" {} ", title))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(color))
    }

    fn draw_frames(&self, f: &mut Frame, area: Rect) {
        let lines: Vec<Line> = self
            .state
            .project
            .frames
            .iter()
            .enumerate()
            .map(|(i, frame)| {
                let [r, g, b] = frame.bg_color;
                let swatch = Span::styled("  ", Style::default().bg(Color::Rgb(r, g, b)));
                let style = if i == self.state.selected_frame {
                    Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
                } else {
                    Style::default()
                };
                Line::from(vec![swatch, Span::styled(format!(" {}", frame.name), style)])
            })
            .collect();
        f.render_widget(Paragraph::new(lines).block(self.panel("Frames", Focus::Frames)), area);
    }

    fn draw_scene(&self, f: &mut Frame, area: Rect) {
        let title = self.state.frame_name().unwrap_or("(no frame)").to_string();
        let block = self.panel(&title, Focus::Scene);
        let inner = block.inner(area);
        f.render_widget(block, area);
        self.scene_buffer(inner.width, inner.height).render(f, inner);
    }

    /// The selected frame rasterized, with the cursor drawn on top.
    pub fn scene_buffer(&self, width: u16, height: u16) -> CellBuffer {
        let bg = self
            .state
            .frame()
            .map(|fr| RgbColor::from_array(fr.bg_color))
            .unwrap_or(RgbColor::BLACK);
        let mut buffer = CellBuffer::new(width, height, self.world_w as f32, self.world_h as f32, tui_color(bg));
        if let Some(frame) = self.state.frame() {
            for obj in &frame.objects {
                let selected = self.state.selected_object.as_deref() == Some(obj.name.as_str());
                buffer.draw_sprite(&data_sprite(obj, selected));
            }
        }
        if let Some((col, row)) = buffer.to_cell(self.cursor.0 as f32, self.cursor.1 as f32) {
            let under = buffer.get(col, row).map(|c| c.bg).unwrap_or(Color::Reset);
            let fg = match under {
                Color::Rgb(r, g, b) => contrast_color(RgbColor::rgb(r, g, b)),
                _ => Color::White,
            };
            buffer.set(col, row, super::common::Cell { ch: '+', fg, bg: under });
        }
        buffer
    }

    fn draw_events(&self, f: &mut Frame, area: Rect) {
        let events = self.state.events();
        let lines: Vec<Line> = if events.is_empty() {
            vec![Line::from(Span::styled(
                "No events. [a] adds one.",
                Style::default().fg(Color::DarkGray),
            ))]
        } else {
            events
                .iter()
                .enumerate()
                .map(|(i, event)| {
                    let style = if self.state.selected_event == Some(i) {
                        Style::default().fg(Color::Yellow)
                    } else {
                        Style::default()
                    };
                    Line::from(Span::styled(format!("{:>2}. {}", i + 1, event), style))
                })
                .collect()
        };
        f.render_widget(Paragraph::new(lines).block(self.panel("Events", Focus::Events)), area);
    }

    fn draw_properties(&self, f: &mut Frame, area: Rect) {
        let mut lines = Vec::new();
        if self.state.selected().is_none() {
            lines.push(Line::from(Span::styled(
                "No object selected",
                Style::default().fg(Color::DarkGray),
            )));
        } else {
            for (i, field) in PROPERTY_FIELDS.iter().enumerate() {
                let value = self.state.property(field).unwrap_or_default();
                let marker = if i == self.property_index { ">" } else { " " };
                let style = if i == self.property_index {
                    Style::default().fg(Color::Yellow)
                } else {
                    Style::default().fg(Color::Gray)
                };
                lines.push(Line::from(Span::styled(
                    format!("{}{:<13} {}", marker, field, value),
                    style,
                )));
            }
        }
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            format!("Cursor: {:.0}, {:.0}", self.cursor.0, self.cursor.1),
            Style::default().fg(Color::DarkGray),
        )));
        f.render_widget(
            Paragraph::new(lines).block(Block::default().title(" Properties ").borders(Borders::ALL)),
            area,
        );
    }
}

fn is_numeric_field(field: &str) -> bool {
    matches!(field, "x" | "y" | "w" | "h" | "font_size" | "initial_value")
}

fn event_hints() -> Vec<String> {
    let describe = |role, kinds: &[&str]| {
        kinds
            .iter()
            .map(|k| format!("{}({})", k, param_fields(role, k).join(", ")))
            .collect::<Vec<_>>()
            .join(" ")
    };
    vec![
        "Conditions AND Conditions => Action, Action".to_string(),
        format!("If: {}", describe(ClauseRole::Condition, &CONDITION_TYPES)),
        format!("Then: {}", describe(ClauseRole::Action, &ACTION_TYPES)),
    ]
}

fn data_sprite(obj: &ObjectData, highlighted: bool) -> Sprite {
    let color = RgbColor::parse(&obj.color).unwrap_or(RgbColor::RED);
    let label = match obj.kind.as_str() {
        "TextObject" => Some(obj.text.clone()),
        "CounterObject" => Some(format_counter(obj.initial_value)),
        _ => None,
    };
    let filled = label.is_none();
    Sprite {
        x: obj.x as f32,
        y: obj.y as f32,
        w: if filled { obj.w as f32 } else { 0.0 },
        h: if filled { obj.h as f32 } else { 0.0 },
        color,
        label,
        highlighted,
    }
}

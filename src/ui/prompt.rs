use super::common::centered_rect;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

/// What a key press did to an open prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptOutcome {
    Editing,
    Submitted(String),
    Cancelled,
}

/// Single-line text input shown as a popup: names, colors, event rows, paths.
#[derive(Debug, Clone)]
pub struct TextPrompt {
    pub title: String,
    /// Help lines under the input, e.g. the parameters a clause takes
    pub hints: Vec<String>,
    pub input: String,
    /// Cursor position in characters
    pub cursor: usize,
    pub error: Option<String>,
}

impl TextPrompt {
    pub fn new(title: &str) -> Self {
        Self {
            title: title.to_string(),
            hints: Vec::new(),
            input: String::new(),
            cursor: 0,
            error: None,
        }
    }

    pub fn with_input(mut self, input: &str) -> Self {
        self.input = input.to_string();
        self.cursor = self.input.chars().count();
        self
    }

    pub fn with_hints(mut self, hints: Vec<String>) -> Self {
        self.hints = hints;
        self
    }

    fn byte_index(&self, char_pos: usize) -> usize {
        self.input
            .char_indices()
            .nth(char_pos)
            .map(|(i, _)| i)
            .unwrap_or(self.input.len())
    }

    pub fn handle_char_input(&mut self, c: char) {
        let at = self.byte_index(self.cursor);
        self.input.insert(at, c);
        self.cursor += 1;
        self.error = None;
    }

    pub fn handle_backspace(&mut self) {
        if self.cursor > 0 {
            let at = self.byte_index(self.cursor - 1);
            self.input.remove(at);
            self.cursor -= 1;
            self.error = None;
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> PromptOutcome {
        match key.code {
            KeyCode::Enter => return PromptOutcome::Submitted(self.input.trim().to_string()),
            KeyCode::Esc => return PromptOutcome::Cancelled,
            KeyCode::Char(c) => self.handle_char_input(c),
            KeyCode::Backspace => self.handle_backspace(),
            KeyCode::Delete => {
                if self.cursor < self.input.chars().count() {
                    let at = self.byte_index(self.cursor);
                    self.input.remove(at);
                }
            }
            KeyCode::Left => self.cursor = self.cursor.saturating_sub(1),
            KeyCode::Right => self.cursor = (self.cursor + 1).min(self.input.chars().count()),
            KeyCode::Home => self.cursor = 0,
            KeyCode::End => self.cursor = self.input.chars().count(),
            _ => {}
        }
        PromptOutcome::Editing
    }

    pub fn draw(&self, f: &mut Frame, area: Rect) {
        let height = 6 + self.hints.len() as u16;
        let popup = centered_rect(area.width.saturating_sub(8).max(30), height, area);
        f.render_widget(Clear, popup);

        let block = Block::default()
            .title(format!(" {} ", self.title))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan));
        let inner = block.inner(popup);
        f.render_widget(block, popup);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1), // Input
                Constraint::Length(1), // Validation
                Constraint::Min(0),    // Hints
                Constraint::Length(1), // Controls
            ])
            .split(inner);

        let input_text = {
            let at = self.byte_index(self.cursor);
            format!("{}_{}", &self.input[..at], &self.input[at..])
        };
        f.render_widget(
            Paragraph::new(input_text).style(
                Style::default()
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD),
            ),
            chunks[0],
        );

        if let Some(error) = &self.error {
            f.render_widget(
                Paragraph::new(Line::from(Span::styled(
                    format!("✗ {}", error),
                    Style::default().fg(Color::Red),
                ))),
                chunks[1],
            );
        }

        let hints: Vec<Line> = self.hints.iter().map(|h| Line::from(h.as_str())).collect();
        f.render_widget(
            Paragraph::new(hints)
                .style(Style::default().fg(Color::Gray))
                .wrap(Wrap { trim: true }),
            chunks[2],
        );

        f.render_widget(
            Paragraph::new("[Enter] Confirm    [Esc] Cancel").style(Style::default().fg(Color::DarkGray)),
            chunks[3],
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_editing_mid_string() {
        let mut prompt = TextPrompt::new("Name").with_input("Frme");
        prompt.handle_key(key(KeyCode::Left));
        prompt.handle_key(key(KeyCode::Left));
        prompt.handle_key(key(KeyCode::Char('a')));
        assert_eq!(prompt.input, "Frame");
        prompt.handle_key(key(KeyCode::End));
        prompt.handle_key(key(KeyCode::Backspace));
        assert_eq!(prompt.input, "Fram");
    }

    #[test]
    fn test_multibyte_input() {
        let mut prompt = TextPrompt::new("Text");
        for c in "héllo".chars() {
            prompt.handle_char_input(c);
        }
        prompt.handle_key(key(KeyCode::Home));
        prompt.handle_key(key(KeyCode::Right));
        prompt.handle_key(key(KeyCode::Delete));
        assert_eq!(prompt.input, "hllo");
    }

    #[test]
    fn test_submit_trims_and_cancel() {
        let mut prompt = TextPrompt::new("Color").with_input("  0,0,255 ");
        assert_eq!(
            prompt.handle_key(key(KeyCode::Enter)),
            PromptOutcome::Submitted("0,0,255".into())
        );
        assert_eq!(prompt.handle_key(key(KeyCode::Esc)), PromptOutcome::Cancelled);
    }
}

//! Keyboard state for `KeyPressed` conditions.
//!
//! Terminal backends only see key presses (and auto-repeat), never releases,
//! so a press keeps a key held for a number of ticks. Backends that do see
//! releases (tests, scripted input) use [`InputState::hold`] and
//! [`InputState::release`] instead.

use std::collections::HashMap;
use std::fmt;

/// A key a project can react to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    /// Letter (stored lowercase) or digit
    Char(char),
    Left,
    Right,
    Up,
    Down,
    Space,
    Enter,
    Escape,
    Tab,
    Backspace,
}

impl Key {
    /// Parse `K_LEFT`, `K_a`, `LEFT`, `space`, `a`, `7`. Unknown names give `None`.
    pub fn parse(name: &str) -> Option<Self> {
        let name = name.trim();
        let bare = name.strip_prefix("K_").unwrap_or(name);

        let mut chars = bare.chars();
        if let (Some(c), None) = (chars.next(), chars.next()) {
            return if c.is_ascii_alphanumeric() {
                Some(Key::Char(c.to_ascii_lowercase()))
            } else if c == ' ' {
                Some(Key::Space)
            } else {
                None
            };
        }

        match bare.to_ascii_lowercase().as_str() {
            "left" => Some(Key::Left),
            "right" => Some(Key::Right),
            "up" => Some(Key::Up),
            "down" => Some(Key::Down),
            "space" => Some(Key::Space),
            "return" | "enter" => Some(Key::Enter),
            "escape" | "esc" => Some(Key::Escape),
            "tab" => Some(Key::Tab),
            "backspace" => Some(Key::Backspace),
            _ => None,
        }
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::Char(c) => write!(f, "K_{}", c),
            Key::Left => f.write_str("K_LEFT"),
            Key::Right => f.write_str("K_RIGHT"),
            Key::Up => f.write_str("K_UP"),
            Key::Down => f.write_str("K_DOWN"),
            Key::Space => f.write_str("K_SPACE"),
            Key::Enter => f.write_str("K_RETURN"),
            Key::Escape => f.write_str("K_ESCAPE"),
            Key::Tab => f.write_str("K_TAB"),
            Key::Backspace => f.write_str("K_BACKSPACE"),
        }
    }
}

/// How long a key remains held.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Hold {
    Ticks(u32),
    UntilReleased,
}

/// Set of currently held keys.
#[derive(Debug, Clone)]
pub struct InputState {
    held: HashMap<Key, Hold>,
    hold_ticks: u32,
}

impl InputState {
    pub fn new(hold_ticks: u32) -> Self {
        Self {
            held: HashMap::new(),
            hold_ticks: hold_ticks.max(1),
        }
    }

    /// Register a press; the key stays held for `hold_ticks` ticks.
    pub fn press(&mut self, key: Key) {
        if self.held.get(&key) != Some(&Hold::UntilReleased) {
            self.held.insert(key, Hold::Ticks(self.hold_ticks));
        }
    }

    /// Hold a key until [`release`](Self::release) is called.
    pub fn hold(&mut self, key: Key) {
        self.held.insert(key, Hold::UntilReleased);
    }

    pub fn release(&mut self, key: Key) {
        self.held.remove(&key);
    }

    pub fn release_all(&mut self) {
        self.held.clear();
    }

    pub fn is_held(&self, key: Key) -> bool {
        self.held.contains_key(&key)
    }

    pub fn held_keys(&self) -> impl Iterator<Item = Key> + '_ {
        self.held.keys().copied()
    }

    /// Age timed presses by one tick, dropping the ones that expire.
    pub fn tick(&mut self) {
        self.held.retain(|_, hold| match hold {
            Hold::UntilReleased => true,
            Hold::Ticks(n) => {
                *n = n.saturating_sub(1);
                *n > 0
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_pygame_names() {
        assert_eq!(Key::parse("K_LEFT"), Some(Key::Left));
        assert_eq!(Key::parse("K_a"), Some(Key::Char('a')));
        assert_eq!(Key::parse("K_SPACE"), Some(Key::Space));
        assert_eq!(Key::parse("K_RETURN"), Some(Key::Enter));
        assert_eq!(Key::parse("K_7"), Some(Key::Char('7')));
    }

    #[test]
    fn test_parse_bare_names() {
        assert_eq!(Key::parse("right"), Some(Key::Right));
        assert_eq!(Key::parse("W"), Some(Key::Char('w')));
        assert_eq!(Key::parse("esc"), Some(Key::Escape));
        assert_eq!(Key::parse("K_F13"), None);
        assert_eq!(Key::parse(""), None);
    }

    #[test]
    fn test_display_parses_back() {
        for key in [Key::Left, Key::Char('q'), Key::Enter, Key::Backspace] {
            assert_eq!(Key::parse(&key.to_string()), Some(key));
        }
    }

    #[test]
    fn test_press_expires_after_hold_ticks() {
        let mut input = InputState::new(3);
        input.press(Key::Space);
        input.tick();
        input.tick();
        assert!(input.is_held(Key::Space));
        input.tick();
        assert!(!input.is_held(Key::Space));
    }

    #[test]
    fn test_repeat_press_refreshes_hold() {
        let mut input = InputState::new(2);
        input.press(Key::Left);
        input.tick();
        input.press(Key::Left);
        input.tick();
        assert!(input.is_held(Key::Left));
    }

    #[test]
    fn test_hold_until_released() {
        let mut input = InputState::new(1);
        input.hold(Key::Up);
        input.press(Key::Up);
        for _ in 0..10 {
            input.tick();
        }
        assert!(input.is_held(Key::Up));
        input.release(Key::Up);
        assert!(!input.is_held(Key::Up));
    }
}

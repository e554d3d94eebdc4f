use crate::core::{EngineError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// An opaque 8-bit RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const WHITE: Self = Self::rgb(255, 255, 255);
    pub const BLACK: Self = Self::rgb(0, 0, 0);
    pub const RED: Self = Self::rgb(255, 0, 0);
    pub const GREEN: Self = Self::rgb(0, 255, 0);
    pub const BLUE: Self = Self::rgb(0, 0, 255);
    pub const GRAY: Self = Self::rgb(128, 128, 128);
    pub const YELLOW: Self = Self::rgb(255, 255, 0);
    pub const ORANGE: Self = Self::rgb(255, 153, 0);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub fn from_array(c: [u8; 3]) -> Self {
        Self::rgb(c[0], c[1], c[2])
    }

    pub fn to_array(self) -> [u8; 3] {
        [self.r, self.g, self.b]
    }

    pub fn named(name: &str) -> Option<Self> {
        let color = match name.to_ascii_uppercase().as_str() {
            "WHITE" => Self::WHITE,
            "BLACK" => Self::BLACK,
            "RED" => Self::RED,
            "GREEN" => Self::GREEN,
            "BLUE" => Self::BLUE,
            "GRAY" | "GREY" => Self::GRAY,
            "YELLOW" => Self::YELLOW,
            "ORANGE" => Self::ORANGE,
            _ => return None,
        };
        Some(color)
    }

    /// Parse `(r,g,b)`, `[r,g,b]`, `r,g,b` or a color name.
    pub fn parse(input: &str) -> Result<Self> {
        let trimmed = input.trim();
        if let Some(color) = Self::named(trimmed) {
            return Ok(color);
        }

        let inner = trimmed
            .strip_prefix('(')
            .and_then(|s| s.strip_suffix(')'))
            .or_else(|| trimmed.strip_prefix('[').and_then(|s| s.strip_suffix(']')))
            .unwrap_or(trimmed);

        let parts: Vec<&str> = inner.split(',').map(str::trim).collect();
        if parts.len() != 3 {
            return Err(EngineError::InvalidColor(input.to_string()));
        }

        let mut channels = [0u8; 3];
        for (slot, part) in channels.iter_mut().zip(&parts) {
            *slot = part
                .parse::<u8>()
                .map_err(|_| EngineError::InvalidColor(input.to_string()))?;
        }
        Ok(Self::from_array(channels))
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{},{})", self.r, self.g, self.b)
    }
}

//! Runtime objects placed on a frame.

use crate::math::{Color, Rect};

/// What an object is and the state specific to that kind.
#[derive(Debug, Clone, PartialEq)]
pub enum ObjectKind {
    /// A colored rectangle
    Active,
    /// A line of text
    Text { text: String, font_size: u32 },
    /// A number shown as text
    Counter { value: f64, font_size: u32 },
}

/// Cycles an object's color over time.
#[derive(Debug, Clone, PartialEq)]
pub struct ColorAnimation {
    pub colors: Vec<Color>,
    /// Animation frames per second
    pub speed: f32,
    /// Fractional frame position
    pub frame: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EngineObject {
    pub name: String,
    pub kind: ObjectKind,
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
    pub color: Color,
    pub animation: Option<ColorAnimation>,
}

impl EngineObject {
    pub fn active(name: &str, x: f32, y: f32, w: f32, h: f32, color: Color) -> Self {
        Self {
            name: name.to_string(),
            kind: ObjectKind::Active,
            x,
            y,
            w,
            h,
            color,
            animation: None,
        }
    }

    pub fn text(name: &str, x: f32, y: f32, text: &str, font_size: u32, color: Color) -> Self {
        let mut obj = Self::active(name, x, y, 0.0, 0.0, color);
        obj.kind = ObjectKind::Text {
            text: text.to_string(),
            font_size,
        };
        obj.fit_to_text();
        obj
    }

    pub fn counter(name: &str, x: f32, y: f32, value: f64, font_size: u32, color: Color) -> Self {
        let mut obj = Self::active(name, x, y, 0.0, 0.0, color);
        obj.kind = ObjectKind::Counter { value, font_size };
        obj.fit_to_text();
        obj
    }

    pub fn with_animation(mut self, colors: Vec<Color>, speed: f32) -> Self {
        if !colors.is_empty() && speed > 0.0 {
            self.animation = Some(ColorAnimation {
                colors,
                speed,
                frame: 0.0,
            });
        }
        self
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.w, self.h)
    }

    /// Text shown for text and counter objects.
    pub fn display_text(&self) -> Option<String> {
        match &self.kind {
            ObjectKind::Active => None,
            ObjectKind::Text { text, .. } => Some(text.clone()),
            ObjectKind::Counter { value, .. } => Some(format_counter(*value)),
        }
    }

    pub fn is_counter(&self) -> bool {
        matches!(self.kind, ObjectKind::Counter { .. })
    }

    pub fn counter_value(&self) -> Option<f64> {
        match self.kind {
            ObjectKind::Counter { value, .. } => Some(value),
            _ => None,
        }
    }

    /// Set a counter's value. Returns false for other kinds.
    pub fn set_counter_value(&mut self, new_value: f64) -> bool {
        match &mut self.kind {
            ObjectKind::Counter { value, .. } => {
                *value = new_value;
                self.fit_to_text();
                true
            }
            _ => false,
        }
    }

    /// Replace a text object's string. Counters take a numeric string.
    pub fn set_text(&mut self, new_text: &str) -> bool {
        let changed = match &mut self.kind {
            ObjectKind::Text { text, .. } => {
                *text = new_text.to_string();
                true
            }
            ObjectKind::Counter { value, .. } => match new_text.trim().parse::<f64>() {
                Ok(v) => {
                    *value = v;
                    true
                }
                Err(_) => false,
            },
            ObjectKind::Active => false,
        };
        if changed {
            self.fit_to_text();
        }
        changed
    }

    /// The color currently shown, accounting for animation.
    pub fn current_color(&self) -> Color {
        match &self.animation {
            Some(anim) if !anim.colors.is_empty() => {
                let index = anim.frame.max(0.0) as usize % anim.colors.len();
                anim.colors[index]
            }
            _ => self.color,
        }
    }

    pub fn update(&mut self, dt: f32) {
        if let Some(anim) = &mut self.animation {
            anim.frame += anim.speed * dt;
        }
    }

    /// Text bounds use a character-cell approximation: each glyph is half the
    /// font size wide and one font size tall.
    fn fit_to_text(&mut self) {
        let font_size = match self.kind {
            ObjectKind::Text { font_size, .. } | ObjectKind::Counter { font_size, .. } => font_size,
            ObjectKind::Active => return,
        };
        let chars = self.display_text().map(|t| t.chars().count()).unwrap_or(0);
        self.w = chars as f32 * font_size as f32 / 2.0;
        self.h = font_size as f32;
    }
}

/// Integral values drop the trailing `.0`.
pub fn format_counter(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{}", value)
    }
}

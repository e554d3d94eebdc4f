//! Editor model: every edit the terminal editor can make, without the terminal.
//!
//! Numeric property edits follow the forgiving behavior editors usually have:
//! anything that is not a whole number becomes 0 rather than an error.

use crate::core::constants::DEFAULT_OBJECT_TYPE;
use crate::core::{EngineError, Result};
use crate::project::{parse_event, EventData, FrameData, ObjectData, ProjectData};
use std::path::{Path, PathBuf};

/// Fields shown by the property inspector, in display order.
pub const PROPERTY_FIELDS: [&str; 10] = [
    "type",
    "name",
    "x",
    "y",
    "w",
    "h",
    "color",
    "text",
    "font_size",
    "initial_value",
];

/// Condition types offered by the event editor.
pub const CONDITION_TYPES: [&str; 4] = ["KeyPressed", "ObjectCollision", "CompareCounter", "Always"];

/// Action types offered by the event editor.
pub const ACTION_TYPES: [&str; 8] = [
    "ChangeObjectColor",
    "DestroyObject",
    "GoToFrame",
    "SetCounterValue",
    "AddToCounter",
    "SetText",
    "MoveObject",
    "QuitGame",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClauseRole {
    Condition,
    Action,
}

/// Parameter names the editor prompts for, per clause type.
pub fn param_fields(role: ClauseRole, kind: &str) -> &'static [&'static str] {
    match (role, kind) {
        (ClauseRole::Condition, "KeyPressed") => &["key"],
        (ClauseRole::Condition, "ObjectCollision") => &["obj_a", "obj_b"],
        (ClauseRole::Condition, "CompareCounter") => &["counter_name", "operator", "value"],
        (ClauseRole::Action, "ChangeObjectColor") => &["obj_name", "color_str"],
        (ClauseRole::Action, "DestroyObject") => &["obj_name"],
        (ClauseRole::Action, "GoToFrame") => &["frame_name"],
        (ClauseRole::Action, "SetCounterValue") => &["counter_name", "value"],
        (ClauseRole::Action, "AddToCounter") => &["counter_name", "value"],
        (ClauseRole::Action, "SetText") => &["obj_name", "text"],
        (ClauseRole::Action, "MoveObject") => &["obj_name", "dx", "dy"],
        _ => &[],
    }
}

#[derive(Debug, Clone)]
pub struct EditorState {
    pub project: ProjectData,
    /// Where the project was loaded from or last saved to
    pub current_file: Option<PathBuf>,
    pub selected_frame: usize,
    pub selected_object: Option<String>,
    pub selected_event: Option<usize>,
    /// Unsaved changes exist
    pub dirty: bool,
}

impl Default for EditorState {
    fn default() -> Self {
        Self::new()
    }
}

impl EditorState {
    /// A fresh session on the starter project.
    pub fn new() -> Self {
        Self::with_project(ProjectData::starter(), None)
    }

    pub fn with_project(project: ProjectData, current_file: Option<PathBuf>) -> Self {
        Self {
            project,
            current_file,
            selected_frame: 0,
            selected_object: None,
            selected_event: None,
            dirty: false,
        }
    }

    // ── Files ─────────────────────────────────────────────────────

    pub fn new_project(&mut self) {
        *self = Self::new();
    }

    pub fn open(&mut self, path: &Path) -> Result<()> {
        let project = ProjectData::load(path)?;
        log::info!("Opened {} ({} frames)", path.display(), project.frames.len());
        *self = Self::with_project(project, Some(path.to_path_buf()));
        Ok(())
    }

    /// Save to the current file. Fails if the project has never been saved.
    pub fn save(&mut self) -> Result<()> {
        let path = self
            .current_file
            .clone()
            .ok_or_else(|| EngineError::Editor("no file name yet; use save as".into()))?;
        self.save_as(&path)
    }

    pub fn save_as(&mut self, path: &Path) -> Result<()> {
        self.project.save(path)?;
        log::info!("Saved {}", path.display());
        self.current_file = Some(path.to_path_buf());
        self.dirty = false;
        Ok(())
    }

    // ── Frames ────────────────────────────────────────────────────

    pub fn frame(&self) -> Option<&FrameData> {
        self.project.frames.get(self.selected_frame)
    }

    pub fn frame_mut(&mut self) -> Option<&mut FrameData> {
        self.project.frames.get_mut(self.selected_frame)
    }

    pub fn frame_name(&self) -> Option<&str> {
        self.frame().map(|f| f.name.as_str())
    }

    pub fn select_frame(&mut self, index: usize) -> bool {
        if index >= self.project.frames.len() {
            return false;
        }
        if index != self.selected_frame {
            self.selected_frame = index;
            self.selected_object = None;
            self.selected_event = None;
        }
        true
    }

    /// Append a black frame named `Frame{n}` and select it.
    pub fn add_frame(&mut self) -> String {
        let mut n = self.project.frames.len() + 1;
        while self.project.frame(&format!("Frame{}", n)).is_some() {
            n += 1;
        }
        let name = format!("Frame{}", n);
        self.project.frames.push(FrameData::new(&name, [0, 0, 0]));
        self.select_frame(self.project.frames.len() - 1);
        self.dirty = true;
        name
    }

    pub fn remove_frame(&mut self, index: usize) -> Option<FrameData> {
        if index >= self.project.frames.len() {
            return None;
        }
        let removed = self.project.frames.remove(index);
        let last = self.project.frames.len().saturating_sub(1);
        if self.selected_frame > last || self.selected_frame > index {
            self.selected_frame = self.selected_frame.saturating_sub(1).min(last);
        }
        self.selected_object = None;
        self.selected_event = None;
        self.dirty = true;
        Some(removed)
    }

    pub fn rename_frame(&mut self, new_name: &str) -> Result<()> {
        let new_name = new_name.trim();
        if new_name.is_empty() {
            return Err(EngineError::Editor("frame name cannot be empty".into()));
        }
        if self
            .project
            .frames
            .iter()
            .enumerate()
            .any(|(i, f)| i != self.selected_frame && f.name == new_name)
        {
            return Err(EngineError::Editor(format!("frame `{}` already exists", new_name)));
        }
        let frame = self.frame_mut().ok_or_else(no_frame)?;
        frame.name = new_name.to_string();
        self.dirty = true;
        Ok(())
    }

    /// Set the background from `R,G,B` text. Needs exactly three 0-255 values.
    pub fn set_bg_color(&mut self, text: &str) -> Result<()> {
        let parts: Vec<u8> = text
            .split(',')
            .map(|p| p.trim().parse::<u8>())
            .collect::<std::result::Result<_, _>>()
            .map_err(|_| EngineError::InvalidColor(text.to_string()))?;
        let rgb: [u8; 3] = parts
            .try_into()
            .map_err(|_| EngineError::InvalidColor(text.to_string()))?;

        let frame = self.frame_mut().ok_or_else(no_frame)?;
        frame.bg_color = rgb;
        self.dirty = true;
        Ok(())
    }

    /// `R,G,B` text of the selected frame's background, for prefilling prompts.
    pub fn bg_color_text(&self) -> String {
        self.frame()
            .map(|f| {
                let [r, g, b] = f.bg_color;
                format!("{},{},{}", r, g, b)
            })
            .unwrap_or_default()
    }

    // ── Scene ─────────────────────────────────────────────────────

    /// Create a red 50x50 active object named `Obj{n}` at (x, y) and select it.
    pub fn place_object(&mut self, x: f64, y: f64) -> Result<String> {
        let frame = self.frame_mut().ok_or_else(no_frame)?;
        let mut n = frame.objects.len() + 1;
        while frame.object(&format!("Obj{}", n)).is_some() {
            n += 1;
        }
        let name = format!("Obj{}", n);

        frame
            .objects
            .push(ObjectData::new(DEFAULT_OBJECT_TYPE, &name, x, y));

        self.selected_object = Some(name.clone());
        self.dirty = true;
        Ok(name)
    }

    /// Name of the topmost object covering (x, y).
    pub fn object_at(&self, x: f64, y: f64) -> Option<&str> {
        self.frame()?
            .objects
            .iter()
            .rev()
            .find(|o| x >= o.x && x < o.x + o.w && y >= o.y && y < o.y + o.h)
            .map(|o| o.name.as_str())
    }

    /// Select whatever is under (x, y); clears the selection on empty space.
    pub fn select_at(&mut self, x: f64, y: f64) -> bool {
        self.selected_object = self.object_at(x, y).map(str::to_string);
        self.selected_object.is_some()
    }

    pub fn selected(&self) -> Option<&ObjectData> {
        let name = self.selected_object.as_deref()?;
        self.frame()?.object(name)
    }

    fn selected_mut(&mut self) -> Option<&mut ObjectData> {
        let name = self.selected_object.clone()?;
        self.frame_mut()?.object_mut(&name)
    }

    pub fn move_object(&mut self, name: &str, x: f64, y: f64) -> bool {
        let Some(obj) = self.frame_mut().and_then(|f| f.object_mut(name)) else {
            return false;
        };
        obj.x = x;
        obj.y = y;
        self.dirty = true;
        true
    }

    pub fn nudge_selected(&mut self, dx: f64, dy: f64) -> bool {
        let Some(obj) = self.selected_mut() else {
            return false;
        };
        obj.x += dx;
        obj.y += dy;
        self.dirty = true;
        true
    }

    pub fn delete_selected_object(&mut self) -> bool {
        let Some(name) = self.selected_object.take() else {
            return false;
        };
        let Some(frame) = self.frame_mut() else {
            return false;
        };
        let before = frame.objects.len();
        frame.objects.retain(|o| o.name != name);
        let removed = frame.objects.len() != before;
        self.dirty |= removed;
        removed
    }

    // ── Property inspector ────────────────────────────────────────

    /// String form of a property of the selected object.
    pub fn property(&self, field: &str) -> Option<String> {
        let obj = self.selected()?;
        let value = match field {
            "type" => obj.kind.clone(),
            "name" => obj.name.clone(),
            "x" => format_number(obj.x),
            "y" => format_number(obj.y),
            "w" => format_number(obj.w),
            "h" => format_number(obj.h),
            "color" => obj.color.clone(),
            "text" => obj.text.clone(),
            "font_size" => obj.font_size.to_string(),
            "initial_value" => format_number(obj.initial_value),
            _ => return None,
        };
        Some(value)
    }

    /// Set a property of the selected object from text.
    pub fn apply_property(&mut self, field: &str, value: &str) -> Result<()> {
        if !PROPERTY_FIELDS.contains(&field) {
            return Err(EngineError::Editor(format!("unknown property `{}`", field)));
        }
        let new_name = value.trim().to_string();
        if field == "name" {
            if new_name.is_empty() {
                return Err(EngineError::Editor("object name cannot be empty".into()));
            }
            let taken = self
                .frame()
                .and_then(|f| f.object(&new_name))
                .is_some_and(|o| Some(o.name.as_str()) != self.selected_object.as_deref());
            if taken {
                return Err(EngineError::Editor(format!("object `{}` already exists", new_name)));
            }
        }

        let obj = self
            .selected_mut()
            .ok_or_else(|| EngineError::Editor("no object selected".into()))?;
        match field {
            "type" => obj.kind = value.trim().to_string(),
            "name" => obj.name = new_name.clone(),
            "x" => obj.x = parse_int_or_zero(value),
            "y" => obj.y = parse_int_or_zero(value),
            "w" => obj.w = parse_int_or_zero(value),
            "h" => obj.h = parse_int_or_zero(value),
            "color" => obj.color = value.trim().to_string(),
            "text" => obj.text = value.to_string(),
            "font_size" => obj.font_size = value.trim().parse().unwrap_or(0),
            _ => obj.initial_value = parse_int_or_zero(value),
        }
        if field == "name" {
            self.selected_object = Some(new_name);
        }
        self.dirty = true;
        Ok(())
    }

    // ── Event sheet ───────────────────────────────────────────────

    pub fn events(&self) -> &[EventData] {
        self.frame().map(|f| f.events.as_slice()).unwrap_or(&[])
    }

    pub fn add_event(&mut self, event: EventData) -> Result<usize> {
        let frame = self.frame_mut().ok_or_else(no_frame)?;
        frame.events.push(event);
        let index = frame.events.len() - 1;
        self.selected_event = Some(index);
        self.dirty = true;
        Ok(index)
    }

    /// Parse a sheet line (`Cond() => Act()`) and append it.
    pub fn add_event_line(&mut self, line: &str) -> Result<usize> {
        let event = parse_event(line)?;
        self.add_event(event)
    }

    pub fn replace_event(&mut self, index: usize, event: EventData) -> Result<()> {
        let slot = self
            .frame_mut()
            .and_then(|f| f.events.get_mut(index))
            .ok_or_else(|| no_event(index))?;
        *slot = event;
        self.dirty = true;
        Ok(())
    }

    pub fn delete_event(&mut self, index: usize) -> Result<EventData> {
        let frame = self.frame_mut().ok_or_else(no_frame)?;
        if index >= frame.events.len() {
            return Err(no_event(index));
        }
        let removed = frame.events.remove(index);
        let remaining = frame.events.len();
        self.selected_event = match self.selected_event {
            Some(_) if remaining == 0 => None,
            Some(sel) => Some(sel.min(remaining - 1)),
            None => None,
        };
        self.dirty = true;
        Ok(removed)
    }
}

fn no_frame() -> EngineError {
    EngineError::Editor("project has no frames".into())
}

fn no_event(index: usize) -> EngineError {
    EngineError::Editor(format!("no event at row {}", index + 1))
}

fn parse_int_or_zero(value: &str) -> f64 {
    value.trim().parse::<i64>().map(|v| v as f64).unwrap_or(0.0)
}

fn format_number(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{}", value as i64)
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::project::ClauseData;

    #[test]
    fn test_starter_session() {
        let editor = EditorState::new();
        assert_eq!(editor.project.frame_names(), vec!["Menu", "Level1"]);
        assert_eq!(editor.frame_name(), Some("Menu"));
        assert!(!editor.dirty);
    }

    #[test]
    fn test_add_frame_names_are_unique() {
        let mut editor = EditorState::new();
        assert_eq!(editor.add_frame(), "Frame3");
        editor.remove_frame(0);
        // two frames left, but Frame3 is taken
        assert_eq!(editor.add_frame(), "Frame4");
        assert_eq!(editor.frame().unwrap().bg_color, [0, 0, 0]);
        assert!(editor.dirty);
    }

    #[test]
    fn test_remove_frame_keeps_selection_valid() {
        let mut editor = EditorState::new();
        editor.select_frame(1);
        assert!(editor.remove_frame(1).is_some());
        assert_eq!(editor.selected_frame, 0);
        assert!(editor.remove_frame(5).is_none());
    }

    #[test]
    fn test_set_bg_color() {
        let mut editor = EditorState::new();
        editor.set_bg_color(" 1, 2 ,3").unwrap();
        assert_eq!(editor.frame().unwrap().bg_color, [1, 2, 3]);
        assert_eq!(editor.bg_color_text(), "1,2,3");

        assert!(editor.set_bg_color("1,2").is_err());
        assert!(editor.set_bg_color("1,2,3,4").is_err());
        assert!(editor.set_bg_color("1,2,300").is_err());
        assert!(editor.set_bg_color("red").is_err());
        assert_eq!(editor.frame().unwrap().bg_color, [1, 2, 3]);
    }

    #[test]
    fn test_place_and_hit_test() {
        let mut editor = EditorState::new();
        assert_eq!(editor.place_object(10.0, 10.0).unwrap(), "Obj1");
        assert_eq!(editor.place_object(30.0, 30.0).unwrap(), "Obj2");

        let obj = editor.selected().unwrap();
        assert_eq!(obj.kind, "ActiveObject");
        assert_eq!((obj.w, obj.h), (50.0, 50.0));
        assert_eq!(obj.color, "(255,0,0)");

        // Overlap: the later object is on top
        assert_eq!(editor.object_at(40.0, 40.0), Some("Obj2"));
        assert_eq!(editor.object_at(15.0, 15.0), Some("Obj1"));
        assert_eq!(editor.object_at(80.0, 20.0), None);
        assert!(!editor.select_at(500.0, 500.0));
        assert!(editor.selected_object.is_none());
    }

    #[test]
    fn test_move_and_nudge() {
        let mut editor = EditorState::new();
        let name = editor.place_object(0.0, 0.0).unwrap();
        assert!(editor.move_object(&name, 100.0, 120.0));
        assert!(editor.nudge_selected(-10.0, 5.0));
        let obj = editor.selected().unwrap();
        assert_eq!((obj.x, obj.y), (90.0, 125.0));
        assert!(!editor.move_object("Nope", 0.0, 0.0));
    }

    #[test]
    fn test_apply_property_parses_integers() {
        let mut editor = EditorState::new();
        editor.place_object(0.0, 0.0).unwrap();
        editor.apply_property("x", "42").unwrap();
        editor.apply_property("w", "12.5").unwrap();
        editor.apply_property("font_size", "big").unwrap();
        editor.apply_property("color", "(0,0,255)").unwrap();
        assert_eq!(editor.property("x").as_deref(), Some("42"));
        assert_eq!(editor.property("w").as_deref(), Some("0"));
        assert_eq!(editor.property("font_size").as_deref(), Some("0"));
        assert_eq!(editor.property("color").as_deref(), Some("(0,0,255)"));
        assert!(editor.apply_property("speed", "3").is_err());
    }

    #[test]
    fn test_rename_object_follows_selection() {
        let mut editor = EditorState::new();
        editor.place_object(0.0, 0.0).unwrap();
        editor.place_object(100.0, 0.0).unwrap();
        assert!(editor.apply_property("name", "Obj1").is_err());
        editor.apply_property("name", "Player").unwrap();
        assert_eq!(editor.selected_object.as_deref(), Some("Player"));
        assert_eq!(editor.property("name").as_deref(), Some("Player"));
    }

    #[test]
    fn test_event_sheet_editing() {
        let mut editor = EditorState::new();
        let row = editor
            .add_event_line("KeyPressed(key=K_SPACE) => GoToFrame(frame_name=Level1)")
            .unwrap();
        assert_eq!(row, 0);
        editor
            .add_event(EventData::new(vec![], vec![ClauseData::new("QuitGame")]))
            .unwrap();
        assert_eq!(editor.events().len(), 2);

        editor
            .replace_event(0, EventData::new(vec![], vec![ClauseData::new("QuitGame")]))
            .unwrap();
        assert_eq!(editor.events()[0].actions[0].kind, "QuitGame");
        assert!(editor.replace_event(9, EventData::default()).is_err());

        editor.delete_event(1).unwrap();
        assert_eq!(editor.selected_event, Some(0));
        assert!(editor.delete_event(3).is_err());
        assert!(editor.add_event_line("no arrow here").is_err());
    }

    #[test]
    fn test_param_fields() {
        assert_eq!(param_fields(ClauseRole::Condition, "ObjectCollision"), ["obj_a", "obj_b"]);
        assert_eq!(param_fields(ClauseRole::Action, "ChangeObjectColor"), ["obj_name", "color_str"]);
        assert!(param_fields(ClauseRole::Action, "QuitGame").is_empty());
        assert!(param_fields(ClauseRole::Action, "KeyPressed").is_empty());
    }

    #[test]
    fn test_save_requires_path_and_clears_dirty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("game.json");
        let mut editor = EditorState::new();
        editor.add_frame();
        assert!(editor.save().is_err());

        editor.save_as(&path).unwrap();
        assert!(!editor.dirty);
        editor.place_object(5.0, 5.0).unwrap();
        editor.save().unwrap();

        let mut reopened = EditorState::new();
        reopened.open(&path).unwrap();
        assert_eq!(reopened.project, editor.project);
        assert_eq!(reopened.current_file.as_deref(), Some(path.as_path()));
    }
}

//! Project data model: what the editor writes and the runtime loads.
//!
//! The JSON layout is the editor's native format:
//!
//! ```json
//! { "frames": [ { "name": "Level1", "bg_color": [80, 80, 220],
//!     "objects": [ { "type": "ActiveObject", "name": "Player", "x": 100, "y": 100,
//!                    "w": 50, "h": 50, "color": "(255,0,0)" } ],
//!     "events": [ { "conditions": [ { "type": "KeyPressed", "params": { "key": "K_LEFT" } } ],
//!                   "actions": [ { "type": "DestroyObject", "params": { "obj_name": "Player" } } ] } ] } ] }
//! ```

use crate::core::constants::*;
use crate::core::Result;
use indexmap::IndexMap;
use serde::de::{self, Deserializer, Visitor};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::Path;

/// A whole project: an ordered list of frames.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProjectData {
    #[serde(default)]
    pub frames: Vec<FrameData>,
}

/// One frame (scene/level) as stored on disk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameData {
    #[serde(default = "default_frame_name")]
    pub name: String,
    #[serde(default)]
    pub bg_color: [u8; 3],
    #[serde(default)]
    pub objects: Vec<ObjectData>,
    #[serde(default)]
    pub events: Vec<EventData>,
}

/// An object placed on a frame. Kind-specific fields are ignored by kinds that
/// do not use them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectData {
    #[serde(rename = "type", default = "default_object_type")]
    pub kind: String,
    #[serde(default = "default_object_name")]
    pub name: String,
    #[serde(default = "default_x")]
    pub x: f64,
    #[serde(default = "default_y")]
    pub y: f64,
    #[serde(default = "default_w")]
    pub w: f64,
    #[serde(default = "default_h")]
    pub h: f64,
    #[serde(default = "default_color")]
    pub color: String,
    #[serde(default = "default_text")]
    pub text: String,
    #[serde(default = "default_font_size")]
    pub font_size: u32,
    #[serde(default)]
    pub initial_value: f64,
    /// Colors cycled through when `anim_speed` is positive
    #[serde(default)]
    pub anim_colors: Vec<String>,
    /// Animation frames per second
    #[serde(default)]
    pub anim_speed: f64,
}

/// One event-sheet row: every condition must hold for the actions to run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EventData {
    #[serde(default)]
    pub conditions: Vec<ClauseData>,
    #[serde(default)]
    pub actions: Vec<ClauseData>,
}

/// A condition or action reference: type name plus string parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClauseData {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub params: Params,
}

/// Ordered string parameters of a clause.
///
/// JSON numbers and booleans are accepted and kept in their text form, since
/// hand-written projects use them interchangeably with strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Params(IndexMap<String, String>);

fn default_frame_name() -> String {
    DEFAULT_FRAME_NAME.to_string()
}
fn default_object_type() -> String {
    DEFAULT_OBJECT_TYPE.to_string()
}
fn default_object_name() -> String {
    DEFAULT_OBJECT_NAME.to_string()
}
fn default_x() -> f64 {
    DEFAULT_OBJECT_X
}
fn default_y() -> f64 {
    DEFAULT_OBJECT_Y
}
fn default_w() -> f64 {
    DEFAULT_OBJECT_W
}
fn default_h() -> f64 {
    DEFAULT_OBJECT_H
}
fn default_color() -> String {
    DEFAULT_OBJECT_COLOR.to_string()
}
fn default_text() -> String {
    DEFAULT_TEXT.to_string()
}
fn default_font_size() -> u32 {
    DEFAULT_FONT_SIZE
}

impl ProjectData {
    /// The two frames a fresh editor session starts with.
    pub fn starter() -> Self {
        Self {
            frames: vec![
                FrameData::new("Menu", [40, 40, 40]),
                FrameData::new("Level1", [80, 80, 220]),
            ],
        }
    }

    pub fn load(path: &Path) -> Result<Self> {
        let json = fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        fs::write(path, self.to_json()?)?;
        Ok(())
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn frame(&self, name: &str) -> Option<&FrameData> {
        self.frames.iter().find(|f| f.name == name)
    }

    pub fn frame_mut(&mut self, name: &str) -> Option<&mut FrameData> {
        self.frames.iter_mut().find(|f| f.name == name)
    }

    pub fn frame_names(&self) -> Vec<&str> {
        self.frames.iter().map(|f| f.name.as_str()).collect()
    }
}

impl FrameData {
    pub fn new(name: &str, bg_color: [u8; 3]) -> Self {
        Self {
            name: name.to_string(),
            bg_color,
            objects: Vec::new(),
            events: Vec::new(),
        }
    }

    pub fn object(&self, name: &str) -> Option<&ObjectData> {
        self.objects.iter().find(|o| o.name == name)
    }

    pub fn object_mut(&mut self, name: &str) -> Option<&mut ObjectData> {
        self.objects.iter_mut().find(|o| o.name == name)
    }
}

impl ObjectData {
    /// An object of the given kind with every other field defaulted.
    pub fn new(kind: &str, name: &str, x: f64, y: f64) -> Self {
        Self {
            kind: kind.to_string(),
            name: name.to_string(),
            x,
            y,
            w: DEFAULT_OBJECT_W,
            h: DEFAULT_OBJECT_H,
            color: default_color(),
            text: default_text(),
            font_size: DEFAULT_FONT_SIZE,
            initial_value: 0.0,
            anim_colors: Vec::new(),
            anim_speed: 0.0,
        }
    }
}

impl EventData {
    pub fn new(conditions: Vec<ClauseData>, actions: Vec<ClauseData>) -> Self {
        Self {
            conditions,
            actions,
        }
    }
}

impl ClauseData {
    pub fn new(kind: &str) -> Self {
        Self {
            kind: kind.to_string(),
            params: Params::default(),
        }
    }

    /// Builder-style parameter setter.
    pub fn with(mut self, key: &str, value: impl Into<String>) -> Self {
        self.params.insert(key, value);
        self
    }
}

impl Params {
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    /// First present key among aliases, e.g. `["obj_a", "obj_name_a"]`.
    pub fn get_any(&self, keys: &[&str]) -> Option<&str> {
        keys.iter().find_map(|k| self.get(k))
    }

    pub fn insert(&mut self, key: &str, value: impl Into<String>) {
        self.0.insert(key.to_string(), value.into());
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(String, String)> for Params {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Params(iter.into_iter().collect())
    }
}

impl<'de> Deserialize<'de> for Params {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        // Binary formats are not self-describing; they always carry strings.
        if deserializer.is_human_readable() {
            let raw: IndexMap<String, ParamText> = IndexMap::deserialize(deserializer)?;
            Ok(raw.into_iter().map(|(k, v)| (k, v.0)).collect())
        } else {
            IndexMap::<String, String>::deserialize(deserializer).map(Params)
        }
    }
}

/// A parameter value in any scalar JSON form, kept as text.
struct ParamText(String);

impl<'de> Deserialize<'de> for ParamText {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        deserializer.deserialize_any(ParamTextVisitor)
    }
}

struct ParamTextVisitor;

impl<'de> Visitor<'de> for ParamTextVisitor {
    type Value = ParamText;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a string, number, boolean or null")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> std::result::Result<ParamText, E> {
        Ok(ParamText(v.to_string()))
    }

    fn visit_string<E: de::Error>(self, v: String) -> std::result::Result<ParamText, E> {
        Ok(ParamText(v))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> std::result::Result<ParamText, E> {
        Ok(ParamText(v.to_string()))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> std::result::Result<ParamText, E> {
        Ok(ParamText(v.to_string()))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> std::result::Result<ParamText, E> {
        Ok(ParamText(v.to_string()))
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> std::result::Result<ParamText, E> {
        Ok(ParamText(v.to_string()))
    }

    fn visit_unit<E: de::Error>(self) -> std::result::Result<ParamText, E> {
        Ok(ParamText(String::new()))
    }

    fn visit_none<E: de::Error>(self) -> std::result::Result<ParamText, E> {
        Ok(ParamText(String::new()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_keys_take_defaults() {
        let project = ProjectData::from_json(
            r#"{ "frames": [ { "objects": [ { "name": "Ball" } ] } ] }"#,
        )
        .unwrap();

        let frame = &project.frames[0];
        assert_eq!(frame.name, "Unnamed");
        assert_eq!(frame.bg_color, [0, 0, 0]);

        let obj = &frame.objects[0];
        assert_eq!(obj.kind, "ActiveObject");
        assert_eq!(obj.name, "Ball");
        assert_eq!((obj.x, obj.y, obj.w, obj.h), (100.0, 100.0, 50.0, 50.0));
        assert_eq!(obj.color, "(255,0,0)");
        assert_eq!(obj.font_size, 24);
        assert_eq!(obj.text, "Hello");
    }

    #[test]
    fn test_empty_document_has_no_frames() {
        assert!(ProjectData::from_json("{}").unwrap().frames.is_empty());
    }

    #[test]
    fn test_numeric_params_become_text() {
        let json = r#"{ "type": "CompareCounter",
                        "params": { "counter_name": "Score", "operator": ">=", "value": 10 } }"#;
        let clause: ClauseData = serde_json::from_str(json).unwrap();
        assert_eq!(clause.params.get("value"), Some("10"));
        assert_eq!(clause.params.get("operator"), Some(">="));
    }

    #[test]
    fn test_params_keep_insertion_order() {
        let json = r#"{ "type": "X", "params": { "zeta": "1", "alpha": "2", "mid": "3" } }"#;
        let clause: ClauseData = serde_json::from_str(json).unwrap();
        let keys: Vec<&str> = clause.params.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["zeta", "alpha", "mid"]);
    }

    #[test]
    fn test_params_aliases() {
        let clause = ClauseData::new("ObjectCollision").with("obj_name_a", "A");
        assert_eq!(clause.params.get_any(&["obj_a", "obj_name_a"]), Some("A"));
        assert_eq!(clause.params.get_any(&["obj_b", "obj_name_b"]), None);
    }

    #[test]
    fn test_save_and_load_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("game.json");
        let mut project = ProjectData::starter();
        project.frames[1]
            .objects
            .push(ObjectData::new("ActiveObject", "Player", 10.0, 20.0));
        project.frames[1].events.push(EventData::new(
            vec![ClauseData::new("KeyPressed").with("key", "K_LEFT")],
            vec![ClauseData::new("GoToFrame").with("frame_name", "Menu")],
        ));
        project.save(&path).unwrap();

        assert_eq!(ProjectData::load(&path).unwrap(), project);
    }

    #[test]
    fn test_starter_frames() {
        let project = ProjectData::starter();
        assert_eq!(project.frame_names(), vec!["Menu", "Level1"]);
        assert_eq!(project.frame("Level1").unwrap().bg_color, [80, 80, 220]);
    }
}

//! Engine configuration.

use super::constants::*;
use super::error::Result;
use crate::utils::persistence::{data_path, load_json_or_default, save_json};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Settings shared by the runtime, editor and terminal front end.
///
/// Stored as `config.json` in the data directory. Unknown keys are ignored and
/// missing keys take their defaults, so older files keep loading.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Logical screen width that project coordinates are laid out in
    pub screen_width: u32,

    /// Logical screen height
    pub screen_height: u32,

    /// Fixed simulation rate
    pub fps: u32,

    /// Clamp for real-time gaps (pause, lag) before they reach the simulation
    pub max_frame_time_ms: u64,

    /// How long a terminal key press counts as held
    pub input_hold_ticks: u32,

    /// Reject projects that name unknown condition/action types
    pub strict_project: bool,

    /// `env_logger` filter used when `RUST_LOG` is unset
    pub log_filter: String,

    /// Most recently opened projects, newest first
    pub recent_projects: Vec<PathBuf>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            screen_width: SCREEN_WIDTH,
            screen_height: SCREEN_HEIGHT,
            fps: FPS,
            max_frame_time_ms: MAX_FRAME_TIME_MS,
            input_hold_ticks: INPUT_HOLD_TICKS,
            strict_project: false,
            log_filter: "info".to_string(),
            recent_projects: Vec::new(),
        }
    }
}

impl EngineConfig {
    /// Load from the default location, writing defaults on first run.
    pub fn load() -> Result<Self> {
        let path = data_path(CONFIG_FILE)?;
        let existed = path.exists();
        let config = Self::load_from(&path);
        if !existed {
            config.save_to(&path)?;
        }
        Ok(config)
    }

    /// Load from an explicit path; missing or unreadable files give defaults.
    pub fn load_from(path: &Path) -> Self {
        let config: Self = load_json_or_default(path);
        config.sanitized()
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&data_path(CONFIG_FILE)?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        save_json(path, self)
    }

    /// Milliseconds per simulation step.
    pub fn tick_ms(&self) -> u64 {
        (1000 / self.fps.max(1) as u64).max(1)
    }

    /// Apply one-off command-line overrides. The result is for this run only
    /// and must not be saved.
    pub fn with_overrides(mut self, fps: Option<u32>, strict: bool) -> Self {
        if let Some(fps) = fps.filter(|&f| f > 0) {
            self.fps = fps;
        }
        self.strict_project |= strict;
        self
    }

    /// Add a recent project to the config file at `config_path`, leaving
    /// every other stored setting untouched.
    pub fn remember_in(config_path: &Path, project: &Path) -> Result<()> {
        let mut stored = Self::load_from(config_path);
        stored.remember_project(project);
        stored.save_to(config_path)
    }

    /// [`remember_in`](Self::remember_in) for the default config file.
    pub fn remember_recent(project: &Path) -> Result<()> {
        Self::remember_in(&data_path(CONFIG_FILE)?, project)
    }

    /// Record a project as most recently used.
    pub fn remember_project(&mut self, path: &Path) {
        self.recent_projects.retain(|p| p != path);
        self.recent_projects.insert(0, path.to_path_buf());
        self.recent_projects.truncate(MAX_RECENT_PROJECTS);
    }

    /// Replace nonsensical values with defaults.
    fn sanitized(mut self) -> Self {
        let defaults = Self::default();
        if self.fps == 0 {
            self.fps = defaults.fps;
        }
        if self.screen_width == 0 || self.screen_height == 0 {
            self.screen_width = defaults.screen_width;
            self.screen_height = defaults.screen_height;
        }
        if self.max_frame_time_ms == 0 {
            self.max_frame_time_ms = defaults.max_frame_time_ms;
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_constants() {
        let config = EngineConfig::default();
        assert_eq!(config.screen_width, 800);
        assert_eq!(config.screen_height, 600);
        assert_eq!(config.fps, 60);
        assert_eq!(config.tick_ms(), 16);
        assert!(!config.strict_project);
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{ "fps": 30, "strict_project": true }"#).unwrap();

        let config = EngineConfig::load_from(&path);
        assert_eq!(config.fps, 30);
        assert!(config.strict_project);
        assert_eq!(config.screen_width, 800);
        assert_eq!(config.tick_ms(), 33);
    }

    #[test]
    fn test_zero_fps_is_sanitized() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{ "fps": 0 }"#).unwrap();

        assert_eq!(EngineConfig::load_from(&path).fps, 60);
    }

    #[test]
    fn test_remember_project_dedupes_and_caps() {
        let mut config = EngineConfig::default();
        for i in 0..12 {
            config.remember_project(Path::new(&format!("p{}.json", i)));
        }
        config.remember_project(Path::new("p5.json"));

        assert_eq!(config.recent_projects.len(), MAX_RECENT_PROJECTS);
        assert_eq!(config.recent_projects[0], PathBuf::from("p5.json"));
        assert_eq!(
            config
                .recent_projects
                .iter()
                .filter(|p| p.as_path() == Path::new("p5.json"))
                .count(),
            1
        );
    }

    #[test]
    fn test_overrides_never_reach_the_stored_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{ "fps": 30 }"#).unwrap();

        let runtime = EngineConfig::load_from(&path).with_overrides(Some(7), true);
        assert_eq!(runtime.fps, 7);
        assert!(runtime.strict_project);

        EngineConfig::remember_in(&path, Path::new("game.json")).unwrap();
        let stored = EngineConfig::load_from(&path);
        assert_eq!(stored.fps, 30);
        assert!(!stored.strict_project);
        assert_eq!(stored.recent_projects, vec![PathBuf::from("game.json")]);
    }

    #[test]
    fn test_remember_keeps_stored_settings_of_that_file_only() {
        let dir = tempfile::tempdir().unwrap();
        let default_path = dir.path().join("config.json");
        let other_path = dir.path().join("other.json");
        std::fs::write(&default_path, r#"{ "log_filter": "warn" }"#).unwrap();
        std::fs::write(&other_path, r#"{ "fps": 12, "log_filter": "trace" }"#).unwrap();

        // A run started with the other file still records into the default one
        let _runtime = EngineConfig::load_from(&other_path);
        EngineConfig::remember_in(&default_path, Path::new("a.json")).unwrap();

        let stored = EngineConfig::load_from(&default_path);
        assert_eq!(stored.fps, 60);
        assert_eq!(stored.log_filter, "warn");
        assert_eq!(stored.recent_projects, vec![PathBuf::from("a.json")]);
    }

    #[test]
    fn test_zero_fps_override_is_ignored() {
        let config = EngineConfig::default().with_overrides(Some(0), false);
        assert_eq!(config.fps, 60);
    }

    #[test]
    fn test_save_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        let mut config = EngineConfig::default();
        config.log_filter = "debug".to_string();
        config.save_to(&path).unwrap();

        assert_eq!(EngineConfig::load_from(&path), config);
    }
}

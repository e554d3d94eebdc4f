// Runtime screen defaults (project coordinates)
pub const SCREEN_WIDTH: u32 = 800;
pub const SCREEN_HEIGHT: u32 = 600;
pub const FPS: u32 = 60;

/// Largest real-time gap fed into one `advance` call.
pub const MAX_FRAME_TIME_MS: u64 = 100;

/// Ticks a terminal key press stays held (~200ms at 60 FPS).
/// Terminals report presses and repeats but never releases.
pub const INPUT_HOLD_TICKS: u32 = 12;

// Object defaults used when a project omits a key
pub const DEFAULT_OBJECT_TYPE: &str = "ActiveObject";
pub const DEFAULT_OBJECT_NAME: &str = "Obj";
pub const DEFAULT_OBJECT_X: f64 = 100.0;
pub const DEFAULT_OBJECT_Y: f64 = 100.0;
pub const DEFAULT_OBJECT_W: f64 = 50.0;
pub const DEFAULT_OBJECT_H: f64 = 50.0;
pub const DEFAULT_OBJECT_COLOR: &str = "(255,0,0)";
pub const DEFAULT_TEXT: &str = "Hello";
pub const DEFAULT_FONT_SIZE: u32 = 24;
pub const DEFAULT_FRAME_NAME: &str = "Unnamed";

// Built game bundles
pub const BUNDLE_MAGIC: u64 = 0x4B34_454E_4947_4E45; // "ENGINE4K" little-endian
pub const BUNDLE_VERSION: u32 = 1;
pub const BUNDLE_EXTENSION: &str = "e4k";

// Files under the data directory
pub const CONFIG_FILE: &str = "config.json";
pub const LOG_FILE: &str = "engine4k.log";
pub const MAX_RECENT_PROJECTS: usize = 8;

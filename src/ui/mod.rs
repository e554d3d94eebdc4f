//! Terminal front end: editor, runtime player and platformer view.

pub mod common;
pub mod editor_screen;
pub mod hedgehog_scene;
pub mod play_scene;
pub mod prompt;

pub use editor_screen::{EditorAction, EditorScreen};
pub use hedgehog_scene::{render_hedgehog_scene, HedgehogControls};
pub use play_scene::{map_key, render_play_scene};

//! engine4k: a Fusion-style event engine with a terminal editor, plus a
//! momentum-based 3D platformer core.
//!
//! This module exposes the engine for the binaries, tests and external use.

// Allow dead code in library - some functions are only used by the binary
#![allow(dead_code)]

pub mod audio;
pub mod build_info;
pub mod core;
pub mod editor;
pub mod engine;
pub mod math;
pub mod platformer;
pub mod project;
pub mod ui;
pub mod utils;

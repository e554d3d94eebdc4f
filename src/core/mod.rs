//! Engine-wide constants, errors and configuration.

pub mod config;
pub mod constants;
pub mod error;

pub use config::EngineConfig;
pub use constants::*;
pub use error::{EngineError, Result};

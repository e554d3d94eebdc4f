//! Hedgehog platformer core.

pub mod camera;
pub mod level;
pub mod logic;
pub mod session;
pub mod types;

pub use camera::FollowCamera;
pub use level::{generate_random_level, generate_test_level};
pub use session::HedgehogSession;
pub use types::{
    InteractionResults, Level, PhysicsSettings, Platform, PlatformerInput, Player, PlayerTuning,
    Ring, Spike, Spring,
};

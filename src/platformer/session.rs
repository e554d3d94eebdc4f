//! A running platformer game: level, player, camera and sound together.

use super::camera::FollowCamera;
use super::level::{generate_random_level, generate_test_level};
use super::logic;
use super::types::{InteractionResults, Level, PhysicsSettings, Player, PlatformerInput};
use crate::audio::AudioSystem;
use rand::rngs::StdRng;
use rand::SeedableRng;

/// Longest step fed to the physics; slower frames run in slow motion.
pub const MAX_DT: f32 = 1.0 / 30.0;

pub struct HedgehogSession {
    pub level: Level,
    pub player: Player,
    pub settings: PhysicsSettings,
    pub camera: FollowCamera,
    pub audio: AudioSystem,
    /// Rings collected over the whole session
    pub rings_collected: u32,
    last_dt: f32,
}

impl HedgehogSession {
    pub fn new(level: Level) -> Self {
        let player = Player::new(level.respawn_point);
        let camera = FollowCamera::behind(&player);
        Self {
            level,
            player,
            settings: PhysicsSettings::default(),
            camera,
            audio: AudioSystem::new(),
            rings_collected: 0,
            last_dt: 0.0,
        }
    }

    pub fn test_course() -> Self {
        Self::new(generate_test_level())
    }

    pub fn random(seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        Self::new(generate_random_level(&mut rng))
    }

    pub fn tick(&mut self, input: &PlatformerInput, dt: f32) -> InteractionResults {
        let dt = dt.clamp(0.0, MAX_DT);
        self.last_dt = dt;

        let results = logic::update(
            &mut self.player,
            &mut self.level,
            &self.settings,
            input,
            dt,
        );

        if results.rings_collected > 0 {
            self.rings_collected += results.rings_collected;
            self.audio.play("ring");
        }
        if results.hit_spring {
            self.audio.play("spring");
        }
        if results.hurt {
            self.audio.play("hurt");
        }

        self.player.update_animation(dt);
        self.camera.update(&self.player, dt);
        results
    }

    pub fn debug_text(&self) -> String {
        let fps = if self.last_dt > 0.0 {
            format!("{}", (1.0 / self.last_dt).round() as u32)
        } else {
            "inf".to_string()
        };
        format!(
            "Speed: {:.1}\nVertical: {:.1}\nGrounded: {}\nHoming: {}\nRings: {}\nFPS: {}",
            self.player.speed,
            self.player.velocity.y,
            self.player.is_grounded,
            self.player.is_homing,
            self.rings_collected,
            fps
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::Vec3;

    #[test]
    fn test_dt_is_capped() {
        let mut session = HedgehogSession::test_course();
        session.tick(&PlatformerInput::default(), 1.0);
        assert!(session.debug_text().ends_with("FPS: 30"));
    }

    #[test]
    fn test_debug_text_before_first_tick() {
        let session = HedgehogSession::random(1);
        let text = session.debug_text();
        assert!(text.starts_with("Speed: 0.0"));
        assert!(text.contains("Rings: 0"));
        assert!(text.ends_with("FPS: inf"));
    }

    #[test]
    fn test_ring_pickup_plays_sound() {
        let mut session = HedgehogSession::test_course();
        let ring = session.level.rings[0].position;
        session.player.position = ring - Vec3::UP * 0.5;
        let results = session.tick(&PlatformerInput::default(), 1.0 / 60.0);

        assert_eq!(results.rings_collected, 1);
        assert_eq!(session.rings_collected, 1);
        let played = session.audio.drain_played();
        assert_eq!(played.len(), 1);
        assert_eq!(played[0].name, "ring");
    }

    #[test]
    fn test_random_session_is_seeded() {
        let a = HedgehogSession::random(42);
        let b = HedgehogSession::random(42);
        assert_eq!(a.level, b.level);
        assert_eq!(a.player.position, Vec3::new(0.0, 5.0, 0.0));
    }
}

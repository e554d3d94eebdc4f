//! Speed-reactive follow camera.

use super::types::Player;
use crate::math::{lerp, Vec3};

pub const BASE_FOV: f32 = 75.0;
pub const MAX_FOV: f32 = 90.0;
pub const BASE_DISTANCE: f32 = 12.0;
pub const MAX_DISTANCE: f32 = 18.0;
pub const BASE_HEIGHT: f32 = 4.0;
pub const MAX_HEIGHT: f32 = 6.0;

/// Trails behind the player, pulling back and widening as speed builds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FollowCamera {
    pub position: Vec3,
    pub fov: f32,
    pub look_at: Vec3,
}

impl FollowCamera {
    /// Start directly behind `player` at the resting distance.
    pub fn behind(player: &Player) -> Self {
        Self {
            position: player.position - player.forward() * BASE_DISTANCE
                + Vec3::UP * BASE_HEIGHT,
            fov: BASE_FOV,
            look_at: player.position + Vec3::UP,
        }
    }

    pub fn update(&mut self, player: &Player, dt: f32) {
        let speed_factor = (player.speed / player.tuning.max_speed).min(1.0);

        let target_fov = lerp(BASE_FOV, MAX_FOV, speed_factor);
        self.fov = lerp(self.fov, target_fov, dt * 3.0);

        let distance = lerp(BASE_DISTANCE, MAX_DISTANCE, speed_factor);
        let height = lerp(BASE_HEIGHT, MAX_HEIGHT, speed_factor);
        let target = player.position - player.forward() * distance + Vec3::UP * height;
        self.position = Vec3::lerp(self.position, target, dt * 5.0);

        self.look_at = player.position + Vec3::UP + player.velocity * 0.1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_camera_pulls_back_at_speed() {
        let mut player = Player::new(Vec3::ZERO);
        let mut camera = FollowCamera::behind(&player);
        assert_eq!(camera.position, Vec3::new(0.0, 4.0, -12.0));

        player.speed = player.tuning.max_speed;
        for _ in 0..300 {
            camera.update(&player, 1.0 / 60.0);
        }
        assert!((camera.fov - MAX_FOV).abs() < 0.1);
        assert!((camera.position.z + MAX_DISTANCE).abs() < 0.1);
        assert!((camera.position.y - MAX_HEIGHT).abs() < 0.1);
    }

    #[test]
    fn test_look_point_leads_velocity() {
        let mut player = Player::new(Vec3::ZERO);
        player.velocity = Vec3::new(0.0, 0.0, 20.0);
        let mut camera = FollowCamera::behind(&player);
        camera.update(&player, 1.0 / 60.0);
        assert_eq!(camera.look_at, Vec3::new(0.0, 1.0, 2.0));
    }
}

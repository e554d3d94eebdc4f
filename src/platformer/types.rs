//! Hedgehog platformer data structures.
//!
//! A momentum-based 3D character on a course of box platforms and ramps,
//! collecting rings, bouncing on springs and avoiding spikes. Y is up and the
//! player's `position` is the point under its feet.

use crate::math::{lerp, Aabb, Color, Vec3};

/// Half the player's height; the body center sits this far above the feet.
pub const PLAYER_RADIUS: f32 = 0.5;

/// Surfaces more than this far above the wall probe count as walls.
pub const STEP_HEIGHT: f32 = 0.3;

/// Movement tuning for the player character.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlayerTuning {
    pub max_speed: f32,
    /// Forward acceleration on flat ground (units/s^2)
    pub acceleration: f32,
    pub deceleration: f32,
    /// Per-second speed retention factor
    pub friction: f32,
    /// Degrees per update at full stick, smoothed on the ground
    pub turn_speed: f32,
    pub air_turn_speed: f32,
    pub jump_power: f32,
    pub air_control_force: f32,
    /// Extra acceleration per unit of downhill slope
    pub slope_boost_factor: f32,
    pub homing_speed: f32,
    pub max_health: u32,
}

impl Default for PlayerTuning {
    fn default() -> Self {
        Self {
            max_speed: 50.0,
            acceleration: 40.0,
            deceleration: 30.0,
            friction: 0.98,
            turn_speed: 5.0,
            air_turn_speed: 3.0,
            jump_power: 15.0,
            air_control_force: 50.0,
            slope_boost_factor: 20.0,
            homing_speed: 60.0,
            max_health: 3,
        }
    }
}

/// World rules shared by every level.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhysicsSettings {
    pub gravity: f32,
    pub ground_check_dist: f32,
    pub wall_check_dist: f32,
    pub homing_range: f32,
    /// Minimum forward alignment (dot product) for a homing target
    pub homing_dot_threshold: f32,
    /// Homing ends once this close to the target horizontally
    pub homing_finish_dist: f32,
    /// Falling below this height respawns the player
    pub kill_plane_y: f32,
    pub ring_radius: f32,
    pub spring_radius: f32,
    pub spike_radius: f32,
    /// Seconds of invincibility after taking damage
    pub invincibility_secs: f32,
    pub spin_secs: f32,
}

impl Default for PhysicsSettings {
    fn default() -> Self {
        Self {
            gravity: 35.0,
            ground_check_dist: 0.5,
            wall_check_dist: 0.6,
            homing_range: 15.0,
            homing_dot_threshold: 0.3,
            homing_finish_dist: 1.5,
            kill_plane_y: -12.0,
            ring_radius: 1.3,
            spring_radius: 1.3,
            spike_radius: 1.2,
            invincibility_secs: 1.0,
            spin_secs: 0.5,
        }
    }
}

/// Cosmetic state for the quills and squash.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnimationState {
    pub timer: f32,
    /// Quill rotation in degrees
    pub quill_angle: f32,
    pub scale_y: f32,
}

impl Default for AnimationState {
    fn default() -> Self {
        Self {
            timer: 0.0,
            quill_angle: 0.0,
            scale_y: 1.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Player {
    pub position: Vec3,
    pub velocity: Vec3,
    /// Heading in degrees; 0 faces +z, 90 faces +x
    pub rotation_y: f32,
    /// Ground speed along the facing direction
    pub speed: f32,
    pub is_grounded: bool,
    pub can_double_jump: bool,
    pub is_homing: bool,
    /// Index into `Level::rings`
    pub homing_target: Option<usize>,
    pub health: u32,
    pub invincible_timer: f32,
    pub spin_timer: f32,
    pub tuning: PlayerTuning,
    pub animation: AnimationState,
}

impl Player {
    pub fn new(position: Vec3) -> Self {
        Self::with_tuning(position, PlayerTuning::default())
    }

    pub fn with_tuning(position: Vec3, tuning: PlayerTuning) -> Self {
        Self {
            position,
            velocity: Vec3::ZERO,
            rotation_y: 0.0,
            speed: 0.0,
            is_grounded: false,
            can_double_jump: true,
            is_homing: false,
            homing_target: None,
            health: tuning.max_health,
            invincible_timer: 0.0,
            spin_timer: 0.0,
            tuning,
            animation: AnimationState::default(),
        }
    }

    pub fn forward(&self) -> Vec3 {
        let r = self.rotation_y.to_radians();
        Vec3::new(r.sin(), 0.0, r.cos())
    }

    pub fn right(&self) -> Vec3 {
        let r = self.rotation_y.to_radians();
        Vec3::new(r.cos(), 0.0, -r.sin())
    }

    pub fn body_center(&self) -> Vec3 {
        self.position + Vec3::UP * PLAYER_RADIUS
    }

    pub fn is_invincible(&self) -> bool {
        self.invincible_timer > 0.0
    }

    pub fn is_spinning(&self) -> bool {
        self.spin_timer > 0.0
    }

    /// Back to `point`, motionless, with homing cancelled.
    pub fn respawn(&mut self, point: Vec3) {
        self.position = point;
        self.velocity = Vec3::ZERO;
        self.speed = 0.0;
        self.is_homing = false;
        self.homing_target = None;
        self.is_grounded = false;
    }

    pub fn update_animation(&mut self, dt: f32) {
        let spinning = self.is_spinning();
        let anim = &mut self.animation;
        if self.is_grounded {
            anim.timer += self.speed * dt * 0.5;
            anim.quill_angle = anim.timer % 360.0;
            anim.scale_y = lerp(anim.scale_y, 1.0, dt * 10.0);
        } else {
            anim.quill_angle = lerp(anim.quill_angle, 30.0, dt * 5.0);
            let target = if self.velocity.y < -5.0 { 0.8 } else { 1.0 };
            anim.scale_y = lerp(anim.scale_y, target, dt * 10.0);
        }
        if spinning {
            anim.quill_angle = (anim.quill_angle + 360.0 * dt) % 360.0;
        }
        if self.is_homing {
            anim.scale_y = lerp(anim.scale_y, 0.8, dt * 20.0);
        }
    }
}

/// A solid box. A non-zero pitch turns it into a ramp whose top surface
/// rises toward +z.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Platform {
    pub center: Vec3,
    pub size: Vec3,
    pub pitch_deg: f32,
    pub color: Color,
}

impl Platform {
    pub fn new(center: Vec3, size: Vec3, color: Color) -> Self {
        Self {
            center,
            size,
            pitch_deg: 0.0,
            color,
        }
    }

    pub fn ramp(center: Vec3, size: Vec3, pitch_deg: f32, color: Color) -> Self {
        Self {
            pitch_deg,
            ..Self::new(center, size, color)
        }
    }

    /// Bounds including the raised end of a ramp.
    pub fn aabb(&self) -> Aabb {
        let rise = self.pitch_deg.to_radians().tan().abs() * self.size.z * 0.5;
        let mut aabb = Aabb::from_center_size(self.center, self.size);
        aabb.min.y -= rise;
        aabb.max.y += rise;
        aabb
    }

    pub fn covers_xz(&self, x: f32, z: f32) -> bool {
        (x - self.center.x).abs() <= self.size.x.abs() * 0.5
            && (z - self.center.z).abs() <= self.size.z.abs() * 0.5
    }

    /// Height of the top surface above (x, z).
    pub fn surface_y(&self, _x: f32, z: f32) -> f32 {
        let slope = self.pitch_deg.to_radians().tan();
        self.center.y + self.size.y.abs() * 0.5 + slope * (z - self.center.z)
    }

    pub fn surface_normal(&self) -> Vec3 {
        let p = self.pitch_deg.to_radians();
        Vec3::new(0.0, p.cos(), -p.sin())
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ring {
    pub position: Vec3,
    pub collected: bool,
}

impl Ring {
    pub fn new(position: Vec3) -> Self {
        Self {
            position,
            collected: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Spring {
    pub position: Vec3,
    /// Upward velocity given on contact
    pub power: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Spike {
    pub position: Vec3,
}

/// What the ground probe found.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GroundHit {
    pub height: f32,
    pub normal: Vec3,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Level {
    pub platforms: Vec<Platform>,
    pub rings: Vec<Ring>,
    pub springs: Vec<Spring>,
    pub spikes: Vec<Spike>,
    pub respawn_point: Vec3,
    /// The player is kept inside these bounds
    pub bounds: Aabb,
}

impl Level {
    pub fn empty(respawn_point: Vec3, bounds: Aabb) -> Self {
        Self {
            platforms: Vec::new(),
            rings: Vec::new(),
            springs: Vec::new(),
            spikes: Vec::new(),
            respawn_point,
            bounds,
        }
    }

    /// Cast straight down from `origin`. Returns the highest surface within
    /// `max_dist` below it.
    pub fn ground_hit(&self, origin: Vec3, max_dist: f32) -> Option<GroundHit> {
        self.platforms
            .iter()
            .filter(|p| p.covers_xz(origin.x, origin.z))
            .filter_map(|p| {
                let height = p.surface_y(origin.x, origin.z);
                (height <= origin.y && height >= origin.y - max_dist).then(|| GroundHit {
                    height,
                    normal: p.surface_normal(),
                })
            })
            .max_by(|a, b| a.height.total_cmp(&b.height))
    }

    /// Horizontal normal of a wall within `dist` of `origin` along `dir`.
    ///
    /// Only the sides of a platform count: anything the player could step onto
    /// is left to the ground probe.
    pub fn wall_normal(&self, origin: Vec3, dir: Vec3, dist: f32) -> Option<Vec3> {
        let probe = origin + dir.normalize() * dist;
        self.platforms
            .iter()
            .filter(|p| p.aabb().contains(probe))
            .filter(|p| probe.y < p.surface_y(probe.x, probe.z) - STEP_HEIGHT)
            .map(|p| {
                // Unbounded height so only side faces can be nearest
                let mut sides = p.aabb();
                sides.min.y = f32::MIN;
                sides.max.y = f32::MAX;
                sides.closest_face_normal(probe)
            })
            .next()
    }

    pub fn rings_remaining(&self) -> usize {
        self.rings.iter().filter(|r| !r.collected).count()
    }
}

/// One update's worth of player input.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PlatformerInput {
    /// -1 (left) to 1 (right)
    pub move_x: f32,
    /// -1 (back) to 1 (forward)
    pub move_z: f32,
    /// Jump pressed this update
    pub jump: bool,
    /// Spin attack pressed this update
    pub spin: bool,
}

impl PlatformerInput {
    /// Stick direction, normalized so diagonals are not faster.
    pub fn movement(&self) -> (f32, f32) {
        let len = (self.move_x * self.move_x + self.move_z * self.move_z).sqrt();
        if len > 1.0 {
            (self.move_x / len, self.move_z / len)
        } else {
            (self.move_x, self.move_z)
        }
    }
}

/// What happened during one update.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InteractionResults {
    pub rings_collected: u32,
    pub hit_spring: bool,
    pub hurt: bool,
    pub respawned: bool,
}

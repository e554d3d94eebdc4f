//! Hedgehog platformer physics: ground and air movement, homing attack,
//! wall sliding and level interactions.

use super::types::*;
use crate::math::{distance_sq, distance_xz, lerp, Vec3};

/// Advance the player by `dt` seconds.
pub fn update(
    player: &mut Player,
    level: &mut Level,
    settings: &PhysicsSettings,
    input: &PlatformerInput,
    dt: f32,
) -> InteractionResults {
    let (move_x, move_z) = input.movement();
    let tuning = player.tuning;

    player.invincible_timer = (player.invincible_timer - dt).max(0.0);
    player.spin_timer = (player.spin_timer - dt).max(0.0);
    if input.spin && !player.is_spinning() {
        player.spin_timer = settings.spin_secs;
    }

    // 1. Ground probe. Extends by this step's fall so fast drops cannot skip
    // through a thin surface. A rising player is never grounded.
    let probe_origin = player.position + Vec3::UP * 0.1;
    let probe_dist = settings.ground_check_dist + (-player.velocity.y * dt).max(0.0);
    let ground = level
        .ground_hit(probe_origin, probe_dist)
        .filter(|_| player.velocity.y <= 0.0);
    player.is_grounded = ground.is_some();

    if player.is_homing {
        // 2. Homing attack
        steer_homing(player, level, settings);
    } else if let Some(hit) = ground {
        // 3. Ground movement
        player.can_double_jump = true;
        if player.velocity.y < 0.0 {
            player.velocity.y = 0.0;
        }
        player.position.y = hit.height + 0.01;

        let target_rotation = player.rotation_y + move_x * tuning.turn_speed;
        player.rotation_y = lerp(player.rotation_y, target_rotation, dt * 10.0);

        let forward_on_slope = project_on_plane(player.forward(), hit.normal).normalize();
        if move_z > 0.0 {
            let slope_effect = -forward_on_slope.y;
            let accel = tuning.acceleration + slope_effect * tuning.slope_boost_factor;
            player.speed += accel * dt;
        } else {
            player.speed -= tuning.deceleration * dt;
        }
        player.speed *= tuning.friction.powf(dt);
        player.speed = player.speed.clamp(0.0, tuning.max_speed);
        player.velocity = player.velocity.with_xz(
            forward_on_slope.x * player.speed,
            forward_on_slope.z * player.speed,
        );

        if input.jump {
            player.velocity.y = tuning.jump_power;
            player.is_grounded = false;
        }
    } else {
        // 4. Air movement
        player.velocity.y -= settings.gravity * dt;
        player.rotation_y += move_x * tuning.air_turn_speed;

        let air_control = player.forward() * move_z + player.right() * move_x;
        player.velocity += air_control * tuning.air_control_force * dt;

        let max_air_speed = tuning.max_speed * 0.8;
        let air_speed = player.velocity.xz_length();
        if air_speed > max_air_speed {
            let scale = max_air_speed / air_speed;
            player.velocity = player
                .velocity
                .with_xz(player.velocity.x * scale, player.velocity.z * scale);
        }

        if input.jump && player.can_double_jump {
            player.can_double_jump = false;
            if let Some(target) = find_homing_target(player, level, settings) {
                log::debug!("Homing attack on ring {}", target);
                player.homing_target = Some(target);
                player.is_homing = true;
                player.velocity = Vec3::ZERO;
            }
        }
    }

    // 5. Slide along walls
    if !player.is_homing && player.velocity.length_squared() > 0.0 {
        if let Some(normal) = level.wall_normal(probe_origin, player.velocity, settings.wall_check_dist) {
            player.velocity -= normal * player.velocity.dot(normal);
        }
    }

    // 6. Integrate and interact
    player.position += player.velocity * dt;
    let mut results = interact(player, level, settings);

    if player.position.y < settings.kill_plane_y {
        log::info!("Fell out of the level; respawning");
        player.respawn(level.respawn_point);
        results.respawned = true;
    }
    player.position = level.bounds.closest_point(player.position);

    results
}

/// Nearest uncollected ring within homing range and roughly in front.
pub fn find_homing_target(player: &Player, level: &Level, settings: &PhysicsSettings) -> Option<usize> {
    let origin = player.body_center();
    let forward = player.forward();
    let mut best: Option<usize> = None;
    let mut best_dist_sq = settings.homing_range * settings.homing_range;

    for (index, ring) in level.rings.iter().enumerate() {
        if ring.collected {
            continue;
        }
        let dist_sq = distance_sq(origin, ring.position);
        if dist_sq < best_dist_sq {
            let to_target = (ring.position - origin).normalize();
            if forward.dot(to_target) > settings.homing_dot_threshold {
                best_dist_sq = dist_sq;
                best = Some(index);
            }
        }
    }
    best
}

fn steer_homing(player: &mut Player, level: &Level, settings: &PhysicsSettings) {
    let target = player
        .homing_target
        .and_then(|i| level.rings.get(i))
        .filter(|ring| !ring.collected)
        .map(|ring| ring.position);

    let Some(target) = target else {
        player.is_homing = false;
        player.homing_target = None;
        return;
    };

    let origin = player.body_center();
    let direction = (target - origin).normalize();
    player.velocity = direction * player.tuning.homing_speed;

    if distance_xz(origin, target) < settings.homing_finish_dist {
        player.is_homing = false;
        player.homing_target = None;
        player.velocity = direction * player.speed;
        player.velocity.y = player.velocity.y.max(0.0);
    }
}

fn interact(player: &mut Player, level: &mut Level, settings: &PhysicsSettings) -> InteractionResults {
    let mut results = InteractionResults::default();
    let body = player.body_center();

    for ring in level.rings.iter_mut().filter(|r| !r.collected) {
        if distance_sq(body, ring.position) < settings.ring_radius * settings.ring_radius {
            ring.collected = true;
            results.rings_collected += 1;
        }
    }

    if let Some(spring) = level
        .springs
        .iter()
        .find(|s| distance_sq(body, s.position) < settings.spring_radius * settings.spring_radius)
    {
        player.velocity.y = spring.power;
        player.is_homing = false;
        player.homing_target = None;
        player.is_grounded = false;
        results.hit_spring = true;
    }

    let on_spike = level
        .spikes
        .iter()
        .any(|s| distance_sq(body, s.position) < settings.spike_radius * settings.spike_radius);
    if on_spike && !player.is_invincible() {
        player.health = player.health.saturating_sub(1);
        player.invincible_timer = settings.invincibility_secs;
        results.hurt = true;
        log::debug!("Hit spikes; health {}", player.health);

        if player.health == 0 {
            player.respawn(level.respawn_point);
            player.health = player.tuning.max_health;
            results.respawned = true;
        }
    }

    results
}

/// Component of `v` lying in the plane with normal `n`.
fn project_on_plane(v: Vec3, n: Vec3) -> Vec3 {
    let n = n.normalize();
    v - n * v.dot(n)
}

//! Integration test: hedgehog sessions on generated levels
//!
//! Drives full sessions (physics, sounds, camera) through the public API on
//! the test course and on seeded random arenas.

use engine4k::math::Vec3;
use engine4k::platformer::{HedgehogSession, PlatformerInput};

const DT: f32 = 1.0 / 60.0;

fn idle() -> PlatformerInput {
    PlatformerInput::default()
}

#[test]
fn test_player_lands_on_test_course() {
    let mut session = HedgehogSession::test_course();
    for _ in 0..120 {
        session.tick(&idle(), DT);
    }
    let p = session.player.position;
    assert!(session.player.is_grounded);
    assert!(
        (p.y - 1.01).abs() < 0.02 || (p.y - 0.01).abs() < 0.02,
        "resting height {}",
        p.y
    );
    assert_eq!(session.player.velocity.y, 0.0);
}

#[test]
fn test_same_seed_same_run() {
    let run = |seed| {
        let mut session = HedgehogSession::random(seed);
        let input = PlatformerInput {
            move_z: 1.0,
            move_x: 0.3,
            ..PlatformerInput::default()
        };
        for i in 0..240 {
            let jump = i % 60 == 0;
            session.tick(&PlatformerInput { jump, ..input }, DT);
        }
        (session.player.position, session.rings_collected)
    };
    assert_eq!(run(11), run(11));
}

#[test]
fn test_spring_launches_and_plays_sound() {
    let mut session = HedgehogSession::test_course();
    let spring = session.level.springs[0];
    session.player.position = spring.position - Vec3::UP * 0.5;

    let results = session.tick(&idle(), DT);
    assert!(results.hit_spring);
    assert_eq!(session.player.velocity.y, spring.power);
    assert!(session
        .audio
        .drain_played()
        .iter()
        .any(|p| p.name == "spring"));

    // Still rising a few frames later
    for _ in 0..5 {
        session.tick(&idle(), DT);
    }
    assert!(session.player.position.y > spring.position.y);
}

#[test]
fn test_spike_strip_hurts_once_while_invincible() {
    let mut session = HedgehogSession::test_course();
    session.player.position = Vec3::new(7.0, 1.0, 0.0);

    let first = session.tick(&idle(), DT);
    assert!(first.hurt);
    assert_eq!(session.player.health, 2);

    for _ in 0..30 {
        assert!(!session.tick(&idle(), DT).hurt);
    }
    assert_eq!(session.player.health, 2);

    let sounds: Vec<String> = session
        .audio
        .drain_played()
        .into_iter()
        .map(|p| p.name)
        .collect();
    assert_eq!(sounds, vec!["hurt".to_string()]);
}

#[test]
fn test_falling_below_kill_plane_respawns() {
    let mut session = HedgehogSession::random(3);
    session.player.position = Vec3::new(0.0, -11.95, 0.0);
    session.player.velocity = Vec3::new(0.0, -10.0, 0.0);

    let results = session.tick(&idle(), DT);
    assert!(results.respawned);
    assert_eq!(session.player.position, session.level.respawn_point);
    assert_eq!(session.player.velocity, Vec3::ZERO);
}

#[test]
fn test_camera_trails_behind_moving_player() {
    let mut session = HedgehogSession::test_course();
    let input = PlatformerInput {
        move_z: 1.0,
        ..PlatformerInput::default()
    };
    for _ in 0..90 {
        session.tick(&input, DT);
    }
    let player = &session.player;
    assert!(player.speed > 0.0);
    assert!(session.camera.position.z < player.position.z);
    assert!(session.camera.position.y > player.position.y);
    assert!(session.camera.fov > 75.0);
}

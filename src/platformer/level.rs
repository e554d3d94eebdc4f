//! Level construction: the hand-built test course and seeded random arenas.

use super::types::{Level, Platform, Ring, Spike, Spring};
use crate::math::{Aabb, Color, Vec3};
use rand::Rng;
use std::f32::consts::TAU;

const GRASS: Color = Color::rgb(51, 178, 76);
const STONE: Color = Color::rgb(127, 127, 153);
const CLAY: Color = Color::rgb(153, 127, 127);
const MOSS: Color = Color::rgb(127, 153, 127);
const SAND: Color = Color::rgb(178, 178, 102);
const LOOP: Color = Color::rgb(102, 102, 204);

/// `count` rings evenly spaced from `start` to `end` inclusive.
/// A count of one or less places a single ring at `start`.
pub fn ring_line(start: Vec3, end: Vec3, count: usize) -> Vec<Ring> {
    if count <= 1 {
        return vec![Ring::new(start)];
    }
    let step = (end - start) / (count - 1) as f32;
    (0..count)
        .map(|i| Ring::new(start + step * i as f32))
        .collect()
}

/// `count` rings on a horizontal circle.
pub fn ring_circle(center: Vec3, radius: f32, count: usize) -> Vec<Ring> {
    (0..count)
        .map(|i| {
            let angle = TAU * i as f32 / count as f32;
            Ring::new(Vec3::new(
                center.x + radius * angle.cos(),
                center.y,
                center.z + radius * angle.sin(),
            ))
        })
        .collect()
}

/// Box segments approximating a vertical loop in the x-y plane, standing on
/// `center` (the loop's lowest point sits at `center.y`).
pub fn loop_segments(center: Vec3, radius: f32, thickness: f32, segments: usize) -> Vec<Platform> {
    let point = |i: usize| {
        let angle = TAU * i as f32 / segments as f32;
        Vec3::new(
            center.x + radius * angle.cos(),
            center.y + radius * angle.sin() + radius,
            center.z,
        )
    };
    (0..segments)
        .map(|i| {
            let mid = (point(i) + point(i + 1)) * 0.5;
            Platform::new(
                mid,
                Vec3::new(thickness * 1.5, thickness, thickness * 2.5),
                LOOP,
            )
        })
        .collect()
}

/// The demo course: platforms, two ramps, a loop, ring trails and springs.
pub fn generate_test_level() -> Level {
    let bounds = Aabb {
        min: Vec3::new(-75.0, -20.0, -75.0),
        max: Vec3::new(75.0, 60.0, 75.0),
    };
    let mut level = Level::empty(Vec3::new(0.0, 2.0, -5.0), bounds);

    level.platforms.push(Platform::new(
        Vec3::new(0.0, -0.5, 0.0),
        Vec3::new(150.0, 1.0, 150.0),
        GRASS,
    ));
    level.platforms.push(Platform::new(
        Vec3::new(0.0, 0.5, 0.0),
        Vec3::new(20.0, 1.0, 10.0),
        STONE,
    ));
    level.platforms.push(Platform::new(
        Vec3::new(15.0, 2.0, 20.0),
        Vec3::new(8.0, 1.0, 15.0),
        CLAY,
    ));
    level.platforms.push(Platform::new(
        Vec3::new(-10.0, 4.0, 35.0),
        Vec3::new(12.0, 1.0, 5.0),
        MOSS,
    ));
    level.platforms.push(Platform::ramp(
        Vec3::new(25.0, 1.0, 40.0),
        Vec3::new(8.0, 1.0, 5.0),
        20.0,
        SAND,
    ));
    level.platforms.push(Platform::ramp(
        Vec3::new(-5.0, 5.0, 50.0),
        Vec3::new(8.0, 1.0, 5.0),
        -25.0,
        SAND,
    ));
    level
        .platforms
        .extend(loop_segments(Vec3::new(0.0, 0.0, 70.0), 10.0, 3.0, 24));

    level.rings.extend(ring_line(
        Vec3::new(0.0, 3.0, 5.0),
        Vec3::new(0.0, 3.0, 25.0),
        8,
    ));
    level
        .rings
        .extend(ring_circle(Vec3::new(15.0, 4.0, 30.0), 6.0, 10));
    level.rings.extend(ring_line(
        Vec3::new(-10.0, 6.0, 40.0),
        Vec3::new(10.0, 6.0, 40.0),
        5,
    ));

    level.springs.push(Spring {
        position: Vec3::new(5.0, 1.0, 35.0),
        power: 25.0,
    });
    level.springs.push(Spring {
        position: Vec3::new(-5.0, 1.0, 10.0),
        power: 35.0,
    });

    // A strip of spikes on the starting platform
    for x in [6.0, 7.0, 8.0] {
        level.spikes.push(Spike {
            position: Vec3::new(x, 1.5, 0.0),
        });
    }

    level
}

/// A small arena of random platforms and rings. Deterministic for a given RNG.
pub fn generate_random_level<R: Rng>(rng: &mut R) -> Level {
    let bounds = Aabb {
        min: Vec3::new(-25.0, -20.0, -25.0),
        max: Vec3::new(25.0, 25.0, 25.0),
    };
    let mut level = Level::empty(Vec3::new(0.0, 5.0, 0.0), bounds);

    level.platforms.push(Platform::new(
        Vec3::new(0.0, -2.0, 0.0),
        Vec3::new(50.0, 1.0, 50.0),
        Color::GRAY,
    ));

    for _ in 0..18 {
        let center = Vec3::new(
            rng.gen_range(-15.0..=15.0),
            rng.gen_range(0.0..=10.0),
            rng.gen_range(-15.0..=15.0),
        );
        let size = Vec3::new(
            rng.gen_range(2..=5) as f32,
            1.0,
            rng.gen_range(2..=5) as f32,
        );
        level
            .platforms
            .push(Platform::new(center, size, random_color(rng)));
    }

    for _ in 0..24 {
        level.rings.push(Ring::new(Vec3::new(
            rng.gen_range(-15.0..=15.0),
            3.0,
            rng.gen_range(-15.0..=15.0),
        )));
    }

    level.springs.push(Spring {
        position: Vec3::new(5.0, 1.0, 5.0),
        power: 14.4,
    });
    level.spikes.push(Spike {
        position: Vec3::new(-5.0, 1.0, 5.0),
    });

    level
}

fn random_color<R: Rng>(rng: &mut R) -> Color {
    Color::rgb(
        rng.gen_range(64..=255),
        rng.gen_range(64..=255),
        rng.gen_range(64..=255),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_ring_line() {
        let rings = ring_line(Vec3::ZERO, Vec3::new(0.0, 0.0, 10.0), 5);
        assert_eq!(rings.len(), 5);
        assert_eq!(rings[0].position, Vec3::ZERO);
        assert_eq!(rings[4].position, Vec3::new(0.0, 0.0, 10.0));
        assert_eq!(rings[2].position, Vec3::new(0.0, 0.0, 5.0));

        let single = ring_line(Vec3::new(1.0, 2.0, 3.0), Vec3::ZERO, 1);
        assert_eq!(single.len(), 1);
        assert_eq!(single[0].position, Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(ring_line(Vec3::ZERO, Vec3::ZERO, 0).len(), 1);
    }

    #[test]
    fn test_ring_circle_radius() {
        let center = Vec3::new(15.0, 4.0, 30.0);
        let rings = ring_circle(center, 6.0, 10);
        assert_eq!(rings.len(), 10);
        for ring in &rings {
            assert!(((ring.position - center).length() - 6.0).abs() < 1e-4);
            assert_eq!(ring.position.y, 4.0);
        }
    }

    #[test]
    fn test_loop_spans_diameter() {
        let segments = loop_segments(Vec3::new(0.0, 0.0, 70.0), 10.0, 3.0, 24);
        assert_eq!(segments.len(), 24);
        let top = segments
            .iter()
            .map(|p| p.center.y)
            .fold(f32::MIN, f32::max);
        assert!(top > 19.0 && top <= 20.0);
        assert!(segments.iter().all(|p| p.center.z == 70.0));
    }

    #[test]
    fn test_test_level_contents() {
        let level = generate_test_level();
        assert_eq!(level.platforms.len(), 6 + 24);
        assert_eq!(level.rings.len(), 8 + 10 + 5);
        assert_eq!(level.springs.len(), 2);
        assert_eq!(level.spikes.len(), 3);
        assert!(level.bounds.contains(level.respawn_point));
    }

    #[test]
    fn test_random_level_is_deterministic_per_seed() {
        let a = generate_random_level(&mut ChaCha8Rng::seed_from_u64(7));
        let b = generate_random_level(&mut ChaCha8Rng::seed_from_u64(7));
        let c = generate_random_level(&mut ChaCha8Rng::seed_from_u64(8));
        assert_eq!(a, b);
        assert_ne!(a, c);

        assert_eq!(a.platforms.len(), 19);
        assert_eq!(a.rings.len(), 24);
        assert_eq!(a.springs.len(), 1);
        assert_eq!(a.spikes.len(), 1);
        for p in &a.platforms[1..] {
            assert!(p.center.x.abs() <= 15.0 && p.center.z.abs() <= 15.0);
            assert!((2.0..=5.0).contains(&p.size.x));
        }
    }
}

use super::vector::Vec3;

/// Axis-aligned bounding box defined by its minimum and maximum corners.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    /// Box centered at `center` with full extents `size` (negative sizes are flipped).
    pub fn from_center_size(center: Vec3, size: Vec3) -> Self {
        let half = Vec3::new(size.x.abs(), size.y.abs(), size.z.abs()) * 0.5;
        Self {
            min: center - half,
            max: center + half,
        }
    }

    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    pub fn contains(&self, p: Vec3) -> bool {
        p.x >= self.min.x
            && p.x <= self.max.x
            && p.y >= self.min.y
            && p.y <= self.max.y
            && p.z >= self.min.z
            && p.z <= self.max.z
    }

    /// Whether the horizontal footprint covers (x, z).
    pub fn covers_xz(&self, x: f32, z: f32) -> bool {
        x >= self.min.x && x <= self.max.x && z >= self.min.z && z <= self.max.z
    }

    pub fn intersects(&self, other: &Aabb) -> bool {
        self.min.x <= other.max.x
            && self.max.x >= other.min.x
            && self.min.y <= other.max.y
            && self.max.y >= other.min.y
            && self.min.z <= other.max.z
            && self.max.z >= other.min.z
    }

    pub fn closest_point(&self, p: Vec3) -> Vec3 {
        Vec3::new(
            p.x.clamp(self.min.x, self.max.x),
            p.y.clamp(self.min.y, self.max.y),
            p.z.clamp(self.min.z, self.max.z),
        )
    }

    pub fn intersects_sphere(&self, center: Vec3, radius: f32) -> bool {
        (self.closest_point(center) - center).length_squared() <= radius * radius
    }

    /// Outward normal of the face nearest to a point inside the box.
    pub fn closest_face_normal(&self, p: Vec3) -> Vec3 {
        let candidates = [
            (p.x - self.min.x, Vec3::new(-1.0, 0.0, 0.0)),
            (self.max.x - p.x, Vec3::new(1.0, 0.0, 0.0)),
            (p.y - self.min.y, Vec3::new(0.0, -1.0, 0.0)),
            (self.max.y - p.y, Vec3::new(0.0, 1.0, 0.0)),
            (p.z - self.min.z, Vec3::new(0.0, 0.0, -1.0)),
            (self.max.z - p.z, Vec3::new(0.0, 0.0, 1.0)),
        ];
        candidates
            .iter()
            .min_by(|a, b| a.0.total_cmp(&b.0))
            .map(|(_, n)| *n)
            .unwrap_or(Vec3::UP)
    }
}

/// Screen-space rectangle with a top-left origin.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    pub fn right(&self) -> f32 {
        self.x + self.w
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.h
    }

    /// Overlap test where rectangles that only share an edge do not collide.
    pub fn intersects(&self, other: &Rect) -> bool {
        self.x < other.right()
            && other.x < self.right()
            && self.y < other.bottom()
            && other.y < self.bottom()
    }

    pub fn contains_point(&self, px: f32, py: f32) -> bool {
        px >= self.x && px < self.right() && py >= self.y && py < self.bottom()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rect_touching_edges_do_not_collide() {
        let a = Rect::new(0.0, 0.0, 50.0, 50.0);
        let b = Rect::new(50.0, 0.0, 50.0, 50.0);
        assert!(!a.intersects(&b));

        let c = Rect::new(49.0, 10.0, 5.0, 5.0);
        assert!(a.intersects(&c));
        assert!(c.intersects(&a));
    }

    #[test]
    fn test_rect_contains_point_is_half_open() {
        let r = Rect::new(10.0, 10.0, 10.0, 10.0);
        assert!(r.contains_point(10.0, 10.0));
        assert!(!r.contains_point(20.0, 15.0));
    }

    #[test]
    fn test_aabb_from_center_size() {
        let b = Aabb::from_center_size(Vec3::new(0.0, 0.5, 0.0), Vec3::new(20.0, 1.0, 10.0));
        assert_eq!(b.min, Vec3::new(-10.0, 0.0, -5.0));
        assert_eq!(b.max, Vec3::new(10.0, 1.0, 5.0));
        assert!(b.contains(Vec3::new(9.0, 0.5, 4.0)));
        assert!(b.covers_xz(-10.0, 5.0));
    }

    #[test]
    fn test_aabb_sphere_overlap() {
        let b = Aabb::from_center_size(Vec3::ZERO, Vec3::new(2.0, 2.0, 2.0));
        assert!(b.intersects_sphere(Vec3::new(1.5, 0.0, 0.0), 0.6));
        assert!(!b.intersects_sphere(Vec3::new(3.0, 0.0, 0.0), 0.6));
    }

    #[test]
    fn test_closest_face_normal() {
        let b = Aabb::from_center_size(Vec3::ZERO, Vec3::new(10.0, 2.0, 10.0));
        assert_eq!(
            b.closest_face_normal(Vec3::new(4.8, 0.0, 0.0)),
            Vec3::new(1.0, 0.0, 0.0)
        );
        assert_eq!(
            b.closest_face_normal(Vec3::new(0.0, 0.9, 0.0)),
            Vec3::new(0.0, 1.0, 0.0)
        );
    }
}

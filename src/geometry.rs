//! 2D geometry primitives shared by the rotation model and the integrator.
//!
//! Vectors are [`glam::Vec2`]. This module adds the pieces glam does not
//! carry: a bounding circle with a cached squared radius, an axis-aligned
//! box built from point sets, and the swept-segment ("capsule") test used
//! for mouse interaction.
//!
//! # Example
//!
//! ```
//! use confetti::geometry::{BoundingCircle, MouseCapsule};
//! use glam::Vec2;
//!
//! let circle = BoundingCircle::new(Vec2::new(100.0, 100.0), 5.0);
//! let capsule = MouseCapsule::new(Vec2::new(90.0, 100.0), Vec2::new(110.0, 100.0), 10.0);
//!
//! let hit = capsule.hit(&circle).expect("segment passes through the circle");
//! assert!(hit.penetration() > 0.99);
//! ```

use glam::Vec2;

/// Tolerance used to guard every division in geometry and force code.
pub const EPSILON: f32 = 1e-6;

/// Small helpers missing from `glam::Vec2`.
pub trait Vec2Ext {
    /// 2D cross product (z component of the 3D cross product).
    fn cross(self, other: Vec2) -> f32;

    /// Unit vector in the same direction, or zero when the length is zero.
    ///
    /// Never produces NaN.
    fn safe_normalize(self) -> Vec2;
}

impl Vec2Ext for Vec2 {
    #[inline]
    fn cross(self, other: Vec2) -> f32 {
        self.perp_dot(other)
    }

    #[inline]
    fn safe_normalize(self) -> Vec2 {
        let length = self.length();
        if length > EPSILON && length.is_finite() {
            self / length
        } else {
            Vec2::ZERO
        }
    }
}

/// Circle enclosing a shape. The single collision and culling primitive.
///
/// `radius_sq` is derived from `radius` and only ever written through
/// [`BoundingCircle::set_radius`].
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct BoundingCircle {
    center: Vec2,
    radius: f32,
    radius_sq: f32,
}

impl BoundingCircle {
    /// Create a circle. Negative radii are clamped to zero.
    pub fn new(center: Vec2, radius: f32) -> Self {
        let mut circle = Self {
            center,
            radius: 0.0,
            radius_sq: 0.0,
        };
        circle.set_radius(radius);
        circle
    }

    /// Smallest circle centred on `center` that contains every point.
    ///
    /// An empty point set yields a zero-radius circle at `center`.
    pub fn around(center: Vec2, points: &[Vec2]) -> Self {
        let radius_sq = points
            .iter()
            .map(|p| p.distance_squared(center))
            .fold(0.0_f32, f32::max);
        Self::new(center, radius_sq.sqrt())
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        self.center
    }

    #[inline]
    pub fn radius(&self) -> f32 {
        self.radius
    }

    #[inline]
    pub fn radius_squared(&self) -> f32 {
        self.radius_sq
    }

    pub fn set_center(&mut self, center: Vec2) {
        self.center = center;
    }

    /// Set the radius and refresh the cached square.
    pub fn set_radius(&mut self, radius: f32) {
        self.radius = radius.max(0.0);
        self.radius_sq = self.radius * self.radius;
    }

    pub fn translate(&mut self, offset: Vec2) {
        self.center += offset;
    }

    /// Whether `point` lies inside or on the circle.
    pub fn contains_point(&self, point: Vec2) -> bool {
        self.center.distance_squared(point) <= self.radius_sq
    }

    /// Whether `other` lies entirely inside this circle.
    pub fn contains_circle(&self, other: &BoundingCircle) -> bool {
        if other.radius > self.radius {
            return false;
        }
        let slack = self.radius - other.radius;
        self.center.distance_squared(other.center) <= slack * slack
    }

    /// Circle-circle overlap test.
    pub fn intersects_circle(&self, other: &BoundingCircle) -> bool {
        let reach = self.radius + other.radius;
        let delta = other.center - self.center;
        // Cheap per-axis reject before the squared distance.
        if delta.x.abs() > reach || delta.y.abs() > reach {
            return false;
        }
        delta.length_squared() <= reach * reach
    }

    /// Circle-box overlap test using the closest point on the box.
    pub fn intersects_box(&self, bounds: &BoundingBox) -> bool {
        if self.center.x + self.radius < bounds.min.x
            || self.center.x - self.radius > bounds.max.x
            || self.center.y + self.radius < bounds.min.y
            || self.center.y - self.radius > bounds.max.y
        {
            return false;
        }
        let closest = self.center.clamp(bounds.min, bounds.max);
        closest.distance_squared(self.center) <= self.radius_sq
    }

    /// How far the two circles overlap along the line between their centres.
    ///
    /// Zero when they do not touch.
    pub fn overlap(&self, other: &BoundingCircle) -> f32 {
        let reach = self.radius + other.radius;
        (reach - self.center.distance(other.center)).max(0.0)
    }

    pub fn area(&self) -> f32 {
        std::f32::consts::PI * self.radius_sq
    }

    pub fn circumference(&self) -> f32 {
        std::f32::consts::TAU * self.radius
    }
}

/// Axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub min: Vec2,
    pub max: Vec2,
}

impl BoundingBox {
    /// Box from two corners, in any order.
    pub fn new(a: Vec2, b: Vec2) -> Self {
        Self {
            min: a.min(b),
            max: a.max(b),
        }
    }

    /// Box covering `[0, width] x [0, height]`.
    pub fn from_size(width: f32, height: f32) -> Self {
        Self::new(Vec2::ZERO, Vec2::new(width, height))
    }

    /// Tightest box around a set of points, `None` when the set is empty.
    pub fn from_points(points: &[Vec2]) -> Option<Self> {
        let (first, rest) = points.split_first()?;
        let (min, max) = rest
            .iter()
            .fold((*first, *first), |(min, max), p| (min.min(*p), max.max(*p)));
        Some(Self { min, max })
    }

    /// Midpoint of the extents.
    pub fn center(&self) -> Vec2 {
        (self.min + self.max) * 0.5
    }

    pub fn width(&self) -> f32 {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> f32 {
        self.max.y - self.min.y
    }

    pub fn contains(&self, point: Vec2) -> bool {
        point.x >= self.min.x && point.x <= self.max.x && point.y >= self.min.y && point.y <= self.max.y
    }

    pub fn intersects(&self, other: &BoundingBox) -> bool {
        self.min.x <= other.max.x
            && self.max.x >= other.min.x
            && self.min.y <= other.max.y
            && self.max.y >= other.min.y
    }
}

/// Closest point to `point` on the segment `start -> end`.
///
/// A zero-length segment collapses to `start`.
pub fn closest_point_on_segment(start: Vec2, end: Vec2, point: Vec2) -> Vec2 {
    let segment = end - start;
    let len_sq = segment.length_squared();
    if len_sq <= EPSILON {
        return start;
    }
    let t = ((point - start).dot(segment) / len_sq).clamp(0.0, 1.0);
    start + segment * t
}

/// The mouse's path over one frame, thickened by its interaction radius.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MouseCapsule {
    pub start: Vec2,
    pub end: Vec2,
    pub radius: f32,
}

/// Result of a capsule/circle test that found contact.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CapsuleHit {
    /// Closest point on the swept segment to the circle's centre.
    pub closest: Vec2,
    /// Vector from `closest` to the circle's centre.
    pub offset: Vec2,
    /// Length of `offset`.
    pub distance: f32,
    /// Capsule radius plus circle radius.
    pub reach: f32,
}

impl CapsuleHit {
    /// Depth of contact in `0..=1` (1 when the centre lies on the segment).
    pub fn penetration(&self) -> f32 {
        if self.reach <= EPSILON {
            return 0.0;
        }
        ((self.reach - self.distance) / self.reach).clamp(0.0, 1.0)
    }

    /// Outward normal from the segment to the circle, zero when the centre
    /// sits on the segment.
    pub fn normal(&self) -> Vec2 {
        if self.distance > EPSILON {
            self.offset / self.distance
        } else {
            Vec2::ZERO
        }
    }
}

impl MouseCapsule {
    pub fn new(start: Vec2, end: Vec2, radius: f32) -> Self {
        Self { start, end, radius }
    }

    /// Test a bounding circle against the capsule.
    pub fn hit(&self, circle: &BoundingCircle) -> Option<CapsuleHit> {
        let closest = closest_point_on_segment(self.start, self.end, circle.center());
        let offset = circle.center() - closest;
        let distance = offset.length();
        let reach = self.radius + circle.radius();
        (distance < reach).then_some(CapsuleHit {
            closest,
            offset,
            distance,
            reach,
        })
    }
}

//! Polygons with a pitch/yaw/roll rotation model.
//!
//! A [`Polygon`] keeps two point lists of equal length:
//!
//! | List | Meaning |
//! |------|---------|
//! | `points_original` | un-rotated reference shape |
//! | `points_rotated` | the shape as rendered, derived from the original |
//!
//! `points_rotated` is always the image of `points_original` under the
//! current rotation about the pivot (`center`), with one exception: after
//! [`Polygon::add_point`] with [`InsertMode::Both`] the caller must call
//! [`Polygon::update_rotation`] to restore it.
//!
//! Rotations are applied pitch (about X), then yaw (about Y), then roll
//! (about Z). Points live in the `z = 0` plane, so the whole rotation
//! reduces to one 2x2 matrix per rotation change
//! (see [`TrigTable::rotation_matrix`]).
//!
//! # Example
//!
//! ```
//! use confetti::polygon::{Polygon, Rgba};
//! use confetti::trig::TrigTable;
//! use glam::Vec2;
//!
//! let table = TrigTable::default();
//! let mut tri = Polygon::from_points(
//!     Rgba::WHITE,
//!     vec![Vec2::new(0.0, 0.0), Vec2::new(4.0, 0.0), Vec2::new(2.0, 3.0)],
//! );
//!
//! tri.rotate(&table, 0.0, 0.0, 0.5);
//! tri.set_rotation(&table, 0.0, 0.0, 0.0);
//! assert_eq!(tri.points_rotated(), tri.points_original());
//! ```

use crate::geometry::{BoundingBox, BoundingCircle, EPSILON};
use crate::trig::TrigTable;
use glam::{Mat2, Vec2, Vec3};
use std::f32::consts::TAU;

/// 8-bit RGBA color. Rendering hint only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const WHITE: Rgba = Rgba::new(255, 255, 255, 255);
    pub const BLACK: Rgba = Rgba::new(0, 0, 0, 255);

    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Opaque color.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 255)
    }

    /// Channels as `0.0..=1.0` floats, the layout GPUs expect.
    pub fn to_f32(self) -> [f32; 4] {
        const INV_255: f32 = 1.0 / 255.0;
        [
            self.r as f32 * INV_255,
            self.g as f32 * INV_255,
            self.b as f32 * INV_255,
            self.a as f32 * INV_255,
        ]
    }
}

impl Default for Rgba {
    fn default() -> Self {
        Rgba::BLACK
    }
}

/// Where a newly inserted point is taken to live.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InsertMode {
    /// Point is in un-rotated space; its rotated image is computed.
    #[default]
    Original,
    /// Point is in rotated (rendered) space; it is mapped back through the
    /// inverse rotation to obtain the original.
    Rotated,
    /// Point goes into both lists unchanged. Call
    /// [`Polygon::update_rotation`] afterwards.
    Both,
}

/// How the bounding circle should treat the pivot when it is refreshed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Pivot {
    /// Keep the current centre (rotation in progress).
    Keep,
    /// Move the centre to the midpoint of the rotated extents.
    Recentre,
}

/// Ordered point set with a 3-axis rotation state and a derived bounding circle.
#[derive(Debug, Clone, PartialEq)]
pub struct Polygon {
    points_original: Vec<Vec2>,
    points_rotated: Vec<Vec2>,
    pitch: f32,
    yaw: f32,
    roll: f32,
    /// Centre doubles as the rotation pivot.
    bounds: BoundingCircle,
    pub color: Rgba,
    pub filled: bool,
}

impl Polygon {
    /// Empty polygon with its pivot at the origin.
    pub fn new(color: Rgba) -> Self {
        Self {
            points_original: Vec::new(),
            points_rotated: Vec::new(),
            pitch: 0.0,
            yaw: 0.0,
            roll: 0.0,
            bounds: BoundingCircle::default(),
            color,
            filled: true,
        }
    }

    /// Unrotated polygon from a point list. The pivot is the midpoint of the
    /// point extents.
    pub fn from_points(color: Rgba, points: Vec<Vec2>) -> Self {
        let mut polygon = Self::new(color);
        polygon.points_rotated = points.clone();
        polygon.points_original = points;
        polygon.refresh_bounds(Pivot::Recentre);
        polygon
    }

    // ========== Accessors ==========

    pub fn points_original(&self) -> &[Vec2] {
        &self.points_original
    }

    /// The points to render.
    pub fn points_rotated(&self) -> &[Vec2] {
        &self.points_rotated
    }

    pub fn len(&self) -> usize {
        self.points_original.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points_original.is_empty()
    }

    /// Rotation pivot and bounding circle centre.
    pub fn center(&self) -> Vec2 {
        self.bounds.center()
    }

    pub fn bounding_circle(&self) -> &BoundingCircle {
        &self.bounds
    }

    /// Axis-aligned box around the rotated points.
    pub fn bounding_box(&self) -> Option<BoundingBox> {
        BoundingBox::from_points(&self.points_rotated)
    }

    pub fn pitch(&self) -> f32 {
        self.pitch
    }

    pub fn yaw(&self) -> f32 {
        self.yaw
    }

    pub fn roll(&self) -> f32 {
        self.roll
    }

    /// `(pitch, yaw, roll)` in radians.
    pub fn angles(&self) -> Vec3 {
        Vec3::new(self.pitch, self.yaw, self.roll)
    }

    /// True when all three angles are exactly zero.
    pub fn is_unrotated(&self) -> bool {
        self.pitch == 0.0 && self.yaw == 0.0 && self.roll == 0.0
    }

    // ========== Rotation ==========

    /// Set absolute angles and recompute the rotated points.
    pub fn set_rotation(&mut self, table: &TrigTable, pitch: f32, yaw: f32, roll: f32) {
        self.pitch = pitch;
        self.yaw = yaw;
        self.roll = roll;
        self.update_rotation(table);
    }

    /// Add to the current angles (wrapped to `[0, 2π)`) and recompute.
    pub fn rotate(&mut self, table: &TrigTable, d_pitch: f32, d_yaw: f32, d_roll: f32) {
        self.pitch = wrap_angle(self.pitch + d_pitch);
        self.yaw = wrap_angle(self.yaw + d_yaw);
        self.roll = wrap_angle(self.roll + d_roll);
        self.update_rotation(table);
    }

    pub fn set_pitch(&mut self, table: &TrigTable, angle: f32) {
        self.set_rotation(table, angle, self.yaw, self.roll);
    }

    pub fn set_yaw(&mut self, table: &TrigTable, angle: f32) {
        self.set_rotation(table, self.pitch, angle, self.roll);
    }

    pub fn set_roll(&mut self, table: &TrigTable, angle: f32) {
        self.set_rotation(table, self.pitch, self.yaw, angle);
    }

    pub fn rotate_pitch(&mut self, table: &TrigTable, delta: f32) {
        self.rotate(table, delta, 0.0, 0.0);
    }

    pub fn rotate_yaw(&mut self, table: &TrigTable, delta: f32) {
        self.rotate(table, 0.0, delta, 0.0);
    }

    pub fn rotate_roll(&mut self, table: &TrigTable, delta: f32) {
        self.rotate(table, 0.0, 0.0, delta);
    }

    /// Recompute `points_rotated` from `points_original` about the current
    /// pivot, then refresh the bounding radius.
    pub fn update_rotation(&mut self, table: &TrigTable) {
        if self.is_unrotated() {
            self.points_rotated.clone_from(&self.points_original);
        } else {
            let matrix = table.rotation_matrix(self.pitch, self.yaw, self.roll);
            let pivot = self.bounds.center();
            self.points_rotated.clear();
            self.points_rotated
                .extend(self.points_original.iter().map(|p| matrix * (*p - pivot) + pivot));
        }
        self.refresh_bounds(Pivot::Keep);
    }

    // ========== Point edits ==========

    /// Insert a point.
    ///
    /// [`InsertMode::Original`] rotates the point about the current pivot
    /// into the rotated list, [`InsertMode::Rotated`] maps it back into the
    /// original list. Both keep the pivot so existing points stay put; only
    /// the radius grows. [`InsertMode::Both`] pushes the raw point into both
    /// lists and recentres.
    pub fn add_point(&mut self, table: &TrigTable, point: Vec2, mode: InsertMode) {
        match mode {
            InsertMode::Original => {
                let rotated = self.rotate_point(table, point);
                self.points_original.push(point);
                self.points_rotated.push(rotated);
            }
            InsertMode::Rotated => {
                let original = self.unrotate_point(table, point);
                self.points_original.push(original);
                self.points_rotated.push(point);
            }
            InsertMode::Both => {
                self.points_original.push(point);
                self.points_rotated.push(point);
                self.refresh_bounds(Pivot::Recentre);
                return;
            }
        }
        self.refresh_bounds(Pivot::Keep);
    }

    /// Shift both point lists and the pivot by `offset`.
    pub fn translate(&mut self, offset: Vec2) {
        for p in &mut self.points_original {
            *p += offset;
        }
        for p in &mut self.points_rotated {
            *p += offset;
        }
        self.bounds.translate(offset);
    }

    /// Translate so the pivot lands on `target`.
    pub fn move_center_to(&mut self, target: Vec2) {
        self.translate(target - self.bounds.center());
    }

    /// Replace every point and reset the pivot to the new extents' midpoint.
    /// The current rotation is reapplied.
    pub(crate) fn replace_points(&mut self, table: &TrigTable, points: Vec<Vec2>) {
        self.points_rotated.clone_from(&points);
        self.points_original = points;
        self.refresh_bounds(Pivot::Recentre);
        self.update_rotation(table);
    }

    fn refresh_bounds(&mut self, pivot: Pivot) {
        let center = match (pivot, BoundingBox::from_points(&self.points_rotated)) {
            (Pivot::Recentre, Some(extents)) => extents.center(),
            _ => self.bounds.center(),
        };
        self.bounds = BoundingCircle::around(center, &self.points_rotated);
    }

    /// Map a point in original space into rotated space.
    fn rotate_point(&self, table: &TrigTable, point: Vec2) -> Vec2 {
        if self.is_unrotated() {
            return point;
        }
        let matrix = table.rotation_matrix(self.pitch, self.yaw, self.roll);
        let pivot = self.bounds.center();
        matrix * (point - pivot) + pivot
    }

    /// Map a point in rotated space back into original space.
    ///
    /// When the rotation is edge-on (`cos(pitch) * cos(yaw) ≈ 0`) the plane
    /// collapses to a line and the point is returned unchanged.
    fn unrotate_point(&self, table: &TrigTable, point: Vec2) -> Vec2 {
        if self.is_unrotated() {
            return point;
        }
        let matrix = table.rotation_matrix(self.pitch, self.yaw, self.roll);
        if matrix.determinant().abs() <= EPSILON {
            return point;
        }
        let inverse: Mat2 = matrix.inverse();
        let pivot = self.bounds.center();
        inverse * (point - pivot) + pivot
    }
}

/// Wrap an angle into `[0, 2π)`. Non-finite input resets to zero.
pub fn wrap_angle(angle: f32) -> f32 {
    if !angle.is_finite() {
        return 0.0;
    }
    let wrapped = angle.rem_euclid(TAU);
    // rem_euclid can round up to exactly TAU for tiny negative inputs.
    if wrapped >= TAU {
        0.0
    } else {
        wrapped
    }
}

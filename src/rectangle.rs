//! Axis-aligned rectangles with rotation metadata.
//!
//! [`Rectangle`] owns a [`Polygon`] configured with exactly four corners
//! (top-left, top-right, bottom-right, bottom-left in un-rotated space).
//! There is no way to insert or remove points through its public interface;
//! only [`Rectangle::resize`] regenerates the corners.

use crate::geometry::{BoundingBox, BoundingCircle};
use crate::polygon::{Polygon, Rgba};
use crate::trig::TrigTable;
use glam::{Vec2, Vec3};

/// Four-cornered polygon with a width and height.
#[derive(Debug, Clone, PartialEq)]
pub struct Rectangle {
    shape: Polygon,
    width: f32,
    height: f32,
}

impl Rectangle {
    /// Unrotated rectangle with its top-left corner at `top_left`.
    pub fn new(top_left: Vec2, width: f32, height: f32, color: Rgba) -> Self {
        let shape = Polygon::from_points(color, corners(top_left, width, height));
        Self { shape, width, height }
    }

    /// Unrotated rectangle centred on `center`.
    pub fn centered(center: Vec2, width: f32, height: f32, color: Rgba) -> Self {
        Self::new(center - Vec2::new(width, height) * 0.5, width, height, color)
    }

    /// Builder-style initial rotation.
    pub fn with_rotation(mut self, table: &TrigTable, pitch: f32, yaw: f32, roll: f32) -> Self {
        self.shape.set_rotation(table, pitch, yaw, roll);
        self
    }

    /// Read-only view of the underlying polygon.
    pub fn polygon(&self) -> &Polygon {
        &self.shape
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn height(&self) -> f32 {
        self.height
    }

    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }

    pub fn center(&self) -> Vec2 {
        self.shape.center()
    }

    pub fn bounding_circle(&self) -> &BoundingCircle {
        self.shape.bounding_circle()
    }

    pub fn bounding_box(&self) -> Option<BoundingBox> {
        self.shape.bounding_box()
    }

    pub fn angles(&self) -> Vec3 {
        self.shape.angles()
    }

    pub fn color(&self) -> Rgba {
        self.shape.color
    }

    pub fn set_color(&mut self, color: Rgba) {
        self.shape.color = color;
    }

    // ========== Delegated rotation and motion ==========

    pub fn set_rotation(&mut self, table: &TrigTable, pitch: f32, yaw: f32, roll: f32) {
        self.shape.set_rotation(table, pitch, yaw, roll);
    }

    pub fn rotate(&mut self, table: &TrigTable, d_pitch: f32, d_yaw: f32, d_roll: f32) {
        self.shape.rotate(table, d_pitch, d_yaw, d_roll);
    }

    pub fn rotate_pitch(&mut self, table: &TrigTable, delta: f32) {
        self.shape.rotate_pitch(table, delta);
    }

    pub fn rotate_yaw(&mut self, table: &TrigTable, delta: f32) {
        self.shape.rotate_yaw(table, delta);
    }

    pub fn rotate_roll(&mut self, table: &TrigTable, delta: f32) {
        self.shape.rotate_roll(table, delta);
    }

    pub fn translate(&mut self, offset: Vec2) {
        self.shape.translate(offset);
    }

    pub fn move_center_to(&mut self, target: Vec2) {
        self.shape.move_center_to(target);
    }

    /// Change the size while keeping centre and rotation.
    ///
    /// Corners are regenerated around the origin, the saved rotation is
    /// reapplied, then the shape is moved back onto the saved centre.
    pub fn resize(&mut self, table: &TrigTable, width: f32, height: f32) {
        let center = self.shape.center();

        self.width = width;
        self.height = height;
        // Pivot lands on the origin; angles are untouched and reapplied.
        let origin_corners = corners(Vec2::new(-width, -height) * 0.5, width, height);
        self.shape.replace_points(table, origin_corners);
        self.shape.move_center_to(center);
    }
}

fn corners(top_left: Vec2, width: f32, height: f32) -> Vec<Vec2> {
    vec![
        top_left,
        top_left + Vec2::new(width, 0.0),
        top_left + Vec2::new(width, height),
        top_left + Vec2::new(0.0, height),
    ]
}

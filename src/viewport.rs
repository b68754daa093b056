//! Screen ↔ world coordinate transforms.
//!
//! The simulation only ever sees world coordinates. A [`WorldTransform`]
//! maps cursor positions in, and the render side uses the inverse to place
//! instances. [`Viewport`] is the default implementation: it fits the world
//! into the framebuffer preserving aspect ratio, centring it with letterbox
//! bars on the long axis.

use crate::geometry::{BoundingBox, EPSILON};
use glam::Vec2;

/// Mapping between screen pixels and world units.
pub trait WorldTransform {
    fn screen_to_world(&self, screen: Vec2) -> Vec2;

    fn world_to_screen(&self, world: Vec2) -> Vec2;

    /// `(world_width, world_height)`.
    fn world_size(&self) -> Vec2;

    /// True when `world` lies inside `[0, w] x [0, h]`.
    fn contains_world(&self, world: Vec2) -> bool {
        let size = self.world_size();
        world.x >= 0.0 && world.y >= 0.0 && world.x <= size.x && world.y <= size.y
    }

    /// World rectangle as a box.
    fn world_bounds(&self) -> BoundingBox {
        BoundingBox::from_size(self.world_size().x, self.world_size().y)
    }
}

/// Aspect-preserving letterbox viewport.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    world: Vec2,
    framebuffer: Vec2,
    /// Pixels per world unit.
    scale: f32,
    /// Top-left of the world area in pixels.
    offset: Vec2,
}

impl Viewport {
    /// Viewport for a world of `world_width x world_height` shown in a
    /// framebuffer of the same size.
    pub fn identity(world_width: f32, world_height: f32) -> Self {
        Self::new(world_width, world_height, world_width, world_height)
    }

    pub fn new(world_width: f32, world_height: f32, fb_width: f32, fb_height: f32) -> Self {
        let mut viewport = Self {
            world: Vec2::new(world_width, world_height),
            framebuffer: Vec2::ZERO,
            scale: 1.0,
            offset: Vec2::ZERO,
        };
        viewport.fit(fb_width, fb_height);
        viewport
    }

    /// Refit after a framebuffer resize.
    ///
    /// A zero-sized framebuffer (minimised window) keeps the previous fit.
    pub fn fit(&mut self, fb_width: f32, fb_height: f32) {
        if fb_width <= 0.0 || fb_height <= 0.0 || self.world.x <= 0.0 || self.world.y <= 0.0 {
            log::debug!("Ignoring viewport fit to {}x{}", fb_width, fb_height);
            return;
        }
        self.framebuffer = Vec2::new(fb_width, fb_height);
        self.scale = (fb_width / self.world.x).min(fb_height / self.world.y);
        self.offset = (self.framebuffer - self.world * self.scale) * 0.5;
    }

    pub fn scale(&self) -> f32 {
        self.scale
    }

    pub fn offset(&self) -> Vec2 {
        self.offset
    }

    pub fn framebuffer_size(&self) -> Vec2 {
        self.framebuffer
    }

    /// Pixel rectangle `(x, y, width, height)` the world occupies.
    pub fn pixel_rect(&self) -> (f32, f32, f32, f32) {
        let size = self.world * self.scale;
        (self.offset.x, self.offset.y, size.x, size.y)
    }
}

impl WorldTransform for Viewport {
    fn screen_to_world(&self, screen: Vec2) -> Vec2 {
        if self.scale <= EPSILON {
            return screen;
        }
        (screen - self.offset) / self.scale
    }

    fn world_to_screen(&self, world: Vec2) -> Vec2 {
        world * self.scale + self.offset
    }

    fn world_size(&self) -> Vec2 {
        self.world
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity() {
        let vp = Viewport::identity(720.0, 480.0);
        let p = Vec2::new(12.5, 300.0);
        assert_eq!(vp.screen_to_world(p), p);
        assert_eq!(vp.world_to_screen(p), p);
    }

    #[test]
    fn test_letterbox_wide_window() {
        // Twice as wide: bars left and right
        let vp = Viewport::new(720.0, 480.0, 1920.0, 480.0);
        assert_eq!(vp.scale(), 1.0);
        assert_eq!(vp.offset(), Vec2::new(600.0, 0.0));
        assert_eq!(vp.screen_to_world(Vec2::new(600.0, 0.0)), Vec2::ZERO);
        assert!(!vp.contains_world(vp.screen_to_world(Vec2::new(10.0, 10.0))));
    }

    #[test]
    fn test_letterbox_tall_window() {
        let vp = Viewport::new(720.0, 480.0, 1440.0, 1440.0);
        assert_eq!(vp.scale(), 2.0);
        assert_eq!(vp.offset(), Vec2::new(0.0, 240.0));
        let world = Vec2::new(360.0, 240.0);
        let screen = vp.world_to_screen(world);
        assert_eq!(screen, Vec2::new(720.0, 720.0));
        assert_eq!(vp.screen_to_world(screen), world);
    }

    #[test]
    fn test_zero_framebuffer_keeps_fit() {
        let mut vp = Viewport::new(720.0, 480.0, 1440.0, 960.0);
        vp.fit(0.0, 0.0);
        assert_eq!(vp.scale(), 2.0);
    }
}

//! Simulated rectangles.
//!
//! A [`RectEntity`] is a [`Rectangle`] plus the physics state the integrator
//! mutates each frame. Entities are addressed by [`EntityId`], a slot index
//! into the owning store in [`EntityPools`](crate::lifecycle::EntityPools).

use crate::rectangle::Rectangle;
use crate::trig::TrigTable;
use glam::Vec2;

/// Slot index of an entity in the owning store.
///
/// Ids are reused after an entity is dropped and its slot freed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityId(pub(crate) u32);

impl EntityId {
    /// Raw slot index.
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Rectangle with velocity, timestamps and drag/flutter parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct RectEntity {
    pub shape: Rectangle,
    pub velocity: Vec2,
    /// Clock time the entity was spawned or last reactivated.
    pub spawn_time: f32,
    /// Clock time the entity settled. Zero while moving.
    pub stop_time: f32,
    /// False once settled.
    pub moving: bool,
    /// Exponential damping rate, `velocity *= exp(-drag_k * dt)`.
    pub drag_k: f32,
    /// Flutter phase offset in radians.
    pub phase: f32,
}

impl RectEntity {
    pub fn new(shape: Rectangle, velocity: Vec2, spawn_time: f32) -> Self {
        Self {
            shape,
            velocity,
            spawn_time,
            stop_time: 0.0,
            moving: true,
            drag_k: 0.0,
            phase: 0.0,
        }
    }

    pub fn with_drag(mut self, drag_k: f32) -> Self {
        self.drag_k = drag_k;
        self
    }

    pub fn with_phase(mut self, phase: f32) -> Self {
        self.phase = phase;
        self
    }

    pub fn center(&self) -> Vec2 {
        self.shape.center()
    }

    pub fn radius(&self) -> f32 {
        self.shape.bounding_circle().radius()
    }

    /// Seconds since spawn (or last reactivation).
    pub fn age(&self, now: f32) -> f32 {
        now - self.spawn_time
    }

    /// True while the entity is still exempt from mouse forces.
    pub fn in_grace(&self, now: f32, grace: f32) -> bool {
        self.spawn_time + grace >= now
    }

    /// Translate by `velocity * dt`. Both point lists and the pivot move together.
    pub fn integrate(&mut self, dt: f32) {
        let offset = self.velocity * dt;
        if offset != Vec2::ZERO {
            self.shape.translate(offset);
        }
    }

    /// Advance the rotation by `speed * dt` on all three axes.
    pub fn spin(&mut self, table: &TrigTable, speed: f32, dt: f32) {
        let delta = speed * dt;
        if delta != 0.0 {
            self.shape.rotate(table, delta, delta, delta);
        }
    }

    /// Freeze at `now`: zero velocity, clear the moving flag.
    pub fn settle(&mut self, now: f32) {
        self.velocity = Vec2::ZERO;
        self.moving = false;
        self.stop_time = now;
    }

    /// Return to motion at `now`, restarting the spawn grace period.
    pub fn reactivate(&mut self, now: f32) {
        self.moving = true;
        self.stop_time = 0.0;
        self.spawn_time = now;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::polygon::Rgba;

    fn entity() -> RectEntity {
        let shape = Rectangle::centered(Vec2::new(50.0, 50.0), 3.0, 3.0, Rgba::WHITE);
        RectEntity::new(shape, Vec2::new(0.0, -100.0), 0.0)
    }

    #[test]
    fn test_integrate_is_linear() {
        let mut e = entity();
        e.integrate(1.0);
        assert_eq!(e.center(), Vec2::new(50.0, -50.0));
        let pts = e.shape.polygon().points_original();
        assert_eq!(pts[0], Vec2::new(48.5, -51.5));
    }

    #[test]
    fn test_settle_and_reactivate() {
        let mut e = entity();
        e.settle(3.0);
        assert!(!e.moving);
        assert_eq!(e.velocity, Vec2::ZERO);
        assert_eq!(e.stop_time, 3.0);

        e.reactivate(5.0);
        assert!(e.moving);
        assert_eq!(e.stop_time, 0.0);
        assert_eq!(e.spawn_time, 5.0);
        assert!(e.in_grace(5.5, 1.0));
        assert!(!e.in_grace(6.5, 1.0));
    }

    #[test]
    fn test_spin_advances_all_axes() {
        let table = TrigTable::default();
        let mut e = entity();
        e.spin(&table, 1.0, 0.25);
        let angles = e.shape.angles();
        assert!((angles.x - 0.25).abs() < 1e-6);
        assert!((angles.y - 0.25).abs() < 1e-6);
        assert!((angles.z - 0.25).abs() < 1e-6);
        assert!((e.center() - Vec2::new(50.0, 50.0)).length() < 1e-5);
    }
}

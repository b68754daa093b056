//! Per-frame forces and integration.
//!
//! The active pass applies, in order:
//!
//! 1. Exponential damping `v *= exp(-k * dt)`
//! 2. Gravity `v.y += g * dt` (y grows downward)
//! 3. Flutter `v.x += A * sin(w * age + phase) * dt`
//! 4. Mouse forces (push-out + directional slap) once out of the spawn grace
//! 5. Translation by `v * dt` and rotation by `rotation_speed * dt`
//! 6. Boundary test: horizontal exit drops, crossing the floor settles
//!
//! Settled entities only go through the mouse test. A hit applies the same
//! two forces plus an upward lift and reactivates the entity.
//!
//! Nothing here mutates the pools. Callers collect the returned
//! [`StepOutcome`]s and migrate afterwards.

use crate::config::SandboxConfig;
use crate::entity::RectEntity;
use crate::geometry::{CapsuleHit, MouseCapsule, Vec2Ext, EPSILON};
use crate::trig::TrigTable;
use glam::Vec2;
use rand::Rng;

/// Mouse motion between the previous and current sample, in world space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MouseSweep {
    pub previous: Vec2,
    pub current: Vec2,
    /// Seconds between the two samples.
    pub dt: f32,
}

impl MouseSweep {
    pub fn new(previous: Vec2, current: Vec2, dt: f32) -> Self {
        Self {
            previous,
            current,
            dt,
        }
    }

    /// A sweep that stays on one point.
    pub fn stationary(position: Vec2) -> Self {
        Self::new(position, position, 0.0)
    }

    /// Mouse velocity. Zero when the samples share a timestamp.
    pub fn velocity(&self) -> Vec2 {
        if self.dt > EPSILON {
            (self.current - self.previous) / self.dt
        } else {
            Vec2::ZERO
        }
    }

    pub fn speed(&self) -> f32 {
        self.velocity().length()
    }

    /// The swept segment thickened by `radius`.
    pub fn capsule(&self, radius: f32) -> MouseCapsule {
        MouseCapsule::new(self.previous, self.current, radius)
    }
}

/// Velocity changes produced by one mouse contact.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MouseContact {
    pub hit: CapsuleHit,
    /// Radial push away from the swept segment.
    pub push: Vec2,
    /// Directional impulse along the mouse motion. Zero unless `in_front`.
    pub slap: Vec2,
    /// Entity lies ahead of the mouse motion.
    pub in_front: bool,
    /// Normalised mouse direction (zero if the mouse is still).
    pub direction: Vec2,
}

impl MouseContact {
    /// Total velocity change.
    pub fn impulse(&self) -> Vec2 {
        self.push + self.slap
    }
}

/// Test `entity` against the swept capsule and compute the resulting forces.
///
/// Returns `None` when the bounding circle does not reach the capsule.
pub fn mouse_contact(
    entity: &RectEntity,
    sweep: &MouseSweep,
    config: &SandboxConfig,
) -> Option<MouseContact> {
    let hit = sweep
        .capsule(config.mouse_radius)
        .hit(entity.shape.bounding_circle())?;

    let velocity = sweep.velocity();
    let speed = velocity.length();

    let push = if hit.distance > EPSILON {
        let base = (hit.reach + config.push_offset - hit.distance) / config.push_time;
        let multiplier =
            1.0 + (speed * config.mouse_speed_sensitivity).min(config.max_speed_boost);
        hit.normal() * base * multiplier
    } else {
        Vec2::ZERO
    };

    let mut slap = Vec2::ZERO;
    let mut in_front = false;
    let mut direction = Vec2::ZERO;
    if speed > EPSILON {
        direction = velocity / speed;
        let to_rect = entity.center() - sweep.current;
        if to_rect.length() > EPSILON {
            let alignment = direction.dot(to_rect.safe_normalize());
            if alignment > 0.0 {
                in_front = true;
                let magnitude =
                    speed * sweep.dt * hit.penetration() * config.mouse_mass * alignment;
                slap = direction * magnitude;
            }
        }
    }

    Some(MouseContact {
        hit,
        push,
        slap,
        in_front,
        direction,
    })
}

/// Extra kick given to a settled entity knocked loose from the front.
///
/// `vy -= m * lift` and `vx += dir.x * m / 2` with
/// `m = mouse_speed * mouse_dt * mouse_mass`. `lift` is expected in
/// `[0.01, 0.51)`.
pub fn reactivation_lift(sweep: &MouseSweep, direction: Vec2, mouse_mass: f32, lift: f32) -> Vec2 {
    let m = sweep.speed() * sweep.dt * mouse_mass;
    Vec2::new(direction.x * m * 0.5, -m * lift)
}

/// Result of running one active entity through a frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    /// Still in flight.
    Moving,
    /// Crossed the floor this frame and was frozen.
    Settled,
    /// Left the world sideways; remove permanently.
    Dropped,
}

/// Everything the per-entity passes read for one frame.
#[derive(Debug, Clone, Copy)]
pub struct FrameContext<'a> {
    pub config: &'a SandboxConfig,
    pub table: &'a TrigTable,
    /// Clock time sampled once for the frame.
    pub now: f32,
    pub dt: f32,
    pub gravity_enabled: bool,
    pub sweep: Option<&'a MouseSweep>,
}

/// Run one active entity through damping, forces, integration and the
/// boundary test.
pub fn integrate_active(entity: &mut RectEntity, frame: &FrameContext<'_>) -> StepOutcome {
    let config = frame.config;
    let dt = frame.dt;

    if entity.drag_k > 0.0 {
        entity.velocity *= (-entity.drag_k * dt).exp();
    }

    if frame.gravity_enabled {
        entity.velocity.y += config.gravity * dt;
    }

    if config.flutter_strength != 0.0 {
        let age = entity.age(frame.now);
        entity.velocity.x +=
            config.flutter_strength * (config.flutter_speed * age + entity.phase).sin() * dt;
    }

    if let Some(sweep) = frame.sweep {
        if !entity.in_grace(frame.now, config.spawn_grace) {
            if let Some(contact) = mouse_contact(entity, sweep, config) {
                entity.velocity += contact.impulse();
            }
        }
    }

    entity.integrate(dt);
    entity.spin(frame.table, config.rotation_speed, dt);

    check_bounds(entity, config.world_width, config.world_height, frame.now)
}

/// Boundary test after integration.
///
/// A horizontal exit is checked first so a dropped entity never settles.
pub fn check_bounds(entity: &mut RectEntity, width: f32, height: f32, now: f32) -> StepOutcome {
    let center = entity.center();
    let radius = entity.radius();

    if center.x + radius < 0.0 || center.x - radius > width {
        return StepOutcome::Dropped;
    }

    if center.y + radius > height {
        let clamped_y = if height >= 2.0 * radius {
            center.y.clamp(radius, height - radius)
        } else {
            height * 0.5
        };
        entity.shape.move_center_to(Vec2::new(center.x, clamped_y));
        entity.settle(now);
        return StepOutcome::Settled;
    }

    StepOutcome::Moving
}

/// Mouse test for a settled entity. On contact the forces and lift are
/// applied and the entity is reactivated at `now`.
///
/// Returns true when the entity was reactivated and must move back to the
/// active pool.
pub fn interact_settled<R: Rng>(
    entity: &mut RectEntity,
    sweep: &MouseSweep,
    frame: &FrameContext<'_>,
    rng: &mut R,
) -> bool {
    if entity.moving || entity.in_grace(frame.now, frame.config.spawn_grace) {
        return false;
    }
    let Some(contact) = mouse_contact(entity, sweep, frame.config) else {
        return false;
    };

    entity.velocity += contact.impulse();
    if contact.in_front {
        let lift = rng.gen_range(0.01..0.51);
        entity.velocity += reactivation_lift(sweep, contact.direction, frame.config.mouse_mass, lift);
    }
    entity.reactivate(frame.now);
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::polygon::Rgba;
    use crate::rectangle::Rectangle;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    fn still_config() -> SandboxConfig {
        SandboxConfig::default()
            .with_gravity_enabled(false)
            .with_drag_coefficient(0.0)
            .with_flutter(0.0, 0.0)
            .with_rotation_speed(0.0)
    }

    fn entity_at(center: Vec2, velocity: Vec2) -> RectEntity {
        RectEntity::new(
            Rectangle::centered(center, 3.0, 3.0, Rgba::WHITE),
            velocity,
            0.0,
        )
    }

    fn frame<'a>(
        config: &'a SandboxConfig,
        table: &'a TrigTable,
        now: f32,
        dt: f32,
        sweep: Option<&'a MouseSweep>,
    ) -> FrameContext<'a> {
        FrameContext {
            config,
            table,
            now,
            dt,
            gravity_enabled: config.gravity_enabled,
            sweep,
        }
    }

    #[test]
    fn test_sweep_velocity_guarded() {
        let sweep = MouseSweep::new(Vec2::ZERO, Vec2::new(10.0, 0.0), 0.0);
        assert_eq!(sweep.velocity(), Vec2::ZERO);
        let sweep = MouseSweep::new(Vec2::ZERO, Vec2::new(10.0, 0.0), 0.5);
        assert_eq!(sweep.velocity(), Vec2::new(20.0, 0.0));
    }

    #[test]
    fn test_linear_integration() {
        let config = still_config();
        let table = TrigTable::default();
        let mut e = entity_at(Vec2::new(50.0, 50.0), Vec2::new(0.0, -100.0));
        let outcome = integrate_active(&mut e, &frame(&config, &table, 0.0, 1.0, None));
        assert_eq!(outcome, StepOutcome::Moving);
        assert!((e.center().y - -50.0).abs() < 1e-4);
    }

    #[test]
    fn test_damping_and_gravity() {
        let config = SandboxConfig::default().with_flutter(0.0, 0.0);
        let table = TrigTable::default();
        let k = config.drag_constant();
        let mut e = entity_at(Vec2::new(100.0, 100.0), Vec2::new(10.0, 0.0)).with_drag(k);
        let dt = 0.01;
        integrate_active(&mut e, &frame(&config, &table, 0.0, dt, None));
        let expected_vx = 10.0 * (-k * dt).exp();
        assert!((e.velocity.x - expected_vx).abs() < 1e-4);
        assert!((e.velocity.y - config.gravity * dt).abs() < 1e-4);
    }

    #[test]
    fn test_floor_settles_with_zero_velocity() {
        let config = still_config();
        let table = TrigTable::default();
        let mut e = entity_at(Vec2::new(100.0, 470.0), Vec2::new(5.0, 200.0));
        let outcome = integrate_active(&mut e, &frame(&config, &table, 2.0, 0.1, None));
        assert_eq!(outcome, StepOutcome::Settled);
        assert_eq!(e.velocity, Vec2::ZERO);
        assert!(!e.moving);
        assert_eq!(e.stop_time, 2.0);
        assert!(e.center().y + e.radius() <= config.world_height + 1e-3);
    }

    #[test]
    fn test_horizontal_exit_drops() {
        let config = still_config();
        let table = TrigTable::default();
        let mut e = entity_at(Vec2::new(715.0, 470.0), Vec2::new(500.0, 500.0));
        let outcome = integrate_active(&mut e, &frame(&config, &table, 0.0, 0.1, None));
        assert_eq!(outcome, StepOutcome::Dropped);
        assert!(e.moving);
    }

    #[test]
    fn test_grace_blocks_mouse() {
        let config = still_config();
        let table = TrigTable::default();
        let sweep = MouseSweep::new(Vec2::new(90.0, 100.0), Vec2::new(110.0, 100.0), 0.1);
        let mut e = entity_at(Vec2::new(100.0, 100.0), Vec2::ZERO);
        e.spawn_time = 0.5;
        integrate_active(&mut e, &frame(&config, &table, 1.0, 0.0, Some(&sweep)));
        assert_eq!(e.velocity, Vec2::ZERO);
    }

    #[test]
    fn test_push_out_points_away() {
        let config = still_config();
        // Stationary mouse just left of the entity
        let sweep = MouseSweep::stationary(Vec2::new(95.0, 100.0));
        let e = entity_at(Vec2::new(100.0, 100.0), Vec2::ZERO);
        let contact = mouse_contact(&e, &sweep, &config).unwrap();
        assert!(contact.push.x > 0.0);
        assert!(contact.push.y.abs() < 1e-4);
        assert_eq!(contact.slap, Vec2::ZERO);
        assert!(!contact.in_front);
    }

    #[test]
    fn test_slap_only_in_front() {
        let config = still_config();
        let e = entity_at(Vec2::new(100.0, 100.0), Vec2::ZERO);

        // Mouse moving toward the entity, ending just before it
        let toward = MouseSweep::new(Vec2::new(90.0, 100.0), Vec2::new(97.0, 100.0), 0.1);
        let contact = mouse_contact(&e, &toward, &config).unwrap();
        assert!(contact.in_front);
        assert!(contact.slap.x > 0.0);

        // Mouse moving away
        let away = MouseSweep::new(Vec2::new(97.0, 100.0), Vec2::new(90.0, 100.0), 0.1);
        let contact = mouse_contact(&e, &away, &config).unwrap();
        assert!(!contact.in_front);
        assert_eq!(contact.slap, Vec2::ZERO);
    }

    #[test]
    fn test_miss_returns_none() {
        let config = still_config();
        let e = entity_at(Vec2::new(100.0, 100.0), Vec2::ZERO);
        let sweep = MouseSweep::new(Vec2::new(0.0, 0.0), Vec2::new(10.0, 0.0), 0.1);
        assert!(mouse_contact(&e, &sweep, &config).is_none());
    }

    #[test]
    fn test_settled_reactivation() {
        let config = still_config();
        let table = TrigTable::default();
        let mut rng = SmallRng::seed_from_u64(1);
        let mut e = entity_at(Vec2::new(100.0, 100.0), Vec2::ZERO);
        e.settle(0.5);

        let sweep = MouseSweep::new(Vec2::new(90.0, 100.0), Vec2::new(110.0, 100.0), 0.1);
        let f = frame(&config, &table, 5.0, 1.0 / 60.0, Some(&sweep));
        assert!(interact_settled(&mut e, &sweep, &f, &mut rng));
        assert!(e.moving);
        assert_eq!(e.spawn_time, 5.0);
        assert_eq!(e.stop_time, 0.0);
    }

    #[test]
    fn test_lift_is_upward() {
        let sweep = MouseSweep::new(Vec2::ZERO, Vec2::new(10.0, 0.0), 0.1);
        let lift = reactivation_lift(&sweep, Vec2::X, 80.0, 0.2);
        // m = 100 * 0.1 * 80 = 800
        assert!((lift.y - -160.0).abs() < 1e-3);
        assert!((lift.x - 400.0).abs() < 1e-3);
    }
}

//! Spawning rectangle batches.
//!
//! A click produces one batch of [`SandboxConfig::spawn_count`] rectangles at
//! the clicked world position; holding the button produces further batches
//! at a fixed interval once [`HoldSpawner`] passes its threshold.
//!
//! Every spawned rectangle gets a random color, random initial
//! pitch/yaw/roll, a random flutter phase and a launch velocity chosen by the
//! configured [`SpawnPattern`]:
//!
//! ```ignore
//! // Radial burst (default)
//! config.with_spawn_pattern(SpawnPattern::Burst);
//!
//! // Rectangles appear in an annulus and fly outward
//! config.with_spawn_pattern(SpawnPattern::Ring {
//!     inner_radius: 5.0,
//!     outer_radius: 20.0,
//!     speed: 120.0,
//! });
//! ```

use crate::config::SandboxConfig;
use crate::entity::RectEntity;
use crate::geometry::{Vec2Ext, EPSILON};
use crate::polygon::Rgba;
use crate::rectangle::Rectangle;
use crate::trig::TrigTable;
use glam::{Vec2, Vec3};
use rand::rngs::SmallRng;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::f32::consts::TAU;

/// How launch velocities are assigned to a batch.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq)]
pub enum SpawnPattern {
    /// All rectangles start at the click point and fly off in random
    /// directions at `explosion_strength` plus jitter.
    #[default]
    Burst,
    /// Rectangles start at a random offset inside an annulus around the click
    /// point and move away from it at `speed`.
    Ring {
        inner_radius: f32,
        outer_radius: f32,
        speed: f32,
    },
}

/// Per-rectangle random helpers handed to the spawn routine.
///
/// Borrows the simulation RNG so a seeded sandbox spawns identical batches.
pub struct SpawnContext<'a> {
    rng: &'a mut SmallRng,
}

impl<'a> SpawnContext<'a> {
    pub(crate) fn new(rng: &'a mut SmallRng) -> Self {
        Self { rng }
    }

    // ========== Random primitives ==========

    /// Random f32 in `[min, max)`. Returns `min` for an empty range.
    #[inline]
    pub fn random_range(&mut self, min: f32, max: f32) -> f32 {
        if max > min {
            self.rng.gen_range(min..max)
        } else {
            min
        }
    }

    /// Random angle in `[0, 2π)`.
    #[inline]
    pub fn random_angle(&mut self) -> f32 {
        self.rng.gen_range(0.0..TAU)
    }

    // ========== Geometry helpers ==========

    /// Random unit vector.
    pub fn random_direction(&mut self) -> Vec2 {
        let (s, c) = self.random_angle().sin_cos();
        Vec2::new(c, s)
    }

    /// Random point in the annulus `inner..outer`, uniform over its area.
    pub fn random_in_annulus(&mut self, inner: f32, outer: f32) -> Vec2 {
        let dir = self.random_direction();
        let (a, b) = (inner * inner, outer * outer);
        let r = self.random_range(a, b).sqrt();
        dir * r
    }

    /// Random `(pitch, yaw, roll)` each in `[0, 2π)`.
    pub fn random_angles(&mut self) -> Vec3 {
        Vec3::new(self.random_angle(), self.random_angle(), self.random_angle())
    }

    // ========== Color helpers ==========

    /// Random opaque color.
    pub fn random_color(&mut self) -> Rgba {
        Rgba::rgb(self.rng.gen(), self.rng.gen(), self.rng.gen())
    }
}

/// Builds rectangle batches from the spawn parameters of a config.
#[derive(Debug, Clone, PartialEq)]
pub struct Spawner {
    pub pattern: SpawnPattern,
    pub count: usize,
    pub rect_size: Vec2,
    pub explosion_strength: f32,
    pub jitter: (f32, f32),
    pub drag_k: f32,
}

impl Spawner {
    pub fn from_config(config: &SandboxConfig) -> Self {
        Self {
            pattern: config.spawn_pattern,
            count: config.spawn_count,
            rect_size: Vec2::new(config.rect_width, config.rect_height),
            explosion_strength: config.explosion_strength,
            jitter: (config.jitter_min, config.jitter_max),
            drag_k: config.drag_constant(),
        }
    }

    /// Create `count` rectangles around `origin`, stamped with `now`.
    pub fn spawn_batch(
        &self,
        rng: &mut SmallRng,
        table: &TrigTable,
        origin: Vec2,
        now: f32,
        count: usize,
    ) -> Vec<RectEntity> {
        let mut ctx = SpawnContext::new(rng);
        (0..count)
            .map(|_| self.spawn_one(&mut ctx, table, origin, now))
            .collect()
    }

    fn spawn_one(
        &self,
        ctx: &mut SpawnContext<'_>,
        table: &TrigTable,
        origin: Vec2,
        now: f32,
    ) -> RectEntity {
        let color = ctx.random_color();
        let phase = ctx.random_angle();
        let angles = ctx.random_angles();

        let (center, velocity) = match self.pattern {
            SpawnPattern::Burst => {
                let strength = self.explosion_strength
                    + ctx.random_range(
                        self.jitter.0 * self.explosion_strength,
                        self.jitter.1 * self.explosion_strength,
                    );
                (origin, ctx.random_direction() * strength)
            }
            SpawnPattern::Ring {
                inner_radius,
                outer_radius,
                speed,
            } => {
                let offset = ctx.random_in_annulus(inner_radius, outer_radius);
                let dir = if offset.length_squared() > EPSILON {
                    offset.safe_normalize()
                } else {
                    ctx.random_direction()
                };
                (origin + offset, dir * speed)
            }
        };

        let shape = Rectangle::centered(center, self.rect_size.x, self.rect_size.y, color)
            .with_rotation(table, angles.x, angles.y, angles.z);
        RectEntity::new(shape, velocity, now)
            .with_drag(self.drag_k)
            .with_phase(phase)
    }
}

/// Periodic re-spawn while a button stays held.
#[derive(Debug, Clone, PartialEq)]
pub struct HoldSpawner {
    pub threshold: f32,
    pub interval: f32,
    held_for: f32,
    last_fire: f32,
}

impl HoldSpawner {
    pub fn new(threshold: f32, interval: f32) -> Self {
        Self {
            threshold,
            interval,
            held_for: 0.0,
            last_fire: 0.0,
        }
    }

    /// How long the button has been held.
    pub fn held_for(&self) -> f32 {
        self.held_for
    }

    /// Advance by `dt`. Returns true when a batch should be spawned this frame.
    ///
    /// Releasing the button resets both the hold time and the interval timer.
    pub fn update(&mut self, held: bool, dt: f32) -> bool {
        if !held {
            self.reset();
            return false;
        }
        self.held_for += dt.max(0.0);
        if self.held_for > self.threshold && self.held_for - self.last_fire > self.interval {
            self.last_fire = self.held_for;
            return true;
        }
        false
    }

    pub fn reset(&mut self) {
        self.held_for = 0.0;
        self.last_fire = 0.0;
    }
}

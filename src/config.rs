//! Sandbox configuration.
//!
//! [`SandboxConfig`] gathers every tunable of the simulation. It serializes
//! to JSON so a session can be reproduced from a file, and every field has a
//! default so partial files load cleanly.
//!
//! ```
//! use confetti::SandboxConfig;
//!
//! let config = SandboxConfig::default()
//!     .with_world_size(800.0, 600.0)
//!     .with_spawn_count(50)
//!     .with_gravity(0.0);
//! assert!(config.validate().is_ok());
//! ```

use crate::error::ConfigError;
use crate::spawn::SpawnPattern;
use serde::{Deserialize, Serialize};
use std::f32::consts::FRAC_PI_2;
use std::fs;
use std::path::Path;

/// Every tunable of the sandbox. Lengths are world units, times are seconds.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SandboxConfig {
    // World
    pub world_width: f32,
    pub world_height: f32,

    // Spawning
    pub rect_width: f32,
    pub rect_height: f32,
    /// Rectangles per spawn batch.
    pub spawn_count: usize,
    pub spawn_pattern: SpawnPattern,
    /// Base launch speed for [`SpawnPattern::Burst`].
    pub explosion_strength: f32,
    /// Jitter range as fractions of `explosion_strength`.
    pub jitter_min: f32,
    pub jitter_max: f32,
    /// Hold time before continuous spawning kicks in.
    pub hold_threshold: f32,
    /// Interval between batches while held.
    pub hold_interval: f32,
    /// Ignore spawn requests whose world position falls outside the world.
    pub reject_out_of_world_spawns: bool,
    /// Hard cap on live entities. Batches are truncated, never evicting.
    pub max_entities: usize,

    // Forces
    /// Downward acceleration in world units/s².
    pub gravity: f32,
    pub gravity_enabled: bool,
    pub drag_coefficient: f32,
    pub air_density: f32,
    /// Mass of one rectangle in kilograms.
    pub mass: f32,
    /// World units per meter, used to convert the drag area.
    pub meters_to_world: f32,
    pub flutter_strength: f32,
    pub flutter_speed: f32,
    /// Rotation rate of moving rectangles in rad/s on each axis.
    pub rotation_speed: f32,

    // Mouse interaction
    pub mouse_radius: f32,
    pub mouse_mass: f32,
    /// Extra distance the push-out aims past the capsule surface.
    pub push_offset: f32,
    /// Time constant for closing the penetration.
    pub push_time: f32,
    pub mouse_speed_sensitivity: f32,
    /// Upper bound on the speed-dependent part of the push multiplier.
    pub max_speed_boost: f32,
    /// Mouse forces are ignored this long after spawn or reactivation.
    pub spawn_grace: f32,

    // Misc
    /// Angular step of the trig lookup table in radians.
    pub trig_step: f32,
    /// Seed for the spawn RNG. `None` seeds from entropy.
    pub seed: Option<u64>,
}

impl Default for SandboxConfig {
    fn default() -> Self {
        let rect_width = 3.0;
        Self {
            world_width: 720.0,
            world_height: 480.0,

            rect_width,
            rect_height: 3.0,
            spawn_count: 200,
            spawn_pattern: SpawnPattern::Burst,
            explosion_strength: 400.0,
            jitter_min: -0.95,
            jitter_max: 0.5,
            hold_threshold: 0.5,
            hold_interval: 0.1,
            reject_out_of_world_spawns: true,
            max_entities: 200_000,

            gravity: 9.81 * (rect_width + 1.0),
            gravity_enabled: true,
            drag_coefficient: 1.0,
            air_density: 1.225,
            mass: 1e-4,
            meters_to_world: 100.0,
            flutter_strength: 0.5,
            flutter_speed: 1.0,
            rotation_speed: 1.0,

            mouse_radius: 10.0,
            mouse_mass: 80.0,
            push_offset: 1.0,
            push_time: 1.0,
            mouse_speed_sensitivity: 0.05,
            max_speed_boost: 3.0,
            spawn_grace: 1.0,

            trig_step: crate::trig::DEFAULT_ANGLE_STEP,
            seed: None,
        }
    }
}

impl SandboxConfig {
    // ========== Builders ==========

    pub fn with_world_size(mut self, width: f32, height: f32) -> Self {
        self.world_width = width;
        self.world_height = height;
        self
    }

    pub fn with_rect_size(mut self, width: f32, height: f32) -> Self {
        self.rect_width = width;
        self.rect_height = height;
        self
    }

    pub fn with_spawn_count(mut self, count: usize) -> Self {
        self.spawn_count = count;
        self
    }

    pub fn with_spawn_pattern(mut self, pattern: SpawnPattern) -> Self {
        self.spawn_pattern = pattern;
        self
    }

    pub fn with_explosion_strength(mut self, strength: f32) -> Self {
        self.explosion_strength = strength;
        self
    }

    pub fn with_gravity(mut self, gravity: f32) -> Self {
        self.gravity = gravity;
        self
    }

    pub fn with_gravity_enabled(mut self, enabled: bool) -> Self {
        self.gravity_enabled = enabled;
        self
    }

    pub fn with_drag_coefficient(mut self, cd: f32) -> Self {
        self.drag_coefficient = cd;
        self
    }

    pub fn with_flutter(mut self, strength: f32, speed: f32) -> Self {
        self.flutter_strength = strength;
        self.flutter_speed = speed;
        self
    }

    pub fn with_rotation_speed(mut self, speed: f32) -> Self {
        self.rotation_speed = speed;
        self
    }

    pub fn with_mouse_radius(mut self, radius: f32) -> Self {
        self.mouse_radius = radius;
        self
    }

    pub fn with_spawn_grace(mut self, grace: f32) -> Self {
        self.spawn_grace = grace;
        self
    }

    pub fn with_hold_timing(mut self, threshold: f32, interval: f32) -> Self {
        self.hold_threshold = threshold;
        self.hold_interval = interval;
        self
    }

    pub fn with_max_entities(mut self, max: usize) -> Self {
        self.max_entities = max;
        self
    }

    pub fn with_reject_out_of_world_spawns(mut self, reject: bool) -> Self {
        self.reject_out_of_world_spawns = reject;
        self
    }

    pub fn with_trig_step(mut self, step: f32) -> Self {
        self.trig_step = step;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    // ========== Validation ==========

    /// Check every invariant the simulation relies on.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !positive(self.world_width) || !positive(self.world_height) {
            return Err(ConfigError::NonPositiveWorld {
                width: self.world_width,
                height: self.world_height,
            });
        }
        if !positive(self.rect_width) || !positive(self.rect_height) {
            return Err(ConfigError::NonPositiveSize {
                width: self.rect_width,
                height: self.rect_height,
            });
        }
        if !positive(self.trig_step) || self.trig_step > FRAC_PI_2 {
            return Err(ConfigError::InvalidTableStep(self.trig_step));
        }
        if self.spawn_count == 0 {
            return Err(ConfigError::ZeroCount("spawn_count"));
        }
        if self.max_entities == 0 {
            return Err(ConfigError::ZeroCount("max_entities"));
        }

        let strictly_positive = [
            ("mass", self.mass),
            ("meters_to_world", self.meters_to_world),
            ("push_time", self.push_time),
            ("hold_interval", self.hold_interval),
        ];
        for (field, value) in strictly_positive {
            if !positive(value) {
                return Err(ConfigError::InvalidValue { field, value });
            }
        }

        let non_negative = [
            ("explosion_strength", self.explosion_strength),
            ("drag_coefficient", self.drag_coefficient),
            ("air_density", self.air_density),
            ("mouse_radius", self.mouse_radius),
            ("mouse_mass", self.mouse_mass),
            ("push_offset", self.push_offset),
            ("mouse_speed_sensitivity", self.mouse_speed_sensitivity),
            ("max_speed_boost", self.max_speed_boost),
            ("spawn_grace", self.spawn_grace),
            ("hold_threshold", self.hold_threshold),
            ("flutter_strength", self.flutter_strength),
        ];
        for (field, value) in non_negative {
            if !(value.is_finite() && value >= 0.0) {
                return Err(ConfigError::InvalidValue { field, value });
            }
        }

        let finite = [
            ("gravity", self.gravity),
            ("flutter_speed", self.flutter_speed),
            ("rotation_speed", self.rotation_speed),
            ("jitter_min", self.jitter_min),
            ("jitter_max", self.jitter_max),
        ];
        for (field, value) in finite {
            if !value.is_finite() {
                return Err(ConfigError::InvalidValue { field, value });
            }
        }
        if self.jitter_min > self.jitter_max {
            return Err(ConfigError::InvalidValue {
                field: "jitter_min",
                value: self.jitter_min,
            });
        }

        if let SpawnPattern::Ring {
            inner_radius,
            outer_radius,
            speed,
        } = self.spawn_pattern
        {
            if !(inner_radius.is_finite() && inner_radius >= 0.0) {
                return Err(ConfigError::InvalidValue {
                    field: "spawn_pattern.inner_radius",
                    value: inner_radius,
                });
            }
            if !(outer_radius.is_finite() && outer_radius >= inner_radius) {
                return Err(ConfigError::InvalidValue {
                    field: "spawn_pattern.outer_radius",
                    value: outer_radius,
                });
            }
            if !speed.is_finite() {
                return Err(ConfigError::InvalidValue {
                    field: "spawn_pattern.speed",
                    value: speed,
                });
            }
        }

        Ok(())
    }

    // ========== Derived values ==========

    /// Drag rate `k = 0.5 * rho * Cd * A / m`, with the rectangle area in m².
    pub fn drag_constant(&self) -> f32 {
        let area_m2 =
            (self.rect_width / self.meters_to_world) * (self.rect_height / self.meters_to_world);
        0.5 * self.air_density * self.drag_coefficient * area_m2 / self.mass
    }

    // ========== JSON ==========

    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json_string(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Load from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Save to a JSON file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let json = self.to_json_string()?;
        fs::write(path, json)?;
        Ok(())
    }
}

fn positive(value: f32) -> bool {
    value.is_finite() && value > 0.0
}

//! # Confetti - rectangle-particle sandbox
//!
//! Click to throw a burst of small rotating rectangles; they tumble under
//! drag, gravity and a gentle flutter, pile up on the floor, and can be
//! swept back into the air with the mouse.
//!
//! Confetti is the simulation core. Windowing and GPU drawing stay outside:
//! the core consumes mouse samples and frame times, and hands back a flat
//! array of [`RectInstance`]s ready for an instanced draw.
//!
//! ## Quick Start
//!
//! ```
//! use confetti::prelude::*;
//!
//! let config = SandboxConfig::default().with_seed(42);
//! let mut sandbox = Sandbox::new(config).unwrap();
//!
//! sandbox.cursor_moved(Vec2::new(360.0, 120.0), 0.0);
//! sandbox.mouse_button(MouseButton::Left, true);
//!
//! let report = sandbox.frame_at(0.0, 1.0 / 60.0);
//! assert_eq!(report.spawned, 200);
//! assert_eq!(sandbox.instances().len(), 200);
//! ```
//!
//! ## Core Concepts
//!
//! ### Rotation model
//!
//! A [`Polygon`] keeps its un-rotated points and their image under a
//! pitch/yaw/roll rotation about its pivot. Sines and cosines come from a
//! shared [`TrigTable`]. A [`Rectangle`] is a polygon fixed at four corners.
//!
//! ### Lifecycle
//!
//! | State | Enters when | Leaves when |
//! |-------|-------------|-------------|
//! | Active | spawned, or swept by the mouse while settled | crosses the floor, or exits sideways |
//! | Settled | crosses the floor (velocity zeroed) | the mouse sweeps over it |
//! | Dropped | exits the world sideways | never |
//!
//! All transitions are collected during a pass and applied afterwards, see
//! [`lifecycle`].
//!
//! ### Forces
//!
//! | Force | Applies to |
//! |-------|-----------|
//! | Exponential drag | active |
//! | Gravity (toggleable) | active |
//! | Flutter | active |
//! | Mouse push-out and slap | active and settled, after the spawn grace |
//! | Reactivation lift | settled, when hit from the front |
//!
//! See [`physics`] for the exact formulas and order.

pub mod config;
pub mod entity;
pub mod error;
pub mod geometry;
pub mod input;
pub mod instances;
pub mod lifecycle;
pub mod physics;
pub mod polygon;
pub mod rectangle;
pub mod simulation;
pub mod spawn;
pub mod time;
pub mod trig;
pub mod viewport;

pub use bytemuck;
pub use config::SandboxConfig;
pub use entity::{EntityId, RectEntity};
pub use error::{ConfigError, SandboxError};
pub use geometry::{BoundingBox, BoundingCircle, Vec2Ext};
pub use glam::{Mat2, Vec2, Vec3};
pub use instances::{InstanceBatch, RectInstance};
pub use lifecycle::{EntityPools, EntityState, Migrations};
pub use physics::{MouseSweep, StepOutcome};
pub use polygon::{InsertMode, Polygon, Rgba};
pub use rectangle::Rectangle;
pub use simulation::{FrameReport, Sandbox, SimulationState, Stats};
pub use spawn::{HoldSpawner, SpawnContext, SpawnPattern, Spawner};
pub use time::Clock;
pub use trig::TrigTable;
pub use viewport::{Viewport, WorldTransform};

/// Everything a front end usually needs.
///
/// ```ignore
/// use confetti::prelude::*;
/// ```
pub mod prelude {
    pub use crate::config::SandboxConfig;
    pub use crate::error::{ConfigError, SandboxError};
    pub use crate::input::{Input, KeyCode, MouseButton};
    pub use crate::instances::{InstanceBatch, RectInstance};
    pub use crate::polygon::Rgba;
    pub use crate::simulation::{FrameReport, Sandbox, Stats};
    pub use crate::spawn::SpawnPattern;
    pub use crate::time::Clock;
    pub use crate::viewport::{Viewport, WorldTransform};
    pub use crate::{Vec2, Vec3};
}

//! Simulation state and the frame driver.
//!
//! [`SimulationState`] owns everything the physics touches: the entity
//! pools, the trig table, the config and the spawn RNG. Its
//! [`step`](SimulationState::step) runs one frame:
//!
//! 1. Settled pass: mouse sweep test, reactivations applied as a batch
//! 2. Active pass: forces, integration, boundary test
//! 3. Settles and drops applied as a batch
//!
//! [`Sandbox`] wraps the state with input, clock, viewport, hold spawning
//! and instance packing, which is what a windowed front end drives:
//!
//! ```ignore
//! let mut sandbox = Sandbox::new(SandboxConfig::default())?;
//! // In the event loop:
//! sandbox.handle_event(&event);
//! // Once per redraw:
//! sandbox.frame();
//! renderer.upload(sandbox.instances().as_bytes());
//! ```

use crate::config::SandboxConfig;
use crate::entity::{EntityId, RectEntity};
use crate::error::{ConfigError, SandboxError};
use crate::input::{Input, KeyCode, MouseButton};
use crate::instances::InstanceBatch;
use crate::lifecycle::{EntityPools, MigrationCounts, Migrations};
use crate::physics::{self, FrameContext, MouseSweep};
use crate::spawn::{HoldSpawner, Spawner};
use crate::time::Clock;
use crate::trig::TrigTable;
use crate::viewport::{Viewport, WorldTransform};
use glam::Vec2;
use rand::rngs::SmallRng;
use rand::SeedableRng;
use std::fmt;
use winit::event::WindowEvent;

/// What happened during one frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameReport {
    pub spawned: usize,
    pub settled: usize,
    pub dropped: usize,
    pub reactivated: usize,
    /// Active pool size after the frame.
    pub active: usize,
    /// Settled pool size after the frame.
    pub resting: usize,
}

/// Pool sizes and lifetime counters.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Stats {
    pub active: usize,
    pub settled: usize,
    pub total_spawned: u64,
    pub total_settled: u64,
    pub total_dropped: u64,
    pub total_reactivated: u64,
    pub gravity_enabled: bool,
    pub frame: u64,
    pub fps: f32,
}

impl Stats {
    /// Live entities.
    pub fn live(&self) -> usize {
        self.active + self.settled
    }
}

impl fmt::Display for Stats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "active={} settled={} spawned={} dropped={} reactivated={} gravity={}",
            self.active,
            self.settled,
            self.total_spawned,
            self.total_dropped,
            self.total_reactivated,
            if self.gravity_enabled { "on" } else { "off" }
        )
    }
}

#[derive(Debug, Clone, Copy, Default)]
struct Totals {
    spawned: u64,
    settled: u64,
    dropped: u64,
    reactivated: u64,
}

impl Totals {
    fn record(&mut self, counts: MigrationCounts) {
        self.settled += counts.settled as u64;
        self.dropped += counts.dropped as u64;
        self.reactivated += counts.reactivated as u64;
    }
}

/// Everything the per-frame physics reads and writes.
#[derive(Debug, Clone)]
pub struct SimulationState {
    pools: EntityPools,
    table: TrigTable,
    config: SandboxConfig,
    spawner: Spawner,
    rng: SmallRng,
    gravity_enabled: bool,
    migrations: Migrations,
    totals: Totals,
}

impl SimulationState {
    /// Validate `config` and build a fresh state.
    pub fn new(config: SandboxConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let rng = match config.seed {
            Some(seed) => SmallRng::seed_from_u64(seed),
            None => SmallRng::from_entropy(),
        };
        let table = TrigTable::with_step(config.trig_step);
        log::debug!(
            "Trig table: {} entries at {} rad, drag k = {}",
            table.len(),
            table.step(),
            config.drag_constant()
        );
        Ok(Self {
            pools: EntityPools::new(),
            spawner: Spawner::from_config(&config),
            gravity_enabled: config.gravity_enabled,
            table,
            config,
            rng,
            migrations: Migrations::default(),
            totals: Totals::default(),
        })
    }

    pub fn pools(&self) -> &EntityPools {
        &self.pools
    }

    pub fn table(&self) -> &TrigTable {
        &self.table
    }

    pub fn config(&self) -> &SandboxConfig {
        &self.config
    }

    pub fn spawner(&self) -> &Spawner {
        &self.spawner
    }

    pub fn get(&self, id: EntityId) -> Option<&RectEntity> {
        self.pools.get(id)
    }

    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut RectEntity> {
        self.pools.get_mut(id)
    }

    pub fn gravity_enabled(&self) -> bool {
        self.gravity_enabled
    }

    pub fn set_gravity_enabled(&mut self, enabled: bool) {
        self.gravity_enabled = enabled;
    }

    /// Flip gravity, returning the new setting.
    pub fn toggle_gravity(&mut self) -> bool {
        self.gravity_enabled = !self.gravity_enabled;
        log::info!("Gravity {}", if self.gravity_enabled { "on" } else { "off" });
        self.gravity_enabled
    }

    /// Room left under `max_entities`.
    pub fn capacity_left(&self) -> usize {
        self.config.max_entities.saturating_sub(self.pools.len())
    }

    /// Add a prepared entity. Returns `None` when the entity cap is reached.
    pub fn insert(&mut self, entity: RectEntity) -> Option<EntityId> {
        if self.capacity_left() == 0 {
            log::warn!("Entity cap {} reached, insert ignored", self.config.max_entities);
            return None;
        }
        self.totals.spawned += 1;
        Some(self.pools.insert(entity))
    }

    /// Spawn one batch at `world` (world coordinates) stamped with `now`.
    ///
    /// Out-of-world positions are ignored when
    /// [`reject_out_of_world_spawns`](SandboxConfig::reject_out_of_world_spawns)
    /// is set. The batch is truncated to the remaining entity capacity.
    /// Returns the number of entities created.
    pub fn spawn(&mut self, world: Vec2, now: f32) -> usize {
        let (w, h) = (self.config.world_width, self.config.world_height);
        let inside = world.x >= 0.0 && world.y >= 0.0 && world.x <= w && world.y <= h;
        if self.config.reject_out_of_world_spawns && !inside {
            log::debug!("Spawn at ({:.1}, {:.1}) is outside the world, ignored", world.x, world.y);
            return 0;
        }

        let wanted = self.spawner.count;
        let count = wanted.min(self.capacity_left());
        if count < wanted {
            log::warn!(
                "Spawn batch truncated from {} to {} (entity cap {})",
                wanted,
                count,
                self.config.max_entities
            );
        }
        if count == 0 {
            return 0;
        }

        let batch = self
            .spawner
            .spawn_batch(&mut self.rng, &self.table, world, now, count);
        for entity in batch {
            self.pools.insert(entity);
        }
        self.totals.spawned += count as u64;
        log::debug!("Spawned {} at ({:.1}, {:.1})", count, world.x, world.y);
        count
    }

    /// Run one frame at clock time `now` with step `dt`.
    ///
    /// A frame with no elapsed time ignores the mouse: push-out does not
    /// scale with `dt` and would otherwise pile up while time is frozen.
    pub fn step(&mut self, now: f32, dt: f32, sweep: Option<&MouseSweep>) -> FrameReport {
        let sweep = sweep.filter(|_| dt > 0.0);
        let frame = FrameContext {
            config: &self.config,
            table: &self.table,
            now,
            dt,
            gravity_enabled: self.gravity_enabled,
            sweep,
        };
        let mut counts = MigrationCounts::default();

        if let Some(sweep) = sweep {
            let rng = &mut self.rng;
            self.pools.sweep_settled(
                |entity| {
                    let woke = physics::interact_settled(entity, sweep, &frame, rng);
                    if woke {
                        log::trace!(
                            "Reactivated at ({:.1}, {:.1})",
                            entity.center().x,
                            entity.center().y
                        );
                    }
                    woke
                },
                &mut self.migrations,
            );
            counts += self.pools.apply(&mut self.migrations);
        }

        self.pools.step_active(
            |entity| physics::integrate_active(entity, &frame),
            &mut self.migrations,
        );
        counts += self.pools.apply(&mut self.migrations);
        self.totals.record(counts);

        FrameReport {
            spawned: 0,
            settled: counts.settled,
            dropped: counts.dropped,
            reactivated: counts.reactivated,
            active: self.pools.active_len(),
            resting: self.pools.settled_len(),
        }
    }

    /// Remove every entity. Gravity returns to its configured setting.
    pub fn reset(&mut self) {
        let live = self.pools.len();
        self.pools.clear();
        self.migrations.clear();
        self.gravity_enabled = self.config.gravity_enabled;
        log::info!("Reset: cleared {} rectangles", live);
    }

    fn stats(&self) -> Stats {
        Stats {
            active: self.pools.active_len(),
            settled: self.pools.settled_len(),
            total_spawned: self.totals.spawned,
            total_settled: self.totals.settled,
            total_dropped: self.totals.dropped,
            total_reactivated: self.totals.reactivated,
            gravity_enabled: self.gravity_enabled,
            frame: 0,
            fps: 0.0,
        }
    }
}

/// Interactive sandbox: simulation state plus input, clock and render output.
#[derive(Debug)]
pub struct Sandbox {
    state: SimulationState,
    input: Input,
    hold: HoldSpawner,
    viewport: Viewport,
    clock: Clock,
    instances: InstanceBatch,
}

impl Sandbox {
    /// Build a sandbox whose framebuffer matches the world size.
    pub fn new(config: SandboxConfig) -> Result<Self, SandboxError> {
        let state = SimulationState::new(config)?;
        let config = state.config();
        let viewport = Viewport::identity(config.world_width, config.world_height);
        let hold = HoldSpawner::new(config.hold_threshold, config.hold_interval);
        log::info!(
            "Sandbox ready: world {}x{}, {} per batch, cap {}",
            config.world_width,
            config.world_height,
            config.spawn_count,
            config.max_entities
        );
        Ok(Self {
            state,
            input: Input::new(),
            hold,
            viewport,
            clock: Clock::new(),
            instances: InstanceBatch::new(),
        })
    }

    // ========== Accessors ==========

    pub fn state(&self) -> &SimulationState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut SimulationState {
        &mut self.state
    }

    pub fn input(&self) -> &Input {
        &self.input
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn clock(&self) -> &Clock {
        &self.clock
    }

    pub fn clock_mut(&mut self) -> &mut Clock {
        &mut self.clock
    }

    /// Render data from the last frame.
    pub fn instances(&self) -> &InstanceBatch {
        &self.instances
    }

    pub fn stats(&self) -> Stats {
        Stats {
            frame: self.clock.frame(),
            fps: self.clock.fps(),
            ..self.state.stats()
        }
    }

    // ========== Input ==========

    /// Cursor moved to `screen` (pixels) at clock time `now`.
    pub fn cursor_moved(&mut self, screen: Vec2, now: f32) {
        self.input.cursor_moved(screen, now, &self.viewport);
    }

    pub fn mouse_button(&mut self, button: MouseButton, pressed: bool) {
        self.input.button_changed(button, pressed);
    }

    pub fn key(&mut self, key: KeyCode, pressed: bool) {
        self.input.key_changed(key, pressed);
    }

    /// Framebuffer resized.
    pub fn resize(&mut self, width: f32, height: f32) {
        self.viewport.fit(width, height);
    }

    /// Feed a winit window event, timestamped with the current clock.
    pub fn handle_event(&mut self, event: &WindowEvent) {
        match event {
            WindowEvent::Resized(size) => self.resize(size.width as f32, size.height as f32),
            _ => self.input.handle_event(event, self.clock.elapsed(), &self.viewport),
        }
    }

    // ========== Controls ==========

    pub fn toggle_gravity(&mut self) -> bool {
        self.state.toggle_gravity()
    }

    /// Clear every rectangle.
    pub fn reset(&mut self) {
        self.state.reset();
        self.hold.reset();
        self.instances = InstanceBatch::new();
    }

    // ========== Frame ==========

    /// Sample the clock and run one frame.
    pub fn frame(&mut self) -> FrameReport {
        let (now, dt) = self.clock.tick();
        self.frame_at(now, dt)
    }

    /// Run one frame at an explicit time and step.
    ///
    /// Applies control keys, spawns on click and hold, steps the physics,
    /// rebuilds the instance batch and ends the input frame.
    pub fn frame_at(&mut self, now: f32, dt: f32) -> FrameReport {
        if self.input.key_pressed(KeyCode::R) {
            self.reset();
        }
        if self.input.key_pressed(KeyCode::G) {
            self.toggle_gravity();
        }
        if self.input.key_pressed(KeyCode::Space) {
            self.clock.toggle_pause();
        }

        let cursor = self.input.world_position();
        let mut spawned = 0;
        if self.input.mouse_pressed(MouseButton::Left) {
            spawned += self.state.spawn(cursor, now);
        }
        if self.hold.update(self.input.mouse_held(MouseButton::Left), dt) {
            spawned += self.state.spawn(cursor, now);
        }

        let sweep = (!self.clock.is_paused()).then(|| self.input.sweep());
        let mut report = self.state.step(now, dt, sweep.as_ref());
        report.spawned = spawned;

        self.instances
            .rebuild(self.state.pools(), &self.viewport.world_bounds());
        self.input.end_frame();
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lifecycle::EntityState;
    use crate::polygon::Rgba;
    use crate::rectangle::Rectangle;

    fn quiet_config() -> SandboxConfig {
        SandboxConfig::default()
            .with_seed(3)
            .with_spawn_count(10)
            .with_gravity_enabled(false)
    }

    #[test]
    fn test_new_rejects_invalid_config() {
        let result = Sandbox::new(SandboxConfig::default().with_world_size(-1.0, 10.0));
        assert!(matches!(result, Err(SandboxError::Config(_))));
    }

    #[test]
    fn test_out_of_world_spawn_ignored() {
        let mut state = SimulationState::new(quiet_config()).unwrap();
        assert_eq!(state.spawn(Vec2::new(-5.0, 10.0), 0.0), 0);
        assert!(state.pools().is_empty());
        assert_eq!(state.spawn(Vec2::new(100.0, 100.0), 0.0), 10);
        assert_eq!(state.pools().active_len(), 10);
    }

    #[test]
    fn test_entity_cap_truncates() {
        let mut state = SimulationState::new(quiet_config().with_max_entities(15)).unwrap();
        assert_eq!(state.spawn(Vec2::new(100.0, 100.0), 0.0), 10);
        assert_eq!(state.spawn(Vec2::new(100.0, 100.0), 0.0), 5);
        assert_eq!(state.spawn(Vec2::new(100.0, 100.0), 0.0), 0);
        assert_eq!(state.pools().len(), 15);
    }

    #[test]
    fn test_click_spawns_and_frame_reports() {
        let mut sandbox = Sandbox::new(quiet_config()).unwrap();
        sandbox.cursor_moved(Vec2::new(360.0, 240.0), 0.0);
        sandbox.mouse_button(MouseButton::Left, true);
        let report = sandbox.frame_at(0.0, 1.0 / 60.0);
        assert_eq!(report.spawned, 10);
        assert_eq!(sandbox.instances().len(), 10);
        assert_eq!(sandbox.stats().total_spawned, 10);

        // Still held but under the hold threshold: nothing new.
        let report = sandbox.frame_at(1.0 / 60.0, 1.0 / 60.0);
        assert_eq!(report.spawned, 0);
    }

    #[test]
    fn test_keys_toggle_gravity_and_reset() {
        let mut sandbox = Sandbox::new(quiet_config()).unwrap();
        sandbox.state_mut().spawn(Vec2::new(100.0, 100.0), 0.0);

        sandbox.key(KeyCode::G, true);
        sandbox.frame_at(0.0, 0.0);
        assert!(sandbox.state().gravity_enabled());

        sandbox.key(KeyCode::G, false);
        sandbox.key(KeyCode::R, true);
        sandbox.frame_at(0.0, 0.0);
        assert!(sandbox.state().pools().is_empty());
        assert_eq!(sandbox.instances().len(), 0);
    }

    #[test]
    fn test_frozen_frames_ignore_the_mouse() {
        let mut state = SimulationState::new(quiet_config()).unwrap();
        let shape = |center| Rectangle::centered(center, 3.0, 3.0, Rgba::WHITE);
        let awake = state
            .insert(RectEntity::new(shape(Vec2::new(100.0, 100.0)), Vec2::ZERO, 0.0))
            .unwrap();
        let mut resting = RectEntity::new(shape(Vec2::new(200.0, 100.0)), Vec2::ZERO, 0.0);
        resting.settle(0.5);
        let asleep = state.insert(resting).unwrap();

        let near = MouseSweep::new(Vec2::new(97.0, 100.0), Vec2::new(97.0, 100.0), 0.0);
        let across = MouseSweep::new(Vec2::new(190.0, 100.0), Vec2::new(210.0, 100.0), 0.1);
        for _ in 0..20 {
            state.step(5.0, 0.0, Some(&near));
            let report = state.step(5.0, 0.0, Some(&across));
            assert_eq!(report.reactivated, 0);
        }

        assert_eq!(state.get(awake).unwrap().velocity, Vec2::ZERO);
        assert_eq!(state.get(awake).unwrap().center(), Vec2::new(100.0, 100.0));
        assert_eq!(state.pools().state(asleep), EntityState::Settled);
    }

    #[test]
    fn test_paused_sandbox_does_not_push() {
        let mut sandbox = Sandbox::new(quiet_config()).unwrap();
        let shape = Rectangle::centered(Vec2::new(100.0, 100.0), 3.0, 3.0, Rgba::WHITE);
        let id = sandbox
            .state_mut()
            .insert(RectEntity::new(shape, Vec2::ZERO, 0.0))
            .unwrap();
        sandbox.clock_mut().advance(2.0);
        sandbox.cursor_moved(Vec2::new(97.0, 100.0), 2.0);
        sandbox.clock_mut().pause();

        for _ in 0..20 {
            sandbox.frame();
        }

        assert!(sandbox.clock().is_paused());
        let e = sandbox.state().get(id).unwrap();
        assert_eq!(e.velocity, Vec2::ZERO);
        assert_eq!(e.center(), Vec2::new(100.0, 100.0));
    }

    #[test]
    fn test_stats_display() {
        let sandbox = Sandbox::new(quiet_config()).unwrap();
        let text = sandbox.stats().to_string();
        assert!(text.contains("active=0"));
        assert!(text.contains("gravity=off"));
    }
}

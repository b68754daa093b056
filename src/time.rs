//! Frame clock.
//!
//! The simulation samples one [`Clock`] once per frame. Every timestamp an
//! entity stores (spawn, stop) and every mouse sample comes from
//! [`Clock::elapsed`], so they all share one monotonic time base.
//!
//! Elapsed time is the running sum of frame deltas. Pausing, a fixed delta or
//! a time scale therefore change timestamps and integration step together.
//!
//! ```ignore
//! let mut clock = Clock::new();
//! loop {
//!     let (now, dt) = clock.tick();
//!     sandbox.frame_at(now, dt);
//! }
//! ```

use std::time::{Duration, Instant};

/// Frame timing: elapsed, delta, frame count, fps.
#[derive(Debug, Clone)]
pub struct Clock {
    last_frame: Instant,
    elapsed_secs: f32,
    delta_secs: f32,
    frame_count: u64,
    fps: f32,
    fps_frame_count: u64,
    fps_update_time: Instant,
    fps_update_interval: Duration,
    paused: bool,
    fixed_delta: Option<f32>,
    time_scale: f32,
}

impl Clock {
    pub fn new() -> Self {
        let now = Instant::now();
        Self {
            last_frame: now,
            elapsed_secs: 0.0,
            delta_secs: 0.0,
            frame_count: 0,
            fps: 0.0,
            fps_frame_count: 0,
            fps_update_time: now,
            fps_update_interval: Duration::from_secs(1),
            paused: false,
            fixed_delta: None,
            time_scale: 1.0,
        }
    }

    /// Sample the wall clock. Call once per frame.
    ///
    /// Returns `(elapsed, delta)`.
    pub fn tick(&mut self) -> (f32, f32) {
        let now = Instant::now();
        let raw_delta = now.duration_since(self.last_frame).as_secs_f32();
        self.last_frame = now;
        self.update_fps(now);
        self.advance(raw_delta)
    }

    /// Step by an explicit wall delta instead of sampling the wall clock.
    ///
    /// Fixed delta, time scale and pause apply as in [`tick`](Self::tick).
    pub fn advance(&mut self, raw_delta: f32) -> (f32, f32) {
        if self.paused {
            self.delta_secs = 0.0;
            return (self.elapsed_secs, self.delta_secs);
        }
        let raw_delta = if raw_delta.is_finite() { raw_delta.max(0.0) } else { 0.0 };
        self.delta_secs = self.fixed_delta.unwrap_or(raw_delta) * self.time_scale;
        self.elapsed_secs += self.delta_secs;
        self.frame_count += 1;
        (self.elapsed_secs, self.delta_secs)
    }

    fn update_fps(&mut self, now: Instant) {
        let fps_elapsed = now.duration_since(self.fps_update_time);
        if fps_elapsed >= self.fps_update_interval {
            let frames_since = self.frame_count + 1 - self.fps_frame_count;
            self.fps = frames_since as f32 / fps_elapsed.as_secs_f32();
            self.fps_frame_count = self.frame_count + 1;
            self.fps_update_time = now;
        }
    }

    /// Simulation time in seconds.
    #[inline]
    pub fn elapsed(&self) -> f32 {
        self.elapsed_secs
    }

    /// Last frame's delta in seconds.
    #[inline]
    pub fn delta(&self) -> f32 {
        self.delta_secs
    }

    #[inline]
    pub fn frame(&self) -> u64 {
        self.frame_count
    }

    /// Frames per second, refreshed once a second.
    #[inline]
    pub fn fps(&self) -> f32 {
        self.fps
    }

    #[inline]
    pub fn is_paused(&self) -> bool {
        self.paused
    }

    #[inline]
    pub fn time_scale(&self) -> f32 {
        self.time_scale
    }

    /// Stop time. `delta()` is 0 and `elapsed()` holds until resumed.
    pub fn pause(&mut self) {
        self.paused = true;
    }

    pub fn resume(&mut self) {
        if self.paused {
            self.last_frame = Instant::now();
            self.paused = false;
        }
    }

    pub fn toggle_pause(&mut self) {
        if self.paused {
            self.resume();
        } else {
            self.pause();
        }
    }

    /// Use a constant delta instead of wall time. `None` restores wall time.
    pub fn set_fixed_delta(&mut self, delta: Option<f32>) {
        self.fixed_delta = delta.filter(|d| d.is_finite() && *d >= 0.0);
    }

    /// Multiplier on every delta. Negative values clamp to 0.
    pub fn set_time_scale(&mut self, scale: f32) {
        self.time_scale = scale.max(0.0);
    }

    /// Back to time zero, keeping fixed delta and time scale.
    pub fn reset(&mut self) {
        let now = Instant::now();
        self.last_frame = now;
        self.elapsed_secs = 0.0;
        self.delta_secs = 0.0;
        self.frame_count = 0;
        self.fps = 0.0;
        self.fps_frame_count = 0;
        self.fps_update_time = now;
        self.paused = false;
    }
}

impl Default for Clock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_clock_new() {
        let clock = Clock::new();
        assert_eq!(clock.frame(), 0);
        assert!(!clock.is_paused());
        assert_eq!(clock.time_scale(), 1.0);
    }

    #[test]
    fn test_tick() {
        let mut clock = Clock::new();
        thread::sleep(Duration::from_millis(10));
        let (elapsed, delta) = clock.tick();
        assert!(elapsed > 0.0);
        assert!(delta > 0.0);
        assert_eq!(elapsed, delta);
        assert_eq!(clock.frame(), 1);
    }

    #[test]
    fn test_pause_holds_elapsed() {
        let mut clock = Clock::new();
        clock.advance(0.5);
        clock.pause();
        let (elapsed, delta) = clock.advance(0.25);
        assert_eq!(elapsed, 0.5);
        assert_eq!(delta, 0.0);

        clock.toggle_pause();
        let (elapsed, _) = clock.advance(0.25);
        assert_eq!(elapsed, 0.75);
    }

    #[test]
    fn test_time_scale() {
        let mut clock = Clock::new();
        clock.set_time_scale(2.0);
        let (elapsed, delta) = clock.advance(0.25);
        assert_eq!(delta, 0.5);
        assert_eq!(elapsed, 0.5);

        clock.set_time_scale(-1.0);
        assert_eq!(clock.time_scale(), 0.0);
    }

    #[test]
    fn test_fixed_delta() {
        let mut clock = Clock::new();
        clock.set_fixed_delta(Some(1.0 / 60.0));
        thread::sleep(Duration::from_millis(20));
        clock.tick();
        assert!((clock.delta() - 1.0 / 60.0).abs() < 1e-6);
    }

    #[test]
    fn test_bad_delta_is_ignored() {
        let mut clock = Clock::new();
        let (elapsed, delta) = clock.advance(f32::NAN);
        assert_eq!((elapsed, delta), (0.0, 0.0));
        clock.advance(-1.0);
        assert_eq!(clock.elapsed(), 0.0);
    }
}

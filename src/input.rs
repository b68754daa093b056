//! Mouse and keyboard state.
//!
//! [`Input`] turns raw window events into what the simulation needs: the
//! mouse's world-space sweep over the current frame, button edges and held
//! state, and a handful of control keys.
//!
//! The mouse keeps two samples. `current` follows every cursor event;
//! `previous` is the position at the end of the last frame. Together they
//! form the frame's [`MouseSweep`]. [`Input::end_frame`] collapses
//! `previous` onto `current`, so a mouse that does not move produces a
//! zero-length, zero-velocity sweep.
//!
//! ```ignore
//! input.cursor_moved(Vec2::new(320.0, 200.0), clock.elapsed(), &viewport);
//! let sweep = input.sweep();
//! // ... run the frame ...
//! input.end_frame();
//! ```

use crate::physics::MouseSweep;
use crate::viewport::WorldTransform;
use glam::Vec2;
use std::collections::HashSet;
use winit::event::{ElementState, MouseButton as WinitMouseButton, WindowEvent};
use winit::keyboard::{KeyCode as WinitKeyCode, PhysicalKey};

/// Mouse button identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
    Back,
    Forward,
    Other(u16),
}

impl From<WinitMouseButton> for MouseButton {
    fn from(btn: WinitMouseButton) -> Self {
        match btn {
            WinitMouseButton::Left => MouseButton::Left,
            WinitMouseButton::Right => MouseButton::Right,
            WinitMouseButton::Middle => MouseButton::Middle,
            WinitMouseButton::Back => MouseButton::Back,
            WinitMouseButton::Forward => MouseButton::Forward,
            WinitMouseButton::Other(id) => MouseButton::Other(id),
        }
    }
}

/// Keys the sandbox reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    /// Clear every rectangle.
    R,
    /// Toggle gravity.
    G,
    /// Pause or resume the clock.
    Space,
    Other(u32),
}

impl From<WinitKeyCode> for KeyCode {
    fn from(key: WinitKeyCode) -> Self {
        match key {
            WinitKeyCode::KeyR => KeyCode::R,
            WinitKeyCode::KeyG => KeyCode::G,
            WinitKeyCode::Space => KeyCode::Space,
            _ => KeyCode::Other(key as u32),
        }
    }
}

/// One cursor sample in world space.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
struct MouseSample {
    world: Vec2,
    time: f32,
}

/// Input state for the sandbox.
#[derive(Debug, Default)]
pub struct Input {
    keys_held: HashSet<KeyCode>,
    keys_pressed: HashSet<KeyCode>,

    mouse_held: HashSet<MouseButton>,
    mouse_pressed: HashSet<MouseButton>,
    mouse_released: HashSet<MouseButton>,

    screen_position: Vec2,
    previous: MouseSample,
    current: MouseSample,
    /// False until the first cursor event.
    tracking: bool,
}

impl Input {
    pub fn new() -> Self {
        Self::default()
    }

    // ========== Key Queries ==========

    /// Key went down this frame.
    pub fn key_pressed(&self, key: KeyCode) -> bool {
        self.keys_pressed.contains(&key)
    }

    pub fn key_held(&self, key: KeyCode) -> bool {
        self.keys_held.contains(&key)
    }

    // ========== Mouse Button Queries ==========

    /// Button went down this frame.
    pub fn mouse_pressed(&self, button: MouseButton) -> bool {
        self.mouse_pressed.contains(&button)
    }

    pub fn mouse_held(&self, button: MouseButton) -> bool {
        self.mouse_held.contains(&button)
    }

    pub fn mouse_released(&self, button: MouseButton) -> bool {
        self.mouse_released.contains(&button)
    }

    // ========== Mouse Position Queries ==========

    /// Last cursor position in screen pixels.
    pub fn screen_position(&self) -> Vec2 {
        self.screen_position
    }

    /// Current cursor position in world units.
    pub fn world_position(&self) -> Vec2 {
        self.current.world
    }

    /// The mouse's path since the last [`end_frame`](Self::end_frame).
    pub fn sweep(&self) -> MouseSweep {
        MouseSweep::new(
            self.previous.world,
            self.current.world,
            self.current.time - self.previous.time,
        )
    }

    // ========== Updates ==========

    /// Record a cursor position sampled at clock time `now`.
    ///
    /// The first sample ever seen also becomes `previous`, so the cursor
    /// entering the window does not sweep in from the origin.
    pub fn cursor_moved(&mut self, screen: Vec2, now: f32, transform: &impl WorldTransform) {
        self.screen_position = screen;
        self.current = MouseSample {
            world: transform.screen_to_world(screen),
            time: now,
        };
        if !self.tracking {
            self.previous = self.current;
            self.tracking = true;
        }
    }

    /// Place the cursor without producing a sweep (e.g. when the window gains
    /// focus).
    pub fn warp_cursor(&mut self, screen: Vec2, now: f32, transform: &impl WorldTransform) {
        self.cursor_moved(screen, now, transform);
        self.previous = self.current;
    }

    pub fn button_changed(&mut self, button: MouseButton, pressed: bool) {
        if pressed {
            if self.mouse_held.insert(button) {
                self.mouse_pressed.insert(button);
            }
        } else if self.mouse_held.remove(&button) {
            self.mouse_released.insert(button);
        }
    }

    pub fn key_changed(&mut self, key: KeyCode, pressed: bool) {
        if pressed {
            // Auto-repeat does not produce a new press.
            if self.keys_held.insert(key) {
                self.keys_pressed.insert(key);
            }
        } else {
            self.keys_held.remove(&key);
        }
    }

    /// Clear per-frame edges and collapse the mouse sweep.
    pub fn end_frame(&mut self) {
        self.keys_pressed.clear();
        self.mouse_pressed.clear();
        self.mouse_released.clear();
        self.previous = self.current;
    }

    /// Process a winit window event sampled at clock time `now`.
    pub fn handle_event(&mut self, event: &WindowEvent, now: f32, transform: &impl WorldTransform) {
        match event {
            WindowEvent::KeyboardInput { event, .. } => {
                if let PhysicalKey::Code(keycode) = event.physical_key {
                    self.key_changed(KeyCode::from(keycode), event.state == ElementState::Pressed);
                }
            }

            WindowEvent::MouseInput { state, button, .. } => {
                self.button_changed(MouseButton::from(*button), *state == ElementState::Pressed);
            }

            WindowEvent::CursorMoved { position, .. } => {
                let screen = Vec2::new(position.x as f32, position.y as f32);
                self.cursor_moved(screen, now, transform);
            }

            _ => {}
        }
    }
}

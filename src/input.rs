//! Input handling for the viewer.
//!
//! [`Input`] tracks held buttons, held keys, and the cursor, and turns raw
//! window events into [`InputAction`]s: orbit drags, wheel zoom, arrow-key
//! pans, and the window-level shortcuts. Events the control panel consumed
//! should never reach it.
//!
//! Positions and drag deltas are in logical pixels.

use std::collections::HashSet;
use std::time::Instant;

use glam::Vec2;
use winit::event::{ElementState, MouseButton as WinitMouseButton, MouseScrollDelta, WindowEvent};
use winit::keyboard::{KeyCode as WinitKeyCode, PhysicalKey};

use crate::camera::PanDirection;
use crate::viewport::DoubleClickDetector;

/// Mouse button identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
    Other,
}

impl From<WinitMouseButton> for MouseButton {
    fn from(btn: WinitMouseButton) -> Self {
        match btn {
            WinitMouseButton::Left => MouseButton::Left,
            WinitMouseButton::Right => MouseButton::Right,
            WinitMouseButton::Middle => MouseButton::Middle,
            _ => MouseButton::Other,
        }
    }
}

/// The keys the viewer reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    Up,
    Down,
    Left,
    Right,
    H,
    Escape,
    Other,
}

impl From<WinitKeyCode> for KeyCode {
    fn from(key: WinitKeyCode) -> Self {
        match key {
            WinitKeyCode::ArrowUp => KeyCode::Up,
            WinitKeyCode::ArrowDown => KeyCode::Down,
            WinitKeyCode::ArrowLeft => KeyCode::Left,
            WinitKeyCode::ArrowRight => KeyCode::Right,
            WinitKeyCode::KeyH => KeyCode::H,
            WinitKeyCode::Escape => KeyCode::Escape,
            _ => KeyCode::Other,
        }
    }
}

/// Something the viewer should do in response to input.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputAction {
    /// Orbit drag by this many logical pixels.
    Rotate { dx: f32, dy: f32 },
    /// Pan drag by this many logical pixels.
    Pan { dx: f32, dy: f32 },
    /// Wheel steps, positive toward the target.
    Zoom(f32),
    /// One arrow-key pan step.
    PanKey(PanDirection),
    ToggleFullscreen,
    ExitFullscreen,
    TogglePanel,
}

/// Input state tracker.
#[derive(Debug)]
pub struct Input {
    keys_held: HashSet<KeyCode>,
    mouse_held: HashSet<MouseButton>,
    cursor: Option<Vec2>,
    scale_factor: f64,
    double_click: DoubleClickDetector,
}

impl Input {
    /// Create a new input tracker for a window with the given scale factor.
    pub fn new(scale_factor: f64) -> Self {
        Self {
            keys_held: HashSet::new(),
            mouse_held: HashSet::new(),
            cursor: None,
            scale_factor: if scale_factor > 0.0 { scale_factor } else { 1.0 },
            double_click: DoubleClickDetector::new(),
        }
    }

    pub fn set_scale_factor(&mut self, scale_factor: f64) {
        if scale_factor > 0.0 {
            self.scale_factor = scale_factor;
        }
    }

    /// Check if a mouse button is currently held down.
    pub fn mouse_held(&self, button: MouseButton) -> bool {
        self.mouse_held.contains(&button)
    }

    /// Process a winit window event.
    pub fn handle_event(&mut self, event: &WindowEvent, now: Instant) -> Option<InputAction> {
        match event {
            WindowEvent::KeyboardInput { event, .. } => match event.physical_key {
                PhysicalKey::Code(code) => self.key(KeyCode::from(code), event.state == ElementState::Pressed),
                PhysicalKey::Unidentified(_) => None,
            },
            WindowEvent::MouseInput { state, button, .. } => {
                self.mouse_button(MouseButton::from(*button), *state == ElementState::Pressed, now)
            }
            WindowEvent::CursorMoved { position, .. } => {
                let logical = position.to_logical::<f64>(self.scale_factor);
                self.cursor_moved(Vec2::new(logical.x as f32, logical.y as f32))
            }
            WindowEvent::CursorLeft { .. } => {
                self.cursor = None;
                None
            }
            WindowEvent::MouseWheel { delta, .. } => {
                let steps = match delta {
                    MouseScrollDelta::LineDelta(_, y) => *y,
                    MouseScrollDelta::PixelDelta(pos) => pos.y as f32 / 100.0,
                };
                self.scroll(steps)
            }
            WindowEvent::Focused(false) => {
                self.release_all();
                None
            }
            _ => None,
        }
    }

    pub fn key(&mut self, key: KeyCode, pressed: bool) -> Option<InputAction> {
        if !pressed {
            self.keys_held.remove(&key);
            return None;
        }
        let repeat = !self.keys_held.insert(key);
        match key {
            // Arrow keys keep panning while held.
            KeyCode::Up => Some(InputAction::PanKey(PanDirection::Up)),
            KeyCode::Down => Some(InputAction::PanKey(PanDirection::Down)),
            KeyCode::Left => Some(InputAction::PanKey(PanDirection::Left)),
            KeyCode::Right => Some(InputAction::PanKey(PanDirection::Right)),
            KeyCode::H if !repeat => Some(InputAction::TogglePanel),
            KeyCode::Escape if !repeat => Some(InputAction::ExitFullscreen),
            _ => None,
        }
    }

    pub fn mouse_button(&mut self, button: MouseButton, pressed: bool, now: Instant) -> Option<InputAction> {
        if !pressed {
            self.mouse_held.remove(&button);
            return None;
        }
        self.mouse_held.insert(button);
        if button != MouseButton::Left {
            return None;
        }
        let at = self.cursor.unwrap_or(Vec2::ZERO);
        if self.double_click.click(now, (at.x as f64, at.y as f64)) {
            Some(InputAction::ToggleFullscreen)
        } else {
            None
        }
    }

    /// Move the cursor. Returns a drag action when a button is held.
    pub fn cursor_moved(&mut self, position: Vec2) -> Option<InputAction> {
        let previous = self.cursor.replace(position)?;
        let delta = position - previous;
        if delta == Vec2::ZERO {
            return None;
        }
        if self.mouse_held(MouseButton::Left) {
            Some(InputAction::Rotate { dx: delta.x, dy: delta.y })
        } else if self.mouse_held(MouseButton::Right) || self.mouse_held(MouseButton::Middle) {
            Some(InputAction::Pan { dx: delta.x, dy: delta.y })
        } else {
            None
        }
    }

    pub fn scroll(&mut self, steps: f32) -> Option<InputAction> {
        if steps == 0.0 || !steps.is_finite() {
            return None;
        }
        Some(InputAction::Zoom(steps))
    }

    /// Forget held keys and buttons, e.g. when the window loses focus.
    pub fn release_all(&mut self) {
        self.keys_held.clear();
        self.mouse_held.clear();
        self.double_click.reset();
    }
}

impl Default for Input {
    fn default() -> Self {
        Self::new(1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_left_drag_rotates() {
        let now = Instant::now();
        let mut input = Input::default();
        assert_eq!(input.cursor_moved(Vec2::new(10.0, 10.0)), None);
        input.mouse_button(MouseButton::Left, true, now);
        assert!(input.mouse_held(MouseButton::Left));

        let action = input.cursor_moved(Vec2::new(15.0, 8.0));
        assert_eq!(action, Some(InputAction::Rotate { dx: 5.0, dy: -2.0 }));

        input.mouse_button(MouseButton::Left, false, now);
        assert_eq!(input.cursor_moved(Vec2::new(20.0, 8.0)), None);
    }

    #[test]
    fn test_right_and_middle_drag_pan() {
        let now = Instant::now();
        let mut input = Input::default();
        input.cursor_moved(Vec2::ZERO);
        input.mouse_button(MouseButton::Middle, true, now);
        assert_eq!(input.cursor_moved(Vec2::new(3.0, 4.0)), Some(InputAction::Pan { dx: 3.0, dy: 4.0 }));
        input.mouse_button(MouseButton::Middle, false, now);
        input.mouse_button(MouseButton::Right, true, now);
        assert_eq!(input.cursor_moved(Vec2::new(3.0, 0.0)), Some(InputAction::Pan { dx: 0.0, dy: -4.0 }));
    }

    #[test]
    fn test_double_click_toggles_fullscreen() {
        let t0 = Instant::now();
        let mut input = Input::default();
        input.cursor_moved(Vec2::new(100.0, 100.0));
        assert_eq!(input.mouse_button(MouseButton::Left, true, t0), None);
        input.mouse_button(MouseButton::Left, false, t0);
        assert_eq!(
            input.mouse_button(MouseButton::Left, true, t0 + Duration::from_millis(150)),
            Some(InputAction::ToggleFullscreen)
        );
    }

    #[test]
    fn test_arrow_keys_repeat_but_shortcuts_do_not() {
        let mut input = Input::default();
        assert_eq!(input.key(KeyCode::Left, true), Some(InputAction::PanKey(PanDirection::Left)));
        assert_eq!(input.key(KeyCode::Left, true), Some(InputAction::PanKey(PanDirection::Left)));

        assert_eq!(input.key(KeyCode::H, true), Some(InputAction::TogglePanel));
        assert_eq!(input.key(KeyCode::H, true), None);
        input.key(KeyCode::H, false);
        assert_eq!(input.key(KeyCode::H, true), Some(InputAction::TogglePanel));

        assert_eq!(input.key(KeyCode::Escape, true), Some(InputAction::ExitFullscreen));
        assert_eq!(input.key(KeyCode::Other, true), None);
    }

    #[test]
    fn test_scroll_and_release_all() {
        let mut input = Input::default();
        assert_eq!(input.scroll(1.0), Some(InputAction::Zoom(1.0)));
        assert_eq!(input.scroll(0.0), None);

        assert_eq!(input.key(KeyCode::H, true), Some(InputAction::TogglePanel));
        input.mouse_button(MouseButton::Right, true, Instant::now());
        input.release_all();
        assert!(!input.mouse_held(MouseButton::Right));

        // H is no longer held, so the next press is not a repeat.
        assert_eq!(input.key(KeyCode::H, true), Some(InputAction::TogglePanel));
    }
}

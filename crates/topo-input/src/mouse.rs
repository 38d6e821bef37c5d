//! Frame-coherent mouse state.
//!
//! [`MouseState`] accumulates winit mouse events during a frame. Movement made
//! while the left button is held is tracked separately as the orbit drag.

use glam::Vec2;
use winit::event::{ElementState, MouseButton, MouseScrollDelta};

/// Pixels of a trackpad scroll that count as one wheel line.
const PIXELS_PER_LINE: f64 = 40.0;

#[derive(Debug, Clone, Copy, Default)]
struct ButtonFrame {
    pressed: bool,
    just_pressed: bool,
    just_released: bool,
}

fn button_index(button: MouseButton) -> usize {
    match button {
        MouseButton::Left => 0,
        MouseButton::Right => 1,
        MouseButton::Middle => 2,
        _ => 3,
    }
}

/// Frame-coherent mouse state.
///
/// Forward winit events through the `on_*` methods, query during the frame,
/// then call [`clear_transients`](Self::clear_transients).
#[derive(Debug, Clone, Default)]
pub struct MouseState {
    position: Option<Vec2>,
    delta: Vec2,
    drag: Vec2,
    buttons: [ButtonFrame; 4],
    scroll: f32,
    cursor_in_window: bool,
}

impl MouseState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_cursor_moved(&mut self, x: f64, y: f64) {
        let new_pos = Vec2::new(x as f32, y as f32);
        // The first position after entering has nothing to diff against.
        if let Some(old) = self.position {
            let step = new_pos - old;
            self.delta += step;
            if self.buttons[0].pressed {
                self.drag += step;
            }
        }
        self.position = Some(new_pos);
    }

    pub fn on_button(&mut self, button: MouseButton, state: ElementState) {
        let frame = &mut self.buttons[button_index(button)];
        match state {
            ElementState::Pressed => {
                frame.pressed = true;
                frame.just_pressed = true;
            }
            ElementState::Released => {
                frame.pressed = false;
                frame.just_released = true;
            }
        }
    }

    pub fn on_scroll(&mut self, delta: MouseScrollDelta) {
        match delta {
            MouseScrollDelta::LineDelta(_x, y) => self.scroll += y,
            MouseScrollDelta::PixelDelta(pos) => self.scroll += (pos.y / PIXELS_PER_LINE) as f32,
        }
    }

    pub fn on_cursor_entered(&mut self) {
        self.cursor_in_window = true;
    }

    pub fn on_cursor_left(&mut self) {
        self.cursor_in_window = false;
        self.position = None;
    }

    /// Treat every button as released without reporting a release.
    pub fn release_buttons(&mut self) {
        self.buttons = [ButtonFrame::default(); 4];
    }

    /// Clears delta, drag, scroll and the just-pressed/released flags.
    pub fn clear_transients(&mut self) {
        self.delta = Vec2::ZERO;
        self.drag = Vec2::ZERO;
        self.scroll = 0.0;
        for b in &mut self.buttons {
            b.just_pressed = false;
            b.just_released = false;
        }
    }

    /// Last known cursor position in physical pixels.
    #[must_use]
    pub fn position(&self) -> Option<Vec2> {
        self.position
    }

    #[must_use]
    pub fn delta(&self) -> Vec2 {
        self.delta
    }

    /// Movement this frame while the left button was held.
    #[must_use]
    pub fn drag_delta(&self) -> Vec2 {
        self.drag
    }

    #[must_use]
    pub fn is_button_pressed(&self, button: MouseButton) -> bool {
        self.buttons[button_index(button)].pressed
    }

    #[must_use]
    pub fn just_button_pressed(&self, button: MouseButton) -> bool {
        self.buttons[button_index(button)].just_pressed
    }

    #[must_use]
    pub fn just_button_released(&self, button: MouseButton) -> bool {
        self.buttons[button_index(button)].just_released
    }

    /// Wheel lines this frame (positive = scroll up).
    #[must_use]
    pub fn scroll(&self) -> f32 {
        self.scroll
    }

    #[must_use]
    pub fn is_cursor_in_window(&self) -> bool {
        self.cursor_in_window
    }
}

//! Frame-coherent input for the globe viewer: mouse drag and wheel, touch
//! gestures, and keyboard parameter bindings.

pub mod bindings;
pub mod keyboard;
pub mod mouse;
pub mod touch;

pub use bindings::{ControlAction, KeyBindings};
pub use keyboard::{KeyboardState, RawKeyEvent};
pub use mouse::MouseState;
pub use touch::TouchState;

use glam::Vec2;
use winit::event::WindowEvent;

/// Everything the viewer reads from input in one frame.
#[derive(Debug, Clone, Default)]
pub struct InputState {
    pub mouse: MouseState,
    pub keyboard: KeyboardState,
    pub touch: TouchState,
}

impl InputState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Route a window event to the matching tracker. Returns `true` if the
    /// event was an input event.
    pub fn handle_window_event(&mut self, event: &WindowEvent) -> bool {
        match event {
            WindowEvent::KeyboardInput { event, .. } => self.keyboard.process_event(event),
            WindowEvent::CursorMoved { position, .. } => {
                self.mouse.on_cursor_moved(position.x, position.y)
            }
            WindowEvent::MouseInput { state, button, .. } => self.mouse.on_button(*button, *state),
            WindowEvent::MouseWheel { delta, .. } => self.mouse.on_scroll(*delta),
            WindowEvent::CursorEntered { .. } => self.mouse.on_cursor_entered(),
            WindowEvent::CursorLeft { .. } => self.mouse.on_cursor_left(),
            WindowEvent::Touch(touch) => {
                self.touch
                    .on_touch(touch.id, touch.phase, touch.location.x, touch.location.y)
            }
            WindowEvent::Focused(false) => self.release_all(),
            _ => return false,
        }
        true
    }

    /// Orbit drag in pixels this frame, from the left mouse button or a
    /// single finger.
    #[must_use]
    pub fn orbit_drag(&self) -> Vec2 {
        self.mouse.drag_delta() + self.touch.drag_delta()
    }

    /// Zoom in wheel lines this frame. Positive moves the camera closer.
    #[must_use]
    pub fn zoom_lines(&self) -> f32 {
        self.mouse.scroll()
    }

    /// Two-finger pinch ratio this frame; 1.0 when no pinch happened.
    #[must_use]
    pub fn pinch_ratio(&self) -> f32 {
        self.touch.pinch_ratio()
    }

    /// Forget held buttons and keys, e.g. when the window loses focus.
    pub fn release_all(&mut self) {
        self.mouse.release_buttons();
        self.keyboard.release_all();
        self.touch.cancel_all();
    }

    pub fn clear_transients(&mut self) {
        self.mouse.clear_transients();
        self.keyboard.clear_transients();
        self.touch.clear_transients();
    }
}

//! Frame-coherent keyboard state keyed by physical key, so bindings stay in
//! place across keyboard layouts.

use std::collections::HashSet;

use winit::event::{ElementState, KeyEvent};
use winit::keyboard::PhysicalKey;

/// The parts of a key event the tracker needs.
#[derive(Debug, Clone, Copy)]
pub struct RawKeyEvent {
    pub key: PhysicalKey,
    pub state: ElementState,
    pub repeat: bool,
}

/// Held, just-pressed and just-released keys for the current frame.
#[derive(Debug, Clone, Default)]
pub struct KeyboardState {
    pressed: HashSet<PhysicalKey>,
    just_pressed: HashSet<PhysicalKey>,
    just_released: HashSet<PhysicalKey>,
}

impl KeyboardState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn process_event(&mut self, event: &KeyEvent) {
        self.process_raw(RawKeyEvent {
            key: event.physical_key,
            state: event.state,
            repeat: event.repeat,
        });
    }

    /// Repeat events are ignored; a held key counts as one press.
    pub fn process_raw(&mut self, event: RawKeyEvent) {
        if event.repeat {
            return;
        }
        match event.state {
            ElementState::Pressed => {
                if self.pressed.insert(event.key) {
                    self.just_pressed.insert(event.key);
                }
            }
            ElementState::Released => {
                if self.pressed.remove(&event.key) {
                    self.just_released.insert(event.key);
                }
            }
        }
    }

    #[must_use]
    pub fn is_pressed(&self, key: PhysicalKey) -> bool {
        self.pressed.contains(&key)
    }

    #[must_use]
    pub fn just_pressed(&self, key: PhysicalKey) -> bool {
        self.just_pressed.contains(&key)
    }

    #[must_use]
    pub fn just_released(&self, key: PhysicalKey) -> bool {
        self.just_released.contains(&key)
    }

    /// Drop every held key, e.g. on focus loss when releases never arrive.
    pub fn release_all(&mut self) {
        self.pressed.clear();
    }

    pub fn clear_transients(&mut self) {
        self.just_pressed.clear();
        self.just_released.clear();
    }
}

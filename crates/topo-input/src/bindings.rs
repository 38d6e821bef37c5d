//! Keyboard controls standing in for the parameter panel.

use winit::keyboard::{KeyCode, PhysicalKey};

use crate::keyboard::KeyboardState;

/// Something the user can ask the viewer to do from the keyboard.
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq)]
pub enum ControlAction {
    RotationSpeedUp,
    RotationSpeedDown,
    DisplacementUp,
    DisplacementDown,
    BumpUp,
    BumpDown,
    /// Restore all parameters to their defaults.
    Reset,
    Quit,
}

impl ControlAction {
    pub const ALL: [ControlAction; 8] = [
        ControlAction::RotationSpeedUp,
        ControlAction::RotationSpeedDown,
        ControlAction::DisplacementUp,
        ControlAction::DisplacementDown,
        ControlAction::BumpUp,
        ControlAction::BumpDown,
        ControlAction::Reset,
        ControlAction::Quit,
    ];
}

/// Key to action table. One key maps to at most one action; an action can
/// have several keys.
#[derive(Debug, Clone)]
pub struct KeyBindings {
    bindings: Vec<(KeyCode, ControlAction)>,
}

impl Default for KeyBindings {
    /// Q/A rotation speed, W/S displacement, E/D bump, R reset, Escape quit.
    fn default() -> Self {
        Self {
            bindings: vec![
                (KeyCode::KeyQ, ControlAction::RotationSpeedUp),
                (KeyCode::KeyA, ControlAction::RotationSpeedDown),
                (KeyCode::KeyW, ControlAction::DisplacementUp),
                (KeyCode::KeyS, ControlAction::DisplacementDown),
                (KeyCode::KeyE, ControlAction::BumpUp),
                (KeyCode::KeyD, ControlAction::BumpDown),
                (KeyCode::KeyR, ControlAction::Reset),
                (KeyCode::Escape, ControlAction::Quit),
            ],
        }
    }
}

impl KeyBindings {
    /// Bind `key` to `action`, replacing whatever the key did before.
    pub fn bind(&mut self, key: KeyCode, action: ControlAction) {
        if let Some(entry) = self.bindings.iter_mut().find(|(k, _)| *k == key) {
            tracing::debug!(?key, old = ?entry.1, new = ?action, "rebinding key");
            entry.1 = action;
        } else {
            self.bindings.push((key, action));
        }
    }

    #[must_use]
    pub fn action_for(&self, key: PhysicalKey) -> Option<ControlAction> {
        let PhysicalKey::Code(code) = key else {
            return None;
        };
        self.bindings
            .iter()
            .find(|(k, _)| *k == code)
            .map(|(_, action)| *action)
    }

    /// Keys bound to `action`, in binding order.
    pub fn keys_for(&self, action: ControlAction) -> impl Iterator<Item = KeyCode> + '_ {
        self.bindings
            .iter()
            .filter(move |(_, a)| *a == action)
            .map(|(k, _)| *k)
    }

    /// Actions triggered by keys pressed this frame, in binding order.
    #[must_use]
    pub fn resolve(&self, keyboard: &KeyboardState) -> Vec<ControlAction> {
        self.bindings
            .iter()
            .filter(|(key, _)| keyboard.just_pressed(PhysicalKey::Code(*key)))
            .map(|(_, action)| *action)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::RawKeyEvent;
    use winit::event::ElementState;

    fn press(keyboard: &mut KeyboardState, code: KeyCode) {
        keyboard.process_raw(RawKeyEvent {
            key: PhysicalKey::Code(code),
            state: ElementState::Pressed,
            repeat: false,
        });
    }

    #[test]
    fn test_every_action_has_a_default_key() {
        let bindings = KeyBindings::default();
        for action in ControlAction::ALL {
            assert!(bindings.keys_for(action).next().is_some(), "{action:?} unbound");
        }
    }

    #[test]
    fn test_resolve_reports_just_pressed_keys() {
        let bindings = KeyBindings::default();
        let mut keyboard = KeyboardState::new();
        press(&mut keyboard, KeyCode::KeyW);
        press(&mut keyboard, KeyCode::KeyR);
        assert_eq!(
            bindings.resolve(&keyboard),
            vec![ControlAction::DisplacementUp, ControlAction::Reset]
        );

        keyboard.clear_transients();
        assert!(bindings.resolve(&keyboard).is_empty());
    }

    #[test]
    fn test_unbound_keys_resolve_to_nothing() {
        let bindings = KeyBindings::default();
        assert_eq!(bindings.action_for(PhysicalKey::Code(KeyCode::KeyZ)), None);
        assert_eq!(
            bindings.action_for(PhysicalKey::Code(KeyCode::Escape)),
            Some(ControlAction::Quit)
        );
    }

    #[test]
    fn test_rebinding_a_key_replaces_its_action() {
        let mut bindings = KeyBindings::default();
        bindings.bind(KeyCode::KeyQ, ControlAction::Quit);
        bindings.bind(KeyCode::ArrowUp, ControlAction::BumpUp);
        assert_eq!(
            bindings.action_for(PhysicalKey::Code(KeyCode::KeyQ)),
            Some(ControlAction::Quit)
        );
        let bump_keys: Vec<_> = bindings.keys_for(ControlAction::BumpUp).collect();
        assert_eq!(bump_keys, vec![KeyCode::KeyE, KeyCode::ArrowUp]);
    }
}

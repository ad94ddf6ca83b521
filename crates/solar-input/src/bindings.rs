//! Key bindings: which physical keys trigger which [`InputAction`].
//!
//! Defaults cover every command. The `input.keybindings` table of
//! `config.ron` replaces the keys of individual actions by name, e.g.
//! `{"ToggleTour": "KeyG"}`.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use solar_config::InputConfig;
use tracing::warn;
use winit::keyboard::KeyCode;

use crate::keyboard::KeyboardState;

/// Keyboard-triggered user commands.
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub enum InputAction {
    /// Skip the loading screen or enter the simulation.
    Proceed,
    ClearSelection,
    ToggleTour,
    NextStop,
    PrevStop,
    ToggleOrbits,
    ToggleLabels,
    ToggleDistanceLines,
    ToggleAutoRotate,
    AmbientDown,
    AmbientUp,
    ResetCamera,
    ToggleFps,
    ReloadConfig,
}

impl InputAction {
    /// Every action, in the order they are resolved each frame.
    pub const ALL: [InputAction; 14] = [
        InputAction::Proceed,
        InputAction::ClearSelection,
        InputAction::ToggleTour,
        InputAction::NextStop,
        InputAction::PrevStop,
        InputAction::ToggleOrbits,
        InputAction::ToggleLabels,
        InputAction::ToggleDistanceLines,
        InputAction::ToggleAutoRotate,
        InputAction::AmbientDown,
        InputAction::AmbientUp,
        InputAction::ResetCamera,
        InputAction::ToggleFps,
        InputAction::ReloadConfig,
    ];

    fn default_keys(self) -> &'static [KeyCode] {
        match self {
            InputAction::Proceed => &[KeyCode::Enter, KeyCode::Space],
            InputAction::ClearSelection => &[KeyCode::Escape],
            InputAction::ToggleTour => &[KeyCode::KeyT],
            InputAction::NextStop => &[KeyCode::ArrowRight],
            InputAction::PrevStop => &[KeyCode::ArrowLeft],
            InputAction::ToggleOrbits => &[KeyCode::KeyO],
            InputAction::ToggleLabels => &[KeyCode::KeyL],
            InputAction::ToggleDistanceLines => &[KeyCode::KeyD],
            InputAction::ToggleAutoRotate => &[KeyCode::KeyR],
            InputAction::AmbientDown => &[KeyCode::BracketLeft],
            InputAction::AmbientUp => &[KeyCode::BracketRight],
            InputAction::ResetCamera => &[KeyCode::KeyC],
            InputAction::ToggleFps => &[KeyCode::F3],
            InputAction::ReloadConfig => &[KeyCode::F5],
        }
    }
}

impl fmt::Display for InputAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

impl FromStr for InputAction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|action| action.to_string() == s)
            .ok_or_else(|| format!("unknown action: {s}"))
    }
}

/// Action -> keys table.
#[derive(Debug, Clone, PartialEq)]
pub struct KeyBindings {
    keys: HashMap<InputAction, Vec<KeyCode>>,
}

impl Default for KeyBindings {
    fn default() -> Self {
        let keys = InputAction::ALL
            .into_iter()
            .map(|action| (action, action.default_keys().to_vec()))
            .collect();
        Self { keys }
    }
}

impl KeyBindings {
    /// Defaults with the config's overrides applied. Unknown action or key
    /// names are logged and skipped.
    pub fn from_config(config: &InputConfig) -> Self {
        let mut bindings = Self::default();
        for (action_name, key_name) in &config.keybindings {
            let action = match action_name.parse::<InputAction>() {
                Ok(action) => action,
                Err(e) => {
                    warn!("Ignoring key binding: {e}");
                    continue;
                }
            };
            match key_from_name(key_name) {
                Some(key) => bindings.set_keys(action, vec![key]),
                None => warn!("Ignoring key binding for {action}: unknown key {key_name}"),
            }
        }
        bindings
    }

    /// Replace the keys bound to `action`.
    pub fn set_keys(&mut self, action: InputAction, keys: Vec<KeyCode>) {
        self.keys.insert(action, keys);
    }

    #[must_use]
    pub fn keys(&self, action: InputAction) -> &[KeyCode] {
        self.keys.get(&action).map_or(&[], Vec::as_slice)
    }

    /// Actions whose key went down this frame, in [`InputAction::ALL`] order.
    #[must_use]
    pub fn triggered(&self, keyboard: &KeyboardState) -> Vec<InputAction> {
        InputAction::ALL
            .into_iter()
            .filter(|&action| self.keys(action).iter().any(|&k| keyboard.just_pressed(k)))
            .collect()
    }

    /// Pairs of actions that share a key.
    #[must_use]
    pub fn conflicts(&self) -> Vec<(KeyCode, InputAction, InputAction)> {
        let mut owner: HashMap<KeyCode, InputAction> = HashMap::new();
        let mut conflicts = Vec::new();
        for action in InputAction::ALL {
            for &key in self.keys(action) {
                match owner.get(&key) {
                    Some(&other) if other != action => conflicts.push((key, other, action)),
                    _ => {
                        owner.insert(key, action);
                    }
                }
            }
        }
        conflicts
    }
}

/// Parse a key name as written by `KeyCode`'s `Debug` output, e.g. `"KeyT"`.
pub fn key_from_name(name: &str) -> Option<KeyCode> {
    Some(match name {
        "KeyA" => KeyCode::KeyA,
        "KeyB" => KeyCode::KeyB,
        "KeyC" => KeyCode::KeyC,
        "KeyD" => KeyCode::KeyD,
        "KeyE" => KeyCode::KeyE,
        "KeyF" => KeyCode::KeyF,
        "KeyG" => KeyCode::KeyG,
        "KeyH" => KeyCode::KeyH,
        "KeyI" => KeyCode::KeyI,
        "KeyJ" => KeyCode::KeyJ,
        "KeyK" => KeyCode::KeyK,
        "KeyL" => KeyCode::KeyL,
        "KeyM" => KeyCode::KeyM,
        "KeyN" => KeyCode::KeyN,
        "KeyO" => KeyCode::KeyO,
        "KeyP" => KeyCode::KeyP,
        "KeyQ" => KeyCode::KeyQ,
        "KeyR" => KeyCode::KeyR,
        "KeyS" => KeyCode::KeyS,
        "KeyT" => KeyCode::KeyT,
        "KeyU" => KeyCode::KeyU,
        "KeyV" => KeyCode::KeyV,
        "KeyW" => KeyCode::KeyW,
        "KeyX" => KeyCode::KeyX,
        "KeyY" => KeyCode::KeyY,
        "KeyZ" => KeyCode::KeyZ,
        "Digit0" => KeyCode::Digit0,
        "Digit1" => KeyCode::Digit1,
        "Digit2" => KeyCode::Digit2,
        "Digit3" => KeyCode::Digit3,
        "Digit4" => KeyCode::Digit4,
        "Digit5" => KeyCode::Digit5,
        "Digit6" => KeyCode::Digit6,
        "Digit7" => KeyCode::Digit7,
        "Digit8" => KeyCode::Digit8,
        "Digit9" => KeyCode::Digit9,
        "Space" => KeyCode::Space,
        "Enter" => KeyCode::Enter,
        "Escape" => KeyCode::Escape,
        "Tab" => KeyCode::Tab,
        "Backspace" => KeyCode::Backspace,
        "Minus" => KeyCode::Minus,
        "Equal" => KeyCode::Equal,
        "BracketLeft" => KeyCode::BracketLeft,
        "BracketRight" => KeyCode::BracketRight,
        "Comma" => KeyCode::Comma,
        "Period" => KeyCode::Period,
        "ArrowUp" => KeyCode::ArrowUp,
        "ArrowDown" => KeyCode::ArrowDown,
        "ArrowLeft" => KeyCode::ArrowLeft,
        "ArrowRight" => KeyCode::ArrowRight,
        "PageUp" => KeyCode::PageUp,
        "PageDown" => KeyCode::PageDown,
        "Home" => KeyCode::Home,
        "End" => KeyCode::End,
        "F1" => KeyCode::F1,
        "F2" => KeyCode::F2,
        "F3" => KeyCode::F3,
        "F4" => KeyCode::F4,
        "F5" => KeyCode::F5,
        "F6" => KeyCode::F6,
        "F7" => KeyCode::F7,
        "F8" => KeyCode::F8,
        "F9" => KeyCode::F9,
        "F10" => KeyCode::F10,
        "F11" => KeyCode::F11,
        "F12" => KeyCode::F12,
        _ => return None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keyboard::RawKeyEvent;
    use winit::event::ElementState;
    use winit::keyboard::PhysicalKey;

    fn press(kb: &mut KeyboardState, code: KeyCode) {
        kb.process_raw(RawKeyEvent {
            key: PhysicalKey::Code(code),
            state: ElementState::Pressed,
            repeat: false,
        });
    }

    #[test]
    fn test_every_action_has_a_default_key() {
        let bindings = KeyBindings::default();
        for action in InputAction::ALL {
            assert!(!bindings.keys(action).is_empty(), "{action} unbound");
        }
    }

    #[test]
    fn test_defaults_have_no_conflicts() {
        assert!(KeyBindings::default().conflicts().is_empty());
    }

    #[test]
    fn test_triggered_in_resolution_order() {
        let bindings = KeyBindings::default();
        let mut kb = KeyboardState::new();
        press(&mut kb, KeyCode::ArrowRight);
        press(&mut kb, KeyCode::KeyT);
        assert_eq!(
            bindings.triggered(&kb),
            vec![InputAction::ToggleTour, InputAction::NextStop]
        );
    }

    #[test]
    fn test_either_proceed_key_triggers() {
        let bindings = KeyBindings::default();
        let mut kb = KeyboardState::new();
        press(&mut kb, KeyCode::Space);
        assert_eq!(bindings.triggered(&kb), vec![InputAction::Proceed]);
    }

    #[test]
    fn test_config_override_replaces_keys() {
        let mut config = InputConfig::default();
        config
            .keybindings
            .insert("ToggleTour".to_string(), "KeyG".to_string());
        let bindings = KeyBindings::from_config(&config);
        assert_eq!(bindings.keys(InputAction::ToggleTour), &[KeyCode::KeyG]);
        assert_eq!(bindings.keys(InputAction::ToggleOrbits), &[KeyCode::KeyO]);
    }

    #[test]
    fn test_bad_override_names_skipped() {
        let mut config = InputConfig::default();
        config
            .keybindings
            .insert("Teleport".to_string(), "KeyG".to_string());
        config
            .keybindings
            .insert("ToggleTour".to_string(), "NotAKey".to_string());
        assert_eq!(KeyBindings::from_config(&config), KeyBindings::default());
    }

    #[test]
    fn test_conflict_detected() {
        let mut bindings = KeyBindings::default();
        bindings.set_keys(InputAction::ResetCamera, vec![KeyCode::KeyT]);
        let conflicts = bindings.conflicts();
        assert_eq!(
            conflicts,
            vec![(KeyCode::KeyT, InputAction::ToggleTour, InputAction::ResetCamera)]
        );
    }

    #[test]
    fn test_action_names_round_trip() {
        for action in InputAction::ALL {
            assert_eq!(action.to_string().parse::<InputAction>(), Ok(action));
        }
        let parsed: InputAction = ron::from_str("ToggleDistanceLines").unwrap();
        assert_eq!(parsed, InputAction::ToggleDistanceLines);
    }
}

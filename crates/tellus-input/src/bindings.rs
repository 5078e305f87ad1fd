//! Walk keybindings: which physical keys drive which [`WalkAction`].
//!
//! A key maps to at most one action; an action may have several keys.
//! Bindings persist as RON with keys written by name (`"KeyW"`), and can be
//! patched from config with action-name → key-name overrides.

use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};
use winit::keyboard::KeyCode;

/// What a bound key does while walking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WalkAction {
    MoveForward,
    MoveBack,
    MoveLeft,
    MoveRight,
    Jump,
    Exit,
}

impl WalkAction {
    pub const ALL: [WalkAction; 6] = [
        WalkAction::MoveForward,
        WalkAction::MoveBack,
        WalkAction::MoveLeft,
        WalkAction::MoveRight,
        WalkAction::Jump,
        WalkAction::Exit,
    ];
}

impl fmt::Display for WalkAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

impl FromStr for WalkAction {
    type Err = BindingsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        WalkAction::ALL
            .into_iter()
            .find(|action| action.to_string() == s)
            .ok_or_else(|| BindingsError::UnknownAction(s.to_string()))
    }
}

/// Errors from loading, saving or patching bindings.
#[derive(Debug, Error)]
pub enum BindingsError {
    #[error("failed to read bindings: {0}")]
    Read(std::io::Error),

    #[error("failed to write bindings: {0}")]
    Write(std::io::Error),

    #[error("failed to parse bindings: {0}")]
    Parse(#[from] ron::error::SpannedError),

    #[error("failed to serialize bindings: {0}")]
    Serialize(#[from] ron::Error),

    #[error("unknown key name: {0}")]
    UnknownKey(String),

    #[error("unknown walk action: {0}")]
    UnknownAction(String),
}

/// Serde helper for [`KeyCode`], which has no serde support of its own.
mod keycode_serde {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use winit::keyboard::KeyCode;

    pub fn serialize<S: Serializer>(code: &KeyCode, s: S) -> Result<S::Ok, S::Error> {
        format!("{code:?}").serialize(s)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<KeyCode, D::Error> {
        let name = String::deserialize(d)?;
        super::keycode_from_name(&name)
            .ok_or_else(|| serde::de::Error::custom(format!("unknown key: {name}")))
    }
}

/// Parses a key name as written by `KeyCode`'s `Debug` output.
///
/// Only keys that make sense for walking are recognised.
#[must_use]
pub fn keycode_from_name(name: &str) -> Option<KeyCode> {
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
        "ArrowUp" => KeyCode::ArrowUp,
        "ArrowDown" => KeyCode::ArrowDown,
        "ArrowLeft" => KeyCode::ArrowLeft,
        "ArrowRight" => KeyCode::ArrowRight,
        "Space" => KeyCode::Space,
        "Enter" => KeyCode::Enter,
        "Escape" => KeyCode::Escape,
        "Tab" => KeyCode::Tab,
        "Backspace" => KeyCode::Backspace,
        "ShiftLeft" => KeyCode::ShiftLeft,
        "ShiftRight" => KeyCode::ShiftRight,
        "ControlLeft" => KeyCode::ControlLeft,
        "ControlRight" => KeyCode::ControlRight,
        "AltLeft" => KeyCode::AltLeft,
        "AltRight" => KeyCode::AltRight,
        "Numpad0" => KeyCode::Numpad0,
        "Numpad2" => KeyCode::Numpad2,
        "Numpad4" => KeyCode::Numpad4,
        "Numpad6" => KeyCode::Numpad6,
        "Numpad8" => KeyCode::Numpad8,
        _ => return None,
    })
}

/// One key → action pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyBinding {
    #[serde(with = "keycode_serde")]
    pub key: KeyCode,
    pub action: WalkAction,
}

/// The full set of walk keybindings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WalkBindings {
    bindings: Vec<KeyBinding>,
}

impl Default for WalkBindings {
    fn default() -> Self {
        let mut bindings = Self::empty();
        for (key, action) in [
            (KeyCode::KeyW, WalkAction::MoveForward),
            (KeyCode::ArrowUp, WalkAction::MoveForward),
            (KeyCode::KeyS, WalkAction::MoveBack),
            (KeyCode::ArrowDown, WalkAction::MoveBack),
            (KeyCode::KeyA, WalkAction::MoveLeft),
            (KeyCode::ArrowLeft, WalkAction::MoveLeft),
            (KeyCode::KeyD, WalkAction::MoveRight),
            (KeyCode::ArrowRight, WalkAction::MoveRight),
            (KeyCode::Space, WalkAction::Jump),
            (KeyCode::Escape, WalkAction::Exit),
        ] {
            bindings.bind(key, action);
        }
        bindings
    }
}

impl WalkBindings {
    /// Bindings with no keys bound at all.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            bindings: Vec::new(),
        }
    }

    /// The action `key` triggers, if any.
    #[must_use]
    pub fn action_for(&self, key: KeyCode) -> Option<WalkAction> {
        self.bindings
            .iter()
            .find(|b| b.key == key)
            .map(|b| b.action)
    }

    /// All keys bound to `action`.
    pub fn keys_for(&self, action: WalkAction) -> impl Iterator<Item = KeyCode> + '_ {
        self.bindings
            .iter()
            .filter(move |b| b.action == action)
            .map(|b| b.key)
    }

    /// Binds `key` to `action`, replacing whatever `key` did before.
    pub fn bind(&mut self, key: KeyCode, action: WalkAction) {
        self.unbind(key);
        self.bindings.push(KeyBinding { key, action });
    }

    /// Removes `key`'s binding. Returns the action it had.
    pub fn unbind(&mut self, key: KeyCode) -> Option<WalkAction> {
        let index = self.bindings.iter().position(|b| b.key == key)?;
        Some(self.bindings.remove(index).action)
    }

    /// Applies action-name → key-name overrides. Each override replaces every
    /// key of that action with the named key.
    ///
    /// All names are validated before anything changes, so a bad entry leaves
    /// the bindings untouched.
    pub fn apply_overrides(
        &mut self,
        overrides: &HashMap<String, String>,
    ) -> Result<(), BindingsError> {
        let mut parsed = Vec::with_capacity(overrides.len());
        for (action_name, key_name) in overrides {
            let action: WalkAction = action_name.parse()?;
            let key = keycode_from_name(key_name)
                .ok_or_else(|| BindingsError::UnknownKey(key_name.clone()))?;
            parsed.push((action, key));
        }
        // HashMap order is unspecified; sort so overlapping overrides resolve
        // the same way every run.
        parsed.sort_by_key(|(action, _)| *action as u8);

        for (action, key) in parsed {
            self.bindings.retain(|b| b.action != action);
            self.bind(key, action);
            debug!("bound {key:?} to {action}");
        }
        Ok(())
    }

    pub fn to_ron(&self) -> Result<String, BindingsError> {
        Ok(ron::ser::to_string_pretty(
            self,
            ron::ser::PrettyConfig::default(),
        )?)
    }

    pub fn from_ron(s: &str) -> Result<Self, BindingsError> {
        Ok(ron::from_str(s)?)
    }

    /// Save the bindings to a RON file at `path`.
    pub fn save(&self, path: &Path) -> Result<(), BindingsError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(BindingsError::Write)?;
        }
        std::fs::write(path, self.to_ron()?).map_err(BindingsError::Write)
    }

    /// Load bindings from a RON file at `path`.
    pub fn try_load(path: &Path) -> Result<Self, BindingsError> {
        let contents = std::fs::read_to_string(path).map_err(BindingsError::Read)?;
        Self::from_ron(&contents)
    }

    /// Load bindings from `path`, falling back to [`WalkBindings::default`]
    /// with a warning if the file is missing or malformed.
    #[must_use]
    pub fn load(path: &Path) -> Self {
        match Self::try_load(path) {
            Ok(bindings) => bindings,
            Err(e) => {
                warn!(
                    "Could not load keybindings from {}: {e}; using defaults",
                    path.display()
                );
                Self::default()
            }
        }
    }

    /// Returns the platform config path for `bindings.ron`.
    #[must_use]
    pub fn default_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("tellus").join("bindings.ron"))
    }
}

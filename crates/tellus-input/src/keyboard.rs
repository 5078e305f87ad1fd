//! Key events as the walk controller sees them.
//!
//! Physical key codes are used throughout so that WASD movement works
//! identically regardless of the user's keyboard layout.

use winit::event::KeyEvent;
use winit::keyboard::{KeyCode, PhysicalKey};

/// Minimal description of a key event for processing.
///
/// Whether the key went down or up is carried by which handler receives it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyInput {
    /// The physical key involved.
    pub key: PhysicalKey,
    /// Whether this is an auto-repeat event.
    pub repeat: bool,
}

impl KeyInput {
    /// Adapts a winit [`KeyEvent`].
    #[must_use]
    pub fn from_winit(event: &KeyEvent) -> Self {
        Self {
            key: event.physical_key,
            repeat: event.repeat,
        }
    }

    /// A non-repeat event for `code`.
    #[must_use]
    pub fn code(code: KeyCode) -> Self {
        Self {
            key: PhysicalKey::Code(code),
            repeat: false,
        }
    }

    /// The key code, if the platform reported an identifiable key.
    #[must_use]
    pub fn key_code(&self) -> Option<KeyCode> {
        match self.key {
            PhysicalKey::Code(code) => Some(code),
            PhysicalKey::Unidentified(_) => None,
        }
    }
}

//! Exclusive cursor capture.
//!
//! Capture is negotiated, never assumed: the walker *requests* capture or its
//! release through a [`CursorCapture`], and the platform answers later with a
//! [`CaptureSignal`] that the host forwards back. The platform may also revoke
//! capture on its own (focus loss, permission change); `Revoked` is always
//! safe to deliver, whatever state the walker is in.

use tracing::debug;
use winit::window::{CursorGrabMode, Window};

/// Inbound notification about exclusive cursor capture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureSignal {
    Granted,
    Revoked,
}

impl CaptureSignal {
    /// The signal implied by a window focus change. Losing focus revokes
    /// capture; gaining it grants nothing by itself.
    #[must_use]
    pub fn from_focus(focused: bool) -> Option<Self> {
        (!focused).then_some(Self::Revoked)
    }
}

/// Outbound side of the capture protocol.
pub trait CursorCapture {
    /// Ask for exclusive capture. The answer arrives as a [`CaptureSignal`].
    fn request_capture(&mut self);

    /// Give capture back. Completion is not awaited.
    fn release_capture(&mut self);

    /// Next signal the host should forward to the walker, if any.
    fn take_signal(&mut self) -> Option<CaptureSignal>;
}

/// Capture backed by a winit window.
///
/// Grabbing tries [`CursorGrabMode::Locked`] first and falls back to
/// [`CursorGrabMode::Confined`]; a platform that supports neither answers
/// with `Revoked`.
pub struct WindowCursor<'w> {
    window: &'w Window,
    pending: Option<CaptureSignal>,
}

impl<'w> WindowCursor<'w> {
    pub fn new(window: &'w Window) -> Self {
        Self {
            window,
            pending: None,
        }
    }
}

impl CursorCapture for WindowCursor<'_> {
    fn request_capture(&mut self) {
        let grabbed = self
            .window
            .set_cursor_grab(CursorGrabMode::Locked)
            .or_else(|_| self.window.set_cursor_grab(CursorGrabMode::Confined));
        match grabbed {
            Ok(()) => {
                self.window.set_cursor_visible(false);
                self.pending = Some(CaptureSignal::Granted);
            }
            Err(e) => {
                debug!("cursor grab refused: {e}");
                self.pending = Some(CaptureSignal::Revoked);
            }
        }
    }

    fn release_capture(&mut self) {
        if let Err(e) = self.window.set_cursor_grab(CursorGrabMode::None) {
            debug!("cursor ungrab failed: {e}");
        }
        self.window.set_cursor_visible(true);
        self.pending = Some(CaptureSignal::Revoked);
    }

    fn take_signal(&mut self) -> Option<CaptureSignal> {
        self.pending.take()
    }
}

/// Windowless capture that answers requests according to a fixed policy and
/// counts them. Used by the demo and by tests.
#[derive(Debug, Clone, Default)]
pub struct HeadlessCursor {
    grants: bool,
    held: bool,
    requests: u32,
    releases: u32,
    pending: Option<CaptureSignal>,
}

impl HeadlessCursor {
    /// A cursor whose requests are granted.
    #[must_use]
    pub fn granting() -> Self {
        Self {
            grants: true,
            ..Self::default()
        }
    }

    /// A cursor whose requests are always denied.
    #[must_use]
    pub fn denying() -> Self {
        Self::default()
    }

    /// Simulates the platform taking capture away.
    pub fn revoke(&mut self) {
        self.held = false;
        self.pending = Some(CaptureSignal::Revoked);
    }

    #[must_use]
    pub fn is_held(&self) -> bool {
        self.held
    }

    #[must_use]
    pub fn requests(&self) -> u32 {
        self.requests
    }

    #[must_use]
    pub fn releases(&self) -> u32 {
        self.releases
    }
}

impl CursorCapture for HeadlessCursor {
    fn request_capture(&mut self) {
        self.requests += 1;
        self.held = self.grants;
        self.pending = Some(if self.grants {
            CaptureSignal::Granted
        } else {
            CaptureSignal::Revoked
        });
    }

    fn release_capture(&mut self) {
        self.releases += 1;
        self.held = false;
        self.pending = Some(CaptureSignal::Revoked);
    }

    fn take_signal(&mut self) -> Option<CaptureSignal> {
        self.pending.take()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_granting_cursor_answers_granted() {
        let mut cursor = HeadlessCursor::granting();
        cursor.request_capture();
        assert!(cursor.is_held());
        assert_eq!(cursor.take_signal(), Some(CaptureSignal::Granted));
        assert_eq!(cursor.take_signal(), None);
    }

    #[test]
    fn test_denying_cursor_answers_revoked() {
        let mut cursor = HeadlessCursor::denying();
        cursor.request_capture();
        assert!(!cursor.is_held());
        assert_eq!(cursor.take_signal(), Some(CaptureSignal::Revoked));
        assert_eq!(cursor.requests(), 1);
    }

    #[test]
    fn test_release_and_revoke() {
        let mut cursor = HeadlessCursor::granting();
        cursor.request_capture();
        cursor.release_capture();
        assert_eq!(cursor.take_signal(), Some(CaptureSignal::Revoked));
        assert_eq!(cursor.releases(), 1);

        cursor.request_capture();
        cursor.revoke();
        assert!(!cursor.is_held());
        assert_eq!(cursor.take_signal(), Some(CaptureSignal::Revoked));
    }

    #[test]
    fn test_focus_loss_revokes() {
        assert_eq!(CaptureSignal::from_focus(false), Some(CaptureSignal::Revoked));
        assert_eq!(CaptureSignal::from_focus(true), None);
    }
}

//! Input plumbing for surface walking.
//!
//! - [`keyboard`]: physical-key events, decoupled from winit's event struct.
//! - [`bindings`]: which keys drive which [`WalkAction`], persisted as RON.
//! - [`capture`]: the exclusive cursor capture request/grant/revoke protocol.
//! - [`platform`]: pointer vs. touch platform detection.

pub mod bindings;
pub mod capture;
pub mod keyboard;
pub mod platform;

pub use bindings::{BindingsError, KeyBinding, WalkAction, WalkBindings};
pub use capture::{CaptureSignal, CursorCapture, HeadlessCursor, WindowCursor};
pub use keyboard::KeyInput;
pub use platform::Platform;
pub use winit::event::MouseButton;
pub use winit::keyboard::{KeyCode, PhysicalKey};

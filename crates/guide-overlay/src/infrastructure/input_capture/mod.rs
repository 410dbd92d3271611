//! Global input capture infrastructure.
//!
//! On Windows, this installs low-level keyboard and mouse hooks
//! (WH_KEYBOARD_LL, WH_MOUSE_LL), each on its own dedicated Win32
//! message-loop thread so the two listeners are fully independent.  Raw
//! events are placed into `mpsc` channels and consumed by the listener
//! threads in `application::watch_input`.
//!
//! The hooks observe input globally — the walkthrough advances on clicks and
//! keystrokes aimed at *other* applications, which is the whole point of an
//! overlay tutorial.  Events are only observed, never swallowed.
//!
//! # Windows-specific constraint
//!
//! Hook callbacks must complete within ~300ms or Windows removes the hook.
//! All processing is deferred out of the callback via the channel.
//!
//! # Testability
//!
//! The [`InputSource`] trait allows unit and integration tests to inject
//! synthetic events without OS hooks; see [`mock::MockInputSource`].

use std::sync::mpsc;

pub mod mock;

#[cfg(target_os = "windows")]
pub mod windows;

/// A raw input event produced by the capture infrastructure.
///
/// Mouse movement and wheel events are filtered out at the hook: the
/// advancement engine only ever consumes presses and releases.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RawInputEvent {
    /// A key was pressed down.
    KeyDown {
        /// Windows Virtual Key code.
        vk_code: u8,
        /// Milliseconds since system start (from the hook struct).
        time_ms: u32,
    },
    /// A key was released.
    KeyUp { vk_code: u8, time_ms: u32 },
    /// A mouse button was pressed at absolute screen coordinates.
    MouseButtonDown {
        button: MouseButton,
        x: i32,
        y: i32,
        time_ms: u32,
    },
    /// A mouse button was released.
    MouseButtonUp {
        button: MouseButton,
        x: i32,
        y: i32,
        time_ms: u32,
    },
}

/// Mouse button identifier used in [`RawInputEvent`].
///
/// Any button can satisfy a click trigger; the engine does not distinguish.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
    X1,
    X2,
}

/// Error type for input capture operations.
#[derive(Debug, thiserror::Error)]
pub enum CaptureError {
    #[error("failed to install keyboard hook: {0}")]
    KeyboardHookInstallFailed(String),
    #[error("failed to install mouse hook: {0}")]
    MouseHookInstallFailed(String),
    #[error("global input capture is not supported on this platform: {0}")]
    UnsupportedPlatform(String),
}

/// Trait abstracting input event production.
///
/// The production implementations use Windows hooks; tests use
/// [`mock::MockInputSource`].
pub trait InputSource: Send {
    /// Starts the source and returns a receiver for captured events.
    fn start(&self) -> Result<mpsc::Receiver<RawInputEvent>, CaptureError>;
    /// Stops the source and releases OS resources.
    fn stop(&self);
}

/// Creates the platform's mouse and keyboard capture sources, in that order.
///
/// # Errors
///
/// Returns [`CaptureError::UnsupportedPlatform`] on platforms without a hook
/// backend.  Both listeners are mandatory: the walkthrough cannot function
/// when either is missing, so the caller treats this as fatal.
pub fn platform_listeners() -> Result<(Box<dyn InputSource>, Box<dyn InputSource>), CaptureError> {
    #[cfg(target_os = "windows")]
    {
        Ok((
            Box::new(windows::WindowsMouseCapture::new()),
            Box::new(windows::WindowsKeyboardCapture::new()),
        ))
    }

    #[cfg(not(target_os = "windows"))]
    {
        Err(CaptureError::UnsupportedPlatform(
            std::env::consts::OS.to_string(),
        ))
    }
}

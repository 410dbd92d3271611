//! Bridge between the advancement engine and the presentation surfaces.
//!
//! The engine never talks to a rendering toolkit directly; it holds trait
//! objects ([`OverlayRenderer`], [`ControlSurface`]) and the presentation
//! layer decides what those mean.  This binary ships tracing-backed
//! implementations that narrate the walkthrough in the log stream, which is
//! enough to drive the tour end to end and keeps the engine testable.
//!
//! Inbound control actions (a "Next" button, a window close) go the other
//! way through [`ControlHandle`], which owns a sender for the engine's
//! signal channel.

use tokio::sync::mpsc::UnboundedSender;
use tracing::info;

use guide_core::Step;

use crate::application::advance_step::{ControlSurface, EngineSignal, OverlayRenderer};

// ── Inbound control actions ───────────────────────────────────────────────────

/// Handle for pushing manual control actions into the engine.
///
/// Cloneable; give one to every surface that can ask the tour to move on.
#[derive(Clone)]
pub struct ControlHandle {
    signals: UnboundedSender<EngineSignal>,
}

impl ControlHandle {
    pub fn new(signals: UnboundedSender<EngineSignal>) -> Self {
        Self { signals }
    }

    /// Requests a manual advance, as from a "Next" button.
    pub fn next(&self) {
        // Send errors mean the engine has already finished; nothing to do.
        let _ = self.signals.send(EngineSignal::ManualNext);
    }

    /// Requests that the walkthrough end immediately.
    pub fn exit(&self) {
        let _ = self.signals.send(EngineSignal::Exit);
    }
}

// ── Outbound presentation surfaces ────────────────────────────────────────────

/// [`OverlayRenderer`] that narrates each step via `tracing`.
pub struct TracingOverlay;

impl OverlayRenderer for TracingOverlay {
    fn render_step(&self, index: usize, step: &Step) {
        info!(
            step = index + 1,
            highlights = step.items.len(),
            "showing step"
        );
    }
}

/// [`ControlSurface`] that reports tour position via `tracing`.
///
/// The final step is labelled FINISH instead of NEXT, matching what a
/// graphical control strip would display on its advance button.
pub struct TracingControls;

impl ControlSurface for TracingControls {
    fn refresh(&self, current: usize, total: usize) {
        let button = if current + 1 == total { "FINISH" } else { "NEXT" };
        info!(
            progress = %format!("Step {} of {}", current + 1, total),
            button,
            "controls updated"
        );
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc;

    #[test]
    fn test_control_handle_next_sends_manual_advance() {
        // Arrange
        let (tx, mut rx) = mpsc::unbounded_channel();
        let handle = ControlHandle::new(tx);

        // Act
        handle.next();

        // Assert
        assert!(matches!(rx.try_recv(), Ok(EngineSignal::ManualNext)));
    }

    #[test]
    fn test_control_handle_exit_sends_exit() {
        // Arrange
        let (tx, mut rx) = mpsc::unbounded_channel();
        let handle = ControlHandle::new(tx);

        // Act
        handle.exit();

        // Assert
        assert!(matches!(rx.try_recv(), Ok(EngineSignal::Exit)));
    }

    #[test]
    fn test_control_handle_survives_closed_channel() {
        // Arrange – receiver dropped, as after the engine finishes
        let (tx, rx) = mpsc::unbounded_channel::<EngineSignal>();
        drop(rx);
        let handle = ControlHandle::new(tx);

        // Act / Assert – must not panic
        handle.next();
        handle.exit();
    }

    #[test]
    fn test_control_handle_clones_share_the_channel() {
        // Arrange
        let (tx, mut rx) = mpsc::unbounded_channel();
        let handle = ControlHandle::new(tx);
        let other = handle.clone();

        // Act
        handle.next();
        other.exit();

        // Assert
        assert!(matches!(rx.try_recv(), Ok(EngineSignal::ManualNext)));
        assert!(matches!(rx.try_recv(), Ok(EngineSignal::Exit)));
    }
}

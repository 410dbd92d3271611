//! AdvanceStepUseCase: the step-advancement engine.
//!
//! This use case is the heart of the overlay application.  It is the single
//! owner of the walkthrough's mutable state — the current step index and the
//! keystroke buffer — and the only code that performs a step transition.
//! Everything else (the two capture threads, the control panel, Ctrl-C) can
//! only *ask* for a transition by sending an [`EngineSignal`] down one
//! channel, which the engine drains on a single control task.
//!
//! # Why serialization matters
//!
//! The mouse and keyboard listeners run on independent OS threads.  Both can
//! observe the same "current step" and both can decide, near-simultaneously,
//! that their event satisfies the step's trigger.  If either were allowed to
//! mutate the index directly the step could advance twice.  Instead each
//! sends a request tagged with the step it observed; the engine applies the
//! first one and silently drops the second because its step index is stale.
//!
//! # Architecture
//!
//! This use case depends only on traits ([`OverlayRenderer`],
//! [`ControlSurface`]) and domain types from `guide-core`.  The overlay
//! window and control panel implementations are injected at construction
//! time, making the engine fully unit-testable.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use guide_core::{matches, InputEvent, KeyStroke, Step};
use tokio::sync::mpsc::UnboundedReceiver;
use tracing::{debug, info};

use guide_core::TypedText;

/// Trait for the overlay window that draws a step's annotation items.
///
/// The production implementation owns the click-through window; tests and the
/// headless binary use logging implementations.
pub trait OverlayRenderer: Send + Sync {
    /// Redraws the overlay for the step at `index`.
    fn render_step(&self, index: usize, step: &Step);
}

/// Trait for the manual control panel (step counter, Next/Exit buttons).
///
/// `refresh` is called after every transition so the panel can show
/// "Step X of N" and relabel Next → Finish on the last step.
pub trait ControlSurface: Send + Sync {
    fn refresh(&self, current: usize, total: usize);
}

/// A message on the engine's signal channel.
///
/// Listener threads, the control panel, and the shutdown handler are the
/// producers; the engine control task is the sole consumer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineSignal {
    /// A raw input event routed to the control thread for evaluation.  All
    /// keyboard events take this path so the buffer is mutated in one place.
    Input(InputEvent),
    /// A listener already matched the trigger of `step` and requests the
    /// transition.  Dropped if `step` is no longer current.
    AdvanceRequest { step: usize },
    /// The control panel's Next button.  Follows the identical transition
    /// rule as an automatic advance.
    ManualNext,
    /// Terminate the walkthrough (Exit button, Escape, Ctrl-C).
    Exit,
}

/// Outcome of handling one signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// No state change.
    Stay,
    /// Advanced to the contained step index.
    Advanced(usize),
    /// The walkthrough is over; the run loop must end.
    Finished,
}

/// Shared read-only view of the current step index.
///
/// Listener threads load this as a snapshot when deciding whether an event
/// matches; only the engine stores to it, as part of the same transition
/// that changes what the listeners will read next.  Relaxed ordering is
/// sufficient: a stale read at worst produces an [`EngineSignal::AdvanceRequest`]
/// for an old step, which the engine drops.
#[derive(Debug, Default)]
pub struct TourProgress {
    current: AtomicUsize,
}

impl TourProgress {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the current step index.
    pub fn current(&self) -> usize {
        self.current.load(Ordering::Relaxed)
    }

    pub(crate) fn publish(&self, index: usize) {
        self.current.store(index, Ordering::Relaxed);
    }
}

/// The step-advancement engine.
pub struct AdvanceStepUseCase {
    steps: Arc<Vec<Step>>,
    progress: Arc<TourProgress>,
    typed: TypedText,
    renderer: Arc<dyn OverlayRenderer>,
    controls: Arc<dyn ControlSurface>,
}

impl AdvanceStepUseCase {
    /// Creates the engine positioned on step 0 with an empty buffer.
    ///
    /// `steps` must be non-empty; the script loader guarantees this.
    pub fn new(
        steps: Arc<Vec<Step>>,
        progress: Arc<TourProgress>,
        renderer: Arc<dyn OverlayRenderer>,
        controls: Arc<dyn ControlSurface>,
    ) -> Self {
        debug_assert!(!steps.is_empty(), "a walkthrough needs at least one step");
        Self {
            steps,
            progress,
            typed: TypedText::new(),
            renderer,
            controls,
        }
    }

    /// The current step index.
    pub fn current_step(&self) -> usize {
        self.progress.current()
    }

    /// The accumulated keystroke buffer.
    pub fn typed(&self) -> &str {
        self.typed.as_str()
    }

    /// Drains the signal channel until the walkthrough finishes.
    ///
    /// Renders the initial step before processing any signals, so the user
    /// sees step 0 even if no input ever arrives.
    pub async fn run(mut self, mut signals: UnboundedReceiver<EngineSignal>) {
        self.renderer.render_step(0, &self.steps[0]);
        self.controls.refresh(0, self.steps.len());

        while let Some(signal) = signals.recv().await {
            if self.handle_signal(signal) == Transition::Finished {
                info!("walkthrough finished");
                break;
            }
        }
    }

    /// Applies one signal.  This is the only place state transitions happen.
    pub fn handle_signal(&mut self, signal: EngineSignal) -> Transition {
        match signal {
            EngineSignal::Input(event) => self.handle_input(event),
            EngineSignal::AdvanceRequest { step } => {
                let current = self.progress.current();
                if step == current {
                    self.advance()
                } else {
                    // A listener matched against a step that has already
                    // advanced; honoring it would double-advance.
                    debug!(requested = step, current, "dropping stale advance request");
                    Transition::Stay
                }
            }
            EngineSignal::ManualNext => self.advance(),
            EngineSignal::Exit => Transition::Finished,
        }
    }

    /// Evaluates a routed raw event against the current step's trigger.
    fn handle_input(&mut self, event: InputEvent) -> Transition {
        let current = self.progress.current();
        let Some(trigger) = self.steps[current].action.as_ref() else {
            // No trigger: the step is manual-only and keys must not
            // accumulate into the buffer.
            return Transition::Stay;
        };

        let matched = match event {
            InputEvent::Key(stroke) => {
                if !trigger.wants_text() {
                    false
                } else {
                    match stroke {
                        // Backspace corrects the buffer but never itself
                        // completes a phrase.
                        KeyStroke::Backspace => {
                            self.typed.backspace();
                            false
                        }
                        KeyStroke::Char(ch) => {
                            self.typed.push(ch);
                            matches(trigger, &event, self.typed.as_str())
                        }
                        KeyStroke::Space => {
                            self.typed.push(' ');
                            matches(trigger, &event, self.typed.as_str())
                        }
                        KeyStroke::Other => false,
                    }
                }
            }
            InputEvent::Click { .. } => matches(trigger, &event, self.typed.as_str()),
        };

        if matched {
            self.advance()
        } else {
            Transition::Stay
        }
    }

    /// Performs the single transition rule shared by every advance source.
    fn advance(&mut self) -> Transition {
        // Cleared on every advance, including the terminal one, so
        // keystrokes can never leak across steps.
        self.typed.clear();

        let current = self.progress.current();
        if current + 1 >= self.steps.len() {
            return Transition::Finished;
        }

        let next = current + 1;
        self.progress.publish(next);
        self.renderer.render_step(next, &self.steps[next]);
        self.controls.refresh(next, self.steps.len());
        debug!(step = next, "advanced");
        Transition::Advanced(next)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

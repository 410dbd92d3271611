//! Listener threads: from raw captured events to engine signals.
//!
//! Two perpetual background threads consume the receivers handed out by the
//! capture infrastructure and translate raw OS events into
//! [`EngineSignal`]s:
//!
//! - The **mouse listener** can decide a click trigger entirely on its own:
//!   it snapshots the current step index from [`TourProgress`], reads that
//!   step's trigger (logically immutable for the duration of the step), and
//!   on a match sends an [`EngineSignal::AdvanceRequest`] tagged with the
//!   snapshot.  The engine drops the request if the step has moved on.
//!
//! - The **keyboard listener** cannot match on its own because phrase
//!   matching needs the keystroke buffer, which only the engine may touch.
//!   It decodes the key and forwards the press as [`EngineSignal::Input`];
//!   buffer mutation and evaluation happen on the control task.
//!
//! Neither thread ever mutates shared state.  Key and button releases are
//! dropped here so the engine only ever sees presses.

use std::sync::mpsc::Receiver;
use std::thread::{self, JoinHandle};
use std::sync::Arc;

use guide_core::{matches, InputEvent, KeyStroke, Step};
use tokio::sync::mpsc::UnboundedSender;
use tracing::debug;

use crate::application::advance_step::{EngineSignal, TourProgress};
use crate::infrastructure::input_capture::RawInputEvent;

/// VK_ESCAPE: a global Escape press ends the walkthrough.
const VK_ESCAPE: u8 = 0x1B;

/// Translates a Windows Virtual Key code into a [`KeyStroke`].
///
/// Only the keys that can participate in phrase matching are decoded:
/// letters (always lower-cased — matching is case-insensitive anyway),
/// digits on both the main row and the numpad, punctuation, space, and
/// backspace.  Punctuation uses the unshifted US-layout value of each OEM
/// key, so a target like `"v1.0"` or `"don't"` is typeable.  Everything
/// else — modifiers, function keys, arrows — maps to [`KeyStroke::Other`]
/// and never reaches the buffer.
pub fn decode_vk(vk: u8) -> KeyStroke {
    match vk {
        0x08 => KeyStroke::Backspace,
        0x20 => KeyStroke::Space,
        // Main-row digits, VK_0..=VK_9
        0x30..=0x39 => KeyStroke::Char((b'0' + (vk - 0x30)) as char),
        // Letters, VK_A..=VK_Z; +0x20 shifts ASCII uppercase to lowercase
        0x41..=0x5A => KeyStroke::Char((vk + 0x20) as char),
        // Numpad digits, VK_NUMPAD0..=VK_NUMPAD9
        0x60..=0x69 => KeyStroke::Char((b'0' + (vk - 0x60)) as char),
        // Numpad operators
        0x6A => KeyStroke::Char('*'), // VK_MULTIPLY
        0x6B => KeyStroke::Char('+'), // VK_ADD
        0x6D => KeyStroke::Char('-'), // VK_SUBTRACT
        0x6E => KeyStroke::Char('.'), // VK_DECIMAL
        0x6F => KeyStroke::Char('/'), // VK_DIVIDE
        // OEM punctuation, unshifted US layout
        0xBA => KeyStroke::Char(';'),  // VK_OEM_1
        0xBB => KeyStroke::Char('='),  // VK_OEM_PLUS
        0xBC => KeyStroke::Char(','),  // VK_OEM_COMMA
        0xBD => KeyStroke::Char('-'),  // VK_OEM_MINUS
        0xBE => KeyStroke::Char('.'),  // VK_OEM_PERIOD
        0xBF => KeyStroke::Char('/'),  // VK_OEM_2
        0xC0 => KeyStroke::Char('`'),  // VK_OEM_3
        0xDB => KeyStroke::Char('['),  // VK_OEM_4
        0xDC => KeyStroke::Char('\\'), // VK_OEM_5
        0xDD => KeyStroke::Char(']'),  // VK_OEM_6
        0xDE => KeyStroke::Char('\''), // VK_OEM_7
        _ => KeyStroke::Other,
    }
}

/// Spawns the mouse listener thread.
///
/// Runs until the capture channel closes or the engine goes away.
///
/// # Errors
///
/// Returns an error if the OS refuses to spawn the thread.
pub fn spawn_mouse_listener(
    events: Receiver<RawInputEvent>,
    steps: Arc<Vec<Step>>,
    progress: Arc<TourProgress>,
    signals: UnboundedSender<EngineSignal>,
) -> std::io::Result<JoinHandle<()>> {
    thread::Builder::new()
        .name("guide-mouse-listener".to_string())
        .spawn(move || {
            for event in events {
                // Presses only; releases never advance a step.
                let RawInputEvent::MouseButtonDown { x, y, .. } = event else {
                    continue;
                };

                let step = progress.current();
                let Some(trigger) = steps[step].action.as_ref() else {
                    continue;
                };

                // Click matching never consults the buffer, so an empty view
                // is sound here.
                if matches(trigger, &InputEvent::Click { x, y }, "") {
                    debug!(step, x, y, "click matched current trigger");
                    if signals.send(EngineSignal::AdvanceRequest { step }).is_err() {
                        break;
                    }
                }
            }
        })
}

/// Spawns the keyboard listener thread.
///
/// Forwards decoded key presses to the engine; a global Escape press is
/// translated into [`EngineSignal::Exit`].
///
/// # Errors
///
/// Returns an error if the OS refuses to spawn the thread.
pub fn spawn_keyboard_listener(
    events: Receiver<RawInputEvent>,
    signals: UnboundedSender<EngineSignal>,
) -> std::io::Result<JoinHandle<()>> {
    thread::Builder::new()
        .name("guide-keyboard-listener".to_string())
        .spawn(move || {
            for event in events {
                let RawInputEvent::KeyDown { vk_code, .. } = event else {
                    continue;
                };

                if vk_code == VK_ESCAPE {
                    let _ = signals.send(EngineSignal::Exit);
                    break;
                }

                let stroke = decode_vk(vk_code);
                if stroke == KeyStroke::Other {
                    continue;
                }
                if signals
                    .send(EngineSignal::Input(InputEvent::Key(stroke)))
                    .is_err()
                {
                    break;
                }
            }
        })
}

// ── Tests ─────────────────────────────────────────────────────────────────────

//! Windows low-level keyboard and mouse hook implementation.
//!
//! This module installs WH_MOUSE_LL and WH_KEYBOARD_LL hooks using the
//! Windows API. Each hook gets its own dedicated Win32 message-loop thread
//! so a slow consumer on one channel never delays the other hook.
//!
//! The hooks are purely observational: every event is always forwarded to
//! the next hook in the chain, so the walkthrough never interferes with the
//! applications the user is being guided through.
//!
//! # Safety
//!
//! This module uses `unsafe` code exclusively for Windows API FFI calls.
//! All `unsafe` blocks are annotated with `// SAFETY:` comments.

#![cfg(target_os = "windows")]

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Sender};
use std::sync::OnceLock;
use std::thread;

use windows::Win32::Foundation::{LPARAM, LRESULT, WPARAM};
use windows::Win32::UI::WindowsAndMessaging::{
    CallNextHookEx, DispatchMessageW, GetMessageW, SetWindowsHookExW, UnhookWindowsHookEx,
    HC_ACTION, HHOOK, KBDLLHOOKSTRUCT, MSG, MSLLHOOKSTRUCT, WH_KEYBOARD_LL, WH_MOUSE_LL,
    WM_KEYDOWN, WM_KEYUP, WM_LBUTTONDOWN, WM_LBUTTONUP, WM_MBUTTONDOWN, WM_MBUTTONUP,
    WM_RBUTTONDOWN, WM_RBUTTONUP, WM_SYSKEYDOWN, WM_SYSKEYUP, WM_XBUTTONDOWN, WM_XBUTTONUP,
    XBUTTON1,
};

use super::{CaptureError, InputSource, MouseButton, RawInputEvent};

/// Global sender used by the mouse hook callback.
/// Initialized once by [`WindowsMouseCapture::start`].
static MOUSE_SENDER: OnceLock<Sender<RawInputEvent>> = OnceLock::new();

/// Global sender used by the keyboard hook callback.
/// Initialized once by [`WindowsKeyboardCapture::start`].
static KEYBOARD_SENDER: OnceLock<Sender<RawInputEvent>> = OnceLock::new();

/// Windows low-level mouse capture service.
///
/// Installs a `WH_MOUSE_LL` hook on its own Win32 message loop thread.
pub struct WindowsMouseCapture {
    /// Set to `true` when `stop()` has been called.
    stopped: AtomicBool,
}

impl WindowsMouseCapture {
    /// Creates a new (unstarted) service instance.
    pub fn new() -> Self {
        Self {
            stopped: AtomicBool::new(false),
        }
    }
}

impl Default for WindowsMouseCapture {
    fn default() -> Self {
        Self::new()
    }
}

impl InputSource for WindowsMouseCapture {
    fn start(&self) -> Result<mpsc::Receiver<RawInputEvent>, CaptureError> {
        let (tx, rx) = mpsc::channel::<RawInputEvent>();

        // Register the global sender. This will fail if called a second time.
        MOUSE_SENDER.set(tx).map_err(|_| {
            CaptureError::MouseHookInstallFailed(
                "MOUSE_SENDER already initialized – only one mouse capture may run".to_string(),
            )
        })?;

        // Spawn the Win32 message loop thread, then block until it reports
        // whether the hook was actually installed.  Hook denial must surface
        // here so the caller can abort startup instead of running a tour
        // that silently never sees the mouse.
        let (ready_tx, ready_rx) = mpsc::channel::<Result<(), String>>();
        thread::Builder::new()
            .name("guide-mouse-hook".to_string())
            .spawn(move || run_mouse_hook_loop(ready_tx))
            .map_err(|e| CaptureError::MouseHookInstallFailed(e.to_string()))?;

        ready_rx
            .recv()
            .map_err(|_| {
                CaptureError::MouseHookInstallFailed(
                    "hook thread exited before reporting readiness".to_string(),
                )
            })?
            .map_err(CaptureError::MouseHookInstallFailed)?;

        Ok(rx)
    }

    fn stop(&self) {
        self.stopped.store(true, Ordering::SeqCst);
        // The message loop thread exits when WM_QUIT is posted at process
        // shutdown; hook handles are cleaned up in the thread itself.
    }
}

/// Windows low-level keyboard capture service.
///
/// Installs a `WH_KEYBOARD_LL` hook on its own Win32 message loop thread.
pub struct WindowsKeyboardCapture {
    stopped: AtomicBool,
}

impl WindowsKeyboardCapture {
    /// Creates a new (unstarted) service instance.
    pub fn new() -> Self {
        Self {
            stopped: AtomicBool::new(false),
        }
    }
}

impl Default for WindowsKeyboardCapture {
    fn default() -> Self {
        Self::new()
    }
}

impl InputSource for WindowsKeyboardCapture {
    fn start(&self) -> Result<mpsc::Receiver<RawInputEvent>, CaptureError> {
        let (tx, rx) = mpsc::channel::<RawInputEvent>();

        KEYBOARD_SENDER.set(tx).map_err(|_| {
            CaptureError::KeyboardHookInstallFailed(
                "KEYBOARD_SENDER already initialized – only one keyboard capture may run"
                    .to_string(),
            )
        })?;

        // Same readiness handshake as the mouse side: installation failure
        // is a startup error, not a background panic.
        let (ready_tx, ready_rx) = mpsc::channel::<Result<(), String>>();
        thread::Builder::new()
            .name("guide-keyboard-hook".to_string())
            .spawn(move || run_keyboard_hook_loop(ready_tx))
            .map_err(|e| CaptureError::KeyboardHookInstallFailed(e.to_string()))?;

        ready_rx
            .recv()
            .map_err(|_| {
                CaptureError::KeyboardHookInstallFailed(
                    "hook thread exited before reporting readiness".to_string(),
                )
            })?
            .map_err(CaptureError::KeyboardHookInstallFailed)?;

        Ok(rx)
    }

    fn stop(&self) {
        self.stopped.store(true, Ordering::SeqCst);
    }
}

/// Entry point for the dedicated mouse hook message loop thread.
///
/// Reports the hook installation result through `ready` before entering the
/// message loop; on failure the thread exits without looping.
fn run_mouse_hook_loop(ready: Sender<Result<(), String>>) {
    // SAFETY: SetWindowsHookExW requires the calling thread to have a message
    // loop; the hook is installed before entering the loop below.
    let mouse_hook: HHOOK =
        match unsafe { SetWindowsHookExW(WH_MOUSE_LL, Some(mouse_hook_proc), None, 0) } {
            Ok(hook) => hook,
            Err(e) => {
                let _ = ready.send(Err(format!("WH_MOUSE_LL installation failed: {e}")));
                return;
            }
        };
    let _ = ready.send(Ok(()));

    // Win32 message loop – blocks until WM_QUIT is posted
    let mut msg = MSG::default();
    // SAFETY: Standard Win32 GetMessage/DispatchMessage loop pattern.
    unsafe {
        while GetMessageW(&mut msg, None, 0, 0).as_bool() {
            DispatchMessageW(&msg);
        }
        UnhookWindowsHookEx(mouse_hook).ok();
    }
}

/// Entry point for the dedicated keyboard hook message loop thread.
///
/// Reports the hook installation result through `ready` before entering the
/// message loop; on failure the thread exits without looping.
fn run_keyboard_hook_loop(ready: Sender<Result<(), String>>) {
    // SAFETY: SetWindowsHookExW requires the calling thread to have a message
    // loop; the hook is installed before entering the loop below.
    let kbd_hook: HHOOK =
        match unsafe { SetWindowsHookExW(WH_KEYBOARD_LL, Some(keyboard_hook_proc), None, 0) } {
            Ok(hook) => hook,
            Err(e) => {
                let _ = ready.send(Err(format!("WH_KEYBOARD_LL installation failed: {e}")));
                return;
            }
        };
    let _ = ready.send(Ok(()));

    let mut msg = MSG::default();
    // SAFETY: Standard Win32 GetMessage/DispatchMessage loop pattern.
    unsafe {
        while GetMessageW(&mut msg, None, 0, 0).as_bool() {
            DispatchMessageW(&msg);
        }
        UnhookWindowsHookEx(kbd_hook).ok();
    }
}

/// Low-level keyboard hook callback.
///
/// # Safety
///
/// This function is called by Windows from the hook message loop thread.
/// It must return quickly (< ~300ms) to avoid hook removal by the OS.
unsafe extern "system" fn keyboard_hook_proc(
    n_code: i32,
    w_param: WPARAM,
    l_param: LPARAM,
) -> LRESULT {
    if n_code != HC_ACTION as i32 {
        // SAFETY: Must call CallNextHookEx when n_code < 0.
        return CallNextHookEx(None, n_code, w_param, l_param);
    }

    // SAFETY: l_param points to a KBDLLHOOKSTRUCT when n_code == HC_ACTION.
    let kbs = &*(l_param.0 as *const KBDLLHOOKSTRUCT);

    let vk_code = kbs.vkCode as u8;
    let time_ms = kbs.time;

    let event = match w_param.0 as u32 {
        WM_KEYDOWN | WM_SYSKEYDOWN => RawInputEvent::KeyDown { vk_code, time_ms },
        WM_KEYUP | WM_SYSKEYUP => RawInputEvent::KeyUp { vk_code, time_ms },
        _ => {
            return CallNextHookEx(None, n_code, w_param, l_param);
        }
    };

    if let Some(sender) = KEYBOARD_SENDER.get() {
        // Ignore send errors (channel closed during shutdown).
        let _ = sender.send(event);
    }

    // SAFETY: Forward the event to the next hook in the chain; the
    // walkthrough only observes input.
    CallNextHookEx(None, n_code, w_param, l_param)
}

/// Low-level mouse hook callback.
///
/// Movement and wheel messages are dropped here so the channel only carries
/// button transitions.
///
/// # Safety
///
/// Called by Windows from the hook message loop thread; must return quickly.
unsafe extern "system" fn mouse_hook_proc(
    n_code: i32,
    w_param: WPARAM,
    l_param: LPARAM,
) -> LRESULT {
    if n_code != HC_ACTION as i32 {
        // SAFETY: Must call CallNextHookEx when n_code < 0.
        return CallNextHookEx(None, n_code, w_param, l_param);
    }

    // SAFETY: l_param points to a MSLLHOOKSTRUCT when n_code == HC_ACTION.
    let mhs = &*(l_param.0 as *const MSLLHOOKSTRUCT);

    let x = mhs.pt.x;
    let y = mhs.pt.y;
    let time_ms = mhs.time;

    let event = match w_param.0 as u32 {
        WM_LBUTTONDOWN => RawInputEvent::MouseButtonDown {
            button: MouseButton::Left,
            x,
            y,
            time_ms,
        },
        WM_LBUTTONUP => RawInputEvent::MouseButtonUp {
            button: MouseButton::Left,
            x,
            y,
            time_ms,
        },
        WM_RBUTTONDOWN => RawInputEvent::MouseButtonDown {
            button: MouseButton::Right,
            x,
            y,
            time_ms,
        },
        WM_RBUTTONUP => RawInputEvent::MouseButtonUp {
            button: MouseButton::Right,
            x,
            y,
            time_ms,
        },
        WM_MBUTTONDOWN => RawInputEvent::MouseButtonDown {
            button: MouseButton::Middle,
            x,
            y,
            time_ms,
        },
        WM_MBUTTONUP => RawInputEvent::MouseButtonUp {
            button: MouseButton::Middle,
            x,
            y,
            time_ms,
        },
        WM_XBUTTONDOWN => {
            let button = if (mhs.mouseData >> 16) as u16 == XBUTTON1 {
                MouseButton::X1
            } else {
                MouseButton::X2
            };
            RawInputEvent::MouseButtonDown { button, x, y, time_ms }
        }
        WM_XBUTTONUP => {
            let button = if (mhs.mouseData >> 16) as u16 == XBUTTON1 {
                MouseButton::X1
            } else {
                MouseButton::X2
            };
            RawInputEvent::MouseButtonUp { button, x, y, time_ms }
        }
        // Moves and wheel events never influence step advancement.
        _ => {
            return CallNextHookEx(None, n_code, w_param, l_param);
        }
    };

    if let Some(sender) = MOUSE_SENDER.get() {
        let _ = sender.send(event);
    }

    // SAFETY: Forward to the next hook in the chain.
    CallNextHookEx(None, n_code, w_param, l_param)
}

// ── Tests ─────────────────────────────────────────────────────────────────────

//! Overlay Guide — entry point.
//!
//! Loads a JSON tour script, starts global mouse and keyboard capture, and
//! runs the step-advancement engine until the walkthrough finishes.
//!
//! # Usage
//!
//! ```text
//! guide-overlay <SCRIPT>
//!
//! Arguments:
//!   <SCRIPT>   Path to the JSON tour script
//! ```
//!
//! # Architecture
//!
//! ```text
//! main()
//!  └─ storage::load_script     -- parse and validate the tour
//!  └─ platform_listeners()     -- install OS input hooks
//!  └─ spawn listener threads
//!       ├─ mouse listener      -- matches click triggers, sends AdvanceRequest
//!       └─ keyboard listener   -- forwards key presses, Escape → Exit
//!  └─ AdvanceStepUseCase::run  -- single consumer of the signal channel
//! ```
//!
//! The engine is the only owner of mutable tour state; everything else
//! communicates with it over one Tokio mpsc channel.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use guide_overlay::application::advance_step::{AdvanceStepUseCase, TourProgress};
use guide_overlay::application::watch_input::{spawn_keyboard_listener, spawn_mouse_listener};
use guide_overlay::infrastructure::input_capture::platform_listeners;
use guide_overlay::infrastructure::storage;
use guide_overlay::infrastructure::ui_bridge::{ControlHandle, TracingControls, TracingOverlay};

// ── CLI argument definitions ──────────────────────────────────────────────────

/// On-screen guided walkthrough driven by real user input.
///
/// Watches global mouse and keyboard activity and advances through the steps
/// of a JSON tour script as the user performs each step's action.
#[derive(Debug, Parser)]
#[command(
    name = "guide-overlay",
    about = "Input-driven on-screen walkthrough runner",
    version
)]
struct Cli {
    /// Path to the JSON tour script.
    script: PathBuf,
}

// ── Entry point ───────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialise structured logging.  Level is overridden by `RUST_LOG`.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    // ── Load the tour ─────────────────────────────────────────────────────────
    let script = storage::load_script(&cli.script)
        .with_context(|| format!("cannot load tour script {}", cli.script.display()))?;
    info!(steps = script.len(), script = %cli.script.display(), "tour loaded");

    let steps = Arc::new(script.steps);
    let progress = Arc::new(TourProgress::new());

    // ── Input capture ─────────────────────────────────────────────────────────
    //
    // Both hooks are mandatory: without either one the walkthrough cannot
    // observe the user's actions, so installation failure is fatal.
    let (mouse_source, keyboard_source) =
        platform_listeners().context("cannot start global input capture")?;
    let mouse_rx = mouse_source
        .start()
        .context("cannot install the mouse hook")?;
    let keyboard_rx = keyboard_source
        .start()
        .context("cannot install the keyboard hook")?;

    // ── Listener threads ──────────────────────────────────────────────────────
    let (signal_tx, signal_rx) = tokio::sync::mpsc::unbounded_channel();

    spawn_mouse_listener(
        mouse_rx,
        Arc::clone(&steps),
        Arc::clone(&progress),
        signal_tx.clone(),
    )
    .context("cannot spawn the mouse listener thread")?;
    spawn_keyboard_listener(keyboard_rx, signal_tx.clone())
        .context("cannot spawn the keyboard listener thread")?;

    // ── Ctrl-C handler ────────────────────────────────────────────────────────
    let shutdown = ControlHandle::new(signal_tx);
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("shutdown signal received");
            shutdown.exit();
        }
    });

    // ── Engine ────────────────────────────────────────────────────────────────
    let engine = AdvanceStepUseCase::new(
        steps,
        progress,
        Arc::new(TracingOverlay),
        Arc::new(TracingControls),
    );
    engine.run(signal_rx).await;

    mouse_source.stop();
    keyboard_source.stop();

    info!("guide-overlay stopped");
    Ok(())
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parses_script_path() {
        // Arrange / Act
        let cli = Cli::parse_from(["guide-overlay", "demos/quickstart.json"]);

        // Assert
        assert_eq!(cli.script, PathBuf::from("demos/quickstart.json"));
    }

    #[test]
    fn test_cli_requires_script_path() {
        let result = Cli::try_parse_from(["guide-overlay"]);
        assert!(result.is_err(), "script path must be mandatory");
    }

    #[test]
    fn test_cli_rejects_extra_positional_arguments() {
        let result = Cli::try_parse_from(["guide-overlay", "a.json", "b.json"]);
        assert!(result.is_err());
    }
}

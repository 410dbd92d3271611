//! Infrastructure layer for the overlay application.
//!
//! Contains OS-facing adapters: global input capture hooks, step-script
//! storage, and the bridge to the presentation surfaces.

pub mod input_capture;
pub mod storage;
pub mod ui_bridge;

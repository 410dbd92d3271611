//! Domain entities for the overlay walkthrough.
//!
//! This module contains pure business logic with no infrastructure
//! dependencies: it can be compiled and tested on any platform without OS
//! input hooks or a display.  The outer layers (input capture, the engine,
//! the UI bridge) depend on these types; the domain never depends on them.

/// Step, trigger, and region entities — the step-script vocabulary.
pub mod step;

/// Pure trigger matching: one event against one trigger.
pub mod matcher;

/// Rolling keystroke buffer used for phrase matching.
pub mod buffer;

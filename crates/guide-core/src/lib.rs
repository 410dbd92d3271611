//! # guide-core
//!
//! Shared library for the overlay walkthrough containing the step/trigger
//! entities, the pure trigger-matching logic, and the step-script document
//! parser.
//!
//! This crate is used by the runnable overlay application (`guide-overlay`).
//! It has zero dependencies on OS APIs, UI frameworks, or input hooks.
//!
//! # Architecture overview
//!
//! A walkthrough is an ordered list of **steps**.  Each step carries a set of
//! opaque render items (drawn by the overlay window, not interpreted here)
//! and an optional **trigger**: the user action that auto-advances the step.
//! Triggers come in a fixed small vocabulary — click inside a padded screen
//! region, type a target phrase, or "any of" an ordered list of the two.
//!
//! This crate defines:
//!
//! - **`domain`** – Pure business logic with no I/O.  [`domain::matcher`]
//!   decides whether one input event satisfies a trigger; [`domain::buffer`]
//!   accumulates keystrokes for phrase matching.
//!
//! - **`script`** – The JSON step-script document format and its decoder.
//!   File access stays in the application crate; this module only turns text
//!   into typed steps.

pub mod domain;
pub mod script;

// Re-export the most-used types at the crate root so callers can write
// `guide_core::Trigger` instead of `guide_core::domain::step::Trigger`.
pub use domain::buffer::TypedText;
pub use domain::matcher::{matches, region_contains, InputEvent, KeyStroke};
pub use domain::step::{Region, Step, Trigger, DEFAULT_CLICK_PADDING};
pub use script::{parse_script, ScriptError, TourScript};

//! Application layer use cases for the overlay walkthrough.
//!
//! Use cases in this layer orchestrate domain objects to fulfil a user goal,
//! depend on abstractions (traits) rather than concrete implementations, and
//! contain no OS calls or file system access.
//!
//! # Sub-modules
//!
//! - **`advance_step`** – The step-advancement engine: the single owner of
//!   the current step index and the keystroke buffer.  It drains a signal
//!   channel and performs every state transition on one control task.  This
//!   is the most critical use case — its serialization is what prevents the
//!   two listener threads from double-advancing a step.
//!
//! - **`watch_input`** – The listener side: decodes raw captured events,
//!   evaluates click triggers against a snapshot of the current step, and
//!   produces signals for the engine.

pub mod advance_step;
pub mod watch_input;

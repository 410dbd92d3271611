//! Step-script document format.
//!
//! A walkthrough ships as one JSON document with a top-level `steps` array:
//!
//! ```json
//! {
//!   "steps": [
//!     {
//!       "items": [ { "type": "text", "params": { "position": [200, 150],
//!                                                "content": "Welcome!" } } ],
//!       "action": { "type": "click", "region": [100, 100, 200, 60] }
//!     },
//!     {
//!       "items": [],
//!       "action": { "type": "type", "text": "hello" }
//!     }
//!   ]
//! }
//! ```
//!
//! Decoding lives here so it can be tested without touching the file system;
//! the application crate's storage module handles reading from disk.
//! Malformed `action` objects degrade per the leniency rules in
//! [`crate::domain::step`]; a document with zero steps, however, is rejected
//! outright — the engine's step-index invariant needs at least one step.

use serde::Deserialize;
use thiserror::Error;

use crate::domain::step::Step;

/// Error type for step-script decoding.
#[derive(Debug, Error)]
pub enum ScriptError {
    /// The document is not valid JSON or does not fit the schema.
    #[error("failed to parse step script: {0}")]
    Parse(#[from] serde_json::Error),

    /// The document parsed but its `steps` array is empty.
    #[error("step script contains no steps")]
    NoSteps,
}

/// A decoded walkthrough: the ordered list of steps.
#[derive(Debug, Clone, Deserialize)]
pub struct TourScript {
    pub steps: Vec<Step>,
}

impl TourScript {
    /// Number of steps.  Always at least 1 for scripts produced by
    /// [`parse_script`].
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}

/// Decodes a step-script JSON document.
///
/// # Errors
///
/// Returns [`ScriptError::Parse`] for invalid JSON or a missing/mistyped
/// `steps` array, and [`ScriptError::NoSteps`] when the array is empty.
pub fn parse_script(json: &str) -> Result<TourScript, ScriptError> {
    let script: TourScript = serde_json::from_str(json)?;
    if script.steps.is_empty() {
        return Err(ScriptError::NoSteps);
    }
    Ok(script)
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::step::Trigger;

    #[test]
    fn test_parse_minimal_single_step_script() {
        // Arrange
        let json = r#"{ "steps": [ { "items": [] } ] }"#;

        // Act
        let script = parse_script(json).unwrap();

        // Assert
        assert_eq!(script.len(), 1);
        assert!(script.steps[0].action.is_none());
    }

    #[test]
    fn test_parse_script_with_all_trigger_kinds() {
        let json = r#"{
            "steps": [
                { "items": [], "action": { "type": "click", "region": [0, 0, 10, 10] } },
                { "items": [], "action": { "type": "type", "text": "ok" } },
                { "items": [], "action": { "type": "any", "options": [
                    { "type": "click", "region": [5, 5, 20, 20] },
                    { "type": "type", "text": "done" }
                ] } }
            ]
        }"#;

        let script = parse_script(json).unwrap();

        assert_eq!(script.len(), 3);
        assert!(matches!(script.steps[0].action, Some(Trigger::Click { .. })));
        assert!(matches!(script.steps[1].action, Some(Trigger::Type { .. })));
        assert!(matches!(script.steps[2].action, Some(Trigger::Any { .. })));
    }

    #[test]
    fn test_parse_rejects_invalid_json() {
        let result = parse_script("{ not json");
        assert!(matches!(result, Err(ScriptError::Parse(_))));
    }

    #[test]
    fn test_parse_rejects_missing_steps_array() {
        let result = parse_script(r#"{ "pages": [] }"#);
        assert!(matches!(result, Err(ScriptError::Parse(_))));
    }

    #[test]
    fn test_parse_rejects_empty_steps_array() {
        let result = parse_script(r#"{ "steps": [] }"#);
        assert!(matches!(result, Err(ScriptError::NoSteps)));
    }

    #[test]
    fn test_render_items_pass_through_opaquely() {
        // The engine never interprets items; arbitrary shapes must survive.
        let json = r#"{
            "steps": [
                { "items": [
                    { "type": "arrow", "params": { "start": [10, 20], "length": 80,
                                                   "direction": "down" } },
                    { "type": "rect", "params": { "position": [0, 0], "size": [5, 5] } }
                ] }
            ]
        }"#;

        let script = parse_script(json).unwrap();

        assert_eq!(script.steps[0].items.len(), 2);
        assert_eq!(script.steps[0].items[0]["type"], "arrow");
    }
}

//! Pure trigger matching.
//!
//! [`matches`] answers one question: does this single input event satisfy
//! this trigger, given the current keystroke buffer?  It has no side effects
//! and owns no state — the engine updates the buffer *before* calling it and
//! performs the actual step transition *after* it.  That split is what lets
//! listener threads evaluate triggers against a snapshot without touching
//! shared state.
//!
//! # Category segregation
//!
//! A click event is only ever tested against `Click` triggers and a key event
//! only against `Type` triggers.  Inside an `Any` combinator the options are
//! walked in declaration order and the first category-compatible option whose
//! predicate succeeds wins; evaluation short-circuits there.

use super::step::{Region, Trigger};

/// A decoded keystroke as the matcher sees it.
///
/// Anything that is neither a printable character, the space bar, nor
/// backspace arrives as [`KeyStroke::Other`] and is ignored by the engine
/// (modifiers, function keys, arrows, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyStroke {
    /// A printable character key.
    Char(char),
    /// The space bar; appends a literal space to the buffer.
    Space,
    /// Removes the last buffered character; never triggers a match itself.
    Backspace,
    /// Any other key.  Does not mutate the buffer.
    Other,
}

/// One input event, already normalized from the raw OS capture format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    /// A mouse button press at absolute screen coordinates.  Releases are
    /// filtered out before they reach the matcher.
    Click { x: i32, y: i32 },
    /// A key press.
    Key(KeyStroke),
}

/// Whether `(x, y)` lies within `region` expanded by `padding` on all sides.
///
/// All four bounds are inclusive: for region `(100, 100, 50, 50)` and padding
/// 20, the point `(80, 80)` is inside and `(79, 79)` is not.
pub fn region_contains(region: &Region, padding: i32, x: i32, y: i32) -> bool {
    region.x - padding <= x
        && x <= region.x + region.width + padding
        && region.y - padding <= y
        && y <= region.y + region.height + padding
}

/// Whether `event` satisfies `trigger` given the current buffer contents.
///
/// `typed` is the rolling keystroke buffer *after* the engine has applied the
/// event's own mutation (for key events); click evaluation ignores it, so
/// listener threads may pass an empty view.
pub fn matches(trigger: &Trigger, event: &InputEvent, typed: &str) -> bool {
    match (trigger, event) {
        (Trigger::Click { region, padding }, InputEvent::Click { x, y }) => region
            .as_ref()
            .is_some_and(|r| region_contains(r, *padding, *x, *y)),

        (Trigger::Type { text }, InputEvent::Key(_)) => ends_with_ignore_case(typed, text),

        (Trigger::Any { options }, _) => options.iter().any(|option| {
            let category_fits = match (option, event) {
                (Trigger::Click { .. }, InputEvent::Click { .. }) => true,
                (Trigger::Type { .. }, InputEvent::Key(_)) => true,
                _ => false,
            };
            category_fits && matches(option, event, typed)
        }),

        // Click trigger vs key event, type trigger vs click event,
        // unsupported trigger vs anything: no match.
        _ => false,
    }
}

/// Case-insensitive suffix match.  An empty target never matches — a bare
/// `type` action with no text is a manual-only step, not an always-firing one.
fn ends_with_ignore_case(typed: &str, target: &str) -> bool {
    !target.is_empty() && typed.to_lowercase().ends_with(&target.to_lowercase())
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::step::DEFAULT_CLICK_PADDING;

    fn click_trigger(x: i32, y: i32, w: i32, h: i32, padding: i32) -> Trigger {
        Trigger::Click {
            region: Some(Region { x, y, width: w, height: h }),
            padding,
        }
    }

    // ── Click boundaries ──────────────────────────────────────────────────────

    #[test]
    fn test_click_inside_region_matches() {
        let trigger = click_trigger(100, 100, 50, 50, DEFAULT_CLICK_PADDING);
        assert!(matches(&trigger, &InputEvent::Click { x: 125, y: 125 }, ""));
    }

    #[test]
    fn test_click_on_padded_lower_bound_matches_inclusively() {
        // region (100,100,50,50), padding 20 → lower bound is exactly (80,80)
        let trigger = click_trigger(100, 100, 50, 50, 20);
        assert!(matches(&trigger, &InputEvent::Click { x: 80, y: 80 }, ""));
    }

    #[test]
    fn test_click_one_pixel_outside_padded_lower_bound_misses() {
        let trigger = click_trigger(100, 100, 50, 50, 20);
        assert!(!matches(&trigger, &InputEvent::Click { x: 79, y: 79 }, ""));
    }

    #[test]
    fn test_click_on_padded_upper_bound_matches_inclusively() {
        // upper bound is (100+50+20, 100+50+20) = (170,170)
        let trigger = click_trigger(100, 100, 50, 50, 20);
        assert!(matches(&trigger, &InputEvent::Click { x: 170, y: 170 }, ""));
        assert!(!matches(&trigger, &InputEvent::Click { x: 171, y: 171 }, ""));
    }

    #[test]
    fn test_click_trigger_without_region_never_matches() {
        let trigger = Trigger::Click { region: None, padding: 20 };
        assert!(!matches(&trigger, &InputEvent::Click { x: 0, y: 0 }, ""));
    }

    #[test]
    fn test_click_trigger_ignores_key_events() {
        let trigger = click_trigger(0, 0, 1000, 1000, 0);
        assert!(!matches(&trigger, &InputEvent::Key(KeyStroke::Char('a')), "a"));
    }

    // ── Type matching ─────────────────────────────────────────────────────────

    #[test]
    fn test_type_suffix_match_is_case_insensitive() {
        let trigger = Trigger::Type { text: "hello".to_string() };
        let key = InputEvent::Key(KeyStroke::Char('o'));

        assert!(matches(&trigger, &key, "hello"));
        assert!(matches(&trigger, &key, "HELLO"));
        assert!(matches(&trigger, &key, "say Hello"));
    }

    #[test]
    fn test_type_requires_suffix_not_substring() {
        let trigger = Trigger::Type { text: "hello".to_string() };
        let key = InputEvent::Key(KeyStroke::Char('x'));

        assert!(!matches(&trigger, &key, "hello world"));
        assert!(!matches(&trigger, &key, "hell"));
    }

    #[test]
    fn test_type_with_empty_target_never_matches() {
        let trigger = Trigger::Type { text: String::new() };
        assert!(!matches(&trigger, &InputEvent::Key(KeyStroke::Char('a')), "a"));
    }

    #[test]
    fn test_type_trigger_ignores_click_events() {
        let trigger = Trigger::Type { text: "go".to_string() };
        assert!(!matches(&trigger, &InputEvent::Click { x: 0, y: 0 }, "go"));
    }

    // ── Any combinator ────────────────────────────────────────────────────────

    #[test]
    fn test_any_click_event_only_tests_click_options() {
        // Buffer already ends with "go", but a click event must only be
        // evaluated against the Click option.
        let trigger = Trigger::Any {
            options: vec![
                click_trigger(100, 100, 50, 50, 20),
                Trigger::Type { text: "go".to_string() },
            ],
        };

        assert!(matches(&trigger, &InputEvent::Click { x: 120, y: 120 }, "go"));
        assert!(!matches(&trigger, &InputEvent::Click { x: 0, y: 0 }, "go"));
    }

    #[test]
    fn test_any_key_event_only_tests_type_options() {
        let trigger = Trigger::Any {
            options: vec![
                click_trigger(0, 0, 5000, 5000, 20),
                Trigger::Type { text: "go".to_string() },
            ],
        };
        let key = InputEvent::Key(KeyStroke::Char('o'));

        assert!(matches(&trigger, &key, "go"));
        assert!(!matches(&trigger, &key, "stop"));
    }

    #[test]
    fn test_any_skips_unsupported_and_nested_any_options() {
        let trigger = Trigger::Any {
            options: vec![
                Trigger::Unsupported,
                Trigger::Any { options: vec![Trigger::Type { text: "go".to_string() }] },
                Trigger::Type { text: "go".to_string() },
            ],
        };

        // The nested Any must not be recursed into; only the flat Type
        // option can satisfy the key event.
        assert!(matches(&trigger, &InputEvent::Key(KeyStroke::Char('o')), "go"));

        let no_flat_type = Trigger::Any {
            options: vec![
                Trigger::Unsupported,
                Trigger::Any { options: vec![Trigger::Type { text: "go".to_string() }] },
            ],
        };
        assert!(!matches(&no_flat_type, &InputEvent::Key(KeyStroke::Char('o')), "go"));
    }

    #[test]
    fn test_any_with_no_options_never_matches() {
        let trigger = Trigger::Any { options: Vec::new() };
        assert!(!matches(&trigger, &InputEvent::Click { x: 0, y: 0 }, ""));
        assert!(!matches(&trigger, &InputEvent::Key(KeyStroke::Char('a')), "a"));
    }

    // ── Unsupported ───────────────────────────────────────────────────────────

    #[test]
    fn test_unsupported_trigger_never_matches() {
        assert!(!matches(&Trigger::Unsupported, &InputEvent::Click { x: 0, y: 0 }, ""));
        assert!(!matches(
            &Trigger::Unsupported,
            &InputEvent::Key(KeyStroke::Char('a')),
            "a"
        ));
    }

    // ── Negative coordinates ──────────────────────────────────────────────────

    #[test]
    fn test_region_with_negative_origin_still_contains_points() {
        // Multi-monitor virtual desktops can place screens at negative
        // coordinates.
        let region = Region { x: -500, y: -500, width: 100, height: 100 };
        assert!(region_contains(&region, 0, -450, -450));
        assert!(!region_contains(&region, 0, -650, -450));
    }
}

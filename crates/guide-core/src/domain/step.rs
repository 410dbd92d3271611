//! Step and trigger entities.
//!
//! A [`Step`] is one stage of the guided tour: a list of render items that
//! the overlay window draws (opaque to this crate) plus an optional
//! [`Trigger`] describing the user action that auto-advances the step.
//!
//! # Leniency
//!
//! Tutorial authors sometimes write incomplete triggers on purpose (for
//! example a `click` with no `region`) to force a manual-only step.  The
//! decoder therefore never rejects a malformed `action`: a `click` without a
//! region parses and simply never matches, an unrecognized `type` value
//! parses to [`Trigger::Unsupported`], and an action object that fails to
//! decode altogether degrades to `Unsupported` as well.  Matching code
//! treats all of these as "wait for manual advance".

use serde::{Deserialize, Deserializer};

/// Padding, in pixels, applied to click regions when the step script does not
/// specify one.  The margin makes small targets forgiving to hit.
pub const DEFAULT_CLICK_PADDING: i32 = 20;

/// Axis-aligned rectangle in absolute screen coordinates.
///
/// Serialized in the step script as a four-element array `[x, y, width,
/// height]`, matching the region syntax tutorial authors write by hand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(from = "[i32; 4]")]
pub struct Region {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl From<[i32; 4]> for Region {
    fn from([x, y, width, height]: [i32; 4]) -> Self {
        Self { x, y, width, height }
    }
}

/// The condition that auto-advances a step.
///
/// The vocabulary is deliberately small: this is a walkthrough, not an
/// automation framework.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Trigger {
    /// Advance when the user presses a mouse button inside `region` expanded
    /// by `padding` on all sides.  A missing region never matches.
    Click {
        region: Option<Region>,
        #[serde(default = "default_padding")]
        padding: i32,
    },
    /// Advance when the rolling keystroke buffer ends with `text`
    /// (case-insensitive).  An empty target never matches.
    Type {
        #[serde(default)]
        text: String,
    },
    /// Advance on the first matching option, evaluated in declaration order.
    /// Only `Click` and `Type` options are considered; anything else in the
    /// list is skipped.
    Any {
        #[serde(default, deserialize_with = "lenient_trigger_list")]
        options: Vec<Trigger>,
    },
    /// An unrecognized `type` value.  Never matches; the step advances
    /// manually only.
    #[serde(other)]
    Unsupported,
}

impl Trigger {
    /// Whether this trigger consumes keystrokes into the text buffer.
    ///
    /// Keys are ignored entirely (the buffer is not mutated) for steps whose
    /// trigger has no text component.
    pub fn wants_text(&self) -> bool {
        match self {
            Trigger::Type { .. } => true,
            Trigger::Any { options } => {
                options.iter().any(|opt| matches!(opt, Trigger::Type { .. }))
            }
            Trigger::Click { .. } | Trigger::Unsupported => false,
        }
    }
}

/// One stage of the guided tour.
#[derive(Debug, Clone, Deserialize)]
pub struct Step {
    /// Render items drawn by the overlay window.  Opaque to the engine: the
    /// drawing layer interprets them, the advancement logic never does.
    #[serde(default)]
    pub items: Vec<serde_json::Value>,

    /// The trigger that auto-advances this step, if any.  Steps without an
    /// action advance only via the control panel.
    #[serde(default, deserialize_with = "lenient_trigger")]
    pub action: Option<Trigger>,
}

fn default_padding() -> i32 {
    DEFAULT_CLICK_PADDING
}

/// Decodes an optional trigger, degrading malformed values to
/// [`Trigger::Unsupported`] instead of failing the whole script.
fn lenient_trigger<'de, D>(deserializer: D) -> Result<Option<Trigger>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(raw.map(|value| serde_json::from_value(value).unwrap_or(Trigger::Unsupported)))
}

/// Decodes an `any` option list, degrading malformed elements individually so
/// one bad option does not disable its siblings.
fn lenient_trigger_list<'de, D>(deserializer: D) -> Result<Vec<Trigger>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Vec::<serde_json::Value>::deserialize(deserializer)?;
    Ok(raw
        .into_iter()
        .map(|value| serde_json::from_value(value).unwrap_or(Trigger::Unsupported))
        .collect())
}

// ── Tests ─────────────────────────────────────────────────────────────────────

//! Rolling keystroke buffer for phrase matching.

/// Accumulated recent keystrokes.
///
/// Owned exclusively by the advancement engine and mutated only on its
/// control thread: printable keys append, backspace removes the last
/// character, and the buffer is cleared exactly once per successful advance.
#[derive(Debug, Default)]
pub struct TypedText {
    buf: String,
}

impl TypedText {
    /// Creates an empty buffer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends one character.
    pub fn push(&mut self, ch: char) {
        self.buf.push(ch);
    }

    /// Removes the last character.  No-op when the buffer is already empty.
    pub fn backspace(&mut self) {
        self.buf.pop();
    }

    /// Empties the buffer.  Called on every step advance so keystrokes from
    /// one step can never satisfy the next step's phrase.
    pub fn clear(&mut self) {
        self.buf.clear();
    }

    pub fn as_str(&self) -> &str {
        &self.buf
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

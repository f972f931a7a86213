//! Input buffer state.

/// The not-yet-submitted line.
///
/// Holds printable characters only; control characters are never stored.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct InputBuffer {
    text: String,
}

impl InputBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a character at the end of the line. Control characters are ignored.
    pub fn append(&mut self, ch: char) {
        if ch.is_control() {
            return;
        }
        self.text.push(ch);
    }

    /// Removes the last character; no-op when empty.
    pub fn delete_last(&mut self) {
        self.text.pop();
    }

    pub fn clear(&mut self) {
        self.text.clear();
    }

    /// Returns the content and leaves the buffer empty in one step.
    pub fn take(&mut self) -> String {
        std::mem::take(&mut self.text)
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Length in characters.
    pub fn len(&self) -> usize {
        self.text.chars().count()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

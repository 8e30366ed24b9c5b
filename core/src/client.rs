//! Text client seam and an in-memory implementation.
//!
//! The controller mutates the host's text field through `TextClient`: single
//! backward deletions and insertions at the caret. `TextBuffer` keeps the text
//! and caret itself and records every operation in order, which is what tests
//! and the interactive CLI need.

/// Host text field operations used by the controller.
pub trait TextClient {
    /// Insert `text` at the caret, replacing the current selection if any.
    fn insert_text(&mut self, text: &str);

    /// Delete one character before the caret.
    fn delete_backward(&mut self);
}

/// One mutation applied to a `TextBuffer`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientOp {
    Insert(String),
    DeleteBackward,
}

/// Text field simulation tracking content, caret and applied operations.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextBuffer {
    text: String,
    cursor: usize, // Byte offset, not char offset
    ops: Vec<ClientOp>,
}

impl TextBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Buffer pre-filled with `text`, caret at the end.
    pub fn with_text(text: &str) -> Self {
        Self {
            text: text.to_string(),
            cursor: text.len(),
            ops: Vec::new(),
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Caret position (byte offset).
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Operations applied so far, oldest first.
    pub fn ops(&self) -> &[ClientOp] {
        &self.ops
    }

    /// Forget recorded operations, keeping the text.
    pub fn take_ops(&mut self) -> Vec<ClientOp> {
        std::mem::take(&mut self.ops)
    }

    pub fn clear(&mut self) {
        self.text.clear();
        self.cursor = 0;
        self.ops.clear();
    }

    /// Set the caret (must be at a character boundary).
    pub fn set_cursor(&mut self, pos: usize) -> bool {
        if pos <= self.text.len() && self.text.is_char_boundary(pos) {
            self.cursor = pos;
            true
        } else {
            false
        }
    }
}

impl TextClient for TextBuffer {
    fn insert_text(&mut self, text: &str) {
        self.text.insert_str(self.cursor, text);
        self.cursor += text.len();
        self.ops.push(ClientOp::Insert(text.to_string()));
    }

    fn delete_backward(&mut self) {
        self.ops.push(ClientOp::DeleteBackward);
        if self.cursor == 0 {
            return;
        }

        // Find the previous character boundary
        let mut prev = self.cursor;
        while prev > 0 {
            prev -= 1;
            if self.text.is_char_boundary(prev) {
                break;
            }
        }

        self.text.remove(prev);
        self.cursor = prev;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_and_delete() {
        let mut buf = TextBuffer::new();
        buf.insert_text("hoa");
        buf.delete_backward();
        buf.insert_text("à");
        assert_eq!(buf.text(), "hoà");
        assert_eq!(buf.cursor(), "hoà".len());
        assert_eq!(
            buf.ops(),
            &[
                ClientOp::Insert("hoa".into()),
                ClientOp::DeleteBackward,
                ClientOp::Insert("à".into())
            ]
        );
    }

    #[test]
    fn test_delete_multibyte() {
        let mut buf = TextBuffer::with_text("việt");
        buf.delete_backward();
        buf.delete_backward();
        assert_eq!(buf.text(), "vi");
    }

    #[test]
    fn test_delete_at_start_is_recorded_but_noop() {
        let mut buf = TextBuffer::new();
        buf.delete_backward();
        assert_eq!(buf.text(), "");
        assert_eq!(buf.ops(), &[ClientOp::DeleteBackward]);
    }

    #[test]
    fn test_insert_mid_text() {
        let mut buf = TextBuffer::with_text("ab");
        assert!(buf.set_cursor(1));
        buf.insert_text("X");
        assert_eq!(buf.text(), "aXb");
        assert!(!TextBuffer::with_text("ệ").clone().set_cursor(1));
    }
}

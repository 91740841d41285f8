//! In-progress input line with a cursor.
//!
//! Input is kept as raw bytes. Cursor moves and deletion step over a whole
//! UTF-8 sequence, so a multi-byte character counts as one column.

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LineBuffer {
    content: Vec<u8>,
    cursor: usize,
}

impl LineBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn content(&self) -> &[u8] {
        &self.content
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn len(&self) -> usize {
        self.content.len()
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }

    /// Bytes to the right of the cursor.
    pub fn tail(&self) -> &[u8] {
        &self.content[self.cursor..]
    }

    /// Splice `text` in at the cursor and move the cursor past it.
    pub fn insert(&mut self, text: &[u8]) {
        let tail = self.content.split_off(self.cursor);
        self.content.extend_from_slice(text);
        self.content.extend_from_slice(&tail);
        self.cursor += text.len();
    }

    /// Remove the character before the cursor. Returns false at the start of
    /// the line.
    pub fn delete_before(&mut self) -> bool {
        if self.cursor == 0 {
            return false;
        }
        let start = self.char_start_before(self.cursor);
        self.content.drain(start..self.cursor);
        self.cursor = start;
        true
    }

    pub fn move_left(&mut self) -> bool {
        if self.cursor == 0 {
            return false;
        }
        self.cursor = self.char_start_before(self.cursor);
        true
    }

    pub fn move_right(&mut self) -> bool {
        if self.cursor >= self.content.len() {
            return false;
        }
        let mut end = self.cursor + 1;
        while end < self.content.len() && is_continuation(self.content[end]) {
            end += 1;
        }
        self.cursor = end;
        true
    }

    /// `pos` must be > 0.
    fn char_start_before(&self, pos: usize) -> usize {
        let mut start = pos - 1;
        while start > 0 && is_continuation(self.content[start]) {
            start -= 1;
        }
        start
    }

    pub fn clear(&mut self) {
        self.content.clear();
        self.cursor = 0;
    }

    /// The submitted line. Invalid UTF-8 is replaced rather than rejected.
    pub fn to_line(&self) -> String {
        String::from_utf8_lossy(&self.content).into_owned()
    }
}

fn is_continuation(byte: u8) -> bool {
    byte & 0xC0 == 0x80
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_at_end() {
        let mut buffer = LineBuffer::new();
        buffer.insert(b"hello");
        assert_eq!(buffer.content(), b"hello");
        assert_eq!(buffer.cursor(), 5);
        assert!(buffer.tail().is_empty());
    }

    #[test]
    fn test_insert_in_middle() {
        let mut buffer = LineBuffer::new();
        buffer.insert(b"hllo");
        for _ in 0..3 {
            assert!(buffer.move_left());
        }
        buffer.insert(b"e");
        assert_eq!(buffer.to_line(), "hello");
        assert_eq!(buffer.cursor(), 2);
        assert_eq!(buffer.tail(), b"llo");
    }

    #[test]
    fn test_delete_before() {
        let mut buffer = LineBuffer::new();
        buffer.insert(b"abc");
        buffer.move_left();
        assert!(buffer.delete_before());
        assert_eq!(buffer.content(), b"ac");
        assert_eq!(buffer.cursor(), 1);
    }

    #[test]
    fn test_delete_at_start_is_noop() {
        let mut buffer = LineBuffer::new();
        assert!(!buffer.delete_before());

        buffer.insert(b"ab");
        buffer.move_left();
        buffer.move_left();
        assert!(!buffer.delete_before());
        assert_eq!(buffer.content(), b"ab");
        assert_eq!(buffer.cursor(), 0);
    }

    #[test]
    fn test_moves_are_bounded() {
        let mut buffer = LineBuffer::new();
        assert!(!buffer.move_left());
        assert!(!buffer.move_right());

        buffer.insert(b"x");
        assert!(!buffer.move_right());
        assert!(buffer.move_left());
        assert!(!buffer.move_left());
        assert!(buffer.move_right());
        assert_eq!(buffer.cursor(), 1);
    }

    #[test]
    fn test_cursor_stays_in_bounds() {
        let mut buffer = LineBuffer::new();
        let ops = b"ilrdilldrrrdddil";
        for &op in ops {
            match op {
                b'i' => buffer.insert(b"xy"),
                b'l' => {
                    buffer.move_left();
                }
                b'r' => {
                    buffer.move_right();
                }
                _ => {
                    buffer.delete_before();
                }
            }
            assert!(buffer.cursor() <= buffer.len());
        }
    }

    #[test]
    fn test_clear() {
        let mut buffer = LineBuffer::new();
        buffer.insert(b"abc");
        buffer.clear();
        assert!(buffer.is_empty());
        assert_eq!(buffer.cursor(), 0);
    }

    #[test]
    fn test_to_line_is_lossy() {
        let mut buffer = LineBuffer::new();
        buffer.insert("é".as_bytes());
        assert_eq!(buffer.to_line(), "é");

        buffer.delete_before();
        assert_eq!(buffer.to_line(), "\u{fffd}");
    }

    #[test]
    fn test_multibyte_character_is_one_step() {
        let mut buffer = LineBuffer::new();
        buffer.insert("aéb".as_bytes());
        assert_eq!(buffer.len(), 4);

        assert!(buffer.move_left());
        assert_eq!(buffer.cursor(), 3);
        assert!(buffer.move_left());
        assert_eq!(buffer.cursor(), 1);
        assert!(buffer.move_right());
        assert_eq!(buffer.cursor(), 3);

        assert!(buffer.delete_before());
        assert_eq!(buffer.content(), b"ab");
        assert_eq!(buffer.cursor(), 1);
    }

    #[test]
    fn test_stray_continuation_bytes_stop_at_line_start() {
        let mut buffer = LineBuffer::new();
        buffer.insert(&[0x80, 0x80]);
        assert!(buffer.move_left());
        assert_eq!(buffer.cursor(), 0);
        assert!(buffer.move_right());
        assert_eq!(buffer.cursor(), 2);
        assert!(buffer.delete_before());
        assert!(buffer.is_empty());
    }
}

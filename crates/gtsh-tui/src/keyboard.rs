//! Raw terminal bytes to typed keyboard input.
//!
//! Each read chunk is split into byte groups: an escape sequence, a UTF-8
//! multi-byte character, or a single byte. Only single-byte groups can map to
//! an event; every other group is consumed and dropped so unmapped keys never
//! reach the input buffer.

const ESC: u8 = 0x1b;

/// Upper bound on an escape sequence carried over between reads.
const MAX_PENDING: usize = 64;

/// Non-printable control keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyEvent {
    /// CR or LF.
    Enter,
    /// DEL (127).
    Backspace,
    /// Ctrl+U (21): clear the line.
    CtrlU,
    /// Ctrl+C (3) in raw mode.
    Interrupt,
    /// Ctrl+D (4).
    Eof,
}

/// A single printable character.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CharInput {
    pub ch: char,
}

impl CharInput {
    pub fn new(ch: char) -> Self {
        Self { ch }
    }
}

/// One decoded unit of keyboard input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyboardInput {
    Key(KeyEvent),
    Char(CharInput),
}

impl From<KeyEvent> for KeyboardInput {
    fn from(key: KeyEvent) -> Self {
        KeyboardInput::Key(key)
    }
}

impl From<CharInput> for KeyboardInput {
    fn from(ch: CharInput) -> Self {
        KeyboardInput::Char(ch)
    }
}

/// Maps a single-byte group to an input, or `None` when unmapped.
pub fn decode_byte(byte: u8) -> Option<KeyboardInput> {
    match byte {
        32..=126 => Some(CharInput::new(char::from(byte)).into()),
        127 => Some(KeyEvent::Backspace.into()),
        21 => Some(KeyEvent::CtrlU.into()),
        13 | 10 => Some(KeyEvent::Enter.into()),
        3 => Some(KeyEvent::Interrupt.into()),
        4 => Some(KeyEvent::Eof.into()),
        _ => None,
    }
}

#[derive(Debug, PartialEq, Eq)]
enum Group {
    /// A complete group of this many bytes.
    Complete(usize),
    /// The remaining bytes start a group that continues in the next read.
    Incomplete,
}

/// Length of the byte group at the start of `bytes` (non-empty).
fn group_at(bytes: &[u8]) -> Group {
    match bytes[0] {
        ESC => escape_group(bytes),
        0xC0..=0xF7 => utf8_group(bytes),
        _ => Group::Complete(1),
    }
}

fn escape_group(bytes: &[u8]) -> Group {
    match bytes.get(1) {
        // A lone ESC at the end of a read is the Escape key itself.
        None | Some(&ESC) => Group::Complete(1),
        Some(b'[') => {
            for (i, &b) in bytes.iter().enumerate().skip(2) {
                match b {
                    // Parameter and intermediate bytes.
                    0x20..=0x3f => {}
                    // Final byte.
                    0x40..=0x7e => return Group::Complete(i + 1),
                    // Malformed: end the group before the stray byte.
                    _ => return Group::Complete(i),
                }
            }
            Group::Incomplete
        }
        Some(b'O') => {
            if bytes.len() >= 3 {
                Group::Complete(3)
            } else {
                Group::Incomplete
            }
        }
        // Alt+key.
        Some(_) => Group::Complete(2),
    }
}

fn utf8_group(bytes: &[u8]) -> Group {
    let expected = match bytes[0] {
        0xC0..=0xDF => 2,
        0xE0..=0xEF => 3,
        _ => 4,
    };
    let mut len = 1;
    while len < expected {
        match bytes.get(len) {
            Some(0x80..=0xBF) => len += 1,
            Some(_) => return Group::Complete(len),
            None => return Group::Incomplete,
        }
    }
    Group::Complete(len)
}

/// Stateful decoder for a terminal byte stream.
///
/// The only state carried between calls is an escape sequence or UTF-8
/// character split across two reads.
#[derive(Debug, Default)]
pub struct KeyDecoder {
    pending: Vec<u8>,
}

impl KeyDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decodes one read chunk, in byte order.
    pub fn decode(&mut self, chunk: &[u8]) -> Vec<KeyboardInput> {
        let joined;
        let bytes: &[u8] = if self.pending.is_empty() {
            chunk
        } else {
            self.pending.extend_from_slice(chunk);
            joined = std::mem::take(&mut self.pending);
            &joined
        };

        let mut inputs = Vec::new();
        let mut pos = 0;
        while pos < bytes.len() {
            let rest = &bytes[pos..];
            let len = match group_at(rest) {
                Group::Complete(len) => len,
                Group::Incomplete if rest.len() < MAX_PENDING => {
                    self.pending.extend_from_slice(rest);
                    break;
                }
                Group::Incomplete => {
                    tracing::debug!(len = rest.len(), "dropping oversized escape sequence");
                    rest.len()
                }
            };
            if len == 1 {
                if let Some(input) = decode_byte(rest[0]) {
                    inputs.push(input);
                }
            } else {
                tracing::trace!(len, "ignored multi-byte input group");
            }
            pos += len;
        }
        inputs
    }

    /// True when part of a sequence is waiting for the next read.
    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chars(text: &str) -> Vec<KeyboardInput> {
        text.chars().map(|c| CharInput::new(c).into()).collect()
    }

    #[test]
    fn test_printable_ascii_range() {
        assert_eq!(decode_byte(b' '), Some(CharInput::new(' ').into()));
        assert_eq!(decode_byte(b'~'), Some(CharInput::new('~').into()));
        assert_eq!(decode_byte(b'a'), Some(CharInput::new('a').into()));
        assert_eq!(decode_byte(31), None);
    }

    #[test]
    fn test_control_bytes() {
        assert_eq!(decode_byte(127), Some(KeyEvent::Backspace.into()));
        assert_eq!(decode_byte(21), Some(KeyEvent::CtrlU.into()));
        assert_eq!(decode_byte(13), Some(KeyEvent::Enter.into()));
        assert_eq!(decode_byte(10), Some(KeyEvent::Enter.into()));
        assert_eq!(decode_byte(3), Some(KeyEvent::Interrupt.into()));
        assert_eq!(decode_byte(4), Some(KeyEvent::Eof.into()));
    }

    #[test]
    fn test_unmapped_control_bytes_are_dropped() {
        for byte in [0u8, 1, 7, 8, 9, 11, 12, 26, 0x80, 0xff] {
            assert_eq!(decode_byte(byte), None, "byte {byte}");
        }
    }

    #[test]
    fn test_decode_keeps_byte_order() {
        let mut decoder = KeyDecoder::new();
        let mut expected = chars("hi");
        expected.push(KeyEvent::Backspace.into());
        expected.push(KeyEvent::Enter.into());

        assert_eq!(decoder.decode(b"hi\x7f\r"), expected);
    }

    #[test]
    fn test_arrow_keys_do_not_leak_into_text() {
        let mut decoder = KeyDecoder::new();
        assert_eq!(decoder.decode(b"a\x1b[Ab\x1bOBc"), chars("abc"));
        assert!(!decoder.has_pending());
    }

    #[test]
    fn test_csi_with_parameters_is_one_group() {
        let mut decoder = KeyDecoder::new();
        // Shift+Right, then Delete.
        assert_eq!(decoder.decode(b"\x1b[1;2Cx\x1b[3~"), chars("x"));
    }

    #[test]
    fn test_escape_sequence_split_across_reads() {
        let mut decoder = KeyDecoder::new();
        assert_eq!(decoder.decode(b"x\x1b[1;"), chars("x"));
        assert!(decoder.has_pending());
        assert_eq!(decoder.decode(b"5Dy"), chars("y"));
        assert!(!decoder.has_pending());
    }

    #[test]
    fn test_lone_escape_and_alt_keys_are_dropped() {
        let mut decoder = KeyDecoder::new();
        assert_eq!(decoder.decode(b"\x1b"), vec![]);
        assert!(!decoder.has_pending());
        assert_eq!(decoder.decode(b"\x1bxy"), chars("y"));
    }

    #[test]
    fn test_utf8_characters_are_dropped_whole() {
        let mut decoder = KeyDecoder::new();
        assert_eq!(decoder.decode("aéb€c".as_bytes()), chars("abc"));
    }

    #[test]
    fn test_utf8_split_across_reads() {
        let mut decoder = KeyDecoder::new();
        let bytes = "é".as_bytes();
        assert_eq!(decoder.decode(&bytes[..1]), vec![]);
        assert!(decoder.has_pending());
        assert_eq!(decoder.decode(&[bytes[1], b'z']), chars("z"));
    }

    #[test]
    fn test_unterminated_sequence_is_bounded() {
        let mut decoder = KeyDecoder::new();
        let mut junk = b"\x1b[".to_vec();
        junk.extend(std::iter::repeat_n(b'1', MAX_PENDING));
        assert_eq!(decoder.decode(&junk), vec![]);
        assert!(!decoder.has_pending());
        assert_eq!(decoder.decode(b"q"), chars("q"));
    }
}

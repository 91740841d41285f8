//! State machine decoding raw input bytes into editing intents.
//!
//! The decoder has two states. In `Normal` every byte is looked up in the
//! control table; printable bytes become literal inserts. `ESC` switches to
//! `InEscape`, where bytes are accumulated until a CSI final byte (other than
//! `[`) arrives. The four arrow keys are recognized; any other sequence is
//! inserted literally as `^` followed by the accumulated bytes, with control
//! bytes in caret notation.

use crate::control::ControlCode;

/// Longest escape sequence accumulated before it is flushed as unrecognized.
const MAX_SEQUENCE_LEN: usize = 32;

/// Editing action produced by the decoder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    Insert(Vec<u8>),
    Backspace,
    Enter,
    Abort,
    EndOfInput,
    Autocomplete,
    Suspend,
    CursorLeft,
    CursorRight,
    HistoryBack,
    HistoryForward,
}

/// Recognized CSI sequences (the bytes after `ESC`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EscapeSequence {
    Up,
    Down,
    Right,
    Left,
}

impl EscapeSequence {
    pub fn from_bytes(sequence: &[u8]) -> Option<EscapeSequence> {
        match sequence {
            b"[A" => Some(EscapeSequence::Up),
            b"[B" => Some(EscapeSequence::Down),
            b"[C" => Some(EscapeSequence::Right),
            b"[D" => Some(EscapeSequence::Left),
            _ => None,
        }
    }

    pub fn intent(self) -> Intent {
        match self {
            EscapeSequence::Up => Intent::HistoryBack,
            EscapeSequence::Down => Intent::HistoryForward,
            EscapeSequence::Right => Intent::CursorRight,
            EscapeSequence::Left => Intent::CursorLeft,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecoderState {
    /// Plain input and single-byte control codes
    Normal,
    /// Collecting an escape sequence that began with ESC (0x1B)
    InEscape,
}

#[derive(Debug, Clone)]
pub struct EscapeDecoder {
    state: DecoderState,
    sequence: Vec<u8>,
    suspend_enabled: bool,
}

impl Default for EscapeDecoder {
    fn default() -> Self {
        Self::new(false)
    }
}

impl EscapeDecoder {
    pub fn new(suspend_enabled: bool) -> Self {
        Self {
            state: DecoderState::Normal,
            sequence: Vec::new(),
            suspend_enabled,
        }
    }

    pub fn state(&self) -> DecoderState {
        self.state
    }

    /// Feed one byte; returns the intent it completes, if any.
    pub fn feed(&mut self, byte: u8) -> Option<Intent> {
        match self.state {
            DecoderState::Normal => self.handle_normal_byte(byte),
            DecoderState::InEscape => self.handle_escape_byte(byte),
        }
    }

    /// Drop any partial sequence and return to `Normal`.
    pub fn reset(&mut self) {
        self.state = DecoderState::Normal;
        self.sequence.clear();
    }

    fn handle_normal_byte(&mut self, byte: u8) -> Option<Intent> {
        let code = match ControlCode::lookup(byte, self.suspend_enabled) {
            Some(code) => code,
            None => return Some(Intent::Insert(vec![byte])),
        };
        match code {
            ControlCode::Abort => Some(Intent::Abort),
            ControlCode::EndOfInput => Some(Intent::EndOfInput),
            ControlCode::Backspace => Some(Intent::Backspace),
            ControlCode::Autocomplete => Some(Intent::Autocomplete),
            ControlCode::Enter => Some(Intent::Enter),
            ControlCode::Suspend => Some(Intent::Suspend),
            ControlCode::EscapeStart => {
                self.state = DecoderState::InEscape;
                self.sequence.clear();
                None
            }
            ControlCode::Ignore => None,
        }
    }

    fn handle_escape_byte(&mut self, byte: u8) -> Option<Intent> {
        self.sequence.push(byte);

        if byte != b'[' && is_csi_final_byte(byte) {
            return Some(self.finish_sequence());
        }
        if self.sequence.len() >= MAX_SEQUENCE_LEN {
            log::debug!("escape sequence exceeded {MAX_SEQUENCE_LEN} bytes, flushing");
            return Some(self.unrecognized());
        }
        None
    }

    fn finish_sequence(&mut self) -> Intent {
        match EscapeSequence::from_bytes(&self.sequence) {
            Some(sequence) => {
                self.reset();
                sequence.intent()
            }
            None => self.unrecognized(),
        }
    }

    fn unrecognized(&mut self) -> Intent {
        let mut literal = Vec::with_capacity(self.sequence.len() + 1);
        literal.push(b'^');
        // control bytes are shown in caret notation; echoed raw, the terminal
        // would execute them
        for byte in self.sequence.drain(..) {
            match byte {
                0x00..=0x1f => literal.extend_from_slice(&[b'^', byte + 0x40]),
                0x7f => literal.extend_from_slice(b"^?"),
                _ => literal.push(byte),
            }
        }
        log::trace!("unrecognized escape sequence {literal:?}");
        self.reset();
        Intent::Insert(literal)
    }
}

/// CSI final bytes are 0x40..=0x7E.
fn is_csi_final_byte(byte: u8) -> bool {
    matches!(byte, b'@'..=b'~')
}

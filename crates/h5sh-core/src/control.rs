//! Control-code table mapping raw input bytes to editing intents.
//!
//! Only bytes 0x00..=0x1F and DEL (0x7F) are control codes. Everything else is
//! literal input and is reported as `None` by [`ControlCode::lookup`].

/// End of text (Ctrl+C)
pub const ETX: u8 = 3;
/// End of transmission (Ctrl+D)
pub const EOT: u8 = 4;
/// Backspace (Ctrl+H)
pub const BS: u8 = 8;
/// Horizontal tab
pub const TAB: u8 = 9;
/// Line feed
pub const LF: u8 = 10;
/// Vertical tab
pub const VT: u8 = 11;
/// Form feed
pub const FF: u8 = 12;
/// Carriage return
pub const CR: u8 = 13;
/// Substitute (Ctrl+Z)
pub const SUB: u8 = 26;
/// Starts an escape sequence
pub const ESC: u8 = 27;
/// Most terminals send this for the backspace key
pub const DEL: u8 = 127;

/// Semantic meaning of a control byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ControlCode {
    Abort,
    EndOfInput,
    Backspace,
    Autocomplete,
    Enter,
    EscapeStart,
    Suspend,
    Ignore,
}

impl ControlCode {
    /// Look up `byte` in the control table.
    ///
    /// `Suspend` is only produced when the host can suspend the process;
    /// otherwise Ctrl+Z is ignored like any other unbound control code.
    pub fn lookup(byte: u8, suspend_enabled: bool) -> Option<ControlCode> {
        match byte {
            ETX => Some(ControlCode::Abort),
            EOT => Some(ControlCode::EndOfInput),
            BS | DEL => Some(ControlCode::Backspace),
            TAB => Some(ControlCode::Autocomplete),
            LF | VT | FF | CR => Some(ControlCode::Enter),
            ESC => Some(ControlCode::EscapeStart),
            SUB if suspend_enabled => Some(ControlCode::Suspend),
            0x00..=0x1f => Some(ControlCode::Ignore),
            _ => None,
        }
    }
}

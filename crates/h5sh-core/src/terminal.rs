//! Terminal capability interface used by the shell.
//!
//! The shell only ever talks to a `dyn Terminal`. Which backend sits behind it
//! is decided once at start-up (see `h5sh_io::create_terminal`).

use crate::error::ConsoleResult;
use crate::history::History;

/// Returned by `get_input` when the user ends input on an empty line.
pub const EXIT_SENTINEL: &str = "exit";

/// Colours for output. Values are ANSI SGR foreground codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Colour {
    Black,
    Red,
    Green,
    Yellow,
    Blue,
    Purple,
    Cyan,
    White,
    BrightBlack,
    BrightRed,
    BrightGreen,
    BrightYellow,
    BrightBlue,
    BrightPurple,
    BrightCyan,
    BrightWhite,
}

impl Colour {
    pub fn code(self) -> u8 {
        match self {
            Colour::Black => 30,
            Colour::Red => 31,
            Colour::Green => 32,
            Colour::Yellow => 33,
            Colour::Blue => 34,
            Colour::Purple => 35,
            Colour::Cyan => 36,
            Colour::White => 37,
            Colour::BrightBlack => 90,
            Colour::BrightRed => 91,
            Colour::BrightGreen => 92,
            Colour::BrightYellow => 93,
            Colour::BrightBlue => 94,
            Colour::BrightPurple => 95,
            Colour::BrightCyan => 96,
            Colour::BrightWhite => 97,
        }
    }
}

/// Wrap `text` in an SGR colour sequence followed by a reset.
pub fn colour_wrap(text: &str, colour: Colour) -> String {
    format!("\x1b[{}m{text}\x1b[0m", colour.code())
}

/// Backend implementation type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TerminalKind {
    /// Raw-mode line editor with cursor keys and history navigation
    Vt100,
    /// Host line-buffered input; no cursor handling, no colour
    Fallback,
}

impl std::fmt::Display for TerminalKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TerminalKind::Vt100 => write!(f, "VT100"),
            TerminalKind::Fallback => write!(f, "fallback"),
        }
    }
}

pub trait Terminal {
    /// Read one line of input after printing `prompt`.
    ///
    /// Returns [`EXIT_SENTINEL`] when input ends on an empty line.
    fn get_input(&mut self, prompt: &str) -> ConsoleResult<String>;

    /// Write text as-is.
    fn print(&mut self, text: &str) -> ConsoleResult<()>;

    fn println(&mut self, text: &str) -> ConsoleResult<()> {
        self.print(text)?;
        self.print("\n")
    }

    /// Number of columns of the terminal.
    fn width(&self) -> usize;

    fn colourize(&self, text: &str, colour: Colour) -> String;

    fn history(&self) -> &History;

    fn history_mut(&mut self) -> &mut History;

    fn kind(&self) -> TerminalKind;
}

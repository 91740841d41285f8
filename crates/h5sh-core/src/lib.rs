//! h5sh Core Library
//!
//! Platform-independent line editing for the h5sh shell: decoding a raw input
//! byte stream into edited lines, the line buffer and history models, and the
//! console traits that the platform backends in `h5sh-io` implement.

pub mod control;
pub mod escape;
pub mod history;
pub mod line_buffer;

pub mod error;

// Console I/O abstraction
pub mod console;

// Line editor driver
pub mod editor;

// Terminal capability interface
pub mod terminal;

pub use console::{ConsoleInput, ConsoleOutput, RawModeGuard, SuspendHook};
pub use control::ControlCode;
pub use editor::{EditorConfig, LineEditor, ReadOutcome};
pub use error::{ConsoleError, ConsoleResult, HistoryError};
pub use escape::{DecoderState, EscapeDecoder, EscapeSequence, Intent};
pub use history::{History, DEFAULT_MAX_HISTORY};
pub use line_buffer::LineBuffer;
pub use terminal::{colour_wrap, Colour, Terminal, TerminalKind, EXIT_SENTINEL};

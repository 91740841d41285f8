//! Raw-mode line editor.
//!
//! `LineEditor::read_line` drives one input session: it enters raw mode,
//! prints the prompt, then reads one byte at a time, feeds it to the
//! [`EscapeDecoder`] and applies the resulting [`Intent`] to the line buffer
//! and the history. Screen updates are incremental; only the part of the line
//! right of the cursor is ever redrawn, using relative cursor movement and
//! erase-to-end-of-line.

use crate::console::{ConsoleInput, ConsoleOutput, RawModeGuard, SuspendHook};
use crate::error::ConsoleResult;
use crate::escape::{EscapeDecoder, Intent};
use crate::history::{History, DEFAULT_MAX_HISTORY};
use crate::line_buffer::LineBuffer;

pub const CURSOR_LEFT: &[u8] = b"\x1b[D";
pub const CURSOR_RIGHT: &[u8] = b"\x1b[C";
pub const ERASE_TO_EOL: &[u8] = b"\x1b[K";
/// Raw mode disables output post-processing, so newlines need an explicit CR.
pub const NEWLINE: &[u8] = b"\r\n";

const MODE_SWITCH_MESSAGE: &str = "Unable to switch terminal to raw mode.\n";

/// Configuration for the line editor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditorConfig {
    /// Maximum number of history entries to keep
    pub max_history: usize,
    /// Whether Ctrl+Z may suspend the process (when the host supports it)
    pub enable_suspend: bool,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            max_history: DEFAULT_MAX_HISTORY,
            enable_suspend: true,
        }
    }
}

impl EditorConfig {
    pub fn with_max_history(mut self, max_history: usize) -> Self {
        self.max_history = max_history;
        self
    }

    pub fn with_suspend(mut self, enable_suspend: bool) -> Self {
        self.enable_suspend = enable_suspend;
        self
    }
}

/// How an input session ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReadOutcome {
    /// Enter on a non-empty line
    Submitted(String),
    /// Ctrl+D on an empty line, or the input stream closed
    EndOfInput,
}

enum Step {
    Continue,
    Done(ReadOutcome),
}

pub struct LineEditor {
    input: Box<dyn ConsoleInput>,
    output: Box<dyn ConsoleOutput>,
    history: History,
    buffer: LineBuffer,
    decoder: EscapeDecoder,
    suspend_hook: Option<Box<dyn SuspendHook>>,
}

impl LineEditor {
    pub fn new(
        input: Box<dyn ConsoleInput>,
        output: Box<dyn ConsoleOutput>,
        config: &EditorConfig,
    ) -> Self {
        Self {
            input,
            output,
            history: History::new(config.max_history),
            buffer: LineBuffer::new(),
            decoder: EscapeDecoder::new(false),
            suspend_hook: None,
        }
    }

    /// Bind Ctrl+Z to `hook`.
    pub fn with_suspend_hook(mut self, hook: Box<dyn SuspendHook>) -> Self {
        self.suspend_hook = Some(hook);
        self.decoder = EscapeDecoder::new(true);
        self
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn history_mut(&mut self) -> &mut History {
        &mut self.history
    }

    pub fn buffer(&self) -> &LineBuffer {
        &self.buffer
    }

    pub fn input(&self) -> &dyn ConsoleInput {
        self.input.as_ref()
    }

    pub fn output_mut(&mut self) -> &mut dyn ConsoleOutput {
        self.output.as_mut()
    }

    /// Read one line. Raw mode is held for the duration of this call only.
    pub fn read_line(&mut self, prompt: &str) -> ConsoleResult<ReadOutcome> {
        let mut guard = match self.input.enable_raw_mode() {
            Ok(guard) => Some(guard),
            Err(e) => {
                log::error!("{e}");
                if let Err(write_err) = self.report(MODE_SWITCH_MESSAGE) {
                    log::warn!("could not report mode switch failure: {write_err}");
                }
                return Err(e);
            }
        };

        let result = self.run_session(prompt, &mut guard);

        if let Some(guard) = guard.take() {
            let restored = guard.restore();
            match (&result, restored) {
                (Ok(_), Err(e)) => return Err(e),
                (Err(_), Err(e)) => log::warn!("{e}"),
                (_, Ok(())) => {}
            }
        }
        result
    }

    fn run_session(
        &mut self,
        prompt: &str,
        guard: &mut Option<RawModeGuard>,
    ) -> ConsoleResult<ReadOutcome> {
        self.buffer.clear();
        self.decoder.reset();
        self.emit(prompt.as_bytes())?;

        loop {
            let Some(byte) = self.input.read_byte()? else {
                log::debug!("input stream closed");
                self.emit(b"exit\r\n")?;
                return Ok(ReadOutcome::EndOfInput);
            };
            let Some(intent) = self.decoder.feed(byte) else {
                continue;
            };
            log::trace!("byte {byte:#04x} -> {intent:?}");

            if let Step::Done(outcome) = self.apply(intent, prompt, guard)? {
                return Ok(outcome);
            }
        }
    }

    fn apply(
        &mut self,
        intent: Intent,
        prompt: &str,
        guard: &mut Option<RawModeGuard>,
    ) -> ConsoleResult<Step> {
        match intent {
            Intent::Insert(text) => self.insert(&text)?,
            Intent::Backspace => self.delete_backwards()?,
            Intent::CursorLeft => {
                if self.buffer.move_left() {
                    self.emit(CURSOR_LEFT)?;
                }
            }
            Intent::CursorRight => {
                if self.buffer.move_right() {
                    self.emit(CURSOR_RIGHT)?;
                }
            }
            Intent::HistoryBack => {
                let current = self.buffer.to_line();
                match self.history.back(&current).map(str::to_owned) {
                    Ok(text) => self.replace_input(&text)?,
                    Err(e) => log::debug!("{e}"),
                }
            }
            Intent::HistoryForward => match self.history.forward().map(str::to_owned) {
                Ok(text) => self.replace_input(&text)?,
                Err(e) => log::debug!("{e}"),
            },
            Intent::Abort => {
                self.emit(b"^C\r\n")?;
                self.buffer.clear();
                self.history.reset();
                self.emit(prompt.as_bytes())?;
            }
            Intent::EndOfInput => {
                if self.buffer.is_empty() {
                    self.emit(b"exit\r\n")?;
                    return Ok(Step::Done(ReadOutcome::EndOfInput));
                }
            }
            Intent::Enter => {
                self.emit(NEWLINE)?;
                if !self.buffer.is_empty() {
                    let line = self.buffer.to_line();
                    self.history.append(&line);
                    return Ok(Step::Done(ReadOutcome::Submitted(line)));
                }
                self.emit(prompt.as_bytes())?;
            }
            Intent::Autocomplete => log::trace!("autocomplete is not implemented"),
            Intent::Suspend => self.suspend(prompt, guard)?,
        }
        Ok(Step::Continue)
    }

    /// Splice `text` in at the cursor, redraw the rest of the line and put the
    /// cursor back right after the inserted text.
    fn insert(&mut self, text: &[u8]) -> ConsoleResult<()> {
        self.buffer.insert(text);
        let tail = self.buffer.tail();
        let mut frame = Vec::with_capacity(text.len() + tail.len() * (CURSOR_LEFT.len() + 1));
        frame.extend_from_slice(text);
        frame.extend_from_slice(tail);
        push_repeated(&mut frame, CURSOR_LEFT, columns(tail));
        self.emit(&frame)
    }

    /// Remove the byte before the cursor: step left, erase to end of line,
    /// reprint the remainder and walk back over it.
    fn delete_backwards(&mut self) -> ConsoleResult<()> {
        if !self.buffer.delete_before() {
            return Ok(());
        }
        let tail = self.buffer.tail();
        let mut frame = Vec::new();
        frame.extend_from_slice(CURSOR_LEFT);
        frame.extend_from_slice(ERASE_TO_EOL);
        frame.extend_from_slice(tail);
        push_repeated(&mut frame, CURSOR_LEFT, columns(tail));
        self.emit(&frame)
    }

    /// Erase the rendered input and buffer, then insert `text`.
    fn replace_input(&mut self, text: &str) -> ConsoleResult<()> {
        if !self.buffer.is_empty() {
            let mut frame = Vec::new();
            let before_cursor = &self.buffer.content()[..self.buffer.cursor()];
            push_repeated(&mut frame, CURSOR_LEFT, columns(before_cursor));
            frame.extend_from_slice(ERASE_TO_EOL);
            self.buffer.clear();
            self.emit(&frame)?;
        }
        if !text.is_empty() {
            self.insert(text.as_bytes())?;
        }
        Ok(())
    }

    fn suspend(&mut self, prompt: &str, guard: &mut Option<RawModeGuard>) -> ConsoleResult<()> {
        if self.suspend_hook.is_none() {
            return Ok(());
        }
        self.emit(NEWLINE)?;
        if let Some(guard) = guard.take() {
            guard.restore()?;
        }
        if let Some(hook) = self.suspend_hook.as_mut() {
            log::debug!("suspending");
            hook.suspend()?;
        }
        *guard = Some(self.input.enable_raw_mode()?);

        let mut frame = prompt.as_bytes().to_vec();
        frame.extend_from_slice(self.buffer.content());
        push_repeated(&mut frame, CURSOR_LEFT, columns(self.buffer.tail()));
        self.emit(&frame)
    }

    fn emit(&mut self, bytes: &[u8]) -> ConsoleResult<()> {
        self.output.write_bytes(bytes)?;
        self.output.flush()
    }

    fn report(&mut self, message: &str) -> ConsoleResult<()> {
        self.output.write_text(message)?;
        self.output.flush()
    }
}

/// Screen columns taken by `bytes`: UTF-8 continuation bytes do not advance
/// the cursor.
fn columns(bytes: &[u8]) -> usize {
    bytes.iter().filter(|&&b| b & 0xC0 != 0x80).count()
}

fn push_repeated(frame: &mut Vec<u8>, sequence: &[u8], count: usize) {
    for _ in 0..count {
        frame.extend_from_slice(sequence);
    }
}

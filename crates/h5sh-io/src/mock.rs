//! Mock console implementations for testing

use std::collections::VecDeque;
use std::io;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use h5sh_core::{ConsoleError, ConsoleInput, ConsoleOutput, ConsoleResult, RawModeGuard};

/// Shared counters for raw mode acquisitions on a [`MockConsoleInput`].
#[derive(Debug, Clone, Default)]
pub struct ModeStats {
    entered: Arc<AtomicUsize>,
    restored: Arc<AtomicUsize>,
}

impl ModeStats {
    /// Successful switches to raw mode
    pub fn entered(&self) -> usize {
        self.entered.load(Ordering::Relaxed)
    }

    /// Writes of the captured mode back to the terminal, including the one
    /// done after a failed switch
    pub fn restored(&self) -> usize {
        self.restored.load(Ordering::Relaxed)
    }

    /// Whether the terminal would currently be in raw mode
    pub fn is_raw(&self) -> bool {
        self.entered() > self.restored()
    }
}

/// Mock console input replaying a scripted byte stream
pub struct MockConsoleInput {
    input_queue: VecDeque<u8>,
    fail_raw_mode: bool,
    /// Reads left before `read_byte` starts failing
    reads_before_failure: Option<usize>,
    window_size: (u16, u16),
    stats: ModeStats,
}

impl Default for MockConsoleInput {
    fn default() -> Self {
        Self::new()
    }
}

impl MockConsoleInput {
    pub fn new() -> Self {
        Self {
            input_queue: VecDeque::new(),
            fail_raw_mode: false,
            reads_before_failure: None,
            window_size: (80, 24),
            stats: ModeStats::default(),
        }
    }

    /// An input whose raw mode switch always fails
    pub fn failing_raw_mode() -> Self {
        Self {
            fail_raw_mode: true,
            ..Self::new()
        }
    }

    /// Make every `read_byte` after the first `reads` fail with an I/O error
    pub fn fail_read_after(mut self, reads: usize) -> Self {
        self.reads_before_failure = Some(reads);
        self
    }

    pub fn with_window_size(mut self, cols: u16, rows: u16) -> Self {
        self.window_size = (cols, rows);
        self
    }

    /// Queue raw bytes for testing
    pub fn queue_bytes(&mut self, bytes: &[u8]) {
        self.input_queue.extend(bytes.iter().copied());
    }

    /// Queue text input as typed characters
    pub fn queue_text(&mut self, text: &str) {
        self.queue_bytes(text.as_bytes());
    }

    /// Get the number of queued bytes
    pub fn queued_byte_count(&self) -> usize {
        self.input_queue.len()
    }

    pub fn mode_stats(&self) -> ModeStats {
        self.stats.clone()
    }
}

impl ConsoleInput for MockConsoleInput {
    fn enable_raw_mode(&mut self) -> ConsoleResult<RawModeGuard> {
        if self.fail_raw_mode {
            // the backend restores what it captured before reporting
            self.stats.restored.fetch_add(1, Ordering::Relaxed);
            return Err(ConsoleError::ModeSwitch(io::Error::new(
                io::ErrorKind::Unsupported,
                "mock terminal refuses raw mode",
            )));
        }
        self.stats.entered.fetch_add(1, Ordering::Relaxed);
        let restored = Arc::clone(&self.stats.restored);
        let restore_fn = move || {
            restored.fetch_add(1, Ordering::Relaxed);
            Ok(())
        };
        Ok(RawModeGuard::new(restore_fn, "Mock"))
    }

    fn read_byte(&mut self) -> ConsoleResult<Option<u8>> {
        if let Some(left) = self.reads_before_failure.as_mut() {
            if *left == 0 {
                return Err(ConsoleError::IoError(io::Error::new(
                    io::ErrorKind::BrokenPipe,
                    "mock input failed",
                )));
            }
            *left -= 1;
        }
        Ok(self.input_queue.pop_front())
    }

    fn window_size(&self) -> ConsoleResult<(u16, u16)> {
        Ok(self.window_size)
    }
}

/// Mock console output capturing everything written to it
///
/// Clones share the same buffer, so a test can keep one handle and give the
/// other to the editor.
#[derive(Debug, Clone, Default)]
pub struct MockConsoleOutput {
    output_buffer: Arc<Mutex<Vec<u8>>>,
    flush_count: Arc<AtomicUsize>,
    fail_writes: Arc<AtomicBool>,
}

impl MockConsoleOutput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything written so far, lossily decoded
    pub fn contents(&self) -> String {
        self.output_buffer
            .lock()
            .map(|buffer| String::from_utf8_lossy(&buffer).into_owned())
            .unwrap_or_default()
    }

    /// Return and clear the captured output
    pub fn take(&self) -> String {
        self.output_buffer
            .lock()
            .map(|mut buffer| String::from_utf8_lossy(&std::mem::take(&mut *buffer)).into_owned())
            .unwrap_or_default()
    }

    /// Make writes through every handle fail (or succeed again)
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::Relaxed);
    }

    pub fn flush_count(&self) -> usize {
        self.flush_count.load(Ordering::Relaxed)
    }
}

impl ConsoleOutput for MockConsoleOutput {
    fn write_bytes(&mut self, bytes: &[u8]) -> ConsoleResult<()> {
        if self.fail_writes.load(Ordering::Relaxed) {
            return Err(ConsoleError::IoError(io::Error::new(
                io::ErrorKind::BrokenPipe,
                "mock output failed",
            )));
        }
        match self.output_buffer.lock() {
            Ok(mut buffer) => {
                buffer.extend_from_slice(bytes);
                Ok(())
            }
            Err(_) => Err(ConsoleError::IoError(io::Error::new(
                io::ErrorKind::Other,
                "Failed to acquire buffer lock",
            ))),
        }
    }

    fn flush(&mut self) -> ConsoleResult<()> {
        self.flush_count.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_input_replays_queue() {
        let mut input = MockConsoleInput::new();
        input.queue_text("ab");
        input.queue_bytes(&[0x04]);
        assert_eq!(input.queued_byte_count(), 3);
        assert_eq!(input.read_byte().unwrap(), Some(b'a'));
        assert_eq!(input.read_byte().unwrap(), Some(b'b'));
        assert_eq!(input.read_byte().unwrap(), Some(0x04));
        assert_eq!(input.read_byte().unwrap(), None);
    }

    #[test]
    fn test_mock_raw_mode_counts() {
        let mut input = MockConsoleInput::new();
        let stats = input.mode_stats();
        let guard = input.enable_raw_mode().unwrap();
        assert!(stats.is_raw());
        drop(guard);
        assert!(!stats.is_raw());
        assert_eq!(stats.entered(), 1);
        assert_eq!(stats.restored(), 1);
    }

    #[test]
    fn test_mock_failing_raw_mode() {
        let mut input = MockConsoleInput::failing_raw_mode();
        let stats = input.mode_stats();
        assert!(matches!(
            input.enable_raw_mode(),
            Err(ConsoleError::ModeSwitch(_))
        ));
        assert_eq!(stats.entered(), 0);
        assert_eq!(stats.restored(), 1);
    }

    #[test]
    fn test_mock_output_shares_buffer() {
        let output = MockConsoleOutput::new();
        let mut writer = output.clone();
        writer.write_text("hello").unwrap();
        writer.flush().unwrap();
        assert_eq!(output.contents(), "hello");
        assert_eq!(output.take(), "hello");
        assert_eq!(output.contents(), "");
        assert_eq!(output.flush_count(), 1);
    }

    #[test]
    fn test_mock_read_failure() {
        let mut input = MockConsoleInput::new().fail_read_after(1);
        input.queue_text("ab");
        assert_eq!(input.read_byte().unwrap(), Some(b'a'));
        assert!(matches!(input.read_byte(), Err(ConsoleError::IoError(_))));
        assert!(matches!(input.read_byte(), Err(ConsoleError::IoError(_))));
    }

    #[test]
    fn test_mock_write_failure() {
        let output = MockConsoleOutput::new();
        let mut writer = output.clone();
        output.set_fail_writes(true);
        assert!(writer.write_text("x").is_err());
        output.set_fail_writes(false);
        writer.write_text("y").unwrap();
        assert_eq!(output.contents(), "y");
    }

    #[test]
    fn test_mock_window_size() {
        let input = MockConsoleInput::new().with_window_size(120, 40);
        assert_eq!(input.window_size().unwrap(), (120, 40));
    }
}

//! Console input/output abstraction traits and the raw mode guard
//!
//! Backends live in `h5sh-io`; the editor only sees these traits.

use crate::error::{ConsoleError, ConsoleResult};

/// Byte-level console input
pub trait ConsoleInput {
    /// Switch the terminal to raw mode. The returned guard restores the mode
    /// that was active before this call.
    fn enable_raw_mode(&mut self) -> ConsoleResult<RawModeGuard>;

    /// Block until one byte is available. `None` means the stream is closed.
    fn read_byte(&mut self) -> ConsoleResult<Option<u8>>;

    /// Current terminal window size (columns, rows)
    fn window_size(&self) -> ConsoleResult<(u16, u16)>;
}

/// Console output
pub trait ConsoleOutput {
    /// Write raw bytes at the current cursor position
    fn write_bytes(&mut self, bytes: &[u8]) -> ConsoleResult<()>;

    /// Write text at the current cursor position
    fn write_text(&mut self, text: &str) -> ConsoleResult<()> {
        self.write_bytes(text.as_bytes())
    }

    /// Flush buffered output to the terminal
    fn flush(&mut self) -> ConsoleResult<()>;
}

/// Optional capability to suspend the process (job control).
pub trait SuspendHook {
    /// Called with the terminal back in its original mode; returns once the
    /// process has been resumed.
    fn suspend(&mut self) -> ConsoleResult<()>;
}

type RestoreFn = Box<dyn FnOnce() -> ConsoleResult<()>>;

/// RAII guard for terminal raw mode
///
/// Holds the only handle able to put the captured mode back. The restore
/// closure runs at most once, either through [`RawModeGuard::restore`] or on
/// drop.
pub struct RawModeGuard {
    restore_fn: Option<RestoreFn>,
    platform_info: String,
}

impl RawModeGuard {
    pub fn new<F>(restore_fn: F, platform_info: impl Into<String>) -> Self
    where
        F: FnOnce() -> ConsoleResult<()> + 'static,
    {
        Self {
            restore_fn: Some(Box::new(restore_fn)),
            platform_info: platform_info.into(),
        }
    }

    pub fn platform_info(&self) -> &str {
        &self.platform_info
    }

    pub fn is_active(&self) -> bool {
        self.restore_fn.is_some()
    }

    /// Restore the terminal mode now and report failures
    pub fn restore(mut self) -> ConsoleResult<()> {
        self.run_restore()
    }

    fn run_restore(&mut self) -> ConsoleResult<()> {
        match self.restore_fn.take() {
            Some(restore_fn) => {
                log::debug!("restoring terminal mode ({})", self.platform_info);
                restore_fn()
            }
            None => Err(ConsoleError::AlreadyRestored),
        }
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        if self.restore_fn.is_some() {
            if let Err(e) = self.run_restore() {
                log::warn!("{e}");
            }
        }
    }
}

impl std::fmt::Debug for RawModeGuard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RawModeGuard")
            .field("platform_info", &self.platform_info)
            .field("active", &self.is_active())
            .finish()
    }
}

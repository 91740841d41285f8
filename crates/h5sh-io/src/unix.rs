use std::io::{self, Read};
use std::sync::atomic::{AtomicBool, Ordering};

use h5sh_core::{ConsoleError, ConsoleInput, ConsoleOutput, ConsoleResult, RawModeGuard, SuspendHook};

use crate::fallback::KeyboardInterrupt;

static INTERRUPTED: AtomicBool = AtomicBool::new(false);

/// Blocking single-byte console input on a POSIX terminal
pub struct UnixConsoleInput {
    stdin_fd: i32,
}

impl Default for UnixConsoleInput {
    fn default() -> Self {
        Self::new()
    }
}

impl UnixConsoleInput {
    pub fn new() -> Self {
        Self {
            stdin_fd: libc::STDIN_FILENO,
        }
    }

    /// Capture the current termios and switch `fd` to raw mode.
    ///
    /// If the switch fails, the captured settings are written back before the
    /// error is returned.
    fn enter_raw_mode(fd: i32) -> ConsoleResult<libc::termios> {
        let mut original_termios: libc::termios = unsafe { std::mem::zeroed() };
        if unsafe { libc::tcgetattr(fd, &mut original_termios) } != 0 {
            return Err(ConsoleError::ModeSwitch(io::Error::last_os_error()));
        }

        let mut raw = original_termios;
        raw.c_lflag &= !(libc::ICANON
            | libc::ECHO
            | libc::ECHOE
            | libc::ECHOK
            | libc::ECHONL
            | libc::ISIG
            | libc::IEXTEN);
        raw.c_iflag &= !(libc::IXON
            | libc::IXOFF
            | libc::ICRNL
            | libc::INLCR
            | libc::IGNCR
            | libc::BRKINT
            | libc::PARMRK
            | libc::ISTRIP);
        raw.c_oflag &= !libc::OPOST;
        raw.c_cflag &= !libc::CSIZE;
        raw.c_cflag |= libc::CS8;
        // one byte per read, no timeout
        raw.c_cc[libc::VMIN] = 1;
        raw.c_cc[libc::VTIME] = 0;

        if unsafe { libc::tcsetattr(fd, libc::TCSADRAIN, &raw) } != 0 {
            let cause = io::Error::last_os_error();
            if let Err(e) = restore_termios(fd, &original_termios) {
                log::warn!("{e}");
            }
            return Err(ConsoleError::ModeSwitch(cause));
        }
        Ok(original_termios)
    }
}

fn restore_termios(fd: i32, termios: &libc::termios) -> ConsoleResult<()> {
    if unsafe { libc::tcsetattr(fd, libc::TCSADRAIN, termios) } != 0 {
        return Err(ConsoleError::ModeRestore(io::Error::last_os_error()));
    }
    Ok(())
}

/// Query the window size of stdout (columns, rows)
pub(crate) fn query_window_size() -> io::Result<(u16, u16)> {
    let mut ws: libc::winsize = unsafe { std::mem::zeroed() };
    if unsafe { libc::ioctl(libc::STDOUT_FILENO, libc::TIOCGWINSZ, &mut ws) } == -1 {
        return Err(io::Error::last_os_error());
    }
    Ok((ws.ws_col, ws.ws_row))
}

impl ConsoleInput for UnixConsoleInput {
    fn enable_raw_mode(&mut self) -> ConsoleResult<RawModeGuard> {
        let stdin_fd = self.stdin_fd;
        let original_termios = Self::enter_raw_mode(stdin_fd)?;
        log::debug!("terminal switched to raw mode");

        let restore_fn = move || restore_termios(stdin_fd, &original_termios);
        Ok(RawModeGuard::new(restore_fn, "Unix VT"))
    }

    fn read_byte(&mut self) -> ConsoleResult<Option<u8>> {
        let mut byte = 0u8;
        loop {
            let result =
                unsafe { libc::read(self.stdin_fd, (&mut byte as *mut u8).cast::<libc::c_void>(), 1) };
            match result {
                1 => return Ok(Some(byte)),
                0 => return Ok(None),
                _ => {
                    let error = io::Error::last_os_error();
                    if error.raw_os_error() == Some(libc::EINTR) {
                        continue;
                    }
                    return Err(ConsoleError::IoError(error));
                }
            }
        }
    }

    fn window_size(&self) -> ConsoleResult<(u16, u16)> {
        Ok(query_window_size()?)
    }
}

/// Unix console output writing straight to the stdout file descriptor
pub struct UnixConsoleOutput {
    stdout_fd: i32,
    buffer: Vec<u8>,
}

impl Default for UnixConsoleOutput {
    fn default() -> Self {
        Self::new()
    }
}

impl UnixConsoleOutput {
    pub fn new() -> Self {
        Self {
            stdout_fd: libc::STDOUT_FILENO,
            buffer: Vec::new(),
        }
    }

    fn write_bytes_direct(&self, bytes: &[u8]) -> ConsoleResult<()> {
        let mut written = 0;
        while written < bytes.len() {
            let result = unsafe {
                libc::write(
                    self.stdout_fd,
                    bytes[written..].as_ptr().cast::<libc::c_void>(),
                    bytes.len() - written,
                )
            };

            if result == -1 {
                let error = io::Error::last_os_error();
                match error.raw_os_error() {
                    Some(libc::EINTR) => continue, // Interrupted by signal, retry
                    _ => return Err(ConsoleError::IoError(error)),
                }
            }
            written += result as usize;
        }
        Ok(())
    }
}

impl ConsoleOutput for UnixConsoleOutput {
    fn write_bytes(&mut self, bytes: &[u8]) -> ConsoleResult<()> {
        self.buffer.extend_from_slice(bytes);
        Ok(())
    }

    fn flush(&mut self) -> ConsoleResult<()> {
        if self.buffer.is_empty() {
            return Ok(());
        }
        let pending = std::mem::take(&mut self.buffer);
        self.write_bytes_direct(&pending)
    }
}

extern "C" fn on_sigint(_signal: libc::c_int) {
    INTERRUPTED.store(true, Ordering::SeqCst);
}

/// Turn SIGINT into a flag checked by [`InterruptibleStdin`].
///
/// The handler is installed without `SA_RESTART`, so a blocked `read` returns
/// `EINTR` when the signal arrives.
pub(crate) fn install_interrupt_handler() -> io::Result<()> {
    let mut action: libc::sigaction = unsafe { std::mem::zeroed() };
    action.sa_sigaction = on_sigint as extern "C" fn(libc::c_int) as libc::sighandler_t;
    action.sa_flags = 0;
    unsafe { libc::sigemptyset(&mut action.sa_mask) };
    if unsafe { libc::sigaction(libc::SIGINT, &action, std::ptr::null_mut()) } != 0 {
        return Err(io::Error::last_os_error());
    }
    Ok(())
}

fn take_interrupt() -> bool {
    INTERRUPTED.swap(false, Ordering::SeqCst)
}

/// Cooked-mode stdin that reports Ctrl-C as a [`KeyboardInterrupt`] error
/// instead of retrying the read.
pub struct InterruptibleStdin {
    fd: i32,
}

impl Default for InterruptibleStdin {
    fn default() -> Self {
        Self::new()
    }
}

impl InterruptibleStdin {
    pub fn new() -> Self {
        Self {
            fd: libc::STDIN_FILENO,
        }
    }
}

impl Read for InterruptibleStdin {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        loop {
            if take_interrupt() {
                return Err(KeyboardInterrupt.into_io_error());
            }
            let result =
                unsafe { libc::read(self.fd, buf.as_mut_ptr().cast::<libc::c_void>(), buf.len()) };
            if result >= 0 {
                return Ok(result as usize);
            }
            let error = io::Error::last_os_error();
            if error.raw_os_error() != Some(libc::EINTR) {
                return Err(error);
            }
        }
    }
}

/// Suspends the process with SIGTSTP, like a shell's Ctrl+Z.
#[derive(Debug, Default)]
pub struct SigtstpSuspend;

impl SuspendHook for SigtstpSuspend {
    fn suspend(&mut self) -> ConsoleResult<()> {
        // returns once the process receives SIGCONT
        if unsafe { libc::raise(libc::SIGTSTP) } != 0 {
            return Err(ConsoleError::IoError(io::Error::last_os_error()));
        }
        Ok(())
    }
}

//! Platform console backends for h5sh.
//!
//! Provides the terminal implementations the shell runs on:
//! - `Vt100Terminal`: raw-mode line editing over termios (Unix)
//! - `FallbackTerminal`: host line-buffered input, used when raw mode cannot
//!   be entered
//!
//! [`create_terminal`] probes the console once at start-up and picks one.

// Re-export core types and traits
pub use h5sh_core::{
    Colour, ConsoleError, ConsoleInput, ConsoleOutput, ConsoleResult, EditorConfig, History,
    LineEditor, RawModeGuard, SuspendHook, Terminal, TerminalKind,
};

pub mod debug;
mod fallback;
pub mod mock;
#[cfg(unix)]
mod unix;
mod vt100;

pub use fallback::{FallbackTerminal, KeyboardInterrupt};
#[cfg(unix)]
pub use unix::{InterruptibleStdin, SigtstpSuspend, UnixConsoleInput, UnixConsoleOutput};
pub use vt100::Vt100Terminal;

const DEFAULT_WIDTH: usize = 80;

/// Which backend the caller wants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TerminalPreference {
    /// Raw-mode editing if the console allows it
    #[default]
    Auto,
    /// Always use the line-buffered fallback
    Plain,
}

/// Create both console input and output for the current platform
pub fn create_console_io() -> ConsoleResult<(Box<dyn ConsoleInput>, Box<dyn ConsoleOutput>)> {
    let input = create_console_input()?;
    let output = create_console_output()?;
    Ok((input, output))
}

/// Create console input for the current platform
pub fn create_console_input() -> ConsoleResult<Box<dyn ConsoleInput>> {
    #[cfg(unix)]
    {
        Ok(Box::new(unix::UnixConsoleInput::new()))
    }

    #[cfg(not(unix))]
    {
        Err(ConsoleError::UnsupportedFeature {
            feature: "console input".to_string(),
            platform: std::env::consts::OS.to_string(),
        })
    }
}

/// Create console output for the current platform
pub fn create_console_output() -> ConsoleResult<Box<dyn ConsoleOutput>> {
    #[cfg(unix)]
    {
        Ok(Box::new(unix::UnixConsoleOutput::new()))
    }

    #[cfg(not(unix))]
    {
        Err(ConsoleError::UnsupportedFeature {
            feature: "console output".to_string(),
            platform: std::env::consts::OS.to_string(),
        })
    }
}

/// Number of terminal columns: the window size if it can be queried, then
/// `COLUMNS`, then 80.
pub fn terminal_width() -> usize {
    #[cfg(unix)]
    {
        if let Ok((cols, _)) = unix::query_window_size() {
            if cols > 0 {
                return usize::from(cols);
            }
        }
    }
    width_from_env(std::env::var("COLUMNS").ok().as_deref())
}

fn width_from_env(columns: Option<&str>) -> usize {
    columns
        .and_then(|value| value.trim().parse::<usize>().ok())
        .filter(|&cols| cols > 0)
        .unwrap_or(DEFAULT_WIDTH)
}

/// Try to enter raw mode and restore it right away.
pub fn probe_raw_mode(input: &mut dyn ConsoleInput) -> TerminalKind {
    let guard = match input.enable_raw_mode() {
        Ok(guard) => guard,
        Err(e) => {
            log::info!("raw mode unavailable: {e}");
            return TerminalKind::Fallback;
        }
    };
    match guard.restore() {
        Ok(()) => TerminalKind::Vt100,
        Err(e) => {
            log::warn!("raw mode probe could not restore the terminal: {e}");
            TerminalKind::Fallback
        }
    }
}

/// Pick and construct the terminal for this process.
pub fn create_terminal(config: &EditorConfig, preference: TerminalPreference) -> Box<dyn Terminal> {
    if preference == TerminalPreference::Plain {
        log::debug!("fallback terminal requested");
        return Box::new(FallbackTerminal::stdio(config));
    }

    let (mut input, output) = match create_console_io() {
        Ok(io) => io,
        Err(e) => {
            log::info!("{e}");
            return Box::new(FallbackTerminal::stdio(config));
        }
    };

    match probe_raw_mode(input.as_mut()) {
        TerminalKind::Vt100 => {
            log::debug!("using VT100 terminal ({})", platform_info());
            let editor = LineEditor::new(input, output, config);
            Box::new(Vt100Terminal::new(with_platform_suspend(editor, config)))
        }
        TerminalKind::Fallback => Box::new(FallbackTerminal::stdio(config)),
    }
}

#[cfg(unix)]
fn with_platform_suspend(editor: LineEditor, config: &EditorConfig) -> LineEditor {
    if config.enable_suspend {
        editor.with_suspend_hook(Box::new(unix::SigtstpSuspend))
    } else {
        editor
    }
}

#[cfg(not(unix))]
fn with_platform_suspend(editor: LineEditor, _config: &EditorConfig) -> LineEditor {
    editor
}

/// Describe the platform and the console implementation it would use.
pub fn platform_info() -> String {
    #[cfg(unix)]
    {
        format!(
            "Unix platform using VT100-compatible console I/O (OS: {})",
            std::env::consts::OS
        )
    }

    #[cfg(not(unix))]
    {
        format!("Unsupported platform: {}", std::env::consts::OS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockConsoleInput;

    #[test]
    fn test_probe_with_working_raw_mode() {
        let mut input = MockConsoleInput::new();
        let stats = input.mode_stats();
        assert_eq!(probe_raw_mode(&mut input), TerminalKind::Vt100);
        assert_eq!(stats.entered(), 1);
        assert_eq!(stats.restored(), 1);
    }

    #[test]
    fn test_probe_with_failing_raw_mode() {
        let mut input = MockConsoleInput::failing_raw_mode();
        assert_eq!(probe_raw_mode(&mut input), TerminalKind::Fallback);
        assert!(!input.mode_stats().is_raw());
    }

    #[test]
    fn test_width_from_env() {
        assert_eq!(width_from_env(Some("120")), 120);
        assert_eq!(width_from_env(Some(" 100 ")), 100);
        assert_eq!(width_from_env(Some("0")), DEFAULT_WIDTH);
        assert_eq!(width_from_env(Some("wide")), DEFAULT_WIDTH);
        assert_eq!(width_from_env(None), DEFAULT_WIDTH);
    }

    #[test]
    fn test_plain_preference_selects_fallback() {
        let term = create_terminal(&EditorConfig::default(), TerminalPreference::Plain);
        assert_eq!(term.kind(), TerminalKind::Fallback);
    }

    #[test]
    fn test_platform_info() {
        let info = platform_info();
        assert!(info.contains(std::env::consts::OS));
    }

    #[cfg(unix)]
    #[test]
    fn test_console_io_available_on_unix() {
        assert!(create_console_io().is_ok());
    }
}

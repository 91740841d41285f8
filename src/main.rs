use std::path::PathBuf;
use std::process;

use clap::Parser;
use h5sh_core::{ConsoleError, ConsoleResult, EditorConfig, DEFAULT_MAX_HISTORY};
use h5sh_io::{create_terminal, debug, TerminalPreference};

mod layout;
mod shell;

use shell::Shell;

/// Interactive shell for HDF5 files.
///
/// h5sh mimics common UNIX shells but supports only a subset of their
/// functionality. Type 'help' in a running shell to see the available commands.
#[derive(Parser, Debug)]
#[command(name = "h5sh")]
#[command(version)]
#[command(after_help = "See https://github.com/jl-wynen/h5shell for more information.")]
struct Cli {
    /// HDF5 file to open
    #[arg(value_name = "FILE")]
    file: Option<PathBuf>,

    /// Maximum number of history entries kept in memory
    #[arg(long, default_value_t = DEFAULT_MAX_HISTORY)]
    history_size: usize,

    /// Use line-buffered input even if the terminal supports raw mode
    #[arg(long)]
    plain: bool,

    /// Write debug logs to this file (also enabled by H5SH_DEBUG=1)
    #[arg(long, value_name = "PATH")]
    debug_log: Option<PathBuf>,
}

impl Cli {
    fn editor_config(&self) -> EditorConfig {
        EditorConfig::default().with_max_history(self.history_size)
    }

    fn preference(&self) -> TerminalPreference {
        if self.plain {
            TerminalPreference::Plain
        } else {
            TerminalPreference::Auto
        }
    }
}

fn main() {
    if let Err(e) = run() {
        if let Some(message) = error_report(&e) {
            eprintln!("{message}");
        }
        process::exit(1);
    }
}

/// Message for a fatal error, or `None` when the editor already told the user.
fn error_report(e: &ConsoleError) -> Option<String> {
    match e {
        ConsoleError::ModeSwitch(_) => None,
        other => Some(format!("Error: {other}")),
    }
}

fn run() -> ConsoleResult<()> {
    let cli = Cli::parse();
    debug::init(cli.debug_log.as_deref());

    let mut term = create_terminal(&cli.editor_config(), cli.preference());
    log::info!("terminal backend: {}", term.kind());

    let file_name = cli
        .file
        .as_ref()
        .map(|path| path.display().to_string())
        .unwrap_or_default();
    Shell::new(term.as_mut(), file_name).run()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_defaults() {
        let cli = Cli::try_parse_from(["h5sh"]).unwrap();
        assert!(cli.file.is_none());
        assert_eq!(cli.history_size, DEFAULT_MAX_HISTORY);
        assert_eq!(cli.preference(), TerminalPreference::Auto);
        assert!(cli.debug_log.is_none());
    }

    #[test]
    fn test_cli_options() {
        let cli = Cli::try_parse_from([
            "h5sh",
            "data.h5",
            "--history-size",
            "20",
            "--plain",
            "--debug-log",
            "/tmp/h5sh.log",
        ])
        .unwrap();
        assert_eq!(cli.file, Some(PathBuf::from("data.h5")));
        assert_eq!(cli.editor_config().max_history, 20);
        assert_eq!(cli.preference(), TerminalPreference::Plain);
        assert_eq!(cli.debug_log, Some(PathBuf::from("/tmp/h5sh.log")));
    }

    #[test]
    fn test_mode_switch_failure_is_reported_once() {
        let e = ConsoleError::ModeSwitch(std::io::Error::new(
            std::io::ErrorKind::Other,
            "not a tty",
        ));
        assert_eq!(error_report(&e), None);
    }

    #[test]
    fn test_other_errors_are_reported() {
        let e = ConsoleError::IoError(std::io::Error::new(
            std::io::ErrorKind::BrokenPipe,
            "gone",
        ));
        assert_eq!(error_report(&e).as_deref(), Some("Error: I/O error: gone"));
    }

    #[test]
    fn test_cli_rejects_bad_history_size() {
        assert!(Cli::try_parse_from(["h5sh", "--history-size", "many"]).is_err());
    }
}

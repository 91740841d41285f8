//! Line-buffered terminal for hosts where raw mode is unavailable.

use std::io::{self, BufRead, Stdout, Write};

use h5sh_core::{
    Colour, ConsoleResult, EditorConfig, History, Terminal, TerminalKind, EXIT_SENTINEL,
};

/// Error payload a reader uses to report Ctrl-C at the prompt.
#[derive(Debug, thiserror::Error)]
#[error("keyboard interrupt")]
pub struct KeyboardInterrupt;

impl KeyboardInterrupt {
    pub fn into_io_error(self) -> io::Error {
        io::Error::new(io::ErrorKind::Other, self)
    }

    pub fn is_interrupt(error: &io::Error) -> bool {
        error
            .get_ref()
            .is_some_and(|inner| inner.is::<KeyboardInterrupt>())
    }
}

#[cfg(unix)]
type StdinReader = io::BufReader<crate::unix::InterruptibleStdin>;
#[cfg(not(unix))]
type StdinReader = io::StdinLock<'static>;

/// Reads whole lines through the host's own line editing. No cursor keys, no
/// history navigation, no colour.
pub struct FallbackTerminal<R: BufRead, W: Write> {
    reader: R,
    writer: W,
    history: History,
}

impl FallbackTerminal<StdinReader, Stdout> {
    /// A fallback terminal on the process's stdin and stdout. On Unix, Ctrl-C
    /// discards the current line instead of terminating the process.
    pub fn stdio(config: &EditorConfig) -> Self {
        #[cfg(unix)]
        let reader = {
            if let Err(e) = crate::unix::install_interrupt_handler() {
                log::warn!("could not install SIGINT handler: {e}");
            }
            io::BufReader::new(crate::unix::InterruptibleStdin::new())
        };
        #[cfg(not(unix))]
        let reader = io::stdin().lock();

        Self::new(reader, io::stdout(), config)
    }
}

impl<R: BufRead, W: Write> FallbackTerminal<R, W> {
    pub fn new(reader: R, writer: W, config: &EditorConfig) -> Self {
        Self {
            reader,
            writer,
            history: History::new(config.max_history),
        }
    }

    pub fn writer(&self) -> &W {
        &self.writer
    }

    fn write_flushed(&mut self, text: &str) -> io::Result<()> {
        self.writer.write_all(text.as_bytes())?;
        self.writer.flush()
    }
}

impl<R: BufRead, W: Write> Terminal for FallbackTerminal<R, W> {
    fn get_input(&mut self, prompt: &str) -> ConsoleResult<String> {
        loop {
            self.write_flushed(prompt)?;

            let mut line = String::new();
            match self.reader.read_line(&mut line) {
                Ok(0) => {
                    self.write_flushed("exit\n")?;
                    return Ok(EXIT_SENTINEL.to_string());
                }
                Ok(_) => {}
                Err(e) if KeyboardInterrupt::is_interrupt(&e) => {
                    log::debug!("line discarded by keyboard interrupt");
                    self.write_flushed("\n")?;
                    continue;
                }
                Err(e) => return Err(e.into()),
            }

            let line = line.trim_end_matches(|c| c == '\n' || c == '\r');
            if !line.is_empty() {
                self.history.append(line);
                return Ok(line.to_string());
            }
        }
    }

    fn print(&mut self, text: &str) -> ConsoleResult<()> {
        Ok(self.write_flushed(text)?)
    }

    fn width(&self) -> usize {
        crate::terminal_width()
    }

    fn colourize(&self, text: &str, _colour: Colour) -> String {
        text.to_string()
    }

    fn history(&self) -> &History {
        &self.history
    }

    fn history_mut(&mut self) -> &mut History {
        &mut self.history
    }

    fn kind(&self) -> TerminalKind {
        TerminalKind::Fallback
    }
}

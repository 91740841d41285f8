use h5sh_core::{Colour, ConsoleResult, Terminal, TerminalKind, EXIT_SENTINEL};

use crate::layout::format_table;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

const COMMANDS: &[&str] = &[EXIT_SENTINEL, "help", "history"];
const INDENT: &str = "   ";

/// The read-dispatch loop on top of a [`Terminal`].
pub struct Shell<'a> {
    term: &'a mut dyn Terminal,
    file_name: String,
}

impl<'a> Shell<'a> {
    pub fn new(term: &'a mut dyn Terminal, file_name: impl Into<String>) -> Self {
        Self {
            term,
            file_name: file_name.into(),
        }
    }

    /// Run until the user exits or input ends.
    pub fn run(&mut self) -> ConsoleResult<()> {
        loop {
            let prompt = self.build_prompt();
            let line = self.term.get_input(&prompt)?;
            let words: Vec<&str> = line.split_whitespace().collect();

            match words.first().copied() {
                None => continue,
                Some(EXIT_SENTINEL) => break,
                Some("help") => self.show_help()?,
                Some("history") => self.show_history()?,
                Some(command) => self
                    .term
                    .println(&format!("h5sh: {command}: command not found"))?,
            }
        }
        log::debug!("shell loop finished");
        Ok(())
    }

    /// `dir/file// $ `, coloured when the terminal supports it.
    pub fn build_prompt(&self) -> String {
        let mut prompt = String::new();
        let (dir, file) = match self.file_name.rfind('/') {
            Some(pos) => self.file_name.split_at(pos + 1),
            None => ("", self.file_name.as_str()),
        };
        if !dir.is_empty() {
            prompt.push_str(&self.term.colourize(dir, Colour::BrightBlack));
        }
        prompt.push_str(&self.term.colourize(file, Colour::Yellow));
        prompt.push_str("// ");
        prompt.push_str(&self.term.colourize("$", Colour::BrightYellow));
        prompt.push(' ');
        prompt
    }

    fn show_help(&mut self) -> ConsoleResult<()> {
        let width = self.term.width().saturating_sub(INDENT.len());
        let commands = format_table(COMMANDS, width, "  ")
            .into_iter()
            .map(|row| format!("{INDENT}{row}"))
            .collect::<Vec<_>>()
            .join("\n");

        let backend = match self.term.kind() {
            TerminalKind::Vt100 => "advanced input is supported",
            TerminalKind::Fallback => "only basic input is available",
        };

        let help = format!(
            "h5sh version {VERSION}\n\n\
             Currently opened file: '{}'\n\n\
             Available commands:\n{commands}\n\n\
             The terminal backend is {}; {backend}.\n\n\
             For more information visit https://github.com/jl-wynen/h5shell",
            self.file_name,
            self.term.kind(),
        );
        self.term.println(&help)
    }

    fn show_history(&mut self) -> ConsoleResult<()> {
        let dump = self.term.history().dump(true);
        if dump.is_empty() {
            return Ok(());
        }
        self.term.println(&dump)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use h5sh_core::EditorConfig;
    use h5sh_io::FallbackTerminal;
    use std::io::Cursor;

    type TestTerminal = FallbackTerminal<Cursor<Vec<u8>>, Vec<u8>>;

    fn terminal(input: &str) -> TestTerminal {
        FallbackTerminal::new(
            Cursor::new(input.as_bytes().to_vec()),
            Vec::new(),
            &EditorConfig::default(),
        )
    }

    fn run(input: &str, file_name: &str) -> (TestTerminal, String) {
        let mut term = terminal(input);
        Shell::new(&mut term, file_name).run().unwrap();
        let written = String::from_utf8_lossy(term.writer()).into_owned();
        (term, written)
    }

    #[test]
    fn test_plain_prompt() {
        let mut term = terminal("");
        let shell = Shell::new(&mut term, "data/run1.h5");
        assert_eq!(shell.build_prompt(), "data/run1.h5// $ ");
    }

    #[test]
    fn test_prompt_without_directory() {
        let mut term = terminal("");
        let shell = Shell::new(&mut term, "run1.h5");
        assert_eq!(shell.build_prompt(), "run1.h5// $ ");
    }

    #[test]
    fn test_exit_stops_the_loop() {
        let (term, written) = run("exit\nhelp\n", "f.h5");
        assert_eq!(written, "f.h5// $ ");
        assert_eq!(term.history().len(), 1);
    }

    #[test]
    fn test_end_of_input_stops_the_loop() {
        let (_term, written) = run("", "f.h5");
        assert_eq!(written, "f.h5// $ exit\n");
    }

    #[test]
    fn test_unknown_command() {
        let (_term, written) = run("frobnicate -x\nexit\n", "f.h5");
        assert!(written.contains("h5sh: frobnicate: command not found\n"));
    }

    #[test]
    fn test_history_command() {
        let (_term, written) = run("ls\ncd grp\nhistory\nexit\n", "f.h5");
        assert!(written.contains("    0  ls\n    1  cd grp\n    2  history\n"));
    }

    #[test]
    fn test_help_names_backend() {
        let (_term, written) = run("help\nexit\n", "f.h5");
        assert!(written.contains("Currently opened file: 'f.h5'"));
        assert!(written.contains("The terminal backend is fallback; only basic input is available."));
        assert!(written.contains("   exit"));
        assert!(written.contains("history"));
    }
}

use h5sh_core::{
    colour_wrap, Colour, ConsoleResult, History, LineEditor, ReadOutcome, Terminal, TerminalKind,
    EXIT_SENTINEL,
};

/// Terminal backed by the raw-mode [`LineEditor`].
pub struct Vt100Terminal {
    editor: LineEditor,
}

impl Vt100Terminal {
    pub fn new(editor: LineEditor) -> Self {
        Self { editor }
    }

    pub fn editor(&self) -> &LineEditor {
        &self.editor
    }
}

impl Terminal for Vt100Terminal {
    fn get_input(&mut self, prompt: &str) -> ConsoleResult<String> {
        match self.editor.read_line(prompt)? {
            ReadOutcome::Submitted(line) => Ok(line),
            ReadOutcome::EndOfInput => Ok(EXIT_SENTINEL.to_string()),
        }
    }

    fn print(&mut self, text: &str) -> ConsoleResult<()> {
        // Outside of read_line the terminal is cooked, so "\n" is translated
        // by the tty itself.
        let output = self.editor.output_mut();
        output.write_text(text)?;
        output.flush()
    }

    fn width(&self) -> usize {
        match self.editor.input().window_size() {
            Ok((cols, _)) if cols > 0 => usize::from(cols),
            _ => crate::terminal_width(),
        }
    }

    fn colourize(&self, text: &str, colour: Colour) -> String {
        colour_wrap(text, colour)
    }

    fn history(&self) -> &History {
        self.editor.history()
    }

    fn history_mut(&mut self) -> &mut History {
        self.editor.history_mut()
    }

    fn kind(&self) -> TerminalKind {
        TerminalKind::Vt100
    }
}

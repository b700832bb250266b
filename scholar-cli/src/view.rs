//! Terminal binding for the chat controller

use scholar_chat::{render_message, ChatMessage, ChatView, Sender};
use scholar_core::{ErrorContext, ScholarError, ScholarResult};
use std::io::Write;

/// How bot replies are written
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// Markup converted to plain text
    Text,
    /// The safe markup itself
    Html,
}

/// Writes transcript entries to `out` and the status line to `status`
pub struct TerminalView<W: Write, S: Write> {
    out: W,
    status: S,
    mode: OutputMode,
    echo_user: bool,
    status_width: usize,
    input_enabled: bool,
}

impl TerminalView<std::io::Stdout, std::io::Stderr> {
    pub fn stdio(mode: OutputMode, echo_user: bool) -> Self {
        Self::new(std::io::stdout(), std::io::stderr(), mode, echo_user)
    }
}

impl<W: Write, S: Write> TerminalView<W, S> {
    pub fn new(out: W, status: S, mode: OutputMode, echo_user: bool) -> Self {
        Self {
            out,
            status,
            mode,
            echo_user,
            status_width: 0,
            input_enabled: true,
        }
    }

    pub fn is_input_enabled(&self) -> bool {
        self.input_enabled
    }

    /// Print the input prompt
    pub fn prompt(&mut self) -> ScholarResult<()> {
        write!(self.out, "You: ")?;
        self.out.flush()?;
        Ok(())
    }

    pub fn into_parts(self) -> (W, S) {
        (self.out, self.status)
    }

    /// Blank out a status line still on screen
    fn clear_status(&mut self) -> std::io::Result<()> {
        if self.status_width == 0 {
            return Ok(());
        }
        let blank = " ".repeat(self.status_width);
        self.status_width = 0;
        write!(self.status, "\r{}\r", blank)?;
        self.status.flush()
    }

    fn write_message(&mut self, message: &ChatMessage) -> std::io::Result<()> {
        match message.sender() {
            Sender::User => writeln!(self.out, "You: {}", message.text())?,
            Sender::Bot => {
                let markup = render_message(message);
                let body = match self.mode {
                    OutputMode::Text => markup.to_plain_text(),
                    OutputMode::Html => markup.into_string(),
                };
                writeln!(self.out, "Assistant: {}", body.trim_end())?;
                writeln!(self.out)?;
            }
        }
        self.out.flush()
    }
}

impl<W: Write, S: Write> ChatView for TerminalView<W, S> {
    fn set_input_enabled(&mut self, enabled: bool) {
        self.input_enabled = enabled;
    }

    fn set_status(&mut self, status: Option<&str>) {
        // Status output is best effort
        let _ = match status {
            Some(text) => {
                self.status_width = text.chars().count();
                write!(self.status, "{}", text).and_then(|_| self.status.flush())
            }
            None => self.clear_status(),
        };
    }

    fn clear_input(&mut self) {}

    fn focus_input(&mut self) {}

    fn show_message(&mut self, message: &ChatMessage) -> ScholarResult<()> {
        if message.is_user() && !self.echo_user {
            return Ok(());
        }

        self.clear_status()
            .and_then(|_| self.write_message(message))
            .map_err(|e| ScholarError::View {
            message: format!("Failed to write {} message: {}", message.sender().as_str(), e),
            source: Some(Box::new(e)),
            context: ErrorContext::new("terminal_view").with_operation("show_message"),
        })
    }
}

//! Terminal UI.

use console::{Style, Term};
use std::io::Write;

use super::{OutputMode, UserInterface};

/// Terminal UI writing reports to stdout and problems to stderr.
pub struct TerminalUI {
    out: Term,
    err: Term,
    mode: OutputMode,
    success: Style,
    warning: Style,
    error: Style,
}

impl TerminalUI {
    /// Create a new terminal UI.
    pub fn new(mode: OutputMode) -> Self {
        Self {
            out: Term::stdout(),
            err: Term::stderr(),
            mode,
            success: Style::new().green(),
            warning: Style::new().yellow(),
            error: Style::new().red().bold(),
        }
    }
}

impl UserInterface for TerminalUI {
    fn output_mode(&self) -> OutputMode {
        self.mode
    }

    fn message(&mut self, msg: &str) {
        write!(self.out, "{}", msg).ok();
        if !msg.ends_with('\n') {
            writeln!(self.out).ok();
        }
    }

    fn success(&mut self, msg: &str) {
        if self.mode.shows_status() {
            writeln!(self.out, "{}", self.success.apply_to(msg)).ok();
        }
    }

    fn warning(&mut self, msg: &str) {
        writeln!(self.err, "{}", self.warning.apply_to(msg)).ok();
    }

    fn error(&mut self, msg: &str) {
        writeln!(self.err, "{}", self.error.apply_to(msg)).ok();
    }
}

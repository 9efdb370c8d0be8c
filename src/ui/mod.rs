//! Terminal output.
//!
//! This module provides:
//! - [`UserInterface`] trait for output abstraction
//! - [`TerminalUI`] writing styled output to the terminal
//! - [`MockUI`] capturing output for tests
//!
//! # Example
//!
//! ```
//! use tfstyle::ui::{MockUI, UserInterface};
//!
//! let mut ui = MockUI::new();
//! ui.success("No issues found");
//! assert!(ui.has_success("No issues found"));
//! ```

pub mod mock;
pub mod output;
pub mod terminal;

pub use mock::MockUI;
pub use output::OutputMode;
pub use terminal::TerminalUI;

/// Trait for user-facing output.
///
/// This trait allows mocking the UI in tests.
pub trait UserInterface {
    /// Get the current output mode.
    fn output_mode(&self) -> OutputMode;

    /// Display a message to the user.
    fn message(&mut self, msg: &str);

    /// Display a success message.
    fn success(&mut self, msg: &str);

    /// Display a warning message.
    fn warning(&mut self, msg: &str);

    /// Display an error message.
    fn error(&mut self, msg: &str);
}

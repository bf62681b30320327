//! Operator interaction seam
//!
//! The menu and the deletion executor talk to the operator only through
//! [`InteractionAdapter`]. The binary provides a terminal implementation;
//! tests drive the same code with scripted answers.

use thiserror::Error;

/// Why an interaction could not complete
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InteractionError {
    /// Operator pressed Ctrl+C or closed input
    #[error("cancelled by user")]
    Cancelled,

    /// No terminal is attached to ask on
    #[error("not running in an interactive terminal")]
    NonInteractive,

    /// Reading or writing the terminal failed
    #[error("terminal I/O failed: {0}")]
    Io(String),
}

pub type InteractionResult<T> = Result<T, InteractionError>;

/// Prompts the menu needs
pub trait InteractionAdapter {
    /// Read one line of free text
    fn input(&mut self, prompt: &str) -> InteractionResult<String>;

    /// Yes/no question
    fn confirm(&mut self, prompt: &str, default: bool) -> InteractionResult<bool>;

    /// Informational line for the operator
    fn message(&mut self, text: &str);
}

impl From<InteractionError> for crate::error::SweepError {
    fn from(e: InteractionError) -> Self {
        match e {
            InteractionError::Cancelled => crate::error::SweepError::Cancelled,
            other => crate::error::SweepError::Prompt(other.to_string()),
        }
    }
}

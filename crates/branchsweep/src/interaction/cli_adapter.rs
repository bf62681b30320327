//! CLI adapter implementation using dialoguer for interactive prompts
//!
//! This module provides `CliAdapter`, which implements `InteractionAdapter`
//! for the menu, and `TerminalHooks`, which feeds the deletion executor.

use std::fmt::Write as FmtWrite;
use std::io::{IsTerminal, Write};
use std::sync::atomic::{AtomicBool, Ordering};

use console::{Style, Term};
use dialoguer::theme::Theme;
use dialoguer::{Confirm, Input};

use branchsweep_core::{
    DeleteHooks, DeleteResult, InteractionAdapter, InteractionError, InteractionResult,
};

use crate::output::render_result;

/// Global flag to track if Ctrl+C was pressed
static CANCELLED: AtomicBool = AtomicBool::new(false);

/// Check if cancellation was requested
pub fn is_cancelled() -> bool {
    CANCELLED.load(Ordering::SeqCst)
}

/// Set up the global Ctrl+C handler
pub fn setup_ctrl_c_handler() {
    static HANDLER_SET: AtomicBool = AtomicBool::new(false);

    if HANDLER_SET.swap(true, Ordering::SeqCst) {
        return;
    }

    if let Err(e) = ctrlc::set_handler(move || {
        CANCELLED.store(true, Ordering::SeqCst);
        restore_cursor();
        eprintln!();
    }) {
        tracing::warn!(error = %e, "could not set Ctrl+C handler");
    }
}

/// Show the cursor again after an interrupted prompt hid it
fn restore_cursor() {
    let _ = Term::stderr().show_cursor();
    let _ = Term::stdout().show_cursor();
}

/// Theme with a `?` prompt marker and dimmed hints
struct SweepTheme {
    prompt_style: Style,
    active_style: Style,
    hint_style: Style,
}

impl SweepTheme {
    fn new() -> Self {
        Self {
            prompt_style: Style::new().cyan().bold(),
            active_style: Style::new().cyan(),
            hint_style: Style::new().dim(),
        }
    }
}

impl Theme for SweepTheme {
    fn format_prompt(&self, f: &mut dyn FmtWrite, prompt: &str) -> std::fmt::Result {
        write!(f, "{}", self.prompt_style.apply_to(format!("? {}", prompt)))
    }

    fn format_input_prompt(
        &self,
        f: &mut dyn FmtWrite,
        prompt: &str,
        default: Option<&str>,
    ) -> std::fmt::Result {
        match default {
            Some(d) => write!(
                f,
                "{} {}",
                self.prompt_style.apply_to(format!("? {}", prompt)),
                self.hint_style.apply_to(format!("({})", d))
            ),
            None => write!(f, "{}", self.prompt_style.apply_to(format!("? {}", prompt))),
        }
    }

    fn format_input_prompt_selection(
        &self,
        f: &mut dyn FmtWrite,
        prompt: &str,
        sel: &str,
    ) -> std::fmt::Result {
        write!(
            f,
            "{} {}",
            self.prompt_style.apply_to(format!("? {}", prompt)),
            self.active_style.apply_to(sel)
        )
    }

    fn format_confirm_prompt(
        &self,
        f: &mut dyn FmtWrite,
        prompt: &str,
        default: Option<bool>,
    ) -> std::fmt::Result {
        let hint = match default {
            Some(true) => "(Y/n)",
            Some(false) => "(y/N)",
            None => "(y/n)",
        };
        write!(
            f,
            "{} {}",
            self.prompt_style.apply_to(format!("? {}", prompt)),
            self.hint_style.apply_to(hint)
        )
    }

    fn format_confirm_prompt_selection(
        &self,
        f: &mut dyn FmtWrite,
        prompt: &str,
        selection: Option<bool>,
    ) -> std::fmt::Result {
        let answer = match selection {
            Some(true) => "Yes",
            Some(false) => "No",
            None => "?",
        };
        write!(
            f,
            "{} {}",
            self.prompt_style.apply_to(format!("? {}", prompt)),
            self.active_style.apply_to(answer)
        )
    }
}

/// CLI adapter for terminal-based user interaction
pub struct CliAdapter {
    is_tty: bool,
}

impl CliAdapter {
    pub fn new() -> Self {
        setup_ctrl_c_handler();
        Self {
            is_tty: std::io::stdin().is_terminal() && std::io::stdout().is_terminal(),
        }
    }

    #[cfg(test)]
    pub fn with_tty(is_tty: bool) -> Self {
        Self { is_tty }
    }

    fn check_cancelled(&self) -> InteractionResult<()> {
        if is_cancelled() {
            Err(InteractionError::Cancelled)
        } else {
            Ok(())
        }
    }

    fn require_tty(&self) -> InteractionResult<()> {
        if !self.is_tty {
            Err(InteractionError::NonInteractive)
        } else {
            Ok(())
        }
    }

    fn convert_dialoguer_error(err: dialoguer::Error) -> InteractionError {
        restore_cursor();
        if is_cancelled() {
            InteractionError::Cancelled
        } else {
            InteractionError::Io(err.to_string())
        }
    }
}

impl Default for CliAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl InteractionAdapter for CliAdapter {
    fn input(&mut self, prompt: &str) -> InteractionResult<String> {
        self.require_tty()?;
        self.check_cancelled()?;

        let theme = SweepTheme::new();
        Input::<String>::with_theme(&theme)
            .with_prompt(prompt)
            .allow_empty(true)
            .interact_text()
            .map_err(Self::convert_dialoguer_error)
    }

    fn confirm(&mut self, prompt: &str, default: bool) -> InteractionResult<bool> {
        self.require_tty()?;
        self.check_cancelled()?;

        let theme = SweepTheme::new();
        Confirm::with_theme(&theme)
            .with_prompt(prompt)
            .default(default)
            .interact()
            .map_err(Self::convert_dialoguer_error)
    }

    fn message(&mut self, text: &str) {
        println!("{}", text);
        let _ = std::io::stdout().flush();
    }
}

/// Executor hooks for a terminal run
///
/// Prints each result as it lands and, when an adapter is attached, asks
/// before force-deleting an unmerged branch.
pub struct TerminalHooks<'a> {
    adapter: Option<&'a mut CliAdapter>,
    color: bool,
    quiet: bool,
}

impl<'a> TerminalHooks<'a> {
    pub fn new(adapter: Option<&'a mut CliAdapter>, color: bool, quiet: bool) -> Self {
        Self {
            adapter,
            color,
            quiet,
        }
    }
}

impl DeleteHooks for TerminalHooks<'_> {
    fn confirm_force(&mut self, branch: &str) -> bool {
        let Some(adapter) = self.adapter.as_deref_mut() else {
            return false;
        };
        let prompt = format!("'{}' is not fully merged. Force delete?", branch);
        adapter.confirm(&prompt, false).unwrap_or(false)
    }

    fn cancelled(&self) -> bool {
        is_cancelled()
    }

    fn on_result(&mut self, result: &DeleteResult) {
        if !self.quiet {
            println!("{}", render_result(result, self.color));
        }
    }
}

//! CLI interaction module
//!
//! This module provides the `CliAdapter` implementation of the
//! `InteractionAdapter` trait and the terminal hooks for the deletion
//! executor, both backed by dialoguer.

mod cli_adapter;

pub use cli_adapter::{CliAdapter, TerminalHooks, is_cancelled, setup_ctrl_c_handler};

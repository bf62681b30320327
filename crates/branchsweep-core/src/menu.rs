//! Interactive menu
//!
//! One choice, one dispatch. Invalid input re-prompts; nothing else loops.

use crate::interaction::{InteractionAdapter, InteractionResult};
use crate::types::{BranchRecord, Category, branch_noun};

/// Menu entries, in display order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    DeleteAll,
    DeleteDeprecated,
    DeleteStale,
    /// Ask about each branch in turn
    PerBranch,
    DryRun,
    Quit,
}

impl MenuChoice {
    pub const ALL: [MenuChoice; 6] = [
        MenuChoice::DeleteAll,
        MenuChoice::DeleteDeprecated,
        MenuChoice::DeleteStale,
        MenuChoice::PerBranch,
        MenuChoice::DryRun,
        MenuChoice::Quit,
    ];

    /// Accept the entry's number or letter, case-insensitively
    pub fn parse(input: &str) -> Option<Self> {
        let input = input.trim().to_lowercase();
        Self::ALL.into_iter().enumerate().find_map(|(i, choice)| {
            let number = (i + 1).to_string();
            (input == number || input == choice.key().to_string()).then_some(choice)
        })
    }

    pub fn key(self) -> char {
        match self {
            MenuChoice::DeleteAll => 'a',
            MenuChoice::DeleteDeprecated => 'd',
            MenuChoice::DeleteStale => 's',
            MenuChoice::PerBranch => 'i',
            MenuChoice::DryRun => 'n',
            MenuChoice::Quit => 'q',
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            MenuChoice::DeleteAll => "delete all deprecated and stale branches",
            MenuChoice::DeleteDeprecated => "delete deprecated branches",
            MenuChoice::DeleteStale => "delete stale branches",
            MenuChoice::PerBranch => "ask for each branch",
            MenuChoice::DryRun => "dry run: list what would be deleted",
            MenuChoice::Quit => "quit",
        }
    }

    fn category(self) -> Option<Category> {
        match self {
            MenuChoice::DeleteAll => Some(Category::All),
            MenuChoice::DeleteDeprecated => Some(Category::Deprecated),
            MenuChoice::DeleteStale => Some(Category::Stale),
            _ => None,
        }
    }
}

/// What the operator decided
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuOutcome {
    /// Confirmed list for the deletion executor
    Delete(Vec<String>),
    /// Show what would be deleted, delete nothing
    DryRun(Vec<String>),
    Quit,
}

/// Rendered menu text, one entry per line
pub fn menu_text() -> String {
    MenuChoice::ALL
        .iter()
        .enumerate()
        .map(|(i, c)| format!("  {}) [{}] {}", i + 1, c.key(), c.label()))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Show the menu and turn the operator's answers into an outcome
pub fn run_menu(
    adapter: &mut impl InteractionAdapter,
    records: &[BranchRecord],
) -> InteractionResult<MenuOutcome> {
    adapter.message(&menu_text());

    let choice = loop {
        let answer = adapter.input("Choose an action")?;
        match MenuChoice::parse(&answer) {
            Some(choice) => break choice,
            None => adapter.message(&format!(
                "invalid choice '{}': enter 1-6 or one of a, d, s, i, n, q",
                answer.trim()
            )),
        }
    };

    dispatch(adapter, choice, records)
}

fn dispatch(
    adapter: &mut impl InteractionAdapter,
    choice: MenuChoice,
    records: &[BranchRecord],
) -> InteractionResult<MenuOutcome> {
    if let Some(category) = choice.category() {
        let names = category.select(records);
        if names.is_empty() {
            adapter.message(&format!("nothing to delete in category {}", category));
            return Ok(MenuOutcome::Quit);
        }
        let prompt = format!("Delete {} {}?", names.len(), branch_noun(names.len()));
        return Ok(if adapter.confirm(&prompt, false)? {
            MenuOutcome::Delete(names)
        } else {
            MenuOutcome::Quit
        });
    }

    match choice {
        MenuChoice::PerBranch => {
            let mut selected = Vec::new();
            for record in records {
                let prompt = format!("Delete {} ({})?", record.name, record.status);
                if adapter.confirm(&prompt, false)? {
                    selected.push(record.name.clone());
                }
            }
            Ok(MenuOutcome::Delete(selected))
        }
        MenuChoice::DryRun => Ok(MenuOutcome::DryRun(Category::All.select(records))),
        _ => Ok(MenuOutcome::Quit),
    }
}

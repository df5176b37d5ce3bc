// src/select.rs
use dialoguer::theme::ColorfulTheme;
use dialoguer::{Input, Select};
use std::io;

use crate::error::{Error, Result};
use crate::records::{render, Listing};

/// Rows shown at once; longer lists ask for a search query first
pub const PAGE_SIZE: usize = 20;

/// Last row of every list; picking it asks for a name query
pub const SEARCH_ENTRY: &str = "/ search by name";

/// Lets the operator pick one item from an ordered list
pub trait Presenter {
    /// Return the chosen item, or [`Error::Cancelled`] when the operator quits
    fn present<T: Listing + Clone>(&self, prompt: &str, items: &[T], pattern: &str) -> Result<T>;
}

/// Case-insensitive substring match on the item name, ignoring whitespace
/// in both the query and the name
pub fn matches_query(name: &str, query: &str) -> bool {
    let squash = |s: &str| -> String {
        s.chars()
            .filter(|c| !c.is_whitespace())
            .flat_map(char::to_lowercase)
            .collect()
    };
    squash(name).contains(&squash(query))
}

/// Indices of the items whose name matches `query`
pub fn search<T: Listing>(items: &[T], query: &str) -> Vec<usize> {
    items
        .iter()
        .enumerate()
        .filter(|(_, item)| matches_query(item.name(), query))
        .map(|(i, _)| i)
        .collect()
}

/// Interactive picker on the controlling terminal
pub struct TerminalPresenter {
    theme: ColorfulTheme,
    page_size: usize,
}

impl Default for TerminalPresenter {
    fn default() -> Self {
        Self {
            theme: ColorfulTheme::default(),
            page_size: PAGE_SIZE,
        }
    }
}

impl TerminalPresenter {
    fn ask_query(&self) -> Result<String> {
        Input::<String>::with_theme(&self.theme)
            .with_prompt("Search by name (empty for all)")
            .allow_empty(true)
            .interact_text()
            .map_err(terminal_error)
    }

    fn pick<T: Listing + Clone>(&self, prompt: &str, items: &[T], pattern: &str) -> Result<T> {
        let mut query = if items.len() > self.page_size {
            Some(self.ask_query()?)
        } else {
            None
        };

        loop {
            let matched = match &query {
                Some(q) => search(items, q),
                None => (0..items.len()).collect(),
            };
            if matched.is_empty() {
                eprintln!("No match for '{}'", query.as_deref().unwrap_or("").trim());
                query = Some(self.ask_query()?);
                continue;
            }

            let rows = menu_rows(items, &matched, pattern);
            let choice = Select::with_theme(&self.theme)
                .with_prompt(format!("{} (Esc or q to exit)", prompt))
                .items(&rows)
                .default(0)
                .max_length(self.page_size)
                .interact_opt()
                .map_err(terminal_error)?;

            match choice {
                None => return Err(Error::Cancelled),
                Some(pos) if pos == matched.len() => query = Some(self.ask_query()?),
                Some(pos) => return Ok(items[matched[pos]].clone()),
            }
        }
    }
}

/// Rendered rows for `matched` items followed by the search entry
fn menu_rows<T: Listing>(items: &[T], matched: &[usize], pattern: &str) -> Vec<String> {
    matched
        .iter()
        .map(|&i| render(pattern, &items[i]))
        .chain(std::iter::once(SEARCH_ENTRY.to_string()))
        .collect()
}

impl Presenter for TerminalPresenter {
    fn present<T: Listing + Clone>(&self, prompt: &str, items: &[T], pattern: &str) -> Result<T> {
        // The prompt blocks on terminal input
        tokio::task::block_in_place(|| self.pick(prompt, items, pattern))
    }
}

fn terminal_error(err: dialoguer::Error) -> Error {
    let dialoguer::Error::IO(err) = err;
    match err.kind() {
        io::ErrorKind::Interrupted | io::ErrorKind::UnexpectedEof => Error::Cancelled,
        _ => Error::Terminal(err),
    }
}
